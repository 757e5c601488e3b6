use crate::config::NotificationConfig;
use crate::utils::format_cents;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use uuid::Uuid;

/// 状态流转产生的账本事件，推送给外部通知系统。
/// 投递由下游负责，本服务只负责发出。
#[derive(Debug, Clone, Serialize)]
pub struct LedgerEvent {
    pub event_id: Uuid,
    /// 形如 "withdrawal.approved" / "commission.paid"
    pub event: String,
    pub user_id: i64,
    pub subject_id: i64,
    /// 金额（美分）
    pub amount: i64,
    /// 金额的十进制字符串表示，如 "20.00"
    pub amount_display: String,
    pub occurred_at: DateTime<Utc>,
}

impl LedgerEvent {
    pub fn new(event: impl Into<String>, user_id: i64, subject_id: i64, amount: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event: event.into(),
            user_id,
            subject_id,
            amount,
            amount_display: format_cents(amount),
            occurred_at: Utc::now(),
        }
    }
}

#[derive(Clone)]
pub struct NotificationService {
    client: Client,
    config: NotificationConfig,
}

impl NotificationService {
    pub fn new(config: NotificationConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// fire-and-forget 推送。失败只记日志，绝不影响账本操作本身。
    pub fn dispatch(&self, event: LedgerEvent) {
        let Some(url) = self.config.webhook_url.clone() else {
            log::debug!("Notification webhook not configured, skipping event {}", event.event);
            return;
        };

        let client = self.client.clone();
        tokio::spawn(async move {
            match client.post(&url).json(&event).send().await {
                Ok(resp) if resp.status().is_success() => {
                    log::info!("Dispatched ledger event {} ({})", event.event, event.event_id);
                }
                Ok(resp) => {
                    log::warn!(
                        "Notification endpoint returned {} for event {} ({})",
                        resp.status(),
                        event.event,
                        event.event_id
                    );
                }
                Err(e) => {
                    log::warn!(
                        "Failed to dispatch ledger event {} ({}): {e}",
                        event.event,
                        event.event_id
                    );
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_carries_display_amount() {
        let event = LedgerEvent::new("withdrawal.approved", 7, 99, 6_000);
        assert_eq!(event.amount_display, "60.00");
        assert_eq!(event.event, "withdrawal.approved");
    }
}
