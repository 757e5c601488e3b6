use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "withdrawal_status")]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl WithdrawalStatus {
    /// pending -> approved -> completed, 或 pending -> rejected
    pub fn can_transition_to(&self, next: &WithdrawalStatus) -> bool {
        matches!(
            (self, next),
            (WithdrawalStatus::Pending, WithdrawalStatus::Approved)
                | (WithdrawalStatus::Pending, WithdrawalStatus::Rejected)
                | (WithdrawalStatus::Approved, WithdrawalStatus::Completed)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, WithdrawalStatus::Rejected | WithdrawalStatus::Completed)
    }

    /// pending/approved 均占用钱包预留额度，completed 后转入已提现
    pub fn holds_reservation(&self) -> bool {
        matches!(self, WithdrawalStatus::Pending | WithdrawalStatus::Approved)
    }
}

impl std::fmt::Display for WithdrawalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WithdrawalStatus::Pending => write!(f, "pending"),
            WithdrawalStatus::Approved => write!(f, "approved"),
            WithdrawalStatus::Rejected => write!(f, "rejected"),
            WithdrawalStatus::Completed => write!(f, "completed"),
        }
    }
}

#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_method")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "paypal")]
    Paypal,
    #[sea_orm(string_value = "bank_transfer")]
    BankTransfer,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "withdrawal_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// 推广人用户ID
    pub user_id: i64,
    /// 申请金额（美分），创建后冻结
    pub amount: i64,
    pub payment_method: PaymentMethod,
    /// 收款方式对应的账户字段（JSON map）
    pub payment_details: Json,
    pub status: WithdrawalStatus,
    pub admin_notes: Option<String>,
    pub rejection_reason: Option<String>,
    /// 外部支付流水号，仅 completed 状态持有
    pub transaction_id: Option<String>,
    /// 处理该申请的管理员用户ID
    pub processed_by: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_transitions() {
        assert!(WithdrawalStatus::Pending.can_transition_to(&WithdrawalStatus::Approved));
        assert!(WithdrawalStatus::Pending.can_transition_to(&WithdrawalStatus::Rejected));
        assert!(WithdrawalStatus::Approved.can_transition_to(&WithdrawalStatus::Completed));
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for next in [
            WithdrawalStatus::Pending,
            WithdrawalStatus::Approved,
            WithdrawalStatus::Rejected,
            WithdrawalStatus::Completed,
        ] {
            assert!(!WithdrawalStatus::Rejected.can_transition_to(&next));
            assert!(!WithdrawalStatus::Completed.can_transition_to(&next));
        }
    }

    #[test]
    fn test_pending_cannot_skip_to_completed() {
        assert!(!WithdrawalStatus::Pending.can_transition_to(&WithdrawalStatus::Completed));
    }

    #[test]
    fn test_reservation_tracking() {
        assert!(WithdrawalStatus::Pending.holds_reservation());
        assert!(WithdrawalStatus::Approved.holds_reservation());
        assert!(!WithdrawalStatus::Rejected.holds_reservation());
        assert!(!WithdrawalStatus::Completed.holds_reservation());
    }
}
