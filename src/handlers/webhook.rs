use crate::config::Config;
use crate::models::OrderCompletedEvent;
use crate::services::CommissionService;
use actix_web::{HttpRequest, HttpResponse, Result, web};
use hmac::{Hmac, Mac};
use log::{error, info, warn};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// 订单完成事件 webhook。
///
/// 由订单系统在销售归因成立时推送，创建对应的佣金记录。
/// 请求体用共享密钥做 HMAC-SHA256 签名（hex，放在 X-Signature 头，
/// 可带 "sha256=" 前缀）。
pub async fn order_completed(
    req: HttpRequest,
    body: web::Bytes,
    config: web::Data<Config>,
    commission_service: web::Data<CommissionService>,
) -> Result<HttpResponse> {
    let signature = match req.headers().get("x-signature") {
        Some(sig) => sig.to_str().unwrap_or(""),
        None => {
            warn!("Missing X-Signature header on order webhook");
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Missing X-Signature header"
            })));
        }
    };

    if !verify_signature(&config.order_webhook.secret, &body, signature) {
        error!("Order webhook signature verification failed");
        return Ok(HttpResponse::Unauthorized().json(serde_json::json!({
            "error": "Invalid signature"
        })));
    }

    let event: OrderCompletedEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            warn!("Invalid order webhook payload: {e}");
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Invalid payload"
            })));
        }
    };

    info!(
        "Received order-completed event: order {} promoter {}",
        event.order_id, event.user_id
    );

    match commission_service.create_commission(event).await {
        Ok(_) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "received": true
        }))),
        Err(e) => {
            error!("Failed to process order-completed event: {e}");
            // 返回200避免订单系统无限重试，错误随响应带回并记录
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "received": true,
                "error": format!("Processing failed: {}", e)
            })))
        }
    }
}

/// 校验 webhook 签名（常数时间比较由 hmac 的 verify_slice 保证）
fn verify_signature(secret: &str, payload: &[u8], signature_hex: &str) -> bool {
    let signature_hex = signature_hex.trim().trim_start_matches("sha256=");
    let Ok(signature) = hex::decode(signature_hex) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(payload);
    mac.verify_slice(&signature).is_ok()
}

pub fn webhook_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/webhook").route("/order-completed", web::post().to(order_completed)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, payload: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(payload);
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_valid_signature_accepted() {
        let payload = br#"{"order_id":1}"#;
        let sig = sign("shared-secret", payload);
        assert!(verify_signature("shared-secret", payload, &sig));
        // 带 sha256= 前缀也接受
        assert!(verify_signature(
            "shared-secret",
            payload,
            &format!("sha256={sig}")
        ));
    }

    #[test]
    fn test_bad_signature_rejected() {
        let payload = br#"{"order_id":1}"#;
        let sig = sign("shared-secret", payload);

        assert!(!verify_signature("other-secret", payload, &sig));
        assert!(!verify_signature("shared-secret", b"tampered", &sig));
        assert!(!verify_signature("shared-secret", payload, "deadbeef"));
        assert!(!verify_signature("shared-secret", payload, "not-hex"));
    }
}
