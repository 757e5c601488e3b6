use crate::entities::{CommissionStatus, commission_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 订单完成事件载荷，由订单系统通过签名 webhook 推送
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderCompletedEvent {
    pub order_id: i64,
    pub product_id: String,
    /// 推广人用户ID
    pub user_id: i64,
    /// 商品价格（美分）
    pub product_price: i64,
    /// 佣金比例（basis points, 0..=10000）
    pub commission_rate_bps: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CommissionResponse {
    pub id: i64,
    pub order_id: i64,
    pub product_id: String,
    pub user_id: i64,
    pub product_price: i64,
    pub commission_rate_bps: i64,
    pub commission_amount: i64,
    pub status: CommissionStatus,
    pub payment_reference: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl From<commission_entity::Model> for CommissionResponse {
    fn from(m: commission_entity::Model) -> Self {
        Self {
            id: m.id,
            order_id: m.order_id,
            product_id: m.product_id,
            user_id: m.user_id,
            product_price: m.product_price,
            commission_rate_bps: m.commission_rate_bps,
            commission_amount: m.commission_amount,
            status: m.status,
            payment_reference: m.payment_reference,
            notes: m.notes,
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at,
            paid_at: m.paid_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CommissionQuery {
    pub status: Option<CommissionStatus>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdminCommissionQuery {
    pub status: Option<CommissionStatus>,
    /// 按推广人过滤
    pub user_id: Option<i64>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CommissionReviewRequest {
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MarkCommissionPaidRequest {
    /// 外部支付凭证号，必填
    pub payment_reference: String,
    pub notes: Option<String>,
}
