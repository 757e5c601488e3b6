use crate::entities::{PaymentMethod, WithdrawalStatus, withdrawal_request_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateWithdrawalRequest {
    /// 提现金额（美分）
    pub amount: i64,
    pub payment_method: PaymentMethod,
    /// 收款方式对应的账户字段，如 {"paypal_email": "..."}
    #[schema(value_type = Object)]
    pub payment_details: Value,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WithdrawalResponse {
    pub id: i64,
    pub user_id: i64,
    pub amount: i64,
    pub payment_method: PaymentMethod,
    #[schema(value_type = Object)]
    pub payment_details: Value,
    pub status: WithdrawalStatus,
    pub admin_notes: Option<String>,
    pub rejection_reason: Option<String>,
    pub transaction_id: Option<String>,
    pub processed_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<withdrawal_request_entity::Model> for WithdrawalResponse {
    fn from(m: withdrawal_request_entity::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            amount: m.amount,
            payment_method: m.payment_method,
            payment_details: m.payment_details,
            status: m.status,
            admin_notes: m.admin_notes,
            rejection_reason: m.rejection_reason,
            transaction_id: m.transaction_id,
            processed_by: m.processed_by,
            created_at: m.created_at.unwrap_or_else(Utc::now),
            approved_at: m.approved_at,
            rejected_at: m.rejected_at,
            completed_at: m.completed_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct WithdrawalQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdminWithdrawalQuery {
    pub status: Option<WithdrawalStatus>,
    pub user_id: Option<i64>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ApproveWithdrawalRequest {
    pub admin_notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RejectWithdrawalRequest {
    /// 驳回原因，至少 10 个字符，用于审计
    pub reason: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CompleteWithdrawalRequest {
    /// 外部支付流水号，至少 5 个字符
    pub transaction_id: String,
    pub admin_notes: Option<String>,
}
