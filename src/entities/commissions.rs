use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "commission_status")]
#[serde(rename_all = "snake_case")]
pub enum CommissionStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "paid")]
    Paid,
}

impl CommissionStatus {
    /// 佣金状态只允许单向流转: pending -> approved/rejected, approved -> paid
    pub fn can_transition_to(&self, next: &CommissionStatus) -> bool {
        matches!(
            (self, next),
            (CommissionStatus::Pending, CommissionStatus::Approved)
                | (CommissionStatus::Pending, CommissionStatus::Rejected)
                | (CommissionStatus::Approved, CommissionStatus::Paid)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CommissionStatus::Rejected | CommissionStatus::Paid)
    }
}

impl std::fmt::Display for CommissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommissionStatus::Pending => write!(f, "pending"),
            CommissionStatus::Approved => write!(f, "approved"),
            CommissionStatus::Rejected => write!(f, "rejected"),
            CommissionStatus::Paid => write!(f, "paid"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "commissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub order_id: i64,
    pub product_id: String,
    /// 推广人用户ID
    pub user_id: i64,
    /// 商品价格（美分）
    pub product_price: i64,
    /// 佣金比例（basis points, 10000 = 100%）
    pub commission_rate_bps: i64,
    /// 创建时一次性算出并冻结，后续费率调整不回溯
    pub commission_amount: i64,
    pub status: CommissionStatus,
    pub payment_reference: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_transitions() {
        assert!(CommissionStatus::Pending.can_transition_to(&CommissionStatus::Approved));
        assert!(CommissionStatus::Pending.can_transition_to(&CommissionStatus::Rejected));
        assert!(CommissionStatus::Approved.can_transition_to(&CommissionStatus::Paid));
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for next in [
            CommissionStatus::Pending,
            CommissionStatus::Approved,
            CommissionStatus::Rejected,
            CommissionStatus::Paid,
        ] {
            assert!(!CommissionStatus::Rejected.can_transition_to(&next));
            assert!(!CommissionStatus::Paid.can_transition_to(&next));
        }
        assert!(CommissionStatus::Rejected.is_terminal());
        assert!(CommissionStatus::Paid.is_terminal());
    }

    #[test]
    fn test_no_backwards_transitions() {
        assert!(!CommissionStatus::Approved.can_transition_to(&CommissionStatus::Pending));
        assert!(!CommissionStatus::Approved.can_transition_to(&CommissionStatus::Rejected));
        assert!(!CommissionStatus::Pending.can_transition_to(&CommissionStatus::Paid));
    }
}
