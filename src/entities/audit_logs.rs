use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "audit_subject_type")]
#[serde(rename_all = "snake_case")]
pub enum AuditSubjectType {
    #[sea_orm(string_value = "commission")]
    Commission,
    #[sea_orm(string_value = "withdrawal")]
    Withdrawal,
}

/// 审计日志：与状态流转同事务写入，只追加，不更新不删除。
/// 这是争议处理的依据，属于正确性要求而非可选埋点。
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// 执行流转的管理员用户ID
    pub actor_id: i64,
    pub subject_type: AuditSubjectType,
    pub subject_id: i64,
    pub previous_status: String,
    pub new_status: String,
    pub notes: Option<String>,
    pub transaction_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
