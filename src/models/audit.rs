use crate::entities::{AuditSubjectType, audit_log_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuditLogResponse {
    pub id: i64,
    pub actor_id: i64,
    pub subject_type: AuditSubjectType,
    pub subject_id: i64,
    pub previous_status: String,
    pub new_status: String,
    pub notes: Option<String>,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<audit_log_entity::Model> for AuditLogResponse {
    fn from(m: audit_log_entity::Model) -> Self {
        Self {
            id: m.id,
            actor_id: m.actor_id,
            subject_type: m.subject_type,
            subject_id: m.subject_id,
            previous_status: m.previous_status,
            new_status: m.new_status,
            notes: m.notes,
            transaction_id: m.transaction_id,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AuditLogQuery {
    pub subject_type: Option<AuditSubjectType>,
    pub subject_id: Option<i64>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}
