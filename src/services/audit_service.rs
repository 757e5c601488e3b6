use crate::entities::{AuditSubjectType, audit_log_entity as audit_logs};
use crate::error::AppResult;
use crate::models::{AuditLogQuery, AuditLogResponse, PaginatedResponse, PaginationParams};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

/// 一条待写入的审计记录
#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub actor_id: i64,
    pub subject_type: AuditSubjectType,
    pub subject_id: i64,
    pub previous_status: String,
    pub new_status: String,
    pub notes: Option<String>,
    pub transaction_id: Option<String>,
}

#[derive(Clone)]
pub struct AuditService {
    pool: DatabaseConnection,
}

impl AuditService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 在调用方的事务内追加一条审计记录。
    /// 与状态流转同事务提交，流转成功则必有审计。
    pub async fn record<C: ConnectionTrait>(conn: &C, entry: NewAuditEntry) -> AppResult<()> {
        audit_logs::ActiveModel {
            actor_id: Set(entry.actor_id),
            subject_type: Set(entry.subject_type),
            subject_id: Set(entry.subject_id),
            previous_status: Set(entry.previous_status),
            new_status: Set(entry.new_status),
            notes: Set(entry.notes),
            transaction_id: Set(entry.transaction_id),
            created_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(conn)
        .await?;

        Ok(())
    }

    /// 管理端查询审计日志（争议处理入口）
    pub async fn list(&self, query: &AuditLogQuery) -> AppResult<PaginatedResponse<AuditLogResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let mut base = audit_logs::Entity::find();
        if let Some(subject_type) = &query.subject_type {
            base = base.filter(audit_logs::Column::SubjectType.eq(subject_type.clone()));
        }
        if let Some(subject_id) = query.subject_id {
            base = base.filter(audit_logs::Column::SubjectId.eq(subject_id));
        }

        let total = base.clone().count(&self.pool).await? as i64;

        let models = base
            .order_by_desc(audit_logs::Column::CreatedAt)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;

        let items: Vec<AuditLogResponse> = models.into_iter().map(Into::into).collect();

        Ok(PaginatedResponse::new(
            items,
            params.get_page(),
            params.get_page_size(),
            total,
        ))
    }
}
