use crate::entities::{AuditSubjectType, CommissionStatus, commission_entity as commissions};
use crate::error::{AppError, AppResult};
use crate::external::{LedgerEvent, NotificationService};
use crate::models::{
    AdminCommissionQuery, AuthenticatedUser, CommissionQuery, CommissionResponse,
    OrderCompletedEvent, PaginatedResponse, PaginationParams,
};
use crate::services::audit_service::{AuditService, NewAuditEntry};
use crate::services::wallet_service::WalletService;
use crate::utils::money::{BPS_DENOMINATOR, commission_amount_cents};
use crate::utils::format_cents;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

#[derive(Clone)]
pub struct CommissionService {
    pool: DatabaseConnection,
    notifications: NotificationService,
}

impl CommissionService {
    pub fn new(pool: DatabaseConnection, notifications: NotificationService) -> Self {
        Self {
            pool,
            notifications,
        }
    }

    /// 订单完成事件入账：计算并冻结佣金金额，初始状态 pending。
    /// 金额只在创建时算一次，之后费率调整不回溯已出账的佣金。
    pub async fn create_commission(&self, event: OrderCompletedEvent) -> AppResult<CommissionResponse> {
        if !(0..=BPS_DENOMINATOR).contains(&event.commission_rate_bps) {
            return Err(AppError::ValidationError(format!(
                "Commission rate must be between 0 and {BPS_DENOMINATOR} basis points"
            )));
        }
        if event.product_price < 0 {
            return Err(AppError::ValidationError(
                "Product price must not be negative".to_string(),
            ));
        }

        let amount = commission_amount_cents(event.product_price, event.commission_rate_bps);
        let now = Utc::now();

        let model = commissions::ActiveModel {
            order_id: Set(event.order_id),
            product_id: Set(event.product_id.clone()),
            user_id: Set(event.user_id),
            product_price: Set(event.product_price),
            commission_rate_bps: Set(event.commission_rate_bps),
            commission_amount: Set(amount),
            status: Set(CommissionStatus::Pending),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!(
            "Commission created for promoter {} on order {}: {}",
            event.user_id,
            event.order_id,
            format_cents(amount)
        );

        self.notifications.dispatch(LedgerEvent::new(
            "commission.created",
            model.user_id,
            model.id,
            model.commission_amount,
        ));

        Ok(model.into())
    }

    pub async fn approve(
        &self,
        actor: &AuthenticatedUser,
        id: i64,
        notes: Option<String>,
    ) -> AppResult<CommissionResponse> {
        self.transition(actor, id, CommissionStatus::Approved, None, notes)
            .await
    }

    pub async fn reject(
        &self,
        actor: &AuthenticatedUser,
        id: i64,
        notes: Option<String>,
    ) -> AppResult<CommissionResponse> {
        self.transition(actor, id, CommissionStatus::Rejected, None, notes)
            .await
    }

    /// approved -> paid，要求外部支付凭证号
    pub async fn mark_paid(
        &self,
        actor: &AuthenticatedUser,
        id: i64,
        payment_reference: String,
        notes: Option<String>,
    ) -> AppResult<CommissionResponse> {
        let payment_reference = payment_reference.trim().to_string();
        if payment_reference.is_empty() {
            return Err(AppError::ValidationError(
                "Payment reference is required".to_string(),
            ));
        }

        self.transition(
            actor,
            id,
            CommissionStatus::Paid,
            Some(payment_reference),
            notes,
        )
        .await
    }

    /// 佣金状态流转，仅 admin/finance 角色可执行。
    ///
    /// 以当前状态做 compare-and-swap：流转不被状态机允许时报
    /// InvalidStateTransition；预期状态在读取后被并发改掉时报
    /// ConcurrentModification（重读后可安全重试）。
    async fn transition(
        &self,
        actor: &AuthenticatedUser,
        id: i64,
        new_status: CommissionStatus,
        payment_reference: Option<String>,
        notes: Option<String>,
    ) -> AppResult<CommissionResponse> {
        if !actor.role.can_manage_ledger() {
            return Err(AppError::Forbidden);
        }

        let txn = self.pool.begin().await?;

        let current = commissions::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Commission not found".to_string()))?;

        if !current.status.can_transition_to(&new_status) {
            return Err(AppError::InvalidStateTransition(format!(
                "commission {id} cannot move from {} to {}",
                current.status, new_status
            )));
        }

        let now = Utc::now();
        let mut update = commissions::ActiveModel {
            status: Set(new_status.clone()),
            updated_at: Set(Some(now)),
            ..Default::default()
        };
        if new_status == CommissionStatus::Paid {
            update.paid_at = Set(Some(now));
            update.payment_reference = Set(payment_reference.clone());
        }
        if notes.is_some() {
            update.notes = Set(notes.clone());
        }

        let result = commissions::Entity::update_many()
            .set(update)
            .filter(commissions::Column::Id.eq(id))
            .filter(commissions::Column::Status.eq(current.status.clone()))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::ConcurrentModification);
        }

        AuditService::record(
            &txn,
            NewAuditEntry {
                actor_id: actor.user_id,
                subject_type: AuditSubjectType::Commission,
                subject_id: id,
                previous_status: current.status.to_string(),
                new_status: new_status.to_string(),
                notes,
                transaction_id: payment_reference,
            },
        )
        .await?;

        // 佣金流转会改变钱包聚合值，提交前重新校验不变量
        WalletService::check_invariants_on(&txn, current.user_id).await?;

        txn.commit().await?;

        let updated = commissions::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Commission not found".to_string()))?;

        log::info!(
            "Commission {} moved from {} to {} by user {}",
            id,
            current.status,
            updated.status,
            actor.user_id
        );

        self.notifications.dispatch(LedgerEvent::new(
            format!("commission.{}", updated.status),
            updated.user_id,
            updated.id,
            updated.commission_amount,
        ));

        Ok(updated.into())
    }

    /// 推广人查看自己的佣金列表，按创建时间倒序
    pub async fn list_by_promoter(
        &self,
        user_id: i64,
        query: &CommissionQuery,
    ) -> AppResult<PaginatedResponse<CommissionResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let mut base = commissions::Entity::find().filter(commissions::Column::UserId.eq(user_id));
        if let Some(status) = &query.status {
            base = base.filter(commissions::Column::Status.eq(status.clone()));
        }

        let total = base.clone().count(&self.pool).await? as i64;

        let models = base
            .order_by_desc(commissions::Column::CreatedAt)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;

        let items: Vec<CommissionResponse> = models.into_iter().map(Into::into).collect();

        Ok(PaginatedResponse::new(
            items,
            params.get_page(),
            params.get_page_size(),
            total,
        ))
    }

    /// 管理端列表，支持状态与推广人过滤
    pub async fn admin_list(
        &self,
        actor: &AuthenticatedUser,
        query: &AdminCommissionQuery,
    ) -> AppResult<PaginatedResponse<CommissionResponse>> {
        if !actor.role.can_manage_ledger() {
            return Err(AppError::Forbidden);
        }

        let params = PaginationParams::new(query.page, query.per_page);

        let mut base = commissions::Entity::find();
        if let Some(status) = &query.status {
            base = base.filter(commissions::Column::Status.eq(status.clone()));
        }
        if let Some(user_id) = query.user_id {
            base = base.filter(commissions::Column::UserId.eq(user_id));
        }

        let total = base.clone().count(&self.pool).await? as i64;

        let models = base
            .order_by_desc(commissions::Column::CreatedAt)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;

        let items: Vec<CommissionResponse> = models.into_iter().map(Into::into).collect();

        Ok(PaginatedResponse::new(
            items,
            params.get_page(),
            params.get_page_size(),
            total,
        ))
    }
}
