use crate::config::WithdrawalConfig;
use crate::entities::{
    AuditSubjectType, PaymentMethod, WithdrawalStatus,
    promoter_account_entity as accounts, withdrawal_request_entity as withdrawals,
};
use crate::error::{AppError, AppResult};
use crate::external::{LedgerEvent, NotificationService};
use crate::models::{
    AdminWithdrawalQuery, AuthenticatedUser, CreateWithdrawalRequest, PaginatedResponse,
    PaginationParams, WithdrawalQuery, WithdrawalResponse, WithdrawalStatsResponse,
};
use crate::services::audit_service::{AuditService, NewAuditEntry};
use crate::services::wallet_service::WalletService;
use crate::utils::format_cents;
use chrono::Utc;
use regex::Regex;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde_json::Value;

/// 驳回原因最短长度，保证可审计
const MIN_REJECTION_REASON_LEN: usize = 10;
/// 外部支付流水号最短长度
const MIN_TRANSACTION_ID_LEN: usize = 5;

#[derive(Clone)]
pub struct WithdrawalService {
    pool: DatabaseConnection,
    notifications: NotificationService,
    limits: WithdrawalConfig,
}

impl WithdrawalService {
    pub fn new(
        pool: DatabaseConnection,
        notifications: NotificationService,
        limits: WithdrawalConfig,
    ) -> Self {
        Self {
            pool,
            notifications,
            limits,
        }
    }

    /// 推广人发起提现申请。
    ///
    /// 申请一旦创建即占用预留额度（pending 行参与钱包聚合），
    /// 因此并发的第二笔申请在校验时必然看到第一笔的预留。
    /// 同一推广人的写入通过账户行 version 做乐观串行化：
    /// 版本被并发改掉的一方拿到 ConcurrentModification，重试即可。
    pub async fn request_withdrawal(
        &self,
        user_id: i64,
        request: CreateWithdrawalRequest,
    ) -> AppResult<WithdrawalResponse> {
        validate_amount_limits(request.amount, &self.limits)?;
        validate_payment_details(&request.payment_method, &request.payment_details)?;

        let txn = self.pool.begin().await?;

        let account = self.ensure_account(&txn, user_id).await?;
        let bumped = accounts::Entity::update_many()
            .set(accounts::ActiveModel {
                version: Set(account.version + 1),
                updated_at: Set(Some(Utc::now())),
                ..Default::default()
            })
            .filter(accounts::Column::UserId.eq(user_id))
            .filter(accounts::Column::Version.eq(account.version))
            .exec(&txn)
            .await?;
        if bumped.rows_affected == 0 {
            return Err(AppError::ConcurrentModification);
        }

        // 版本抢占成功后再聚合钱包，此时看到的预留额度是事务一致的
        let wallet = WalletService::compute_on(&txn, user_id).await?;
        if request.amount > wallet.available_amount {
            return Err(AppError::InsufficientBalance {
                available: wallet.available_amount,
            });
        }

        let now = Utc::now();
        let model = withdrawals::ActiveModel {
            user_id: Set(user_id),
            amount: Set(request.amount),
            payment_method: Set(request.payment_method.clone()),
            payment_details: Set(request.payment_details.clone()),
            status: Set(WithdrawalStatus::Pending),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        WalletService::check_invariants_on(&txn, user_id).await?;

        txn.commit().await?;

        log::info!(
            "Withdrawal request {} created for promoter {}: {}",
            model.id,
            user_id,
            format_cents(model.amount)
        );

        self.notifications.dispatch(LedgerEvent::new(
            "withdrawal.requested",
            user_id,
            model.id,
            model.amount,
        ));

        Ok(model.into())
    }

    /// pending -> approved
    pub async fn approve(
        &self,
        actor: &AuthenticatedUser,
        id: i64,
        admin_notes: Option<String>,
    ) -> AppResult<WithdrawalResponse> {
        let now = Utc::now();
        self.transition(
            actor,
            id,
            WithdrawalStatus::Approved,
            withdrawals::ActiveModel {
                approved_at: Set(Some(now)),
                admin_notes: Set(admin_notes.clone()),
                ..Default::default()
            },
            admin_notes,
            None,
        )
        .await
    }

    /// pending -> rejected，释放预留额度
    pub async fn reject(
        &self,
        actor: &AuthenticatedUser,
        id: i64,
        reason: String,
    ) -> AppResult<WithdrawalResponse> {
        let reason = reason.trim().to_string();
        if reason.chars().count() < MIN_REJECTION_REASON_LEN {
            return Err(AppError::ValidationError(format!(
                "Rejection reason must be at least {MIN_REJECTION_REASON_LEN} characters"
            )));
        }

        let now = Utc::now();
        self.transition(
            actor,
            id,
            WithdrawalStatus::Rejected,
            withdrawals::ActiveModel {
                rejected_at: Set(Some(now)),
                rejection_reason: Set(Some(reason.clone())),
                ..Default::default()
            },
            Some(reason),
            None,
        )
        .await
    }

    /// approved -> completed，预留额度永久转入已提现
    pub async fn complete(
        &self,
        actor: &AuthenticatedUser,
        id: i64,
        transaction_id: String,
        admin_notes: Option<String>,
    ) -> AppResult<WithdrawalResponse> {
        let transaction_id = transaction_id.trim().to_string();
        if transaction_id.chars().count() < MIN_TRANSACTION_ID_LEN {
            return Err(AppError::ValidationError(format!(
                "Transaction id must be at least {MIN_TRANSACTION_ID_LEN} characters"
            )));
        }

        let now = Utc::now();
        let mut patch = withdrawals::ActiveModel {
            completed_at: Set(Some(now)),
            transaction_id: Set(Some(transaction_id.clone())),
            ..Default::default()
        };
        if admin_notes.is_some() {
            patch.admin_notes = Set(admin_notes.clone());
        }

        self.transition(
            actor,
            id,
            WithdrawalStatus::Completed,
            patch,
            admin_notes,
            Some(transaction_id),
        )
        .await
    }

    /// 提现状态流转，仅 admin/finance 角色可执行。
    /// CAS 语义与佣金流转一致。
    async fn transition(
        &self,
        actor: &AuthenticatedUser,
        id: i64,
        new_status: WithdrawalStatus,
        mut patch: withdrawals::ActiveModel,
        audit_notes: Option<String>,
        transaction_id: Option<String>,
    ) -> AppResult<WithdrawalResponse> {
        if !actor.role.can_manage_ledger() {
            return Err(AppError::Forbidden);
        }

        let txn = self.pool.begin().await?;

        let current = withdrawals::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Withdrawal request not found".to_string()))?;

        if !current.status.can_transition_to(&new_status) {
            return Err(AppError::InvalidStateTransition(format!(
                "withdrawal {id} cannot move from {} to {}",
                current.status, new_status
            )));
        }

        patch.status = Set(new_status.clone());
        patch.updated_at = Set(Some(Utc::now()));
        patch.processed_by = Set(Some(actor.user_id));

        let result = withdrawals::Entity::update_many()
            .set(patch)
            .filter(withdrawals::Column::Id.eq(id))
            .filter(withdrawals::Column::Status.eq(current.status.clone()))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::ConcurrentModification);
        }

        AuditService::record(
            &txn,
            NewAuditEntry {
                actor_id: actor.user_id,
                subject_type: AuditSubjectType::Withdrawal,
                subject_id: id,
                previous_status: current.status.to_string(),
                new_status: new_status.to_string(),
                notes: audit_notes,
                transaction_id,
            },
        )
        .await?;

        WalletService::check_invariants_on(&txn, current.user_id).await?;

        txn.commit().await?;

        let updated = withdrawals::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Withdrawal request not found".to_string()))?;

        log::info!(
            "Withdrawal {} moved from {} to {} by user {}",
            id,
            current.status,
            updated.status,
            actor.user_id
        );

        self.notifications.dispatch(LedgerEvent::new(
            format!("withdrawal.{}", updated.status),
            updated.user_id,
            updated.id,
            updated.amount,
        ));

        Ok(updated.into())
    }

    /// 推广人查看自己的提现历史，按创建时间倒序
    pub async fn list_by_promoter(
        &self,
        user_id: i64,
        query: &WithdrawalQuery,
    ) -> AppResult<PaginatedResponse<WithdrawalResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let base = withdrawals::Entity::find().filter(withdrawals::Column::UserId.eq(user_id));

        let total = base.clone().count(&self.pool).await? as i64;

        let models = base
            .order_by_desc(withdrawals::Column::CreatedAt)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;

        let items: Vec<WithdrawalResponse> = models.into_iter().map(Into::into).collect();

        Ok(PaginatedResponse::new(
            items,
            params.get_page(),
            params.get_page_size(),
            total,
        ))
    }

    /// 提现统计（余额 + 各状态申请数）
    pub async fn stats(&self, user_id: i64) -> AppResult<WithdrawalStatsResponse> {
        let wallet = WalletService::compute_on(&self.pool, user_id).await?;

        let pending_count = withdrawals::Entity::find()
            .filter(withdrawals::Column::UserId.eq(user_id))
            .filter(withdrawals::Column::Status.eq(WithdrawalStatus::Pending))
            .count(&self.pool)
            .await? as i64;

        let approved_count = withdrawals::Entity::find()
            .filter(withdrawals::Column::UserId.eq(user_id))
            .filter(
                withdrawals::Column::Status
                    .is_in(vec![WithdrawalStatus::Approved, WithdrawalStatus::Completed]),
            )
            .count(&self.pool)
            .await? as i64;

        let total_count = withdrawals::Entity::find()
            .filter(withdrawals::Column::UserId.eq(user_id))
            .count(&self.pool)
            .await? as i64;

        Ok(WithdrawalStatsResponse {
            available_balance: wallet.available_amount,
            reserved_balance: wallet.reserved_for_withdrawal,
            total_withdrawn: wallet.withdrawn_amount,
            pending_requests_count: pending_count,
            approved_requests_count: approved_count,
            total_requests_count: total_count,
        })
    }

    /// 管理端列表，支持状态与推广人过滤
    pub async fn admin_list(
        &self,
        actor: &AuthenticatedUser,
        query: &AdminWithdrawalQuery,
    ) -> AppResult<PaginatedResponse<WithdrawalResponse>> {
        if !actor.role.can_manage_ledger() {
            return Err(AppError::Forbidden);
        }

        let params = PaginationParams::new(query.page, query.per_page);

        let mut base = withdrawals::Entity::find();
        if let Some(status) = &query.status {
            base = base.filter(withdrawals::Column::Status.eq(status.clone()));
        }
        if let Some(user_id) = query.user_id {
            base = base.filter(withdrawals::Column::UserId.eq(user_id));
        }

        let total = base.clone().count(&self.pool).await? as i64;

        let models = base
            .order_by_desc(withdrawals::Column::CreatedAt)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;

        let items: Vec<WithdrawalResponse> = models.into_iter().map(Into::into).collect();

        Ok(PaginatedResponse::new(
            items,
            params.get_page(),
            params.get_page_size(),
            total,
        ))
    }

    /// 账户行懒创建。并发首次创建撞唯一约束时重读即可。
    async fn ensure_account<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i64,
    ) -> AppResult<accounts::Model> {
        if let Some(account) = accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id))
            .one(conn)
            .await?
        {
            return Ok(account);
        }

        let now = Utc::now();
        let insert = accounts::ActiveModel {
            user_id: Set(user_id),
            version: Set(0),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(conn)
        .await;

        match insert {
            Ok(account) => Ok(account),
            Err(e) => {
                // 唯一约束冲突说明另一请求刚创建了该行
                match accounts::Entity::find()
                    .filter(accounts::Column::UserId.eq(user_id))
                    .one(conn)
                    .await?
                {
                    Some(account) => Ok(account),
                    None => Err(e.into()),
                }
            }
        }
    }
}

/// 金额必须落在配置的最小/最大区间内
fn validate_amount_limits(amount: i64, limits: &WithdrawalConfig) -> AppResult<()> {
    if amount <= 0 {
        return Err(AppError::ValidationError(
            "Withdrawal amount must be positive".to_string(),
        ));
    }
    if amount < limits.min_amount {
        return Err(AppError::ValidationError(format!(
            "Minimum withdrawal amount is {}",
            format_cents(limits.min_amount)
        )));
    }
    if amount > limits.max_amount {
        return Err(AppError::ValidationError(format!(
            "Maximum withdrawal amount is {} per request",
            format_cents(limits.max_amount)
        )));
    }
    Ok(())
}

/// 校验收款方式所需的账户字段
fn validate_payment_details(method: &PaymentMethod, details: &Value) -> AppResult<()> {
    let object = details
        .as_object()
        .ok_or_else(|| AppError::ValidationError("Payment details must be an object".to_string()))?;

    let non_empty = |field: &str| -> bool {
        object
            .get(field)
            .and_then(Value::as_str)
            .map(|s| !s.trim().is_empty())
            .unwrap_or(false)
    };

    match method {
        PaymentMethod::Paypal => {
            let email = object
                .get("paypal_email")
                .and_then(Value::as_str)
                .unwrap_or("");
            let email_regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
            if !email_regex.is_match(email) {
                return Err(AppError::ValidationError(
                    "Valid PayPal email is required".to_string(),
                ));
            }
        }
        PaymentMethod::BankTransfer => {
            let required = [
                "account_holder_name",
                "bank_name",
                "account_number",
                "routing_number",
            ];
            let missing: Vec<&str> = required
                .iter()
                .copied()
                .filter(|f| !non_empty(f))
                .collect();
            if !missing.is_empty() {
                return Err(AppError::ValidationError(format!(
                    "Missing bank details: {}",
                    missing.join(", ")
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn limits() -> WithdrawalConfig {
        WithdrawalConfig {
            min_amount: 5_000,
            max_amount: 1_000_000,
        }
    }

    #[test]
    fn test_amount_limits() {
        assert!(validate_amount_limits(5_000, &limits()).is_ok());
        assert!(validate_amount_limits(1_000_000, &limits()).is_ok());

        assert!(matches!(
            validate_amount_limits(4_999, &limits()),
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            validate_amount_limits(1_000_001, &limits()),
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            validate_amount_limits(0, &limits()),
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            validate_amount_limits(-100, &limits()),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_paypal_details() {
        let ok = json!({"paypal_email": "promoter@example.com"});
        assert!(validate_payment_details(&PaymentMethod::Paypal, &ok).is_ok());

        let missing = json!({});
        assert!(validate_payment_details(&PaymentMethod::Paypal, &missing).is_err());

        let invalid = json!({"paypal_email": "not-an-email"});
        assert!(validate_payment_details(&PaymentMethod::Paypal, &invalid).is_err());
    }

    #[test]
    fn test_bank_transfer_details() {
        let ok = json!({
            "account_holder_name": "Jane Promoter",
            "bank_name": "First Bank",
            "account_number": "123456789",
            "routing_number": "987654321"
        });
        assert!(validate_payment_details(&PaymentMethod::BankTransfer, &ok).is_ok());

        let missing = json!({
            "account_holder_name": "Jane Promoter",
            "bank_name": ""
        });
        let err = validate_payment_details(&PaymentMethod::BankTransfer, &missing).unwrap_err();
        match err {
            AppError::ValidationError(msg) => {
                assert!(msg.contains("bank_name"));
                assert!(msg.contains("account_number"));
                assert!(msg.contains("routing_number"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_details_must_be_object() {
        let not_object = json!("paypal@example.com");
        assert!(validate_payment_details(&PaymentMethod::Paypal, &not_object).is_err());
    }
}
