use crate::entities::{
    CommissionStatus, WithdrawalStatus, commission_entity as commissions,
    withdrawal_request_entity as withdrawals,
};
use crate::error::{AppError, AppResult};
use crate::models::WalletResponse;
use crate::utils::format_cents;
use sea_orm::sea_query::{Alias, Expr};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect,
};

#[derive(Clone)]
pub struct WalletService {
    pool: DatabaseConnection,
}

impl WalletService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 获取推广人钱包视图
    pub async fn get_wallet(&self, user_id: i64) -> AppResult<WalletResponse> {
        Self::compute_on(&self.pool, user_id).await
    }

    /// 从佣金与提现两张表重新聚合钱包，纯读操作。
    ///
    /// 接受任意连接（连接池或已开启的事务），写入方在自己的事务里
    /// 调用即可基于事务一致的数据做校验。
    pub async fn compute_on<C: ConnectionTrait>(conn: &C, user_id: i64) -> AppResult<WalletResponse> {
        let total_earned = Self::sum_commissions(
            conn,
            user_id,
            vec![CommissionStatus::Approved, CommissionStatus::Paid],
        )
        .await?;
        let pending_amount =
            Self::sum_commissions(conn, user_id, vec![CommissionStatus::Pending]).await?;
        let reserved_for_withdrawal = Self::sum_withdrawals(
            conn,
            user_id,
            vec![WithdrawalStatus::Pending, WithdrawalStatus::Approved],
        )
        .await?;
        let withdrawn_amount =
            Self::sum_withdrawals(conn, user_id, vec![WithdrawalStatus::Completed]).await?;

        Ok(assemble_wallet(
            user_id,
            total_earned,
            pending_amount,
            reserved_for_withdrawal,
            withdrawn_amount,
        ))
    }

    /// 余额不变量守卫：在每次状态流转的事务提交前调用。
    /// 不变量被破坏说明守卫逻辑或上游数据出了问题，直接报错，绝不自动修正。
    pub async fn check_invariants_on<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
    ) -> AppResult<WalletResponse> {
        let wallet = Self::compute_on(conn, user_id).await?;
        verify_invariants(&wallet)?;
        Ok(wallet)
    }

    async fn sum_commissions<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
        statuses: Vec<CommissionStatus>,
    ) -> AppResult<i64> {
        #[derive(Debug, sea_orm::FromQueryResult)]
        struct SumRow {
            total: Option<i64>,
        }

        let row = commissions::Entity::find()
            .filter(commissions::Column::UserId.eq(user_id))
            .filter(commissions::Column::Status.is_in(statuses))
            .select_only()
            .column_as(
                // SUM(bigint) 在 Postgres 里是 numeric，显式转回 BIGINT
                Expr::col(commissions::Column::CommissionAmount)
                    .sum()
                    .cast_as(Alias::new("BIGINT")),
                "total",
            )
            .into_model::<SumRow>()
            .one(conn)
            .await?;

        Ok(row.and_then(|r| r.total).unwrap_or(0))
    }

    async fn sum_withdrawals<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
        statuses: Vec<WithdrawalStatus>,
    ) -> AppResult<i64> {
        #[derive(Debug, sea_orm::FromQueryResult)]
        struct SumRow {
            total: Option<i64>,
        }

        let row = withdrawals::Entity::find()
            .filter(withdrawals::Column::UserId.eq(user_id))
            .filter(withdrawals::Column::Status.is_in(statuses))
            .select_only()
            .column_as(
                Expr::col(withdrawals::Column::Amount)
                    .sum()
                    .cast_as(Alias::new("BIGINT")),
                "total",
            )
            .into_model::<SumRow>()
            .one(conn)
            .await?;

        Ok(row.and_then(|r| r.total).unwrap_or(0))
    }
}

/// 由各项聚合值装配钱包视图
fn assemble_wallet(
    user_id: i64,
    total_earned: i64,
    pending_amount: i64,
    reserved_for_withdrawal: i64,
    withdrawn_amount: i64,
) -> WalletResponse {
    WalletResponse {
        user_id,
        total_earned,
        pending_amount,
        reserved_for_withdrawal,
        available_amount: total_earned - withdrawn_amount - reserved_for_withdrawal,
        withdrawn_amount,
    }
}

/// 校验两条余额不变量：可用余额非负、预留额度不超过未提现收益
fn verify_invariants(wallet: &WalletResponse) -> AppResult<()> {
    if wallet.available_amount < 0 {
        return Err(AppError::InvariantViolation(format!(
            "available amount {} is negative for user {}",
            format_cents(wallet.available_amount),
            wallet.user_id
        )));
    }
    if wallet.reserved_for_withdrawal > wallet.total_earned - wallet.withdrawn_amount {
        return Err(AppError::InvariantViolation(format!(
            "reserved {} exceeds unwithdrawn earnings {} for user {}",
            format_cents(wallet.reserved_for_withdrawal),
            format_cents(wallet.total_earned - wallet.withdrawn_amount),
            wallet.user_id
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_amount_derivation() {
        // totalEarned=100.00, withdrawn=0, 预留 60.00 -> 可用 40.00
        let wallet = assemble_wallet(1, 10_000, 0, 6_000, 0);
        assert_eq!(wallet.available_amount, 4_000);
        assert!(verify_invariants(&wallet).is_ok());
    }

    #[test]
    fn test_reservation_exceeding_earnings_is_violation() {
        let wallet = assemble_wallet(1, 10_000, 0, 11_000, 0);
        assert!(wallet.available_amount < 0);
        assert!(matches!(
            verify_invariants(&wallet),
            Err(AppError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_completed_withdrawal_moves_into_withdrawn() {
        // 60.00 完成提现后：预留清零，已提现 60.00，可用 40.00
        let wallet = assemble_wallet(1, 10_000, 0, 0, 6_000);
        assert_eq!(wallet.available_amount, 4_000);
        assert_eq!(wallet.withdrawn_amount, 6_000);
        assert!(verify_invariants(&wallet).is_ok());
    }

    #[test]
    fn test_pending_commissions_do_not_add_to_available() {
        let wallet = assemble_wallet(1, 0, 5_000, 0, 0);
        assert_eq!(wallet.available_amount, 0);
        assert_eq!(wallet.pending_amount, 5_000);
        assert!(verify_invariants(&wallet).is_ok());
    }
}
