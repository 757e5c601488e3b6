use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 推广人钱包视图，所有金额均为美分。
///
/// 钱包不落库，每次读取都从佣金与提现两张表重新聚合，
/// 不存在独立维护的余额字段，因此不会出现缓存漂移。
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WalletResponse {
    pub user_id: i64,
    /// 已批准+已支付佣金总额
    pub total_earned: i64,
    /// 待审核佣金总额
    pub pending_amount: i64,
    /// 被 pending/approved 提现申请占用的额度
    pub reserved_for_withdrawal: i64,
    /// total_earned - withdrawn_amount - reserved_for_withdrawal
    pub available_amount: i64,
    /// 已完成提现总额
    pub withdrawn_amount: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WithdrawalStatsResponse {
    pub available_balance: i64,
    pub reserved_balance: i64,
    pub total_withdrawn: i64,
    pub pending_requests_count: i64,
    pub approved_requests_count: i64,
    pub total_requests_count: i64,
}
