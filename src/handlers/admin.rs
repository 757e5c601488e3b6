use crate::error::AppError;
use crate::models::*;
use crate::services::{AuditService, CommissionService, WithdrawalService};
use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

fn get_authenticated_user(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
    req.extensions()
        .get::<AuthenticatedUser>()
        .copied()
        .ok_or_else(|| AppError::AuthError("Missing authentication context".to_string()))
}

#[utoipa::path(
    get,
    path = "/admin/commissions",
    tag = "admin",
    params(
        ("status" = Option<String>, Query, description = "状态过滤"),
        ("user_id" = Option<i64>, Query, description = "按推广人过滤"),
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取佣金列表成功"),
        (status = 403, description = "角色不允许")
    )
)]
pub async fn list_commissions(
    commission_service: web::Data<CommissionService>,
    req: HttpRequest,
    query: web::Query<AdminCommissionQuery>,
) -> Result<HttpResponse> {
    let actor = match get_authenticated_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match commission_service.admin_list(&actor, &query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/commissions/{id}/approve",
    tag = "admin",
    request_body = CommissionReviewRequest,
    params(
        ("id" = i64, Path, description = "佣金ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "佣金批准成功"),
        (status = 403, description = "角色不允许"),
        (status = 409, description = "状态不允许流转")
    )
)]
pub async fn approve_commission(
    commission_service: web::Data<CommissionService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<CommissionReviewRequest>,
) -> Result<HttpResponse> {
    let actor = match get_authenticated_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match commission_service
        .approve(&actor, path.into_inner(), request.into_inner().notes)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/commissions/{id}/reject",
    tag = "admin",
    request_body = CommissionReviewRequest,
    params(
        ("id" = i64, Path, description = "佣金ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "佣金驳回成功"),
        (status = 403, description = "角色不允许"),
        (status = 409, description = "状态不允许流转")
    )
)]
pub async fn reject_commission(
    commission_service: web::Data<CommissionService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<CommissionReviewRequest>,
) -> Result<HttpResponse> {
    let actor = match get_authenticated_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match commission_service
        .reject(&actor, path.into_inner(), request.into_inner().notes)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/commissions/{id}/mark-paid",
    tag = "admin",
    request_body = MarkCommissionPaidRequest,
    params(
        ("id" = i64, Path, description = "佣金ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "佣金标记已支付成功"),
        (status = 400, description = "缺少支付凭证号"),
        (status = 403, description = "角色不允许"),
        (status = 409, description = "状态不允许流转")
    )
)]
pub async fn mark_commission_paid(
    commission_service: web::Data<CommissionService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<MarkCommissionPaidRequest>,
) -> Result<HttpResponse> {
    let actor = match get_authenticated_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    let request = request.into_inner();
    match commission_service
        .mark_paid(
            &actor,
            path.into_inner(),
            request.payment_reference,
            request.notes,
        )
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/withdrawals",
    tag = "admin",
    params(
        ("status" = Option<String>, Query, description = "状态过滤"),
        ("user_id" = Option<i64>, Query, description = "按推广人过滤"),
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取提现申请列表成功"),
        (status = 403, description = "角色不允许")
    )
)]
pub async fn list_withdrawals(
    withdrawal_service: web::Data<WithdrawalService>,
    req: HttpRequest,
    query: web::Query<AdminWithdrawalQuery>,
) -> Result<HttpResponse> {
    let actor = match get_authenticated_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match withdrawal_service.admin_list(&actor, &query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/withdrawals/{id}/approve",
    tag = "admin",
    request_body = ApproveWithdrawalRequest,
    params(
        ("id" = i64, Path, description = "提现申请ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "提现批准成功"),
        (status = 403, description = "角色不允许"),
        (status = 409, description = "状态不允许流转")
    )
)]
pub async fn approve_withdrawal(
    withdrawal_service: web::Data<WithdrawalService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<ApproveWithdrawalRequest>,
) -> Result<HttpResponse> {
    let actor = match get_authenticated_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match withdrawal_service
        .approve(&actor, path.into_inner(), request.into_inner().admin_notes)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/withdrawals/{id}/reject",
    tag = "admin",
    request_body = RejectWithdrawalRequest,
    params(
        ("id" = i64, Path, description = "提现申请ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "提现驳回成功，预留额度已释放"),
        (status = 400, description = "驳回原因过短"),
        (status = 403, description = "角色不允许"),
        (status = 409, description = "状态不允许流转")
    )
)]
pub async fn reject_withdrawal(
    withdrawal_service: web::Data<WithdrawalService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<RejectWithdrawalRequest>,
) -> Result<HttpResponse> {
    let actor = match get_authenticated_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match withdrawal_service
        .reject(&actor, path.into_inner(), request.into_inner().reason)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/withdrawals/{id}/complete",
    tag = "admin",
    request_body = CompleteWithdrawalRequest,
    params(
        ("id" = i64, Path, description = "提现申请ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "提现完成，金额转入已提现"),
        (status = 400, description = "支付流水号无效"),
        (status = 403, description = "角色不允许"),
        (status = 409, description = "状态不允许流转")
    )
)]
pub async fn complete_withdrawal(
    withdrawal_service: web::Data<WithdrawalService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<CompleteWithdrawalRequest>,
) -> Result<HttpResponse> {
    let actor = match get_authenticated_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    let request = request.into_inner();
    match withdrawal_service
        .complete(
            &actor,
            path.into_inner(),
            request.transaction_id,
            request.admin_notes,
        )
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/audit-logs",
    tag = "admin",
    params(
        ("subject_type" = Option<String>, Query, description = "审计对象类型 (commission/withdrawal)"),
        ("subject_id" = Option<i64>, Query, description = "审计对象ID"),
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取审计日志成功"),
        (status = 403, description = "角色不允许")
    )
)]
pub async fn list_audit_logs(
    audit_service: web::Data<AuditService>,
    req: HttpRequest,
    query: web::Query<AuditLogQuery>,
) -> Result<HttpResponse> {
    let actor = match get_authenticated_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    if !actor.role.can_manage_ledger() {
        return Ok(AppError::Forbidden.error_response());
    }

    match audit_service.list(&query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/commissions", web::get().to(list_commissions))
            .route("/commissions/{id}/approve", web::post().to(approve_commission))
            .route("/commissions/{id}/reject", web::post().to(reject_commission))
            .route("/commissions/{id}/mark-paid", web::post().to(mark_commission_paid))
            .route("/withdrawals", web::get().to(list_withdrawals))
            .route("/withdrawals/{id}/approve", web::post().to(approve_withdrawal))
            .route("/withdrawals/{id}/reject", web::post().to(reject_withdrawal))
            .route("/withdrawals/{id}/complete", web::post().to(complete_withdrawal))
            .route("/audit-logs", web::get().to(list_audit_logs)),
    );
}
