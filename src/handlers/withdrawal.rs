use crate::error::AppError;
use crate::models::*;
use crate::services::WithdrawalService;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

fn get_authenticated_user(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
    req.extensions()
        .get::<AuthenticatedUser>()
        .copied()
        .ok_or_else(|| AppError::AuthError("Missing authentication context".to_string()))
}

#[utoipa::path(
    post,
    path = "/withdrawals",
    tag = "withdrawal",
    request_body = CreateWithdrawalRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "提现申请创建成功", body = WithdrawalResponse),
        (status = 400, description = "参数错误或余额不足"),
        (status = 401, description = "未授权"),
        (status = 409, description = "并发冲突，请重试")
    )
)]
pub async fn request_withdrawal(
    withdrawal_service: web::Data<WithdrawalService>,
    req: HttpRequest,
    request: web::Json<CreateWithdrawalRequest>,
) -> Result<HttpResponse> {
    let user = match get_authenticated_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match withdrawal_service
        .request_withdrawal(user.user_id, request.into_inner())
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
    path = "/withdrawals",
    tag = "withdrawal",
    params(
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取提现历史成功"),
        (status = 401, description = "未授权")
    )
)]
pub async fn get_withdrawals(
    withdrawal_service: web::Data<WithdrawalService>,
    req: HttpRequest,
    query: web::Query<WithdrawalQuery>,
) -> Result<HttpResponse> {
    let user = match get_authenticated_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match withdrawal_service
        .list_by_promoter(user.user_id, &query)
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
    path = "/withdrawals/stats",
    tag = "withdrawal",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取提现统计成功", body = WithdrawalStatsResponse),
        (status = 401, description = "未授权")
    )
)]
pub async fn get_withdrawal_stats(
    withdrawal_service: web::Data<WithdrawalService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user = match get_authenticated_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match withdrawal_service.stats(user.user_id).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn withdrawal_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/withdrawals")
            .route("", web::post().to(request_withdrawal))
            .route("", web::get().to(get_withdrawals))
            .route("/stats", web::get().to(get_withdrawal_stats)),
    );
}
