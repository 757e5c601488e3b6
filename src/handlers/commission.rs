use crate::error::AppError;
use crate::models::*;
use crate::services::CommissionService;
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
    path = "/commissions",
    tag = "commission",
    params(
        ("status" = Option<String>, Query, description = "状态过滤 (pending/approved/rejected/paid)"),
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取佣金列表成功"),
        (status = 401, description = "未授权")
    )
)]
pub async fn get_commissions(
    commission_service: web::Data<CommissionService>,
    req: HttpRequest,
    query: web::Query<CommissionQuery>,
) -> Result<HttpResponse> {
    let user = match get_authenticated_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match commission_service
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

pub fn commission_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/commissions").route("", web::get().to(get_commissions)));
}
