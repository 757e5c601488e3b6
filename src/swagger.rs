use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{AuditSubjectType, CommissionStatus, PaymentMethod, WithdrawalStatus};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::wallet::get_wallet,
        handlers::commission::get_commissions,
        handlers::withdrawal::request_withdrawal,
        handlers::withdrawal::get_withdrawals,
        handlers::withdrawal::get_withdrawal_stats,
        handlers::admin::list_commissions,
        handlers::admin::approve_commission,
        handlers::admin::reject_commission,
        handlers::admin::mark_commission_paid,
        handlers::admin::list_withdrawals,
        handlers::admin::approve_withdrawal,
        handlers::admin::reject_withdrawal,
        handlers::admin::complete_withdrawal,
        handlers::admin::list_audit_logs,
    ),
    components(
        schemas(
            WalletResponse,
            WithdrawalStatsResponse,
            CommissionResponse,
            CommissionStatus,
            OrderCompletedEvent,
            CommissionReviewRequest,
            MarkCommissionPaidRequest,
            CreateWithdrawalRequest,
            WithdrawalResponse,
            WithdrawalStatus,
            PaymentMethod,
            ApproveWithdrawalRequest,
            RejectWithdrawalRequest,
            CompleteWithdrawalRequest,
            AuditLogResponse,
            AuditSubjectType,
            UserRole,
            ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "wallet", description = "Promoter wallet API"),
        (name = "commission", description = "Commission ledger API"),
        (name = "withdrawal", description = "Withdrawal request API"),
        (name = "admin", description = "Admin approval API"),
    ),
    info(
        title = "BuyV Affiliate Ledger API",
        version = "1.0.0",
        description = "Affiliate commission & withdrawal ledger REST API documentation",
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
