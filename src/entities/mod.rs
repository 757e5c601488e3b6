pub mod audit_logs;
pub mod commissions;
pub mod promoter_accounts;
pub mod withdrawal_requests;

pub use audit_logs as audit_log_entity;
pub use commissions as commission_entity;
pub use promoter_accounts as promoter_account_entity;
pub use withdrawal_requests as withdrawal_request_entity;

pub use audit_logs::AuditSubjectType;
pub use commissions::CommissionStatus;
pub use withdrawal_requests::{PaymentMethod, WithdrawalStatus};
