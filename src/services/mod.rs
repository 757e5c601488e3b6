pub mod audit_service;
pub mod commission_service;
pub mod wallet_service;
pub mod withdrawal_service;

pub use audit_service::*;
pub use commission_service::*;
pub use wallet_service::*;
pub use withdrawal_service::*;
