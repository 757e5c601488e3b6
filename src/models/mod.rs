pub mod audit;
pub mod auth;
pub mod commission;
pub mod common;
pub mod pagination;
pub mod wallet;
pub mod withdrawal;

pub use audit::*;
pub use auth::*;
pub use commission::*;
pub use common::*;
pub use pagination::*;
pub use wallet::*;
pub use withdrawal::*;
