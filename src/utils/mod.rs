pub mod jwt;
pub mod money;

pub use jwt::*;
pub use money::{commission_amount_cents, format_cents};
