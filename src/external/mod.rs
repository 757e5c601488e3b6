pub mod notifications;

pub use notifications::{LedgerEvent, NotificationService};
