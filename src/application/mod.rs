//! Application layer containing the session controller.
//!
//! [`bank::Bank`] is the primary entry point: it owns the session context and
//! runs every user action against the account store. Deferred loan credits
//! and the logout countdown run as `tokio` tasks tied to the session that
//! started them.

pub mod bank;
pub mod command;
pub mod dashboard;
pub mod session;
