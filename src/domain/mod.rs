//! Accounts, their ledgers, and the storage port the application layer
//! depends on.

pub mod account;
pub mod ledger;
pub mod ports;
