use super::account::Account;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Storage for the active set of accounts, keyed by username.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Inserts the account, replacing any account with the same username.
    async fn store(&self, account: Account) -> Result<()>;
    async fn get(&self, username: &str) -> Result<Option<Account>>;
    async fn remove(&self, username: &str) -> Result<Option<Account>>;
    /// All accounts in insertion order.
    async fn all_accounts(&self) -> Result<Vec<Account>>;
}

pub type AccountStoreRef = Arc<dyn AccountStore>;
