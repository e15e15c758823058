use crate::domain::account::Account;
use crate::domain::ports::AccountStore;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory account store.
///
/// Accounts are kept in a `Vec` so listing preserves insertion order, the
/// same order the accounts were seeded in. Lookups are linear, which is fine
/// for a handful of demo accounts.
#[derive(Default, Clone)]
pub struct InMemoryAccountStore {
    accounts: Arc<RwLock<Vec<Account>>>,
}

impl InMemoryAccountStore {
    /// Creates a new, empty in-memory account store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn store(&self, account: Account) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        match accounts
            .iter_mut()
            .find(|a| a.username() == account.username())
        {
            Some(existing) => *existing = account,
            None => accounts.push(account),
        }
        Ok(())
    }

    async fn get(&self, username: &str) -> Result<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().find(|a| a.username() == username).cloned())
    }

    async fn remove(&self, username: &str) -> Result<Option<Account>> {
        let mut accounts = self.accounts.write().await;
        let index = accounts.iter().position(|a| a.username() == username);
        Ok(index.map(|index| accounts.remove(index)))
    }

    async fn all_accounts(&self) -> Result<Vec<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.clone())
    }
}
