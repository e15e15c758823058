#![allow(dead_code)]

use bankist::application::bank::Bank;
use bankist::config::Settings;
use bankist::domain::account::AccountSeed;
use bankist::infrastructure::in_memory::InMemoryAccountStore;
use bankist::infrastructure::seed::{demo_accounts, seed_store};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;

pub async fn demo_bank(settings: Settings) -> Bank {
    bank_with(demo_accounts().unwrap(), settings).await
}

pub async fn bank_with(seeds: Vec<AccountSeed>, settings: Settings) -> Bank {
    let store = InMemoryAccountStore::new();
    seed_store(&store, seeds).await.unwrap();
    Bank::new(Arc::new(store), settings)
}

pub fn seed(owner: &str, pin: u32, movements: &[Decimal]) -> AccountSeed {
    let date: DateTime<Utc> = "2020-01-01T10:00:00Z".parse().unwrap();
    AccountSeed {
        owner: owner.to_string(),
        movements: movements.to_vec(),
        movements_dates: vec![date; movements.len()],
        interest_rate: Decimal::ONE,
        pin,
        currency: "EUR".to_string(),
        locale: "de-DE".to_string(),
    }
}

pub async fn balance_of(bank: &Bank, username: &str) -> Decimal {
    bank.accounts()
        .await
        .unwrap()
        .iter()
        .find(|a| a.username() == username)
        .unwrap()
        .balance()
}

pub async fn movements_of(bank: &Bank, username: &str) -> Vec<Decimal> {
    bank.accounts()
        .await
        .unwrap()
        .iter()
        .find(|a| a.username() == username)
        .unwrap()
        .ledger
        .movements()
        .to_vec()
}
