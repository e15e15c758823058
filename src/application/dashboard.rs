use super::session::Session;
use crate::domain::account::Account;
use crate::domain::ledger::Entry;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementKind {
    Deposit,
    Withdrawal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MovementRow {
    /// One-based position of the movement in the stored ledger.
    pub number: usize,
    pub kind: MovementKind,
    pub date: DateTime<Utc>,
    pub amount: Decimal,
}

impl From<Entry> for MovementRow {
    fn from(entry: Entry) -> Self {
        Self {
            number: entry.index + 1,
            kind: if entry.amount > Decimal::ZERO {
                MovementKind::Deposit
            } else {
                MovementKind::Withdrawal
            },
            date: entry.date,
            amount: entry.amount,
        }
    }
}

/// Everything the logged-in view shows, derived fresh from the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub username: String,
    pub welcome: String,
    pub balance: Decimal,
    pub income: Decimal,
    /// Absolute value of the withdrawals.
    pub expenses: Decimal,
    pub interest: Decimal,
    pub rows: Vec<MovementRow>,
    pub sorted: bool,
    pub currency: String,
    pub locale: String,
    pub remaining: Option<Duration>,
}

impl Dashboard {
    pub fn build(account: &Account, session: &Session) -> Self {
        let ledger = &account.ledger;
        let rows = if session.is_sorted() {
            ledger
                .sorted_entries()
                .into_iter()
                .map(MovementRow::from)
                .collect()
        } else {
            ledger.entries().map(MovementRow::from).collect()
        };

        Self {
            username: account.username().to_string(),
            welcome: format!("Welcome back, {}", account.first_name()),
            balance: ledger.balance(),
            income: ledger.total_income(),
            expenses: ledger.total_expenses().abs(),
            interest: account.total_interest(),
            rows,
            sorted: session.is_sorted(),
            currency: account.currency.clone(),
            locale: account.locale.clone(),
            remaining: session.remaining(),
        }
    }
}
