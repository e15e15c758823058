use crate::domain::account::Account;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

/// Derived figures for one account, as written to the summary CSV.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct AccountSummary {
    pub username: String,
    pub owner: String,
    pub balance: Decimal,
    pub income: Decimal,
    /// Absolute value of all withdrawals.
    pub expenses: Decimal,
    pub interest: Decimal,
    pub movements: usize,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        let ledger = &account.ledger;
        Self {
            username: account.username().to_string(),
            owner: account.owner.clone(),
            balance: ledger.balance().normalize(),
            income: ledger.total_income().normalize(),
            expenses: ledger.total_expenses().abs().normalize(),
            interest: account.total_interest().normalize(),
            movements: ledger.len(),
        }
    }
}

pub struct SummaryWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> SummaryWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_accounts<'a, I>(&mut self, accounts: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Account>,
    {
        for account in accounts {
            self.writer.serialize(AccountSummary::from(account))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
