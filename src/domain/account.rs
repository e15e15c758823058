use super::ledger::Ledger;
use crate::error::{BankError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A strictly positive monetary amount requested by a user.
///
/// Movements themselves are signed; this type guards the inputs of
/// transfers and loans before they turn into movements.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(BankError::InvalidAmount)
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

/// Lowercased initials of every word in `owner`.
///
/// "Jonas Schmedtmann" becomes "js".
pub fn derive_username(owner: &str) -> String {
    owner
        .to_lowercase()
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .collect()
}

/// A bank customer and their movement history.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub owner: String,
    username: String,
    pub pin: u32,
    pub ledger: Ledger,
    /// Yearly interest in percent, e.g. `1.2` for 1.2%.
    pub interest_rate: Decimal,
    pub currency: String,
    pub locale: String,
}

impl Account {
    pub fn new(
        owner: impl Into<String>,
        pin: u32,
        interest_rate: Decimal,
        currency: impl Into<String>,
        locale: impl Into<String>,
    ) -> Self {
        let owner = owner.into();
        Self {
            username: derive_username(&owner),
            owner,
            pin,
            ledger: Ledger::new(),
            interest_rate,
            currency: currency.into(),
            locale: locale.into(),
        }
    }

    pub fn with_ledger(mut self, ledger: Ledger) -> Self {
        self.ledger = ledger;
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn first_name(&self) -> &str {
        self.owner.split_whitespace().next().unwrap_or_default()
    }

    pub fn pin_matches(&self, pin: u32) -> bool {
        self.pin == pin
    }

    pub fn balance(&self) -> Decimal {
        self.ledger.balance()
    }

    pub fn total_interest(&self) -> Decimal {
        self.ledger.total_interest(self.interest_rate)
    }

    /// Fails if recording `amount` would overflow a summary of this account.
    pub fn check_movement(&self, amount: Decimal) -> Result<()> {
        self.ledger.check_append(amount, self.interest_rate)
    }

    /// Appends a movement once [`Account::check_movement`] accepts it.
    pub fn record(&mut self, amount: Decimal, date: DateTime<Utc>) -> Result<()> {
        self.ledger.try_append(amount, date, self.interest_rate)
    }

    /// True if any single movement reaches a tenth of `loan`.
    pub fn qualifies_for_loan(&self, loan: Decimal) -> bool {
        let required = loan / Decimal::TEN;
        self.ledger.movements().iter().any(|m| *m >= required)
    }
}

/// Account data as it appears in seed files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountSeed {
    pub owner: String,
    pub movements: Vec<Decimal>,
    pub movements_dates: Vec<DateTime<Utc>>,
    pub interest_rate: Decimal,
    pub pin: u32,
    pub currency: String,
    pub locale: String,
}

impl TryFrom<AccountSeed> for Account {
    type Error = BankError;

    fn try_from(seed: AccountSeed) -> Result<Self> {
        let ledger = Ledger::from_parts(seed.movements, seed.movements_dates)?;
        if !ledger.totals_fit(seed.interest_rate) {
            return Err(BankError::ValidationError(format!(
                "movements of {} overflow the account totals",
                seed.owner
            )));
        }
        Ok(
            Account::new(seed.owner, seed.pin, seed.interest_rate, seed.currency, seed.locale)
                .with_ledger(ledger),
        )
    }
}
