use crate::application::command::Command;
use crate::error::{BankError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Login,
    Transfer,
    Loan,
    Close,
    Sort,
    Logout,
    Show,
}

/// One row of an action script: `action, user, pin, to, amount`.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct ActionRecord {
    pub action: ActionType,
    pub user: Option<String>,
    pub pin: Option<u32>,
    pub to: Option<String>,
    pub amount: Option<Decimal>,
}

fn required<T>(value: Option<T>, field: &str, action: &str) -> Result<T> {
    value.ok_or_else(|| BankError::ValidationError(format!("{action} requires `{field}`")))
}

impl TryFrom<ActionRecord> for Command {
    type Error = BankError;

    fn try_from(record: ActionRecord) -> Result<Self> {
        Ok(match record.action {
            ActionType::Login => Command::Login {
                username: required(record.user, "user", "login")?,
                pin: required(record.pin, "pin", "login")?,
            },
            ActionType::Transfer => Command::Transfer {
                to: required(record.to, "to", "transfer")?,
                amount: required(record.amount, "amount", "transfer")?,
            },
            ActionType::Loan => Command::Loan {
                amount: required(record.amount, "amount", "loan")?,
            },
            ActionType::Close => Command::Close {
                username: required(record.user, "user", "close")?,
                pin: required(record.pin, "pin", "close")?,
            },
            ActionType::Sort => Command::Sort,
            ActionType::Logout => Command::Logout,
            ActionType::Show => Command::Show,
        })
    }
}

/// Reads user actions from a CSV script.
///
/// Whitespace is trimmed and trailing columns may be omitted, so
/// `sort` is as valid a row as `login, js, 1111, , `.
pub struct ActionReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ActionReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily parses each row into a [`Command`].
    pub fn commands(self) -> impl Iterator<Item = Result<Command>> {
        self.reader.into_deserialize().map(|result| {
            let record: ActionRecord = result.map_err(BankError::from)?;
            Command::try_from(record)
        })
    }
}
