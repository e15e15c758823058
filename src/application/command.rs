use super::bank::Bank;
use super::dashboard::Dashboard;
use crate::domain::account::{Account, Amount};
use crate::error::Result;
use rust_decimal::Decimal;

/// A user-triggered action.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login { username: String, pin: u32 },
    Transfer { to: String, amount: Decimal },
    Loan { amount: Decimal },
    Close { username: String, pin: u32 },
    Sort,
    Logout,
    Show,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Login { .. } => "login",
            Command::Transfer { .. } => "transfer",
            Command::Loan { .. } => "loan",
            Command::Close { .. } => "close",
            Command::Sort => "sort",
            Command::Logout => "logout",
            Command::Show => "show",
        }
    }
}

#[derive(Debug)]
pub enum Outcome {
    Dashboard(Box<Dashboard>),
    LoanScheduled(Amount),
    Closed(Box<Account>),
    LoggedOut,
}

impl Bank {
    /// Runs one command against the bank.
    ///
    /// A rejected command changes nothing; the error says why it was
    /// rejected.
    pub async fn execute(&self, command: Command) -> Result<Outcome> {
        let name = command.name();
        let result = match command {
            Command::Login { username, pin } => self
                .login(&username, pin)
                .await
                .map(|d| Outcome::Dashboard(Box::new(d))),
            Command::Transfer { to, amount } => self
                .transfer(&to, amount)
                .await
                .map(|d| Outcome::Dashboard(Box::new(d))),
            Command::Loan { amount } => self.request_loan(amount).await.map(Outcome::LoanScheduled),
            Command::Close { username, pin } => self
                .close_account(&username, pin)
                .await
                .map(|a| Outcome::Closed(Box::new(a))),
            Command::Sort => self
                .toggle_sort()
                .await
                .map(|d| Outcome::Dashboard(Box::new(d))),
            Command::Logout => self.logout().await.map(|_| Outcome::LoggedOut),
            Command::Show => self
                .dashboard()
                .await
                .map(|d| Outcome::Dashboard(Box::new(d))),
        };

        if let Err(e) = &result {
            tracing::warn!(command = name, error = %e, "command rejected");
        }
        result
    }
}
