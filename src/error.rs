use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BankError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Invalid username or PIN")]
    InvalidCredentials,
    #[error("No active session")]
    NoActiveSession,
    #[error("Amount must be positive")]
    InvalidAmount,
    #[error("Unknown recipient: {0}")]
    UnknownRecipient(String),
    #[error("Cannot transfer to the same account")]
    SelfTransfer,
    #[error("Insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds { balance: Decimal, requested: Decimal },
    #[error("Loan of {0} requires a deposit of at least 10% of the amount")]
    LoanNotEligible(Decimal),
    #[error("Movement of {0} would overflow the account totals")]
    TotalsOverflow(Decimal),
    #[error("Duplicate username: {0}")]
    DuplicateUsername(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, BankError>;
