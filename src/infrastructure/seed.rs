use crate::domain::account::{Account, AccountSeed};
use crate::domain::ports::AccountStore;
use crate::error::{BankError, Result};
use chrono::{DateTime, Utc};
use rust_decimal_macros::dec;
use std::collections::HashSet;
use std::io::Read;

fn parse_dates(dates: &[&str]) -> Result<Vec<DateTime<Utc>>> {
    dates
        .iter()
        .map(|date| {
            date.parse::<DateTime<Utc>>()
                .map_err(|e| BankError::InternalError(Box::new(e)))
        })
        .collect()
}

/// The two accounts the dashboard ships with.
pub fn demo_accounts() -> Result<Vec<AccountSeed>> {
    Ok(vec![
        AccountSeed {
            owner: "Jonas Schmedtmann".to_string(),
            movements: vec![
                dec!(200),
                dec!(455.23),
                dec!(-306.5),
                dec!(25000),
                dec!(-642.21),
                dec!(-133.9),
                dec!(79.97),
                dec!(1300),
            ],
            movements_dates: parse_dates(&[
                "2019-11-18T21:31:17.178Z",
                "2019-12-23T07:42:02.383Z",
                "2020-01-28T09:15:04.904Z",
                "2020-04-01T10:17:24.185Z",
                "2020-05-08T14:11:59.604Z",
                "2021-05-30T17:01:17.194Z",
                "2021-06-01T23:36:17.929Z",
                "2021-06-03T10:51:36.790Z",
            ])?,
            interest_rate: dec!(1.2),
            pin: 1111,
            currency: "EUR".to_string(),
            locale: "pt-PT".to_string(),
        },
        AccountSeed {
            owner: "Jessica Davis".to_string(),
            movements: vec![
                dec!(5000),
                dec!(3400),
                dec!(-150),
                dec!(-790),
                dec!(-3210),
                dec!(-1000),
                dec!(8500),
                dec!(-30),
            ],
            movements_dates: parse_dates(&[
                "2019-11-01T13:15:33.035Z",
                "2019-11-30T09:48:16.867Z",
                "2019-12-25T06:04:23.907Z",
                "2020-01-25T14:18:46.235Z",
                "2020-02-05T16:33:06.386Z",
                "2020-04-10T14:43:26.374Z",
                "2020-06-25T18:49:59.371Z",
                "2020-07-26T12:01:20.894Z",
            ])?,
            interest_rate: dec!(1.5),
            pin: 2222,
            currency: "USD".to_string(),
            locale: "en-US".to_string(),
        },
    ])
}

/// Reads a JSON array of account seeds.
pub fn read_seeds<R: Read>(source: R) -> Result<Vec<AccountSeed>> {
    Ok(serde_json::from_reader(source)?)
}

/// Converts seeds to accounts and stores them in order.
///
/// Fails without storing anything if two owners derive the same username.
pub async fn seed_store(store: &dyn AccountStore, seeds: Vec<AccountSeed>) -> Result<()> {
    let accounts = seeds
        .into_iter()
        .map(Account::try_from)
        .collect::<Result<Vec<_>>>()?;

    let mut usernames = HashSet::new();
    for account in &accounts {
        if !usernames.insert(account.username().to_string()) {
            return Err(BankError::DuplicateUsername(account.username().to_string()));
        }
    }

    for account in accounts {
        tracing::debug!(username = account.username(), "seeding account");
        store.store(account).await?;
    }
    Ok(())
}
