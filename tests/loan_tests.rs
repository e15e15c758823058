mod common;

use bankist::config::Settings;
use bankist::error::BankError;
use common::{bank_with, demo_bank, movements_of, seed};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_loan_requires_a_large_enough_deposit() {
    let bank = bank_with(
        vec![seed("Anna Berg", 1, &[dec!(99), dec!(-20)])],
        Settings::default(),
    )
    .await;
    bank.login("ab", 1).await.unwrap();

    let result = bank.request_loan(dec!(1000)).await;
    assert!(matches!(result, Err(BankError::LoanNotEligible(a)) if a == dec!(1000)));

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(movements_of(&bank, "ab").await, vec![dec!(99), dec!(-20)]);
}

#[tokio::test(start_paused = true)]
async fn test_loan_is_credited_after_delay() {
    let bank = bank_with(
        vec![seed("Anna Berg", 1, &[dec!(100)])],
        Settings::default(),
    )
    .await;
    bank.login("ab", 1).await.unwrap();

    let granted = bank.request_loan(dec!(1000)).await.unwrap();
    assert_eq!(granted.value(), dec!(1000));

    tokio::time::sleep(Duration::from_millis(2000)).await;
    assert_eq!(movements_of(&bank, "ab").await, vec![dec!(100)]);

    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert_eq!(movements_of(&bank, "ab").await, vec![dec!(100), dec!(1000)]);

    let accounts = bank.accounts().await.unwrap();
    assert_eq!(accounts[0].ledger.dates().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_loan_amount_is_floored() {
    let bank = demo_bank(Settings::default()).await;
    bank.login("jd", 2222).await.unwrap();

    let granted = bank.request_loan(dec!(250.99)).await.unwrap();
    assert_eq!(granted.value(), dec!(250));

    assert!(matches!(
        bank.request_loan(dec!(0.5)).await,
        Err(BankError::InvalidAmount)
    ));

    bank.settle().await;
    assert_eq!(*movements_of(&bank, "jd").await.last().unwrap(), dec!(250));
}

#[tokio::test(start_paused = true)]
async fn test_loan_does_not_block_other_actions() {
    let bank = demo_bank(Settings::default()).await;
    bank.login("js", 1111).await.unwrap();
    bank.request_loan(dec!(5000)).await.unwrap();

    // Other actions go through while the loan is pending
    bank.transfer("jd", dec!(10)).await.unwrap();
    bank.toggle_sort().await.unwrap();

    bank.settle().await;
    let movements = movements_of(&bank, "js").await;
    assert_eq!(&movements[8..], &[dec!(-10), dec!(5000)]);
}

#[tokio::test(start_paused = true)]
async fn test_pending_loan_is_cancelled_by_logout() {
    let bank = demo_bank(Settings::default()).await;
    bank.login("js", 1111).await.unwrap();
    bank.request_loan(dec!(1000)).await.unwrap();
    bank.logout().await.unwrap();

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(movements_of(&bank, "js").await.len(), 8);
}

#[tokio::test(start_paused = true)]
async fn test_pending_loan_is_cancelled_by_new_login() {
    let bank = demo_bank(Settings::default()).await;
    bank.login("js", 1111).await.unwrap();
    bank.request_loan(dec!(1000)).await.unwrap();

    // Same user logging in again starts a fresh session
    bank.login("js", 1111).await.unwrap();

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(movements_of(&bank, "js").await.len(), 8);
}

#[tokio::test(start_paused = true)]
async fn test_pending_loan_is_cancelled_by_account_closure() {
    let bank = demo_bank(Settings::default()).await;
    bank.login("jd", 2222).await.unwrap();
    bank.request_loan(dec!(1000)).await.unwrap();
    bank.close_account("jd", 2222).await.unwrap();

    tokio::time::sleep(Duration::from_secs(5)).await;
    let accounts = bank.accounts().await.unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].username(), "js");
}

#[tokio::test(start_paused = true)]
async fn test_pending_loan_is_cancelled_by_expiry() {
    let settings = Settings::default()
        .with_session_timeout(Duration::from_secs(2))
        .with_loan_delay(Duration::from_secs(5));
    let bank = demo_bank(settings).await;
    bank.login("js", 1111).await.unwrap();
    bank.request_loan(dec!(1000)).await.unwrap();

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(bank.active_username().await.is_none());
    assert_eq!(movements_of(&bank, "js").await.len(), 8);
}

#[tokio::test(start_paused = true)]
async fn test_loan_that_would_overflow_totals_is_rejected() {
    let large = Decimal::MAX * dec!(0.6);
    let bank = bank_with(vec![seed("Anna Berg", 1, &[large])], Settings::default()).await;
    bank.login("ab", 1).await.unwrap();

    let result = bank.request_loan(Decimal::MAX).await;
    assert!(matches!(result, Err(BankError::TotalsOverflow(_))));

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(movements_of(&bank, "ab").await, vec![large]);
    assert_eq!(bank.active_username().await.as_deref(), Some("ab"));
}

#[tokio::test(start_paused = true)]
async fn test_loan_credit_that_no_longer_fits_is_discarded() {
    let large = Decimal::MAX * dec!(0.6);
    let loan = (Decimal::MAX * dec!(0.3)).floor();
    let bank = bank_with(vec![seed("Anna Berg", 1, &[large])], Settings::default()).await;
    bank.login("ab", 1).await.unwrap();

    // Each fits on its own, both together do not
    bank.request_loan(loan).await.unwrap();
    bank.request_loan(loan).await.unwrap();

    bank.settle().await;
    assert_eq!(movements_of(&bank, "ab").await, vec![large, loan]);
    assert!(bank.dashboard().await.is_ok());
}
