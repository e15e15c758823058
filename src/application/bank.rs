use super::dashboard::Dashboard;
use super::session::{ContextRef, SessionContext, SessionId};
use crate::config::Settings;
use crate::domain::account::{Account, Amount};
use crate::domain::ports::AccountStoreRef;
use crate::error::{BankError, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// The single controller behind every user action.
///
/// `Bank` owns the session context explicitly instead of keeping the active
/// account in shared globals. Each action locks that context for its whole
/// duration, and so do the deferred loan credit and the logout timer, so no
/// two of them ever interleave.
pub struct Bank {
    store: AccountStoreRef,
    context: Arc<Mutex<SessionContext>>,
    settings: Settings,
}

impl Bank {
    /// Creates a new `Bank` over an already seeded store.
    pub fn new(store: AccountStoreRef, settings: Settings) -> Self {
        Self {
            store,
            context: Arc::new(Mutex::new(SessionContext::new())),
            settings,
        }
    }

    fn context_ref(&self) -> ContextRef {
        Arc::downgrade(&self.context)
    }

    async fn active_account(&self, context: &SessionContext) -> Result<Account> {
        let session = context.current().ok_or(BankError::NoActiveSession)?;
        self.store
            .get(session.username())
            .await?
            .ok_or(BankError::NoActiveSession)
    }

    /// Starts a session for `username` if the PIN matches.
    ///
    /// Any previous session ends first, cancelling its pending loans. A failed
    /// login leaves the current session untouched.
    pub async fn login(&self, username: &str, pin: u32) -> Result<Dashboard> {
        let mut context = self.context.lock().await;
        let account = match self.store.get(username).await? {
            Some(account) if account.pin_matches(pin) => account,
            _ => return Err(BankError::InvalidCredentials),
        };

        let session = context.begin(account.username());
        session.reset_timer(self.context_ref(), &self.settings);
        tracing::info!(username, session = session.id(), "logged in");
        Ok(Dashboard::build(&account, session))
    }

    /// Moves `amount` from the active account to `recipient`.
    pub async fn transfer(&self, recipient: &str, amount: Decimal) -> Result<Dashboard> {
        let mut context = self.context.lock().await;
        let mut sender = self.active_account(&context).await?;
        let amount = Amount::new(amount)?;
        let mut receiver = self
            .store
            .get(recipient)
            .await?
            .ok_or_else(|| BankError::UnknownRecipient(recipient.to_string()))?;

        if receiver.username() == sender.username() {
            return Err(BankError::SelfTransfer);
        }
        let balance = sender.balance();
        if balance < amount.value() {
            return Err(BankError::InsufficientFunds {
                balance,
                requested: amount.value(),
            });
        }

        let now = Utc::now();
        sender.record(-amount.value(), now)?;
        receiver.record(amount.value(), now)?;
        self.store.store(receiver).await?;
        self.store.store(sender.clone()).await?;

        let session = context.current_mut().ok_or(BankError::NoActiveSession)?;
        session.reset_timer(self.context_ref(), &self.settings);
        tracing::info!(
            from = sender.username(),
            to = recipient,
            amount = %amount.value(),
            "transfer completed"
        );
        Ok(Dashboard::build(&sender, session))
    }

    /// Accepts a loan and schedules its credit after the configured delay.
    ///
    /// The requested amount is floored to whole units. A loan is granted only
    /// if some single movement is at least a tenth of it. The returned amount
    /// is what will be credited once the delay has passed, provided the
    /// session is still active then.
    pub async fn request_loan(&self, amount: Decimal) -> Result<Amount> {
        let mut context = self.context.lock().await;
        let account = self.active_account(&context).await?;
        let loan = Amount::new(amount.floor())?;
        if !account.qualifies_for_loan(loan.value()) {
            return Err(BankError::LoanNotEligible(loan.value()));
        }
        account.check_movement(loan.value())?;

        let session = context.current_mut().ok_or(BankError::NoActiveSession)?;
        let handle = tokio::spawn(credit_loan(
            self.store.clone(),
            self.context_ref(),
            session.id(),
            loan,
            self.settings.clone(),
        ));
        session.track_loan(handle);
        tracing::info!(
            username = account.username(),
            amount = %loan.value(),
            delay_ms = self.settings.loan_delay.as_millis() as u64,
            "loan approved"
        );
        Ok(loan)
    }

    /// Removes the active account if `username` and `pin` confirm it.
    pub async fn close_account(&self, username: &str, pin: u32) -> Result<Account> {
        let mut context = self.context.lock().await;
        let account = self.active_account(&context).await?;
        if account.username() != username || !account.pin_matches(pin) {
            return Err(BankError::InvalidCredentials);
        }

        let removed = self
            .store
            .remove(username)
            .await?
            .ok_or(BankError::NoActiveSession)?;
        context.end();
        tracing::info!(username, "account closed");
        Ok(removed)
    }

    /// Switches the movement list between stored and ascending order.
    pub async fn toggle_sort(&self) -> Result<Dashboard> {
        let mut context = self.context.lock().await;
        let account = self.active_account(&context).await?;
        let session = context.current_mut().ok_or(BankError::NoActiveSession)?;
        let sorted = session.toggle_sort();
        tracing::debug!(username = account.username(), sorted, "sort toggled");
        Ok(Dashboard::build(&account, session))
    }

    pub async fn logout(&self) -> Result<()> {
        let mut context = self.context.lock().await;
        let username = context.end().ok_or(BankError::NoActiveSession)?;
        tracing::info!(%username, "logged out");
        Ok(())
    }

    /// The current view of the active account.
    pub async fn dashboard(&self) -> Result<Dashboard> {
        let context = self.context.lock().await;
        let account = self.active_account(&context).await?;
        let session = context.current().ok_or(BankError::NoActiveSession)?;
        Ok(Dashboard::build(&account, session))
    }

    pub async fn active_username(&self) -> Option<String> {
        let context = self.context.lock().await;
        context.current().map(|s| s.username().to_string())
    }

    pub async fn remaining_time(&self) -> Option<Duration> {
        let context = self.context.lock().await;
        context.current().and_then(|s| s.remaining())
    }

    /// Waits until every loan of the active session has landed.
    pub async fn settle(&self) {
        let handles = {
            let mut context = self.context.lock().await;
            match context.current_mut() {
                Some(session) => session.take_pending_loans(),
                None => return,
            }
        };
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::debug!(error = %e, "pending loan did not complete");
            }
        }
    }

    /// All open accounts, in the order they were created.
    pub async fn accounts(&self) -> Result<Vec<Account>> {
        self.store.all_accounts().await
    }
}

async fn credit_loan(
    store: AccountStoreRef,
    context: ContextRef,
    session_id: SessionId,
    loan: Amount,
    settings: Settings,
) {
    tokio::time::sleep(settings.loan_delay).await;

    let Some(shared) = context.upgrade() else {
        return;
    };
    let mut guard = shared.lock().await;
    let Some(session) = guard.current_mut().filter(|s| s.id() == session_id) else {
        tracing::info!(session = session_id, amount = %loan.value(), "session ended, loan discarded");
        return;
    };

    let mut account = match store.get(session.username()).await {
        Ok(Some(account)) => account,
        Ok(None) => {
            tracing::warn!(username = session.username(), "account vanished before loan credit");
            return;
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to load account for loan credit");
            return;
        }
    };

    // Earlier credits of the same session may have used up the headroom
    if let Err(e) = account.record(loan.value(), Utc::now()) {
        tracing::warn!(username = session.username(), error = %e, "loan discarded");
        return;
    }
    if let Err(e) = store.store(account).await {
        tracing::error!(error = %e, "failed to store loan credit");
        return;
    }
    session.reset_timer(context, &settings);
    tracing::info!(username = session.username(), amount = %loan.value(), "loan credited");
}
