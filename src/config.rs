//! Runtime settings for the bank controller.
//!
//! The binary fills these from command line flags, each of which can also be
//! set through a `BANKIST_*` environment variable.

use std::time::Duration;

pub const DEFAULT_SESSION_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_LOAN_DELAY_MS: u64 = 2500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Inactivity period after which a session is ended.
    pub session_timeout: Duration,
    /// Resolution of the logout countdown.
    pub timer_tick: Duration,
    /// Time between a loan being accepted and being credited.
    pub loan_delay: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            session_timeout: Duration::from_secs(DEFAULT_SESSION_TIMEOUT_SECS),
            timer_tick: Duration::from_secs(1),
            loan_delay: Duration::from_millis(DEFAULT_LOAN_DELAY_MS),
        }
    }
}

impl Settings {
    pub fn with_session_timeout(mut self, timeout: Duration) -> Self {
        self.session_timeout = timeout;
        self
    }

    pub fn with_loan_delay(mut self, delay: Duration) -> Self {
        self.loan_delay = delay;
        self
    }

    /// Number of countdown ticks in a full session.
    pub fn timeout_ticks(&self) -> u64 {
        let tick = self.timer_tick.as_millis().max(1);
        (self.session_timeout.as_millis() / tick) as u64
    }
}
