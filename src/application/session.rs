use crate::config::Settings;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;

pub type SessionId = u64;

/// Handle the timer and loan tasks use to reach back into the controller.
pub(crate) type ContextRef = Weak<Mutex<SessionContext>>;

/// Inactivity countdown for one session.
///
/// Counts down one tick at a time and ends the session when it reaches
/// zero. Dropping the timer stops the countdown, which is how a reset works:
/// the old timer is replaced by a fresh one.
pub struct LogoutTimer {
    remaining: Arc<AtomicU64>,
    tick: Duration,
    handle: JoinHandle<()>,
}

impl LogoutTimer {
    pub(crate) fn start(context: ContextRef, session: SessionId, settings: &Settings) -> Self {
        let tick = settings.timer_tick;
        let remaining = Arc::new(AtomicU64::new(settings.timeout_ticks()));
        let counter = remaining.clone();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + tick, tick);
            while counter.load(Ordering::SeqCst) > 0 {
                interval.tick().await;
                counter.fetch_sub(1, Ordering::SeqCst);
            }

            let Some(context) = context.upgrade() else {
                return;
            };
            let mut context = context.lock().await;
            if context.is_current(session)
                && let Some(username) = context.end()
            {
                tracing::info!(%username, session, "session expired");
            }
        });

        Self {
            remaining,
            tick,
            handle,
        }
    }

    pub fn remaining(&self) -> Duration {
        let ticks = self.remaining.load(Ordering::SeqCst);
        let tick_ms = u64::try_from(self.tick.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(tick_ms.saturating_mul(ticks))
    }
}

impl Drop for LogoutTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// The period during which one account is logged in.
///
/// Owns the logout timer and every loan still waiting to be credited.
/// Dropping the session cancels all of them.
pub struct Session {
    id: SessionId,
    username: String,
    sorted: bool,
    timer: Option<LogoutTimer>,
    pending_loans: Vec<JoinHandle<()>>,
}

impl Session {
    fn new(id: SessionId, username: &str) -> Self {
        Self {
            id,
            username: username.to_string(),
            sorted: false,
            timer: None,
            pending_loans: Vec::new(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Flips the display order and returns the new state.
    pub fn toggle_sort(&mut self) -> bool {
        self.sorted = !self.sorted;
        self.sorted
    }

    /// Time left before the session expires, if the timer is running.
    pub fn remaining(&self) -> Option<Duration> {
        self.timer.as_ref().map(LogoutTimer::remaining)
    }

    pub fn pending_loans(&self) -> usize {
        self.pending_loans.iter().filter(|h| !h.is_finished()).count()
    }

    pub(crate) fn reset_timer(&mut self, context: ContextRef, settings: &Settings) {
        self.timer = Some(LogoutTimer::start(context, self.id, settings));
    }

    pub(crate) fn track_loan(&mut self, handle: JoinHandle<()>) {
        self.pending_loans.retain(|h| !h.is_finished());
        self.pending_loans.push(handle);
    }

    pub(crate) fn take_pending_loans(&mut self) -> Vec<JoinHandle<()>> {
        std::mem::take(&mut self.pending_loans)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        for handle in &self.pending_loans {
            handle.abort();
        }
    }
}

/// Which session, if any, is active.
///
/// There is at most one session at a time. Session ids are never reused, so a
/// task holding an old id can tell that its session is gone.
#[derive(Default)]
pub struct SessionContext {
    current: Option<Session>,
    last_id: SessionId,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub(crate) fn current_mut(&mut self) -> Option<&mut Session> {
        self.current.as_mut()
    }

    pub fn is_current(&self, id: SessionId) -> bool {
        self.current.as_ref().is_some_and(|s| s.id == id)
    }

    /// Ends any active session and starts a new one for `username`.
    pub(crate) fn begin(&mut self, username: &str) -> &mut Session {
        self.end();
        self.last_id += 1;
        self.current.insert(Session::new(self.last_id, username))
    }

    /// Ends the active session, returning whose it was.
    pub(crate) fn end(&mut self) -> Option<String> {
        self.current.take().map(|session| session.username.clone())
    }
}
