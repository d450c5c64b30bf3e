//! Login-attempt accounting and account lockout.
//!
//! The policy never touches the database. Handlers load an [`AccountState`],
//! ask the policy for a [`LoginOutcome`], then persist `state.apply(outcome)`.

use chrono::{Duration, NaiveDateTime};

#[derive(Debug, Clone, Copy)]
pub struct LockoutPolicy {
    pub max_failed_attempts: u32,
    /// Accounts idle for longer than this are blocked on their next login.
    pub inactivity_period: Duration,
}

impl LockoutPolicy {
    pub fn new(max_failed_attempts: u32, inactivity_period: Duration) -> Self {
        Self {
            max_failed_attempts,
            inactivity_period,
        }
    }
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self::new(3, Duration::days(30))
    }
}

/// The lockout-relevant columns of a user row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountState {
    pub blocked: bool,
    pub failed_attempts: u32,
    pub last_login: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Block flag was already set; nothing changes.
    AlreadyBlocked,
    /// Idle past the inactivity period; the account gets blocked now.
    BlockedForInactivity,
    /// Wrong password, still under the limit.
    WrongPassword { failed_attempts: u32 },
    /// Wrong password that hit the limit; blocked and counter reset.
    LockedOut,
    Success,
}

impl LoginOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, LoginOutcome::Success)
    }

    /// Whether the caller should be told the account is blocked.
    pub fn is_blocked(self) -> bool {
        matches!(
            self,
            LoginOutcome::AlreadyBlocked | LoginOutcome::BlockedForInactivity | LoginOutcome::LockedOut
        )
    }
}

impl LockoutPolicy {
    /// Decide the result of a login attempt.
    ///
    /// `password_matches` is only called when the account is neither blocked
    /// nor expired, so blocked accounts never pay for a hash verification.
    pub fn evaluate(
        &self,
        state: &AccountState,
        now: NaiveDateTime,
        password_matches: impl FnOnce() -> bool,
    ) -> LoginOutcome {
        if state.blocked {
            return LoginOutcome::AlreadyBlocked;
        }

        if let Some(last_login) = state.last_login {
            if now - last_login > self.inactivity_period {
                return LoginOutcome::BlockedForInactivity;
            }
        }

        if !password_matches() {
            let failed_attempts = state.failed_attempts.saturating_add(1);
            if failed_attempts >= self.max_failed_attempts {
                return LoginOutcome::LockedOut;
            }
            return LoginOutcome::WrongPassword { failed_attempts };
        }

        LoginOutcome::Success
    }
}

impl AccountState {
    /// State to persist after `outcome`. `None` when nothing changes.
    pub fn apply(&self, outcome: LoginOutcome, now: NaiveDateTime) -> Option<AccountState> {
        match outcome {
            LoginOutcome::AlreadyBlocked => None,
            LoginOutcome::BlockedForInactivity => Some(AccountState {
                blocked: true,
                ..*self
            }),
            LoginOutcome::WrongPassword { failed_attempts } => Some(AccountState {
                failed_attempts,
                ..*self
            }),
            LoginOutcome::LockedOut => Some(AccountState {
                blocked: true,
                failed_attempts: 0,
                ..*self
            }),
            LoginOutcome::Success => Some(AccountState {
                blocked: false,
                failed_attempts: 0,
                last_login: Some(now),
            }),
        }
    }
}
