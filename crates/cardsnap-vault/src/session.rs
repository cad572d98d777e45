//! Session state machine
//!
//! The pure authentication machine: PIN matching, failed-attempt
//! counting, and the self-destruct threshold. It decides transitions;
//! applying their effects (store selection, persistence, audit, the wipe
//! itself) is the controller's job.
//!
//! The real PIN is always checked before the duress PIN, so if a
//! misconfigured credential set holds equal pins the session resolves to
//! the real vault.

use cardsnap_core::MAX_FAILED_ATTEMPTS;

/// Which vault an unlocked session sees
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// The real, persisted vault
    Real,
    /// The fixed decoy fixture
    Duress,
}

/// Authentication state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No authenticated session; `by_timer` marks an auto-lock for the
    /// lock screen, not an authentication property
    Locked { by_timer: bool },
    /// Authenticated session in the given mode
    Unlocked { mode: SessionMode },
}

/// Result of a PIN submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockOutcome {
    /// Real PIN matched
    Real,
    /// Duress PIN matched
    Duress,
    /// A session was already active; the submission was ignored
    AlreadyUnlocked {
        /// Mode of the active session, unchanged
        mode: SessionMode,
    },
    /// No match
    Failed {
        /// Failed attempts including this one
        attempts: u32,
        /// Attempts left before the self-destruct threshold
        remaining: u32,
        /// The caller must perform a wipe now
        wipe_required: bool,
    },
}

/// Ephemeral per-boot session
#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
    failed_attempts: u32,
}

impl Session {
    /// Create a session in `Locked(false)` with a zero attempt count
    pub fn new() -> Self {
        Self {
            state: SessionState::Locked { by_timer: false },
            failed_attempts: 0,
        }
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Active mode, when unlocked
    pub fn mode(&self) -> Option<SessionMode> {
        match self.state {
            SessionState::Unlocked { mode } => Some(mode),
            SessionState::Locked { .. } => None,
        }
    }

    /// Whether an authenticated session is active
    pub fn is_unlocked(&self) -> bool {
        matches!(self.state, SessionState::Unlocked { .. })
    }

    /// Whether the last lock came from the auto-lock timer
    pub fn is_locked_by_timer(&self) -> bool {
        matches!(self.state, SessionState::Locked { by_timer: true })
    }

    /// Running failed-attempt count
    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    /// Evaluate a PIN submission against the credential set
    ///
    /// Only the lock screen authenticates: while a session is active any
    /// submission is ignored wholesale. It cannot swap the mode, count a
    /// failure, or reach the self-destruct threshold.
    pub fn submit_pin(
        &mut self,
        input: &str,
        real_pin: &str,
        duress_pin: &str,
        self_destruct_enabled: bool,
    ) -> UnlockOutcome {
        if let SessionState::Unlocked { mode } = self.state {
            return UnlockOutcome::AlreadyUnlocked { mode };
        }

        // Real match takes precedence over duress
        if input == real_pin {
            self.state = SessionState::Unlocked {
                mode: SessionMode::Real,
            };
            self.failed_attempts = 0;
            return UnlockOutcome::Real;
        }
        if input == duress_pin {
            self.state = SessionState::Unlocked {
                mode: SessionMode::Duress,
            };
            self.failed_attempts = 0;
            return UnlockOutcome::Duress;
        }

        self.failed_attempts += 1;
        let attempts = self.failed_attempts;
        let remaining = MAX_FAILED_ATTEMPTS.saturating_sub(attempts);
        UnlockOutcome::Failed {
            attempts,
            remaining,
            wipe_required: self_destruct_enabled && attempts >= MAX_FAILED_ATTEMPTS,
        }
    }

    /// Transition to locked; preserves the failed-attempt count
    pub fn lock(&mut self, by_timer: bool) {
        self.state = SessionState::Locked { by_timer };
    }

    /// Clear a stale timer-lock flag after new activity; does not
    /// re-authenticate
    pub fn clear_timer_flag(&mut self) {
        if let SessionState::Locked { by_timer: true } = self.state {
            self.state = SessionState::Locked { by_timer: false };
        }
    }

    /// Full reset: `Locked(false)`, count cleared (wipe path)
    pub fn reset(&mut self) {
        self.state = SessionState::Locked { by_timer: false };
        self.failed_attempts = 0;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REAL: &str = "1234";
    const DURESS: &str = "0000";

    fn submit(session: &mut Session, pin: &str) -> UnlockOutcome {
        session.submit_pin(pin, REAL, DURESS, true)
    }

    #[test]
    fn test_initial_state() {
        let session = Session::new();
        assert_eq!(session.state(), SessionState::Locked { by_timer: false });
        assert_eq!(session.failed_attempts(), 0);
        assert!(!session.is_unlocked());
    }

    #[test]
    fn test_real_pin_unlocks_real() {
        let mut session = Session::new();
        assert_eq!(submit(&mut session, REAL), UnlockOutcome::Real);
        assert_eq!(session.mode(), Some(SessionMode::Real));
    }

    #[test]
    fn test_duress_pin_unlocks_duress() {
        let mut session = Session::new();
        assert_eq!(submit(&mut session, DURESS), UnlockOutcome::Duress);
        assert_eq!(session.mode(), Some(SessionMode::Duress));
    }

    #[test]
    fn test_real_wins_tie_break() {
        // Misconfigured equal credentials must resolve to the real vault
        let mut session = Session::new();
        let outcome = session.submit_pin("1111", "1111", "1111", true);
        assert_eq!(outcome, UnlockOutcome::Real);
    }

    #[test]
    fn test_success_resets_count_from_any_prior() {
        for prior in 0..5u32 {
            let mut session = Session::new();
            for _ in 0..prior {
                // Self-destruct off so the 5th failure cannot demand a wipe
                session.submit_pin("9999", REAL, DURESS, false);
            }
            assert_eq!(session.failed_attempts(), prior);
            assert_eq!(submit(&mut session, REAL), UnlockOutcome::Real);
            assert_eq!(session.failed_attempts(), 0);
        }
    }

    #[test]
    fn test_failures_count_up_with_remaining() {
        let mut session = Session::new();
        for n in 1..=4u32 {
            let outcome = submit(&mut session, "9999");
            assert_eq!(
                outcome,
                UnlockOutcome::Failed {
                    attempts: n,
                    remaining: 5 - n,
                    wipe_required: false
                }
            );
        }
    }

    #[test]
    fn test_fifth_failure_demands_wipe() {
        let mut session = Session::new();
        for _ in 0..4 {
            submit(&mut session, "9999");
        }
        let outcome = submit(&mut session, "9999");
        assert_eq!(
            outcome,
            UnlockOutcome::Failed {
                attempts: 5,
                remaining: 0,
                wipe_required: true
            }
        );
    }

    #[test]
    fn test_fifth_failure_without_self_destruct_stays_locked() {
        let mut session = Session::new();
        for _ in 0..5 {
            let outcome = session.submit_pin("9999", REAL, DURESS, false);
            assert!(matches!(
                outcome,
                UnlockOutcome::Failed {
                    wipe_required: false,
                    ..
                }
            ));
        }
        assert_eq!(session.failed_attempts(), 5);
        assert!(!session.is_unlocked());
    }

    #[test]
    fn test_lock_preserves_count() {
        let mut session = Session::new();
        submit(&mut session, "9999");
        submit(&mut session, "9999");
        submit(&mut session, REAL);
        session.lock(false);
        // Explicit logout keeps the (reset) count; a later failure resumes
        // from there rather than from the pre-unlock tally
        assert_eq!(session.failed_attempts(), 0);
        submit(&mut session, "9999");
        assert_eq!(session.failed_attempts(), 1);
        assert_eq!(session.state(), SessionState::Locked { by_timer: false });
    }

    #[test]
    fn test_submissions_ignored_while_unlocked() {
        let mut session = Session::new();
        submit(&mut session, REAL);

        // Wrong pins against a live session never count or demand a wipe
        for _ in 0..6 {
            assert_eq!(
                submit(&mut session, "9999"),
                UnlockOutcome::AlreadyUnlocked {
                    mode: SessionMode::Real
                }
            );
        }
        assert_eq!(session.failed_attempts(), 0);

        // The duress pin cannot swap a real session to the decoy view
        assert_eq!(
            submit(&mut session, DURESS),
            UnlockOutcome::AlreadyUnlocked {
                mode: SessionMode::Real
            }
        );
        assert_eq!(session.mode(), Some(SessionMode::Real));
    }

    #[test]
    fn test_timer_flag_cleared_by_activity() {
        let mut session = Session::new();
        submit(&mut session, REAL);
        session.lock(true);
        assert!(session.is_locked_by_timer());
        session.clear_timer_flag();
        assert!(!session.is_locked_by_timer());
        assert!(!session.is_unlocked());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = Session::new();
        submit(&mut session, "9999");
        submit(&mut session, "9999");
        session.reset();
        assert_eq!(session.failed_attempts(), 0);
        assert_eq!(session.state(), SessionState::Locked { by_timer: false });
    }
}
