//! Login failure counter.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::LockoutSettings;

/// Consecutive failed authentications for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginFailures {
    pub user_id: Uuid,
    pub failure_count: i32,
    pub lockout_until: Option<DateTime<Utc>>,
}

impl LoginFailures {
    /// Counter with no failures recorded.
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            failure_count: 0,
            lockout_until: None,
        }
    }

    /// Locked while `now` is before the unlock timestamp.
    pub fn is_locked_out_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.lockout_until, Some(until) if now < until)
    }

    /// Count one more failure, locking the account once the threshold is hit.
    pub fn register_failure(&mut self, now: DateTime<Utc>, settings: &LockoutSettings) {
        self.failure_count += 1;
        if self.failure_count >= settings.max_attempts {
            self.lockout_until = Some(now + settings.period());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn settings() -> LockoutSettings {
        LockoutSettings {
            enabled: true,
            max_attempts: 3,
            period_secs: 900,
        }
    }

    #[test]
    fn test_counter_locks_at_threshold() {
        let now = Utc::now();
        let mut failures = LoginFailures::new(Uuid::new_v4());

        failures.register_failure(now, &settings());
        failures.register_failure(now, &settings());
        assert_eq!(failures.failure_count, 2);
        assert!(!failures.is_locked_out_at(now));

        failures.register_failure(now, &settings());
        assert_eq!(failures.failure_count, 3);
        assert!(failures.is_locked_out_at(now));
    }

    #[test]
    fn test_lockout_expires() {
        let now = Utc::now();
        let mut failures = LoginFailures::new(Uuid::new_v4());
        for _ in 0..3 {
            failures.register_failure(now, &settings());
        }

        assert!(failures.is_locked_out_at(now + Duration::seconds(899)));
        assert!(!failures.is_locked_out_at(now + Duration::seconds(900)));
    }
}
