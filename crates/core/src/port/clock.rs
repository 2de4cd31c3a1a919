// Clock Port (for testability)

use chrono::{DateTime, Utc};

/// Wall-clock interface (allows fixed time in tests)
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current time in milliseconds since epoch
    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// System clock (production)
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};

    /// Clock that starts at a fixed instant and advances `step_ms` per reading
    pub struct FixedClock {
        millis: AtomicI64,
        step_ms: i64,
    }

    impl FixedClock {
        pub fn new(start_millis: i64, step_ms: i64) -> Self {
            Self {
                millis: AtomicI64::new(start_millis),
                step_ms,
            }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            let millis = self.millis.fetch_add(self.step_ms, Ordering::SeqCst);
            DateTime::from_timestamp_millis(millis).unwrap_or_default()
        }
    }

}
