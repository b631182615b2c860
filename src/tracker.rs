//! Error-state machine bounding notification volume during outages.
//!
//! Worst case, an outage produces one message per suppression interval
//! no matter how often checks fail.

use chrono::{DateTime, Duration, Utc};

/// What to do about a terminal cycle failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorDecision {
    /// First failure of a new error window: announce it.
    Open,

    /// The window has outlived the suppression interval: announce that
    /// the failure persists, and re-arm the interval.
    StillFailing { minutes: i64 },

    /// Inside the suppression interval: say nothing.
    Suppressed,
}

/// Two states: quiescent (no window) and active (window open since the
/// recorded timestamp). Owned by the cycle worker; nothing else reads
/// the timestamp directly.
#[derive(Debug, Clone)]
pub struct ErrorTracker {
    window_start: Option<DateTime<Utc>>,
    suppress: Duration,
}

impl ErrorTracker {
    pub fn new(suppress_minutes: i64) -> Self {
        Self {
            window_start: None,
            suppress: Duration::minutes(suppress_minutes),
        }
    }

    pub fn is_active(&self) -> bool {
        self.window_start.is_some()
    }

    /// Record a terminal failure at `now` and decide whether to notify.
    pub fn on_failure(&mut self, now: DateTime<Utc>) -> ErrorDecision {
        match self.window_start {
            None => {
                self.window_start = Some(now);
                ErrorDecision::Open
            }
            Some(start) => {
                let elapsed = now - start;
                if elapsed >= self.suppress {
                    // Re-arm so the next repeat is another full interval away.
                    self.window_start = Some(now);
                    ErrorDecision::StillFailing {
                        minutes: elapsed.num_minutes(),
                    }
                } else {
                    ErrorDecision::Suppressed
                }
            }
        }
    }

    /// Record a successful cycle. Recovery is silent: the next normal
    /// inventory event already signals it. Returns whether a window was
    /// open, for logging.
    pub fn on_success(&mut self) -> bool {
        self.window_start.take().is_some()
    }
}
