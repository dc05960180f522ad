//! # Backoff policy for reconnect attempts.
//!
//! The delay after failed attempt `n` (0-indexed) is `first × factor^n`, clamped
//! to `max`, then jittered. The base is derived from `n` alone, so jitter never
//! feeds back into later delays.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use treewatch::{BackoffPolicy, JitterPolicy};
//!
//! let backoff = BackoffPolicy {
//!     first: Duration::from_millis(250),
//!     max: Duration::from_secs(2),
//!     factor: 2.0,
//!     jitter: JitterPolicy::None,
//! };
//!
//! assert_eq!(backoff.next(0), Duration::from_millis(250));
//! assert_eq!(backoff.next(2), Duration::from_secs(1));
//! assert_eq!(backoff.next(5), Duration::from_secs(2));
//! ```

use std::time::Duration;

use crate::policies::jitter::JitterPolicy;

/// Reconnect backoff policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackoffPolicy {
    /// Delay after the first failed attempt.
    pub first: Duration,
    /// Upper bound for any single delay.
    pub max: Duration,
    /// Multiplicative growth factor (`>= 1.0` recommended).
    pub factor: f64,
    /// Randomization applied to the clamped base.
    pub jitter: JitterPolicy,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            first: Duration::from_millis(500),
            max: Duration::from_secs(10),
            factor: 2.0,
            jitter: JitterPolicy::Equal,
        }
    }
}

impl BackoffPolicy {
    /// Constant delay, no jitter.
    pub fn fixed(delay: Duration) -> Self {
        Self {
            first: delay,
            max: delay,
            factor: 1.0,
            jitter: JitterPolicy::None,
        }
    }

    /// Delay to wait after failed attempt `attempt` (0-indexed).
    pub fn next(&self, attempt: u32) -> Duration {
        let max_secs = self.max.as_secs_f64();
        let exp = attempt.min(i32::MAX as u32) as i32;
        let raw = self.first.as_secs_f64() * self.factor.powi(exp);

        let base = if !raw.is_finite() || raw < 0.0 || raw > max_secs {
            self.max
        } else {
            Duration::from_secs_f64(raw)
        };

        match self.jitter {
            JitterPolicy::Decorrelated => {
                self.jitter
                    .apply_decorrelated(self.first.min(self.max), base, self.max)
            }
            other => other.apply(base),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exact(first_ms: u64, max_ms: u64, factor: f64) -> BackoffPolicy {
        BackoffPolicy {
            first: Duration::from_millis(first_ms),
            max: Duration::from_millis(max_ms),
            factor,
            jitter: JitterPolicy::None,
        }
    }

    #[test]
    fn test_exponential_growth() {
        let p = exact(100, 30_000, 2.0);
        let got: Vec<_> = (0..5).map(|n| p.next(n).as_millis()).collect();
        assert_eq!(got, vec![100, 200, 400, 800, 1600]);
    }

    #[test]
    fn test_fixed_is_constant() {
        let p = BackoffPolicy::fixed(Duration::from_millis(300));
        for n in 0..8 {
            assert_eq!(p.next(n), Duration::from_millis(300));
        }
    }

    #[test]
    fn test_first_above_max_is_clamped() {
        assert_eq!(exact(10_000, 5_000, 2.0).next(0), Duration::from_secs(5));
    }

    #[test]
    fn test_overflow_clamps_to_max() {
        let p = exact(100, 10_000, 2.0);
        assert_eq!(p.next(100), Duration::from_secs(10));
        assert_eq!(p.next(u32::MAX), Duration::from_secs(10));
    }

    #[test]
    fn test_default_equal_jitter_bounds() {
        let p = BackoffPolicy::default();
        for n in 0..10 {
            let base = (500.0 * 2.0f64.powi(n as i32)).min(10_000.0) as u64;
            let d = p.next(n);
            assert!(d >= Duration::from_millis(base / 2), "attempt {n}: {d:?}");
            assert!(d <= Duration::from_millis(base), "attempt {n}: {d:?}");
        }
    }

    #[test]
    fn test_decorrelated_stays_within_first_and_max() {
        let p = BackoffPolicy {
            jitter: JitterPolicy::Decorrelated,
            ..exact(100, 3_000, 2.0)
        };
        for _ in 0..100 {
            let d = p.next(6);
            assert!(d >= Duration::from_millis(100));
            assert!(d <= Duration::from_secs(3));
        }
    }
}
