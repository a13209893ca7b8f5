//! Exponential backoff with jitter.

use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniformly distributed random delays.
///
/// Injected into the [`Executor`](super::Executor) so backoff timing can be
/// made deterministic in tests.
pub trait JitterSource: Send + Sync + fmt::Debug {
    /// Returns a duration drawn uniformly from `[0, upper)`.
    ///
    /// Returns [`Duration::ZERO`] when `upper` is zero.
    fn jitter(&self, upper: Duration) -> Duration;
}

/// Jitter drawn from the thread-local generator.
///
/// Lock-free; each thread owns its generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngJitter;

impl JitterSource for ThreadRngJitter {
    fn jitter(&self, upper: Duration) -> Duration {
        let upper = nanos(upper);
        if upper == 0 {
            return Duration::ZERO;
        }
        Duration::from_nanos(rand::rng().random_range(0..upper))
    }
}

/// Jitter drawn from a seeded generator.
///
/// Two sources created with the same seed produce the same sequence.
pub struct SeededJitter {
    rng: Mutex<StdRng>,
}

impl SeededJitter {
    /// Creates a jitter source seeded with `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl JitterSource for SeededJitter {
    fn jitter(&self, upper: Duration) -> Duration {
        let upper = nanos(upper);
        if upper == 0 {
            return Duration::ZERO;
        }
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        Duration::from_nanos(rng.random_range(0..upper))
    }
}

impl fmt::Debug for SeededJitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeededJitter").finish_non_exhaustive()
    }
}

fn nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

/// Computes the capped exponential delay `min(base * 2^attempt, max)`.
///
/// Overflow saturates at `max`.
#[must_use]
pub fn exponential(attempt: u32, base: Duration, max: Duration) -> Duration {
    1u32.checked_shl(attempt)
        .and_then(|factor| base.checked_mul(factor))
        .map_or(max, |delay| delay.min(max))
}

/// Computes the delay before retry number `attempt` (zero-based).
///
/// With `d = min(base * 2^attempt, max)`, the result lies in `[d/2, d)`:
/// half the delay is fixed and the other half is jitter, so concurrent
/// callers spread out without ever exceeding the cap.
#[must_use]
pub fn backoff(attempt: u32, base: Duration, max: Duration, jitter: &dyn JitterSource) -> Duration {
    let capped = exponential(attempt, base, max);
    let half = capped / 2;
    half + jitter.jitter(capped - half)
}
