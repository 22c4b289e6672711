//! Retry budget and backoff timing.

use std::time::Duration;

/// Retry budget plus capped exponential backoff with additive jitter.
///
/// The delay before retry `n` (0-indexed) is
/// `min(initial_delay * multiplier^n, max_delay) + jitter * U[0, 1)`.
///
/// # Defaults
///
/// - `max_retries`: 3 (at most 4 physical attempts)
/// - `initial_delay`: 1 second
/// - `max_delay`: 10 seconds
/// - `multiplier`: 2.0
/// - `jitter`: 1 second
///
/// # Example
///
/// ```
/// use hookbase::transport::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.base_delay(0), Duration::from_secs(1));
/// assert_eq!(policy.base_delay(10), Duration::from_secs(10));
///
/// let no_jitter = RetryPolicy::new().with_jitter(Duration::ZERO);
/// assert_eq!(no_jitter.delay_for_retry(2), Duration::from_secs(4));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Additional attempts allowed after the first one.
    pub max_retries: u32,

    /// Delay before the first retry, before jitter.
    pub initial_delay: Duration,

    /// Ceiling on the exponential part of the delay.
    pub max_delay: Duration,

    /// Factor applied to the delay after each retry.
    pub multiplier: f64,

    /// Upper bound (exclusive) of the random amount added to every delay.
    pub jitter: Duration,
}

impl RetryPolicy {
    /// Default retry budget.
    pub const DEFAULT_MAX_RETRIES: u32 = 3;

    /// Default initial delay (1 second).
    pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(1);

    /// Default maximum delay (10 seconds).
    pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(10);

    /// Default multiplier (2.0).
    pub const DEFAULT_MULTIPLIER: f64 = 2.0;

    /// Default jitter (1 second).
    pub const DEFAULT_JITTER: Duration = Duration::from_secs(1);

    /// Creates a new retry policy with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_retries: Self::DEFAULT_MAX_RETRIES,
            initial_delay: Self::DEFAULT_INITIAL_DELAY,
            max_delay: Self::DEFAULT_MAX_DELAY,
            multiplier: Self::DEFAULT_MULTIPLIER,
            jitter: Self::DEFAULT_JITTER,
        }
    }

    /// Sets the retry budget. Zero disables retries.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the delay before the first retry.
    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the ceiling on the exponential part of the delay.
    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Sets the delay multiplier.
    ///
    /// # Panics
    ///
    /// Panics if `multiplier` is not positive (must be > 0.0).
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        assert!(multiplier > 0.0, "multiplier must be positive");
        self.multiplier = multiplier;
        self
    }

    /// Sets the jitter bound. [`Duration::ZERO`] makes delays deterministic.
    #[must_use]
    pub const fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    /// Returns the total number of physical attempts the budget allows.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Returns true if another attempt may follow attempt `attempt` (0-indexed).
    #[must_use]
    pub const fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }

    /// Computes the capped exponential delay for a retry, without jitter.
    #[must_use]
    pub fn base_delay(&self, retry: u32) -> Duration {
        if self.initial_delay.is_zero() {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let delay_secs = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);
        // An overflowing power is +inf, which the cap absorbs.
        let capped = delay_secs.min(self.max_delay.as_secs_f64());
        Duration::from_secs_f64(capped.max(0.0))
    }

    /// Computes the delay for a retry using a caller-chosen jitter fraction.
    ///
    /// `fraction` is clamped to `[0, 1]`.
    #[must_use]
    pub fn delay_with_jitter(&self, retry: u32, fraction: f64) -> Duration {
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.base_delay(retry) + self.jitter.mul_f64(fraction)
    }

    /// Computes the delay before retry `retry` (0 = first retry).
    ///
    /// The result lies in `[base_delay(retry), base_delay(retry) + jitter)`.
    #[must_use]
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        if self.jitter.is_zero() {
            return self.base_delay(retry);
        }
        self.delay_with_jitter(retry, rand::random::<f64>())
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}
