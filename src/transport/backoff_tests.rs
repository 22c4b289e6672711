//! Tests for `RetryPolicy`.

use super::RetryPolicy;
use std::time::Duration;

mod defaults {
    use super::*;

    #[test]
    fn new_matches_default() {
        assert_eq!(RetryPolicy::new(), RetryPolicy::default());
    }

    #[test]
    fn three_retries_means_four_attempts() {
        let policy = RetryPolicy::new();

        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.max_attempts(), 4);
    }

    #[test]
    fn delays_start_at_one_second_and_cap_at_ten() {
        let policy = RetryPolicy::new();

        assert_eq!(policy.initial_delay, Duration::from_secs(1));
        assert_eq!(policy.max_delay, Duration::from_secs(10));
        assert_eq!(policy.jitter, Duration::from_secs(1));
        assert!((policy.multiplier - 2.0).abs() < f64::EPSILON);
    }
}

mod budget {
    use super::*;

    #[test]
    fn should_retry_until_budget_is_spent() {
        let policy = RetryPolicy::new().with_max_retries(2);

        assert!(policy.should_retry(0));
        assert!(policy.should_retry(1));
        assert!(!policy.should_retry(2));
    }

    #[test]
    fn zero_budget_never_retries() {
        let policy = RetryPolicy::new().with_max_retries(0);

        assert!(!policy.should_retry(0));
        assert_eq!(policy.max_attempts(), 1);
    }

    #[test]
    fn max_attempts_saturates() {
        assert_eq!(
            RetryPolicy::new().with_max_retries(u32::MAX).max_attempts(),
            u32::MAX
        );
    }
}

mod base_delay {
    use super::*;

    #[test]
    fn doubles_per_retry() {
        let policy = RetryPolicy::new();

        assert_eq!(policy.base_delay(0), Duration::from_secs(1));
        assert_eq!(policy.base_delay(1), Duration::from_secs(2));
        assert_eq!(policy.base_delay(2), Duration::from_secs(4));
        assert_eq!(policy.base_delay(3), Duration::from_secs(8));
    }

    #[test]
    fn caps_at_max_delay() {
        let policy = RetryPolicy::new();

        assert_eq!(policy.base_delay(4), Duration::from_secs(10));
        assert_eq!(policy.base_delay(1_000), Duration::from_secs(10));
        assert_eq!(policy.base_delay(u32::MAX), Duration::from_secs(10));
    }

    #[test]
    fn zero_initial_delay_stays_zero() {
        let policy = RetryPolicy::new().with_initial_delay(Duration::ZERO);
        assert_eq!(policy.base_delay(u32::MAX), Duration::ZERO);
    }

    #[test]
    fn custom_multiplier() {
        let policy = RetryPolicy::new()
            .with_initial_delay(Duration::from_millis(250))
            .with_multiplier(3.0);

        assert_eq!(policy.base_delay(2), Duration::from_millis(2_250));
    }

    #[test]
    #[should_panic(expected = "multiplier must be positive")]
    fn non_positive_multiplier_panics() {
        let _ = RetryPolicy::new().with_multiplier(0.0);
    }
}

mod jitter {
    use super::*;

    #[test]
    fn fraction_is_scaled_by_jitter_bound() {
        let policy = RetryPolicy::new();

        assert_eq!(policy.delay_with_jitter(0, 0.0), Duration::from_secs(1));
        assert_eq!(policy.delay_with_jitter(0, 0.5), Duration::from_millis(1_500));
        assert_eq!(policy.delay_with_jitter(5, 0.25), Duration::from_millis(10_250));
    }

    #[test]
    fn out_of_range_fractions_are_clamped() {
        let policy = RetryPolicy::new();

        assert_eq!(policy.delay_with_jitter(0, -3.0), Duration::from_secs(1));
        assert_eq!(policy.delay_with_jitter(0, 7.0), Duration::from_secs(2));
        assert_eq!(policy.delay_with_jitter(0, f64::NAN), Duration::from_secs(1));
    }

    #[test]
    fn random_delay_stays_within_bounds() {
        let policy = RetryPolicy::new();

        for retry in 0..8 {
            let base = policy.base_delay(retry);
            for _ in 0..50 {
                let delay = policy.delay_for_retry(retry);
                assert!(delay >= base, "{delay:?} < {base:?}");
                assert!(delay < base + Duration::from_secs(1), "{delay:?} too long");
            }
        }
    }

    #[test]
    fn never_exceeds_eleven_seconds() {
        let policy = RetryPolicy::new();
        for _ in 0..100 {
            assert!(policy.delay_for_retry(30) < Duration::from_secs(11));
        }
    }

    #[test]
    fn zero_jitter_is_deterministic() {
        let policy = RetryPolicy::new().with_jitter(Duration::ZERO);

        assert_eq!(policy.delay_for_retry(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for_retry(1), policy.delay_for_retry(1));
    }
}
