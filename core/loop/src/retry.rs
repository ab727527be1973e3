//! Exponential backoff with jitter for retryable model-call failures
//! (§4.G "Retry policy"): base 500ms, cap 8s, ±20% jitter.

use std::time::Duration;

use rand::Rng;

const BASE: Duration = Duration::from_millis(500);
const CAP: Duration = Duration::from_secs(8);
const JITTER_FRACTION: f64 = 0.2;

/// The delay before retry attempt `attempt` (1-indexed: the delay before
/// the *first* retry, i.e. after the first failure, is `backoff_delay(1)`).
pub fn backoff_delay(attempt: u32) -> Duration {
    let exp = BASE.as_millis().saturating_mul(1u128 << attempt.min(16));
    let capped = exp.min(CAP.as_millis());
    let capped_ms = capped as u64;

    let mut rng = rand::rng();
    let jitter_span = (capped_ms as f64 * JITTER_FRACTION) as i64;
    let offset: i64 = if jitter_span == 0 { 0 } else { rng.random_range(-jitter_span..=jitter_span) };
    let jittered = (capped_ms as i64 + offset).max(0) as u64;
    Duration::from_millis(jittered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_retry_is_near_base_delay() {
        for _ in 0..50 {
            let delay = backoff_delay(1);
            assert!(delay >= Duration::from_millis(800), "{delay:?}");
            assert!(delay <= Duration::from_millis(1200), "{delay:?}");
        }
    }

    #[test]
    fn delay_never_exceeds_cap_plus_jitter() {
        for attempt in 1..20 {
            let delay = backoff_delay(attempt);
            assert!(delay <= CAP + CAP.mul_f64(JITTER_FRACTION), "attempt {attempt}: {delay:?}");
        }
    }

    #[test]
    fn delay_grows_with_attempt_number_before_capping() {
        let first = backoff_delay(1).as_millis();
        let third = backoff_delay(3).as_millis();
        // Jitter is only ±20%, so attempt 3 (2000ms nominal) must exceed
        // attempt 1 (1000ms nominal) even at the extremes.
        assert!(third > first);
    }
}
