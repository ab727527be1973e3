//! Per-append token accounting.

use serde::Deserialize;
use serde::Serialize;

/// A snapshot of cumulative token usage, appended to the history alongside
/// (not instead of) the message it was reported with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_read_tokens: u64,
    pub cache_creation_tokens: u64,
}

impl UsageRecord {
    /// Total accounted tokens; this is the value `token_count` takes on.
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens + self.cache_read_tokens + self.cache_creation_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_sums_all_fields() {
        let usage = UsageRecord {
            input_tokens: 10,
            output_tokens: 5,
            cache_read_tokens: 2,
            cache_creation_tokens: 1,
        };
        assert_eq!(usage.total(), 18);
    }

    #[test]
    fn default_is_zero() {
        assert_eq!(UsageRecord::default().total(), 0);
    }
}
