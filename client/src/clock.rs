use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current unix time in seconds.
///
/// Stake status and countdown text are derived from this rather than from
/// block timestamps, so tests can drive it by hand.
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_past_2024() {
        assert!(SystemClock.now() > 1_704_067_200);
    }
}
