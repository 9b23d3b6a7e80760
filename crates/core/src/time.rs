use chrono::{DateTime, Utc};

/// Source of "now" for id generation, so services and tests agree on time.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    #[must_use]
    pub fn system() -> Self {
        Self::System
    }

    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// Milliseconds since the Unix epoch, clamped to zero for pre-epoch clocks.
    #[must_use]
    pub fn timestamp_millis(&self) -> u64 {
        u64::try_from(self.now().timestamp_millis()).unwrap_or(0)
    }

    /// Returns a timestamp-derived id strictly greater than `last`.
    ///
    /// Two records created within the same millisecond still get distinct ids.
    #[must_use]
    pub fn next_id_after(&self, last: Option<u64>) -> u64 {
        let now = self.timestamp_millis();
        match last {
            Some(last) if last >= now => last.saturating_add(1),
            _ => now,
        }
    }
}

/// Deterministic timestamp for tests (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_id_uses_timestamp_when_free() {
        let clock = fixed_clock();
        assert_eq!(clock.next_id_after(None), 1_700_000_000_000);
        assert_eq!(clock.next_id_after(Some(5)), 1_700_000_000_000);
    }

    #[test]
    fn next_id_bumps_past_collisions() {
        let clock = fixed_clock();
        let first = clock.next_id_after(None);
        assert_eq!(clock.next_id_after(Some(first)), first + 1);
        assert_eq!(clock.next_id_after(Some(first + 7)), first + 8);
    }
}
