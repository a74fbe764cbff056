//! Wall-clock access for id allocation and timestamps

use chrono::format::{Item, StrftimeItems};
use chrono::Local;
use std::fmt::Write;

/// Default timestamp layout, e.g. `10/17/2026, 3:04:05 PM`
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// True when chrono understands every specifier in `format`
pub fn is_valid_timestamp_format(format: &str) -> bool {
    !format.trim().is_empty() && StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}

pub trait Clock {
    /// Milliseconds since the Unix epoch
    fn now_millis(&self) -> u64;

    /// Current local time rendered for display
    fn timestamp(&self) -> String;
}

/// Clock backed by the system's local time
#[derive(Debug, Clone)]
pub struct SystemClock {
    format: String,
}

impl SystemClock {
    /// An unusable format falls back to `DEFAULT_TIMESTAMP_FORMAT`
    pub fn new(format: impl Into<String>) -> Self {
        let mut format = format.into();
        if !is_valid_timestamp_format(&format) {
            tracing::warn!(target: "clock", "invalid timestamp format '{}', using the default", format);
            format = DEFAULT_TIMESTAMP_FORMAT.to_string();
        }
        Self { format }
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        u64::try_from(Local::now().timestamp_millis()).unwrap_or(0)
    }

    fn timestamp(&self) -> String {
        let now = Local::now();
        let mut stamp = String::new();
        if write!(stamp, "{}", now.format(&self.format)).is_err() {
            stamp.clear();
            let _ = write!(stamp, "{}", now.format(DEFAULT_TIMESTAMP_FORMAT));
        }
        stamp
    }
}

/// Hands out strictly increasing task ids derived from the clock.
///
/// Two creations within the same millisecond (or a clock stepping backwards)
/// still get distinct ids.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    last_issued: u64,
}

impl IdAllocator {
    /// Start above every id already in use
    pub fn starting_after(max_existing: Option<u64>) -> Self {
        Self {
            last_issued: max_existing.unwrap_or(0),
        }
    }

    /// `None` once the id space is used up
    pub fn next(&mut self, now_millis: u64) -> Option<u64> {
        let id = now_millis.max(self.last_issued.checked_add(1)?);
        self.last_issued = id;
        Some(id)
    }
}

#[cfg(test)]
pub mod testing {
    use super::Clock;
    use std::cell::Cell;

    /// Manually driven clock for tests
    #[derive(Debug)]
    pub struct ManualClock {
        millis: Cell<u64>,
        stamps: Cell<u32>,
    }

    impl ManualClock {
        pub fn new(millis: u64) -> Self {
            Self {
                millis: Cell::new(millis),
                stamps: Cell::new(0),
            }
        }

        pub fn advance(&self, millis: u64) {
            self.millis.set(self.millis.get() + millis);
        }
    }

    impl Clock for ManualClock {
        fn now_millis(&self) -> u64 {
            self.millis.get()
        }

        // Each call yields a distinct stamp so edits are observable
        fn timestamp(&self) -> String {
            let n = self.stamps.get() + 1;
            self.stamps.set(n);
            format!("stamp-{}", n)
        }
    }

    impl Clock for std::rc::Rc<ManualClock> {
        fn now_millis(&self) -> u64 {
            (**self).now_millis()
        }

        fn timestamp(&self) -> String {
            (**self).timestamp()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_follow_clock() {
        let mut ids = IdAllocator::default();
        assert_eq!(ids.next(1000), Some(1000));
        assert_eq!(ids.next(2000), Some(2000));
    }

    #[test]
    fn test_ids_never_repeat_within_same_millisecond() {
        let mut ids = IdAllocator::default();
        let a = ids.next(5000).unwrap();
        let b = ids.next(5000).unwrap();
        let c = ids.next(4000).unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_starts_after_existing() {
        let mut ids = IdAllocator::starting_after(Some(9000));
        assert_eq!(ids.next(100), Some(9001));
    }

    #[test]
    fn test_ids_exhausted_at_max() {
        let mut ids = IdAllocator::starting_after(Some(u64::MAX));
        assert_eq!(ids.next(1000), None);
        assert_eq!(ids.next(u64::MAX), None);

        let mut ids = IdAllocator::starting_after(Some(u64::MAX - 1));
        assert_eq!(ids.next(0), Some(u64::MAX));
        assert_eq!(ids.next(0), None);
    }

    #[test]
    fn test_system_clock_format() {
        let clock = SystemClock::new("%Y");
        assert_eq!(clock.timestamp().len(), 4);
        assert!(clock.now_millis() > 1_600_000_000_000);
    }

    #[test]
    fn test_format_validation() {
        assert!(is_valid_timestamp_format(DEFAULT_TIMESTAMP_FORMAT));
        assert!(is_valid_timestamp_format("%Y-%m-%d %H:%M"));
        assert!(!is_valid_timestamp_format("%Q"));
        assert!(!is_valid_timestamp_format("  "));
    }

    #[test]
    fn test_invalid_format_falls_back_to_default() {
        let clock = SystemClock::new("%Q");
        let stamp = clock.timestamp();
        assert!(!stamp.is_empty());
        assert!(stamp.contains('/'));
        assert!(stamp.ends_with("AM") || stamp.ends_with("PM"));
    }
}
