use std::time::Duration;

use crate::error::ConfigError;

/// Window geometry: the averaging horizon and the width of one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    total: Duration,
    interval: Duration,
    slot_count: usize,
}

impl WindowConfig {
    pub fn new(total: Duration, interval: Duration) -> Result<Self, ConfigError> {
        if total.is_zero() {
            return Err(ConfigError::ZeroTotal);
        }
        if interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        if total <= interval {
            return Err(ConfigError::TotalNotAfterInterval { total, interval });
        }
        let (total_ns, interval_ns) = (total.as_nanos(), interval.as_nanos());
        if total_ns % interval_ns != 0 {
            return Err(ConfigError::NotAMultiple { total, interval });
        }
        let slot_count = usize::try_from(total_ns / interval_ns)
            .map_err(|_| ConfigError::NotAMultiple { total, interval })?;
        Ok(Self { total, interval, slot_count })
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of slots in each ring buffer (`total / interval`).
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn zero_total_rejected() {
        assert_eq!(WindowConfig::new(ms(0), ms(10)).unwrap_err(), ConfigError::ZeroTotal);
    }

    #[test]
    fn zero_interval_rejected() {
        assert_eq!(WindowConfig::new(ms(100), ms(0)).unwrap_err(), ConfigError::ZeroInterval);
    }

    #[test]
    fn zero_both_reports_total_first() {
        assert_eq!(WindowConfig::new(ms(0), ms(0)).unwrap_err(), ConfigError::ZeroTotal);
    }

    #[test]
    fn total_equal_or_shorter_than_interval_rejected() {
        assert!(matches!(
            WindowConfig::new(ms(10), ms(10)),
            Err(ConfigError::TotalNotAfterInterval { .. })
        ));
        assert!(matches!(
            WindowConfig::new(ms(5), ms(10)),
            Err(ConfigError::TotalNotAfterInterval { .. })
        ));
    }

    #[test]
    fn non_multiple_rejected() {
        let err = WindowConfig::new(ms(1050), ms(100)).unwrap_err();
        assert_eq!(err, ConfigError::NotAMultiple { total: ms(1050), interval: ms(100) });
        assert!(err.to_string().contains("multiple"));
    }

    #[test]
    fn sub_millisecond_multiple_accepted() {
        let cfg = WindowConfig::new(Duration::from_micros(1500), Duration::from_micros(500)).unwrap();
        assert_eq!(cfg.slot_count(), 3);
    }

    #[test]
    fn slot_count_is_exact() {
        let cfg = WindowConfig::new(Duration::from_secs(10), Duration::from_secs(1)).unwrap();
        assert_eq!(cfg.slot_count(), 10);
        assert_eq!(cfg.total(), Duration::from_secs(10));
        assert_eq!(cfg.interval(), Duration::from_secs(1));
    }
}
