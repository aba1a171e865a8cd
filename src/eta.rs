use std::time::Duration;

use serde::Serialize;

/// Time left to finish `remaining` items at `rate` completions per `horizon`.
///
/// `None` when nothing is being completed.
pub fn eta(remaining: u64, rate: u64, horizon: Duration) -> Option<Duration> {
    if remaining == 0 {
        return Some(Duration::ZERO);
    }
    if rate == 0 {
        return None;
    }
    let nanos = horizon.as_nanos().saturating_mul(u128::from(remaining)) / u128::from(rate);
    let secs = u64::try_from(nanos / 1_000_000_000).unwrap_or(u64::MAX);
    Some(Duration::new(secs, (nanos % 1_000_000_000) as u32))
}

pub fn format_eta(eta: Option<Duration>) -> String {
    let Some(eta) = eta else {
        return "--".into();
    };
    let secs = eta.as_secs() + u64::from(eta.subsec_nanos() > 0);
    let (h, m, s) = (secs / 3600, (secs / 60) % 60, secs % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressReport {
    pub completed: u64,
    pub remaining: u64,
    /// Completions per horizon.
    pub rate: u64,
    pub horizon_ms: u64,
    pub eta_ms: Option<u64>,
}

impl ProgressReport {
    pub fn new(completed: u64, total_items: u64, rate: u64, horizon: Duration) -> Self {
        let remaining = total_items.saturating_sub(completed);
        let eta_ms = eta(remaining, rate, horizon).map(|d| d.as_millis().min(u128::from(u64::MAX)) as u64);
        Self {
            completed,
            remaining,
            rate,
            horizon_ms: horizon.as_millis() as u64,
            eta_ms,
        }
    }

    pub fn eta(&self) -> Option<Duration> {
        self.eta_ms.map(Duration::from_millis)
    }

    /// Rate normalised to completions per second.
    pub fn per_second(&self) -> f64 {
        if self.horizon_ms == 0 {
            return 0.0;
        }
        self.rate as f64 * 1000.0 / self.horizon_ms as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eta_unknown_without_rate() {
        assert_eq!(eta(10, 0, Duration::from_secs(10)), None);
    }

    #[test]
    fn eta_zero_when_done() {
        assert_eq!(eta(0, 0, Duration::from_secs(10)), Some(Duration::ZERO));
        assert_eq!(eta(0, 50, Duration::from_secs(10)), Some(Duration::ZERO));
    }

    #[test]
    fn eta_scales_with_horizon() {
        // 50 per 10s => 5/s, 100 items => 20s
        assert_eq!(eta(100, 50, Duration::from_secs(10)), Some(Duration::from_secs(20)));
        // 3 per 1s, 1 item => 333.33..ms
        assert_eq!(eta(1, 3, Duration::from_secs(1)), Some(Duration::from_nanos(333_333_333)));
    }

    #[test]
    fn eta_saturates_on_huge_inputs() {
        let e = eta(u64::MAX, 1, Duration::from_secs(u64::MAX)).unwrap();
        assert_eq!(e.as_secs(), u64::MAX);
    }

    #[test]
    fn format_eta_shapes() {
        assert_eq!(format_eta(None), "--");
        assert_eq!(format_eta(Some(Duration::ZERO)), "0:00");
        assert_eq!(format_eta(Some(Duration::from_millis(1500))), "0:02");
        assert_eq!(format_eta(Some(Duration::from_secs(65))), "1:05");
        assert_eq!(format_eta(Some(Duration::from_secs(3 * 3600 + 7))), "3:00:07");
    }

    #[test]
    fn report_counts_remaining() {
        let r = ProgressReport::new(40, 100, 30, Duration::from_secs(10));
        assert_eq!(r.remaining, 60);
        assert_eq!(r.eta(), Some(Duration::from_secs(20)));
        assert!((r.per_second() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn report_overshoot_is_done() {
        let r = ProgressReport::new(120, 100, 0, Duration::from_secs(1));
        assert_eq!(r.remaining, 0);
        assert_eq!(r.eta_ms, Some(0));
    }

    #[test]
    fn report_serializes() {
        let r = ProgressReport::new(1, 4, 0, Duration::from_secs(2));
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"remaining\":3"));
        assert!(json.contains("\"eta_ms\":null"));
    }
}
