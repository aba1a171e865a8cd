use serde::Serialize;

/// Two cascaded ring buffers over per-interval completion counts.
///
/// `data` holds the raw count for each past interval, `historical` holds the
/// mean of `data` as it stood when each slot was written. The published rate is
/// the mean of `historical` scaled back up to the whole horizon. A slot is `None`
/// until the buffer has wrapped onto it for the first time.
#[derive(Debug, Clone)]
pub struct DoubleWindow {
    data: Vec<Option<u64>>,
    historical: Vec<Option<u64>>,
    pos: usize,
    current: u64,
    rate: u64,
}

/// Point-in-time copy of a window's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowSnapshot {
    pub slot_count: usize,
    pub pos: usize,
    pub current: u64,
    pub rate: u64,
    pub data: Vec<Option<u64>>,
    pub historical: Vec<Option<u64>>,
}

impl DoubleWindow {
    pub fn new(slot_count: usize) -> Self {
        let slot_count = slot_count.max(1);
        Self {
            data: vec![None; slot_count],
            historical: vec![None; slot_count],
            pos: 0,
            current: 0,
            rate: 0,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.data.len()
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Completions counted so far in the in-progress interval.
    pub fn current(&self) -> u64 {
        self.current
    }

    /// Last published rate, in completions per horizon.
    pub fn rate(&self) -> u64 {
        self.rate
    }

    pub fn record(&mut self) {
        self.current = self.current.saturating_add(1);
    }

    /// Close the in-progress interval and publish a new rate.
    pub fn advance(&mut self) -> u64 {
        let pos = self.pos;
        self.data[pos] = Some(self.current);
        let first = mean(&self.data);

        self.historical[pos] = Some(first);
        let second = mean(&self.historical);

        self.rate = second.saturating_mul(self.slot_count() as u64);
        self.pos = (pos + 1) % self.slot_count();
        self.current = 0;
        self.rate
    }

    pub fn snapshot(&self) -> WindowSnapshot {
        WindowSnapshot {
            slot_count: self.slot_count(),
            pos: self.pos,
            current: self.current,
            rate: self.rate,
            data: self.data.clone(),
            historical: self.historical.clone(),
        }
    }
}

// Truncating mean over populated slots; an all-empty buffer divides by 1.
fn mean(slots: &[Option<u64>]) -> u64 {
    let (sum, n) = slots
        .iter()
        .flatten()
        .fold((0u128, 0u128), |(sum, n), &v| (sum + u128::from(v), n + 1));
    (sum / n.max(1)) as u64
}
