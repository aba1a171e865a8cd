use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel as channel;
use tracing::{debug, info, warn};

use crate::config::WindowConfig;
use crate::error::ConfigError;
use crate::window::{DoubleWindow, WindowSnapshot};

struct State {
    window: DoubleWindow,
    running: bool,
}

/// Thread-safe completion-rate tracker backed by a [`DoubleWindow`].
///
/// A background thread folds the in-progress count into the window once per
/// interval. Callers record completions from any thread and poll
/// [`current_rate`](Self::current_rate), which reports completions per `total`.
pub struct RateTracker {
    config: WindowConfig,
    state: Arc<Mutex<State>>,
    stop_tx: Mutex<Option<channel::Sender<()>>>,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl RateTracker {
    pub fn new(total: Duration, interval: Duration) -> Result<Self, ConfigError> {
        let config = WindowConfig::new(total, interval)?;
        Ok(Self::from_config(config))
    }

    pub fn from_config(config: WindowConfig) -> Self {
        Self::with_ticks(config, channel::tick(config.interval()))
    }

    // Ticks are driven by whatever the receiver yields; tests pass their own.
    pub(crate) fn with_ticks(config: WindowConfig, ticks: channel::Receiver<Instant>) -> Self {
        let state = Arc::new(Mutex::new(State {
            window: DoubleWindow::new(config.slot_count()),
            running: true,
        }));
        let (stop_tx, stop_rx) = channel::bounded::<()>(0);

        let state_for_ticker = Arc::clone(&state);
        let ticker = thread::spawn(move || loop {
            crossbeam_channel::select! {
                recv(ticks) -> msg => match msg {
                    Ok(_) => {
                        if !tick(&state_for_ticker) {
                            break;
                        }
                    }
                    Err(_) => break,
                },
                recv(stop_rx) -> _ => break,
            }
        });

        info!(
            slots = config.slot_count(),
            interval_ms = config.interval().as_millis() as u64,
            total_ms = config.total().as_millis() as u64,
            "Rate tracker started"
        );

        Self {
            config,
            state,
            stop_tx: Mutex::new(Some(stop_tx)),
            ticker: Mutex::new(Some(ticker)),
        }
    }

    pub fn record_completion(&self) {
        lock(&self.state).window.record();
    }

    /// Estimated completions over one full `total` horizon, as of the last tick.
    pub fn current_rate(&self) -> u64 {
        lock(&self.state).window.rate()
    }

    /// Stop ticking. No tick changes the state once this returns; later calls are no-ops.
    pub fn stop(&self) {
        {
            let mut state = lock(&self.state);
            if !state.running {
                return;
            }
            state.running = false;
        }

        // Dropping the sender disconnects the stop channel and wakes the ticker.
        drop(lock(&self.stop_tx).take());
        if let Some(handle) = lock(&self.ticker).take() {
            if handle.thread().id() != thread::current().id() && handle.join().is_err() {
                warn!("Rate ticker thread panicked");
            }
        }
        info!(rate = self.current_rate(), "Rate tracker stopped");
    }

    pub fn is_running(&self) -> bool {
        lock(&self.state).running
    }

    pub fn snapshot(&self) -> WindowSnapshot {
        lock(&self.state).window.snapshot()
    }

    pub fn config(&self) -> WindowConfig {
        self.config
    }

    pub fn slot_count(&self) -> usize {
        self.config.slot_count()
    }

    pub fn total(&self) -> Duration {
        self.config.total()
    }

    pub fn interval(&self) -> Duration {
        self.config.interval()
    }

    #[cfg(test)]
    fn tick(&self) -> bool {
        tick(&self.state)
    }
}

impl Drop for RateTracker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn tick(state: &Mutex<State>) -> bool {
    let mut state = lock(state);
    if !state.running {
        return false;
    }
    let pos = state.window.pos();
    let count = state.window.current();
    let rate = state.window.advance();
    debug!(pos, count, rate, "Tick");
    true
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| {
        warn!("Rate tracker lock poisoned, recovering");
        poisoned.into_inner()
    })
}
