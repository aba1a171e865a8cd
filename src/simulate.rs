use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossbeam_channel as channel;
use tracing::{info, warn};

use ratewindow::{format_eta, ProgressReport, RateTracker, WindowConfig};

use crate::cli::{ReportFormat, Simulate, Window};

pub fn window_config(window: &Window) -> Result<WindowConfig> {
    WindowConfig::new(
        Duration::from_millis(window.total_ms),
        Duration::from_millis(window.interval_ms),
    )
    .with_context(|| format!("Invalid window {}ms / {}ms", window.total_ms, window.interval_ms))
}

pub fn run_check(window: Window) -> Result<()> {
    let config = window_config(&window)?;
    println!(
        "{} slots of {}ms over {}ms",
        config.slot_count(),
        window.interval_ms,
        window.total_ms
    );
    Ok(())
}

pub fn run_simulate(sim: Simulate) -> Result<()> {
    let stop_flag = Arc::new(AtomicBool::new(false));
    {
        let stop = stop_flag.clone();
        let _ = ctrlc::set_handler(move || {
            stop.store(true, Ordering::Relaxed);
        });
    }

    run_simulate_with_shutdown(sim, stop_flag).map(|_| ())
}

pub(crate) fn run_simulate_with_shutdown(sim: Simulate, stop_flag: Arc<AtomicBool>) -> Result<ProgressReport> {
    let config = window_config(&sim.window)?;
    let tracker = Arc::new(RateTracker::from_config(config));
    let completed = Arc::new(AtomicU64::new(0));
    let workers = sim.workers.max(1);
    info!(items = sim.items, workers, item_ms = sim.item_ms, jitter_ms = sim.jitter_ms, "Starting simulation");

    // Item indices from the feeder to the workers
    let (job_tx, job_rx) = channel::bounded::<u64>(workers * 2);

    let mut worker_handles = Vec::with_capacity(workers);
    for _ in 0..workers {
        let rx = job_rx.clone();
        let tracker = Arc::clone(&tracker);
        let completed = Arc::clone(&completed);
        let stop = stop_flag.clone();
        let (item_ms, jitter_ms) = (sim.item_ms, sim.jitter_ms);
        worker_handles.push(thread::spawn(move || {
            while let Ok(item) = rx.recv() {
                if stop.load(Ordering::Relaxed) {
                    break;
                }
                thread::sleep(item_duration(item, item_ms, jitter_ms));
                tracker.record_completion();
                completed.fetch_add(1, Ordering::Relaxed);
            }
        }));
    }
    drop(job_rx);

    let stop_feeder = stop_flag.clone();
    let items = sim.items;
    let feeder = thread::spawn(move || {
        for item in 0..items {
            if stop_feeder.load(Ordering::Relaxed) {
                break;
            }
            // Workers gone; likely shutting down
            if job_tx.send(item).is_err() {
                break;
            }
        }
    });

    let report_every = Duration::from_millis(sim.report_ms.max(1));
    let mut next_report = Instant::now() + report_every;
    while completed.load(Ordering::Relaxed) < sim.items && !stop_flag.load(Ordering::Relaxed) {
        if Instant::now() >= next_report {
            let report = progress(&tracker, &completed, sim.items);
            emit(&report, sim.format)?;
            next_report += report_every;
        }
        thread::sleep(Duration::from_millis(10).min(report_every));
    }

    if feeder.join().is_err() {
        warn!("Feeder thread panicked");
    }
    for handle in worker_handles {
        if handle.join().is_err() {
            warn!("Worker thread panicked");
        }
    }
    tracker.stop();

    let report = progress(&tracker, &completed, sim.items);
    emit(&report, sim.format)?;
    if sim.dump_window {
        let window = serde_json::to_string(&tracker.snapshot()).context("Serializing window snapshot")?;
        println!("{window}");
    }
    info!(completed = report.completed, rate = report.rate, "Simulation finished");
    Ok(report)
}

pub(crate) fn item_duration(item: u64, item_ms: u64, jitter_ms: u64) -> Duration {
    Duration::from_millis(item_ms.saturating_add((item % 4).saturating_mul(jitter_ms)))
}

fn progress(tracker: &RateTracker, completed: &AtomicU64, total_items: u64) -> ProgressReport {
    ProgressReport::new(
        completed.load(Ordering::Relaxed),
        total_items,
        tracker.current_rate(),
        tracker.total(),
    )
}

fn emit(report: &ProgressReport, format: ReportFormat) -> Result<()> {
    match format {
        ReportFormat::Text => {
            println!(
                "{}/{}\trate {} per {}ms ({:.1}/s)\teta {}",
                report.completed,
                report.completed + report.remaining,
                report.rate,
                report.horizon_ms,
                report.per_second(),
                format_eta(report.eta()),
            );
        }
        ReportFormat::Json => {
            let line = serde_json::to_string(report).context("Serializing progress report")?;
            println!("{line}");
        }
    }
    Ok(())
}
