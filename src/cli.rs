use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a synthetic workload and report the smoothed completion rate
    Simulate(Simulate),
    /// Validate a window geometry and print its slot count
    Check(Window),
}

#[derive(Parser, Clone, Debug)]
pub struct Window {
    /// Averaging horizon in milliseconds
    #[arg(long, default_value_t = 10_000)]
    pub total_ms: u64,

    /// Slot width in milliseconds
    #[arg(long, default_value_t = 1_000)]
    pub interval_ms: u64,
}

#[derive(Parser, Clone, Debug)]
pub struct Simulate {
    #[command(flatten)]
    pub window: Window,

    /// Number of items to process
    #[arg(long, default_value_t = 500)]
    pub items: u64,

    /// Worker threads
    #[arg(long, default_value_t = 4)]
    pub workers: usize,

    /// Base time per item in milliseconds
    #[arg(long, default_value_t = 40)]
    pub item_ms: u64,

    /// Extra time added in a repeating 0..3 step pattern, to make completions bursty
    #[arg(long, default_value_t = 0)]
    pub jitter_ms: u64,

    /// How often to print a report, in milliseconds
    #[arg(long, default_value_t = 1_000)]
    pub report_ms: u64,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Print the final window state as JSON after the last report
    #[arg(long)]
    pub dump_window: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}
