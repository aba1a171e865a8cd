mod cli;
mod simulate;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::simulate::{run_check, run_simulate};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .try_init()
        .ok();

    let cli = Cli::parse();
    let result: Result<()> = match cli.command {
        Some(Commands::Simulate(sim)) => run_simulate(sim),
        Some(Commands::Check(window)) => run_check(window),
        None => {
            Cli::command().print_help().ok();
            println!();
            Ok(())
        }
    };

    if let Err(err) = result {
        let code = exit_code_for_error(&err);
        eprintln!("error: {err:?}");
        std::process::exit(code);
    }
}

pub(crate) fn exit_code_for_error(err: &anyhow::Error) -> i32 {
    // 2: invalid window geometry, 1: other
    if err.chain().any(|cause| cause.is::<ratewindow::ConfigError>()) {
        return 2;
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_config_error() {
        let err = anyhow::Error::from(ratewindow::ConfigError::ZeroTotal);
        assert_eq!(exit_code_for_error(&err), 2);
    }

    #[test]
    fn exit_code_wrapped_config_error() {
        let err = anyhow::Error::from(ratewindow::ConfigError::ZeroInterval).context("Invalid window");
        assert_eq!(exit_code_for_error(&err), 2);
    }

    #[test]
    fn exit_code_other() {
        let err = anyhow::anyhow!("other");
        assert_eq!(exit_code_for_error(&err), 1);
    }
}
