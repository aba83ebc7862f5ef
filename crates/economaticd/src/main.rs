//! economaticd — the Economatic daemon.
//!
//! Each `run` is one invocation of the scale-down / restore cycle. An
//! external scheduler (cron, a systemd timer, a cloud event rule) fires it
//! periodically; nothing is kept in memory between runs.
//!
//! # Usage
//!
//! ```text
//! ECONOMATIC_SCALE_UP_HOUR=8 ECONOMATIC_SCALE_UP_MINUTE=0 \
//! ECONOMATIC_SCALE_DOWN_HOUR=2 ECONOMATIC_SCALE_DOWN_MINUTE=55 \
//!     economaticd run --fleet-manifest fleet.toml
//!
//! economaticd --config /etc/economatic.toml status
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod invocation;
mod status;

use invocation::{PhaseArg, RunArgs};

const DEFAULT_LOG_FILTER: &str =
    "info,economaticd=debug,economatic_cycle=debug,economatic_fleet=debug,economatic_state=debug";

#[derive(Parser)]
#[command(name = "economaticd", about = "Economatic daemon", version)]
struct Cli {
    /// Path to economatic.toml.
    #[arg(long, global = true, env = "ECONOMATIC_CONFIG")]
    config: Option<PathBuf>,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one invocation of the cycle.
    Run {
        #[command(flatten)]
        args: RunArgs,

        /// Run this phase now, skipping the stored phase and the schedule
        /// window. Run-state is flipped afterwards as usual.
        #[arg(long, value_enum)]
        force_phase: Option<PhaseArg>,
    },
    /// Print the run-state and any pending snapshots as JSON.
    Status {
        /// Path to the state database.
        #[arg(long, env = "ECONOMATIC_STATE")]
        state: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let config = invocation::load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Run { args, force_phase } => {
            let settings = invocation::Settings::resolve(&config, &args)?;
            let now = chrono::Local::now();
            let report = invocation::run(&settings, &now, force_phase.map(Into::into)).await?;
            println!("{}", invocation::summary(&report));
            Ok(())
        }
        Command::Status { state } => {
            let path = invocation::state_path(&config, state.as_deref());
            println!("{}", status::render(&path)?);
            Ok(())
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match format {
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_covers_every_crate() {
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
        for target in [
            "economaticd",
            "economatic_cycle",
            "economatic_fleet",
            "economatic_state",
        ] {
            assert!(
                DEFAULT_LOG_FILTER.contains(&format!("{target}=debug")),
                "{target} missing from default filter"
            );
        }
    }
}
