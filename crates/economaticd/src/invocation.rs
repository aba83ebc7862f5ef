//! The `run` command: settings resolution and one cycle invocation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, TimeZone};
use clap::{Args, ValueEnum};
use tracing::info;

use economatic_core::config::ScheduleConfig;
use economatic_core::{EconomaticConfig, Phase, ScheduleWindows};
use economatic_cycle::{CycleController, CycleReport};
use economatic_fleet::ManifestFleet;
use economatic_state::StateStore;

const DEFAULT_STATE_PATH: &str = "/var/lib/economatic/economatic.redb";
const DEFAULT_PAGE_SIZE: usize = 50;

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Path to the state database.
    #[arg(long, env = "ECONOMATIC_STATE")]
    pub state: Option<PathBuf>,

    /// Fleet manifest served as the fleet-management provider.
    #[arg(long, env = "ECONOMATIC_FLEET_MANIFEST")]
    pub fleet_manifest: Option<PathBuf>,

    /// Groups per provider listing page.
    #[arg(long)]
    pub page_size: Option<usize>,

    #[arg(long, env = "ECONOMATIC_SCALE_UP_HOUR")]
    pub scale_up_hour: Option<u32>,

    #[arg(long, env = "ECONOMATIC_SCALE_UP_MINUTE")]
    pub scale_up_minute: Option<u32>,

    #[arg(long, env = "ECONOMATIC_SCALE_DOWN_HOUR")]
    pub scale_down_hour: Option<u32>,

    #[arg(long, env = "ECONOMATIC_SCALE_DOWN_MINUTE")]
    pub scale_down_minute: Option<u32>,
}

impl RunArgs {
    fn schedule(&self) -> ScheduleConfig {
        ScheduleConfig {
            scale_up_hour: self.scale_up_hour,
            scale_up_minute: self.scale_up_minute,
            scale_down_hour: self.scale_down_hour,
            scale_down_minute: self.scale_down_minute,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PhaseArg {
    Up,
    Down,
}

impl From<PhaseArg> for Phase {
    fn from(arg: PhaseArg) -> Self {
        match arg {
            PhaseArg::Up => Phase::Up,
            PhaseArg::Down => Phase::Down,
        }
    }
}

/// Everything one invocation needs, merged from the config file and the
/// command line / environment (which wins).
#[derive(Debug)]
pub struct Settings {
    pub windows: ScheduleWindows,
    pub state_path: PathBuf,
    pub fleet_manifest: PathBuf,
    pub page_size: usize,
}

impl Settings {
    pub fn resolve(config: &EconomaticConfig, args: &RunArgs) -> anyhow::Result<Self> {
        let windows = config
            .schedule
            .clone()
            .with_overrides(args.schedule())
            .resolve()
            .context("schedule configuration")?;

        let fleet = config.fleet.as_ref();
        let fleet_manifest = args
            .fleet_manifest
            .clone()
            .or_else(|| fleet.and_then(|f| f.manifest.clone()))
            .context("no fleet manifest configured (--fleet-manifest or [fleet].manifest)")?;
        let page_size = args
            .page_size
            .or_else(|| fleet.and_then(|f| f.page_size))
            .unwrap_or(DEFAULT_PAGE_SIZE);

        Ok(Self {
            windows,
            state_path: state_path(config, args.state.as_deref()),
            fleet_manifest,
            page_size,
        })
    }
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<EconomaticConfig> {
    match path {
        Some(path) => EconomaticConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display())),
        None => Ok(EconomaticConfig::default()),
    }
}

pub fn state_path(config: &EconomaticConfig, arg: Option<&Path>) -> PathBuf {
    arg.map(Path::to_path_buf)
        .or_else(|| config.state.as_ref().and_then(|s| s.path.clone()))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_PATH))
}

/// Run one invocation. Succeeds only once run-state has been written.
pub async fn run<Tz: TimeZone>(
    settings: &Settings,
    now: &DateTime<Tz>,
    force_phase: Option<Phase>,
) -> anyhow::Result<CycleReport> {
    if let Some(dir) = settings.state_path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let store = StateStore::open(&settings.state_path)?;
    info!(path = ?settings.state_path, "state store opened");

    let fleet = ManifestFleet::new(&settings.fleet_manifest, settings.page_size);
    info!(manifest = ?settings.fleet_manifest, "fleet manifest provider ready");

    let controller = CycleController::with_store(Arc::new(fleet), store);
    let report = match force_phase {
        Some(phase) => controller.run_forced(phase).await?,
        None => controller.run_cycle(now, &settings.windows).await?,
    };
    Ok(report)
}

pub fn summary(report: &CycleReport) -> String {
    let mut line = format!(
        "{} complete: {} succeeded, {} failed, next phase {}",
        report.phase,
        report.succeeded(),
        report.failed(),
        report.next_phase
    );
    if let Some(e) = &report.inventory_error {
        line.push_str(&format!(" (inventory unavailable: {e})"));
    }
    line
}
