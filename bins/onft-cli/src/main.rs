//! onft-cli — Operator tooling for ONFT deployments.
//!
//! Writes deployment config templates, inspects a config as it would deploy,
//! and projects issuance week by week against a simulated clock.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};

use onft_core::config::{DeploymentConfig, StakingConfig, TokenConfig};
use onft_core::constants::UNIT;
use onft_core::traits::{Clock, ManualClock, SystemClock};
use onft_core::types::{Address, Amount, Timestamp};
use onft_issuance::{IssuanceSchedule, IssuanceScheduler};
use onft_staking::{DelegationLedger, DelegationSnapshot};

/// ONFT operator CLI.
#[derive(Parser)]
#[command(name = "onft-cli")]
#[command(version, about = "Inspect and project ONFT issuance schedules")]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log output format ("text" or "json")
    #[arg(long, global = true, default_value = "text")]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a deployment config with default schedule parameters.
    Init(InitArgs),
    /// Deploy a config in memory and print the initial state as JSON.
    Inspect(InspectArgs),
    /// Simulate issuance week by week.
    Project(ProjectArgs),
}

#[derive(Args)]
struct InitArgs {
    /// Administrator of both the token and the delegation ledger.
    #[arg(long)]
    admin: Address,

    /// Delegation pool account.
    #[arg(long)]
    pool: Address,

    /// Initial allocation as ACCOUNT=WHOLE_UNITS (repeatable).
    #[arg(long = "allocate", value_parser = parse_allocation)]
    allocations: Vec<(Address, Amount)>,

    /// Output path. Prints to stdout when omitted.
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Args)]
struct InspectArgs {
    /// Path to the deployment config (JSON).
    #[arg(short, long)]
    config: PathBuf,

    /// Deployment time as Unix seconds (default: now).
    #[arg(long)]
    now: Option<Timestamp>,
}

#[derive(Args)]
struct ProjectArgs {
    /// Path to the deployment config (JSON).
    #[arg(short, long)]
    config: PathBuf,

    /// Number of mint periods to simulate.
    #[arg(short, long, default_value_t = 52)]
    weeks: u32,

    /// Also mint the temporary track while it lasts.
    #[arg(long)]
    with_temp: bool,

    /// Deployment time as Unix seconds (default: now).
    #[arg(long)]
    now: Option<Timestamp>,

    /// Emit one JSON object per period instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Inspection<'a> {
    deployed_at: Timestamp,
    total_supply: Amount,
    schedule: &'a IssuanceSchedule,
    staking: DelegationSnapshot,
}

#[derive(Serialize)]
struct ProjectionRow {
    period: u32,
    time: Timestamp,
    rolled_over: u32,
    permanent: Amount,
    temporary: Amount,
    total_supply: Amount,
    weekly_inflation_amt: Amount,
    temp_remaining: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, &cli.log_format);

    match cli.command {
        Commands::Init(args) => init(args),
        Commands::Inspect(args) => inspect(args),
        Commands::Project(args) => project(args),
    }
}

fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

fn parse_allocation(s: &str) -> Result<(Address, Amount), String> {
    let (account, units) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ACCOUNT=UNITS, got {s:?}"))?;
    let account: Address = account.parse().map_err(|e| format!("{e}"))?;
    let units: Amount = units
        .parse()
        .map_err(|e| format!("invalid unit count {units:?}: {e}"))?;
    let amount = units
        .checked_mul(UNIT)
        .ok_or_else(|| format!("{units} units overflows"))?;
    Ok((account, amount))
}

/// Render base units as a decimal amount of whole units.
fn format_units(amount: Amount) -> String {
    let whole = amount / UNIT;
    let frac = amount % UNIT;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{frac:018}");
    format!("{whole}.{}", frac.trim_end_matches('0'))
}

fn format_time(ts: Timestamp) -> String {
    i64::try_from(ts)
        .ok()
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ts.to_string())
}

fn load(path: &PathBuf) -> Result<DeploymentConfig> {
    DeploymentConfig::from_file(path)
        .with_context(|| format!("failed to load config {}", path.display()))
}

fn deploy(config: &DeploymentConfig, clock: Arc<dyn Clock>) -> Result<(IssuanceScheduler, DelegationLedger)> {
    let token = IssuanceScheduler::new(&config.token, clock).context("token deployment failed")?;
    let staking = DelegationLedger::new(&config.staking).context("staking deployment failed")?;
    Ok((token, staking))
}

fn start_time(now: Option<Timestamp>) -> Timestamp {
    now.unwrap_or_else(|| SystemClock.now())
}

fn init(args: InitArgs) -> Result<()> {
    let mut token = TokenConfig::new(args.admin);
    for (account, amount) in args.allocations {
        token = token.with_allocation(account, amount);
    }
    let config = DeploymentConfig {
        token,
        staking: StakingConfig::new(args.admin, args.pool),
    };
    config.validate().context("invalid deployment config")?;
    let json = config.to_json_pretty()?;

    match args.out {
        Some(path) => {
            if path.exists() {
                bail!("refusing to overwrite {}", path.display());
            }
            std::fs::write(&path, json + "\n")
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "deployment config written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn inspect(args: InspectArgs) -> Result<()> {
    let config = load(&args.config)?;
    let deployed_at = start_time(args.now);
    let (token, staking) = deploy(&config, Arc::new(ManualClock::new(deployed_at)))?;

    let report = Inspection {
        deployed_at,
        total_supply: token.total_supply(),
        schedule: token.schedule(),
        staking: staking.snapshot(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn project(args: ProjectArgs) -> Result<()> {
    let config = load(&args.config)?;
    let clock = ManualClock::new(start_time(args.now));
    let (mut token, _) = deploy(&config, Arc::new(clock.clone()))?;
    let admin = config.token.admin;
    let period = config.token.mint_lock_period_secs;
    if config.token.inflation_lock_period_secs == 0 {
        bail!("cannot project a schedule with a zero-length year");
    }

    if !args.json {
        println!(
            "{:>6}  {:<19}  {:>4}  {:>24}  {:>24}  {:>28}",
            "period", "time", "roll", "permanent", "temporary", "total supply"
        );
    }

    for n in 1..=args.weeks {
        clock.advance(period);
        let now = clock.now();

        let mut rolled_over = 0;
        while token.schedule().year_ready(now) {
            token.rollover_year(&admin).context("year rollover failed")?;
            rolled_over += 1;
        }

        let permanent = if token.schedule().permanent_ready(now) {
            token.mint_permanent(&admin, &admin).context("permanent mint failed")?
        } else {
            0
        };
        let temporary = if args.with_temp && token.schedule().temporary_ready(now) {
            token.mint_temporary(&admin, &admin).context("temporary mint failed")?
        } else {
            0
        };
        debug!(period = n, now, permanent, temporary, "projected period");

        let row = ProjectionRow {
            period: n,
            time: now,
            rolled_over,
            permanent,
            temporary,
            total_supply: token.total_supply(),
            weekly_inflation_amt: token.schedule().weekly_inflation_amt,
            temp_remaining: token.schedule().temporary_remaining(),
        };
        if args.json {
            println!("{}", serde_json::to_string(&row)?);
        } else {
            println!(
                "{:>6}  {:<19}  {:>4}  {:>24}  {:>24}  {:>28}",
                row.period,
                format_time(row.time),
                row.rolled_over,
                format_units(row.permanent),
                format_units(row.temporary),
                format_units(row.total_supply),
            );
        }
    }
    Ok(())
}
