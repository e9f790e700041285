use anyhow::{Context, Result};
use ballast_core::{
    ballast_plan_rows, execute_run, qa_table_rows, stage_summary_rows, CliOverrides, RunInputs, StageRow,
};
use ballast_solver::{ObjectiveMode, SolverParams};
use ballast_support::profile::SiteProfile;
use ballast_tanks::{SensorApplyStrategy, SensorRow, TankRow};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

/// Nine-stage ballast planner: loads the tank registry, hydrostatic table,
/// and stage table, solves each stage's ballast transfer, and writes the
/// ballast plan, stage summary, and QA tables.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, arg_required_else_help = true)]
struct Args {
    /// Tank registry CSV
    #[arg(long)]
    tanks: PathBuf,

    /// Hydrostatic table CSV
    #[arg(long)]
    hydro: PathBuf,

    /// Stage table CSV (exactly the nine fixed stages, any order)
    #[arg(long)]
    stages: PathBuf,

    /// Site profile TOML (optional)
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Sensor readings CSV (optional)
    #[arg(long)]
    sensors: Option<PathBuf>,

    /// Apply sensor readings as an override instead of filling gaps only
    #[arg(long)]
    sensors_override: bool,

    /// FWB1.P forward-inventory pre-fill, tonnes
    #[arg(long, default_value_t = 0.0)]
    fwb1_p: f64,
    /// FWB1.S forward-inventory pre-fill, tonnes
    #[arg(long, default_value_t = 0.0)]
    fwb1_s: f64,
    /// FWB2.P forward-inventory pre-fill, tonnes
    #[arg(long, default_value_t = 0.0)]
    fwb2_p: f64,
    /// FWB2.S forward-inventory pre-fill, tonnes
    #[arg(long, default_value_t = 0.0)]
    fwb2_s: f64,

    /// Solve for minimum pump time instead of minimum mass moved
    #[arg(long)]
    mass_preferring: bool,

    /// CLI overrides for the gate configuration
    #[arg(long)]
    fwd_max_m: Option<f64>,
    #[arg(long)]
    aft_min_m: Option<f64>,
    #[arg(long)]
    freeboard_min_m: Option<f64>,
    #[arg(long)]
    guard_band_m: Option<f64>,
    #[arg(long)]
    trim_abs_limit_m: Option<f64>,

    /// Directory to write ballast_plan.csv, stage_summary.csv, qa_table.csv
    #[arg(short = 'o', long, default_value = "out")]
    output_dir: PathBuf,

    /// Print debug-level logs during solving
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    ballast_support::logging::init(log_level, None::<std::fs::File>);

    let tank_rows: Vec<TankRow> = load_csv(&args.tanks, "tank registry")?;
    let hydro_rows = load_csv(&args.hydro, "hydrostatic table")?;
    let stage_rows: Vec<StageRow> = load_csv(&args.stages, "stage table")?;
    let profile = match &args.profile {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("could not read file `{}`", path.display()))?;
            SiteProfile::from_toml_str(&text)?
        }
        None => SiteProfile::default(),
    };
    let sensor_rows: Option<Vec<SensorRow>> = match &args.sensors {
        Some(path) => Some(load_csv(path, "sensor readings")?),
        None => None,
    };

    let cli = CliOverrides {
        fwd_max_m: args.fwd_max_m,
        aft_min_m: args.aft_min_m,
        freeboard_min_m: args.freeboard_min_m,
        guard_band_m: args.guard_band_m,
        trim_abs_limit_m: args.trim_abs_limit_m,
    };

    let run_inputs = RunInputs {
        tank_rows,
        hydro_rows,
        stage_rows,
        profile,
        sensor_rows,
        sensor_strategy: if args.sensors_override {
            SensorApplyStrategy::Override
        } else {
            SensorApplyStrategy::FillMissing
        },
        forward_inventory: ballast_stage::ForwardInventory {
            fwb1_p_t: args.fwb1_p,
            fwb1_s_t: args.fwb1_s,
            fwb2_p_t: args.fwb2_p,
            fwb2_s_t: args.fwb2_s,
        },
        objective: if args.mass_preferring { ObjectiveMode::MassPreferring } else { ObjectiveMode::TimePreferring },
        solver_params: SolverParams::default(),
        cli,
    };

    let report = execute_run(run_inputs)?;

    for warning in &report.sensor_warnings {
        tracing::warn!(target: "sensors", "{warning:?}");
    }

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("could not create output directory `{}`", args.output_dir.display()))?;

    write_csv(
        &args.output_dir.join("ballast_plan.csv"),
        &ballast_plan_rows(&report.stage_results, &report.pump_rates),
    )?;
    write_csv(
        &args.output_dir.join("stage_summary.csv"),
        &stage_summary_rows(&report.stage_results),
    )?;
    let guard_band_m = args.guard_band_m.unwrap_or(ballast_gates::DEFAULT_GUARD_BAND_M);
    write_csv(
        &args.output_dir.join("qa_table.csv"),
        &qa_table_rows(&report.stage_results, &report.raw_drafts, &report.is_critical, guard_band_m),
    )?;

    tracing::info!(target: "run", exit_code = report.exit_code, "run complete");
    std::process::exit(report.exit_code);
}

fn load_csv<T: serde::de::DeserializeOwned>(path: &PathBuf, what: &str) -> Result<Vec<T>> {
    let text = fs::read_to_string(path).with_context(|| format!("could not read {what} file `{}`", path.display()))?;
    Ok(ballast_support::tabular::read_rows_str(&text)?)
}

fn write_csv<T: serde::Serialize>(path: &PathBuf, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("could not create file `{}`", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
