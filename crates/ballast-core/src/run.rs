use crate::gate_config::{resolve_gate_config, CliOverrides};
use crate::stage_table::{order_stage_table, StageRow};
use anyhow::Context;
use ballast_hydro::{HydroRow, HydrostaticTable};
use ballast_solver::{ObjectiveMode, SolverParams};
use ballast_stage::{
    apply_forward_inventory, is_critical_stage_with_profile, run_stage, ForwardInventory, StageInput,
    StageResult, STAGE_SEQUENCE,
};
use ballast_support::profile::SiteProfile;
use ballast_tanks::{apply_sensor_readings, SensorApplyStrategy, SensorRow, SensorWarning, TankRegistry, TankRow};
use std::collections::BTreeMap;

/// Everything needed to execute one run, gathered from the five input
/// surfaces.
pub struct RunInputs {
    pub tank_rows: Vec<TankRow>,
    pub hydro_rows: Vec<HydroRow>,
    pub stage_rows: Vec<StageRow>,
    pub profile: SiteProfile,
    pub sensor_rows: Option<Vec<SensorRow>>,
    pub sensor_strategy: SensorApplyStrategy,
    pub forward_inventory: ForwardInventory,
    pub objective: ObjectiveMode,
    pub solver_params: SolverParams,
    pub cli: CliOverrides,
}

/// The full output of one run: nine stage results plus whatever diagnostics
/// accumulated while loading sensor readings.
pub struct RunReport {
    pub stage_results: Vec<StageResult>,
    pub sensor_warnings: Vec<SensorWarning>,
    /// Raw (pre-solve) drafts per stage, in [`STAGE_SEQUENCE`] order, kept
    /// alongside the solved results for the QA table's `Draft_Source=raw`
    /// rows.
    pub raw_drafts: Vec<(f64, f64)>,
    pub is_critical: Vec<bool>,
    pub pump_rates: BTreeMap<String, f64>,
    /// 0 = all gates OK/LIMIT; 1 = any FAIL/HardStop; 2 = any infeasibility.
    pub exit_code: i32,
}

/// Load every input, then sequence the nine stages, threading tank state
/// forward. Input errors abort before any stage executes; once the run
/// starts, a run always produces nine stage results, some possibly marked
/// failed.
pub fn execute_run(inputs: RunInputs) -> anyhow::Result<RunReport> {
    let hydro = HydrostaticTable::from_rows(inputs.hydro_rows).context("loading hydrostatic table")?;
    let mut registry = TankRegistry::from_rows(inputs.tank_rows).context("loading tank registry")?;
    registry.apply_overrides(&inputs.profile).context("applying site-profile tank overrides")?;

    let sensor_warnings = match inputs.sensor_rows {
        Some(readings) => apply_sensor_readings(&mut registry, &readings, inputs.sensor_strategy)
            .context("applying sensor readings")?,
        None => Vec::new(),
    };

    let pump_rates: BTreeMap<String, f64> = registry
        .snapshot()
        .iter()
        .map(|t| (t.tank_id.clone(), t.pump_rate_tph))
        .collect();

    let ordered_stage_rows = order_stage_table(inputs.stage_rows).context("validating stage table")?;

    apply_forward_inventory(&mut registry, &inputs.forward_inventory)
        .context("applying forward-inventory pre-fill before Stage 1")?;

    let mut stage_results = Vec::with_capacity(STAGE_SEQUENCE.len());
    let mut raw_drafts = Vec::with_capacity(STAGE_SEQUENCE.len());
    let mut is_critical_flags = Vec::with_capacity(STAGE_SEQUENCE.len());

    for stage_row in &ordered_stage_rows {
        let is_critical = is_critical_stage_with_profile(
            &stage_row.stage,
            inputs.profile.critical_stage_list.as_deref(),
            inputs.profile.critical_stage_regex.as_deref(),
        )
        .with_context(|| format!("resolving critical-stage classifier for `{}`", stage_row.stage))?;

        let gate_config = resolve_gate_config(stage_row, &inputs.profile, &inputs.cli, is_critical);
        let tide = stage_row.tide_context(inputs.profile.ukc_min_m);
        let stage_name: &'static str = STAGE_SEQUENCE
            .iter()
            .copied()
            .find(|&name| name == stage_row.stage.as_str())
            .expect("stage table was validated against STAGE_SEQUENCE");

        let stage_input = StageInput {
            stage_name,
            initial_fwd_m: stage_row.current_fwd_m,
            initial_aft_m: stage_row.current_aft_m,
            initial_trim_m: stage_row.current_aft_m - stage_row.current_fwd_m,
            gate_config: &gate_config,
            tide: tide.as_ref(),
        };

        let result = run_stage(&mut registry, &stage_input, &hydro, inputs.objective, inputs.solver_params);

        raw_drafts.push((stage_row.current_fwd_m, stage_row.current_aft_m));
        is_critical_flags.push(is_critical);
        stage_results.push(result);
    }

    let exit_code = if stage_results.iter().any(|r| r.infeasibility.is_some()) {
        2
    } else if stage_results.iter().any(|r| r.hardstop_any) {
        1
    } else {
        0
    };

    Ok(RunReport {
        stage_results,
        sensor_warnings,
        raw_drafts,
        is_critical: is_critical_flags,
        pump_rates,
        exit_code,
    })
}
