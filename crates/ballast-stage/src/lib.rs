//! C3 — Stage Planner: sequences the nine fixed stages, classifies critical
//! stages, carries tank state forward between stages, and injects the
//! forward-inventory pre-ballast policy.
//!
//! The nine-stage sequence is a fixed `&'static [&str]` walked by one
//! dispatch function rather than scattered string comparisons.

mod critical;
mod prefill;

pub use critical::{is_critical_stage, is_critical_stage_with_profile};
pub use prefill::{
    apply_forward_inventory, constrained_snapshot, ForwardInventory, FORWARD_INVENTORY_CONSTRAINED_STAGES,
    FORWARD_INVENTORY_TANKS,
};

use ballast_gates::{evaluate, GateConfig, GateEvaluation, TideContext};
use ballast_solver::{solve, ObjectiveMode, SolveInputs, SolveOutcome, SolverParams};
use ballast_support::error::InfeasibilityReport;
use ballast_hydro::HydrostaticTable;
use ballast_tanks::TankRegistry;
use std::collections::BTreeMap;

/// The fixed nine-stage order. A run comprises exactly these stages in
/// this order — no subsystem may reorder or omit one.
pub const STAGE_SEQUENCE: &[&str] = &[
    "Stage 1",
    "Stage 2",
    "Stage 3",
    "Stage 4",
    "Stage 5",
    "Stage 5_PreBallast",
    "Stage 6A_Critical",
    "Stage 6C",
    "Stage 7",
];

/// Per-stage draft/gate inputs from the external load-transfer result and
/// stage table.
#[derive(Debug, Clone, Copy)]
pub struct StageInput<'a> {
    pub stage_name: &'static str,
    pub initial_fwd_m: f64,
    pub initial_aft_m: f64,
    pub initial_trim_m: f64,
    pub gate_config: &'a GateConfig,
    pub tide: Option<&'a TideContext>,
}

/// Output of the solve-then-gate pipeline for one stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageResult {
    pub stage_name: String,
    pub new_fwd_m: f64,
    pub new_aft_m: f64,
    pub new_trim_m: f64,
    pub new_tmean_m: f64,
    pub delta_w_t: f64,
    pub per_tank_deltas: BTreeMap<String, f64>,
    pub gate_eval: GateEvaluation,
    pub hardstop_any: bool,
    pub infeasibility: Option<InfeasibilityReport>,
}

/// Run one stage against the registry, mutating it in place when the solved
/// plan is valid — applying deltas is atomic and all-or-nothing per stage.
///
/// A hard stop (hydro out of range, draft exceeding vessel depth, or a gate
/// `FAIL`) means the solved prediction is reported for diagnosis but the
/// registry is left unchanged, so the planner continues to subsequent
/// stages with the input drafts unchanged; this is applied uniformly to
/// every hard-stop class so a stage can never silently commit an invalid
/// plan.
pub fn run_stage(
    registry: &mut TankRegistry,
    input: &StageInput,
    hydro: &HydrostaticTable,
    objective: ObjectiveMode,
    params: SolverParams,
) -> StageResult {
    let snapshot = if FORWARD_INVENTORY_CONSTRAINED_STAGES.contains(&input.stage_name) {
        constrained_snapshot(registry)
    } else {
        registry.snapshot()
    };

    let solve_inputs = SolveInputs {
        hydro,
        tanks: &snapshot,
        initial_fwd_m: input.initial_fwd_m,
        initial_aft_m: input.initial_aft_m,
        initial_trim_m: input.initial_trim_m,
        gate_config: input.gate_config,
        tide: input.tide,
        objective,
        params,
    };

    match solve(&solve_inputs) {
        SolveOutcome::Done(plan) => {
            let gate_eval = evaluate(
                input.gate_config,
                plan.new_fwd_m,
                plan.new_aft_m,
                plan.new_trim_m,
                input.tide,
                plan.hydro_in_range,
            );
            if !gate_eval.hardstop {
                registry
                    .apply_deltas(&plan.per_tank_deltas)
                    .expect("solver only returns deltas within each tank's own bounds");
            }
            StageResult {
                stage_name: input.stage_name.to_string(),
                new_fwd_m: plan.new_fwd_m,
                new_aft_m: plan.new_aft_m,
                new_trim_m: plan.new_trim_m,
                new_tmean_m: plan.new_tmean_m,
                delta_w_t: if gate_eval.hardstop { 0.0 } else { plan.delta_w_t },
                per_tank_deltas: if gate_eval.hardstop { BTreeMap::new() } else { plan.per_tank_deltas },
                hardstop_any: gate_eval.hardstop,
                gate_eval,
                infeasibility: None,
            }
        }
        SolveOutcome::Infeasible(report) => {
            let initial_tmean_m = (input.initial_fwd_m + input.initial_aft_m) / 2.0;
            let hydro_point = hydro.interp(initial_tmean_m);
            let hydro_in_range = !hydro_point.clamped;
            let gate_eval = evaluate(
                input.gate_config,
                input.initial_fwd_m,
                input.initial_aft_m,
                input.initial_trim_m,
                input.tide,
                hydro_in_range,
            );
            StageResult {
                stage_name: input.stage_name.to_string(),
                new_fwd_m: input.initial_fwd_m,
                new_aft_m: input.initial_aft_m,
                new_trim_m: input.initial_trim_m,
                new_tmean_m: initial_tmean_m,
                delta_w_t: 0.0,
                per_tank_deltas: BTreeMap::new(),
                hardstop_any: false,
                gate_eval,
                infeasibility: Some(report),
            }
        }
    }
}
