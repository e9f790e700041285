//! C4 — LP Ballast Solver: for one stage, chooses per-tank fill/discharge
//! deltas satisfying every gate simultaneously, re-interpolating hydrostatics
//! until draft predictions converge.
//!
//! The convergence loop re-solves an LP until the assumed mean draft stops
//! changing; it is bounded, synchronous, and keeps no state between calls
//! other than the loop variable itself.

mod draft;
mod infeasible;
mod model;

pub use draft::draft_delta;
pub use infeasible::{diagnose_infeasibility, RelaxationAxis};
pub use model::ObjectiveMode;

use ballast_gates::{GateConfig, TideContext};
use ballast_hydro::HydrostaticTable;
use ballast_support::error::{InfeasibilityReason, InfeasibilityReport};
use ballast_tanks::TankSnapshot;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Tunables for one `solve` call.
#[derive(Debug, Clone, Copy)]
pub struct SolverParams {
    pub guard_band_m: f64,
    pub iterate_hydro_max: u32,
    pub hydro_convergence_tol_m: f64,
    pub wall_clock_budget: Duration,
}

impl Default for SolverParams {
    fn default() -> Self {
        SolverParams {
            guard_band_m: ballast_gates::DEFAULT_GUARD_BAND_M,
            iterate_hydro_max: 2,
            hydro_convergence_tol_m: 0.005,
            wall_clock_budget: Duration::from_secs(10),
        }
    }
}

/// Everything needed to solve one stage.
#[derive(Debug, Clone, Copy)]
pub struct SolveInputs<'a> {
    pub hydro: &'a HydrostaticTable,
    pub tanks: &'a TankSnapshot,
    pub initial_fwd_m: f64,
    pub initial_aft_m: f64,
    pub initial_trim_m: f64,
    pub gate_config: &'a GateConfig,
    pub tide: Option<&'a TideContext>,
    pub objective: ObjectiveMode,
    pub params: SolverParams,
}

/// A converged, feasible stage solution.
#[derive(Debug, Clone, PartialEq)]
pub struct SolvedPlan {
    pub per_tank_deltas: BTreeMap<String, f64>,
    pub new_fwd_m: f64,
    pub new_aft_m: f64,
    pub new_trim_m: f64,
    pub new_tmean_m: f64,
    pub delta_w_t: f64,
    pub hydro_in_range: bool,
    pub iterations: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    Done(SolvedPlan),
    Infeasible(InfeasibilityReport),
}

/// Solve one stage: `LOADED → HYDRO_INTERP → LP_SOLVED → (converged? DONE :
/// HYDRO_INTERP)`, terminal `DONE` or `INFEASIBLE`.
pub fn solve(inputs: &SolveInputs) -> SolveOutcome {
    let deadline = Instant::now() + inputs.params.wall_clock_budget;
    let mut assumed_tmean_m = mean_draft(inputs.initial_fwd_m, inputs.initial_aft_m);
    let mut iterations = 0u32;

    loop {
        if Instant::now() >= deadline {
            tracing::warn!(target: "solver", "solver_wall_clock_budget_exceeded");
            return SolveOutcome::Infeasible(InfeasibilityReport {
                reason: InfeasibilityReason::SolverTimeout,
                relaxation_candidates: Vec::new(),
            });
        }

        let hydro_point = inputs.hydro.interp(assumed_tmean_m);
        iterations += 1;

        let outcome = model::solve_lp(model::LpRequest {
            hydro_point: &hydro_point,
            tanks: inputs.tanks,
            initial_fwd_m: inputs.initial_fwd_m,
            initial_aft_m: inputs.initial_aft_m,
            initial_trim_m: inputs.initial_trim_m,
            gate_config: inputs.gate_config,
            tide: inputs.tide,
            objective: inputs.objective,
            guard_band_m: inputs.params.guard_band_m,
            relax: model::Relax::None,
        });

        let solution = match outcome {
            Ok(solution) => solution,
            Err(_resolution_error) => {
                let candidates = diagnose_infeasibility(
                    &hydro_point,
                    inputs.tanks,
                    inputs.initial_fwd_m,
                    inputs.initial_aft_m,
                    inputs.initial_trim_m,
                    inputs.gate_config,
                    inputs.tide,
                    inputs.objective,
                    inputs.params.guard_band_m,
                );
                return SolveOutcome::Infeasible(InfeasibilityReport {
                    reason: InfeasibilityReason::GateConflict,
                    relaxation_candidates: candidates,
                });
            }
        };

        let new_tmean_m = mean_draft(solution.new_fwd_m, solution.new_aft_m);
        let delta = (new_tmean_m - assumed_tmean_m).abs();
        tracing::debug!(
            target: "solver",
            iteration = iterations,
            assumed_tmean_m,
            new_tmean_m,
            delta_m = delta,
            "hydro_iteration"
        );

        let converged = delta <= inputs.params.hydro_convergence_tol_m;
        if converged || iterations > inputs.params.iterate_hydro_max {
            // `interp` clamps its returned point to the nearest row when the
            // query falls outside the table, so `disp_t` alone can never look
            // out of range; `clamped` is the only signal that it actually was.
            let hydro_in_range = !hydro_point.clamped;
            return SolveOutcome::Done(SolvedPlan {
                per_tank_deltas: solution.per_tank_deltas,
                new_fwd_m: solution.new_fwd_m,
                new_aft_m: solution.new_aft_m,
                new_trim_m: solution.new_trim_m,
                new_tmean_m,
                delta_w_t: solution.delta_w_t,
                hydro_in_range,
                iterations,
            });
        }

        assumed_tmean_m = new_tmean_m;
    }
}

fn mean_draft(fwd_m: f64, aft_m: f64) -> f64 {
    (fwd_m + aft_m) / 2.0
}
