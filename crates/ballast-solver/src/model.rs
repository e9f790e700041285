use crate::draft::draft_delta;
use ballast_gates::{GateConfig, TideContext};
use ballast_hydro::HydroPoint;
use ballast_support::error::GateKind;
use ballast_tanks::TankSnapshot;
use good_lp::solvers::microlp::microlp;
use good_lp::{constraint, variable, variables, Expression, ResolutionError, Solution, SolverModel};
use std::collections::BTreeMap;

/// Which scalarisation the objective uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveMode {
    /// `Σ (p_i + n_i) / pump_rate_i · priority_weight_i` — the default.
    TimePreferring,
    /// `Σ (p_i + n_i) · priority_weight_i`.
    MassPreferring,
}

/// Which constraint class, if any, is loosened to a large slack for
/// infeasibility diagnosis by re-solving with that one gate relaxed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relax {
    None,
    Gate(GateKind),
}

/// A gate bound relaxed far enough that it can never bind, used only to
/// isolate which real gate caused an infeasible LP.
const LARGE_SLACK_M: f64 = 1.0e6;

pub struct LpRequest<'a> {
    pub hydro_point: &'a HydroPoint,
    pub tanks: &'a TankSnapshot,
    pub initial_fwd_m: f64,
    pub initial_aft_m: f64,
    pub initial_trim_m: f64,
    pub gate_config: &'a GateConfig,
    pub tide: Option<&'a TideContext>,
    pub objective: ObjectiveMode,
    pub guard_band_m: f64,
    pub relax: Relax,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LpSolution {
    pub per_tank_deltas: BTreeMap<String, f64>,
    pub new_fwd_m: f64,
    pub new_aft_m: f64,
    pub new_trim_m: f64,
    pub delta_w_t: f64,
}

struct TankVarHandle {
    tank_id: String,
    x_from_mid_m: f64,
    pump_rate_tph: f64,
    priority_weight: f64,
    p: good_lp::Variable,
    n: good_lp::Variable,
}

/// Build and solve the LP for one hydrostatic point: decision variables,
/// gate constraints, and the objective. Tank mode/capacity bounds are
/// baked into each variable's domain (`Tank::fill_upper`/`discharge_upper`)
/// rather than added as separate constraints, mirroring `good_lp`'s own
/// idiom of expressing simple bounds via `variable().min(..).max(..)`.
pub fn solve_lp(request: LpRequest) -> Result<LpSolution, ResolutionError> {
    let mut problem = variables!();
    let relax_tank_bounds = matches!(request.relax, Relax::Gate(GateKind::TankBounds | GateKind::ModeLock));

    let mut handles = Vec::with_capacity(request.tanks.len());
    for tank in request.tanks.iter() {
        let (fill_upper, discharge_upper) = if relax_tank_bounds {
            (tank.capacity_t, tank.capacity_t)
        } else {
            (tank.fill_upper(), tank.discharge_upper())
        };
        let p = problem.add(variable().min(0.0).max(fill_upper));
        let n = problem.add(variable().min(0.0).max(discharge_upper));
        handles.push(TankVarHandle {
            tank_id: tank.tank_id.clone(),
            x_from_mid_m: tank.x_from_mid_m,
            pump_rate_tph: tank.pump_rate_tph,
            priority_weight: tank.priority_weight,
            p,
            n,
        });
    }

    let delta_w: Expression = handles.iter().map(|h| h.p - h.n).sum();
    let delta_m: Expression = handles
        .iter()
        .map(|h| (h.p - h.n) * (h.x_from_mid_m - request.hydro_point.lcf_m))
        .sum();
    let delta_tmean = delta_w.clone() * (1.0 / (100.0 * request.hydro_point.tpc_t_per_cm));
    let delta_trim = delta_m.clone() * (1.0 / (100.0 * request.hydro_point.mtc_t_m_per_cm));

    let d_fwd: Expression = delta_tmean.clone() - delta_trim.clone() * 0.5 + request.initial_fwd_m;
    let d_aft: Expression = delta_tmean.clone() + delta_trim.clone() * 0.5 + request.initial_aft_m;

    let objective: Expression = match request.objective {
        ObjectiveMode::TimePreferring => handles
            .iter()
            .map(|h| (h.p + h.n) * (h.priority_weight / h.pump_rate_tph))
            .sum(),
        ObjectiveMode::MassPreferring => handles.iter().map(|h| (h.p + h.n) * h.priority_weight).sum(),
    };

    let guard = request.guard_band_m;
    let relax_gate = |gate: GateKind| matches!(request.relax, Relax::Gate(g) if g == gate);

    let mut model = problem.minimise(objective).using(microlp);

    let captain_slack = if relax_gate(GateKind::Captain) { LARGE_SLACK_M } else { guard };
    model = model.with(constraint!(d_aft.clone() >= request.gate_config.aft_min_m - captain_slack));

    if request.gate_config.is_critical {
        let forecast_tide_m = request.tide.map(|t| t.forecast_tide_m).unwrap_or(0.0);
        let charterer_slack = if relax_gate(GateKind::Charterer) { LARGE_SLACK_M } else { guard };
        model = model.with(constraint!(
            d_fwd.clone() - forecast_tide_m <= request.gate_config.fwd_max_m + charterer_slack
        ));
    }

    let freeboard_slack = if relax_gate(GateKind::Freeboard) { LARGE_SLACK_M } else { guard };
    model = model.with(constraint!(
        d_fwd.clone() <= request.gate_config.d_vessel_m - request.gate_config.freeboard_min_m + freeboard_slack
    ));
    model = model.with(constraint!(
        d_aft.clone() <= request.gate_config.d_vessel_m - request.gate_config.freeboard_min_m + freeboard_slack
    ));

    if let Some(tide) = request.tide {
        let ukc_slack = if relax_gate(GateKind::Ukc) { LARGE_SLACK_M } else { guard };
        let available_depth_m = tide.depth_ref_m + tide.datum_offset_m + tide.forecast_tide_m;
        let bound = available_depth_m - tide.squat_m - tide.safety_allow_m - tide.ukc_min_m + ukc_slack;
        model = model.with(constraint!(d_fwd.clone() <= bound));
        model = model.with(constraint!(d_aft.clone() <= bound));
    }

    if let Some(limit) = request.gate_config.trim_abs_limit_m {
        let trim_slack = if relax_gate(GateKind::TrimLimit) { LARGE_SLACK_M } else { guard };
        model = model.with(constraint!(
            delta_trim.clone() + request.initial_trim_m <= limit + trim_slack
        ));
        model = model.with(constraint!(
            delta_trim.clone() + request.initial_trim_m >= -(limit + trim_slack)
        ));
    }

    let solution = model.solve()?;

    let mut per_tank_deltas = BTreeMap::new();
    for handle in &handles {
        let delta = solution.value(handle.p) - solution.value(handle.n);
        if delta.abs() > 1e-9 {
            per_tank_deltas.insert(handle.tank_id.clone(), delta);
        }
    }

    let applied = draft_delta(
        request.hydro_point,
        per_tank_deltas.iter().map(|(id, delta)| {
            let x = handles.iter().find(|h| &h.tank_id == id).expect("delta came from a known handle").x_from_mid_m;
            (*delta, x)
        }),
        request.initial_fwd_m,
        request.initial_aft_m,
    );

    Ok(LpSolution {
        per_tank_deltas,
        new_fwd_m: applied.new_fwd_m,
        new_aft_m: applied.new_aft_m,
        new_trim_m: request.initial_trim_m + applied.delta_trim_m,
        delta_w_t: applied.delta_w_t,
    })
}
