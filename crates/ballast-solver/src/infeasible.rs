use crate::model::{self, LpRequest, ObjectiveMode, Relax};
use ballast_gates::{GateConfig, TideContext};
use ballast_hydro::HydroPoint;
use ballast_support::error::{GateKind, RelaxationCandidate};
use ballast_tanks::TankSnapshot;

/// A gate class considered during infeasibility diagnosis, in the order
/// operators prefer to weaken them — try the least-critical gate first.
pub const RELAXATION_AXES: &[RelaxationAxis] = &[
    RelaxationAxis { gate: GateKind::Freeboard, description: "relax freeboard minimum" },
    RelaxationAxis { gate: GateKind::Ukc, description: "relax UKC minimum" },
    RelaxationAxis { gate: GateKind::TrimLimit, description: "relax trim limit" },
    RelaxationAxis { gate: GateKind::Charterer, description: "relax FWD_MAX (charterer gate)" },
    RelaxationAxis { gate: GateKind::Captain, description: "relax AFT_MIN (captain gate)" },
    RelaxationAxis { gate: GateKind::ModeLock, description: "unblock a restricted tank's mode" },
    RelaxationAxis { gate: GateKind::TankBounds, description: "widen a tank's operational bounds" },
];

#[derive(Debug, Clone, Copy)]
pub struct RelaxationAxis {
    pub gate: GateKind,
    pub description: &'static str,
}

/// Re-solve with each gate individually relaxed to a large slack and report
/// which relaxations restore feasibility, in operational-preference order.
/// No gate is silently dropped from the returned plan — this function only
/// probes what *would* restore feasibility, it does not change the plan
/// that was actually reported infeasible.
#[allow(clippy::too_many_arguments)]
pub fn diagnose_infeasibility(
    hydro_point: &HydroPoint,
    tanks: &TankSnapshot,
    initial_fwd_m: f64,
    initial_aft_m: f64,
    initial_trim_m: f64,
    gate_config: &GateConfig,
    tide: Option<&TideContext>,
    objective: ObjectiveMode,
    guard_band_m: f64,
) -> Vec<RelaxationCandidate> {
    let mut candidates = Vec::new();
    for axis in RELAXATION_AXES {
        let outcome = model::solve_lp(LpRequest {
            hydro_point,
            tanks,
            initial_fwd_m,
            initial_aft_m,
            initial_trim_m,
            gate_config,
            tide,
            objective,
            guard_band_m,
            relax: Relax::Gate(axis.gate),
        });
        if outcome.is_ok() {
            candidates.push(RelaxationCandidate {
                gate: axis.gate,
                description: axis.description.to_string(),
            });
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballast_hydro::{HydroRow, HydrostaticTable};
    use ballast_tanks::{TankRegistry, TankRow};

    #[test]
    fn charterer_vs_captain_conflict_names_both_draft_gates_as_relaxation_candidates() {
        let hydro = HydrostaticTable::from_rows(vec![
            HydroRow { tmean_m: 1.0, disp_t: 4000.0, lcf_m: 0.0, tpc_t_per_cm: 30.0, mtc_t_m_per_cm: 120.0, km_m: None, gm_min_m: None },
            HydroRow { tmean_m: 4.0, disp_t: 16000.0, lcf_m: 0.5, tpc_t_per_cm: 32.0, mtc_t_m_per_cm: 130.0, km_m: None, gm_min_m: None },
        ])
        .unwrap();
        let point = hydro.interp(2.65);
        let tanks = TankRegistry::from_rows(vec![TankRow {
            tank: "FWB1.P".into(), capacity_t: 20.0, x_from_mid_m: -25.0, current_t: 10.0,
            min_t: 0.0, max_t: 20.0, mode: "FILL_DISCHARGE".into(), use_flag: "Y".into(),
            pump_rate_tph: 50.0, priority_weight: 1.0,
        }])
        .unwrap()
        .snapshot();
        let config = GateConfig {
            fwd_max_m: 2.70, aft_min_m: 2.70, freeboard_min_m: 0.0,
            guard_band_m: ballast_gates::DEFAULT_GUARD_BAND_M, trim_abs_limit_m: None,
            d_vessel_m: 3.65, is_critical: true,
        };
        let candidates = diagnose_infeasibility(&point, &tanks, 2.80, 2.50, -0.30, &config, None, ObjectiveMode::TimePreferring, config.guard_band_m);
        assert!(candidates.iter().any(|c| c.gate == GateKind::Charterer || c.gate == GateKind::Captain));
    }
}
