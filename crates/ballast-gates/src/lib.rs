//! C5 — Gate Evaluator: predicted drafts, freeboard, UKC, tide margin;
//! captain gate (all stages) and charterer gate (critical stages only);
//! PASS/FAIL/LIMIT/VERIFY with margins and guard-band.

mod config;
mod outcome;

pub use config::{GateConfig, TideContext, DEFAULT_GUARD_BAND_M};
pub use outcome::GateOutcome;

use ballast_support::error::{GateKind, HardStopReason};

/// Everything the Gate Evaluator derives and decides for one stage.
#[derive(Debug, Clone, PartialEq)]
pub struct GateEvaluation {
    pub freeboard_fwd_m: f64,
    pub freeboard_aft_m: f64,
    pub freeboard_min_m: f64,

    pub ukc_fwd_m: Option<f64>,
    pub ukc_aft_m: Option<f64>,
    pub ukc_min_m: Option<f64>,
    pub tide_required_m: Option<f64>,
    pub tide_margin_m: Option<f64>,

    pub fwd_cd_m: f64,

    pub gate_captain: GateOutcome,
    pub gate_charterer: GateOutcome,
    pub gate_freeboard: GateOutcome,
    pub gate_ukc: GateOutcome,
    pub gate_trim: GateOutcome,
    pub tide_verdict: GateOutcome,

    pub hardstop: bool,
    pub hardstop_reason: Option<HardStopReason>,
}

/// Evaluate every gate for one stage's predicted drafts.
///
/// `hydro_in_range` and `draft_exceeds_vessel` carry the two hard-stop
/// conditions that originate outside the gate arithmetic itself; this
/// function folds them into the
/// combined `hardstop`/`hardstop_reason` alongside condition iii (any gate
/// `FAIL`).
pub fn evaluate(
    config: &GateConfig,
    new_fwd_m: f64,
    new_aft_m: f64,
    new_trim_m: f64,
    tide: Option<&TideContext>,
    hydro_in_range: bool,
) -> GateEvaluation {
    let guard = config.guard_band_m;

    let freeboard_fwd_m = config.d_vessel_m - new_fwd_m;
    let freeboard_aft_m = config.d_vessel_m - new_aft_m;
    let freeboard_min_m = freeboard_fwd_m.min(freeboard_aft_m);

    let forecast_tide_m = tide.map(|t| t.forecast_tide_m).unwrap_or(0.0);
    let fwd_cd_m = new_fwd_m - forecast_tide_m;

    let gate_captain = two_sided_gate(new_aft_m, config.aft_min_m, guard, Direction::AtLeast);

    let gate_charterer = if config.is_critical {
        two_sided_gate(fwd_cd_m, config.fwd_max_m, guard, Direction::AtMost)
    } else {
        GateOutcome::Na
    };

    let gate_freeboard = two_sided_gate(freeboard_min_m, config.freeboard_min_m, guard, Direction::AtLeast);

    let (ukc_fwd_m, ukc_aft_m, ukc_min_m, gate_ukc, tide_required_m, tide_margin_m, tide_verdict) =
        match tide {
            Some(tide) => {
                let available_depth_m = tide.depth_ref_m + tide.datum_offset_m + tide.forecast_tide_m;
                let ukc_fwd = available_depth_m - (new_fwd_m + tide.squat_m + tide.safety_allow_m);
                let ukc_aft = available_depth_m - (new_aft_m + tide.squat_m + tide.safety_allow_m);
                let ukc_min = ukc_fwd.min(ukc_aft);

                let gate_ukc_fwd = two_sided_gate(ukc_fwd, tide.ukc_min_m, guard, Direction::AtLeast);
                let gate_ukc_aft = two_sided_gate(ukc_aft, tide.ukc_min_m, guard, Direction::AtLeast);
                let gate_ukc = worst_of(gate_ukc_fwd, gate_ukc_aft);

                let d_ref = new_fwd_m.max(new_aft_m);
                let required = (d_ref + tide.squat_m + tide.safety_allow_m + tide.ukc_min_m
                    - tide.depth_ref_m
                    - tide.datum_offset_m)
                    .max(0.0);
                let margin = tide.forecast_tide_m - required;
                let verdict = two_sided_gate(margin, 0.0, guard, Direction::AtLeast);

                (Some(ukc_fwd), Some(ukc_aft), Some(ukc_min), gate_ukc, Some(required), Some(margin), verdict)
            }
            None => (None, None, None, GateOutcome::Verify, None, None, GateOutcome::Verify),
        };

    let gate_trim = match config.trim_abs_limit_m {
        Some(limit) => two_sided_gate(limit, new_trim_m.abs(), guard, Direction::AtLeast),
        None => GateOutcome::Na,
    };

    let failing_gate = [
        (GateKind::Captain, gate_captain),
        (GateKind::Charterer, gate_charterer),
        (GateKind::Freeboard, gate_freeboard),
        (GateKind::Ukc, gate_ukc),
        (GateKind::TrimLimit, gate_trim),
    ]
    .into_iter()
    .find(|(_, outcome)| *outcome == GateOutcome::Fail);

    let draft_exceeds_vessel = find_draft_exceeding_vessel(config.d_vessel_m, new_fwd_m, new_aft_m);

    let hardstop_reason = if !hydro_in_range {
        Some(HardStopReason::HydroOutOfRange)
    } else if let Some((end, draft_m)) = draft_exceeds_vessel {
        Some(HardStopReason::DraftExceedsVessel { end, draft_m, d_vessel_m: config.d_vessel_m })
    } else {
        failing_gate.map(|(gate, _)| HardStopReason::GateFailed(gate))
    };

    GateEvaluation {
        freeboard_fwd_m,
        freeboard_aft_m,
        freeboard_min_m,
        ukc_fwd_m,
        ukc_aft_m,
        ukc_min_m,
        tide_required_m,
        tide_margin_m,
        fwd_cd_m,
        gate_captain,
        gate_charterer,
        gate_freeboard,
        gate_ukc,
        gate_trim,
        tide_verdict,
        hardstop: hardstop_reason.is_some(),
        hardstop_reason,
    }
}

/// Numeric tolerance for the "draft exceeds vessel depth" hard stop.
const DRAFT_TOLERANCE_M: f64 = 1e-6;

fn find_draft_exceeding_vessel(d_vessel_m: f64, new_fwd_m: f64, new_aft_m: f64) -> Option<(&'static str, f64)> {
    if new_fwd_m > d_vessel_m + DRAFT_TOLERANCE_M {
        Some(("FWD", new_fwd_m))
    } else if new_aft_m > d_vessel_m + DRAFT_TOLERANCE_M {
        Some(("AFT", new_aft_m))
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// `value >= bound` is the strict pass condition.
    AtLeast,
    /// `value <= bound` is the strict pass condition.
    AtMost,
}

/// Resolve a single linear gate to `{OK, LIMIT, FAIL}` given a guard-band
/// slack. `Verify`/`Na` are decided by the caller, not
/// here, since those depend on context this function doesn't have.
fn two_sided_gate(value: f64, bound: f64, guard_band_m: f64, direction: Direction) -> GateOutcome {
    let (strict_ok, relaxed_ok) = match direction {
        Direction::AtLeast => (value >= bound, value >= bound - guard_band_m),
        Direction::AtMost => (value <= bound, value <= bound + guard_band_m),
    };
    if strict_ok {
        GateOutcome::Ok
    } else if relaxed_ok {
        GateOutcome::Limit
    } else {
        GateOutcome::Fail
    }
}

fn worst_of(a: GateOutcome, b: GateOutcome) -> GateOutcome {
    use GateOutcome::*;
    match (a, b) {
        (Fail, _) | (_, Fail) => Fail,
        (Limit, _) | (_, Limit) => Limit,
        (Verify, _) | (_, Verify) => Verify,
        (Na, Na) => Na,
        _ => Ok,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> GateConfig {
        GateConfig {
            fwd_max_m: 2.70,
            aft_min_m: 2.70,
            freeboard_min_m: 0.0,
            guard_band_m: DEFAULT_GUARD_BAND_M,
            trim_abs_limit_m: None,
            d_vessel_m: 3.65,
            is_critical: false,
        }
    }

    /// Scenario A — baseline pass.
    #[test]
    fn scenario_a_baseline_pass() {
        let config = GateConfig { aft_min_m: 2.70, fwd_max_m: 2.70, ..base_config() };
        let eval = evaluate(&config, 3.20, 3.45, 0.25, None, true);
        assert_eq!(eval.gate_captain, GateOutcome::Ok);
        assert_eq!(eval.gate_charterer, GateOutcome::Na);
        assert!((eval.freeboard_min_m - 0.20).abs() < 1e-9);
        assert!(!eval.hardstop);
    }

    /// Scenario B — critical stage forward-inventory success.
    #[test]
    fn scenario_b_critical_pass() {
        let config = GateConfig { aft_min_m: 2.70, fwd_max_m: 2.70, is_critical: true, ..base_config() };
        let eval = evaluate(&config, 1.27, 2.70, 1.43, None, true);
        assert_eq!(eval.gate_captain, GateOutcome::Ok);
        assert_eq!(eval.gate_charterer, GateOutcome::Ok);
        assert!(!eval.hardstop);
    }

    /// Scenario C — critical stage LIMIT outcome.
    #[test]
    fn scenario_c_limit_outcome() {
        let config = GateConfig { aft_min_m: 2.70, fwd_max_m: 2.70, is_critical: true, ..base_config() };
        let eval = evaluate(&config, 1.30, 2.69, 1.39, None, true);
        assert_eq!(eval.gate_captain, GateOutcome::Limit);
        assert!(!eval.hardstop, "LIMIT is not a hard stop");
    }

    /// A stage whose drafts cannot satisfy both captain and charterer gates
    /// at once reports FAIL, which is a hard stop.
    #[test]
    fn gate_fail_triggers_hardstop() {
        let config = GateConfig { aft_min_m: 2.70, fwd_max_m: 2.70, is_critical: true, ..base_config() };
        let eval = evaluate(&config, 2.80, 2.50, 0.0, None, true);
        assert_eq!(eval.gate_captain, GateOutcome::Fail);
        assert!(eval.hardstop);
    }

    /// Scenario F — tide shift.
    #[test]
    fn scenario_f_tide_shift() {
        let config = GateConfig { aft_min_m: 2.70, fwd_max_m: 2.70, ..base_config() };
        let tide = TideContext {
            forecast_tide_m: 1.5,
            depth_ref_m: 5.0,
            datum_offset_m: 0.0,
            ukc_min_m: 2.0,
            squat_m: 0.1,
            safety_allow_m: 0.2,
        };
        let eval = evaluate(&config, 3.20, 3.45, 0.25, Some(&tide), true);
        assert!((eval.ukc_min_m.unwrap() - 2.75).abs() < 1e-9);
        assert!((eval.tide_margin_m.unwrap() - 0.75).abs() < 1e-9);
        assert_eq!(eval.tide_verdict, GateOutcome::Ok);

        let tide_low = TideContext { forecast_tide_m: 0.05, ..tide };
        let eval_low = evaluate(&config, 3.20, 3.45, 0.25, Some(&tide_low), true);
        assert_eq!(eval_low.tide_verdict, GateOutcome::Fail);
        // Draft-only gates are unaffected by the tide change.
        assert_eq!(eval_low.gate_captain, eval.gate_captain);
    }

    #[test]
    fn missing_tide_context_is_verify_not_fail() {
        let config = base_config();
        let eval = evaluate(&config, 3.20, 3.45, 0.25, None, true);
        assert_eq!(eval.gate_ukc, GateOutcome::Verify);
        assert_eq!(eval.tide_verdict, GateOutcome::Verify);
    }

    #[test]
    fn hydro_out_of_range_is_hardstop() {
        let config = base_config();
        let eval = evaluate(&config, 3.20, 3.45, 0.25, None, false);
        assert!(eval.hardstop);
        assert_eq!(eval.hardstop_reason, Some(HardStopReason::HydroOutOfRange));
    }

    #[test]
    fn draft_exceeding_vessel_is_hardstop() {
        let config = base_config();
        let eval = evaluate(&config, 4.0, 3.45, 0.25, None, true);
        assert!(eval.hardstop);
        assert!(matches!(eval.hardstop_reason, Some(HardStopReason::DraftExceedsVessel { .. })));
    }

    #[test]
    fn charterer_gate_is_na_on_non_critical_stage() {
        let config = GateConfig { is_critical: false, ..base_config() };
        let eval = evaluate(&config, 1.0, 2.70, 1.0, None, true);
        assert_eq!(eval.gate_charterer, GateOutcome::Na, "never conceal FAIL as N/A; gate simply doesn't apply");
    }
}
