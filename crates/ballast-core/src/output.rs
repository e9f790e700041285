use crate::StageResult;
use ballast_gates::GateOutcome;
use serde::Serialize;
use std::collections::BTreeMap;

/// One (stage, tank) row with a non-zero delta.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BallastPlanRow {
    #[serde(rename = "Stage")]
    pub stage: String,
    #[serde(rename = "Tank")]
    pub tank: String,
    #[serde(rename = "Action")]
    pub action: &'static str,
    #[serde(rename = "Delta_t")]
    pub delta_t: f64,
    #[serde(rename = "PumpTime_h")]
    pub pump_time_h: f64,
}

/// `pump_rates` maps tank id to `pump_rate_tph`, captured once after
/// overrides are applied (pump rate does not change across stages).
pub fn ballast_plan_rows(results: &[StageResult], pump_rates: &BTreeMap<String, f64>) -> Vec<BallastPlanRow> {
    let mut rows = Vec::new();
    for result in results {
        for (tank, delta) in &result.per_tank_deltas {
            let pump_rate_tph = pump_rates.get(tank).copied().unwrap_or(1.0);
            rows.push(BallastPlanRow {
                stage: result.stage_name.clone(),
                tank: tank.clone(),
                action: if *delta >= 0.0 { "Fill" } else { "Discharge" },
                delta_t: *delta,
                pump_time_h: delta.abs() / pump_rate_tph,
            });
        }
    }
    rows
}

/// One row per stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageSummaryRow {
    #[serde(rename = "Stage")]
    pub stage: String,
    #[serde(rename = "New_FWD_m")]
    pub new_fwd_m: f64,
    #[serde(rename = "New_AFT_m")]
    pub new_aft_m: f64,
    #[serde(rename = "New_Trim_m")]
    pub new_trim_m: f64,
    #[serde(rename = "DeltaW_t")]
    pub delta_w_t: f64,
    #[serde(rename = "Gate_FWD_Max")]
    pub gate_fwd_max: String,
    #[serde(rename = "Gate_AFT_Min")]
    pub gate_aft_min: String,
    #[serde(rename = "Gate_Freeboard")]
    pub gate_freeboard: String,
    #[serde(rename = "Gate_UKC")]
    pub gate_ukc: String,
    #[serde(rename = "Freeboard_Min_m")]
    pub freeboard_min_m: f64,
    #[serde(rename = "UKC_Min_m")]
    pub ukc_min_m: Option<f64>,
    #[serde(rename = "Tide_Required_m")]
    pub tide_required_m: Option<f64>,
    #[serde(rename = "Tide_Margin_m")]
    pub tide_margin_m: Option<f64>,
    #[serde(rename = "Tide_Verdict")]
    pub tide_verdict: String,
    #[serde(rename = "HardStop")]
    pub hardstop: bool,
}

pub fn stage_summary_rows(results: &[StageResult]) -> Vec<StageSummaryRow> {
    results
        .iter()
        .map(|r| StageSummaryRow {
            stage: r.stage_name.clone(),
            new_fwd_m: r.new_fwd_m,
            new_aft_m: r.new_aft_m,
            new_trim_m: r.new_trim_m,
            delta_w_t: r.delta_w_t,
            gate_fwd_max: gate_outcome_str(r.gate_eval.gate_charterer).to_string(),
            gate_aft_min: gate_outcome_str(r.gate_eval.gate_captain).to_string(),
            gate_freeboard: gate_outcome_str(r.gate_eval.gate_freeboard).to_string(),
            gate_ukc: gate_outcome_str(r.gate_eval.gate_ukc).to_string(),
            freeboard_min_m: r.gate_eval.freeboard_min_m,
            ukc_min_m: r.gate_eval.ukc_min_m,
            tide_required_m: r.gate_eval.tide_required_m,
            tide_margin_m: r.gate_eval.tide_margin_m,
            tide_verdict: gate_outcome_str(r.gate_eval.tide_verdict).to_string(),
            hardstop: r.hardstop_any,
        })
        .collect()
}

fn gate_outcome_str(outcome: GateOutcome) -> &'static str {
    match outcome {
        GateOutcome::Ok => "OK",
        GateOutcome::Limit => "LIMIT",
        GateOutcome::Fail => "FAIL",
        GateOutcome::Verify => "VERIFY",
        GateOutcome::Na => "N/A",
    }
}

/// QA row for one (stage, draft source) pair. The 2.70 m split gates are a
/// fixed contractual reference check, independent of whatever
/// `FWD_MAX_m`/`AFT_MIN_m` the stage table or site profile configures for
/// the real gate evaluation above.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QaRow {
    #[serde(rename = "Stage")]
    pub stage: String,
    #[serde(rename = "Draft_Source")]
    pub draft_source: &'static str,
    #[serde(rename = "FWD_m")]
    pub fwd_m: f64,
    #[serde(rename = "AFT_m")]
    pub aft_m: f64,
    #[serde(rename = "GateA_AFT_MIN_2p70_")]
    pub gate_a_aft_min_2p70: String,
    #[serde(rename = "GateB_FWD_MAX_2p70_critical_only_")]
    pub gate_b_fwd_max_2p70_critical_only: String,
}

const QA_REFERENCE_DRAFT_M: f64 = 2.70;

pub fn qa_table_rows(results: &[StageResult], raw_drafts: &[(f64, f64)], is_critical: &[bool], guard_band_m: f64) -> Vec<QaRow> {
    let mut rows = Vec::with_capacity(results.len() * 2);
    for ((result, &(raw_fwd, raw_aft)), &critical) in results.iter().zip(raw_drafts).zip(is_critical) {
        rows.push(QaRow {
            stage: result.stage_name.clone(),
            draft_source: "raw",
            fwd_m: raw_fwd,
            aft_m: raw_aft,
            gate_a_aft_min_2p70: split_gate_at_least(raw_aft, QA_REFERENCE_DRAFT_M, guard_band_m),
            gate_b_fwd_max_2p70_critical_only: if critical {
                split_gate_at_most(raw_fwd, QA_REFERENCE_DRAFT_M, guard_band_m)
            } else {
                "N/A".to_string()
            },
        });
        rows.push(QaRow {
            stage: result.stage_name.clone(),
            draft_source: "solver",
            fwd_m: result.new_fwd_m,
            aft_m: result.new_aft_m,
            gate_a_aft_min_2p70: split_gate_at_least(result.new_aft_m, QA_REFERENCE_DRAFT_M, guard_band_m),
            gate_b_fwd_max_2p70_critical_only: if critical {
                split_gate_at_most(result.new_fwd_m, QA_REFERENCE_DRAFT_M, guard_band_m)
            } else {
                "N/A".to_string()
            },
        });
    }
    rows
}

fn split_gate_at_least(value: f64, bound: f64, guard_band_m: f64) -> String {
    if value >= bound {
        "OK".to_string()
    } else if value >= bound - guard_band_m {
        "LIMIT".to_string()
    } else {
        "FAIL".to_string()
    }
}

fn split_gate_at_most(value: f64, bound: f64, guard_band_m: f64) -> String {
    if value <= bound {
        "OK".to_string()
    } else if value <= bound + guard_band_m {
        "LIMIT".to_string()
    } else {
        "FAIL".to_string()
    }
}
