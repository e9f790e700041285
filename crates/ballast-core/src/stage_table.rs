use ballast_gates::TideContext;
use ballast_support::error::InputError;
use ballast_stage::STAGE_SEQUENCE;
use serde::Deserialize;

/// Raw stage-table row. Tide/UKC columns are optional — their absence
/// means the UKC gate reports `Verify` for that stage.
#[derive(Debug, Clone, Deserialize)]
pub struct StageRow {
    #[serde(rename = "Stage")]
    pub stage: String,
    #[serde(rename = "Current_FWD_m")]
    pub current_fwd_m: f64,
    #[serde(rename = "Current_AFT_m")]
    pub current_aft_m: f64,
    #[serde(rename = "FWD_MAX_m")]
    pub fwd_max_m: f64,
    #[serde(rename = "AFT_MIN_m")]
    pub aft_min_m: f64,
    #[serde(rename = "D_vessel_m")]
    pub d_vessel_m: f64,
    #[serde(rename = "Forecast_Tide_m")]
    pub forecast_tide_m: Option<f64>,
    #[serde(rename = "DepthRef_m")]
    pub depth_ref_m: Option<f64>,
    #[serde(rename = "DatumOffset_m")]
    pub datum_offset_m: Option<f64>,
    #[serde(rename = "UKC_Min_m")]
    pub ukc_min_m: Option<f64>,
    #[serde(rename = "Squat_m")]
    pub squat_m: Option<f64>,
    #[serde(rename = "SafetyAllow_m")]
    pub safety_allow_m: Option<f64>,
}

impl StageRow {
    /// Build this row's tide context if every required field was supplied;
    /// a partially-specified tide context is treated the same as an absent
    /// one (the UKC gate needs all of them to mean anything). `UKC_Min_m`
    /// falls back to the site profile's `ukc_min_m` when this row doesn't
    /// set its own, since UKC policy is usually a site-wide constant rather
    /// than a per-stage one.
    pub fn tide_context(&self, profile_ukc_min_m: Option<f64>) -> Option<TideContext> {
        Some(TideContext {
            forecast_tide_m: self.forecast_tide_m?,
            depth_ref_m: self.depth_ref_m?,
            datum_offset_m: self.datum_offset_m.unwrap_or(0.0),
            ukc_min_m: self.ukc_min_m.or(profile_ukc_min_m)?,
            squat_m: self.squat_m.unwrap_or(0.0),
            safety_allow_m: self.safety_allow_m.unwrap_or(0.0),
        })
    }
}

/// Validate a stage table: exactly the 9 fixed stage names, each exactly
/// once, returned in [`STAGE_SEQUENCE`] order regardless of input order.
pub fn order_stage_table(rows: Vec<StageRow>) -> Result<Vec<StageRow>, InputError> {
    if rows.len() != STAGE_SEQUENCE.len() {
        return Err(InputError::BadStageCount(rows.len()));
    }
    let mut ordered = Vec::with_capacity(STAGE_SEQUENCE.len());
    for &name in STAGE_SEQUENCE {
        let row = rows
            .iter()
            .find(|r| r.stage == name)
            .ok_or_else(|| InputError::MissingStage(name.to_string()))?;
        ordered.push(row.clone());
    }
    Ok(ordered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(stage: &str) -> StageRow {
        StageRow {
            stage: stage.to_string(),
            current_fwd_m: 3.2, current_aft_m: 3.45, fwd_max_m: 2.70, aft_min_m: 2.70, d_vessel_m: 3.65,
            forecast_tide_m: None, depth_ref_m: None, datum_offset_m: None, ukc_min_m: None, squat_m: None, safety_allow_m: None,
        }
    }

    #[test]
    fn orders_rows_regardless_of_input_order() {
        let mut rows: Vec<StageRow> = STAGE_SEQUENCE.iter().map(|s| row(s)).collect();
        rows.reverse();
        let ordered = order_stage_table(rows).unwrap();
        let names: Vec<&str> = ordered.iter().map(|r| r.stage.as_str()).collect();
        assert_eq!(names, STAGE_SEQUENCE);
    }

    #[test]
    fn rejects_wrong_row_count() {
        let rows = vec![row("Stage 1")];
        assert!(order_stage_table(rows).is_err());
    }

    #[test]
    fn rejects_missing_fixed_stage() {
        let mut rows: Vec<StageRow> = STAGE_SEQUENCE.iter().map(|s| row(s)).collect();
        rows[0].stage = "Stage 1 (typo)".to_string();
        assert!(order_stage_table(rows).is_err());
    }

    #[test]
    fn tide_context_requires_all_core_fields() {
        let mut r = row("Stage 1");
        r.forecast_tide_m = Some(1.0);
        assert!(r.tide_context(None).is_none(), "missing depth_ref/ukc_min means no tide context");
        r.depth_ref_m = Some(10.0);
        r.ukc_min_m = Some(2.0);
        assert!(r.tide_context(None).is_some());
    }

    #[test]
    fn tide_context_falls_back_to_profile_ukc_min() {
        let mut r = row("Stage 1");
        r.forecast_tide_m = Some(1.0);
        r.depth_ref_m = Some(10.0);
        assert!(r.tide_context(None).is_none(), "no row or profile UKC_Min means no tide context");
        let ctx = r.tide_context(Some(2.0)).expect("profile UKC_Min_m should fill the gap");
        assert_eq!(ctx.ukc_min_m, 2.0);

        r.ukc_min_m = Some(3.5);
        let ctx = r.tide_context(Some(2.0)).expect("row UKC_Min_m still present");
        assert_eq!(ctx.ukc_min_m, 3.5, "row value wins over the profile fallback");
    }
}
