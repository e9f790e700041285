use crate::stage_table::StageRow;
use ballast_gates::{GateConfig, DEFAULT_GUARD_BAND_M};
use ballast_support::profile::SiteProfile;

/// CLI-level overrides, taking precedence over the site profile which in
/// turn takes precedence over built-in defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct CliOverrides {
    pub fwd_max_m: Option<f64>,
    pub aft_min_m: Option<f64>,
    pub freeboard_min_m: Option<f64>,
    pub guard_band_m: Option<f64>,
    pub trim_abs_limit_m: Option<f64>,
}

/// Merge stage-table, site-profile, and CLI values into one [`GateConfig`]
/// for a stage. Precedence is CLI > profile > built-in default; the stage
/// table's own `FWD_MAX_m`/`AFT_MIN_m`/`D_vessel_m` take precedence over
/// the profile's global defaults since they are the more specific,
/// per-stage source.
///
/// The UKC bound (`profile.ukc_min_m`) isn't part of this struct — it
/// feeds into the tide context instead, via
/// [`StageRow::tide_context`](crate::stage_table::StageRow::tide_context),
/// since UKC only ever applies through that context.
pub fn resolve_gate_config(stage_row: &StageRow, profile: &SiteProfile, cli: &CliOverrides, is_critical: bool) -> GateConfig {
    GateConfig {
        fwd_max_m: cli.fwd_max_m.unwrap_or(stage_row.fwd_max_m),
        aft_min_m: cli.aft_min_m.unwrap_or(stage_row.aft_min_m),
        freeboard_min_m: cli.freeboard_min_m.or(profile.freeboard_min_m).unwrap_or(0.0),
        guard_band_m: cli
            .guard_band_m
            .or(profile.gate_guard_band_cm.map(|cm| cm / 100.0))
            .unwrap_or(DEFAULT_GUARD_BAND_M),
        trim_abs_limit_m: cli.trim_abs_limit_m.or(profile.trim_abs_limit_m),
        d_vessel_m: stage_row.d_vessel_m,
        is_critical,
    }
}
