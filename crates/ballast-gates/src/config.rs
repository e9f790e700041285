/// Default guard-band slack applied to every gate unless a site profile
/// overrides it.
pub const DEFAULT_GUARD_BAND_M: f64 = 0.02;

/// Tide/bathymetry inputs required to evaluate the UKC gate and the
/// charterer gate's Chart-Datum conversion. When absent, the UKC gate
/// reports `Verify` and the charterer gate falls back to a zero tide
/// offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TideContext {
    pub forecast_tide_m: f64,
    pub depth_ref_m: f64,
    pub datum_offset_m: f64,
    pub ukc_min_m: f64,
    pub squat_m: f64,
    pub safety_allow_m: f64,
}

/// Per-stage gate parameters, resolved by the stage planner from the stage
/// table and any site-profile overrides before calling [`crate::evaluate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateConfig {
    pub fwd_max_m: f64,
    pub aft_min_m: f64,
    pub freeboard_min_m: f64,
    pub guard_band_m: f64,
    pub trim_abs_limit_m: Option<f64>,
    pub d_vessel_m: f64,
    /// Whether the charterer gate (FWD_MAX) applies at this stage.
    pub is_critical: bool,
}
