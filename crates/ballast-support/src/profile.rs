//! Site profile configuration. Recognised options are explicit, enumerated
//! fields; unknown keys are rejected at load time rather than silently
//! ignored.

use crate::error::InputError;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Per-tank override, merged onto the base tank registry row. Every field
/// is optional: only fields present in the profile override the
/// registry's base value.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct TankOverride {
    pub mode: Option<String>,
    pub use_flag: Option<String>,
    pub pump_rate_tph: Option<f64>,
    pub min_t: Option<f64>,
    pub max_t: Option<f64>,
    pub priority_weight: Option<f64>,
}

impl TankOverride {
    pub fn is_empty(&self) -> bool {
        self == &TankOverride::default()
    }
}

/// Recognised site-profile options. CLI overrides take precedence over
/// these values; these take precedence over built-in defaults.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct SiteProfile {
    pub fwd_max_m: Option<f64>,
    pub aft_min_m: Option<f64>,
    pub trim_abs_limit_m: Option<f64>,
    pub freeboard_min_m: Option<f64>,
    pub gate_guard_band_cm: Option<f64>,
    pub ukc_min_m: Option<f64>,
    pub critical_stage_regex: Option<String>,
    pub critical_stage_list: Option<Vec<String>>,
    #[serde(default)]
    pub tank_overrides: BTreeMap<String, TankOverride>,
}

impl SiteProfile {
    /// Parse from TOML text. Unknown top-level or nested keys are an
    /// `InputError`, not a silently-ignored field.
    pub fn from_toml_str(text: &str) -> Result<Self, InputError> {
        Ok(toml::from_str(text)?)
    }
}

/// Resolve the override that applies to `tank_id`: exact tank-id matches
/// take precedence over base-name matches. A base-name
/// match (e.g. `FWB1`) distributes symmetrically across `.P`/`.S` siblings
/// unless an exact-match entry for one side makes the override explicitly
/// asymmetric.
pub fn resolve_tank_override<'a>(tank_id: &str, profile: &'a SiteProfile) -> Option<&'a TankOverride> {
    if let Some(exact) = profile.tank_overrides.get(tank_id) {
        return Some(exact);
    }
    let base = base_name(tank_id);
    profile.tank_overrides.get(base)
}

/// Strip a trailing `.P` or `.S` side suffix, returning the base tank name.
pub fn base_name(tank_id: &str) -> &str {
    tank_id
        .strip_suffix(".P")
        .or_else(|| tank_id.strip_suffix(".S"))
        .unwrap_or(tank_id)
}
