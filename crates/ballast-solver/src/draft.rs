use ballast_hydro::HydroPoint;

/// Result of applying a set of tank deltas to initial drafts: weight/moment
/// change about LCF, the resulting mean-draft and trim change, and the new
/// forward/aft drafts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DraftDelta {
    pub delta_w_t: f64,
    pub delta_m_t: f64,
    pub delta_tmean_m: f64,
    pub delta_trim_m: f64,
    pub new_fwd_m: f64,
    pub new_aft_m: f64,
}

/// LCF-based draft prediction: `ΔW = Σ Δw_i`, `ΔM = Σ Δw_i·(x_i − LCF)`,
/// `ΔTmean = ΔW/(100·TPC)`, `ΔTrim = ΔM/(100·MTC)` positive stern-down,
/// `D_fwd = D_fwd0 + ΔTmean − ΔTrim/2`, `D_aft = D_aft0 + ΔTmean + ΔTrim/2`.
pub fn draft_delta(
    hydro: &HydroPoint,
    deltas: impl Iterator<Item = (f64, f64)>,
    initial_fwd_m: f64,
    initial_aft_m: f64,
) -> DraftDelta {
    let mut delta_w_t = 0.0;
    let mut delta_m_t = 0.0;
    for (delta, x_from_mid_m) in deltas {
        delta_w_t += delta;
        delta_m_t += delta * (x_from_mid_m - hydro.lcf_m);
    }
    let delta_tmean_m = delta_w_t / (100.0 * hydro.tpc_t_per_cm);
    let delta_trim_m = delta_m_t / (100.0 * hydro.mtc_t_m_per_cm);
    DraftDelta {
        delta_w_t,
        delta_m_t,
        delta_tmean_m,
        delta_trim_m,
        new_fwd_m: initial_fwd_m + delta_tmean_m - delta_trim_m / 2.0,
        new_aft_m: initial_aft_m + delta_tmean_m + delta_trim_m / 2.0,
    }
}
