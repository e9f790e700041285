//! C1 — Hydrostatic Table: an immutable reference mapping mean draft to
//! displacement, LCF, TPC, MTC, KM, and GM_required, with linear
//! interpolation.
//!
//! The table is loaded once per run, via a single `from_rows`, and never
//! mutated afterward — every other accessor is read-only.

use ballast_support::error::InputError;
use serde::Deserialize;

/// One row of the hydrostatic table. `KM_m`/`GM_min_m` are optional.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct HydroRow {
    #[serde(rename = "Tmean_m")]
    pub tmean_m: f64,
    #[serde(rename = "Disp_t")]
    pub disp_t: f64,
    #[serde(rename = "LCF_m")]
    pub lcf_m: f64,
    #[serde(rename = "TPC_t_per_cm")]
    pub tpc_t_per_cm: f64,
    #[serde(rename = "MTC_t_m_per_cm")]
    pub mtc_t_m_per_cm: f64,
    #[serde(rename = "KM_m")]
    pub km_m: Option<f64>,
    #[serde(rename = "GM_min_m")]
    pub gm_min_m: Option<f64>,
}

/// Interpolated (or clamped) hydrostatic quantities at a given mean draft.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HydroPoint {
    pub tmean_m: f64,
    pub disp_t: f64,
    pub lcf_m: f64,
    pub tpc_t_per_cm: f64,
    pub mtc_t_m_per_cm: f64,
    pub km_m: Option<f64>,
    pub gm_min_m: Option<f64>,
    /// Set when the query fell outside the table range and was clamped to
    /// the nearest endpoint.
    pub clamped: bool,
}

/// Immutable, sorted-ascending hydrostatic table.
#[derive(Debug, Clone)]
pub struct HydrostaticTable {
    rows: Vec<HydroRow>,
}

impl HydrostaticTable {
    /// Build a table from rows in any order. Rows are sorted ascending by
    /// `tmean_m`; duplicate `tmean_m` entries are collapsed by keeping the
    /// earlier (first-seen, pre-sort) row.
    ///
    /// Rejects tables with fewer than two rows at load time.
    pub fn from_rows(mut rows: Vec<HydroRow>) -> Result<Self, InputError> {
        if rows.len() < 2 {
            return Err(InputError::HydroTableTooShort(rows.len()));
        }
        // Stable sort preserves first-seen order among equal keys, so the
        // subsequent dedup keeps the earlier row for duplicate tmean_m.
        rows.sort_by(|a, b| a.tmean_m.partial_cmp(&b.tmean_m).unwrap());
        let mut deduped: Vec<HydroRow> = Vec::with_capacity(rows.len());
        for row in rows {
            if deduped.last().map(|last| last.tmean_m) == Some(row.tmean_m) {
                continue;
            }
            deduped.push(row);
        }
        if deduped.len() < 2 {
            return Err(InputError::HydroTableTooShort(deduped.len()));
        }
        Ok(Self { rows: deduped })
    }

    pub fn rows(&self) -> &[HydroRow] {
        &self.rows
    }

    /// Linear interpolation, pure and total: clamps to the nearest endpoint
    /// outside the table range.
    pub fn interp(&self, tmean_m: f64) -> HydroPoint {
        let first = self.rows[0];
        let last = *self.rows.last().unwrap();

        if tmean_m <= first.tmean_m {
            if tmean_m < first.tmean_m {
                tracing::debug!(target: "hydro", tmean_m, table_min = first.tmean_m, "clamped_below_range");
            }
            return point_from_row(first, tmean_m < first.tmean_m);
        }
        if tmean_m >= last.tmean_m {
            if tmean_m > last.tmean_m {
                tracing::debug!(target: "hydro", tmean_m, table_max = last.tmean_m, "clamped_above_range");
            }
            return point_from_row(last, tmean_m > last.tmean_m);
        }

        // Binary-search-free linear scan: tables are small (tens of rows).
        let idx = self
            .rows
            .windows(2)
            .position(|pair| tmean_m >= pair[0].tmean_m && tmean_m <= pair[1].tmean_m)
            .expect("tmean_m within range must bracket between two rows");
        let lo = self.rows[idx];
        let hi = self.rows[idx + 1];
        let span = hi.tmean_m - lo.tmean_m;
        let t = if span == 0.0 { 0.0 } else { (tmean_m - lo.tmean_m) / span };

        HydroPoint {
            tmean_m,
            disp_t: lerp(lo.disp_t, hi.disp_t, t),
            lcf_m: lerp(lo.lcf_m, hi.lcf_m, t),
            tpc_t_per_cm: lerp(lo.tpc_t_per_cm, hi.tpc_t_per_cm, t),
            mtc_t_m_per_cm: lerp(lo.mtc_t_m_per_cm, hi.mtc_t_m_per_cm, t),
            km_m: lerp_opt(lo.km_m, hi.km_m, t),
            gm_min_m: lerp_opt(lo.gm_min_m, hi.gm_min_m, t),
            clamped: false,
        }
    }

    /// `true` iff `disp_t` falls within `[min, max]` of the table's
    /// displacement range.
    pub fn displacement_in_range(&self, disp_t: f64) -> bool {
        let min = self.rows.iter().map(|r| r.disp_t).fold(f64::INFINITY, f64::min);
        let max = self.rows.iter().map(|r| r.disp_t).fold(f64::NEG_INFINITY, f64::max);
        disp_t >= min && disp_t <= max
    }
}

fn point_from_row(row: HydroRow, clamped: bool) -> HydroPoint {
    HydroPoint {
        tmean_m: row.tmean_m,
        disp_t: row.disp_t,
        lcf_m: row.lcf_m,
        tpc_t_per_cm: row.tpc_t_per_cm,
        mtc_t_m_per_cm: row.mtc_t_m_per_cm,
        km_m: row.km_m,
        gm_min_m: row.gm_min_m,
        clamped,
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn lerp_opt(a: Option<f64>, b: Option<f64>, t: f64) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(lerp(a, b, t)),
        _ => None,
    }
}
