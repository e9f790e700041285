use crate::tank::{Tank, TankRow};
use ballast_support::error::InputError;
use ballast_support::profile::{resolve_tank_override, SiteProfile};
use std::collections::BTreeMap;

/// The Tank Registry: the only mutable state in a run, owned exclusively
/// by the stage planner. Loaded once, then mutated exactly once per stage
/// by applying the solver's chosen deltas atomically.
#[derive(Debug, Clone)]
pub struct TankRegistry {
    tanks: BTreeMap<String, Tank>,
}

/// An immutable, read-only view handed to the solver for one stage.
#[derive(Debug, Clone)]
pub struct TankSnapshot {
    tanks: Vec<Tank>,
}

impl TankSnapshot {
    /// Build a snapshot directly from tanks, bypassing the registry. Used to
    /// hand the solver a stage-scoped view with tank modes overridden (e.g.
    /// forcing the forward-inventory tanks to `DISCHARGE_ONLY` for one
    /// stage's solve) without mutating the registry's persistent state.
    pub fn from_tanks(tanks: Vec<Tank>) -> Self {
        TankSnapshot { tanks }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tank> {
        self.tanks.iter()
    }

    pub fn get(&self, tank_id: &str) -> Option<&Tank> {
        self.tanks.iter().find(|t| t.tank_id == tank_id)
    }

    pub fn len(&self) -> usize {
        self.tanks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tanks.is_empty()
    }
}

impl TankRegistry {
    pub fn from_rows(rows: Vec<TankRow>) -> Result<Self, InputError> {
        let mut tanks = BTreeMap::new();
        for row in rows {
            let tank = Tank::from_row(row)?;
            tanks.insert(tank.tank_id.clone(), tank);
        }
        Ok(Self { tanks })
    }

    /// Merge site-profile overrides onto the base registry. Exact tank-id
    /// matches win over base-name matches; the merged record
    /// is re-validated so an override can never produce an invalid tank.
    pub fn apply_overrides(&mut self, profile: &SiteProfile) -> Result<(), InputError> {
        let ids: Vec<String> = self.tanks.keys().cloned().collect();
        for id in ids {
            let Some(over) = resolve_tank_override(&id, profile) else { continue };
            if over.is_empty() {
                continue;
            }
            let tank = self.tanks.get(&id).expect("id came from this map's own keys");
            let mut row = TankRow {
                tank: tank.tank_id.clone(),
                capacity_t: tank.capacity_t,
                x_from_mid_m: tank.x_from_mid_m,
                current_t: tank.current_t,
                min_t: over.min_t.unwrap_or(tank.min_t),
                max_t: over.max_t.unwrap_or(tank.max_t),
                mode: over.mode.clone().unwrap_or_else(|| mode_to_str(tank.mode)),
                use_flag: over.use_flag.clone().unwrap_or_else(|| use_flag_to_str(tank.use_flag)),
                pump_rate_tph: over.pump_rate_tph.unwrap_or(tank.pump_rate_tph),
                priority_weight: over.priority_weight.unwrap_or(tank.priority_weight),
            };
            // Overrides never move current_t itself; only operational bounds.
            row.current_t = tank.current_t;
            let rebuilt = Tank::from_row(row)?;
            self.tanks.insert(id, rebuilt);
        }
        Ok(())
    }

    /// One-time forward-inventory pre-fill applied before Stage 1. Not a
    /// solver-chosen delta: the target is computed directly from the
    /// inverse draft-prediction equations by the stage planner.
    pub fn prefill(&mut self, tank_id: &str, target_current_t: f64) -> Result<(), InputError> {
        let tank = self.tanks.get(tank_id).ok_or_else(|| InputError::InvalidTank {
            tank_id: tank_id.to_string(),
            reason: "unknown tank referenced by forward-inventory pre-fill".into(),
        })?;
        if target_current_t < tank.min_t - 1e-9 || target_current_t > tank.max_t + 1e-9 {
            return Err(InputError::OutOfRange(format!(
                "pre-fill target {target_current_t} for `{tank_id}` outside [{}, {}]",
                tank.min_t, tank.max_t
            )));
        }
        let mut next = tank.clone();
        next.current_t = target_current_t.clamp(tank.min_t, tank.max_t);
        self.tanks.insert(tank_id.to_string(), next);
        Ok(())
    }

    /// Set `current_t` directly, clamping to `[min_t, max_t]` rather than
    /// rejecting out-of-bounds input — sensor values are clamped and the
    /// clamping event is logged. Returns the clamped value so the caller
    /// can detect and log a clamp.
    pub fn set_current_clamped(&mut self, tank_id: &str, raw_t: f64) -> Result<f64, InputError> {
        let tank = self.tanks.get(tank_id).ok_or_else(|| InputError::InvalidTank {
            tank_id: tank_id.to_string(),
            reason: "unknown tank referenced by sensor reading".into(),
        })?;
        let clamped = raw_t.clamp(tank.min_t, tank.max_t);
        let mut next = tank.clone();
        next.current_t = clamped;
        self.tanks.insert(tank_id.to_string(), next);
        Ok(clamped)
    }

    pub fn get(&self, tank_id: &str) -> Option<&Tank> {
        self.tanks.get(tank_id)
    }

    pub fn snapshot(&self) -> TankSnapshot {
        TankSnapshot { tanks: self.tanks.values().cloned().collect() }
    }

    pub fn len(&self) -> usize {
        self.tanks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tanks.is_empty()
    }

    /// Apply per-tank deltas atomically: all tanks are validated against
    /// their bounds before any mutation commits; if one fails, none are
    /// applied.
    pub fn apply_deltas(&mut self, deltas: &BTreeMap<String, f64>) -> Result<(), InputError> {
        let mut staged = Vec::with_capacity(deltas.len());
        for (tank_id, delta) in deltas {
            let tank = self.tanks.get(tank_id).ok_or_else(|| InputError::InvalidTank {
                tank_id: tank_id.clone(),
                reason: "delta references unknown tank".into(),
            })?;
            staged.push((tank_id.clone(), tank.with_delta(*delta)?));
        }
        for (tank_id, next) in staged {
            self.tanks.insert(tank_id, next);
        }
        Ok(())
    }
}

fn mode_to_str(mode: crate::mode::TankMode) -> String {
    use crate::mode::TankMode::*;
    match mode {
        FillDischarge => "FILL_DISCHARGE",
        FillOnly => "FILL_ONLY",
        DischargeOnly => "DISCHARGE_ONLY",
        Blocked => "BLOCKED",
        Fixed => "FIXED",
    }
    .to_string()
}

fn use_flag_to_str(flag: crate::mode::UseFlag) -> String {
    match flag {
        crate::mode::UseFlag::Y => "Y".to_string(),
        crate::mode::UseFlag::N => "N".to_string(),
    }
}
