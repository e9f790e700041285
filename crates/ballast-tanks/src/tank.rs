use crate::mode::{TankMode, UseFlag};
use ballast_support::error::InputError;
use serde::Deserialize;

/// Raw tank registry row as read from the tabular input.
#[derive(Debug, Clone, Deserialize)]
pub struct TankRow {
    #[serde(rename = "Tank")]
    pub tank: String,
    #[serde(rename = "Capacity_t")]
    pub capacity_t: f64,
    #[serde(rename = "x_from_mid_m")]
    pub x_from_mid_m: f64,
    #[serde(rename = "Current_t")]
    pub current_t: f64,
    #[serde(rename = "Min_t")]
    pub min_t: f64,
    #[serde(rename = "Max_t")]
    pub max_t: f64,
    #[serde(rename = "mode")]
    pub mode: String,
    #[serde(rename = "use_flag")]
    pub use_flag: String,
    #[serde(rename = "pump_rate_tph")]
    pub pump_rate_tph: f64,
    #[serde(rename = "priority_weight")]
    pub priority_weight: f64,
}

/// A validated tank. Construction enforces every invariant; a `Tank` can
/// never exist in a state that violates them.
#[derive(Debug, Clone, PartialEq)]
pub struct Tank {
    pub tank_id: String,
    pub capacity_t: f64,
    pub x_from_mid_m: f64,
    pub current_t: f64,
    pub min_t: f64,
    pub max_t: f64,
    pub mode: TankMode,
    pub use_flag: UseFlag,
    pub pump_rate_tph: f64,
    pub priority_weight: f64,
}

impl Tank {
    pub fn from_row(row: TankRow) -> Result<Self, InputError> {
        let mode = TankMode::parse(&row.mode)?;
        let use_flag = UseFlag::parse(&row.use_flag)?;
        let tank = Tank {
            tank_id: row.tank,
            capacity_t: row.capacity_t,
            x_from_mid_m: row.x_from_mid_m,
            current_t: row.current_t,
            min_t: row.min_t,
            max_t: row.max_t,
            mode,
            use_flag,
            pump_rate_tph: row.pump_rate_tph,
            priority_weight: row.priority_weight,
        };
        tank.validate()?;
        Ok(tank)
    }

    fn validate(&self) -> Result<(), InputError> {
        let id = || self.tank_id.clone();
        if self.capacity_t <= 0.0 {
            return Err(InputError::InvalidTank { tank_id: id(), reason: "capacity_t must be > 0".into() });
        }
        if !(self.min_t <= self.current_t && self.current_t <= self.max_t) {
            return Err(InputError::InvalidTank {
                tank_id: id(),
                reason: format!(
                    "min_t ({}) <= current_t ({}) <= max_t ({}) violated",
                    self.min_t, self.current_t, self.max_t
                ),
            });
        }
        if self.max_t > self.capacity_t || self.min_t < 0.0 {
            return Err(InputError::InvalidTank {
                tank_id: id(),
                reason: "operational bounds must lie within [0, capacity_t]".into(),
            });
        }
        if self.pump_rate_tph <= 0.0 {
            return Err(InputError::InvalidTank { tank_id: id(), reason: "pump_rate_tph must be > 0".into() });
        }
        if self.priority_weight <= 0.0 {
            return Err(InputError::InvalidTank { tank_id: id(), reason: "priority_weight must be > 0".into() });
        }
        if self.mode == TankMode::Fixed
            && !(self.min_t == self.max_t && self.max_t == self.current_t)
        {
            return Err(InputError::InvalidTank {
                tank_id: id(),
                reason: "FIXED mode asserts min_t = max_t = current_t".into(),
            });
        }
        Ok(())
    }

    /// Upper bound on the fill leg `p_i`: zero unless the mode allows
    /// filling, and capacity-limited by headroom to `max_t`.
    pub fn fill_upper(&self) -> f64 {
        if self.use_flag == UseFlag::N || !self.mode.allows_fill() {
            0.0
        } else {
            (self.max_t - self.current_t).max(0.0)
        }
    }

    /// Upper bound on the discharge leg `n_i`: zero unless the mode allows
    /// discharging, and capacity-limited by headroom to `min_t`.
    pub fn discharge_upper(&self) -> f64 {
        if self.use_flag == UseFlag::N || !self.mode.allows_discharge() {
            0.0
        } else {
            (self.current_t - self.min_t).max(0.0)
        }
    }

    /// Apply a net delta, checking it stays within `[min_t, max_t]`.
    /// Returns the new tank on success.
    pub fn with_delta(&self, delta_t: f64) -> Result<Tank, InputError> {
        let new_current = self.current_t + delta_t;
        if new_current < self.min_t - 1e-9 || new_current > self.max_t + 1e-9 {
            return Err(InputError::OutOfRange(format!(
                "applying delta {delta_t} to tank `{}` would leave current_t={new_current} outside [{}, {}]",
                self.tank_id, self.min_t, self.max_t
            )));
        }
        let mut next = self.clone();
        next.current_t = new_current.clamp(self.min_t, self.max_t);
        Ok(next)
    }
}
