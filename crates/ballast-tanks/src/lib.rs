//! C2 — Tank Registry: per-tank capacity, longitudinal position, current
//! mass, mode, pump rate, priority weight, overrides.
//!
//! The registry is the only mutable state in a run and is owned
//! exclusively by the stage planner; the solver only ever sees an
//! immutable [`TankSnapshot`].

mod mode;
mod registry;
mod sensor;
mod tank;

pub use mode::{TankMode, UseFlag};
pub use registry::{TankRegistry, TankSnapshot};
pub use sensor::{apply_sensor_readings, SensorApplyStrategy, SensorRow, SensorWarning};
pub use tank::{Tank, TankRow};
