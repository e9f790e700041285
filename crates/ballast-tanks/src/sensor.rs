use crate::mode::TankMode;
use crate::registry::TankRegistry;
use ballast_support::error::InputError;
use serde::Deserialize;

/// Raw sensor reading row.
#[derive(Debug, Clone, Deserialize)]
pub struct SensorRow {
    #[serde(rename = "Tank")]
    pub tank: String,
    #[serde(rename = "Current_t")]
    pub current_t: f64,
}

/// How a sensor reading is merged onto the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorApplyStrategy {
    /// Replace the registry's `current_t` unconditionally.
    Override,
    /// Apply only when the registry's existing `current_t` is zero.
    FillMissing,
}

/// One notable event produced while applying sensor readings, surfaced to
/// the caller for logging/reporting.
#[derive(Debug, Clone, PartialEq)]
pub enum SensorWarning {
    ClampedToBounds { tank_id: String, raw_t: f64, clamped_t: f64 },
    /// A sensor reading for a `FIXED` tank that disagrees with its locked
    /// `current_t` is rejected, not applied.
    FixedTankRejected { tank_id: String, sensor_t: f64, fixed_t: f64 },
}

/// Merge sensor readings onto the registry per `strategy`.
pub fn apply_sensor_readings(
    registry: &mut TankRegistry,
    readings: &[SensorRow],
    strategy: SensorApplyStrategy,
) -> Result<Vec<SensorWarning>, InputError> {
    let mut warnings = Vec::new();
    for reading in readings {
        let tank = registry.get(&reading.tank).ok_or_else(|| InputError::InvalidTank {
            tank_id: reading.tank.clone(),
            reason: "sensor reading references unknown tank".into(),
        })?;

        if tank.mode == TankMode::Fixed {
            if (reading.current_t - tank.current_t).abs() > 1e-9 {
                let warning = SensorWarning::FixedTankRejected {
                    tank_id: tank.tank_id.clone(),
                    sensor_t: reading.current_t,
                    fixed_t: tank.current_t,
                };
                tracing::warn!(
                    target: "sensor",
                    tank_id = %tank.tank_id,
                    sensor_t = reading.current_t,
                    fixed_t = tank.current_t,
                    "fixed_tank_sensor_rejected"
                );
                warnings.push(warning);
            }
            continue;
        }

        let should_apply = match strategy {
            SensorApplyStrategy::Override => true,
            SensorApplyStrategy::FillMissing => tank.current_t == 0.0,
        };
        if !should_apply {
            continue;
        }

        let clamped = registry.set_current_clamped(&reading.tank, reading.current_t)?;
        if (clamped - reading.current_t).abs() > 1e-9 {
            tracing::warn!(
                target: "sensor",
                tank_id = %reading.tank,
                raw_t = reading.current_t,
                clamped_t = clamped,
                "sensor_reading_clamped"
            );
            warnings.push(SensorWarning::ClampedToBounds {
                tank_id: reading.tank.clone(),
                raw_t: reading.current_t,
                clamped_t: clamped,
            });
        }
    }
    Ok(warnings)
}
