use ballast_support::error::InputError;
use ballast_tanks::{TankMode, TankRegistry, TankSnapshot};

/// The four forward tanks the pre-ballast policy pre-fills.
pub const FORWARD_INVENTORY_TANKS: [&str; 4] = ["FWB1.P", "FWB1.S", "FWB2.P", "FWB2.S"];

/// The two stages on which the forward-inventory tanks are constrained to
/// `DISCHARGE_ONLY` — not every stage `is_critical_stage` matches, only
/// these two by name.
pub const FORWARD_INVENTORY_CONSTRAINED_STAGES: [&str; 2] = ["Stage 5_PreBallast", "Stage 6A_Critical"];

/// The one-time forward-inventory pre-fill target, supplied per run: the
/// correct FWB2 inventory is an operational input, never a baked-in
/// default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForwardInventory {
    pub fwb1_p_t: f64,
    pub fwb1_s_t: f64,
    pub fwb2_p_t: f64,
    pub fwb2_s_t: f64,
}

/// Apply the pre-fill before Stage 1 begins. This is a direct `current_t`
/// assignment, not a solver-chosen delta.
pub fn apply_forward_inventory(registry: &mut TankRegistry, inventory: &ForwardInventory) -> Result<(), InputError> {
    registry.prefill("FWB1.P", inventory.fwb1_p_t)?;
    registry.prefill("FWB1.S", inventory.fwb1_s_t)?;
    registry.prefill("FWB2.P", inventory.fwb2_p_t)?;
    registry.prefill("FWB2.S", inventory.fwb2_s_t)?;
    Ok(())
}

/// A solver snapshot with the forward-inventory tanks forced to
/// `DISCHARGE_ONLY`, used only when solving
/// [`FORWARD_INVENTORY_CONSTRAINED_STAGES`]. The registry itself is left
/// untouched — this constraint applies to one stage's solve, not
/// permanently.
pub fn constrained_snapshot(registry: &TankRegistry) -> TankSnapshot {
    let tanks = registry
        .snapshot()
        .iter()
        .map(|tank| {
            let mut tank = tank.clone();
            if FORWARD_INVENTORY_TANKS.contains(&tank.tank_id.as_str()) {
                tank.mode = TankMode::DischargeOnly;
            }
            tank
        })
        .collect();
    TankSnapshot::from_tanks(tanks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballast_tanks::TankRow;

    fn registry() -> TankRegistry {
        TankRegistry::from_rows(vec![
            TankRow {
                tank: "FWB1.P".into(), capacity_t: 100.0, x_from_mid_m: -25.0, current_t: 50.0,
                min_t: 0.0, max_t: 100.0, mode: "FILL_DISCHARGE".into(), use_flag: "Y".into(),
                pump_rate_tph: 50.0, priority_weight: 1.0,
            },
            TankRow {
                tank: "FWB1.S".into(), capacity_t: 100.0, x_from_mid_m: -25.0, current_t: 50.0,
                min_t: 0.0, max_t: 100.0, mode: "FILL_DISCHARGE".into(), use_flag: "Y".into(),
                pump_rate_tph: 50.0, priority_weight: 1.0,
            },
            TankRow {
                tank: "FWB2.P".into(), capacity_t: 60.0, x_from_mid_m: -18.0, current_t: 30.0,
                min_t: 0.0, max_t: 60.0, mode: "FILL_DISCHARGE".into(), use_flag: "Y".into(),
                pump_rate_tph: 40.0, priority_weight: 1.0,
            },
            TankRow {
                tank: "FWB2.S".into(), capacity_t: 60.0, x_from_mid_m: -18.0, current_t: 30.0,
                min_t: 0.0, max_t: 60.0, mode: "FILL_DISCHARGE".into(), use_flag: "Y".into(),
                pump_rate_tph: 40.0, priority_weight: 1.0,
            },
            TankRow {
                tank: "AFT1.C".into(), capacity_t: 100.0, x_from_mid_m: 25.0, current_t: 50.0,
                min_t: 0.0, max_t: 100.0, mode: "FILL_DISCHARGE".into(), use_flag: "Y".into(),
                pump_rate_tph: 50.0, priority_weight: 1.0,
            },
        ])
        .unwrap()
    }

    #[test]
    fn prefill_sets_exactly_the_four_forward_tanks() {
        let mut registry = registry();
        let inventory = ForwardInventory { fwb1_p_t: 50.57, fwb1_s_t: 50.57, fwb2_p_t: 21.45, fwb2_s_t: 21.45 };
        apply_forward_inventory(&mut registry, &inventory).unwrap();
        assert_eq!(registry.get("FWB1.P").unwrap().current_t, 50.57);
        assert_eq!(registry.get("FWB2.S").unwrap().current_t, 21.45);
        assert_eq!(registry.get("AFT1.C").unwrap().current_t, 50.0, "non-forward tank untouched");
    }

    #[test]
    fn constrained_snapshot_forces_discharge_only_on_forward_tanks_only() {
        let registry = registry();
        let snapshot = constrained_snapshot(&registry);
        assert_eq!(snapshot.get("FWB1.P").unwrap().mode, TankMode::DischargeOnly);
        assert_eq!(snapshot.get("FWB2.S").unwrap().mode, TankMode::DischargeOnly);
        assert_eq!(snapshot.get("AFT1.C").unwrap().mode, TankMode::FillDischarge, "non-forward tank mode unchanged");
    }

    #[test]
    fn registry_mode_is_unaffected_by_constrained_snapshot() {
        let registry = registry();
        let _ = constrained_snapshot(&registry);
        assert_eq!(registry.get("FWB1.P").unwrap().mode, TankMode::FillDischarge);
    }
}
