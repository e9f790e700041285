use ballast_support::error::InputError;

/// Tank fill/discharge mode. Governs which leg of a delta the LP solver is
/// allowed to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TankMode {
    FillDischarge,
    FillOnly,
    DischargeOnly,
    Blocked,
    Fixed,
}

impl TankMode {
    pub fn parse(s: &str) -> Result<Self, InputError> {
        match s.trim() {
            "FILL_DISCHARGE" => Ok(TankMode::FillDischarge),
            "FILL_ONLY" => Ok(TankMode::FillOnly),
            "DISCHARGE_ONLY" => Ok(TankMode::DischargeOnly),
            "BLOCKED" => Ok(TankMode::Blocked),
            "FIXED" => Ok(TankMode::Fixed),
            other => Err(InputError::OutOfRange(format!("unknown tank mode `{other}`"))),
        }
    }

    /// `true` if a positive delta (fill) is permitted at all by this mode.
    pub fn allows_fill(&self) -> bool {
        matches!(self, TankMode::FillDischarge | TankMode::FillOnly)
    }

    /// `true` if a negative delta (discharge) is permitted at all by this mode.
    pub fn allows_discharge(&self) -> bool {
        matches!(self, TankMode::FillDischarge | TankMode::DischargeOnly)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseFlag {
    Y,
    N,
}

impl UseFlag {
    pub fn parse(s: &str) -> Result<Self, InputError> {
        match s.trim() {
            "Y" | "y" => Ok(UseFlag::Y),
            "N" | "n" => Ok(UseFlag::N),
            other => Err(InputError::OutOfRange(format!("unknown use_flag `{other}`"))),
        }
    }
}
