//! Error taxonomy: `InputError` aborts a run before any stage executes;
//! hard-stop and infeasibility reasons are per-stage and are recorded as
//! data inside a stage result rather than propagated as `Err` — the
//! planner always produces nine stage results.

use thiserror::Error;

/// Which gate a hard stop or infeasibility traces back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateKind {
    Captain,
    Charterer,
    Freeboard,
    Ukc,
    TrimLimit,
    TankBounds,
    ModeLock,
    HydroRange,
}

impl std::fmt::Display for GateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GateKind::Captain => "captain (AFT_MIN)",
            GateKind::Charterer => "charterer (FWD_MAX)",
            GateKind::Freeboard => "freeboard",
            GateKind::Ukc => "UKC",
            GateKind::TrimLimit => "trim limit",
            GateKind::TankBounds => "tank bounds",
            GateKind::ModeLock => "tank mode lock",
            GateKind::HydroRange => "hydrostatic range",
        };
        f.write_str(name)
    }
}

/// A condition that invalidates a stage plan irrespective of individual
/// gate outcomes.
#[derive(Debug, Clone, PartialEq)]
pub enum HardStopReason {
    /// Displacement implied by the stage's drafts falls outside the
    /// hydrostatic table range.
    HydroOutOfRange,
    /// Predicted draft at an end of the vessel exceeds `D_vessel` — a
    /// physical impossibility indicating bad input.
    DraftExceedsVessel { end: &'static str, draft_m: f64, d_vessel_m: f64 },
    /// A gate reported `FAIL` (guard-banded bound also failed).
    GateFailed(GateKind),
}

impl std::fmt::Display for HardStopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HardStopReason::HydroOutOfRange => write!(f, "HydroOutOfRange"),
            HardStopReason::DraftExceedsVessel { end, draft_m, d_vessel_m } => write!(
                f,
                "DraftExceedsVessel({end}: {draft_m:.3}m > D_vessel {d_vessel_m:.3}m)"
            ),
            HardStopReason::GateFailed(gate) => write!(f, "GateFailed({gate})"),
        }
    }
}

/// Why the LP solver reported no feasible solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfeasibilityReason {
    GateConflict,
    SolverTimeout,
}

/// One candidate relaxation that, if applied, would restore feasibility,
/// ordered by operational preference by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct RelaxationCandidate {
    pub gate: GateKind,
    pub description: String,
}

/// Full infeasibility diagnostic attached to a stage result.
#[derive(Debug, Clone, PartialEq)]
pub struct InfeasibilityReport {
    pub reason: InfeasibilityReason,
    pub relaxation_candidates: Vec<RelaxationCandidate>,
}

/// Malformed input: missing columns, out-of-range values, empty hydrostatic
/// table, unrecognised configuration keys. Surfaced at load time; the run
/// aborts before any stage executes.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("hydrostatic table must have at least 2 rows, found {0}")]
    HydroTableTooShort(usize),

    #[error("missing required column `{column}` in {table}")]
    MissingColumn { table: &'static str, column: &'static str },

    #[error("tank `{tank_id}` is invalid: {reason}")]
    InvalidTank { tank_id: String, reason: String },

    #[error("stage table must contain exactly the 9 fixed stages, found {0}")]
    BadStageCount(usize),

    #[error("stage table is missing the fixed stage `{0}`")]
    MissingStage(String),

    #[error("unrecognised configuration key `{0}`")]
    UnknownConfigKey(String),

    #[error("value out of range: {0}")]
    OutOfRange(String),

    #[error("sensor reading for FIXED tank `{tank_id}` disagrees with {fixed_t} and was rejected")]
    FixedTankSensorRejected { tank_id: String, fixed_t: f64 },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Umbrella error returned by the orchestrator's load phase; per-stage
/// failures never appear here (see module docs).
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Input(#[from] InputError),
}
