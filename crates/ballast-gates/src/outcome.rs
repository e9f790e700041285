/// Result of evaluating a single gate. Exhaustive and tagged rather than a
/// bare bool: `Limit` and `Na` both differ in meaning from `Ok`/`Fail` and
/// callers must decide what each means for them rather than reading through
/// a collapsed pass/fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Strictly within the configured bound.
    Ok,
    /// Outside the bound but within the guard-band relaxation.
    Limit,
    /// Outside the bound even with the guard-band relaxation.
    Fail,
    /// The gate could not be computed because a required input (tide
    /// context) was not supplied; never mistaken for a pass or a fail.
    Verify,
    /// The gate does not apply at this stage (e.g. charterer gate on a
    /// non-critical stage).
    Na,
}
