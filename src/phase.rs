//! Phase contract for the cycle sequencer.
//!
//! Each live-cycle view (improvement, evolution, debate) defines its phases
//! as an enum implementing [`CyclePhase`]. The sequencer engine only sees the
//! trait: a resting phase, a first working phase, a total successor function,
//! and an optional approval gate. Matching on a concrete enum keeps every
//! transition exhaustiveness-checked at compile time.

use std::fmt;

/// A named stage in a fixed cycle.
///
/// Invariants the implementor must uphold:
/// - `next` is total: defined for every variant, including the resting phase.
/// - Starting from `first()` and repeatedly applying `next` reaches
///   `resting()` in a bounded number of steps (see [`steps_to_rest`]).
/// - At most one phase returns `true` from `is_gate`, and the gate is never
///   the resting phase.
pub trait CyclePhase:
    Copy + PartialEq + Eq + fmt::Debug + Send + Sync + 'static
{
    /// The initial and terminal resting phase.
    fn resting() -> Self;

    /// The first working phase a session enters on `start()`.
    fn first() -> Self;

    /// Successor in the fixed cycle.
    fn next(self) -> Self;

    /// Whether auto-advance stops here pending human approval.
    fn is_gate(self) -> bool {
        false
    }

    /// Display label, also the key into the configured dwell table.
    fn label(self) -> &'static str;

    /// Coarse completion percentage shown while this phase is current.
    fn progress(self) -> u8;

    fn is_resting(self) -> bool {
        self == Self::resting()
    }
}

/// Walk the cycle from `first()` until the resting phase, bounded by `limit`.
///
/// Returns the number of transitions taken, or `None` if the cycle does not
/// return to rest within the bound. Gates are walked through as ordinary
/// phases; this checks shape, not timing.
pub fn steps_to_rest<P: CyclePhase>(limit: usize) -> Option<usize> {
    let mut phase = P::first();
    for step in 1..=limit {
        phase = phase.next();
        if phase.is_resting() {
            return Some(step);
        }
    }
    None
}
