//! Domain content for the three live-cycle views.
//!
//! Each submodule supplies one [`CycleDomain`](crate::sequencer::CycleDomain)
//! implementation: its phase enum, participant roster, log templates, and
//! (for the improvement cycle) the approval-gate payload. The sequencer
//! engine itself lives in `crate::sequencer` and is shared by all three.

pub mod debate;
pub mod evolution;
pub mod improvement;

pub use debate::DebateDomain;
pub use evolution::EvolutionDomain;
pub use improvement::ImprovementDomain;
