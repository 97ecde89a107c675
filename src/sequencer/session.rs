//! Session state owned by a [`Sequencer`](super::Sequencer).

use serde::{Deserialize, Serialize};

use crate::participant::Roster;
use crate::phase::CyclePhase;
use crate::sequencer::log::LogBuffer;

/// Payload parked on the approval gate: the thing awaiting human review.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub id: u32,
    pub title: String,
}

/// The aggregate state of one cycle run.
///
/// Created by `Sequencer::new` and reused across runs; `start()` begins a
/// new run only when the phase is at rest. All mutation happens under the
/// sequencer's lock, inside timer callbacks or user-triggered handlers.
#[derive(Debug)]
pub struct Session<P: CyclePhase> {
    pub phase: P,
    pub participants: Roster,
    pub log: LogBuffer,
    pub checkpoint: Option<Checkpoint>,
    pub progress: u8,
    /// Bumped on start/approve/reject/dispose. Timer callbacks capture the
    /// value current when they were scheduled and bail out on mismatch, so a
    /// callback that slept through a reset cannot mutate the new run.
    pub(super) generation: u64,
    /// Set once by `dispose()`; no task touches the session afterwards.
    pub(super) disposed: bool,
}

impl<P: CyclePhase> Session<P> {
    pub(super) fn new(participants: Roster, log_capacity: usize) -> Self {
        Self {
            phase: P::resting(),
            participants,
            log: LogBuffer::new(log_capacity),
            checkpoint: None,
            progress: 0,
            generation: 0,
            disposed: false,
        }
    }
}

/// Read-only view of a session handed to display layers.
///
/// Phase identity is erased to its label so UIs and the status server can
/// render any cycle through one type. Typed access stays on the sequencer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleSnapshot {
    pub cycle: String,
    pub phase: String,
    pub resting: bool,
    pub gated: bool,
    pub progress: u8,
    pub participants: Vec<crate::participant::Participant>,
    pub logs: Vec<String>,
    pub checkpoint: Option<Checkpoint>,
}
