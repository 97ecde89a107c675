//! Participant roster for a cycle session.
//!
//! Participants are the agents or models whose status lines animate a cycle
//! view. They are owned exclusively by the session: only phase transitions
//! (through [`StatusUpdate`] projections) and the background variation ticker
//! mutate them, and everything resets to `Idle`/"Standby" when the session
//! returns to rest.

use serde::{Deserialize, Serialize};

/// Action text shown for a participant that is not doing anything.
pub const STANDBY: &str = "Standby";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ParticipantStatus {
    Idle,
    Working,
    Waiting,
    Finalizing,
}

impl ParticipantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantStatus::Idle => "IDLE",
            ParticipantStatus::Working => "WORKING",
            ParticipantStatus::Waiting => "WAITING",
            ParticipantStatus::Finalizing => "FINALIZING",
        }
    }
}

/// One agent or model in a cycle view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    /// Stable identifier used by projections.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Group tag shown next to the name.
    pub clan: String,
    pub status: ParticipantStatus,
    /// Free-text description of the current activity.
    pub action: String,
    /// Background participants sit outside the main cycle's active set and
    /// are only touched by the variation ticker.
    pub background: bool,
}

impl Participant {
    /// Participant in the main cycle's active set.
    pub fn new(id: &str, name: &str, clan: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            clan: clan.to_string(),
            status: ParticipantStatus::Idle,
            action: STANDBY.to_string(),
            background: false,
        }
    }

    /// Participant eligible for cosmetic background variation only.
    pub fn background(id: &str, name: &str, clan: &str) -> Self {
        Self {
            background: true,
            ..Self::new(id, name, clan)
        }
    }

    pub fn is_standby(&self) -> bool {
        self.status == ParticipantStatus::Idle && self.action == STANDBY
    }
}

/// Deterministic participant mutation applied on entry into a phase.
///
/// Projections are static tables: given the same phase, the same updates are
/// applied, which keeps the status display testable. Randomness is confined
/// to the background ticker.
#[derive(Debug, Clone, Copy)]
pub struct StatusUpdate {
    pub id: &'static str,
    pub status: ParticipantStatus,
    pub action: &'static str,
}

/// The session's set of participants.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    participants: Vec<Participant>,
}

impl Roster {
    pub fn new(participants: Vec<Participant>) -> Self {
        Self { participants }
    }

    pub fn get(&self, id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Apply a phase projection. Unknown ids are ignored rather than
    /// invented; projections and rosters are defined side by side in the
    /// same domain module.
    pub fn apply(&mut self, updates: &[StatusUpdate]) {
        for update in updates {
            if let Some(p) = self.participants.iter_mut().find(|p| p.id == update.id) {
                p.status = update.status;
                p.action = update.action.to_string();
            }
        }
    }

    /// Mutable view of the background subset, for the variation ticker.
    pub fn background_mut(&mut self) -> impl Iterator<Item = &mut Participant> {
        self.participants.iter_mut().filter(|p| p.background)
    }

    /// Return every participant to `Idle`/"Standby".
    pub fn reset_all(&mut self) {
        for p in &mut self.participants {
            p.status = ParticipantStatus::Idle;
            p.action = STANDBY.to_string();
        }
    }

    pub fn all_standby(&self) -> bool {
        self.participants.iter().all(Participant::is_standby)
    }
}
