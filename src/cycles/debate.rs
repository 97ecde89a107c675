//! The debate and arbitration sequence between reasoning models.
//!
//! Two models argue a proposition through fixed rounds; a third arbitrates
//! and delivers a verdict. Ungated: the arbiter's ruling is final.

use crate::participant::{Participant, ParticipantStatus, Roster, StatusUpdate};
use crate::phase::CyclePhase;
use crate::rng::RandomSource;
use crate::sequencer::CycleDomain;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebatePhase {
    Idle,
    Framing,
    OpeningArguments,
    Rebuttal,
    CrossExamination,
    Arbitration,
    Verdict,
}

impl CyclePhase for DebatePhase {
    fn resting() -> Self {
        DebatePhase::Idle
    }

    fn first() -> Self {
        DebatePhase::Framing
    }

    fn next(self) -> Self {
        match self {
            DebatePhase::Idle => DebatePhase::Idle,
            DebatePhase::Framing => DebatePhase::OpeningArguments,
            DebatePhase::OpeningArguments => DebatePhase::Rebuttal,
            DebatePhase::Rebuttal => DebatePhase::CrossExamination,
            DebatePhase::CrossExamination => DebatePhase::Arbitration,
            DebatePhase::Arbitration => DebatePhase::Verdict,
            DebatePhase::Verdict => DebatePhase::Idle,
        }
    }

    fn label(self) -> &'static str {
        match self {
            DebatePhase::Idle => "IDLE",
            DebatePhase::Framing => "FRAMING",
            DebatePhase::OpeningArguments => "OPENING_ARGUMENTS",
            DebatePhase::Rebuttal => "REBUTTAL",
            DebatePhase::CrossExamination => "CROSS_EXAMINATION",
            DebatePhase::Arbitration => "ARBITRATION",
            DebatePhase::Verdict => "VERDICT",
        }
    }

    fn progress(self) -> u8 {
        match self {
            DebatePhase::Idle => 0,
            DebatePhase::Framing => 12,
            DebatePhase::OpeningArguments => 30,
            DebatePhase::Rebuttal => 50,
            DebatePhase::CrossExamination => 68,
            DebatePhase::Arbitration => 85,
            DebatePhase::Verdict => 100,
        }
    }
}

/// Domain content for the debate sequence.
pub struct DebateDomain;

impl CycleDomain for DebateDomain {
    type Phase = DebatePhase;

    fn name(&self) -> &'static str {
        "debate"
    }

    fn roster(&self) -> Roster {
        Roster::new(vec![
            Participant::new("advocate", "Model-A (Advocate)", "DEBATE"),
            Participant::new("challenger", "Model-B (Challenger)", "DEBATE"),
            Participant::new("arbiter", "Model-C (Arbiter)", "ARBITRATION"),
            Participant::background("stenographer", "Stenographer", "RECORDS"),
        ])
    }

    fn announce(&self, phase: DebatePhase) -> Vec<String> {
        match phase {
            DebatePhase::Idle => vec!["Session adjourned. Transcript sealed.".to_string()],
            DebatePhase::Framing => vec![
                "Debate session convened.".to_string(),
                "Framing the proposition and ground rules.".to_string(),
            ],
            DebatePhase::OpeningArguments => {
                vec!["Advocate presenting opening arguments.".to_string()]
            }
            DebatePhase::Rebuttal => {
                vec!["Challenger rebutting with counter-evidence.".to_string()]
            }
            DebatePhase::CrossExamination => {
                vec!["Cross-examination. Both models probing weak premises.".to_string()]
            }
            DebatePhase::Arbitration => {
                vec!["Arguments closed. Arbiter weighing both positions.".to_string()]
            }
            DebatePhase::Verdict => vec!["Verdict delivered. Confidence 0.87.".to_string()],
        }
    }

    fn project(&self, phase: DebatePhase) -> &'static [StatusUpdate] {
        use ParticipantStatus::{Finalizing, Idle, Waiting, Working};
        match phase {
            DebatePhase::Idle => &[],
            DebatePhase::Framing => &[StatusUpdate {
                id: "arbiter",
                status: Working,
                action: "Framing proposition",
            }],
            DebatePhase::OpeningArguments => &[
                StatusUpdate {
                    id: "arbiter",
                    status: Waiting,
                    action: "Listening",
                },
                StatusUpdate {
                    id: "advocate",
                    status: Working,
                    action: "Presenting opening case",
                },
            ],
            DebatePhase::Rebuttal => &[
                StatusUpdate {
                    id: "advocate",
                    status: Waiting,
                    action: "Holding position",
                },
                StatusUpdate {
                    id: "challenger",
                    status: Working,
                    action: "Rebutting with counter-evidence",
                },
            ],
            DebatePhase::CrossExamination => &[
                StatusUpdate {
                    id: "advocate",
                    status: Working,
                    action: "Probing counter-premises",
                },
                StatusUpdate {
                    id: "challenger",
                    status: Working,
                    action: "Defending counter-case",
                },
            ],
            DebatePhase::Arbitration => &[
                StatusUpdate {
                    id: "advocate",
                    status: Idle,
                    action: "Arguments closed",
                },
                StatusUpdate {
                    id: "challenger",
                    status: Idle,
                    action: "Arguments closed",
                },
                StatusUpdate {
                    id: "arbiter",
                    status: Working,
                    action: "Weighing positions",
                },
            ],
            DebatePhase::Verdict => &[StatusUpdate {
                id: "arbiter",
                status: Finalizing,
                action: "Delivering verdict",
            }],
        }
    }

    fn flicker(&self, id: &str, rng: &mut dyn RandomSource) -> Option<&'static str> {
        if id != "stenographer" {
            return None;
        }
        let options = ["Indexing transcript", "Cross-referencing citations"];
        Some(options[rng.pick(options.len())])
    }
}
