//! The evolution loop: architecture search over candidate models.
//!
//! This is the server-backed variant. Run locally it behaves like any other
//! cycle; run against a remote process, the sequencer here drives the mock
//! status server and remote viewers mirror it through the polling adapter.
//! No approval gate: promotion is automatic.

use crate::participant::{Participant, ParticipantStatus, Roster, StatusUpdate};
use crate::phase::CyclePhase;
use crate::sequencer::CycleDomain;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvolutionPhase {
    Idle,
    Sampling,
    Training,
    Evaluating,
    Selecting,
    Promoting,
}

impl CyclePhase for EvolutionPhase {
    fn resting() -> Self {
        EvolutionPhase::Idle
    }

    fn first() -> Self {
        EvolutionPhase::Sampling
    }

    fn next(self) -> Self {
        match self {
            EvolutionPhase::Idle => EvolutionPhase::Idle,
            EvolutionPhase::Sampling => EvolutionPhase::Training,
            EvolutionPhase::Training => EvolutionPhase::Evaluating,
            EvolutionPhase::Evaluating => EvolutionPhase::Selecting,
            EvolutionPhase::Selecting => EvolutionPhase::Promoting,
            EvolutionPhase::Promoting => EvolutionPhase::Idle,
        }
    }

    fn label(self) -> &'static str {
        match self {
            EvolutionPhase::Idle => "IDLE",
            EvolutionPhase::Sampling => "SAMPLING",
            EvolutionPhase::Training => "TRAINING",
            EvolutionPhase::Evaluating => "EVALUATING",
            EvolutionPhase::Selecting => "SELECTING",
            EvolutionPhase::Promoting => "PROMOTING",
        }
    }

    fn progress(self) -> u8 {
        match self {
            EvolutionPhase::Idle => 0,
            EvolutionPhase::Sampling => 15,
            EvolutionPhase::Training => 45,
            EvolutionPhase::Evaluating => 70,
            EvolutionPhase::Selecting => 88,
            EvolutionPhase::Promoting => 100,
        }
    }
}

/// Domain content for the evolution loop.
pub struct EvolutionDomain;

impl CycleDomain for EvolutionDomain {
    type Phase = EvolutionPhase;

    fn name(&self) -> &'static str {
        "evolution"
    }

    fn roster(&self) -> Roster {
        Roster::new(vec![
            Participant::new("genome-a", "Genome-A", "NAS"),
            Participant::new("genome-b", "Genome-B", "NAS"),
            Participant::new("evaluator", "Fitness-Evaluator", "NAS"),
        ])
    }

    fn announce(&self, phase: EvolutionPhase) -> Vec<String> {
        match phase {
            EvolutionPhase::Idle => {
                vec!["Generation closed. Search space archived.".to_string()]
            }
            EvolutionPhase::Sampling => vec![
                "Evolution loop engaged.".to_string(),
                "Sampling architecture search space for candidate genomes.".to_string(),
            ],
            EvolutionPhase::Training => {
                vec!["Candidates frozen. Training genomes on holdout shards.".to_string()]
            }
            EvolutionPhase::Evaluating => {
                vec!["Training converged. Scoring fitness across benchmarks.".to_string()]
            }
            EvolutionPhase::Selecting => {
                vec!["Scores in. Selecting survivors for the next generation.".to_string()]
            }
            EvolutionPhase::Promoting => {
                vec!["Champion genome promoted to serving tier.".to_string()]
            }
        }
    }

    fn project(&self, phase: EvolutionPhase) -> &'static [StatusUpdate] {
        use ParticipantStatus::{Finalizing, Idle, Waiting, Working};
        match phase {
            EvolutionPhase::Idle => &[],
            EvolutionPhase::Sampling => &[
                StatusUpdate {
                    id: "genome-a",
                    status: Working,
                    action: "Mutating layer topology",
                },
                StatusUpdate {
                    id: "genome-b",
                    status: Working,
                    action: "Crossing over attention heads",
                },
            ],
            EvolutionPhase::Training => &[
                StatusUpdate {
                    id: "genome-a",
                    status: Working,
                    action: "Training on shard 4/8",
                },
                StatusUpdate {
                    id: "genome-b",
                    status: Working,
                    action: "Training on shard 4/8",
                },
            ],
            EvolutionPhase::Evaluating => &[
                StatusUpdate {
                    id: "genome-a",
                    status: Waiting,
                    action: "Awaiting fitness score",
                },
                StatusUpdate {
                    id: "genome-b",
                    status: Waiting,
                    action: "Awaiting fitness score",
                },
                StatusUpdate {
                    id: "evaluator",
                    status: Working,
                    action: "Scoring benchmark sweep",
                },
            ],
            EvolutionPhase::Selecting => &[StatusUpdate {
                id: "evaluator",
                status: Working,
                action: "Ranking survivors",
            }],
            EvolutionPhase::Promoting => &[
                StatusUpdate {
                    id: "genome-a",
                    status: Finalizing,
                    action: "Promoted to serving tier",
                },
                StatusUpdate {
                    id: "genome-b",
                    status: Idle,
                    action: "Archived",
                },
                StatusUpdate {
                    id: "evaluator",
                    status: Idle,
                    action: "Sweep complete",
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::steps_to_rest;

    #[test]
    fn test_cycle_returns_to_idle() {
        assert_eq!(steps_to_rest::<EvolutionPhase>(16), Some(5));
    }

    #[test]
    fn test_no_gate_anywhere() {
        let mut phase = EvolutionPhase::first();
        loop {
            assert!(!phase.is_gate());
            phase = phase.next();
            if phase.is_resting() {
                break;
            }
        }
    }

    #[test]
    fn test_projection_targets_exist_in_roster() {
        let domain = EvolutionDomain;
        let roster = domain.roster();
        let mut phase = EvolutionPhase::first();
        loop {
            for update in domain.project(phase) {
                assert!(roster.get(update.id).is_some());
            }
            phase = phase.next();
            if phase.is_resting() {
                break;
            }
        }
    }

    #[test]
    fn test_unlisted_phases_use_default_dwell() {
        let config = crate::config::CycleConfig::default();
        assert_eq!(
            config.dwell_for(EvolutionPhase::Training.label()),
            std::time::Duration::from_millis(config.default_dwell_ms)
        );
    }
}
