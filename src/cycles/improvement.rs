//! The self-improvement cycle: the agents' patch-and-deploy loop.
//!
//! Ten phases from telemetry scan to deployment, with a human approval gate
//! at PR review. This is the only gated cycle; the gate payload is the pull
//! request awaiting sign-off.

use crate::participant::{Participant, ParticipantStatus, Roster, StatusUpdate};
use crate::phase::CyclePhase;
use crate::rng::RandomSource;
use crate::sequencer::CycleDomain;
use crate::sequencer::session::Checkpoint;

/// Title of the synthetic pull request parked on the gate.
const PR_TITLE: &str = "fix(etl): optimize customs regex parser";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImprovementPhase {
    Idle,
    Scanning,
    Planning,
    Coding,
    Testing,
    SkepticReview,
    Arbitration,
    PrReview,
    CiCd,
    Deployed,
}

impl CyclePhase for ImprovementPhase {
    fn resting() -> Self {
        ImprovementPhase::Idle
    }

    fn first() -> Self {
        ImprovementPhase::Scanning
    }

    fn next(self) -> Self {
        match self {
            ImprovementPhase::Idle => ImprovementPhase::Idle,
            ImprovementPhase::Scanning => ImprovementPhase::Planning,
            ImprovementPhase::Planning => ImprovementPhase::Coding,
            ImprovementPhase::Coding => ImprovementPhase::Testing,
            ImprovementPhase::Testing => ImprovementPhase::SkepticReview,
            ImprovementPhase::SkepticReview => ImprovementPhase::Arbitration,
            ImprovementPhase::Arbitration => ImprovementPhase::PrReview,
            ImprovementPhase::PrReview => ImprovementPhase::CiCd,
            ImprovementPhase::CiCd => ImprovementPhase::Deployed,
            ImprovementPhase::Deployed => ImprovementPhase::Idle,
        }
    }

    fn is_gate(self) -> bool {
        self == ImprovementPhase::PrReview
    }

    fn label(self) -> &'static str {
        match self {
            ImprovementPhase::Idle => "IDLE",
            ImprovementPhase::Scanning => "SCANNING",
            ImprovementPhase::Planning => "PLANNING",
            ImprovementPhase::Coding => "CODING",
            ImprovementPhase::Testing => "TESTING",
            ImprovementPhase::SkepticReview => "SKEPTIC_REVIEW",
            ImprovementPhase::Arbitration => "ARBITRATION",
            ImprovementPhase::PrReview => "PR_REVIEW",
            ImprovementPhase::CiCd => "CI_CD",
            ImprovementPhase::Deployed => "DEPLOYED",
        }
    }

    fn progress(self) -> u8 {
        match self {
            ImprovementPhase::Idle => 0,
            ImprovementPhase::Scanning => 10,
            ImprovementPhase::Planning => 22,
            ImprovementPhase::Coding => 38,
            ImprovementPhase::Testing => 52,
            ImprovementPhase::SkepticReview => 64,
            ImprovementPhase::Arbitration => 74,
            ImprovementPhase::PrReview => 84,
            ImprovementPhase::CiCd => 93,
            ImprovementPhase::Deployed => 100,
        }
    }
}

/// Domain content for the self-improvement cycle.
pub struct ImprovementDomain;

impl CycleDomain for ImprovementDomain {
    type Phase = ImprovementPhase;

    fn name(&self) -> &'static str {
        "improvement"
    }

    fn roster(&self) -> Roster {
        Roster::new(vec![
            Participant::new("scout", "Scout-1", "RECON"),
            Participant::new("architect", "Architect-Prime", "PLANNING"),
            Participant::new("coder", "Coder-X1", "ENGINEERING"),
            Participant::new("skeptic", "Skeptic-9", "REVIEW"),
            Participant::new("arbiter", "Arbiter", "REVIEW"),
            Participant::new("devops", "Pipeline-Daemon", "OPERATIONS"),
            Participant::background("sentinel", "Sentinel", "SECURITY"),
            Participant::background("archivist", "Archivist", "KNOWLEDGE"),
        ])
    }

    fn announce(&self, phase: ImprovementPhase) -> Vec<String> {
        match phase {
            ImprovementPhase::Idle => {
                vec!["Cycle complete. All agents returning to standby.".to_string()]
            }
            ImprovementPhase::Scanning => vec![
                "Initiating self-improvement cycle...".to_string(),
                "Scout-1 sweeping telemetry for regression hotspots.".to_string(),
            ],
            ImprovementPhase::Planning => vec![
                "Scan complete. 3 candidate optimizations identified.".to_string(),
                "Architect-Prime drafting remediation plan.".to_string(),
            ],
            ImprovementPhase::Coding => {
                vec!["Plan locked. Coder-X1 writing patch for customs regex parser.".to_string()]
            }
            ImprovementPhase::Testing => {
                vec!["Patch compiled. Running regression suite against staging data.".to_string()]
            }
            ImprovementPhase::SkepticReview => {
                vec!["Tests green. Skeptic-9 hunting for hidden assumptions.".to_string()]
            }
            ImprovementPhase::Arbitration => {
                vec!["Skeptic raised 2 objections. Arbiter weighing the evidence.".to_string()]
            }
            ImprovementPhase::PrReview => {
                vec!["Arbiter ruled in favor. Opening pull request for human review.".to_string()]
            }
            ImprovementPhase::CiCd => {
                vec!["CI/CD pipeline executing. Build artifacts staged for canary.".to_string()]
            }
            ImprovementPhase::Deployed => {
                vec!["Deployment verified. Monitoring stability window.".to_string()]
            }
        }
    }

    fn project(&self, phase: ImprovementPhase) -> &'static [StatusUpdate] {
        use ParticipantStatus::{Finalizing, Idle, Waiting, Working};
        match phase {
            ImprovementPhase::Idle => &[],
            ImprovementPhase::Scanning => &[StatusUpdate {
                id: "scout",
                status: Working,
                action: "Sweeping telemetry streams",
            }],
            ImprovementPhase::Planning => &[
                StatusUpdate {
                    id: "scout",
                    status: Idle,
                    action: "Sweep complete",
                },
                StatusUpdate {
                    id: "architect",
                    status: Working,
                    action: "Drafting remediation plan",
                },
            ],
            ImprovementPhase::Coding => &[
                StatusUpdate {
                    id: "architect",
                    status: Idle,
                    action: "Plan handed off",
                },
                StatusUpdate {
                    id: "coder",
                    status: Working,
                    action: "Writing regex parser patch",
                },
            ],
            ImprovementPhase::Testing => &[StatusUpdate {
                id: "coder",
                status: Working,
                action: "Running regression suite",
            }],
            ImprovementPhase::SkepticReview => &[
                StatusUpdate {
                    id: "coder",
                    status: Waiting,
                    action: "Awaiting review verdict",
                },
                StatusUpdate {
                    id: "skeptic",
                    status: Working,
                    action: "Challenging patch assumptions",
                },
            ],
            ImprovementPhase::Arbitration => &[
                StatusUpdate {
                    id: "skeptic",
                    status: Waiting,
                    action: "Objections filed",
                },
                StatusUpdate {
                    id: "arbiter",
                    status: Working,
                    action: "Weighing objections",
                },
            ],
            ImprovementPhase::PrReview => &[
                StatusUpdate {
                    id: "skeptic",
                    status: Idle,
                    action: "Review closed",
                },
                StatusUpdate {
                    id: "arbiter",
                    status: Finalizing,
                    action: "Awaiting human sign-off",
                },
                StatusUpdate {
                    id: "devops",
                    status: Waiting,
                    action: "Pipeline armed",
                },
            ],
            ImprovementPhase::CiCd => &[
                StatusUpdate {
                    id: "coder",
                    status: Idle,
                    action: "Patch merged",
                },
                StatusUpdate {
                    id: "arbiter",
                    status: Idle,
                    action: "Verdict delivered",
                },
                StatusUpdate {
                    id: "devops",
                    status: Working,
                    action: "Executing CI/CD pipeline",
                },
            ],
            ImprovementPhase::Deployed => &[StatusUpdate {
                id: "devops",
                status: Finalizing,
                action: "Watching canary metrics",
            }],
        }
    }

    fn checkpoint(&self, rng: &mut dyn RandomSource) -> Checkpoint {
        Checkpoint {
            id: rng.int_in(100, 1099),
            title: PR_TITLE.to_string(),
        }
    }

    fn flicker(&self, id: &str, rng: &mut dyn RandomSource) -> Option<&'static str> {
        let options: &[&'static str] = match id {
            "sentinel" => &[
                "Rotating honeypot credentials",
                "Replaying intrusion signatures",
                "Auditing egress rules",
            ],
            "archivist" => &["Reindexing incident memory", "Compacting decision journal"],
            _ => return None,
        };
        Some(options[rng.pick(options.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::steps_to_rest;
    use crate::rng::StdRandom;

    #[test]
    fn test_cycle_returns_to_idle() {
        // 9 working phases after SCANNING
        assert_eq!(steps_to_rest::<ImprovementPhase>(32), Some(9));
    }

    #[test]
    fn test_gate_is_pr_review_only() {
        let mut phase = ImprovementPhase::first();
        let mut gates = 0;
        loop {
            if phase.is_gate() {
                gates += 1;
                assert_eq!(phase, ImprovementPhase::PrReview);
            }
            phase = phase.next();
            if phase.is_resting() {
                break;
            }
        }
        assert_eq!(gates, 1);
    }

    #[test]
    fn test_labels_match_dwell_table_keys() {
        let config = crate::config::CycleConfig::default();
        for (label, expected_ms) in [
            (ImprovementPhase::Scanning.label(), 4000),
            (ImprovementPhase::Planning.label(), 3000),
            (ImprovementPhase::Coding.label(), 5000),
            (ImprovementPhase::CiCd.label(), 6000),
        ] {
            assert_eq!(
                config.dwell_for(label),
                std::time::Duration::from_millis(expected_ms)
            );
        }
    }

    #[test]
    fn test_checkpoint_id_in_observed_range() {
        let domain = ImprovementDomain;
        let mut rng = StdRandom::seeded(3);
        for _ in 0..64 {
            let checkpoint = domain.checkpoint(&mut rng);
            assert!((100..=1099).contains(&checkpoint.id));
            assert_eq!(checkpoint.title, PR_TITLE);
        }
    }

    #[test]
    fn test_projection_is_deterministic() {
        let domain = ImprovementDomain;
        let a = domain.project(ImprovementPhase::Arbitration);
        let b = domain.project(ImprovementPhase::Arbitration);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.id, y.id);
            assert_eq!(x.status, y.status);
            assert_eq!(x.action, y.action);
        }
    }

    #[test]
    fn test_projection_targets_exist_in_roster() {
        let domain = ImprovementDomain;
        let roster = domain.roster();
        let mut phase = ImprovementPhase::first();
        loop {
            for update in domain.project(phase) {
                assert!(
                    roster.get(update.id).is_some(),
                    "projection for {} targets unknown participant {}",
                    phase.label(),
                    update.id
                );
            }
            phase = phase.next();
            if phase.is_resting() {
                break;
            }
        }
    }

    #[test]
    fn test_flicker_only_names_background_participants() {
        let domain = ImprovementDomain;
        let roster = domain.roster();
        let mut rng = StdRandom::seeded(9);
        for p in roster.iter() {
            let flavor = domain.flicker(&p.id, &mut rng);
            assert_eq!(flavor.is_some(), p.background);
        }
    }

    #[test]
    fn test_progress_is_monotonic_until_rest() {
        let mut phase = ImprovementPhase::first();
        let mut last = 0;
        while !phase.is_resting() {
            assert!(phase.progress() > last);
            last = phase.progress();
            phase = phase.next();
        }
        assert_eq!(last, 100);
    }
}
