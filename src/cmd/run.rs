//! `predator run`: drive a cycle locally with the terminal view.

use std::time::Duration;

use anyhow::Result;
use clap::ValueEnum;

use predator::config::CycleConfig;
use predator::cycles::{DebateDomain, EvolutionDomain, ImprovementDomain};
use predator::gates::{GateDecision, ReviewGate};
use predator::sequencer::{CycleDomain, Sequencer};
use predator::ui::CycleUI;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CycleArg {
    Improvement,
    Evolution,
    Debate,
}

pub async fn execute(cycle: CycleArg, config: CycleConfig, yes: bool) -> Result<()> {
    match cycle {
        CycleArg::Improvement => {
            let sequencer = Sequencer::new(ImprovementDomain, config);
            sequencer.start_variation();
            sequencer.start();
            drive(sequencer, yes).await
        }
        CycleArg::Evolution => {
            let sequencer = Sequencer::new(EvolutionDomain, config);
            sequencer.start();
            drive(sequencer, yes).await
        }
        CycleArg::Debate => {
            let sequencer = Sequencer::new(DebateDomain, config);
            sequencer.start_variation();
            sequencer.start();
            drive(sequencer, yes).await
        }
    }
}

/// Render an already-started sequencer until it returns to rest, pausing at
/// the review gate for a decision.
pub async fn drive<D: CycleDomain>(sequencer: Sequencer<D>, auto_approve: bool) -> Result<()> {
    let gate = ReviewGate::new(auto_approve);
    let mut ui = CycleUI::new(&sequencer.snapshot().cycle);

    loop {
        let snapshot = sequencer.snapshot();
        ui.render(&snapshot);

        if snapshot.resting {
            break;
        }

        if let Some(checkpoint) = snapshot.checkpoint.clone() {
            // dialoguer blocks on stdin; keep it off the runtime workers.
            let decision =
                tokio::task::spawn_blocking(move || gate.decide(&checkpoint)).await??;
            match decision {
                GateDecision::Approved => {
                    sequencer.approve();
                }
                GateDecision::Rejected => {
                    sequencer.reject();
                }
            }
            continue;
        }

        tokio::time::sleep(Duration::from_millis(200)).await;
    }

    sequencer.dispose();
    ui.finish("cycle complete");
    Ok(())
}
