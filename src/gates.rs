//! Interactive review gate for the terminal runner.

use anyhow::Result;
use dialoguer::{Select, theme::ColorfulTheme};

use crate::sequencer::session::Checkpoint;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateDecision {
    Approved,
    Rejected,
}

/// Decides the fate of a gated checkpoint: auto-approve under `--yes`,
/// otherwise prompt the human.
#[derive(Debug, Clone, Copy)]
pub struct ReviewGate {
    auto_approve: bool,
}

impl ReviewGate {
    pub fn new(auto_approve: bool) -> Self {
        Self { auto_approve }
    }

    pub fn decide(&self, checkpoint: &Checkpoint) -> Result<GateDecision> {
        if self.auto_approve {
            println!("  {} (--yes flag)", console::style("Auto-approved").dim());
            return Ok(GateDecision::Approved);
        }

        let options = &["Approve: merge and deploy", "Reject: abort the cycle"];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("PR #{}: {}", checkpoint.id, checkpoint.title))
            .items(options)
            .default(0)
            .interact()?;

        match selection {
            0 => Ok(GateDecision::Approved),
            1 => Ok(GateDecision::Rejected),
            _ => unreachable!(),
        }
    }
}
