//! Terminal view for a running cycle, rendered via `indicatif`.
//!
//! Two bars are stacked vertically:
//! - Cycle bar — overall progress with the current phase label
//! - Agents bar — spinner listing the participants currently working
//!
//! New session log lines are printed above the bars as they appear. The
//! view only reads snapshots; it never mutates sequencer state.

use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::participant::ParticipantStatus;
use crate::sequencer::session::CycleSnapshot;

pub struct CycleUI {
    multi: MultiProgress,
    cycle_bar: ProgressBar,
    agents_bar: ProgressBar,
    printed_logs: usize,
}

impl CycleUI {
    pub fn new(cycle: &str) -> Self {
        Self::with_draw_target(cycle, ProgressDrawTarget::stderr())
    }

    /// Hidden variant for tests.
    pub fn hidden(cycle: &str) -> Self {
        Self::with_draw_target(cycle, ProgressDrawTarget::hidden())
    }

    fn with_draw_target(cycle: &str, target: ProgressDrawTarget) -> Self {
        let multi = MultiProgress::with_draw_target(target);

        let cycle_style = ProgressStyle::default_bar()
            .template("{prefix:.bold.dim} [{bar:40.cyan/blue}] {pos:>3}/100 {msg}")
            .expect("progress bar template is a valid static string")
            .progress_chars("█▓▒░");

        let cycle_bar = multi.add(ProgressBar::new(100));
        cycle_bar.set_style(cycle_style);
        cycle_bar.set_prefix(format!("{cycle:>6}"));

        let agents_style = ProgressStyle::default_spinner()
            .template("{prefix:.bold.dim} {spinner} {msg}")
            .expect("progress bar template is a valid static string");

        let agents_bar = multi.add(ProgressBar::new_spinner());
        agents_bar.set_style(agents_style);
        agents_bar.set_prefix("Agents");

        Self {
            multi,
            cycle_bar,
            agents_bar,
            printed_logs: 0,
        }
    }

    /// Render one snapshot: update both bars and print any new log lines.
    pub fn render(&mut self, snapshot: &CycleSnapshot) {
        self.cycle_bar.set_position(u64::from(snapshot.progress));
        self.cycle_bar.set_message(snapshot.phase.clone());

        let working: Vec<&str> = snapshot
            .participants
            .iter()
            .filter(|p| p.status == ParticipantStatus::Working)
            .map(|p| p.name.as_str())
            .collect();
        self.agents_bar.set_message(if working.is_empty() {
            "standby".to_string()
        } else {
            working.join(", ")
        });
        self.agents_bar.tick();

        for line in snapshot.logs.iter().skip(self.printed_logs) {
            let styled = if line.contains("[ERROR]") {
                style(line.as_str()).red().to_string()
            } else if line.contains("[GATE]") {
                style(line.as_str()).yellow().to_string()
            } else {
                line.clone()
            };
            self.cycle_bar.println(styled);
        }
        self.printed_logs = snapshot.logs.len();
    }

    pub fn finish(&self, message: &str) {
        self.cycle_bar.finish_with_message(message.to_string());
        self.agents_bar.finish_and_clear();
        let _ = self.multi.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participant::Participant;

    fn snapshot(logs: Vec<String>) -> CycleSnapshot {
        CycleSnapshot {
            cycle: "improvement".to_string(),
            phase: "SCANNING".to_string(),
            resting: false,
            gated: false,
            progress: 10,
            participants: vec![Participant::new("scout", "Scout-1", "RECON")],
            logs,
            checkpoint: None,
        }
    }

    #[test]
    fn test_render_tracks_printed_lines() {
        let mut ui = CycleUI::hidden("improvement");
        ui.render(&snapshot(vec!["one".to_string()]));
        assert_eq!(ui.printed_logs, 1);

        ui.render(&snapshot(vec!["one".to_string(), "two".to_string()]));
        assert_eq!(ui.printed_logs, 2);
        ui.finish("done");
    }
}
