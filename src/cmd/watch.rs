//! `predator watch`: mirror a remote cycle through the polling adapter.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use console::style;

use predator::config::CycleConfig;
use predator::cycles::EvolutionDomain;
use predator::remote::client::StatusClient;
use predator::remote::launch_cycle;
use predator::remote::poller::StatusPoller;
use predator::sequencer::Sequencer;

pub async fn execute(url: &str, start: bool, continuous: bool, config: CycleConfig) -> Result<()> {
    let client = Arc::new(StatusClient::new(url));

    if start {
        let sequencer = Sequencer::new(EvolutionDomain, config.clone());
        let running = launch_cycle(client.as_ref(), &sequencer, config.on_start_failure).await;
        for line in sequencer.snapshot().logs {
            print_line(&line);
        }
        if sequencer.is_active() {
            // The remote was unreachable and the fallback policy kicked in:
            // the local simulation owns the cycle now.
            return crate::cmd::run::drive(sequencer, true).await;
        }
        sequencer.dispose();
        if !running {
            return Ok(());
        }
    }

    let poller = StatusPoller::new(client, config.poll_interval()).continuous(continuous);
    poller.start();

    let mut printed = 0usize;
    loop {
        let state = poller.snapshot();
        for line in state.logs.iter().skip(printed) {
            print_line(line);
        }
        printed = state.logs.len();

        if !poller.is_polling() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
    }

    let state = poller.snapshot();
    for line in state.logs.iter().skip(printed) {
        print_line(line);
    }
    println!(
        "{} phase={} progress={}%",
        style("remote cycle idle").dim(),
        state.phase,
        state.progress
    );
    Ok(())
}

fn print_line(line: &str) {
    if line.contains("[ERROR]") {
        println!("{}", style(line).red());
    } else {
        println!("{line}");
    }
}
