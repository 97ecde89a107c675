//! `predator serve`: expose an evolution cycle behind the status endpoints.

use std::sync::Arc;

use anyhow::Result;

use predator::config::CycleConfig;
use predator::cycles::EvolutionDomain;
use predator::sequencer::Sequencer;
use predator::server::{AppState, ServerConfig, start_server};

pub async fn execute(port: u16, config: CycleConfig) -> Result<()> {
    let state = Arc::new(AppState {
        sequencer: Sequencer::new(EvolutionDomain, config),
    });
    start_server(ServerConfig { port }, state).await
}
