//! Remote cycle boundary: status client, polling adapter, and the
//! start-signal fallback policy.

pub mod client;
pub mod poller;

use async_trait::async_trait;

use crate::config::FailurePolicy;
use crate::errors::TransportError;
use crate::sequencer::{CycleDomain, Sequencer};
use client::CycleStatus;

/// Anything that can start a remote cycle and report its status.
///
/// The HTTP [`client::StatusClient`] is the production implementation;
/// tests substitute scripted sources to count fetches and inject failures.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fire-and-forget start signal.
    async fn trigger(&self) -> Result<(), TransportError>;

    /// One status fetch.
    async fn fetch(&self) -> Result<CycleStatus, TransportError>;
}

/// Send the remote start signal, applying the configured failure policy.
///
/// On success the sequencer just logs the acceptance; the remote is the
/// source of truth and the poller mirrors it. On failure an `[ERROR]` line
/// lands in the session log and, under [`FailurePolicy::FallbackLocal`],
/// the local sequencer simulates the cycle instead. Returns `true` when a
/// cycle is running somewhere (remote or local).
pub async fn launch_cycle<D: CycleDomain>(
    source: &dyn StatusSource,
    sequencer: &Sequencer<D>,
    policy: FailurePolicy,
) -> bool {
    match source.trigger().await {
        Ok(()) => {
            sequencer.add_log("Backend cycle start signal accepted.");
            true
        }
        Err(err) => {
            sequencer.add_log(format!("[ERROR] Failed to start backend cycle: {err}"));
            match policy {
                FailurePolicy::FallbackLocal => {
                    sequencer.add_log("Falling back to local simulation.");
                    sequencer.start()
                }
                FailurePolicy::Halt => {
                    tracing::warn!(cycle = %sequencer.snapshot().cycle, "remote start failed, halting");
                    false
                }
            }
        }
    }
}
