//! The phase sequencer: one engine behind every live-cycle view.
//!
//! This module provides:
//! - [`CycleDomain`] — the seam where a call-site supplies its domain
//!   content (phase enum, roster, log templates, gate payload)
//! - [`Sequencer`] — owns the session, advances the phase on a timer, and
//!   parks at the approval gate until `approve()`/`reject()`
//! - the background variation ticker that animates idle participants
//!
//! All session mutation happens synchronously under one lock, inside timer
//! callbacks or user-triggered handlers. Invalid operations (`start()` while
//! running, `approve()` with no checkpoint, `advance()` at the gate) are
//! silent no-ops surfaced only as `tracing` debug lines: this drives an
//! interactive view, and a crash there is never acceptable.

pub mod log;
pub mod session;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;

use crate::config::CycleConfig;
use crate::participant::{ParticipantStatus, Roster, STANDBY, StatusUpdate};
use crate::phase::CyclePhase;
use crate::rng::{RandomSource, StdRandom};
use crate::sequencer::session::{Checkpoint, CycleSnapshot, Session};

/// Domain content for one cycle: everything the engine does not own.
///
/// Implementations are pure data suppliers. `announce` and `project` must be
/// deterministic in the phase; the only random draws a domain makes go
/// through the [`RandomSource`] handed to it.
pub trait CycleDomain: Send + Sync + 'static {
    type Phase: CyclePhase;

    /// Cycle name shown in snapshots and diagnostics.
    fn name(&self) -> &'static str;

    /// The participants this cycle animates, in display order.
    fn roster(&self) -> Roster;

    /// Log lines emitted on entry into `phase`.
    fn announce(&self, phase: Self::Phase) -> Vec<String>;

    /// Deterministic participant updates applied on entry into `phase`.
    fn project(&self, phase: Self::Phase) -> &'static [StatusUpdate];

    /// Payload parked on the approval gate. Only called for gated cycles,
    /// on first entry into the gate phase.
    fn checkpoint(&self, rng: &mut dyn RandomSource) -> Checkpoint {
        let _ = rng;
        Checkpoint::default()
    }

    /// Flavor action for one background participant tick, or `None` to
    /// leave the participant idle.
    fn flicker(&self, id: &str, rng: &mut dyn RandomSource) -> Option<&'static str> {
        let _ = (id, rng);
        None
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Apply everything that happens on entry into the session's current phase:
/// progress, announcement lines, the status projection, and (for the gate)
/// the checkpoint payload. Resting entry resets the roster.
fn enter_phase<D: CycleDomain>(
    session: &mut Session<D::Phase>,
    domain: &D,
    rng: &mut dyn RandomSource,
) {
    let phase = session.phase;
    session.progress = phase.progress();

    for line in domain.announce(phase) {
        session.log.push(line);
    }
    session.participants.apply(domain.project(phase));

    if phase.is_gate() && session.checkpoint.is_none() {
        let checkpoint = domain.checkpoint(rng);
        session.log.push(format!(
            "[GATE] #{} awaiting human approval: {}",
            checkpoint.id, checkpoint.title
        ));
        session.checkpoint = Some(checkpoint);
    }

    if phase.is_resting() {
        session.participants.reset_all();
        session.progress = 0;
    }
}

/// Timer-driven sequencer over one [`CycleDomain`].
///
/// `start`, `approve`, and `start_variation` spawn tokio tasks and must be
/// called from within a runtime. One session is active at a time; `start()`
/// while away from rest is a no-op.
pub struct Sequencer<D: CycleDomain> {
    domain: Arc<D>,
    config: Arc<CycleConfig>,
    session: Arc<Mutex<Session<D::Phase>>>,
    rng: Arc<Mutex<Box<dyn RandomSource>>>,
    driver: Mutex<Option<JoinHandle<()>>>,
    variation: Mutex<Option<JoinHandle<()>>>,
}

impl<D: CycleDomain> Sequencer<D> {
    pub fn new(domain: D, config: CycleConfig) -> Self {
        Self::with_rng(domain, config, Box::new(StdRandom::new()))
    }

    /// Construct with an explicit random source, for deterministic tests.
    pub fn with_rng(domain: D, config: CycleConfig, rng: Box<dyn RandomSource>) -> Self {
        let session = Session::new(domain.roster(), config.log_capacity);
        Self {
            domain: Arc::new(domain),
            config: Arc::new(config),
            session: Arc::new(Mutex::new(session)),
            rng: Arc::new(Mutex::new(rng)),
            driver: Mutex::new(None),
            variation: Mutex::new(None),
        }
    }

    /// Begin a session. No-op unless the phase is at rest.
    ///
    /// Returns `true` when a session actually started.
    pub fn start(&self) -> bool {
        let generation = {
            let mut session = lock(&self.session);
            if session.disposed || !session.phase.is_resting() {
                tracing::debug!(
                    cycle = self.domain.name(),
                    phase = session.phase.label(),
                    "start ignored: session already active"
                );
                return false;
            }
            session.generation += 1;
            session.checkpoint = None;
            session.phase = D::Phase::first();
            let mut rng = lock(&self.rng);
            enter_phase(&mut session, self.domain.as_ref(), rng.as_mut());
            session.generation
        };
        self.spawn_driver(generation);
        true
    }

    /// Move to the successor phase. Normally invoked by the driver timer;
    /// exposed for externally clocked callers. No-op at rest and at the
    /// gate: only `approve()` moves past a pending checkpoint.
    pub fn advance(&self) {
        let mut session = lock(&self.session);
        if session.disposed {
            return;
        }
        if session.phase.is_resting() {
            tracing::debug!(cycle = self.domain.name(), "advance ignored at rest");
            return;
        }
        if session.phase.is_gate() {
            tracing::debug!(cycle = self.domain.name(), "advance blocked at gate");
            return;
        }
        session.phase = session.phase.next();
        let mut rng = lock(&self.rng);
        enter_phase(&mut session, self.domain.as_ref(), rng.as_mut());
    }

    /// Approve the pending checkpoint and resume the timed cycle.
    ///
    /// No-op (returning `false`) when no checkpoint is pending, so a second
    /// call cannot advance the cycle twice.
    pub fn approve(&self) -> bool {
        let generation = {
            let mut session = lock(&self.session);
            if session.disposed {
                return false;
            }
            let Some(checkpoint) = session.checkpoint.take() else {
                tracing::debug!(cycle = self.domain.name(), "approve ignored: no checkpoint");
                return false;
            };
            session
                .log
                .push(format!("[GATE] #{} approved. Resuming cycle.", checkpoint.id));
            session.generation += 1;
            session.phase = session.phase.next();
            let mut rng = lock(&self.rng);
            enter_phase(&mut session, self.domain.as_ref(), rng.as_mut());
            session.generation
        };
        self.spawn_driver(generation);
        true
    }

    /// Reject the pending checkpoint: log it, clear it, and reset the whole
    /// session to rest. No-op when no checkpoint is pending.
    pub fn reject(&self) -> bool {
        let mut session = lock(&self.session);
        if session.disposed {
            return false;
        }
        let Some(checkpoint) = session.checkpoint.take() else {
            tracing::debug!(cycle = self.domain.name(), "reject ignored: no checkpoint");
            return false;
        };
        session.log.push(format!(
            "[GATE] #{} rejected. Cycle aborted, all agents to standby.",
            checkpoint.id
        ));
        session.generation += 1;
        session.phase = D::Phase::resting();
        session.progress = 0;
        session.participants.reset_all();
        true
    }

    /// Append one timestamped line to the session log.
    pub fn add_log(&self, message: impl Into<String>) {
        let mut session = lock(&self.session);
        if session.disposed {
            return;
        }
        session.log.push(message);
    }

    /// Start the independent background variation ticker. It flips only
    /// `background` participants and never interacts with the phase cycle.
    pub fn start_variation(&self) {
        let session = Arc::clone(&self.session);
        let domain = Arc::clone(&self.domain);
        let rng = Arc::clone(&self.rng);
        let interval = self.config.variation_interval();

        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                let mut session = lock(&session);
                if session.disposed {
                    return;
                }
                let mut rng = lock(&rng);
                for participant in session.participants.background_mut() {
                    if rng.next_f64() > 0.7 {
                        if let Some(action) = domain.flicker(&participant.id, rng.as_mut()) {
                            participant.status = ParticipantStatus::Working;
                            participant.action = action.to_string();
                        }
                    } else {
                        participant.status = ParticipantStatus::Idle;
                        participant.action = STANDBY.to_string();
                    }
                }
            }
        });

        if let Some(old) = lock(&self.variation).replace(handle) {
            old.abort();
        }
    }

    /// Tear down: no timer fires and no state mutates after this returns.
    /// Required when the owning view goes away mid-cycle.
    pub fn dispose(&self) {
        {
            let mut session = lock(&self.session);
            session.disposed = true;
            session.generation += 1;
        }
        if let Some(driver) = lock(&self.driver).take() {
            driver.abort();
        }
        if let Some(variation) = lock(&self.variation).take() {
            variation.abort();
        }
    }

    /// Read-only snapshot for display layers.
    pub fn snapshot(&self) -> CycleSnapshot {
        let session = lock(&self.session);
        CycleSnapshot {
            cycle: self.domain.name().to_string(),
            phase: session.phase.label().to_string(),
            resting: session.phase.is_resting(),
            gated: session.checkpoint.is_some(),
            progress: session.progress,
            participants: session.participants.iter().cloned().collect(),
            logs: session.log.to_lines(),
            checkpoint: session.checkpoint.clone(),
        }
    }

    /// Typed current phase.
    pub fn phase(&self) -> D::Phase {
        lock(&self.session).phase
    }

    pub fn is_active(&self) -> bool {
        !lock(&self.session).phase.is_resting()
    }

    pub fn checkpoint(&self) -> Option<Checkpoint> {
        lock(&self.session).checkpoint.clone()
    }

    pub fn log_len(&self) -> usize {
        lock(&self.session).log.len()
    }

    pub fn config(&self) -> &CycleConfig {
        &self.config
    }

    /// Spawn the auto-advance driver for the current session generation,
    /// replacing any previous driver. The driver exits at the gate, at
    /// rest, and whenever the generation it was scheduled for is gone.
    fn spawn_driver(&self, generation: u64) {
        let session = Arc::clone(&self.session);
        let domain = Arc::clone(&self.domain);
        let config = Arc::clone(&self.config);
        let rng = Arc::clone(&self.rng);

        let handle = tokio::spawn(async move {
            loop {
                let dwell = {
                    let session = lock(&session);
                    if session.disposed || session.generation != generation {
                        return;
                    }
                    if session.phase.is_resting() || session.phase.is_gate() {
                        return;
                    }
                    config.dwell_for(session.phase.label())
                };

                tokio::time::sleep(dwell).await;

                let parked = {
                    let mut session = lock(&session);
                    if session.disposed || session.generation != generation {
                        return;
                    }
                    if session.phase.is_resting() || session.phase.is_gate() {
                        return;
                    }
                    session.phase = session.phase.next();
                    let mut rng = lock(&rng);
                    enter_phase(&mut session, domain.as_ref(), rng.as_mut());
                    session.phase.is_resting() || session.phase.is_gate()
                };
                if parked {
                    return;
                }
            }
        });

        if let Some(old) = lock(&self.driver).replace(handle) {
            old.abort();
        }
    }
}

impl<D: CycleDomain> Drop for Sequencer<D> {
    fn drop(&mut self) {
        if let Some(driver) = lock(&self.driver).take() {
            driver.abort();
        }
        if let Some(variation) = lock(&self.variation).take() {
            variation.abort();
        }
    }
}
