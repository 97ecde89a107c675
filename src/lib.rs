//! Phase-sequencing engine behind the Predator Analytics live-cycle views.
//!
//! One generic [`sequencer::Sequencer`] drives every cycle; the
//! [`cycles`] modules supply domain content only. The [`remote`] module
//! mirrors a server-backed cycle through a polling adapter, and [`server`]
//! exposes the matching mock endpoints.

pub mod config;
pub mod cycles;
pub mod errors;
pub mod gates;
pub mod participant;
pub mod phase;
pub mod remote;
pub mod rng;
pub mod sequencer;
pub mod server;
pub mod ui;
