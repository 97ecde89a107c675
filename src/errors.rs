//! Typed errors for the remote status boundary.
//!
//! Transport failures never reach a display layer as errors: the client and
//! poller recover them into the offline default status plus a single
//! `[ERROR]` log line. The typed variants exist so that recovery code and
//! tests can tell failure modes apart.

use thiserror::Error;

/// Failures talking to a remote cycle's status endpoints.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("status endpoint returned HTTP {status}")]
    UnexpectedStatus { status: u16 },

    #[error("malformed status payload: {0}")]
    MalformedBody(#[source] reqwest::Error),
}
