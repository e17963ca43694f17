//! Error taxonomy for the interposition engine.
//!
//! Five distinguishable kinds, matched to the broker state machine's failure
//! points. The core never swallows or retries: every error here is meant to
//! surface all the way to the caller.

use std::path::PathBuf;
use thiserror::Error;

use crate::broker::BrokerMode;
use crate::request::Request;

/// Underlying cause of a cassette `load`/`save` failure, kept distinct from
/// [`InterposerError`] so the store layer can build it without already
/// knowing which operation failed.
#[derive(Debug, Error)]
pub enum CassetteIoError {
    #[error("storage not found at {}", .path.display())]
    Missing { path: PathBuf },

    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed cassette content at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize cassette content for {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The error taxonomy described by the interposition engine's contract.
#[derive(Debug, Error)]
pub enum InterposerError {
    /// `replay` on a fingerprint with no cassette entry, in a mode where that
    /// is fatal.
    #[error("no recorded interaction for {}/{} {}", .request.protocol(), .request.action(), .request.target())]
    InteractionNotFound { request: Request },

    /// An `Interaction`/`Cassette` was constructed with invariants violated:
    /// a fingerprint that does not match its request, or a non-contiguous
    /// chunk sequence, or an empty required field.
    #[error("interaction validation failed: {reason}")]
    InteractionValidation { reason: String },

    /// Broker construction with `record`/`auto` mode and no live responder.
    #[error("broker mode {mode} requires a live responder")]
    LiveResponderRequired { mode: BrokerMode },

    /// Store `load` failed.
    #[error("failed to load cassette")]
    CassetteLoad {
        #[source]
        source: CassetteIoError,
    },

    /// Store `save` failed.
    #[error("failed to save cassette")]
    CassetteSave {
        #[source]
        source: CassetteIoError,
    },
}

impl InterposerError {
    pub fn interaction_not_found(request: Request) -> Self {
        Self::InteractionNotFound { request }
    }

    pub fn interaction_validation(reason: impl Into<String>) -> Self {
        Self::InteractionValidation {
            reason: reason.into(),
        }
    }

    pub fn live_responder_required(mode: BrokerMode) -> Self {
        Self::LiveResponderRequired { mode }
    }

    pub fn cassette_load(source: CassetteIoError) -> Self {
        Self::CassetteLoad { source }
    }

    pub fn cassette_save(source: CassetteIoError) -> Self {
        Self::CassetteSave { source }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::InteractionNotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InteractionValidation { .. })
    }

    pub fn is_live_responder_required(&self) -> bool {
        matches!(self, Self::LiveResponderRequired { .. })
    }

    pub fn is_load_error(&self) -> bool {
        matches!(self, Self::CassetteLoad { .. })
    }

    pub fn is_save_error(&self) -> bool {
        matches!(self, Self::CassetteSave { .. })
    }
}
