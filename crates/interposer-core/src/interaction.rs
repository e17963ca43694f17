//! `Interaction`: a recorded request paired with its fingerprint and ordered
//! response chunks.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::chunk::ResponseChunk;
use crate::errors::InterposerError;
use crate::fingerprint::{self, Fingerprint};
use crate::request::Request;

/// One recorded request/response pair.
///
/// Invariants enforced at construction: `fingerprint == canonical_hash(request)`,
/// and `response_chunks` sequence numbers form `0, 1, …, N-1` in storage order.
///
/// Fields are private: `new`/`from_parts`/`with_precomputed_fingerprint` are
/// the only way to produce a value, so a struct literal (or a cassette built
/// from a hand-assembled `Vec<Interaction>`) can never carry a fingerprint
/// that doesn't match its request.
#[derive(Debug, Clone, Serialize)]
pub struct Interaction {
    request: Request,
    fingerprint: Fingerprint,
    response_chunks: Vec<ResponseChunk>,
}

/// Plain shape matching the persisted JSON layout, with none of
/// `Interaction`'s invariants enforced yet.
#[derive(Deserialize)]
struct RawInteraction {
    request: Request,
    fingerprint: Fingerprint,
    response_chunks: Vec<ResponseChunk>,
}

impl<'de> Deserialize<'de> for Interaction {
    // Deserialization must re-validate every fingerprint (spec §4.3): a
    // derived `Deserialize` would build the struct straight from the file,
    // bypassing `from_parts`'s revalidation entirely.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawInteraction::deserialize(deserializer)?;
        Interaction::from_parts(raw.request, raw.fingerprint, raw.response_chunks)
            .map_err(D::Error::custom)
    }
}

impl Interaction {
    /// Construct a fresh interaction, computing its fingerprint.
    pub fn new(
        request: Request,
        response_chunks: Vec<ResponseChunk>,
    ) -> Result<Self, InterposerError> {
        let fp = fingerprint::compute(&request);
        Self::build(request, fp, response_chunks)
    }

    /// Construct from a fingerprint already computed by the caller (the
    /// broker computes it once per `replay` call and reuses it here rather
    /// than hashing the request a second time).
    pub(crate) fn with_precomputed_fingerprint(
        request: Request,
        fingerprint: Fingerprint,
        response_chunks: Vec<ResponseChunk>,
    ) -> Result<Self, InterposerError> {
        Self::build(request, fingerprint, response_chunks)
    }

    /// Reconstruct a persisted interaction, re-validating that its stored
    /// fingerprint still matches the request (spec §4.3: deserialization
    /// recomputes and re-validates every fingerprint).
    pub fn from_parts(
        request: Request,
        fingerprint: Fingerprint,
        response_chunks: Vec<ResponseChunk>,
    ) -> Result<Self, InterposerError> {
        let expected = fingerprint::compute(&request);
        if expected != fingerprint {
            return Err(InterposerError::interaction_validation(format!(
                "fingerprint mismatch: expected {expected}, stored {fingerprint}"
            )));
        }
        Self::build(request, fingerprint, response_chunks)
    }

    fn build(
        request: Request,
        fingerprint: Fingerprint,
        response_chunks: Vec<ResponseChunk>,
    ) -> Result<Self, InterposerError> {
        for (i, chunk) in response_chunks.iter().enumerate() {
            if chunk.sequence != i as u64 {
                return Err(InterposerError::interaction_validation(format!(
                    "response chunk sequence must be contiguous from 0; expected {i}, got {}",
                    chunk.sequence
                )));
            }
        }
        Ok(Self {
            request,
            fingerprint,
            response_chunks,
        })
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    pub fn response_chunks(&self) -> &[ResponseChunk] {
        &self.response_chunks
    }
}
