//! Request canonicalization and fingerprinting (spec §4.1).
//!
//! Canonical serialization is a length-prefixed framing of
//! `protocol, action, target, headers, body` — injective, so distinct
//! requests never collide except with SHA-256's cryptographic probability.
//! Headers are framed in the order given: not sorted, not case-folded, not
//! deduplicated. Order is part of identity.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::errors::InterposerError;
use crate::request::Request;

/// Byte width of a fingerprint digest (SHA-256).
pub const FINGERPRINT_BYTES: usize = 32;

/// A 256-bit content hash uniquely identifying a [`Request`].
///
/// Equality and hashing use the raw digest, never the hex rendering.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; FINGERPRINT_BYTES]);

impl Fingerprint {
    pub fn as_bytes(&self) -> &[u8; FINGERPRINT_BYTES] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a lowercase hex digest, as persisted by the reference file store.
    pub fn from_hex(s: &str) -> Result<Self, InterposerError> {
        let bytes = hex::decode(s).map_err(|e| {
            InterposerError::interaction_validation(format!("invalid fingerprint hex: {e}"))
        })?;
        if bytes.len() != FINGERPRINT_BYTES {
            return Err(InterposerError::interaction_validation(format!(
                "fingerprint must be {FINGERPRINT_BYTES} bytes, got {}",
                bytes.len()
            )));
        }
        let mut out = [0u8; FINGERPRINT_BYTES];
        out.copy_from_slice(&bytes);
        Ok(Self(out))
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Fingerprint::from_hex(&s).map_err(D::Error::custom)
    }
}

fn write_field(buf: &mut Vec<u8>, bytes: &[u8]) {
    buf.extend_from_slice(&(bytes.len() as u64).to_le_bytes());
    buf.extend_from_slice(bytes);
}

/// Deterministic byte encoding of a request's fields, in fixed order.
///
/// This is the canonical serialization described in spec §4.1: a
/// length-prefixed framing is injective by construction, so no delimiter can
/// ever be confused with field content.
pub fn canonicalize(request: &Request) -> Vec<u8> {
    let mut buf = Vec::new();
    write_field(&mut buf, request.protocol().as_bytes());
    write_field(&mut buf, request.action().as_bytes());
    write_field(&mut buf, request.target().as_bytes());

    buf.extend_from_slice(&(request.headers().len() as u64).to_le_bytes());
    for (name, value) in request.headers() {
        write_field(&mut buf, name.as_bytes());
        write_field(&mut buf, value.as_bytes());
    }

    write_field(&mut buf, request.body());
    buf
}

/// Compute the SHA-256 fingerprint of a request's canonical serialization.
pub fn compute(request: &Request) -> Fingerprint {
    let canonical = canonicalize(request);
    let digest = Sha256::digest(&canonical);
    let mut out = [0u8; FINGERPRINT_BYTES];
    out.copy_from_slice(&digest);
    Fingerprint(out)
}
