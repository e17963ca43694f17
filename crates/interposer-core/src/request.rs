//! The `Request` value type: canonicalizable request metadata.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::InterposerError;
use crate::store::base64_field;

/// An ordered header pair. Order is semantically significant for matching —
/// see [`crate::fingerprint`].
pub type Header = (String, String);

/// Protocol-agnostic request metadata. Immutable after construction.
///
/// Fields are private: [`Request::new`] is the only way to produce a value,
/// so the empty-field rejection below can never be bypassed by a struct
/// literal or by deserializing untrusted content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Request {
    protocol: String,
    action: String,
    target: String,
    headers: Vec<Header>,
    #[serde(with = "base64_field")]
    body: Vec<u8>,
}

/// Plain shape matching the serialized layout, with none of `Request`'s
/// invariants enforced yet.
#[derive(Deserialize)]
struct RawRequest {
    protocol: String,
    action: String,
    target: String,
    headers: Vec<Header>,
    #[serde(with = "base64_field")]
    body: Vec<u8>,
}

impl<'de> Deserialize<'de> for Request {
    // Route deserialization through `Request::new` so a hand-crafted (or
    // corrupted) JSON document with an empty `protocol`/`action`/`target`
    // fails the same validation a struct literal can no longer bypass.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawRequest::deserialize(deserializer)?;
        Request::new(raw.protocol, raw.action, raw.target, raw.headers, raw.body)
            .map_err(D::Error::custom)
    }
}

impl Request {
    /// Construct a `Request`, rejecting empty `protocol`/`action`/`target`.
    pub fn new(
        protocol: impl Into<String>,
        action: impl Into<String>,
        target: impl Into<String>,
        headers: Vec<Header>,
        body: Vec<u8>,
    ) -> Result<Self, InterposerError> {
        let protocol = protocol.into();
        let action = action.into();
        let target = target.into();

        if protocol.is_empty() {
            return Err(InterposerError::interaction_validation(
                "request protocol must not be empty",
            ));
        }
        if action.is_empty() {
            return Err(InterposerError::interaction_validation(
                "request action must not be empty",
            ));
        }
        if target.is_empty() {
            return Err(InterposerError::interaction_validation(
                "request target must not be empty",
            ));
        }

        Ok(Self {
            protocol,
            action,
            target,
            headers,
            body,
        })
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
