//! `ResponseChunk`: one piece of an ordered response.

use serde::{Deserialize, Serialize};

use crate::store::base64_field;

/// One piece of a response, positioned within the interaction by `sequence`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseChunk {
    #[serde(with = "base64_field")]
    pub data: Vec<u8>,
    pub sequence: u64,
}

impl ResponseChunk {
    pub fn new(data: Vec<u8>, sequence: u64) -> Self {
        Self { data, sequence }
    }
}
