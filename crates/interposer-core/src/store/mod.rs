//! `CassetteStore` (port): persistence for cassettes, plus one reference
//! file-backed implementation (spec §4.3).

pub(crate) mod base64_field;
mod file;

pub use file::FileCassetteStore;

use crate::cassette::Cassette;
use crate::errors::InterposerError;

/// Two-operation persistence port. Implementations decide their own
/// missing-storage and corruption handling, surfaced through
/// [`InterposerError::CassetteLoad`]/[`InterposerError::CassetteSave`].
pub trait CassetteStore {
    fn load(&self) -> Result<Cassette, InterposerError>;
    fn save(&self, cassette: &Cassette) -> Result<(), InterposerError>;
}

/// Missing-storage behavior, configured at store construction — not per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreOptions {
    /// When `false` (default/strict), `load` on missing storage fails with
    /// a load error. When `true`, `load` on missing storage returns an empty
    /// cassette, and `save` may create the storage on first write.
    pub create_if_missing: bool,
}
