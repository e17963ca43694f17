//! interposer-core: a protocol-agnostic interaction interposition engine.
//!
//! Deterministically replays previously recorded request/response exchanges
//! and, optionally, records new ones by forwarding to a live upstream. Built
//! for test authors and integration harnesses who need reproducible fixtures
//! for non-deterministic services (HTTP, gRPC, database, RPC, ...).
//!
//! The crate is five components, leaves-first:
//!
//! - [`fingerprint`] — canonicalize a [`Request`] into a stable 256-bit
//!   identity.
//! - [`Cassette`] — an immutable, ordered collection of [`Interaction`]s with
//!   a fingerprint index.
//! - [`store`] — the [`CassetteStore`] persistence port, plus one reference
//!   file-backed implementation.
//! - [`LiveResponder`] — the upstream port, a single callable.
//! - [`Broker`] — the stateful, mode-driven dispatcher user code talks to.
//!
//! Protocol adapters (HTTP, SQL, ...), concrete upstream clients, and
//! concrete stores beyond the reference file store are deliberately not
//! part of this crate — they are the caller's to supply.

mod broker;
mod cassette;
mod chunk;
mod errors;
mod fingerprint;
mod interaction;
mod live;
mod request;
mod store;

pub use broker::{Broker, BrokerMode, ReplayChunks};
pub use cassette::Cassette;
pub use chunk::ResponseChunk;
pub use errors::{CassetteIoError, InterposerError};
pub use fingerprint::{Fingerprint, FINGERPRINT_BYTES};
pub use interaction::Interaction;
pub use live::LiveResponder;
pub use request::{Header, Request};
pub use store::{CassetteStore, FileCassetteStore, StoreOptions};
