//! The broker: a mode-driven dispatcher combining a cassette, an optional
//! live responder, and an optional persistence store (spec §4.5).

use std::fmt;

use crate::cassette::Cassette;
use crate::chunk::ResponseChunk;
use crate::errors::InterposerError;
use crate::fingerprint;
use crate::interaction::Interaction;
use crate::live::LiveResponder;
use crate::request::Request;
use crate::store::CassetteStore;

/// The broker's fixed dispatch policy. A closed three-tag enumeration —
/// adding a mode is a deliberate API change, not an extension point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerMode {
    /// Stream recorded chunks on a hit; fail on a miss.
    Replay,
    /// Always forward to the live responder, even on a hit, and record the
    /// result.
    Record,
    /// Stream recorded chunks on a hit (no upstream call); forward and
    /// record on a miss.
    Auto,
}

impl BrokerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrokerMode::Replay => "replay",
            BrokerMode::Record => "record",
            BrokerMode::Auto => "auto",
        }
    }

    fn requires_live_responder(&self) -> bool {
        matches!(self, BrokerMode::Record | BrokerMode::Auto)
    }
}

impl fmt::Display for BrokerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for BrokerMode {
    type Error = InterposerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "replay" => Ok(BrokerMode::Replay),
            "record" => Ok(BrokerMode::Record),
            "auto" => Ok(BrokerMode::Auto),
            other => Err(InterposerError::interaction_validation(format!(
                "unknown broker mode {other:?}; expected \"replay\", \"record\", or \"auto\""
            ))),
        }
    }
}

/// A lazy ordered sequence of response chunks, as returned by
/// [`Broker::replay`]. A consumer may stop iterating at any point without
/// side effects on the cassette.
pub type ReplayChunks = std::vec::IntoIter<ResponseChunk>;

/// The stateful dispatcher. The broker's only mutable state is its current
/// cassette reference; everything else it holds is immutable or externally
/// owned.
pub struct Broker {
    cassette: Cassette,
    mode: BrokerMode,
    live_responder: Option<Box<dyn LiveResponder>>,
    store: Option<Box<dyn CassetteStore>>,
}

impl Broker {
    /// Construct a broker from an initial cassette value.
    ///
    /// Fails immediately if `mode` is `record`/`auto` and no `live_responder`
    /// is given — misconfiguration is caught at wiring time, not deferred to
    /// the first request.
    pub fn new(
        cassette: Cassette,
        mode: BrokerMode,
        live_responder: Option<Box<dyn LiveResponder>>,
        store: Option<Box<dyn CassetteStore>>,
    ) -> Result<Self, InterposerError> {
        if mode.requires_live_responder() && live_responder.is_none() {
            return Err(InterposerError::live_responder_required(mode));
        }
        Ok(Self {
            cassette,
            mode,
            live_responder,
            store,
        })
    }

    /// Construct a broker by loading its initial cassette from `store`.
    pub fn from_store(
        store: Box<dyn CassetteStore>,
        mode: BrokerMode,
        live_responder: Option<Box<dyn LiveResponder>>,
    ) -> Result<Self, InterposerError> {
        let cassette = store.load()?;
        Self::new(cassette, mode, live_responder, Some(store))
    }

    /// The broker's current cassette — reflects only record operations that
    /// have completed successfully, including persistence.
    pub fn cassette(&self) -> &Cassette {
        &self.cassette
    }

    pub fn mode(&self) -> BrokerMode {
        self.mode
    }

    /// Serve one request. Fingerprint is computed exactly once, on entry.
    pub fn replay(&mut self, request: Request) -> Result<ReplayChunks, InterposerError> {
        let fp = fingerprint::compute(&request);
        let hit = self.cassette.find(&fp);

        tracing::trace!(mode = %self.mode, hit = hit.is_some(), fingerprint = %fp, "broker dispatch");

        match (self.mode, hit) {
            (BrokerMode::Replay, Some(position)) => Ok(self.stream_recorded(position)),
            (BrokerMode::Replay, None) => Err(InterposerError::interaction_not_found(request)),
            (BrokerMode::Auto, Some(position)) => Ok(self.stream_recorded(position)),
            (BrokerMode::Auto, None) | (BrokerMode::Record, _) => {
                self.forward_record_persist(request, fp)
            }
        }
    }

    fn stream_recorded(&self, position: usize) -> ReplayChunks {
        let interaction = self
            .cassette
            .get(position)
            .expect("position came from this cassette's own index");
        interaction.response_chunks().to_vec().into_iter()
    }

    fn forward_record_persist(
        &mut self,
        request: Request,
        fingerprint: fingerprint::Fingerprint,
    ) -> Result<ReplayChunks, InterposerError> {
        let responder = self
            .live_responder
            .as_ref()
            .expect("construction invariant guarantees a responder in record/auto mode");

        let chunks = responder.respond(&request)?;
        let interaction = Interaction::with_precomputed_fingerprint(request, fingerprint, chunks)?;
        let extended = self.cassette.append(interaction);

        if let Some(store) = &self.store {
            // Fail-fast: the save happens against `extended`, a value the
            // broker has not yet adopted. On failure `self.cassette` is
            // simply never reassigned — no revert needed because no mutation
            // happened yet.
            store.save(&extended)?;
        }

        tracing::debug!(
            fingerprint = %extended
                .get(extended.len() - 1)
                .map(|i| i.fingerprint())
                .unwrap(),
            total_interactions = extended.len(),
            "recorded interaction"
        );

        let buffered = extended
            .get(extended.len() - 1)
            .expect("just appended")
            .response_chunks()
            .to_vec();
        self.cassette = extended;
        Ok(buffered.into_iter())
    }
}
