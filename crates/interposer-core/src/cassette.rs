//! `Cassette`: an immutable, ordered collection of interactions plus a
//! derived fingerprint index (spec §4.2).

use std::collections::HashMap;

use crate::fingerprint::Fingerprint;
use crate::interaction::Interaction;

/// An ordered sequence of [`Interaction`]s with a fingerprint-to-position
/// index built once at construction.
///
/// First-match policy: when multiple interactions share a fingerprint,
/// [`Cassette::find`] always returns the earliest position. Later duplicates
/// are reachable only via [`Cassette::interactions`].
#[derive(Debug, Clone, Default)]
pub struct Cassette {
    interactions: Vec<Interaction>,
    index: HashMap<Fingerprint, usize>,
}

fn build_index(interactions: &[Interaction]) -> HashMap<Fingerprint, usize> {
    let mut index = HashMap::with_capacity(interactions.len());
    for (pos, interaction) in interactions.iter().enumerate() {
        index.entry(interaction.fingerprint()).or_insert(pos);
    }
    index
}

impl Cassette {
    /// An empty cassette — the starting point for a fresh recording session.
    pub fn empty() -> Self {
        Self {
            interactions: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Build a cassette from a sequence of interactions. Each `Interaction`'s
    /// fingerprint/sequence invariants were already enforced when it was
    /// constructed — its fields are private, so no value of the type can
    /// exist otherwise — so this just derives the index.
    pub fn new(interactions: Vec<Interaction>) -> Self {
        let index = build_index(&interactions);
        Self { interactions, index }
    }

    /// Constant-time index lookup. Returns the position of the *first*
    /// interaction recorded with this fingerprint.
    pub fn find(&self, fingerprint: &Fingerprint) -> Option<usize> {
        self.index.get(fingerprint).copied()
    }

    pub fn get(&self, position: usize) -> Option<&Interaction> {
        self.interactions.get(position)
    }

    /// Enumeration in insertion order, for serialization.
    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    /// Produce a new cassette with `interaction` appended. If its
    /// fingerprint already exists in the index, the index keeps pointing at
    /// the earlier occurrence — first-match policy.
    pub fn append(&self, interaction: Interaction) -> Cassette {
        let mut interactions = self.interactions.clone();
        let mut index = self.index.clone();
        let fingerprint = interaction.fingerprint();
        interactions.push(interaction);
        index.entry(fingerprint).or_insert(interactions.len() - 1);
        Cassette { interactions, index }
    }
}
