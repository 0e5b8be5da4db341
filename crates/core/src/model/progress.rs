use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::catalog::{self, Arcana};
use crate::model::ids::CardName;

/// Cards the learner has mastered.
///
/// Serializes as a plain JSON array of card names. Entries are only ever
/// added; there is no way to remove a completion.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionSet(BTreeSet<CardName>);

impl CompletionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of this set that also contains `card`.
    #[must_use]
    pub fn with(&self, card: &CardName) -> Self {
        let mut next = self.0.clone();
        next.insert(card.clone());
        Self(next)
    }

    #[must_use]
    pub fn contains(&self, card: &str) -> bool {
        self.0.contains(card)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardName> {
        self.0.iter()
    }

    /// How many cards of `arcana` are completed.
    #[must_use]
    pub fn summary(&self, arcana: Arcana) -> ProgressSummary {
        let cards = catalog::cards_for(arcana);
        let completed = cards.iter().filter(|card| self.contains(card.as_str())).count();
        ProgressSummary {
            completed,
            total: cards.len(),
        }
    }
}

impl FromIterator<CardName> for CompletionSet {
    fn from_iter<I: IntoIterator<Item = CardName>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Completed vs. total cards for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSummary {
    pub completed: usize,
    pub total: usize,
}

impl ProgressSummary {
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}
