use std::collections::VecDeque;

use crate::assets::decode::ImagePayload;
use crate::assets::registry::AssetId;

/// Most saved cards kept at once.
pub const MAX_SAVED_CARDS: usize = 20;

/// A finished card snapshot.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SavedCard {
    /// Identifier.
    pub id: AssetId,
    /// Display name.
    pub name: String,
    /// Milliseconds since the Unix epoch.
    pub created_at_ms: u64,
    /// Encoded snapshot image.
    pub image: ImagePayload,
}

/// Bounded list of saved cards, newest first.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SavedCards {
    cards: VecDeque<SavedCard>,
}

impl SavedCards {
    /// Empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a stored list, keeping only the newest [`MAX_SAVED_CARDS`].
    pub fn from_vec(mut cards: Vec<SavedCard>) -> Self {
        cards.truncate(MAX_SAVED_CARDS);
        Self {
            cards: cards.into(),
        }
    }

    /// Insert at the front, evicting and returning the oldest card when full.
    pub fn push(&mut self, card: SavedCard) -> Option<SavedCard> {
        self.cards.push_front(card);
        if self.cards.len() > MAX_SAVED_CARDS {
            self.cards.pop_back()
        } else {
            None
        }
    }

    /// Remove a card by id.
    pub fn remove(&mut self, id: &AssetId) -> Option<SavedCard> {
        let i = self.cards.iter().position(|c| &c.id == id)?;
        self.cards.remove(i)
    }

    /// Look up a card.
    pub fn get(&self, id: &AssetId) -> Option<&SavedCard> {
        self.cards.iter().find(|c| &c.id == id)
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &SavedCard> {
        self.cards.iter()
    }

    /// Number of cards.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// `true` when empty.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/saved.rs"]
mod tests;
