//! Draw piles.
//!
//! A `Deck` is shuffled exactly once, when it is built. After that it only
//! shrinks from the front (draws) and grows at the back (cards put back).
//! Drawing from a short or empty deck is not an error: the caller simply
//! gets fewer cards.
//!
//! ```
//! use dental_ccg::cards::Deck;
//! use dental_ccg::core::GameRng;
//!
//! let mut rng = GameRng::new(1);
//! let mut deck = Deck::shuffled(vec![1, 2, 3], &mut rng);
//!
//! assert_eq!(deck.draw(2).len(), 2);
//! assert_eq!(deck.draw(5).len(), 1);
//! assert!(deck.draw(1).is_empty());
//! ```

use im::Vector;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::rng::GameRng;

/// Ordered pile of shared card definitions.
///
/// Backed by an `im::Vector` so that snapshotting the game state does not
/// copy every deck.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck<D: Clone> {
    cards: Vector<Arc<D>>,
}

impl<D: Clone> Default for Deck<D> {
    fn default() -> Self {
        Self {
            cards: Vector::new(),
        }
    }
}

impl<D: Clone> Deck<D> {
    /// Build a deck in the given order, without shuffling.
    #[must_use]
    pub fn ordered(cards: impl IntoIterator<Item = D>) -> Self {
        Self {
            cards: cards.into_iter().map(Arc::new).collect(),
        }
    }

    /// Build a deck in a random order.
    #[must_use]
    pub fn shuffled(cards: impl IntoIterator<Item = D>, rng: &mut GameRng) -> Self {
        let mut cards: Vec<Arc<D>> = cards.into_iter().map(Arc::new).collect();
        rng.shuffle(&mut cards);
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    /// Remove up to `n` cards from the front.
    ///
    /// Returns `min(n, len)` cards in deck order.
    pub fn draw(&mut self, n: usize) -> Vec<Arc<D>> {
        let take = n.min(self.cards.len());
        let rest = self.cards.split_off(take);
        let drawn = std::mem::replace(&mut self.cards, rest);
        drawn.into_iter().collect()
    }

    /// Remove the front card, if any.
    pub fn draw_one(&mut self) -> Option<Arc<D>> {
        self.cards.pop_front()
    }

    /// Append a card to the back. No reshuffle happens.
    pub fn put_back(&mut self, card: Arc<D>) {
        self.cards.push_back(card);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards from front (next draw) to back.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<D>> {
        self.cards.iter()
    }
}
