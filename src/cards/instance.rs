//! Card instances - runtime card state.
//!
//! A `CardInstance` is one copy of a catalog card held by one player. The
//! definition is shared behind an `Arc`; the instance adds a session-unique
//! id and the `played` flag. Instances are moved between collections, never
//! cloned into two of them.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::definition::{CardDefinition, CardId};
use crate::core::entity::{InstanceAllocator, InstanceId};

/// A card in play.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInstance<D> {
    /// Unique id for this copy.
    pub instance_id: InstanceId,

    /// Shared catalog definition.
    pub card: Arc<D>,

    /// Set once the card has been resolved against a patient.
    pub played: bool,
}

impl<D: CardDefinition> CardInstance<D> {
    /// Wrap a definition under a freshly allocated id.
    ///
    /// This is the only way instances come into being, which keeps every
    /// live id unique for the session.
    #[must_use]
    pub fn create(card: Arc<D>, ids: &mut InstanceAllocator) -> Self {
        Self {
            instance_id: ids.alloc(),
            card,
            played: false,
        }
    }

    /// Catalog id of the underlying definition.
    #[must_use]
    pub fn card_id(&self) -> &CardId {
        self.card.id()
    }

    /// Display name of the underlying definition.
    #[must_use]
    pub fn name(&self) -> &str {
        self.card.name()
    }

    /// Mark as resolved.
    pub fn mark_played(&mut self) {
        self.played = true;
    }
}
