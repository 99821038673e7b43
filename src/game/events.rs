//! Notifications sent from the engine to the presentation layer.
//!
//! The engine never renders anything. It reports what happened through a
//! `GameObserver` handed to it at construction, and the presentation layer
//! drives the engine by calling its commands. Nothing is global.

use std::sync::Arc;

use super::state::GameState;
use crate::cards::PatientCard;
use crate::core::PlayerId;

/// Something the presentation layer should react to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    /// A command succeeded; here is the resulting state.
    StateChanged(Box<GameState>),
    /// `player` must pick one of these patients.
    ShowPatientOptions {
        player: PlayerId,
        options: Vec<Arc<PatientCard>>,
    },
    /// The patient prompt can be closed.
    HidePatientOptions,
    /// Text for the player. Not queued: show it before the next command.
    Message(String),
    GameEnded { winner: PlayerId },
}

/// Receiver of engine notifications.
pub trait GameObserver {
    fn notify(&mut self, notification: &Notification);
}

impl<O: GameObserver + ?Sized> GameObserver for Box<O> {
    fn notify(&mut self, notification: &Notification) {
        (**self).notify(notification);
    }
}

/// Discards every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl GameObserver for NullObserver {
    fn notify(&mut self, _notification: &Notification) {}
}

/// Records every notification in order.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<Notification>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[Notification] {
        &self.events
    }

    /// All messages, oldest first.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.events.iter().filter_map(|event| match event {
            Notification::Message(text) => Some(text.as_str()),
            _ => None,
        })
    }

    #[must_use]
    pub fn last_message(&self) -> Option<&str> {
        self.messages().last()
    }

    /// Hand back everything recorded so far and start over.
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.events)
    }
}

impl GameObserver for EventLog {
    fn notify(&mut self, notification: &Notification) {
        self.events.push(notification.clone());
    }
}
