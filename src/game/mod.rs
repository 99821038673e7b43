//! Game rules: state, turn flow, procedures, modifiers.
//!
//! `GameEngine` is the entry point. It owns a `GameState`, accepts commands
//! from the presentation layer and reports back through a `GameObserver`.
//! The payment and treatment checks in `procedure` are pure functions and
//! can be used on their own, e.g. to highlight playable cards.

pub mod engine;
pub mod events;
pub(crate) mod modifier;
pub mod procedure;
pub mod state;

pub use engine::GameEngine;
pub use events::{EventLog, GameObserver, Notification, NullObserver};
pub use procedure::{
    can_play_procedure, is_patient_fully_treated, plan_payment, Payment, PaymentRules,
};
pub use state::{Decks, GamePhase, GameState, Hand, PatientSelection, Player, TurnPhase};
