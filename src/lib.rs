//! # dental-ccg
//!
//! Rules engine for a two-player dental-care card game.
//!
//! Each player treats one patient at a time by playing procedure cards, paying
//! for them with pharmacology cards. Modifier cards help the player who plays
//! them or hinder their opponent. The first player to fully treat the required
//! number of patients wins.
//!
//! ## Modules
//!
//! - `core`: instance ids, players, RNG, rule configuration
//! - `cards`: card definitions, instances, decks and the catalog
//! - `game`: game state, the engine and its notifications
//! - `error`: command and setup errors
//!
//! ## Example
//!
//! ```
//! use dental_ccg::{Catalog, EventLog, GameEngine, GameRng, RulesConfig};
//!
//! let mut engine = GameEngine::new(
//!     &Catalog::standard().unwrap(),
//!     RulesConfig::default(),
//!     GameRng::new(7),
//!     EventLog::new(),
//! )
//! .unwrap();
//!
//! engine.start_game().unwrap();
//! while let Some((_, options)) = engine.pending_selection() {
//!     engine.select_patient(&options[0].id).unwrap();
//! }
//! engine.draw_cards().unwrap();
//! engine.end_turn().unwrap();
//!
//! assert_eq!(engine.state().turn_number, 2);
//! ```

pub mod cards;
pub mod core;
pub mod error;
pub mod game;

pub use crate::core::{
    GameRng, InstanceAllocator, InstanceId, OpeningHand, PlayerId, PlayerMap, QuantityPolicy,
    RulesConfig,
};

pub use crate::cards::{
    CardDefinition, CardId, CardInstance, Catalog, Deck, ModifierCard, ModifierCategory,
    ModifierEffect, PatientCard, PharmacologyCard, ProcedureCard, Requirement,
};

pub use crate::game::{
    EventLog, GameEngine, GameObserver, GamePhase, GameState, Notification, NullObserver,
    PatientSelection, Player, TurnPhase,
};

pub use crate::error::{CatalogError, ConfigError, GameError, Result, SetupError};
