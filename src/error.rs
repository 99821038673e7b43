//! Error types.
//!
//! `GameError` covers commands the engine refuses; none of them is fatal and
//! the state is left untouched when one is returned. `CatalogError` and
//! `ConfigError` can only happen while an engine is being built.

use thiserror::Error;

use crate::cards::{CardId, ModifierCategory};
use crate::core::{InstanceId, PlayerId};
use crate::game::TurnPhase;

/// A command the engine refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("The game has not started yet")]
    NotStarted,

    #[error("The game has already started")]
    AlreadyStarted,

    #[error("The game is over")]
    GameOver,

    #[error("{0} must choose a patient first")]
    SelectionPending(PlayerId),

    #[error("No patient selection is pending")]
    NoSelectionPending,

    #[error("Cannot {action} during the {phase} phase")]
    WrongPhase {
        action: &'static str,
        phase: TurnPhase,
    },

    #[error("{0} is not one of the offered patients")]
    UnknownPatient(CardId),

    #[error("{0} is not in the current player's hand")]
    NotInHand(InstanceId),

    #[error("{0} was chosen more than once")]
    DuplicateSelection(InstanceId),

    #[error("Cannot play procedure: missing required pharmacology cards")]
    MissingPharmacology { procedure: String },

    #[error("No active patient to treat")]
    NoActivePatient,
}

/// Malformed card catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Catalog has no {0} cards")]
    EmptyCategory(&'static str),

    #[error("Card id must not be blank (in {0})")]
    BlankId(&'static str),

    #[error("Duplicate card id `{0}`")]
    DuplicateId(CardId),

    #[error("Modifier `{card}` has category {declared} but its effect is {actual}")]
    CategoryMismatch {
        card: CardId,
        declared: ModifierCategory,
        actual: ModifierCategory,
    },

    #[error("Modifier `{card}` is listed under {list} modifiers but is {declared}")]
    WrongList {
        card: CardId,
        list: ModifierCategory,
        declared: ModifierCategory,
    },

    #[error("Patient `{card}` needs procedure `{procedure}`, which no card provides")]
    UnknownProcedure { card: CardId, procedure: String },

    #[error("Procedure `{card}` needs pharmacology type `{kind}`, which no card provides")]
    UnknownPharmacologyType { card: CardId, kind: String },

    #[error("Card `{0}` has a requirement with quantity 0")]
    ZeroQuantity(CardId),
}

/// Unplayable rule configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Hand limits must be at least 1")]
    ZeroHandLimit,

    #[error("At least one completed case must be needed to win")]
    ZeroCasesToWin,

    #[error("Opening hand deals {dealt} {category} cards but the hand limit is {limit}")]
    OpeningHandTooLarge {
        category: &'static str,
        dealt: usize,
        limit: usize,
    },

    #[error("The supply-shortage restricted type must not be blank")]
    EmptyRestrictedType,
}

/// Anything that stops an engine from being built.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, GameError>;
