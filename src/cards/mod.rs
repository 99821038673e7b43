//! Card system: definitions, instances, decks, and the catalog.
//!
//! ## Key Types
//!
//! - `CardId`: Stable catalog identifier
//! - `PatientCard`, `ProcedureCard`, `PharmacologyCard`, `ModifierCard`:
//!   immutable definitions, one type per category
//! - `CardInstance`: a uniquely identified copy held by a player
//! - `Deck`: shuffled draw pile of shared definitions
//! - `Catalog`: the validated card data a game is built from

pub mod catalog;
pub mod deck;
pub mod definition;
pub mod instance;

pub use catalog::{Catalog, Entry};
pub use deck::Deck;
pub use definition::{
    CardDefinition, CardId, ModifierCard, ModifierCategory, ModifierEffect, PatientCard,
    PharmacologyCard, ProcedureCard, Requirement, Requirements, ANESTHETIC,
};
pub use instance::CardInstance;
