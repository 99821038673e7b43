//! Card catalog - the static card data a game is built from.
//!
//! The catalog is supplied from outside the engine, usually as JSON, and is
//! validated once before any game state exists. A malformed catalog is the
//! only failure that stops a game from starting.
//!
//! ## Schema
//!
//! Five categorized lists. Each entry is a card definition plus an optional
//! `copies` count (default 1) saying how many times it appears in its deck.
//!
//! ```
//! use dental_ccg::cards::Catalog;
//!
//! let catalog = Catalog::standard().unwrap();
//! assert!(catalog.validate().is_ok());
//! assert!(catalog.patient(&"busy-executive".into()).is_some());
//! ```

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::definition::{
    CardDefinition, CardId, ModifierCard, ModifierCategory, PatientCard, PharmacologyCard,
    ProcedureCard, Requirement,
};
use crate::error::CatalogError;

const STANDARD_CATALOG: &str = include_str!("standard_catalog.json");

fn one() -> usize {
    1
}

/// A catalog entry: one definition and its number of copies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry<D> {
    #[serde(flatten)]
    pub card: D,
    #[serde(default = "one")]
    pub copies: usize,
}

/// Categorized card definitions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub patients: Vec<Entry<PatientCard>>,
    pub procedures: Vec<Entry<ProcedureCard>>,
    pub pharmacology: Vec<Entry<PharmacologyCard>>,
    pub easy_modifiers: Vec<Entry<ModifierCard>>,
    pub challenging_modifiers: Vec<Entry<ModifierCard>>,
}

impl Catalog {
    /// The bundled card set, parsed and validated like any other catalog.
    pub fn standard() -> Result<Self, CatalogError> {
        Self::from_json(STANDARD_CATALOG)
    }

    /// Parse and validate a catalog.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Look up a patient definition.
    #[must_use]
    pub fn patient(&self, id: &CardId) -> Option<&PatientCard> {
        find(&self.patients, id)
    }

    /// Look up a procedure definition.
    #[must_use]
    pub fn procedure(&self, id: &CardId) -> Option<&ProcedureCard> {
        find(&self.procedures, id)
    }

    /// Every copy of every entry, in catalog order, ready to be shuffled.
    pub fn expand<D: Clone>(entries: &[Entry<D>]) -> impl Iterator<Item = D> + '_ {
        entries
            .iter()
            .flat_map(|entry| std::iter::repeat(entry.card.clone()).take(entry.copies))
    }

    /// Check the catalog is internally consistent.
    pub fn validate(&self) -> Result<(), CatalogError> {
        non_empty(&self.patients, "patient")?;
        non_empty(&self.procedures, "procedure")?;
        non_empty(&self.pharmacology, "pharmacology")?;
        non_empty(&self.easy_modifiers, "easy modifier")?;
        non_empty(&self.challenging_modifiers, "challenging modifier")?;

        let mut seen = FxHashSet::default();
        check_ids(&self.patients, "patients", &mut seen)?;
        check_ids(&self.procedures, "procedures", &mut seen)?;
        check_ids(&self.pharmacology, "pharmacology", &mut seen)?;
        check_ids(&self.easy_modifiers, "easy_modifiers", &mut seen)?;
        check_ids(&self.challenging_modifiers, "challenging_modifiers", &mut seen)?;

        for (list, entries) in [
            (ModifierCategory::Easy, &self.easy_modifiers),
            (ModifierCategory::Challenging, &self.challenging_modifiers),
        ] {
            for Entry { card, .. } in entries {
                let actual = card.effect.category();
                if card.category != actual {
                    return Err(CatalogError::CategoryMismatch {
                        card: card.id.clone(),
                        declared: card.category,
                        actual,
                    });
                }
                if card.category != list {
                    return Err(CatalogError::WrongList {
                        card: card.id.clone(),
                        list,
                        declared: card.category,
                    });
                }
            }
        }

        let procedure_names: FxHashSet<&str> =
            self.procedures.iter().map(|e| e.card.name.as_str()).collect();
        for Entry { card, .. } in &self.patients {
            check_quantities(&card.id, &card.treatment_goal)?;
            if let Some(goal) = card
                .treatment_goal
                .iter()
                .find(|goal| !procedure_names.contains(goal.kind.as_str()))
            {
                return Err(CatalogError::UnknownProcedure {
                    card: card.id.clone(),
                    procedure: goal.kind.clone(),
                });
            }
        }

        let pharmacology_kinds: FxHashSet<&str> =
            self.pharmacology.iter().map(|e| e.card.kind.as_str()).collect();
        for Entry { card, .. } in &self.procedures {
            check_quantities(&card.id, &card.requirements)?;
            if let Some(req) = card
                .requirements
                .iter()
                .find(|req| !pharmacology_kinds.contains(req.kind.as_str()))
            {
                return Err(CatalogError::UnknownPharmacologyType {
                    card: card.id.clone(),
                    kind: req.kind.clone(),
                });
            }
        }

        Ok(())
    }
}

fn find<'a, D: CardDefinition>(entries: &'a [Entry<D>], id: &CardId) -> Option<&'a D> {
    entries
        .iter()
        .map(|entry| &entry.card)
        .find(|card| card.id() == id)
}

fn non_empty<D>(entries: &[Entry<D>], category: &'static str) -> Result<(), CatalogError> {
    if entries.iter().all(|entry| entry.copies == 0) {
        return Err(CatalogError::EmptyCategory(category));
    }
    Ok(())
}

fn check_ids<'a, D: CardDefinition>(
    entries: &'a [Entry<D>],
    list: &'static str,
    seen: &mut FxHashSet<&'a CardId>,
) -> Result<(), CatalogError> {
    for entry in entries {
        let id = entry.card.id();
        if id.as_str().trim().is_empty() {
            return Err(CatalogError::BlankId(list));
        }
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId(id.clone()));
        }
    }
    Ok(())
}

fn check_quantities(card: &CardId, requirements: &[Requirement]) -> Result<(), CatalogError> {
    if requirements.iter().any(|req| req.quantity == 0) {
        return Err(CatalogError::ZeroQuantity(card.clone()));
    }
    Ok(())
}
