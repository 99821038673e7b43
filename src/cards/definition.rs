//! Card definitions - static card data.
//!
//! A definition holds the immutable properties of a catalog card: a patient's
//! treatment goal, a procedure's pharmacology needs, a modifier's effect.
//! Per-game data (instance id, played flag) lives in `CardInstance`.
//!
//! There are four categories, each its own type, tied together by the
//! `CardDefinition` trait so decks and instances can be generic over them.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::str::FromStr;

/// Pharmacology type blocked by supply shortage and purged by anesthetic failure.
pub const ANESTHETIC: &str = "Anesthetic";

/// Stable catalog identifier, e.g. `"root-canal"`.
///
/// Several instances in one game may share a `CardId`; it names the kind of
/// card, not a specific copy.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub String);

impl CardId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CardId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A `{type, quantity}` pair.
///
/// On a patient it names a procedure that must be completed; on a procedure
/// it names a pharmacology type that must be spent.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Requirement {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default = "one")]
    pub quantity: u32,
}

fn one() -> u32 {
    1
}

impl Requirement {
    #[must_use]
    pub fn new(kind: impl Into<String>, quantity: u32) -> Self {
        Self {
            kind: kind.into(),
            quantity,
        }
    }
}

/// Requirement list; real cards carry one to three entries.
pub type Requirements = SmallVec<[Requirement; 3]>;

/// Common surface of all card definitions.
pub trait CardDefinition {
    fn id(&self) -> &CardId;
    fn name(&self) -> &str;
}

/// A patient with a treatment goal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientCard {
    pub id: CardId,
    pub name: String,
    pub condition: String,
    /// Warning shown alongside the patient. It has no effect on play.
    #[serde(default)]
    pub vulnerability: Option<String>,
    pub treatment_goal: Requirements,
}

/// A treatment step paid for with pharmacology cards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureCard {
    pub id: CardId,
    pub name: String,
    #[serde(default)]
    pub requirements: Requirements,
}

/// A resource card spent on procedures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PharmacologyCard {
    pub id: CardId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl PharmacologyCard {
    #[must_use]
    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind == kind
    }
}

/// Who a modifier is aimed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierCategory {
    /// Helps the player who plays it.
    Easy,
    /// Hinders the target player.
    Challenging,
}

impl std::fmt::Display for ModifierCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModifierCategory::Easy => f.write_str("easy"),
            ModifierCategory::Challenging => f.write_str("challenging"),
        }
    }
}

/// Closed set of modifier effects.
///
/// Catalog effect ids are parsed into this enum when the catalog loads, so an
/// unknown id is a load error rather than a silent no-op during play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ModifierEffect {
    DentalAssistantAid,
    RushOrder,
    ClinicalConfidence,
    PatientPanic,
    SupplyShortage,
    AnestheticFailure,
    EquipmentMalfunction,
}

impl ModifierEffect {
    pub const ALL: [ModifierEffect; 7] = [
        ModifierEffect::DentalAssistantAid,
        ModifierEffect::RushOrder,
        ModifierEffect::ClinicalConfidence,
        ModifierEffect::PatientPanic,
        ModifierEffect::SupplyShortage,
        ModifierEffect::AnestheticFailure,
        ModifierEffect::EquipmentMalfunction,
    ];

    /// Catalog id of the effect.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            ModifierEffect::DentalAssistantAid => "dental-assistant-aid",
            ModifierEffect::RushOrder => "rush-order",
            ModifierEffect::ClinicalConfidence => "clinical-confidence",
            ModifierEffect::PatientPanic => "patient-panic",
            ModifierEffect::SupplyShortage => "supply-shortage",
            ModifierEffect::AnestheticFailure => "anesthetic-failure",
            ModifierEffect::EquipmentMalfunction => "equipment-malfunction",
        }
    }

    /// The category this effect belongs to.
    #[must_use]
    pub const fn category(self) -> ModifierCategory {
        match self {
            ModifierEffect::DentalAssistantAid
            | ModifierEffect::RushOrder
            | ModifierEffect::ClinicalConfidence => ModifierCategory::Easy,
            ModifierEffect::PatientPanic
            | ModifierEffect::SupplyShortage
            | ModifierEffect::AnestheticFailure
            | ModifierEffect::EquipmentMalfunction => ModifierCategory::Challenging,
        }
    }
}

impl FromStr for ModifierEffect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|effect| effect.id() == s)
            .ok_or_else(|| format!("unknown modifier effect `{s}`"))
    }
}

impl TryFrom<String> for ModifierEffect {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ModifierEffect> for String {
    fn from(effect: ModifierEffect) -> Self {
        effect.id().to_string()
    }
}

impl std::fmt::Display for ModifierEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// A one-shot effect card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierCard {
    pub id: CardId,
    pub name: String,
    pub category: ModifierCategory,
    pub effect: ModifierEffect,
}

macro_rules! impl_card_definition {
    ($($ty:ty),*) => {
        $(
            impl CardDefinition for $ty {
                fn id(&self) -> &CardId {
                    &self.id
                }

                fn name(&self) -> &str {
                    &self.name
                }
            }
        )*
    };
}

impl_card_definition!(PatientCard, ProcedureCard, PharmacologyCard, ModifierCard);
