//! Rule configuration.
//!
//! Every tunable constant of the game lives in `RulesConfig`. The `Default`
//! value is the standard rule set; tests and variants override individual
//! fields with the builder methods.
//!
//! ```
//! use dental_ccg::core::{QuantityPolicy, RulesConfig};
//!
//! let config = RulesConfig::default()
//!     .with_cases_to_win(3)
//!     .with_quantity_policy(QuantityPolicy::AtLeastOne);
//!
//! assert!(config.validate().is_ok());
//! assert_eq!(config.procedure_hand_limit, 7);
//! ```

use serde::{Deserialize, Serialize};

use crate::cards::ANESTHETIC;
use crate::error::ConfigError;

/// How requirement quantities are matched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuantityPolicy {
    /// `{type, n}` needs `n` distinct matching cards (or completed procedures).
    #[default]
    Enforced,
    /// `{type, n}` is met by a single matching card, whatever `n` is.
    AtLeastOne,
}

impl QuantityPolicy {
    /// Units actually demanded by a requirement of `quantity`.
    #[must_use]
    pub fn units(self, quantity: u32) -> u32 {
        match self {
            QuantityPolicy::Enforced => quantity,
            QuantityPolicy::AtLeastOne => quantity.min(1),
        }
    }
}

/// Cards dealt to each player at game start.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningHand {
    pub patient_options: usize,
    pub procedures: usize,
    pub pharmacology: usize,
    pub easy_modifiers: usize,
    pub challenging_modifiers: usize,
}

impl Default for OpeningHand {
    fn default() -> Self {
        Self {
            patient_options: 2,
            procedures: 3,
            pharmacology: 4,
            easy_modifiers: 1,
            challenging_modifiers: 1,
        }
    }
}

/// Complete rule configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Maximum procedure cards held after a draw.
    pub procedure_hand_limit: usize,

    /// Maximum pharmacology cards held after a draw.
    pub pharmacology_hand_limit: usize,

    /// Opening deal.
    pub opening_hand: OpeningHand,

    /// Procedure cards drawn in the draw phase.
    pub procedures_per_draw: usize,

    /// Pharmacology cards drawn in the draw phase.
    pub pharmacology_per_draw: usize,

    /// Completed cases that win the game.
    pub cases_to_win: u32,

    /// Requirement quantity matching.
    pub quantity_policy: QuantityPolicy,

    /// Pharmacology type that supply shortage takes off the table.
    pub restricted_during_shortage: String,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            procedure_hand_limit: 7,
            pharmacology_hand_limit: 7,
            opening_hand: OpeningHand::default(),
            procedures_per_draw: 1,
            pharmacology_per_draw: 1,
            cases_to_win: 2,
            quantity_policy: QuantityPolicy::default(),
            restricted_during_shortage: ANESTHETIC.to_string(),
        }
    }
}

impl RulesConfig {
    /// Set both hand limits.
    #[must_use]
    pub fn with_hand_limits(mut self, procedures: usize, pharmacology: usize) -> Self {
        self.procedure_hand_limit = procedures;
        self.pharmacology_hand_limit = pharmacology;
        self
    }

    /// Set the number of completed cases needed to win.
    #[must_use]
    pub fn with_cases_to_win(mut self, cases: u32) -> Self {
        self.cases_to_win = cases;
        self
    }

    /// Set the quantity matching policy.
    #[must_use]
    pub fn with_quantity_policy(mut self, policy: QuantityPolicy) -> Self {
        self.quantity_policy = policy;
        self
    }

    /// Reject configurations no game could be played under.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.procedure_hand_limit == 0 || self.pharmacology_hand_limit == 0 {
            return Err(ConfigError::ZeroHandLimit);
        }
        if self.cases_to_win == 0 {
            return Err(ConfigError::ZeroCasesToWin);
        }
        if self.opening_hand.procedures > self.procedure_hand_limit {
            return Err(ConfigError::OpeningHandTooLarge {
                category: "procedure",
                dealt: self.opening_hand.procedures,
                limit: self.procedure_hand_limit,
            });
        }
        if self.opening_hand.pharmacology > self.pharmacology_hand_limit {
            return Err(ConfigError::OpeningHandTooLarge {
                category: "pharmacology",
                dealt: self.opening_hand.pharmacology,
                limit: self.pharmacology_hand_limit,
            });
        }
        if self.restricted_during_shortage.trim().is_empty() {
            return Err(ConfigError::EmptyRestrictedType);
        }
        Ok(())
    }
}
