//! Procedure eligibility and payment.
//!
//! A procedure lists pharmacology requirements as `{type, quantity}` pairs.
//! Paying for it means matching the cards the player chose against those
//! requirements, under whatever restrictions are in force:
//!
//! - the quantity policy decides how many units each entry demands,
//! - restricted types (a running supply shortage) do not count toward
//!   anything,
//! - rush order takes one unit off the bill,
//! - clinical confidence lifts one restricted type.
//!
//! `plan_payment` works all of that out without touching state; the engine
//! only mutates once a plan exists.

use smallvec::SmallVec;

use crate::cards::{CardInstance, PatientCard, PharmacologyCard, ProcedureCard, Requirement};
use crate::core::{InstanceId, QuantityPolicy};

/// Conditions a payment is evaluated under.
#[derive(Clone, Debug, Default)]
pub struct PaymentRules<'a> {
    pub policy: QuantityPolicy,
    /// Pharmacology types that cannot be spent right now.
    pub restricted: SmallVec<[&'a str; 2]>,
    pub rush_order: bool,
    pub clinical_confidence: bool,
}

impl PaymentRules<'_> {
    #[must_use]
    pub fn is_restricted(&self, kind: &str) -> bool {
        self.restricted.iter().any(|restricted| *restricted == kind)
    }
}

/// How a procedure will be paid for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Payment {
    /// Chosen cards that will be discarded, in choice order.
    pub spent: Vec<InstanceId>,
    /// Rush order took a unit off the bill.
    pub rush_order_used: bool,
    /// Restricted type lifted by clinical confidence.
    pub waived: Option<String>,
}

/// Work out which of the chosen cards pay for `procedure`.
///
/// Returns `None` when the chosen cards cannot cover the requirements. Cards
/// are matched greedily in the order they were chosen; cards nobody needs are
/// left out of `spent`.
#[must_use]
pub fn plan_payment(
    procedure: &ProcedureCard,
    chosen: &[&CardInstance<PharmacologyCard>],
    rules: &PaymentRules<'_>,
) -> Option<Payment> {
    let waived = rules
        .clinical_confidence
        .then(|| {
            procedure
                .requirements
                .iter()
                .find(|req| rules.is_restricted(&req.kind))
                .map(|req| req.kind.clone())
        })
        .flatten();
    let usable = |kind: &str| {
        waived.as_deref() == Some(kind) || !rules.is_restricted(kind)
    };

    let mut taken = vec![false; chosen.len()];
    let mut spent = Vec::new();
    let mut shortfall = 0u32;
    let mut owed = 0u32;

    for Requirement { kind, quantity } in &procedure.requirements {
        let units = rules.policy.units(*quantity);
        owed += units;
        let mut covered = 0;
        if usable(kind.as_str()) {
            for (index, card) in chosen.iter().enumerate() {
                if covered == units {
                    break;
                }
                if !taken[index] && card.card.is_kind(kind) {
                    taken[index] = true;
                    spent.push(card.instance_id);
                    covered += 1;
                }
            }
        }
        shortfall += units - covered;
    }

    let rush_order_used = rules.rush_order && owed > 0;
    match (shortfall, rush_order_used) {
        (0, false) => {}
        // Nothing was missing, so the discount means one card fewer is spent.
        (0, true) => {
            spent.pop();
        }
        (1, true) => {}
        _ => return None,
    }

    Some(Payment {
        spent,
        rush_order_used,
        waived,
    })
}

/// True when the chosen cards can pay for `procedure`.
#[must_use]
pub fn can_play_procedure(
    procedure: &ProcedureCard,
    chosen: &[&CardInstance<PharmacologyCard>],
    rules: &PaymentRules<'_>,
) -> bool {
    plan_payment(procedure, chosen, rules).is_some()
}

/// True when every treatment goal of `patient` is met by `completed`.
///
/// A goal `{type, n}` is met by completed, played procedures named `type`;
/// the policy decides whether `n` of them are needed or one is enough.
#[must_use]
pub fn is_patient_fully_treated(
    patient: &PatientCard,
    completed: impl IntoIterator<Item = impl std::ops::Deref<Target = CardInstance<ProcedureCard>>>,
    policy: QuantityPolicy,
) -> bool {
    let completed: Vec<_> = completed.into_iter().collect();
    patient.treatment_goal.iter().all(|goal| {
        let done = completed
            .iter()
            .filter(|done| done.played && done.name() == goal.kind)
            .count();
        done as u32 >= policy.units(goal.quantity)
    })
}
