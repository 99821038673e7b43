//! Modifier effect resolution.
//!
//! Each `ModifierEffect` maps to one handler function. The table is a plain
//! `match` over a closed enum, so adding an effect without a handler does not
//! compile, and catalog loading already rejected unknown effect ids.
//!
//! Handlers only change state and return the message to show. Removing the
//! played card and drawing its replacement is the engine's job.

use tracing::debug;

use super::state::GameState;
use crate::cards::{ModifierEffect, ANESTHETIC};
use crate::core::{GameRng, PlayerId, RulesConfig};

/// Everything a handler may touch.
pub(crate) struct EffectContext<'a> {
    pub state: &'a mut GameState,
    pub config: &'a RulesConfig,
    pub rng: &'a mut GameRng,
    /// Player who played the modifier.
    pub actor: PlayerId,
    /// Player a challenging modifier is aimed at.
    pub target: PlayerId,
}

type EffectFn = fn(&mut EffectContext<'_>) -> String;

fn handler(effect: ModifierEffect) -> EffectFn {
    match effect {
        ModifierEffect::DentalAssistantAid => dental_assistant_aid,
        ModifierEffect::RushOrder => rush_order,
        ModifierEffect::ClinicalConfidence => clinical_confidence,
        ModifierEffect::PatientPanic => patient_panic,
        ModifierEffect::SupplyShortage => supply_shortage,
        ModifierEffect::AnestheticFailure => anesthetic_failure,
        ModifierEffect::EquipmentMalfunction => equipment_malfunction,
    }
}

/// Apply `effect` and return the message describing it.
pub(crate) fn resolve(effect: ModifierEffect, ctx: &mut EffectContext<'_>) -> String {
    debug!(%effect, actor = %ctx.actor, target = %ctx.target, "resolving modifier");
    handler(effect)(ctx)
}

fn dental_assistant_aid(ctx: &mut EffectContext<'_>) -> String {
    if ctx.state.deal_pharmacology(ctx.actor, 1) == 0 {
        return "Dental Assistant's Aid: No pharmacology cards left to draw.".to_string();
    }
    let limit = ctx.config.pharmacology_hand_limit;
    let hand = &mut ctx.state.player_mut(ctx.actor).pharmacology;
    if hand.len() > limit {
        let excess = hand.len() - limit;
        hand.truncate(limit);
        return format!(
            "Dental Assistant's Aid: Drew extra card! Discarded {excess} excess pharmacology cards"
        );
    }
    "Dental Assistant's Aid: Drew extra card!".to_string()
}

fn rush_order(ctx: &mut EffectContext<'_>) -> String {
    ctx.state.player_mut(ctx.actor).rush_order_active = true;
    "Rush Order: Next procedure requires one fewer pharmacology card!".to_string()
}

fn clinical_confidence(ctx: &mut EffectContext<'_>) -> String {
    ctx.state.player_mut(ctx.actor).clinical_confidence_active = true;
    "Clinical Confidence: Can ignore one special condition this turn!".to_string()
}

fn patient_panic(ctx: &mut EffectContext<'_>) -> String {
    let hand = &mut ctx.state.player_mut(ctx.target).pharmacology;
    match ctx.rng.choose_index(hand.len()) {
        Some(index) => {
            let lost = hand.remove(index);
            debug!(card = lost.name(), "patient panic discard");
            format!("{}: Patient Panic! Discarded random card.", ctx.target)
        }
        None => format!("{}: Patient Panic! No cards to discard.", ctx.target),
    }
}

fn supply_shortage(ctx: &mut EffectContext<'_>) -> String {
    ctx.state.supply_shortage = Some(ctx.actor);
    format!(
        "Supply Shortage: All players cannot use {}s this round!",
        ctx.config.restricted_during_shortage
    )
}

fn anesthetic_failure(ctx: &mut EffectContext<'_>) -> String {
    let hand = &mut ctx.state.player_mut(ctx.target).pharmacology;
    hand.retain(|card| !card.card.is_kind(ANESTHETIC));
    format!("{}: Anesthetic Failure! All anesthetic cards discarded.", ctx.target)
}

fn equipment_malfunction(ctx: &mut EffectContext<'_>) -> String {
    ctx.state.player_mut(ctx.target).skip_next_turn = true;
    format!("{}: Equipment Malfunction! Must skip next turn.", ctx.target)
}
