//! Shared fixtures for the integration tests.
//!
//! Most scenarios start from `ready`, a game where both patients are chosen
//! and player 1 is in the draw phase, then arrange hands directly through
//! `state_mut`.

#![allow(dead_code)]

use std::sync::Arc;

use dental_ccg::cards::{CardId, ModifierCard, PatientCard, PharmacologyCard, ProcedureCard};
use dental_ccg::{Catalog, EventLog, GameEngine, GameRng, InstanceId, PlayerId, RulesConfig};

pub type Engine = GameEngine<EventLog>;

pub fn engine(seed: u64) -> Engine {
    engine_with(Catalog::standard().unwrap(), RulesConfig::default(), seed)
}

pub fn engine_with(catalog: Catalog, config: RulesConfig, seed: u64) -> Engine {
    GameEngine::new(&catalog, config, GameRng::new(seed), EventLog::new())
        .expect("fixture catalog and config are valid")
}

/// Both players have picked their first offered patient.
pub fn ready(seed: u64) -> Engine {
    let mut engine = engine(seed);
    engine.start_game().unwrap();
    select_all(&mut engine);
    engine
}

pub fn select_all(engine: &mut Engine) {
    while let Some((_, options)) = engine.pending_selection() {
        engine.select_patient(&options[0].id).unwrap();
    }
}

/// Player 1 has drawn and is in the action phase.
pub fn acting(seed: u64) -> Engine {
    let mut engine = ready(seed);
    engine.draw_cards().unwrap();
    engine
}

pub fn pharmacology(kind: &str) -> Arc<PharmacologyCard> {
    Arc::new(PharmacologyCard {
        id: CardId::new(kind.to_lowercase()),
        name: kind.into(),
        kind: kind.into(),
    })
}

pub fn procedure(id: &str) -> Arc<ProcedureCard> {
    let catalog = Catalog::standard().unwrap();
    Arc::new(catalog.procedure(&id.into()).unwrap().clone())
}

pub fn patient(id: &str) -> Arc<PatientCard> {
    let catalog = Catalog::standard().unwrap();
    Arc::new(catalog.patient(&id.into()).unwrap().clone())
}

pub fn modifier(id: &str) -> Arc<ModifierCard> {
    let catalog = Catalog::standard().unwrap();
    let card = catalog
        .easy_modifiers
        .iter()
        .chain(&catalog.challenging_modifiers)
        .map(|entry| &entry.card)
        .find(|card| card.id.as_str() == id)
        .unwrap()
        .clone();
    Arc::new(card)
}

/// Empty a player's procedure and pharmacology hands.
pub fn clear_hands(engine: &mut Engine, seat: PlayerId) {
    let player = engine.state_mut().player_mut(seat);
    player.procedures.clear();
    player.pharmacology.clear();
}

pub fn give_pharmacology(engine: &mut Engine, seat: PlayerId, kind: &str) -> InstanceId {
    let state = engine.state_mut();
    let card = state.instantiate(pharmacology(kind));
    let id = card.instance_id;
    state.player_mut(seat).pharmacology.push_back(card);
    id
}

pub fn give_procedure(engine: &mut Engine, seat: PlayerId, id: &str) -> InstanceId {
    let state = engine.state_mut();
    let card = state.instantiate(procedure(id));
    let instance = card.instance_id;
    state.player_mut(seat).procedures.push_back(card);
    instance
}

pub fn give_modifier(engine: &mut Engine, seat: PlayerId, id: &str) -> InstanceId {
    let card = modifier(id);
    let category = card.category;
    let state = engine.state_mut();
    let card = state.instantiate(card);
    let instance = card.instance_id;
    state.player_mut(seat).modifiers_mut(category).push_back(card);
    instance
}

/// Replace the active patient and forget any progress on the old one.
pub fn set_patient(engine: &mut Engine, seat: PlayerId, id: &str) {
    let state = engine.state_mut();
    let card = state.instantiate(patient(id));
    let player = state.player_mut(seat);
    player.active_patient = Some(card);
    player.completed_procedures.clear();
}
