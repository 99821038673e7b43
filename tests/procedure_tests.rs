//! Procedure play, patient completion and winning.

mod common;

use std::sync::Arc;

use common::{
    acting, clear_hands, engine_with, give_modifier, give_pharmacology, give_procedure,
    select_all, set_patient, Engine,
};
use dental_ccg::cards::{CardId, PatientCard, ProcedureCard, Requirement, ANESTHETIC};
use dental_ccg::{
    Catalog, GameError, GamePhase, InstanceId, Notification, PlayerId, QuantityPolicy,
    RulesConfig,
};

/// Give `seat` a patient whose goal is the given procedures, one each.
fn treat(engine: &mut Engine, seat: PlayerId, name: &str, goal: &[&str]) {
    let card = Arc::new(PatientCard {
        id: CardId::new(name.to_lowercase()),
        name: name.into(),
        condition: "Toothache".into(),
        vulnerability: None,
        treatment_goal: goal.iter().map(|kind| Requirement::new(*kind, 1)).collect(),
    });
    let state = engine.state_mut();
    let instance = state.instantiate(card);
    let player = state.player_mut(seat);
    player.active_patient = Some(instance);
    player.completed_procedures.clear();
}

/// Player 1 in the action phase with empty procedure and pharmacology hands.
fn empty_handed(seed: u64) -> Engine {
    let mut engine = acting(seed);
    clear_hands(&mut engine, PlayerId::One);
    engine
}

// =============================================================================
// Playing procedures
// =============================================================================

/// A procedure paid with one matching card moves to the completed pile.
#[test]
fn test_play_with_single_anesthetic() {
    let mut engine = empty_handed(31);
    set_patient(&mut engine, PlayerId::One, "busy-executive");
    let filling = give_procedure(&mut engine, PlayerId::One, "filling");
    let lido = give_pharmacology(&mut engine, PlayerId::One, ANESTHETIC);
    give_pharmacology(&mut engine, PlayerId::One, "Antiseptic");

    engine.play_procedure(filling, &[lido]).unwrap();

    let player = engine.state().player(PlayerId::One);
    assert!(player.procedures.is_empty());
    assert_eq!(player.pharmacology.len(), 1);
    assert_eq!(player.completed_procedures.len(), 1);
    assert_eq!(player.completed_procedures[0].instance_id, filling);
    assert!(player.completed_procedures[0].played);
    assert_eq!(
        engine.state().message.as_deref(),
        Some("Busy Executive: Filling completed!")
    );
    assert!(!engine.is_patient_fully_treated(PlayerId::One));
}

/// Insufficient pharmacology is refused and leaves everything in place.
#[test]
fn test_missing_pharmacology_rejected() {
    let mut engine = empty_handed(32);
    let extraction = give_procedure(&mut engine, PlayerId::One, "extraction");
    let lido = give_pharmacology(&mut engine, PlayerId::One, ANESTHETIC);
    let before = engine.state().clone();

    assert!(!engine.can_play_procedure(extraction, &[lido]));
    let result = engine.play_procedure(extraction, &[lido]);

    assert!(matches!(result, Err(GameError::MissingPharmacology { .. })));
    assert_eq!(engine.state(), &before);
    assert_eq!(
        engine.observer().last_message(),
        Some("Cannot play procedure: missing required pharmacology cards")
    );
}

/// Cards that are not in hand, or are chosen twice, are refused.
#[test]
fn test_bad_selections() {
    let mut engine = empty_handed(33);
    let filling = give_procedure(&mut engine, PlayerId::One, "filling");
    let lido = give_pharmacology(&mut engine, PlayerId::One, ANESTHETIC);
    let theirs = give_pharmacology(&mut engine, PlayerId::Two, ANESTHETIC);

    assert_eq!(
        engine.play_procedure(filling, &[theirs]),
        Err(GameError::NotInHand(theirs))
    );
    assert_eq!(
        engine.play_procedure(filling, &[lido, lido]),
        Err(GameError::DuplicateSelection(lido))
    );
    assert_eq!(
        engine.play_procedure(lido, &[]),
        Err(GameError::NotInHand(lido))
    );
}

/// Chosen cards nobody needs stay in hand.
#[test]
fn test_unneeded_cards_kept() {
    let mut engine = empty_handed(34);
    let exam = give_procedure(&mut engine, PlayerId::One, "examination");
    let chx = give_pharmacology(&mut engine, PlayerId::One, "Antiseptic");
    let lido = give_pharmacology(&mut engine, PlayerId::One, ANESTHETIC);

    engine.play_procedure(exam, &[lido, chx]).unwrap();

    let hand: Vec<_> = engine
        .state()
        .player(PlayerId::One)
        .pharmacology
        .iter()
        .map(|c| c.instance_id)
        .collect();
    assert_eq!(hand, vec![lido]);
}

/// A patient's vulnerability is only a warning: every required type offered
/// is enough.
#[test]
fn test_vulnerability_does_not_restrict() {
    let mut engine = empty_handed(35);
    set_patient(&mut engine, PlayerId::One, "retired-teacher");
    let extraction = give_procedure(&mut engine, PlayerId::One, "extraction");
    let lido = give_pharmacology(&mut engine, PlayerId::One, ANESTHETIC);
    let gauze = give_pharmacology(&mut engine, PlayerId::One, "Hemostatic");

    assert!(engine.can_play_procedure(extraction, &[lido, gauze]));
    engine.play_procedure(extraction, &[lido, gauze]).unwrap();

    assert!(engine.state().player(PlayerId::One).pharmacology.is_empty());
}

/// Clinical confidence lets anesthetics count again during a supply shortage.
#[test]
fn test_clinical_confidence_waives_shortage() {
    let mut engine = empty_handed(44);
    set_patient(&mut engine, PlayerId::One, "hockey-player");
    let shortage = give_modifier(&mut engine, PlayerId::One, "supply-shortage");
    let extraction = give_procedure(&mut engine, PlayerId::One, "extraction");
    let lido = give_pharmacology(&mut engine, PlayerId::One, ANESTHETIC);
    let gauze = give_pharmacology(&mut engine, PlayerId::One, "Hemostatic");

    engine.play_modifier(shortage, PlayerId::Two).unwrap();
    assert!(matches!(
        engine.play_procedure(extraction, &[lido, gauze]),
        Err(GameError::MissingPharmacology { .. })
    ));

    let confidence = give_modifier(&mut engine, PlayerId::One, "clinical-confidence");
    engine.play_modifier(confidence, PlayerId::One).unwrap();
    engine.play_procedure(extraction, &[lido, gauze]).unwrap();

    let player = engine.state().player(PlayerId::One);
    assert!(player.pharmacology.is_empty());
    assert!(!player.clinical_confidence_active);
    assert!(engine.state().supply_shortage_active());
}

/// Supply shortage stops anesthetics counting for either player.
#[test]
fn test_supply_shortage_blocks_anesthetic() {
    let mut engine = empty_handed(36);
    set_patient(&mut engine, PlayerId::One, "busy-executive");
    let shortage = give_modifier(&mut engine, PlayerId::One, "supply-shortage");
    let filling = give_procedure(&mut engine, PlayerId::One, "filling");
    let lido = give_pharmacology(&mut engine, PlayerId::One, ANESTHETIC);

    engine.play_modifier(shortage, PlayerId::Two).unwrap();

    assert!(!engine.can_play_procedure(filling, &[lido]));
    assert!(engine.play_procedure(filling, &[lido]).is_err());

    // Still in force on the opponent's turn.
    engine.end_turn().unwrap();
    engine.draw_cards().unwrap();
    set_patient(&mut engine, PlayerId::Two, "busy-executive");
    let theirs = give_procedure(&mut engine, PlayerId::Two, "filling");
    let their_lido = give_pharmacology(&mut engine, PlayerId::Two, ANESTHETIC);
    assert!(!engine.can_play_procedure(theirs, &[their_lido]));
}

/// Rush order covers one missing card and is used up.
#[test]
fn test_rush_order_covers_shortfall() {
    let mut engine = empty_handed(37);
    set_patient(&mut engine, PlayerId::One, "marathon-runner");
    let root_canal = give_procedure(&mut engine, PlayerId::One, "root-canal");
    let amox = give_pharmacology(&mut engine, PlayerId::One, "Antibiotic");
    let rush = give_modifier(&mut engine, PlayerId::One, "rush-order");

    assert!(!engine.can_play_procedure(root_canal, &[amox]));
    engine.play_modifier(rush, PlayerId::Two).unwrap();
    assert!(engine.can_play_procedure(root_canal, &[amox]));

    engine.play_procedure(root_canal, &[amox]).unwrap();

    let player = engine.state().player(PlayerId::One);
    assert!(player.pharmacology.is_empty());
    assert!(!player.rush_order_active);
    assert_eq!(player.completed_procedures.len(), 1);
}

/// Procedures need a patient to be performed on.
#[test]
fn test_no_active_patient() {
    let mut engine = empty_handed(38);
    engine.state_mut().player_mut(PlayerId::One).active_patient = None;
    let exam = give_procedure(&mut engine, PlayerId::One, "examination");

    assert_eq!(
        engine.play_procedure(exam, &[]),
        Err(GameError::NoActivePatient)
    );
}

// =============================================================================
// Completing patients
// =============================================================================

/// Meeting a patient's goal completes the case and brings in the next patient.
#[test]
fn test_single_filling_goal_completes_case() {
    let mut engine = empty_handed(39);
    treat(&mut engine, PlayerId::One, "Office Worker", &["Filling"]);
    let filling = give_procedure(&mut engine, PlayerId::One, "filling");
    let lido = give_pharmacology(&mut engine, PlayerId::One, ANESTHETIC);
    let waiting = engine.state().decks.patients.len();

    engine.play_procedure(filling, &[lido]).unwrap();

    let player = engine.state().player(PlayerId::One);
    assert_eq!(player.completed_cases, 1);
    assert!(player.completed_procedures.is_empty());
    assert_ne!(
        player.active_patient.as_ref().map(|p| p.name()),
        Some("Office Worker")
    );
    assert_eq!(engine.state().decks.patients.len(), waiting - 1);
    assert!(engine
        .observer()
        .messages()
        .any(|m| m == "Patient Office Worker fully treated! Cases completed: 1"));
    assert_eq!(engine.state().game_phase, GamePhase::Playing);
}

/// The second completed case wins, and the game accepts nothing afterwards.
#[test]
fn test_second_case_wins() {
    let mut engine = empty_handed(40);

    for case in 1..=2 {
        treat(&mut engine, PlayerId::One, "Office Worker", &["Filling"]);
        let filling = give_procedure(&mut engine, PlayerId::One, "filling");
        let lido = give_pharmacology(&mut engine, PlayerId::One, ANESTHETIC);
        engine.play_procedure(filling, &[lido]).unwrap();
        assert_eq!(engine.state().player(PlayerId::One).completed_cases, case);
    }

    assert_eq!(engine.state().game_phase, GamePhase::Ended);
    assert_eq!(engine.winner(), Some(PlayerId::One));
    assert_eq!(
        engine.state().message.as_deref(),
        Some("Player 1 wins! First to complete 2 cases!")
    );
    assert!(engine
        .observer()
        .events()
        .contains(&Notification::GameEnded {
            winner: PlayerId::One
        }));

    let frozen = engine.state().clone();
    assert_eq!(engine.end_turn(), Err(GameError::GameOver));
    assert_eq!(engine.draw_cards(), Err(GameError::GameOver));
    assert_eq!(engine.start_game(), Err(GameError::GameOver));
    assert_eq!(
        engine.select_patient(&CardId::new("busy-executive")),
        Err(GameError::GameOver)
    );
    assert_eq!(
        engine.play_procedure(InstanceId(1), &[]),
        Err(GameError::GameOver)
    );
    assert_eq!(engine.state(), &frozen);
}

/// Goals demanding several of one procedure need that many completions.
#[test]
fn test_goal_quantity() {
    let mut engine = empty_handed(41);
    set_patient(&mut engine, PlayerId::One, "nervous-student");

    for done in 0..2 {
        assert!(!engine.is_patient_fully_treated(PlayerId::One));
        let filling = give_procedure(&mut engine, PlayerId::One, "filling");
        let lido = give_pharmacology(&mut engine, PlayerId::One, ANESTHETIC);
        engine.play_procedure(filling, &[lido]).unwrap();
        assert_eq!(engine.state().player(PlayerId::One).completed_cases, done);
    }
}

/// With no patients left the player is told so and cannot treat anyone.
#[test]
fn test_patient_deck_exhausted() {
    let mut engine = empty_handed(42);
    engine.state_mut().decks.patients.draw(usize::MAX);
    treat(&mut engine, PlayerId::One, "Office Worker", &["Examination"]);
    let exam = give_procedure(&mut engine, PlayerId::One, "examination");
    let chx = give_pharmacology(&mut engine, PlayerId::One, "Antiseptic");

    engine.play_procedure(exam, &[chx]).unwrap();

    assert!(engine.state().player(PlayerId::One).active_patient.is_none());
    assert_eq!(
        engine.state().message.as_deref(),
        Some("No more patients available!")
    );

    let another = give_procedure(&mut engine, PlayerId::One, "examination");
    assert_eq!(
        engine.play_procedure(another, &[]),
        Err(GameError::NoActivePatient)
    );
}

/// The relaxed quantity policy lets one card pay for a multi-card requirement.
#[test]
fn test_at_least_one_policy() {
    let config = RulesConfig::default().with_quantity_policy(QuantityPolicy::AtLeastOne);
    let mut engine = engine_with(Catalog::standard().unwrap(), config, 43);
    engine.start_game().unwrap();
    select_all(&mut engine);
    engine.draw_cards().unwrap();
    clear_hands(&mut engine, PlayerId::One);
    set_patient(&mut engine, PlayerId::One, "busy-executive");

    let double_filling = Arc::new(ProcedureCard {
        id: CardId::new("filling"),
        name: "Filling".into(),
        requirements: [Requirement::new(ANESTHETIC, 2)].into_iter().collect(),
    });
    let state = engine.state_mut();
    let filling = state.instantiate(double_filling);
    let filling_id = filling.instance_id;
    state.player_mut(PlayerId::One).procedures.push_back(filling);
    let lido = give_pharmacology(&mut engine, PlayerId::One, ANESTHETIC);

    engine.play_procedure(filling_id, &[lido]).unwrap();

    assert!(engine.state().player(PlayerId::One).pharmacology.is_empty());
}
