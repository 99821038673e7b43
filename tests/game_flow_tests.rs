//! Whole games driven through the public command surface.

mod common;

use common::{engine, select_all, Engine};
use dental_ccg::{GamePhase, InstanceId, Notification};

/// Play every procedure the current player can pay for, offering the whole
/// pharmacology hand each time.
fn play_what_you_can(engine: &mut Engine) {
    loop {
        let player = engine.player(engine.current_player());
        let offer: Vec<InstanceId> = player.pharmacology.iter().map(|c| c.instance_id).collect();
        let playable = player
            .procedures
            .iter()
            .map(|c| c.instance_id)
            .find(|id| engine.can_play_procedure(*id, &offer));
        match playable {
            Some(id) => engine.play_procedure(id, &offer).unwrap(),
            None => break,
        }
        if engine.state().is_over() {
            break;
        }
    }
}

/// A greedy game keeps every bookkeeping rule intact from start to finish.
#[test]
fn test_greedy_game() {
    for seed in [1, 2, 3, 4, 5] {
        let mut engine = engine(seed);
        engine.start_game().unwrap();
        select_all(&mut engine);

        for _ in 0..200 {
            let seat = engine.current_player();
            engine.draw_cards().unwrap();
            play_what_you_can(&mut engine);
            if engine.state().is_over() {
                break;
            }

            let player = engine.state().player(seat);
            assert!(player.procedures.len() <= 7);
            assert!(player.pharmacology.len() <= 7);
            assert!(player.completed_procedures.iter().all(|c| c.played));
            assert!(player.completed_cases < 2);

            engine.end_turn().unwrap();
        }

        let state = engine.state();
        match state.winner {
            Some(winner) => {
                assert_eq!(state.game_phase, GamePhase::Ended);
                assert_eq!(state.player(winner).completed_cases, 2);
                assert!(state.player(winner.opponent()).completed_cases < 2);
                let ended = engine
                    .observer()
                    .events()
                    .iter()
                    .filter(|e| matches!(e, Notification::GameEnded { .. }))
                    .count();
                assert_eq!(ended, 1);
            }
            None => assert_eq!(state.game_phase, GamePhase::Playing),
        }
    }
}

/// Every successful command reports the resulting state last; refusals
/// only report a message.
#[test]
fn test_notification_order() {
    let mut engine = engine(9);
    engine.start_game().unwrap();
    select_all(&mut engine);
    engine.observer_mut().drain();

    engine.draw_cards().unwrap();
    let events = engine.observer_mut().drain();
    assert!(matches!(events.last(), Some(Notification::StateChanged(_))));

    engine.draw_cards().unwrap_err();
    let events = engine.observer_mut().drain();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], Notification::Message(_)));
}

/// The same seed plays out the same game.
#[test]
fn test_seeded_games_repeat() {
    let run = |seed| {
        let mut engine = engine(seed);
        engine.start_game().unwrap();
        select_all(&mut engine);
        for _ in 0..10 {
            engine.draw_cards().unwrap();
            play_what_you_can(&mut engine);
            if engine.state().is_over() {
                break;
            }
            engine.end_turn().unwrap();
        }
        engine.state().clone()
    };

    assert_eq!(run(77), run(77));
}
