//! The game engine: turn state machine and rule resolution.
//!
//! `GameEngine` owns the `GameState` and is the only thing that changes it.
//! The presentation layer calls the command methods and listens to the
//! `GameObserver` it passed in.
//!
//! ## Command contract
//!
//! - Every command runs to completion and returns `Ok(())` or a `GameError`.
//! - A refused command leaves the state exactly as it was. Its error text is
//!   still sent as a `Message` so the player sees why.
//! - A successful command ends with one `StateChanged` notification.
//! - Once the game has ended, every command is refused with `GameOver`.
//!
//! ## Turn flow
//!
//! ```text
//! start_game -> patient selection (player 1, then player 2)
//!            -> draw -> action/modifiers ... -> end_turn -> next player's draw
//! ```

use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::events::{GameObserver, Notification, NullObserver};
use super::modifier::{self, EffectContext};
use super::procedure::{is_patient_fully_treated, plan_payment, Payment, PaymentRules};
use super::state::{position, GamePhase, GameState, PatientSelection, Player, TurnPhase};
use crate::cards::{CardId, Catalog, ModifierCategory, PatientCard};
use crate::core::{GameRng, InstanceId, PlayerId, RulesConfig};
use crate::error::{GameError, Result, SetupError};

const ACTING_PHASES: [TurnPhase; 2] = [TurnPhase::Action, TurnPhase::Modifiers];

/// Rules engine for one game session.
pub struct GameEngine<O: GameObserver = NullObserver> {
    config: RulesConfig,
    state: GameState,
    /// Stream for random discards; deck order was fixed at construction.
    rng: GameRng,
    observer: O,
}

impl<O: GameObserver> GameEngine<O> {
    /// Validate the catalog and rules, then shuffle the decks.
    ///
    /// This is the only place a malformed catalog or configuration is
    /// reported; once an engine exists every failure is a refused command.
    pub fn new(
        catalog: &Catalog,
        config: RulesConfig,
        rng: GameRng,
        observer: O,
    ) -> std::result::Result<Self, SetupError> {
        catalog.validate()?;
        config.validate()?;

        let state = GameState::new(catalog, &mut rng.for_context("shuffle"));
        debug!(seed = rng.seed(), "engine created");

        Ok(Self {
            config,
            state,
            rng: rng.for_context("discard"),
            observer,
        })
    }

    /// Like `new`, seeded from the operating system.
    pub fn with_entropy(
        catalog: &Catalog,
        config: RulesConfig,
        observer: O,
    ) -> std::result::Result<Self, SetupError> {
        Self::new(catalog, config, GameRng::from_entropy(), observer)
    }

    // === Queries ===

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct state access for arranging scenarios. Bypasses every rule.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    #[must_use]
    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    #[must_use]
    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.state.current_player
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        self.state.player(id)
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.state.winner
    }

    /// Player being asked to choose a patient, with their options.
    #[must_use]
    pub fn pending_selection(&self) -> Option<(PlayerId, Vec<Arc<PatientCard>>)> {
        match self.state.selection {
            PatientSelection::Awaiting(seat) => Some((
                seat,
                self.state.player(seat).patient_options.iter().cloned().collect(),
            )),
            PatientSelection::Resolved => None,
        }
    }

    /// Would `play_procedure` accept these cards from the current player?
    #[must_use]
    pub fn can_play_procedure(&self, procedure: InstanceId, pharmacology: &[InstanceId]) -> bool {
        self.plan_procedure(self.state.current_player, procedure, pharmacology)
            .is_ok()
    }

    /// Has `player` met every treatment goal of their active patient?
    #[must_use]
    pub fn is_patient_fully_treated(&self, player: PlayerId) -> bool {
        let player = self.state.player(player);
        player.active_patient.as_ref().is_some_and(|patient| {
            is_patient_fully_treated(
                &patient.card,
                player.completed_procedures.iter(),
                self.config.quantity_policy,
            )
        })
    }

    // === Commands ===

    /// Deal opening hands and ask player 1 to choose a patient.
    pub fn start_game(&mut self) -> Result<()> {
        let result = self.try_start_game();
        self.finish(result)
    }

    /// Choose one of the offered patients by catalog id.
    pub fn select_patient(&mut self, card: &CardId) -> Result<()> {
        let result = self.try_select_patient(card);
        self.finish(result)
    }

    /// Draw step: one procedure and one pharmacology card, then enforce hand limits.
    pub fn draw_cards(&mut self) -> Result<()> {
        let result = self.try_draw_cards();
        self.finish(result)
    }

    /// Perform a procedure on the active patient, paying with the chosen cards.
    pub fn play_procedure(
        &mut self,
        procedure: InstanceId,
        pharmacology: &[InstanceId],
    ) -> Result<()> {
        let result = self.try_play_procedure(procedure, pharmacology);
        self.finish(result)
    }

    /// Play a modifier. Easy modifiers always apply to the current player;
    /// `target` only matters for challenging ones.
    pub fn play_modifier(&mut self, modifier: InstanceId, target: PlayerId) -> Result<()> {
        let result = self.try_play_modifier(modifier, target);
        self.finish(result)
    }

    /// Pass the turn, honouring a pending skip.
    pub fn end_turn(&mut self) -> Result<()> {
        let result = self.try_end_turn();
        self.finish(result)
    }

    // === Command bodies ===

    fn try_start_game(&mut self) -> Result<()> {
        match self.state.game_phase {
            GamePhase::Setup => {}
            GamePhase::Playing => return Err(GameError::AlreadyStarted),
            GamePhase::Ended => return Err(GameError::GameOver),
        }

        self.state.game_phase = GamePhase::Playing;
        let deal = self.config.opening_hand.clone();
        for seat in PlayerId::all() {
            let options = self.state.decks.patients.draw(deal.patient_options);
            if options.is_empty() {
                self.say("No more patients available!");
            }
            self.state.player_mut(seat).patient_options = options.into_iter().collect();
            self.state.deal_procedures(seat, deal.procedures);
            self.state.deal_pharmacology(seat, deal.pharmacology);
            self.state.deal_modifiers(seat, ModifierCategory::Easy, deal.easy_modifiers);
            self.state.deal_modifiers(
                seat,
                ModifierCategory::Challenging,
                deal.challenging_modifiers,
            );
        }
        info!("game started");

        self.prompt_selection(PlayerId::One);
        Ok(())
    }

    fn try_select_patient(&mut self, card: &CardId) -> Result<()> {
        self.ensure_playing()?;
        let seat = match self.state.selection {
            PatientSelection::Awaiting(seat) => seat,
            PatientSelection::Resolved => return Err(GameError::NoSelectionPending),
        };
        let index = self
            .state
            .player(seat)
            .patient_options
            .iter()
            .position(|option| option.id == *card)
            .ok_or_else(|| GameError::UnknownPatient(card.clone()))?;

        let options = &mut self.state.player_mut(seat).patient_options;
        let chosen = options.remove(index);
        let unchosen = std::mem::take(options);
        for option in unchosen {
            self.state.decks.patients.put_back(option);
        }

        let patient = self.state.instantiate(chosen);
        info!(player = %seat, patient = patient.name(), "patient selected");
        let player = self.state.player_mut(seat);
        player.active_patient = Some(patient);
        player.completed_procedures.clear();

        self.emit(Notification::HidePatientOptions);
        self.prompt_selection(seat.opponent());
        Ok(())
    }

    fn try_draw_cards(&mut self) -> Result<()> {
        self.ensure_turn("draw cards", &[TurnPhase::Draw])?;
        let seat = self.state.current_player;

        let wanted = (self.config.procedures_per_draw, self.config.pharmacology_per_draw);
        let procedures = self.state.deal_procedures(seat, wanted.0);
        let pharmacology = self.state.deal_pharmacology(seat, wanted.1);
        debug!(player = %seat, procedures, pharmacology, "drew cards");
        if procedures < wanted.0 {
            self.say("No procedure cards left to draw");
        }
        if pharmacology < wanted.1 {
            self.say("No pharmacology cards left to draw");
        }

        self.enforce_hand_limits(seat);
        self.state.turn_phase = TurnPhase::Action;
        Ok(())
    }

    fn try_play_procedure(
        &mut self,
        procedure: InstanceId,
        pharmacology: &[InstanceId],
    ) -> Result<()> {
        self.ensure_turn("play a procedure", &ACTING_PHASES)?;
        let seat = self.state.current_player;
        let (index, payment) = self.plan_procedure(seat, procedure, pharmacology)?;
        let policy = self.config.quantity_policy;

        let player = self.state.player_mut(seat);
        player
            .pharmacology
            .retain(|card| !payment.spent.contains(&card.instance_id));
        if payment.rush_order_used {
            player.rush_order_active = false;
        }
        if let Some(waived) = &payment.waived {
            debug!(player = %seat, waived = %waived, "clinical confidence used");
            player.clinical_confidence_active = false;
        }

        let mut done = player.procedures.remove(index);
        done.mark_played();
        let procedure_name = done.name().to_string();
        player.completed_procedures.push_back(done);

        let (patient_name, treated) = match &player.active_patient {
            Some(patient) => (
                patient.name().to_string(),
                is_patient_fully_treated(&patient.card, player.completed_procedures.iter(), policy),
            ),
            None => (String::new(), false),
        };
        info!(
            player = %seat,
            procedure = %procedure_name,
            spent = payment.spent.len(),
            "procedure completed"
        );
        self.say(format!("{patient_name}: {procedure_name} completed!"));

        if treated {
            self.complete_patient(seat);
        }
        Ok(())
    }

    fn try_play_modifier(&mut self, modifier: InstanceId, target: PlayerId) -> Result<()> {
        self.ensure_turn("play a modifier", &ACTING_PHASES)?;
        let seat = self.state.current_player;
        let (category, index) = self
            .state
            .player(seat)
            .find_modifier(modifier)
            .ok_or(GameError::NotInHand(modifier))?;

        let played = self.state.player_mut(seat).modifiers_mut(category).remove(index);
        let target = match category {
            ModifierCategory::Easy => seat,
            ModifierCategory::Challenging => target,
        };
        let message = modifier::resolve(
            played.card.effect,
            &mut EffectContext {
                state: &mut self.state,
                config: &self.config,
                rng: &mut self.rng,
                actor: seat,
                target,
            },
        );
        self.state.deal_modifiers(seat, category, 1);
        self.state.turn_phase = TurnPhase::Modifiers;

        info!(player = %seat, target = %target, modifier = played.name(), "modifier played");
        self.say(message);
        Ok(())
    }

    fn try_end_turn(&mut self) -> Result<()> {
        self.ensure_turn("end the turn", &ACTING_PHASES)?;
        let ending = self.state.current_player;
        self.state.player_mut(ending).clear_turn_effects();

        let mut next = ending.opponent();
        self.state.turn_number += 1;
        if self.state.player(next).skip_next_turn {
            self.state.player_mut(next).skip_next_turn = false;
            info!(player = %next, "turn skipped");
            self.say(format!("{next} skips turn due to equipment malfunction."));
            next = next.opponent();
            self.state.turn_number += 1;
        }

        self.state.current_player = next;
        self.start_turn();
        Ok(())
    }

    // === Internals ===

    fn start_turn(&mut self) {
        let seat = self.state.current_player;
        self.state.turn_phase = TurnPhase::Draw;
        if self.state.supply_shortage == Some(seat) {
            debug!("supply shortage over");
            self.state.supply_shortage = None;
        }
        debug!(player = %seat, turn = self.state.turn_number, "turn started");
    }

    /// Ask the first seat (from `first` on) that still has options to choose;
    /// with nobody left to ask, play begins with player 1.
    ///
    /// A seat left without options or a patient is dealt options from
    /// whatever went back into the patient deck.
    fn prompt_selection(&mut self, first: PlayerId) {
        for seat in [first, first.opponent()] {
            self.refill_patient_options(seat);
            let options = &self.state.player(seat).patient_options;
            if !options.is_empty() {
                let options = options.iter().cloned().collect();
                self.state.selection = PatientSelection::Awaiting(seat);
                self.state.current_player = seat;
                self.emit(Notification::ShowPatientOptions {
                    player: seat,
                    options,
                });
                return;
            }
        }

        self.state.selection = PatientSelection::Resolved;
        self.state.current_player = PlayerId::One;
        self.start_turn();
    }

    fn refill_patient_options(&mut self, seat: PlayerId) {
        let player = self.state.player(seat);
        if player.active_patient.is_some() || !player.patient_options.is_empty() {
            return;
        }
        let options = self
            .state
            .decks
            .patients
            .draw(self.config.opening_hand.patient_options);
        if !options.is_empty() {
            debug!(player = %seat, count = options.len(), "late patient options");
            self.state.player_mut(seat).patient_options = options.into_iter().collect();
        }
    }

    fn enforce_hand_limits(&mut self, seat: PlayerId) {
        let procedure_limit = self.config.procedure_hand_limit;
        let pharmacology_limit = self.config.pharmacology_hand_limit;
        let player = self.state.player_mut(seat);
        let mut discards = SmallVec::<[String; 2]>::new();

        if player.procedures.len() > procedure_limit {
            let excess = player.procedures.len() - procedure_limit;
            player.procedures.truncate(procedure_limit);
            discards.push(format!("Discarded {excess} excess procedure cards"));
        }
        if player.pharmacology.len() > pharmacology_limit {
            let excess = player.pharmacology.len() - pharmacology_limit;
            player.pharmacology.truncate(pharmacology_limit);
            discards.push(format!("Discarded {excess} excess pharmacology cards"));
        }

        for message in discards {
            debug!(player = %seat, %message, "hand limit");
            self.say(message);
        }
    }

    fn complete_patient(&mut self, seat: PlayerId) {
        let player = self.state.player_mut(seat);
        player.completed_cases += 1;
        let cases = player.completed_cases;
        let name = player
            .active_patient
            .as_ref()
            .map(|patient| patient.name().to_string())
            .unwrap_or_default();
        info!(player = %seat, cases, "case completed");
        self.say(format!("Patient {name} fully treated! Cases completed: {cases}"));

        if cases >= self.config.cases_to_win {
            self.end_game(seat);
            return;
        }

        let next = self.state.draw_patient();
        let player = self.state.player_mut(seat);
        player.completed_procedures.clear();
        match next {
            Some(patient) => {
                debug!(player = %seat, patient = patient.name(), "new patient");
                player.active_patient = Some(patient);
            }
            None => {
                player.active_patient = None;
                self.say("No more patients available!");
            }
        }
    }

    fn end_game(&mut self, winner: PlayerId) {
        self.state.game_phase = GamePhase::Ended;
        self.state.winner = Some(winner);
        info!(%winner, "game over");
        self.say(format!(
            "{winner} wins! First to complete {} cases!",
            self.config.cases_to_win
        ));
        self.emit(Notification::GameEnded { winner });
    }

    /// Validate a procedure play without changing anything.
    fn plan_procedure(
        &self,
        seat: PlayerId,
        procedure: InstanceId,
        chosen: &[InstanceId],
    ) -> Result<(usize, Payment)> {
        let player = self.state.player(seat);
        if player.active_patient.is_none() {
            return Err(GameError::NoActivePatient);
        }
        let index =
            position(&player.procedures, procedure).ok_or(GameError::NotInHand(procedure))?;

        let mut cards = Vec::with_capacity(chosen.len());
        for (i, id) in chosen.iter().enumerate() {
            if chosen[..i].contains(id) {
                return Err(GameError::DuplicateSelection(*id));
            }
            let card = player
                .pharmacology
                .iter()
                .find(|card| card.instance_id == *id)
                .ok_or(GameError::NotInHand(*id))?;
            cards.push(card);
        }

        let procedure = &player.procedures[index];
        let rules = self.payment_rules(player);
        plan_payment(&procedure.card, &cards, &rules)
            .map(|payment| (index, payment))
            .ok_or_else(|| GameError::MissingPharmacology {
                procedure: procedure.name().to_string(),
            })
    }

    fn payment_rules<'a>(&'a self, player: &'a Player) -> PaymentRules<'a> {
        let mut restricted: SmallVec<[&str; 2]> = SmallVec::new();
        if self.state.supply_shortage_active() {
            restricted.push(self.config.restricted_during_shortage.as_str());
        }
        PaymentRules {
            policy: self.config.quantity_policy,
            restricted,
            rush_order: player.rush_order_active,
            clinical_confidence: player.clinical_confidence_active,
        }
    }

    fn ensure_playing(&self) -> Result<()> {
        match self.state.game_phase {
            GamePhase::Setup => Err(GameError::NotStarted),
            GamePhase::Playing => Ok(()),
            GamePhase::Ended => Err(GameError::GameOver),
        }
    }

    fn ensure_turn(&self, action: &'static str, allowed: &[TurnPhase]) -> Result<()> {
        self.ensure_playing()?;
        if let PatientSelection::Awaiting(seat) = self.state.selection {
            return Err(GameError::SelectionPending(seat));
        }
        let phase = self.state.turn_phase;
        if !allowed.contains(&phase) {
            return Err(GameError::WrongPhase { action, phase });
        }
        Ok(())
    }

    /// Set the pending message and pass it on.
    fn say(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.state.message = Some(message.clone());
        self.emit(Notification::Message(message));
    }

    fn emit(&mut self, notification: Notification) {
        self.observer.notify(&notification);
    }

    fn finish<T>(&mut self, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => {
                let snapshot = Box::new(self.state.clone());
                self.emit(Notification::StateChanged(snapshot));
            }
            Err(err) => {
                warn!(%err, "command refused");
                self.emit(Notification::Message(err.to_string()));
            }
        }
        result
    }
}
