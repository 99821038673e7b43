//! Game state: players, decks, phases.
//!
//! `GameState` is plain data. All rule enforcement happens in `GameEngine`;
//! the state only offers lookups and the card-movement primitives the engine
//! composes (dealing, discarding, instantiating).
//!
//! Hands are `im::Vector`s, so the snapshot sent with every state-changed
//! notification shares structure with the live state instead of copying it.

use im::Vector;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::cards::{
    CardDefinition, CardInstance, Catalog, Deck, ModifierCard, ModifierCategory, PatientCard,
    PharmacologyCard, ProcedureCard,
};
use crate::core::{GameRng, InstanceAllocator, InstanceId, PlayerId, PlayerMap};

/// Cards held by a player, in the order they were received.
pub type Hand<D> = Vector<CardInstance<D>>;

/// Overall game progression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    Setup,
    Playing,
    Ended,
}

/// Step within the current player's turn.
///
/// Replenishing happens inside the draw step, so there is no separate phase
/// for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnPhase {
    Draw,
    Action,
    Modifiers,
}

impl std::fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnPhase::Draw => f.write_str("draw"),
            TurnPhase::Action => f.write_str("action"),
            TurnPhase::Modifiers => f.write_str("modifiers"),
        }
    }
}

/// Opening patient choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatientSelection {
    /// Waiting for this player to pick one of their options.
    Awaiting(PlayerId),
    /// Both players have chosen (or had nothing to choose from).
    Resolved,
}

/// Everything one player holds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,

    /// Patients offered during setup; empty once chosen.
    pub patient_options: Vector<Arc<PatientCard>>,

    /// Patient currently being treated.
    pub active_patient: Option<CardInstance<PatientCard>>,

    pub procedures: Hand<ProcedureCard>,
    pub pharmacology: Hand<PharmacologyCard>,
    pub easy_modifiers: Hand<ModifierCard>,
    pub challenging_modifiers: Hand<ModifierCard>,

    /// Procedures performed on the active patient.
    pub completed_procedures: Hand<ProcedureCard>,

    /// Fully treated patients.
    pub completed_cases: u32,

    // Single-turn effects, cleared when this player's turn ends.
    pub rush_order_active: bool,
    pub clinical_confidence_active: bool,

    /// Set by equipment malfunction; consumed when the turn would pass here.
    pub skip_next_turn: bool,
}

impl Player {
    #[must_use]
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            patient_options: Vector::new(),
            active_patient: None,
            procedures: Vector::new(),
            pharmacology: Vector::new(),
            easy_modifiers: Vector::new(),
            challenging_modifiers: Vector::new(),
            completed_procedures: Vector::new(),
            completed_cases: 0,
            rush_order_active: false,
            clinical_confidence_active: false,
            skip_next_turn: false,
        }
    }

    /// Modifier hand for a category.
    #[must_use]
    pub fn modifiers(&self, category: ModifierCategory) -> &Hand<ModifierCard> {
        match category {
            ModifierCategory::Easy => &self.easy_modifiers,
            ModifierCategory::Challenging => &self.challenging_modifiers,
        }
    }

    pub fn modifiers_mut(&mut self, category: ModifierCategory) -> &mut Hand<ModifierCard> {
        match category {
            ModifierCategory::Easy => &mut self.easy_modifiers,
            ModifierCategory::Challenging => &mut self.challenging_modifiers,
        }
    }

    /// Find a modifier in either modifier hand.
    #[must_use]
    pub fn find_modifier(&self, id: InstanceId) -> Option<(ModifierCategory, usize)> {
        [ModifierCategory::Easy, ModifierCategory::Challenging]
            .into_iter()
            .find_map(|category| {
                position(self.modifiers(category), id).map(|index| (category, index))
            })
    }

    /// Drop the single-turn effects.
    pub fn clear_turn_effects(&mut self) {
        self.rush_order_active = false;
        self.clinical_confidence_active = false;
    }
}

/// Index of an instance within a hand.
#[must_use]
pub fn position<D: Clone>(hand: &Hand<D>, id: InstanceId) -> Option<usize> {
    hand.iter().position(|card| card.instance_id == id)
}

/// The five draw piles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decks {
    pub patients: Deck<PatientCard>,
    pub procedures: Deck<ProcedureCard>,
    pub pharmacology: Deck<PharmacologyCard>,
    pub easy_modifiers: Deck<ModifierCard>,
    pub challenging_modifiers: Deck<ModifierCard>,
}

impl Decks {
    /// Shuffle every category of the catalog into its own deck.
    #[must_use]
    pub fn shuffled(catalog: &Catalog, rng: &mut GameRng) -> Self {
        Self {
            patients: Deck::shuffled(Catalog::expand(&catalog.patients), rng),
            procedures: Deck::shuffled(Catalog::expand(&catalog.procedures), rng),
            pharmacology: Deck::shuffled(Catalog::expand(&catalog.pharmacology), rng),
            easy_modifiers: Deck::shuffled(Catalog::expand(&catalog.easy_modifiers), rng),
            challenging_modifiers: Deck::shuffled(
                Catalog::expand(&catalog.challenging_modifiers),
                rng,
            ),
        }
    }

    pub fn modifiers_mut(&mut self, category: ModifierCategory) -> &mut Deck<ModifierCard> {
        match category {
            ModifierCategory::Easy => &mut self.easy_modifiers,
            ModifierCategory::Challenging => &mut self.challenging_modifiers,
        }
    }
}

/// Complete game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub current_player: PlayerId,
    pub game_phase: GamePhase,
    pub turn_phase: TurnPhase,
    pub selection: PatientSelection,
    pub players: PlayerMap<Player>,
    pub decks: Decks,

    /// Latest message from a successful command. Each message replaces the
    /// previous one.
    pub message: Option<String>,

    /// Who played the running supply shortage. It lasts until that player's
    /// next turn begins.
    pub supply_shortage: Option<PlayerId>,

    pub winner: Option<PlayerId>,

    /// Starts at 1 and counts every turn handed over, skipped ones included.
    pub turn_number: u32,

    ids: InstanceAllocator,
}

impl GameState {
    /// Fresh state with shuffled decks and empty hands.
    #[must_use]
    pub fn new(catalog: &Catalog, rng: &mut GameRng) -> Self {
        Self {
            current_player: PlayerId::One,
            game_phase: GamePhase::Setup,
            turn_phase: TurnPhase::Draw,
            selection: PatientSelection::Resolved,
            players: PlayerMap::new(Player::new),
            decks: Decks::shuffled(catalog, rng),
            message: None,
            supply_shortage: None,
            winner: None,
            turn_number: 1,
            ids: InstanceAllocator::new(),
        }
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id]
    }

    #[must_use]
    pub fn supply_shortage_active(&self) -> bool {
        self.supply_shortage.is_some()
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.game_phase == GamePhase::Ended
    }

    /// Wrap a definition as a new, uniquely identified instance.
    pub fn instantiate<D: CardDefinition>(&mut self, card: Arc<D>) -> CardInstance<D> {
        CardInstance::create(card, &mut self.ids)
    }

    /// Draw up to `n` procedures into a player's hand. Returns the number drawn.
    pub fn deal_procedures(&mut self, player: PlayerId, n: usize) -> usize {
        let drawn = deal(&mut self.decks.procedures, n, &mut self.ids);
        let count = drawn.len();
        self.players[player].procedures.extend(drawn);
        count
    }

    /// Draw up to `n` pharmacology cards into a player's hand.
    pub fn deal_pharmacology(&mut self, player: PlayerId, n: usize) -> usize {
        let drawn = deal(&mut self.decks.pharmacology, n, &mut self.ids);
        let count = drawn.len();
        self.players[player].pharmacology.extend(drawn);
        count
    }

    /// Draw up to `n` modifiers of a category into a player's hand.
    pub fn deal_modifiers(
        &mut self,
        player: PlayerId,
        category: ModifierCategory,
        n: usize,
    ) -> usize {
        let drawn = deal(self.decks.modifiers_mut(category), n, &mut self.ids);
        let count = drawn.len();
        self.players[player].modifiers_mut(category).extend(drawn);
        count
    }

    /// Draw a patient as a new instance, if any are left.
    pub fn draw_patient(&mut self) -> Option<CardInstance<PatientCard>> {
        let card = self.decks.patients.draw_one()?;
        Some(self.instantiate(card))
    }
}

fn deal<D: CardDefinition + Clone>(
    deck: &mut Deck<D>,
    n: usize,
    ids: &mut InstanceAllocator,
) -> Vec<CardInstance<D>> {
    deck.draw(n)
        .into_iter()
        .map(|card| CardInstance::create(card, ids))
        .collect()
}
