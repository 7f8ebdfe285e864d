//! Match state representation.
//!
//! `MatchState` is the single mutable root of a match. Card lists use
//! `im::Vector`, so cloning the whole state is O(1) with structural
//! sharing: `Match::submit` snapshots it before every command and puts the
//! snapshot back if the command fails.
//!
//! ## Layout
//!
//! - `players`: per-seat tables, hands, decks and pools
//! - `pools`: shared cards not yet owned by anyone
//! - `sub`: exactly one phase-specific sub-state
//!
//! Deck order is hidden from seats; only `rules::view` decides what a seat
//! may see.

use std::collections::BTreeMap;

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::{CardId, ControlledCard};
use crate::stack::InterruptStack;

use super::entity::InstanceId;
use super::error::RulesError;
use super::player::{PlayerId, PlayerMap};
use super::resources::ResourceBag;

/// Top-level phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Setup,
    DraftingRound1,
    DraftingRound2,
    MageSelection,
    MagicItemSelection,
    Income,
    Action,
    GameOver,
}

/// One seat's cards and resources.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub mage: Option<ControlledCard>,
    pub magic_item: Option<ControlledCard>,
    pub artifacts: Vector<ControlledCard>,
    pub monuments: Vector<ControlledCard>,
    pub places_of_power: Vector<ControlledCard>,
    pub scrolls: Vector<ControlledCard>,
    pub hand: Vector<CardId>,
    /// Front is the top.
    pub deck: Vector<CardId>,
    pub discard: Vector<CardId>,
    /// Unplaced resources.
    pub resources: ResourceBag,
    pub has_first_player_token: bool,
    pub token_face_up: bool,
}

impl Player {
    #[must_use]
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            mage: None,
            magic_item: None,
            artifacts: Vector::new(),
            monuments: Vector::new(),
            places_of_power: Vector::new(),
            scrolls: Vector::new(),
            hand: Vector::new(),
            deck: Vector::new(),
            discard: Vector::new(),
            resources: ResourceBag::new(),
            has_first_player_token: false,
            token_face_up: true,
        }
    }

    /// Every card this seat controls: mage, magic item, artifacts,
    /// monuments, places of power, scrolls.
    pub fn controlled(&self) -> impl Iterator<Item = &ControlledCard> {
        self.mage
            .iter()
            .chain(self.magic_item.iter())
            .chain(self.artifacts.iter())
            .chain(self.monuments.iter())
            .chain(self.places_of_power.iter())
            .chain(self.scrolls.iter())
    }

    /// Cards that score: artifacts, monuments, places of power.
    pub fn scoring_cards(&self) -> impl Iterator<Item = &ControlledCard> {
        self.artifacts
            .iter()
            .chain(self.monuments.iter())
            .chain(self.places_of_power.iter())
    }

    /// First controlled card with this id.
    #[must_use]
    pub fn find_controlled(&self, card: CardId) -> Option<&ControlledCard> {
        self.controlled().find(|c| c.card == card)
    }

    pub fn find_controlled_mut(&mut self, card: CardId) -> Option<&mut ControlledCard> {
        self.find_mut_by(|c| c.card == card)
    }

    #[must_use]
    pub fn find_instance(&self, instance: InstanceId) -> Option<&ControlledCard> {
        self.controlled().find(|c| c.instance == instance)
    }

    pub fn find_instance_mut(&mut self, instance: InstanceId) -> Option<&mut ControlledCard> {
        self.find_mut_by(|c| c.instance == instance)
    }

    fn find_mut_by(
        &mut self,
        pred: impl Fn(&ControlledCard) -> bool,
    ) -> Option<&mut ControlledCard> {
        if let Some(card) = self.mage.as_mut().filter(|c| pred(&**c)) {
            return Some(card);
        }
        if let Some(card) = self.magic_item.as_mut().filter(|c| pred(&**c)) {
            return Some(card);
        }
        self.artifacts
            .iter_mut()
            .chain(self.monuments.iter_mut())
            .chain(self.places_of_power.iter_mut())
            .chain(self.scrolls.iter_mut())
            .find(|c| pred(&**c))
    }

    /// Remove an artifact from play, returning it.
    pub fn remove_artifact(&mut self, instance: InstanceId) -> Option<ControlledCard> {
        let index = self.artifacts.iter().position(|c| c.instance == instance)?;
        Some(self.artifacts.remove(index))
    }

    /// Remove the first copy of `card` from hand.
    pub fn take_from_hand(&mut self, card: CardId) -> Option<CardId> {
        let index = self.hand.iter().position(|c| *c == card)?;
        Some(self.hand.remove(index))
    }

    /// Draw up to `count` cards, returning how many were drawn.
    pub fn draw(&mut self, count: u32) -> u32 {
        let mut drawn = 0;
        while drawn < count {
            let Some(card) = self.deck.pop_front() else {
                break;
            };
            self.hand.push_back(card);
            drawn += 1;
        }
        drawn
    }

    pub fn untap_all(&mut self) {
        if let Some(card) = self.mage.as_mut() {
            card.tapped = false;
        }
        if let Some(card) = self.magic_item.as_mut() {
            card.tapped = false;
        }
        for card in self
            .artifacts
            .iter_mut()
            .chain(self.monuments.iter_mut())
            .chain(self.places_of_power.iter_mut())
            .chain(self.scrolls.iter_mut())
        {
            card.tapped = false;
        }
    }
}

/// Cards not owned by any seat.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedPools {
    /// Face-up monuments available to buy.
    pub monuments: Vector<CardId>,
    /// Front is the top.
    pub monument_deck: Vector<CardId>,
    pub places_of_power: Vector<CardId>,
    pub magic_items: Vector<CardId>,
    pub scrolls: Vector<CardId>,
    /// Shuffled artifacts not yet dealt for drafting.
    pub artifact_supply: Vector<CardId>,
}

/// Draft and selection progress.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftState {
    /// Cards a seat may pick from now.
    pub candidates: PlayerMap<Vector<CardId>>,
    pub drafted: PlayerMap<Vector<CardId>>,
    pub mage_options: PlayerMap<Vec<CardId>>,
    /// Hidden from other seats until every seat has chosen.
    pub selected_mage: PlayerMap<Option<CardId>>,
    /// The seat whose magic item pick is next.
    pub item_selector: Option<PlayerId>,
}

impl DraftState {
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            candidates: PlayerMap::with_default(player_count),
            drafted: PlayerMap::with_default(player_count),
            mage_options: PlayerMap::with_default(player_count),
            selected_mage: PlayerMap::with_default(player_count),
            item_selector: None,
        }
    }
}

/// Per-round income negotiation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeState {
    pub finalized: PlayerMap<bool>,
    pub waiting: PlayerMap<bool>,
    /// Cards whose stored resources the seat will take.
    pub collect: PlayerMap<Vec<CardId>>,
    /// Answers to choice income, by card.
    pub choices: PlayerMap<BTreeMap<CardId, ResourceBag>>,
}

impl IncomeState {
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            finalized: PlayerMap::with_value(player_count, false),
            waiting: PlayerMap::with_value(player_count, false),
            collect: PlayerMap::with_default(player_count),
            choices: PlayerMap::with_default(player_count),
        }
    }
}

/// Turn loop progress.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionState {
    pub active: PlayerId,
    pub passed: PlayerMap<bool>,
    /// Suspended attacks, reaction windows and reveals.
    pub stack: InterruptStack,
}

impl ActionState {
    #[must_use]
    pub fn new(player_count: usize, active: PlayerId) -> Self {
        Self {
            active,
            passed: PlayerMap::with_value(player_count, false),
            stack: InterruptStack::new(),
        }
    }
}

/// One seat's final score.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub seat: PlayerId,
    pub points: u32,
    pub resource_value: u32,
}

/// Final result, best first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standings {
    pub entries: Vec<Standing>,
    /// More than one on an unbroken tie.
    pub winners: Vec<PlayerId>,
}

/// Phase-specific sub-state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseState {
    None,
    Draft(DraftState),
    Income(IncomeState),
    Action(ActionState),
    GameOver(Standings),
}

/// The whole match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    pub phase: Phase,
    /// 0 until the first Income phase.
    pub round: u32,
    pub players: PlayerMap<Player>,
    pub pools: SharedPools,
    pub next_instance: InstanceId,
    pub sub: PhaseState,
}

impl MatchState {
    /// An empty Setup state.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            phase: Phase::Setup,
            round: 0,
            players: PlayerMap::new(player_count, Player::new),
            pools: SharedPools::default(),
            next_instance: InstanceId::new(0),
            sub: PhaseState::None,
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    /// A seat, or `UnknownSeat`.
    pub fn player(&self, seat: PlayerId) -> Result<&Player, RulesError> {
        self.players.try_get(seat).ok_or(RulesError::UnknownSeat(seat))
    }

    pub fn player_mut(&mut self, seat: PlayerId) -> Result<&mut Player, RulesError> {
        if seat.index() >= self.player_count() {
            return Err(RulesError::UnknownSeat(seat));
        }
        Ok(&mut self.players[seat])
    }

    /// Holder of the first-player token.
    #[must_use]
    pub fn first_player(&self) -> PlayerId {
        self.players
            .iter()
            .find(|(_, p)| p.has_first_player_token)
            .map_or(PlayerId::new(0), |(id, _)| id)
    }

    /// Seats in turn order, starting with the first player.
    #[must_use]
    pub fn turn_order(&self) -> Vec<PlayerId> {
        self.first_player().turn_order(self.player_count())
    }

    /// Allocate a fresh instance id.
    pub fn allocate_instance(&mut self) -> InstanceId {
        let id = self.next_instance;
        self.next_instance = id.successor();
        id
    }

    /// A card entering play.
    pub fn enter_play(&mut self, card: CardId) -> ControlledCard {
        ControlledCard::new(self.allocate_instance(), card)
    }

    #[must_use]
    pub fn draft(&self) -> Option<&DraftState> {
        match &self.sub {
            PhaseState::Draft(draft) => Some(draft),
            _ => None,
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut DraftState> {
        match &mut self.sub {
            PhaseState::Draft(draft) => Some(draft),
            _ => None,
        }
    }

    #[must_use]
    pub fn income(&self) -> Option<&IncomeState> {
        match &self.sub {
            PhaseState::Income(income) => Some(income),
            _ => None,
        }
    }

    pub fn income_mut(&mut self) -> Option<&mut IncomeState> {
        match &mut self.sub {
            PhaseState::Income(income) => Some(income),
            _ => None,
        }
    }

    #[must_use]
    pub fn action(&self) -> Option<&ActionState> {
        match &self.sub {
            PhaseState::Action(action) => Some(action),
            _ => None,
        }
    }

    pub fn action_mut(&mut self) -> Option<&mut ActionState> {
        match &mut self.sub {
            PhaseState::Action(action) => Some(action),
            _ => None,
        }
    }

    #[must_use]
    pub fn standings(&self) -> Option<&Standings> {
        match &self.sub {
            PhaseState::GameOver(standings) => Some(standings),
            _ => None,
        }
    }

    /// Sum of every resource in play: pools plus stored on cards.
    #[must_use]
    pub fn resources_in_play(&self) -> ResourceBag {
        let mut total = ResourceBag::new();
        for player in self.players.values() {
            total += player.resources;
            for card in player.controlled() {
                total += card.resources;
            }
        }
        total
    }
}
