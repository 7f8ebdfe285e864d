//! What a seat is allowed to see.
//!
//! A `SeatView` is built fresh from `MatchState` on every request and holds
//! no references into it. Hidden information is reduced to counts: other
//! seats' hands, every deck, the monument deck, other seats' draft piles.
//! Another seat's mage choice shows only whether it has been made.
//!
//! `ObserverView` is the unredacted state and exists only with the
//! `observer` feature.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cards::{CardId, CardRegistry, ControlledCard};
use crate::core::{
    MatchConfig, MatchState, Phase, Player, PlayerId, ResourceBag, RulesError, Standings,
};
#[cfg(feature = "observer")]
use crate::core::GameRngState;
use crate::effects::PendingDecision;

use super::action::pending_decisions;
use super::income::required_choices;
use super::victory;

/// A seat's public face.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicPlayer {
    pub seat: PlayerId,
    pub mage: Option<ControlledCard>,
    pub magic_item: Option<ControlledCard>,
    pub artifacts: Vec<ControlledCard>,
    pub monuments: Vec<ControlledCard>,
    pub places_of_power: Vec<ControlledCard>,
    pub scrolls: Vec<ControlledCard>,
    pub hand_count: usize,
    pub deck_count: usize,
    pub discard: Vec<CardId>,
    pub resources: ResourceBag,
    pub has_first_player_token: bool,
    pub token_face_up: bool,
    pub points: u32,
}

impl PublicPlayer {
    fn new(player: &Player, registry: &CardRegistry, config: &MatchConfig) -> Self {
        Self {
            seat: player.id,
            mage: player.mage.clone(),
            magic_item: player.magic_item.clone(),
            artifacts: player.artifacts.iter().cloned().collect(),
            monuments: player.monuments.iter().cloned().collect(),
            places_of_power: player.places_of_power.iter().cloned().collect(),
            scrolls: player.scrolls.iter().cloned().collect(),
            hand_count: player.hand.len(),
            deck_count: player.deck.len(),
            discard: player.discard.iter().copied().collect(),
            resources: player.resources,
            has_first_player_token: player.has_first_player_token,
            token_face_up: player.token_face_up,
            points: victory::points(player, registry, config),
        }
    }
}

/// Shared pools; the monument deck is a count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicPools {
    pub monuments: Vec<CardId>,
    pub monument_deck_count: usize,
    pub places_of_power: Vec<CardId>,
    pub magic_items: Vec<CardId>,
    pub scrolls: Vec<CardId>,
}

/// Draft and selection, from one seat's side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftView {
    pub candidates: Vec<CardId>,
    pub drafted: Vec<CardId>,
    /// Per seat.
    pub candidate_counts: Vec<usize>,
    /// Per seat.
    pub drafted_counts: Vec<usize>,
    pub mage_options: Vec<CardId>,
    pub selected_mage: Option<CardId>,
    /// Per seat: has a mage been chosen?
    pub mages_chosen: Vec<bool>,
    pub item_selector: Option<PlayerId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeView {
    pub finalized: Vec<bool>,
    pub waiting: Vec<bool>,
    /// Cards this seat will collect from.
    pub collect: Vec<CardId>,
    pub choices: BTreeMap<CardId, ResourceBag>,
    /// Cards whose income needs an answer before finalizing.
    pub required: Vec<CardId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionView {
    pub active: PlayerId,
    pub passed: Vec<bool>,
    pub stack_depth: usize,
    pub waiting_on: Vec<PlayerId>,
}

/// Everything one seat may see.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatView {
    pub seat: PlayerId,
    pub phase: Phase,
    pub round: u32,
    pub first_player: PlayerId,
    pub hand: Vec<CardId>,
    pub players: Vec<PublicPlayer>,
    pub pools: PublicPools,
    pub draft: Option<DraftView>,
    pub income: Option<IncomeView>,
    pub action: Option<ActionView>,
    /// Decisions this seat owes right now.
    pub decisions: Vec<PendingDecision>,
    pub standings: Option<Standings>,
}

impl SeatView {
    /// Build `seat`'s view of `state`.
    pub fn new(
        state: &MatchState,
        registry: &CardRegistry,
        config: &MatchConfig,
        seat: PlayerId,
    ) -> Result<Self, RulesError> {
        let me = state.player(seat)?;
        let players = state
            .players
            .values()
            .map(|p| PublicPlayer::new(p, registry, config))
            .collect();
        let pools = PublicPools {
            monuments: state.pools.monuments.iter().copied().collect(),
            monument_deck_count: state.pools.monument_deck.len(),
            places_of_power: state.pools.places_of_power.iter().copied().collect(),
            magic_items: state.pools.magic_items.iter().copied().collect(),
            scrolls: state.pools.scrolls.iter().copied().collect(),
        };

        let draft = state.draft().map(|d| DraftView {
            candidates: d.candidates[seat].iter().copied().collect(),
            drafted: d.drafted[seat].iter().copied().collect(),
            candidate_counts: d.candidates.values().map(|c| c.len()).collect(),
            drafted_counts: d.drafted.values().map(|c| c.len()).collect(),
            mage_options: d.mage_options[seat].clone(),
            selected_mage: d.selected_mage[seat],
            mages_chosen: d.selected_mage.values().map(Option::is_some).collect(),
            item_selector: d.item_selector,
        });
        let income = state.income().map(|i| IncomeView {
            finalized: i.finalized.values().copied().collect(),
            waiting: i.waiting.values().copied().collect(),
            collect: i.collect[seat].clone(),
            choices: i.choices[seat].clone(),
            required: required_choices(me, registry),
        });
        let action = state.action().map(|a| ActionView {
            active: a.active,
            passed: a.passed.values().copied().collect(),
            stack_depth: a.stack.len(),
            waiting_on: a.stack.top().map(|e| e.interrupt.waiting_on()).unwrap_or_default(),
        });
        let decisions = pending_decisions(state, registry)
            .into_iter()
            .filter(|d| d.seat == seat)
            .collect();

        Ok(Self {
            seat,
            phase: state.phase,
            round: state.round,
            first_player: state.first_player(),
            hand: me.hand.iter().copied().collect(),
            players,
            pools,
            draft,
            income,
            action,
            decisions,
            standings: state.standings().cloned(),
        })
    }

    /// This seat's public entry.
    #[must_use]
    pub fn me(&self) -> Option<&PublicPlayer> {
        self.players.iter().find(|p| p.seat == self.seat)
    }
}

/// The whole state, unredacted.
#[cfg(feature = "observer")]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObserverView {
    pub state: MatchState,
    pub rng: GameRngState,
    pub decisions: Vec<PendingDecision>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::base_set;
    use crate::core::{GameRng, PhaseState};
    use crate::rules::draft;

    fn dealt(seats: usize) -> (MatchState, CardRegistry, MatchConfig) {
        let registry = base_set();
        let config = MatchConfig::new(seats).with_seed(3);
        let mut state = MatchState::new(seats);
        draft::setup(&mut state, &registry, &config, &mut GameRng::new(3));
        (state, registry, config)
    }

    #[test]
    fn test_draft_piles_are_counts_for_others() {
        let (state, registry, config) = dealt(3);
        let view = SeatView::new(&state, &registry, &config, PlayerId::new(1)).unwrap();
        let draft = view.draft.as_ref().unwrap();

        let own: Vec<CardId> =
            state.draft().unwrap().candidates[PlayerId::new(1)].iter().copied().collect();
        assert_eq!(draft.candidates, own);
        assert_eq!(draft.candidate_counts, vec![4, 4, 4]);
        assert_eq!(draft.mage_options.len(), 2);
        assert_eq!(view.pools.monument_deck_count, state.pools.monument_deck.len());
        assert!(view.players.iter().all(|p| p.hand_count == 0 && p.deck_count == 0));
    }

    #[test]
    fn test_mage_choice_is_a_flag_for_others() {
        let (mut state, registry, config) = dealt(2);
        if let PhaseState::Draft(draft) = &mut state.sub {
            let first = draft.mage_options[PlayerId::new(0)].first().copied();
            draft.selected_mage[PlayerId::new(0)] = first;
        }

        let mine = SeatView::new(&state, &registry, &config, PlayerId::new(0)).unwrap();
        let theirs = SeatView::new(&state, &registry, &config, PlayerId::new(1)).unwrap();

        assert!(mine.draft.as_ref().unwrap().selected_mage.is_some());
        assert_eq!(theirs.draft.as_ref().unwrap().selected_mage, None);
        assert_eq!(theirs.draft.as_ref().unwrap().mages_chosen, vec![true, false]);
    }

    #[test]
    fn test_views_are_deterministic() {
        let (state, registry, config) = dealt(2);
        let view = || SeatView::new(&state, &registry, &config, PlayerId::new(0)).unwrap();
        let first = serde_json::to_string(&view()).unwrap();
        let second = serde_json::to_string(&view()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_seat() {
        let (state, registry, config) = dealt(2);
        assert_eq!(
            SeatView::new(&state, &registry, &config, PlayerId::new(5)),
            Err(RulesError::UnknownSeat(PlayerId::new(5)))
        );
    }
}
