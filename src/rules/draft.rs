//! Setup, drafting, mage selection and magic item selection.
//!
//! ## Draft
//!
//! Each round deals `draft_hand_size` artifacts to every seat. A pick moves
//! one card from a seat's candidates to its drafted pile. Once every seat
//! has picked, candidate lists rotate: clockwise in the first round (seat
//! `i` receives from `i - 1`), counter-clockwise in the second. The round
//! ends when every list is empty.
//!
//! ## Selection
//!
//! Mages are chosen in secret and revealed together. Magic items are picked
//! one at a time: the last seat in turn order first, then
//! counter-clockwise back to the first player.

use im::Vector;
use log::{debug, info};

use crate::cards::{CardId, CardRegistry, CardType};
use crate::core::{
    ConfigError, DraftState, GameRng, MatchConfig, MatchState, Phase, PhaseState, PlayerId,
    RulesError,
};

use super::income;

/// Place-of-power cards: each pair is one physical card, unpaired ones are
/// single-faced.
fn place_of_power_cards(registry: &CardRegistry) -> Vec<Vec<CardId>> {
    let pairs = registry.place_of_power_pairs();
    let mut cards: Vec<Vec<CardId>> = pairs.iter().map(|(a, b)| vec![*a, *b]).collect();
    for id in registry.ids_of_type(CardType::PlaceOfPower) {
        if !pairs.iter().any(|(a, b)| *a == id || *b == id) {
            cards.push(vec![id]);
        }
    }
    cards
}

fn require(card_type: CardType, needed: usize, available: usize) -> Result<(), ConfigError> {
    if available < needed {
        return Err(ConfigError::NotEnoughCards {
            card_type,
            needed,
            available,
        });
    }
    Ok(())
}

/// Can `registry` supply a match configured by `config`?
pub(crate) fn check_supply(
    registry: &CardRegistry,
    config: &MatchConfig,
) -> Result<(), ConfigError> {
    let seats = config.player_count;
    let count = |t| registry.ids_of_type(t).len();

    require(CardType::Artifact, seats * config.drafted_per_seat(), count(CardType::Artifact))?;
    require(CardType::Mage, seats * config.mage_options, count(CardType::Mage))?;
    // One spare so the last seat to pick still has something to swap for.
    require(CardType::MagicItem, seats + 1, count(CardType::MagicItem))?;
    // The monument count is capped at what the registry holds; only the
    // face-up row must be filled.
    require(CardType::Monument, config.face_up_monuments, count(CardType::Monument))?;
    require(
        CardType::PlaceOfPower,
        config.place_of_power_count(),
        place_of_power_cards(registry).len(),
    )
}

/// Deal a fresh match into `state`.
///
/// `check_supply` must have passed for this registry and config.
pub(crate) fn setup(
    state: &mut MatchState,
    registry: &CardRegistry,
    config: &MatchConfig,
    rng: &mut GameRng,
) {
    let seats = config.player_count;
    *state = MatchState::new(seats);

    let first = PlayerId::new(rng.gen_range_usize(0..seats) as u8);
    state.players[first].has_first_player_token = true;

    let mut artifacts = registry.ids_of_type(CardType::Artifact);
    rng.shuffle(&mut artifacts);
    state.pools.artifact_supply = artifacts.into_iter().collect();

    let mut monuments = registry.ids_of_type(CardType::Monument);
    rng.shuffle(&mut monuments);
    monuments.truncate(config.monument_count());
    let face_up = config.face_up_monuments.min(monuments.len());
    state.pools.monument_deck = monuments.split_off(face_up).into_iter().collect();
    state.pools.monuments = monuments.into_iter().collect();

    let mut places = place_of_power_cards(registry);
    rng.shuffle(&mut places);
    places.truncate(config.place_of_power_count());
    state.pools.places_of_power = places
        .iter()
        .filter_map(|faces| rng.choose(faces).copied())
        .collect();

    state.pools.magic_items = registry.ids_of_type(CardType::MagicItem).into_iter().collect();
    state.pools.scrolls = registry.ids_of_type(CardType::Scroll).into_iter().collect();

    let mut draft = DraftState::new(seats);
    let mut mages = registry.ids_of_type(CardType::Mage);
    rng.shuffle(&mut mages);
    for seat in PlayerId::all(seats) {
        let start = seat.index() * config.mage_options;
        draft.mage_options[seat] =
            mages.iter().skip(start).take(config.mage_options).copied().collect();
    }

    state.phase = Phase::DraftingRound1;
    state.sub = PhaseState::Draft(draft);
    deal_round(state, config);
    info!("match dealt for {} seats, {} has the first-player token", seats, first);
}

fn deal_round(state: &mut MatchState, config: &MatchConfig) {
    let seats = state.player_count();
    let mut hands = Vec::with_capacity(seats);
    for _ in 0..seats {
        let size = config.draft_hand_size.min(state.pools.artifact_supply.len());
        hands.push(state.pools.artifact_supply.slice(..size));
    }
    if let Some(draft) = state.draft_mut() {
        for (seat, hand) in PlayerId::all(seats).zip(hands) {
            draft.candidates[seat] = hand;
        }
    }
}

fn draft_state<'a>(
    state: &'a mut MatchState,
    command: &'static str,
) -> Result<&'a mut DraftState, RulesError> {
    let phase = state.phase;
    state.draft_mut().ok_or(RulesError::phase(phase, command))
}

/// Pick one candidate.
pub(crate) fn pick(
    state: &mut MatchState,
    config: &MatchConfig,
    seat: PlayerId,
    card: CardId,
) -> Result<(), RulesError> {
    const COMMAND: &str = "draft_pick";
    let phase = state.phase;
    if !matches!(phase, Phase::DraftingRound1 | Phase::DraftingRound2) {
        return Err(RulesError::phase(phase, COMMAND));
    }
    let seats = state.player_count();
    let draft = draft_state(state, COMMAND)?;

    let largest = draft.candidates.values().map(Vector::len).max().unwrap_or(0);
    if draft.candidates[seat].len() < largest {
        let waiting_on = PlayerId::all(seats).find(|s| draft.candidates[*s].len() == largest);
        return Err(RulesError::NotYourTurn { seat, waiting_on });
    }
    let index = draft.candidates[seat]
        .iter()
        .position(|c| *c == card)
        .ok_or(RulesError::UnknownCard(card))?;
    draft.candidates[seat].remove(index);
    draft.drafted[seat].push_back(card);
    debug!("{} drafted {}", seat, card);

    let remaining = draft.candidates[seat].len();
    if draft.candidates.values().any(|c| c.len() != remaining) {
        return Ok(());
    }
    if remaining > 0 {
        let before: Vec<Vector<CardId>> = draft.candidates.values().cloned().collect();
        for receiver in PlayerId::all(seats) {
            let giver = if phase == Phase::DraftingRound1 {
                receiver.prev(seats)
            } else {
                receiver.next(seats)
            };
            draft.candidates[receiver] = before[giver.index()].clone();
        }
        return Ok(());
    }

    if phase == Phase::DraftingRound1 {
        state.phase = Phase::DraftingRound2;
        deal_round(state, config);
        info!("first draft round complete");
    } else {
        state.phase = Phase::MageSelection;
        info!("draft complete, selecting mages");
    }
    Ok(())
}

/// Choose (or change) a mage. The last seat to choose reveals them all.
pub(crate) fn select_mage(
    state: &mut MatchState,
    seat: PlayerId,
    card: CardId,
) -> Result<(), RulesError> {
    const COMMAND: &str = "select_mage";
    if state.phase != Phase::MageSelection {
        return Err(RulesError::phase(state.phase, COMMAND));
    }
    let draft = draft_state(state, COMMAND)?;
    if !draft.mage_options[seat].contains(&card) {
        return Err(RulesError::UnknownCard(card));
    }
    draft.selected_mage[seat] = Some(card);
    debug!("{} chose a mage", seat);

    let chosen: Option<Vec<(PlayerId, CardId)>> = draft
        .selected_mage
        .iter()
        .map(|(s, mage)| mage.map(|m| (s, m)))
        .collect();
    let Some(chosen) = chosen else {
        return Ok(());
    };

    for (owner, mage) in chosen {
        let entering = state.enter_play(mage);
        state.player_mut(owner)?.mage = Some(entering);
    }
    let last = state.first_player().prev(state.player_count());
    if let Some(draft) = state.draft_mut() {
        draft.item_selector = Some(last);
    }
    state.phase = Phase::MagicItemSelection;
    info!("mages revealed, {} picks a magic item first", last);
    Ok(())
}

/// Take a magic item from the pool. The first player picks last.
pub(crate) fn select_magic_item(
    state: &mut MatchState,
    config: &MatchConfig,
    rng: &mut GameRng,
    seat: PlayerId,
    card: CardId,
) -> Result<(), RulesError> {
    const COMMAND: &str = "select_magic_item";
    if state.phase != Phase::MagicItemSelection {
        return Err(RulesError::phase(state.phase, COMMAND));
    }
    let selector = draft_state(state, COMMAND)?.item_selector;
    if selector != Some(seat) {
        return Err(RulesError::NotYourTurn {
            seat,
            waiting_on: selector,
        });
    }
    let index = state
        .pools
        .magic_items
        .iter()
        .position(|c| *c == card)
        .ok_or(RulesError::UnknownCard(card))?;
    state.pools.magic_items.remove(index);
    let entering = state.enter_play(card);
    state.player_mut(seat)?.magic_item = Some(entering);
    debug!("{} took magic item {}", seat, card);

    if seat != state.first_player() {
        let next = seat.prev(state.player_count());
        if let Some(draft) = state.draft_mut() {
            draft.item_selector = Some(next);
        }
        return Ok(());
    }

    deal_starting_cards(state, config, rng);
    income::begin_round(state);
    Ok(())
}

/// Shuffle each seat's drafted cards into hand and deck.
fn deal_starting_cards(state: &mut MatchState, config: &MatchConfig, rng: &mut GameRng) {
    let Some(draft) = state.draft() else {
        return;
    };
    let drafted: Vec<(PlayerId, Vec<CardId>)> = draft
        .drafted
        .iter()
        .map(|(seat, cards)| (seat, cards.iter().copied().collect()))
        .collect();

    for (seat, mut cards) in drafted {
        rng.shuffle(&mut cards);
        let hand_size = config.starting_hand_size.min(cards.len());
        let deck = cards.split_off(hand_size);
        let player = &mut state.players[seat];
        player.hand = cards.into_iter().collect();
        player.deck = deck.into_iter().collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::base_set;

    fn dealt(seats: usize) -> (MatchState, CardRegistry, MatchConfig, GameRng) {
        let registry = base_set();
        let config = MatchConfig::new(seats).with_seed(11);
        let mut rng = GameRng::new(config.seed);
        let mut state = MatchState::new(seats);
        setup(&mut state, &registry, &config, &mut rng);
        (state, registry, config, rng)
    }

    #[test]
    fn test_setup_counts() {
        let (state, registry, config, _) = dealt(3);

        assert_eq!(state.phase, Phase::DraftingRound1);
        assert_eq!(state.pools.monuments.len(), 2);
        assert_eq!(state.pools.monument_deck.len(), 8);
        assert_eq!(state.pools.places_of_power.len(), 5);
        assert_eq!(state.pools.magic_items.len(), registry.ids_of_type(CardType::MagicItem).len());
        assert_eq!(state.players.values().filter(|p| p.has_first_player_token).count(), 1);

        let draft = state.draft().unwrap();
        for seat in PlayerId::all(3) {
            assert_eq!(draft.candidates[seat].len(), config.draft_hand_size);
            assert_eq!(draft.mage_options[seat].len(), 2);
        }
    }

    #[test]
    fn test_places_of_power_show_one_face() {
        let (state, registry, _, _) = dealt(4);
        for id in &state.pools.places_of_power {
            if let Some(other) = registry.get(*id).unwrap().paired_with {
                assert!(!state.pools.places_of_power.contains(&other));
            }
        }
    }

    #[test]
    fn test_monuments_capped_at_supply() {
        let registry = base_set();
        let config = MatchConfig::new(4);
        assert!(config.monument_count() > registry.ids_of_type(CardType::Monument).len());
        check_supply(&registry, &config).unwrap();

        let (state, _, _, _) = dealt(4);
        assert_eq!(state.pools.monuments.len(), 2);
        assert_eq!(state.pools.monument_deck.len(), 8);
    }

    #[test]
    fn test_check_supply_reports_shortfall() {
        let registry = CardRegistry::new();
        let err = check_supply(&registry, &MatchConfig::new(2)).unwrap_err();
        assert!(matches!(err, ConfigError::NotEnoughCards { card_type: CardType::Artifact, .. }));
    }

    #[test]
    fn test_second_pick_waits_for_rotation() {
        let (mut state, _, config, _) = dealt(2);
        let first = state.draft().unwrap().candidates[PlayerId::new(0)][0];
        let second = state.draft().unwrap().candidates[PlayerId::new(0)][1];

        pick(&mut state, &config, PlayerId::new(0), first).unwrap();
        let err = pick(&mut state, &config, PlayerId::new(0), second).unwrap_err();
        assert_eq!(
            err,
            RulesError::NotYourTurn {
                seat: PlayerId::new(0),
                waiting_on: Some(PlayerId::new(1))
            }
        );
    }

    #[test]
    fn test_round_one_rotates_clockwise() {
        let (mut state, _, config, _) = dealt(3);
        let before: Vec<Vector<CardId>> =
            state.draft().unwrap().candidates.values().cloned().collect();

        for seat in PlayerId::all(3) {
            let card = before[seat.index()][0];
            pick(&mut state, &config, seat, card).unwrap();
        }

        let after = &state.draft().unwrap().candidates;
        // Seat 1 now holds what seat 0 passed.
        assert_eq!(after[PlayerId::new(1)], before[0].clone().split_off(1));
        assert_eq!(after[PlayerId::new(0)], before[2].clone().split_off(1));
    }
}
