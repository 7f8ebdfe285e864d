//! Action phase tests: playing cards, buying, discarding and abilities.
//!
//! Matches are resumed from hand-built Action phase states.

use std::sync::Arc;

use arcana_rules::cards::{base_set, CardId, CardRegistry};
use arcana_rules::core::ResourceType::{Blue, Gold, Green, Red};
use arcana_rules::core::{
    ActionState, GameRng, MatchConfig, MatchState, Phase, PhaseState, PlayerId, ResourceBag,
    RulesError,
};
use arcana_rules::effects::{AbilityChoices, Choice, DecisionRequest, DecisionStep};
use arcana_rules::rules::{Match, MonumentSource};

fn seat(n: u8) -> PlayerId {
    PlayerId::new(n)
}

struct Table {
    registry: Arc<CardRegistry>,
    state: MatchState,
}

impl Table {
    /// Round one's Action phase; seat 0 holds the token and acts first.
    fn new(seats: usize) -> Self {
        let mut state = MatchState::new(seats);
        state.players[seat(0)].has_first_player_token = true;
        state.round = 1;
        state.phase = Phase::Action;
        state.sub = PhaseState::Action(ActionState::new(seats, seat(0)));
        Self {
            registry: Arc::new(base_set()),
            state,
        }
    }

    fn id(&self, name: &str) -> CardId {
        self.registry.id_of(name).unwrap()
    }

    fn give(&mut self, to: u8, name: &str) -> CardId {
        let id = self.id(name);
        let card = self.state.enter_play(id);
        self.state.players[seat(to)].artifacts.push_back(card);
        id
    }

    fn hand(&mut self, to: u8, name: &str) -> CardId {
        let id = self.id(name);
        self.state.players[seat(to)].hand.push_back(id);
        id
    }

    fn pool(&mut self, to: u8, resources: ResourceBag) {
        self.state.players[seat(to)].resources = resources;
    }

    fn start(self) -> Match {
        let seats = self.state.player_count();
        Match::builder(MatchConfig::new(seats))
            .registry(self.registry)
            .resume(self.state, GameRng::new(0).state())
            .build()
            .unwrap()
    }
}

fn active(game: &Match) -> PlayerId {
    game.state().action().unwrap().active
}

/// Seat 0 plays a {red:1} card holding {red:1, gold:3}.
#[test]
fn test_play_card_scenario() {
    let mut table = Table::new(2);
    let pickaxe = table.hand(0, "Dwarven Pickaxe");
    table.pool(0, ResourceBag::new().with(Red, 1).with(Gold, 3));
    let mut game = table.start();

    game.play_card(seat(0), pickaxe, None, AbilityChoices::new()).unwrap();

    let player = &game.state().players[seat(0)];
    assert_eq!(player.resources.get(Red), 0);
    assert_eq!(player.resources.get(Gold), 3);
    assert!(player.hand.is_empty());
    assert_eq!(player.artifacts.len(), 1);
    assert_eq!(player.artifacts[0].card, pickaxe);
    assert_eq!(active(&game), seat(1));
}

/// An unaffordable card is rejected and nothing changes.
#[test]
fn test_unaffordable_card_changes_nothing() {
    let mut table = Table::new(2);
    let serpent = table.hand(0, "Sea Serpent");
    table.pool(0, ResourceBag::of(Blue, 3));
    let mut game = table.start();
    let before = game.state().clone();

    assert!(matches!(
        game.play_card(seat(0), serpent, None, AbilityChoices::new()),
        Err(RulesError::InsufficientResources { .. })
    ));
    assert_eq!(game.state(), &before);
}

/// Cards not in hand, and non-artifacts, cannot be played.
#[test]
fn test_play_card_targets() {
    let mut table = Table::new(2);
    let pickaxe = table.id("Dwarven Pickaxe");
    let colossus = table.hand(0, "Colossus");
    table.pool(0, ResourceBag::of(Gold, 9));
    let mut game = table.start();

    assert_eq!(
        game.play_card(seat(0), pickaxe, None, AbilityChoices::new()),
        Err(RulesError::UnknownCard(pickaxe))
    );
    assert!(matches!(
        game.play_card(seat(0), colossus, None, AbilityChoices::new()),
        Err(RulesError::InvalidTarget(_))
    ));
}

/// Wildcard slots are a decision unless the pool leaves only one way to pay.
#[test]
fn test_wildcard_payment() {
    let mut table = Table::new(2);
    let tree = table.hand(0, "Tree of Life");
    table.pool(0, ResourceBag::new().with(Green, 2).with(Red, 1).with(Blue, 1));
    let mut game = table.start();

    let err = game.play_card(seat(0), tree, None, AbilityChoices::new()).unwrap_err();
    let decision = err.decision().unwrap();
    assert_eq!(decision.step, DecisionStep::Payment);
    match &decision.request {
        DecisionRequest::Resources { options } => {
            assert_eq!(options.len(), 2);
            assert!(options.contains(&ResourceBag::of(Red, 1)));
            assert!(options.contains(&ResourceBag::of(Blue, 1)));
        }
        other => panic!("unexpected request {:?}", other),
    }

    game.play_card(seat(0), tree, Some(ResourceBag::of(Blue, 1)), AbilityChoices::new())
        .unwrap();
    assert_eq!(game.state().players[seat(0)].resources, ResourceBag::of(Red, 1));
}

/// Passive reductions lower the fixed price of matching cards.
#[test]
fn test_cost_reduction() {
    let mut table = Table::new(2);
    table.give(0, "Dragon Bridle");
    let dragon = table.hand(0, "Fire Dragon");
    table.pool(0, ResourceBag::of(Red, 3));
    let mut game = table.start();

    game.play_card(seat(0), dragon, None, AbilityChoices::new()).unwrap();
    assert!(game.state().players[seat(0)].resources.is_empty());
}

/// Costs and effects apply together and tap the card; a tapped card's
/// ability cannot be used again.
#[test]
fn test_use_ability_taps() {
    let mut table = Table::new(2);
    let pickaxe = table.give(0, "Dwarven Pickaxe");
    table.pool(0, ResourceBag::of(Red, 2));
    let mut game = table.start();

    game.use_ability(seat(0), pickaxe, 0, AbilityChoices::new()).unwrap();
    let player = &game.state().players[seat(0)];
    assert_eq!(player.resources, ResourceBag::new().with(Red, 1).with(Gold, 1));
    assert!(player.find_controlled(pickaxe).unwrap().tapped);

    let pass_item = game.registry().id_of("Research").unwrap();
    let mut state = game.state().clone();
    state.pools.magic_items.push_back(pass_item);
    let mut game = Match::builder(MatchConfig::new(2))
        .resume(state, game.rng_state())
        .build()
        .unwrap();
    game.pass(seat(1), pass_item).unwrap();
    let before = game.state().clone();

    assert!(game.use_ability(seat(0), pickaxe, 0, AbilityChoices::new()).is_err());
    assert_eq!(game.state(), &before);
}

/// Ability indexes must exist.
#[test]
fn test_unknown_ability() {
    let mut table = Table::new(2);
    let pickaxe = table.give(0, "Dwarven Pickaxe");
    let mut game = table.start();

    assert_eq!(
        game.use_ability(seat(0), pickaxe, 3, AbilityChoices::new()),
        Err(RulesError::UnknownAbility { card: pickaxe, index: 3 })
    );
}

/// Drawing from an empty deck is a no-op, never an error.
#[test]
fn test_draw_from_empty_deck() {
    let mut table = Table::new(2);
    let research = table.id("Research");
    let item = table.state.enter_play(research);
    table.state.players[seat(0)].magic_item = Some(item);
    let mut game = table.start();

    game.use_ability(seat(0), research, 0, AbilityChoices::new()).unwrap();
    let player = &game.state().players[seat(0)];
    assert!(player.hand.is_empty());
    assert!(player.deck.is_empty());
}

/// On-play effects run when the card enters play.
#[test]
fn test_on_play_draws() {
    let mut table = Table::new(2);
    let serpent = table.hand(0, "Sea Serpent");
    let top = table.id("Hawk");
    table.state.players[seat(0)].deck.push_back(top);
    table.pool(0, ResourceBag::of(Blue, 4));
    let mut game = table.start();

    game.play_card(seat(0), serpent, None, AbilityChoices::new()).unwrap();
    let player = &game.state().players[seat(0)];
    assert_eq!(player.hand.iter().copied().collect::<Vec<_>>(), vec![top]);
}

/// A discard cost with more than one candidate asks which card.
#[test]
fn test_discard_cost() {
    let mut table = Table::new(2);
    let stone = table.give(0, "Philosopher's Stone");
    let keep = table.hand(0, "Hawk");
    let toss = table.hand(0, "Nightingale");
    let mut game = table.start();

    let err = game.use_ability(seat(0), stone, 0, AbilityChoices::new()).unwrap_err();
    assert_eq!(err.decision().unwrap().step, DecisionStep::Cost(1));

    let choices = AbilityChoices::new().with_cost(1, Choice::Cards(vec![toss]));
    game.use_ability(seat(0), stone, 0, choices).unwrap();
    let player = &game.state().players[seat(0)];
    assert_eq!(player.resources, ResourceBag::of(Gold, 2));
    assert_eq!(player.hand.iter().copied().collect::<Vec<_>>(), vec![keep]);
    assert_eq!(player.discard.iter().copied().collect::<Vec<_>>(), vec![toss]);
}

/// Destroying an egg plays a dragon from hand at a discount.
#[test]
fn test_dragon_egg_plays_a_dragon() {
    let mut table = Table::new(2);
    let egg = table.give(0, "Dragon Egg");
    let dragon = table.hand(0, "Fire Dragon");
    table.pool(0, ResourceBag::of(Red, 2));
    let mut game = table.start();

    let play = Choice::PlayCard {
        card: dragon,
        payment: None,
    };
    let choices = AbilityChoices::new().with_effect(0, play);
    game.use_ability(seat(0), egg, 0, choices).unwrap();

    let player = &game.state().players[seat(0)];
    assert!(player.resources.is_empty());
    assert!(player.find_controlled(egg).is_none());
    assert!(player.find_controlled(dragon).is_some());
    assert_eq!(player.discard.iter().copied().collect::<Vec<_>>(), vec![egg]);
}

/// Discarding pays the configured reward.
#[test]
fn test_discard_for_resources() {
    let mut table = Table::new(2);
    let card = table.hand(0, "Hawk");
    let mut game = table.start();

    assert!(matches!(
        game.discard_for_resources(seat(0), card, ResourceBag::of(Gold, 2)),
        Err(RulesError::InvalidChoice(_))
    ));
    game.discard_for_resources(seat(0), card, ResourceBag::of(Gold, 1)).unwrap();
    assert_eq!(game.state().players[seat(0)].resources, ResourceBag::of(Gold, 1));
}

/// Places of power and monuments are bought from the shared pools.
#[test]
fn test_buy_place_of_power_and_monument() {
    let mut table = Table::new(2);
    let castle = table.id("Coral Castle");
    let colossus = table.id("Colossus");
    let temple = table.id("Temple");
    table.state.pools.places_of_power.push_back(castle);
    table.state.pools.monuments.push_back(colossus);
    table.state.pools.monument_deck.push_back(temple);
    table.pool(0, ResourceBag::new().with(Blue, 3).with(Green, 3));
    table.pool(1, ResourceBag::of(Gold, 4));
    let mut game = table.start();

    game.buy_place_of_power(seat(0), castle, None).unwrap();
    assert!(game.state().pools.places_of_power.is_empty());
    assert_eq!(game.state().players[seat(0)].places_of_power[0].card, castle);

    game.buy_monument(seat(1), MonumentSource::FaceUp(colossus), None).unwrap();
    assert_eq!(game.state().pools.monuments.iter().copied().collect::<Vec<_>>(), vec![temple]);
    assert_eq!(game.current_standings().entries[0].seat, seat(0));
}

/// Only the active seat acts, and a passed seat sits out the round.
#[test]
fn test_turn_order_and_pass() {
    let mut table = Table::new(3);
    let items: Vec<CardId> =
        ["Research", "Divination", "Alchemy"].iter().map(|n| table.id(n)).collect();
    table.state.pools.magic_items = items.iter().copied().collect();
    let card = table.hand(1, "Hawk");
    let mut game = table.start();

    assert_eq!(
        game.discard_for_resources(seat(1), card, ResourceBag::of(Gold, 1)),
        Err(RulesError::NotYourTurn {
            seat: seat(1),
            waiting_on: Some(seat(0)),
        })
    );

    game.pass(seat(0), items[0]).unwrap();
    assert_eq!(active(&game), seat(1));
    game.discard_for_resources(seat(1), card, ResourceBag::of(Gold, 1)).unwrap();
    assert_eq!(active(&game), seat(2));
    game.pass(seat(2), items[1]).unwrap();
    // Seat 0 passed, so seat 1 goes again.
    assert_eq!(active(&game), seat(1));
    assert_eq!(game.pass(seat(0), items[2]), Err(RulesError::AlreadyPassed(seat(0))));

    game.pass(seat(1), items[2]).unwrap();
    assert_eq!(game.state().phase, Phase::Income);
    assert_eq!(game.state().round, 2);
    assert!(game.state().players[seat(0)].has_first_player_token);
}

/// Tapping another card as a cost needs an untapped card that fits; with
/// two candidates the seat picks one.
#[test]
fn test_tap_card_cost() {
    let mut table = Table::new(2);
    let king = table.give(0, "Cursed Dwarven King");
    let mut game = table.start();
    let before = game.state().clone();

    assert!(matches!(
        game.use_ability(seat(0), king, 1, AbilityChoices::new()),
        Err(RulesError::UnpayableCost(_))
    ));
    assert_eq!(game.state(), &before);

    let mut table = Table::new(2);
    let king = table.give(0, "Cursed Dwarven King");
    let fire = table.give(0, "Fire Dragon");
    let bone = table.give(0, "Bone Dragon");
    let mut game = table.start();

    let err = game.use_ability(seat(0), king, 1, AbilityChoices::new()).unwrap_err();
    let decision = err.decision().unwrap();
    assert_eq!(decision.step, DecisionStep::Cost(1));
    match &decision.request {
        DecisionRequest::Card { options } => {
            assert_eq!(options.len(), 2);
            assert!(options.contains(&fire));
            assert!(options.contains(&bone));
        }
        other => panic!("unexpected request {:?}", other),
    }

    let choices = AbilityChoices::new().with_cost(1, Choice::Card(bone));
    game.use_ability(seat(0), king, 1, choices).unwrap();
    let player = &game.state().players[seat(0)];
    assert_eq!(player.resources, ResourceBag::of(Gold, 1));
    assert!(player.find_controlled(king).unwrap().tapped);
    assert!(player.find_controlled(bone).unwrap().tapped);
    assert!(!player.find_controlled(fire).unwrap().tapped);
}

/// Untapping another artifact leaves the source tapped.
#[test]
fn test_untap_another_artifact() {
    let mut table = Table::new(2);
    let windup = table.give(0, "Windup Man");
    let pickaxe = table.give(0, "Dwarven Pickaxe");
    table.state.players[seat(0)].find_controlled_mut(pickaxe).unwrap().tapped = true;
    let mut game = table.start();

    game.use_ability(seat(0), windup, 0, AbilityChoices::new()).unwrap();

    let player = &game.state().players[seat(0)];
    assert!(!player.find_controlled(pickaxe).unwrap().tapped);
    assert!(player.find_controlled(windup).unwrap().tapped);
    assert_eq!(active(&game), seat(1));
}

/// Gains that scale with the number of opponents, from an artifact and from
/// a mage.
#[test]
fn test_gain_per_opponent() {
    let mut table = Table::new(3);
    let horn = table.give(0, "Horn of Plenty");
    let seer = table.id("Seer");
    let mage = table.state.enter_play(seer);
    table.state.players[seat(1)].mage = Some(mage);
    let mut game = table.start();

    game.use_ability(seat(0), horn, 0, AbilityChoices::new()).unwrap();
    game.use_ability(seat(1), seer, 0, AbilityChoices::new()).unwrap();

    assert_eq!(game.state().players[seat(0)].resources, ResourceBag::of(Green, 2));
    assert_eq!(game.state().players[seat(1)].resources, ResourceBag::of(Blue, 2));
    assert!(game.state().players[seat(1)].find_controlled(seer).unwrap().tapped);
    assert_eq!(active(&game), seat(2));
}

/// Every opponent receives the gift; the user keeps its own gain.
#[test]
fn test_give_opponents() {
    let mut table = Table::new(3);
    let mermaid = table.give(0, "Mermaid");
    table.pool(2, ResourceBag::of(Red, 1));
    let mut game = table.start();

    game.use_ability(seat(0), mermaid, 0, AbilityChoices::new()).unwrap();

    let players = &game.state().players;
    assert_eq!(players[seat(0)].resources, ResourceBag::of(Blue, 2));
    assert_eq!(players[seat(1)].resources, ResourceBag::of(Blue, 1));
    assert_eq!(players[seat(2)].resources, ResourceBag::new().with(Red, 1).with(Blue, 1));
}

/// Drawing two then discarding one waits on the owner's pick.
#[test]
fn test_draw_then_discard() {
    let mut table = Table::new(2);
    let basin = table.give(0, "Hypnotic Basin");
    let deck: Vec<CardId> =
        ["Hawk", "Nightingale", "Crypt"].iter().map(|name| table.id(name)).collect();
    table.state.players[seat(0)].deck = deck.iter().copied().collect();
    let mut game = table.start();

    game.use_ability(seat(0), basin, 0, AbilityChoices::new()).unwrap();
    assert_eq!(active(&game), seat(0));
    let decision = game.pending_decisions().remove(0);
    assert_eq!(decision.seat, seat(0));
    match &decision.request {
        DecisionRequest::Cards { options } => {
            assert_eq!(options, &vec![vec![deck[0]], vec![deck[1]]]);
        }
        other => panic!("unexpected request {:?}", other),
    }

    assert!(matches!(
        game.respond_to_decision(seat(0), Choice::Cards(vec![deck[2]])),
        Err(RulesError::InvalidChoice(_))
    ));
    game.respond_to_decision(seat(0), Choice::Cards(vec![deck[0]])).unwrap();

    let player = &game.state().players[seat(0)];
    assert_eq!(player.hand.iter().copied().collect::<Vec<_>>(), vec![deck[1]]);
    assert_eq!(player.discard.iter().copied().collect::<Vec<_>>(), vec![deck[0]]);
    assert_eq!(player.deck.iter().copied().collect::<Vec<_>>(), vec![deck[2]]);
    assert!(player.find_controlled(basin).unwrap().tapped);
    assert_eq!(active(&game), seat(1));
}

/// With a single card in hand after drawing there is nothing to decide.
#[test]
fn test_draw_then_discard_short_deck() {
    let mut table = Table::new(2);
    let basin = table.give(0, "Hypnotic Basin");
    let hawk = table.id("Hawk");
    table.state.players[seat(0)].deck.push_back(hawk);
    let mut game = table.start();

    game.use_ability(seat(0), basin, 0, AbilityChoices::new()).unwrap();

    let player = &game.state().players[seat(0)];
    assert!(player.hand.is_empty());
    assert_eq!(player.discard.iter().copied().collect::<Vec<_>>(), vec![hawk]);
    assert!(game.pending_decisions().is_empty());
    assert_eq!(active(&game), seat(1));
}
