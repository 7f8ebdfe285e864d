//! Attacks, reaction windows and reveals driven through `Match`.

use std::sync::Arc;

use arcana_rules::cards::{base_set, CardId, CardRegistry};
use arcana_rules::core::ResourceType::{Black, Gold, Green, Red};
use arcana_rules::core::{
    ActionState, GameRng, MatchConfig, MatchState, Phase, PhaseState, PlayerId, ResourceBag,
    RulesError,
};
use arcana_rules::effects::{
    AbilityChoices, AttackOption, AttackResponse, Choice, DecisionRequest, DecisionStep,
    ReactionOption, ReactionResponse,
};
use arcana_rules::rules::Match;

fn seat(n: u8) -> PlayerId {
    PlayerId::new(n)
}

struct Table {
    registry: Arc<CardRegistry>,
    state: MatchState,
}

impl Table {
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

    fn mage(&mut self, to: u8, name: &str) -> CardId {
        let id = self.id(name);
        let card = self.state.enter_play(id);
        self.state.players[seat(to)].mage = Some(card);
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

fn stack_depth(game: &Match) -> usize {
    game.state().action().unwrap().stack.len()
}

fn attack_options(game: &Match, defender: PlayerId) -> Vec<AttackOption> {
    game.pending_decisions()
        .into_iter()
        .find(|d| d.seat == defender)
        .map(|d| match d.request {
            DecisionRequest::AttackResponse { options, .. } => options,
            other => panic!("unexpected request {:?}", other),
        })
        .unwrap()
}

/// Paying the negation cost spares the defender.
#[test]
fn test_pay_negation() {
    let mut table = Table::new(2);
    let duelist = table.mage(0, "Duelist");
    table.pool(0, ResourceBag::of(Red, 1));
    table.pool(1, ResourceBag::new().with(Red, 1).with(Gold, 2));
    let mut game = table.start();

    game.use_ability(seat(0), duelist, 0, AbilityChoices::new()).unwrap();
    assert_eq!(
        attack_options(&game, seat(1)),
        vec![AttackOption::PayNegation(ResourceBag::of(Red, 1)), AttackOption::Take]
    );

    game.respond_to_attack(seat(1), AttackResponse::PayNegation).unwrap();
    assert_eq!(game.state().players[seat(1)].resources, ResourceBag::of(Gold, 2));
    assert_eq!(stack_depth(&game), 0);
    assert_eq!(game.state().action().unwrap().active, seat(1));
}

/// A defender without the negation cost cannot pay it.
#[test]
fn test_negation_needs_resources() {
    let mut table = Table::new(2);
    let duelist = table.mage(0, "Duelist");
    table.pool(0, ResourceBag::of(Red, 1));
    table.pool(1, ResourceBag::of(Gold, 2));
    let mut game = table.start();
    game.use_ability(seat(0), duelist, 0, AbilityChoices::new()).unwrap();
    assert_eq!(attack_options(&game, seat(1)), vec![AttackOption::Take]);
    let before = game.state().clone();

    assert!(matches!(
        game.respond_to_attack(seat(1), AttackResponse::PayNegation),
        Err(RulesError::InsufficientResources { .. })
    ));
    assert_eq!(game.state(), &before);
}

/// Taking a resource attack loses what the defender has, never more.
#[test]
fn test_take_loses_resources_clamped() {
    let mut table = Table::new(2);
    let dragon = table.give(0, "Fire Dragon");
    table.pool(0, ResourceBag::of(Red, 2));
    table.pool(1, ResourceBag::new().with(Gold, 1).with(Green, 2));
    let mut game = table.start();

    game.use_ability(seat(0), dragon, 0, AbilityChoices::new()).unwrap();
    game.respond_to_attack(seat(1), AttackResponse::Take { artifact: None }).unwrap();

    assert_eq!(game.state().players[seat(1)].resources, ResourceBag::of(Green, 2));
}

/// An incoming-attack reaction pays its own costs, negates the attack and
/// runs its effects.
#[test]
fn test_reaction_negates_attack() {
    let mut table = Table::new(2);
    let bow = table.give(0, "Elvish Bow");
    let healer = table.mage(1, "Healer");
    table.pool(1, ResourceBag::of(Green, 1));
    let mut game = table.start();

    game.use_ability(seat(0), bow, 1, AbilityChoices::new()).unwrap();
    let react = AttackOption::React {
        card: healer,
        ability: 0,
    };
    assert!(attack_options(&game, seat(1)).contains(&react));

    let response = AttackResponse::React {
        card: healer,
        ability: 0,
        choices: AbilityChoices::new(),
    };
    game.respond_to_attack(seat(1), response).unwrap();

    let defender = &game.state().players[seat(1)];
    assert_eq!(defender.resources, ResourceBag::of(Green, 2));
    assert!(defender.mage.as_ref().unwrap().tapped);
}

/// A tapped reaction card cannot be used, and the failed answer leaves the
/// attack waiting.
#[test]
fn test_tapped_reaction_is_rejected() {
    let mut table = Table::new(2);
    let bow = table.give(0, "Elvish Bow");
    let dog = table.id("Guard Dog");
    let tapped = table.state.enter_play(dog).tapped();
    table.state.players[seat(1)].artifacts.push_back(tapped);
    let mut game = table.start();

    game.use_ability(seat(0), bow, 1, AbilityChoices::new()).unwrap();
    assert_eq!(attack_options(&game, seat(1)), vec![AttackOption::Take]);
    let before = game.state().clone();

    let response = AttackResponse::React {
        card: dog,
        ability: 0,
        choices: AbilityChoices::new(),
    };
    assert!(game.respond_to_attack(seat(1), response).is_err());
    assert_eq!(game.state(), &before);
    assert_eq!(game.pending_decisions()[0].seat, seat(1));
}

/// Only defenders still owing an answer may respond; nobody takes a turn
/// while the attack is open.
#[test]
fn test_attack_holds_the_table() {
    let mut table = Table::new(3);
    let bow = table.give(0, "Elvish Bow");
    let pickaxe = table.id("Dwarven Pickaxe");
    table.state.players[seat(0)].hand.push_back(pickaxe);
    table.pool(0, ResourceBag::of(Red, 1));
    let mut game = table.start();

    game.use_ability(seat(0), bow, 1, AbilityChoices::new()).unwrap();
    let waiting: Vec<PlayerId> = game.pending_decisions().iter().map(|d| d.seat).collect();
    assert_eq!(waiting, vec![seat(1), seat(2)]);

    assert_eq!(
        game.respond_to_attack(seat(0), AttackResponse::Take { artifact: None }),
        Err(RulesError::NotYourTurn {
            seat: seat(0),
            waiting_on: Some(seat(1)),
        })
    );
    assert_eq!(
        game.play_card(seat(0), pickaxe, None, AbilityChoices::new()),
        Err(RulesError::NotYourTurn {
            seat: seat(0),
            waiting_on: Some(seat(1)),
        })
    );

    game.respond_to_attack(seat(2), AttackResponse::Take { artifact: None }).unwrap();
    assert_eq!(
        game.respond_to_attack(seat(2), AttackResponse::Take { artifact: None }),
        Err(RulesError::NotYourTurn {
            seat: seat(2),
            waiting_on: Some(seat(1)),
        })
    );
    game.respond_to_attack(seat(1), AttackResponse::Take { artifact: None }).unwrap();

    assert_eq!(stack_depth(&game), 0);
    assert_eq!(game.state().action().unwrap().active, seat(1));
}

/// A destroy attack asks which artifact to lose, then opens a reaction
/// window for every seat that can answer the loss.
#[test]
fn test_destroy_attack_and_reaction_window() {
    let mut table = Table::new(2);
    let dragon = table.give(0, "Bone Dragon");
    let statuette = table.give(0, "Jeweled Statuette");
    let crypt = table.give(1, "Crypt");
    let hawk = table.give(1, "Hawk");
    table.pool(0, ResourceBag::of(Black, 1));
    let mut game = table.start();

    game.use_ability(seat(0), dragon, 0, AbilityChoices::new()).unwrap();
    let before = game.state().clone();

    let err = game
        .respond_to_attack(seat(1), AttackResponse::Take { artifact: None })
        .unwrap_err();
    let decision = err.decision().unwrap();
    assert_eq!(decision.step, DecisionStep::Attack);
    assert_eq!(decision.request, DecisionRequest::Card { options: vec![crypt, hawk] });
    assert_eq!(game.state(), &before);

    game.respond_to_attack(seat(1), AttackResponse::Take { artifact: Some(hawk) })
        .unwrap();
    let defender = &game.state().players[seat(1)];
    assert!(defender.find_controlled(hawk).is_none());
    assert_eq!(defender.discard.iter().copied().collect::<Vec<_>>(), vec![hawk]);

    let windows = game.pending_decisions();
    assert_eq!(windows.iter().map(|d| d.seat).collect::<Vec<_>>(), vec![seat(0), seat(1)]);
    assert_eq!(
        windows[0].request,
        DecisionRequest::Reaction {
            destroyed: hawk,
            owner: seat(1),
            options: vec![ReactionOption { card: statuette, ability: 0 }],
        }
    );

    let response = ReactionResponse::Use {
        card: crypt,
        ability: 0,
        choices: AbilityChoices::new(),
    };
    game.respond_to_reaction(seat(1), response).unwrap();
    assert_eq!(game.state().players[seat(1)].resources, ResourceBag::of(Black, 2));
    assert_eq!(game.state().action().unwrap().active, seat(0));

    game.respond_to_reaction(seat(0), ReactionResponse::Decline).unwrap();
    assert_eq!(stack_depth(&game), 0);
    assert_eq!(game.state().action().unwrap().active, seat(1));
}

/// A reaction the seat does not hold is not a legal answer.
#[test]
fn test_reaction_must_be_eligible() {
    let mut table = Table::new(2);
    let dragon = table.give(0, "Bone Dragon");
    table.give(0, "Jeweled Statuette");
    let crypt = table.give(1, "Crypt");
    table.pool(0, ResourceBag::of(Black, 1));
    let mut game = table.start();

    game.use_ability(seat(0), dragon, 0, AbilityChoices::new()).unwrap();
    game.respond_to_attack(seat(1), AttackResponse::Take { artifact: None })
        .unwrap();
    assert!(game.state().players[seat(1)].artifacts.is_empty());

    let response = ReactionResponse::Use {
        card: crypt,
        ability: 0,
        choices: AbilityChoices::new(),
    };
    assert!(matches!(
        game.respond_to_reaction(seat(0), response),
        Err(RulesError::InvalidChoice(_))
    ));
}

/// A reveal is answered by its owner with a deck order.
#[test]
fn test_reveal_reorders_the_deck() {
    let mut table = Table::new(2);
    let hawk = table.give(0, "Hawk");
    let deck: Vec<CardId> = ["Dwarven Pickaxe", "Crypt", "Vault", "Guard Dog"]
        .iter()
        .map(|name| table.id(name))
        .collect();
    table.state.players[seat(0)].deck = deck.iter().copied().collect();
    let mut game = table.start();

    game.use_ability(seat(0), hawk, 0, AbilityChoices::new()).unwrap();
    let decision = game.pending_decisions().remove(0);
    assert_eq!(decision.seat, seat(0));
    match &decision.request {
        DecisionRequest::Order { cards, .. } => assert_eq!(cards, &deck[..3]),
        other => panic!("unexpected request {:?}", other),
    }

    game.respond_to_decision(seat(0), Choice::Order(vec![2, 0, 1])).unwrap();
    let now: Vec<CardId> = game.state().players[seat(0)].deck.iter().copied().collect();
    assert_eq!(now, vec![deck[2], deck[0], deck[1], deck[3]]);
    assert_eq!(game.state().action().unwrap().active, seat(1));
}
