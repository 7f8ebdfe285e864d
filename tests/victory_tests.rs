//! Round end, scoring and the end of the match.

use std::sync::Arc;

use arcana_rules::cards::{base_set, CardId, CardRegistry};
use arcana_rules::core::ResourceType::Gold;
use arcana_rules::core::{
    ActionState, GameRng, MatchConfig, MatchState, Phase, PhaseState, PlayerId, ResourceBag,
    RulesError,
};
use arcana_rules::rules::{AnyOf, Match, PointThreshold, RoundLimit, VictoryCondition};

fn seat(n: u8) -> PlayerId {
    PlayerId::new(n)
}

/// Last Action phase turn of round one: seat 0 acts first and two magic
/// items are free to pass with.
struct Table {
    registry: Arc<CardRegistry>,
    state: MatchState,
    items: [CardId; 2],
}

impl Table {
    fn new() -> Self {
        let registry = Arc::new(base_set());
        let items = [
            registry.id_of("Research").unwrap(),
            registry.id_of("Divination").unwrap(),
        ];
        let mut state = MatchState::new(2);
        state.players[seat(0)].has_first_player_token = true;
        state.round = 1;
        state.phase = Phase::Action;
        state.sub = PhaseState::Action(ActionState::new(2, seat(0)));
        state.pools.magic_items = items.iter().copied().collect();
        Self { registry, state, items }
    }

    fn monument(&mut self, to: u8, name: &str) {
        let card = self.state.enter_play(self.registry.id_of(name).unwrap());
        self.state.players[seat(to)].monuments.push_back(card);
    }

    fn start(self, victory: impl VictoryCondition + 'static) -> (Match, [CardId; 2]) {
        let game = Match::builder(MatchConfig::new(2).with_seed(21))
            .registry(self.registry)
            .victory(victory)
            .resume(self.state, GameRng::new(0).state())
            .build()
            .unwrap();
        (game, self.items)
    }

    /// A match from a copy of the table, leaving the table reusable.
    fn clone_for(&self, victory: impl VictoryCondition + 'static) -> (Match, [CardId; 2]) {
        Table {
            registry: Arc::clone(&self.registry),
            state: self.state.clone(),
            items: self.items,
        }
        .start(victory)
    }
}

fn end_round(game: &mut Match, items: [CardId; 2]) {
    game.pass(seat(0), items[0]).unwrap();
    game.pass(seat(1), items[1]).unwrap();
}

/// The round limit ends the match at the end of the round and records the
/// standings.
#[test]
fn test_round_limit_ends_the_match() {
    let mut table = Table::new();
    table.monument(1, "Colossus");
    let (mut game, items) = table.start(RoundLimit(1));

    end_round(&mut game, items);

    assert!(game.is_over());
    assert_eq!(game.state().phase, Phase::GameOver);
    let standings = game.standings().unwrap();
    assert_eq!(standings.winners, vec![seat(1)]);
    assert_eq!(standings.entries[0].points, 2);
    // Seat 0 passed first and keeps the token.
    assert_eq!(standings.entries[1].points, 1);

    let view = game.seat_view(seat(0)).unwrap();
    assert_eq!(view.standings.as_ref(), Some(standings));
}

/// Below the threshold another round begins; reaching it ends the match.
#[test]
fn test_point_threshold() {
    let mut table = Table::new();
    table.monument(1, "Golden Statue");
    let (mut game, items) = table.clone_for(PointThreshold(4));
    end_round(&mut game, items);
    assert_eq!(game.state().phase, Phase::Income);
    assert_eq!(game.state().round, 2);
    assert!(game.standings().is_none());

    table.monument(1, "Colossus");
    let (mut game, items) = table.start(PointThreshold(4));
    end_round(&mut game, items);
    assert!(game.is_over());
    assert_eq!(game.standings().unwrap().winners, vec![seat(1)]);
}

/// An unbroken tie is shared.
#[test]
fn test_tie_is_shared() {
    let mut table = Table::new();
    table.monument(0, "Colossus");
    table.monument(1, "Golden Statue");
    let (mut game, items) = table.start(RoundLimit(1));

    end_round(&mut game, items);

    let standings = game.standings().unwrap();
    assert_eq!(standings.entries[0].points, 3);
    assert_eq!(standings.entries[1].points, 3);
    assert_eq!(standings.winners, vec![seat(0), seat(1)]);
}

/// Resources break ties.
#[test]
fn test_resources_break_ties() {
    let mut table = Table::new();
    table.monument(0, "Colossus");
    table.monument(1, "Golden Statue");
    table.state.players[seat(1)].resources = ResourceBag::of(Gold, 1);
    let (mut game, items) = table.start(AnyOf::new().or(PointThreshold(20)).or(RoundLimit(1)));

    end_round(&mut game, items);

    assert_eq!(game.standings().unwrap().winners, vec![seat(1)]);
}

/// After the match ends only a new match may be started.
#[test]
fn test_commands_after_game_over() {
    let (mut game, items) = Table::new().start(RoundLimit(1));
    end_round(&mut game, items);
    assert!(game.is_over());

    assert_eq!(game.pass(seat(0), items[0]), Err(RulesError::GameOver));
    assert_eq!(game.income_finalize(seat(1)), Err(RulesError::GameOver));
    assert_eq!(game.start_new_match(seat(5), None), Err(RulesError::UnknownSeat(seat(5))));

    let view = game.start_new_match(seat(1), Some(99)).unwrap();
    assert_eq!(view.phase, Phase::DraftingRound1);
    assert!(!game.is_over());
    assert_eq!(game.config().seed, 99);
    assert_eq!(game.state(), Match::new(MatchConfig::new(2).with_seed(99)).unwrap().state());
}

/// Without a seed a new match uses the previous seed plus one.
#[test]
fn test_new_match_seed_advances() {
    let (mut game, items) = Table::new().start(RoundLimit(1));
    end_round(&mut game, items);

    game.start_new_match(seat(0), None).unwrap();
    assert_eq!(game.config().seed, 22);
}
