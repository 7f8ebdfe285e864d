//! Scoring and end-of-match conditions.
//!
//! Points come from artifacts, monuments and places of power, plus the
//! first-player token. Ties are broken by the value of each seat's pool;
//! a tie that survives is shared.
//!
//! The end of a match is decided by an injected `VictoryCondition`,
//! evaluated once at the end of every round.

use std::fmt;

use crate::cards::CardRegistry;
use crate::core::{MatchConfig, MatchState, Player, Standing, Standings};

/// Decides, at round end, whether the match is over.
pub trait VictoryCondition: Send + Sync + fmt::Debug {
    /// `standings` holds every seat's current score.
    fn is_met(&self, state: &MatchState, standings: &[Standing]) -> bool;
}

/// Some seat has at least this many points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointThreshold(pub u32);

impl Default for PointThreshold {
    fn default() -> Self {
        Self(10)
    }
}

impl VictoryCondition for PointThreshold {
    fn is_met(&self, _state: &MatchState, standings: &[Standing]) -> bool {
        standings.iter().any(|s| s.points >= self.0)
    }
}

/// Nothing is left to buy: no face-up monuments, no monument deck and no
/// places of power.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolsExhausted;

impl VictoryCondition for PoolsExhausted {
    fn is_met(&self, state: &MatchState, _standings: &[Standing]) -> bool {
        state.pools.monuments.is_empty()
            && state.pools.monument_deck.is_empty()
            && state.pools.places_of_power.is_empty()
    }
}

/// The match ends after this many rounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundLimit(pub u32);

impl VictoryCondition for RoundLimit {
    fn is_met(&self, state: &MatchState, _standings: &[Standing]) -> bool {
        state.round >= self.0
    }
}

/// Met when any inner condition is.
///
/// ```
/// use arcana_rules::rules::{AnyOf, PointThreshold, RoundLimit};
///
/// let condition = AnyOf::new().or(PointThreshold(10)).or(RoundLimit(8));
/// assert_eq!(condition.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct AnyOf(pub Vec<Box<dyn VictoryCondition>>);

impl AnyOf {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn or(mut self, condition: impl VictoryCondition + 'static) -> Self {
        self.0.push(Box::new(condition));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl VictoryCondition for AnyOf {
    fn is_met(&self, state: &MatchState, standings: &[Standing]) -> bool {
        self.0.iter().any(|c| c.is_met(state, standings))
    }
}

/// A seat's points.
#[must_use]
pub fn points(player: &Player, registry: &CardRegistry, config: &MatchConfig) -> u32 {
    let cards: u32 = player
        .scoring_cards()
        .filter_map(|c| registry.get(c.card).map(|def| def.points.score(c)))
        .sum();
    let token = if player.has_first_player_token {
        config.token_points
    } else {
        0
    };
    cards + token
}

/// Tie-break value of a seat's pool.
#[must_use]
pub fn resource_value(player: &Player, config: &MatchConfig) -> u32 {
    player.resources.value(&config.resource_values)
}

/// Every seat's score, best first, with the winners.
#[must_use]
pub fn standings(state: &MatchState, registry: &CardRegistry, config: &MatchConfig) -> Standings {
    let mut entries: Vec<Standing> = state
        .players
        .iter()
        .map(|(seat, player)| Standing {
            seat,
            points: points(player, registry, config),
            resource_value: resource_value(player, config),
        })
        .collect();
    entries.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.resource_value.cmp(&a.resource_value))
            .then(a.seat.cmp(&b.seat))
    });

    let winners = match entries.first() {
        Some(best) => entries
            .iter()
            .filter(|s| s.points == best.points && s.resource_value == best.resource_value)
            .map(|s| s.seat)
            .collect(),
        None => Vec::new(),
    };
    Standings { entries, winners }
}
