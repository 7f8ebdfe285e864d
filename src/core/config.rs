//! Match configuration.
//!
//! `MatchConfig` carries every tunable number the rules use: seat count,
//! draft sizes, shared pool sizes, scoring weights and rewards. The defaults
//! are the base game's values. Configs are plain serde data so a transport
//! can accept them as JSON.
//!
//! ```
//! use arcana_rules::core::MatchConfig;
//!
//! let config = MatchConfig::new(3).with_seed(9).with_draw_on_pass(0);
//! assert!(config.validate().is_ok());
//! assert_eq!(config.monument_count(), 10);
//! ```

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::resources::ResourceType;

/// Smallest supported seat count.
pub const MIN_SEATS: usize = 2;

/// Largest supported seat count.
pub const MAX_SEATS: usize = 4;

/// Tunable match parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Number of seats (2-4).
    pub player_count: usize,

    /// Artifacts dealt to each seat at the start of each draft round.
    pub draft_hand_size: usize,

    /// Mages offered to each seat.
    pub mage_options: usize,

    /// Drafted cards that go to hand; the rest form the deck.
    pub starting_hand_size: usize,

    /// Monuments in play for 2, 3 and 4 seats, capped at the registry's supply.
    pub monument_counts: [usize; 3],

    /// Monuments laid face up; the rest form the monument deck.
    pub face_up_monuments: usize,

    /// Places of power in play beyond one per seat.
    pub extra_places_of_power: usize,

    /// Points for holding the first-player token.
    pub token_points: u32,

    /// Tie-break value of each resource type, indexed by `ResourceType::index`.
    pub resource_values: [u32; 5],

    /// Gold received when discarding a card for resources.
    pub discard_gold: u32,

    /// Non-gold resources received when discarding a card for resources.
    pub discard_non_gold: u32,

    /// Cards drawn when passing.
    pub draw_on_pass: u32,

    /// Seed for setup randomness.
    pub seed: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        let mut resource_values = [1; 5];
        resource_values[ResourceType::Gold.index()] = 2;

        Self {
            player_count: 2,
            draft_hand_size: 4,
            mage_options: 2,
            starting_hand_size: 3,
            monument_counts: [7, 10, 12],
            face_up_monuments: 2,
            extra_places_of_power: 2,
            token_points: 1,
            resource_values,
            discard_gold: 1,
            discard_non_gold: 2,
            draw_on_pass: 1,
            seed: 0,
        }
    }
}

impl MatchConfig {
    /// Base-game configuration for `player_count` seats.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            player_count,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_draft_hand_size(mut self, size: usize) -> Self {
        self.draft_hand_size = size;
        self
    }

    #[must_use]
    pub fn with_starting_hand_size(mut self, size: usize) -> Self {
        self.starting_hand_size = size;
        self
    }

    #[must_use]
    pub fn with_token_points(mut self, points: u32) -> Self {
        self.token_points = points;
        self
    }

    #[must_use]
    pub fn with_draw_on_pass(mut self, cards: u32) -> Self {
        self.draw_on_pass = cards;
        self
    }

    #[must_use]
    pub fn with_resource_value(mut self, resource: ResourceType, value: u32) -> Self {
        self.resource_values[resource.index()] = value;
        self
    }

    /// Monuments in play for the configured seat count.
    #[must_use]
    pub fn monument_count(&self) -> usize {
        let slot = self.player_count.clamp(MIN_SEATS, MAX_SEATS) - MIN_SEATS;
        self.monument_counts[slot]
    }

    /// Places of power in play.
    #[must_use]
    pub fn place_of_power_count(&self) -> usize {
        self.player_count + self.extra_places_of_power
    }

    /// Artifacts drafted by each seat over both rounds.
    #[must_use]
    pub fn drafted_per_seat(&self) -> usize {
        self.draft_hand_size * 2
    }

    /// Check internal consistency.
    ///
    /// Whether the card data can supply these numbers is checked when the
    /// match is built, against its registry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_SEATS..=MAX_SEATS).contains(&self.player_count) {
            return Err(ConfigError::PlayerCount(self.player_count));
        }
        if self.draft_hand_size == 0 {
            return Err(ConfigError::Invalid("draft hand size must be at least 1".into()));
        }
        if self.mage_options == 0 {
            return Err(ConfigError::Invalid("at least one mage must be offered".into()));
        }
        if self.starting_hand_size > self.drafted_per_seat() {
            return Err(ConfigError::Invalid(format!(
                "starting hand of {} exceeds the {} drafted cards",
                self.starting_hand_size,
                self.drafted_per_seat()
            )));
        }
        if self.face_up_monuments > self.monument_count() {
            return Err(ConfigError::Invalid(format!(
                "{} face-up monuments but only {} in play",
                self.face_up_monuments,
                self.monument_count()
            )));
        }
        if self.discard_gold == 0 && self.discard_non_gold == 0 {
            return Err(ConfigError::Invalid("discarding must give something".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MatchConfig::default();

        assert_eq!(config.player_count, 2);
        assert_eq!(config.monument_count(), 7);
        assert_eq!(config.place_of_power_count(), 4);
        assert_eq!(config.drafted_per_seat(), 8);
        assert_eq!(config.resource_values[ResourceType::Gold.index()], 2);
        assert_eq!(config.resource_values[ResourceType::Red.index()], 1);
    }

    #[test]
    fn test_monuments_by_seat_count() {
        assert_eq!(MatchConfig::new(3).monument_count(), 10);
        assert_eq!(MatchConfig::new(4).monument_count(), 12);
        assert_eq!(MatchConfig::new(4).place_of_power_count(), 6);
    }

    #[test]
    fn test_validate_seat_count() {
        assert_eq!(MatchConfig::new(1).validate(), Err(ConfigError::PlayerCount(1)));
        assert_eq!(MatchConfig::new(5).validate(), Err(ConfigError::PlayerCount(5)));
        assert!(MatchConfig::new(4).validate().is_ok());
    }

    #[test]
    fn test_validate_hand_size() {
        let config = MatchConfig::new(2).with_starting_hand_size(9);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_partial_json() {
        let config: MatchConfig =
            serde_json::from_str(r#"{"player_count": 3, "seed": 5}"#).unwrap();

        assert_eq!(config.player_count, 3);
        assert_eq!(config.seed, 5);
        assert_eq!(config.draft_hand_size, 4);
    }
}
