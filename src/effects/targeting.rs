//! Target lookup for costs and effects.
//!
//! Every cost or effect that picks a card asks a `TargetSelector` for the
//! legal candidates, and the same list becomes the options of the
//! `PendingDecision` when the owner did not choose. Keeping the lookup in
//! one place means validation and enumeration can never disagree.

use serde::{Deserialize, Serialize};

use crate::cards::{CardFilter, CardId, CardRegistry};
use crate::core::{InstanceId, Player};

/// Where candidates come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetZone {
    /// The owner's artifacts.
    Artifacts,
    /// Every card the owner controls.
    Controlled,
    Hand,
}

/// Tap state a candidate must have.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TapRequirement {
    Either,
    Tapped,
    Untapped,
}

/// Finds the legal card targets of one seat.
///
/// ```
/// use arcana_rules::cards::{base_set, CardFilter};
/// use arcana_rules::core::{MatchState, PlayerId};
/// use arcana_rules::effects::TargetSelector;
///
/// let registry = base_set();
/// let mut state = MatchState::new(2);
/// let dragon = registry.id_of("Fire Dragon").unwrap();
/// let bow = registry.id_of("Elvish Bow").unwrap();
/// state.players[PlayerId::new(0)].hand.push_back(dragon);
/// state.players[PlayerId::new(0)].hand.push_back(bow);
///
/// let targets = TargetSelector::hand(&registry, CardFilter::tag("dragon"))
///     .valid_targets(&state.players[PlayerId::new(0)]);
/// assert_eq!(targets, vec![dragon]);
/// ```
#[derive(Clone, Debug)]
pub struct TargetSelector<'a> {
    registry: &'a CardRegistry,
    filter: CardFilter,
    zone: TargetZone,
    tap: TapRequirement,
    excluded: Option<InstanceId>,
}

impl<'a> TargetSelector<'a> {
    #[must_use]
    pub fn new(registry: &'a CardRegistry, zone: TargetZone, filter: CardFilter) -> Self {
        Self {
            registry,
            filter,
            zone,
            tap: TapRequirement::Either,
            excluded: None,
        }
    }

    #[must_use]
    pub fn artifacts(registry: &'a CardRegistry, filter: CardFilter) -> Self {
        Self::new(registry, TargetZone::Artifacts, filter)
    }

    #[must_use]
    pub fn controlled(registry: &'a CardRegistry, filter: CardFilter) -> Self {
        Self::new(registry, TargetZone::Controlled, filter)
    }

    #[must_use]
    pub fn hand(registry: &'a CardRegistry, filter: CardFilter) -> Self {
        Self::new(registry, TargetZone::Hand, filter)
    }

    #[must_use]
    pub fn tapped(mut self) -> Self {
        self.tap = TapRequirement::Tapped;
        self
    }

    #[must_use]
    pub fn untapped(mut self) -> Self {
        self.tap = TapRequirement::Untapped;
        self
    }

    /// Never offer this instance (usually the ability's source).
    #[must_use]
    pub fn excluding(mut self, instance: InstanceId) -> Self {
        self.excluded = Some(instance);
        self
    }

    fn matches(&self, card: CardId) -> bool {
        self.registry.get(card).is_some_and(|def| self.filter.matches(def))
    }

    /// Legal targets in table order, without duplicates.
    #[must_use]
    pub fn valid_targets(&self, player: &Player) -> Vec<CardId> {
        let mut targets: Vec<CardId> = match self.zone {
            TargetZone::Hand => player.hand.iter().copied().filter(|c| self.matches(*c)).collect(),
            TargetZone::Artifacts | TargetZone::Controlled => {
                let in_play: Box<dyn Iterator<Item = _>> = if self.zone == TargetZone::Artifacts {
                    Box::new(player.artifacts.iter())
                } else {
                    Box::new(player.controlled())
                };
                in_play
                    .filter(|c| Some(c.instance) != self.excluded)
                    .filter(|c| match self.tap {
                        TapRequirement::Either => true,
                        TapRequirement::Tapped => c.tapped,
                        TapRequirement::Untapped => !c.tapped,
                    })
                    .map(|c| c.card)
                    .filter(|c| self.matches(*c))
                    .collect()
            }
        };

        let mut seen = Vec::with_capacity(targets.len());
        targets.retain(|c| {
            let fresh = !seen.contains(c);
            seen.push(*c);
            fresh
        });
        targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{base_set, CardType, ControlledCard};
    use crate::core::PlayerId;

    #[test]
    fn test_controlled_filters_tap_and_source() {
        let registry = base_set();
        let dragon = registry.id_of("Fire Dragon").unwrap();
        let king = registry.id_of("Cursed Dwarven King").unwrap();
        let water = registry.id_of("Water Dragon").unwrap();

        let mut player = Player::new(PlayerId::new(0));
        player.artifacts.push_back(ControlledCard::new(InstanceId::new(0), king));
        player.artifacts.push_back(ControlledCard::new(InstanceId::new(1), dragon));
        player.artifacts.push_back(ControlledCard::new(InstanceId::new(2), water).tapped());

        let untapped = TargetSelector::controlled(&registry, CardFilter::tag("dragon"))
            .untapped()
            .excluding(InstanceId::new(0))
            .valid_targets(&player);
        assert_eq!(untapped, vec![dragon]);

        let tapped = TargetSelector::artifacts(&registry, CardFilter::Type(CardType::Artifact))
            .tapped()
            .valid_targets(&player);
        assert_eq!(tapped, vec![water]);
    }

    #[test]
    fn test_excluded_source_is_never_offered() {
        let registry = base_set();
        let whip = registry.id_of("Fiery Whip").unwrap();

        let mut player = Player::new(PlayerId::new(0));
        player.artifacts.push_back(ControlledCard::new(InstanceId::new(4), whip));

        let targets = TargetSelector::artifacts(&registry, CardFilter::Any)
            .excluding(InstanceId::new(4))
            .valid_targets(&player);
        assert!(targets.is_empty());
    }
}
