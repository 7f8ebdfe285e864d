//! Reaction eligibility.
//!
//! A reaction is usable when its trigger answers the event and its costs
//! are payable right now. The same check builds the options offered in an
//! attack or reaction decision and validates the answer, so the two never
//! disagree.

use crate::cards::CardRegistry;
use crate::core::{MatchState, PlayerId};
use crate::effects::{EffectResolver, ReactionOption, ResolverContext};

use super::event::GameEvent;

/// Reactions `seat` may use against `event`, in table order.
#[must_use]
pub fn eligible_reactions(
    state: &MatchState,
    registry: &CardRegistry,
    seat: PlayerId,
    event: &GameEvent,
) -> Vec<ReactionOption> {
    let Ok(player) = state.player(seat) else {
        return Vec::new();
    };

    let mut options = Vec::new();
    for controlled in player.controlled() {
        let Some(card) = registry.get(controlled.card) else {
            continue;
        };
        for (index, ability) in card.abilities.iter().enumerate() {
            let Some(trigger) = ability.trigger else {
                continue;
            };
            if !event.answered_by(trigger, seat) {
                continue;
            }
            let ctx = ResolverContext::new(registry, seat, controlled);
            if EffectResolver::can_pay(state, &ctx, &ability.costs) {
                options.push(ReactionOption {
                    card: controlled.card,
                    ability: index,
                });
            }
        }
    }
    options
}

/// Seats holding at least one usable reaction, in turn order.
#[must_use]
pub fn reacting_seats(
    state: &MatchState,
    registry: &CardRegistry,
    event: &GameEvent,
) -> Vec<PlayerId> {
    state
        .turn_order()
        .into_iter()
        .filter(|seat| !eligible_reactions(state, registry, *seat, event).is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{base_set, CardId};

    #[test]
    fn test_tapped_reaction_is_not_eligible() {
        let registry = base_set();
        let mut state = MatchState::new(2);
        let crypt = registry.id_of("Crypt").unwrap();
        let statuette = registry.id_of("Jeweled Statuette").unwrap();

        let card = state.enter_play(crypt);
        state.players[PlayerId::new(0)].artifacts.push_back(card);
        let card = state.enter_play(statuette).tapped();
        state.players[PlayerId::new(1)].artifacts.push_back(card);

        let event = GameEvent::ArtifactDestroyed {
            owner: PlayerId::new(0),
            card: CardId::new(999),
        };

        assert_eq!(
            eligible_reactions(&state, &registry, PlayerId::new(0), &event),
            vec![ReactionOption { card: crypt, ability: 0 }]
        );
        assert!(eligible_reactions(&state, &registry, PlayerId::new(1), &event).is_empty());
        assert_eq!(reacting_seats(&state, &registry, &event), vec![PlayerId::new(0)]);
    }

    #[test]
    fn test_own_only_reaction_ignores_other_owners() {
        let registry = base_set();
        let mut state = MatchState::new(2);
        let crypt = registry.id_of("Crypt").unwrap();
        let card = state.enter_play(crypt);
        state.players[PlayerId::new(0)].artifacts.push_back(card);

        let event = GameEvent::ArtifactDestroyed {
            owner: PlayerId::new(1),
            card: CardId::new(999),
        };
        assert!(reacting_seats(&state, &registry, &event).is_empty());
    }

    #[test]
    fn test_attack_reactions() {
        let registry = base_set();
        let mut state = MatchState::new(2);
        let sword = registry.id_of("Dancing Sword").unwrap();
        let card = state.enter_play(sword);
        state.players[PlayerId::new(1)].artifacts.push_back(card);

        let event = GameEvent::AttackDeclared {
            attacker: PlayerId::new(0),
            source: CardId::new(1),
        };
        // Dancing Sword costs red 1 to use.
        assert!(eligible_reactions(&state, &registry, PlayerId::new(1), &event).is_empty());

        state.players[PlayerId::new(1)].resources.add_count(crate::core::ResourceType::Red, 1);
        assert_eq!(eligible_reactions(&state, &registry, PlayerId::new(1), &event).len(), 1);
    }
}
