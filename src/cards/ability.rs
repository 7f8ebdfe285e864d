//! Abilities as data.
//!
//! Every card ability is an ordered list of `Cost`s followed by an ordered
//! list of `Effect`s. There is no per-card code: the resolver interprets
//! these variants, so adding a card means writing data, not logic.
//!
//! ## Choices
//!
//! Some costs and effects need the owner's input (which artifact to
//! destroy, which resource to gain). Those are supplied by index in
//! `AbilityChoices`; see `effects::choice`.
//!
//! ## Reactions
//!
//! An ability with a `trigger` is a reaction: it can only be used in
//! response to the matching event, never as an action.

use serde::{Deserialize, Serialize};

use crate::core::{ResourceBag, ResourceFilter};

use super::definition::{Card, CardType};

/// Which cards a cost or effect may pick.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardFilter {
    Any,
    Tag(String),
    Type(CardType),
}

impl CardFilter {
    #[must_use]
    pub fn tag(tag: impl Into<String>) -> Self {
        CardFilter::Tag(tag.into())
    }

    #[must_use]
    pub fn matches(&self, card: &Card) -> bool {
        match self {
            CardFilter::Any => true,
            CardFilter::Tag(tag) => card.has_tag(tag),
            CardFilter::Type(card_type) => card.card_type == *card_type,
        }
    }
}

/// A cost paid before an ability's effects.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cost {
    /// Tap the source card.
    Tap,
    /// Pay from the owner's pool.
    Pay(ResourceBag),
    /// Pay a chosen amount "X" in `min..=max`.
    PayVariable {
        min: u32,
        max: u32,
        filter: ResourceFilter,
        single_type: bool,
    },
    /// Remove resources stored on the source card.
    RemoveFromCard(ResourceBag),
    DestroySelf,
    /// Destroy another artifact the owner controls.
    DestroyArtifact { filter: CardFilter },
    /// Discard chosen hand cards.
    Discard { count: u32 },
    /// Tap another untapped card the owner controls.
    TapCard { filter: CardFilter },
}

/// How many resources a choice grant gives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Amount {
    Fixed(u32),
    /// The amount paid by this ability's `PayVariable` cost.
    PaidX,
}

/// Resources an effect hands out.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grant {
    Fixed(ResourceBag),
    Choice {
        count: Amount,
        filter: ResourceFilter,
        single_type: bool,
        /// Forbid the types paid by `PayVariable`.
        different_from_paid: bool,
    },
    /// The bag once per opponent.
    PerOpponent(ResourceBag),
    /// The fixed price of the artifact destroyed by this ability's costs.
    DestroyedCost,
}

impl Grant {
    /// A choice of `count` resources from `filter`, all of one type.
    #[must_use]
    pub fn single_type(count: u32, filter: ResourceFilter) -> Self {
        Grant::Choice {
            count: Amount::Fixed(count),
            filter,
            single_type: true,
            different_from_paid: false,
        }
    }
}

/// What to untap.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UntapTarget {
    SelfCard,
    /// A chosen tapped card of the owner.
    Card(CardFilter),
}

/// What an unanswered attack does to a defender.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackOutcome {
    /// Lose resources, clamped to what the defender holds.
    LoseResources(ResourceBag),
    /// Destroy an artifact of the defender's choice.
    DestroyArtifact,
}

/// An attack against every opponent.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attack {
    pub outcome: AttackOutcome,
    /// Paying this avoids the outcome.
    pub negate_cost: Option<ResourceBag>,
}

impl Attack {
    #[must_use]
    pub fn lose(bag: ResourceBag) -> Self {
        Self {
            outcome: AttackOutcome::LoseResources(bag),
            negate_cost: None,
        }
    }

    #[must_use]
    pub fn negated_by(mut self, cost: ResourceBag) -> Self {
        self.negate_cost = Some(cost);
        self
    }
}

/// An ability's result, applied after all costs are paid.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    Gain(Grant),
    /// Resources placed on the source card.
    AddToCard(Grant),
    /// Pool non-gold becomes gold, `rate` to one, at most `limit` non-gold.
    Convert { limit: Option<u32>, rate: u32 },
    /// Deck to hand; stops when the deck is empty.
    Draw(u32),
    DrawThenDiscard { draw: u32, discard: u32 },
    Untap(UntapTarget),
    Attack(Attack),
    GiveOpponents(ResourceBag),
    /// Rearrange the top cards of the owner's deck.
    ReorderDeck(u32),
    /// Play a matching hand card at a discount.
    PlayCard { filter: CardFilter, discount: u32 },
}

impl Effect {
    /// Does resolving this effect suspend for a decision made after a reveal?
    #[must_use]
    pub fn reveals(&self) -> bool {
        matches!(self, Effect::DrawThenDiscard { .. } | Effect::ReorderDeck(_))
    }
}

/// Event a reaction ability answers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReactionTrigger {
    /// The owner is being attacked. Using the reaction negates the attack.
    IncomingAttack,
    /// An artifact was destroyed; `own_only` restricts to the owner's artifacts.
    ArtifactDestroyed { own_only: bool },
}

/// Ordered costs, ordered effects, and an optional reaction trigger.
///
/// ```
/// use arcana_rules::cards::{Ability, Cost, Effect, Grant};
/// use arcana_rules::core::{ResourceBag, ResourceType};
///
/// let pickaxe = Ability::new()
///     .with_cost(Cost::Tap)
///     .with_cost(Cost::Pay(ResourceBag::of(ResourceType::Red, 1)))
///     .with_effect(Effect::Gain(Grant::Fixed(ResourceBag::of(ResourceType::Gold, 1))));
///
/// assert!(!pickaxe.is_reaction());
/// assert_eq!(pickaxe.costs.len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ability {
    #[serde(default)]
    pub costs: Vec<Cost>,
    #[serde(default)]
    pub effects: Vec<Effect>,
    #[serde(default)]
    pub trigger: Option<ReactionTrigger>,
}

impl Ability {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A reaction to `trigger`.
    #[must_use]
    pub fn reaction(trigger: ReactionTrigger) -> Self {
        Self {
            trigger: Some(trigger),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_cost(mut self, cost: Cost) -> Self {
        self.costs.push(cost);
        self
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn is_reaction(&self) -> bool {
        self.trigger.is_some()
    }

    #[must_use]
    pub fn has_attack(&self) -> bool {
        self.effects.iter().any(|e| matches!(e, Effect::Attack(_)))
    }

    /// The `PayVariable` cost, if any.
    #[must_use]
    pub fn variable_cost(&self) -> Option<(usize, &Cost)> {
        self.costs
            .iter()
            .enumerate()
            .find(|(_, c)| matches!(c, Cost::PayVariable { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardId;
    use crate::core::ResourceType;

    #[test]
    fn test_card_filter() {
        let dragon =
            Card::new(CardId::new(1), "Fire Dragon", CardType::Artifact).with_tag("dragon");
        let shard = Card::new(CardId::new(2), "Magical Shard", CardType::Artifact);

        assert!(CardFilter::tag("dragon").matches(&dragon));
        assert!(!CardFilter::tag("dragon").matches(&shard));
        assert!(CardFilter::Type(CardType::Artifact).matches(&shard));
        assert!(CardFilter::Any.matches(&shard));
    }

    #[test]
    fn test_reaction_flags() {
        let shield = Ability::reaction(ReactionTrigger::IncomingAttack)
            .with_cost(Cost::Tap)
            .with_effect(Effect::Gain(Grant::Fixed(ResourceBag::of(ResourceType::Blue, 1))));

        assert!(shield.is_reaction());
        assert!(!shield.has_attack());
    }

    #[test]
    fn test_reveal_effects() {
        assert!(Effect::ReorderDeck(3).reveals());
        assert!(Effect::DrawThenDiscard { draw: 2, discard: 1 }.reveals());
        assert!(!Effect::Draw(1).reveals());
    }
}
