//! Income specifications.
//!
//! A card's income is evaluated once per round, when its owner finalizes
//! income. `Conditional` predicates see the card as it was before any
//! stored resources were collected that round.

use serde::{Deserialize, Serialize};

use crate::core::{ResourceBag, ResourceFilter};

use super::definition::CardPredicate;
use super::instance::ControlledCard;

/// What a card yields each round.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncomeSpec {
    #[default]
    None,
    /// Added to the owner's pool.
    Fixed(ResourceBag),
    /// `count` resources of the owner's choice.
    Choice {
        count: u32,
        filter: ResourceFilter,
        single_type: bool,
    },
    /// Placed on the card itself.
    Store(ResourceBag),
    All(Vec<IncomeSpec>),
    Conditional {
        predicate: CardPredicate,
        then: Box<IncomeSpec>,
    },
}

/// A choice an owner must make before finalizing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeChoiceSpec {
    pub count: u32,
    pub filter: ResourceFilter,
    pub single_type: bool,
}

impl IncomeChoiceSpec {
    /// Is `bag` an acceptable answer?
    #[must_use]
    pub fn accepts(&self, bag: &ResourceBag) -> bool {
        bag.total() == self.count
            && bag.only_uses(&self.filter)
            && (!self.single_type || bag.distinct_types() <= 1)
    }
}

/// Resolved income of one card, given its current state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IncomeYield {
    pub to_pool: ResourceBag,
    pub to_card: ResourceBag,
    pub choices: Vec<IncomeChoiceSpec>,
}

impl IncomeSpec {
    /// Evaluate against the card's current state.
    #[must_use]
    pub fn evaluate(&self, card: &ControlledCard) -> IncomeYield {
        let mut out = IncomeYield::default();
        self.collect_into(card, &mut out);
        out
    }

    fn collect_into(&self, card: &ControlledCard, out: &mut IncomeYield) {
        match self {
            IncomeSpec::None => {}
            IncomeSpec::Fixed(bag) => out.to_pool.add_bag(bag),
            IncomeSpec::Store(bag) => out.to_card.add_bag(bag),
            IncomeSpec::Choice {
                count,
                filter,
                single_type,
            } => out.choices.push(IncomeChoiceSpec {
                count: *count,
                filter: filter.clone(),
                single_type: *single_type,
            }),
            IncomeSpec::All(specs) => {
                for spec in specs {
                    spec.collect_into(card, out);
                }
            }
            IncomeSpec::Conditional { predicate, then } => {
                if predicate.holds(card) {
                    then.collect_into(card, out);
                }
            }
        }
    }

    /// Number of `Choice` specs anywhere inside, ignoring predicates.
    #[must_use]
    pub fn choice_count(&self) -> usize {
        match self {
            IncomeSpec::Choice { .. } => 1,
            IncomeSpec::All(specs) => specs.iter().map(IncomeSpec::choice_count).sum(),
            IncomeSpec::Conditional { then, .. } => then.choice_count(),
            _ => 0,
        }
    }
}
