//! Player choices and pending decisions.
//!
//! Commands carry the owner's answers up front in `AbilityChoices`, keyed
//! by the index of the cost or effect that needs them. When an answer is
//! missing and more than one is legal, the command fails with
//! `RulesError::PendingDecisionRequired`, and the `PendingDecision` inside
//! lists every legal answer. A step with exactly one legal answer takes it
//! without asking.
//!
//! Decisions that depend on something revealed mid-resolution (attack
//! responses, reactions, cards just drawn) are not errors: they sit on the
//! interrupt stack until answered.
//!
//! ## Generators
//!
//! `subsets` and `permutations` enumerate card selections and deck
//! orderings; `core::distributions` enumerates resource multisets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::{PlayerId, ResourceBag};

/// One answer to a cost or effect.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Choice {
    Resources(ResourceBag),
    Card(CardId),
    Cards(Vec<CardId>),
    /// A permutation of deck positions, new top first.
    Order(Vec<usize>),
    PlayCard {
        card: CardId,
        payment: Option<ResourceBag>,
    },
    /// Skip an optional step.
    Decline,
}

/// Answers for one ability use, keyed by cost and effect index.
///
/// ```
/// use arcana_rules::effects::{AbilityChoices, Choice};
/// use arcana_rules::core::{ResourceBag, ResourceType};
///
/// let choices = AbilityChoices::new()
///     .with_cost(0, Choice::Resources(ResourceBag::of(ResourceType::Red, 3)))
///     .with_effect(0, Choice::Resources(ResourceBag::of(ResourceType::Blue, 3)));
///
/// assert!(choices.cost(0).is_some());
/// assert!(choices.effect(1).is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbilityChoices {
    #[serde(default)]
    pub costs: BTreeMap<usize, Choice>,
    #[serde(default)]
    pub effects: BTreeMap<usize, Choice>,
}

impl AbilityChoices {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_cost(mut self, index: usize, choice: Choice) -> Self {
        self.costs.insert(index, choice);
        self
    }

    #[must_use]
    pub fn with_effect(mut self, index: usize, choice: Choice) -> Self {
        self.effects.insert(index, choice);
        self
    }

    #[must_use]
    pub fn cost(&self, index: usize) -> Option<&Choice> {
        self.costs.get(&index)
    }

    #[must_use]
    pub fn effect(&self, index: usize) -> Option<&Choice> {
        self.effects.get(&index)
    }
}

/// Which step of a command a decision belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecisionStep {
    Cost(usize),
    Effect(usize),
    /// Wildcard slots of a price.
    Payment,
    /// Which card to take when passing.
    MagicItem,
    /// An income choice on a card.
    Income(CardId),
    Attack,
    Reaction,
}

/// An answer to an incoming attack.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackOption {
    PayNegation(ResourceBag),
    React { card: CardId, ability: usize },
    Take,
}

/// A reaction ability that may be used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReactionOption {
    pub card: CardId,
    pub ability: usize,
}

/// The legal answers to a decision.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecisionRequest {
    Resources { options: Vec<ResourceBag> },
    Card { options: Vec<CardId> },
    Cards { options: Vec<Vec<CardId>> },
    /// Reorder `cards` (current top first).
    Order { cards: Vec<CardId>, options: Vec<Vec<usize>> },
    PlayCard { options: Vec<CardId>, optional: bool },
    AttackResponse {
        attacker: PlayerId,
        source: CardId,
        options: Vec<AttackOption>,
    },
    Reaction {
        destroyed: CardId,
        owner: PlayerId,
        options: Vec<ReactionOption>,
    },
}

/// A request for one seat's input.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PendingDecision {
    pub seat: PlayerId,
    pub step: DecisionStep,
    pub request: DecisionRequest,
}

impl PendingDecision {
    #[must_use]
    pub fn new(seat: PlayerId, step: DecisionStep, request: DecisionRequest) -> Self {
        Self { seat, step, request }
    }
}

/// Answer to an attack on the interrupt stack.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackResponse {
    /// Pay the attack's negation cost.
    PayNegation,
    /// Use an `IncomingAttack` reaction; it negates the attack.
    React {
        card: CardId,
        ability: usize,
        #[serde(default)]
        choices: AbilityChoices,
    },
    /// Suffer the outcome. `artifact` picks what to lose to a destroy attack.
    Take { artifact: Option<CardId> },
}

/// Answer to an `ArtifactDestroyed` reaction window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReactionResponse {
    Use {
        card: CardId,
        ability: usize,
        #[serde(default)]
        choices: AbilityChoices,
    },
    Decline,
}

/// Every `k`-element subset of `items`, preserving order.
///
/// ```
/// use arcana_rules::effects::subsets;
///
/// assert_eq!(subsets(&[1, 2, 3], 2), vec![vec![1, 2], vec![1, 3], vec![2, 3]]);
/// ```
#[must_use]
pub fn subsets<T: Clone>(items: &[T], k: usize) -> Vec<Vec<T>> {
    fn walk<T: Clone>(items: &[T], k: usize, current: &mut Vec<T>, out: &mut Vec<Vec<T>>) {
        if current.len() == k {
            out.push(current.clone());
            return;
        }
        let needed = k - current.len();
        for i in 0..items.len() {
            if items.len() - i < needed {
                break;
            }
            current.push(items[i].clone());
            walk(&items[i + 1..], k, current, out);
            current.pop();
        }
    }

    let mut out = Vec::new();
    if k <= items.len() {
        walk(items, k, &mut Vec::with_capacity(k), &mut out);
    }
    out
}

/// Every ordering of `0..n`, in lexicographic order.
///
/// ```
/// use arcana_rules::effects::permutations;
///
/// assert_eq!(permutations(2), vec![vec![0, 1], vec![1, 0]]);
/// assert_eq!(permutations(3).len(), 6);
/// ```
#[must_use]
pub fn permutations(n: usize) -> Vec<Vec<usize>> {
    fn walk(remaining: &mut Vec<usize>, current: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if remaining.is_empty() {
            out.push(current.clone());
            return;
        }
        for i in 0..remaining.len() {
            let item = remaining.remove(i);
            current.push(item);
            walk(remaining, current, out);
            current.pop();
            remaining.insert(i, item);
        }
    }

    let mut out = Vec::new();
    walk(&mut (0..n).collect(), &mut Vec::with_capacity(n), &mut out);
    out
}

/// Is `order` a permutation of `0..n`?
#[must_use]
pub fn is_permutation(order: &[usize], n: usize) -> bool {
    let mut seen = vec![false; n];
    order.len() == n
        && order.iter().all(|&i| {
            let fresh = i < n && !seen[i];
            if fresh {
                seen[i] = true;
            }
            fresh
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ResourceType;

    #[test]
    fn test_subsets_sizes() {
        let items: Vec<u32> = (0..5).collect();

        assert_eq!(subsets(&items, 0), vec![Vec::<u32>::new()]);
        assert_eq!(subsets(&items, 2).len(), 10);
        assert_eq!(subsets(&items, 5).len(), 1);
        assert!(subsets(&items, 6).is_empty());
    }

    #[test]
    fn test_permutations() {
        let perms = permutations(3);

        assert_eq!(perms.len(), 6);
        assert_eq!(perms[0], vec![0, 1, 2]);
        assert_eq!(perms[5], vec![2, 1, 0]);
        assert!(perms.iter().all(|p| is_permutation(p, 3)));
    }

    #[test]
    fn test_is_permutation() {
        assert!(is_permutation(&[1, 0], 2));
        assert!(!is_permutation(&[0, 0], 2));
        assert!(!is_permutation(&[0, 2], 2));
        assert!(!is_permutation(&[0], 2));
    }

    #[test]
    fn test_choices_json() {
        let choices = AbilityChoices::new()
            .with_cost(1, Choice::Card(CardId::new(4)))
            .with_effect(0, Choice::Resources(ResourceBag::of(ResourceType::Black, 2)));

        let json = serde_json::to_string(&choices).unwrap();
        let back: AbilityChoices = serde_json::from_str(&json).unwrap();
        assert_eq!(back, choices);
    }
}
