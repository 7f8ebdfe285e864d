//! Card definitions: static card data.
//!
//! A `Card` holds everything printed on a card: its type, price, income,
//! abilities and points. Definitions never change during a match; what
//! changes (tapped, stored resources) lives in `ControlledCard`.
//!
//! ## Example
//!
//! ```
//! use arcana_rules::cards::{Card, CardId, CardType, Points, Price};
//! use arcana_rules::core::{ResourceBag, ResourceType};
//!
//! let dragon = Card::new(CardId::new(7), "Fire Dragon", CardType::Artifact)
//!     .with_price(Price::of(ResourceBag::of(ResourceType::Red, 6)))
//!     .with_points(Points::Fixed(1))
//!     .with_tag("dragon");
//!
//! assert!(dragon.has_tag("dragon"));
//! assert_eq!(dragon.price.total(), 6);
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{ResourceBag, ResourceType};

use super::ability::{Ability, Effect};
use super::income::IncomeSpec;
use super::instance::ControlledCard;

/// Unique identifier for a card definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Physical card kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    Artifact,
    PlaceOfPower,
    Monument,
    MagicItem,
    Mage,
    Scroll,
}

impl CardType {
    pub const ALL: [CardType; 6] = [
        CardType::Artifact,
        CardType::PlaceOfPower,
        CardType::Monument,
        CardType::MagicItem,
        CardType::Mage,
        CardType::Scroll,
    ];
}

impl std::fmt::Display for CardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CardType::Artifact => "artifact",
            CardType::PlaceOfPower => "place of power",
            CardType::Monument => "monument",
            CardType::MagicItem => "magic item",
            CardType::Mage => "mage",
            CardType::Scroll => "scroll",
        };
        f.write_str(name)
    }
}

/// What a card costs to put into play.
///
/// `fixed` must be paid exactly. Each of the `any_non_gold` wildcard slots
/// takes one elemental resource of the payer's choice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Price {
    pub fixed: ResourceBag,
    pub any_non_gold: u32,
}

impl Price {
    #[must_use]
    pub const fn free() -> Self {
        Self {
            fixed: ResourceBag::new(),
            any_non_gold: 0,
        }
    }

    #[must_use]
    pub const fn of(fixed: ResourceBag) -> Self {
        Self {
            fixed,
            any_non_gold: 0,
        }
    }

    #[must_use]
    pub fn with_wildcards(mut self, count: u32) -> Self {
        self.any_non_gold = count;
        self
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.fixed.total() + self.any_non_gold
    }

    /// The price after a reduction of `amount`.
    ///
    /// Wildcard slots are removed first, then elemental amounts in type
    /// order. Gold is never reduced.
    ///
    /// ```
    /// use arcana_rules::cards::Price;
    /// use arcana_rules::core::{ResourceBag, ResourceType};
    ///
    /// let price = Price::of(ResourceBag::of(ResourceType::Red, 6)).with_wildcards(1);
    /// let reduced = price.reduced_by(3);
    ///
    /// assert_eq!(reduced.any_non_gold, 0);
    /// assert_eq!(reduced.fixed.get(ResourceType::Red), 4);
    /// ```
    #[must_use]
    pub fn reduced_by(&self, amount: u32) -> Price {
        let mut out = *self;
        let mut left = amount;

        let from_wild = left.min(out.any_non_gold);
        out.any_non_gold -= from_wild;
        left -= from_wild;

        for resource in ResourceType::ELEMENTAL {
            if left == 0 {
                break;
            }
            let take = left.min(out.fixed.get(resource));
            out.fixed.remove(resource, take);
            left -= take;
        }
        out
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.fixed.is_empty(), self.any_non_gold) {
            (true, 0) => f.write_str("free"),
            (false, 0) => write!(f, "{}", self.fixed),
            (true, n) => write!(f, "{} any non-gold", n),
            (false, n) => write!(f, "{} + {} any non-gold", self.fixed, n),
        }
    }
}

/// A pure test over a card in play.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardPredicate {
    /// At least `count` of `resource` stored on the card.
    HasStored { resource: ResourceType, count: u32 },
    Tapped,
    Untapped,
}

impl CardPredicate {
    #[must_use]
    pub fn holds(&self, card: &ControlledCard) -> bool {
        match self {
            CardPredicate::HasStored { resource, count } => card.resources.get(*resource) >= *count,
            CardPredicate::Tapped => card.tapped,
            CardPredicate::Untapped => !card.tapped,
        }
    }
}

/// Victory points a card is worth while its owner controls it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Points {
    Fixed(u32),
    /// One point per `per` of `resource` stored on the card.
    PerStored { resource: ResourceType, per: u32 },
    /// `points` while the predicate holds.
    Conditional { predicate: CardPredicate, points: u32 },
}

impl Default for Points {
    fn default() -> Self {
        Points::Fixed(0)
    }
}

impl Points {
    #[must_use]
    pub fn score(&self, card: &ControlledCard) -> u32 {
        match self {
            Points::Fixed(n) => *n,
            Points::PerStored { resource, per } => card.resources.get(*resource) / (*per).max(1),
            Points::Conditional { predicate, points } => {
                if predicate.holds(card) {
                    *points
                } else {
                    0
                }
            }
        }
    }
}

/// Passive discount on hand cards carrying `tag`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CostReduction {
    pub tag: String,
    pub amount: u32,
}

/// Static card definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub name: String,
    pub card_type: CardType,

    #[serde(default)]
    pub price: Price,

    #[serde(default)]
    pub income: IncomeSpec,

    /// Activated and reaction abilities, addressed by index.
    #[serde(default)]
    pub abilities: Vec<Ability>,

    /// Effects applied when the card is played from hand.
    #[serde(default)]
    pub on_play: Vec<Effect>,

    #[serde(default)]
    pub cost_reductions: Vec<CostReduction>,

    #[serde(default)]
    pub points: Points,

    #[serde(default)]
    pub tags: SmallVec<[String; 2]>,

    /// The other face of a double-sided place of power.
    #[serde(default)]
    pub paired_with: Option<CardId>,
}

impl Card {
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, card_type: CardType) -> Self {
        Self {
            id,
            name: name.into(),
            card_type,
            price: Price::free(),
            income: IncomeSpec::None,
            abilities: Vec::new(),
            on_play: Vec::new(),
            cost_reductions: Vec::new(),
            points: Points::default(),
            tags: SmallVec::new(),
            paired_with: None,
        }
    }

    #[must_use]
    pub fn with_price(mut self, price: Price) -> Self {
        self.price = price;
        self
    }

    #[must_use]
    pub fn with_income(mut self, income: IncomeSpec) -> Self {
        self.income = income;
        self
    }

    #[must_use]
    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.abilities.push(ability);
        self
    }

    #[must_use]
    pub fn with_on_play(mut self, effect: Effect) -> Self {
        self.on_play.push(effect);
        self
    }

    #[must_use]
    pub fn with_cost_reduction(mut self, tag: impl Into<String>, amount: u32) -> Self {
        self.cost_reductions.push(CostReduction {
            tag: tag.into(),
            amount,
        });
        self
    }

    #[must_use]
    pub fn with_points(mut self, points: Points) -> Self {
        self.points = points;
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    #[must_use]
    pub fn paired_with(mut self, other: CardId) -> Self {
        self.paired_with = Some(other);
        self
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Ability by index.
    #[must_use]
    pub fn ability(&self, index: usize) -> Option<&Ability> {
        self.abilities.get(index)
    }
}
