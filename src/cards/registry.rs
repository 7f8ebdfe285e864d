//! Card registry for definition lookup.
//!
//! The `CardRegistry` stores every card definition a match can use. It is
//! built once (from `base_set` or JSON), then shared read-only by `Arc`
//! across matches.

use rustc_hash::FxHashMap;

use crate::core::{ConfigError, RulesError};

use super::definition::{Card, CardId, CardType};

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use arcana_rules::cards::{Card, CardId, CardRegistry, CardType};
///
/// let mut registry = CardRegistry::new();
/// registry.register(Card::new(CardId::new(1), "Athanor", CardType::Artifact));
///
/// assert_eq!(registry.id_of("Athanor"), Some(CardId::new(1)));
/// assert_eq!(registry.get(CardId::new(1)).unwrap().name, "Athanor");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, Card>,
    by_name: FxHashMap<String, CardId>,
    next_id: u32,
}

impl CardRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON array of card definitions.
    ///
    /// ```
    /// use arcana_rules::cards::CardRegistry;
    ///
    /// let registry = CardRegistry::from_json(
    ///     r#"[{"id": 0, "name": "Magical Shard", "card_type": "artifact"}]"#,
    /// ).unwrap();
    /// assert_eq!(registry.len(), 1);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cards: Vec<Card> =
            serde_json::from_str(json).map_err(|e| ConfigError::CardData(e.to_string()))?;

        let mut registry = Self::new();
        for card in cards {
            registry.try_register(card)?;
        }
        registry.validate()?;
        Ok(registry)
    }

    /// Register a card definition.
    ///
    /// Panics if the id or name is taken or the card is malformed.
    pub fn register(&mut self, card: Card) {
        if let Err(e) = self.try_register(card) {
            panic!("{}", e);
        }
    }

    /// Register a card definition, reporting conflicts.
    pub fn try_register(&mut self, card: Card) -> Result<(), ConfigError> {
        if self.cards.contains_key(&card.id) {
            return Err(ConfigError::DuplicateCard(format!("id {} already registered", card.id)));
        }
        if self.by_name.contains_key(&card.name) {
            return Err(ConfigError::DuplicateCard(format!(
                "name {:?} already registered",
                card.name
            )));
        }
        check_card(&card)?;

        self.next_id = self.next_id.max(card.id.raw() + 1);
        self.by_name.insert(card.name.clone(), card.id);
        self.cards.insert(card.id, card);
        Ok(())
    }

    /// The next id not yet used.
    #[must_use]
    pub fn next_id(&self) -> CardId {
        CardId::new(self.next_id)
    }

    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.get(&id)
    }

    /// Look up a card, reporting unknown ids as `RulesError::UnknownCard`.
    pub fn lookup(&self, id: CardId) -> Result<&Card, RulesError> {
        self.cards.get(&id).ok_or(RulesError::UnknownCard(id))
    }

    #[must_use]
    pub fn id_of(&self, name: &str) -> Option<CardId> {
        self.by_name.get(name).copied()
    }

    /// Display name, falling back to the id.
    #[must_use]
    pub fn name_of(&self, id: CardId) -> String {
        self.get(id).map_or_else(|| id.to_string(), |c| c.name.clone())
    }

    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }

    /// Ids of every card of a type, in id order.
    #[must_use]
    pub fn ids_of_type(&self, card_type: CardType) -> Vec<CardId> {
        let mut ids: Vec<CardId> = self
            .cards
            .values()
            .filter(|c| c.card_type == card_type)
            .map(|c| c.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Double-sided places of power, each pair once, lower id first.
    #[must_use]
    pub fn place_of_power_pairs(&self) -> Vec<(CardId, CardId)> {
        self.ids_of_type(CardType::PlaceOfPower)
            .into_iter()
            .filter_map(|id| {
                let other = self.get(id)?.paired_with?;
                (id < other).then_some((id, other))
            })
            .collect()
    }

    /// Cross-card consistency: pairings point at each other.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for card in self.cards.values() {
            let Some(other) = card.paired_with else {
                continue;
            };
            let back = self.get(other).and_then(|o| o.paired_with);
            if back != Some(card.id) {
                return Err(ConfigError::InvalidCard(format!(
                    "{} is paired with {}, which does not pair back",
                    card.name, other
                )));
            }
        }
        Ok(())
    }
}

fn check_card(card: &Card) -> Result<(), ConfigError> {
    for (index, ability) in card.abilities.iter().enumerate() {
        if ability.is_reaction() && ability.has_attack() {
            return Err(ConfigError::InvalidCard(format!(
                "{} ability {} is a reaction with an attack",
                card.name, index
            )));
        }
        let variable = |c: &&super::Cost| matches!(c, super::Cost::PayVariable { .. });
        if ability.costs.iter().filter(variable).count() > 1 {
            return Err(ConfigError::InvalidCard(format!(
                "{} ability {} pays a variable amount twice",
                card.name, index
            )));
        }
    }
    if card.income.choice_count() > 1 {
        return Err(ConfigError::InvalidCard(format!(
            "{} has more than one income choice",
            card.name
        )));
    }
    if card.paired_with.is_some() && card.card_type != CardType::PlaceOfPower {
        return Err(ConfigError::InvalidCard(format!(
            "{} is paired but not a place of power",
            card.name
        )));
    }
    Ok(())
}
