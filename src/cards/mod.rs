//! Card system: definitions, abilities, income, instances and the registry.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for a card definition
//! - `Card`: Static card data (price, income, abilities, points)
//! - `Ability`: Ordered costs and effects, optionally a reaction
//! - `ControlledCard`: A card in play (instance id, tapped, stored resources)
//! - `CardRegistry`: Card definition lookup, loadable from JSON
//!
//! Cards are pure data. Every behavior is interpreted by `effects::resolver`
//! and `rules`, so a new card never needs new code.

pub mod ability;
pub mod base_set;
pub mod definition;
pub mod income;
pub mod instance;
pub mod registry;

pub use ability::{
    Ability, Amount, Attack, AttackOutcome, CardFilter, Cost, Effect, Grant, ReactionTrigger,
    UntapTarget,
};
pub use base_set::base_set;
pub use definition::{Card, CardId, CardPredicate, CardType, CostReduction, Points, Price};
pub use income::{IncomeChoiceSpec, IncomeSpec, IncomeYield};
pub use instance::ControlledCard;
pub use registry::CardRegistry;
