//! Ability resolution.
//!
//! - `Choice` / `AbilityChoices`: a seat's answers, keyed by cost or effect index
//! - `PendingDecision`: a request for input with every legal answer
//! - `TargetSelector`: legal card targets for costs and effects
//! - `EffectResolver`: pays costs and applies effects to `MatchState`
//!
//! ## Design Philosophy
//!
//! Abilities are data (`cards::Cost`, `cards::Effect`), interpreted here.
//! Enumerating options and validating answers share one code path, so a
//! bot that always answers from the listed options can never be rejected
//! for an illegal choice.

mod choice;
mod resolver;
mod targeting;

pub use choice::{
    is_permutation, permutations, subsets, AbilityChoices, AttackOption, AttackResponse, Choice,
    DecisionRequest, DecisionStep, PendingDecision, ReactionOption, ReactionResponse,
};
pub use resolver::{
    effective_price, pay_price, EffectResolver, ResolutionMemo, ResolveMode, ResolveOutcome,
    ResolverContext,
};
pub(crate) use resolver::select;
pub use targeting::{TapRequirement, TargetSelector, TargetZone};
