//! # arcana-rules
//!
//! A rules engine for Res Arcana: drafting, income, the action/reaction
//! turn loop and scoring, driven entirely by commands.
//!
//! ## Design Principles
//!
//! 1. **Cards are data**: every ability is an ordered list of costs and
//!    effects. The resolver interprets them; a new card needs no new code.
//!
//! 2. **N-Player First**: seats are `PlayerId`s and per-seat data lives in
//!    `PlayerMap`. Nothing assumes two players.
//!
//! 3. **All or nothing**: a command either commits completely or leaves the
//!    match untouched.
//!
//! ## Architecture
//!
//! - **Explicit suspension**: when another seat must answer (an attack, a
//!   reaction window, a reveal) the acting ability is parked on the
//!   interrupt stack. Humans and bots answer it the same way.
//!
//! - **Persistent Data Structures**: O(1) cloning via `im-rs`, which makes
//!   the per-command snapshot and dry runs cheap.
//!
//! - **Deterministic**: one seeded ChaCha RNG per match; the same seed and
//!   commands always produce the same state.
//!
//! ## Modules
//!
//! - `core`: seats, resources, RNG, configuration, errors, match state
//! - `cards`: card definitions, abilities, income, the registry and base set
//! - `effects`: choices, decisions and the ability resolver
//! - `triggers`: game events and reaction eligibility
//! - `stack`: the interrupt stack
//! - `rules`: commands, the `Match` state machine, views and scoring
//! - `bots`: a random bot playing through the command interface

pub mod core;
pub mod cards;
pub mod effects;
pub mod triggers;
pub mod stack;
pub mod rules;
pub mod bots;

// Re-export commonly used types
pub use crate::core::{
    ConfigError, GameRng, GameRngState, InstanceId, MatchConfig, MatchState, Phase, PlayerId,
    PlayerMap, ResourceBag, ResourceType, RulesError,
};

pub use crate::cards::{Ability, Card, CardId, CardRegistry, CardType, ControlledCard, Cost, Effect};

pub use crate::effects::{AbilityChoices, Choice, DecisionRequest, PendingDecision};

pub use crate::triggers::GameEvent;

pub use crate::stack::{Interrupt, InterruptStack};

pub use crate::rules::{
    Command, Match, MatchBuilder, MatchHandle, SeatView, VictoryCondition,
};

pub use crate::bots::RandomBot;
