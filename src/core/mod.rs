//! Core types: seats, instances, resources, RNG, configuration, errors and
//! the match state.
//!
//! Everything else in the crate builds on these. Nothing in `core` knows
//! how a command is validated; that lives in `rules`.

pub mod entity;
pub mod player;
pub mod resources;
pub mod rng;
pub mod config;
pub mod error;
pub mod state;

pub use entity::InstanceId;
pub use player::{PlayerId, PlayerMap};
pub use resources::{distributions, ResourceBag, ResourceFilter, ResourceType};
pub use rng::{GameRng, GameRngState};
pub use config::{MatchConfig, MAX_SEATS, MIN_SEATS};
pub use error::{ConfigError, RulesError};
pub use state::{
    ActionState, DraftState, IncomeState, MatchState, Phase, PhaseState, Player, SharedPools,
    Standing, Standings,
};
