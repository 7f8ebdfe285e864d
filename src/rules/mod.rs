//! Match rules: commands, phases and scoring.
//!
//! ## Key Types
//!
//! - [`Command`]: one variant per player intent, serde-tagged for transports
//! - [`Match`]: the state machine; every command is applied atomically
//! - [`SeatView`]: what one seat may see after each command
//! - [`VictoryCondition`]: the injected end-of-match predicate
//! - [`MatchHandle`]: a `Match` behind a mutex for concurrent callers
//!
//! ## Phases
//!
//! ```text
//! Setup -> DraftingRound1 -> DraftingRound2 -> MageSelection
//!       -> MagicItemSelection -> Income <-> Action -> GameOver
//! ```
//!
//! `draft` covers everything before the first Income phase, `income` the
//! per-round negotiation and `action` the turn loop and interrupt stack.
//! `victory` is consulted once at the end of every round.

pub mod action;
pub mod command;
mod draft;
pub mod engine;
pub mod handle;
pub mod income;
pub mod victory;
pub mod view;

pub use action::{attack_options, pending_decisions};
pub use command::{Command, MonumentSource};
pub use engine::{Match, MatchBuilder};
pub use handle::MatchHandle;
pub use income::{income_yields, required_choices};
pub use victory::{
    points, resource_value, standings, AnyOf, PointThreshold, PoolsExhausted, RoundLimit,
    VictoryCondition,
};
#[cfg(feature = "observer")]
pub use view::ObserverView;
pub use view::{ActionView, DraftView, IncomeView, PublicPlayer, PublicPools, SeatView};
