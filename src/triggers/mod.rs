//! Events raised during resolution and the reactions that answer them.
//!
//! ## Key Components
//!
//! - [`GameEvent`]: something that happened (artifact destroyed, attack declared, ...)
//! - [`eligible_reactions`]: the reaction abilities a seat may use against an event
//! - [`reacting_seats`]: seats that get a reaction window, in turn order
//!
//! Reactions are ordinary abilities with a `trigger`. They never run on
//! their own: an event only opens a window on the interrupt stack, and each
//! eligible seat answers it with `respond_to_reaction` (or, for attacks,
//! `respond_to_attack`).
//!
//! ## Example Usage
//!
//! ```
//! use arcana_rules::cards::base_set;
//! use arcana_rules::core::{MatchState, PlayerId};
//! use arcana_rules::triggers::{reacting_seats, GameEvent};
//!
//! let registry = base_set();
//! let mut state = MatchState::new(2);
//! let crypt = state.enter_play(registry.id_of("Crypt").unwrap());
//! state.players[PlayerId::new(1)].artifacts.push_back(crypt);
//!
//! let event = GameEvent::ArtifactDestroyed {
//!     owner: PlayerId::new(1),
//!     card: registry.id_of("Hawk").unwrap(),
//! };
//! assert_eq!(reacting_seats(&state, &registry, &event), vec![PlayerId::new(1)]);
//! ```

mod event;
mod reaction;

pub use event::GameEvent;
pub use reaction::{eligible_reactions, reacting_seats};
