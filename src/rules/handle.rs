//! A `Match` shared between request handlers.
//!
//! Each call takes the lock, applies one command and releases it, so
//! commands from concurrent requests serialize in arrival order. A panic
//! while the lock is held may leave the match half-changed; every later
//! call then fails with `RulesError::Poisoned`.

use std::sync::{Arc, Mutex, MutexGuard};

use log::warn;

use crate::core::{PlayerId, RulesError};

use super::command::Command;
use super::engine::Match;
use super::view::SeatView;

#[derive(Clone, Debug)]
pub struct MatchHandle {
    inner: Arc<Mutex<Match>>,
}

impl MatchHandle {
    #[must_use]
    pub fn new(game: Match) -> Self {
        Self {
            inner: Arc::new(Mutex::new(game)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Match>, RulesError> {
        self.inner.lock().map_err(|_| {
            warn!("refusing a match poisoned by a panicking command");
            RulesError::Poisoned
        })
    }

    pub fn submit(&self, command: Command) -> Result<SeatView, RulesError> {
        self.lock()?.submit(command)
    }

    pub fn seat_view(&self, seat: PlayerId) -> Result<SeatView, RulesError> {
        self.lock()?.seat_view(seat)
    }

    /// Run `f` with the lock held.
    pub fn with<R>(&self, f: impl FnOnce(&mut Match) -> R) -> Result<R, RulesError> {
        Ok(f(&mut *self.lock()?))
    }
}
