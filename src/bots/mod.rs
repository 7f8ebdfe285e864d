//! Bots that play through the same `Command` interface as a human.
//!
//! A bot reads its `SeatView`, decides, and submits commands to the
//! `Match`. It never touches `MatchState` directly, so whatever a bot can
//! do a remote client can do too.

mod random;

pub use random::RandomBot;
