//! `Match`: one match's state machine.
//!
//! Every command goes through [`Match::submit`]. The state and RNG are
//! snapshotted first (an O(1) clone of persistent structures) and restored
//! if the command fails, so a command either commits completely or leaves
//! nothing behind.
//!
//! ```
//! use arcana_rules::core::{MatchConfig, Phase};
//! use arcana_rules::rules::Match;
//!
//! let game = Match::new(MatchConfig::new(2).with_seed(7)).unwrap();
//! assert_eq!(game.state().phase, Phase::DraftingRound1);
//! ```

use std::fmt;
use std::sync::Arc;

use log::{debug, info};

use crate::cards::{base_set, CardId, CardRegistry};
use crate::core::{
    ConfigError, GameRng, GameRngState, MatchConfig, MatchState, Phase, PlayerId, ResourceBag,
    RulesError, Standings,
};
use crate::effects::{AbilityChoices, AttackResponse, Choice, PendingDecision, ReactionResponse};

use super::command::{Command, MonumentSource};
#[cfg(feature = "observer")]
use super::view::ObserverView;
use super::view::SeatView;
use super::victory::{self, PointThreshold, VictoryCondition};
use super::{action, draft, income};

/// Read-only inputs every phase handler needs.
#[derive(Clone, Copy)]
pub(crate) struct RulesContext<'a> {
    pub registry: &'a CardRegistry,
    pub config: &'a MatchConfig,
    pub victory: &'a dyn VictoryCondition,
}

/// Builds a [`Match`].
pub struct MatchBuilder {
    config: MatchConfig,
    registry: Option<Arc<CardRegistry>>,
    victory: Option<Box<dyn VictoryCondition>>,
    resume: Option<(MatchState, GameRngState)>,
}

impl MatchBuilder {
    #[must_use]
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            registry: None,
            victory: None,
            resume: None,
        }
    }

    /// Card data. Defaults to the built-in base set.
    #[must_use]
    pub fn registry(mut self, registry: Arc<CardRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// End-of-match condition. Defaults to `PointThreshold(10)`.
    #[must_use]
    pub fn victory(mut self, condition: impl VictoryCondition + 'static) -> Self {
        self.victory = Some(Box::new(condition));
        self
    }

    #[must_use]
    pub fn boxed_victory(mut self, condition: Box<dyn VictoryCondition>) -> Self {
        self.victory = Some(condition);
        self
    }

    /// Continue a saved match instead of dealing a new one.
    #[must_use]
    pub fn resume(mut self, state: MatchState, rng: GameRngState) -> Self {
        self.resume = Some((state, rng));
        self
    }

    pub fn build(self) -> Result<Match, ConfigError> {
        self.config.validate()?;
        let registry = self.registry.unwrap_or_else(|| Arc::new(base_set()));
        registry.validate()?;
        draft::check_supply(&registry, &self.config)?;
        let victory = self
            .victory
            .unwrap_or_else(|| Box::new(PointThreshold::default()));

        let (state, rng) = match self.resume {
            Some((state, rng)) => {
                if state.player_count() != self.config.player_count {
                    return Err(ConfigError::Invalid(format!(
                        "saved match has {} seats, config has {}",
                        state.player_count(),
                        self.config.player_count
                    )));
                }
                (state, GameRng::from_state(&rng))
            }
            None => {
                let mut rng = GameRng::new(self.config.seed);
                let mut state = MatchState::new(self.config.player_count);
                draft::setup(&mut state, &registry, &self.config, &mut rng);
                (state, rng)
            }
        };

        Ok(Match {
            config: self.config,
            registry,
            victory,
            state,
            rng,
        })
    }
}

impl fmt::Debug for MatchBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchBuilder")
            .field("config", &self.config)
            .field("victory", &self.victory)
            .field("resume", &self.resume.is_some())
            .finish_non_exhaustive()
    }
}

/// One match.
#[derive(Debug)]
pub struct Match {
    config: MatchConfig,
    registry: Arc<CardRegistry>,
    victory: Box<dyn VictoryCondition>,
    state: MatchState,
    rng: GameRng,
}

impl Match {
    /// A freshly dealt match on the base set, ending at 10 points.
    pub fn new(config: MatchConfig) -> Result<Self, ConfigError> {
        MatchBuilder::new(config).build()
    }

    #[must_use]
    pub fn builder(config: MatchConfig) -> MatchBuilder {
        MatchBuilder::new(config)
    }

    #[must_use]
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<CardRegistry> {
        &self.registry
    }

    #[must_use]
    pub fn rng_state(&self) -> GameRngState {
        self.rng.state()
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.state.phase == Phase::GameOver
    }

    /// Final standings, once the match is over.
    #[must_use]
    pub fn standings(&self) -> Option<&Standings> {
        self.state.standings()
    }

    /// Scores as they stand now.
    #[must_use]
    pub fn current_standings(&self) -> Standings {
        victory::standings(&self.state, &self.registry, &self.config)
    }

    /// Decisions blocking the current turn, for every seat.
    #[must_use]
    pub fn pending_decisions(&self) -> Vec<PendingDecision> {
        action::pending_decisions(&self.state, &self.registry)
    }

    pub fn seat_view(&self, seat: PlayerId) -> Result<SeatView, RulesError> {
        SeatView::new(&self.state, &self.registry, &self.config, seat)
    }

    #[cfg(feature = "observer")]
    #[must_use]
    pub fn observer_view(&self) -> ObserverView {
        ObserverView {
            state: self.state.clone(),
            rng: self.rng.state(),
            decisions: self.pending_decisions(),
        }
    }

    /// Apply one command atomically and return the issuing seat's view.
    pub fn submit(&mut self, command: Command) -> Result<SeatView, RulesError> {
        let seat = command.seat();
        let name = command.name();
        let state = self.state.clone();
        let rng = self.rng.clone();

        match self.dispatch(command) {
            Ok(()) => {
                debug!("{}: {} accepted", seat, name);
                self.seat_view(seat)
            }
            Err(err) => {
                debug!("{}: {} rejected: {}", seat, name, err);
                self.state = state;
                self.rng = rng;
                Err(err)
            }
        }
    }

    fn dispatch(&mut self, command: Command) -> Result<(), RulesError> {
        if let Command::StartNewMatch { seat, seed } = command {
            self.state.player(seat)?;
            let seed = seed.unwrap_or_else(|| self.config.seed.wrapping_add(1));
            self.restart(seed);
            return Ok(());
        }
        self.state.player(command.seat())?;
        if self.state.phase == Phase::GameOver {
            return Err(RulesError::GameOver);
        }

        let rules = RulesContext {
            registry: &self.registry,
            config: &self.config,
            victory: &*self.victory,
        };
        let state = &mut self.state;
        match command {
            Command::DraftPick { seat, card } => draft::pick(state, rules.config, seat, card),
            Command::SelectMage { seat, card } => draft::select_mage(state, seat, card),
            Command::SelectMagicItem { seat, card } => {
                draft::select_magic_item(state, rules.config, &mut self.rng, seat, card)
            }
            Command::IncomeSetCollectionChoice { seat, card, take } => {
                income::set_collection_choice(state, seat, card, take)
            }
            Command::IncomeSetChoice { seat, card, resources } => {
                income::set_choice(state, rules.registry, seat, card, resources)
            }
            Command::IncomeWait { seat } => income::wait(state, seat),
            Command::IncomeFinalize { seat } => income::finalize(state, rules.registry, seat),
            Command::PlayCard {
                seat,
                card,
                payment,
                choices,
            } => action::play_card(state, &rules, seat, card, payment, &choices),
            Command::BuyPlaceOfPower { seat, card, payment } => {
                action::buy_place_of_power(state, &rules, seat, card, payment)
            }
            Command::BuyMonument { seat, source, payment } => {
                action::buy_monument(state, &rules, seat, source, payment)
            }
            Command::DiscardForResources { seat, card, reward } => {
                action::discard_for_resources(state, &rules, seat, card, reward)
            }
            Command::UseAbility {
                seat,
                card,
                ability,
                choices,
            } => action::use_ability(state, &rules, seat, card, ability, &choices),
            Command::Pass { seat, magic_item } => action::pass(state, &rules, seat, magic_item),
            Command::RespondToAttack { seat, response } => {
                action::respond_to_attack(state, &rules, seat, response)
            }
            Command::RespondToReaction { seat, response } => {
                action::respond_to_reaction(state, &rules, seat, response)
            }
            Command::RespondToDecision { seat, choice } => {
                action::respond_to_decision(state, &rules, seat, &choice)
            }
            Command::StartNewMatch { .. } => Ok(()),
        }
    }

    fn restart(&mut self, seed: u64) {
        info!("starting a new match with seed {}", seed);
        self.config.seed = seed;
        self.rng = GameRng::new(seed);
        draft::setup(&mut self.state, &self.registry, &self.config, &mut self.rng);
    }

    pub fn draft_pick(&mut self, seat: PlayerId, card: CardId) -> Result<SeatView, RulesError> {
        self.submit(Command::DraftPick { seat, card })
    }

    pub fn select_mage(&mut self, seat: PlayerId, card: CardId) -> Result<SeatView, RulesError> {
        self.submit(Command::SelectMage { seat, card })
    }

    pub fn select_magic_item(
        &mut self,
        seat: PlayerId,
        card: CardId,
    ) -> Result<SeatView, RulesError> {
        self.submit(Command::SelectMagicItem { seat, card })
    }

    pub fn income_set_collection_choice(
        &mut self,
        seat: PlayerId,
        card: CardId,
        take: bool,
    ) -> Result<SeatView, RulesError> {
        self.submit(Command::IncomeSetCollectionChoice { seat, card, take })
    }

    pub fn income_set_choice(
        &mut self,
        seat: PlayerId,
        card: CardId,
        resources: ResourceBag,
    ) -> Result<SeatView, RulesError> {
        self.submit(Command::IncomeSetChoice { seat, card, resources })
    }

    pub fn income_wait(&mut self, seat: PlayerId) -> Result<SeatView, RulesError> {
        self.submit(Command::IncomeWait { seat })
    }

    pub fn income_finalize(&mut self, seat: PlayerId) -> Result<SeatView, RulesError> {
        self.submit(Command::IncomeFinalize { seat })
    }

    pub fn play_card(
        &mut self,
        seat: PlayerId,
        card: CardId,
        payment: Option<ResourceBag>,
        choices: AbilityChoices,
    ) -> Result<SeatView, RulesError> {
        self.submit(Command::PlayCard {
            seat,
            card,
            payment,
            choices,
        })
    }

    pub fn buy_place_of_power(
        &mut self,
        seat: PlayerId,
        card: CardId,
        payment: Option<ResourceBag>,
    ) -> Result<SeatView, RulesError> {
        self.submit(Command::BuyPlaceOfPower { seat, card, payment })
    }

    pub fn buy_monument(
        &mut self,
        seat: PlayerId,
        source: MonumentSource,
        payment: Option<ResourceBag>,
    ) -> Result<SeatView, RulesError> {
        self.submit(Command::BuyMonument { seat, source, payment })
    }

    pub fn discard_for_resources(
        &mut self,
        seat: PlayerId,
        card: CardId,
        reward: ResourceBag,
    ) -> Result<SeatView, RulesError> {
        self.submit(Command::DiscardForResources { seat, card, reward })
    }

    pub fn use_ability(
        &mut self,
        seat: PlayerId,
        card: CardId,
        ability: usize,
        choices: AbilityChoices,
    ) -> Result<SeatView, RulesError> {
        self.submit(Command::UseAbility {
            seat,
            card,
            ability,
            choices,
        })
    }

    pub fn pass(&mut self, seat: PlayerId, magic_item: CardId) -> Result<SeatView, RulesError> {
        self.submit(Command::Pass { seat, magic_item })
    }

    pub fn respond_to_attack(
        &mut self,
        seat: PlayerId,
        response: AttackResponse,
    ) -> Result<SeatView, RulesError> {
        self.submit(Command::RespondToAttack { seat, response })
    }

    pub fn respond_to_reaction(
        &mut self,
        seat: PlayerId,
        response: ReactionResponse,
    ) -> Result<SeatView, RulesError> {
        self.submit(Command::RespondToReaction { seat, response })
    }

    pub fn respond_to_decision(
        &mut self,
        seat: PlayerId,
        choice: Choice,
    ) -> Result<SeatView, RulesError> {
        self.submit(Command::RespondToDecision { seat, choice })
    }

    /// Deal a new match for the same seats. Without a seed the previous
    /// seed plus one is used.
    pub fn start_new_match(
        &mut self,
        seat: PlayerId,
        seed: Option<u64>,
    ) -> Result<SeatView, RulesError> {
        self.submit(Command::StartNewMatch { seat, seed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::victory::RoundLimit;

    fn seat(n: u8) -> PlayerId {
        PlayerId::new(n)
    }

    #[test]
    fn test_same_seed_same_deal() {
        let a = Match::new(MatchConfig::new(3).with_seed(11)).unwrap();
        let b = Match::new(MatchConfig::new(3).with_seed(11)).unwrap();
        assert_eq!(a.state(), b.state());
        assert_eq!(a.rng_state(), b.rng_state());
    }

    #[test]
    fn test_failed_command_changes_nothing() {
        let mut game = Match::new(MatchConfig::new(2).with_seed(5)).unwrap();
        let before = game.state().clone();
        let bogus = CardId::new(9999);

        assert_eq!(game.draft_pick(seat(0), bogus), Err(RulesError::UnknownCard(bogus)));
        assert_eq!(game.state(), &before);
        assert!(matches!(game.income_finalize(seat(0)), Err(RulesError::InvalidPhase { .. })));
        assert_eq!(game.state(), &before);
    }

    #[test]
    fn test_unknown_seat() {
        let mut game = Match::new(MatchConfig::new(2)).unwrap();
        assert_eq!(game.income_wait(seat(4)), Err(RulesError::UnknownSeat(seat(4))));
    }

    #[test]
    fn test_resume_requires_matching_seats() {
        let game = Match::new(MatchConfig::new(2)).unwrap();
        let err = Match::builder(MatchConfig::new(3))
            .resume(game.state().clone(), game.rng_state())
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let resumed = Match::builder(MatchConfig::new(2))
            .victory(RoundLimit(3))
            .resume(game.state().clone(), game.rng_state())
            .build()
            .unwrap();
        assert_eq!(resumed.state(), game.state());
    }

    #[test]
    fn test_start_new_match_bumps_seed() {
        let mut game = Match::new(MatchConfig::new(2).with_seed(1)).unwrap();
        let card = game.state().draft().unwrap().candidates[seat(0)][0];
        game.draft_pick(seat(0), card).unwrap();

        game.start_new_match(seat(1), None).unwrap();
        assert_eq!(game.config().seed, 2);
        assert_eq!(game.state(), Match::new(MatchConfig::new(2).with_seed(2)).unwrap().state());
    }
}
