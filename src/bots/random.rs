//! A uniformly random bot.
//!
//! Candidate commands are tried in random order. When the engine answers
//! `PendingDecisionRequired`, the bot picks one of the listed options, adds
//! it to the command and submits again. Options come from the engine, so
//! a filled-in answer is always legal; a command can still fail for other
//! reasons (cost unpayable, deck empty) and the bot moves on.

use log::debug;

use crate::cards::{CardType, ControlledCard};
use crate::core::{GameRng, Phase, PlayerId, ResourceBag, ResourceType, RulesError};
use crate::effects::{
    AbilityChoices, AttackOption, AttackResponse, Choice, DecisionRequest, DecisionStep,
    PendingDecision, ReactionResponse,
};
use crate::rules::{Command, Match, MonumentSource, SeatView};

/// Follow-up decisions a single command may need.
const MAX_FOLLOW_UPS: usize = 8;

/// The view after an accepted command, or `None` when the seat had nothing
/// to do.
type Acted = Result<Option<SeatView>, RulesError>;

#[derive(Clone, Debug)]
pub struct RandomBot {
    seat: PlayerId,
    rng: GameRng,
    /// Chance of passing at the start of a turn.
    pass_chance: f64,
}

impl RandomBot {
    #[must_use]
    pub fn new(seat: PlayerId, seed: u64) -> Self {
        Self {
            seat,
            rng: GameRng::new(seed).for_context(&format!("bot-{}", seat.index())),
            pass_chance: 0.15,
        }
    }

    #[must_use]
    pub fn with_pass_chance(mut self, chance: f64) -> Self {
        self.pass_chance = chance.clamp(0.0, 1.0);
        self
    }

    #[must_use]
    pub fn seat(&self) -> PlayerId {
        self.seat
    }

    /// Submit one command if this seat has something to do.
    ///
    /// `Ok(None)` means the bot is waiting on another seat.
    pub fn act(&mut self, game: &mut Match) -> Result<Option<SeatView>, RulesError> {
        let view = game.seat_view(self.seat)?;
        if let Some(decision) = view.decisions.first() {
            return self.answer(game, decision).map(Some);
        }
        match view.phase {
            Phase::DraftingRound1 | Phase::DraftingRound2 => self.draft(game, &view),
            Phase::MageSelection => self.select_mage(game, &view),
            Phase::MagicItemSelection => self.select_magic_item(game, &view),
            Phase::Income => self.income(game, &view),
            Phase::Action => self.take_turn(game, &view),
            Phase::Setup | Phase::GameOver => Ok(None),
        }
    }

    fn draft(&mut self, game: &mut Match, view: &SeatView) -> Acted {
        let Some(draft) = &view.draft else {
            return Ok(None);
        };
        let largest = draft.candidate_counts.iter().copied().max().unwrap_or(0);
        if draft.candidates.len() < largest {
            return Ok(None);
        }
        match self.rng.choose(&draft.candidates) {
            Some(&card) => game.draft_pick(self.seat, card).map(Some),
            None => Ok(None),
        }
    }

    fn select_mage(&mut self, game: &mut Match, view: &SeatView) -> Acted {
        let Some(draft) = &view.draft else {
            return Ok(None);
        };
        if draft.selected_mage.is_some() {
            return Ok(None);
        }
        match self.rng.choose(&draft.mage_options) {
            Some(&card) => game.select_mage(self.seat, card).map(Some),
            None => Ok(None),
        }
    }

    fn select_magic_item(&mut self, game: &mut Match, view: &SeatView) -> Acted {
        let my_pick = view.draft.as_ref().and_then(|d| d.item_selector) == Some(self.seat);
        if !my_pick {
            return Ok(None);
        }
        match self.rng.choose(&view.pools.magic_items) {
            Some(&card) => game.select_magic_item(self.seat, card).map(Some),
            None => Ok(None),
        }
    }

    fn income(&mut self, game: &mut Match, view: &SeatView) -> Acted {
        let (Some(income), Some(me)) = (&view.income, view.me()) else {
            return Ok(None);
        };
        if income.finalized[self.seat.index()] {
            return Ok(None);
        }

        // Always collect stored resources.
        let uncollected = controlled(me)
            .filter(|c| !c.resources.is_empty())
            .map(|c| c.card)
            .find(|card| !income.collect.contains(card));
        if let Some(card) = uncollected {
            return game.income_set_collection_choice(self.seat, card, true).map(Some);
        }

        let command = Command::IncomeFinalize { seat: self.seat };
        for _ in 0..MAX_FOLLOW_UPS {
            match game.submit(command.clone()) {
                Err(RulesError::PendingDecisionRequired(decision)) => {
                    let DecisionStep::Income(card) = decision.step else {
                        return Err(RulesError::PendingDecisionRequired(decision));
                    };
                    match self.pick(&decision.request) {
                        Some(Choice::Resources(resources)) => {
                            game.income_set_choice(self.seat, card, resources)?;
                        }
                        _ => return Err(RulesError::PendingDecisionRequired(decision)),
                    }
                }
                other => return other.map(Some),
            }
        }
        Err(RulesError::InvalidChoice("income choices did not settle".to_string()))
    }

    fn take_turn(&mut self, game: &mut Match, view: &SeatView) -> Acted {
        let Some(action) = &view.action else {
            return Ok(None);
        };
        if action.active != self.seat
            || !action.waiting_on.is_empty()
            || action.passed[self.seat.index()]
        {
            return Ok(None);
        }

        if !self.rng.gen_bool(self.pass_chance) {
            let mut candidates = self.candidates(game, view);
            self.rng.shuffle(&mut candidates);
            for command in candidates {
                let name = command.name();
                match self.attempt(game, command) {
                    Ok(view) => return Ok(Some(view)),
                    Err(err) => debug!("{}: {} not possible: {}", self.seat, name, err),
                }
            }
        }

        match self.rng.choose(&view.pools.magic_items) {
            Some(&item) => game.pass(self.seat, item).map(Some),
            None => Ok(None),
        }
    }

    /// Every main action worth trying this turn, without choices filled in.
    fn candidates(&self, game: &Match, view: &SeatView) -> Vec<Command> {
        let seat = self.seat;
        let registry = game.registry();
        let mut commands = Vec::new();

        for &card in &view.hand {
            let playable = registry.get(card).is_some_and(|c| c.card_type == CardType::Artifact);
            if playable {
                commands.push(Command::PlayCard {
                    seat,
                    card,
                    payment: None,
                    choices: AbilityChoices::new(),
                });
            }
            let gold = game.config().discard_gold;
            commands.push(Command::DiscardForResources {
                seat,
                card,
                reward: ResourceBag::of(ResourceType::Gold, gold),
            });
        }
        for &card in &view.pools.places_of_power {
            commands.push(Command::BuyPlaceOfPower {
                seat,
                card,
                payment: None,
            });
        }
        for &card in &view.pools.monuments {
            commands.push(Command::BuyMonument {
                seat,
                source: MonumentSource::FaceUp(card),
                payment: None,
            });
        }
        if view.pools.monument_deck_count > 0 {
            commands.push(Command::BuyMonument {
                seat,
                source: MonumentSource::DeckTop,
                payment: None,
            });
        }
        if let Some(me) = view.me() {
            for controlled in controlled(me) {
                let Some(def) = registry.get(controlled.card) else {
                    continue;
                };
                let usable = def.abilities.iter().enumerate().filter(|(_, a)| !a.is_reaction());
                for (ability, _) in usable {
                    commands.push(Command::UseAbility {
                        seat,
                        card: controlled.card,
                        ability,
                        choices: AbilityChoices::new(),
                    });
                }
            }
        }
        commands
    }

    fn answer(
        &mut self,
        game: &mut Match,
        decision: &PendingDecision,
    ) -> Result<SeatView, RulesError> {
        let seat = self.seat;
        match &decision.request {
            DecisionRequest::AttackResponse { options, .. } => {
                let response = match self.rng.choose(options) {
                    Some(AttackOption::PayNegation(_)) => AttackResponse::PayNegation,
                    Some(AttackOption::React { card, ability }) => AttackResponse::React {
                        card: *card,
                        ability: *ability,
                        choices: AbilityChoices::new(),
                    },
                    Some(AttackOption::Take) | None => AttackResponse::Take { artifact: None },
                };
                let take = response == AttackResponse::Take { artifact: None };
                self.attempt(game, Command::RespondToAttack { seat, response }).or_else(|err| {
                    if take {
                        return Err(err);
                    }
                    self.attempt(
                        game,
                        Command::RespondToAttack {
                            seat,
                            response: AttackResponse::Take { artifact: None },
                        },
                    )
                })
            }
            DecisionRequest::Reaction { options, .. } => {
                let chosen = if self.rng.gen_bool(0.5) {
                    self.rng.choose(options).copied()
                } else {
                    None
                };
                let decline = Command::RespondToReaction {
                    seat,
                    response: ReactionResponse::Decline,
                };
                match chosen {
                    Some(option) => {
                        let response = ReactionResponse::Use {
                            card: option.card,
                            ability: option.ability,
                            choices: AbilityChoices::new(),
                        };
                        self.attempt(game, Command::RespondToReaction { seat, response })
                            .or_else(|_| game.submit(decline))
                    }
                    None => game.submit(decline),
                }
            }
            request => match self.pick(request) {
                Some(choice) => game.respond_to_decision(seat, choice),
                None => Err(RulesError::InvalidChoice(format!("no answer to {:?}", request))),
            },
        }
    }

    /// Submit `command`, filling in requested choices until it resolves.
    fn attempt(&mut self, game: &mut Match, command: Command) -> Result<SeatView, RulesError> {
        let mut command = command;
        for _ in 0..MAX_FOLLOW_UPS {
            match game.submit(command.clone()) {
                Err(RulesError::PendingDecisionRequired(decision)) => {
                    command = self.fill(command, &decision)?;
                }
                other => return other,
            }
        }
        Err(RulesError::InvalidChoice(format!("{} needed too many answers", command.name())))
    }

    fn fill(
        &mut self,
        command: Command,
        decision: &PendingDecision,
    ) -> Result<Command, RulesError> {
        let unanswerable = || RulesError::PendingDecisionRequired(Box::new(decision.clone()));
        let choice = self.pick(&decision.request).ok_or_else(unanswerable)?;
        let step = decision.step;

        let filled = match command {
            Command::PlayCard {
                seat,
                card,
                payment,
                choices,
            } => match (step, choice) {
                (DecisionStep::Payment, Choice::Resources(bag)) => Some(Command::PlayCard {
                    seat,
                    card,
                    payment: Some(bag),
                    choices,
                }),
                (step, choice) => {
                    with_choice(choices, step, choice).map(|choices| Command::PlayCard {
                        seat,
                        card,
                        payment,
                        choices,
                    })
                }
            },
            Command::BuyPlaceOfPower { seat, card, .. } => match (step, choice) {
                (DecisionStep::Payment, Choice::Resources(bag)) => Some(Command::BuyPlaceOfPower {
                    seat,
                    card,
                    payment: Some(bag),
                }),
                _ => None,
            },
            Command::BuyMonument { seat, source, .. } => match (step, choice) {
                (DecisionStep::Payment, Choice::Resources(bag)) => Some(Command::BuyMonument {
                    seat,
                    source,
                    payment: Some(bag),
                }),
                _ => None,
            },
            Command::UseAbility {
                seat,
                card,
                ability,
                choices,
            } => with_choice(choices, step, choice).map(|choices| Command::UseAbility {
                seat,
                card,
                ability,
                choices,
            }),
            Command::RespondToAttack { seat, response } => match (response, choice) {
                (AttackResponse::Take { .. }, Choice::Card(card)) => Some(Command::RespondToAttack {
                    seat,
                    response: AttackResponse::Take { artifact: Some(card) },
                }),
                (AttackResponse::React { card, ability, choices }, choice) => {
                    with_choice(choices, step, choice).map(|choices| Command::RespondToAttack {
                        seat,
                        response: AttackResponse::React { card, ability, choices },
                    })
                }
                _ => None,
            },
            Command::RespondToReaction {
                seat,
                response: ReactionResponse::Use { card, ability, choices },
            } => with_choice(choices, step, choice).map(|choices| Command::RespondToReaction {
                seat,
                response: ReactionResponse::Use { card, ability, choices },
            }),
            _ => None,
        };
        filled.ok_or_else(unanswerable)
    }

    /// A random legal answer, if the request is one a `Choice` answers.
    fn pick(&mut self, request: &DecisionRequest) -> Option<Choice> {
        match request {
            DecisionRequest::Resources { options } => {
                self.rng.choose(options).copied().map(Choice::Resources)
            }
            DecisionRequest::Card { options } => {
                self.rng.choose(options).copied().map(Choice::Card)
            }
            DecisionRequest::Cards { options } => {
                self.rng.choose(options).cloned().map(Choice::Cards)
            }
            DecisionRequest::Order { options, .. } => {
                self.rng.choose(options).cloned().map(Choice::Order)
            }
            DecisionRequest::PlayCard { optional: true, .. } => Some(Choice::Decline),
            DecisionRequest::PlayCard { options, .. } => self
                .rng
                .choose(options)
                .map(|&card| Choice::PlayCard { card, payment: None }),
            DecisionRequest::AttackResponse { .. } | DecisionRequest::Reaction { .. } => None,
        }
    }
}

fn with_choice(
    choices: AbilityChoices,
    step: DecisionStep,
    choice: Choice,
) -> Option<AbilityChoices> {
    match step {
        DecisionStep::Cost(index) => Some(choices.with_cost(index, choice)),
        DecisionStep::Effect(index) => Some(choices.with_effect(index, choice)),
        _ => None,
    }
}

fn controlled(player: &crate::rules::PublicPlayer) -> impl Iterator<Item = &ControlledCard> {
    player
        .mage
        .iter()
        .chain(player.magic_item.iter())
        .chain(player.artifacts.iter())
        .chain(player.monuments.iter())
        .chain(player.places_of_power.iter())
        .chain(player.scrolls.iter())
}
