//! Ability resolution: paying costs and applying effects to match state.
//!
//! The `EffectResolver` interprets the `Cost` and `Effect` data of a card.
//! It knows nothing about phases or turns; `rules::action` decides when an
//! ability may be used and what happens when resolution suspends.
//!
//! ## Modes
//!
//! - `Strict`: a missing choice with several legal answers, or an invalid
//!   one, rejects the command.
//! - `DryRun`: as `Strict`, but attacks and reveals are skipped. Run on a
//!   scratch copy after costs are paid, it proves every up-front choice is
//!   valid before anything is committed.
//! - `Lenient`: resuming after a suspension. A step that became impossible
//!   (its source was destroyed, its answer no longer fits) is skipped with a
//!   warning instead of failing.
//!
//! Every cost and effect validates before it mutates, so a failed step
//! never leaves partial changes behind.

use std::fmt;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::cards::{
    Amount, Card, CardFilter, CardId, CardRegistry, ControlledCard, Cost, Effect, Grant, Price,
    UntapTarget,
};
use crate::core::{
    distributions, InstanceId, MatchState, Player, PlayerId, ResourceBag, ResourceType, RulesError,
};
use crate::stack::{Continuation, Interrupt};
use crate::triggers::GameEvent;

use super::choice::{
    permutations, subsets, AbilityChoices, Choice, DecisionRequest, DecisionStep, PendingDecision,
};
use super::targeting::TargetSelector;

/// How strictly choices are enforced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolveMode {
    Strict,
    DryRun,
    Lenient,
}

/// Facts an ability's costs hand to its effects.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionMemo {
    /// Resources paid by a `PayVariable` cost ("X").
    pub paid: ResourceBag,
    /// Fixed price of the artifact destroyed by a cost.
    pub destroyed_cost: Option<ResourceBag>,
}

/// Who is resolving what.
#[derive(Clone, Copy)]
pub struct ResolverContext<'a> {
    pub registry: &'a CardRegistry,
    pub seat: PlayerId,
    pub source: InstanceId,
    pub card: CardId,
    pub mode: ResolveMode,
}

impl fmt::Debug for ResolverContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverContext")
            .field("seat", &self.seat)
            .field("source", &self.source)
            .field("card", &self.card)
            .field("mode", &self.mode)
            .finish()
    }
}

impl<'a> ResolverContext<'a> {
    /// Strict resolution of an ability of `source`, owned by `seat`.
    #[must_use]
    pub fn new(registry: &'a CardRegistry, seat: PlayerId, source: &ControlledCard) -> Self {
        Self {
            registry,
            seat,
            source: source.instance,
            card: source.card,
            mode: ResolveMode::Strict,
        }
    }

    /// Lenient resolution of a suspended ability.
    #[must_use]
    pub fn resuming(registry: &'a CardRegistry, continuation: &Continuation) -> Self {
        Self {
            registry,
            seat: continuation.seat,
            source: continuation.source,
            card: continuation.card,
            mode: ResolveMode::Lenient,
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: ResolveMode) -> Self {
        self.mode = mode;
        self
    }

    fn ask(&self, step: DecisionStep, request: DecisionRequest) -> RulesError {
        RulesError::pending(PendingDecision::new(self.seat, step, request))
    }

    fn name(&self) -> String {
        self.registry.name_of(self.card)
    }
}

/// Result of running an effect list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveOutcome {
    Complete,
    /// Resolution stopped at an attack or a reveal; `rest` follows it.
    Suspended {
        interrupt: Interrupt,
        rest: Vec<(usize, Effect)>,
    },
}

/// Take the supplied answer if legal, the only legal answer if there is
/// one, or fail.
pub(crate) fn select<T: Clone + PartialEq + fmt::Debug>(
    supplied: Option<T>,
    mut options: Vec<T>,
    none: impl FnOnce() -> RulesError,
    ask: impl FnOnce(Vec<T>) -> RulesError,
) -> Result<T, RulesError> {
    match supplied {
        Some(choice) if options.contains(&choice) => Ok(choice),
        Some(choice) => {
            Err(RulesError::InvalidChoice(format!("{:?} is not a legal answer", choice)))
        }
        None => match options.len() {
            0 => Err(none()),
            1 => Ok(options.remove(0)),
            _ => Err(ask(options)),
        },
    }
}

fn resources_choice(choice: Option<&Choice>) -> Result<Option<ResourceBag>, RulesError> {
    match choice {
        None => Ok(None),
        Some(Choice::Resources(bag)) => Ok(Some(*bag)),
        Some(other) => {
            Err(RulesError::InvalidChoice(format!("expected resources, got {:?}", other)))
        }
    }
}

fn card_choice(choice: Option<&Choice>) -> Result<Option<CardId>, RulesError> {
    match choice {
        None => Ok(None),
        Some(Choice::Card(card)) => Ok(Some(*card)),
        Some(other) => Err(RulesError::InvalidChoice(format!("expected a card, got {:?}", other))),
    }
}

fn sorted(cards: &[CardId]) -> Vec<CardId> {
    let mut cards = cards.to_vec();
    cards.sort();
    cards
}

/// Price of `card` for `player` after passive cost reductions.
#[must_use]
pub fn effective_price(player: &Player, registry: &CardRegistry, card: &Card) -> Price {
    let reduction: u32 = player
        .controlled()
        .filter_map(|c| registry.get(c.card))
        .flat_map(|def| def.cost_reductions.iter())
        .filter(|r| card.has_tag(&r.tag))
        .map(|r| r.amount)
        .sum();
    card.price.reduced_by(reduction)
}

/// Pay `price` from `pool`, resolving wildcard slots with `payment`.
///
/// Returns everything paid. Nothing is removed unless the whole price can
/// be paid.
pub fn pay_price(
    seat: PlayerId,
    pool: &mut ResourceBag,
    price: &Price,
    payment: Option<ResourceBag>,
) -> Result<ResourceBag, RulesError> {
    if !pool.contains(&price.fixed) {
        return Err(RulesError::InsufficientResources {
            needed: price.fixed,
            available: *pool,
        });
    }
    let mut remaining = *pool;
    remaining.remove_bag(&price.fixed);

    let wild = price.any_non_gold;
    let wildcards = if wild == 0 {
        match payment {
            Some(bag) if !bag.is_empty() => {
                return Err(RulesError::InvalidChoice(format!("{} has no wildcard slots", price)));
            }
            _ => ResourceBag::new(),
        }
    } else {
        match payment {
            Some(bag) => {
                if bag.get(ResourceType::Gold) > 0 || bag.total() != wild {
                    return Err(RulesError::InvalidChoice(format!(
                        "wildcards take exactly {} non-gold, got {}",
                        wild, bag
                    )));
                }
                if !remaining.contains(&bag) {
                    return Err(RulesError::InsufficientResources {
                        needed: price.fixed + bag,
                        available: *pool,
                    });
                }
                bag
            }
            None => select(
                None,
                distributions(wild, &ResourceType::ELEMENTAL, Some(&remaining)),
                || RulesError::InsufficientResources {
                    needed: price.fixed,
                    available: *pool,
                },
                |options| {
                    RulesError::pending(PendingDecision::new(
                        seat,
                        DecisionStep::Payment,
                        DecisionRequest::Resources { options },
                    ))
                },
            )?,
        }
    };

    let paid = price.fixed + wildcards;
    pool.remove_bag(&paid);
    Ok(paid)
}

/// Every legal payment of a `PayVariable` cost from `pool`.
fn variable_payments(pool: &ResourceBag, cost: &Cost) -> Vec<ResourceBag> {
    let Cost::PayVariable {
        min,
        max,
        filter,
        single_type,
    } = cost
    else {
        return Vec::new();
    };
    let types = filter.types();
    (*min..=*max)
        .flat_map(|x| distributions(x, &types, Some(pool)))
        .filter(|bag| !single_type || bag.distinct_types() <= 1)
        .collect()
}

/// Applies costs and effects of abilities.
pub struct EffectResolver;

impl EffectResolver {
    /// Pay every cost in order.
    pub fn pay_costs(
        state: &mut MatchState,
        ctx: &ResolverContext<'_>,
        costs: &[Cost],
        choices: &AbilityChoices,
        memo: &mut ResolutionMemo,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), RulesError> {
        for (index, cost) in costs.iter().enumerate() {
            Self::pay_cost(state, ctx, index, cost, choices.cost(index), memo, events)?;
        }
        Ok(())
    }

    /// Could `seat` pay `costs` for `source` right now, given suitable choices?
    #[must_use]
    pub fn can_pay(state: &MatchState, ctx: &ResolverContext<'_>, costs: &[Cost]) -> bool {
        let mut scratch = state.clone();
        let result = Self::pay_costs(
            &mut scratch,
            ctx,
            costs,
            &AbilityChoices::new(),
            &mut ResolutionMemo::default(),
            &mut Vec::new(),
        );
        matches!(result, Ok(()) | Err(RulesError::PendingDecisionRequired(_)))
    }

    fn pay_cost(
        state: &mut MatchState,
        ctx: &ResolverContext<'_>,
        index: usize,
        cost: &Cost,
        choice: Option<&Choice>,
        memo: &mut ResolutionMemo,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), RulesError> {
        let registry = ctx.registry;
        let seat = ctx.seat;
        let player = state.player_mut(seat)?;

        match cost {
            Cost::Tap => {
                let card = player
                    .find_instance_mut(ctx.source)
                    .ok_or(RulesError::UnknownCard(ctx.card))?;
                if card.tapped {
                    return Err(RulesError::UnpayableCost(format!("{} is tapped", ctx.name())));
                }
                card.tapped = true;
            }
            Cost::Pay(bag) => {
                if !player.resources.contains(bag) {
                    return Err(RulesError::InsufficientResources {
                        needed: *bag,
                        available: player.resources,
                    });
                }
                player.resources.remove_bag(bag);
            }
            Cost::PayVariable { min, max, .. } => {
                let options = variable_payments(&player.resources, cost);
                let bag = select(
                    resources_choice(choice)?,
                    options,
                    || {
                        let msg = format!("cannot pay {} to {} resources", min, max);
                        RulesError::UnpayableCost(msg)
                    },
                    |options| {
                        ctx.ask(DecisionStep::Cost(index), DecisionRequest::Resources { options })
                    },
                )?;
                player.resources.remove_bag(&bag);
                memo.paid = bag;
            }
            Cost::RemoveFromCard(bag) => {
                let card = player
                    .find_instance_mut(ctx.source)
                    .ok_or(RulesError::UnknownCard(ctx.card))?;
                if !card.resources.contains(bag) {
                    return Err(RulesError::InsufficientResources {
                        needed: *bag,
                        available: card.resources,
                    });
                }
                card.resources.remove_bag(bag);
            }
            Cost::DestroySelf => {
                if !player.artifacts.iter().any(|c| c.instance == ctx.source) {
                    return Err(RulesError::UnpayableCost(format!(
                        "{} is not an artifact in play",
                        ctx.name()
                    )));
                }
                Self::destroy_artifact(player, registry, ctx.source, memo, events)?;
            }
            Cost::DestroyArtifact { filter } => {
                let options = TargetSelector::artifacts(registry, filter.clone())
                    .excluding(ctx.source)
                    .valid_targets(player);
                let target = select(
                    card_choice(choice)?,
                    options,
                    || RulesError::UnpayableCost("no artifact to destroy".to_string()),
                    |options| ctx.ask(DecisionStep::Cost(index), DecisionRequest::Card { options }),
                )?;
                let instance = player
                    .artifacts
                    .iter()
                    .find(|c| c.card == target)
                    .map(|c| c.instance)
                    .ok_or(RulesError::UnknownCard(target))?;
                Self::destroy_artifact(player, registry, instance, memo, events)?;
            }
            Cost::Discard { count } => {
                let count = *count as usize;
                let hand: Vec<CardId> = player.hand.iter().copied().collect();
                if hand.len() < count {
                    return Err(RulesError::UnpayableCost(format!(
                        "need {} cards in hand to discard, have {}",
                        count,
                        hand.len()
                    )));
                }
                let chosen = match choice {
                    Some(Choice::Cards(cards)) => {
                        let legal = cards.len() == count
                            && subsets(&hand, count).iter().any(|s| sorted(s) == sorted(cards));
                        if !legal {
                            return Err(RulesError::InvalidChoice(format!(
                                "{:?} is not {} cards from hand",
                                cards, count
                            )));
                        }
                        cards.clone()
                    }
                    Some(other) => {
                        return Err(RulesError::InvalidChoice(format!(
                            "expected cards, got {:?}",
                            other
                        )));
                    }
                    None if hand.len() == count => hand,
                    None => {
                        return Err(ctx.ask(
                            DecisionStep::Cost(index),
                            DecisionRequest::Cards {
                                options: subsets(&hand, count),
                            },
                        ));
                    }
                };
                for card in chosen {
                    player.take_from_hand(card);
                    player.discard.push_back(card);
                }
            }
            Cost::TapCard { filter } => {
                let options = TargetSelector::controlled(registry, filter.clone())
                    .untapped()
                    .excluding(ctx.source)
                    .valid_targets(player);
                let target = select(
                    card_choice(choice)?,
                    options,
                    || RulesError::UnpayableCost("no untapped card to tap".to_string()),
                    |options| ctx.ask(DecisionStep::Cost(index), DecisionRequest::Card { options }),
                )?;
                if let Some(card) = player.find_controlled_mut(target) {
                    card.tapped = true;
                }
            }
        }
        debug!("{} paid cost {} of {}: {:?}", seat, index, ctx.name(), cost);
        Ok(())
    }

    fn destroy_artifact(
        player: &mut Player,
        registry: &CardRegistry,
        instance: InstanceId,
        memo: &mut ResolutionMemo,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), RulesError> {
        let destroyed = Self::remove_artifact(player, instance)?;
        memo.destroyed_cost = Some(registry.lookup(destroyed)?.price.fixed);
        events.push(GameEvent::ArtifactDestroyed {
            owner: player.id,
            card: destroyed,
        });
        Ok(())
    }

    /// Move an artifact to its owner's discard pile. Stored resources leave play.
    pub(crate) fn remove_artifact(
        player: &mut Player,
        instance: InstanceId,
    ) -> Result<CardId, RulesError> {
        let removed = player.remove_artifact(instance).ok_or_else(|| {
            RulesError::InvalidTarget(format!("{} is not an artifact in play", instance))
        })?;
        if !removed.resources.is_empty() {
            debug!("{} loses {} stored on {}", player.id, removed.resources, removed.card);
        }
        player.discard.push_back(removed.card);
        Ok(removed.card)
    }

    /// Run `effects` in order until done or suspended.
    pub fn run_effects(
        state: &mut MatchState,
        ctx: &ResolverContext<'_>,
        effects: Vec<(usize, Effect)>,
        choices: &AbilityChoices,
        memo: &mut ResolutionMemo,
        events: &mut Vec<GameEvent>,
    ) -> Result<ResolveOutcome, RulesError> {
        let mut queue = effects.into_iter();
        while let Some((index, effect)) = queue.next() {
            let choice = choices.effect(index);
            match Self::apply_effect(state, ctx, index, &effect, choice, memo, events) {
                Ok(None) => {}
                Ok(Some(interrupt)) => {
                    return Ok(ResolveOutcome::Suspended {
                        interrupt,
                        rest: queue.collect(),
                    });
                }
                Err(err) if ctx.mode == ResolveMode::Lenient => {
                    warn!("{}: effect {} of {} skipped: {}", ctx.seat, index, ctx.name(), err);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(ResolveOutcome::Complete)
    }

    /// Index every effect of an ability.
    #[must_use]
    pub fn indexed(effects: &[Effect]) -> Vec<(usize, Effect)> {
        effects.iter().cloned().enumerate().collect()
    }

    fn grant(
        state: &MatchState,
        ctx: &ResolverContext<'_>,
        index: usize,
        grant: &Grant,
        choice: Option<&Choice>,
        memo: &ResolutionMemo,
    ) -> Result<ResourceBag, RulesError> {
        match grant {
            Grant::Fixed(bag) => Ok(*bag),
            Grant::PerOpponent(bag) => {
                Ok(bag.scaled(state.player_count().saturating_sub(1) as u32))
            }
            Grant::DestroyedCost => Ok(memo.destroyed_cost.unwrap_or_default()),
            Grant::Choice {
                count,
                filter,
                single_type,
                different_from_paid,
            } => {
                let total = match count {
                    Amount::Fixed(n) => *n,
                    Amount::PaidX => memo.paid.total(),
                };
                if total == 0 {
                    return Ok(ResourceBag::new());
                }
                let forbidden = |r: ResourceType| *different_from_paid && memo.paid.get(r) > 0;
                let supplied = resources_choice(choice)?;
                if let Some(bag) = supplied {
                    if bag.iter().any(|(r, _)| forbidden(r)) {
                        return Err(RulesError::InvalidChoice(format!(
                            "{} must differ from the paid {}",
                            bag, memo.paid
                        )));
                    }
                }
                let types: Vec<ResourceType> =
                    filter.types().into_iter().filter(|r| !forbidden(*r)).collect();
                let options = distributions(total, &types, None)
                    .into_iter()
                    .filter(|bag| !single_type || bag.distinct_types() <= 1)
                    .collect();
                select(
                    supplied,
                    options,
                    || RulesError::InvalidChoice("no resource type left to gain".to_string()),
                    |options| {
                        ctx.ask(DecisionStep::Effect(index), DecisionRequest::Resources { options })
                    },
                )
            }
        }
    }

    fn apply_effect(
        state: &mut MatchState,
        ctx: &ResolverContext<'_>,
        index: usize,
        effect: &Effect,
        choice: Option<&Choice>,
        memo: &mut ResolutionMemo,
        events: &mut Vec<GameEvent>,
    ) -> Result<Option<Interrupt>, RulesError> {
        let registry = ctx.registry;
        let seat = ctx.seat;
        let player_count = state.player_count();
        let step = DecisionStep::Effect(index);

        match effect {
            Effect::Gain(grant) => {
                let bag = Self::grant(state, ctx, index, grant, choice, memo)?;
                state.player_mut(seat)?.resources += bag;
            }
            Effect::AddToCard(grant) => {
                let bag = Self::grant(state, ctx, index, grant, choice, memo)?;
                let card = state
                    .player_mut(seat)?
                    .find_instance_mut(ctx.source)
                    .ok_or_else(|| {
                        RulesError::InvalidTarget(format!("{} is no longer in play", ctx.name()))
                    })?;
                card.resources += bag;
            }
            Effect::Convert { limit, rate } => {
                let rate = (*rate).max(1);
                let player = state.player_mut(seat)?;
                let available = player.resources.non_gold_total();
                let mut amount = limit.map_or(available, |l| l.min(available));
                amount -= amount % rate;
                if amount == 0 {
                    debug!("{}: nothing to convert", seat);
                    return Ok(None);
                }
                let options =
                    distributions(amount, &ResourceType::ELEMENTAL, Some(&player.resources));
                let bag = select(
                    resources_choice(choice)?,
                    options,
                    || RulesError::InvalidChoice("nothing to convert".to_string()),
                    |options| ctx.ask(step, DecisionRequest::Resources { options }),
                )?;
                player.resources.remove_bag(&bag);
                player.resources.add_count(ResourceType::Gold, amount / rate);
            }
            Effect::Draw(count) => {
                let drawn = state.player_mut(seat)?.draw(*count);
                if drawn < *count {
                    warn!("{}: deck ran out, drew {} of {}", seat, drawn, count);
                }
            }
            Effect::DrawThenDiscard { draw, discard } => {
                if ctx.mode == ResolveMode::DryRun {
                    return Ok(None);
                }
                let player = state.player_mut(seat)?;
                let drawn = player.draw(*draw);
                if drawn < *draw {
                    warn!("{}: deck ran out, drew {} of {}", seat, drawn, draw);
                }
                let hand: Vec<CardId> = player.hand.iter().copied().collect();
                let count = (*discard as usize).min(hand.len());
                if count == 0 {
                    return Ok(None);
                }
                if count == hand.len() {
                    for card in hand {
                        player.take_from_hand(card);
                        player.discard.push_back(card);
                    }
                    return Ok(None);
                }
                return Ok(Some(Interrupt::Reveal(PendingDecision::new(
                    seat,
                    step,
                    DecisionRequest::Cards {
                        options: subsets(&hand, count),
                    },
                ))));
            }
            Effect::ReorderDeck(count) => {
                if ctx.mode == ResolveMode::DryRun {
                    return Ok(None);
                }
                let player = state.player(seat)?;
                let window = (*count as usize).min(player.deck.len());
                if window < 2 {
                    return Ok(None);
                }
                let cards: Vec<CardId> = player.deck.iter().take(window).copied().collect();
                return Ok(Some(Interrupt::Reveal(PendingDecision::new(
                    seat,
                    step,
                    DecisionRequest::Order {
                        cards,
                        options: permutations(window),
                    },
                ))));
            }
            Effect::Untap(UntapTarget::SelfCard) => {
                let card = state
                    .player_mut(seat)?
                    .find_instance_mut(ctx.source)
                    .ok_or_else(|| {
                        RulesError::InvalidTarget(format!("{} is no longer in play", ctx.name()))
                    })?;
                card.tapped = false;
            }
            Effect::Untap(UntapTarget::Card(filter)) => {
                let player = state.player_mut(seat)?;
                let options = TargetSelector::controlled(registry, filter.clone())
                    .tapped()
                    .excluding(ctx.source)
                    .valid_targets(player);
                if options.is_empty() {
                    warn!("{}: no tapped card to untap", seat);
                    return Ok(None);
                }
                let target = select(
                    card_choice(choice)?,
                    options,
                    || RulesError::InvalidTarget("no tapped card".to_string()),
                    |options| ctx.ask(step, DecisionRequest::Card { options }),
                )?;
                if let Some(card) = player.find_controlled_mut(target) {
                    card.tapped = false;
                }
            }
            Effect::Attack(attack) => {
                if ctx.mode == ResolveMode::DryRun {
                    return Ok(None);
                }
                let pending: Vec<PlayerId> =
                    seat.turn_order(player_count).into_iter().skip(1).collect();
                events.push(GameEvent::AttackDeclared {
                    attacker: seat,
                    source: ctx.card,
                });
                return Ok(Some(Interrupt::Attack {
                    attacker: seat,
                    source: ctx.card,
                    attack: attack.clone(),
                    pending,
                }));
            }
            Effect::GiveOpponents(bag) => {
                for (id, player) in state.players.iter_mut() {
                    if id != seat {
                        player.resources += *bag;
                    }
                }
            }
            Effect::PlayCard { filter, discount } => {
                let player = state.player(seat)?;
                let options = TargetSelector::hand(registry, filter.clone()).valid_targets(player);
                let (card, payment) = match choice {
                    Some(Choice::Decline) => return Ok(None),
                    Some(Choice::PlayCard { card, payment }) => {
                        if !options.contains(card) {
                            return Err(RulesError::InvalidChoice(format!(
                                "{} cannot be played by {}",
                                registry.name_of(*card),
                                ctx.name()
                            )));
                        }
                        (*card, *payment)
                    }
                    Some(other) => {
                        return Err(RulesError::InvalidChoice(format!(
                            "expected a card to play, got {:?}",
                            other
                        )));
                    }
                    None if options.is_empty() => {
                        debug!("{}: nothing to play", seat);
                        return Ok(None);
                    }
                    None => {
                        return Err(ctx.ask(
                            step,
                            DecisionRequest::PlayCard {
                                options,
                                optional: true,
                            },
                        ));
                    }
                };
                Self::play_from_hand(state, registry, seat, card, payment, *discount, filter)?;
            }
        }
        Ok(None)
    }

    fn play_from_hand(
        state: &mut MatchState,
        registry: &CardRegistry,
        seat: PlayerId,
        card: CardId,
        payment: Option<ResourceBag>,
        discount: u32,
        filter: &CardFilter,
    ) -> Result<(), RulesError> {
        let def = registry.lookup(card)?;
        if !filter.matches(def) {
            return Err(RulesError::InvalidTarget(def.name.clone()));
        }
        let price = effective_price(state.player(seat)?, registry, def).reduced_by(discount);
        let player = state.player_mut(seat)?;
        pay_price(seat, &mut player.resources, &price, payment)?;
        player.take_from_hand(card);
        let entering = state.enter_play(card);
        state.player_mut(seat)?.artifacts.push_back(entering);
        debug!("{} put {} into play for {}", seat, def.name, price);
        Ok(())
    }

    /// Apply the owner's answer to a reveal decision.
    pub fn answer_reveal(
        state: &mut MatchState,
        decision: &PendingDecision,
        choice: &Choice,
    ) -> Result<(), RulesError> {
        let player = state.player_mut(decision.seat)?;
        match (&decision.request, choice) {
            (DecisionRequest::Cards { options }, Choice::Cards(cards)) => {
                if !options.iter().any(|o| sorted(o) == sorted(cards)) {
                    return Err(RulesError::InvalidChoice(format!(
                        "{:?} is not a legal discard",
                        cards
                    )));
                }
                for card in cards {
                    player.take_from_hand(*card);
                    player.discard.push_back(*card);
                }
            }
            (DecisionRequest::Order { cards, .. }, Choice::Order(order)) => {
                if !super::choice::is_permutation(order, cards.len()) {
                    return Err(RulesError::InvalidChoice(format!(
                        "{:?} does not reorder {} cards",
                        order,
                        cards.len()
                    )));
                }
                let top: Vec<CardId> = player.deck.iter().take(cards.len()).copied().collect();
                if top != *cards {
                    return Err(RulesError::InvalidTarget(
                        "the top of the deck changed".to_string(),
                    ));
                }
                for _ in 0..cards.len() {
                    player.deck.pop_front();
                }
                for &i in order.iter().rev() {
                    player.deck.push_front(cards[i]);
                }
            }
            (request, other) => {
                return Err(RulesError::InvalidChoice(format!(
                    "{:?} does not answer {:?}",
                    other, request
                )));
            }
        }
        Ok(())
    }
}
