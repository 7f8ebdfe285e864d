//! The Action phase: the turn loop, abilities and the interrupt protocol.
//!
//! ## Turns
//!
//! One seat acts at a time. Playing a card, buying a place of power or a
//! monument, discarding for resources, using an ability and passing each
//! end the turn; the next seat in clockwise order that has not passed
//! acts next. When every seat has passed the round ends.
//!
//! ## Activation
//!
//! An ability's costs are paid first. Its effects are then run once on a
//! scratch copy with attacks and reveals skipped, so a bad or missing
//! choice rejects the whole command before anything is committed.
//! Resolution for real may suspend:
//!
//! - an `ArtifactDestroyed` event opens a reaction window,
//! - an attack waits on every defender,
//! - a reveal waits on its owner.
//!
//! Suspensions go on the interrupt stack with the rest of the ability as a
//! continuation. Responses answer the top entry; once it is answered the
//! continuation resumes. The turn ends when the stack is empty.

use log::{debug, info};

use crate::cards::{
    Attack, AttackOutcome, CardFilter, CardId, CardRegistry, CardType, Cost, Effect,
    ReactionTrigger,
};
use crate::core::{
    ActionState, MatchState, Phase, PhaseState, PlayerId, ResourceBag, ResourceType, RulesError,
};
use crate::effects::{
    effective_price, pay_price, select, AbilityChoices, AttackOption, AttackResponse, Choice,
    DecisionRequest, DecisionStep, EffectResolver, PendingDecision, ReactionOption,
    ReactionResponse, ResolutionMemo, ResolveMode, ResolveOutcome, ResolverContext,
    TargetSelector,
};
use crate::stack::{Continuation, Interrupt, InterruptStack};
use crate::triggers::{eligible_reactions, reacting_seats, GameEvent};

use super::command::MonumentSource;
use super::engine::RulesContext;
use super::{income, victory};

fn action_state<'a>(
    state: &'a MatchState,
    command: &'static str,
) -> Result<&'a ActionState, RulesError> {
    state.action().ok_or(RulesError::phase(state.phase, command))
}

fn stack_mut(state: &mut MatchState) -> Result<&mut InterruptStack, RulesError> {
    let phase = state.phase;
    state
        .action_mut()
        .map(|a| &mut a.stack)
        .ok_or(RulesError::phase(phase, "resolve"))
}

/// May `seat` take a main action right now?
fn take_turn(state: &MatchState, seat: PlayerId, command: &'static str) -> Result<(), RulesError> {
    let action = action_state(state, command)?;
    if let Some(top) = action.stack.top() {
        return Err(RulesError::NotYourTurn {
            seat,
            waiting_on: top.interrupt.waiting_on().first().copied(),
        });
    }
    if action.passed[seat] {
        return Err(RulesError::AlreadyPassed(seat));
    }
    if action.active != seat {
        return Err(RulesError::NotYourTurn {
            seat,
            waiting_on: Some(action.active),
        });
    }
    Ok(())
}

/// Pay costs, validate effects on a scratch copy, then resolve.
fn activate(
    state: &mut MatchState,
    ctx: ResolverContext<'_>,
    costs: &[Cost],
    effects: &[Effect],
    choices: &AbilityChoices,
) -> Result<(), RulesError> {
    let mut memo = ResolutionMemo::default();
    let mut events = Vec::new();
    EffectResolver::pay_costs(state, &ctx, costs, choices, &mut memo, &mut events)?;

    let effects = EffectResolver::indexed(effects);
    let mut scratch = state.clone();
    EffectResolver::run_effects(
        &mut scratch,
        &ctx.with_mode(ResolveMode::DryRun),
        effects.clone(),
        choices,
        &mut memo.clone(),
        &mut Vec::new(),
    )?;

    let continuation = Continuation {
        seat: ctx.seat,
        source: ctx.source,
        card: ctx.card,
        effects,
        choices: choices.clone(),
        memo,
    };
    match open_windows(state, ctx.registry, &events, Some(continuation))? {
        Some(continuation) => resume(state, ctx.registry, continuation, ctx.mode),
        None => Ok(()),
    }
}

/// Push a reaction window for every destroyed artifact someone can answer.
///
/// The first window pushed carries `then`; it is handed back when no window
/// opens.
fn open_windows(
    state: &mut MatchState,
    registry: &CardRegistry,
    events: &[GameEvent],
    then: Option<Continuation>,
) -> Result<Option<Continuation>, RulesError> {
    let mut windows = Vec::new();
    for event in events {
        debug!("event: {}", event);
        if let GameEvent::ArtifactDestroyed { owner, card } = event {
            let pending = reacting_seats(state, registry, event);
            if !pending.is_empty() {
                windows.push(Interrupt::Reactions {
                    destroyed: *card,
                    owner: *owner,
                    pending,
                });
            }
        }
    }

    let mut then = then;
    let stack = stack_mut(state)?;
    for window in windows {
        let id = stack.push(window, then.take());
        debug!("{} opened a reaction window", id);
    }
    Ok(then)
}

/// Run the rest of a suspended ability.
fn resume(
    state: &mut MatchState,
    registry: &CardRegistry,
    continuation: Continuation,
    mode: ResolveMode,
) -> Result<(), RulesError> {
    let ctx = ResolverContext::resuming(registry, &continuation).with_mode(mode);
    let Continuation {
        effects,
        choices,
        mut memo,
        ..
    } = continuation;

    let mut events = Vec::new();
    let outcome =
        EffectResolver::run_effects(state, &ctx, effects, &choices, &mut memo, &mut events)?;
    for event in &events {
        debug!("event: {}", event);
    }

    if let ResolveOutcome::Suspended { interrupt, rest } = outcome {
        let next = (!rest.is_empty()).then(|| Continuation {
            seat: ctx.seat,
            source: ctx.source,
            card: ctx.card,
            effects: rest,
            choices,
            memo,
        });
        let id = stack_mut(state)?.push(interrupt, next);
        debug!("{} suspended {}", id, registry.name_of(ctx.card));
    }
    Ok(())
}

/// Pop answered entries, resuming their continuations. An empty stack ends
/// the turn.
fn settle(state: &mut MatchState, rules: &RulesContext<'_>) -> Result<(), RulesError> {
    loop {
        let stack = stack_mut(state)?;
        match stack.top() {
            None => return end_turn(state, rules),
            Some(top) if !top.interrupt.is_answered() => return Ok(()),
            Some(_) => {}
        }
        if let Some(entry) = stack.pop() {
            debug!("{} answered", entry.id);
            if let Some(continuation) = entry.continuation {
                resume(state, rules.registry, continuation, ResolveMode::Lenient)?;
            }
        }
    }
}

fn end_turn(state: &mut MatchState, rules: &RulesContext<'_>) -> Result<(), RulesError> {
    let seats = state.player_count();
    let phase = state.phase;
    let action = state.action_mut().ok_or(RulesError::phase(phase, "end_turn"))?;
    let order = action.active.turn_order(seats);
    let next = order
        .iter()
        .skip(1)
        .chain(order.first())
        .find(|s| !action.passed[**s])
        .copied();

    match next {
        Some(seat) => {
            action.active = seat;
            debug!("{}'s turn", seat);
            Ok(())
        }
        None => end_round(state, rules),
    }
}

fn end_round(state: &mut MatchState, rules: &RulesContext<'_>) -> Result<(), RulesError> {
    for (_, player) in state.players.iter_mut() {
        player.untap_all();
        if player.has_first_player_token {
            player.token_face_up = true;
        }
    }

    let standings = victory::standings(state, rules.registry, rules.config);
    info!("round {} over", state.round);
    if rules.victory.is_met(state, &standings.entries) {
        info!("match over: {:?} win", standings.winners);
        state.phase = Phase::GameOver;
        state.sub = PhaseState::GameOver(standings);
    } else {
        income::begin_round(state);
    }
    Ok(())
}

/// Play a card from hand.
pub(crate) fn play_card(
    state: &mut MatchState,
    rules: &RulesContext<'_>,
    seat: PlayerId,
    card: CardId,
    payment: Option<ResourceBag>,
    choices: &AbilityChoices,
) -> Result<(), RulesError> {
    take_turn(state, seat, "play_card")?;
    let registry = rules.registry;
    let player = state.player(seat)?;
    if !player.hand.contains(&card) {
        return Err(RulesError::UnknownCard(card));
    }
    let def = registry.lookup(card)?;
    if def.card_type != CardType::Artifact {
        return Err(RulesError::InvalidTarget(format!("{} cannot be played from hand", def.name)));
    }
    let price = effective_price(player, registry, def);

    let player = state.player_mut(seat)?;
    let paid = pay_price(seat, &mut player.resources, &price, payment)?;
    player.take_from_hand(card);
    let entering = state.enter_play(card);
    state.player_mut(seat)?.artifacts.push_back(entering.clone());
    debug!("{} played {} for {}", seat, def.name, paid);

    if !def.on_play.is_empty() {
        let ctx = ResolverContext::new(registry, seat, &entering);
        activate(state, ctx, &[], &def.on_play, choices)?;
    }
    settle(state, rules)
}

/// Buy a place of power from the shared pool.
pub(crate) fn buy_place_of_power(
    state: &mut MatchState,
    rules: &RulesContext<'_>,
    seat: PlayerId,
    card: CardId,
    payment: Option<ResourceBag>,
) -> Result<(), RulesError> {
    take_turn(state, seat, "buy_place_of_power")?;
    let index = state
        .pools
        .places_of_power
        .iter()
        .position(|c| *c == card)
        .ok_or(RulesError::UnknownCard(card))?;
    let def = rules.registry.lookup(card)?;

    let player = state.player_mut(seat)?;
    let paid = pay_price(seat, &mut player.resources, &def.price, payment)?;
    state.pools.places_of_power.remove(index);
    let entering = state.enter_play(card);
    state.player_mut(seat)?.places_of_power.push_back(entering);
    debug!("{} bought {} for {}", seat, def.name, paid);
    settle(state, rules)
}

/// Buy a face-up monument or the top of the monument deck.
pub(crate) fn buy_monument(
    state: &mut MatchState,
    rules: &RulesContext<'_>,
    seat: PlayerId,
    source: MonumentSource,
    payment: Option<ResourceBag>,
) -> Result<(), RulesError> {
    take_turn(state, seat, "buy_monument")?;
    let (card, face_up) = match source {
        MonumentSource::FaceUp(card) => {
            let index = state
                .pools
                .monuments
                .iter()
                .position(|c| *c == card)
                .ok_or(RulesError::UnknownCard(card))?;
            (card, Some(index))
        }
        MonumentSource::DeckTop => {
            let top = state
                .pools
                .monument_deck
                .front()
                .copied()
                .ok_or_else(|| {
                    RulesError::InvalidTarget("the monument deck is empty".to_string())
                })?;
            (top, None)
        }
    };
    let def = rules.registry.lookup(card)?;

    let player = state.player_mut(seat)?;
    let paid = pay_price(seat, &mut player.resources, &def.price, payment)?;
    match face_up {
        Some(index) => {
            state.pools.monuments.remove(index);
            if let Some(refill) = state.pools.monument_deck.pop_front() {
                state.pools.monuments.push_back(refill);
            }
        }
        None => {
            state.pools.monument_deck.pop_front();
        }
    }
    let entering = state.enter_play(card);
    state.player_mut(seat)?.monuments.push_back(entering);
    debug!("{} bought {} for {}", seat, def.name, paid);
    settle(state, rules)
}

/// Discard a hand card for gold or non-gold resources.
pub(crate) fn discard_for_resources(
    state: &mut MatchState,
    rules: &RulesContext<'_>,
    seat: PlayerId,
    card: CardId,
    reward: ResourceBag,
) -> Result<(), RulesError> {
    take_turn(state, seat, "discard_for_resources")?;
    let config = rules.config;
    let as_gold = config.discard_gold > 0
        && reward == ResourceBag::of(ResourceType::Gold, config.discard_gold);
    let as_non_gold = config.discard_non_gold > 0
        && reward.get(ResourceType::Gold) == 0
        && reward.total() == config.discard_non_gold;
    if !as_gold && !as_non_gold {
        return Err(RulesError::InvalidChoice(format!(
            "discarding gives {} gold or {} non-gold, not {}",
            config.discard_gold, config.discard_non_gold, reward
        )));
    }

    let player = state.player_mut(seat)?;
    player.take_from_hand(card).ok_or(RulesError::UnknownCard(card))?;
    player.discard.push_back(card);
    player.resources += reward;
    debug!("{} discarded {} for {}", seat, card, reward);
    settle(state, rules)
}

/// Use an activated ability of a controlled card.
pub(crate) fn use_ability(
    state: &mut MatchState,
    rules: &RulesContext<'_>,
    seat: PlayerId,
    card: CardId,
    index: usize,
    choices: &AbilityChoices,
) -> Result<(), RulesError> {
    take_turn(state, seat, "use_ability")?;
    let registry = rules.registry;
    let controlled = state
        .player(seat)?
        .find_controlled(card)
        .cloned()
        .ok_or(RulesError::UnknownCard(card))?;
    let ability = registry
        .lookup(card)?
        .ability(index)
        .filter(|a| !a.is_reaction())
        .ok_or(RulesError::UnknownAbility { card, index })?;

    activate(
        state,
        ResolverContext::new(registry, seat, &controlled),
        &ability.costs,
        &ability.effects,
        choices,
    )?;
    debug!("{} used {} ability {}", seat, registry.name_of(card), index);
    settle(state, rules)
}

/// Pass: swap magic items, draw, and sit out the rest of the round.
pub(crate) fn pass(
    state: &mut MatchState,
    rules: &RulesContext<'_>,
    seat: PlayerId,
    magic_item: CardId,
) -> Result<(), RulesError> {
    take_turn(state, seat, "pass")?;
    let index = state
        .pools
        .magic_items
        .iter()
        .position(|c| *c == magic_item)
        .ok_or(RulesError::UnknownCard(magic_item))?;
    let first_to_pass = action_state(state, "pass")?.passed.values().all(|passed| !passed);

    state.pools.magic_items.remove(index);
    let entering = state.enter_play(magic_item);
    let returned = state.player_mut(seat)?.magic_item.replace(entering);
    if let Some(returned) = returned {
        state.pools.magic_items.push_back(returned.card);
    }
    state.player_mut(seat)?.draw(rules.config.draw_on_pass);

    if first_to_pass {
        for (id, player) in state.players.iter_mut() {
            player.has_first_player_token = id == seat;
        }
        state.players[seat].token_face_up = false;
    }
    if let Some(action) = state.action_mut() {
        action.passed[seat] = true;
    }
    debug!("{} passed, taking {}", seat, rules.registry.name_of(magic_item));
    end_turn(state, rules)
}

/// Answer the attack on top of the stack.
pub(crate) fn respond_to_attack(
    state: &mut MatchState,
    rules: &RulesContext<'_>,
    seat: PlayerId,
    response: AttackResponse,
) -> Result<(), RulesError> {
    const COMMAND: &str = "respond_to_attack";
    let registry = rules.registry;
    let top = action_state(state, COMMAND)?.stack.top().map(|e| &e.interrupt);
    let (attacker, source, attack) = match top {
        Some(Interrupt::Attack {
            attacker,
            source,
            attack,
            pending,
        }) if pending.contains(&seat) => (*attacker, *source, attack.clone()),
        Some(other) => {
            return Err(RulesError::NotYourTurn {
                seat,
                waiting_on: other.waiting_on().first().copied(),
            });
        }
        None => return Err(RulesError::phase(state.phase, COMMAND)),
    };
    let top = stack_mut(state)?.top_mut().map(|e| &mut e.interrupt);
    if let Some(Interrupt::Attack { pending, .. }) = top {
        pending.retain(|s| *s != seat);
    }

    match response {
        AttackResponse::PayNegation => {
            let cost = attack.negate_cost.ok_or_else(|| {
                RulesError::InvalidChoice(format!(
                    "{}'s attack cannot be negated by paying",
                    registry.name_of(source)
                ))
            })?;
            let player = state.player_mut(seat)?;
            if !player.resources.contains(&cost) {
                return Err(RulesError::InsufficientResources {
                    needed: cost,
                    available: player.resources,
                });
            }
            player.resources.remove_bag(&cost);
            debug!("{} paid {} to negate {}'s attack", seat, cost, attacker);
        }
        AttackResponse::React { card, ability, choices } => {
            let controlled = state
                .player(seat)?
                .find_controlled(card)
                .cloned()
                .ok_or(RulesError::UnknownCard(card))?;
            let reaction = registry
                .lookup(card)?
                .ability(ability)
                .filter(|a| a.trigger == Some(ReactionTrigger::IncomingAttack))
                .ok_or(RulesError::UnknownAbility { card, index: ability })?;
            activate(
                state,
                ResolverContext::new(registry, seat, &controlled),
                &reaction.costs,
                &reaction.effects,
                &choices,
            )?;
            debug!("{} negated {}'s attack with {}", seat, attacker, registry.name_of(card));
        }
        AttackResponse::Take { artifact } => take_attack(state, registry, seat, &attack, artifact)?,
    }
    settle(state, rules)
}

fn take_attack(
    state: &mut MatchState,
    registry: &CardRegistry,
    seat: PlayerId,
    attack: &Attack,
    artifact: Option<CardId>,
) -> Result<(), RulesError> {
    let player = state.player_mut(seat)?;
    match &attack.outcome {
        AttackOutcome::LoseResources(bag) => {
            let lost = player.resources.remove_clamped(bag);
            debug!("{} lost {} to an attack", seat, lost);
        }
        AttackOutcome::DestroyArtifact => {
            let options =
                TargetSelector::artifacts(registry, CardFilter::Any).valid_targets(player);
            if options.is_empty() && artifact.is_none() {
                debug!("{} has no artifact to lose", seat);
                return Ok(());
            }
            let target = select(
                artifact,
                options,
                || RulesError::InvalidTarget("no artifact to destroy".to_string()),
                |options| {
                    RulesError::pending(PendingDecision::new(
                        seat,
                        DecisionStep::Attack,
                        DecisionRequest::Card { options },
                    ))
                },
            )?;
            let instance = player
                .artifacts
                .iter()
                .find(|c| c.card == target)
                .map(|c| c.instance)
                .ok_or(RulesError::UnknownCard(target))?;
            let destroyed = EffectResolver::remove_artifact(player, instance)?;
            debug!("{} lost {} to an attack", seat, registry.name_of(destroyed));
            let event = GameEvent::ArtifactDestroyed {
                owner: seat,
                card: destroyed,
            };
            open_windows(state, registry, &[event], None)?;
        }
    }
    Ok(())
}

/// Use or decline a reaction in the window on top of the stack.
pub(crate) fn respond_to_reaction(
    state: &mut MatchState,
    rules: &RulesContext<'_>,
    seat: PlayerId,
    response: ReactionResponse,
) -> Result<(), RulesError> {
    const COMMAND: &str = "respond_to_reaction";
    let registry = rules.registry;
    let event = match action_state(state, COMMAND)?.stack.top().map(|e| &e.interrupt) {
        Some(Interrupt::Reactions {
            destroyed,
            owner,
            pending,
        }) if pending.contains(&seat) => GameEvent::ArtifactDestroyed {
            owner: *owner,
            card: *destroyed,
        },
        Some(other) => {
            return Err(RulesError::NotYourTurn {
                seat,
                waiting_on: other.waiting_on().first().copied(),
            });
        }
        None => return Err(RulesError::phase(state.phase, COMMAND)),
    };
    let top = stack_mut(state)?.top_mut().map(|e| &mut e.interrupt);
    if let Some(Interrupt::Reactions { pending, .. }) = top {
        pending.retain(|s| *s != seat);
    }

    match response {
        ReactionResponse::Use { card, ability, choices } => {
            let option = ReactionOption { card, ability };
            if !eligible_reactions(state, registry, seat, &event).contains(&option) {
                return Err(RulesError::InvalidChoice(format!(
                    "{} ability {} cannot answer {}",
                    registry.name_of(card),
                    ability,
                    event
                )));
            }
            let controlled = state
                .player(seat)?
                .find_controlled(card)
                .cloned()
                .ok_or(RulesError::UnknownCard(card))?;
            let reaction = registry
                .lookup(card)?
                .ability(ability)
                .ok_or(RulesError::UnknownAbility { card, index: ability })?;
            activate(
                state,
                ResolverContext::new(registry, seat, &controlled),
                &reaction.costs,
                &reaction.effects,
                &choices,
            )?;
            debug!("{} reacted to {} with {}", seat, event, registry.name_of(card));
        }
        ReactionResponse::Decline => debug!("{} declined to react to {}", seat, event),
    }
    settle(state, rules)
}

/// Answer the reveal on top of the stack.
pub(crate) fn respond_to_decision(
    state: &mut MatchState,
    rules: &RulesContext<'_>,
    seat: PlayerId,
    choice: &Choice,
) -> Result<(), RulesError> {
    const COMMAND: &str = "respond_to_decision";
    let decision = match action_state(state, COMMAND)?.stack.top().map(|e| &e.interrupt) {
        Some(Interrupt::Reveal(decision)) if decision.seat == seat => decision.clone(),
        Some(other) => {
            return Err(RulesError::NotYourTurn {
                seat,
                waiting_on: other.waiting_on().first().copied(),
            });
        }
        None => return Err(RulesError::phase(state.phase, COMMAND)),
    };

    EffectResolver::answer_reveal(state, &decision, choice)?;
    if let Some(entry) = stack_mut(state)?.pop() {
        debug!("{} answered by {}", entry.id, seat);
        if let Some(continuation) = entry.continuation {
            resume(state, rules.registry, continuation, ResolveMode::Lenient)?;
        }
    }
    settle(state, rules)
}

/// Legal answers to an attack for one defender.
#[must_use]
pub fn attack_options(
    state: &MatchState,
    registry: &CardRegistry,
    defender: PlayerId,
    attacker: PlayerId,
    source: CardId,
    attack: &Attack,
) -> Vec<AttackOption> {
    let mut options = Vec::new();
    if let (Some(cost), Ok(player)) = (attack.negate_cost, state.player(defender)) {
        if player.resources.contains(&cost) {
            options.push(AttackOption::PayNegation(cost));
        }
    }
    let event = GameEvent::AttackDeclared { attacker, source };
    for reaction in eligible_reactions(state, registry, defender, &event) {
        options.push(AttackOption::React {
            card: reaction.card,
            ability: reaction.ability,
        });
    }
    options.push(AttackOption::Take);
    options
}

/// Decisions owed to the entry on top of the interrupt stack.
#[must_use]
pub fn pending_decisions(state: &MatchState, registry: &CardRegistry) -> Vec<PendingDecision> {
    let Some(top) = state.action().and_then(|a| a.stack.top()) else {
        return Vec::new();
    };
    match &top.interrupt {
        Interrupt::Attack {
            attacker,
            source,
            attack,
            pending,
        } => pending
            .iter()
            .map(|defender| {
                PendingDecision::new(
                    *defender,
                    DecisionStep::Attack,
                    DecisionRequest::AttackResponse {
                        attacker: *attacker,
                        source: *source,
                        options: attack_options(
                            state,
                            registry,
                            *defender,
                            *attacker,
                            *source,
                            attack,
                        ),
                    },
                )
            })
            .collect(),
        Interrupt::Reactions {
            destroyed,
            owner,
            pending,
        } => {
            let event = GameEvent::ArtifactDestroyed {
                owner: *owner,
                card: *destroyed,
            };
            pending
                .iter()
                .map(|seat| {
                    PendingDecision::new(
                        *seat,
                        DecisionStep::Reaction,
                        DecisionRequest::Reaction {
                            destroyed: *destroyed,
                            owner: *owner,
                            options: eligible_reactions(state, registry, *seat, &event),
                        },
                    )
                })
                .collect()
        }
        Interrupt::Reveal(decision) => vec![decision.clone()],
    }
}
