//! Turn orchestrator.
//!
//! A turn resolves in two pure steps: [`CampaignEngine::compute_turn`]
//! produces a [`TurnResult`] from the current state and the player's actions,
//! and [`CampaignEngine::apply_turn`] folds that result into the next state.
//! Neither step mutates its input.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::actions::AllocatedAction;
use crate::advertising::total_ad_spend;
use crate::config::{CampaignPhase, Difficulty};
use crate::constants::{GOTV_AVAILABLE_TURN, MAX_TURNS, ONLINE_INCOME_BASE_RATE, STARTING_EMAIL_LIST};
use crate::content::{CampaignContent, ContentSource};
use crate::election::{ElectionResult, PostGameScore, compute_election_result, compute_post_game_score};
use crate::endorsements::{apply_endorsement_effects, process_endorsements};
use crate::events::{
    ActiveEvent, EventError, EventResolution, apply_event_effects, generate_turn_events,
    resolve_event_choice,
};
use crate::fundraising::{FundraisingResult, compute_fundraising};
use crate::gotv::{GotvResult, compute_gotv};
use crate::momentum::compute_momentum;
use crate::opponent::{OpponentTurnResult, process_opponent_turn};
use crate::polling::{PollChange, compute_poll_changes};
use crate::rng::{CampaignRng, RngStream};
use crate::staff::{action_points_for, margin_of_error_for, weekly_staff_cost};
use crate::state::{
    ActionRecord, CampaignFinances, CampaignState, Endorsement, FundraisingSnapshot, PollSnapshot,
    PollState,
};

/// Contract violations by the calling shell.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TurnError {
    #[error("the campaign is over")]
    GameOver,
    #[error("turn {turn} is past the final turn {max_turns}")]
    PastFinalTurn { turn: u32, max_turns: u32 },
    #[error("turn result was computed for turn {result_turn} but the campaign is on turn {state_turn}")]
    StaleResult { state_turn: u32, result_turn: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

impl Notification {
    fn new(kind: NotificationKind, title: &str, message: String) -> Self {
        Self {
            kind,
            title: title.to_string(),
            message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerLine {
    pub source: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
    pub breakdown: Vec<LedgerLine>,
}

/// Everything a turn produced, ready to be applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnResult {
    pub turn: u32,
    pub polls: PollState,
    pub poll_changes: Vec<PollChange>,
    pub fundraising: FundraisingResult,
    pub endorsement_bonus: f64,
    pub gotv: GotvResult,
    pub endorsements: Vec<Endorsement>,
    pub secured_endorsements: Vec<String>,
    pub financial_summary: FinancialSummary,
    pub momentum: f64,
    pub momentum_change: f64,
    pub opponent: OpponentTurnResult,
    pub phase_change: Option<CampaignPhase>,
    pub notifications: Vec<Notification>,
}

impl TurnResult {
    #[must_use]
    pub fn opponent_actions(&self) -> &[String] {
        &self.opponent.actions
    }
}

/// Binds campaign content to the turn pipeline.
#[derive(Debug, Clone)]
pub struct CampaignEngine {
    content: CampaignContent,
}

impl CampaignEngine {
    #[must_use]
    pub const fn new(content: CampaignContent) -> Self {
        Self { content }
    }

    /// Build an engine from any content source.
    ///
    /// # Errors
    ///
    /// Returns the source's error if content cannot be loaded.
    pub fn from_source<L: ContentSource>(source: &L) -> Result<Self, L::Error> {
        source.load_content().map(Self::new)
    }

    #[must_use]
    pub const fn content(&self) -> &CampaignContent {
        &self.content
    }

    /// Opening state for a new campaign, with turn-one events already drawn.
    #[must_use]
    pub fn create_initial_state(&self, difficulty: Difficulty, seed: u64) -> CampaignState {
        let preset = difficulty.config();
        let player = preset.player_starting_support;
        let opponent = preset.opponent_starting_support;
        let undecided = 100.0 - player - opponent;

        let demographics = self
            .content
            .district
            .demographics
            .iter()
            .map(|demo| demo.seed_support(player, opponent))
            .collect();

        let staff = self.content.staff.clone();
        let max_action_points = action_points_for(&staff);

        let mut state = CampaignState {
            difficulty,
            current_turn: 1,
            max_turns: MAX_TURNS,
            phase: CampaignPhase::for_turn(1),
            action_points: max_action_points,
            max_action_points,
            polls: PollState {
                player_support: player,
                opponent_support: opponent,
                undecided,
                margin_of_error: margin_of_error_for(&staff),
                demographics,
                history: vec![PollSnapshot {
                    turn: 0,
                    player_support: player,
                    opponent_support: opponent,
                    undecided,
                }],
            },
            finances: CampaignFinances {
                cash_on_hand: preset.starting_cash,
                total_raised: preset.starting_cash,
                total_spent: 0.0,
                small_donors: 0.0,
                large_donors: 0.0,
                pac_money: 0.0,
                online_income_rate: ONLINE_INCOME_BASE_RATE,
                email_list_size: STARTING_EMAIL_LIST,
                weekly_burn_rate: 0.0,
                fundraising_history: Vec::new(),
            },
            ads: Vec::new(),
            staff,
            endorsements: self.content.endorsements.clone(),
            opponent: self.content.opponent.initial_state(),
            momentum: 0.0,
            pending_event_momentum: 0.0,
            gotv_investment: 0.0,
            active_events: Vec::new(),
            event_history: Vec::new(),
            action_log: Vec::new(),
            seed,
            population: self.content.district.population,
            game_over: false,
            winner: None,
            final_margin: None,
            election: None,
        };
        state.active_events = self.draw_events(&state);
        debug!(
            "new {} campaign (seed {seed}): {} opening events",
            difficulty.key(),
            state.active_events.len()
        );
        state
    }

    /// Resolve the player's week without touching `state`.
    ///
    /// # Errors
    ///
    /// Returns an error if the campaign is already over or past its final turn.
    pub fn compute_turn(
        &self,
        state: &CampaignState,
        actions: &[AllocatedAction],
    ) -> Result<TurnResult, TurnError> {
        if state.game_over {
            return Err(TurnError::GameOver);
        }
        if state.current_turn > state.max_turns {
            return Err(TurnError::PastFinalTurn {
                turn: state.current_turn,
                max_turns: state.max_turns,
            });
        }
        let turn = state.current_turn;
        let mut rng = CampaignRng::for_stream(state.seed, turn, RngStream::Turn, 0);
        let mut notifications = Vec::new();

        let progress = process_endorsements(&state.endorsements, actions, &state.polls);
        let mut boosted = state.polls.clone();
        let mut poll_changes = Vec::new();
        for endorsement in &progress.secured {
            apply_endorsement_effects(endorsement, &mut boosted.demographics);
            for (demographic, effect) in &endorsement.demographic_effects {
                poll_changes.push(PollChange {
                    demographic: *demographic,
                    player_change: *effect,
                    opponent_change: 0.0,
                    reason: format!("Endorsement: {}", endorsement.name),
                });
            }
            notifications.push(Notification::new(
                NotificationKind::Success,
                "Endorsement Secured!",
                format!("{} has endorsed the campaign.", endorsement.name),
            ));
        }
        for endorsement in &progress.progressed {
            notifications.push(Notification::new(
                NotificationKind::Info,
                "Endorsement Progress",
                format!(
                    "{}: {}/{} turns",
                    endorsement.name, endorsement.turns_pursued, endorsement.turns_to_secure
                ),
            ));
        }

        let mut polling = compute_poll_changes(
            &boosted,
            actions,
            &state.ads,
            state.momentum,
            &state.staff,
            &mut rng,
        );
        polling.polls.margin_of_error = margin_of_error_for(&state.staff);
        poll_changes.append(&mut polling.changes);

        let secured_count = progress
            .endorsements
            .iter()
            .filter(|endorsement| endorsement.is_secured())
            .count();
        let fundraising = compute_fundraising(
            &state.finances,
            actions,
            &state.staff,
            state.momentum,
            secured_count,
            &mut rng,
        );
        let gotv = compute_gotv(state.gotv_investment, actions, &state.staff, turn);

        let poll_delta = polling.polls.player_support - state.polls.player_support;
        let momentum = compute_momentum(
            state.momentum,
            poll_delta,
            state.pending_event_momentum,
            progress.any_secured(),
        );

        let endorsement_bonus: f64 = progress.secured.iter().map(|e| e.fundraising_bonus).sum();
        let financial_summary = summarize_finances(
            &fundraising,
            endorsement_bonus,
            weekly_staff_cost(&state.staff),
            total_ad_spend(&state.ads),
            gotv.investment_added,
        );

        let mut opponent_rng = CampaignRng::for_stream(state.seed, turn, RngStream::Opponent, 0);
        let opponent = process_opponent_turn(
            &state.opponent,
            &self.content.opponent,
            state.polls.player_support,
            state.polls.opponent_support,
            turn,
            &mut opponent_rng,
        );

        let next_phase = CampaignPhase::for_turn(turn + 1);
        let phase_change = (next_phase != state.phase).then_some(next_phase);
        if let Some(phase) = phase_change {
            notifications.push(Notification::new(
                NotificationKind::Info,
                "New Campaign Phase",
                format!("Entering {phase} phase."),
            ));
        }
        if turn + 1 == GOTV_AVAILABLE_TURN {
            notifications.push(Notification::new(
                NotificationKind::Info,
                "GOTV Unlocked",
                "Get-out-the-vote operations are now available.".to_string(),
            ));
        }
        let projected_cash = state.finances.cash_on_hand + financial_summary.net;
        if projected_cash < 0.0 {
            notifications.push(Notification::new(
                NotificationKind::Danger,
                "Cash Crunch",
                format!("The campaign is projected to end the week ${:.0} in debt.", -projected_cash),
            ));
        }
        if opponent.attack_mode_entered {
            notifications.push(Notification::new(
                NotificationKind::Warning,
                "Opponent on the Attack",
                format!("{} has switched to attack mode.", state.opponent.name),
            ));
        }

        debug!(
            "turn {turn}: support {:.2} -> {:.2}, momentum {:.2} -> {momentum:.2}, net ${:.0}",
            state.polls.player_support,
            polling.polls.player_support,
            state.momentum,
            financial_summary.net
        );

        Ok(TurnResult {
            turn,
            polls: polling.polls,
            poll_changes,
            fundraising,
            endorsement_bonus,
            gotv,
            secured_endorsements: progress.secured.iter().map(|e| e.id.clone()).collect(),
            endorsements: progress.endorsements,
            financial_summary,
            momentum,
            momentum_change: momentum - state.momentum,
            opponent,
            phase_change,
            notifications,
        })
    }

    /// Fold a computed turn into the next state.
    ///
    /// After the final turn the campaign is closed and the election runs.
    ///
    /// # Errors
    ///
    /// Returns an error if `result` was computed for a different turn or the
    /// campaign is already over.
    pub fn apply_turn(
        &self,
        state: &CampaignState,
        result: &TurnResult,
        actions: &[AllocatedAction],
    ) -> Result<CampaignState, TurnError> {
        if state.game_over {
            return Err(TurnError::GameOver);
        }
        if result.turn != state.current_turn {
            return Err(TurnError::StaleResult {
                state_turn: state.current_turn,
                result_turn: result.turn,
            });
        }
        let turn = state.current_turn;
        let mut next = state.clone();

        next.polls = result.polls.clone();
        let opponent_effect = result.opponent.capped_poll_effect();
        for demo in &mut next.polls.demographics {
            demo.shift_opponent(opponent_effect);
        }
        next.polls.recompute_aggregates();

        let summary = &result.financial_summary;
        let finances = &mut next.finances;
        finances.cash_on_hand += summary.net;
        finances.total_raised += summary.income;
        finances.total_spent += summary.expenses;
        finances.small_donors += result.fundraising.small_donors;
        finances.large_donors += result.fundraising.large_donors;
        finances.pac_money += result.fundraising.pac_money;
        finances.email_list_size = finances
            .email_list_size
            .saturating_add(result.fundraising.email_list_growth);
        finances.weekly_burn_rate = summary.expenses;
        finances.fundraising_history.push(FundraisingSnapshot {
            turn,
            raised: summary.income,
            spent: summary.expenses,
            cash_on_hand: finances.cash_on_hand,
        });

        next.momentum = result.momentum;
        next.pending_event_momentum = 0.0;
        next.gotv_investment += result.gotv.investment_added;
        next.endorsements = result.endorsements.clone();
        next.opponent = result.opponent.opponent.clone();

        let unresolved = next.unresolved_events();
        if unresolved > 0 {
            debug!("turn {turn}: {unresolved} event(s) expired unresolved");
        }
        let expiring = std::mem::take(&mut next.active_events);
        next.event_history.extend(expiring);

        next.action_log.push(ActionRecord {
            turn,
            actions: actions.to_vec(),
        });

        let campaign_over = state.is_final_turn();
        next.current_turn = turn + 1;
        next.phase = CampaignPhase::for_turn(next.current_turn);
        next.max_action_points = action_points_for(&next.staff);
        next.action_points = next.max_action_points;

        if campaign_over {
            next.game_over = true;
            next.phase = CampaignPhase::Election;
            let mut rng = CampaignRng::for_stream(next.seed, turn, RngStream::Election, 0);
            let election = compute_election_result(&next, &mut rng);
            next.winner = Some(election.winner);
            next.final_margin = Some(election.margin);
            next.election = Some(election);
        } else {
            next.active_events = self.draw_events(&next);
        }

        Ok(next)
    }

    /// Resolve a pending event with the chosen branch.
    ///
    /// # Errors
    ///
    /// Returns an error if the event is not active, is already resolved, or
    /// has no such choice.
    pub fn resolve_event(
        &self,
        state: &CampaignState,
        event_id: &str,
        choice_id: &str,
    ) -> Result<(CampaignState, EventResolution), EventError> {
        let Some(index) = state
            .active_events
            .iter()
            .position(|active| active.event.id == event_id)
        else {
            return Err(EventError::UnknownEvent(event_id.to_string()));
        };
        let active = &state.active_events[index];
        if active.resolved {
            return Err(EventError::AlreadyResolved(event_id.to_string()));
        }
        let choice = active
            .event
            .choice(choice_id)
            .ok_or_else(|| EventError::UnknownChoice {
                event: event_id.to_string(),
                choice: choice_id.to_string(),
            })?;

        let salt = u64::try_from(index).unwrap_or(u64::MAX);
        let mut rng =
            CampaignRng::for_stream(state.seed, state.current_turn, RngStream::EventRisk, salt);
        let resolution = resolve_event_choice(choice, &mut rng);

        let mut next = state.clone();
        apply_event_effects(&resolution.effects, &mut next);
        if let Some(active) = next.active_events.get_mut(index) {
            active.chosen = Some(choice_id.to_string());
            active.resolved = true;
        }
        debug!(
            "turn {}: resolved {event_id} with {choice_id} (risk {})",
            state.current_turn, resolution.risk_triggered
        );
        Ok((next, resolution))
    }

    /// Tabulate the election for `state` on the election stream.
    #[must_use]
    pub fn election_result(&self, state: &CampaignState) -> ElectionResult {
        if let Some(result) = &state.election {
            return result.clone();
        }
        let turn = state.current_turn.min(state.max_turns);
        let mut rng = CampaignRng::for_stream(state.seed, turn, RngStream::Election, 0);
        compute_election_result(state, &mut rng)
    }

    #[must_use]
    pub fn post_game_score(&self, state: &CampaignState) -> PostGameScore {
        compute_post_game_score(&self.election_result(state), state)
    }

    fn draw_events(&self, state: &CampaignState) -> Vec<ActiveEvent> {
        let history = state.fired_event_ids();
        let mut rng = CampaignRng::for_stream(state.seed, state.current_turn, RngStream::Events, 0);
        let events = generate_turn_events(state, &self.content.events, &history, &mut rng);
        if self.content.events.is_empty() {
            warn!("event catalog is empty; no events will fire");
        }
        events.into_vec()
    }
}

fn summarize_finances(
    fundraising: &FundraisingResult,
    endorsement_bonus: f64,
    staff_cost: f64,
    ad_spend: f64,
    gotv_spend: f64,
) -> FinancialSummary {
    let income = fundraising.total_raised + endorsement_bonus;
    let expenses = staff_cost + ad_spend + gotv_spend;
    let mut breakdown = vec![
        LedgerLine {
            source: "Small donors".to_string(),
            amount: fundraising.small_donors,
        },
        LedgerLine {
            source: "Large donors".to_string(),
            amount: fundraising.large_donors,
        },
        LedgerLine {
            source: "PAC".to_string(),
            amount: fundraising.pac_money,
        },
        LedgerLine {
            source: "Online/Passive".to_string(),
            amount: fundraising.online_income,
        },
    ];
    if endorsement_bonus > 0.0 {
        breakdown.push(LedgerLine {
            source: "Endorsement bonuses".to_string(),
            amount: endorsement_bonus,
        });
    }
    breakdown.extend([
        LedgerLine {
            source: "Staff salaries".to_string(),
            amount: -staff_cost,
        },
        LedgerLine {
            source: "Advertising".to_string(),
            amount: -ad_spend,
        },
        LedgerLine {
            source: "GOTV".to_string(),
            amount: -gotv_spend,
        },
    ]);
    FinancialSummary {
        income,
        expenses,
        net: income - expenses,
        breakdown,
    }
}
