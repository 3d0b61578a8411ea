use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::{Duration, Instant};

use powerbroker_game::constants::{
    MOMENTUM_MAX, MOMENTUM_MIN, SUPPORT_MAX, SUPPORT_MIN, UNDECIDED_MAX, UNDECIDED_MIN,
};
use powerbroker_game::{CampaignEngine, CampaignSession, CampaignState, Difficulty, Grade, Winner};

use crate::logic::policy::{GameplayStrategy, PlayerPolicy, TurnPlan};

/// Configuration for one automated campaign.
#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    pub seed: u64,
    pub difficulty: Difficulty,
    pub strategy: GameplayStrategy,
}

impl SimulationConfig {
    #[must_use]
    pub fn new(difficulty: Difficulty, strategy: GameplayStrategy, seed: u64) -> Self {
        Self {
            seed,
            difficulty,
            strategy,
        }
    }
}

/// Outcome of one automated campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignRecord {
    pub strategy: String,
    pub difficulty: Difficulty,
    pub seed: u64,
    pub won: bool,
    pub margin: f64,
    pub recount: bool,
    pub grade: Grade,
    pub total_score: i64,
    pub final_cash: f64,
    pub endorsements: usize,
    pub events_resolved: usize,
    pub turns: u32,
    pub violations: Vec<String>,
    #[serde(skip)]
    pub duration: Duration,
}

/// Play one campaign to the election, checking invariants after every turn.
///
/// Illegal shell moves a policy proposes (unaffordable hires, closed
/// endorsements) are skipped; they are policy noise, not engine failures.
#[must_use]
pub fn run_campaign(engine: &CampaignEngine, config: SimulationConfig) -> CampaignRecord {
    let started = Instant::now();
    let mut policy = config.strategy.create_policy();
    let mut session = CampaignSession::new(engine.clone(), config.difficulty, config.seed);
    let mut violations = check_state(session.state());
    let mut seen_one_time: HashSet<String> = HashSet::new();
    let mut events_resolved = 0;

    while !session.is_over() {
        let state = session.state();
        for active in &state.active_events {
            if active.event.one_time && !seen_one_time.insert(active.event.id.clone()) {
                violations.push(format!(
                    "turn {}: one-time event {} fired twice",
                    state.current_turn, active.event.id
                ));
            }
        }
        events_resolved += answer_events(&mut session, policy.as_mut());
        let plan = policy.plan_turn(session.state());
        execute_plan(&mut session, &plan, policy.name());

        let turn = session.state().current_turn;
        match session.end_turn() {
            Ok(result) => {
                debug!(
                    "[{} seed {}] turn {turn}: support {:.1}, momentum {:+.1}, net ${:.0}",
                    policy.name(),
                    config.seed,
                    result.polls.player_support,
                    result.momentum,
                    result.financial_summary.net
                );
            }
            Err(err) => {
                violations.push(format!("turn {turn}: end_turn failed: {err}"));
                break;
            }
        }

        violations.extend(check_state(session.state()));
    }

    let election = session.election_result();
    let score = session.post_game_score();
    if (election.player_pct + election.opponent_pct - 100.0).abs() > 0.01 {
        violations.push(format!(
            "election shares sum to {:.3}",
            election.player_pct + election.opponent_pct
        ));
    }
    if election.recount != (election.margin.abs() < 2.0) {
        violations.push(format!(
            "recount flag {} disagrees with margin {:.2}",
            election.recount, election.margin
        ));
    }

    let state = session.into_state();
    CampaignRecord {
        strategy: config.strategy.key().to_string(),
        difficulty: config.difficulty,
        seed: config.seed,
        won: election.winner == Winner::Player,
        margin: election.margin,
        recount: election.recount,
        grade: score.final_grade,
        total_score: score.total_score,
        final_cash: state.finances.cash_on_hand,
        endorsements: state.secured_endorsement_count(),
        events_resolved,
        turns: state.current_turn.saturating_sub(1),
        violations,
        duration: started.elapsed(),
    }
}

fn answer_events(session: &mut CampaignSession, policy: &mut dyn PlayerPolicy) -> usize {
    let pending: Vec<_> = session
        .state()
        .active_events
        .iter()
        .filter(|active| !active.resolved)
        .map(|active| active.event.clone())
        .collect();
    let mut resolved = 0;
    for event in pending {
        let decision = policy.pick_choice(session.state(), &event);
        let Some(choice) = event.choices.get(decision.choice_index) else {
            continue;
        };
        match session.resolve_event(&event.id, &choice.id) {
            Ok(resolution) => {
                resolved += 1;
                debug!(
                    "{} chose {} for {} ({}){}",
                    policy.name(),
                    choice.id,
                    event.id,
                    decision.rationale.as_deref().unwrap_or("no rationale"),
                    if resolution.risk_triggered { ", risk hit" } else { "" }
                );
            }
            Err(err) => debug!("{} could not resolve {}: {err}", policy.name(), event.id),
        }
    }
    resolved
}

fn execute_plan(session: &mut CampaignSession, plan: &TurnPlan, policy: &str) {
    for role in &plan.hires {
        if let Err(err) = session.hire_staff(*role) {
            debug!("{policy}: skipped hire: {err}");
        }
    }
    for id in &plan.pursue {
        if let Err(err) = session.pursue_endorsement(id) {
            debug!("{policy}: skipped endorsement: {err}");
        }
    }
    if let Some(ads) = &plan.ads
        && let Err(err) = session.set_ads(ads.clone())
    {
        debug!("{policy}: skipped ads: {err}");
    }
    for action in &plan.actions {
        if let Err(err) = session.allocate_action(action.clone()) {
            debug!("{policy}: skipped action: {err}");
        }
    }
}

/// Range and bookkeeping checks that must hold between turns.
#[must_use]
pub fn check_state(state: &CampaignState) -> Vec<String> {
    let mut violations = Vec::new();
    let turn = state.current_turn;
    let expected_history = usize::try_from(turn).unwrap_or(usize::MAX);
    let polls = &state.polls;
    let support = SUPPORT_MIN..=SUPPORT_MAX;

    if !support.contains(&polls.player_support) {
        violations.push(format!("turn {turn}: player support {:.2}", polls.player_support));
    }
    if !support.contains(&polls.opponent_support) {
        violations.push(format!("turn {turn}: opponent support {:.2}", polls.opponent_support));
    }
    if !(UNDECIDED_MIN..=UNDECIDED_MAX).contains(&polls.undecided) {
        violations.push(format!("turn {turn}: undecided {:.2}", polls.undecided));
    }
    if !(MOMENTUM_MIN..=MOMENTUM_MAX).contains(&state.momentum) {
        violations.push(format!("turn {turn}: momentum {:.2}", state.momentum));
    }
    for demo in &polls.demographics {
        if !support.contains(&demo.current_support) || !support.contains(&demo.opponent_support) {
            violations.push(format!(
                "turn {turn}: {} at {:.2}/{:.2}",
                demo.id, demo.current_support, demo.opponent_support
            ));
        }
    }
    if polls.history.len() != expected_history {
        violations.push(format!(
            "turn {turn}: poll history has {} entries, expected {expected_history}",
            polls.history.len()
        ));
    }
    if usize::try_from(turn.saturating_sub(1)).ok() != Some(state.action_log.len()) {
        violations.push(format!(
            "turn {turn}: action log has {} entries",
            state.action_log.len()
        ));
    }
    violations
}
