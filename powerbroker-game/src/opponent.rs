//! Opponent AI.
//!
//! Strategy is a stateless function of the polling margin and the calendar.
//! Attack mode is a separate latch with asymmetric enter and exit guards so
//! it does not flap from one turn to the next.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::CampaignPhase;
use crate::constants::{
    GOTV_AVAILABLE_TURN, OPPONENT_ADAPTATION_THRESHOLD, OPPONENT_AGGRESSIVE_AD_MULTIPLIER,
    OPPONENT_ATTACK_EXIT_THRESHOLD, OPPONENT_ATTACK_MODE_EFFECT, OPPONENT_ATTACK_POLL_EFFECT,
    OPPONENT_BASE_FUNDRAISING, OPPONENT_CAMPAIGN_EFFECT, OPPONENT_DEFENSIVE_AD_MULTIPLIER,
    OPPONENT_DEFENSIVE_POLL_EFFECT, OPPONENT_ENDORSEMENT_CHANCE, OPPONENT_ENDORSEMENT_EFFECT,
    OPPONENT_ENDORSEMENT_MIN_TURN, OPPONENT_ESTABLISHMENT_POLL_EFFECT, OPPONENT_FUNDRAISE_NOISE_MAX,
    OPPONENT_FUNDRAISE_NOISE_MIN, OPPONENT_GOTV_MIN, OPPONENT_GOTV_SPREAD,
    OPPONENT_POLL_EFFECT_CAP, OPPONENT_STAFF_LEVEL_FACTOR, OPPONENT_STRATEGY_CONTEST_TURN,
    OPPONENT_STRATEGY_DEFEND_TURN, OPPONENT_STRATEGY_EARLY_TURN, OPPONENT_STRATEGY_MARGIN,
};
use crate::numbers::{clamp_finite, i64_to_f64, round_f64_to_i64};
use crate::rng::CampaignRng;
use crate::state::{OpponentState, OpponentStrategy};

/// Static description of the opposing candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpponentProfile {
    pub name: String,
    pub party: String,
    pub starting_cash: f64,
    pub starting_approval: f64,
    pub staff_level: u8,
    #[serde(default)]
    pub strategy: OpponentStrategy,
    /// Endorsements already held at the start of the race.
    #[serde(default)]
    pub endorsements: Vec<String>,
    pub ad_baseline: f64,
    /// Organizations the AI may still court.
    #[serde(default)]
    pub target_endorsements: Vec<String>,
    #[serde(default)]
    pub campaign_locations: Vec<String>,
}

impl OpponentProfile {
    /// Surname used in narration.
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.name.split_whitespace().last().unwrap_or(&self.name)
    }

    /// Opening opponent state.
    #[must_use]
    pub fn initial_state(&self) -> OpponentState {
        OpponentState {
            name: self.name.clone(),
            party: self.party.clone(),
            cash_on_hand: self.starting_cash,
            total_spent: 0.0,
            approval_rating: self.starting_approval,
            attack_mode: false,
            endorsements_secured: self.endorsements.clone(),
            staff_level: self.staff_level,
            ad_spending: self.ad_baseline,
            gotv_investment: 0.0,
            strategy: self.strategy,
        }
    }
}

impl OpponentStrategy {
    /// Choose a posture given `margin = opponent - player` and the turn.
    #[must_use]
    pub fn select(margin: f64, turn: u32) -> Self {
        if turn <= OPPONENT_STRATEGY_EARLY_TURN {
            return if margin < -OPPONENT_STRATEGY_MARGIN {
                Self::Aggressive
            } else {
                Self::Establishment
            };
        }
        if margin > OPPONENT_STRATEGY_MARGIN {
            Self::Establishment
        } else if margin > 0.0 {
            if turn > OPPONENT_STRATEGY_DEFEND_TURN {
                Self::Defensive
            } else {
                Self::Establishment
            }
        } else if margin >= -OPPONENT_STRATEGY_MARGIN {
            if turn > OPPONENT_STRATEGY_CONTEST_TURN {
                Self::Aggressive
            } else {
                Self::Establishment
            }
        } else {
            Self::Aggressive
        }
    }

    /// Multiplier on the weekly ad baseline.
    #[must_use]
    pub const fn ad_multiplier(self) -> f64 {
        match self {
            Self::Aggressive => OPPONENT_AGGRESSIVE_AD_MULTIPLIER,
            Self::Defensive => OPPONENT_DEFENSIVE_AD_MULTIPLIER,
            Self::Establishment => 1.0,
        }
    }

    /// Opponent support gained from this week's ads.
    #[must_use]
    pub fn ad_poll_effect(self) -> f64 {
        match self {
            Self::Aggressive => OPPONENT_ATTACK_POLL_EFFECT.abs() * 0.5,
            Self::Defensive => OPPONENT_DEFENSIVE_POLL_EFFECT,
            Self::Establishment => OPPONENT_ESTABLISHMENT_POLL_EFFECT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackModeTransition {
    Entered,
    Exited,
    Unchanged,
}

/// Attack-mode latch: enters below the adaptation threshold, exits only
/// once the opponent leads by more than the exit threshold.
#[must_use]
pub fn attack_mode_transition(active: bool, margin: f64) -> AttackModeTransition {
    if !active && margin < OPPONENT_ADAPTATION_THRESHOLD {
        AttackModeTransition::Entered
    } else if active && margin > OPPONENT_ATTACK_EXIT_THRESHOLD {
        AttackModeTransition::Exited
    } else {
        AttackModeTransition::Unchanged
    }
}

/// Probability the opponent holds a campaign stop this turn.
#[must_use]
pub const fn campaign_chance(turn: u32) -> f64 {
    match CampaignPhase::for_turn(turn) {
        CampaignPhase::Primary => 0.5,
        CampaignPhase::Early => 0.7,
        CampaignPhase::Mid | CampaignPhase::Final | CampaignPhase::Election => 0.85,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpponentTurnResult {
    pub opponent: OpponentState,
    pub actions: Vec<String>,
    pub cash_raised: f64,
    pub cash_spent: f64,
    /// Raw opponent-support delta; see [`capped_poll_effect`].
    pub poll_effect: f64,
    pub strategy: OpponentStrategy,
    pub attack_mode_entered: bool,
    pub gotv_added: f64,
}

impl OpponentTurnResult {
    #[must_use]
    pub fn capped_poll_effect(&self) -> f64 {
        capped_poll_effect(self.poll_effect)
    }
}

/// Clamp a raw opponent poll effect to the per-turn cap.
#[must_use]
pub fn capped_poll_effect(effect: f64) -> f64 {
    clamp_finite(effect, -OPPONENT_POLL_EFFECT_CAP, OPPONENT_POLL_EFFECT_CAP)
}

fn format_k(amount: f64) -> String {
    format!("${}K", round_f64_to_i64(amount / 1_000.0))
}

/// Run one opponent turn against a snapshot of the opponent.
pub fn process_opponent_turn(
    opponent: &OpponentState,
    profile: &OpponentProfile,
    player_support: f64,
    opponent_support: f64,
    turn: u32,
    rng: &mut CampaignRng,
) -> OpponentTurnResult {
    let mut next = opponent.clone();
    let who = profile.short_name();
    let mut actions = Vec::new();
    let mut cash_spent = 0.0;
    let mut poll_effect = 0.0;
    let mut gotv_added = 0.0;

    let margin = opponent_support - player_support;
    let strategy = OpponentStrategy::select(margin, turn);
    if strategy != opponent.strategy {
        debug!(
            "turn {turn}: opponent strategy {} -> {} (margin {margin:.2})",
            opponent.strategy.label(),
            strategy.label()
        );
    }

    let cash_raised = OPPONENT_BASE_FUNDRAISING
        * (1.0 + rng.float_in(OPPONENT_FUNDRAISE_NOISE_MIN, OPPONENT_FUNDRAISE_NOISE_MAX));
    next.cash_on_hand += cash_raised;
    actions.push(format!("{who} raised {} this week", format_k(cash_raised)));

    let ad_spend = profile.ad_baseline * strategy.ad_multiplier();
    poll_effect += strategy.ad_poll_effect();
    actions.push(match strategy {
        OpponentStrategy::Aggressive => format!("{who} increased ad spending with attack ads"),
        OpponentStrategy::Defensive => {
            format!("{who} is running positive constituent service ads")
        }
        OpponentStrategy::Establishment => format!("{who} is running standard campaign ads"),
    });
    cash_spent += ad_spend;

    if rng.chance(campaign_chance(turn)) {
        poll_effect += OPPONENT_CAMPAIGN_EFFECT
            * (1.0 + f64::from(next.staff_level) * OPPONENT_STAFF_LEVEL_FACTOR);
        match rng.pick(&profile.campaign_locations) {
            Some(location) => actions.push(format!("{who} campaigned in {location}")),
            None => actions.push(format!("{who} held a campaign event")),
        }
    }

    let transition = attack_mode_transition(next.attack_mode, margin);
    match transition {
        AttackModeTransition::Entered => {
            next.attack_mode = true;
            poll_effect += OPPONENT_ATTACK_MODE_EFFECT;
            actions.push(format!("{who}'s campaign has shifted to attack mode"));
        }
        AttackModeTransition::Exited => {
            next.attack_mode = false;
            actions.push(format!("{who} has returned to a positive campaign strategy"));
        }
        AttackModeTransition::Unchanged => {}
    }

    if turn >= GOTV_AVAILABLE_TURN {
        gotv_added = i64_to_f64(OPPONENT_GOTV_MIN + rng.int_in(0, OPPONENT_GOTV_SPREAD));
        cash_spent += gotv_added;
        actions.push(format!("{who} invested {} in GOTV operations", format_k(gotv_added)));
    }

    if rng.chance(OPPONENT_ENDORSEMENT_CHANCE) && turn > OPPONENT_ENDORSEMENT_MIN_TURN {
        let open: Vec<&String> = profile
            .target_endorsements
            .iter()
            .filter(|org| !next.endorsements_secured.contains(org))
            .collect();
        if let Some(org) = rng.pick(&open) {
            actions.push(format!("{who} secured endorsement from {org}"));
            next.endorsements_secured.push((*org).clone());
            poll_effect += OPPONENT_ENDORSEMENT_EFFECT;
        }
    }

    next.cash_on_hand = (next.cash_on_hand - cash_spent).max(0.0);
    next.total_spent += cash_spent;
    next.ad_spending = ad_spend;
    next.strategy = strategy;
    next.gotv_investment += gotv_added;

    OpponentTurnResult {
        opponent: next,
        actions,
        cash_raised,
        cash_spent,
        poll_effect,
        strategy,
        attack_mode_entered: transition == AttackModeTransition::Entered,
        gotv_added,
    }
}
