//! Election-night tabulation and the post-game report card.
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    BASE_TURNOUT, DEMOGRAPHIC_DAY_VARIANCE, ELECTION_DAY_VARIANCE, GOTV_TURNOUT_LEAD_NUDGE,
    GOTV_TURNOUT_TRAIL_NUDGE, GRADE_LADDER, RECOUNT_THRESHOLD, SCORE_CASH_TIER_BONUS,
    SCORE_CASH_TIERS, SCORE_EMAIL_CAP, SCORE_EMAIL_UNIT, SCORE_MARGIN_WEIGHT,
    SCORE_PER_ENDORSEMENT, SCORE_VICTORY_BONUS, TURNOUT_MAX, TURNOUT_MIN, TURNOUT_NOISE,
};
use crate::gotv::turnout_bonus;
use crate::numbers::{
    clamp_finite, clamp_pct, round_f64_to_i64, round_f64_to_u64, u64_to_f64, usize_to_f64,
};
use crate::rng::CampaignRng;
use crate::state::{CampaignState, DemographicGroup, Winner};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicResult {
    pub demographic: DemographicGroup,
    pub player_pct: f64,
    pub opponent_pct: f64,
    pub turnout_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectionResult {
    pub player_votes: u64,
    pub opponent_votes: u64,
    pub player_pct: f64,
    pub opponent_pct: f64,
    /// `player_pct - opponent_pct`.
    pub margin: f64,
    pub winner: Winner,
    pub recount: bool,
    pub turnout: f64,
    pub demographic_breakdown: Vec<DemographicResult>,
}

/// Whether a margin is close enough to trigger a recount.
#[must_use]
pub fn needs_recount(margin: f64) -> bool {
    margin.abs() < RECOUNT_THRESHOLD
}

/// Tabulate the election from the final campaign state.
///
/// One shared day-of swing applies to every demographic on top of a
/// per-demographic swing; the opponent absorbs half of each in the other
/// direction. The GOTV differential lifts turnout where the player leads.
pub fn compute_election_result(state: &CampaignState, rng: &mut CampaignRng) -> ElectionResult {
    let gotv_differential =
        turnout_bonus(state.gotv_investment) - turnout_bonus(state.opponent.gotv_investment);
    let day_variance = rng.float_in(-ELECTION_DAY_VARIANCE, ELECTION_DAY_VARIANCE);

    let breakdown: Vec<DemographicResult> = state
        .polls
        .demographics
        .iter()
        .map(|demo| {
            let noise = rng.float_in(-TURNOUT_NOISE, TURNOUT_NOISE);
            let nudge = if demo.current_support > demo.opponent_support {
                gotv_differential * GOTV_TURNOUT_LEAD_NUDGE
            } else {
                -gotv_differential * GOTV_TURNOUT_TRAIL_NUDGE
            };
            let turnout = clamp_finite(BASE_TURNOUT + noise + nudge, TURNOUT_MIN, TURNOUT_MAX);
            let demo_variance = rng.float_in(-DEMOGRAPHIC_DAY_VARIANCE, DEMOGRAPHIC_DAY_VARIANCE);
            DemographicResult {
                demographic: demo.id,
                player_pct: clamp_pct(
                    demo.current_support + day_variance + demo_variance + gotv_differential,
                ),
                opponent_pct: clamp_pct(
                    demo.opponent_support - day_variance * 0.5 - demo_variance * 0.5,
                ),
                turnout_pct: turnout * 100.0,
            }
        })
        .collect();

    let total_voters = u64_to_f64(state.population) * BASE_TURNOUT;
    let (player_raw, opponent_raw) = state.polls.demographics.iter().zip(&breakdown).fold(
        (0.0, 0.0),
        |(player, opponent), (demo, result)| {
            let voters = total_voters * demo.weight() * (result.turnout_pct / 100.0);
            (
                player + voters * result.player_pct / 100.0,
                opponent + voters * result.opponent_pct / 100.0,
            )
        },
    );

    let player_votes = round_f64_to_u64(player_raw);
    let opponent_votes = round_f64_to_u64(opponent_raw);
    let cast = player_votes.saturating_add(opponent_votes);
    let (player_pct, opponent_pct) = if cast == 0 {
        (50.0, 50.0)
    } else {
        let cast = u64_to_f64(cast);
        (
            u64_to_f64(player_votes) / cast * 100.0,
            u64_to_f64(opponent_votes) / cast * 100.0,
        )
    };
    let margin = player_pct - opponent_pct;
    let winner = if margin > 0.0 {
        Winner::Player
    } else {
        Winner::Opponent
    };

    debug!(
        "election: {player_votes} vs {opponent_votes} ({margin:+.2}), day variance {day_variance:.2}"
    );

    ElectionResult {
        player_votes,
        opponent_votes,
        player_pct,
        opponent_pct,
        margin,
        winner,
        recount: needs_recount(margin),
        turnout: BASE_TURNOUT * 100.0,
        demographic_breakdown: breakdown,
    }
}

/// Letter grade ladder, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    #[serde(rename = "B+")]
    BPlus,
    B,
    #[serde(rename = "C+")]
    CPlus,
    C,
    D,
    F,
}

impl Grade {
    pub const ALL: [Self; 8] = [
        Self::APlus,
        Self::A,
        Self::BPlus,
        Self::B,
        Self::CPlus,
        Self::C,
        Self::D,
        Self::F,
    ];

    #[must_use]
    pub fn for_score(score: f64) -> Self {
        GRADE_LADDER
            .iter()
            .find(|(floor, _)| score >= *floor)
            .map_or(Self::F, |(_, grade)| *grade)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::CPlus => "C+",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostGameScore {
    pub victory: bool,
    pub margin: f64,
    pub funds_remaining: f64,
    pub endorsements_won: usize,
    pub total_endorsements: usize,
    pub events_handled: usize,
    pub approval_peak: f64,
    pub final_grade: Grade,
    pub total_score: i64,
}

/// Score the finished campaign.
#[must_use]
pub fn compute_post_game_score(result: &ElectionResult, state: &CampaignState) -> PostGameScore {
    let victory = result.winner == Winner::Player;
    let endorsements_won = state.secured_endorsement_count();
    let cash = state.finances.cash_on_hand;

    let mut score = result.margin * SCORE_MARGIN_WEIGHT;
    if victory {
        score += SCORE_VICTORY_BONUS;
    }
    score += SCORE_CASH_TIERS
        .iter()
        .filter(|tier| cash > **tier)
        .map(|_| SCORE_CASH_TIER_BONUS)
        .sum::<f64>();
    score += usize_to_f64(endorsements_won) * SCORE_PER_ENDORSEMENT;
    score += (u64_to_f64(state.finances.email_list_size) / SCORE_EMAIL_UNIT).min(SCORE_EMAIL_CAP);

    let approval_peak = state
        .polls
        .history
        .iter()
        .map(|snapshot| snapshot.player_support)
        .fold(state.polls.player_support, f64::max);

    PostGameScore {
        victory,
        margin: result.margin,
        funds_remaining: cash,
        endorsements_won,
        total_endorsements: state.endorsements.len(),
        events_handled: state.event_history.iter().filter(|e| e.resolved).count(),
        approval_peak,
        final_grade: Grade::for_score(score),
        total_score: round_f64_to_i64(score),
    }
}
