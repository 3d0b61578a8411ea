//! Weekly polling movement.
//!
//! Demographic support is the source of truth; the aggregate fields and the
//! history snapshot are derived from it after all shifts are applied.

use serde::{Deserialize, Serialize};

use crate::actions::{ActionType, AllocatedAction, of_kind};
use crate::advertising::compute_ad_effects;
use crate::constants::{
    CAMPAIGN_BASE_POLL_BOOST, CAMPAIGN_CHANGE_THRESHOLD, CAMPAIGN_NOISE,
    MOMENTUM_POLL_DAMPING, MOMENTUM_POLL_EFFECT, UNDECIDED_DECAY_RATE, UNDECIDED_MAX,
    UNDECIDED_MIN,
};
use crate::numbers::clamp_finite;
use crate::rng::CampaignRng;
use crate::state::{AdCampaign, DemographicGroup, PollSnapshot, PollState, StaffMember};

/// One recorded shift in a demographic's support.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollChange {
    pub demographic: DemographicGroup,
    pub player_change: f64,
    pub opponent_change: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PollingOutcome {
    pub polls: PollState,
    pub changes: Vec<PollChange>,
}

/// Apply campaign outreach, advertising and momentum to a copy of `polls`,
/// decay the undecided pool and append one history snapshot.
pub fn compute_poll_changes(
    polls: &PollState,
    actions: &[AllocatedAction],
    ads: &[AdCampaign],
    momentum: f64,
    roster: &[StaffMember],
    rng: &mut CampaignRng,
) -> PollingOutcome {
    let mut next = polls.clone();
    let mut changes = Vec::new();

    for action in of_kind(actions, ActionType::Campaign) {
        let base_boost = CAMPAIGN_BASE_POLL_BOOST * action.intensity_f64();
        for demo in &mut next.demographics {
            if action.target.is_some_and(|target| target != demo.id) {
                continue;
            }
            let change = base_boost * demo.persuadability
                + rng.float_in(-CAMPAIGN_NOISE, CAMPAIGN_NOISE);
            if change.abs() > CAMPAIGN_CHANGE_THRESHOLD {
                demo.shift_player(change);
                changes.push(PollChange {
                    demographic: demo.id,
                    player_change: change,
                    opponent_change: 0.0,
                    reason: "Campaign outreach".to_string(),
                });
            }
        }
    }

    for effect in compute_ad_effects(ads, &next.demographics, roster, rng) {
        let Some(demo) = next.demographic_mut(effect.demographic) else {
            continue;
        };
        demo.shift_player(effect.player_change);
        demo.shift_opponent(effect.opponent_change);
        changes.push(PollChange {
            demographic: effect.demographic,
            player_change: effect.player_change,
            opponent_change: effect.opponent_change,
            reason: effect.reason,
        });
    }

    if momentum.abs() > f64::EPSILON {
        let momentum_effect = momentum * MOMENTUM_POLL_EFFECT;
        for demo in &mut next.demographics {
            demo.shift_player(momentum_effect * demo.persuadability * MOMENTUM_POLL_DAMPING);
        }
    }

    let decay = polls.undecided * UNDECIDED_DECAY_RATE;
    next.undecided = clamp_finite(polls.undecided - decay, UNDECIDED_MIN, UNDECIDED_MAX);
    next.recompute_aggregates();

    let turn = u32::try_from(next.history.len()).unwrap_or(u32::MAX);
    next.history.push(PollSnapshot {
        turn,
        player_support: next.player_support,
        opponent_support: next.opponent_support,
        undecided: next.undecided,
    });

    PollingOutcome {
        polls: next,
        changes,
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::advertising::fixtures::electorate;

    pub fn poll_state() -> PollState {
        let mut polls = PollState {
            player_support: 45.0,
            opponent_support: 45.0,
            undecided: 10.0,
            margin_of_error: 3.0,
            demographics: electorate(),
            history: vec![PollSnapshot {
                turn: 0,
                player_support: 45.0,
                opponent_support: 45.0,
                undecided: 10.0,
            }],
        };
        polls.recompute_aggregates();
        polls
    }
}
