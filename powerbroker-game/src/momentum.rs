//! Campaign momentum.
use crate::constants::{MOMENTUM_DECAY, MOMENTUM_ENDORSEMENT_BONUS, MOMENTUM_MAX, MOMENTUM_MIN};
use crate::numbers::clamp_finite;

/// Next momentum value.
///
/// Decays one step toward zero (never past it), then reacts to the poll
/// swing in discrete buckets. Swings between 0.5 and 1 in magnitude land in
/// the half-point bucket; anything within 0.5 adds nothing.
#[must_use]
pub fn compute_momentum(
    current: f64,
    poll_change: f64,
    events_impact: f64,
    endorsement_gained: bool,
) -> f64 {
    let mut next = if current > 0.0 {
        (current - MOMENTUM_DECAY).max(0.0)
    } else if current < 0.0 {
        (current + MOMENTUM_DECAY).min(0.0)
    } else {
        0.0
    };

    next += if poll_change > 1.0 {
        1.0
    } else if poll_change > 0.5 {
        0.5
    } else if poll_change < -1.0 {
        -1.0
    } else if poll_change < -0.5 {
        -0.5
    } else {
        0.0
    };

    next += events_impact;
    if endorsement_gained {
        next += MOMENTUM_ENDORSEMENT_BONUS;
    }

    clamp_finite(next, MOMENTUM_MIN, MOMENTUM_MAX)
}

/// Short narrative label for a momentum value.
#[must_use]
pub fn momentum_label(momentum: f64) -> &'static str {
    if momentum >= 5.0 {
        "Surging"
    } else if momentum >= 2.0 {
        "Building"
    } else if momentum > 0.0 {
        "Slight edge"
    } else if momentum >= 0.0 {
        "Neutral"
    } else if momentum > -2.0 {
        "Headwinds"
    } else if momentum > -5.0 {
        "Struggling"
    } else {
        "Collapsing"
    }
}
