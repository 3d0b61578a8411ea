//! Get-out-the-vote investment.
use serde::{Deserialize, Serialize};

use crate::actions::{ActionType, AllocatedAction, of_kind};
use crate::constants::{
    GOTV_AVAILABLE_TURN, GOTV_BASE_INVESTMENT, GOTV_FINAL_EFFECT_MAX, GOTV_INVESTMENT_UNIT,
    GOTV_TURNOUT_MULTIPLIER,
};
use crate::staff;
use crate::state::StaffMember;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct GotvResult {
    pub investment_added: f64,
    pub total_investment: f64,
    /// Preview only; the election recomputes turnout from the final totals.
    pub estimated_turnout_bonus: f64,
}

#[must_use]
pub const fn is_gotv_available(turn: u32) -> bool {
    turn >= GOTV_AVAILABLE_TURN
}

/// Turnout bonus in points for a cumulative investment, capped.
#[must_use]
pub fn turnout_bonus(total_investment: f64) -> f64 {
    (total_investment.max(0.0) / GOTV_INVESTMENT_UNIT * GOTV_TURNOUT_MULTIPLIER)
        .min(GOTV_FINAL_EFFECT_MAX)
}

/// All-zero before the unlock turn.
#[must_use]
pub fn compute_gotv(
    current_investment: f64,
    actions: &[AllocatedAction],
    roster: &[StaffMember],
    turn: u32,
) -> GotvResult {
    if !is_gotv_available(turn) {
        return GotvResult::default();
    }

    let field_bonus = staff::gotv_multiplier(roster);
    let investment_added: f64 = of_kind(actions, ActionType::Gotv)
        .map(|action| GOTV_BASE_INVESTMENT * action.intensity_f64() * field_bonus)
        .sum();
    let total_investment = current_investment + investment_added;

    GotvResult {
        investment_added,
        total_investment,
        estimated_turnout_bonus: turnout_bonus(total_investment),
    }
}
