//! Staff roster queries: salaries, eligibility and the bonuses each role grants.
use crate::constants::{
    BASE_ACTION_POINTS, BASE_MARGIN_OF_ERROR, CAMPAIGN_MANAGER_BONUS_AP, COMMS_DIRECTOR_AD_BONUS,
    DIGITAL_DIRECTOR_ONLINE_BONUS, DIGITAL_DIRECTOR_TARGETING_BONUS, FIELD_DIRECTOR_GOTV_BONUS,
    FINANCE_DIRECTOR_BONUS, POLLSTER_MARGIN_OF_ERROR, STAFF_AFFORDABILITY_WEEKS,
};
use crate::state::{CampaignFinances, StaffMember, StaffRole};

/// Whether a member with `role` is on payroll.
#[must_use]
pub fn has_staff(staff: &[StaffMember], role: StaffRole) -> bool {
    staff.iter().any(|member| member.role == role && member.hired)
}

/// Sum of weekly salaries for hired staff.
#[must_use]
pub fn weekly_staff_cost(staff: &[StaffMember]) -> f64 {
    staff
        .iter()
        .filter(|member| member.hired)
        .map(|member| member.cost)
        .sum()
}

/// A role is affordable when an unhired member exists and cash covers four
/// weeks of their salary.
#[must_use]
pub fn can_afford_staff(
    role: StaffRole,
    staff: &[StaffMember],
    finances: &CampaignFinances,
) -> bool {
    staff
        .iter()
        .find(|member| member.role == role && !member.hired)
        .is_some_and(|member| finances.cash_on_hand >= member.cost * STAFF_AFFORDABILITY_WEEKS)
}

#[must_use]
pub const fn is_staff_available(member: &StaffMember, current_turn: u32) -> bool {
    current_turn >= member.available_turn && !member.hired
}

/// Player-facing summary of a role's mechanical bonus.
#[must_use]
pub const fn staff_benefit(role: StaffRole) -> &'static str {
    match role {
        StaffRole::CampaignManager => "+1 Action Point per turn",
        StaffRole::FieldDirector => "GOTV effectiveness +40%",
        StaffRole::CommsDirector => "Ad effectiveness +25%",
        StaffRole::FinanceDirector => "Fundraising income +30%",
        StaffRole::DigitalDirector => "Digital ads +35%, online fundraising +20%",
        StaffRole::Pollster => "Poll margin of error reduced to ±1.5%",
    }
}

/// Weekly action-point budget given the current roster.
#[must_use]
pub fn action_points_for(staff: &[StaffMember]) -> u32 {
    if has_staff(staff, StaffRole::CampaignManager) {
        BASE_ACTION_POINTS + CAMPAIGN_MANAGER_BONUS_AP
    } else {
        BASE_ACTION_POINTS
    }
}

#[must_use]
pub fn margin_of_error_for(staff: &[StaffMember]) -> f64 {
    if has_staff(staff, StaffRole::Pollster) {
        POLLSTER_MARGIN_OF_ERROR
    } else {
        BASE_MARGIN_OF_ERROR
    }
}

/// `1 + bonus` when `role` is hired, otherwise `1`.
fn multiplier(staff: &[StaffMember], role: StaffRole, bonus: f64) -> f64 {
    if has_staff(staff, role) { 1.0 + bonus } else { 1.0 }
}

#[must_use]
pub fn donor_multiplier(staff: &[StaffMember]) -> f64 {
    multiplier(staff, StaffRole::FinanceDirector, FINANCE_DIRECTOR_BONUS)
}

#[must_use]
pub fn online_multiplier(staff: &[StaffMember]) -> f64 {
    multiplier(staff, StaffRole::DigitalDirector, DIGITAL_DIRECTOR_ONLINE_BONUS)
}

#[must_use]
pub fn ad_reach_multiplier(staff: &[StaffMember]) -> f64 {
    multiplier(staff, StaffRole::CommsDirector, COMMS_DIRECTOR_AD_BONUS)
}

#[must_use]
pub fn digital_targeting_multiplier(staff: &[StaffMember]) -> f64 {
    multiplier(staff, StaffRole::DigitalDirector, DIGITAL_DIRECTOR_TARGETING_BONUS)
}

#[must_use]
pub fn gotv_multiplier(staff: &[StaffMember]) -> f64 {
    multiplier(staff, StaffRole::FieldDirector, FIELD_DIRECTOR_GOTV_BONUS)
}
