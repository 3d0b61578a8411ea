//! Weekly income: donors, PACs and the passive online stream.
use serde::{Deserialize, Serialize};

use crate::actions::{ActionType, AllocatedAction, of_kind};
use crate::constants::{
    EMAIL_LIST_GROWTH_PER_FUNDRAISE, FUNDRAISE_MOMENTUM_FACTOR, FUNDRAISE_NOISE_MAX,
    FUNDRAISE_NOISE_MIN, LARGE_DONOR_BASE, LARGE_DONOR_DIMINISHING_FACTOR,
    LARGE_DONOR_SATURATION_UNIT, ONLINE_MOMENTUM_FACTOR, PAC_MAX_ENDORSEMENTS, PAC_MIN_ENDORSEMENTS,
    PAC_MONEY_BASE, SMALL_DONOR_BASE,
};
use crate::numbers::usize_to_f64;
use crate::rng::CampaignRng;
use crate::staff;
use crate::state::{CampaignFinances, StaffMember};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FundraisingResult {
    pub total_raised: f64,
    pub small_donors: f64,
    pub large_donors: f64,
    pub pac_money: f64,
    pub online_income: f64,
    pub email_list_growth: u64,
}

/// Multiplier applied to large-donor asks given what those donors have
/// already given. Shrinks geometrically per saturation unit.
#[must_use]
pub fn large_donor_saturation(cumulative_large_donors: f64) -> f64 {
    LARGE_DONOR_DIMINISHING_FACTOR.powf(cumulative_large_donors.max(0.0) / LARGE_DONOR_SATURATION_UNIT)
}

/// PAC money for a turn: nothing below the endorsement gate, then a linear
/// share of the base that stops growing at the cap.
#[must_use]
pub fn pac_money_for(endorsements_secured: usize) -> f64 {
    if endorsements_secured < PAC_MIN_ENDORSEMENTS {
        return 0.0;
    }
    let counted = endorsements_secured.min(PAC_MAX_ENDORSEMENTS);
    PAC_MONEY_BASE * usize_to_f64(counted) / usize_to_f64(PAC_MAX_ENDORSEMENTS)
}

/// Passive online income before any action is taken.
#[must_use]
pub fn online_income(finances: &CampaignFinances, roster: &[StaffMember], momentum: f64) -> f64 {
    let income = finances.online_income_rate
        * staff::online_multiplier(roster)
        * (1.0 + momentum * ONLINE_MOMENTUM_FACTOR);
    income.max(0.0)
}

/// Compute this turn's fundraising haul.
pub fn compute_fundraising(
    finances: &CampaignFinances,
    actions: &[AllocatedAction],
    roster: &[StaffMember],
    momentum: f64,
    endorsements_secured: usize,
    rng: &mut CampaignRng,
) -> FundraisingResult {
    let director_bonus = staff::donor_multiplier(roster);
    let momentum_bonus = (1.0 + momentum * FUNDRAISE_MOMENTUM_FACTOR).max(0.0);
    let saturation = large_donor_saturation(finances.large_donors);

    let mut small_donors = 0.0;
    let mut large_donors = 0.0;
    let mut fundraise_actions: u64 = 0;

    for action in of_kind(actions, ActionType::Fundraise) {
        fundraise_actions += 1;
        let intensity = action.intensity_f64();
        let noise = rng.float_in(FUNDRAISE_NOISE_MIN, FUNDRAISE_NOISE_MAX);
        small_donors += SMALL_DONOR_BASE * intensity * director_bonus * momentum_bonus * noise;
        large_donors += LARGE_DONOR_BASE * intensity * director_bonus * saturation * noise;
    }

    let pac_money = pac_money_for(endorsements_secured);
    let online_income = online_income(finances, roster, momentum);

    FundraisingResult {
        total_raised: small_donors + large_donors + pac_money + online_income,
        small_donors,
        large_donors,
        pac_money,
        online_income,
        email_list_growth: fundraise_actions * EMAIL_LIST_GROWTH_PER_FUNDRAISE,
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::finances;
    use super::*;
    use crate::staff::fixtures::roster;
    use crate::state::StaffRole;

    #[test]
    fn online_income_arrives_without_actions() {
        let mut rng = CampaignRng::new(1);
        let result = compute_fundraising(&finances(1e5), &[], &roster(&[]), 0.0, 0, &mut rng);
        assert!((result.online_income - 2_000.0).abs() < 1e-9);
        assert!((result.total_raised - result.online_income).abs() < 1e-9);
        assert_eq!(result.email_list_growth, 0);
    }

    #[test]
    fn fundraising_with_actions_beats_none() {
        let actions = [AllocatedAction::new(ActionType::Fundraise, 1)];
        for seed in 0..25 {
            let none = compute_fundraising(
                &finances(1e5),
                &[],
                &roster(&[]),
                0.0,
                0,
                &mut CampaignRng::new(seed),
            );
            let some = compute_fundraising(
                &finances(1e5),
                &actions,
                &roster(&[]),
                0.0,
                0,
                &mut CampaignRng::new(seed),
            );
            assert!(some.total_raised >= none.total_raised);
        }
    }

    #[test]
    fn large_donors_saturate() {
        let actions = [AllocatedAction::new(ActionType::Fundraise, 2)];
        let fresh = finances(1e5);
        let mut tapped = finances(1e5);
        tapped.large_donors = 500_000.0;
        let a = compute_fundraising(&fresh, &actions, &roster(&[]), 0.0, 0, &mut CampaignRng::new(7));
        let b = compute_fundraising(&tapped, &actions, &roster(&[]), 0.0, 0, &mut CampaignRng::new(7));
        assert!(b.large_donors < a.large_donors);
        assert!((b.small_donors - a.small_donors).abs() < 1e-9);
    }

    #[test]
    fn pac_money_is_gated_and_capped() {
        assert!(pac_money_for(0).abs() < f64::EPSILON);
        assert!(pac_money_for(1).abs() < f64::EPSILON);
        assert!(pac_money_for(2) > 0.0);
        assert!(pac_money_for(3) > pac_money_for(2));
        assert!((pac_money_for(5) - PAC_MONEY_BASE).abs() < 1e-9);
        assert!((pac_money_for(9) - PAC_MONEY_BASE).abs() < 1e-9);
    }

    #[test]
    fn email_growth_counts_actions_not_intensity() {
        let actions = [
            AllocatedAction::new(ActionType::Fundraise, 3),
            AllocatedAction::new(ActionType::Fundraise, 1),
            AllocatedAction::new(ActionType::Campaign, 1),
        ];
        let result = compute_fundraising(
            &finances(1e5),
            &actions,
            &roster(&[]),
            0.0,
            0,
            &mut CampaignRng::new(3),
        );
        assert_eq!(result.email_list_growth, 2 * EMAIL_LIST_GROWTH_PER_FUNDRAISE);
    }

    #[test]
    fn staff_and_momentum_lift_income() {
        let base = online_income(&finances(0.0), &roster(&[]), 0.0);
        let boosted = online_income(&finances(0.0), &roster(&[StaffRole::DigitalDirector]), 10.0);
        assert!((boosted - base * 1.2 * 1.1).abs() < 1e-9);
    }
}
