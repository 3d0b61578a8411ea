//! Persuasion effects of running ad campaigns.
use serde::{Deserialize, Serialize};

use crate::constants::{
    AD_NOISE, AD_SPILLOVER_FACTOR, AD_TARGETED_FACTOR, ATTACK_AD_BACKLASH_CHANCE,
    ATTACK_AD_BACKLASH_PENALTY, ATTACK_TONE_MULTIPLIER, CONTRAST_TONE_MULTIPLIER,
    DIGITAL_COST_PER_WEEK, DIGITAL_REACH, MAILER_COST_PER_WEEK, MAILER_REACH,
    NEGATIVE_AD_OPPONENT_DRAIN, RADIO_COST_PER_WEEK, RADIO_REACH, TV_COST_PER_WEEK, TV_REACH,
};
use crate::rng::CampaignRng;
use crate::staff;
use crate::state::{AdCampaign, AdMedium, AdTone, DemographicData, DemographicGroup, StaffMember};

/// Per-demographic outcome of one ad for one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdEffect {
    pub demographic: DemographicGroup,
    pub player_change: f64,
    pub opponent_change: f64,
    pub reason: String,
    #[serde(default)]
    pub backlash: bool,
}

/// Standard weekly cost of a medium; a budget equal to this runs at 1x.
#[must_use]
pub const fn ad_cost_per_week(medium: AdMedium) -> f64 {
    match medium {
        AdMedium::Tv => TV_COST_PER_WEEK,
        AdMedium::Digital => DIGITAL_COST_PER_WEEK,
        AdMedium::Mailers => MAILER_COST_PER_WEEK,
        AdMedium::Radio => RADIO_COST_PER_WEEK,
    }
}

#[must_use]
pub const fn ad_reach(medium: AdMedium) -> f64 {
    match medium {
        AdMedium::Tv => TV_REACH,
        AdMedium::Digital => DIGITAL_REACH,
        AdMedium::Mailers => MAILER_REACH,
        AdMedium::Radio => RADIO_REACH,
    }
}

/// Total weekly budget across running ads.
#[must_use]
pub fn total_ad_spend(ads: &[AdCampaign]) -> f64 {
    ads.iter().map(|ad| ad.budget.max(0.0)).sum()
}

/// Reach of an ad after staff bonuses.
#[must_use]
pub fn effective_reach(medium: AdMedium, roster: &[StaffMember]) -> f64 {
    let mut reach = ad_reach(medium) * staff::ad_reach_multiplier(roster);
    if medium == AdMedium::Digital {
        reach *= staff::digital_targeting_multiplier(roster);
    }
    reach
}

/// Compute one effect per (ad, demographic) pair.
///
/// A targeted ad hits its target at the full targeting factor and every other
/// demographic at the spillover factor. Attack ads may backlash, replacing
/// the effect for that demographic with a flat player-only penalty.
pub fn compute_ad_effects(
    ads: &[AdCampaign],
    demographics: &[DemographicData],
    roster: &[StaffMember],
    rng: &mut CampaignRng,
) -> Vec<AdEffect> {
    let mut effects = Vec::with_capacity(ads.len() * demographics.len());

    for ad in ads {
        let reach = effective_reach(ad.medium, roster);
        let budget_multiplier = ad.budget.max(0.0) / ad_cost_per_week(ad.medium);

        for demo in demographics {
            let targeted = ad.target_demographic == Some(demo.id);
            let targeting = if targeted {
                AD_TARGETED_FACTOR
            } else {
                AD_SPILLOVER_FACTOR
            };
            let mut effectiveness = reach * demo.persuadability * targeting * budget_multiplier;

            match ad.tone {
                AdTone::Attack => {
                    effectiveness *= ATTACK_TONE_MULTIPLIER;
                    if rng.chance(ATTACK_AD_BACKLASH_CHANCE) {
                        effects.push(AdEffect {
                            demographic: demo.id,
                            player_change: ATTACK_AD_BACKLASH_PENALTY,
                            opponent_change: 0.0,
                            reason: format!("Attack ad backlash with {}", demo.name),
                            backlash: true,
                        });
                        continue;
                    }
                }
                AdTone::Contrast => effectiveness *= CONTRAST_TONE_MULTIPLIER,
                AdTone::PositiveBio | AdTone::PositiveIssue => {}
            }

            let player_change = effectiveness + rng.float_in(-AD_NOISE, AD_NOISE);
            let opponent_change = if ad.tone.is_negative() {
                -player_change * NEGATIVE_AD_OPPONENT_DRAIN
            } else {
                0.0
            };

            effects.push(AdEffect {
                demographic: demo.id,
                player_change,
                opponent_change,
                reason: format!(
                    "{} {} ad{}",
                    ad.tone.label(),
                    ad.medium.label(),
                    if targeted { " (targeted)" } else { "" }
                ),
                backlash: false,
            });
        }
    }

    effects
}


#[cfg(test)]
mod tests {
    use super::fixtures::electorate;
    use super::*;
    use crate::staff::fixtures::roster;
    use crate::state::StaffRole;

    fn ad(medium: AdMedium, tone: AdTone, target: Option<DemographicGroup>) -> AdCampaign {
        AdCampaign {
            medium,
            tone,
            budget: ad_cost_per_week(medium),
            target_demographic: target,
        }
    }

    #[test]
    fn untargeted_ad_touches_every_demographic_with_spillover() {
        let demos = electorate();
        let mut rng = CampaignRng::new(3);
        let effects = compute_ad_effects(
            &[ad(AdMedium::Tv, AdTone::PositiveBio, None)],
            &demos,
            &roster(&[]),
            &mut rng,
        );
        assert_eq!(effects.len(), demos.len());
        let expected = TV_REACH * 0.5 * AD_SPILLOVER_FACTOR;
        for effect in &effects {
            assert!((effect.player_change - expected).abs() <= AD_NOISE + 1e-9);
            assert!(effect.opponent_change.abs() < f64::EPSILON);
            assert!(!effect.backlash);
        }
    }

    #[test]
    fn targeted_demographic_outweighs_spillover() {
        let demos = electorate();
        let mut rng = CampaignRng::new(11);
        let target = DemographicGroup::RetireesSeniors;
        let effects = compute_ad_effects(
            &[ad(AdMedium::Mailers, AdTone::PositiveIssue, Some(target))],
            &demos,
            &roster(&[]),
            &mut rng,
        );
        let hit = effects.iter().find(|e| e.demographic == target).unwrap();
        assert!(hit.reason.ends_with("(targeted)"));
        let expected = MAILER_REACH * 0.5 * AD_TARGETED_FACTOR;
        assert!((hit.player_change - expected).abs() <= AD_NOISE + 1e-9);
        assert_eq!(effects.len(), demos.len());
    }

    #[test]
    fn contrast_ads_drain_opponent() {
        let demos = electorate();
        let mut rng = CampaignRng::new(5);
        let effects = compute_ad_effects(
            &[ad(AdMedium::Radio, AdTone::Contrast, None)],
            &demos,
            &roster(&[]),
            &mut rng,
        );
        for effect in effects {
            let drained = -effect.player_change * NEGATIVE_AD_OPPONENT_DRAIN;
            assert!((effect.opponent_change - drained).abs() < 1e-12);
        }
    }

    #[test]
    fn backlash_replaces_effect_with_penalty() {
        let demos = electorate();
        let mut saw_backlash = false;
        for seed in 0..20 {
            let mut rng = CampaignRng::new(seed);
            let effects = compute_ad_effects(
                &[ad(AdMedium::Tv, AdTone::Attack, None)],
                &demos,
                &roster(&[]),
                &mut rng,
            );
            for effect in effects.iter().filter(|e| e.backlash) {
                saw_backlash = true;
                assert!(effect.reason.contains("backlash"));
                assert!((effect.player_change - ATTACK_AD_BACKLASH_PENALTY).abs() < f64::EPSILON);
                assert!(effect.opponent_change.abs() < f64::EPSILON);
            }
        }
        assert!(saw_backlash);
    }

    #[test]
    fn staff_bonuses_scale_reach() {
        let base = effective_reach(AdMedium::Digital, &roster(&[]));
        let comms = effective_reach(AdMedium::Digital, &roster(&[StaffRole::CommsDirector]));
        let both = effective_reach(
            AdMedium::Digital,
            &roster(&[StaffRole::CommsDirector, StaffRole::DigitalDirector]),
        );
        assert!((comms / base - 1.25).abs() < 1e-9);
        assert!((both / base - 1.25 * 1.35).abs() < 1e-9);
        let tv = effective_reach(AdMedium::Tv, &roster(&[StaffRole::DigitalDirector]));
        assert!((tv - TV_REACH).abs() < 1e-12);
    }

    #[test]
    fn ad_spend_sums_budgets() {
        let ads = vec![
            ad(AdMedium::Tv, AdTone::Attack, None),
            ad(AdMedium::Radio, AdTone::PositiveBio, None),
        ];
        assert!((total_ad_spend(&ads) - 62_000.0).abs() < f64::EPSILON);
    }
}
