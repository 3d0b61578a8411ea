//! Endorsement pursuit and the one-time boosts secured endorsements grant.
use regex::Regex;
use std::sync::OnceLock;

use crate::actions::{ActionType, AllocatedAction, contains_kind};
use crate::state::{DemographicData, Endorsement, EndorsementStatus, PollState};

/// Outcome of one turn of pursuit. `endorsements` is the updated catalog.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EndorsementProgress {
    pub endorsements: Vec<Endorsement>,
    pub secured: Vec<Endorsement>,
    pub progressed: Vec<Endorsement>,
}

impl EndorsementProgress {
    #[must_use]
    pub fn any_secured(&self) -> bool {
        !self.secured.is_empty()
    }
}

fn threshold_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(\d+(?:\.\d+)?)\s*%").ok())
        .as_ref()
}

/// Numeric poll threshold named in a free-text requirement, e.g.
/// `"Must be polling above 43%"`.
#[must_use]
pub fn poll_threshold(requirements: &str) -> Option<f64> {
    threshold_pattern()?
        .captures(requirements)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Whether the player may start pursuing `endorsement` at `player_support`.
#[must_use]
pub fn can_pursue_endorsement(endorsement: &Endorsement, player_support: f64) -> bool {
    if endorsement.status != EndorsementStatus::NotPursued {
        return false;
    }
    poll_threshold(&endorsement.requirements).is_none_or(|threshold| player_support >= threshold)
}

/// Advance every pursued endorsement by one turn when the player spent at
/// least one action seeking endorsements. No-op otherwise.
#[must_use]
pub fn process_endorsements(
    endorsements: &[Endorsement],
    actions: &[AllocatedAction],
    _polls: &PollState,
) -> EndorsementProgress {
    let mut progress = EndorsementProgress {
        endorsements: endorsements.to_vec(),
        ..EndorsementProgress::default()
    };
    if !contains_kind(actions, ActionType::SeekEndorsement) {
        return progress;
    }

    for endorsement in progress.endorsements.iter_mut().filter(|e| e.is_pursued()) {
        endorsement.turns_pursued = endorsement.turns_pursued.saturating_add(1);
        if endorsement.turns_pursued >= endorsement.turns_to_secure {
            endorsement.status = EndorsementStatus::Secured;
            progress.secured.push(endorsement.clone());
        } else {
            progress.progressed.push(endorsement.clone());
        }
    }

    progress
}

/// Apply a newly secured endorsement's per-demographic boosts. Call once, at
/// the transition to secured.
pub fn apply_endorsement_effects(endorsement: &Endorsement, demographics: &mut [DemographicData]) {
    for demo in demographics {
        if let Some(effect) = endorsement.demographic_effects.get(&demo.id) {
            demo.shift_player(*effect);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::endorsement;
    use super::*;
    use crate::advertising::fixtures::electorate;
    use crate::polling::fixtures::poll_state;
    use crate::state::DemographicGroup;

    fn pursued(id: &str, turns: u32) -> Endorsement {
        let mut e = endorsement(id, turns, "");
        e.status = EndorsementStatus::Pursued;
        e
    }

    #[test]
    fn threshold_parses_from_requirement_text() {
        assert_eq!(poll_threshold("Must be polling above 43%"), Some(43.0));
        assert_eq!(poll_threshold("Poll at 40 % or better"), Some(40.0));
        assert_eq!(poll_threshold("Hold a town hall"), None);
    }

    #[test]
    fn pursuit_rejects_active_and_gated() {
        let open = endorsement("union", 3, "");
        assert!(can_pursue_endorsement(&open, 10.0));
        assert!(!can_pursue_endorsement(&pursued("union", 3), 60.0));

        let gated = endorsement("paper", 2, "Must be polling above 43%");
        assert!(!can_pursue_endorsement(&gated, 42.9));
        assert!(can_pursue_endorsement(&gated, 43.0));

        let mut secured = endorsement("vets", 2, "");
        secured.status = EndorsementStatus::Secured;
        assert!(!can_pursue_endorsement(&secured, 60.0));
    }

    #[test]
    fn no_seek_action_is_a_no_op() {
        let list = vec![pursued("a", 1), pursued("b", 3)];
        let actions = [AllocatedAction::new(ActionType::Fundraise, 2)];
        let progress = process_endorsements(&list, &actions, &poll_state());
        assert!(progress.secured.is_empty());
        assert!(progress.progressed.is_empty());
        assert_eq!(progress.endorsements, list);
    }

    #[test]
    fn pursuit_advances_and_secures() {
        let list = vec![
            pursued("fast", 1),
            pursued("slow", 3),
            endorsement("idle", 1, ""),
        ];
        let actions = [AllocatedAction::new(ActionType::SeekEndorsement, 1)];
        let progress = process_endorsements(&list, &actions, &poll_state());
        assert_eq!(progress.secured.len(), 1);
        assert_eq!(progress.secured[0].id, "fast");
        assert_eq!(progress.progressed.len(), 1);
        assert_eq!(progress.progressed[0].turns_pursued, 1);
        assert_eq!(progress.endorsements[2].status, EndorsementStatus::NotPursued);
        assert!(progress.endorsements[0].is_secured());

        let again = process_endorsements(&progress.endorsements, &actions, &poll_state());
        assert!(again.secured.is_empty());
    }

    #[test]
    fn effects_apply_to_listed_demographics_only() {
        let mut demos = electorate();
        let before = demos.clone();
        apply_endorsement_effects(&endorsement("vets", 1, ""), &mut demos);
        for (b, a) in before.iter().zip(&demos) {
            let delta = a.current_support - b.current_support;
            if a.id == DemographicGroup::VeteransMilitary {
                assert!((delta - 3.0).abs() < 1e-9);
            } else {
                assert!(delta.abs() < f64::EPSILON);
            }
        }
    }
}
