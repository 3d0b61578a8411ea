//! Player action vocabulary.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::state::DemographicGroup;

/// The six weekly action kinds a player can spend action points on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionType {
    Fundraise,
    Campaign,
    SeekEndorsement,
    OppoResearch,
    DebatePrep,
    Gotv,
}

impl ActionType {
    pub const ALL: [Self; 6] = [
        Self::Fundraise,
        Self::Campaign,
        Self::SeekEndorsement,
        Self::OppoResearch,
        Self::DebatePrep,
        Self::Gotv,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Fundraise => "fundraise",
            Self::Campaign => "campaign",
            Self::SeekEndorsement => "seek-endorsement",
            Self::OppoResearch => "oppo-research",
            Self::DebatePrep => "debate-prep",
            Self::Gotv => "gotv",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ActionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|action| action.key() == needle)
            .ok_or_else(|| format!("unknown action type: {s}"))
    }
}

/// One allocation of action points for the coming turn.
///
/// The engine treats `intensity` as an unconstrained multiplier; the session
/// layer charges one action point per unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatedAction {
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub intensity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<DemographicGroup>,
}

impl AllocatedAction {
    #[must_use]
    pub const fn new(action_type: ActionType, intensity: u32) -> Self {
        Self {
            action_type,
            intensity,
            target: None,
        }
    }

    #[must_use]
    pub const fn targeting(mut self, target: DemographicGroup) -> Self {
        self.target = Some(target);
        self
    }

    #[must_use]
    pub fn intensity_f64(&self) -> f64 {
        f64::from(self.intensity)
    }
}

/// Iterate over allocations of one kind.
pub fn of_kind(
    actions: &[AllocatedAction],
    kind: ActionType,
) -> impl Iterator<Item = &AllocatedAction> {
    actions.iter().filter(move |action| action.action_type == kind)
}

/// Whether any allocation of `kind` is present.
#[must_use]
pub fn contains_kind(actions: &[AllocatedAction], kind: ActionType) -> bool {
    of_kind(actions, kind).next().is_some()
}

/// Total action points (intensity units) across all allocations.
#[must_use]
pub fn total_intensity(actions: &[AllocatedAction]) -> u32 {
    actions
        .iter()
        .fold(0_u32, |acc, action| acc.saturating_add(action.intensity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_types_parse_from_kebab_keys() {
        for action in ActionType::ALL {
            assert_eq!(action.key().parse::<ActionType>().unwrap(), action);
        }
        assert!("canvass".parse::<ActionType>().is_err());
    }

    #[test]
    fn allocated_action_serializes_type_field() {
        let action = AllocatedAction::new(ActionType::SeekEndorsement, 2)
            .targeting(DemographicGroup::VeteransMilitary);
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "seek-endorsement");
        assert_eq!(json["target"], "veterans-military");

        let bare: AllocatedAction =
            serde_json::from_str(r#"{"type":"fundraise","intensity":3}"#).unwrap();
        assert_eq!(bare.target, None);
        assert_eq!(bare.intensity, 3);
    }

    #[test]
    fn kind_helpers_filter_and_sum() {
        let actions = vec![
            AllocatedAction::new(ActionType::Fundraise, 2),
            AllocatedAction::new(ActionType::Campaign, 1),
            AllocatedAction::new(ActionType::Fundraise, 1),
        ];
        assert_eq!(of_kind(&actions, ActionType::Fundraise).count(), 2);
        assert!(contains_kind(&actions, ActionType::Campaign));
        assert!(!contains_kind(&actions, ActionType::Gotv));
        assert_eq!(total_intensity(&actions), 4);
    }
}
