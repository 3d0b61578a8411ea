//! Static campaign content: district, staff roster, endorsement catalog,
//! opponent profile and the event catalog.
//!
//! The engine treats content as read-only configuration. The default set is
//! embedded at compile time; shells may supply their own through
//! [`ContentSource`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::events::GameEvent;
use crate::numbers::clamp_pct;
use crate::opponent::OpponentProfile;
use crate::state::{
    DemographicData, DemographicGroup, Endorsement, EndorsementStatus, IssueKey, StaffMember,
    StaffRole,
};

const DISTRICT_JSON: &str = include_str!("../assets/data/district.json");
const STAFF_JSON: &str = include_str!("../assets/data/staff.json");
const ENDORSEMENTS_JSON: &str = include_str!("../assets/data/endorsements.json");
const OPPONENT_JSON: &str = include_str!("../assets/data/opponent.json");
const EVENT_FILES: [(&str, &str); 5] = [
    (
        "events/national.json",
        include_str!("../assets/data/events/national.json"),
    ),
    (
        "events/local.json",
        include_str!("../assets/data/events/local.json"),
    ),
    (
        "events/campaign.json",
        include_str!("../assets/data/events/campaign.json"),
    ),
    (
        "events/opponent.json",
        include_str!("../assets/data/events/opponent.json"),
    ),
    (
        "events/debate.json",
        include_str!("../assets/data/events/debate.json"),
    ),
];

const ELECTORATE_TOLERANCE: f64 = 0.5;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to parse {asset}: {source}")]
    Parse {
        asset: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("district must define {expected} demographics (got {found})")]
    DemographicCount { expected: usize, found: usize },
    #[error("demographic {0} is defined more than once")]
    DuplicateDemographic(DemographicGroup),
    #[error("electorate shares must sum to 100 (got {0:.2})")]
    ElectorateShares(f64),
    #[error("persuadability for {demographic} must be within [0, 1] (got {value:.2})")]
    Persuadability {
        demographic: DemographicGroup,
        value: f64,
    },
    #[error("staff roster must cover every role exactly once; {0} is missing or repeated")]
    StaffRoles(StaffRole),
    #[error("event id {0} is not unique")]
    DuplicateEvent(String),
    #[error("event {id} probability must be within [0, 1] (got {value:.2})")]
    EventProbability { id: String, value: f64 },
    #[error("event {0} has no choices")]
    EmptyChoices(String),
    #[error("risk on {event}/{choice} must have probability within [0, 1] (got {value:.2})")]
    RiskProbability {
        event: String,
        choice: String,
        value: f64,
    },
}

/// Demographic definition as shipped in district content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictDemographic {
    pub id: DemographicGroup,
    pub name: String,
    pub electorate_pct: f64,
    pub base_lean: f64,
    pub persuadability: f64,
    #[serde(default)]
    pub key_issues: Vec<IssueKey>,
}

impl DistrictDemographic {
    /// Opening support for a demographic from the preset's starting split.
    ///
    /// Lean pulls each side up where it favours them and down where it does
    /// not; pairs summing past 95 are rescaled to 90 to leave undecideds.
    #[must_use]
    pub fn seed_support(&self, player_start: f64, opponent_start: f64) -> DemographicData {
        let lean = self.base_lean;
        let mut player = player_start + if lean > 0.0 { lean * 0.3 } else { lean * 0.2 };
        let mut opponent = opponent_start
            + if lean < 0.0 {
                lean.abs() * 0.3
            } else {
                -lean * 0.2
            };
        let total = player + opponent;
        if total > 95.0 {
            let scale = 90.0 / total;
            player *= scale;
            opponent *= scale;
        }
        DemographicData {
            id: self.id,
            name: self.name.clone(),
            electorate_pct: self.electorate_pct,
            base_lean: lean,
            persuadability: self.persuadability,
            key_issues: self.key_issues.clone(),
            current_support: clamp_pct(player),
            opponent_support: clamp_pct(opponent),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueData {
    pub id: IssueKey,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub salience: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictData {
    pub id: String,
    pub name: String,
    pub state: String,
    pub population: u64,
    pub demographics: Vec<DistrictDemographic>,
    #[serde(default)]
    pub issues: Vec<IssueData>,
}

/// Everything the engine needs besides the difficulty preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignContent {
    pub district: DistrictData,
    pub staff: Vec<StaffMember>,
    pub endorsements: Vec<Endorsement>,
    pub opponent: OpponentProfile,
    pub events: Vec<GameEvent>,
}

fn parse<T: serde::de::DeserializeOwned>(asset: &'static str, json: &str) -> Result<T, ContentError> {
    serde_json::from_str(json).map_err(|source| ContentError::Parse { asset, source })
}

impl CampaignContent {
    /// Content embedded in the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if an embedded asset fails to parse or validate.
    pub fn default_content() -> Result<Self, ContentError> {
        let mut events = Vec::new();
        for (asset, json) in EVENT_FILES {
            events.extend(parse::<Vec<GameEvent>>(asset, json)?);
        }
        Self::new(
            parse("district.json", DISTRICT_JSON)?,
            parse("staff.json", STAFF_JSON)?,
            parse("endorsements.json", ENDORSEMENTS_JSON)?,
            parse("opponent.json", OPPONENT_JSON)?,
            events,
        )
    }

    /// Assemble and validate content. Roster and catalog lifecycle fields are
    /// reset so a fresh campaign never inherits progress.
    ///
    /// # Errors
    ///
    /// Returns an error if the content violates a structural rule.
    pub fn new(
        district: DistrictData,
        mut staff: Vec<StaffMember>,
        mut endorsements: Vec<Endorsement>,
        opponent: OpponentProfile,
        events: Vec<GameEvent>,
    ) -> Result<Self, ContentError> {
        for member in &mut staff {
            member.hired = false;
        }
        for endorsement in &mut endorsements {
            endorsement.status = EndorsementStatus::NotPursued;
            endorsement.turns_pursued = 0;
        }
        let content = Self {
            district,
            staff,
            endorsements,
            opponent,
            events,
        };
        content.validate()?;
        Ok(content)
    }

    /// Check structural rules the engine relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> Result<(), ContentError> {
        let demographics = &self.district.demographics;
        if demographics.len() != DemographicGroup::ALL.len() {
            return Err(ContentError::DemographicCount {
                expected: DemographicGroup::ALL.len(),
                found: demographics.len(),
            });
        }
        let mut seen = HashSet::new();
        for demo in demographics {
            if !seen.insert(demo.id) {
                return Err(ContentError::DuplicateDemographic(demo.id));
            }
            if !(0.0..=1.0).contains(&demo.persuadability) {
                return Err(ContentError::Persuadability {
                    demographic: demo.id,
                    value: demo.persuadability,
                });
            }
        }
        let shares: f64 = demographics.iter().map(|demo| demo.electorate_pct).sum();
        if (shares - 100.0).abs() > ELECTORATE_TOLERANCE {
            return Err(ContentError::ElectorateShares(shares));
        }

        for role in StaffRole::ALL {
            if self.staff.iter().filter(|member| member.role == role).count() != 1 {
                return Err(ContentError::StaffRoles(role));
            }
        }

        let mut ids = HashSet::new();
        for event in &self.events {
            if !ids.insert(event.id.as_str()) {
                return Err(ContentError::DuplicateEvent(event.id.clone()));
            }
            if !(0.0..=1.0).contains(&event.probability) {
                return Err(ContentError::EventProbability {
                    id: event.id.clone(),
                    value: event.probability,
                });
            }
            if event.choices.is_empty() {
                return Err(ContentError::EmptyChoices(event.id.clone()));
            }
            for choice in &event.choices {
                if let Some(risk) = &choice.risk
                    && !(0.0..=1.0).contains(&risk.probability)
                {
                    return Err(ContentError::RiskProbability {
                        event: event.id.clone(),
                        choice: choice.id.clone(),
                        value: risk.probability,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Supplies campaign content to the engine.
pub trait ContentSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the full content set.
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be loaded or fails validation.
    fn load_content(&self) -> Result<CampaignContent, Self::Error>;
}

/// Content compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedContent;

impl ContentSource for EmbeddedContent {
    type Error = ContentError;

    fn load_content(&self) -> Result<CampaignContent, Self::Error> {
        CampaignContent::default_content()
    }
}
