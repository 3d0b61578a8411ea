//! Campaign state snapshot and the value types it is built from.
//!
//! The calling shell owns a [`CampaignState`] between turns. Engine
//! functions borrow it and hand back fresh values; nothing in this crate keeps
//! a reference across calls.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::actions::AllocatedAction;
use crate::config::{CampaignPhase, Difficulty};
use crate::election::ElectionResult;
use crate::events::ActiveEvent;
use crate::numbers::clamp_pct;

/// The seven voter segments tracked independently in the district.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum DemographicGroup {
    SuburbanFamilies,
    LatinoHispanic,
    AsianAmerican,
    RetireesSeniors,
    HospitalityWorkers,
    RuralConservative,
    VeteransMilitary,
}

impl DemographicGroup {
    pub const ALL: [Self; 7] = [
        Self::SuburbanFamilies,
        Self::LatinoHispanic,
        Self::AsianAmerican,
        Self::RetireesSeniors,
        Self::HospitalityWorkers,
        Self::RuralConservative,
        Self::VeteransMilitary,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::SuburbanFamilies => "suburban-families",
            Self::LatinoHispanic => "latino-hispanic",
            Self::AsianAmerican => "asian-american",
            Self::RetireesSeniors => "retirees-seniors",
            Self::HospitalityWorkers => "hospitality-workers",
            Self::RuralConservative => "rural-conservative",
            Self::VeteransMilitary => "veterans-military",
        }
    }
}

impl fmt::Display for DemographicGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Policy areas voters weigh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKey {
    WaterDrought,
    HousingCosts,
    EconomyCostOfLiving,
    Immigration,
    Healthcare,
    Education,
}

/// Support tracking for one demographic. Source of truth for the aggregate poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicData {
    pub id: DemographicGroup,
    pub name: String,
    pub electorate_pct: f64,
    /// -100 (strongly favours the opponent's party) to +100 (the player's).
    pub base_lean: f64,
    pub persuadability: f64,
    #[serde(default)]
    pub key_issues: Vec<IssueKey>,
    pub current_support: f64,
    pub opponent_support: f64,
}

impl DemographicData {
    /// Shift player support, clamped to `[0, 100]`.
    pub fn shift_player(&mut self, delta: f64) {
        self.current_support = clamp_pct(self.current_support + delta);
    }

    /// Shift opponent support, clamped to `[0, 100]`.
    pub fn shift_opponent(&mut self, delta: f64) {
        self.opponent_support = clamp_pct(self.opponent_support + delta);
    }

    #[must_use]
    pub fn weight(&self) -> f64 {
        self.electorate_pct / 100.0
    }
}

/// One aggregate poll reading; history index equals the turn number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PollSnapshot {
    pub turn: u32,
    pub player_support: f64,
    pub opponent_support: f64,
    pub undecided: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollState {
    pub player_support: f64,
    pub opponent_support: f64,
    pub undecided: f64,
    pub margin_of_error: f64,
    pub demographics: Vec<DemographicData>,
    pub history: Vec<PollSnapshot>,
}

impl PollState {
    #[must_use]
    pub fn demographic(&self, id: DemographicGroup) -> Option<&DemographicData> {
        self.demographics.iter().find(|demo| demo.id == id)
    }

    pub fn demographic_mut(&mut self, id: DemographicGroup) -> Option<&mut DemographicData> {
        self.demographics.iter_mut().find(|demo| demo.id == id)
    }

    /// Electorate-share-weighted `(player, opponent)` support.
    #[must_use]
    pub fn weighted_support(&self) -> (f64, f64) {
        self.demographics
            .iter()
            .fold((0.0, 0.0), |(player, opponent), demo| {
                (
                    player + demo.current_support * demo.weight(),
                    opponent + demo.opponent_support * demo.weight(),
                )
            })
    }

    /// Re-derive the aggregate fields from the demographics without touching
    /// history or the undecided pool.
    pub fn recompute_aggregates(&mut self) {
        let (player, opponent) = self.weighted_support();
        let ceiling = 100.0 - self.undecided;
        self.player_support = player.clamp(0.0, ceiling);
        self.opponent_support = opponent.clamp(0.0, ceiling);
    }

    /// Player lead in aggregate points (negative when trailing).
    #[must_use]
    pub fn margin(&self) -> f64 {
        self.player_support - self.opponent_support
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FundraisingSnapshot {
    pub turn: u32,
    pub raised: f64,
    pub spent: f64,
    pub cash_on_hand: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignFinances {
    pub cash_on_hand: f64,
    pub total_raised: f64,
    pub total_spent: f64,
    pub small_donors: f64,
    pub large_donors: f64,
    pub pac_money: f64,
    pub online_income_rate: f64,
    pub email_list_size: u64,
    pub weekly_burn_rate: f64,
    pub fundraising_history: Vec<FundraisingSnapshot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdMedium {
    Tv,
    Digital,
    Mailers,
    Radio,
}

impl AdMedium {
    pub const ALL: [Self; 4] = [Self::Tv, Self::Digital, Self::Mailers, Self::Radio];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Tv => "tv",
            Self::Digital => "digital",
            Self::Mailers => "mailers",
            Self::Radio => "radio",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdTone {
    PositiveBio,
    PositiveIssue,
    Contrast,
    Attack,
}

impl AdTone {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PositiveBio => "positive-bio",
            Self::PositiveIssue => "positive-issue",
            Self::Contrast => "contrast",
            Self::Attack => "attack",
        }
    }

    /// Tones that also drain opponent support.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        matches!(self, Self::Contrast | Self::Attack)
    }
}

/// A running ad buy; persists across turns until the player removes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdCampaign {
    pub medium: AdMedium,
    pub tone: AdTone,
    pub budget: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_demographic: Option<DemographicGroup>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StaffRole {
    CampaignManager,
    FieldDirector,
    CommsDirector,
    FinanceDirector,
    DigitalDirector,
    Pollster,
}

impl StaffRole {
    pub const ALL: [Self; 6] = [
        Self::CampaignManager,
        Self::FieldDirector,
        Self::CommsDirector,
        Self::FinanceDirector,
        Self::DigitalDirector,
        Self::Pollster,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::CampaignManager => "campaign-manager",
            Self::FieldDirector => "field-director",
            Self::CommsDirector => "comms-director",
            Self::FinanceDirector => "finance-director",
            Self::DigitalDirector => "digital-director",
            Self::Pollster => "pollster",
        }
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: String,
    pub role: StaffRole,
    pub name: String,
    /// Weekly salary.
    pub cost: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub hired: bool,
    pub available_turn: u32,
}

/// Endorsement lifecycle. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum EndorsementStatus {
    #[default]
    NotPursued,
    Pursued,
    Secured,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endorsement {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub demographic_effects: BTreeMap<DemographicGroup, f64>,
    #[serde(default)]
    pub fundraising_bonus: f64,
    #[serde(default)]
    pub credibility_bonus: f64,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub status: EndorsementStatus,
    pub turns_to_secure: u32,
    #[serde(default)]
    pub turns_pursued: u32,
}

impl Endorsement {
    #[must_use]
    pub fn is_secured(&self) -> bool {
        self.status == EndorsementStatus::Secured
    }

    #[must_use]
    pub fn is_pursued(&self) -> bool {
        self.status == EndorsementStatus::Pursued
    }
}

/// Opponent posture, recomputed every turn from polling and the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OpponentStrategy {
    #[default]
    Establishment,
    Aggressive,
    Defensive,
}

impl OpponentStrategy {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Establishment => "establishment",
            Self::Aggressive => "aggressive",
            Self::Defensive => "defensive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpponentState {
    pub name: String,
    pub party: String,
    pub cash_on_hand: f64,
    pub total_spent: f64,
    pub approval_rating: f64,
    pub attack_mode: bool,
    pub endorsements_secured: Vec<String>,
    /// 1-5; scales campaign-stop effectiveness.
    pub staff_level: u8,
    pub ad_spending: f64,
    pub gotv_investment: f64,
    pub strategy: OpponentStrategy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Player,
    Opponent,
}

/// Actions submitted for one resolved turn; replaying these with the same
/// seed reproduces the campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub turn: u32,
    pub actions: Vec<AllocatedAction>,
}

/// Complete per-game snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignState {
    pub difficulty: Difficulty,
    pub current_turn: u32,
    pub max_turns: u32,
    pub phase: CampaignPhase,
    pub action_points: u32,
    pub max_action_points: u32,
    pub polls: PollState,
    pub finances: CampaignFinances,
    pub ads: Vec<AdCampaign>,
    pub staff: Vec<StaffMember>,
    pub endorsements: Vec<Endorsement>,
    pub opponent: OpponentState,
    /// -10..=10.
    pub momentum: f64,
    /// Momentum from events resolved this turn, folded in by the next turn
    /// computation.
    #[serde(default)]
    pub pending_event_momentum: f64,
    pub gotv_investment: f64,
    #[serde(default)]
    pub active_events: Vec<ActiveEvent>,
    #[serde(default)]
    pub event_history: Vec<ActiveEvent>,
    #[serde(default)]
    pub action_log: Vec<ActionRecord>,
    pub seed: u64,
    #[serde(default = "default_population")]
    pub population: u64,
    pub game_over: bool,
    #[serde(default)]
    pub winner: Option<Winner>,
    #[serde(default)]
    pub final_margin: Option<f64>,
    #[serde(default)]
    pub election: Option<ElectionResult>,
}

const fn default_population() -> u64 {
    crate::constants::DEFAULT_DISTRICT_POPULATION
}

impl CampaignState {
    #[must_use]
    pub fn secured_endorsement_count(&self) -> usize {
        self.endorsements.iter().filter(|e| e.is_secured()).count()
    }

    #[must_use]
    pub fn has_staff(&self, role: StaffRole) -> bool {
        crate::staff::has_staff(&self.staff, role)
    }

    /// Ids of every event that has fired this campaign, archived or pending.
    #[must_use]
    pub fn fired_event_ids(&self) -> Vec<String> {
        self.event_history
            .iter()
            .chain(self.active_events.iter())
            .map(|active| active.event.id.clone())
            .collect()
    }

    #[must_use]
    pub fn unresolved_events(&self) -> usize {
        self.active_events.iter().filter(|e| !e.resolved).count()
    }

    #[must_use]
    pub const fn is_final_turn(&self) -> bool {
        self.current_turn >= self.max_turns
    }
}
