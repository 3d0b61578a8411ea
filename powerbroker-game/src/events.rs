//! Narrative events: catalog shapes, per-turn draws and choice resolution.
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::config::CampaignPhase;
use crate::constants::{EVENTS_PER_TURN_MAX, MOMENTUM_MAX, MOMENTUM_MIN};
use crate::numbers::{clamp_finite, clamp_pct, round_f64_to_i64};
use crate::rng::CampaignRng;
use crate::state::{CampaignState, DemographicGroup, StaffRole};

/// Events drawn for one turn: at most one debate plus the random cap.
pub type TurnEvents = SmallVec<[ActiveEvent; 3]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    National,
    Local,
    Campaign,
    Opponent,
    Debate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSeverity {
    Minor,
    Moderate,
    Major,
    Crisis,
}

/// Eligibility predicate over the campaign state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum EventPrerequisite {
    PollAbove(f64),
    PollBelow(f64),
    CashAbove(f64),
    CashBelow(f64),
    MomentumAbove(f64),
    MomentumBelow(f64),
    HasStaff(StaffRole),
    HasEndorsement(String),
}

impl EventPrerequisite {
    #[must_use]
    pub fn is_met(&self, state: &CampaignState) -> bool {
        match self {
            Self::PollAbove(v) => state.polls.player_support > *v,
            Self::PollBelow(v) => state.polls.player_support < *v,
            Self::CashAbove(v) => state.finances.cash_on_hand > *v,
            Self::CashBelow(v) => state.finances.cash_on_hand < *v,
            Self::MomentumAbove(v) => state.momentum > *v,
            Self::MomentumBelow(v) => state.momentum < *v,
            Self::HasStaff(role) => state.has_staff(*role),
            Self::HasEndorsement(id) => state
                .endorsements
                .iter()
                .any(|e| &e.id == id && e.is_secured()),
        }
    }
}

/// A deterministic consequence of an event choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventEffect {
    PollChange {
        value: f64,
        #[serde(default)]
        description: String,
    },
    CashChange {
        value: f64,
        #[serde(default)]
        description: String,
    },
    MomentumChange {
        value: f64,
        #[serde(default)]
        description: String,
    },
    DemographicChange {
        demographic: DemographicGroup,
        value: f64,
        #[serde(default)]
        description: String,
    },
    OpponentChange {
        value: f64,
        #[serde(default)]
        description: String,
    },
    GotvChange {
        value: f64,
        #[serde(default)]
        description: String,
    },
    EmailListChange {
        value: f64,
        #[serde(default)]
        description: String,
    },
    /// Kinds this engine does not model; applying them is a no-op.
    #[serde(other)]
    Unknown,
}

impl EventEffect {
    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::PollChange { description, .. }
            | Self::CashChange { description, .. }
            | Self::MomentumChange { description, .. }
            | Self::DemographicChange { description, .. }
            | Self::OpponentChange { description, .. }
            | Self::GotvChange { description, .. }
            | Self::EmailListChange { description, .. } => description,
            Self::Unknown => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRisk {
    pub probability: f64,
    #[serde(default)]
    pub bad_outcome: Vec<EventEffect>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventChoice {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub effects: Vec<EventEffect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<EventRisk>,
}

/// Static catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub id: String,
    pub category: EventCategory,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub severity: EventSeverity,
    pub phase_range: (CampaignPhase, CampaignPhase),
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn_range: Option<(u32, u32)>,
    pub probability: f64,
    #[serde(default)]
    pub one_time: bool,
    #[serde(default)]
    pub prerequisites: Vec<EventPrerequisite>,
    pub choices: Vec<EventChoice>,
}

impl GameEvent {
    /// Debates pinned to an exact turn.
    #[must_use]
    pub fn is_scheduled_debate(&self) -> bool {
        self.category == EventCategory::Debate && self.turn_range.is_some()
    }

    #[must_use]
    pub fn choice(&self, choice_id: &str) -> Option<&EventChoice> {
        self.choices.iter().find(|choice| choice.id == choice_id)
    }

    fn is_eligible(&self, state: &CampaignState, history: &[String]) -> bool {
        if self.is_scheduled_debate() {
            return false;
        }
        if self.one_time && history.contains(&self.id) {
            return false;
        }
        let (start, end) = self.phase_range;
        if !state.phase.within(start, end) {
            return false;
        }
        if let Some((first, last)) = self.turn_range
            && !(first..=last).contains(&state.current_turn)
        {
            return false;
        }
        self.prerequisites.iter().all(|prereq| prereq.is_met(state))
    }
}

/// A fired event awaiting (or holding) the player's choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveEvent {
    pub event: GameEvent,
    #[serde(default)]
    pub chosen: Option<String>,
    #[serde(default)]
    pub resolved: bool,
    pub turn: u32,
}

impl ActiveEvent {
    #[must_use]
    pub const fn new(event: GameEvent, turn: u32) -> Self {
        Self {
            event,
            chosen: None,
            resolved: false,
            turn,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventError {
    #[error("no active event with id {0}")]
    UnknownEvent(String),
    #[error("event {event} has no choice {choice}")]
    UnknownChoice { event: String, choice: String },
    #[error("event {0} was already resolved")]
    AlreadyResolved(String),
}

/// Draw the events for `state.current_turn`.
///
/// A debate scheduled for this exact turn is always included and does not
/// count toward the random cap. The rest of the pool is shuffled and each
/// candidate rolls its own probability until the cap is reached.
pub fn generate_turn_events(
    state: &CampaignState,
    catalog: &[GameEvent],
    history: &[String],
    rng: &mut CampaignRng,
) -> TurnEvents {
    let turn = state.current_turn;
    let mut events = TurnEvents::new();

    if let Some(debate) = catalog.iter().find(|event| {
        event.is_scheduled_debate()
            && event.turn_range.is_some_and(|(first, _)| first == turn)
            && !history.contains(&event.id)
    }) {
        debug!("turn {turn}: scheduled debate {}", debate.id);
        events.push(ActiveEvent::new(debate.clone(), turn));
    }

    let eligible: Vec<&GameEvent> = catalog
        .iter()
        .filter(|event| event.is_eligible(state, history))
        .collect();

    let mut drawn = 0;
    for event in rng.shuffle(&eligible) {
        if drawn >= EVENTS_PER_TURN_MAX {
            break;
        }
        if rng.chance(event.probability) {
            debug!("turn {turn}: event {} fired", event.id);
            events.push(ActiveEvent::new(event.clone(), turn));
            drawn += 1;
        }
    }

    events
}

/// Effects of a chosen branch, plus its risk outcome if the risk roll hits.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventResolution {
    pub effects: Vec<EventEffect>,
    pub notifications: Vec<String>,
    pub risk_triggered: bool,
}

pub fn resolve_event_choice(choice: &EventChoice, rng: &mut CampaignRng) -> EventResolution {
    let mut resolution = EventResolution {
        effects: choice.effects.clone(),
        notifications: choice
            .effects
            .iter()
            .map(|effect| effect.description().to_string())
            .collect(),
        risk_triggered: false,
    };

    if let Some(risk) = &choice.risk
        && rng.chance(risk.probability)
    {
        resolution.risk_triggered = true;
        for effect in &risk.bad_outcome {
            resolution
                .notifications
                .push(format!("Risk: {}", effect.description()));
            resolution.effects.push(effect.clone());
        }
    }

    resolution
}

/// Apply effects to a state snapshot the caller owns, then re-derive the
/// aggregate poll numbers.
///
/// Momentum effects are parked in `pending_event_momentum` and folded in by
/// the next turn computation.
pub fn apply_event_effects(effects: &[EventEffect], state: &mut CampaignState) {
    for effect in effects {
        match effect {
            EventEffect::PollChange { value, .. } => {
                for demo in &mut state.polls.demographics {
                    demo.shift_player(*value);
                }
            }
            EventEffect::CashChange { value, .. } => {
                state.finances.cash_on_hand += value;
            }
            EventEffect::MomentumChange { value, .. } => {
                state.pending_event_momentum =
                    clamp_finite(state.pending_event_momentum + value, MOMENTUM_MIN, MOMENTUM_MAX);
            }
            EventEffect::DemographicChange {
                demographic, value, ..
            } => match state.polls.demographic_mut(*demographic) {
                Some(demo) => demo.shift_player(*value),
                None => warn!("event effect names missing demographic {demographic}"),
            },
            EventEffect::OpponentChange { value, .. } => {
                state.opponent.approval_rating = clamp_pct(state.opponent.approval_rating + value);
                for demo in &mut state.polls.demographics {
                    demo.shift_opponent(*value);
                }
            }
            EventEffect::GotvChange { value, .. } => {
                state.gotv_investment = (state.gotv_investment + value).max(0.0);
            }
            EventEffect::EmailListChange { value, .. } => {
                let delta = round_f64_to_i64(*value);
                state.finances.email_list_size = state
                    .finances
                    .email_list_size
                    .saturating_add_signed(delta);
            }
            EventEffect::Unknown => {}
        }
    }
    state.polls.recompute_aggregates();
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::Difficulty;
    use crate::state::{
        CampaignFinances, DemographicData, Endorsement, EndorsementStatus, OpponentState,
        OpponentStrategy, PollSnapshot, PollState, StaffMember,
    };

    fn parse_event(json: &str) -> GameEvent {
        serde_json::from_str(json).unwrap()
    }

    fn demographic(id: DemographicGroup, electorate_pct: f64) -> DemographicData {
        DemographicData {
            id,
            name: id.key().to_string(),
            electorate_pct,
            base_lean: 0.0,
            persuadability: 0.5,
            key_issues: Vec::new(),
            current_support: 40.0,
            opponent_support: 40.0,
        }
    }

    fn campaign_at(turn: u32) -> CampaignState {
        let mut state = CampaignState {
            difficulty: Difficulty::TossUp,
            current_turn: turn,
            max_turns: 26,
            phase: CampaignPhase::for_turn(turn),
            action_points: 3,
            max_action_points: 3,
            polls: PollState {
                player_support: 40.0,
                opponent_support: 40.0,
                undecided: 20.0,
                margin_of_error: 4.0,
                demographics: vec![
                    demographic(DemographicGroup::SuburbanFamilies, 60.0),
                    demographic(DemographicGroup::RetireesSeniors, 40.0),
                ],
                history: vec![PollSnapshot {
                    turn: 0,
                    player_support: 40.0,
                    opponent_support: 40.0,
                    undecided: 20.0,
                }],
            },
            finances: CampaignFinances {
                cash_on_hand: 100_000.0,
                total_raised: 100_000.0,
                total_spent: 0.0,
                small_donors: 0.0,
                large_donors: 0.0,
                pac_money: 0.0,
                online_income_rate: 0.0,
                email_list_size: 100,
                weekly_burn_rate: 0.0,
                fundraising_history: Vec::new(),
            },
            ads: Vec::new(),
            staff: vec![StaffMember {
                id: "pollster".to_string(),
                role: StaffRole::Pollster,
                name: "Pollster".to_string(),
                cost: 3_000.0,
                description: String::new(),
                hired: false,
                available_turn: 1,
            }],
            endorsements: vec![Endorsement {
                id: "culinary-union".to_string(),
                name: "Culinary Union".to_string(),
                description: String::new(),
                demographic_effects: std::collections::BTreeMap::new(),
                fundraising_bonus: 0.0,
                credibility_bonus: 0.0,
                requirements: String::new(),
                status: EndorsementStatus::NotPursued,
                turns_to_secure: 2,
                turns_pursued: 0,
            }],
            opponent: OpponentState {
                name: "Opponent".to_string(),
                party: "Other".to_string(),
                cash_on_hand: 100_000.0,
                total_spent: 0.0,
                approval_rating: 50.0,
                attack_mode: false,
                endorsements_secured: Vec::new(),
                staff_level: 3,
                ad_spending: 0.0,
                gotv_investment: 0.0,
                strategy: OpponentStrategy::default(),
            },
            momentum: 0.0,
            pending_event_momentum: 0.0,
            gotv_investment: 0.0,
            active_events: Vec::new(),
            event_history: Vec::new(),
            action_log: Vec::new(),
            seed: 11,
            population: 100_000,
            game_over: false,
            winner: None,
            final_margin: None,
            election: None,
        };
        state.polls.recompute_aggregates();
        state
    }

    fn catalog_event(id: &str, phase_range: (CampaignPhase, CampaignPhase)) -> GameEvent {
        GameEvent {
            id: id.to_string(),
            category: EventCategory::Local,
            title: id.to_string(),
            description: String::new(),
            severity: EventSeverity::Minor,
            phase_range,
            turn_range: None,
            probability: 1.0,
            one_time: false,
            prerequisites: Vec::new(),
            choices: Vec::new(),
        }
    }

    fn whole_campaign(id: &str) -> GameEvent {
        catalog_event(id, (CampaignPhase::Primary, CampaignPhase::Final))
    }

    fn drawn_ids(events: &TurnEvents) -> Vec<&str> {
        let mut ids: Vec<&str> = events.iter().map(|a| a.event.id.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    fn draw(state: &CampaignState, catalog: &[GameEvent], history: &[String]) -> TurnEvents {
        let mut rng = CampaignRng::new(state.seed);
        generate_turn_events(state, catalog, history, &mut rng)
    }

    #[test]
    fn effects_parse_including_unknown_kinds() {
        let effects: Vec<EventEffect> = serde_json::from_str(
            r#"[
                {"type": "poll_change", "value": 1.5, "description": "Bump"},
                {"type": "demographic_change", "value": -2, "demographic": "retirees-seniors"},
                {"type": "staff_unlock", "value": 1, "description": "ignored"}
            ]"#,
        )
        .unwrap();
        assert_eq!(effects.len(), 3);
        assert_eq!(effects[0].description(), "Bump");
        assert!(matches!(
            effects[1],
            EventEffect::DemographicChange {
                demographic: DemographicGroup::RetireesSeniors,
                ..
            }
        ));
        assert_eq!(effects[2], EventEffect::Unknown);
    }

    #[test]
    fn prerequisites_parse_from_type_value_pairs() {
        let prereqs: Vec<EventPrerequisite> = serde_json::from_str(
            r#"[
                {"type": "poll_above", "value": 40},
                {"type": "has_staff", "value": "pollster"},
                {"type": "has_endorsement", "value": "culinary-union"}
            ]"#,
        )
        .unwrap();
        assert_eq!(prereqs[0], EventPrerequisite::PollAbove(40.0));
        assert_eq!(prereqs[1], EventPrerequisite::HasStaff(StaffRole::Pollster));
        assert_eq!(
            prereqs[2],
            EventPrerequisite::HasEndorsement("culinary-union".to_string())
        );
    }

    #[test]
    fn risk_appends_bad_outcome_when_roll_hits() {
        let event = parse_event(
            r#"{
                "id": "rally", "category": "campaign", "title": "Rally",
                "severity": "minor", "phase_range": ["primary", "final"],
                "probability": 1.0,
                "choices": [{
                    "id": "go", "text": "Go big",
                    "effects": [{"type": "poll_change", "value": 1, "description": "Crowd"}],
                    "risk": {"probability": 1.0, "description": "Heckled",
                             "bad_outcome": [{"type": "momentum_change", "value": -2, "description": "Heckled"}]}
                }, {
                    "id": "skip", "text": "Skip",
                    "effects": [],
                    "risk": {"probability": 0.0, "bad_outcome": [{"type": "cash_change", "value": -1}]}
                }]
            }"#,
        );
        let mut rng = CampaignRng::new(1);
        let hit = resolve_event_choice(event.choice("go").unwrap(), &mut rng);
        assert!(hit.risk_triggered);
        assert_eq!(hit.effects.len(), 2);
        assert_eq!(hit.notifications[1], "Risk: Heckled");

        let miss = resolve_event_choice(event.choice("skip").unwrap(), &mut rng);
        assert!(!miss.risk_triggered);
        assert!(miss.effects.is_empty());
    }

    #[test]
    fn phase_range_limits_the_pool() {
        let state = campaign_at(3);
        let catalog = vec![
            catalog_event("primary-only", (CampaignPhase::Primary, CampaignPhase::Primary)),
            catalog_event("late-race", (CampaignPhase::Mid, CampaignPhase::Final)),
        ];
        assert_eq!(drawn_ids(&draw(&state, &catalog, &[])), vec!["primary-only"]);

        let late = campaign_at(22);
        assert_eq!(drawn_ids(&draw(&late, &catalog, &[])), vec!["late-race"]);
    }

    #[test]
    fn turn_range_limits_the_pool() {
        let mut windowed = whole_campaign("windowed");
        windowed.turn_range = Some((5, 8));
        let catalog = vec![windowed];

        assert!(draw(&campaign_at(4), &catalog, &[]).is_empty());
        assert_eq!(drawn_ids(&draw(&campaign_at(5), &catalog, &[])), vec!["windowed"]);
        assert_eq!(drawn_ids(&draw(&campaign_at(8), &catalog, &[])), vec!["windowed"]);
        assert!(draw(&campaign_at(9), &catalog, &[]).is_empty());
    }

    #[test]
    fn failing_prerequisites_keep_an_event_out() {
        let mut rich = whole_campaign("rich");
        rich.prerequisites = vec![EventPrerequisite::CashAbove(1_000_000.0)];
        let mut polled = whole_campaign("polled");
        polled.prerequisites = vec![EventPrerequisite::HasStaff(StaffRole::Pollster)];
        let mut endorsed = whole_campaign("endorsed");
        endorsed.prerequisites = vec![EventPrerequisite::HasEndorsement(
            "culinary-union".to_string(),
        )];
        let catalog = vec![rich, polled, endorsed];

        let mut state = campaign_at(3);
        assert!(draw(&state, &catalog, &[]).is_empty());

        state.staff[0].hired = true;
        assert_eq!(drawn_ids(&draw(&state, &catalog, &[])), vec!["polled"]);

        state.staff[0].hired = false;
        state.endorsements[0].status = EndorsementStatus::Pursued;
        assert!(draw(&state, &catalog, &[]).is_empty());
        state.endorsements[0].status = EndorsementStatus::Secured;
        assert_eq!(drawn_ids(&draw(&state, &catalog, &[])), vec!["endorsed"]);
    }

    #[test]
    fn one_time_events_never_return_once_in_history() {
        let mut scandal = whole_campaign("scandal");
        scandal.one_time = true;
        let catalog = vec![scandal, whole_campaign("town-hall")];
        let state = campaign_at(3);
        let history = vec!["scandal".to_string(), "town-hall".to_string()];

        assert_eq!(
            drawn_ids(&draw(&state, &catalog, &[])),
            vec!["scandal", "town-hall"]
        );
        assert_eq!(drawn_ids(&draw(&state, &catalog, &history)), vec!["town-hall"]);
    }

    #[test]
    fn random_draws_cap_out_while_the_debate_rides_along() {
        let mut debate = catalog_event("debate-one", (CampaignPhase::Early, CampaignPhase::Early));
        debate.category = EventCategory::Debate;
        debate.turn_range = Some((10, 10));
        debate.one_time = true;
        let mut catalog = vec![debate];
        for n in 0..5 {
            catalog.push(whole_campaign(&format!("filler-{n}")));
        }
        let state = campaign_at(10);

        let events = draw(&state, &catalog, &[]);
        assert_eq!(events.len(), EVENTS_PER_TURN_MAX + 1);
        assert_eq!(events[0].event.id, "debate-one");
        let random = events
            .iter()
            .filter(|a| a.event.category != EventCategory::Debate)
            .count();
        assert_eq!(random, EVENTS_PER_TURN_MAX);
        assert!(events.iter().all(|a| a.turn == 10));

        let after = draw(&state, &catalog, &["debate-one".to_string()]);
        assert_eq!(after.len(), EVENTS_PER_TURN_MAX);
        assert!(after.iter().all(|a| a.event.id != "debate-one"));

        assert!(draw(&campaign_at(11), &catalog[..1], &[]).is_empty());
    }

    #[test]
    fn cash_effects_add_and_subtract() {
        let mut state = campaign_at(3);
        apply_event_effects(
            &[
                EventEffect::CashChange {
                    value: 5_000.0,
                    description: String::new(),
                },
                EventEffect::CashChange {
                    value: -2_000.0,
                    description: String::new(),
                },
            ],
            &mut state,
        );
        assert!((state.finances.cash_on_hand - 103_000.0).abs() < 1e-9);
    }

    #[test]
    fn gotv_effects_floor_at_zero() {
        let mut state = campaign_at(22);
        state.gotv_investment = 1_000.0;
        apply_event_effects(
            &[EventEffect::GotvChange {
                value: 500.0,
                description: String::new(),
            }],
            &mut state,
        );
        assert!((state.gotv_investment - 1_500.0).abs() < 1e-9);

        apply_event_effects(
            &[EventEffect::GotvChange {
                value: -5_000.0,
                description: String::new(),
            }],
            &mut state,
        );
        assert!(state.gotv_investment.abs() < f64::EPSILON);
    }

    #[test]
    fn email_list_effects_round_and_saturate() {
        let mut state = campaign_at(3);
        apply_event_effects(
            &[EventEffect::EmailListChange {
                value: 250.4,
                description: String::new(),
            }],
            &mut state,
        );
        assert_eq!(state.finances.email_list_size, 350);

        apply_event_effects(
            &[EventEffect::EmailListChange {
                value: -1_000.0,
                description: String::new(),
            }],
            &mut state,
        );
        assert_eq!(state.finances.email_list_size, 0);
    }

    #[test]
    fn opponent_effects_clamp_approval_and_move_every_group() {
        let mut state = campaign_at(3);
        state.opponent.approval_rating = 98.0;
        state.polls.demographics[1].opponent_support = 99.0;
        apply_event_effects(
            &[EventEffect::OpponentChange {
                value: 5.0,
                description: String::new(),
            }],
            &mut state,
        );
        assert!((state.opponent.approval_rating - 100.0).abs() < f64::EPSILON);
        assert!((state.polls.demographics[0].opponent_support - 45.0).abs() < 1e-9);
        assert!((state.polls.demographics[1].opponent_support - 100.0).abs() < 1e-9);
        // 45 * 0.6 + 100 * 0.4 = 67, capped at 100 - undecided.
        assert!((state.polls.opponent_support - 67.0).abs() < 1e-9);
        assert!((state.polls.player_support - 40.0).abs() < 1e-9);

        apply_event_effects(
            &[EventEffect::OpponentChange {
                value: -150.0,
                description: String::new(),
            }],
            &mut state,
        );
        assert!(state.opponent.approval_rating.abs() < f64::EPSILON);
        assert!(state.polls.opponent_support.abs() < f64::EPSILON);
    }

    #[test]
    fn demographic_effects_touch_only_the_named_group() {
        let mut state = campaign_at(3);
        apply_event_effects(
            &[EventEffect::DemographicChange {
                demographic: DemographicGroup::RetireesSeniors,
                value: 10.0,
                description: String::new(),
            }],
            &mut state,
        );
        let seniors = state.polls.demographic(DemographicGroup::RetireesSeniors).unwrap();
        let suburbs = state.polls.demographic(DemographicGroup::SuburbanFamilies).unwrap();
        assert!((seniors.current_support - 50.0).abs() < 1e-9);
        assert!((suburbs.current_support - 40.0).abs() < 1e-9);
        assert!((state.polls.player_support - 44.0).abs() < 1e-9);

        let before = state.clone();
        apply_event_effects(
            &[EventEffect::DemographicChange {
                demographic: DemographicGroup::VeteransMilitary,
                value: 10.0,
                description: String::new(),
            }],
            &mut state,
        );
        assert_eq!(state, before);
    }

    #[test]
    fn poll_and_momentum_effects_shift_support_and_park_momentum() {
        let mut state = campaign_at(3);
        apply_event_effects(
            &[
                EventEffect::PollChange {
                    value: 2.0,
                    description: String::new(),
                },
                EventEffect::MomentumChange {
                    value: 25.0,
                    description: String::new(),
                },
            ],
            &mut state,
        );
        assert!(
            state
                .polls
                .demographics
                .iter()
                .all(|d| (d.current_support - 42.0).abs() < 1e-9)
        );
        assert!((state.polls.player_support - 42.0).abs() < 1e-9);
        assert!((state.pending_event_momentum - MOMENTUM_MAX).abs() < f64::EPSILON);
        assert!(state.momentum.abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_effects_leave_the_state_alone() {
        let mut state = campaign_at(3);
        let before = state.clone();
        apply_event_effects(&[EventEffect::Unknown], &mut state);
        assert_eq!(state, before);
    }
}
