use std::fmt;
use std::str::FromStr;

use powerbroker_game::constants::GOTV_AVAILABLE_TURN;
use powerbroker_game::endorsements::can_pursue_endorsement;
use powerbroker_game::staff::{can_afford_staff, has_staff, is_staff_available};
use powerbroker_game::{
    ActionType, AdCampaign, AdMedium, AdTone, AllocatedAction, CampaignState, DemographicGroup,
    EventChoice, EventEffect, GameEvent, StaffRole,
};

/// Everything a policy wants done before the turn is ended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnPlan {
    pub hires: Vec<StaffRole>,
    pub pursue: Vec<String>,
    /// `None` keeps the running ads untouched.
    pub ads: Option<Vec<AdCampaign>>,
    pub actions: Vec<AllocatedAction>,
}

/// Choice picked for a pending event.
#[derive(Debug, Clone)]
pub struct PolicyDecision {
    pub choice_index: usize,
    pub rationale: Option<String>,
}

impl PolicyDecision {
    #[must_use]
    pub fn new(choice_index: usize, rationale: Option<String>) -> Self {
        Self {
            choice_index,
            rationale,
        }
    }
}

/// Policy interface for automated play strategies.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Decide the coming week.
    fn plan_turn(&mut self, state: &CampaignState) -> TurnPlan;

    /// Select a choice for a pending event.
    fn pick_choice(&mut self, state: &CampaignState, event: &GameEvent) -> PolicyDecision;
}

/// Built-in gameplay strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GameplayStrategy {
    Balanced,
    Fundraiser,
    GroundGame,
    AttackDog,
}

impl GameplayStrategy {
    pub const ALL: [Self; 4] = [
        Self::Balanced,
        Self::Fundraiser,
        Self::GroundGame,
        Self::AttackDog,
    ];

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::Fundraiser => "fundraiser",
            Self::GroundGame => "ground-game",
            Self::AttackDog => "attack-dog",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Balanced => "Balanced",
            Self::Fundraiser => "Fundraiser",
            Self::GroundGame => "Ground Game",
            Self::AttackDog => "Attack Dog",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Balanced => "Even split of outreach and money, courts every open endorsement",
            Self::Fundraiser => "Banks cash first, buys TV late",
            Self::GroundGame => "Targets persuadable groups, goes all-in on GOTV",
            Self::AttackDog => "Runs attack ads and takes the riskiest event choices",
        }
    }

    #[must_use]
    pub fn create_policy(self) -> Box<dyn PlayerPolicy + Send> {
        match self {
            Self::Balanced => Box::new(BalancedPolicy),
            Self::Fundraiser => Box::new(FundraiserPolicy),
            Self::GroundGame => Box::new(GroundGamePolicy),
            Self::AttackDog => Box::new(AttackDogPolicy),
        }
    }
}

impl fmt::Display for GameplayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GameplayStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.key().eq_ignore_ascii_case(needle))
            .ok_or_else(|| format!("unknown strategy: {needle}"))
    }
}

struct BalancedPolicy;
struct FundraiserPolicy;
struct GroundGamePolicy;
struct AttackDogPolicy;

/// Weights a policy applies to each effect kind when ranking event choices.
#[derive(Debug, Clone, Copy)]
struct ChoiceWeights {
    poll: f64,
    cash_per_10k: f64,
    momentum: f64,
    opponent: f64,
    gotv_per_10k: f64,
    risk_aversion: f64,
}

fn score_choice(choice: &EventChoice, weights: ChoiceWeights) -> f64 {
    let upside: f64 = choice
        .effects
        .iter()
        .map(|effect| match effect {
            EventEffect::PollChange { value, .. } => value * weights.poll,
            EventEffect::DemographicChange { value, .. } => value * weights.poll * 0.2,
            EventEffect::CashChange { value, .. } => value / 10_000.0 * weights.cash_per_10k,
            EventEffect::MomentumChange { value, .. } => value * weights.momentum,
            EventEffect::OpponentChange { value, .. } => -value * weights.opponent,
            EventEffect::GotvChange { value, .. } => value / 10_000.0 * weights.gotv_per_10k,
            EventEffect::EmailListChange { value, .. } => value / 1_000.0 * 0.1,
            EventEffect::Unknown => 0.0,
        })
        .sum();
    let exposure = choice
        .risk
        .as_ref()
        .map_or(0.0, |risk| risk.probability * weights.risk_aversion);
    upside - exposure
}

fn best_choice(event: &GameEvent, weights: ChoiceWeights) -> PolicyDecision {
    let best = event
        .choices
        .iter()
        .enumerate()
        .map(|(idx, choice)| (idx, score_choice(choice, weights)))
        .max_by(|a, b| a.1.total_cmp(&b.1));
    match best {
        Some((idx, score)) => PolicyDecision::new(idx, Some(format!("score {score:.2}"))),
        None => PolicyDecision::new(0, None),
    }
}

/// Queue `role` when it has unlocked, is not yet hired and is affordable.
fn hire_if_ready(state: &CampaignState, role: StaffRole, hires: &mut Vec<StaffRole>) {
    if has_staff(&state.staff, role) {
        return;
    }
    let unlocked = state
        .staff
        .iter()
        .any(|member| member.role == role && is_staff_available(member, state.current_turn));
    if unlocked && can_afford_staff(role, &state.staff, &state.finances) {
        hires.push(role);
    }
}

fn pursuable_endorsements(state: &CampaignState, limit: usize) -> Vec<String> {
    state
        .endorsements
        .iter()
        .filter(|endorsement| can_pursue_endorsement(endorsement, state.polls.player_support))
        .take(limit)
        .map(|endorsement| endorsement.id.clone())
        .collect()
}

fn any_pursued(state: &CampaignState) -> bool {
    state.endorsements.iter().any(|e| e.is_pursued())
}

/// Demographic with the largest persuadable deficit.
fn swing_target(state: &CampaignState) -> Option<DemographicGroup> {
    state
        .polls
        .demographics
        .iter()
        .map(|demo| {
            let deficit = demo.opponent_support - demo.current_support;
            (demo.id, demo.persuadability * demo.weight() * (deficit + 10.0))
        })
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

/// Split `points` across the listed kinds, front-loaded, skipping zero shares.
fn allocate(points: u32, shares: &[(ActionType, u32)]) -> Vec<AllocatedAction> {
    let mut remaining = points;
    let mut actions = Vec::new();
    for &(kind, want) in shares {
        let take = want.min(remaining);
        if take > 0 {
            actions.push(AllocatedAction::new(kind, take));
            remaining -= take;
        }
    }
    actions
}

fn ad(medium: AdMedium, tone: AdTone, budget: f64) -> AdCampaign {
    AdCampaign {
        medium,
        tone,
        budget,
        target_demographic: None,
    }
}

const fn gotv_open(state: &CampaignState) -> bool {
    state.current_turn >= GOTV_AVAILABLE_TURN
}

impl PlayerPolicy for BalancedPolicy {
    fn name(&self) -> &'static str {
        "Balanced"
    }

    fn plan_turn(&mut self, state: &CampaignState) -> TurnPlan {
        let mut plan = TurnPlan::default();
        hire_if_ready(state, StaffRole::CampaignManager, &mut plan.hires);
        hire_if_ready(state, StaffRole::Pollster, &mut plan.hires);
        plan.pursue = pursuable_endorsements(state, 1);

        let points = state.action_points + u32::from(plan.hires.contains(&StaffRole::CampaignManager));
        let seek = u32::from(any_pursued(state) || !plan.pursue.is_empty());
        plan.actions = if gotv_open(state) {
            allocate(
                points,
                &[
                    (ActionType::SeekEndorsement, seek),
                    (ActionType::Gotv, 2),
                    (ActionType::Fundraise, 1),
                    (ActionType::Campaign, points),
                ],
            )
        } else {
            allocate(
                points,
                &[
                    (ActionType::SeekEndorsement, seek),
                    (ActionType::Fundraise, 2),
                    (ActionType::Campaign, points),
                ],
            )
        };

        plan.ads = Some(if state.finances.cash_on_hand > 150_000.0 {
            vec![ad(AdMedium::Digital, AdTone::PositiveBio, 15_000.0)]
        } else {
            Vec::new()
        });
        plan
    }

    fn pick_choice(&mut self, _state: &CampaignState, event: &GameEvent) -> PolicyDecision {
        best_choice(
            event,
            ChoiceWeights {
                poll: 1.0,
                cash_per_10k: 0.3,
                momentum: 0.5,
                opponent: 0.5,
                gotv_per_10k: 0.2,
                risk_aversion: 2.0,
            },
        )
    }
}

impl PlayerPolicy for FundraiserPolicy {
    fn name(&self) -> &'static str {
        "Fundraiser"
    }

    fn plan_turn(&mut self, state: &CampaignState) -> TurnPlan {
        let mut plan = TurnPlan::default();
        hire_if_ready(state, StaffRole::FinanceDirector, &mut plan.hires);
        hire_if_ready(state, StaffRole::DigitalDirector, &mut plan.hires);
        if state.current_turn % 4 == 0 {
            plan.pursue = pursuable_endorsements(state, 1);
        }

        let points = state.action_points;
        let seek = u32::from(any_pursued(state) || !plan.pursue.is_empty());
        plan.actions = if gotv_open(state) {
            allocate(
                points,
                &[
                    (ActionType::Gotv, 2),
                    (ActionType::Campaign, 2),
                    (ActionType::Fundraise, points),
                ],
            )
        } else {
            allocate(
                points,
                &[
                    (ActionType::SeekEndorsement, seek),
                    (ActionType::Campaign, 1),
                    (ActionType::Fundraise, points),
                ],
            )
        };

        plan.ads = Some(
            if state.current_turn >= 15 && state.finances.cash_on_hand > 300_000.0 {
                vec![ad(AdMedium::Tv, AdTone::PositiveIssue, 50_000.0)]
            } else {
                Vec::new()
            },
        );
        plan
    }

    fn pick_choice(&mut self, _state: &CampaignState, event: &GameEvent) -> PolicyDecision {
        best_choice(
            event,
            ChoiceWeights {
                poll: 0.6,
                cash_per_10k: 1.0,
                momentum: 0.3,
                opponent: 0.3,
                gotv_per_10k: 0.1,
                risk_aversion: 1.5,
            },
        )
    }
}

impl PlayerPolicy for GroundGamePolicy {
    fn name(&self) -> &'static str {
        "Ground Game"
    }

    fn plan_turn(&mut self, state: &CampaignState) -> TurnPlan {
        let mut plan = TurnPlan::default();
        hire_if_ready(state, StaffRole::FieldDirector, &mut plan.hires);
        hire_if_ready(state, StaffRole::CampaignManager, &mut plan.hires);
        plan.pursue = pursuable_endorsements(state, 2);

        let points = state.action_points + u32::from(plan.hires.contains(&StaffRole::CampaignManager));
        let mut actions = Vec::new();
        let mut remaining = points;
        if any_pursued(state) || !plan.pursue.is_empty() {
            actions.push(AllocatedAction::new(ActionType::SeekEndorsement, 1));
            remaining -= 1;
        }
        if gotv_open(state) && remaining > 0 {
            let gotv = remaining.min(3);
            actions.push(AllocatedAction::new(ActionType::Gotv, gotv));
            remaining -= gotv;
        } else if remaining > 1 {
            actions.push(AllocatedAction::new(ActionType::Fundraise, 1));
            remaining -= 1;
        }
        if remaining > 0 {
            let outreach = AllocatedAction::new(ActionType::Campaign, remaining);
            actions.push(match swing_target(state) {
                Some(target) => outreach.targeting(target),
                None => outreach,
            });
        }
        plan.actions = actions;
        plan.ads = Some(if state.finances.cash_on_hand > 80_000.0 {
            vec![ad(AdMedium::Mailers, AdTone::PositiveIssue, 8_000.0)]
        } else {
            Vec::new()
        });
        plan
    }

    fn pick_choice(&mut self, _state: &CampaignState, event: &GameEvent) -> PolicyDecision {
        best_choice(
            event,
            ChoiceWeights {
                poll: 1.0,
                cash_per_10k: 0.2,
                momentum: 0.4,
                opponent: 0.3,
                gotv_per_10k: 1.0,
                risk_aversion: 1.0,
            },
        )
    }
}

impl PlayerPolicy for AttackDogPolicy {
    fn name(&self) -> &'static str {
        "Attack Dog"
    }

    fn plan_turn(&mut self, state: &CampaignState) -> TurnPlan {
        let mut plan = TurnPlan::default();
        hire_if_ready(state, StaffRole::CommsDirector, &mut plan.hires);

        let points = state.action_points;
        plan.actions = if gotv_open(state) {
            allocate(
                points,
                &[
                    (ActionType::Gotv, 1),
                    (ActionType::Fundraise, 2),
                    (ActionType::Campaign, points),
                ],
            )
        } else {
            allocate(
                points,
                &[(ActionType::Fundraise, 3), (ActionType::Campaign, points)],
            )
        };

        let cash = state.finances.cash_on_hand;
        plan.ads = Some(if cash > 200_000.0 {
            vec![ad(AdMedium::Tv, AdTone::Attack, 50_000.0)]
        } else if cash > 60_000.0 {
            vec![ad(AdMedium::Radio, AdTone::Contrast, 12_000.0)]
        } else {
            Vec::new()
        });
        plan
    }

    fn pick_choice(&mut self, _state: &CampaignState, event: &GameEvent) -> PolicyDecision {
        best_choice(
            event,
            ChoiceWeights {
                poll: 1.0,
                cash_per_10k: 0.2,
                momentum: 0.8,
                opponent: 1.2,
                gotv_per_10k: 0.1,
                risk_aversion: 0.0,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use powerbroker_game::actions::total_intensity;
    use powerbroker_game::{CampaignEngine, Difficulty, EmbeddedContent};

    fn opening() -> CampaignState {
        CampaignEngine::from_source(&EmbeddedContent)
            .unwrap()
            .create_initial_state(Difficulty::TossUp, 7)
    }

    #[test]
    fn strategies_parse_from_keys() {
        for strategy in GameplayStrategy::ALL {
            assert_eq!(strategy.key().parse::<GameplayStrategy>(), Ok(strategy));
        }
        assert!("coward".parse::<GameplayStrategy>().is_err());
    }

    #[test]
    fn plans_fit_the_action_budget() {
        let state = opening();
        for strategy in GameplayStrategy::ALL {
            let mut policy = strategy.create_policy();
            let plan = policy.plan_turn(&state);
            let budget = state.action_points
                + u32::from(plan.hires.contains(&StaffRole::CampaignManager));
            assert!(total_intensity(&plan.actions) <= budget, "{}", policy.name());
            assert!(
                plan.actions
                    .iter()
                    .all(|action| action.action_type != ActionType::Gotv),
                "{} planned GOTV on turn 1",
                policy.name()
            );
        }
    }

    #[test]
    fn allocate_front_loads_shares() {
        let actions = allocate(
            5,
            &[
                (ActionType::SeekEndorsement, 0),
                (ActionType::Fundraise, 2),
                (ActionType::Campaign, 5),
            ],
        );
        assert_eq!(
            actions,
            vec![
                AllocatedAction::new(ActionType::Fundraise, 2),
                AllocatedAction::new(ActionType::Campaign, 3),
            ]
        );
    }

    #[test]
    fn risk_averse_policy_avoids_risky_choices() {
        let event: GameEvent = serde_json::from_str(
            r#"{
                "id": "gamble",
                "category": "campaign",
                "title": "Gamble",
                "severity": "minor",
                "phase_range": ["primary", "final"],
                "probability": 1.0,
                "choices": [
                    {"id": "bold", "text": "Bold", "effects": [{"type": "poll_change", "value": 1.0}],
                     "risk": {"probability": 0.5, "bad_outcome": [{"type": "poll_change", "value": -3}]}},
                    {"id": "safe", "text": "Safe", "effects": [{"type": "poll_change", "value": 0.5}]}
                ]
            }"#,
        )
        .unwrap();
        let state = opening();
        let careful = GameplayStrategy::Balanced
            .create_policy()
            .pick_choice(&state, &event);
        let reckless = GameplayStrategy::AttackDog
            .create_policy()
            .pick_choice(&state, &event);
        assert_eq!(careful.choice_index, 1);
        assert_eq!(reckless.choice_index, 0);
    }
}
