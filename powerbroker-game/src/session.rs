//! Headless shell wrapper binding a [`CampaignEngine`] to a mutable campaign.
//!
//! The engine itself is pure; the session holds the current state plus the
//! actions the player has queued for the week and enforces the shell rules
//! (action-point budget, GOTV lock, hiring and endorsement eligibility).

use log::debug;
use thiserror::Error;

use crate::actions::{ActionType, AllocatedAction, total_intensity};
use crate::config::Difficulty;
use crate::constants::GOTV_AVAILABLE_TURN;
use crate::election::{ElectionResult, PostGameScore};
use crate::endorsements::can_pursue_endorsement;
use crate::engine::{CampaignEngine, TurnError, TurnResult};
use crate::events::{EventError, EventResolution};
use crate::gotv::is_gotv_available;
use crate::staff::{action_points_for, can_afford_staff, is_staff_available, margin_of_error_for};
use crate::state::{AdCampaign, CampaignState, EndorsementStatus, StaffRole};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("the campaign is over")]
    GameOver,
    #[error("action intensity must be at least 1")]
    ZeroIntensity,
    #[error("{requested} action points requested but only {available} remain")]
    NotEnoughActionPoints { requested: u32, available: u32 },
    #[error("GOTV operations unlock on turn {unlock_turn} (current turn {turn})")]
    GotvLocked { turn: u32, unlock_turn: u32 },
    #[error("no {0} is available to hire")]
    UnknownStaff(StaffRole),
    #[error("{role} is not available until turn {available_turn}")]
    StaffUnavailable { role: StaffRole, available_turn: u32 },
    #[error("cannot afford to hire a {0}")]
    StaffUnaffordable(StaffRole),
    #[error("no endorsement with id {0}")]
    UnknownEndorsement(String),
    #[error("endorsement {0} cannot be pursued right now")]
    EndorsementNotPursuable(String),
    #[error(transparent)]
    Turn(#[from] TurnError),
    #[error(transparent)]
    Event(#[from] EventError),
}

/// A running campaign plus the player's queued allocations for this turn.
#[derive(Debug, Clone)]
pub struct CampaignSession {
    engine: CampaignEngine,
    state: CampaignState,
    allocations: Vec<AllocatedAction>,
}

impl CampaignSession {
    /// Start a fresh campaign.
    #[must_use]
    pub fn new(engine: CampaignEngine, difficulty: Difficulty, seed: u64) -> Self {
        let state = engine.create_initial_state(difficulty, seed);
        Self::from_state(engine, state)
    }

    /// Resume from a previously persisted state.
    #[must_use]
    pub const fn from_state(engine: CampaignEngine, state: CampaignState) -> Self {
        Self {
            engine,
            state,
            allocations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> &CampaignState {
        &self.state
    }

    #[must_use]
    pub const fn engine(&self) -> &CampaignEngine {
        &self.engine
    }

    #[must_use]
    pub fn allocations(&self) -> &[AllocatedAction] {
        &self.allocations
    }

    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.state.game_over
    }

    fn ensure_running(&self) -> Result<(), SessionError> {
        if self.state.game_over {
            Err(SessionError::GameOver)
        } else {
            Ok(())
        }
    }

    /// Queue an action, charging one action point per unit of intensity.
    ///
    /// # Errors
    ///
    /// Fails when the campaign is over, the intensity is zero, the budget is
    /// exhausted, or GOTV is requested before it unlocks.
    pub fn allocate_action(&mut self, action: AllocatedAction) -> Result<(), SessionError> {
        self.ensure_running()?;
        if action.intensity == 0 {
            return Err(SessionError::ZeroIntensity);
        }
        if action.action_type == ActionType::Gotv && !is_gotv_available(self.state.current_turn) {
            return Err(SessionError::GotvLocked {
                turn: self.state.current_turn,
                unlock_turn: GOTV_AVAILABLE_TURN,
            });
        }
        if action.intensity > self.state.action_points {
            return Err(SessionError::NotEnoughActionPoints {
                requested: action.intensity,
                available: self.state.action_points,
            });
        }
        self.state.action_points -= action.intensity;
        self.allocations.push(action);
        Ok(())
    }

    /// Drop every queued action and refund its points.
    pub fn clear_allocations(&mut self) {
        let refund = total_intensity(&self.allocations);
        self.state.action_points = (self.state.action_points + refund).min(self.state.max_action_points);
        self.allocations.clear();
    }

    /// Replace the running ad campaigns.
    ///
    /// # Errors
    ///
    /// Fails when the campaign is over.
    pub fn set_ads(&mut self, ads: Vec<AdCampaign>) -> Result<(), SessionError> {
        self.ensure_running()?;
        self.state.ads = ads;
        Ok(())
    }

    /// Put the first unhired member with `role` on payroll.
    ///
    /// Salaries are charged from the next turn onward; the action-point
    /// budget and margin of error update immediately.
    ///
    /// # Errors
    ///
    /// Fails when nobody with that role is left to hire, the role has not
    /// unlocked yet, or cash does not cover four weeks of salary.
    pub fn hire_staff(&mut self, role: StaffRole) -> Result<(), SessionError> {
        self.ensure_running()?;
        let turn = self.state.current_turn;
        let Some(index) = self
            .state
            .staff
            .iter()
            .position(|member| member.role == role && !member.hired)
        else {
            return Err(SessionError::UnknownStaff(role));
        };
        let member = &self.state.staff[index];
        if !is_staff_available(member, turn) {
            return Err(SessionError::StaffUnavailable {
                role,
                available_turn: member.available_turn,
            });
        }
        if !can_afford_staff(role, &self.state.staff, &self.state.finances) {
            return Err(SessionError::StaffUnaffordable(role));
        }

        self.state.staff[index].hired = true;
        let max_points = action_points_for(&self.state.staff);
        let gained = max_points.saturating_sub(self.state.max_action_points);
        self.state.max_action_points = max_points;
        self.state.action_points += gained;
        self.state.polls.margin_of_error = margin_of_error_for(&self.state.staff);
        debug!("turn {turn}: hired {role}");
        Ok(())
    }

    /// Start courting an endorsement.
    ///
    /// # Errors
    ///
    /// Fails for unknown ids, or when the endorsement is already being
    /// pursued or the poll requirement is not met.
    pub fn pursue_endorsement(&mut self, id: &str) -> Result<(), SessionError> {
        self.ensure_running()?;
        let support = self.state.polls.player_support;
        let endorsement = self
            .state
            .endorsements
            .iter_mut()
            .find(|endorsement| endorsement.id == id)
            .ok_or_else(|| SessionError::UnknownEndorsement(id.to_string()))?;
        if !can_pursue_endorsement(endorsement, support) {
            return Err(SessionError::EndorsementNotPursuable(id.to_string()));
        }
        endorsement.status = EndorsementStatus::Pursued;
        Ok(())
    }

    /// Answer a pending event.
    ///
    /// # Errors
    ///
    /// Propagates [`EventError`] for unknown or already resolved events.
    pub fn resolve_event(
        &mut self,
        event_id: &str,
        choice_id: &str,
    ) -> Result<EventResolution, SessionError> {
        self.ensure_running()?;
        let (next, resolution) = self.engine.resolve_event(&self.state, event_id, choice_id)?;
        self.state = next;
        Ok(resolution)
    }

    /// Resolve the week with the queued allocations and advance the campaign.
    ///
    /// # Errors
    ///
    /// Propagates [`TurnError`] when the campaign cannot advance.
    pub fn end_turn(&mut self) -> Result<TurnResult, SessionError> {
        let result = self.engine.compute_turn(&self.state, &self.allocations)?;
        self.state = self
            .engine
            .apply_turn(&self.state, &result, &self.allocations)?;
        self.allocations.clear();
        Ok(result)
    }

    #[must_use]
    pub fn election_result(&self) -> ElectionResult {
        self.engine.election_result(&self.state)
    }

    #[must_use]
    pub fn post_game_score(&self) -> PostGameScore {
        self.engine.post_game_score(&self.state)
    }

    /// Consume the session, returning the underlying campaign state.
    #[must_use]
    pub fn into_state(self) -> CampaignState {
        self.state
    }
}
