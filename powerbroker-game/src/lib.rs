//! Power Broker Campaign Engine
//!
//! Platform-agnostic turn simulation for a congressional campaign. The crate
//! models polling, fundraising, advertising, staff, endorsements, momentum,
//! random events, an opponent AI and the final election, all driven by
//! deterministic seeded RNG streams. It performs no I/O; the calling shell
//! owns persistence and presentation.

pub mod actions;
pub mod advertising;
pub mod config;
pub mod constants;
pub mod content;
pub mod election;
pub mod endorsements;
pub mod engine;
pub mod events;
pub mod fundraising;
pub mod gotv;
pub mod momentum;
pub mod numbers;
pub mod opponent;
pub mod polling;
pub mod rng;
pub mod session;
pub mod staff;
pub mod state;

// Re-export commonly used types
pub use actions::{ActionType, AllocatedAction};
pub use advertising::{AdEffect, compute_ad_effects};
pub use config::{CampaignPhase, Difficulty, DifficultyConfig};
pub use content::{CampaignContent, ContentError, ContentSource, DistrictData, EmbeddedContent};
pub use election::{
    ElectionResult, Grade, PostGameScore, compute_election_result, compute_post_game_score,
};
pub use endorsements::{EndorsementProgress, can_pursue_endorsement, process_endorsements};
pub use engine::{
    CampaignEngine, FinancialSummary, LedgerLine, Notification, NotificationKind, TurnError,
    TurnResult,
};
pub use events::{
    ActiveEvent, EventChoice, EventEffect, EventError, EventResolution, GameEvent,
    generate_turn_events, resolve_event_choice,
};
pub use fundraising::{FundraisingResult, compute_fundraising};
pub use gotv::{GotvResult, compute_gotv};
pub use momentum::{compute_momentum, momentum_label};
pub use opponent::{OpponentProfile, OpponentTurnResult, process_opponent_turn};
pub use polling::{PollChange, PollingOutcome, compute_poll_changes};
pub use rng::{CampaignRng, RngStream};
pub use session::{CampaignSession, SessionError};
pub use state::{
    AdCampaign, AdMedium, AdTone, CampaignFinances, CampaignState, DemographicData,
    DemographicGroup, Endorsement, EndorsementStatus, OpponentState, OpponentStrategy, PollState,
    StaffMember, StaffRole, Winner,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Counts loads and serves the embedded content set.
    #[derive(Default)]
    struct CountingSource {
        loads: Cell<u32>,
    }

    impl ContentSource for CountingSource {
        type Error = ContentError;

        fn load_content(&self) -> Result<CampaignContent, Self::Error> {
            self.loads.set(self.loads.get() + 1);
            EmbeddedContent.load_content()
        }
    }

    struct BrokenSource;

    impl ContentSource for BrokenSource {
        type Error = ContentError;

        fn load_content(&self) -> Result<CampaignContent, Self::Error> {
            let mut content = EmbeddedContent.load_content()?;
            content.district.demographics.pop();
            content.validate()?;
            Ok(content)
        }
    }

    #[test]
    fn engine_loads_content_once() {
        let source = CountingSource::default();
        let engine = CampaignEngine::from_source(&source).unwrap();
        let _ = engine.create_initial_state(Difficulty::Lean, 1);
        let _ = engine.create_initial_state(Difficulty::Hostile, 2);
        assert_eq!(source.loads.get(), 1);
    }

    #[test]
    fn invalid_content_is_rejected() {
        assert!(matches!(
            CampaignEngine::from_source(&BrokenSource),
            Err(ContentError::DemographicCount { .. })
        ));
    }

    #[test]
    fn state_serializes_with_kebab_case_ids() {
        let engine = CampaignEngine::from_source(&EmbeddedContent).unwrap();
        let state = engine.create_initial_state(Difficulty::TossUp, 9);
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"toss-up\""));
        assert!(json.contains("\"suburban-families\""));
        let back: CampaignState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.current_turn, state.current_turn);
        assert_eq!(back.polls.demographics.len(), 7);
        assert_eq!(back.active_events.len(), state.active_events.len());
        assert_eq!(back.finances.email_list_size, state.finances.email_list_size);
    }
}
