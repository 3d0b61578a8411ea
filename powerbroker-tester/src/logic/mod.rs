pub mod policy;
pub mod reports;
pub mod seeds;
pub mod simulation;

pub use policy::{GameplayStrategy, PlayerPolicy, PolicyDecision, TurnPlan};
pub use reports::{StrategySummary, summarize};
pub use seeds::{iteration_seed, resolve_seed_inputs};
pub use simulation::{CampaignRecord, SimulationConfig, check_state, run_campaign};
