//! Centralized balance and tuning constants for Power Broker campaign logic.
//!
//! These values define the deterministic math for the core simulation.
//! Keeping them together ensures that gameplay can only be adjusted via
//! code changes reviewed in version control, rather than through external
//! JSON assets.

use crate::election::Grade;

// Calendar -----------------------------------------------------------------
pub const MAX_TURNS: u32 = 26;
pub const BASE_ACTION_POINTS: u32 = 5;
pub const CAMPAIGN_MANAGER_BONUS_AP: u32 = 1;
pub const DEBATE_TURNS: [u32; 3] = [10, 17, 23];

// Polling ------------------------------------------------------------------
pub const BASE_MARGIN_OF_ERROR: f64 = 3.0;
pub const POLLSTER_MARGIN_OF_ERROR: f64 = 1.5;
pub const UNDECIDED_DECAY_RATE: f64 = 0.02;
pub const UNDECIDED_MIN: f64 = 2.0;
pub const UNDECIDED_MAX: f64 = 30.0;
pub const SUPPORT_MIN: f64 = 0.0;
pub const SUPPORT_MAX: f64 = 100.0;
pub const CAMPAIGN_BASE_POLL_BOOST: f64 = 0.5;
pub const CAMPAIGN_NOISE: f64 = 0.3;
pub const CAMPAIGN_CHANGE_THRESHOLD: f64 = 0.1;
pub const MOMENTUM_POLL_DAMPING: f64 = 0.3;

// Fundraising --------------------------------------------------------------
pub const SMALL_DONOR_BASE: f64 = 5_000.0;
pub const LARGE_DONOR_BASE: f64 = 15_000.0;
pub const LARGE_DONOR_DIMINISHING_FACTOR: f64 = 0.85;
pub const LARGE_DONOR_SATURATION_UNIT: f64 = 100_000.0;
pub const FUNDRAISE_NOISE_MIN: f64 = 0.85;
pub const FUNDRAISE_NOISE_MAX: f64 = 1.15;
pub const FUNDRAISE_MOMENTUM_FACTOR: f64 = 0.02;
pub const ONLINE_MOMENTUM_FACTOR: f64 = 0.01;
pub const PAC_MONEY_BASE: f64 = 30_000.0;
pub const PAC_MIN_ENDORSEMENTS: usize = 2;
pub const PAC_MAX_ENDORSEMENTS: usize = 5;
pub const ONLINE_INCOME_BASE_RATE: f64 = 2_000.0;
pub const EMAIL_LIST_GROWTH_PER_FUNDRAISE: u64 = 500;
pub const STARTING_EMAIL_LIST: u64 = 1_000;
pub const FINANCE_DIRECTOR_BONUS: f64 = 0.3;
pub const DIGITAL_DIRECTOR_ONLINE_BONUS: f64 = 0.2;

// Advertising --------------------------------------------------------------
pub const TV_COST_PER_WEEK: f64 = 50_000.0;
pub const DIGITAL_COST_PER_WEEK: f64 = 15_000.0;
pub const MAILER_COST_PER_WEEK: f64 = 8_000.0;
pub const RADIO_COST_PER_WEEK: f64 = 12_000.0;
pub const TV_REACH: f64 = 0.4;
pub const DIGITAL_REACH: f64 = 0.25;
pub const MAILER_REACH: f64 = 0.15;
pub const RADIO_REACH: f64 = 0.2;
pub const COMMS_DIRECTOR_AD_BONUS: f64 = 0.25;
pub const DIGITAL_DIRECTOR_TARGETING_BONUS: f64 = 0.35;
pub const AD_TARGETED_FACTOR: f64 = 1.5;
pub const AD_SPILLOVER_FACTOR: f64 = 0.6;
pub const ATTACK_TONE_MULTIPLIER: f64 = 1.5;
pub const CONTRAST_TONE_MULTIPLIER: f64 = 1.2;
pub const NEGATIVE_AD_OPPONENT_DRAIN: f64 = 0.4;
pub const ATTACK_AD_BACKLASH_CHANCE: f64 = 0.3;
pub const ATTACK_AD_BACKLASH_PENALTY: f64 = -1.0;
pub const AD_NOISE: f64 = 0.1;

// GOTV ---------------------------------------------------------------------
pub const GOTV_BASE_INVESTMENT: f64 = 10_000.0;
pub const GOTV_TURNOUT_MULTIPLIER: f64 = 0.5;
pub const GOTV_INVESTMENT_UNIT: f64 = 100_000.0;
pub const FIELD_DIRECTOR_GOTV_BONUS: f64 = 0.4;
pub const GOTV_AVAILABLE_TURN: u32 = 21;
pub const GOTV_FINAL_EFFECT_MAX: f64 = 3.0;

// Opponent -----------------------------------------------------------------
pub const OPPONENT_BASE_FUNDRAISING: f64 = 45_000.0;
pub const OPPONENT_FUNDRAISE_NOISE_MIN: f64 = -0.1;
pub const OPPONENT_FUNDRAISE_NOISE_MAX: f64 = 0.2;
pub const OPPONENT_ATTACK_POLL_EFFECT: f64 = -1.5;
pub const OPPONENT_DEFENSIVE_POLL_EFFECT: f64 = 0.3;
pub const OPPONENT_ESTABLISHMENT_POLL_EFFECT: f64 = 0.2;
pub const OPPONENT_AGGRESSIVE_AD_MULTIPLIER: f64 = 1.5;
pub const OPPONENT_DEFENSIVE_AD_MULTIPLIER: f64 = 0.8;
pub const OPPONENT_CAMPAIGN_EFFECT: f64 = 0.3;
pub const OPPONENT_STAFF_LEVEL_FACTOR: f64 = 0.1;
pub const OPPONENT_ADAPTATION_THRESHOLD: f64 = -3.0;
pub const OPPONENT_ATTACK_EXIT_THRESHOLD: f64 = 3.0;
pub const OPPONENT_ATTACK_MODE_EFFECT: f64 = 0.5;
pub const OPPONENT_GOTV_MIN: i64 = 15_000;
pub const OPPONENT_GOTV_SPREAD: i64 = 10_000;
pub const OPPONENT_ENDORSEMENT_CHANCE: f64 = 0.10;
pub const OPPONENT_ENDORSEMENT_MIN_TURN: u32 = 5;
pub const OPPONENT_ENDORSEMENT_EFFECT: f64 = 0.15;
pub const OPPONENT_POLL_EFFECT_CAP: f64 = 2.0;
pub const OPPONENT_STRATEGY_EARLY_TURN: u32 = 10;
pub const OPPONENT_STRATEGY_CONTEST_TURN: u32 = 15;
pub const OPPONENT_STRATEGY_DEFEND_TURN: u32 = 20;
pub const OPPONENT_STRATEGY_MARGIN: f64 = 5.0;

// Momentum -----------------------------------------------------------------
pub const MOMENTUM_MAX: f64 = 10.0;
pub const MOMENTUM_MIN: f64 = -10.0;
pub const MOMENTUM_DECAY: f64 = 0.2;
pub const MOMENTUM_POLL_EFFECT: f64 = 0.3;
pub const MOMENTUM_ENDORSEMENT_BONUS: f64 = 1.5;

// Election -----------------------------------------------------------------
pub const DEFAULT_DISTRICT_POPULATION: u64 = 839_000;
pub const ELECTION_DAY_VARIANCE: f64 = 2.0;
pub const DEMOGRAPHIC_DAY_VARIANCE: f64 = 1.5;
pub const RECOUNT_THRESHOLD: f64 = 2.0;
pub const BASE_TURNOUT: f64 = 0.55;
pub const TURNOUT_NOISE: f64 = 0.05;
pub const TURNOUT_MIN: f64 = 0.30;
pub const TURNOUT_MAX: f64 = 0.85;
pub const GOTV_TURNOUT_LEAD_NUDGE: f64 = 0.02;
pub const GOTV_TURNOUT_TRAIL_NUDGE: f64 = 0.01;

// Post-game score ----------------------------------------------------------
pub const SCORE_VICTORY_BONUS: f64 = 50.0;
pub const SCORE_MARGIN_WEIGHT: f64 = 5.0;
pub const SCORE_CASH_TIERS: [f64; 2] = [50_000.0, 100_000.0];
pub const SCORE_CASH_TIER_BONUS: f64 = 5.0;
pub const SCORE_PER_ENDORSEMENT: f64 = 3.0;
pub const SCORE_EMAIL_UNIT: f64 = 1_000.0;
pub const SCORE_EMAIL_CAP: f64 = 10.0;
pub const GRADE_LADDER: [(f64, Grade); 7] = [
    (90.0, Grade::APlus),
    (80.0, Grade::A),
    (70.0, Grade::BPlus),
    (60.0, Grade::B),
    (50.0, Grade::CPlus),
    (40.0, Grade::C),
    (30.0, Grade::D),
];

// Staff --------------------------------------------------------------------
pub const STAFF_AFFORDABILITY_WEEKS: f64 = 4.0;

// Events -------------------------------------------------------------------
pub const EVENTS_PER_TURN_MAX: usize = 2;
