//! Difficulty presets and the campaign calendar.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named starting conditions for a new campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    SafeSeat,
    Lean,
    #[default]
    TossUp,
    LeanAway,
    Hostile,
}

/// Starting parameters fixed by a difficulty preset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DifficultyConfig {
    pub starting_cash: f64,
    pub player_starting_support: f64,
    pub opponent_starting_support: f64,
    pub label: &'static str,
    pub description: &'static str,
}

impl Difficulty {
    pub const ALL: [Self; 5] = [
        Self::SafeSeat,
        Self::Lean,
        Self::TossUp,
        Self::LeanAway,
        Self::Hostile,
    ];

    /// Resolve the preset for this difficulty.
    #[must_use]
    pub const fn config(self) -> DifficultyConfig {
        match self {
            Self::SafeSeat => DifficultyConfig {
                starting_cash: 500_000.0,
                player_starting_support: 52.0,
                opponent_starting_support: 40.0,
                label: "Safe Seat",
                description: "Tutorial mode - comfortable lead",
            },
            Self::Lean => DifficultyConfig {
                starting_cash: 300_000.0,
                player_starting_support: 48.0,
                opponent_starting_support: 44.0,
                label: "Lean",
                description: "Standard difficulty - slight edge",
            },
            Self::TossUp => DifficultyConfig {
                starting_cash: 200_000.0,
                player_starting_support: 45.0,
                opponent_starting_support: 45.0,
                label: "Toss-Up",
                description: "Fair fight - dead even",
            },
            Self::LeanAway => DifficultyConfig {
                starting_cash: 150_000.0,
                player_starting_support: 42.0,
                opponent_starting_support: 48.0,
                label: "Lean Away",
                description: "Uphill battle - trailing from the start",
            },
            Self::Hostile => DifficultyConfig {
                starting_cash: 100_000.0,
                player_starting_support: 38.0,
                opponent_starting_support: 50.0,
                label: "Hostile",
                description: "Near-impossible - for experts only",
            },
        }
    }

    /// Stable kebab-case key, matching the serialized form.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::SafeSeat => "safe-seat",
            Self::Lean => "lean",
            Self::TossUp => "toss-up",
            Self::LeanAway => "lean-away",
            Self::Hostile => "hostile",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown difficulty: {s}"))
    }
}

/// Campaign calendar segment derived from the turn number.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum CampaignPhase {
    #[default]
    Primary,
    Early,
    Mid,
    Final,
    Election,
}

impl CampaignPhase {
    /// Phase covering `turn` (primary 1-6, early 7-14, mid 15-20, final 21-26).
    #[must_use]
    pub const fn for_turn(turn: u32) -> Self {
        match turn {
            0..=6 => Self::Primary,
            7..=14 => Self::Early,
            15..=20 => Self::Mid,
            21..=26 => Self::Final,
            _ => Self::Election,
        }
    }

    /// Whether this phase lies within the inclusive range `[start, end]`.
    #[must_use]
    pub fn within(self, start: Self, end: Self) -> bool {
        start <= self && self <= end
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Early => "early",
            Self::Mid => "mid",
            Self::Final => "final",
            Self::Election => "election",
        }
    }
}

impl fmt::Display for CampaignPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
