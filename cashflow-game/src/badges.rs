//! Achievement badges and their unlock thresholds.
//!
//! The roster is a fixed set of four. Badges unlock monotonically during a
//! run and are only relocked by a session reset.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{NEGOTIATOR_DISCOUNT_COUNT, PRIORITIZER_CORRECT_COUNT};

/// Identifier for one of the four achievement badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeId {
    Negotiator,
    Prioritizer,
    Saver,
    Planner,
}

impl BadgeId {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Negotiator => "negotiator",
            Self::Prioritizer => "prioritizer",
            Self::Saver => "saver",
            Self::Planner => "planner",
        }
    }
}

impl fmt::Display for BadgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BadgeId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "negotiator" => Ok(Self::Negotiator),
            "prioritizer" => Ok(Self::Prioritizer),
            "saver" => Ok(Self::Saver),
            "planner" => Ok(Self::Planner),
            _ => Err(()),
        }
    }
}

/// One achievement badge with its display metadata and unlock flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub id: BadgeId,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub unlocked: bool,
}

impl Badge {
    fn locked(id: BadgeId, name: &str, description: &str, icon: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            unlocked: false,
        }
    }
}

/// The full badge roster in its initial locked state.
#[must_use]
pub fn default_badges() -> Vec<Badge> {
    vec![
        Badge::locked(
            BadgeId::Negotiator,
            "Master Negotiator",
            "Successfully negotiated 3 discounts",
            "💼",
        ),
        Badge::locked(
            BadgeId::Prioritizer,
            "Priority Manager",
            "Set 5 correct priorities",
            "📋",
        ),
        Badge::locked(
            BadgeId::Saver,
            "Cash Hoarder",
            "Accumulated ₹50,000 in cash",
            "💰",
        ),
        Badge::locked(
            BadgeId::Planner,
            "Payment Planner",
            "Created and executed 3 payment plans",
            "📅",
        ),
    ]
}

/// True once enough discount decisions have accumulated for the negotiator
/// badge.
#[must_use]
pub fn negotiator_earned(discount_decisions: u32) -> bool {
    discount_decisions >= NEGOTIATOR_DISCOUNT_COUNT
}

/// True once enough correct priorities have accumulated for the prioritizer
/// badge.
#[must_use]
pub fn prioritizer_earned(correct_priorities: u32) -> bool {
    correct_priorities >= PRIORITIZER_CORRECT_COUNT
}
