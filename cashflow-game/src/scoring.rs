//! Scoring rules: experience levels, score badges, vendor standing, and the
//! transient XP notice shown after each award.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    LEVEL_THRESHOLDS, NOTICE_TTL_SECONDS, SCORE_BRONZE_MIN, SCORE_GOLD_MIN, SCORE_SILVER_MIN,
    STANDING_BAD_RATIO, STANDING_TENSE_RATIO,
};
use crate::numbers::{clamp_f64_to_f32, i64_to_f64};

/// Medal tier derived from total XP.
///
/// Ordering follows tier value so the best badge across runs is a plain
/// `max()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBadge {
    #[default]
    Bronze,
    Silver,
    Gold,
}

impl ScoreBadge {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bronze => "bronze",
            Self::Silver => "silver",
            Self::Gold => "gold",
        }
    }
}

impl fmt::Display for ScoreBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoreBadge {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bronze" => Ok(Self::Bronze),
            "silver" => Ok(Self::Silver),
            "gold" => Ok(Self::Gold),
            _ => Err(()),
        }
    }
}

/// Overall vendor standing, recomputed from decision counters at summary
/// time. The same tri-state describes a single supplier relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VendorStatus {
    #[default]
    Good,
    Tense,
    Bad,
}

impl VendorStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Tense => "tense",
            Self::Bad => "bad",
        }
    }
}

impl fmt::Display for VendorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VendorStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "good" => Ok(Self::Good),
            "tense" => Ok(Self::Tense),
            "bad" => Ok(Self::Bad),
            _ => Err(()),
        }
    }
}

/// Highest level whose threshold the XP total satisfies, starting at 1.
#[must_use]
pub fn current_level(xp: i64) -> u8 {
    LEVEL_THRESHOLDS
        .iter()
        .filter(|(_, min)| xp >= *min)
        .map(|(level, _)| *level)
        .max()
        .unwrap_or(1)
}

/// Progress toward the next level as a percentage in `0.0..=100.0`.
///
/// Returns 100 at the top level.
#[must_use]
pub fn progress_to_next(xp: i64) -> f32 {
    let level = current_level(xp);
    let Some(&(_, floor)) = LEVEL_THRESHOLDS.iter().find(|(l, _)| *l == level) else {
        return 0.0;
    };
    let Some(&(_, ceiling)) = LEVEL_THRESHOLDS.iter().find(|(l, _)| *l == level + 1) else {
        return 100.0;
    };
    let span = i64_to_f64(ceiling - floor);
    let gained = i64_to_f64(xp - floor);
    clamp_f64_to_f32((gained / span * 100.0).clamp(0.0, 100.0))
}

/// Score badge tier for an XP total. Anything below the bronze floor still
/// reports bronze; the end screens use [`passed_run`] to distinguish a
/// failing total.
#[must_use]
pub fn score_badge(xp: i64) -> ScoreBadge {
    if xp >= SCORE_GOLD_MIN {
        ScoreBadge::Gold
    } else if xp >= SCORE_SILVER_MIN {
        ScoreBadge::Silver
    } else {
        ScoreBadge::Bronze
    }
}

/// Whether the run cleared the bronze floor. Totals below it still earn a
/// bronze badge but the final report marks them as failed.
#[must_use]
pub fn passed_run(xp: i64) -> bool {
    xp >= SCORE_BRONZE_MIN
}

/// Vendor standing from the ratio of bad decisions to all decisions.
/// No decisions at all counts as good standing.
#[must_use]
pub fn vendor_status(good_decisions: u32, bad_decisions: u32) -> VendorStatus {
    let total = good_decisions + bad_decisions;
    if total == 0 {
        return VendorStatus::Good;
    }
    let ratio = f64::from(bad_decisions) / f64::from(total);
    if ratio >= STANDING_BAD_RATIO {
        VendorStatus::Bad
    } else if ratio >= STANDING_TENSE_RATIO {
        VendorStatus::Tense
    } else {
        VendorStatus::Good
    }
}

/// Transient feedback line shown after an XP change.
///
/// Only one notice is outstanding at a time; a new award replaces the old
/// one. Consumers age it with the session's one-second tick and stop
/// rendering it once expired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XpNotice {
    pub amount: i64,
    pub reason: String,
    age_seconds: u32,
}

impl XpNotice {
    #[must_use]
    pub fn new(amount: i64, reason: impl Into<String>) -> Self {
        Self {
            amount,
            reason: reason.into(),
            age_seconds: 0,
        }
    }

    /// Age the notice by one second, returning true once it has expired.
    pub fn tick(&mut self) -> bool {
        self.age_seconds = self.age_seconds.saturating_add(1);
        self.is_expired()
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.age_seconds >= NOTICE_TTL_SECONDS
    }
}
