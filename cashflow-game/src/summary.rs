//! End-of-round report derived from the live session, ready for a summary
//! or final-score screen.

use serde::{Deserialize, Serialize};

use crate::constants::{
    RESERVE_THRESHOLD, XP_BAD_DECISION, XP_CORRECT_PRIORITY, XP_DISCOUNT_DECISION,
};
use crate::scoring::{self, ScoreBadge, VendorStatus};
use crate::state::{GameOverCause, Session};

/// Snapshot of how a round went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    pub cash: i64,
    pub xp: i64,
    pub level: u8,
    pub score_badge: ScoreBadge,
    pub vendor_status: VendorStatus,
    pub correct_priorities: u32,
    pub discount_decisions: u32,
    pub bad_decisions: u32,
    /// XP earned from correct priorities, `count * 30`.
    pub priority_xp: i64,
    /// XP earned from discount decisions, `count * 50`.
    pub discount_xp: i64,
    /// XP lost to bad decisions, `count * -25`.
    pub penalty_xp: i64,
    pub badges_unlocked: usize,
    pub badges_total: usize,
    /// Whether the final balance held the 50k reserve.
    pub reserve_met: bool,
    /// False when the run scored below the bronze line.
    pub passed: bool,
    pub cause: Option<GameOverCause>,
}

/// Build the report for the session as it stands.
#[must_use]
pub fn summary_report(session: &Session) -> SummaryReport {
    SummaryReport {
        cash: session.cash,
        xp: session.xp,
        level: session.level(),
        score_badge: session.score_badge(),
        vendor_status: session.vendor_status,
        correct_priorities: session.correct_priorities,
        discount_decisions: session.discount_decisions,
        bad_decisions: session.bad_decisions,
        priority_xp: i64::from(session.correct_priorities) * XP_CORRECT_PRIORITY,
        discount_xp: i64::from(session.discount_decisions) * XP_DISCOUNT_DECISION,
        penalty_xp: i64::from(session.bad_decisions) * XP_BAD_DECISION,
        badges_unlocked: session.badges.iter().filter(|b| b.unlocked).count(),
        badges_total: session.badges.len(),
        reserve_met: session.cash >= RESERVE_THRESHOLD,
        passed: scoring::passed_run(session.xp),
        cause: session.game_over_cause,
    }
}
