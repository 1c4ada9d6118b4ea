//! Stored-document projections: the saved game, leaderboard entries, and
//! aggregate player stats. Field names serialize exactly as the hosted
//! store writes them, so documents round-trip unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::badges::BadgeId;
use crate::constants::{NEGOTIATOR_DISCOUNT_COUNT, PRIORITIZER_RESTORE_XP, SAVER_CASH_THRESHOLD};
use crate::error::{GameError, GameResult};
use crate::payments::Payment;
use crate::scoring::{self, ScoreBadge, VendorStatus};
use crate::state::{GamePhase, Session};

/// Point-in-time save of a run. Only the dashboard book travels with it;
/// the negotiation table, suppliers, and bill schedule reseed on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub uid: String,
    #[serde(default)]
    pub game_id: String,
    pub cash: i64,
    pub xp: i64,
    pub correct_priorities: u32,
    pub discount_decisions: u32,
    pub bad_decisions: u32,
    pub vendor_status: VendorStatus,
    pub score_badge: ScoreBadge,
    /// Seconds left on the countdown.
    pub timer: u32,
    pub is_game_over: bool,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl GameSnapshot {
    /// Capture the session as a storable document. The vendor standing and
    /// score badge are recomputed at capture time so the stored values
    /// always reflect the current counters.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Unauthenticated`] when no identity is attached.
    pub fn capture(session: &Session) -> GameResult<Self> {
        let identity = session.identity.as_ref().ok_or(GameError::Unauthenticated)?;
        Ok(Self {
            uid: identity.uid.clone(),
            game_id: session.game_id.clone().unwrap_or_default(),
            cash: session.cash,
            xp: session.xp,
            correct_priorities: session.correct_priorities,
            discount_decisions: session.discount_decisions,
            bad_decisions: session.bad_decisions,
            vendor_status: scoring::vendor_status(
                session.correct_priorities + session.discount_decisions,
                session.bad_decisions,
            ),
            score_badge: session.score_badge(),
            timer: session.timer.remaining,
            is_game_over: session.is_game_over,
            payments: session.payments.clone(),
            last_updated: None,
        })
    }

    /// Rebuild session state from this snapshot. Badges come back silently
    /// from the stored numbers (no unlock XP), a stored empty payment book
    /// keeps the fresh seeds, and the phase lands on the dashboard or the
    /// game-over screen depending on how the save ended.
    pub fn hydrate_into(&self, session: &mut Session) {
        session.cash = self.cash;
        session.xp = self.xp;
        session.correct_priorities = self.correct_priorities;
        session.discount_decisions = self.discount_decisions;
        session.bad_decisions = self.bad_decisions;
        session.vendor_status = self.vendor_status;
        session.timer.remaining = self.timer;
        session.timer.running = false;
        session.is_game_over = self.is_game_over;
        if !self.payments.is_empty() {
            session.payments = self.payments.clone();
        }
        if self.xp >= PRIORITIZER_RESTORE_XP {
            session.restore_badge(BadgeId::Prioritizer);
        }
        if self.discount_decisions >= NEGOTIATOR_DISCOUNT_COUNT {
            session.restore_badge(BadgeId::Negotiator);
        }
        if self.cash >= SAVER_CASH_THRESHOLD {
            session.restore_badge(BadgeId::Saver);
        }
        session.game_id = if self.game_id.is_empty() {
            None
        } else {
            Some(self.game_id.clone())
        };
        session.last_saved = self.last_updated;
        session.phase = if self.is_game_over {
            GamePhase::GameOver
        } else {
            GamePhase::Dashboard
        };
    }

    /// Serialize to the stored JSON document.
    ///
    /// # Errors
    ///
    /// Returns the underlying serializer error.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse a stored JSON document.
    ///
    /// # Errors
    ///
    /// Returns the underlying parser error when the document is malformed.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

/// One row on the public leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub uid: String,
    pub display_name: String,
    #[serde(rename = "photoURL", default)]
    pub photo_url: Option<String>,
    pub xp: i64,
    pub cash: i64,
    pub score_badge: ScoreBadge,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl LeaderboardEntry {
    /// Build an entry from the live session.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Unauthenticated`] when no identity is attached.
    pub fn from_session(session: &Session) -> GameResult<Self> {
        let identity = session.identity.as_ref().ok_or(GameError::Unauthenticated)?;
        Ok(Self {
            uid: identity.uid.clone(),
            display_name: identity.display_name.clone(),
            photo_url: identity.photo_url.clone(),
            xp: session.xp,
            cash: session.cash,
            score_badge: session.score_badge(),
            completed_at: None,
        })
    }
}

/// Aggregate stats across a player's finished games.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub games_played: usize,
    #[serde(rename = "totalXP")]
    pub total_xp: i64,
    #[serde(rename = "highestXP")]
    pub highest_xp: i64,
    pub highest_cash: i64,
    pub best_badge: ScoreBadge,
}

impl UserStats {
    /// Fold a set of finished games into totals. No games means all zeros
    /// with a bronze badge.
    #[must_use]
    pub fn from_games(games: &[GameSnapshot]) -> Self {
        Self {
            games_played: games.len(),
            total_xp: games.iter().map(|g| g.xp).sum(),
            highest_xp: games.iter().map(|g| g.xp).max().unwrap_or(0),
            highest_cash: games.iter().map(|g| g.cash).max().unwrap_or(0),
            best_badge: games
                .iter()
                .map(|g| g.score_badge)
                .max()
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PlayerIdentity;

    fn identified() -> Session {
        let mut session = Session::default();
        session.identity = Some(PlayerIdentity {
            uid: "u1".to_string(),
            display_name: "Asha".to_string(),
            photo_url: Some("https://example.com/a.png".to_string()),
        });
        session
    }

    #[test]
    fn capture_requires_an_identity() {
        let session = Session::default();
        assert_eq!(
            GameSnapshot::capture(&session),
            Err(GameError::Unauthenticated)
        );
    }

    #[test]
    fn capture_recomputes_standing_and_badge() {
        let mut session = identified();
        session.record_correct_priority();
        session.record_bad_decision();
        // stale value on the session; capture must not trust it
        session.vendor_status = VendorStatus::Good;
        let snapshot = GameSnapshot::capture(&session).unwrap();
        assert_eq!(snapshot.vendor_status, VendorStatus::Bad);
        assert_eq!(snapshot.score_badge, ScoreBadge::Bronze);
        assert_eq!(snapshot.uid, "u1");
        assert_eq!(snapshot.game_id, "");
    }

    #[test]
    fn hydrate_restores_scalars_exactly() {
        let mut session = identified();
        session.apply_transaction(-120_000);
        session.record_correct_priority();
        let snapshot = GameSnapshot::capture(&session).unwrap();

        let mut restored = identified();
        snapshot.hydrate_into(&mut restored);
        assert_eq!(restored.cash, session.cash);
        assert_eq!(restored.xp, session.xp);
        assert_eq!(restored.correct_priorities, 1);
        assert_eq!(restored.phase, GamePhase::Dashboard);
        assert!(!restored.timer.running);
    }

    #[test]
    fn hydrate_reconstructs_badges_without_xp() {
        let mut session = Session::default();
        let snapshot = GameSnapshot {
            uid: "u1".to_string(),
            game_id: "g9".to_string(),
            cash: 60_000,
            xp: 520,
            correct_priorities: 2,
            discount_decisions: 3,
            bad_decisions: 0,
            vendor_status: VendorStatus::Good,
            score_badge: ScoreBadge::Gold,
            timer: 1_200,
            is_game_over: false,
            payments: Vec::new(),
            last_updated: None,
        };
        snapshot.hydrate_into(&mut session);
        assert_eq!(session.xp, 520);
        assert!(session.badge_unlocked(BadgeId::Prioritizer));
        assert!(session.badge_unlocked(BadgeId::Negotiator));
        assert!(session.badge_unlocked(BadgeId::Saver));
        assert!(!session.badge_unlocked(BadgeId::Planner));
        assert_eq!(session.game_id.as_deref(), Some("g9"));
        // empty stored book keeps the fresh seeds
        assert_eq!(session.payments.len(), 6);
    }

    #[test]
    fn hydrating_a_finished_game_lands_on_game_over() {
        let mut session = Session::default();
        let snapshot = GameSnapshot {
            uid: "u1".to_string(),
            game_id: String::new(),
            cash: 0,
            xp: -50,
            correct_priorities: 0,
            discount_decisions: 0,
            bad_decisions: 2,
            vendor_status: VendorStatus::Bad,
            score_badge: ScoreBadge::Bronze,
            timer: 90,
            is_game_over: true,
            payments: Vec::new(),
            last_updated: None,
        };
        snapshot.hydrate_into(&mut session);
        assert!(session.is_game_over);
        assert_eq!(session.phase, GamePhase::GameOver);
        assert_eq!(session.game_id, None);
    }

    #[test]
    fn snapshot_json_uses_stored_field_names() {
        let mut session = identified();
        session.game_id = Some("g1".to_string());
        let snapshot = GameSnapshot::capture(&session).unwrap();
        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"gameId\":\"g1\""));
        assert!(json.contains("\"correctPriorities\""));
        assert!(json.contains("\"vendorStatus\":\"good\""));
        assert!(json.contains("\"isGameOver\":false"));
        assert!(json.contains("\"type\":\"receivable\""));
        assert!(json.contains("\"dueDate\":\"2023-08-10\""));

        let parsed = GameSnapshot::from_json(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn leaderboard_entry_carries_the_player() {
        let mut session = identified();
        session.add_xp(410, "big run");
        let entry = LeaderboardEntry::from_session(&session).unwrap();
        assert_eq!(entry.display_name, "Asha");
        assert_eq!(entry.score_badge, ScoreBadge::Gold);
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"photoURL\""));
        assert!(json.contains("\"displayName\":\"Asha\""));
    }

    #[test]
    fn stats_fold_finished_games() {
        let base = GameSnapshot {
            uid: "u1".to_string(),
            game_id: String::new(),
            cash: 80_000,
            xp: 310,
            correct_priorities: 0,
            discount_decisions: 0,
            bad_decisions: 0,
            vendor_status: VendorStatus::Good,
            score_badge: ScoreBadge::Silver,
            timer: 0,
            is_game_over: true,
            payments: Vec::new(),
            last_updated: None,
        };
        let mut second = base.clone();
        second.xp = 150;
        second.cash = 120_000;
        second.score_badge = ScoreBadge::Bronze;

        let stats = UserStats::from_games(&[base, second]);
        assert_eq!(stats.games_played, 2);
        assert_eq!(stats.total_xp, 460);
        assert_eq!(stats.highest_xp, 310);
        assert_eq!(stats.highest_cash, 120_000);
        assert_eq!(stats.best_badge, ScoreBadge::Silver);

        let empty = UserStats::from_games(&[]);
        assert_eq!(empty.games_played, 0);
        assert_eq!(empty.best_badge, ScoreBadge::Bronze);
    }
}
