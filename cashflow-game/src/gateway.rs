//! Persistence seam for saved games and the leaderboard.
//!
//! The engine only talks to [`ProgressGateway`]; hosts back it with their
//! document store. [`MemoryGateway`] is the in-process implementation used
//! by tests and offline play.

use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;

use crate::snapshot::{GameSnapshot, LeaderboardEntry};

/// Storage backend for saved games, one document per run, plus an
/// append-only leaderboard.
pub trait ProgressGateway {
    type Error: std::error::Error + Send + Sync + 'static;

    /// The player's most recently written save, if any.
    ///
    /// # Errors
    ///
    /// Returns the backend's error when the query fails.
    fn load_latest(&self, uid: &str) -> Result<Option<GameSnapshot>, Self::Error>;

    /// Upsert a save and return its document id. A snapshot with an empty
    /// `game_id` creates a new document; otherwise the existing one is
    /// overwritten.
    ///
    /// # Errors
    ///
    /// Returns the backend's error when the write fails.
    fn save(&self, snapshot: &GameSnapshot) -> Result<String, Self::Error>;

    /// Append a leaderboard row and return its document id.
    ///
    /// # Errors
    ///
    /// Returns the backend's error when the write fails.
    fn append_leaderboard(&self, entry: &LeaderboardEntry) -> Result<String, Self::Error>;

    /// The top `top` leaderboard rows, highest XP first.
    ///
    /// # Errors
    ///
    /// Returns the backend's error when the query fails.
    fn leaderboard(&self, top: usize) -> Result<Vec<LeaderboardEntry>, Self::Error>;

    /// Every finished game the player has saved.
    ///
    /// # Errors
    ///
    /// Returns the backend's error when the query fails.
    fn finished_games(&self, uid: &str) -> Result<Vec<GameSnapshot>, Self::Error>;
}

const DOCUMENT_ID_LEN: usize = 20;

/// In-process gateway holding everything in maps. Never fails.
#[derive(Debug)]
pub struct MemoryGateway {
    snapshots: RefCell<HashMap<String, GameSnapshot>>,
    entries: RefCell<Vec<LeaderboardEntry>>,
    rng: RefCell<SmallRng>,
}

impl MemoryGateway {
    #[must_use]
    pub fn new() -> Self {
        Self {
            snapshots: RefCell::new(HashMap::new()),
            entries: RefCell::new(Vec::new()),
            rng: RefCell::new(SmallRng::from_entropy()),
        }
    }

    fn next_id(&self) -> String {
        let mut rng = self.rng.borrow_mut();
        (0..DOCUMENT_ID_LEN)
            .map(|_| char::from(rng.sample(Alphanumeric)))
            .collect()
    }

    /// Number of stored save documents.
    #[must_use]
    pub fn saved_count(&self) -> usize {
        self.snapshots.borrow().len()
    }
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressGateway for MemoryGateway {
    type Error = Infallible;

    fn load_latest(&self, uid: &str) -> Result<Option<GameSnapshot>, Self::Error> {
        let snapshots = self.snapshots.borrow();
        Ok(snapshots
            .values()
            .filter(|s| s.uid == uid)
            .max_by_key(|s| s.last_updated)
            .cloned())
    }

    fn save(&self, snapshot: &GameSnapshot) -> Result<String, Self::Error> {
        let id = if snapshot.game_id.is_empty() {
            self.next_id()
        } else {
            snapshot.game_id.clone()
        };
        let mut stored = snapshot.clone();
        stored.game_id = id.clone();
        stored.last_updated = Some(Utc::now());
        self.snapshots.borrow_mut().insert(id.clone(), stored);
        Ok(id)
    }

    fn append_leaderboard(&self, entry: &LeaderboardEntry) -> Result<String, Self::Error> {
        let mut stamped = entry.clone();
        stamped.completed_at = Some(Utc::now());
        self.entries.borrow_mut().push(stamped);
        Ok(self.next_id())
    }

    fn leaderboard(&self, top: usize) -> Result<Vec<LeaderboardEntry>, Self::Error> {
        let mut rows = self.entries.borrow().clone();
        rows.sort_by(|a, b| b.xp.cmp(&a.xp));
        rows.truncate(top);
        Ok(rows)
    }

    fn finished_games(&self, uid: &str) -> Result<Vec<GameSnapshot>, Self::Error> {
        let snapshots = self.snapshots.borrow();
        Ok(snapshots
            .values()
            .filter(|s| s.uid == uid && s.is_game_over)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{ScoreBadge, VendorStatus};

    fn snapshot(uid: &str, xp: i64, over: bool) -> GameSnapshot {
        GameSnapshot {
            uid: uid.to_string(),
            game_id: String::new(),
            cash: 100_000,
            xp,
            correct_priorities: 0,
            discount_decisions: 0,
            bad_decisions: 0,
            vendor_status: VendorStatus::Good,
            score_badge: ScoreBadge::Bronze,
            timer: 600,
            is_game_over: over,
            payments: Vec::new(),
            last_updated: None,
        }
    }

    fn entry(uid: &str, xp: i64) -> LeaderboardEntry {
        LeaderboardEntry {
            uid: uid.to_string(),
            display_name: uid.to_uppercase(),
            photo_url: None,
            xp,
            cash: 50_000,
            score_badge: ScoreBadge::Silver,
            completed_at: None,
        }
    }

    #[test]
    fn save_mints_a_twenty_char_id() {
        let gateway = MemoryGateway::new();
        let id = gateway.save(&snapshot("u1", 10, false)).unwrap();
        assert_eq!(id.len(), 20);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(gateway.saved_count(), 1);
    }

    #[test]
    fn save_with_an_id_overwrites_in_place() {
        let gateway = MemoryGateway::new();
        let id = gateway.save(&snapshot("u1", 10, false)).unwrap();

        let mut updated = snapshot("u1", 99, false);
        updated.game_id = id.clone();
        let second = gateway.save(&updated).unwrap();
        assert_eq!(second, id);
        assert_eq!(gateway.saved_count(), 1);
        assert_eq!(gateway.load_latest("u1").unwrap().unwrap().xp, 99);
    }

    #[test]
    fn load_latest_picks_the_newest_save() {
        let gateway = MemoryGateway::new();
        gateway.save(&snapshot("u1", 10, false)).unwrap();
        gateway.save(&snapshot("u1", 42, false)).unwrap();
        gateway.save(&snapshot("u2", 77, false)).unwrap();
        let latest = gateway.load_latest("u1").unwrap().unwrap();
        assert_eq!(latest.xp, 42);
        assert!(latest.last_updated.is_some());
        assert!(gateway.load_latest("nobody").unwrap().is_none());
    }

    #[test]
    fn leaderboard_ranks_by_xp() {
        let gateway = MemoryGateway::new();
        gateway.append_leaderboard(&entry("a", 100)).unwrap();
        gateway.append_leaderboard(&entry("b", 400)).unwrap();
        gateway.append_leaderboard(&entry("c", 250)).unwrap();
        let rows = gateway.leaderboard(2).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].uid, "b");
        assert_eq!(rows[1].uid, "c");
        assert!(rows[0].completed_at.is_some());
    }

    #[test]
    fn finished_games_filters_by_player_and_state() {
        let gateway = MemoryGateway::new();
        gateway.save(&snapshot("u1", 10, true)).unwrap();
        gateway.save(&snapshot("u1", 20, false)).unwrap();
        gateway.save(&snapshot("u2", 30, true)).unwrap();
        let finished = gateway.finished_games("u1").unwrap();
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].xp, 10);
    }
}
