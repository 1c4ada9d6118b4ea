//! CashFlow Game Engine
//!
//! Platform-agnostic core logic for the CashFlow cash-management game.
//! This crate provides the session state machine, scoring, and persistence
//! seams without UI or platform-specific dependencies.

pub mod badges;
pub mod command;
pub mod constants;
pub mod error;
pub mod gateway;
pub mod negotiation;
pub mod numbers;
pub mod payments;
pub mod schedule;
pub mod scoring;
pub mod snapshot;
pub mod state;
pub mod summary;
pub mod timer;
pub mod vendors;

// Re-export commonly used types
pub use badges::{Badge, BadgeId, default_badges};
pub use command::{Command, CommandQueue};
pub use error::{GameError, GameResult};
pub use gateway::{MemoryGateway, ProgressGateway};
pub use negotiation::{
    NegotiationVendor, PaymentPlan, PlanLine, PlanSubmission, PlanUpdate, SettlementKind,
    SettlementStatus, VendorPayment, delayed_amount, discounted_amount, pay_vendor, seed_vendors,
    stage_plan_amount, submit_payment_plan,
};
pub use payments::{
    Payment, PaymentKind, Priority, PriorityOutcome, ProcessOutcome, correct_priority,
    process_payment, seed_payments, set_priority,
};
pub use schedule::{BillPayment, BulkPayment, ScheduledBill, pay_all_bills, pay_bill, seed_bills};
pub use scoring::{
    ScoreBadge, VendorStatus, XpNotice, current_level, passed_run, progress_to_next, score_badge,
    vendor_status,
};
pub use snapshot::{GameSnapshot, LeaderboardEntry, UserStats};
pub use state::{
    GameOverCause, GamePhase, PhaseChange, PlayerIdentity, Session, SessionConfig, TickOutcome,
    TransactionOutcome,
};
pub use summary::{SummaryReport, summary_report};
pub use timer::{SessionTimer, format_mmss};
pub use vendors::{
    Importance, NegotiationOption, PaymentRecord, Supplier, SupplierPayment, TermsOutcome,
    negotiate_terms, pay_supplier, seed_suppliers,
};

use chrono::Utc;
use log::warn;

use crate::constants::{
    REASON_LOAD_FAILED, REASON_PROGRESS_LOADED, REASON_PROGRESS_SAVED, REASON_SAVE_FAILED,
};

/// Main engine for running player sessions against a persistence backend
pub struct GameEngine<G>
where
    G: ProgressGateway,
{
    gateway: G,
}

impl<G> GameEngine<G>
where
    G: ProgressGateway,
{
    /// Create a new engine over the provided progress gateway
    pub const fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Start an anonymous session. Nothing is loaded or saved for guests;
    /// the host starts the timer once play begins.
    #[must_use]
    pub fn guest_session(&self) -> Session {
        Session::default()
    }

    /// Start a session for a signed-in player, resuming their latest save
    /// when one exists. A gateway failure falls back to a fresh session
    /// with a notice rather than surfacing an error; the timer stays
    /// stopped on that path so the host retries the load before play.
    pub fn resume_or_start(&self, identity: PlayerIdentity) -> Session {
        let mut session = Session::default();
        match self.gateway.load_latest(&identity.uid) {
            Ok(Some(snapshot)) => {
                snapshot.hydrate_into(&mut session);
                session.post_notice(REASON_PROGRESS_LOADED);
                session.start_timer();
            }
            Ok(None) => {
                session.start_timer();
            }
            Err(err) => {
                warn!("loading progress for {} failed: {err}", identity.uid);
                session.post_notice(REASON_LOAD_FAILED);
            }
        }
        session.identity = Some(identity);
        session
    }

    /// Persist the session for its signed-in player and record the stored
    /// document id on the session. A gateway failure leaves the game state
    /// untouched apart from a failure notice.
    ///
    /// # Errors
    ///
    /// Returns an error if the session has no identity attached or if the
    /// gateway rejects the write.
    pub fn save_progress(&self, session: &mut Session) -> Result<String, anyhow::Error>
    where
        G::Error: Into<anyhow::Error>,
    {
        let snapshot = GameSnapshot::capture(session)?;
        match self.gateway.save(&snapshot) {
            Ok(id) => {
                session.game_id = Some(id.clone());
                session.last_saved = Some(Utc::now());
                session.post_notice(REASON_PROGRESS_SAVED);
                Ok(id)
            }
            Err(err) => {
                warn!("saving progress failed: {err}");
                session.post_notice(REASON_SAVE_FAILED);
                Err(err.into())
            }
        }
    }

    /// Publish the session's result to the public leaderboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the session has no identity attached or if the
    /// gateway rejects the write.
    pub fn submit_score(&self, session: &Session) -> Result<String, anyhow::Error>
    where
        G::Error: Into<anyhow::Error>,
    {
        let entry = LeaderboardEntry::from_session(session)?;
        self.gateway.append_leaderboard(&entry).map_err(Into::into)
    }

    /// Fetch the top scores, ranked by XP.
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway read fails.
    pub fn leaderboard(&self, top: usize) -> Result<Vec<LeaderboardEntry>, anyhow::Error>
    where
        G::Error: Into<anyhow::Error>,
    {
        self.gateway.leaderboard(top).map_err(Into::into)
    }

    /// Aggregate lifetime statistics over a player's finished games.
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway read fails.
    pub fn user_stats(&self, uid: &str) -> Result<UserStats, anyhow::Error>
    where
        G::Error: Into<anyhow::Error>,
    {
        let games = self.gateway.finished_games(uid).map_err(Into::into)?;
        Ok(UserStats::from_games(&games))
    }
}
