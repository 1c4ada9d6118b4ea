//! The live session: one mutable record the whole game plays against.
//!
//! Every mechanic funnels its money movement through
//! [`Session::apply_transaction`] and its scoring through
//! [`Session::add_xp`], so the bankruptcy clamp, the cash-milestone badge,
//! and the single-slot notice behave identically no matter which screen
//! triggered them.

use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::badges::{self, Badge, BadgeId};
use crate::constants::{
    REASON_BAD_DECISION, REASON_CASH_MILESTONE, REASON_CORRECT_PRIORITY, REASON_DISCOUNT_DECISION,
    REASON_INSUFFICIENT_FUNDS, REASON_POSITIVE_CASH_FLOW, REASON_RESERVE_MAINTAINED,
    RESERVE_THRESHOLD, SAVER_CASH_THRESHOLD, SCENARIO_TODAY, SESSION_SECONDS, STARTING_CASH,
    STARTING_XP, XP_BADGE_UNLOCK, XP_BAD_DECISION, XP_BANKRUPTCY_PENALTY, XP_CASH_MILESTONE,
    XP_CORRECT_PRIORITY, XP_DISCOUNT_DECISION, XP_POSITIVE_CASH_FLOW, XP_RESERVE_BONUS,
};
use crate::negotiation::{NegotiationVendor, PaymentPlan, SettlementStatus, seed_vendors};
use crate::payments::{Payment, PaymentKind, seed_payments};
use crate::schedule::{ScheduledBill, seed_bills};
use crate::scoring::{self, ScoreBadge, VendorStatus, XpNotice};
use crate::timer::SessionTimer;
use crate::vendors::{Supplier, seed_suppliers};

/// Screen the session is currently on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    #[default]
    Dashboard,
    Negotiation,
    Vendors,
    Payment,
    Summary,
    GameOver,
}

impl GamePhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Negotiation => "negotiation",
            Self::Vendors => "vendors",
            Self::Payment => "payment",
            Self::Summary => "summary",
            Self::GameOver => "gameover",
        }
    }

    /// Whether the phase is one of the four playable screens.
    #[must_use]
    pub const fn is_playable(self) -> bool {
        matches!(
            self,
            Self::Dashboard | Self::Negotiation | Self::Vendors | Self::Payment
        )
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GamePhase {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dashboard" => Ok(Self::Dashboard),
            "negotiation" => Ok(Self::Negotiation),
            "vendors" => Ok(Self::Vendors),
            "payment" => Ok(Self::Payment),
            "summary" => Ok(Self::Summary),
            "gameover" => Ok(Self::GameOver),
            _ => Err(()),
        }
    }
}

/// Why the run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverCause {
    Bankruptcy,
    TimerExpired,
}

impl GameOverCause {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bankruptcy => "bankruptcy",
            Self::TimerExpired => "timer_expired",
        }
    }
}

impl fmt::Display for GameOverCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed-in player attached to the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerIdentity {
    pub uid: String,
    pub display_name: String,
    #[serde(rename = "photoURL", default)]
    pub photo_url: Option<String>,
}

/// Tunable session defaults. The scenario clock is fixed rather than read
/// from the wall so the supplier due-date rules stay deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub starting_cash: i64,
    pub starting_xp: i64,
    pub timer_seconds: u32,
    pub today: NaiveDate,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let (year, month, day) = SCENARIO_TODAY;
        Self {
            starting_cash: STARTING_CASH,
            starting_xp: STARTING_XP,
            timer_seconds: SESSION_SECONDS,
            today: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
        }
    }
}

/// Result of a cash movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionOutcome {
    Applied { cash: i64 },
    Bankrupt,
    Ignored,
}

/// Result of a phase-change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseChange {
    Moved,
    Ignored,
}

/// Result of one second of wall time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Idle,
    Counting { remaining: u32 },
    Expired,
}

/// Full state of one game run.
#[derive(Debug, Clone)]
pub struct Session {
    pub cash: i64,
    pub xp: i64,
    pub correct_priorities: u32,
    pub discount_decisions: u32,
    pub bad_decisions: u32,
    pub vendor_status: VendorStatus,
    pub phase: GamePhase,
    pub is_game_over: bool,
    pub game_over_cause: Option<GameOverCause>,
    pub badges: Vec<Badge>,
    pub payments: Vec<Payment>,
    pub vendors: Vec<NegotiationVendor>,
    pub plan: PaymentPlan,
    pub suppliers: Vec<Supplier>,
    pub bills: Vec<ScheduledBill>,
    pub timer: SessionTimer,
    /// Scenario date used for every due-date comparison.
    pub today: NaiveDate,
    pub identity: Option<PlayerIdentity>,
    pub game_id: Option<String>,
    pub last_saved: Option<DateTime<Utc>>,
    notice: Option<XpNotice>,
    reserve_bonus_granted: bool,
    config: SessionConfig,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl Session {
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            cash: config.starting_cash,
            xp: config.starting_xp,
            correct_priorities: 0,
            discount_decisions: 0,
            bad_decisions: 0,
            vendor_status: VendorStatus::Good,
            phase: GamePhase::Dashboard,
            is_game_over: false,
            game_over_cause: None,
            badges: badges::default_badges(),
            payments: seed_payments(),
            vendors: seed_vendors(),
            plan: PaymentPlan::default(),
            suppliers: seed_suppliers(),
            bills: seed_bills(),
            timer: SessionTimer::new(config.timer_seconds),
            today: config.today,
            identity: None,
            game_id: None,
            last_saved: None,
            notice: None,
            reserve_bonus_granted: false,
            config,
        }
    }

    /// Move cash by `delta`. A move that would overdraw the balance clamps
    /// cash to zero and ends the game on the spot; a result at or above the
    /// 50k line unlocks the saver badge (once) with its milestone bonus, and
    /// any inflow earns the positive-cash-flow XP.
    pub fn apply_transaction(&mut self, delta: i64) -> TransactionOutcome {
        if self.is_game_over {
            return TransactionOutcome::Ignored;
        }

        let new_cash = self.cash + delta;
        if new_cash < 0 {
            self.cash = 0;
            self.timer.stop();
            self.is_game_over = true;
            self.game_over_cause = Some(GameOverCause::Bankruptcy);
            // penalty lands as part of the transition, past the guard
            self.grant_xp(XP_BANKRUPTCY_PENALTY, REASON_INSUFFICIENT_FUNDS);
            self.force_summary();
            info!("session bankrupt: delta {delta} overdrew the balance");
            return TransactionOutcome::Bankrupt;
        }

        self.cash = new_cash;
        if new_cash >= SAVER_CASH_THRESHOLD && !self.badge_unlocked(BadgeId::Saver) {
            self.unlock_badge(BadgeId::Saver);
            self.add_xp(XP_CASH_MILESTONE, REASON_CASH_MILESTONE);
        }
        if delta > 0 {
            self.add_xp(XP_POSITIVE_CASH_FLOW, REASON_POSITIVE_CASH_FLOW);
        }
        TransactionOutcome::Applied { cash: new_cash }
    }

    /// Add XP with a visible reason. Ignored once the game is over; a zero
    /// amount changes nothing and posts nothing.
    pub fn add_xp(&mut self, amount: i64, reason: &str) {
        if self.is_game_over {
            return;
        }
        self.grant_xp(amount, reason);
    }

    /// Unguarded XP change, reserved for awards that are part of ending the
    /// game (bankruptcy penalty, forced-summary reserve bonus).
    fn grant_xp(&mut self, amount: i64, reason: &str) {
        if amount == 0 {
            return;
        }
        self.xp += amount;
        debug!("xp {amount:+} ({reason}), now {}", self.xp);
        self.notice = Some(XpNotice::new(amount, reason));
    }

    /// Post a zero-XP informational notice. Persistence paths use this so
    /// save/load feedback is visible even though no XP moves.
    pub(crate) fn post_notice(&mut self, reason: &str) {
        self.notice = Some(XpNotice::new(0, reason));
    }

    /// The outstanding notice, if it has not expired yet.
    #[must_use]
    pub fn xp_notice(&self) -> Option<&XpNotice> {
        self.notice.as_ref().filter(|n| !n.is_expired())
    }

    pub fn record_correct_priority(&mut self) {
        if self.is_game_over {
            return;
        }
        self.correct_priorities += 1;
        if badges::prioritizer_earned(self.correct_priorities) {
            self.unlock_badge(BadgeId::Prioritizer);
        }
        self.add_xp(XP_CORRECT_PRIORITY, REASON_CORRECT_PRIORITY);
    }

    pub fn record_discount_decision(&mut self) {
        if self.is_game_over {
            return;
        }
        self.discount_decisions += 1;
        if badges::negotiator_earned(self.discount_decisions) {
            self.unlock_badge(BadgeId::Negotiator);
        }
        self.add_xp(XP_DISCOUNT_DECISION, REASON_DISCOUNT_DECISION);
    }

    pub fn record_bad_decision(&mut self) {
        if self.is_game_over {
            return;
        }
        self.bad_decisions += 1;
        self.add_xp(XP_BAD_DECISION, REASON_BAD_DECISION);
    }

    #[must_use]
    pub fn badge_unlocked(&self, id: BadgeId) -> bool {
        self.badges.iter().any(|b| b.id == id && b.unlocked)
    }

    /// Unlock a badge and award the unlock bonus. Returns false when the
    /// badge is already unlocked or the game is over.
    pub fn unlock_badge(&mut self, id: BadgeId) -> bool {
        if self.is_game_over || self.badge_unlocked(id) {
            return false;
        }
        let Some(badge) = self.badges.iter_mut().find(|b| b.id == id) else {
            return false;
        };
        badge.unlocked = true;
        let name = badge.name.clone();
        info!("badge unlocked: {id}");
        self.add_xp(XP_BADGE_UNLOCK, &format!("Badge unlocked: {name}"));
        true
    }

    /// Re-mark a badge as unlocked without XP, used when rebuilding state
    /// from a snapshot.
    pub(crate) fn restore_badge(&mut self, id: BadgeId) {
        if let Some(badge) = self.badges.iter_mut().find(|b| b.id == id) {
            badge.unlocked = true;
        }
    }

    /// Move between the four playable screens. Anything else, or any move
    /// after the game ended, is ignored.
    pub fn set_phase(&mut self, phase: GamePhase) -> PhaseChange {
        if self.is_game_over || !phase.is_playable() {
            return PhaseChange::Ignored;
        }
        self.phase = phase;
        PhaseChange::Moved
    }

    /// End the round and show the summary screen.
    pub fn enter_summary(&mut self) -> PhaseChange {
        if self.is_game_over {
            return PhaseChange::Ignored;
        }
        self.force_summary();
        PhaseChange::Moved
    }

    /// Summary transition shared by bankruptcy, timer expiry, plan
    /// submission, and the explicit request: recompute the vendor standing
    /// from the decision counters and grant the one-time reserve bonus when
    /// the run kept 50k in cash and did not end in bankruptcy.
    pub(crate) fn force_summary(&mut self) {
        self.vendor_status = scoring::vendor_status(
            self.correct_priorities + self.discount_decisions,
            self.bad_decisions,
        );
        if self.cash >= RESERVE_THRESHOLD
            && !self.reserve_bonus_granted
            && self.game_over_cause != Some(GameOverCause::Bankruptcy)
        {
            self.reserve_bonus_granted = true;
            self.grant_xp(XP_RESERVE_BONUS, REASON_RESERVE_MAINTAINED);
        }
        self.phase = GamePhase::Summary;
        debug!("entered summary, standing {}", self.vendor_status);
    }

    /// Leave the summary for the final game-over screen.
    pub fn finish_review(&mut self) -> PhaseChange {
        if self.phase != GamePhase::Summary {
            return PhaseChange::Ignored;
        }
        self.phase = GamePhase::GameOver;
        PhaseChange::Moved
    }

    pub fn start_timer(&mut self) {
        if self.is_game_over {
            return;
        }
        self.timer.start();
    }

    pub fn stop_timer(&mut self) {
        self.timer.stop();
    }

    /// Advance one second of wall time. The outstanding notice always ages;
    /// the countdown only moves while the timer runs and the game is live.
    /// Hitting zero ends the game exactly once.
    pub fn tick_second(&mut self) -> TickOutcome {
        if let Some(notice) = self.notice.as_mut() {
            if notice.tick() {
                self.notice = None;
            }
        }
        if !self.timer.running || self.is_game_over {
            return TickOutcome::Idle;
        }
        let remaining = self.timer.tick();
        if remaining == 0 {
            self.timer.stop();
            self.is_game_over = true;
            self.game_over_cause = Some(GameOverCause::TimerExpired);
            self.force_summary();
            info!("session ended: timer expired");
            return TickOutcome::Expired;
        }
        TickOutcome::Counting { remaining }
    }

    /// Start the run over with the configured defaults: counters, badges,
    /// and all four books reseed; the attached identity and save bookkeeping
    /// survive. The timer restarts on its own for signed-in players.
    pub fn reset(&mut self) {
        self.cash = self.config.starting_cash;
        self.xp = self.config.starting_xp;
        self.correct_priorities = 0;
        self.discount_decisions = 0;
        self.bad_decisions = 0;
        self.vendor_status = VendorStatus::Good;
        self.phase = GamePhase::Dashboard;
        self.is_game_over = false;
        self.game_over_cause = None;
        self.badges = badges::default_badges();
        self.payments = seed_payments();
        self.vendors = seed_vendors();
        self.plan.clear();
        self.suppliers = seed_suppliers();
        self.bills = seed_bills();
        self.timer = SessionTimer::new(self.config.timer_seconds);
        self.notice = None;
        self.reserve_bonus_granted = false;
        if self.identity.is_some() {
            self.timer.start();
        }
        info!("session reset");
    }

    #[must_use]
    pub fn level(&self) -> u8 {
        scoring::current_level(self.xp)
    }

    #[must_use]
    pub fn level_progress(&self) -> f32 {
        scoring::progress_to_next(self.xp)
    }

    #[must_use]
    pub fn score_badge(&self) -> ScoreBadge {
        scoring::score_badge(self.xp)
    }

    #[must_use]
    pub fn total_receivables(&self) -> i64 {
        self.payments
            .iter()
            .filter(|p| p.kind == PaymentKind::Receivable)
            .map(|p| p.amount)
            .sum()
    }

    #[must_use]
    pub fn total_payables(&self) -> i64 {
        self.payments
            .iter()
            .filter(|p| p.kind == PaymentKind::Payable)
            .map(|p| p.amount)
            .sum()
    }

    #[must_use]
    pub fn pending_vendor_total(&self) -> i64 {
        self.vendors
            .iter()
            .filter(|v| v.status == SettlementStatus::Pending)
            .map(|v| v.amount)
            .sum()
    }

    #[must_use]
    pub fn unpaid_bills_total(&self) -> i64 {
        self.bills
            .iter()
            .filter(|b| !b.paid)
            .map(|b| b.amount)
            .sum()
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}
