//! Centralized balance and tuning constants for CashFlow game logic.
//!
//! These values define the deterministic scoring math for the simulation.
//! Keeping them together ensures balance can only be adjusted via code
//! changes reviewed in version control rather than through external assets.

// Session defaults ----------------------------------------------------------
pub(crate) const STARTING_CASH: i64 = 200_000;
pub(crate) const STARTING_XP: i64 = 0;
pub(crate) const SESSION_SECONDS: u32 = 3_600;
pub(crate) const SCENARIO_TODAY: (i32, u32, u32) = (2023, 8, 20);

// Reserve rule ---------------------------------------------------------------
pub(crate) const RESERVE_THRESHOLD: i64 = 50_000;

// XP awards ------------------------------------------------------------------
pub(crate) const XP_POSITIVE_CASH_FLOW: i64 = 5;
pub(crate) const XP_PROCESS_PAYMENT: i64 = 10;
pub(crate) const XP_CORRECT_PRIORITY: i64 = 30;
pub(crate) const XP_DISCOUNT_DECISION: i64 = 50;
pub(crate) const XP_BAD_DECISION: i64 = -25;
pub(crate) const XP_BADGE_UNLOCK: i64 = 25;
pub(crate) const XP_CASH_MILESTONE: i64 = 50;
pub(crate) const XP_RESERVE_BONUS: i64 = 50;
pub(crate) const XP_BANKRUPTCY_PENALTY: i64 = -50;
pub(crate) const XP_SETTLE_FULL: i64 = 20;
pub(crate) const XP_SETTLE_PARTIAL: i64 = 30;
pub(crate) const XP_SETTLE_DELAY: i64 = 10;
pub(crate) const XP_PLAN_PARTIAL_SCALE: i64 = 30;
pub(crate) const XP_SUPPLIER_EARLY: i64 = 30;
pub(crate) const XP_SUPPLIER_ON_TIME: i64 = 15;
pub(crate) const XP_EXTENSION_GRANTED: i64 = 25;
pub(crate) const XP_EXTENSION_REFUSED: i64 = -10;
pub(crate) const XP_DISCOUNT_GRANTED: i64 = 40;
pub(crate) const XP_DISCOUNT_REFUSED: i64 = -15;
pub(crate) const XP_INSTALLMENT_GRANTED: i64 = 20;
pub(crate) const XP_INSTALLMENT_REFUSED: i64 = -10;
pub(crate) const XP_RESERVE_WARNING: i64 = -25;
pub(crate) const XP_PAY_ALL_BONUS: i64 = 30;

// Badge thresholds -----------------------------------------------------------
pub(crate) const NEGOTIATOR_DISCOUNT_COUNT: u32 = 3;
pub(crate) const PRIORITIZER_CORRECT_COUNT: u32 = 5;
pub(crate) const PRIORITIZER_RESTORE_XP: i64 = 500;
pub(crate) const SAVER_CASH_THRESHOLD: i64 = RESERVE_THRESHOLD;

// Score badge thresholds -----------------------------------------------------
pub(crate) const SCORE_GOLD_MIN: i64 = 400;
pub(crate) const SCORE_SILVER_MIN: i64 = 300;
pub(crate) const SCORE_BRONZE_MIN: i64 = 200;

// Level thresholds -----------------------------------------------------------
pub(crate) const LEVEL_THRESHOLDS: [(u8, i64); 5] =
    [(1, 0), (2, 100), (3, 250), (4, 500), (5, 1_000)];

// Vendor standing ratios -----------------------------------------------------
pub(crate) const STANDING_BAD_RATIO: f64 = 0.5;
pub(crate) const STANDING_TENSE_RATIO: f64 = 0.25;

// Settlement tuning ----------------------------------------------------------
pub(crate) const TEN_PERCENT_DIVISOR: i64 = 10;
pub(crate) const INSTALLMENT_SPLIT: i64 = 3;
pub(crate) const EXTENSION_DAYS: i64 = 30;
pub(crate) const PAY_ALL_BONUS_MIN: usize = 2;

// Notices ----------------------------------------------------------------
pub(crate) const NOTICE_TTL_SECONDS: u32 = 3;

// Notice reasons -------------------------------------------------------------
pub(crate) const REASON_POSITIVE_CASH_FLOW: &str = "Positive cash flow";
pub(crate) const REASON_INSUFFICIENT_FUNDS: &str = "Game over: Insufficient funds";
pub(crate) const REASON_CASH_MILESTONE: &str = "Bonus: Cash balance ≥ ₹50,000";
pub(crate) const REASON_CORRECT_PRIORITY: &str = "Correct priority identified";
pub(crate) const REASON_DISCOUNT_DECISION: &str = "Successful discount/deferment";
pub(crate) const REASON_BAD_DECISION: &str = "Bad financial decision";
pub(crate) const REASON_RESERVE_MAINTAINED: &str = "Bonus: Maintained ₹50,000 reserve";
pub(crate) const REASON_SUPPLIER_EARLY: &str = "Early vendor payment";
pub(crate) const REASON_SUPPLIER_ON_TIME: &str = "On-time vendor payment";
pub(crate) const REASON_EXTENSION_GRANTED: &str = "Successfully negotiated payment extension";
pub(crate) const REASON_EXTENSION_REFUSED: &str = "Failed to negotiate payment extension";
pub(crate) const REASON_DISCOUNT_GRANTED: &str = "Successfully negotiated payment discount";
pub(crate) const REASON_DISCOUNT_REFUSED: &str = "Failed to negotiate payment discount";
pub(crate) const REASON_INSTALLMENT_GRANTED: &str = "Successfully negotiated installment plan";
pub(crate) const REASON_INSTALLMENT_REFUSED: &str = "Failed to negotiate installment plan";
pub(crate) const REASON_RESERVE_WARNING: &str = "Warning: Reserve would fall below ₹50,000";
pub(crate) const REASON_PAY_ALL_BONUS: &str = "Paid at least 2 vendors on time";
pub(crate) const REASON_PROGRESS_SAVED: &str = "Game progress saved";
pub(crate) const REASON_SAVE_FAILED: &str = "Failed to save progress";
pub(crate) const REASON_PROGRESS_LOADED: &str = "Game progress loaded";
pub(crate) const REASON_LOAD_FAILED: &str = "Failed to load saved game";
