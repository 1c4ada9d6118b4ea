//! Error taxonomy for engine operations.
//!
//! Validation failures never mutate the session; callers can surface the
//! message text directly in a form or toast.

use thiserror::Error;

/// Errors returned by validation and persistence entry points.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("no payment with id {0}")]
    UnknownPayment(String),

    #[error("no vendor with id {0}")]
    UnknownVendor(String),

    #[error("no supplier with id {0}")]
    UnknownSupplier(String),

    #[error("no scheduled bill with id {0}")]
    UnknownBill(String),

    #[error("vendor {0} has already been settled")]
    VendorSettled(String),

    #[error("supplier {0} has nothing due")]
    NothingDue(String),

    #[error("bill {0} is already paid")]
    BillAlreadyPaid(String),

    #[error("planned amount cannot be negative")]
    PlanAmountNegative,

    #[error("planned amount cannot exceed the ₹{due} due")]
    PlanAmountExceedsDue { due: i64 },

    #[error("payment plan has no staged amounts")]
    PlanEmpty,

    #[error("plan total ₹{total} exceeds the ₹{cash} cash balance")]
    PlanOverBudget { total: i64, cash: i64 },

    #[error("sign-in is required before saving progress")]
    Unauthenticated,
}

/// Convenience alias for fallible engine operations.
pub type GameResult<T> = Result<T, GameError>;
