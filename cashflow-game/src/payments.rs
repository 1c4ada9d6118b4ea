//! Dashboard payments: the receivables and payables the player prioritizes
//! and processes.

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::XP_PROCESS_PAYMENT;
use crate::error::{GameError, GameResult};
use crate::state::{Session, TransactionOutcome};

/// Urgency tag the player assigns to a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    None,
    High,
    Medium,
    Low,
}

impl Priority {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(()),
        }
    }
}

/// Direction of a dashboard payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    Receivable,
    Payable,
}

impl PaymentKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Receivable => "receivable",
            Self::Payable => "payable",
        }
    }
}

impl fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One open receivable or payable on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub name: String,
    pub amount: i64,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub priority: Priority,
    #[serde(rename = "type")]
    pub kind: PaymentKind,
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn seed(id: &str, name: &str, amount: i64, due: NaiveDate, kind: PaymentKind) -> Payment {
    Payment {
        id: id.to_string(),
        name: name.to_string(),
        amount,
        due_date: due,
        priority: Priority::None,
        kind,
    }
}

/// The fixed opening book of receivables and payables.
#[must_use]
pub fn seed_payments() -> Vec<Payment> {
    vec![
        seed(
            "1",
            "Client ABC",
            20_000,
            ymd(2023, 8, 10),
            PaymentKind::Receivable,
        ),
        seed(
            "2",
            "Client XYZ",
            30_000,
            ymd(2023, 8, 15),
            PaymentKind::Receivable,
        ),
        seed(
            "3",
            "Supplier 123",
            150_000,
            ymd(2023, 8, 5),
            PaymentKind::Payable,
        ),
        seed(
            "4",
            "Office Rent",
            100_000,
            ymd(2023, 8, 1),
            PaymentKind::Payable,
        ),
        seed(
            "5",
            "Utilities",
            40_000,
            ymd(2023, 8, 12),
            PaymentKind::Payable,
        ),
        seed(
            "6",
            "Staff Salaries",
            30_000,
            ymd(2023, 8, 28),
            PaymentKind::Payable,
        ),
    ]
}

/// The priority the seeded book expects for each entry, keyed by due date
/// and direction. Entries outside the seed have no correct answer and any
/// tag counts as a bad decision.
#[must_use]
pub fn correct_priority(payment_id: &str) -> Option<Priority> {
    match payment_id {
        "3" | "4" => Some(Priority::High),
        "1" | "5" => Some(Priority::Medium),
        "2" | "6" => Some(Priority::Low),
        _ => None,
    }
}

/// Result of tagging a payment with a priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityOutcome {
    Correct,
    Incorrect,
    Ignored,
}

/// Result of processing a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    Collected { amount: i64 },
    Paid { amount: i64 },
    Bankrupt,
    Ignored,
}

/// Tag a payment with a priority and judge the choice against the expected
/// table. The tag sticks either way; every call is judged independently, so
/// re-tagging the same entry scores again.
///
/// # Errors
///
/// Returns an error if no payment has the given id.
pub fn set_priority(
    session: &mut Session,
    payment_id: &str,
    priority: Priority,
) -> GameResult<PriorityOutcome> {
    if session.is_game_over {
        return Ok(PriorityOutcome::Ignored);
    }
    let payment = session
        .payments
        .iter_mut()
        .find(|p| p.id == payment_id)
        .ok_or_else(|| GameError::UnknownPayment(payment_id.to_string()))?;
    payment.priority = priority;

    if correct_priority(payment_id) == Some(priority) {
        session.record_correct_priority();
        Ok(PriorityOutcome::Correct)
    } else {
        session.record_bad_decision();
        Ok(PriorityOutcome::Incorrect)
    }
}

/// Process a payment: collect a receivable or settle a payable, remove the
/// entry, and award the processing XP. A payable bigger than the balance
/// bankrupts the session and the award is skipped.
///
/// # Errors
///
/// Returns an error if no payment has the given id.
pub fn process_payment(session: &mut Session, payment_id: &str) -> GameResult<ProcessOutcome> {
    if session.is_game_over {
        return Ok(ProcessOutcome::Ignored);
    }
    let Some(index) = session.payments.iter().position(|p| p.id == payment_id) else {
        return Err(GameError::UnknownPayment(payment_id.to_string()));
    };
    let payment = session.payments[index].clone();
    let delta = match payment.kind {
        PaymentKind::Receivable => payment.amount,
        PaymentKind::Payable => -payment.amount,
    };

    let outcome = session.apply_transaction(delta);
    session.payments.remove(index);

    let verb = match payment.kind {
        PaymentKind::Receivable => "collected",
        PaymentKind::Payable => "paid",
    };
    debug!("{} payment {} for {}", verb, payment.id, payment.amount);
    // add_xp is a no-op when the transaction just ended the game
    session.add_xp(
        XP_PROCESS_PAYMENT,
        &format!("Successfully {verb} {}", payment.name),
    );

    Ok(match (outcome, payment.kind) {
        (TransactionOutcome::Bankrupt, _) => ProcessOutcome::Bankrupt,
        (_, PaymentKind::Receivable) => ProcessOutcome::Collected {
            amount: payment.amount,
        },
        (_, PaymentKind::Payable) => ProcessOutcome::Paid {
            amount: payment.amount,
        },
    })
}
