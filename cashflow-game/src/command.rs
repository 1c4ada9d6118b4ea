//! Host-facing command surface: every session mutation expressed as one
//! serializable message, so UIs and replay tooling drive the engine through
//! a single entry point.

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::badges::BadgeId;
use crate::error::{GameError, GameResult};
use crate::negotiation::{self, SettlementKind};
use crate::payments::{self, Priority};
use crate::schedule;
use crate::state::{GamePhase, Session};
use crate::vendors::{self, NegotiationOption};

/// One session mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    Transaction { delta: i64 },
    SetPriority { payment_id: String, priority: Priority },
    ProcessPayment { payment_id: String },
    RecordDiscountDecision,
    RecordBadDecision,
    UnlockBadge { badge: BadgeId },
    PayVendor { vendor_id: String, kind: SettlementKind },
    StagePlanAmount { vendor_id: String, amount: i64 },
    SubmitPaymentPlan,
    PaySupplier { supplier_id: String },
    NegotiateTerms { supplier_id: String, option: NegotiationOption },
    PayBill { bill_id: String },
    PayAllBills,
    SetPhase { phase: GamePhase },
    EnterSummary,
    FinishReview,
    StartTimer,
    StopTimer,
    Tick,
    Reset,
}

impl Session {
    /// Dispatch one command against the session. Outcome details are
    /// dropped; callers that need them use the operation functions
    /// directly.
    ///
    /// # Errors
    ///
    /// Propagates the dispatched operation's validation error.
    pub fn apply(&mut self, command: Command) -> GameResult<()> {
        match command {
            Command::Transaction { delta } => {
                self.apply_transaction(delta);
            }
            Command::SetPriority {
                payment_id,
                priority,
            } => {
                payments::set_priority(self, &payment_id, priority)?;
            }
            Command::ProcessPayment { payment_id } => {
                payments::process_payment(self, &payment_id)?;
            }
            Command::RecordDiscountDecision => self.record_discount_decision(),
            Command::RecordBadDecision => self.record_bad_decision(),
            Command::UnlockBadge { badge } => {
                self.unlock_badge(badge);
            }
            Command::PayVendor { vendor_id, kind } => {
                negotiation::pay_vendor(self, &vendor_id, kind)?;
            }
            Command::StagePlanAmount { vendor_id, amount } => {
                negotiation::stage_plan_amount(self, &vendor_id, amount)?;
            }
            Command::SubmitPaymentPlan => {
                negotiation::submit_payment_plan(self)?;
            }
            Command::PaySupplier { supplier_id } => {
                vendors::pay_supplier(self, &supplier_id)?;
            }
            Command::NegotiateTerms {
                supplier_id,
                option,
            } => {
                vendors::negotiate_terms(self, &supplier_id, option)?;
            }
            Command::PayBill { bill_id } => {
                schedule::pay_bill(self, &bill_id)?;
            }
            Command::PayAllBills => {
                schedule::pay_all_bills(self)?;
            }
            Command::SetPhase { phase } => {
                self.set_phase(phase);
            }
            Command::EnterSummary => {
                self.enter_summary();
            }
            Command::FinishReview => {
                self.finish_review();
            }
            Command::StartTimer => self.start_timer(),
            Command::StopTimer => self.stop_timer(),
            Command::Tick => {
                self.tick_second();
            }
            Command::Reset => self.reset(),
        }
        Ok(())
    }
}

/// FIFO buffer of pending commands. Draining applies everything in order;
/// a command that fails validation is logged and skipped, it never blocks
/// the ones behind it.
#[derive(Debug, Default)]
pub struct CommandQueue {
    pending: VecDeque<Command>,
}

impl CommandQueue {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }

    pub fn push(&mut self, command: Command) {
        self.pending.push_back(command);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Apply every queued command to the session, in arrival order,
    /// returning the validation errors of the ones that were rejected.
    pub fn drain_into(&mut self, session: &mut Session) -> Vec<GameError> {
        let mut rejected = Vec::new();
        while let Some(command) = self.pending.pop_front() {
            if let Err(err) = session.apply(command) {
                warn!("command rejected: {err}");
                rejected.push(err);
            }
        }
        rejected
    }
}
