//! Negotiation table: settle the three outstanding vendor demands one at a
//! time or stage a payment plan across them and submit it in one stroke.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    TEN_PERCENT_DIVISOR, XP_PLAN_PARTIAL_SCALE, XP_SETTLE_DELAY, XP_SETTLE_FULL, XP_SETTLE_PARTIAL,
};
use crate::error::{GameError, GameResult};
use crate::state::Session;

/// Where a vendor demand stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStatus {
    #[default]
    Pending,
    PaidFull,
    PaidPartial,
    Delayed,
}

impl SettlementStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::PaidFull => "paid_full",
            Self::PaidPartial => "paid_partial",
            Self::Delayed => "delayed",
        }
    }
}

impl fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettlementStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid_full" => Ok(Self::PaidFull),
            "paid_partial" => Ok(Self::PaidPartial),
            "delayed" => Ok(Self::Delayed),
            _ => Err(()),
        }
    }
}

/// One outstanding vendor demand on the negotiation table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationVendor {
    pub id: String,
    pub name: String,
    pub amount: i64,
    #[serde(default)]
    pub status: SettlementStatus,
}

/// The fixed opening demands.
#[must_use]
pub fn seed_vendors() -> Vec<NegotiationVendor> {
    let seed = |id: &str, name: &str, amount: i64| NegotiationVendor {
        id: id.to_string(),
        name: name.to_string(),
        amount,
        status: SettlementStatus::Pending,
    };
    vec![
        seed("v1", "Vendor A", 110_000),
        seed("v2", "Vendor B", 90_000),
        seed("v3", "Vendor C", 120_000),
    ]
}

/// How the player chooses to settle a single demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementKind {
    Full,
    Partial,
    Delay,
}

/// Amount due after the 10% partial-settlement discount.
#[must_use]
pub const fn discounted_amount(amount: i64) -> i64 {
    amount - amount / TEN_PERCENT_DIVISOR
}

/// Amount due after the 10% deferral surcharge.
#[must_use]
pub const fn delayed_amount(amount: i64) -> i64 {
    amount + amount / TEN_PERCENT_DIVISOR
}

/// Result of settling a single vendor demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorPayment {
    Settled { charged: i64 },
    Unaffordable,
    Ignored,
}

/// Settle one vendor demand.
///
/// Full pays the amount as listed, partial pays it less the 10% discount,
/// and delay pays nothing now but inflates the demand by 10% and locks it
/// as delayed. Full and partial are rejected when the charge exceeds the
/// balance; the original amount stays on the table.
///
/// # Errors
///
/// Returns an error if no vendor has the given id or the demand is no
/// longer pending.
pub fn pay_vendor(
    session: &mut Session,
    vendor_id: &str,
    kind: SettlementKind,
) -> GameResult<VendorPayment> {
    if session.is_game_over {
        return Ok(VendorPayment::Ignored);
    }
    let Some(index) = session.vendors.iter().position(|v| v.id == vendor_id) else {
        return Err(GameError::UnknownVendor(vendor_id.to_string()));
    };
    if session.vendors[index].status != SettlementStatus::Pending {
        return Err(GameError::VendorSettled(vendor_id.to_string()));
    }

    let amount = session.vendors[index].amount;
    let (charge, status, xp) = match kind {
        SettlementKind::Full => (amount, SettlementStatus::PaidFull, XP_SETTLE_FULL),
        SettlementKind::Partial => (
            discounted_amount(amount),
            SettlementStatus::PaidPartial,
            XP_SETTLE_PARTIAL,
        ),
        SettlementKind::Delay => (0, SettlementStatus::Delayed, XP_SETTLE_DELAY),
    };
    if charge > session.cash {
        return Ok(VendorPayment::Unaffordable);
    }

    session.vendors[index].status = status;
    if kind == SettlementKind::Delay {
        session.vendors[index].amount = delayed_amount(amount);
    }
    session.plan.remove(vendor_id);
    debug!("vendor {vendor_id} settled as {status}, charged {charge}");

    if charge != 0 {
        session.apply_transaction(-charge);
    }
    session.add_xp(xp, "");

    Ok(VendorPayment::Settled { charged: charge })
}

/// One staged line of the payment plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanLine {
    pub vendor_id: String,
    pub amount: i64,
}

/// Amounts staged against pending vendors, kept until the plan is
/// submitted or the session resets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentPlan {
    lines: Vec<PlanLine>,
}

impl PaymentPlan {
    /// Stage an amount for a vendor, replacing any earlier line. Zero
    /// removes the line.
    pub fn set_amount(&mut self, vendor_id: &str, amount: i64) {
        if amount == 0 {
            self.remove(vendor_id);
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.vendor_id == vendor_id) {
            line.amount = amount;
        } else {
            self.lines.push(PlanLine {
                vendor_id: vendor_id.to_string(),
                amount,
            });
        }
    }

    #[must_use]
    pub fn amount_for(&self, vendor_id: &str) -> i64 {
        self.lines
            .iter()
            .find(|l| l.vendor_id == vendor_id)
            .map_or(0, |l| l.amount)
    }

    #[must_use]
    pub fn total(&self) -> i64 {
        self.lines.iter().map(|l| l.amount).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn remove(&mut self, vendor_id: &str) {
        self.lines.retain(|l| l.vendor_id != vendor_id);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

/// Result of staging a plan amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanUpdate {
    Staged,
    Ignored,
}

/// Result of submitting the staged plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanSubmission {
    Submitted { total: i64, settled: usize },
    Ignored,
}

/// Stage an amount against a pending vendor. Zero clears the line.
///
/// # Errors
///
/// Returns an error if no vendor has the given id, the demand is no longer
/// pending, or the amount is negative or exceeds the demand.
pub fn stage_plan_amount(
    session: &mut Session,
    vendor_id: &str,
    amount: i64,
) -> GameResult<PlanUpdate> {
    if session.is_game_over {
        return Ok(PlanUpdate::Ignored);
    }
    let vendor = session
        .vendors
        .iter()
        .find(|v| v.id == vendor_id)
        .ok_or_else(|| GameError::UnknownVendor(vendor_id.to_string()))?;
    if vendor.status != SettlementStatus::Pending {
        return Err(GameError::VendorSettled(vendor_id.to_string()));
    }
    if amount < 0 {
        return Err(GameError::PlanAmountNegative);
    }
    if amount > vendor.amount {
        return Err(GameError::PlanAmountExceedsDue { due: vendor.amount });
    }
    session.plan.set_amount(vendor_id, amount);
    Ok(PlanUpdate::Staged)
}

/// Submit the staged plan: each staged vendor settles as full or partial
/// depending on whether the staged amount covers the demand, XP scales with
/// coverage, and the whole total is charged in a single transaction. A
/// successful submission ends the round and moves the session to summary.
///
/// # Errors
///
/// Returns an error if nothing is staged or the staged total exceeds the
/// balance. Lines are revalidated on submit; a stale line against a vendor
/// that is no longer pending fails the submission.
pub fn submit_payment_plan(session: &mut Session) -> GameResult<PlanSubmission> {
    if session.is_game_over {
        return Ok(PlanSubmission::Ignored);
    }
    let total = session.plan.total();
    if total == 0 {
        return Err(GameError::PlanEmpty);
    }
    for vendor in &session.vendors {
        let staged = session.plan.amount_for(&vendor.id);
        if staged > 0 && vendor.status != SettlementStatus::Pending {
            return Err(GameError::VendorSettled(vendor.id.clone()));
        }
    }
    if total > session.cash {
        return Err(GameError::PlanOverBudget {
            total,
            cash: session.cash,
        });
    }

    let mut settled = 0;
    for index in 0..session.vendors.len() {
        let (vendor_id, amount) = {
            let vendor = &session.vendors[index];
            (vendor.id.clone(), vendor.amount)
        };
        let staged = session.plan.amount_for(&vendor_id);
        if staged <= 0 {
            continue;
        }
        let (status, xp) = if staged == amount {
            (SettlementStatus::PaidFull, XP_SETTLE_FULL)
        } else {
            (
                SettlementStatus::PaidPartial,
                staged * XP_PLAN_PARTIAL_SCALE / amount,
            )
        };
        session.vendors[index].status = status;
        session.add_xp(xp, "");
        settled += 1;
    }

    debug!("payment plan submitted: {settled} vendors, total {total}");
    // total <= cash was checked above, so this cannot overdraw
    session.apply_transaction(-total);
    session.plan.clear();
    session.force_summary();

    Ok(PlanSubmission::Submitted { total, settled })
}
