//! Recurring bill schedule guarded by the cash reserve: bills only clear
//! when the balance stays above the reserve line afterwards.

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::constants::{
    PAY_ALL_BONUS_MIN, REASON_PAY_ALL_BONUS, REASON_RESERVE_WARNING, RESERVE_THRESHOLD,
    XP_PAY_ALL_BONUS, XP_RESERVE_WARNING,
};
use crate::error::{GameError, GameResult};
use crate::state::Session;

/// One recurring bill on the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledBill {
    pub id: String,
    pub name: String,
    pub amount: i64,
    pub due_date: NaiveDate,
    #[serde(rename = "isPaid")]
    pub paid: bool,
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// The fixed opening schedule.
#[must_use]
pub fn seed_bills() -> Vec<ScheduledBill> {
    let seed = |id: &str, name: &str, amount: i64, due: NaiveDate| ScheduledBill {
        id: id.to_string(),
        name: name.to_string(),
        amount,
        due_date: due,
        paid: false,
    };
    vec![
        seed("1", "Mortgage", 150, ymd(2023, 7, 15)),
        seed("2", "Car Loan", 75, ymd(2023, 7, 18)),
        seed("3", "Credit Card", 50, ymd(2023, 7, 20)),
        seed("4", "Utilities", 35, ymd(2023, 7, 25)),
    ]
}

/// Result of paying one scheduled bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillPayment {
    Paid { amount: i64 },
    ReserveBlocked,
    Ignored,
}

/// Result of clearing the whole schedule at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkPayment {
    Paid { count: usize, bonus: bool },
    ReserveBlocked,
    NothingUnpaid,
    Ignored,
}

fn reserve_blocked(session: &mut Session, charge: i64) -> bool {
    if session.cash - charge < RESERVE_THRESHOLD {
        session.add_xp(XP_RESERVE_WARNING, REASON_RESERVE_WARNING);
        session.record_bad_decision();
        return true;
    }
    false
}

/// Pay one bill. The payment is refused outright, with an XP penalty and a
/// bad-decision mark, when it would drop the balance below the reserve.
///
/// # Errors
///
/// Returns an error if no bill has the given id or it is already paid.
pub fn pay_bill(session: &mut Session, bill_id: &str) -> GameResult<BillPayment> {
    if session.is_game_over {
        return Ok(BillPayment::Ignored);
    }
    let Some(index) = session.bills.iter().position(|b| b.id == bill_id) else {
        return Err(GameError::UnknownBill(bill_id.to_string()));
    };
    if session.bills[index].paid {
        return Err(GameError::BillAlreadyPaid(bill_id.to_string()));
    }

    let amount = session.bills[index].amount;
    if reserve_blocked(session, amount) {
        return Ok(BillPayment::ReserveBlocked);
    }

    session.apply_transaction(-amount);
    session.bills[index].paid = true;
    debug!("bill {bill_id} paid: {amount}");
    Ok(BillPayment::Paid { amount })
}

/// Pay every unpaid bill in one transaction, with the same reserve guard
/// applied to the combined total. Clearing two or more bills at once earns
/// the on-time bonus.
///
/// # Errors
///
/// This function does not fail; the `GameResult` keeps its signature in
/// line with the other schedule operations.
pub fn pay_all_bills(session: &mut Session) -> GameResult<BulkPayment> {
    if session.is_game_over {
        return Ok(BulkPayment::Ignored);
    }
    let total: i64 = session
        .bills
        .iter()
        .filter(|b| !b.paid)
        .map(|b| b.amount)
        .sum();
    let count = session.bills.iter().filter(|b| !b.paid).count();
    if count == 0 {
        return Ok(BulkPayment::NothingUnpaid);
    }
    if reserve_blocked(session, total) {
        return Ok(BulkPayment::ReserveBlocked);
    }

    session.apply_transaction(-total);
    for bill in &mut session.bills {
        bill.paid = true;
    }
    debug!("schedule cleared: {count} bills, total {total}");

    let bonus = count >= PAY_ALL_BONUS_MIN;
    if bonus {
        session.add_xp(XP_PAY_ALL_BONUS, REASON_PAY_ALL_BONUS);
    }
    Ok(BulkPayment::Paid { count, bonus })
}
