//! Supplier relationships: recurring suppliers with due amounts, payment
//! history, and terms the player can renegotiate when the relationship
//! allows it.

use chrono::{Duration, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    EXTENSION_DAYS, INSTALLMENT_SPLIT, REASON_DISCOUNT_GRANTED, REASON_DISCOUNT_REFUSED,
    REASON_EXTENSION_GRANTED, REASON_EXTENSION_REFUSED, REASON_INSTALLMENT_GRANTED,
    REASON_INSTALLMENT_REFUSED, REASON_SUPPLIER_EARLY, REASON_SUPPLIER_ON_TIME,
    TEN_PERCENT_DIVISOR, XP_DISCOUNT_GRANTED, XP_DISCOUNT_REFUSED, XP_EXTENSION_GRANTED,
    XP_EXTENSION_REFUSED, XP_INSTALLMENT_GRANTED, XP_INSTALLMENT_REFUSED, XP_SUPPLIER_EARLY,
    XP_SUPPLIER_ON_TIME,
};
use crate::error::{GameError, GameResult};
use crate::scoring::VendorStatus;
use crate::state::{Session, TransactionOutcome};

/// How much the business depends on a supplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Critical,
    Important,
    #[default]
    Standard,
}

impl Importance {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Important => "important",
            Self::Standard => "standard",
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Importance {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "critical" => Ok(Self::Critical),
            "important" => Ok(Self::Important),
            "standard" => Ok(Self::Standard),
            _ => Err(()),
        }
    }
}

/// One settled invoice in a supplier's history, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub date: NaiveDate,
    pub amount: i64,
    pub on_time: bool,
}

/// A recurring supplier with an open invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: String,
    pub name: String,
    pub relationship: VendorStatus,
    pub due_amount: i64,
    pub due_date: NaiveDate,
    pub payment_history: Vec<PaymentRecord>,
    pub products: Vec<String>,
    pub importance: Importance,
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn record(year: i32, month: u32, day: u32, amount: i64, on_time: bool) -> PaymentRecord {
    PaymentRecord {
        date: ymd(year, month, day),
        amount,
        on_time,
    }
}

/// The fixed opening roster of suppliers.
#[must_use]
pub fn seed_suppliers() -> Vec<Supplier> {
    vec![
        Supplier {
            id: "1".to_string(),
            name: "Alpha Supplies Inc.".to_string(),
            relationship: VendorStatus::Good,
            due_amount: 25_000,
            due_date: ymd(2023, 9, 15),
            payment_history: vec![
                record(2023, 8, 15, 25_000, true),
                record(2023, 7, 15, 25_000, true),
            ],
            products: vec![
                "Raw materials".to_string(),
                "Manufacturing supplies".to_string(),
            ],
            importance: Importance::Critical,
        },
        Supplier {
            id: "2".to_string(),
            name: "Beta Logistics".to_string(),
            relationship: VendorStatus::Tense,
            due_amount: 18_000,
            due_date: ymd(2023, 9, 5),
            payment_history: vec![
                record(2023, 8, 5, 18_000, false),
                record(2023, 7, 5, 18_000, true),
            ],
            products: vec!["Shipping".to_string(), "Warehousing".to_string()],
            importance: Importance::Important,
        },
        Supplier {
            id: "3".to_string(),
            name: "Gamma Tech Solutions".to_string(),
            relationship: VendorStatus::Bad,
            due_amount: 12_000,
            due_date: ymd(2023, 8, 30),
            payment_history: vec![
                record(2023, 7, 30, 12_000, false),
                record(2023, 6, 30, 12_000, false),
            ],
            products: vec!["Software licenses".to_string(), "IT support".to_string()],
            importance: Importance::Standard,
        },
    ]
}

/// Result of paying a supplier invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplierPayment {
    PaidEarly,
    PaidOnTime,
    PaidLate,
    Bankrupt,
    Ignored,
}

/// Renegotiable terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegotiationOption {
    Extension,
    Discount,
    Installment,
}

/// Result of renegotiating supplier terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermsOutcome {
    Accepted,
    Refused,
    Ignored,
}

/// Pay a supplier's open invoice in full.
///
/// Paying before the due date improves the relationship one step and logs
/// an on-time history row; paying on the due date keeps the relationship
/// and logs the row. A late payment still charges the invoice but earns
/// nothing and the invoice stays open. A payment that overdraws the balance
/// ends the game before any supplier bookkeeping happens.
///
/// # Errors
///
/// Returns an error if no supplier has the given id or nothing is due.
pub fn pay_supplier(session: &mut Session, supplier_id: &str) -> GameResult<SupplierPayment> {
    if session.is_game_over {
        return Ok(SupplierPayment::Ignored);
    }
    let Some(index) = session.suppliers.iter().position(|s| s.id == supplier_id) else {
        return Err(GameError::UnknownSupplier(supplier_id.to_string()));
    };
    let due = session.suppliers[index].due_amount;
    if due == 0 {
        return Err(GameError::NothingDue(supplier_id.to_string()));
    }

    if session.apply_transaction(-due) == TransactionOutcome::Bankrupt {
        return Ok(SupplierPayment::Bankrupt);
    }

    let today = session.today;
    let due_date = session.suppliers[index].due_date;
    let outcome = if today < due_date {
        let supplier = &mut session.suppliers[index];
        supplier.relationship = match supplier.relationship {
            VendorStatus::Bad => VendorStatus::Tense,
            VendorStatus::Tense | VendorStatus::Good => VendorStatus::Good,
        };
        supplier.due_amount = 0;
        supplier.payment_history.insert(
            0,
            PaymentRecord {
                date: today,
                amount: due,
                on_time: true,
            },
        );
        session.add_xp(XP_SUPPLIER_EARLY, REASON_SUPPLIER_EARLY);
        SupplierPayment::PaidEarly
    } else if today == due_date {
        let supplier = &mut session.suppliers[index];
        supplier.due_amount = 0;
        supplier.payment_history.insert(
            0,
            PaymentRecord {
                date: today,
                amount: due,
                on_time: true,
            },
        );
        session.add_xp(XP_SUPPLIER_ON_TIME, REASON_SUPPLIER_ON_TIME);
        SupplierPayment::PaidOnTime
    } else {
        // late: the cash is gone but the invoice stays open and the
        // relationship does not move
        SupplierPayment::PaidLate
    };
    debug!("supplier {supplier_id} paid {due}: {outcome:?}");
    Ok(outcome)
}

/// Renegotiate the terms of a supplier's open invoice.
///
/// An extension pushes the due date out 30 days, a discount takes 10% off
/// the amount, and an installment plan cuts it to a third. Extensions and
/// discounts need a good relationship; installments only need one that is
/// not bad. A refusal costs XP and counts as a bad decision.
///
/// # Errors
///
/// Returns an error if no supplier has the given id or nothing is due.
pub fn negotiate_terms(
    session: &mut Session,
    supplier_id: &str,
    option: NegotiationOption,
) -> GameResult<TermsOutcome> {
    if session.is_game_over {
        return Ok(TermsOutcome::Ignored);
    }
    let Some(index) = session.suppliers.iter().position(|s| s.id == supplier_id) else {
        return Err(GameError::UnknownSupplier(supplier_id.to_string()));
    };
    if session.suppliers[index].due_amount == 0 {
        return Err(GameError::NothingDue(supplier_id.to_string()));
    }

    let relationship = session.suppliers[index].relationship;
    let outcome = match option {
        NegotiationOption::Extension => {
            if relationship == VendorStatus::Good {
                session.add_xp(XP_EXTENSION_GRANTED, REASON_EXTENSION_GRANTED);
                let supplier = &mut session.suppliers[index];
                supplier.due_date += Duration::days(EXTENSION_DAYS);
                TermsOutcome::Accepted
            } else {
                session.add_xp(XP_EXTENSION_REFUSED, REASON_EXTENSION_REFUSED);
                session.record_bad_decision();
                TermsOutcome::Refused
            }
        }
        NegotiationOption::Discount => {
            if relationship == VendorStatus::Good {
                session.add_xp(XP_DISCOUNT_GRANTED, REASON_DISCOUNT_GRANTED);
                let supplier = &mut session.suppliers[index];
                supplier.due_amount -= supplier.due_amount / TEN_PERCENT_DIVISOR;
                TermsOutcome::Accepted
            } else {
                session.add_xp(XP_DISCOUNT_REFUSED, REASON_DISCOUNT_REFUSED);
                session.record_bad_decision();
                TermsOutcome::Refused
            }
        }
        NegotiationOption::Installment => {
            if relationship == VendorStatus::Bad {
                session.add_xp(XP_INSTALLMENT_REFUSED, REASON_INSTALLMENT_REFUSED);
                session.record_bad_decision();
                TermsOutcome::Refused
            } else {
                session.add_xp(XP_INSTALLMENT_GRANTED, REASON_INSTALLMENT_GRANTED);
                let supplier = &mut session.suppliers[index];
                supplier.due_amount /= INSTALLMENT_SPLIT;
                TermsOutcome::Accepted
            }
        }
    };
    debug!("supplier {supplier_id} terms {option:?}: {outcome:?}");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_roster_shape() {
        let suppliers = seed_suppliers();
        assert_eq!(suppliers.len(), 3);
        assert_eq!(suppliers[0].relationship, VendorStatus::Good);
        assert_eq!(suppliers[1].relationship, VendorStatus::Tense);
        assert_eq!(suppliers[2].relationship, VendorStatus::Bad);
        assert_eq!(suppliers[2].due_amount, 12_000);
        assert_eq!(suppliers[0].payment_history.len(), 2);
        assert_eq!(suppliers[1].importance, Importance::Important);
    }

    #[test]
    fn early_payment_improves_relationship_and_logs_history() {
        let mut session = Session::default();
        // Beta Logistics is tense and due 2023-09-05, well past today
        let outcome = pay_supplier(&mut session, "2").unwrap();
        assert_eq!(outcome, SupplierPayment::PaidEarly);
        let supplier = &session.suppliers[1];
        assert_eq!(supplier.relationship, VendorStatus::Good);
        assert_eq!(supplier.due_amount, 0);
        assert_eq!(supplier.payment_history.len(), 3);
        assert_eq!(supplier.payment_history[0].amount, 18_000);
        assert!(supplier.payment_history[0].on_time);
        assert_eq!(supplier.payment_history[0].date, session.today);
        assert_eq!(session.cash, 182_000);
    }

    #[test]
    fn early_payment_lifts_bad_to_tense_only() {
        let mut session = Session::default();
        let outcome = pay_supplier(&mut session, "3").unwrap();
        assert_eq!(outcome, SupplierPayment::PaidEarly);
        assert_eq!(session.suppliers[2].relationship, VendorStatus::Tense);
    }

    #[test]
    fn on_time_payment_keeps_relationship() {
        let mut session = Session::default();
        session.suppliers[2].due_date = session.today;
        let outcome = pay_supplier(&mut session, "3").unwrap();
        assert_eq!(outcome, SupplierPayment::PaidOnTime);
        let supplier = &session.suppliers[2];
        assert_eq!(supplier.relationship, VendorStatus::Bad);
        assert_eq!(supplier.due_amount, 0);
        assert_eq!(supplier.payment_history.len(), 3);
    }

    #[test]
    fn late_payment_charges_but_settles_nothing() {
        let mut session = Session::default();
        session.suppliers[2].due_date = ymd(2023, 8, 1);
        let outcome = pay_supplier(&mut session, "3").unwrap();
        assert_eq!(outcome, SupplierPayment::PaidLate);
        let supplier = &session.suppliers[2];
        assert_eq!(supplier.due_amount, 12_000);
        assert_eq!(supplier.payment_history.len(), 2);
        assert_eq!(session.cash, 188_000);
    }

    #[test]
    fn settled_invoice_cannot_be_paid_again() {
        let mut session = Session::default();
        pay_supplier(&mut session, "1").unwrap();
        assert_eq!(
            pay_supplier(&mut session, "1"),
            Err(GameError::NothingDue("1".to_string()))
        );
    }

    #[test]
    fn bankrupting_payment_skips_supplier_bookkeeping() {
        let mut session = Session::default();
        session.cash = 10_000;
        let outcome = pay_supplier(&mut session, "2").unwrap();
        assert_eq!(outcome, SupplierPayment::Bankrupt);
        assert!(session.is_game_over);
        assert_eq!(session.suppliers[1].due_amount, 18_000);
        assert_eq!(session.suppliers[1].payment_history.len(), 2);
    }

    #[test]
    fn extension_needs_a_good_relationship() {
        let mut session = Session::default();
        let due_before = session.suppliers[0].due_date;
        assert_eq!(
            negotiate_terms(&mut session, "1", NegotiationOption::Extension),
            Ok(TermsOutcome::Accepted)
        );
        assert_eq!(
            session.suppliers[0].due_date,
            due_before + Duration::days(30)
        );
        assert_eq!(session.xp, 25);

        assert_eq!(
            negotiate_terms(&mut session, "2", NegotiationOption::Extension),
            Ok(TermsOutcome::Refused)
        );
        assert_eq!(session.xp, 25 - 10 - 25);
        assert_eq!(session.bad_decisions, 1);
    }

    #[test]
    fn discount_takes_ten_percent_off() {
        let mut session = Session::default();
        assert_eq!(
            negotiate_terms(&mut session, "1", NegotiationOption::Discount),
            Ok(TermsOutcome::Accepted)
        );
        assert_eq!(session.suppliers[0].due_amount, 22_500);
        assert_eq!(session.xp, 40);
    }

    #[test]
    fn installment_only_refused_when_relationship_is_bad() {
        let mut session = Session::default();
        assert_eq!(
            negotiate_terms(&mut session, "2", NegotiationOption::Installment),
            Ok(TermsOutcome::Accepted)
        );
        assert_eq!(session.suppliers[1].due_amount, 6_000);

        assert_eq!(
            negotiate_terms(&mut session, "3", NegotiationOption::Installment),
            Ok(TermsOutcome::Refused)
        );
        assert_eq!(session.suppliers[2].due_amount, 12_000);
        assert_eq!(session.bad_decisions, 1);
    }

    #[test]
    fn negotiating_a_settled_invoice_is_rejected() {
        let mut session = Session::default();
        pay_supplier(&mut session, "1").unwrap();
        assert_eq!(
            negotiate_terms(&mut session, "1", NegotiationOption::Discount),
            Err(GameError::NothingDue("1".to_string()))
        );
    }

    #[test]
    fn unknown_supplier_is_rejected() {
        let mut session = Session::default();
        assert_eq!(
            pay_supplier(&mut session, "9"),
            Err(GameError::UnknownSupplier("9".to_string()))
        );
        assert_eq!(
            negotiate_terms(&mut session, "9", NegotiationOption::Discount),
            Err(GameError::UnknownSupplier("9".to_string()))
        );
    }
}
