use cashflow_game::{
    BadgeId, Command, CommandQueue, GameOverCause, GamePhase, PlayerIdentity, PriorityOutcome,
    ProcessOutcome, Session, SessionConfig, SettlementStatus, TickOutcome, TransactionOutcome,
    format_mmss, negotiate_terms, pay_all_bills, pay_bill, pay_supplier, process_payment,
    set_priority,
};
use cashflow_game::{BillPayment, BulkPayment, NegotiationOption, Priority, TermsOutcome};

fn signed_in(session: &mut Session) {
    session.identity = Some(PlayerIdentity {
        uid: "u1".to_string(),
        display_name: "Asha".to_string(),
        photo_url: None,
    });
}

#[test]
fn collecting_receivables_snowballs_cash_and_badges() {
    let mut session = Session::default();

    let first = process_payment(&mut session, "1").unwrap();
    assert_eq!(first, ProcessOutcome::Collected { amount: 20_000 });
    // crossing the cash milestone unlocks the saver badge on the spot:
    // 25 badge + 50 milestone + 5 positive flow + 10 processing
    assert_eq!(session.cash, 220_000);
    assert_eq!(session.xp, 90);
    assert!(session.badge_unlocked(BadgeId::Saver));

    let second = process_payment(&mut session, "2").unwrap();
    assert_eq!(second, ProcessOutcome::Collected { amount: 30_000 });
    assert_eq!(session.cash, 250_000);
    assert_eq!(session.xp, 105);

    assert_eq!(session.payments.len(), 4);
    assert_eq!(session.total_receivables(), 0);
}

#[test]
fn priorities_are_judged_on_every_assignment() {
    let mut session = Session::default();

    let right = set_priority(&mut session, "3", Priority::High).unwrap();
    assert_eq!(right, PriorityOutcome::Correct);
    let wrong = set_priority(&mut session, "3", Priority::Low).unwrap();
    assert_eq!(wrong, PriorityOutcome::Incorrect);
    let right_again = set_priority(&mut session, "2", Priority::Low).unwrap();
    assert_eq!(right_again, PriorityOutcome::Correct);

    assert_eq!(session.correct_priorities, 2);
    assert_eq!(session.bad_decisions, 1);
    assert_eq!(session.xp, 30 - 25 + 30);

    // the wrong tag stays on the payment even though it was penalized
    let supplier_invoice = session.payments.iter().find(|p| p.id == "3").unwrap();
    assert_eq!(supplier_invoice.priority, Priority::Low);
}

#[test]
fn bankruptcy_clamps_cash_and_freezes_the_session() {
    let mut session = Session::default();
    session.start_timer();

    assert_eq!(
        session.apply_transaction(-250_000),
        TransactionOutcome::Bankrupt
    );
    assert_eq!(session.cash, 0);
    assert_eq!(session.xp, -50);
    assert!(session.is_game_over);
    assert_eq!(session.game_over_cause, Some(GameOverCause::Bankruptcy));
    assert_eq!(session.phase, GamePhase::Summary);
    assert!(!session.timer.running);

    let notice = session.xp_notice().expect("penalty notice");
    assert_eq!(notice.amount, -50);
    assert_eq!(notice.reason, "Game over: Insufficient funds");

    // every mutation is ignored from here on
    assert_eq!(
        process_payment(&mut session, "1").unwrap(),
        ProcessOutcome::Ignored
    );
    assert_eq!(
        session.apply_transaction(10_000),
        TransactionOutcome::Ignored
    );
    session.set_phase(GamePhase::Dashboard);
    assert_eq!(session.phase, GamePhase::Summary);
    assert_eq!(session.cash, 0);
}

#[test]
fn the_countdown_expires_exactly_once() {
    let mut session = Session::new(SessionConfig {
        timer_seconds: 3,
        ..SessionConfig::default()
    });
    session.start_timer();

    assert_eq!(session.tick_second(), TickOutcome::Counting { remaining: 2 });
    assert_eq!(session.tick_second(), TickOutcome::Counting { remaining: 1 });
    assert_eq!(session.tick_second(), TickOutcome::Expired);
    assert_eq!(session.tick_second(), TickOutcome::Idle);

    assert!(session.is_game_over);
    assert_eq!(session.game_over_cause, Some(GameOverCause::TimerExpired));
    assert_eq!(session.phase, GamePhase::Summary);
    assert_eq!(format_mmss(session.timer.remaining), "0:00");

    // the untouched balance still clears the reserve, so the wrap-up bonus lands
    assert_eq!(session.xp, 50);
    assert_eq!(
        session.xp_notice().map(|n| n.reason.as_str()),
        Some("Bonus: Maintained ₹50,000 reserve")
    );
}

#[test]
fn queued_commands_settle_the_vendor_plan_and_close_the_run() {
    let mut session = Session::default();
    let mut queue = CommandQueue::new();
    queue.push(Command::StagePlanAmount {
        vendor_id: "v1".to_string(),
        amount: 110_000,
    });
    queue.push(Command::StagePlanAmount {
        vendor_id: "v2".to_string(),
        amount: 45_000,
    });
    queue.push(Command::SubmitPaymentPlan);
    queue.push(Command::FinishReview);

    let rejected = queue.drain_into(&mut session);
    assert!(rejected.is_empty());

    assert_eq!(session.cash, 45_000);
    // full settlement pays 20, the half settlement scales to 15
    assert_eq!(session.xp, 35);
    assert_eq!(session.phase, GamePhase::GameOver);
    assert!(session.plan.is_empty());

    let v1 = session.vendors.iter().find(|v| v.id == "v1").unwrap();
    assert_eq!(v1.status, SettlementStatus::PaidFull);
    let v2 = session.vendors.iter().find(|v| v.id == "v2").unwrap();
    assert_eq!(v2.status, SettlementStatus::PaidPartial);
    assert_eq!(session.pending_vendor_total(), 120_000);
}

#[test]
fn supplier_relationships_move_with_payment_timing() {
    let mut session = Session::default();

    // 2023-08-20 is well before Beta's September due date
    let early = pay_supplier(&mut session, "2").unwrap();
    assert_eq!(early, cashflow_game::SupplierPayment::PaidEarly);
    assert_eq!(session.cash, 182_000);
    let beta = session.suppliers.iter().find(|s| s.id == "2").unwrap();
    assert_eq!(beta.relationship, cashflow_game::VendorStatus::Good);
    assert_eq!(beta.due_amount, 0);
    assert!(beta.payment_history[0].on_time);

    let extended = negotiate_terms(&mut session, "1", NegotiationOption::Extension).unwrap();
    assert_eq!(extended, TermsOutcome::Accepted);
    let alpha = session.suppliers.iter().find(|s| s.id == "1").unwrap();
    assert_eq!(alpha.due_date.to_string(), "2023-10-15");

    let refused = negotiate_terms(&mut session, "3", NegotiationOption::Installment).unwrap();
    assert_eq!(refused, TermsOutcome::Refused);
    let gamma = session.suppliers.iter().find(|s| s.id == "3").unwrap();
    assert_eq!(gamma.due_amount, 12_000);
    assert_eq!(session.bad_decisions, 1);
}

#[test]
fn the_reserve_guard_blocks_draining_bill_payments() {
    let mut session = Session::default();
    session.apply_transaction(-149_900);
    assert_eq!(session.cash, 50_100);
    let xp_before = session.xp;

    let blocked = pay_bill(&mut session, "1").unwrap();
    assert_eq!(blocked, BillPayment::ReserveBlocked);
    assert_eq!(session.cash, 50_100);
    // -25 reserve warning and -25 for the bad decision
    assert_eq!(session.xp, xp_before - 50);
    assert_eq!(session.bad_decisions, 1);
    assert!(!session.bills.iter().find(|b| b.id == "1").unwrap().paid);
}

#[test]
fn paying_every_bill_at_once_earns_the_bonus() {
    let mut session = Session::default();

    let outcome = pay_all_bills(&mut session).unwrap();
    assert_eq!(
        outcome,
        BulkPayment::Paid {
            count: 4,
            bonus: true
        }
    );
    assert_eq!(session.cash, 199_690);
    assert_eq!(session.unpaid_bills_total(), 0);
    // 75 from crossing the milestone on the first transaction, 30 for the sweep
    assert_eq!(session.xp, 105);

    assert_eq!(
        pay_all_bills(&mut session).unwrap(),
        BulkPayment::NothingUnpaid
    );
}

#[test]
fn reset_rearms_a_finished_run() {
    let mut session = Session::default();
    signed_in(&mut session);
    process_payment(&mut session, "1").unwrap();
    session.apply_transaction(-500_000);
    assert!(session.is_game_over);

    session.reset();

    assert_eq!(session.cash, 200_000);
    assert_eq!(session.xp, 0);
    assert!(!session.is_game_over);
    assert_eq!(session.game_over_cause, None);
    assert_eq!(session.phase, GamePhase::Dashboard);
    assert!(!session.badge_unlocked(BadgeId::Saver));
    assert_eq!(session.payments.len(), 6);
    assert!(session.xp_notice().is_none());
    // signed-in players go straight back on the clock
    assert!(session.timer.running);
    assert!(session.identity.is_some());
}
