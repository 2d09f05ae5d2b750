// Exhaustive checks of the withdrawal request lifecycle.
//
// Only four transitions exist:
//   pending -> approved, pending -> rejected,
//   approved -> processing, processing -> completed.
// Everything else, including self-transitions and anything out of a terminal
// state, must be refused.

use rust_decimal_macros::dec;

use valecashback::modules::balances::BalanceKind;
use valecashback::modules::withdrawals::models::WithdrawalStatus::{self, *};
use valecashback::modules::withdrawals::models::WithdrawalRequest;

const ALL: [WithdrawalStatus; 5] = [Pending, Approved, Rejected, Processing, Completed];
const ALLOWED: [(WithdrawalStatus, WithdrawalStatus); 4] = [
    (Pending, Approved),
    (Pending, Rejected),
    (Approved, Processing),
    (Processing, Completed),
];

#[test]
fn exactly_four_transitions_are_permitted() {
    let mut permitted = Vec::new();
    for from in ALL {
        for to in ALL {
            if from.can_transition_to(to) {
                permitted.push((from, to));
            }
        }
    }
    assert_eq!(permitted, ALLOWED.to_vec());
}

#[test]
fn terminal_states_allow_nothing() {
    for terminal in [Rejected, Completed] {
        assert!(terminal.is_terminal());
        for to in ALL {
            assert!(
                !terminal.can_transition_to(to),
                "{} must not leave terminal state for {}",
                terminal,
                to
            );
        }
    }
}

#[test]
fn completed_cannot_reopen() {
    assert!(!Completed.can_transition_to(Pending));
    assert!(!Rejected.can_transition_to(Pending));
}

#[test]
fn self_transitions_are_refused() {
    for status in ALL {
        assert!(!status.can_transition_to(status));
    }
}

#[test]
fn happy_path_reaches_completed() {
    let mut status = Pending;
    for next in [Approved, Processing, Completed] {
        assert!(status.can_transition_to(next));
        status = next;
    }
    assert!(status.is_terminal());
}

#[test]
fn new_request_reserves_full_amount_and_records_fee() {
    let request = WithdrawalRequest::new(
        "merchant-7".to_string(),
        BalanceKind::Payable,
        dec!(250.00),
        dec!(2.50),
    )
    .unwrap();

    assert_eq!(request.status, Pending);
    assert_eq!(request.amount, dec!(250.00));
    assert_eq!(request.fee, dec!(2.50));
    assert_eq!(request.payout_amount(), dec!(247.50));
}
