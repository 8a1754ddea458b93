use crate::event::{Amount, Event, Timestamp};
use crate::history::UserHistory;
use bigdecimal::Zero;
use serde::{Serialize, Serializer};

pub const LARGE_WITHDRAWAL_LIMIT: i64 = 100;
pub const CONSECUTIVE_WITHDRAWALS: usize = 3;
pub const INCREASING_DEPOSITS: usize = 3;
pub const VELOCITY_WINDOW: Timestamp = 30;
pub const VELOCITY_LIMIT: i64 = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AlertCode {
    LargeWithdrawal,
    ConsecutiveWithdrawals,
    IncreasingDeposits,
    DepositVelocity,
}

impl AlertCode {
    pub const fn code(self) -> u16 {
        match self {
            AlertCode::LargeWithdrawal => 1100,
            AlertCode::ConsecutiveWithdrawals => 30,
            AlertCode::IncreasingDeposits => 300,
            AlertCode::DepositVelocity => 123,
        }
    }
}

impl Serialize for AlertCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.code())
    }
}

type Rule = fn(&Event, &UserHistory) -> bool;

/// Evaluation order, which is also the order codes are reported in.
const RULES: [(AlertCode, Rule); 4] = [
    (AlertCode::LargeWithdrawal, large_withdrawal),
    (AlertCode::ConsecutiveWithdrawals, consecutive_withdrawals),
    (AlertCode::IncreasingDeposits, increasing_deposits),
    (AlertCode::DepositVelocity, deposit_velocity),
];

/// Alert codes for the last event of `history`, which must already contain it.
pub fn evaluate(history: &UserHistory) -> Vec<AlertCode> {
    let Some(current) = history.last() else {
        return vec![];
    };
    RULES
        .iter()
        .filter(|(_, rule)| rule(current, history))
        .map(|(code, _)| *code)
        .collect()
}

fn large_withdrawal(current: &Event, _history: &UserHistory) -> bool {
    current.is_withdraw() && current.amount > Amount::from(LARGE_WITHDRAWAL_LIMIT)
}

fn consecutive_withdrawals(_current: &Event, history: &UserHistory) -> bool {
    let recent = history.last_n(CONSECUTIVE_WITHDRAWALS);
    recent.len() == CONSECUTIVE_WITHDRAWALS && recent.iter().all(Event::is_withdraw)
}

fn increasing_deposits(_current: &Event, history: &UserHistory) -> bool {
    let deposits: Vec<&Event> = history.recent_window(Event::is_deposit).collect();
    let tail = &deposits[deposits.len().saturating_sub(INCREASING_DEPOSITS)..];
    tail.len() == INCREASING_DEPOSITS && tail.windows(2).all(|pair| pair[1].amount > pair[0].amount)
}

// Timestamps only increase, so the window needs no lower bound on `current`.
fn deposit_velocity(current: &Event, history: &UserHistory) -> bool {
    let total = history
        .recent_window(|event| {
            event.is_deposit() && current.timestamp.saturating_sub(event.timestamp) <= VELOCITY_WINDOW
        })
        .fold(Amount::zero(), |sum, event| sum + &event.amount);
    total > Amount::from(VELOCITY_LIMIT)
}

#[cfg(test)]
mod test {
    use super::{evaluate, AlertCode};
    use crate::event::{amount, Event, EventKind, EventKind::Deposit, EventKind::Withdraw};
    use crate::history::UserHistory;

    fn history(events: &[(EventKind, &str, i128)]) -> UserHistory {
        let mut history = UserHistory::new();
        for (kind, value, timestamp) in events {
            history.append(Event {
                kind: *kind,
                amount: amount(value),
                user_id: 1,
                timestamp: *timestamp,
            });
        }
        history
    }

    #[test]
    fn empty_history_raises_nothing() {
        assert!(evaluate(&UserHistory::new()).is_empty());
    }

    #[test]
    fn large_withdrawal_is_strictly_over_limit() {
        assert_eq!(
            evaluate(&history(&[(Withdraw, "150.00", 20)])),
            vec![AlertCode::LargeWithdrawal]
        );
        assert!(evaluate(&history(&[(Withdraw, "100.00", 20)])).is_empty());
        assert!(evaluate(&history(&[(Deposit, "150.00", 20)])).is_empty());
    }

    #[test]
    fn three_withdrawals_in_a_row() {
        let h = history(&[
            (Withdraw, "50", 5),
            (Withdraw, "30", 10),
            (Withdraw, "70", 15),
        ]);
        assert_eq!(evaluate(&h), vec![AlertCode::ConsecutiveWithdrawals]);
    }

    #[test]
    fn interleaved_deposit_breaks_withdrawal_run() {
        let h = history(&[
            (Withdraw, "50", 5),
            (Deposit, "1", 6),
            (Withdraw, "30", 10),
            (Withdraw, "70", 15),
        ]);
        assert!(!evaluate(&h).contains(&AlertCode::ConsecutiveWithdrawals));
    }

    #[test]
    fn increasing_deposits_ignore_withdrawals() {
        let h = history(&[
            (Deposit, "50", 10),
            (Withdraw, "5", 15),
            (Deposit, "60", 100),
            (Deposit, "70", 200),
        ]);
        assert_eq!(evaluate(&h), vec![AlertCode::IncreasingDeposits]);
    }

    #[test]
    fn increasing_deposits_compare_numerically() {
        let h = history(&[
            (Deposit, "8", 10),
            (Deposit, "9", 100),
            (Deposit, "10", 200),
        ]);
        assert_eq!(evaluate(&h), vec![AlertCode::IncreasingDeposits]);
        let flat = history(&[
            (Deposit, "50", 10),
            (Deposit, "60", 100),
            (Deposit, "60.00", 200),
        ]);
        assert!(evaluate(&flat).is_empty());
    }

    #[test]
    fn velocity_window_is_inclusive() {
        let h = history(&[
            (Deposit, "100", 10),
            (Deposit, "120", 25),
            (Deposit, "100", 40),
        ]);
        assert_eq!(evaluate(&h), vec![AlertCode::DepositVelocity]);
    }

    #[test]
    fn velocity_excludes_old_deposits_and_withdrawals() {
        let spread = history(&[(Deposit, "100", 10), (Deposit, "120", 45)]);
        assert!(evaluate(&spread).is_empty());
        let mixed = history(&[
            (Withdraw, "90", 10),
            (Deposit, "100", 20),
            (Deposit, "100", 30),
        ]);
        assert!(evaluate(&mixed).is_empty());
    }

    #[test]
    fn codes_follow_evaluation_order() {
        let h = history(&[
            (Deposit, "150", 1),
            (Withdraw, "10", 2),
            (Withdraw, "20", 3),
            (Withdraw, "500", 4),
        ]);
        assert_eq!(
            evaluate(&h),
            vec![AlertCode::LargeWithdrawal, AlertCode::ConsecutiveWithdrawals]
        );
        let all_deposit_rules = history(&[
            (Deposit, "50", 1),
            (Deposit, "60", 2),
            (Deposit, "110", 3),
        ]);
        let codes: Vec<u16> = evaluate(&all_deposit_rules).iter().map(|c| c.code()).collect();
        assert_eq!(codes, vec![300, 123]);
    }

    #[test]
    fn amounts_beyond_fixed_precision_still_compare() {
        assert_eq!(
            evaluate(&history(&[(Withdraw, "1e30", 1)])),
            vec![AlertCode::LargeWithdrawal]
        );
        let h = history(&[
            (Deposit, "1e30", 10),
            (Deposit, "2e30", 100),
            (Deposit, "3e30", 200),
        ]);
        assert_eq!(evaluate(&h), vec![AlertCode::IncreasingDeposits, AlertCode::DepositVelocity]);
        let flat = history(&[
            (Deposit, "1e30", 10),
            (Deposit, "2e30", 100),
            (Deposit, "2000000000000000000000000000000", 200),
        ]);
        assert_eq!(evaluate(&flat), vec![AlertCode::DepositVelocity]);
    }
}
