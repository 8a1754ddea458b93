use bigdecimal::BigDecimal;

/// Wide enough for any JSON integer from `i64::MIN` to `u64::MAX`.
pub type UserId = i128;
pub type Timestamp = i128;
/// Exact and unbounded, so very large amounts still compare correctly.
pub type Amount = BigDecimal;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    Deposit,
    Withdraw,
}

impl EventKind {
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "deposit" => Some(EventKind::Deposit),
            "withdraw" => Some(EventKind::Withdraw),
            _ => None,
        }
    }
}

/// One accepted deposit or withdrawal.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub kind: EventKind,
    pub amount: Amount,
    pub user_id: UserId,
    pub timestamp: Timestamp,
}

impl Event {
    pub fn is_deposit(&self) -> bool {
        self.kind == EventKind::Deposit
    }

    pub fn is_withdraw(&self) -> bool {
        self.kind == EventKind::Withdraw
    }
}

#[cfg(test)]
pub(crate) fn amount(text: &str) -> Amount {
    text.parse().unwrap()
}
