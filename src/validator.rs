//! Structural and sequencing checks for incoming events.
//!
//! Checks run in a fixed order and stop at the first failure, which decides the
//! single error reported when several fields are wrong at once:
//!
//! 1. presence of `type`, `amount`, `user_id`, `time` (in that order)
//! 2. `type` is `"deposit"` or `"withdraw"`
//! 3. `amount` parses as a number, then is not negative
//! 4. `user_id` is a JSON integer
//! 5. `time` is a JSON integer
//! 6. `time` is strictly greater than the user's last accepted event
//!
//! Checks 1-5 only look at the payload ([`validate_fields`]); check 6 needs the
//! user's history ([`check_sequence`]).

use crate::errors::ValidationError;
use crate::event::{Amount, Event, EventKind};
use crate::history::UserHistory;
use bigdecimal::Zero;
use serde_json::{Map, Value};
use std::str::FromStr;

pub const REQUIRED_FIELDS: [&str; 4] = ["type", "amount", "user_id", "time"];

pub fn validate(raw: &Value, history: &UserHistory) -> Result<Event, ValidationError> {
    let event = validate_fields(raw)?;
    check_sequence(&event, history)?;
    Ok(event)
}

/// Runs checks 1-5. A payload that is not a JSON object counts as empty.
pub fn validate_fields(raw: &Value) -> Result<Event, ValidationError> {
    let empty = Map::new();
    let fields = raw.as_object().unwrap_or(&empty);
    if let Some(missing) = REQUIRED_FIELDS
        .into_iter()
        .find(|field| !fields.contains_key(*field))
    {
        return Err(ValidationError::MissingField(missing));
    }
    // Field initializers evaluate top to bottom, so this is also the check order.
    Ok(Event {
        kind: parse_kind(&fields["type"])?,
        amount: parse_amount(&fields["amount"])?,
        user_id: parse_integer(&fields["user_id"]).ok_or(ValidationError::InvalidUserId)?,
        timestamp: parse_integer(&fields["time"]).ok_or(ValidationError::InvalidTimestamp)?,
    })
}

pub fn check_sequence(event: &Event, history: &UserHistory) -> Result<(), ValidationError> {
    match history.last() {
        Some(last) if event.timestamp <= last.timestamp => Err(ValidationError::NonSequentialTime),
        _ => Ok(()),
    }
}

fn parse_kind(value: &Value) -> Result<EventKind, ValidationError> {
    value
        .as_str()
        .and_then(EventKind::from_wire)
        .ok_or(ValidationError::InvalidKind)
}

fn parse_amount(value: &Value) -> Result<Amount, ValidationError> {
    let amount = match value {
        Value::String(text) => parse_decimal(text.trim()),
        Value::Number(number) => parse_decimal(&number.to_string()),
        _ => None,
    }
    .ok_or(ValidationError::InvalidAmountFormat)?;
    if amount < Amount::zero() {
        return Err(ValidationError::NegativeAmount);
    }
    Ok(amount)
}

/// Plain or scientific notation, with no bound on magnitude.
fn parse_decimal(text: &str) -> Option<Amount> {
    Amount::from_str(text).ok()
}

/// Only JSON integers qualify; `"7"`, `7.0` and `true` do not. The accepted
/// range is `i64::MIN..=u64::MAX`; integers outside it are rejected.
pub fn parse_integer(value: &Value) -> Option<i128> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .map(i128::from)
            .or_else(|| number.as_u64().map(i128::from)),
        _ => None,
    }
}
