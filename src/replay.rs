use crate::engine::EventEngine;
use crate::errors::{EngineError, ReplayError};
use crate::event::UserId;
use crate::validator;
use serde_json::Value;
use std::io::{Read, Write};

#[derive(Debug, serde::Serialize)]
pub struct Output {
    record: usize,
    user_id: Option<UserId>,
    alert: bool,
    alert_codes: String,
    error: String,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
    pub rejected: usize,
    pub alerted: usize,
}

/// Submits every JSON value in `input` in order and writes one CSV row per value.
pub async fn replay<R: Read, W: Write>(
    engine: &EventEngine,
    input: R,
    output: W,
) -> Result<ReplaySummary, ReplayError> {
    let mut writer = csv::Writer::from_writer(output);
    let mut summary = ReplaySummary::default();
    let stream = serde_json::Deserializer::from_reader(input).into_iter::<Value>();
    for (index, entry) in stream.enumerate() {
        let record = index + 1;
        let payload = entry.map_err(|source| ReplayError::Json { record, source })?;
        summary.events += 1;
        let row = match engine.submit(&payload).await {
            Ok(result) => {
                if result.alerted {
                    summary.alerted += 1;
                }
                Output {
                    record,
                    user_id: Some(result.user_id),
                    alert: result.alerted,
                    alert_codes: join_codes(&result.codes()),
                    error: String::new(),
                }
            }
            Err(EngineError::Validation(e)) => {
                summary.rejected += 1;
                Output {
                    record,
                    user_id: payload.get("user_id").and_then(validator::parse_integer),
                    alert: false,
                    alert_codes: String::new(),
                    error: e.to_string(),
                }
            }
            Err(e) => return Err(e.into()),
        };
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(summary)
}

fn join_codes(codes: &[u16]) -> String {
    codes
        .iter()
        .map(|code| code.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
