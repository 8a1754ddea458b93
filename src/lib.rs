//! Per-user event monitoring: validates deposit and withdrawal events, keeps an
//! append-only history per user and raises alert codes when suspicious patterns
//! show up.
//!
//! - [`validator`] - structural and sequencing checks
//! - [`history`] - per-user event history
//! - [`rules`] - alert rules and codes
//! - [`engine`] - routes events to one monitor task per user
//! - [`server`] / [`replay`] - HTTP and batch front ends

pub mod config;
pub mod engine;
pub mod errors;
pub mod event;
pub mod history;
pub mod monitor;
pub mod replay;
pub mod rules;
pub mod server;
pub mod validator;

pub use engine::{EvaluationResult, EventEngine};
pub use errors::{EngineError, ValidationError};
pub use event::{Amount, Event, EventKind, Timestamp, UserId};
pub use history::UserHistory;
pub use rules::AlertCode;
