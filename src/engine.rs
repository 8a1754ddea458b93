use crate::errors::EngineError;
use crate::event::UserId;
use crate::history::UserHistory;
use crate::monitor::{Command, UserMonitor};
use crate::rules::AlertCode;
use crate::validator;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};
use tokio::sync::{oneshot, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Routes events to one [`UserMonitor`] task per user. Users are independent:
/// the routing map is only write-locked the first time a user is seen.
pub struct EventEngine {
    monitors: RwLock<BTreeMap<UserId, UnboundedSender<Command>>>,
    handles: Mutex<Vec<JoinHandle<UserMonitor>>>,
}

impl EventEngine {
    pub fn new() -> Self {
        EventEngine {
            monitors: Default::default(),
            handles: Default::default(),
        }
    }

    pub async fn submit(&self, raw: &Value) -> Result<EvaluationResult, EngineError> {
        let event = validator::validate_fields(raw)?;
        let user_id = event.user_id;
        let sender = self.monitor_for(user_id).await;
        let (reply, response) = oneshot::channel();
        sender
            .send(Command::Submit { event, reply })
            .map_err(|_| EngineError::MonitorUnavailable(user_id))?;
        let outcome = response
            .await
            .map_err(|_| EngineError::MonitorUnavailable(user_id))?;
        Ok(outcome?)
    }

    /// Copy of a user's accepted events, or `None` if the user was never seen.
    pub async fn history(&self, user_id: UserId) -> Result<Option<UserHistory>, EngineError> {
        let Some(sender) = self.monitors.read().await.get(&user_id).cloned() else {
            return Ok(None);
        };
        let (reply, response) = oneshot::channel();
        sender
            .send(Command::Snapshot { reply })
            .map_err(|_| EngineError::MonitorUnavailable(user_id))?;
        response
            .await
            .map(Some)
            .map_err(|_| EngineError::MonitorUnavailable(user_id))
    }

    /// Closes every user channel and waits for the monitors to drain.
    pub async fn shutdown(self) -> BTreeMap<UserId, UserHistory> {
        drop(self.monitors);
        let mut result = BTreeMap::default();
        for handle in self.handles.into_inner() {
            match handle.await {
                Ok(monitor) => {
                    result.insert(monitor.id, monitor.history);
                }
                Err(e) => {
                    error!(error = %e, "user monitor task failed");
                }
            }
        }
        result
    }

    async fn monitor_for(&self, user_id: UserId) -> UnboundedSender<Command> {
        if let Some(sender) = self.monitors.read().await.get(&user_id) {
            return sender.clone();
        }
        let mut monitors = self.monitors.write().await;
        if let Some(sender) = monitors.get(&user_id) {
            return sender.clone();
        }
        let (sender, receiver) = unbounded_channel();
        let monitor = UserMonitor::new(user_id, receiver);
        let handle = tokio::spawn(async move { monitor.process_commands().await });
        self.handles.lock().await.push(handle);
        monitors.insert(user_id, sender.clone());
        debug!(user_id, "spawned user monitor");
        sender
    }
}

impl Default for EventEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EvaluationResult {
    #[serde(rename = "alert")]
    pub alerted: bool,
    pub alert_codes: Vec<AlertCode>,
    pub user_id: UserId,
}

impl EvaluationResult {
    pub fn new(user_id: UserId, alert_codes: Vec<AlertCode>) -> Self {
        EvaluationResult {
            alerted: !alert_codes.is_empty(),
            alert_codes,
            user_id,
        }
    }

    pub fn codes(&self) -> Vec<u16> {
        self.alert_codes.iter().map(|code| code.code()).collect()
    }
}
