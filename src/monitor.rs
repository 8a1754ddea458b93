use crate::engine::EvaluationResult;
use crate::errors::ValidationError;
use crate::event::{Event, UserId};
use crate::history::UserHistory;
use crate::{rules, validator};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::oneshot;
use tracing::debug;

pub enum Command {
    Submit {
        event: Event,
        reply: oneshot::Sender<Result<EvaluationResult, ValidationError>>,
    },
    Snapshot {
        reply: oneshot::Sender<UserHistory>,
    },
}

/// Single writer for one user's history. Commands are handled one at a time,
/// so a submission never interleaves with another for the same user.
pub struct UserMonitor {
    pub id: UserId,
    pub history: UserHistory,
    pub incoming: UnboundedReceiver<Command>,
}

impl UserMonitor {
    pub fn new(id: UserId, incoming: UnboundedReceiver<Command>) -> Self {
        UserMonitor {
            id,
            history: UserHistory::new(),
            incoming,
        }
    }

    pub async fn process_commands(mut self) -> Self {
        while let Some(command) = self.incoming.recv().await {
            self.handle_command(command);
        }
        self
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Submit { event, reply } => {
                let outcome = apply(&mut self.history, event);
                // The event stays applied even if the caller went away.
                if reply.send(outcome).is_err() {
                    debug!(user_id = self.id, "submitter dropped before reply");
                }
            }
            Command::Snapshot { reply } => {
                if reply.send(self.history.clone()).is_err() {
                    debug!(user_id = self.id, "snapshot requester dropped before reply");
                }
            }
        }
    }
}

/// Sequence check, append and rule evaluation as one step. Leaves `history`
/// untouched when the event is rejected.
pub fn apply(history: &mut UserHistory, event: Event) -> Result<EvaluationResult, ValidationError> {
    validator::check_sequence(&event, history)?;
    let user_id = event.user_id;
    let timestamp = event.timestamp;
    history.append(event);
    let alert_codes = rules::evaluate(history);
    debug!(user_id, timestamp, len = history.len(), "event accepted");
    Ok(EvaluationResult::new(user_id, alert_codes))
}
