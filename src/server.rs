use crate::config::MonitorConfig;
use crate::engine::EventEngine;
use crate::errors::EngineError;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, warn};

pub fn router(engine: Arc<EventEngine>) -> Router {
    Router::new()
        .route("/", get(|| async { "ok" }))
        .route("/event", post(submit_event))
        .with_state(engine)
}

pub async fn serve(config: &MonitorConfig, engine: Arc<EventEngine>) -> anyhow::Result<()> {
    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(%address, "event monitor listening");
    axum::serve(listener, router(engine)).await?;
    Ok(())
}

async fn submit_event(State(engine): State<Arc<EventEngine>>, body: Bytes) -> Response {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "rejected unparsable payload");
            return error_response(StatusCode::BAD_REQUEST, "Invalid JSON payload.");
        }
    };
    match engine.submit(&payload).await {
        Ok(result) => {
            if result.alerted {
                info!(user_id = result.user_id, codes = ?result.codes(), "alert raised");
            }
            (StatusCode::OK, Json(result)).into_response()
        }
        Err(EngineError::Validation(e)) => {
            warn!(error = %e, "rejected event");
            error_response(StatusCode::BAD_REQUEST, &e.to_string())
        }
        Err(e) => {
            error!(error = %e, "event submission failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
