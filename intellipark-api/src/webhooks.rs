use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

use crate::state::AppState;
use intellipark_core::payment::GatewayEvent;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/xendit-webhook", post(handle_xendit_webhook))
}

/// POST /api/xendit-webhook
/// Receive invoice status updates from Xendit
///
/// Recognized-but-irrelevant events are acknowledged with 200 so the
/// gateway stops resending them; only unexpected faults return 500 and
/// lean on the gateway's retry policy.
async fn handle_xendit_webhook(
    State(state): State<AppState>,
    Json(event): Json<GatewayEvent>,
) -> Result<StatusCode, StatusCode> {
    tracing::info!(external_id = %event.external_id, status = ?event.status, "webhook received");

    match state.engine.handle_payment_event(event).await {
        Ok(()) => Ok(StatusCode::OK),
        Err(err) => {
            tracing::error!("webhook processing failed: {err}");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
