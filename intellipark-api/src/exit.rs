use axum::{extract::State, routing::post, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;
use intellipark_core::booking::ExitRequest;
use intellipark_core::reservation::Reservation;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitResponse {
    pub success: bool,
    pub message: String,
    pub exit_time: DateTime<Utc>,
    pub duration: String,
    pub slot: String,
    pub plate: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyExitRequest {
    #[serde(default)]
    pub plate: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VerifyExitResponse {
    pub success: bool,
    pub slot: String,
    pub reservation: Reservation,
    pub message: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/exit", post(exit))
        .route("/api/verify-exit", post(verify_exit))
}

/// POST /api/exit
/// Free a slot when a vehicle leaves, optionally gated by a scanned ticket
async fn exit(
    State(state): State<AppState>,
    Json(request): Json<ExitRequest>,
) -> Result<Json<ExitResponse>, AppError> {
    tracing::info!(slot = ?request.slot, plate = ?request.plate, ticket = ?request.ticket_id, "exit request");

    let receipt = state.engine.exit(request).await?;

    Ok(Json(ExitResponse {
        success: true,
        message: "Gate opened".to_string(),
        exit_time: receipt.exit_time,
        duration: receipt.duration,
        slot: receipt.slot,
        plate: receipt.plate,
    }))
}

/// POST /api/verify-exit
/// Find the Paid reservation matching a plate, for the exit kiosk
async fn verify_exit(
    State(state): State<AppState>,
    Json(request): Json<VerifyExitRequest>,
) -> Result<Json<VerifyExitResponse>, AppError> {
    let plate = request
        .plate
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing plate parameter".to_string()))?;

    let found = state.engine.verify_exit_by_plate(&plate).await?;

    Ok(Json(VerifyExitResponse {
        success: true,
        slot: found.slot,
        reservation: found.reservation,
        message: "Reservation verified".to_string(),
    }))
}
