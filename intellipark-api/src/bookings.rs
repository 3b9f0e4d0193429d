use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub success: bool,
    pub booking: serde_json::Value,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/booking/{external_id}", get(get_booking))
}

/// GET /api/booking/{external_id}
/// Booking status lookup by correlation id
async fn get_booking(
    State(state): State<AppState>,
    Path(external_id): Path<String>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state.engine.lookup_booking(&external_id).await?;
    Ok(Json(BookingResponse {
        success: true,
        booking,
    }))
}
