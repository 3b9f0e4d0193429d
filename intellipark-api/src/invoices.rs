use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;
use intellipark_core::booking::CreateInvoiceRequest;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceResponse {
    pub success: bool,
    pub invoice_url: String,
    pub external_id: String,
    pub amount: i32,
    pub vehicle: String,
    pub invoice: serde_json::Value,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/create-invoice", post(create_invoice))
}

/// POST /api/create-invoice
/// Validate a booking request and open a payment invoice for it
async fn create_invoice(
    State(state): State<AppState>,
    Json(request): Json<CreateInvoiceRequest>,
) -> Result<Json<CreateInvoiceResponse>, AppError> {
    tracing::info!(slot = ?request.slot, kind = ?request.kind, "create-invoice request");

    let created = state.engine.create_invoice(request).await?;

    Ok(Json(CreateInvoiceResponse {
        success: true,
        invoice_url: created.invoice_url,
        external_id: created.external_id,
        amount: created.amount,
        vehicle: created.vehicle,
        invoice: created.invoice,
    }))
}
