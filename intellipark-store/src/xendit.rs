use async_trait::async_trait;
use reqwest::Url;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use intellipark_core::booking::PendingBooking;
use intellipark_core::payment::{GatewayError, Invoice, InvoiceRequest, PaymentGateway};

use crate::app_config::{FrontendConfig, XenditConfig};

/// Xendit invoice API client.
///
/// Invoices are created with `POST /v2/invoices`, authenticated by the
/// secret key as basic-auth username with an empty password. A response body
/// carrying `error_code` is a rejection even when the HTTP status is 200.
#[derive(Clone)]
pub struct XenditClient {
    http: reqwest::Client,
    api_base: String,
    secret_key: String,
    invoice_duration_seconds: u32,
    kiosk_base: Url,
    portal_base: Url,
}

#[derive(Debug, Serialize)]
struct InvoicePayload<'a> {
    external_id: &'a str,
    amount: i32,
    currency: &'a str,
    description: &'a str,
    payer_email: &'a str,
    success_redirect_url: String,
    failure_redirect_url: String,
    invoice_duration: u32,
}

impl XenditClient {
    pub fn new(
        xendit: &XenditConfig,
        frontend: &FrontendConfig,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(XenditClient {
            http,
            api_base: xendit.api_base.trim_end_matches('/').to_string(),
            secret_key: xendit.secret_key.clone(),
            invoice_duration_seconds: xendit.invoice_duration_seconds,
            kiosk_base: Url::parse(&frontend.kiosk_base_url)?,
            portal_base: Url::parse(&frontend.portal_base_url)?,
        })
    }

    /// Where the payer lands after completing payment: the kiosk success
    /// page for walk-ins, the website confirmation page otherwise.
    fn success_redirect_url(&self, booking: &PendingBooking) -> Result<String, GatewayError> {
        let mut url = if booking.is_walk_in() {
            self.kiosk_base.join("payment-success.html")
        } else {
            self.portal_base.join("confirmation.html")
        }
        .map_err(|e| GatewayError::Transport(e.to_string()))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("slot", &booking.slot);
            if !booking.is_walk_in() {
                query.append_pair("name", booking.name.as_deref().unwrap_or_default());
            }
            query.append_pair("plate", &booking.plate);
            query.append_pair("vehicle", &booking.vehicle);
            if !booking.is_walk_in() {
                query.append_pair("time", booking.time.as_deref().unwrap_or_default());
                query.append_pair("timestamp", &booking.timestamp.to_rfc3339());
                query.append_pair("email", &booking.email);
            }
        }
        Ok(url.to_string())
    }

    fn failure_redirect_url(&self, booking: &PendingBooking) -> Result<String, GatewayError> {
        if booking.is_walk_in() {
            let url = self
                .kiosk_base
                .join("payment-failed.html")
                .map_err(|e| GatewayError::Transport(e.to_string()))?;
            Ok(url.to_string())
        } else {
            let mut url = self
                .portal_base
                .join("payment-failed.html")
                .map_err(|e| GatewayError::Transport(e.to_string()))?;
            url.query_pairs_mut().append_pair("slot", &booking.slot);
            Ok(url.to_string())
        }
    }
}

#[async_trait]
impl PaymentGateway for XenditClient {
    async fn create_invoice(&self, request: &InvoiceRequest) -> Result<Invoice, GatewayError> {
        let payload = InvoicePayload {
            external_id: &request.external_id,
            amount: request.booking.amount,
            currency: "PHP",
            description: &request.description,
            payer_email: &request.booking.email,
            success_redirect_url: self.success_redirect_url(&request.booking)?,
            failure_redirect_url: self.failure_redirect_url(&request.booking)?,
            invoice_duration: self.invoice_duration_seconds,
        };

        tracing::info!(external_id = %request.external_id, amount = payload.amount, "creating invoice");

        let response = self
            .http
            .post(format!("{}/v2/invoices", self.api_base))
            .basic_auth(&self.secret_key, Some(""))
            .json(&payload)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if let Some(code) = body.get("error_code").and_then(Value::as_str) {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or(code)
                .to_string();
            tracing::warn!(code, "invoice rejected by gateway");
            return Err(GatewayError::Rejected {
                code: code.to_string(),
                message,
            });
        }

        let id = body
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let invoice_url = body
            .get("invoice_url")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        tracing::info!(invoice_id = %id, "invoice created");
        Ok(Invoice {
            id,
            invoice_url,
            payload: body,
        })
    }
}
