use super::{BookingBackend, BookingPayload, BookingReceipt, IntakePayload, SubmissionOutcome};
use crate::config::Settings;
use crate::error::TransportError;
use crate::wizard::IntakeKind;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

const USER_AGENT: &str = concat!("consulta/", env!("CARGO_PKG_VERSION"));

/// Posts payloads to the automation webhooks named in `Settings`.
pub struct WebhookClient {
    http: reqwest::Client,
    booking_url: Option<String>,
    first_time_url: Option<String>,
    returning_url: Option<String>,
}

impl WebhookClient {
    pub fn new(settings: &Settings) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;
        Ok(Self::with_http_client(settings, http))
    }

    pub fn with_http_client(settings: &Settings, http: reqwest::Client) -> Self {
        Self {
            http,
            booking_url: settings.booking_webhook_url.clone(),
            first_time_url: settings.first_time_form_webhook_url.clone(),
            returning_url: settings.returning_form_webhook_url.clone(),
        }
    }

    async fn post<B: Serialize + Sync>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<reqwest::Response, TransportError> {
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::Request {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    async fn booking(&self, url: &str, payload: &BookingPayload) -> Result<BookingReceipt, TransportError> {
        let response = self.post(url, payload).await?;
        let body = response.text().await.map_err(|e| TransportError::Request {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        parse_receipt(&body).map_err(|message| TransportError::MalformedBody {
            url: url.to_string(),
            message,
        })
    }
}

/// Automation tools often wrap the answer in a one-element array; both shapes are accepted.
fn parse_receipt(body: &str) -> Result<BookingReceipt, String> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| e.to_string())?;
    let value = match value {
        serde_json::Value::Array(mut items) if !items.is_empty() => items.swap_remove(0),
        other => other,
    };
    serde_json::from_value(value).map_err(|e| e.to_string())
}

#[async_trait]
impl BookingBackend for WebhookClient {
    async fn submit_booking(&self, payload: &BookingPayload) -> SubmissionOutcome<BookingReceipt> {
        let Some(url) = self.booking_url.as_deref() else {
            debug!("no booking webhook configured, skipping submission");
            return SubmissionOutcome::ConfigAbsent;
        };
        match self.booking(url, payload).await {
            Ok(receipt) => {
                info!(
                    contact_id = %receipt.contact_id,
                    contact_existed = receipt.contact_existed,
                    service = %payload.service.id,
                    "booking delivered"
                );
                SubmissionOutcome::Delivered(receipt)
            }
            Err(e) => {
                warn!(error = %e, service = %payload.service.id, "booking submission failed");
                SubmissionOutcome::TransportError(e)
            }
        }
    }

    async fn submit_intake(&self, payload: &IntakePayload) -> SubmissionOutcome<()> {
        let url = match payload.form_type {
            IntakeKind::FirstTime => self.first_time_url.as_deref(),
            IntakeKind::Returning => self.returning_url.as_deref(),
        };
        let Some(url) = url else {
            debug!(form = ?payload.form_type, "no intake webhook configured, skipping submission");
            return SubmissionOutcome::ConfigAbsent;
        };
        match self.post(url, payload).await {
            Ok(_) => {
                info!(contact_id = %payload.contact_id, form = ?payload.form_type, "intake form delivered");
                SubmissionOutcome::Delivered(())
            }
            Err(e) => {
                warn!(error = %e, form = ?payload.form_type, "intake submission failed");
                SubmissionOutcome::TransportError(e)
            }
        }
    }
}
