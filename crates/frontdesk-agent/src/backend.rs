//! The clinic's appointment system, as seen by the tools.

use crate::tools::{AvailabilityQuery, BookingRequest, CancellationRequest, InfoQuery, PatientLookup};
use crate::{AgentError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Appointment system the clinic tools call into.
///
/// Every operation answers with text meant for the model to read. Failures
/// are turned into text by the [`ToolDispatcher`](crate::ToolDispatcher).
#[async_trait]
pub trait ClinicBackend: Send + Sync {
    async fn check_availability(&self, query: &AvailabilityQuery) -> Result<String>;

    async fn schedule_appointment(&self, booking: &BookingRequest) -> Result<String>;

    async fn cancel_appointment(&self, cancellation: &CancellationRequest) -> Result<String>;

    async fn lookup_appointments(&self, lookup: &PatientLookup) -> Result<String>;

    async fn clinic_info(&self, query: &InfoQuery) -> Result<String>;
}

/// [`ClinicBackend`] over HTTP.
///
/// Each call POSTs the tool input as JSON to `{base_url}/tools/<tool name>`
/// and returns the response body.
#[derive(Debug, Clone)]
pub struct HttpClinicBackend {
    client: Client,
    base_url: String,
}

impl HttpClinicBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(AgentError::config(format!(
                "backend url must be http(s): {}",
                base_url
            )));
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn call<T: Serialize + ?Sized>(&self, tool: &str, input: &T) -> Result<String> {
        let url = format!("{}/tools/{}", self.base_url, tool);
        debug!(%url, "Calling clinic backend");

        let response = self.client.post(&url).json(input).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(AgentError::backend(status.as_u16(), body))
        }
    }
}

#[async_trait]
impl ClinicBackend for HttpClinicBackend {
    async fn check_availability(&self, query: &AvailabilityQuery) -> Result<String> {
        self.call("check_availability", query).await
    }

    async fn schedule_appointment(&self, booking: &BookingRequest) -> Result<String> {
        self.call("schedule_appointment", booking).await
    }

    async fn cancel_appointment(&self, cancellation: &CancellationRequest) -> Result<String> {
        self.call("cancel_appointment", cancellation).await
    }

    async fn lookup_appointments(&self, lookup: &PatientLookup) -> Result<String> {
        self.call("get_patient_appointments", lookup).await
    }

    async fn clinic_info(&self, query: &InfoQuery) -> Result<String> {
        self.call("get_clinic_info", query).await
    }
}
