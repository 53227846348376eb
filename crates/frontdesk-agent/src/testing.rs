//! Test doubles shared by this crate's unit tests.

use crate::backend::ClinicBackend;
use crate::tools::{AvailabilityQuery, BookingRequest, CancellationRequest, InfoQuery, PatientLookup};
use crate::{AgentError, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

/// Backend that records every call and answers with canned text.
///
/// Tools without a canned reply answer `"<tool> ok"`.
#[derive(Default)]
pub struct RecordingBackend {
    calls: Mutex<Vec<(String, Value)>>,
    replies: Mutex<HashMap<String, String>>,
    failures: Mutex<HashMap<String, AgentError>>,
    panics: Mutex<Vec<String>>,
}

impl RecordingBackend {
    pub fn respond(&self, tool: &str, reply: &str) {
        self.replies.lock().unwrap().insert(tool.to_string(), reply.to_string());
    }

    /// Make the next call of `tool` fail with `error`.
    pub fn fail(&self, tool: &str, error: AgentError) {
        self.failures.lock().unwrap().insert(tool.to_string(), error);
    }

    /// Make every call of `tool` panic.
    pub fn panic_on(&self, tool: &str) {
        self.panics.lock().unwrap().push(tool.to_string());
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    fn record<T: Serialize>(&self, tool: &str, input: &T) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((tool.to_string(), serde_json::to_value(input)?));

        let panics = self.panics.lock().unwrap().iter().any(|t| t == tool);
        if panics {
            panic!("{} blew up", tool);
        }

        if let Some(error) = self.failures.lock().unwrap().remove(tool) {
            return Err(error);
        }
        Ok(self
            .replies
            .lock()
            .unwrap()
            .get(tool)
            .cloned()
            .unwrap_or_else(|| format!("{} ok", tool)))
    }
}

#[async_trait]
impl ClinicBackend for RecordingBackend {
    async fn check_availability(&self, query: &AvailabilityQuery) -> Result<String> {
        self.record("check_availability", query)
    }

    async fn schedule_appointment(&self, booking: &BookingRequest) -> Result<String> {
        self.record("schedule_appointment", booking)
    }

    async fn cancel_appointment(&self, cancellation: &CancellationRequest) -> Result<String> {
        self.record("cancel_appointment", cancellation)
    }

    async fn lookup_appointments(&self, lookup: &PatientLookup) -> Result<String> {
        self.record("get_patient_appointments", lookup)
    }

    async fn clinic_info(&self, query: &InfoQuery) -> Result<String> {
        self.record("get_clinic_info", query)
    }
}
