//! The clinic tool catalog and its dispatcher.
//!
//! The catalog is closed: [`ToolKind`] lists every tool the model can call,
//! and [`ToolDispatcher::invoke`] never fails. Unknown names, malformed input
//! and backend failures all come back as text for the model to read.

mod inputs;

pub use inputs::{AvailabilityQuery, BookingRequest, CancellationRequest, InfoQuery, PatientLookup};

use crate::backend::ClinicBackend;
use crate::{AgentError, Result};
use frontdesk_core::ToolDefinition;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Topics `get_clinic_info` understands.
pub const CLINIC_TOPICS: &[&str] = &[
    "hours",
    "services",
    "location",
    "insurance",
    "parking",
    "cancellation",
    "payment",
    "xrays",
    "new_patient",
    "emergency",
];

/// Every tool the receptionist can call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    CheckAvailability,
    ScheduleAppointment,
    CancelAppointment,
    GetPatientAppointments,
    GetClinicInfo,
}

impl ToolKind {
    pub const ALL: [ToolKind; 5] = [
        ToolKind::CheckAvailability,
        ToolKind::ScheduleAppointment,
        ToolKind::CancelAppointment,
        ToolKind::GetPatientAppointments,
        ToolKind::GetClinicInfo,
    ];

    /// Name the model calls the tool by.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::CheckAvailability => "check_availability",
            ToolKind::ScheduleAppointment => "schedule_appointment",
            ToolKind::CancelAppointment => "cancel_appointment",
            ToolKind::GetPatientAppointments => "get_patient_appointments",
            ToolKind::GetClinicInfo => "get_clinic_info",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn description(self) -> &'static str {
        match self {
            ToolKind::CheckAvailability => {
                "Check available appointment slots for a given date and dental service. \
                 Always call this before scheduling to confirm open times."
            }
            ToolKind::ScheduleAppointment => "Book a confirmed dental appointment for a patient.",
            ToolKind::CancelAppointment => "Cancel an existing confirmed appointment by its ID.",
            ToolKind::GetPatientAppointments => {
                "Look up all existing appointments for a patient by name and phone."
            }
            ToolKind::GetClinicInfo => {
                "Get information about the dental clinic: hours, services, location, \
                 insurance, parking, cancellation policy, payment options, or FAQs."
            }
        }
    }

    /// JSON Schema of the tool input. `services` fills the service enum.
    pub fn input_schema(self, services: &[String]) -> Value {
        let service = |description: &str| {
            json!({"type": "string", "description": description, "enum": services})
        };
        let name = json!({"type": "string", "description": "Patient's full name"});
        let phone = json!({"type": "string", "description": "Patient's phone number"});

        match self {
            ToolKind::CheckAvailability => json!({
                "type": "object",
                "properties": {
                    "date": {
                        "type": "string",
                        "description": "Date to check in YYYY-MM-DD format (e.g. 2026-03-15)"
                    },
                    "service_type": service("Type of dental service to book"),
                },
                "required": ["date", "service_type"],
            }),
            ToolKind::ScheduleAppointment => json!({
                "type": "object",
                "properties": {
                    "patient_name": name,
                    "patient_phone": phone,
                    "patient_email": {"type": "string", "description": "Patient's email address"},
                    "service_type": service("Type of dental service"),
                    "date": {"type": "string", "description": "Appointment date YYYY-MM-DD"},
                    "time": {
                        "type": "string",
                        "description": "Appointment time HH:MM (24-hour, e.g. 09:00 or 14:30)"
                    },
                },
                "required": [
                    "patient_name", "patient_phone", "patient_email",
                    "service_type", "date", "time"
                ],
            }),
            ToolKind::CancelAppointment => json!({
                "type": "object",
                "properties": {
                    "appointment_id": {
                        "type": "integer",
                        "description": "The numeric ID of the appointment to cancel"
                    },
                    "reason": {"type": "string", "description": "Reason for cancellation"},
                },
                "required": ["appointment_id", "reason"],
            }),
            ToolKind::GetPatientAppointments => json!({
                "type": "object",
                "properties": {
                    "patient_name": name,
                    "patient_phone": phone,
                },
                "required": ["patient_name", "patient_phone"],
            }),
            ToolKind::GetClinicInfo => json!({
                "type": "object",
                "properties": {
                    "topic": {
                        "type": "string",
                        "description": format!("Topic to retrieve. Options: {}", CLINIC_TOPICS.join(", "))
                    },
                },
                "required": ["topic"],
            }),
        }
    }

    pub fn definition(self, services: &[String]) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description(), self.input_schema(services))
    }
}

/// Executes tool calls against a [`ClinicBackend`].
pub struct ToolDispatcher {
    backend: Arc<dyn ClinicBackend>,
    services: Vec<String>,
    definitions: Vec<ToolDefinition>,
}

impl ToolDispatcher {
    /// Create a dispatcher. `services` are the bookable service keys.
    pub fn new(backend: Arc<dyn ClinicBackend>, services: Vec<String>) -> Self {
        let definitions = ToolKind::ALL
            .iter()
            .map(|kind| kind.definition(&services))
            .collect();
        Self {
            backend,
            services,
            definitions,
        }
    }

    /// The catalog sent with every model call.
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    /// Run one tool call and return its textual result.
    ///
    /// Never fails: errors are reported as `Tool '<name>' error: ...` and an
    /// unknown name as `Unknown tool: <name>`.
    pub async fn invoke(&self, name: &str, input: &Map<String, Value>) -> String {
        let Some(kind) = ToolKind::from_name(name) else {
            warn!(tool = %name, "Model called an unknown tool");
            return format!("Unknown tool: {}", name);
        };

        debug!(tool = %name, ?input, "Executing tool");
        let start = Instant::now();
        let outcome = self.run(kind, input).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(output) => {
                info!(tool = %name, elapsed_ms, "Tool completed");
                output
            }
            Err(e) => {
                warn!(tool = %name, elapsed_ms, error = %e, "Tool failed");
                format!("Tool '{}' error: {}", name, e)
            }
        }
    }

    async fn run(&self, kind: ToolKind, input: &Map<String, Value>) -> Result<String> {
        match kind {
            ToolKind::CheckAvailability => {
                let query: AvailabilityQuery = parse(input)?;
                query.validate(&self.services)?;
                self.backend.check_availability(&query).await
            }
            ToolKind::ScheduleAppointment => {
                let booking: BookingRequest = parse(input)?;
                booking.validate(&self.services)?;
                self.backend.schedule_appointment(&booking).await
            }
            ToolKind::CancelAppointment => {
                let cancellation: CancellationRequest = parse(input)?;
                self.backend.cancel_appointment(&cancellation).await
            }
            ToolKind::GetPatientAppointments => {
                let lookup: PatientLookup = parse(input)?;
                self.backend.lookup_appointments(&lookup).await
            }
            ToolKind::GetClinicInfo => {
                let query: InfoQuery = parse(input)?;
                self.backend.clinic_info(&query).await
            }
        }
    }
}

fn parse<T: DeserializeOwned>(input: &Map<String, Value>) -> Result<T> {
    serde_json::from_value(Value::Object(input.clone()))
        .map_err(|e| AgentError::invalid_input(e.to_string()))
}
