//! Typed inputs of the clinic tools.

use crate::{AgentError, Result};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

fn check_date(date: &str) -> Result<()> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| AgentError::invalid_input(format!("date '{}' is not YYYY-MM-DD", date)))
}

fn check_time(time: &str) -> Result<()> {
    // chrono accepts single-digit hours; the schema promises HH:MM.
    let well_formed = time.len() == 5 && NaiveTime::parse_from_str(time, "%H:%M").is_ok();
    if well_formed {
        Ok(())
    } else {
        Err(AgentError::invalid_input(format!("time '{}' is not HH:MM (24-hour)", time)))
    }
}

fn check_service(service: &str, services: &[String]) -> Result<()> {
    if services.is_empty() || services.iter().any(|s| s == service) {
        Ok(())
    } else {
        Err(AgentError::invalid_input(format!(
            "unknown service_type '{}', expected one of: {}",
            service,
            services.join(", ")
        )))
    }
}

fn check_present(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(AgentError::invalid_input(format!("{} must not be empty", field)))
    } else {
        Ok(())
    }
}

/// `check_availability` input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    pub date: String,
    pub service_type: String,
}

impl AvailabilityQuery {
    pub fn validate(&self, services: &[String]) -> Result<()> {
        check_date(&self.date)?;
        check_service(&self.service_type, services)
    }
}

/// `schedule_appointment` input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub patient_name: String,
    pub patient_phone: String,
    pub patient_email: String,
    pub service_type: String,
    pub date: String,
    pub time: String,
}

impl BookingRequest {
    pub fn validate(&self, services: &[String]) -> Result<()> {
        check_present("patient_name", &self.patient_name)?;
        check_present("patient_phone", &self.patient_phone)?;
        check_present("patient_email", &self.patient_email)?;
        check_service(&self.service_type, services)?;
        check_date(&self.date)?;
        check_time(&self.time)
    }
}

/// `cancel_appointment` input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancellationRequest {
    pub appointment_id: i64,
    pub reason: String,
}

/// `get_patient_appointments` input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientLookup {
    pub patient_name: String,
    pub patient_phone: String,
}

/// `get_clinic_info` input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoQuery {
    pub topic: String,
}
