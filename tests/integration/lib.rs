//! Shared fixtures for the cross-crate tests.

use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use frontdesk_agent::{HttpClinicBackend, Receptionist, RuntimeConfig, SessionStore, ToolDispatcher};
use frontdesk_core::Config;
use frontdesk_gateway::{Gateway, GatewayConfig};
use frontdesk_providers::{ScriptedProvider, ScriptedTurn};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// A gateway router wired to a scripted model and an HTTP clinic backend.
pub fn scripted_app(turns: Vec<ScriptedTurn>, backend_url: &str) -> (Router, Arc<ScriptedProvider>) {
    let config = Config::default();
    let provider = Arc::new(ScriptedProvider::new(turns));
    let backend = HttpClinicBackend::new(backend_url, Duration::from_secs(5)).unwrap();
    let dispatcher = ToolDispatcher::new(Arc::new(backend), config.clinic.services.clone());
    let receptionist = Receptionist::new(
        provider.clone(),
        Arc::new(dispatcher),
        Arc::new(SessionStore::new(Duration::from_secs(config.session.ttl_secs))),
    )
    .with_config(RuntimeConfig::from_config(&config));

    let gateway = Gateway::new(GatewayConfig::from_config(&config), receptionist);
    (gateway.router(), provider)
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_string(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Split a server-sent event body into the JSON payloads of its frames.
pub fn sse_payloads(body: &str) -> Vec<Value> {
    body.split("\n\n")
        .filter(|frame| !frame.is_empty())
        .map(|frame| {
            let data = frame.strip_prefix("data: ").expect("frame starts with data:");
            serde_json::from_str(data).expect("frame payload is JSON")
        })
        .collect()
}
