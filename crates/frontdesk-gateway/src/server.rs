//! HTTP gateway server.

use crate::error::GatewayError;
use crate::handlers;
use crate::Result;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use frontdesk_agent::Receptionist;
use frontdesk_core::config::BindMode;
use frontdesk_core::Config;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Default gateway port.
pub const DEFAULT_PORT: u16 = 5000;

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Bind mode.
    pub bind: BindMode,

    /// Port number.
    pub port: u16,

    /// Origins allowed by CORS. Empty allows any origin.
    pub cors_origins: Vec<String>,

    /// How often expired sessions are swept.
    pub sweep_interval: Duration,
}

impl GatewayConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            bind: config.gateway.bind,
            port: config.gateway.port,
            cors_origins: config.gateway.cors_origins.clone(),
            sweep_interval: Duration::from_secs(config.session.sweep_interval_secs),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind: BindMode::Loopback,
            port: DEFAULT_PORT,
            cors_origins: Vec::new(),
            sweep_interval: Duration::from_secs(60),
        }
    }
}

/// State shared by every route.
pub struct GatewayState {
    pub receptionist: Receptionist,
    pub config: GatewayConfig,
}

/// The HTTP gateway server.
pub struct Gateway {
    state: Arc<GatewayState>,
}

impl Gateway {
    pub fn new(config: GatewayConfig, receptionist: Receptionist) -> Self {
        Self {
            state: Arc::new(GatewayState {
                receptionist,
                config,
            }),
        }
    }

    pub fn state(&self) -> &Arc<GatewayState> {
        &self.state
    }

    /// Run the server until Ctrl-C.
    pub async fn run(&self) -> Result<()> {
        let addr = self.bind_address();

        if self.state.config.bind != BindMode::Loopback {
            warn!("Gateway binding to {}, reachable from the network", addr);
        }

        let sweeper = self
            .state
            .receptionist
            .sessions()
            .spawn_sweeper(self.state.config.sweep_interval);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Starting gateway server on {}", addr);

        let served = axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| GatewayError::Internal(e.to_string()));

        sweeper.abort();
        info!("Gateway stopped");
        served
    }

    /// Build the router with every route and layer.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/session", get(handlers::create_session))
            .route("/chat", post(handlers::chat))
            .route("/health", get(handlers::health))
            .layer(Self::create_cors_layer(&self.state.config))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    fn create_cors_layer(config: &GatewayConfig) -> CorsLayer {
        let layer = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
            .max_age(Duration::from_secs(3600));

        if config.cors_origins.is_empty() {
            return layer.allow_origin(Any);
        }

        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(%origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        layer.allow_origin(AllowOrigin::list(origins))
    }

    /// Get the bind address.
    pub fn bind_address(&self) -> SocketAddr {
        let ip = match self.state.config.bind {
            BindMode::Loopback => [127, 0, 0, 1],
            BindMode::Lan => [0, 0, 0, 0],
        };

        SocketAddr::from((ip, self.state.config.port))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use frontdesk_agent::tools::{
        AvailabilityQuery, BookingRequest, CancellationRequest, InfoQuery, PatientLookup,
    };
    use frontdesk_agent::{ClinicBackend, RuntimeConfig, SessionStore, ToolDispatcher};
    use frontdesk_providers::{ScriptedProvider, ScriptedTurn};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct FrontDesk;

    #[async_trait]
    impl ClinicBackend for FrontDesk {
        async fn check_availability(&self, _: &AvailabilityQuery) -> frontdesk_agent::Result<String> {
            Ok("09:00, 10:30".into())
        }
        async fn schedule_appointment(&self, _: &BookingRequest) -> frontdesk_agent::Result<String> {
            Ok("Booked".into())
        }
        async fn cancel_appointment(&self, _: &CancellationRequest) -> frontdesk_agent::Result<String> {
            Ok("Cancelled".into())
        }
        async fn lookup_appointments(&self, _: &PatientLookup) -> frontdesk_agent::Result<String> {
            Ok("None".into())
        }
        async fn clinic_info(&self, _: &InfoQuery) -> frontdesk_agent::Result<String> {
            Ok("Mon-Fri 9-5".into())
        }
    }

    fn gateway(turns: Vec<ScriptedTurn>, config: GatewayConfig) -> Gateway {
        let services = frontdesk_core::config::ClinicConfig::default().services;
        let receptionist = Receptionist::new(
            Arc::new(ScriptedProvider::new(turns)),
            Arc::new(ToolDispatcher::new(Arc::new(FrontDesk), services)),
            Arc::new(SessionStore::new(Duration::from_secs(7200))),
        )
        .with_config(RuntimeConfig::default());
        Gateway::new(config, receptionist)
    }

    fn post_chat(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/chat")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_gateway_config_default() {
        let config = GatewayConfig::default();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.bind, BindMode::Loopback);
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn test_bind_address() {
        let lan = gateway(
            vec![],
            GatewayConfig {
                bind: BindMode::Lan,
                port: 8080,
                ..Default::default()
            },
        );
        assert_eq!(lan.bind_address().to_string(), "0.0.0.0:8080");
        let local = gateway(vec![], GatewayConfig::default());
        assert_eq!(local.bind_address().to_string(), "127.0.0.1:5000");
    }

    #[tokio::test]
    async fn test_create_session() {
        let app = gateway(vec![], GatewayConfig::default()).router();
        let response = app
            .oneshot(Request::get("/session").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        let id = body["session_id"].as_str().unwrap();
        assert_eq!(id.len(), 36);
        assert_eq!(id.chars().nth(14), Some('4'));
    }

    #[tokio::test]
    async fn test_chat_requires_both_fields() {
        let app = gateway(vec![], GatewayConfig::default()).router();
        for body in [
            json!({"session_id": "abc"}),
            json!({"message": "hi"}),
            json!({"session_id": "", "message": "hi"}),
            json!({"session_id": "abc", "message": "   "}),
        ] {
            let response = app.clone().oneshot(post_chat(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
            assert_eq!(body, json!({"error": "Both session_id and message are required."}));
        }
    }

    #[tokio::test]
    async fn test_chat_rejects_malformed_json() {
        let app = gateway(vec![], GatewayConfig::default()).router();
        let request = Request::builder()
            .method("POST")
            .uri("/chat")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chat_streams_frames() {
        let gateway = gateway(
            vec![
                ScriptedTurn::new().tool_use("t1", "get_clinic_info", json!({"topic": "hours"})),
                ScriptedTurn::new().text("We're open ").text("Mon-Fri 9-5."),
            ],
            GatewayConfig::default(),
        );
        let app = gateway.router();

        let response = app
            .clone()
            .oneshot(post_chat(json!({"session_id": "s1", "message": "  Hours?  "})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers["content-type"], "text/event-stream");
        assert_eq!(headers["cache-control"], "no-cache");
        assert_eq!(headers["x-accel-buffering"], "no");

        assert_eq!(
            body_text(response).await,
            concat!(
                "data: {\"type\":\"tool\",\"name\":\"get_clinic_info\"}\n\n",
                "data: {\"type\":\"text\",\"chunk\":\"We're open \"}\n\n",
                "data: {\"type\":\"text\",\"chunk\":\"Mon-Fri 9-5.\"}\n\n",
                "data: {\"type\":\"done\"}\n\n",
            )
        );

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body, json!({"status": "ok", "sessions": 1}));
    }

    #[tokio::test]
    async fn test_chat_model_failure_is_a_frame() {
        let app = gateway(vec![ScriptedTurn::refuse("overloaded")], GatewayConfig::default()).router();
        let response = app
            .oneshot(post_chat(json!({"session_id": "s1", "message": "Hi"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_text(response).await,
            concat!(
                "data: {\"type\":\"error\",\"message\":\"Model error: Model API returned 500: overloaded\"}\n\n",
                "data: {\"type\":\"done\"}\n\n",
            )
        );
    }

    #[tokio::test]
    async fn test_cors_allow_list() {
        let config = GatewayConfig {
            cors_origins: vec!["https://clinic.example".into()],
            ..Default::default()
        };
        let app = gateway(vec![], config).router();

        let request = |origin: &str| {
            Request::get("/health")
                .header("origin", origin)
                .body(Body::empty())
                .unwrap()
        };

        let allowed = app.clone().oneshot(request("https://clinic.example")).await.unwrap();
        assert_eq!(
            allowed.headers()["access-control-allow-origin"],
            "https://clinic.example"
        );

        let denied = app.oneshot(request("https://evil.example")).await.unwrap();
        assert!(denied.headers().get("access-control-allow-origin").is_none());
    }

    #[tokio::test]
    async fn test_cors_any_when_unconfigured() {
        let app = gateway(vec![], GatewayConfig::default()).router();
        let response = app
            .oneshot(
                Request::get("/health")
                    .header("origin", "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }
}
