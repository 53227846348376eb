//! End-to-end chat over HTTP.
//!
//! A scripted model drives the real gateway, turn loop and HTTP clinic
//! backend, with the clinic's appointment service mocked by wiremock.

use frontdesk_integration_tests::{body_string, get, post_json, scripted_app, sse_payloads};
use frontdesk_providers::ScriptedTurn;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_booking_over_http() {
    let clinic = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tools/check_availability"))
        .and(body_partial_json(json!({"date": "2026-03-03", "service_type": "cleaning"})))
        .respond_with(ResponseTemplate::new(200).set_body_string("Available: 09:00, 11:00"))
        .expect(1)
        .mount(&clinic)
        .await;
    Mock::given(method("POST"))
        .and(path("/tools/schedule_appointment"))
        .and(body_partial_json(json!({"patient_name": "Jane", "time": "09:00"})))
        .respond_with(ResponseTemplate::new(200).set_body_string("Confirmed, appointment #12"))
        .expect(1)
        .mount(&clinic)
        .await;

    let (app, provider) = scripted_app(
        vec![
            ScriptedTurn::new().tool_use(
                "toolu_01",
                "check_availability",
                json!({"date": "2026-03-03", "service_type": "cleaning"}),
            ),
            ScriptedTurn::new().tool_use(
                "toolu_02",
                "schedule_appointment",
                json!({
                    "patient_name": "Jane",
                    "patient_phone": "555-1234",
                    "patient_email": "jane@x.com",
                    "service_type": "cleaning",
                    "date": "2026-03-03",
                    "time": "09:00"
                }),
            ),
            ScriptedTurn::new().text("You're all set, ").text("Jane: #12 at 09:00."),
        ],
        &clinic.uri(),
    );

    let created = app.clone().oneshot(get("/session")).await.unwrap();
    let session: Value = serde_json::from_str(&body_string(created).await).unwrap();
    let session_id = session["session_id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(post_json(
            "/chat",
            &json!({
                "session_id": session_id,
                "message": "Book a cleaning tomorrow at 9am, I'm Jane, 555-1234, jane@x.com."
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let events = sse_payloads(&body_string(response).await);
    assert_eq!(
        events,
        vec![
            json!({"type": "tool", "name": "check_availability"}),
            json!({"type": "tool", "name": "schedule_appointment"}),
            json!({"type": "text", "chunk": "You're all set, "}),
            json!({"type": "text", "chunk": "Jane: #12 at 09:00."}),
            json!({"type": "done"}),
        ]
    );

    // The last model call saw the full six-turn shape minus its own reply.
    let requests = provider.requests();
    assert_eq!(requests.len(), 3);
    let last = &requests[2].messages;
    assert_eq!(last.len(), 5);
    assert_eq!(
        serde_json::to_value(&last[4]).unwrap(),
        json!({
            "role": "user",
            "content": [{"type": "tool_result", "tool_use_id": "toolu_02", "content": "Confirmed, appointment #12"}]
        })
    );

    let health = app.oneshot(get("/health")).await.unwrap();
    let health: Value = serde_json::from_str(&body_string(health).await).unwrap();
    assert_eq!(health, json!({"status": "ok", "sessions": 1}));
}

#[tokio::test]
async fn test_backend_outage_becomes_conversation() {
    let clinic = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&clinic)
        .await;

    let (app, provider) = scripted_app(
        vec![
            ScriptedTurn::new().tool_use("t1", "get_clinic_info", json!({"topic": "parking"})),
            ScriptedTurn::reply("Sorry, I can't reach our system right now."),
        ],
        &clinic.uri(),
    );

    let response = app
        .oneshot(post_json("/chat", &json!({"session_id": "s-1", "message": "Is there parking?"})))
        .await
        .unwrap();
    let events = sse_payloads(&body_string(response).await);
    assert!(events.iter().all(|e| e["type"] != "error"), "{:?}", events);
    assert_eq!(events.last(), Some(&json!({"type": "done"})));

    let tool_result = serde_json::to_value(&provider.requests()[1].messages[2]).unwrap();
    assert_eq!(
        tool_result["content"][0]["content"],
        "Tool 'get_clinic_info' error: Backend returned 503: maintenance"
    );
}

#[tokio::test]
async fn test_sessions_do_not_share_history() {
    let clinic = MockServer::start().await;
    let (app, provider) = scripted_app(
        vec![ScriptedTurn::reply("Hello A"), ScriptedTurn::reply("Hello B")],
        &clinic.uri(),
    );

    for (id, message) in [("a", "I'm Ann"), ("b", "I'm Bob")] {
        let response = app
            .clone()
            .oneshot(post_json("/chat", &json!({"session_id": id, "message": message})))
            .await
            .unwrap();
        body_string(response).await;
    }

    let requests = provider.requests();
    assert_eq!(requests[1].messages.len(), 1);
    assert_eq!(requests[1].messages[0].text(), "I'm Bob");
}
