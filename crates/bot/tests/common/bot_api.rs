//! In-process stand-in for the Telegram Bot API.
//!
//! Serves `POST /bot<token>/<method>` on a random local port, records every
//! call, and answers with canned envelopes. Methods can be made to fail with
//! a 400 or to stall before answering.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

#[derive(Default)]
pub struct Behavior {
    /// Methods answered with `400 Bad Request`.
    pub rejected: Vec<&'static str>,
    /// Methods that wait this long before answering.
    pub stalled: HashMap<&'static str, Duration>,
}

#[derive(Clone)]
struct StubState {
    calls: Arc<Mutex<Vec<(String, Value)>>>,
    behavior: Arc<Behavior>,
}

pub struct StubBotApi {
    pub url: String,
    calls: Arc<Mutex<Vec<(String, Value)>>>,
}

impl StubBotApi {
    pub async fn start(behavior: Behavior) -> Self {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            calls: calls.clone(),
            behavior: Arc::new(behavior),
        };
        let app = Router::new()
            .route("/{bot}/{method}", post(handle))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        Self { url, calls }
    }

    /// Request bodies sent to `method`, in call order.
    pub fn calls_to(&self, method: &str) -> Vec<Value> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| m == method)
            .map(|(_, body)| body.clone())
            .collect()
    }

    /// Texts of every `sendMessage` call.
    pub fn sent_texts(&self) -> Vec<String> {
        self.calls_to("sendMessage")
            .iter()
            .map(|body| body["text"].as_str().unwrap_or_default().to_string())
            .collect()
    }
}

async fn handle(
    State(state): State<StubState>,
    Path((_bot, method)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state
        .calls
        .lock()
        .unwrap()
        .push((method.clone(), body.clone()));

    if let Some(delay) = state.behavior.stalled.get(method.as_str()) {
        tokio::time::sleep(*delay).await;
    }

    if state.behavior.rejected.contains(&method.as_str()) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "ok": false,
                "error_code": 400,
                "description": format!("Bad Request: {method} rejected"),
            })),
        );
    }

    let message = json!({ "message_id": 1, "chat": { "id": body["chat_id"] } });
    let result = match method.as_str() {
        "sendMessage" | "sendPhoto" => message,
        "sendMediaGroup" => json!([message]),
        "getMe" => json!({ "id": 1, "is_bot": true, "first_name": "Shelf" }),
        _ => json!(true),
    };
    (StatusCode::OK, Json(json!({ "ok": true, "result": result })))
}
