//! Local stand-in for the OCR.space endpoint.
//!
//! An axum router on an ephemeral port answers every `POST /parse/image`
//! with a fixed status and JSON body, and records the headers and decoded
//! form fields of each request.

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Form, Router};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct Recorded {
    pub headers: HeaderMap,
    pub form: HashMap<String, String>,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    body: &'static str,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

pub struct StubServer {
    pub url: String,
    pub requests: Arc<Mutex<Vec<Recorded>>>,
}

impl StubServer {
    pub fn hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

async fn parse_image(
    State(state): State<StubState>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], &'static str) {
    state.requests.lock().unwrap().push(Recorded { headers, form });
    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body,
    )
}

/// Serve `body` with `status` for every recognition request.
pub async fn spawn_stub(status: u16, body: &'static str) -> StubServer {
    let requests: Arc<Mutex<Vec<Recorded>>> = Arc::new(Mutex::new(Vec::new()));
    let state = StubState {
        status: StatusCode::from_u16(status).expect("valid status code"),
        body,
        requests: requests.clone(),
    };

    let app = Router::new()
        .route("/parse/image", post(parse_image))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub server");
    let addr = listener.local_addr().expect("stub server address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server");
    });

    StubServer {
        url: format!("http://{}/parse/image", addr),
        requests,
    }
}
