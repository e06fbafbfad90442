//! In-process fake of the developer service, bound to a random loopback port.

use std::sync::{Arc, Mutex};

use axum::{
  Json, Router,
  extract::{OriginalUri, Path, State},
  http::{HeaderMap, StatusCode},
  routing::{get, post},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Everything the fake has been asked, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct Recorded {
  pub registrations: Vec<String>,
  /// `user` header of each `GET /devs`.
  pub list_users:    Vec<Option<String>>,
  /// Path and `user` header of each like/dislike.
  pub reactions:     Vec<(String, Option<String>)>,
}

struct ServiceState {
  register_id:  String,
  candidates:   Vec<Value>,
  react_status: StatusCode,
  recorded:     Recorded,
}

type Shared = Arc<Mutex<ServiceState>>;

/// Handle to a running fake service.
pub struct FakeService {
  pub base_url: String,
  state:        Shared,
}

impl FakeService {
  /// Start a fake that answers registrations with `register_id` and candidate
  /// listings with `candidates`.
  pub async fn spawn(register_id: &str, candidates: Vec<Value>) -> Self {
    let state = Arc::new(Mutex::new(ServiceState {
      register_id: register_id.to_string(),
      candidates,
      react_status: StatusCode::OK,
      recorded: Recorded::default(),
    }));

    let router = Router::new()
      .route("/devs", post(register).get(list))
      .route("/devs/{id}/likes", post(react))
      .route("/devs/{id}/dislikes", post(react))
      .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

    Self { base_url: format!("http://{addr}"), state }
  }

  pub fn recorded(&self) -> Recorded { self.state.lock().unwrap().recorded.clone() }

  /// Status returned by subsequent like/dislike calls.
  pub fn set_react_status(&self, status: StatusCode) {
    self.state.lock().unwrap().react_status = status;
  }
}

/// A candidate document as the service returns it.
pub fn candidate_json(id: &str, name: &str) -> Value {
  json!({
    "_id": id,
    "name": name,
    "user": name.to_lowercase(),
    "bio": format!("{name} writes Rust."),
    "avatar": format!("https://avatars.example/{id}.png"),
    "likes": [],
    "dislikes": [],
  })
}

fn user_header(headers: &HeaderMap) -> Option<String> {
  headers
    .get("user")
    .and_then(|v| v.to_str().ok())
    .map(str::to_owned)
}

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
  let mut s = state.lock().unwrap();
  let username = body["username"].as_str().unwrap_or_default().to_string();
  s.recorded.registrations.push(username.clone());
  Json(json!({ "_id": s.register_id, "user": username }))
}

async fn list(State(state): State<Shared>, headers: HeaderMap) -> Json<Value> {
  let mut s = state.lock().unwrap();
  s.recorded.list_users.push(user_header(&headers));
  Json(Value::Array(s.candidates.clone()))
}

async fn react(
  State(state): State<Shared>,
  Path(_id): Path<String>,
  OriginalUri(uri): OriginalUri,
  headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
  let mut s = state.lock().unwrap();
  s.recorded
    .reactions
    .push((uri.path().to_string(), user_header(&headers)));
  (s.react_status, Json(json!({})))
}
