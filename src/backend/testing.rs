//! In-process stand-in for the hosted table's REST gateway.

use std::collections::HashMap;
use std::net::TcpListener as StdTcpListener;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::runtime::Runtime;

pub const FAKE_KEY: &str = "service-key";

type Table = Arc<Mutex<HashMap<String, Value>>>;

pub struct FakeTableStore {
    pub url: String,
    table: Table,
    _runtime: Runtime
}

impl FakeTableStore {
    pub fn start() -> FakeTableStore {
        let table: Table = Arc::new(Mutex::new(HashMap::new()));
        let app = Router::new()
            .route("/rest/v1/ledgers", get(select).post(upsert))
            .with_state(table.clone());

        let listener = StdTcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let runtime = Runtime::new().unwrap();
        runtime.spawn(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, app).await.unwrap();
        });

        FakeTableStore { url, table, _runtime: runtime }
    }

    pub fn row(&self, username: &str) -> Option<Value> {
        self.table.lock().unwrap().get(username).cloned()
    }

    pub fn row_count(&self) -> usize {
        self.table.lock().unwrap().len()
    }
}

/// A URL nothing listens on.
pub fn unreachable_url() -> String {
    let listener = StdTcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn authorized(headers: &HeaderMap) -> bool {
    let apikey = headers.get("apikey").and_then(|v| v.to_str().ok());
    let bearer = headers.get("authorization").and_then(|v| v.to_str().ok());
    apikey == Some(FAKE_KEY) && bearer == Some(format!("Bearer {}", FAKE_KEY).as_str())
}

async fn select(
    State(table): State<Table>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>
) -> Response {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "invalid api key").into_response();
    }
    let username = match params.get("username").and_then(|filter| filter.strip_prefix("eq.")) {
        Some(username) => username.to_owned(),
        None => return (StatusCode::BAD_REQUEST, "missing filter").into_response()
    };
    if params.get("select").map(String::as_str) != Some("data") {
        return (StatusCode::BAD_REQUEST, "unexpected select").into_response();
    }

    let rows: Vec<Value> = table.lock().unwrap()
        .get(&username)
        .map(|data| vec![json!({"data": data})])
        .unwrap_or_default();
    Json(rows).into_response()
}

async fn upsert(
    State(table): State<Table>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
    Json(rows): Json<Vec<Value>>
) -> Response {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "invalid api key").into_response();
    }
    let merges = headers.get("prefer")
        .and_then(|v| v.to_str().ok())
        .map_or(false, |prefer| prefer.contains("resolution=merge-duplicates"));
    if !merges || params.get("on_conflict").map(String::as_str) != Some("username") {
        return (StatusCode::CONFLICT, "duplicate key value violates unique constraint").into_response();
    }

    let mut table = table.lock().unwrap();
    for row in rows {
        match (row.get("username").and_then(Value::as_str), row.get("data")) {
            (Some(username), Some(data)) => {
                table.insert(username.to_owned(), data.clone());
            },
            _ => return (StatusCode::BAD_REQUEST, "malformed row").into_response()
        }
    }
    StatusCode::CREATED.into_response()
}
