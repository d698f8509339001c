//! Fake Google Drive + Sheets API server for integration tests.
//!
//! Spins up a minimal `axum` HTTP server on a random TCP port bound to
//! 127.0.0.1. Serves the three calls the mirror makes:
//! - `GET  /drive/files?q=name = '<name>' …`: lookup by name
//! - `POST /sheets/spreadsheets`: create
//! - `POST /sheets/spreadsheets/{id}/values/{range}`: append rows
//!
//! It also plays the OAuth token endpoint (`POST /oauth2/token`): a JWT
//! bearer grant is answered with the API's token, so service-account
//! credentials pointed at [`FakeSheetsApi::token_uri`] mint a usable token.
//!
//! Every request must carry `Authorization: Bearer <token>`; anything else
//! gets a 401. Failure modes can be injected per endpoint.
//!
//! # Example
//!
//! ```rust,ignore
//! let api = FakeSheetsApi::start("test-token").await.unwrap();
//! api.add_sheet("HospitalQALog").await;
//! // Point the client at api.drive_base() / api.sheets_base()
//! ```

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

#[derive(Default)]
struct ApiState {
    token: String,
    /// name → id
    sheets: HashMap<String, String>,
    /// id → rows appended so far
    rows: HashMap<String, Vec<Vec<String>>>,
    lookup_status: Option<u16>,
    append_status: Option<u16>,
    creates: usize,
    token_grants: Vec<String>,
}

/// Handle to the running fake API server.
pub struct FakeSheetsApi {
    addr: SocketAddr,
    state: Arc<Mutex<ApiState>>,
}

impl FakeSheetsApi {
    pub async fn start(token: &str) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(Mutex::new(ApiState {
            token: token.to_string(),
            ..Default::default()
        }));

        let app = Router::new()
            .route("/oauth2/token", post(grant_token))
            .route("/drive/files", get(find_files))
            .route("/sheets/spreadsheets", post(create_sheet))
            .route("/sheets/spreadsheets/{id}/values/{range}", post(append_values))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self { addr, state })
    }

    pub fn drive_base(&self) -> String {
        format!("http://{}/drive", self.addr)
    }

    pub fn sheets_base(&self) -> String {
        format!("http://{}/sheets", self.addr)
    }

    pub fn token_uri(&self) -> String {
        format!("http://{}/oauth2/token", self.addr)
    }

    /// Form bodies of every token request received so far.
    pub async fn token_grants(&self) -> Vec<String> {
        self.state.lock().await.token_grants.clone()
    }

    /// Pre-create a sheet so the lookup finds it. Returns its id.
    pub async fn add_sheet(&self, name: &str) -> String {
        let mut state = self.state.lock().await;
        let id = format!("existing-{}", state.sheets.len() + 1);
        state.sheets.insert(name.to_string(), id.clone());
        state.rows.insert(id.clone(), Vec::new());
        id
    }

    pub async fn fail_lookup_with(&self, status: u16) {
        self.state.lock().await.lookup_status = Some(status);
    }

    pub async fn fail_appends_with(&self, status: u16) {
        self.state.lock().await.append_status = Some(status);
    }

    pub async fn rows(&self, id: &str) -> Vec<Vec<String>> {
        self.state
            .lock()
            .await
            .rows
            .get(id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn sheet_id(&self, name: &str) -> Option<String> {
        self.state.lock().await.sheets.get(name).cloned()
    }

    pub async fn creates(&self) -> usize {
        self.state.lock().await.creates
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

fn authorised(state: &ApiState, headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", state.token))
        .unwrap_or(false)
}

fn status_error(status: u16) -> Response {
    let code = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (code, Json(json!({ "error": { "code": status } }))).into_response()
}

/// Pull `<name>` out of `name = '<name>' and …`, undoing `\'` escapes.
fn name_from_query(q: &str) -> Option<String> {
    let rest = q.strip_prefix("name = '")?;
    let mut out = String::new();
    let mut chars = rest.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push(chars.next()?),
            '\'' => return Some(out),
            other => out.push(other),
        }
    }
    None
}

async fn grant_token(State(state): State<Arc<Mutex<ApiState>>>, body: String) -> Response {
    let mut state = state.lock().await;
    let is_jwt_grant = body.contains("jwt-bearer") && body.contains("assertion=");
    state.token_grants.push(body);
    if !is_jwt_grant {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "unsupported_grant_type" })),
        )
            .into_response();
    }
    Json(json!({
        "access_token": state.token,
        "token_type": "Bearer",
        "expires_in": 3600,
    }))
    .into_response()
}

async fn find_files(
    State(state): State<Arc<Mutex<ApiState>>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let state = state.lock().await;
    if !authorised(&state, &headers) {
        return status_error(401);
    }
    if let Some(status) = state.lookup_status {
        return status_error(status);
    }
    let files: Vec<Value> = params
        .get("q")
        .and_then(|q| name_from_query(q))
        .and_then(|name| state.sheets.get(&name).map(|id| (name, id.clone())))
        .map(|(name, id)| vec![json!({ "id": id, "name": name })])
        .unwrap_or_default();
    Json(json!({ "files": files })).into_response()
}

async fn create_sheet(
    State(state): State<Arc<Mutex<ApiState>>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().await;
    if !authorised(&state, &headers) {
        return status_error(401);
    }
    let Some(title) = body["properties"]["title"].as_str().map(str::to_string) else {
        return status_error(400);
    };
    state.creates += 1;
    let id = format!("created-{}", state.creates);
    state.sheets.insert(title, id.clone());
    state.rows.insert(id.clone(), Vec::new());
    Json(json!({ "spreadsheetId": id })).into_response()
}

async fn append_values(
    State(state): State<Arc<Mutex<ApiState>>>,
    headers: HeaderMap,
    Path((id, range)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().await;
    if !authorised(&state, &headers) {
        return status_error(401);
    }
    if let Some(status) = state.append_status {
        return status_error(status);
    }
    if range != "A1:append" {
        return status_error(400);
    }
    let Some(rows) = state.rows.get_mut(&id) else {
        return status_error(404);
    };
    for row in body["values"].as_array().cloned().unwrap_or_default() {
        let cells = row
            .as_array()
            .map(|cells| {
                cells
                    .iter()
                    .map(|c| c.as_str().unwrap_or_default().to_string())
                    .collect()
            })
            .unwrap_or_default();
        rows.push(cells);
    }
    Json(json!({ "updates": { "updatedRows": 1 } })).into_response()
}
