//! Google Drive + Sheets REST client.
//!
//! - lookup: `GET {drive}/files?q=name = '<name>' and mimeType = … and trashed = false`
//! - create: `POST {sheets}/spreadsheets`
//! - append: `POST {sheets}/spreadsheets/{id}/values/A1:append` (first worksheet)
//!
//! Base URLs are configurable so tests can point the client at a local fake.

use crate::credentials::TokenSource;
use crate::mirror::SheetService;
use crate::MirrorError;
use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

#[derive(Clone)]
pub struct GoogleSheetsClient {
    http: reqwest::Client,
    tokens: Arc<dyn TokenSource>,
    drive_base: String,
    sheets_base: String,
}

impl std::fmt::Debug for GoogleSheetsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleSheetsClient")
            .field("drive_base", &self.drive_base)
            .field("sheets_base", &self.sheets_base)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedSpreadsheet {
    spreadsheet_id: String,
}

impl GoogleSheetsClient {
    pub fn new(
        tokens: Arc<dyn TokenSource>,
        drive_base: impl Into<String>,
        sheets_base: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, MirrorError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            tokens,
            drive_base: trim_base(drive_base.into()),
            sheets_base: trim_base(sheets_base.into()),
        })
    }
}

#[async_trait]
impl SheetService for GoogleSheetsClient {
    async fn find_by_name(&self, name: &str) -> Result<Option<String>, MirrorError> {
        let query = format!(
            "name = '{}' and mimeType = '{SPREADSHEET_MIME}' and trashed = false",
            escape_query_literal(name)
        );
        let token = self.tokens.access_token().await?;
        let resp = self
            .http
            .get(format!("{}/files", self.drive_base))
            .bearer_auth(&token)
            .query(&[("q", query.as_str()), ("fields", "files(id,name)")])
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let list: FileList = checked(resp)
            .await?
            .json()
            .await
            .map_err(|e| MirrorError::Malformed(e.to_string()))?;
        Ok(list.files.into_iter().next().map(|f| f.id))
    }

    async fn create(&self, name: &str) -> Result<String, MirrorError> {
        let token = self.tokens.access_token().await?;
        let resp = self
            .http
            .post(format!("{}/spreadsheets", self.sheets_base))
            .bearer_auth(&token)
            .json(&json!({ "properties": { "title": name } }))
            .send()
            .await?;
        let created: CreatedSpreadsheet = checked(resp)
            .await?
            .json()
            .await
            .map_err(|e| MirrorError::Malformed(e.to_string()))?;
        Ok(created.spreadsheet_id)
    }

    async fn append_row(&self, sheet_id: &str, row: &[String]) -> Result<(), MirrorError> {
        let token = self.tokens.access_token().await?;
        let resp = self
            .http
            .post(format!(
                "{}/spreadsheets/{sheet_id}/values/A1:append",
                self.sheets_base
            ))
            .bearer_auth(&token)
            .query(&[("valueInputOption", "RAW"), ("insertDataOption", "INSERT_ROWS")])
            .json(&json!({ "values": [row] }))
            .send()
            .await?;
        checked(resp).await?;
        Ok(())
    }
}

/// Pass successful responses through; turn everything else into a typed
/// error, keeping auth failures distinct.
async fn checked(resp: Response) -> Result<Response, MirrorError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => MirrorError::Auth {
            status: status.as_u16(),
            body,
        },
        _ => MirrorError::Api {
            status: status.as_u16(),
            body,
        },
    })
}

fn escape_query_literal(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}

fn trim_base(mut base: String) -> String {
    while base.ends_with('/') {
        base.pop();
    }
    base
}
