//! Access to the Godot Asset Library JSON API.
//!
//! [`AssetLibrary`] is the seam the orchestrator works against; it is
//! annotated for `mockall` so the upload flow can be exercised in tests with
//! no network. [`HttpApi`] is the real reqwest-backed client: it logs in once,
//! keeps the session token and injects it into every POST body as the API
//! requires.
//!
//! Every response body is echoed to stdout before interpretation, so a failed
//! run can be diagnosed from its output alone.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::error::{Error, Result};
use crate::previews::Preview;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

pub const DEFAULT_BASE: &str = "https://godotengine.org/asset-library/api/";

/// Read and write operations the upload flow needs from the library API.
///
/// Calls are synchronous from the flow's point of view: one at a time, no
/// retries, a failure surfaces immediately.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait AssetLibrary: Send + Sync {
    /// Base URL, for reporting which endpoint a payload goes to.
    fn base_url(&self) -> String;

    /// Id of the latest pending (unapproved) edit for this asset and version,
    /// if any. Among candidates whose version string matches exactly, the
    /// maximum edit id is taken as the most recent.
    async fn pending_version_edit(
        &self,
        asset_id: &str,
        version_string: &str,
    ) -> Result<Option<i64>>;

    /// Previews currently published on the asset.
    async fn asset_previews(&self, asset_id: &str) -> Result<Vec<Preview>>;

    /// Previews carried by a pending edit.
    async fn asset_edit_previews(&self, edit_id: i64) -> Result<Vec<Preview>>;

    /// Posts the final payload to `asset/{id}` or `asset/edit/{id}`.
    async fn post_resource(&self, resource: &str, payload: &Value) -> Result<Value>;
}

/// Reqwest-backed client for the production API.
pub struct HttpApi {
    client: reqwest::Client,
    base: String,
    token: Option<String>,
}

impl HttpApi {
    pub fn new(base: Option<String>) -> HttpApi {
        HttpApi {
            client: reqwest::Client::new(),
            base: base.unwrap_or_else(|| DEFAULT_BASE.to_string()),
            token: None,
        }
    }

    /// Opens a session; the returned token authenticates later POSTs.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        info!(username, "Logging into the Asset Library");
        let response = self
            .post(
                "login",
                json!({"username": username, "password": password}),
            )
            .await?;
        let token = response
            .get("token")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Http {
                status: 200,
                body: format!("login response carried no token: {response}"),
            })?;
        self.token = Some(token.to_string());
        Ok(())
    }

    async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<Value> {
        let url = format!("{}{}", self.base, path);
        let response = self.client.get(&url).query(params).send().await?;
        process_response(response).await
    }

    async fn post(&self, path: &str, mut body: Value) -> Result<Value> {
        if let (Some(token), Some(object)) = (&self.token, body.as_object_mut()) {
            object.insert("token".into(), json!(token));
        }
        let url = format!("{}{}", self.base, path);
        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json; charset=utf-8")
            .json(&body)
            .send()
            .await?;
        process_response(response).await
    }
}

/// Echoes the body, then turns non-2xx or unparseable responses into
/// [`Error::Http`] carrying the body verbatim.
async fn process_response(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let body = response.text().await?;
    println!("{body}");
    if !status.is_success() {
        error!(status = status.as_u16(), "Asset Library request failed");
        return Err(Error::Http {
            status: status.as_u16(),
            body,
        });
    }
    serde_json::from_str(&body).map_err(|e| {
        error!(error = %e, "Asset Library response was not JSON");
        Error::Http {
            status: status.as_u16(),
            body,
        }
    })
}

fn previews_of(response: &Value) -> Vec<Preview> {
    response
        .get("previews")
        .and_then(Value::as_array)
        .map(|previews| {
            previews
                .iter()
                .filter_map(Value::as_object)
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl AssetLibrary for HttpApi {
    fn base_url(&self) -> String {
        self.base.clone()
    }

    async fn pending_version_edit(
        &self,
        asset_id: &str,
        version_string: &str,
    ) -> Result<Option<i64>> {
        info!(asset_id, version_string, "Looking up pending edits");
        let response = self
            .get(
                "asset/edit",
                &[
                    ("asset", asset_id),
                    ("status", "new"),
                    ("version_string", version_string),
                ],
            )
            .await?;
        let edit_id = response
            .get("result")
            .and_then(Value::as_array)
            .map(|edits| {
                edits
                    .iter()
                    .filter(|edit| {
                        edit.get("version_string").and_then(Value::as_str) == Some(version_string)
                    })
                    .filter_map(|edit| edit.get("edit_id").and_then(Value::as_i64))
                    .max()
            })
            .unwrap_or(None);
        Ok(edit_id)
    }

    async fn asset_previews(&self, asset_id: &str) -> Result<Vec<Preview>> {
        let response = self.get(&format!("asset/{asset_id}"), &[]).await?;
        Ok(previews_of(&response))
    }

    async fn asset_edit_previews(&self, edit_id: i64) -> Result<Vec<Preview>> {
        let response = self.get(&format!("asset/edit/{edit_id}"), &[]).await?;
        Ok(previews_of(&response))
    }

    async fn post_resource(&self, resource: &str, payload: &Value) -> Result<Value> {
        info!(resource, "Posting asset payload");
        self.post(resource, payload.clone()).await
    }
}
