//! Upload orchestration: composes detection, reconciliation and the API
//! client into one publication run.
//!
//! Sequencing matters and is part of the contract: resolve a pending edit
//! first, reconcile previews against the right baseline (the pending edit's
//! previews when one exists, the published asset's otherwise), print the
//! payload, and only then post. The payload is always printed before the POST
//! so a failure after construction is diagnosable from the output.

use serde_json::{json, Value};
use tracing::{error, info};

use crate::api::AssetLibrary;
use crate::config::Config;
use crate::error::Result;
use crate::previews::{reconcile, Preview};

#[derive(Debug, Clone, Copy, Default)]
pub struct UploadOptions {
    /// Actually POST. Off by default: a run is a dry run that prints the
    /// payload and stops after the read-only lookups.
    pub do_upload: bool,
    /// Include the reconciled previews in the payload. Off by default;
    /// reconciliation still runs so the dry-run print shows its result.
    pub send_previews: bool,
}

/// One publication run against the library.
pub async fn upload<A: AssetLibrary>(
    api: &A,
    config: &Config,
    options: UploadOptions,
) -> Result<Value> {
    let version = config.project_version.clone().unwrap_or_default();

    let edit_id = api
        .pending_version_edit(&config.asset_id, &version)
        .await?;
    if let Some(edit_id) = edit_id {
        info!(edit_id, version = %version, "Pending edit found, amending it");
        println!(
            "Detected pending edit {edit_id} for version {version}.\n\
             Modifying it instead of creating a new one."
        );
    }

    let resource = match edit_id {
        Some(edit_id) => format!("asset/edit/{edit_id}"),
        None => format!("asset/{}", config.asset_id),
    };

    let published = match edit_id {
        Some(edit_id) => api.asset_edit_previews(edit_id).await?,
        None => api.asset_previews(&config.asset_id).await?,
    };

    let previews = reconcile(&config.previews, &published, &config.raw_url());
    info!(actions = previews.len(), "Preview reconciliation computed");

    let payload = build_payload(config, &version, previews, options.send_previews)?;

    println!(
        "POST DATA to {}{}:\n{}",
        api.base_url(),
        resource,
        pretty(&payload)
    );

    if !options.do_upload {
        println!("NOTHING DONE, DRY RUN");
        println!("Check the output and use --do option to actually upload");
        return Ok(payload);
    }

    let result = match api.post_resource(&resource, &payload).await {
        Ok(result) => result,
        Err(e) => {
            // Payload was already printed above; just surface the failure.
            error!(error = %e, resource = %resource, "Upload failed");
            return Err(e);
        }
    };
    println!("RESULT:\n{}", pretty(&result));
    if let Some(url) = result.get("url").and_then(Value::as_str) {
        println!("Check at {}/{}", api.base_url(), url);
    }
    Ok(result)
}

/// Builds the POST body the library expects. The session token is injected by
/// the API client, not here.
fn build_payload(
    config: &Config,
    version: &str,
    previews: Vec<Preview>,
    send_previews: bool,
) -> Result<Value> {
    // Previews are disabled by default until the API accepts them reliably;
    // reconciliation output is still shown in the dry-run print.
    let previews: Vec<Preview> = if send_previews { previews } else { Vec::new() };
    Ok(json!({
        "title": config.project_name.clone().unwrap_or_default(),
        "description": config.description()?,
        "category_id": config.category,
        "godot_version": config.godot_version.clone().unwrap_or_default(),
        "version_string": version,
        "cost": config.project_license,
        "download_provider": config.repo_hosting.name(),
        "download_commit": config.git_hash,
        "download_hash": "", // deprecated by the API, always empty
        "browse_url": config.browse_url(),
        "issues_url": config.issues_url(),
        "icon_url": config.icon_url(),
        "previews": previews,
    }))
}

fn pretty(value: &Value) -> String {
    serde_yaml::to_string(value).unwrap_or_else(|_| value.to_string())
}
