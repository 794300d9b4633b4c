//! Preview reconciliation: turns the declarative preview list from the config
//! into the sequence of insert/update/delete actions the Asset Library API
//! expects, by diffing against the previews currently published.
//!
//! Previews are loosely-typed records ([`Preview`]) so that fields this tool
//! does not know about travel through to the API untouched. Matching uses the
//! `link` field as identity, never the server-assigned `preview_id`.
//!
//! All functions here are pure: they take previews in and return new previews,
//! with no I/O, which keeps them trivially testable and keeps [`enhance`]
//! idempotent.

use serde_json::{json, Map, Value};

/// A preview record as declared in config or returned by the API.
/// Unknown keys are preserved as-is.
pub type Preview = Map<String, Value>;

/// Expands shorthand keys into canonical `type`/`link`/`thumbnail` fields.
///
/// Supported shorthands:
/// - `youtube: <id>` → video link plus the maxresdefault thumbnail
/// - `repoimage: <relpath>` → image served from the repository raw URL
/// - `repothumb: <relpath>` → thumbnail served from the repository raw URL
///
/// The shorthands are independent and composable. Re-running on an already
/// expanded preview is a no-op since the shorthand keys no longer exist.
pub fn enhance(preview: &Preview, repo_raw: &str) -> Preview {
    let mut result = preview.clone();
    if let Some(Value::String(youtube_id)) = result.remove("youtube") {
        result.insert("type".into(), json!("video"));
        result.insert(
            "link".into(),
            json!(format!("https://www.youtube.com/watch?v={youtube_id}")),
        );
        result.insert(
            "thumbnail".into(),
            json!(format!(
                "https://img.youtube.com/vi/{youtube_id}/maxresdefault.jpg"
            )),
        );
    }
    if let Some(Value::String(repoimage)) = result.remove("repoimage") {
        result.insert("type".into(), json!("image"));
        result.insert("link".into(), json!(format!("{repo_raw}/{repoimage}")));
    }
    if let Some(Value::String(repothumb)) = result.remove("repothumb") {
        result.insert("thumbnail".into(), json!(format!("{repo_raw}/{repothumb}")));
    }
    result
}

/// Assigns an operation to a single desired preview by scanning the published
/// previews, in their given order, for one with the same `link`.
///
/// A preview already carrying an explicit `operation` is passed through
/// unchanged: the user has specified the action manually and no `enabled`
/// flag is added. Otherwise the first link match yields an `update` against
/// that entry's `preview_id`; no match yields an `insert`.
///
/// Matched entries are not consumed: two desired previews with the same link
/// will both update the same published entry. Link uniqueness is assumed from
/// the remote data, not enforced here.
pub fn action(preview: &Preview, published: &[Preview]) -> Preview {
    if preview.contains_key("operation") {
        return preview.clone();
    }

    let mut result = preview.clone();
    if let Some(link) = preview.get("link") {
        for old in published {
            if old.get("link") != Some(link) {
                continue;
            }
            result.insert(
                "edit_preview_id".into(),
                old.get("preview_id").cloned().unwrap_or(Value::Null),
            );
            result.insert("operation".into(), json!("update"));
            result.insert("enabled".into(), json!(true));
            return result;
        }
    }

    result.insert("operation".into(), json!("insert"));
    result.insert("enabled".into(), json!(true));
    result
}

/// Emits a delete action for every published preview whose `link` appears in
/// none of the desired previews, preserving the published order.
pub fn deletions(desired: &[Preview], published: &[Preview]) -> Vec<Preview> {
    published
        .iter()
        .filter(|old| {
            desired
                .iter()
                .all(|preview| preview.get("link") != old.get("link"))
        })
        .map(|old| {
            let mut delete = Preview::new();
            delete.insert(
                "edit_preview_id".into(),
                old.get("preview_id").cloned().unwrap_or(Value::Null),
            );
            delete.insert("operation".into(), json!("delete"));
            delete.insert("enabled".into(), json!(true));
            delete
        })
        .collect()
}

/// Full reconciliation: expansion, then per-preview action assignment in
/// desired order, then the deletion sweep in published order.
///
/// The output order is load-bearing: the server applies the actions as given.
pub fn reconcile(desired: &[Preview], published: &[Preview], repo_raw: &str) -> Vec<Preview> {
    let expanded: Vec<Preview> = desired.iter().map(|p| enhance(p, repo_raw)).collect();
    let mut actions: Vec<Preview> = expanded.iter().map(|p| action(p, published)).collect();
    actions.extend(deletions(&expanded, published));
    actions
}
