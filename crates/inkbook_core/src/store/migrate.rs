//! Document format migration chain.
//!
//! # Responsibility
//! - Register format upgrades in strictly increasing order.
//! - Upgrade a raw JSON document to the current version before decoding.
//!
//! # Invariants
//! - Each step is a pure `Value -> Value` transform targeting one version.
//! - A document newer than the latest known version is rejected, never
//!   guessed at.

use crate::model::document::FORMAT_VERSION;
use crate::store::{StoreError, StoreResult};
use chrono::Utc;
use log::info;
use serde_json::{json, Value};

struct Migration {
    /// Version the document has after this step runs.
    target: u32,
    apply: fn(Value) -> Result<Value, String>,
}

const MIGRATIONS: &[Migration] = &[Migration {
    target: 2,
    apply: migrate_v1_to_v2,
}];

/// Latest format version the chain can produce.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(FORMAT_VERSION, |step| step.target)
}

/// Upgrades `document` to the current format version.
///
/// A missing `version` field is treated as version 1 (the first shipped
/// format predates the field being mandatory).
pub fn apply_migrations(mut document: Value) -> StoreResult<Value> {
    let mut version = document
        .get("version")
        .and_then(Value::as_u64)
        .map_or(1, |value| value as u32);

    if version > latest_version() {
        return Err(StoreError::UnsupportedVersion {
            found: version,
            latest_supported: latest_version(),
        });
    }

    for step in MIGRATIONS {
        if version >= step.target {
            continue;
        }
        document = (step.apply)(document)
            .map_err(|details| StoreError::Migration { version: step.target, details })?;
        document["version"] = json!(step.target);
        info!(
            "event=doc_migrate module=store status=ok from={} to={}",
            version, step.target
        );
        version = step.target;
    }

    Ok(document)
}

/// v1 -> v2: adds the `metadata` block and lifts legacy plain-string text
/// content into the segment run model.
fn migrate_v1_to_v2(mut document: Value) -> Result<Value, String> {
    let root = document
        .as_object_mut()
        .ok_or_else(|| "document root is not an object".to_string())?;

    if !root.contains_key("metadata") {
        let stamp = Utc::now();
        root.insert(
            "metadata".to_string(),
            json!({
                "created": stamp,
                "modified": stamp,
                "app_version": env!("CARGO_PKG_VERSION"),
                "min_compatible_version": 1,
            }),
        );
    }

    if root.get("pages").is_some_and(|pages| !pages.is_array()) {
        return Err("`pages` is not an array".to_string());
    }

    if let Some(Value::Array(pages)) = root.get_mut("pages") {
        for page in pages.iter_mut() {
            let Some(textboxes) = page.get_mut("textboxes").and_then(Value::as_array_mut)
            else {
                continue;
            };
            for textbox in textboxes.iter_mut() {
                let Some(entry) = textbox.get_mut("text") else {
                    continue;
                };
                if let Value::String(content) = entry {
                    let content = std::mem::take(content);
                    let segments = if content.is_empty() {
                        json!([])
                    } else {
                        json!([{ "text": content, "tags": [] }])
                    };
                    *entry = json!({ "content": content, "segments": segments });
                }
            }
        }
    }

    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::{apply_migrations, latest_version};
    use crate::store::StoreError;
    use serde_json::json;

    #[test]
    fn v1_plain_text_becomes_single_untagged_segment() {
        let v1 = json!({
            "version": 1,
            "pages": [{
                "page_number": 0,
                "name": "Page 1",
                "is_left_page": true,
                "textboxes": [{
                    "id": "3f6c0f44-6f1e-4c6e-9b6e-5a4f1dfe0b51",
                    "type": "text_widget",
                    "x": 10, "y": 10, "width": 200, "height": 100,
                    "text": "legacy body",
                    "properties": { "page_color": "#c1a273" }
                }],
                "images": []
            }]
        });

        let migrated = apply_migrations(v1).unwrap();
        assert_eq!(migrated["version"], latest_version());
        assert!(migrated["metadata"]["created"].is_string());
        let text = &migrated["pages"][0]["textboxes"][0]["text"];
        assert_eq!(text["content"], "legacy body");
        assert_eq!(text["segments"][0]["text"], "legacy body");
        assert_eq!(text["segments"][0]["tags"], json!([]));
    }

    #[test]
    fn missing_version_field_is_treated_as_v1() {
        let migrated = apply_migrations(json!({ "pages": [] })).unwrap();
        assert_eq!(migrated["version"], latest_version());
        assert!(migrated["metadata"].is_object());
    }

    #[test]
    fn current_version_passes_through_unchanged() {
        let current = json!({ "version": latest_version(), "metadata": {}, "pages": [] });
        let migrated = apply_migrations(current.clone()).unwrap();
        assert_eq!(migrated, current);
    }

    #[test]
    fn newer_version_is_rejected() {
        let err = apply_migrations(json!({ "version": 99, "pages": [] })).unwrap_err();
        assert!(matches!(
            err,
            StoreError::UnsupportedVersion { found: 99, .. }
        ));
    }
}
