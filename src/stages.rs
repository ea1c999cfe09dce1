//! Versioned document-rewrite stages.
//!
//! Each stage is a pure in-place transform of the whole document, named by
//! the schema version it produces. The dispatcher applies them strictly in
//! increasing-version order; a stage never needs to re-validate what an
//! earlier stage produced.

use serde_json::{Value, json};

pub mod extract;
pub mod remap;
pub mod v2_1;
pub mod v2_2;
pub mod v2_4;
pub mod v3_0;

/// Leading `major.minor` of the document's `version` string. Unparseable or
/// missing versions sort below everything.
pub(crate) fn doc_version(doc: &Value) -> (u64, u64) {
    let Some(s) = doc.get("version").and_then(Value::as_str) else {
        return (0, 0);
    };
    let mut parts = s.split(['.', '-']);
    let major = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    let minor = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    (major, minor)
}

pub(crate) fn version_lt(doc: &Value, major: u64, minor: u64) -> bool {
    doc_version(doc) < (major, minor)
}

/// Advances the version string, never regressing it.
pub(crate) fn set_version_at_least(doc: &mut Value, major: u64, minor: u64) {
    if version_lt(doc, major, minor)
        && let Some(root) = doc.as_object_mut()
    {
        root.insert("version".into(), json!(format!("{major}.{minor}")));
    }
}

/// Visits every item of every composition (the pre-3.0 item location).
pub(crate) fn for_each_item(doc: &mut Value, mut f: impl FnMut(&mut Value)) {
    let Some(comps) = doc.get_mut("compositions").and_then(Value::as_array_mut) else {
        return;
    };
    for comp in comps {
        let Some(items) = comp.get_mut("items").and_then(Value::as_array_mut) else {
            continue;
        };
        for item in items {
            f(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_parsing_handles_both_families() {
        assert_eq!(doc_version(&json!({"version": "2.4"})), (2, 4));
        assert_eq!(doc_version(&json!({"version": "0.1.47"})), (0, 1));
        assert_eq!(doc_version(&json!({"version": "1.3.2-beta.1"})), (1, 3));
        assert_eq!(doc_version(&json!({})), (0, 0));
    }

    #[test]
    fn set_version_never_regresses() {
        let mut doc = json!({"version": "2.4"});
        set_version_at_least(&mut doc, 2, 1);
        assert_eq!(doc["version"], json!("2.4"));
        set_version_at_least(&mut doc, 3, 0);
        assert_eq!(doc["version"], json!("3.0"));
    }
}
