//! Migration entry point and version dispatcher.
//!
//! Inspects the document's `version` string and routes it through the legacy
//! adapter and/or the versioned stages, strictly in increasing-version order.
//! All per-invocation state travels in [`MigrationContext`], so independent
//! documents can migrate concurrently.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::adapt;
use crate::error::{MigrateError, MigrateResult};
use crate::stages::{v2_1, v2_2, v2_4, v3_0};

/// Unversioned ("v0") documents carry a semver-like string, optionally with
/// a prerelease suffix.
static V0_FAMILY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.(\d+)\.(\d+)(-\w+\.\d+)?$").expect("v0 version pattern"));

/// Versioned documents carry a bare `major.minor`.
static STANDARD_FAMILY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.(\d+)$").expect("standard version pattern"));

/// Immutable per-invocation migration state.
#[derive(Clone, Debug)]
pub struct MigrationContext {
    /// v0 documents with major version 0 stored particle rotations with the
    /// opposite sign; the adapter negates them back.
    pub reverse_particle: bool,
    /// The version string the document arrived with.
    pub source_version: String,
}

/// Migrates a scene document, in place, to the canonical "3.0" schema.
///
/// Documents already at 3.0 or later are returned unchanged. Fails with
/// [`MigrateError::UnsupportedVersion`] for unrecognized version strings and
/// [`MigrateError::InvalidInput`] for structurally implausible documents;
/// the input must then be considered unmigrated.
#[tracing::instrument(skip(doc), level = "debug")]
pub fn migrate_scene(doc: &mut Value) -> MigrateResult<()> {
    let root = doc
        .as_object()
        .ok_or_else(|| MigrateError::invalid_input("document must be a JSON object"))?;

    let version = root
        .get("version")
        .and_then(Value::as_str)
        // unversioned documents predate the version field entirely
        .unwrap_or("0.0.0")
        .to_owned();

    if !root.get("compositions").is_some_and(Value::is_array) {
        return Err(MigrateError::invalid_input(
            "document has no compositions array",
        ));
    }

    // compatibility patch, applied before the version field is trusted
    v2_2::run(doc);

    if let Some(caps) = V0_FAMILY.captures(&version) {
        let major: u64 = caps[1].parse().map_err(anyhow::Error::from)?;
        let ctx = MigrationContext {
            reverse_particle: major == 0,
            source_version: version.clone(),
        };
        debug!(version, reverse_particle = ctx.reverse_particle, "v0 family");

        require_array(doc, "images")?;
        adapt::run_legacy_adapter(doc, &ctx)?;
        v2_1::run(doc);
        v3_0::run(doc)?;
        return Ok(());
    }

    if let Some(caps) = STANDARD_FAMILY.captures(&version) {
        let major: u64 = caps[1].parse().map_err(anyhow::Error::from)?;
        let minor: u64 = caps[2].parse().map_err(anyhow::Error::from)?;
        debug!(version, "standard family");

        if major >= 3 {
            require_array(doc, "items")?;
            return Ok(());
        }

        require_array(doc, "images")?;
        if major < 2 || (major == 2 && minor < 4) {
            v2_4::run(doc);
        }
        v2_1::run(doc);
        v3_0::run(doc)?;
        return Ok(());
    }

    Err(MigrateError::unsupported_version(version))
}

fn require_array(doc: &Value, key: &str) -> MigrateResult<()> {
    if doc.get(key).is_some_and(Value::is_array) {
        Ok(())
    } else {
        Err(MigrateError::invalid_input(format!(
            "document has no {key} array"
        )))
    }
}
