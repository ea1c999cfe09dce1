//! Legacy (pre-versioned, "v0") entity adapters.
//!
//! A v0 item does not carry a `type` tag; its kind is implied by which of a
//! fixed set of mutually exclusive payload keys is present. The adapter
//! classifies each item once into [`LegacyKind`], builds the versioned item
//! shape around the kind-specific content builder, and rewrites the whole
//! document into the first versioned schema.

use serde_json::{Map, Value, json};
use tracing::debug;

use crate::error::{MigrateError, MigrateResult};
use crate::math;
use crate::migrate::MigrationContext;
use crate::schema::ItemType;

pub(crate) mod camera;
pub(crate) mod interact;
pub(crate) mod particle;
pub(crate) mod plugin;
pub(crate) mod sprite;

/// Item kind of a v0 record, decided once at classification time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LegacyKind {
    Particle,
    Sprite,
    Null,
    Interact,
    Camera,
    Plugin,
}

impl LegacyKind {
    /// Classifies a v0 item by its payload key. `model` payloads are cameras
    /// only when `options.type == 1`; other models ride the plugin path.
    pub fn classify(item: &Value) -> Option<(Self, &'static str)> {
        if item.get("particle").is_some() {
            return Some((Self::Particle, "particle"));
        }
        if item.get("sprite").is_some() {
            return Some((Self::Sprite, "sprite"));
        }
        if item.get("cal").is_some() {
            return Some((Self::Null, "cal"));
        }
        if item.get("ui").is_some() {
            return Some((Self::Interact, "ui"));
        }
        if let Some(model) = item.get("model") {
            let kind = model
                .get("options")
                .and_then(|o| o.get("type"))
                .and_then(Value::as_i64);
            if kind == Some(1) {
                return Some((Self::Camera, "model"));
            }
            return Some((Self::Plugin, "model"));
        }
        if item.get("content").is_some() {
            return Some((Self::Plugin, "content"));
        }
        None
    }

    pub fn item_type(self) -> ItemType {
        match self {
            Self::Particle => ItemType::Particle,
            Self::Sprite => ItemType::Sprite,
            Self::Null => ItemType::Null,
            Self::Interact => ItemType::Interact,
            Self::Camera => ItemType::Camera,
            Self::Plugin => ItemType::Plugin,
        }
    }
}

/// Rewrites a whole v0 document into the first versioned schema.
pub fn run_legacy_adapter(doc: &mut Value, ctx: &MigrationContext) -> MigrateResult<()> {
    let root = doc
        .as_object_mut()
        .ok_or_else(|| MigrateError::invalid_input("document must be a JSON object"))?;

    let mut requires: Vec<String> = root
        .get("requires")
        .and_then(Value::as_array)
        .map(|a| {
            a.iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default();
    // When the document already declares a plugin-name table, plugin items
    // reference it by index; otherwise they carry the name inline.
    let mut plugins: Option<Vec<String>> = root.get("plugins").and_then(Value::as_array).map(|a| {
        a.iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect()
    });

    let comps = root
        .get_mut("compositions")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| MigrateError::invalid_input("document has no compositions array"))?;

    for comp in comps.iter_mut() {
        let Some(items) = comp.get_mut("items").and_then(Value::as_array_mut) else {
            continue;
        };
        for item in items.iter_mut() {
            *item = convert_item(item, ctx, &mut requires, &mut plugins)?;
        }
    }

    if !requires.is_empty() {
        root.insert("requires".into(), json!(requires));
    }
    if let Some(plugins) = plugins {
        root.insert("plugins".into(), json!(plugins));
    }
    root.insert("version".into(), json!("2.0"));
    Ok(())
}

fn convert_item(
    item: &Value,
    ctx: &MigrationContext,
    requires: &mut Vec<String>,
    plugins: &mut Option<Vec<String>>,
) -> MigrateResult<Value> {
    let Some((kind, payload_key)) = LegacyKind::classify(item) else {
        debug!(item = %item, "v0 item with no recognized payload key, kept as-is");
        return Ok(item.clone());
    };
    let payload = &item[payload_key];
    let options = payload.get("options").cloned().unwrap_or(json!({}));

    let mut out = Map::new();
    if let Some(id) = item.get("id") {
        out.insert("id".into(), stringify_id(id));
    }
    for key in ["name", "parentId", "delay", "visible"] {
        if let Some(v) = item.get(key) {
            out.insert(key.into(), v.clone());
        }
    }
    out.insert("type".into(), json!(kind.item_type().as_str()));

    if let Some(duration) = item.get("duration").or_else(|| options.get("duration")) {
        out.insert("duration".into(), duration.clone());
    }
    out.insert(
        "endBehavior".into(),
        json!(derive_end_behavior(item, &options)),
    );
    if let Some(level) = options.get("renderLevel") {
        out.insert("renderLevel".into(), level.clone());
    }

    let mut transform = build_transform(
        item.get("transform"),
        matches!(kind, LegacyKind::Particle) && ctx.reverse_particle,
        matches!(kind, LegacyKind::Particle | LegacyKind::Sprite | LegacyKind::Null),
    );
    if kind == LegacyKind::Interact {
        let w = options.get("width").and_then(Value::as_f64).unwrap_or(1.0);
        let h = options.get("height").and_then(Value::as_f64).unwrap_or(1.0);
        if let Some(t) = transform.as_object_mut() {
            t.insert("scale".into(), json!([w, h, 1.0]));
        }
    }
    out.insert("transform".into(), transform);

    let mut content = match kind {
        LegacyKind::Particle => particle::build_content(payload),
        LegacyKind::Sprite | LegacyKind::Null => sprite::build_content(payload),
        LegacyKind::Interact => interact::build_content(payload),
        LegacyKind::Camera => camera::build_content(payload),
        LegacyKind::Plugin => plugin::build_content(payload),
    };
    normalize_default_anchor(&mut content, requires);
    out.insert("content".into(), content);

    if kind == LegacyKind::Plugin {
        plugin::assign_plugin_name(&mut out, plugins);
    }

    Ok(Value::Object(out))
}

/// v0 ids may be numeric; versioned ids are always strings.
fn stringify_id(id: &Value) -> Value {
    match id {
        Value::Number(n) => json!(n.to_string()),
        other => other.clone(),
    }
}

/// `options.looping` wins over any explicit `endBehavior`.
fn derive_end_behavior(item: &Value, options: &Value) -> i64 {
    use crate::schema::end_behavior::{DESTROY, LOOP};

    match options.get("looping") {
        Some(Value::Array(arr)) => {
            return if arr.get(1).is_some_and(is_truthy) {
                LOOP
            } else {
                DESTROY
            };
        }
        Some(v) if is_truthy(v) => return LOOP,
        _ => {}
    }

    item.get("endBehavior")
        .or_else(|| options.get("endBehavior"))
        .and_then(Value::as_i64)
        .unwrap_or(DESTROY)
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Extracts the versioned transform from a raw v0 transform.
///
/// Rotation negation applies before the XYZ->ZYX reorder; scale axes fall
/// back to 1 when zero or missing.
fn build_transform(raw: Option<&Value>, inverse_rotation: bool, reorder: bool) -> Value {
    let mut out = Map::new();
    let Some(raw) = raw else {
        return Value::Object(out);
    };

    if let Some(position) = raw.get("position") {
        out.insert("position".into(), position.clone());
    }

    if let Some(rotation) = raw.get("rotation").and_then(as_vec3) {
        let mut rotation = rotation;
        if inverse_rotation {
            rotation = rotation.map(|v| -v);
        }
        if reorder {
            rotation = math::reorder_euler_xyz_to_zyx(rotation);
        }
        out.insert("rotation".into(), json!(rotation));
    }

    if let Some(scale) = raw.get("scale").and_then(Value::as_array) {
        let axis = |i: usize| -> f64 {
            match scale.get(i).and_then(Value::as_f64) {
                Some(v) if v != 0.0 => v,
                _ => 1.0,
            }
        };
        out.insert("scale".into(), json!([axis(0), axis(1), axis(2)]));
    }

    Value::Object(out)
}

/// Applies `f` to each named field of `obj` that is present.
pub(crate) fn convert_keys(obj: &mut Value, keys: &[&str], f: impl Fn(&Value) -> Value) {
    let Some(map) = obj.as_object_mut() else {
        return;
    };
    for key in keys {
        if let Some(v) = map.get(*key) {
            let converted = f(v);
            map.insert((*key).to_string(), converted);
        }
    }
}

/// Applies `f` to the named subobject of `content` when it exists.
pub(crate) fn with_group(content: &mut Value, group: &str, f: impl FnOnce(&mut Value)) {
    if let Some(v) = content.get_mut(group) {
        f(v);
    }
}

fn as_vec3(v: &Value) -> Option<[f64; 3]> {
    let arr = v.as_array()?;
    Some([
        arr.first().and_then(Value::as_f64)?,
        arr.get(1).and_then(Value::as_f64)?,
        arr.get(2).and_then(Value::as_f64)?,
    ])
}

/// An anchor of `[0.5, 0.5]` is the renderer default and is elided; any
/// other anchor value marks the document as requiring anchor support.
fn normalize_default_anchor(content: &mut Value, requires: &mut Vec<String>) {
    let Some(renderer) = content
        .get_mut("renderer")
        .and_then(Value::as_object_mut)
    else {
        return;
    };
    let Some(anchor) = renderer.get("anchor") else {
        return;
    };

    let is_default = anchor
        .as_array()
        .is_some_and(|a| {
            a.len() == 2
                && a[0].as_f64() == Some(0.5)
                && a[1].as_f64() == Some(0.5)
        });
    if is_default {
        renderer.remove("anchor");
    } else if !requires.iter().any(|r| r == "anchor") {
        requires.push("anchor".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> MigrationContext {
        MigrationContext {
            reverse_particle: false,
            source_version: "1.0.0".to_string(),
        }
    }

    #[test]
    fn classify_is_exclusive_and_total_over_known_keys() {
        let item = json!({"particle": {}});
        assert_eq!(
            LegacyKind::classify(&item),
            Some((LegacyKind::Particle, "particle"))
        );
        assert_eq!(
            LegacyKind::classify(&json!({"cal": {}})),
            Some((LegacyKind::Null, "cal"))
        );
        assert_eq!(
            LegacyKind::classify(&json!({"model": {"options": {"type": 1}}})),
            Some((LegacyKind::Camera, "model"))
        );
        assert_eq!(
            LegacyKind::classify(&json!({"model": {"options": {"type": 2}}})),
            Some((LegacyKind::Plugin, "model"))
        );
        assert_eq!(LegacyKind::classify(&json!({"name": "x"})), None);
    }

    #[test]
    fn looping_array_uses_second_slot() {
        use crate::schema::end_behavior::{DESTROY, LOOP};
        let opts = json!({"looping": [0, 1]});
        assert_eq!(derive_end_behavior(&json!({}), &opts), LOOP);
        let opts = json!({"looping": [1, 0]});
        assert_eq!(derive_end_behavior(&json!({}), &opts), DESTROY);
        let opts = json!({"looping": true});
        assert_eq!(derive_end_behavior(&json!({}), &opts), LOOP);
        let opts = json!({});
        assert_eq!(derive_end_behavior(&json!({"endBehavior": 4}), &opts), 4);
        assert_eq!(derive_end_behavior(&json!({}), &json!({"endBehavior": 5})), 5);
        assert_eq!(derive_end_behavior(&json!({}), &opts), DESTROY);
    }

    #[test]
    fn transform_scale_defaults_zero_axes_to_one() {
        let raw = json!({"scale": [2.0, 0.0]});
        let out = build_transform(Some(&raw), false, false);
        assert_eq!(out["scale"], json!([2.0, 1.0, 1.0]));
    }

    #[test]
    fn reverse_particle_negates_rotation() {
        let raw = json!({"rotation": [90.0, 0.0, 0.0]});
        let out = build_transform(Some(&raw), true, true);
        let rot = out["rotation"].as_array().unwrap();
        assert!((rot[0].as_f64().unwrap() + 90.0).abs() < 1e-9);
    }

    #[test]
    fn default_anchor_is_elided() {
        let mut content = json!({"renderer": {"anchor": [0.5, 0.5]}});
        let mut requires = Vec::new();
        normalize_default_anchor(&mut content, &mut requires);
        assert!(content["renderer"].get("anchor").is_none());
        assert!(requires.is_empty());
    }

    #[test]
    fn nondefault_anchor_registers_capability() {
        let mut content = json!({"renderer": {"anchor": [0.0, 1.0]}});
        let mut requires = Vec::new();
        normalize_default_anchor(&mut content, &mut requires);
        assert_eq!(content["renderer"]["anchor"], json!([0.0, 1.0]));
        assert_eq!(requires, vec!["anchor".to_string()]);
    }

    #[test]
    fn interact_scale_comes_from_options() {
        let item = json!({
            "id": 3,
            "name": "hit",
            "ui": {"options": {"type": "click", "width": 4, "height": 2, "duration": 1}}
        });
        let mut requires = Vec::new();
        let out = convert_item(&item, &ctx(), &mut requires, &mut None).unwrap();
        assert_eq!(out["type"], json!("4"));
        assert_eq!(out["id"], json!("3"));
        assert_eq!(out["transform"]["scale"], json!([4.0, 2.0, 1.0]));
    }

    #[test]
    fn duration_prefers_item_over_options() {
        let item = json!({
            "duration": 5,
            "sprite": {"options": {"duration": 9}}
        });
        let out = convert_item(&item, &ctx(), &mut Vec::new(), &mut None).unwrap();
        assert_eq!(out["duration"], json!(5));

        let item = json!({"sprite": {"options": {"duration": 9}}});
        let out = convert_item(&item, &ctx(), &mut Vec::new(), &mut None).unwrap();
        assert_eq!(out["duration"], json!(9));
    }
}
