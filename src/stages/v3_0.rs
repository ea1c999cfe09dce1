//! 3.0: the structural rewrite to the canonical document shape.
//!
//! Re-derives item identity as GUIDs, rewrites every cross-reference,
//! restructures transforms, builds animation tracks, and splits item content
//! into standalone components.

use serde_json::{Map, Value, json};
use tracing::warn;

use super::{extract, remap::GuidMap, set_version_at_least, version_lt};
use crate::error::{MigrateError, MigrateResult};
use crate::guid::new_guid;
use crate::schema::{ItemType, ParticleOrigin, data_type, end_behavior};

pub fn run(doc: &mut Value) -> MigrateResult<()> {
    if !version_lt(doc, 3, 0) {
        return Ok(());
    }

    ensure_textures(doc);
    let texture_ids = collect_texture_ids(doc);

    let root = doc
        .as_object_mut()
        .ok_or_else(|| MigrateError::invalid_input("document must be a JSON object"))?;

    let mut all_items: Vec<Value> = Vec::new();
    let mut components: Vec<Value> = root
        .remove("components")
        .and_then(|v| match v {
            Value::Array(a) => Some(a),
            _ => None,
        })
        .unwrap_or_default();

    let comps = root
        .get_mut("compositions")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| MigrateError::invalid_input("document has no compositions array"))?;

    for comp in comps.iter_mut() {
        normalize_comp_end_behavior(comp);

        let Some(slot) = comp.get_mut("items").and_then(Value::as_array_mut) else {
            continue;
        };
        let mut items = std::mem::take(slot);

        // legacy filter/distortion layers have no 3.0 counterpart
        items.retain(|it| ItemType::of(it) != Some(ItemType::Filter));
        for item in &mut items {
            if ItemType::of(item) == Some(ItemType::Particle)
                && let Some(content) = item.get_mut("content").and_then(Value::as_object_mut)
            {
                content.remove("filter");
            }
        }

        let map = GuidMap::assign(&mut items);
        for item in &mut items {
            map.rewrite_references(item);
            finish_item(item, &texture_ids, &mut components);
        }

        *slot = items
            .iter()
            .map(|it| json!({"id": it["id"]}))
            .collect();
        all_items.append(&mut items);
    }

    let items_slot = root.entry("items").or_insert_with(|| json!([]));
    if let Some(arr) = items_slot.as_array_mut() {
        arr.append(&mut all_items);
    }
    root.insert("components".into(), Value::Array(components));
    for key in ["materials", "shaders", "geometries", "textures", "images"] {
        root.entry(key).or_insert_with(|| json!([]));
    }

    set_version_at_least(doc, 3, 0);
    Ok(())
}

/// Compositions that paused at the end now freeze.
fn normalize_comp_end_behavior(comp: &mut Value) {
    if matches!(
        comp.get("endBehavior").and_then(Value::as_i64),
        Some(end_behavior::PAUSE | end_behavior::PAUSE_AND_DESTROY)
    ) {
        comp["endBehavior"] = json!(end_behavior::FREEZE);
    }
}

/// Backfills one texture descriptor per image when no textures exist, and
/// stamps every descriptor with an id and the Texture data type.
fn ensure_textures(doc: &mut Value) {
    let Some(root) = doc.as_object_mut() else {
        return;
    };

    if root.get("textures").and_then(Value::as_array).is_none() {
        let count = root
            .get("images")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        let backfilled: Vec<Value> = (0..count)
            .map(|i| json!({"source": i, "flipY": true}))
            .collect();
        root.insert("textures".into(), Value::Array(backfilled));
    }

    if let Some(textures) = root.get_mut("textures").and_then(Value::as_array_mut) {
        for tex in textures {
            if tex.get("id").and_then(Value::as_str).is_none() {
                tex["id"] = json!(new_guid());
            }
            tex["dataType"] = json!(data_type::TEXTURE);
        }
    }
}

fn collect_texture_ids(doc: &Value) -> Vec<String> {
    doc.get("textures")
        .and_then(Value::as_array)
        .map(|texs| {
            texs.iter()
                .filter_map(|t| t.get("id").and_then(Value::as_str))
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

/// Post-remap item work: texture references, transform restructure, tracks,
/// and finally component extraction.
fn finish_item(item: &mut Value, texture_ids: &[String], components: &mut Vec<Value>) {
    for path in [
        &["content", "renderer", "texture"][..],
        &["content", "trails", "texture"][..],
    ] {
        reindex_texture(item, path, texture_ids);
    }

    restructure_transform(item);
    build_tracks(item);

    if let Some(component) = extract::extract_component(item) {
        components.push(component);
    }
}

/// Integer texture slots become `{id}` references into the document's
/// texture list.
fn reindex_texture(item: &mut Value, path: &[&str], ids: &[String]) {
    let mut cursor = &mut *item;
    for key in path {
        match cursor.get_mut(*key) {
            Some(next) => cursor = next,
            None => return,
        }
    }
    if let Some(index) = cursor.as_u64() {
        match ids.get(index as usize) {
            Some(id) => *cursor = json!({ "id": id }),
            None => warn!(index, "texture index out of range, reference kept"),
        }
    }
}

fn vec3_or(v: Option<&Value>, default: [f64; 3]) -> [f64; 3] {
    let Some(arr) = v.and_then(Value::as_array) else {
        return default;
    };
    let axis = |i: usize| arr.get(i).and_then(Value::as_f64).unwrap_or(default[i]);
    [axis(0), axis(1), axis(2)]
}

fn xyz(v: [f64; 3]) -> Value {
    json!({"x": v[0], "y": v[1], "z": v[2]})
}

/// Array-form transform becomes the structured record. Sprites split their
/// scale into a `size` and recompute the anchor from the renderer pivot.
fn restructure_transform(item: &mut Value) {
    let kind = ItemType::of(item);
    let raw = item.get("transform").cloned().unwrap_or_else(|| json!({}));

    let mut position = vec3_or(raw.get("position"), [0.0, 0.0, 0.0]);
    let rotation = vec3_or(raw.get("rotation"), [0.0, 0.0, 0.0]);
    let scale = vec3_or(raw.get("scale"), [1.0, 1.0, 1.0]);

    let mut out = Map::new();
    out.insert("eulerHint".into(), xyz(rotation));

    match kind {
        Some(ItemType::Sprite) => {
            let size = [scale[0], scale[1]];
            out.insert("size".into(), json!({"x": size[0], "y": size[1]}));
            out.insert("scale".into(), xyz([1.0, 1.0, 1.0]));

            if let Some((anchor, compensate)) = sprite_anchor(item) {
                out.insert("anchor".into(), json!({"x": anchor.0, "y": anchor.1}));
                if compensate {
                    // pivot moved away from the center: keep the rendered
                    // quad where it was
                    position[0] -= anchor.0 * size[0];
                    position[1] -= anchor.1 * size[1];
                }
            }
        }
        Some(ItemType::Particle) => {
            out.insert("scale".into(), xyz(scale));
            normalize_particle_anchor(item);
        }
        _ => {
            out.insert("scale".into(), xyz(scale));
        }
    }

    out.insert("position".into(), xyz(position));
    item["transform"] = Value::Object(out);
}

/// Sprite pivot from `renderer.anchor` (0..1 space) or the named
/// `renderer.particleOrigin`. The position compensation applies only to the
/// origin path, where the pivot semantics actually changed.
fn sprite_anchor(item: &mut Value) -> Option<((f64, f64), bool)> {
    let renderer = item
        .get_mut("content")
        .and_then(|c| c.get_mut("renderer"))
        .and_then(Value::as_object_mut)?;

    let anchor = renderer.get("anchor").and_then(|a| {
        let arr = a.as_array()?;
        Some((arr.first()?.as_f64()?, arr.get(1)?.as_f64()?))
    });
    let origin = renderer
        .get("particleOrigin")
        .and_then(Value::as_i64)
        .and_then(ParticleOrigin::from_wire);

    renderer.remove("anchor");
    renderer.remove("particleOrigin");

    match (anchor, origin) {
        (Some((ax, ay)), _) => Some(((ax - 0.5, 0.5 - ay), false)),
        (None, Some(origin)) => Some((origin.offset(), true)),
        (None, None) => None,
    }
}

/// Particles keep their anchor inside the content; it is normalized to the
/// same offset space, with no position shift.
fn normalize_particle_anchor(item: &mut Value) {
    let Some(renderer) = item
        .get_mut("content")
        .and_then(|c| c.get_mut("renderer"))
        .and_then(Value::as_object_mut)
    else {
        return;
    };

    let anchor = renderer.get("anchor").and_then(|a| {
        let arr = a.as_array()?;
        Some((arr.first()?.as_f64()?, arr.get(1)?.as_f64()?))
    });
    let origin = renderer
        .get("particleOrigin")
        .and_then(Value::as_i64)
        .and_then(ParticleOrigin::from_wire);

    let offset = match (anchor, origin) {
        (Some((ax, ay)), _) => Some((ax - 0.5, 0.5 - ay)),
        (None, Some(origin)) => Some(origin.offset()),
        (None, None) => None,
    };

    renderer.remove("particleOrigin");
    if let Some((ox, oy)) = offset {
        renderer.insert("anchor".into(), json!([ox, oy]));
    }
}

/// Every non-particle item gets a transform clip, sprites additionally a
/// color clip; over-lifetime groups are mirrored into the clips for the
/// animation runtime. Particles animate through their own system and keep a
/// bare tracks list.
fn build_tracks(item: &mut Value) {
    let kind = ItemType::of(item);
    if kind == Some(ItemType::Particle) {
        item["tracks"] = json!([]);
        return;
    }
    let content = item.get("content").cloned().unwrap_or_else(|| json!({}));

    let mut clips: Vec<Value> = Vec::new();

    let mut clip = Map::new();
    clip.insert("dataType".into(), json!(data_type::TRANSFORM_CLIP));
    for group in [
        "sizeOverLifetime",
        "rotationOverLifetime",
        "positionOverLifetime",
    ] {
        if let Some(v) = content.get(group) {
            clip.insert(group.into(), v.clone());
        }
    }
    clips.push(Value::Object(clip));

    if kind == Some(ItemType::Sprite) {
        let mut clip = Map::new();
        clip.insert("dataType".into(), json!(data_type::SPRITE_COLOR_CLIP));
        if let Some(v) = content.get("colorOverLifetime") {
            clip.insert("colorOverLifetime".into(), v.clone());
        }
        if let Some(v) = content.get("options").and_then(|o| o.get("startColor")) {
            clip.insert("startColor".into(), v.clone());
        }
        clips.push(Value::Object(clip));
    }

    item["tracks"] = json!([{ "clips": clips }]);
}
