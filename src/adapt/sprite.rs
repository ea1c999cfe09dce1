//! Content builder for v0 sprite and null ("cal") payloads.
//!
//! Null layers share the sprite content shape minus anything a renderer
//! would consume, so both kinds run through the same builder.

use serde_json::{Value, json};

use super::{convert_keys, with_group};
use crate::value::{
    ensure_color_expression, ensure_fixed_number, ensure_fixed_number_with_random,
    ensure_fixed_vec3,
};

pub fn build_content(payload: &Value) -> Value {
    let mut content = payload.clone();
    if !content.is_object() {
        return json!({});
    }

    with_group(&mut content, "options", |options| {
        // sprite colors live in normalized 0..1 space
        convert_keys(options, &["startColor"], |v| ensure_color_expression(v, true));
        // kind-marker keys carry no meaning past classification
        if let Some(map) = options.as_object_mut() {
            map.remove("looping");
            map.remove("duration");
            map.remove("endBehavior");
            map.remove("renderLevel");
            map.remove("width");
            map.remove("height");
        }
    });

    with_group(&mut content, "positionOverLifetime", |group| {
        convert_keys(
            group,
            &["linearX", "linearY", "linearZ", "speedOverLifetime", "gravityOverLifetime"],
            ensure_fixed_number,
        );
        convert_keys(group, &["path"], ensure_fixed_vec3);
    });

    with_group(&mut content, "rotationOverLifetime", |group| {
        convert_keys(group, &["x", "y", "z"], ensure_fixed_number);
    });

    with_group(&mut content, "sizeOverLifetime", |group| {
        // a sprite has no emitter to sample a random range, so it collapses
        // deterministically per axis
        convert_keys(group, &["x", "size"], |v| {
            ensure_fixed_number_with_random(v, 0)
        });
        convert_keys(group, &["y"], |v| ensure_fixed_number_with_random(v, 1));
        convert_keys(group, &["z"], ensure_fixed_number);
    });

    with_group(&mut content, "colorOverLifetime", |group| {
        convert_keys(group, &["opacity"], ensure_fixed_number);
        convert_keys(group, &["color"], |v| ensure_color_expression(v, true));
    });

    with_group(&mut content, "textureSheetAnimation", |group| {
        convert_keys(
            group,
            &["animationDuration", "animationDelay"],
            ensure_fixed_number,
        );
    });

    content
}
