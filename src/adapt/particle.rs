//! Content builder for v0 particle payloads.

use serde_json::{Value, json};

use super::{convert_keys, with_group};
use crate::value::{
    ensure_color_expression, ensure_fixed_number, ensure_fixed_vec3, ensure_number_expression,
};

pub fn build_content(payload: &Value) -> Value {
    let mut content = payload.clone();
    if !content.is_object() {
        return json!({});
    }

    with_group(&mut content, "options", |options| {
        convert_keys(
            options,
            &[
                "startLifetime",
                "startSpeed",
                "startDelay",
                "startSize",
                "sizeAspect",
                "startSizeX",
                "startSizeY",
                "startRotation",
                "startRotationX",
                "startRotationY",
                "startRotationZ",
            ],
            ensure_number_expression,
        );
        convert_keys(options, &["gravityModifier"], ensure_fixed_number);
        // particle colors stay in 0..255 space
        convert_keys(options, &["startColor"], |v| {
            ensure_color_expression(v, false)
        });
        if let Some(map) = options.as_object_mut() {
            map.remove("looping");
            map.remove("duration");
            map.remove("endBehavior");
            map.remove("renderLevel");
        }
    });

    with_group(&mut content, "emission", |emission| {
        convert_keys(emission, &["rateOverTime"], ensure_number_expression);
    });

    with_group(&mut content, "sizeOverLifetime", |group| {
        convert_keys(group, &["x", "y", "z", "size"], ensure_fixed_number);
    });

    with_group(&mut content, "rotationOverLifetime", |group| {
        convert_keys(group, &["x", "y", "z"], ensure_fixed_number);
    });

    with_group(&mut content, "positionOverLifetime", |group| {
        convert_keys(
            group,
            &[
                "linearX",
                "linearY",
                "linearZ",
                "orbitalX",
                "orbitalY",
                "orbitalZ",
                "speedOverLifetime",
                "gravityOverLifetime",
            ],
            ensure_fixed_number,
        );
        convert_keys(group, &["path"], ensure_fixed_vec3);
    });

    with_group(&mut content, "colorOverLifetime", |group| {
        convert_keys(group, &["opacity"], ensure_fixed_number);
        convert_keys(group, &["color"], |v| ensure_color_expression(v, false));
    });

    with_group(&mut content, "textureSheetAnimation", |group| {
        convert_keys(
            group,
            &["animationDuration", "animationDelay"],
            ensure_fixed_number,
        );
    });

    with_group(&mut content, "trails", |trails| {
        convert_keys(
            trails,
            &["lifetime", "widthOverTrail", "opacityOverLifetime"],
            ensure_fixed_number,
        );
        convert_keys(trails, &["colorOverTrail", "colorOverLifetime"], |v| {
            ensure_color_expression(v, false)
        });
    });

    content
}
