//! Content builder for v0 camera payloads (`model` with `options.type == 1`).

use serde_json::{Value, json};

use super::{convert_keys, with_group};
use crate::value::{ensure_fixed_number, ensure_fixed_vec3};

pub fn build_content(payload: &Value) -> Value {
    let mut content = payload.clone();
    if !content.is_object() {
        return json!({});
    }

    with_group(&mut content, "options", |options| {
        convert_keys(options, &["fov", "far", "near"], ensure_fixed_number);
        if let Some(map) = options.as_object_mut() {
            // the camera marker itself
            map.remove("type");
            map.remove("looping");
            map.remove("duration");
            map.remove("endBehavior");
            map.remove("renderLevel");
        }
    });

    with_group(&mut content, "positionOverLifetime", |group| {
        convert_keys(
            group,
            &["linearX", "linearY", "linearZ", "speedOverLifetime"],
            ensure_fixed_number,
        );
        convert_keys(group, &["path"], ensure_fixed_vec3);
    });

    with_group(&mut content, "rotationOverLifetime", |group| {
        convert_keys(group, &["x", "y", "z"], ensure_fixed_number);
    });

    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::value_type;

    #[test]
    fn camera_options_are_animatable() {
        let payload = json!({
            "options": {
                "type": 1,
                "fov": 60,
                "far": ["lines", [[0, 100], [1, 200]]],
                "near": 0.1,
                "clipMode": 0
            },
            "rotationOverLifetime": {"x": ["static", 10.0]}
        });
        let content = build_content(&payload);
        assert_eq!(content["options"]["fov"], json!([value_type::CONSTANT, 60]));
        assert_eq!(content["options"]["far"][0], json!(value_type::LINE));
        assert_eq!(content["options"]["clipMode"], json!(0));
        assert!(content["options"].get("type").is_none());
        assert_eq!(
            content["rotationOverLifetime"]["x"],
            json!([value_type::CONSTANT, 10.0])
        );
    }
}
