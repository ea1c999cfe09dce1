//! 2.4: renormalizes animatable values that older documents still store in
//! pre-normalizer spellings.
//!
//! A field is rewritten when its name is on the animatable allow-list AND its
//! value has the tagged shape `[x, [...]]`. The allow-list replaces the old
//! purely shape-based sniffing, which could misfire on unrelated two-element
//! arrays. Recursion descends into object-valued fields only.

use serde_json::Value;

use super::{for_each_item, set_version_at_least, version_lt};
use crate::value::{ensure_fixed_number, ensure_fixed_vec3};

const ANIMATABLE_FIELDS: &[&str] = &[
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
    "gravityModifier",
    "gravityOverLifetime",
    "rateOverTime",
    "linearX",
    "linearY",
    "linearZ",
    "orbitalX",
    "orbitalY",
    "orbitalZ",
    "speedOverLifetime",
    "x",
    "y",
    "z",
    "size",
    "opacity",
    "fov",
    "far",
    "near",
    "lifetime",
    "widthOverTrail",
    "opacityOverLifetime",
    "animationDuration",
    "animationDelay",
    "strength",
];

pub fn run(doc: &mut Value) {
    if !version_lt(doc, 2, 4) {
        return;
    }
    for_each_item(doc, |item| {
        if let Some(content) = item.get_mut("content") {
            convert_content(content);
        }
    });
    set_version_at_least(doc, 2, 4);
}

fn convert_content(v: &mut Value) {
    let Some(map) = v.as_object_mut() else {
        return;
    };
    for (key, val) in map.iter_mut() {
        if is_tagged_value_shape(val) {
            if key == "path" {
                *val = ensure_fixed_vec3(val);
            } else if ANIMATABLE_FIELDS.contains(&key.as_str()) {
                *val = ensure_fixed_number(val);
            }
        } else if val.is_object() {
            convert_content(val);
        }
    }
}

fn is_tagged_value_shape(v: &Value) -> bool {
    v.as_array()
        .is_some_and(|arr| arr.len() == 2 && arr[1].is_array())
}
