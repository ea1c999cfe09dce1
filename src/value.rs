//! Value/Expression Normalizer.
//!
//! Canonicalizes every legacy spelling of an animatable value into the
//! `[kind, payload]` tagged form of the target schema. These are pure
//! functions over `serde_json::Value`; unknown shapes pass through unchanged
//! so newer documents survive older tooling.

use serde_json::{Value, json};
use tracing::debug;

use crate::curve;
use crate::schema::{canonical_value_tag, value_type};

fn tagged_pair(v: &Value) -> Option<(&Value, &Value)> {
    let arr = v.as_array()?;
    if arr.len() == 2 {
        Some((&arr[0], &arr[1]))
    } else {
        None
    }
}

/// Canonicalizes a value that must resolve to a fixed (non-random) number.
pub fn ensure_fixed_number(v: &Value) -> Value {
    if v.is_number() {
        return json!([value_type::CONSTANT, v]);
    }

    if let Some((tag, data)) = tagged_pair(v) {
        match canonical_value_tag(tag) {
            Some(value_type::CONSTANT) => return json!([value_type::CONSTANT, data]),
            Some(value_type::LINE) => {
                if tag.is_string() {
                    // legacy 'lines': keep the line keyframes as-is
                    return json!([value_type::LINE, data]);
                }
                // already-normalized LINE keyframes: promote to a Bezier
                // curve whose keys are all line segments
                if let Some(points) = data.as_array() {
                    let keys: Vec<Value> = points
                        .iter()
                        .map(|p| json!([crate::schema::keyframe_type::LINE, p]))
                        .collect();
                    return json!([value_type::BEZIER_CURVE, keys]);
                }
            }
            Some(value_type::CURVE) => {
                if let Some(keys) = curve::parse_hermite_keys(data) {
                    return json!([value_type::BEZIER_CURVE, curve::hermite_to_bezier(&keys)]);
                }
            }
            _ => {}
        }
    }

    debug!(value = %v, "unrecognized numeric value shape, passing through");
    v.clone()
}

/// Like [`ensure_fixed_number`], but a random range collapses to one of its
/// endpoints, selected by `index`.
pub fn ensure_fixed_number_with_random(v: &Value, index: usize) -> Value {
    if let Some((tag, data)) = tagged_pair(v)
        && canonical_value_tag(tag) == Some(value_type::RANDOM)
        && let Some(values) = data.as_array()
        && let Some(picked) = values.get(index)
    {
        return json!([value_type::CONSTANT, picked]);
    }
    ensure_fixed_number(v)
}

/// Canonicalizes a numeric value that may stay random.
pub fn ensure_number_expression(v: &Value) -> Value {
    if let Some((tag, data)) = tagged_pair(v)
        && canonical_value_tag(tag) == Some(value_type::RANDOM)
    {
        return json!([value_type::RANDOM, data]);
    }
    ensure_fixed_number(v)
}

/// Canonicalizes a color-valued expression.
pub fn ensure_color_expression(v: &Value, normalized: bool) -> Value {
    if let Some((tag, data)) = tagged_pair(v) {
        match canonical_value_tag(tag) {
            Some(value_type::COLORS) => {
                if let Some(colors) = data.as_array() {
                    let converted: Vec<Value> =
                        colors.iter().map(|c| color_to_arr(c, normalized)).collect();
                    return json!([value_type::COLORS, converted]);
                }
            }
            Some(value_type::GRADIENT_COLOR) => {
                return json!([
                    value_type::GRADIENT_COLOR,
                    normalize_gradient(data, normalized)
                ]);
            }
            Some(value_type::RGBA_COLOR) => {
                return json!([value_type::RGBA_COLOR, color_to_arr(data, normalized)]);
            }
            _ => {}
        }
    }

    debug!(value = %v, "unrecognized color value shape, passing through");
    v.clone()
}

/// Canonicalizes a 3D value: literal vectors become constants, path forms
/// become Bezier curve paths.
pub fn ensure_fixed_vec3(v: &Value) -> Value {
    if let Some(arr) = v.as_array() {
        if arr.len() == 3 && arr.iter().all(Value::is_number) {
            return json!([value_type::CONSTANT_VEC3, v]);
        }

        if arr.len() == 2
            && let Some(kind) = canonical_value_tag(&arr[0])
            && (kind == value_type::LINEAR_PATH || kind == value_type::BEZIER_PATH)
            && let Some(payload) = arr[1].as_array()
            && payload.len() >= 2
        {
            let easing = bezier_easing(&payload[0]);
            let points = payload[1].clone();
            let control_points = if let Some(cps) = payload.get(2) {
                cps.clone()
            } else {
                synthesize_linear_control_points(&points)
            };
            return json!([
                value_type::BEZIER_CURVE_PATH,
                [easing, points, control_points]
            ]);
        }
    }

    debug!(value = %v, "unrecognized vec3 value shape, passing through");
    v.clone()
}

/// A linear path has no stored control points; each segment's controls are
/// its own endpoints, so every interior point appears twice.
fn synthesize_linear_control_points(points: &Value) -> Value {
    let Some(pts) = points.as_array() else {
        return json!([]);
    };
    let mut cps = Vec::new();
    for pair in pts.windows(2) {
        cps.push(pair[0].clone());
        cps.push(pair[1].clone());
    }
    Value::Array(cps)
}

/// Path easing keys may still be Hermite tuples; convert them, leaving
/// already-converted tagged keyframes alone.
fn bezier_easing(easing: &Value) -> Value {
    if let Some(keys) = curve::parse_hermite_keys(easing) {
        curve::hermite_to_bezier(&keys)
    } else {
        easing.clone()
    }
}

/// Parses any accepted color spelling into `[r, g, b, a]`.
///
/// Accepted: `rgba(r,g,b[,a])` / `rgb(r,g,b)` strings, 3- or 6-digit hex
/// with optional `#`, and numeric tuples. Color channels are 0..255; an
/// alpha, in whichever spelling carries one, travels in 0..1 and is scaled
/// by 255 and rounded (default opaque). With `normalized` every channel is
/// divided by 255 and rounded to 6 decimals.
pub fn color_to_arr(v: &Value, normalized: bool) -> Value {
    let rgba = parse_color(v).unwrap_or([0.0, 0.0, 0.0, 255.0]);
    if normalized {
        Value::Array(rgba.iter().map(|c| json!(round6(c / 255.0))).collect())
    } else {
        Value::Array(rgba.iter().map(|c| json!(c)).collect())
    }
}

/// Divides each channel of a 0..255 color by 255, rounded to 6 decimals.
pub fn normalize_color(rgba: [f64; 4]) -> [f64; 4] {
    rgba.map(|c| round6(c / 255.0))
}

fn round6(x: f64) -> f64 {
    (x * 1e6).round() / 1e6
}

fn parse_color(v: &Value) -> Option<[f64; 4]> {
    match v {
        Value::String(s) => parse_color_str(s),
        Value::Array(arr) if arr.len() >= 3 => {
            let r = arr[0].as_f64()?;
            let g = arr[1].as_f64()?;
            let b = arr[2].as_f64()?;
            let a = arr
                .get(3)
                .and_then(Value::as_f64)
                .map_or(255.0, |a| (a * 255.0).round());
            Some([r, g, b, a])
        }
        _ => None,
    }
}

fn parse_color_str(s: &str) -> Option<[f64; 4]> {
    let s = s.trim();

    if let Some(inner) = s
        .strip_prefix("rgba(")
        .or_else(|| s.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() < 3 {
            return None;
        }
        let r = parts[0].parse::<f64>().ok()?;
        let g = parts[1].parse::<f64>().ok()?;
        let b = parts[2].parse::<f64>().ok()?;
        // anything unparseable means opaque
        let a = match parts.get(3).map(|p| p.parse::<f64>()) {
            Some(Ok(a)) => (a * 255.0).round(),
            _ => 255.0,
        };
        return Some([r, g, b, a]);
    }

    let hex = s.strip_prefix('#').unwrap_or(s);
    let digit = |c: char| c.to_digit(16).map(f64::from);
    let chars: Vec<char> = hex.chars().collect();
    match chars.len() {
        3 => {
            let mut out = [0.0; 4];
            for i in 0..3 {
                let d = digit(chars[i])?;
                out[i] = d * 16.0 + d;
            }
            out[3] = 255.0;
            Some(out)
        }
        6 => {
            let mut out = [0.0; 4];
            for i in 0..3 {
                out[i] = digit(chars[i * 2])? * 16.0 + digit(chars[i * 2 + 1])?;
            }
            out[3] = 255.0;
            Some(out)
        }
        _ => None,
    }
}

/// Normalizes gradient stops into `[position, r, g, b, a]` rows sorted
/// ascending by position. Accepts the legacy map form
/// `{"0.0": color, ...}` and list forms of either `[pos, color]` pairs or
/// pre-flattened 5-number rows.
pub fn normalize_gradient(data: &Value, normalized: bool) -> Value {
    let mut stops: Vec<(f64, [f64; 4])> = Vec::new();

    match data {
        Value::Object(map) => {
            for (pos, color) in map {
                if let (Ok(p), Some(c)) = (pos.parse::<f64>(), parse_color(color)) {
                    stops.push((p, c));
                }
            }
        }
        Value::Array(rows) => {
            for row in rows {
                let Some(entry) = row.as_array() else {
                    continue;
                };
                if entry.len() == 5 && entry.iter().all(Value::is_number) {
                    let nums: Vec<f64> = entry.iter().filter_map(Value::as_f64).collect();
                    stops.push((nums[0], [nums[1], nums[2], nums[3], nums[4]]));
                } else if entry.len() == 2
                    && let Some(p) = entry[0].as_f64()
                    && let Some(c) = parse_color(&entry[1])
                {
                    stops.push((p, c));
                }
            }
        }
        _ => {}
    }

    stops.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let rows: Vec<Value> = stops
        .into_iter()
        .map(|(p, c)| {
            let c = if normalized { normalize_color(c) } else { c };
            json!([p, c[0], c[1], c[2], c[3]])
        })
        .collect();
    Value::Array(rows)
}
