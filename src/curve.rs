//! Hermite to cubic-Bezier keyframe conversion.
//!
//! Legacy curves store per-key Hermite tangents `[time, value, in, out]`.
//! The canonical schema stores cubic Bezier keyframes instead. Conversion
//! must preserve the endpoint values exactly and keep the visual shape.

use serde_json::{Value, json};

use crate::schema::keyframe_type;

/// One parsed Hermite keyframe: `[time, value, in_tangent, out_tangent]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HermiteKey {
    pub time: f64,
    pub value: f64,
    pub in_tangent: f64,
    pub out_tangent: f64,
}

impl HermiteKey {
    pub fn from_value(v: &Value) -> Option<Self> {
        let arr = v.as_array()?;
        if arr.len() < 4 {
            return None;
        }
        Some(Self {
            time: arr[0].as_f64()?,
            value: arr[1].as_f64()?,
            in_tangent: arr[2].as_f64()?,
            out_tangent: arr[3].as_f64()?,
        })
    }
}

pub fn parse_hermite_keys(data: &Value) -> Option<Vec<HermiteKey>> {
    data.as_array()?.iter().map(HermiteKey::from_value).collect()
}

/// Converts a Hermite keyframe sequence into tagged Bezier keyframes.
///
/// Output keyframe layout:
/// - first key:    `[EASE_OUT, [x, y, cx_out, cy_out]]`
/// - interior key: `[EASE, [cx_in, cy_in, x, y, cx_out, cy_out]]`
/// - last key:     `[EASE_IN, [cx_in, cy_in, x, y]]`
///
/// Tangents are scaled by the overall value range and the segment's time
/// delta; control points sit at one third of the segment from either end.
/// A degenerate segment (equal times) contributes no control points, so the
/// keyframes around it carry only their `(x, y)` pair on that side.
pub fn hermite_to_bezier(keys: &[HermiteKey]) -> Value {
    if keys.is_empty() {
        return json!([]);
    }
    if keys.len() == 1 {
        let k = keys[0];
        return json!([[keyframe_type::HOLD, [k.time, k.value]]]);
    }

    let ymax = keys.iter().map(|k| k.value).fold(f64::MIN, f64::max);
    let ymin = keys.iter().map(|k| k.value).fold(f64::MAX, f64::min);
    let range = ymax - ymin;

    // Per segment: the outgoing control of keys[i] and incoming of keys[i+1].
    let mut out_cp: Vec<Option<(f64, f64)>> = vec![None; keys.len()];
    let mut in_cp: Vec<Option<(f64, f64)>> = vec![None; keys.len()];

    for i in 0..keys.len() - 1 {
        let a = keys[i];
        let b = keys[i + 1];
        let dx = b.time - a.time;
        if dx == 0.0 {
            continue;
        }
        let third = dx / 3.0;
        out_cp[i] = Some((a.time + third, a.value + third * a.out_tangent * range));
        in_cp[i + 1] = Some((b.time - third, b.value - third * b.in_tangent * range));
    }

    let mut out = Vec::with_capacity(keys.len());
    for (i, k) in keys.iter().enumerate() {
        let kind = if i == 0 {
            keyframe_type::EASE_OUT
        } else if i == keys.len() - 1 {
            keyframe_type::EASE_IN
        } else {
            keyframe_type::EASE
        };

        let mut data = Vec::new();
        if i > 0 {
            if let Some((cx, cy)) = in_cp[i] {
                data.push(cx);
                data.push(cy);
            }
        }
        data.push(k.time);
        data.push(k.value);
        if i < keys.len() - 1 {
            if let Some((cx, cy)) = out_cp[i] {
                data.push(cx);
                data.push(cy);
            }
        }

        out.push(json!([kind, data]));
    }

    Value::Array(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys(raw: &[[f64; 4]]) -> Vec<HermiteKey> {
        raw.iter()
            .map(|k| HermiteKey {
                time: k[0],
                value: k[1],
                in_tangent: k[2],
                out_tangent: k[3],
            })
            .collect()
    }

    #[test]
    fn endpoints_are_preserved_exactly() {
        let ks = keys(&[
            [0.0, 1.0, 0.0, 2.0],
            [0.5, 3.0, 1.0, -1.0],
            [1.0, 0.5, 0.5, 0.0],
        ]);
        let out = hermite_to_bezier(&ks);
        let out = out.as_array().unwrap();
        assert_eq!(out.len(), 3);

        let first = out[0].as_array().unwrap();
        assert_eq!(first[0], json!(keyframe_type::EASE_OUT));
        let d = first[1].as_array().unwrap();
        assert_eq!(d[0].as_f64().unwrap(), 0.0);
        assert_eq!(d[1].as_f64().unwrap(), 1.0);

        let mid = out[1].as_array().unwrap();
        assert_eq!(mid[0], json!(keyframe_type::EASE));
        // interior: [cx_in, cy_in, x, y, cx_out, cy_out]
        let d = mid[1].as_array().unwrap();
        assert_eq!(d.len(), 6);
        assert_eq!(d[2].as_f64().unwrap(), 0.5);
        assert_eq!(d[3].as_f64().unwrap(), 3.0);

        let last = out[2].as_array().unwrap();
        assert_eq!(last[0], json!(keyframe_type::EASE_IN));
        let d = last[1].as_array().unwrap();
        assert_eq!(d[d.len() - 2].as_f64().unwrap(), 1.0);
        assert_eq!(d[d.len() - 1].as_f64().unwrap(), 0.5);
    }

    #[test]
    fn control_points_sit_at_segment_thirds() {
        let ks = keys(&[[0.0, 0.0, 0.0, 0.0], [3.0, 9.0, 0.0, 0.0]]);
        let out = hermite_to_bezier(&ks);
        let out = out.as_array().unwrap();

        let first = out[0].as_array().unwrap()[1].as_array().unwrap();
        // zero tangent: control y equals the key value
        assert_eq!(first[2].as_f64().unwrap(), 1.0);
        assert_eq!(first[3].as_f64().unwrap(), 0.0);

        let last = out[1].as_array().unwrap()[1].as_array().unwrap();
        assert_eq!(last[0].as_f64().unwrap(), 2.0);
        assert_eq!(last[1].as_f64().unwrap(), 9.0);
    }

    #[test]
    fn tangents_scale_with_value_range() {
        let ks = keys(&[[0.0, 0.0, 0.0, 1.0], [1.0, 10.0, 0.0, 0.0]]);
        let out = hermite_to_bezier(&ks);
        let first = out.as_array().unwrap()[0].as_array().unwrap()[1]
            .as_array()
            .unwrap();
        // range 10, dx/3 = 1/3, out tangent 1 => cy = 0 + (1/3)*1*10
        assert!((first[3].as_f64().unwrap() - 10.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_segment_passes_through_without_control_points() {
        let ks = keys(&[[0.0, 0.0, 0.0, 5.0], [0.0, 2.0, 5.0, 0.0]]);
        let out = hermite_to_bezier(&ks);
        let out = out.as_array().unwrap();
        let first = out[0].as_array().unwrap()[1].as_array().unwrap();
        let last = out[1].as_array().unwrap()[1].as_array().unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(last.len(), 2);
    }

    #[test]
    fn single_key_holds() {
        let ks = keys(&[[0.25, 7.0, 0.0, 0.0]]);
        let out = hermite_to_bezier(&ks);
        assert_eq!(out, json!([[keyframe_type::HOLD, [0.25, 7.0]]]));
    }

    #[test]
    fn parse_rejects_short_tuples() {
        assert!(parse_hermite_keys(&json!([[0.0, 1.0, 0.0]])).is_none());
        assert!(parse_hermite_keys(&json!([[0.0, 1.0, 0.0, 0.0]])).is_some());
    }
}
