//! 2.2: compatibility patch for mesh/light end behaviors.
//!
//! Runs before version detection trusts the field, so it guards on the
//! version itself and deliberately leaves the version string alone.

use serde_json::{Value, json};

use super::{for_each_item, version_lt};
use crate::schema::{ItemType, end_behavior};

pub fn run(doc: &mut Value) {
    if !version_lt(doc, 2, 2) {
        return;
    }
    for_each_item(doc, |item| {
        if matches!(ItemType::of(item), Some(ItemType::Mesh | ItemType::Light))
            && item.get("endBehavior").and_then(Value::as_i64) == Some(1)
        {
            item["endBehavior"] = json!(end_behavior::DESTROY);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_and_light_legacy_one_maps_to_destroy() {
        let mut doc = json!({
            "version": "2.1",
            "compositions": [{"items": [
                {"type": "mesh", "endBehavior": 1},
                {"type": "light", "endBehavior": 1},
                {"type": "mesh", "endBehavior": 5},
                {"type": "1", "endBehavior": 1}
            ]}]
        });
        run(&mut doc);
        let items = doc["compositions"][0]["items"].as_array().unwrap();
        assert_eq!(items[0]["endBehavior"], json!(end_behavior::DESTROY));
        assert_eq!(items[1]["endBehavior"], json!(end_behavior::DESTROY));
        assert_eq!(items[2]["endBehavior"], json!(5));
        // non-mesh items keep their value
        assert_eq!(items[3]["endBehavior"], json!(1));
        // a compatibility patch, not a version bump
        assert_eq!(doc["version"], json!("2.1"));
    }

    #[test]
    fn guarded_above_2_2() {
        let mut doc = json!({
            "version": "2.2",
            "compositions": [{"items": [{"type": "mesh", "endBehavior": 1}]}]
        });
        run(&mut doc);
        assert_eq!(
            doc["compositions"][0]["items"][0]["endBehavior"],
            json!(1)
        );
    }
}
