//! Content builder for v0 interactive-region ("ui") payloads.
//!
//! The region's width/height become the item transform scale (handled by the
//! dispatcher); everything else folds into the option variant.

use serde_json::{Map, Value, json};

pub fn build_content(payload: &Value) -> Value {
    let mut options = payload
        .get("options")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_else(Map::new);

    // click/drag/message variant selector may sit beside options in v0
    if !options.contains_key("type")
        && let Some(t) = payload.get("type")
    {
        options.insert("type".into(), t.clone());
    }

    options.remove("width");
    options.remove("height");
    options.remove("duration");
    options.remove("looping");
    options.remove("endBehavior");
    options.remove("renderLevel");

    json!({ "options": options })
}
