//! 2.1: legacy null layers that destroyed themselves now freeze instead.
//!
//! Idempotent, so it carries no version guard.

use serde_json::{Value, json};

use super::{for_each_item, set_version_at_least};
use crate::schema::{ItemType, end_behavior};

pub fn run(doc: &mut Value) {
    for_each_item(doc, |item| {
        if ItemType::of(item) == Some(ItemType::Null)
            && item.get("endBehavior").and_then(Value::as_i64) == Some(end_behavior::DESTROY)
        {
            item["endBehavior"] = json!(end_behavior::FREEZE);
        }
    });
    set_version_at_least(doc, 2, 1);
}
