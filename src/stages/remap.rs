//! Per-composition identifier remapping.
//!
//! Legacy item ids are arbitrary strings (often stringified integers); the
//! canonical schema wants fresh GUIDs. The map lives only for the duration
//! of the 3.0 stage on one composition.

use std::collections::HashMap;

use serde_json::{Value, json};
use tracing::warn;

use crate::guid::new_guid;

#[derive(Debug, Default)]
pub struct GuidMap {
    map: HashMap<String, String>,
}

impl GuidMap {
    /// Assigns every item a fresh GUID, stashing the old id as `oldId` for
    /// diagnostics, and records old -> new for reference rewriting.
    pub fn assign(items: &mut [Value]) -> Self {
        let mut map = HashMap::new();
        for item in items.iter_mut() {
            let fresh = new_guid();
            if let Some(old) = item.get("id").and_then(Value::as_str).map(str::to_owned) {
                map.insert(old.clone(), fresh.clone());
                item["oldId"] = json!(old);
            }
            item["id"] = json!(fresh);
        }
        Self { map }
    }

    pub fn get(&self, old: &str) -> Option<&str> {
        self.map.get(old).map(String::as_str)
    }

    /// Rewrites a parent reference. A composite `"<id>^<bone>"` keeps its
    /// bone suffix; only the id portion is remapped.
    pub fn remap_parent(&self, parent: &str) -> String {
        let (id, bone) = match parent.split_once('^') {
            Some((id, bone)) => (id, Some(bone)),
            None => (parent, None),
        };
        let Some(new_id) = self.get(id) else {
            warn!(parent, "parentId does not resolve within its composition");
            return parent.to_string();
        };
        match bone {
            Some(bone) => format!("{new_id}^{bone}"),
            None => new_id.to_string(),
        }
    }

    /// Rewrites `parentId` and `content.options.target` on an item, in place.
    pub fn rewrite_references(&self, item: &mut Value) {
        if let Some(parent) = item.get("parentId").and_then(Value::as_str).map(str::to_owned) {
            item["parentId"] = json!(self.remap_parent(&parent));
        }

        if let Some(target) = item
            .get("content")
            .and_then(|c| c.get("options"))
            .and_then(|o| o.get("target"))
        {
            let target = match target {
                Value::Number(n) => n.to_string(),
                Value::String(s) => s.clone(),
                _ => return,
            };
            if let Some(new_id) = self.get(&target) {
                item["content"]["options"]["target"] = json!(new_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_gives_unique_ids_and_keeps_old() {
        let mut items = vec![json!({"id": "a"}), json!({"id": "b"})];
        let map = GuidMap::assign(&mut items);
        let id0 = items[0]["id"].as_str().unwrap();
        let id1 = items[1]["id"].as_str().unwrap();
        assert_ne!(id0, id1);
        assert_eq!(items[0]["oldId"], json!("a"));
        assert_eq!(map.get("a"), Some(id0));
        assert_eq!(map.get("b"), Some(id1));
    }

    #[test]
    fn bone_suffix_is_preserved() {
        let mut items = vec![json!({"id": "rig"})];
        let map = GuidMap::assign(&mut items);
        let new_id = items[0]["id"].as_str().unwrap();
        assert_eq!(map.remap_parent("rig^spine01"), format!("{new_id}^spine01"));
        assert_eq!(map.remap_parent("rig"), new_id);
    }

    #[test]
    fn unresolvable_parent_is_kept_verbatim() {
        let map = GuidMap::default();
        assert_eq!(map.remap_parent("ghost^hand"), "ghost^hand");
    }

    #[test]
    fn target_references_are_rewritten() {
        let mut items = vec![
            json!({"id": "1"}),
            json!({"id": "2", "content": {"options": {"target": "1"}}}),
        ];
        let map = GuidMap::assign(&mut items);
        let expected = items[0]["id"].clone();
        let mut second = items[1].clone();
        map.rewrite_references(&mut second);
        assert_eq!(second["content"]["options"]["target"], expected);
    }
}
