//! Content builder for v0 plugin payloads (a bare `content` key, or a
//! `model` that is not a camera).

use serde_json::{Map, Value, json};

pub fn build_content(payload: &Value) -> Value {
    let mut content = payload.clone();
    if !content.is_object() {
        return json!({});
    }

    // plugins name themselves through their options when nothing explicit
    // was recorded
    if content.get("pluginName").is_none()
        && let Some(derived) = content
            .get("options")
            .and_then(|o| o.get("type"))
            .cloned()
        && let Some(map) = content.as_object_mut()
    {
        map.insert("pluginName".into(), derived);
    }

    content
}

/// Moves the plugin name onto the item: as an index `pn` into the document
/// plugin table when one exists, otherwise inline as `pluginName`. The two
/// forms are mutually exclusive.
pub fn assign_plugin_name(item: &mut Map<String, Value>, plugins: &mut Option<Vec<String>>) {
    let Some(name) = item
        .get("content")
        .and_then(|c| c.get("pluginName"))
        .and_then(Value::as_str)
        .map(str::to_owned)
    else {
        return;
    };

    if let Some(table) = plugins {
        let index = match table.iter().position(|p| p == &name) {
            Some(i) => i,
            None => {
                table.push(name);
                table.len() - 1
            }
        };
        item.insert("pn".into(), json!(index));
        if let Some(content) = item.get_mut("content").and_then(Value::as_object_mut) {
            content.remove("pluginName");
        }
    } else {
        item.insert("pluginName".into(), json!(name));
        if let Some(content) = item.get_mut("content").and_then(Value::as_object_mut) {
            content.remove("pluginName");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_name_derives_from_options_type() {
        let payload = json!({"options": {"type": "alipay-widget"}});
        let content = build_content(&payload);
        assert_eq!(content["pluginName"], json!("alipay-widget"));
    }

    #[test]
    fn explicit_plugin_name_wins() {
        let payload = json!({"pluginName": "gyro", "options": {"type": "other"}});
        let content = build_content(&payload);
        assert_eq!(content["pluginName"], json!("gyro"));
    }

    #[test]
    fn table_index_and_inline_name_are_exclusive() {
        let mut item = Map::new();
        item.insert("content".into(), json!({"pluginName": "gyro"}));
        let mut plugins = Some(vec!["tilt".to_string()]);
        assign_plugin_name(&mut item, &mut plugins);
        assert_eq!(item["pn"], json!(1));
        assert!(item.get("pluginName").is_none());
        assert_eq!(plugins.unwrap(), vec!["tilt".to_string(), "gyro".to_string()]);

        let mut item = Map::new();
        item.insert("content".into(), json!({"pluginName": "gyro"}));
        let mut none = None;
        assign_plugin_name(&mut item, &mut none);
        assert_eq!(item["pluginName"], json!("gyro"));
        assert!(item.get("pn").is_none());
    }
}
