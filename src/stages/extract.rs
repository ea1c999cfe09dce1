//! Component extraction: splits "item carries its own content" records into
//! an item/component pair.

use serde_json::{Value, json};

use crate::guid::new_guid;
use crate::schema::{ItemType, data_type};

/// `dataType` tag for the extracted component of a renderable item type.
/// Types outside this table keep their content inline.
pub fn component_data_type(t: ItemType) -> Option<&'static str> {
    Some(match t {
        ItemType::Sprite | ItemType::Null => data_type::SPRITE_COMPONENT,
        ItemType::Particle => data_type::PARTICLE_SYSTEM,
        ItemType::Interact => data_type::INTERACT_COMPONENT,
        ItemType::Camera => data_type::CAMERA_CONTROLLER,
        ItemType::Text => data_type::TEXT_COMPONENT,
        _ => return None,
    })
}

/// Moves the item's `content` out into a standalone component record.
///
/// Returns the component to append to the document's `components` list, or
/// `None` when the item type keeps its content inline. A qualifying item is
/// rewritten to `components: [{id}]` + `dataType`.
pub fn extract_component(item: &mut Value) -> Option<Value> {
    let kind = ItemType::of(item)?;
    let dt = component_data_type(kind)?;

    let content = item.as_object_mut()?.remove("content")?;
    let mut component = content;
    if !component.is_object() {
        component = json!({});
    }

    let component_id = new_guid();
    let item_id = item.get("id").cloned().unwrap_or(Value::Null);
    component["id"] = json!(component_id);
    component["item"] = json!({ "id": item_id });
    component["dataType"] = json!(dt);

    item["components"] = json!([{ "id": component_id }]);
    item["dataType"] = json!(data_type::VFX_ITEM);

    Some(component)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprite_content_moves_to_component() {
        let mut item = json!({
            "id": "g1",
            "type": "1",
            "content": {"renderer": {"renderMode": 1}}
        });
        let component = extract_component(&mut item).unwrap();

        assert!(item.get("content").is_none());
        assert_eq!(item["dataType"], json!(data_type::VFX_ITEM));
        assert_eq!(item["components"][0]["id"], component["id"]);
        assert_eq!(component["dataType"], json!(data_type::SPRITE_COMPONENT));
        assert_eq!(component["item"]["id"], json!("g1"));
        assert_eq!(component["renderer"]["renderMode"], json!(1));
    }

    #[test]
    fn non_renderable_types_keep_content() {
        let mut item = json!({"id": "p", "type": "5", "content": {"options": {}}});
        assert!(extract_component(&mut item).is_none());
        assert!(item.get("content").is_some());
    }

    #[test]
    fn data_type_table_is_total_over_renderables() {
        assert_eq!(
            component_data_type(ItemType::Particle),
            Some(data_type::PARTICLE_SYSTEM)
        );
        assert_eq!(
            component_data_type(ItemType::Interact),
            Some(data_type::INTERACT_COMPONENT)
        );
        assert_eq!(
            component_data_type(ItemType::Camera),
            Some(data_type::CAMERA_CONTROLLER)
        );
        assert_eq!(component_data_type(ItemType::Mesh), None);
    }
}
