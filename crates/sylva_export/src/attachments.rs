//! Attachment Serializer
//!
//! Converts a node's behaviors into generic value maps, one per behavior,
//! for embedding as node extras.

use sylva_core::{Behavior, Value, ValueMap};

/// Reserved key holding the behavior's type name. Always the first entry.
pub const TYPE_NAME_KEY: &str = "TypeName";

/// Serializes behaviors in the order given. Empty input yields an empty
/// list; callers must not forward it as extras.
pub fn serialize_attachments<'a>(behaviors: impl IntoIterator<Item = &'a dyn Behavior>) -> Vec<ValueMap> {
    behaviors.into_iter().map(serialize_behavior).collect()
}

/// Serializes one behavior: its type name, then every public or
/// serialization-marked field in declaration order.
#[must_use]
pub fn serialize_behavior(behavior: &dyn Behavior) -> ValueMap {
    let mut map = ValueMap::new();
    map.insert(TYPE_NAME_KEY.to_string(), Value::text(behavior.type_name()));

    for field in behavior.fields() {
        if !field.access.is_serializable() {
            log::trace!("Skipping private field '{}' of {}", field.name, behavior.type_name());
            continue;
        }
        if field.name == TYPE_NAME_KEY {
            log::warn!(
                "Field '{}' of {} collides with the reserved type name key, skipping",
                field.name,
                behavior.type_name()
            );
            continue;
        }
        map.insert(field.name.to_string(), field.value.to_value());
    }

    map
}
