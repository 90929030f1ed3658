//! JSON merge helpers for layered configuration.

use serde_json::Value;

/// Merge overlay values into the base, recursing into objects.
pub(super) fn merge_json_values(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(existing) => merge_json_values(existing, value),
                    None => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (slot, value) => *slot = value.clone(),
    }
}

/// Merge overlay values into base, leaving keys locked by `requirements` alone.
pub(super) fn merge_json_with_constraints(
    base: &mut Value,
    overlay: &Value,
    requirements: Option<&Value>,
) {
    let Some(Value::Object(locked)) = requirements else {
        if requirements.is_none() {
            merge_json_values(base, overlay);
        }
        return;
    };
    let (Value::Object(base_map), Value::Object(overlay_map)) = (base, overlay) else {
        return;
    };

    for (key, value) in overlay_map {
        match locked.get(key) {
            None => match base_map.get_mut(key) {
                Some(existing) => merge_json_values(existing, value),
                None => {
                    base_map.insert(key.clone(), value.clone());
                }
            },
            Some(nested @ Value::Object(_)) => {
                let entry = base_map
                    .entry(key.clone())
                    .or_insert_with(|| Value::Object(serde_json::Map::new()));
                merge_json_with_constraints(entry, value, Some(nested));
            }
            // Locked leaf.
            Some(_) => {}
        }
    }
}
