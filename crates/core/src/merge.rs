//! JSON merge patch (RFC 7396) for partial component updates.
//!
//! Objects merge key by key and recursively, `null` removes a key, and any
//! other value (including arrays) replaces the target wholesale.

use serde_json::{Map, Value};

/// Apply `patch` to `target` in place.
pub fn merge_patch(target: &mut Value, patch: &Value) {
    let Value::Object(patch_map) = patch else {
        *target = patch.clone();
        return;
    };

    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    let Value::Object(target_map) = target else {
        return;
    };

    for (key, value) in patch_map {
        if value.is_null() {
            target_map.remove(key);
        } else {
            merge_patch(target_map.entry(key.clone()).or_insert(Value::Null), value);
        }
    }
}

/// Combine two patches so that applying the result equals applying
/// `first` then `second`.
///
/// Unlike [`merge_patch`], `null` markers from `second` are kept so the
/// combined patch still removes those keys on the backend.
pub fn compose_patches(first: &mut Value, second: &Value) {
    if !(first.is_object() && second.is_object()) {
        *first = second.clone();
        return;
    }
    let (Some(first_map), Some(second_map)) = (first.as_object_mut(), second.as_object()) else {
        return;
    };

    for (key, value) in second_map {
        match first_map.get_mut(key) {
            Some(existing) if existing.is_object() && value.is_object() => {
                compose_patches(existing, value);
            }
            _ => {
                first_map.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Drop top-level `null` entries, which in a merge patch mean "remove".
pub fn strip_removals(patch: &Value) -> Value {
    match patch {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        ),
        other => other.clone(),
    }
}
