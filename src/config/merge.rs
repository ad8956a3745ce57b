//! Field-by-field merging of deployment file tiers.
//!
//! Mappings merge recursively, everything else (scalars, sequences) is
//! replaced by the higher tier. An explicit `null` leaves the lower tier's
//! value in place.

use serde_json::Value;

/// Merge `overlay` into `base` in place.
///
/// # Example
/// ```
/// use serde_json::json;
/// use asynx_config::config::merge_into;
///
/// let mut base = json!({"redis": {"host": "cache", "port": 6379}});
/// merge_into(&mut base, json!({"redis": {"port": 6380}}));
/// assert_eq!(base, json!({"redis": {"host": "cache", "port": 6380}}));
/// ```
pub fn merge_into(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (_, Value::Null) => {}
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_into(existing, value),
                    None => {
                        if !value.is_null() {
                            base_map.insert(key, value);
                        }
                    }
                }
            }
        }
        (slot, overlay) => *slot = overlay,
    }
}

/// Merge tiers in order of increasing precedence.
pub fn merge_tiers(tiers: impl IntoIterator<Item = Value>) -> Value {
    tiers.into_iter().fold(Value::Null, |mut acc, tier| {
        merge_into(&mut acc, tier);
        acc
    })
}
