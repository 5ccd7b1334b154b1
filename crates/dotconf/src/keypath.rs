//! Dotted-path access into JSON value trees.
//!
//! A key like `"server.ports.0"` addresses a nested value inside a
//! [`serde_json::Map`]: each `.`-separated segment descends one level, by key
//! for objects and by numeric index for arrays.
//!
//! Addressing:
//! ```text
//! {"server": {"ports": [8080, 8443]}}
//!
//! "server"          -> {"ports": [8080, 8443]}
//! "server.ports"    -> [8080, 8443]
//! "server.ports.1"  -> 8443
//! ```
//!
//! These functions never fail. Lookups that run off the tree return `None`,
//! removals that run off the tree do nothing, and writes materialize whatever
//! intermediate objects they need.

use serde_json::{Map, Value};

/// Look up the value at a dotted `key`, or `None` if any segment is absent.
///
/// Objects descend by key and arrays by numeric index; any other value ends
/// the walk. A segment that is not a valid index into an array (non-numeric
/// or out of bounds) also ends the walk.
pub fn get<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    let mut segments = key.split('.');
    let first = segments.next()?;
    let mut current = map.get(first)?;

    for segment in segments {
        current = match current {
            Value::Object(object) => object.get(segment)?,
            Value::Array(array) => array.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    Some(current)
}

/// Write `value` at a dotted `key`, creating intermediate objects as needed.
///
/// Existing arrays are descended (or assigned into) when the segment is an
/// in-bounds numeric index. Any other intermediate that cannot be descended,
/// including scalars and arrays without a usable index, is replaced by a
/// fresh object so the walk can continue.
pub fn set(map: &mut Map<String, Value>, key: &str, value: Value) {
    let segments: Vec<&str> = key.split('.').collect();
    let (first, rest) = match segments.split_first() {
        Some(parts) => parts,
        None => return,
    };

    if rest.is_empty() {
        map.insert((*first).to_string(), value);
        return;
    }

    let child = map
        .entry((*first).to_string())
        .or_insert(Value::Null);
    set_in(child, rest, value);
}

/// Delete the value at a dotted `key`.
///
/// The walk stops silently if any intermediate segment is missing or not
/// descendable; reaching the final segment removes that entry from its
/// containing object (or array, for an in-bounds numeric index).
pub fn remove(map: &mut Map<String, Value>, key: &str) {
    let segments: Vec<&str> = key.split('.').collect();
    let (first, rest) = match segments.split_first() {
        Some(parts) => parts,
        None => return,
    };

    if rest.is_empty() {
        map.remove(*first);
        return;
    }

    if let Some(child) = map.get_mut(*first) {
        remove_in(child, rest);
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Recursive step for [`set`], descending `value` along `segments`.
fn set_in(value: &mut Value, segments: &[&str], new_value: Value) {
    let (segment, rest) = match segments.split_first() {
        Some(parts) => parts,
        None => return,
    };

    // In-bounds numeric segments index into existing arrays.
    if let Value::Array(array) = value {
        if let Ok(index) = segment.parse::<usize>() {
            if index < array.len() {
                if rest.is_empty() {
                    array[index] = new_value;
                } else {
                    set_in(&mut array[index], rest, new_value);
                }
                return;
            }
        }
    }

    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    if let Value::Object(object) = value {
        if rest.is_empty() {
            object.insert((*segment).to_string(), new_value);
        } else {
            let child = object
                .entry((*segment).to_string())
                .or_insert(Value::Null);
            set_in(child, rest, new_value);
        }
    }
}

/// Recursive step for [`remove`], descending `value` along `segments`.
fn remove_in(value: &mut Value, segments: &[&str]) {
    let (segment, rest) = match segments.split_first() {
        Some(parts) => parts,
        None => return,
    };

    if rest.is_empty() {
        match value {
            Value::Object(object) => {
                object.remove(*segment);
            }
            Value::Array(array) => {
                if let Ok(index) = segment.parse::<usize>() {
                    if index < array.len() {
                        array.remove(index);
                    }
                }
            }
            _ => {}
        }
        return;
    }

    let child = match value {
        Value::Object(object) => object.get_mut(*segment),
        Value::Array(array) => match segment.parse::<usize>() {
            Ok(index) => array.get_mut(index),
            Err(_) => None,
        },
        _ => None,
    };

    if let Some(child) = child {
        remove_in(child, rest);
    }
}
