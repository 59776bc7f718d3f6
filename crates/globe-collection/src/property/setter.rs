//! Safe nested-property writes.
//!
//! [`set_path`] assigns a value at a dot-separated path while refusing every
//! route out of the target's own properties:
//!
//! - reserved segments (`__proto__`, `constructor`, `prototype`) reject the
//!   whole path before anything is touched;
//! - intermediate segments must be *own* object properties; an inherited-only
//!   segment or one that lands on the root prototype is unsafe, a missing or
//!   non-object one makes the path not applicable;
//! - the final segment may not name a method or a read-only accessor,
//!   including inherited ones.

use std::sync::Arc;

use serde_json::Value;

use super::object::{is_root_prototype, ObjectRef, Property, SetterFn};
use crate::error::PropertyError;

/// Path segments that are never traversed or written.
pub const RESERVED_SEGMENTS: [&str; 3] = ["__proto__", "constructor", "prototype"];

pub fn is_reserved(segment: &str) -> bool {
    RESERVED_SEGMENTS.contains(&segment)
}

enum Write {
    Define,
    Setter(SetterFn),
}

/// Write `value` at `path` inside `root`.
pub fn set_path(root: &ObjectRef, path: &str, value: Value) -> Result<(), PropertyError> {
    let segments: Vec<&str> = path.split('.').collect();

    if let Some(segment) = segments.iter().find(|s| is_reserved(s)) {
        return Err(PropertyError::UnsafePath {
            path: path.to_string(),
            segment: segment.to_string(),
        });
    }
    if segments.iter().any(|s| s.is_empty()) {
        return Err(PropertyError::NotApplicable {
            path: path.to_string(),
        });
    }
    if is_root_prototype(root) {
        return Err(PropertyError::UnsafePath {
            path: path.to_string(),
            segment: segments[0].to_string(),
        });
    }

    let Some((last, parents)) = segments.split_last() else {
        return Err(PropertyError::NotApplicable {
            path: path.to_string(),
        });
    };

    let mut target = Arc::clone(root);
    for segment in parents {
        let next = {
            let guard = target.read();
            match guard.own(segment) {
                Some(Property::Object(obj)) => Arc::clone(obj),
                Some(_) => {
                    return Err(PropertyError::NotApplicable {
                        path: path.to_string(),
                    })
                }
                None if guard.get(segment).is_some() => {
                    return Err(PropertyError::UnsafePath {
                        path: path.to_string(),
                        segment: segment.to_string(),
                    })
                }
                None => {
                    return Err(PropertyError::NotApplicable {
                        path: path.to_string(),
                    })
                }
            }
        };
        if is_root_prototype(&next) {
            return Err(PropertyError::UnsafePath {
                path: path.to_string(),
                segment: segment.to_string(),
            });
        }
        target = next;
    }

    // Decide under a read lock, write afterwards: a setter may re-enter.
    let write = match target.read().get(last) {
        Some(Property::Method(_)) => {
            return Err(PropertyError::Function {
                path: path.to_string(),
            })
        }
        Some(Property::Accessor { set: None, .. }) => {
            return Err(PropertyError::ReadOnly {
                path: path.to_string(),
            })
        }
        Some(Property::Accessor { set: Some(set), .. }) => Write::Setter(set),
        _ => Write::Define,
    };

    match write {
        Write::Setter(set) => set(value),
        Write::Define => target.write().define(*last, Property::from_json(value)),
    }
    Ok(())
}

/// Read the JSON value at `path`, following own properties only.
pub fn get_path(root: &ObjectRef, path: &str) -> Option<Value> {
    let segments: Vec<&str> = path.split('.').collect();
    let (last, parents) = segments.split_last()?;
    let mut target = Arc::clone(root);
    for segment in parents {
        let next = match target.read().own(segment) {
            Some(Property::Object(obj)) => Arc::clone(obj),
            _ => return None,
        };
        target = next;
    }
    let guard = target.read();
    guard.own(last).and_then(Property::to_json)
}
