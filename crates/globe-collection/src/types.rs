use std::fmt;

use serde::{Deserialize, Serialize};

/// Tag assigned to items added without an explicit one.
pub const DEFAULT_TAG: &str = "default";

/// Application-chosen label partitioning collection items into groups.
///
/// Tags are strings or integers. The two never compare equal, so
/// `Tag::from("1") != Tag::from(1)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tag {
    Num(i64),
    Str(String),
}

impl Tag {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            Self::Num(_) => None,
        }
    }

    pub fn as_num(&self) -> Option<i64> {
        match self {
            Self::Num(n) => Some(*n),
            Self::Str(_) => None,
        }
    }
}

impl Default for Tag {
    fn default() -> Self {
        Self::Str(DEFAULT_TAG.to_string())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Tag {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Tag {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for Tag {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<&Tag> for Tag {
    fn from(value: &Tag) -> Self {
        value.clone()
    }
}

impl From<i64> for Tag {
    fn from(value: i64) -> Self {
        Self::Num(value)
    }
}

impl From<i32> for Tag {
    fn from(value: i32) -> Self {
        Self::Num(i64::from(value))
    }
}

impl From<u32> for Tag {
    fn from(value: u32) -> Self {
        Self::Num(i64::from(value))
    }
}

/// Options for [`Collection::add`](crate::collection::Collection::add).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddOptions {
    /// Tag for the new items. `None` uses the collection's default tag.
    pub tag: Option<Tag>,
    /// Position in the native collection. Kinds without positional insertion
    /// append regardless. Batch adds place item `i` at `index + i`.
    pub index: Option<usize>,
}

impl AddOptions {
    pub fn tagged(tag: impl Into<Tag>) -> Self {
        Self {
            tag: Some(tag.into()),
            index: None,
        }
    }

    pub fn at(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

/// Construction options for a [`Collection`](crate::collection::Collection).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CollectionOptions {
    pub default_tag: Tag,
    /// Subscribe to the native collection's change notifications so that
    /// external mutation invalidates the value cache.
    pub bridge_native_events: bool,
}

impl Default for CollectionOptions {
    fn default() -> Self {
        Self {
            default_tag: Tag::default(),
            bridge_native_events: true,
        }
    }
}

/// Per-item outcome counts of a bulk `set_property`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SetPropertyReport {
    /// Items whose property was written.
    pub applied: usize,
    /// Items where the path did not resolve (no property object, missing or
    /// non-object intermediate).
    pub skipped: usize,
    /// Items whose write was refused because the path escapes own properties.
    pub rejected: usize,
}

impl SetPropertyReport {
    pub fn total(&self) -> usize {
        self.applied + self.skipped + self.rejected
    }
}
