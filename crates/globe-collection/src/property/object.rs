//! Dynamic property objects attached to engine items.
//!
//! An [`Object`] holds *own* properties and an optional prototype link.
//! Lookups through [`Object::get`] follow the prototype chain; writes only
//! ever create or replace own properties. Every object built with
//! [`Object::new`] inherits from the process-wide [`root_prototype`], so a
//! write that reached the root prototype would be visible on every object.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use serde_json::{Map, Value};

/// Shared, lockable handle to an [`Object`].
pub type ObjectRef = Arc<RwLock<Object>>;

pub type MethodFn = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;
pub type GetterFn = Arc<dyn Fn() -> Value + Send + Sync>;
pub type SetterFn = Arc<dyn Fn(Value) + Send + Sync>;

// ============================================================================
// Property
// ============================================================================

/// One slot of an [`Object`].
#[derive(Clone)]
pub enum Property {
    /// Plain writable data.
    Value(Value),
    /// Nested object, traversable by dotted paths.
    Object(ObjectRef),
    /// Computed property. Without a setter it is read-only.
    Accessor {
        get: GetterFn,
        set: Option<SetterFn>,
    },
    /// Callable member. Never overwritten by path writes.
    Method(MethodFn),
}

impl Property {
    /// Convert JSON into a property, turning JSON objects into nested
    /// [`Object`]s so their members stay reachable by path.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Object(Object::from_map(map)),
            other => Self::Value(other),
        }
    }

    pub fn method(f: impl Fn(&[Value]) -> Value + Send + Sync + 'static) -> Self {
        Self::Method(Arc::new(f))
    }

    pub fn getter(get: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        Self::Accessor {
            get: Arc::new(get),
            set: None,
        }
    }

    pub fn accessor(
        get: impl Fn() -> Value + Send + Sync + 'static,
        set: impl Fn(Value) + Send + Sync + 'static,
    ) -> Self {
        Self::Accessor {
            get: Arc::new(get),
            set: Some(Arc::new(set)),
        }
    }

    pub fn is_method(&self) -> bool {
        matches!(self, Self::Method(_))
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::Accessor { set: None, .. })
    }

    /// JSON view of the property. Methods have none.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            Self::Value(v) => Some(v.clone()),
            Self::Object(o) => Some(o.read().to_json()),
            Self::Accessor { get, .. } => Some(get()),
            Self::Method(_) => None,
        }
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Object(o) => f.debug_tuple("Object").field(&Arc::as_ptr(o)).finish(),
            Self::Accessor { set, .. } => f
                .debug_struct("Accessor")
                .field("writable", &set.is_some())
                .finish(),
            Self::Method(_) => f.write_str("Method"),
        }
    }
}

// ============================================================================
// Object
// ============================================================================

#[derive(Debug, Default)]
pub struct Object {
    own: BTreeMap<String, Property>,
    proto: Option<ObjectRef>,
}

impl Object {
    /// Empty object inheriting from the root prototype.
    pub fn new() -> ObjectRef {
        Self::with_prototype(Some(Arc::clone(root_prototype())))
    }

    /// Empty object with an explicit prototype (`None` for a bare object).
    pub fn with_prototype(proto: Option<ObjectRef>) -> ObjectRef {
        Arc::new(RwLock::new(Self {
            own: BTreeMap::new(),
            proto,
        }))
    }

    /// Build an object from JSON. Non-object input yields an empty object.
    pub fn from_json(value: Value) -> ObjectRef {
        match value {
            Value::Object(map) => Self::from_map(map),
            _ => Self::new(),
        }
    }

    fn from_map(map: Map<String, Value>) -> ObjectRef {
        let obj = Self::new();
        {
            let mut guard = obj.write();
            for (k, v) in map {
                guard.own.insert(k, Property::from_json(v));
            }
        }
        obj
    }

    pub fn own(&self, name: &str) -> Option<&Property> {
        self.own.get(name)
    }

    pub fn has_own(&self, name: &str) -> bool {
        self.own.contains_key(name)
    }

    /// Look `name` up on this object, then along the prototype chain.
    pub fn get(&self, name: &str) -> Option<Property> {
        if let Some(p) = self.own.get(name) {
            return Some(p.clone());
        }
        let mut next = self.proto.clone();
        while let Some(obj) = next {
            let guard = obj.read();
            if let Some(p) = guard.own.get(name) {
                return Some(p.clone());
            }
            next = guard.proto.clone();
        }
        None
    }

    /// Define or replace an own property.
    pub fn define(&mut self, name: impl Into<String>, property: Property) {
        self.own.insert(name.into(), property);
    }

    /// JSON view of the own properties. Methods are omitted.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .own
            .iter()
            .filter_map(|(k, p)| p.to_json().map(|v| (k.clone(), v)))
            .collect();
        Value::Object(map)
    }
}

// ============================================================================
// Root prototype
// ============================================================================

static ROOT_PROTOTYPE: OnceLock<ObjectRef> = OnceLock::new();

/// The prototype every [`Object::new`] object inherits from.
pub fn root_prototype() -> &'static ObjectRef {
    ROOT_PROTOTYPE.get_or_init(|| {
        let mut root = Object::default();
        root.define(
            "toString",
            Property::method(|_| Value::String("[object Object]".to_string())),
        );
        root.define("valueOf", Property::method(|_| Value::Null));
        Arc::new(RwLock::new(root))
    })
}

pub fn is_root_prototype(obj: &ObjectRef) -> bool {
    Arc::ptr_eq(obj, root_prototype())
}
