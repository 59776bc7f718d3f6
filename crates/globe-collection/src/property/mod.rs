//! Dynamic item properties and the safe nested-property setter.
//!
//! - [`object`]: [`Object`], [`Property`] and the shared [`root_prototype`].
//! - [`setter`]: [`set_path`] / [`get_path`].

pub mod object;
pub mod setter;

pub use object::{is_root_prototype, root_prototype, Object, ObjectRef, Property};
pub use setter::{get_path, is_reserved, set_path, RESERVED_SEGMENTS};
