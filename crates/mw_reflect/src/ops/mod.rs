//! Provide shape specific access to reflected values.
//!
//! The following are subtraits of [`Reflect`](crate::Reflect), reached through
//! [`ReflectRef`] and [`ReflectMut`]:
//!
//! - [`List`]: for list-like types (e.g. `Vec<i32>`).
//! - [`Nullable`]: for `Option<T>`.
//! - [`Enum`]: for fieldless enums.
//! - [`Struct`]: for named structs.

// -----------------------------------------------------------------------------
// Modules

mod enum_ops;
mod kind;
mod list_ops;
mod nullable_ops;
mod struct_ops;

// -----------------------------------------------------------------------------
// Exports

pub use enum_ops::Enum;
pub use kind::{ReflectMut, ReflectRef};
pub use list_ops::{List, ListIter};
pub use nullable_ops::Nullable;
pub use struct_ops::Struct;
