//! Runtime type information for model types.
//!
//! `mw_reflect` describes the *shape* of a type at runtime so that a
//! serializer can bind values to a wire format without per-type code:
//!
//! - [`Reflect`]: object-safe access to a value, with downcasting.
//! - [`info`]: static type information ([`TypeInfo`](info::TypeInfo)),
//!   field and variant descriptors, custom attributes.
//! - [`ops`]: shape specific access (`List`, `Nullable`, `Enum`, `Struct`).
//! - [`impls`]: implementations for scalars, `Vec<T>` and `Option<T>`,
//!   plus the static cells used by [`Typed`](info::Typed) implementations.
//! - [`derive::Model`]: derive macro for named structs and fieldless enums.
//!
//! # Examples
//!
//! ```
//! use mw_reflect::{derive::Model, info::Typed};
//!
//! #[derive(Model, Default)]
//! struct User {
//!     id: i64,
//!     #[model(rename = "display_name")]
//!     name: String,
//! }
//!
//! let info = User::type_info().as_struct().unwrap();
//! assert_eq!(info.field_len(), 2);
//! assert_eq!(info.field_at(1).unwrap().key(), "display_name");
//! ```

// -----------------------------------------------------------------------------
// Extern Self

// The derive macro resolves this crate by name, and doc tests or the crate
// itself must be able to use `mw_reflect` as an alias for `crate`.
extern crate self as mw_reflect;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod reflection;

pub mod impls;
pub mod info;
pub mod ops;

#[doc(hidden)]
pub mod __macro_exports {
    pub use alloc::boxed::Box;
}

// -----------------------------------------------------------------------------
// Top-Level exports

pub use mw_reflect_derive as derive;
pub use reflection::Reflect;
