//! Reflection implementations for foreign types, and the static cells used
//! to implement [`Typed`](crate::info::Typed).
//!
//! - Scalars: `i8` to `i64`, `u8` to `u64`, `f32`, `f64`, `bool`, `char`, `String`.
//! - `Vec<T>` as [`List`](crate::ops::List).
//! - `Option<T>` as [`Nullable`](crate::ops::Nullable).

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod native;
mod option;
mod vec;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericTypeInfoCell, NonGenericTypeInfoCell};
