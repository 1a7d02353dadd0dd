//! Provide compile-time type information.
//!
//! ## Menu
//!
//! - [`Type`]: a [`TypeId`] together with the type path.
//! - [`CustomAttributes`]: an attribute container, similar to `Map<TypeId, Box<dyn Any>>`.
//! - [`TypeInfo`]: an enum holding the information of one type, the inner is one of:
//!     - [`OpaqueInfo`]: for types without visible structure (e.g. `i32`, `String`).
//!     - [`ListInfo`]: for list-like types (e.g. `Vec<T>`), including the item type info.
//!     - [`NullableInfo`]: for `Option<T>`, including the inner type info.
//!     - [`EnumInfo`]: for fieldless enums, including representation and variants.
//!     - [`StructInfo`]: for named structs, including fields in declaration order.
//! - [`NamedField`] and [`VariantInfo`]: descriptors of struct fields and enum variants.
//! - [`ReflectKind`]: the shape of a reflected type.
//! - [`Typed`] and [`DynamicTyped`]: static and dynamic access to `TypeInfo`.
//!
//! [`TypeId`]: core::any::TypeId

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod enum_info;
mod field_info;
mod list_info;
mod nullable_info;
mod opaque_info;
mod struct_info;
mod ty;
mod type_info;
mod typed;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use attributes::{impl_custom_attributes_fn, impl_with_custom_attributes};
pub(crate) use ty::impl_type_fn;

// -----------------------------------------------------------------------------
// Exports

pub use attributes::CustomAttributes;
pub use enum_info::{Discriminant, EnumInfo, EnumRepr, VariantInfo};
pub use field_info::NamedField;
pub use list_info::ListInfo;
pub use nullable_info::NullableInfo;
pub use opaque_info::OpaqueInfo;
pub use struct_info::StructInfo;
pub use ty::Type;
pub use type_info::{ReflectKind, ReflectKindError, TypeInfo};
pub use typed::{DynamicTyped, Typed};
