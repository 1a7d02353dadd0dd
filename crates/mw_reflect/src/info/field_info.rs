use alloc::sync::Arc;
use core::any::{Any, TypeId};

use crate::info::{CustomAttributes, TypeInfo, Typed};
use crate::info::{impl_custom_attributes_fn, impl_with_custom_attributes};

// -----------------------------------------------------------------------------
// NamedField

/// A reflected struct field.
///
/// `name` is the Rust identifier; `key` is the member name on the wire and
/// differs only when the field has `#[model(rename = "..")]`.
///
/// # Examples
///
/// ```
/// use mw_reflect::{derive::Model, info::Typed};
///
/// #[derive(Model, Default)]
/// struct Foo {
///     #[model(rename = "fieldA")]
///     field_a: f32,
/// }
///
/// let info = Foo::type_info().as_struct().unwrap();
/// let field = info.field_at(0).unwrap();
///
/// assert!(field.type_is::<f32>());
/// assert_eq!(field.name(), "field_a");
/// assert_eq!(field.key(), "fieldA");
/// ```
#[derive(Clone, Debug)]
pub struct NamedField {
    ty_id: TypeId,
    name: &'static str,
    key: &'static str,
    // Deferred so recursive models can describe themselves.
    type_info: fn() -> &'static TypeInfo,
    custom_attributes: Option<Arc<CustomAttributes>>,
}

impl NamedField {
    impl_custom_attributes_fn!(custom_attributes);
    impl_with_custom_attributes!(custom_attributes);

    #[inline]
    pub fn new<T: Typed>(name: &'static str) -> Self {
        Self {
            ty_id: TypeId::of::<T>(),
            name,
            key: name,
            type_info: T::type_info,
            custom_attributes: None,
        }
    }

    /// Sets the member name used on the wire.
    #[inline]
    pub fn with_key(self, key: &'static str) -> Self {
        Self { key, ..self }
    }

    #[inline]
    pub const fn ty_id(&self) -> TypeId {
        self.ty_id
    }

    #[inline]
    pub fn type_is<T: Any>(&self) -> bool {
        self.ty_id == TypeId::of::<T>()
    }

    /// The Rust field name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The member name on the wire.
    #[inline]
    pub const fn key(&self) -> &'static str {
        self.key
    }

    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }
}
