use alloc::boxed::Box;
use alloc::sync::Arc;

use crate::Reflect;
use crate::info::{CustomAttributes, NamedField, Type, Typed, impl_type_fn};
use crate::info::{impl_custom_attributes_fn, impl_with_custom_attributes};
use crate::ops::Struct;

/// Describes a struct with named fields.
///
/// Members are written in field declaration order.
///
/// # Examples
///
/// ```rust
/// use mw_reflect::{derive::Model, info::Typed};
///
/// #[derive(Model, Default)]
/// struct Gauge {
///     level: f32,
///     #[model(skip)]
///     history: Vec<u8>,
/// }
///
/// let info = <Gauge as Typed>::type_info().as_struct().unwrap();
///
/// assert_eq!(info.field_len(), 1);
/// assert_eq!(info.index_of("level"), Some(0));
/// assert!(info.field("history").is_none());
/// ```
///
/// Wire keys are unique within a struct:
///
/// ```compile_fail
/// use mw_reflect::derive::Model;
///
/// #[derive(Model, Default)]
/// struct Clash {
///     #[model(rename = "b")]
///     a: i32,
///     b: i32,
/// }
/// ```
#[derive(Clone, Debug)]
pub struct StructInfo {
    ty: Type,
    fields: Box<[NamedField]>,
    default: fn() -> Box<dyn Reflect>,
    custom_attributes: Option<Arc<CustomAttributes>>,
}

impl StructInfo {
    impl_type_fn!(ty);
    impl_custom_attributes_fn!(custom_attributes);
    impl_with_custom_attributes!(custom_attributes);

    /// `fields` must be given in declaration order.
    pub fn new<T: Struct + Typed + Default>(fields: &[NamedField]) -> Self {
        Self {
            ty: Type::of::<T>(),
            fields: fields.into(),
            default: new_default::<T>,
            custom_attributes: None,
        }
    }

    /// Looks a field up by its Rust name.
    pub fn field(&self, name: &str) -> Option<&NamedField> {
        self.fields.iter().find(|f| f.name() == name)
    }

    #[inline]
    pub fn field_at(&self, index: usize) -> Option<&NamedField> {
        self.fields.get(index)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name() == name)
    }

    /// Linear search by wire key.
    pub fn index_of_key(&self, key: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.key() == key)
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &NamedField> {
        self.fields.iter()
    }

    #[inline]
    pub fn field_len(&self) -> usize {
        self.fields.len()
    }

    /// A fresh `T::default()`, which reads then fill in.
    #[inline]
    pub fn construct_default(&self) -> Box<dyn Reflect> {
        (self.default)()
    }
}

fn new_default<T: Reflect + Default>() -> Box<dyn Reflect> {
    Box::new(T::default())
}
