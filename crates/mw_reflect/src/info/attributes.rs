use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;

use mw_utils::TypeIdMap;

// -----------------------------------------------------------------------------
// CustomAttributes

/// Values attached to a model, member or variant with `#[model(@expr)]`.
///
/// Converter predicates look attributes up by type, so each type appears
/// at most once; a second `@expr` of the same type replaces the first.
///
/// # Example
///
/// ```
/// use mw_reflect::{derive::Model, info::Typed};
///
/// struct Label(&'static str);
///
/// #[derive(Model, Default)]
/// #[model(@Label("slider"))]
/// struct Slider {
///     #[model(@10.0f32)]
///     value: f32,
///     name: String,
/// }
///
/// let info = <Slider as Typed>::type_info().as_struct().unwrap();
/// assert_eq!(info.get_attribute::<Label>().unwrap().0, "slider");
///
/// let value = info.field("value").unwrap();
/// assert!(!value.has_attribute::<i32>());
/// assert_eq!(value.get_attribute::<f32>(), Some(&10.0));
///
/// assert!(info.field("name").unwrap().custom_attributes().is_empty());
/// ```
#[derive(Default)]
pub struct CustomAttributes(TypeIdMap<Box<dyn Any + Send + Sync>>);

impl CustomAttributes {
    #[inline]
    pub const fn new() -> Self {
        Self(TypeIdMap::new())
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self(TypeIdMap::with_capacity(capacity))
    }

    /// Shared empty set, returned by info types that carry no attributes.
    #[inline]
    pub fn empty() -> &'static Self {
        static NONE: CustomAttributes = CustomAttributes::new();
        &NONE
    }

    #[inline]
    pub fn with_attribute<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.0.insert(TypeId::of::<T>(), Box::new(value));
        self
    }

    #[inline]
    pub fn contains<T: Any>(&self) -> bool {
        self.0.contains(&TypeId::of::<T>())
    }

    pub fn get<T: Any>(&self) -> Option<&T> {
        let value = self.0.get(&TypeId::of::<T>())?;
        <dyn Any>::downcast_ref(&**value)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for CustomAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CustomAttributes({} entries)", self.len())
    }
}

// -----------------------------------------------------------------------------
// Accessor macros

/// Adds `custom_attributes`, `get_attribute` and `has_attribute` for an
/// `Option<Arc<CustomAttributes>>` field.
macro_rules! impl_custom_attributes_fn {
    ($field:ident) => {
        #[inline]
        pub fn custom_attributes(&self) -> &$crate::info::CustomAttributes {
            match self.$field.as_deref() {
                Some(attributes) => attributes,
                None => $crate::info::CustomAttributes::empty(),
            }
        }

        /// Returns the attached value of type `T`.
        pub fn get_attribute<T: ::core::any::Any>(&self) -> Option<&T> {
            self.custom_attributes().get::<T>()
        }

        pub fn has_attribute<T: ::core::any::Any>(&self) -> bool {
            self.custom_attributes().contains::<T>()
        }
    };
}

/// Adds the `with_custom_attributes` builder called by derived code.
macro_rules! impl_with_custom_attributes {
    ($field:ident) => {
        pub fn with_custom_attributes(mut self, attributes: $crate::info::CustomAttributes) -> Self {
            self.$field = (!attributes.is_empty()).then(|| ::alloc::sync::Arc::new(attributes));
            self
        }
    };
}

pub(crate) use impl_custom_attributes_fn;
pub(crate) use impl_with_custom_attributes;

#[cfg(test)]
mod tests {
    use crate::info::{CustomAttributes, NamedField};

    struct Unit;

    #[test]
    fn attributes_of_a_local_descriptor() {
        let plain = NamedField::new::<u8>("plain");
        assert!(plain.custom_attributes().is_empty());
        assert!(!plain.has_attribute::<Unit>());

        let marked = NamedField::new::<u8>("marked")
            .with_custom_attributes(CustomAttributes::new().with_attribute(Unit).with_attribute(3_u8));
        assert_eq!(marked.custom_attributes().len(), 2);
        assert!(marked.has_attribute::<Unit>());
        assert_eq!(marked.get_attribute::<u8>(), Some(&3));
    }
}
