use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;

use crate::info::DynamicTyped;
use crate::ops::{ReflectMut, ReflectRef};

// -----------------------------------------------------------------------------
// Reflect

/// A value that converters can inspect without knowing its concrete type.
///
/// [`reflect_ref`] and [`reflect_mut`] expose the shape of the value
/// (struct, list, nullable, enum or opaque); the methods on `dyn Reflect`
/// recover the concrete type.
///
/// Implement it with [`#[derive(Model)]`](crate::derive::Model), or with
/// [`impl_reflect_cast_fn!`](crate::impl_reflect_cast_fn) for opaque types.
///
/// Prefer [`Reflect::ty_id`] over [`Any::type_id`], which on a
/// `Box<dyn Reflect>` names the box:
///
/// ```
/// # use mw_reflect::Reflect;
/// # use core::any::{Any, TypeId};
/// let x: Box<dyn Reflect> = 32_i32.into_boxed_reflect();
///
/// assert_ne!(x.type_id(), TypeId::of::<i32>());
/// assert_eq!(x.ty_id(), TypeId::of::<i32>());
/// ```
///
/// [`reflect_ref`]: Reflect::reflect_ref
/// [`reflect_mut`]: Reflect::reflect_mut
pub trait Reflect: DynamicTyped + Send + Sync + Any {
    fn as_reflect(&self) -> &dyn Reflect;

    fn as_reflect_mut(&mut self) -> &mut dyn Reflect;

    /// Overwrites `self` when `value` has the same type, otherwise hands
    /// `value` back.
    ///
    /// ```
    /// # use mw_reflect::Reflect;
    /// let mut x = 1_u8;
    /// assert!(x.set(2_u8.into_boxed_reflect()).is_ok());
    /// assert!(x.set(3_i32.into_boxed_reflect()).is_err());
    /// assert_eq!(x, 2);
    /// ```
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

    fn reflect_ref(&self) -> ReflectRef<'_>;

    fn reflect_mut(&mut self) -> ReflectMut<'_>;

    #[inline]
    fn ty_id(&self) -> TypeId {
        Any::type_id(self)
    }

    #[inline]
    fn reflect_type_path(&self) -> &'static str {
        self.reflect_type_info().type_path()
    }

    #[inline]
    fn into_boxed_reflect(self) -> Box<dyn Reflect>
    where
        Self: Sized,
    {
        Box::new(self)
    }
}

impl dyn Reflect {
    /// ```
    /// # use mw_reflect::Reflect;
    /// let x: Box<dyn Reflect> = 10_i32.into_boxed_reflect();
    ///
    /// assert!(x.is::<i32>());
    /// assert!(!x.is::<u32>());
    /// ```
    #[inline(always)]
    pub fn is<T: Any>(&self) -> bool {
        self.ty_id() == TypeId::of::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }

    /// Moves the value out of the box, or returns the box untouched when
    /// the type is not `T`.
    ///
    /// ```
    /// # use mw_reflect::Reflect;
    /// let x: Box<dyn Reflect> = String::from("id").into_boxed_reflect();
    ///
    /// let x = x.take::<u8>().unwrap_err();
    /// assert_eq!(x.take::<String>().unwrap(), "id");
    /// ```
    pub fn take<T: Any>(self: Box<dyn Reflect>) -> Result<T, Box<dyn Reflect>> {
        if !self.is::<T>() {
            return Err(self);
        }
        let any: Box<dyn Any> = self;
        match any.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(_) => unreachable!("type id was checked"),
        }
    }
}

impl fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reflect({})", self.reflect_type_path())
    }
}

// -----------------------------------------------------------------------------
// impl_reflect_cast_fn

/// Fills in the required [`Reflect`] methods for a sized type.
///
/// `$kind` names both the [`ReflectRef`]/[`ReflectMut`] variant and the ops
/// trait the type implements.
#[doc(hidden)]
#[macro_export]
macro_rules! impl_reflect_cast_fn {
    ($kind:ident) => {
        #[inline]
        fn as_reflect(&self) -> &dyn $crate::Reflect {
            self
        }

        #[inline]
        fn as_reflect_mut(&mut self) -> &mut dyn $crate::Reflect {
            self
        }

        fn set(
            &mut self,
            value: $crate::__macro_exports::Box<dyn $crate::Reflect>,
        ) -> ::core::result::Result<(), $crate::__macro_exports::Box<dyn $crate::Reflect>> {
            *self = value.take::<Self>()?;
            ::core::result::Result::Ok(())
        }

        #[inline]
        fn reflect_ref(&self) -> $crate::ops::ReflectRef<'_> {
            $crate::ops::ReflectRef::$kind(self)
        }

        #[inline]
        fn reflect_mut(&mut self) -> $crate::ops::ReflectMut<'_> {
            $crate::ops::ReflectMut::$kind(self)
        }
    };
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;

    use crate::Reflect;
    use crate::ops::ReflectRef;

    #[test]
    fn take_keeps_value_on_mismatch() {
        let value: Box<dyn Reflect> = 7_u16.into_boxed_reflect();
        let value = value.take::<i16>().unwrap_err();
        assert_eq!(value.take::<u16>().unwrap(), 7);
    }

    #[test]
    fn set_rejects_other_types() {
        let mut text = String::from("a");
        let rejected = text.set(1_i64.into_boxed_reflect()).unwrap_err();
        assert!(rejected.is::<i64>());
        assert_eq!(text, "a");
    }

    #[test]
    fn shape_and_path() {
        let list = alloc::vec![1_u8, 2];
        assert!(matches!(list.reflect_ref(), ReflectRef::List(_)));
        assert_eq!(list.as_reflect().reflect_type_path(), "alloc::vec::Vec<u8>");
        assert!(matches!(Some(1_u8).reflect_ref(), ReflectRef::Nullable(_)));
        assert!(matches!(true.reflect_ref(), ReflectRef::Opaque(_)));
    }
}
