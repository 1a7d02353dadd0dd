use alloc::boxed::Box;

use crate::Reflect;
use crate::info::{Type, TypeInfo, Typed, impl_type_fn};

/// A container for compile-time info of `Option<T>`.
///
/// # Examples
///
/// ```
/// use mw_reflect::{Reflect, info::Typed};
///
/// let info = <Option<String>>::type_info().as_nullable().unwrap();
/// assert!(info.inner_ty().is::<String>());
///
/// let none = info.none();
/// assert_eq!(none.downcast_ref::<Option<String>>(), Some(&None));
///
/// let some = info.some(String::from("a").into_boxed_reflect()).unwrap();
/// assert_eq!(some.take::<Option<String>>().unwrap().as_deref(), Some("a"));
/// ```
#[derive(Clone, Debug)]
pub struct NullableInfo {
    ty: Type,
    inner_ty: Type,
    inner_info: fn() -> &'static TypeInfo,
    none: fn() -> Box<dyn Reflect>,
    some: fn(Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>>,
}

impl NullableInfo {
    impl_type_fn!(ty);

    /// Creates a new [`NullableInfo`] for `Option<T>`.
    pub fn new<T: Reflect + Typed>() -> Self {
        Self {
            ty: Type::of::<Option<T>>(),
            inner_ty: Type::of::<T>(),
            inner_info: T::type_info,
            none: new_none::<T>,
            some: new_some::<T>,
        }
    }

    /// Returns the inner [`Type`].
    #[inline]
    pub const fn inner_ty(&self) -> &Type {
        &self.inner_ty
    }

    /// Returns the inner [`TypeInfo`].
    #[inline]
    pub fn inner_info(&self) -> &'static TypeInfo {
        (self.inner_info)()
    }

    /// Creates an absent value.
    #[inline]
    pub fn none(&self) -> Box<dyn Reflect> {
        (self.none)()
    }

    /// Wraps `value` into a present value.
    ///
    /// Returns `value` back if it is not of the inner type.
    #[inline]
    pub fn some(&self, value: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
        (self.some)(value)
    }
}

fn new_none<T: Reflect + Typed>() -> Box<dyn Reflect> {
    Box::new(None::<T>)
}

fn new_some<T: Reflect + Typed>(
    value: Box<dyn Reflect>,
) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
    let value = value.take::<T>()?;
    Ok(Box::new(Some(value)))
}
