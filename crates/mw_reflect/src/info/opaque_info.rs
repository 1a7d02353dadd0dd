use core::any::Any;

use crate::info::{Type, impl_type_fn};

/// A container for compile-time info related to opaque types, including
/// every scalar.
///
/// An opaque type exposes no inner structure; converters handle it as a
/// whole value.
#[derive(Clone, Debug)]
pub struct OpaqueInfo {
    ty: Type,
}

impl OpaqueInfo {
    impl_type_fn!(ty);

    /// Creates a new [`OpaqueInfo`].
    #[inline]
    pub fn new<T: Any + ?Sized>() -> Self {
        Self { ty: Type::of::<T>() }
    }
}
