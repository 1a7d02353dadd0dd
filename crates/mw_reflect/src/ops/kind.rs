use crate::Reflect;
use crate::info::{ReflectKind, ReflectKindError};
use crate::ops::{Enum, List, Nullable, Struct};

// -----------------------------------------------------------------------------
// Auxiliary macro

macro_rules! impl_cast_method {
    ($name:ident : $kind:ident => $($ref:tt)+) => {
        /// Attempts a cast to the given kind.
        pub fn $name(self) -> Result<$($ref)+, ReflectKindError> {
            match self {
                Self::$kind(value) => Ok(value),
                _ => Err(ReflectKindError {
                    expected: ReflectKind::$kind,
                    received: self.kind(),
                }),
            }
        }
    };
}

// -----------------------------------------------------------------------------
// ReflectRef

/// An immutable enumeration of "kinds" of a reflected type.
///
/// Obtained through [`Reflect::reflect_ref`].
///
/// # Examples
///
/// ```
/// use mw_reflect::{Reflect, ops::ReflectRef};
///
/// let value = vec![1_u8, 2];
/// let ReflectRef::List(list) = value.reflect_ref() else { unreachable!() };
/// assert_eq!(list.len(), 2);
/// ```
pub enum ReflectRef<'a> {
    Opaque(&'a dyn Reflect),
    List(&'a dyn List),
    Nullable(&'a dyn Nullable),
    Enum(&'a dyn Enum),
    Struct(&'a dyn Struct),
}

impl<'a> ReflectRef<'a> {
    /// Returns the [`ReflectKind`] of this value.
    pub const fn kind(&self) -> ReflectKind {
        match self {
            Self::Opaque(_) => ReflectKind::Opaque,
            Self::List(_) => ReflectKind::List,
            Self::Nullable(_) => ReflectKind::Nullable,
            Self::Enum(_) => ReflectKind::Enum,
            Self::Struct(_) => ReflectKind::Struct,
        }
    }

    impl_cast_method!(as_opaque: Opaque => &'a dyn Reflect);
    impl_cast_method!(as_list: List => &'a dyn List);
    impl_cast_method!(as_nullable: Nullable => &'a dyn Nullable);
    impl_cast_method!(as_enum: Enum => &'a dyn Enum);
    impl_cast_method!(as_struct: Struct => &'a dyn Struct);
}

// -----------------------------------------------------------------------------
// ReflectMut

/// A mutable enumeration of "kinds" of a reflected type.
///
/// Obtained through [`Reflect::reflect_mut`].
pub enum ReflectMut<'a> {
    Opaque(&'a mut dyn Reflect),
    List(&'a mut dyn List),
    Nullable(&'a mut dyn Nullable),
    Enum(&'a mut dyn Enum),
    Struct(&'a mut dyn Struct),
}

impl<'a> ReflectMut<'a> {
    /// Returns the [`ReflectKind`] of this value.
    pub const fn kind(&self) -> ReflectKind {
        match self {
            Self::Opaque(_) => ReflectKind::Opaque,
            Self::List(_) => ReflectKind::List,
            Self::Nullable(_) => ReflectKind::Nullable,
            Self::Enum(_) => ReflectKind::Enum,
            Self::Struct(_) => ReflectKind::Struct,
        }
    }

    impl_cast_method!(as_opaque: Opaque => &'a mut dyn Reflect);
    impl_cast_method!(as_list: List => &'a mut dyn List);
    impl_cast_method!(as_nullable: Nullable => &'a mut dyn Nullable);
    impl_cast_method!(as_enum: Enum => &'a mut dyn Enum);
    impl_cast_method!(as_struct: Struct => &'a mut dyn Struct);
}
