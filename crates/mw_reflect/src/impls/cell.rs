//! Static storage behind [`Typed::type_info`](crate::info::Typed::type_info).
//!
//! A `static` declared inside a generic function exists once for all of its
//! instantiations. [`GenericTypeInfoCell`] therefore keeps one [`TypeInfo`]
//! per concrete type, while [`NonGenericTypeInfoCell`] keeps exactly one.

use alloc::boxed::Box;
use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use mw_utils::TypeIdMap;

use crate::info::TypeInfo;

// -----------------------------------------------------------------------------
// NonGenericTypeInfoCell

/// Lazily built [`TypeInfo`] of a non-generic type.
pub struct NonGenericTypeInfoCell(OnceLock<TypeInfo>);

impl NonGenericTypeInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    #[inline]
    pub fn get_or_init(&self, init: impl FnOnce() -> TypeInfo) -> &TypeInfo {
        self.0.get_or_init(init)
    }
}

// -----------------------------------------------------------------------------
// GenericTypeInfoCell

/// Lazily built [`TypeInfo`]s of every instantiation of a generic type.
///
/// Entries are leaked, they live as long as the program.
///
/// ```
/// use mw_reflect::{
///     impls::GenericTypeInfoCell,
///     info::{OpaqueInfo, TypeInfo, Typed},
/// };
///
/// struct Handle<T>(T);
///
/// impl<T: 'static> Typed for Handle<T> {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
///         CELL.get_or_insert::<Self>(|| TypeInfo::Opaque(OpaqueInfo::new::<Self>()))
///     }
/// }
///
/// assert!(<Handle<u8>>::type_info().type_is::<Handle<u8>>());
/// assert!(<Handle<i8>>::type_info().type_is::<Handle<i8>>());
/// ```
pub struct GenericTypeInfoCell(RwLock<TypeIdMap<&'static TypeInfo>>);

impl GenericTypeInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Returns the info of `G`, building it with `init` on first use.
    ///
    /// `init` runs outside the lock: item types of a generic container may
    /// share this cell and are resolved from inside `init`. When two threads
    /// race, the first stored value wins.
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, init: impl FnOnce() -> TypeInfo) -> &TypeInfo {
        self.lookup(TypeId::of::<G>(), init)
    }

    #[inline(never)]
    fn lookup(&self, key: TypeId, init: impl FnOnce() -> TypeInfo) -> &'static TypeInfo {
        let cached = self
            .0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .copied();
        if let Some(info) = cached {
            return info;
        }

        let built = init();
        *self
            .0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert(key, || Box::leak(Box::new(built)))
    }
}

#[cfg(test)]
mod tests {
    use crate::info::{ReflectKind, Typed};

    #[test]
    fn instantiations_get_their_own_info() {
        let bytes = <Vec<u8>>::type_info();
        let nested = <Vec<Vec<u8>>>::type_info();

        assert!(bytes.type_is::<Vec<u8>>());
        assert!(nested.type_is::<Vec<Vec<u8>>>());
        assert!(core::ptr::eq(bytes, <Vec<u8>>::type_info()));

        let item = nested.as_list().unwrap().item_info();
        assert!(core::ptr::eq(item, bytes));
        assert_eq!(item.kind(), ReflectKind::List);
    }
}
