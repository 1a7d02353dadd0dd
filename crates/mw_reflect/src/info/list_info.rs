use alloc::boxed::Box;

use crate::Reflect;
use crate::info::{Type, TypeInfo, Typed, impl_type_fn};
use crate::ops::List;

/// Describes a list type: its item type and how to make an empty one.
///
/// # Examples
///
/// ```
/// use mw_reflect::info::Typed;
///
/// let info = <Vec<i64>>::type_info().as_list().unwrap();
/// assert!(info.item_ty().is::<i64>());
///
/// let mut empty = info.new_empty();
/// let list = empty.reflect_mut().as_list().unwrap();
/// list.push(Box::new(3_i64)).unwrap();
/// assert_eq!(list.len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct ListInfo {
    ty: Type,
    item_ty: Type,
    // Deferred so `Vec<Self>` fields work.
    item_info: fn() -> &'static TypeInfo,
    new_empty: fn() -> Box<dyn Reflect>,
}

impl ListInfo {
    impl_type_fn!(ty);

    pub fn new<TList, TItem>() -> Self
    where
        TList: List + Typed + Default,
        TItem: Reflect + Typed,
    {
        Self {
            ty: Type::of::<TList>(),
            item_ty: Type::of::<TItem>(),
            item_info: TItem::type_info,
            new_empty: new_default::<TList>,
        }
    }

    #[inline]
    pub const fn item_ty(&self) -> &Type {
        &self.item_ty
    }

    #[inline]
    pub fn item_info(&self) -> &'static TypeInfo {
        (self.item_info)()
    }

    /// Creates an empty list of this type.
    #[inline]
    pub fn new_empty(&self) -> Box<dyn Reflect> {
        (self.new_empty)()
    }
}

fn new_default<T: Reflect + Default>() -> Box<dyn Reflect> {
    Box::new(T::default())
}
