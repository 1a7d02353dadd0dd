use crate::Reflect;

/// A trait for fieldless enums.
///
/// The variant index matches the order of
/// [`EnumInfo::iter`](crate::info::EnumInfo::iter).
///
/// # Examples
///
/// ```
/// use mw_reflect::{Reflect, derive::Model};
///
/// #[derive(Model)]
/// enum Side {
///     Left,
///     Right,
/// }
///
/// let value = Side::Right;
/// let side = value.reflect_ref().as_enum().unwrap();
/// assert_eq!(side.variant_index(), 1);
/// assert_eq!(side.variant_name(), "Right");
/// ```
pub trait Enum: Reflect {
    /// Returns the declaration index of the current variant.
    fn variant_index(&self) -> usize;

    /// Returns the source name of the current variant.
    fn variant_name(&self) -> &'static str;
}
