use crate::info::TypeInfo;

// -----------------------------------------------------------------------------
// Typed

/// Types that can describe themselves without an instance.
///
/// [`#[derive(Model)]`](crate::derive::Model) implements it for models.
/// Opaque types written by hand keep their info in a
/// [`NonGenericTypeInfoCell`] (or a [`GenericTypeInfoCell`] when generic):
///
/// ```
/// use mw_reflect::{
///     impls::NonGenericTypeInfoCell,
///     info::{OpaqueInfo, TypeInfo, Typed},
/// };
///
/// struct Token(u64);
///
/// impl Typed for Token {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::Opaque(OpaqueInfo::new::<Self>()))
///     }
/// }
///
/// assert!(Token::type_info().type_is::<Token>());
/// ```
///
/// [`NonGenericTypeInfoCell`]: crate::impls::NonGenericTypeInfoCell
/// [`GenericTypeInfoCell`]: crate::impls::GenericTypeInfoCell
pub trait Typed: 'static {
    fn type_info() -> &'static TypeInfo;
}

// -----------------------------------------------------------------------------
// DynamicTyped

/// Object-safe counterpart of [`Typed`], blanket implemented.
pub trait DynamicTyped {
    fn reflect_type_info(&self) -> &'static TypeInfo;
}

impl<T: Typed> DynamicTyped for T {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        T::type_info()
    }
}
