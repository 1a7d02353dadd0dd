use alloc::boxed::Box;
use alloc::sync::Arc;
use core::fmt;

use crate::Reflect;
use crate::info::{CustomAttributes, Type, Typed, impl_type_fn};
use crate::info::{impl_custom_attributes_fn, impl_with_custom_attributes};
use crate::ops::Enum;

// -----------------------------------------------------------------------------
// EnumRepr

/// The integer representation of a fieldless enum, from `#[repr(..)]`.
///
/// Enums without an explicit representation use [`EnumRepr::Isize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumRepr {
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
}

impl EnumRepr {
    /// Returns `true` for signed representations.
    #[inline]
    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            Self::I8 | Self::I16 | Self::I32 | Self::I64 | Self::Isize
        )
    }
}

// -----------------------------------------------------------------------------
// Discriminant

/// The discriminant value of an enum variant, widened to 64 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Discriminant {
    Signed(i64),
    Unsigned(u64),
}

impl fmt::Display for Discriminant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signed(value) => fmt::Display::fmt(value, f),
            Self::Unsigned(value) => fmt::Display::fmt(value, f),
        }
    }
}

// -----------------------------------------------------------------------------
// VariantInfo

/// One variant of a fieldless enum.
///
/// The key starts out equal to the name.
#[derive(Clone, Debug)]
pub struct VariantInfo {
    name: &'static str,
    key: &'static str,
    discriminant: Discriminant,
    custom_attributes: Option<Arc<CustomAttributes>>,
}

impl VariantInfo {
    impl_custom_attributes_fn!(custom_attributes);
    impl_with_custom_attributes!(custom_attributes);

    #[inline]
    pub const fn new(name: &'static str, discriminant: Discriminant) -> Self {
        Self {
            name,
            key: name,
            discriminant,
            custom_attributes: None,
        }
    }

    /// Sets the name used when the enum is written as a string.
    #[inline]
    pub const fn with_key(mut self, key: &'static str) -> Self {
        self.key = key;
        self
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn key(&self) -> &'static str {
        self.key
    }

    #[inline]
    pub const fn discriminant(&self) -> Discriminant {
        self.discriminant
    }
}

// -----------------------------------------------------------------------------
// EnumInfo

/// Describes a fieldless enum: its `repr`, variants and how to build them.
///
/// # Examples
///
/// ```
/// use mw_reflect::{derive::Model, info::{Discriminant, EnumRepr, Typed}};
///
/// #[derive(Model, Debug, PartialEq)]
/// #[repr(u8)]
/// enum Level {
///     Low = 1,
///     #[model(rename = "HIGH")]
///     High = 9,
/// }
///
/// let info = Level::type_info().as_enum().unwrap();
/// assert_eq!(info.repr(), EnumRepr::U8);
///
/// let (index, variant) = info.variant_by_discriminant(Discriminant::Unsigned(9)).unwrap();
/// assert_eq!(variant.key(), "HIGH");
///
/// let value = info.construct(index).unwrap();
/// assert_eq!(value.take::<Level>().unwrap(), Level::High);
/// ```
#[derive(Clone, Debug)]
pub struct EnumInfo {
    ty: Type,
    repr: EnumRepr,
    variants: Box<[VariantInfo]>,
    from_index: fn(usize) -> Option<Box<dyn Reflect>>,
    custom_attributes: Option<Arc<CustomAttributes>>,
}

impl EnumInfo {
    impl_type_fn!(ty);
    impl_custom_attributes_fn!(custom_attributes);
    impl_with_custom_attributes!(custom_attributes);

    /// `from_index` maps a declaration index to the boxed variant.
    pub fn new<T: Enum + Typed>(
        repr: EnumRepr,
        variants: &[VariantInfo],
        from_index: fn(usize) -> Option<Box<dyn Reflect>>,
    ) -> Self {
        Self {
            ty: Type::of::<T>(),
            repr,
            variants: variants.into(),
            from_index,
            custom_attributes: None,
        }
    }

    #[inline]
    pub const fn repr(&self) -> EnumRepr {
        self.repr
    }

    /// Looks a variant up by its Rust name.
    pub fn variant(&self, name: &str) -> Option<&VariantInfo> {
        self.variants.iter().find(|v| v.name == name)
    }

    #[inline]
    pub fn variant_at(&self, index: usize) -> Option<&VariantInfo> {
        self.variants.get(index)
    }

    /// Looks a variant up by its wire key, with its index.
    pub fn variant_by_key(&self, key: &str) -> Option<(usize, &VariantInfo)> {
        self.variants.iter().enumerate().find(|(_, v)| v.key == key)
    }

    pub fn variant_by_discriminant(
        &self,
        discriminant: Discriminant,
    ) -> Option<(usize, &VariantInfo)> {
        self.variants
            .iter()
            .enumerate()
            .find(|(_, v)| v.discriminant == discriminant)
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &VariantInfo> {
        self.variants.iter()
    }

    #[inline]
    pub fn variant_len(&self) -> usize {
        self.variants.len()
    }

    /// Boxes the variant at `index`.
    #[inline]
    pub fn construct(&self, index: usize) -> Option<Box<dyn Reflect>> {
        (self.from_index)(index)
    }
}
