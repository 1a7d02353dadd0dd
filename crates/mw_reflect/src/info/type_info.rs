use core::any::{Any, TypeId};
use core::{error, fmt};

use crate::info::{CustomAttributes, EnumInfo, ListInfo, NullableInfo};
use crate::info::{OpaqueInfo, StructInfo, Type};

// -----------------------------------------------------------------------------
// ReflectKind

/// The shape of a reflected type.
///
/// Each shape pairs with one ops trait (`Struct`, `List`, ...). Registries
/// keep one table of generic converters per shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReflectKind {
    Opaque,
    List,
    Nullable,
    Enum,
    Struct,
}

impl ReflectKind {
    pub const COUNT: usize = 5;

    /// Position of the shape in `0..COUNT`.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Opaque => "Opaque",
            Self::List => "List",
            Self::Nullable => "Nullable",
            Self::Enum => "Enum",
            Self::Struct => "Struct",
        }
    }
}

impl fmt::Display for ReflectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A [`TypeInfo`] or reflected value had another shape than requested.
#[derive(Debug)]
pub struct ReflectKindError {
    pub expected: ReflectKind,
    pub received: ReflectKind,
}

impl fmt::Display for ReflectKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected a {} type, found a {} type", self.expected, self.received)
    }
}

impl error::Error for ReflectKindError {}

// -----------------------------------------------------------------------------
// TypeInfo

/// Static description of a reflected type, one variant per shape.
///
/// Reached through [`Typed::type_info`] or, from a `dyn Reflect`, through
/// [`DynamicTyped::reflect_type_info`]. Infos are built once and live for
/// the rest of the program.
///
/// # Examples
///
/// ```
/// use mw_reflect::info::{ReflectKind, Typed};
///
/// let info = <Vec<Option<u8>>>::type_info();
/// assert_eq!(info.kind(), ReflectKind::List);
///
/// let item = info.as_list().unwrap().item_info();
/// assert_eq!(item.kind(), ReflectKind::Nullable);
/// assert!(item.as_nullable().unwrap().inner_info().type_is::<u8>());
/// ```
///
/// [`Typed::type_info`]: crate::info::Typed::type_info
/// [`DynamicTyped::reflect_type_info`]: crate::info::DynamicTyped::reflect_type_info
#[derive(Debug, Clone)]
pub enum TypeInfo {
    Opaque(OpaqueInfo),
    List(ListInfo),
    Nullable(NullableInfo),
    Enum(EnumInfo),
    Struct(StructInfo),
}

macro_rules! impl_cast_method {
    ($name:ident : $kind:ident => $info:ident) => {
        pub const fn $name(&self) -> Result<&$info, ReflectKindError> {
            match self {
                Self::$kind(info) => Ok(info),
                _ => Err(ReflectKindError {
                    expected: ReflectKind::$kind,
                    received: self.kind(),
                }),
            }
        }
    };
}

impl TypeInfo {
    impl_cast_method!(as_opaque: Opaque => OpaqueInfo);
    impl_cast_method!(as_list: List => ListInfo);
    impl_cast_method!(as_nullable: Nullable => NullableInfo);
    impl_cast_method!(as_enum: Enum => EnumInfo);
    impl_cast_method!(as_struct: Struct => StructInfo);

    pub const fn kind(&self) -> ReflectKind {
        match self {
            Self::Opaque(_) => ReflectKind::Opaque,
            Self::List(_) => ReflectKind::List,
            Self::Nullable(_) => ReflectKind::Nullable,
            Self::Enum(_) => ReflectKind::Enum,
            Self::Struct(_) => ReflectKind::Struct,
        }
    }

    pub const fn ty(&self) -> &Type {
        match self {
            Self::Opaque(opaque) => opaque.ty(),
            Self::List(list) => list.ty(),
            Self::Nullable(nullable) => nullable.ty(),
            Self::Enum(enumeration) => enumeration.ty(),
            Self::Struct(structure) => structure.ty(),
        }
    }

    #[inline]
    pub const fn ty_id(&self) -> TypeId {
        self.ty().id()
    }

    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.ty().path()
    }

    #[inline]
    pub fn type_is<T: Any>(&self) -> bool {
        self.ty().is::<T>()
    }

    /// Attributes declared on the type itself.
    ///
    /// Always empty for opaque, list and nullable types.
    pub fn custom_attributes(&self) -> &CustomAttributes {
        match self {
            Self::Enum(info) => info.custom_attributes(),
            Self::Struct(info) => info.custom_attributes(),
            _ => CustomAttributes::empty(),
        }
    }
}
