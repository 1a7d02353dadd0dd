//! The [`Converter`] trait and the built-in converters.
//!
//! A converter reads one value from a [`ReadContext`] and writes one value to
//! a [`WriteContext`]. Every converter follows the same top-level protocol:
//!
//! - Read with `top_level = true`: the cursor has not been advanced yet, the
//!   converter advances once before looking at the first token.
//! - Read with `top_level = false`: the cursor already sits on the first
//!   token of the value.
//! - In both cases the cursor is left on the last token of the value.
//! - Write with `top_level = true`: the value is the document root and is
//!   emitted without a key.
//! - Write with `top_level = false`: the value is keyed with the property
//!   map's key if there is one (an object member), unkeyed otherwise (an
//!   array element). See [`member_key`].
//!
//! Composite converters ([`ListConverter`], [`NullableConverter`],
//! [`ObjectConverter`]) hold or look up the converters of their parts and
//! always call them with `top_level = false`.

// -----------------------------------------------------------------------------
// Modules

mod context;
mod enums;
mod list;
mod nullable;
mod object;
mod scalar;

#[cfg(all(debug_assertions, feature = "debug"))]
mod path_stack;

// -----------------------------------------------------------------------------
// Exports

pub use context::{ReadContext, WriteContext};
pub use enums::{I64EnumConverter, StringEnum, StringEnumConverter, U64EnumConverter};
pub use enums::{is_signed_enum, is_string_enum, is_unsigned_enum};
pub use list::ListConverter;
pub use nullable::NullableConverter;
pub use object::ObjectConverter;
pub use scalar::{ScalarConverter, WireScalar};

use alloc::boxed::Box;
use alloc::format;
use core::any::Any;
use core::fmt;

use mw_reflect::Reflect;
use mw_reflect::info::ReflectKindError;

use crate::{PropertyMap, SerialError};

// -----------------------------------------------------------------------------
// Converter

/// Reads and writes values of one type through the token cursor.
///
/// Converters are shared between threads and between documents, per-call
/// state lives in the contexts.
///
/// # Examples
///
/// A converter writing booleans as `"yes"`/`"no"`, registered for one
/// property only:
///
/// ```
/// use mw_reflect::{Reflect, derive::Model};
/// use mw_wire::convert::{Converter, ReadContext, WriteContext, member_key};
/// use mw_wire::{ConverterRegistry, PropertyMap, SerialError, Serializer};
///
/// struct YesNo;
///
/// impl Converter for YesNo {
///     fn read(&self, cx: &mut ReadContext<'_>, top_level: bool) -> Result<Box<dyn Reflect>, SerialError> {
///         let yes = cx.begin(top_level)?.as_str() == Some("yes");
///         Ok(Box::new(yes))
///     }
///
///     fn write(
///         &self,
///         cx: &mut WriteContext<'_>,
///         value: &dyn Reflect,
///         map: Option<&PropertyMap>,
///         top_level: bool,
///     ) -> Result<(), SerialError> {
///         let text = if value.downcast_ref::<bool>() == Some(&true) { "yes" } else { "no" };
///         cx.writer().write_string(member_key(map, top_level), text);
///         Ok(())
///     }
/// }
///
/// struct Verbose;
///
/// #[derive(Model, Default)]
/// struct Flags {
///     #[model(@Verbose)]
///     a: bool,
///     b: bool,
/// }
///
/// let mut registry = ConverterRegistry::new();
/// registry.add_converter_if::<bool>(YesNo, |query| query.has_attribute::<Verbose>());
/// let serializer = Serializer::with_registry(registry.into());
///
/// let mut out = Vec::new();
/// serializer.write(&mut out, &Flags { a: true, b: true }).unwrap();
/// assert_eq!(out, br#"{"a":"yes","b":true}"#);
/// ```
pub trait Converter: Any + Send + Sync {
    /// Reads one value, following the top-level protocol.
    fn read(&self, cx: &mut ReadContext<'_>, top_level: bool)
    -> Result<Box<dyn Reflect>, SerialError>;

    /// Writes one value, following the top-level protocol.
    ///
    /// `map` is the property being written, `None` at the root and for array
    /// elements.
    fn write(
        &self,
        cx: &mut WriteContext<'_>,
        value: &dyn Reflect,
        map: Option<&PropertyMap>,
        top_level: bool,
    ) -> Result<(), SerialError>;

    /// A readable name for logs, the type name by default.
    fn name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

impl dyn Converter {
    /// Returns `true` if the underlying converter is of type `C`.
    #[inline]
    pub fn is<C: Converter>(&self) -> bool {
        (self as &dyn Any).is::<C>()
    }

    /// Downcasts to the concrete converter type.
    #[inline]
    pub fn downcast_ref<C: Converter>(&self) -> Option<&C> {
        (self as &dyn Any).downcast_ref::<C>()
    }
}

impl fmt::Debug for dyn Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Converter({})", self.name())
    }
}

// -----------------------------------------------------------------------------
// Helpers

/// Returns the key a value is written with.
///
/// `None` at the document root and for array elements, the property key for
/// object members.
#[inline]
pub fn member_key(map: Option<&PropertyMap>, top_level: bool) -> Option<&'static str> {
    if top_level {
        None
    } else {
        map.map(PropertyMap::key)
    }
}

/// The value handed to a converter is not of the converter's type.
pub(crate) fn type_mismatch(expected: &'static str, value: &dyn Reflect) -> SerialError {
    SerialError::invalid_value(
        expected,
        format!("found a value of type `{}`", value.reflect_type_path()),
    )
}

pub(crate) fn kind_mismatch(type_path: &'static str, err: ReflectKindError) -> SerialError {
    SerialError::invalid_value(type_path, format!("{err}"))
}

/// A container refused a value produced by a nested converter.
pub(crate) fn rejected(type_path: &'static str, value: Box<dyn Reflect>) -> SerialError {
    SerialError::invalid_value(
        type_path,
        format!("cannot hold a value of type `{}`", value.reflect_type_path()),
    )
}
