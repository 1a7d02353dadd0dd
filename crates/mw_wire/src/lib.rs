//! Converter based serialization of reflected models.
//!
//! A [`Serializer`] binds model types (anything implementing
//! [`Reflect`](mw_reflect::Reflect) and [`Typed`](mw_reflect::info::Typed),
//! usually through `#[derive(Model)]`) to JSON text, without per-model
//! encode or decode code.
//!
//! - [`token`]: the token cursor, a reader over tokens and a writer emitting them.
//! - [`json`]: JSON text to tokens and back.
//! - [`convert`]: the [`Converter`] trait and the built-in converters.
//! - [`ConverterRegistry`]: picks a converter for a type, by exact type or by
//!   shape (`List`, `Nullable`, `Enum`, `Struct`), optionally gated by a
//!   predicate, with scopes inheriting from a parent registry.
//! - [`PropertyMap`]: the per-property binding of a model field to its
//!   converter, created lazily and cached by the serializer.
//!
//! # Examples
//!
//! ```
//! use mw_reflect::derive::Model;
//! use mw_wire::Serializer;
//!
//! #[derive(Model, Default, Debug, PartialEq)]
//! struct Message {
//!     id: i64,
//!     tags: Vec<String>,
//!     note: Option<String>,
//! }
//!
//! let serializer = Serializer::new();
//! let message: Message = serializer
//!     .read(br#"{"id":123,"tags":["a","b"],"note":null}"#)
//!     .unwrap();
//! assert_eq!(message.tags, ["a", "b"]);
//!
//! let mut out = Vec::new();
//! serializer.write(&mut out, &message).unwrap();
//! assert_eq!(out, br#"{"id":123,"tags":["a","b"],"note":null}"#);
//! ```

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod config;
mod error;
mod property;
mod registry;
mod serializer;

pub mod convert;
pub mod json;
pub mod token;

// -----------------------------------------------------------------------------
// Top-level exports

pub use config::{DEFAULT_MAX_DEPTH, SerializerConfig};
pub use convert::Converter;
pub use error::{MalformedInputError, SerialError, UnresolvedConverterError};
pub use property::{PropertyMap, PropertyMapCache};
pub use registry::{ConverterFactory, ConverterPredicate, ConverterQuery, ConverterRegistry};
pub use serializer::Serializer;
