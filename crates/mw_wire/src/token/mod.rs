//! The token cursor.
//!
//! A document is a flat sequence of [`Token`]s: array and object delimiters,
//! property keys and scalars. Converters consume tokens through a
//! [`TokenReader`] and emit them through a [`TokenWriter`]; the [`json`]
//! module turns bytes into tokens and back.
//!
//! ```text
//! {"id":1,"tags":["a"]}
//!
//! StartObject, PropertyKey("id"), Number(1),
//! PropertyKey("tags"), StartArray, String("a"), EndArray, EndObject
//! ```
//!
//! [`json`]: crate::json

// -----------------------------------------------------------------------------
// Modules

mod reader;
mod writer;

// -----------------------------------------------------------------------------
// Exports

pub use reader::TokenReader;
pub use writer::TokenWriter;

use alloc::string::String;
use core::fmt;

use serde_json::Number;

// -----------------------------------------------------------------------------
// Token

/// One token of the wire encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    StartArray,
    EndArray,
    StartObject,
    EndObject,
    PropertyKey(String),
    String(String),
    Number(Number),
    Bool(bool),
    Null,
}

impl Token {
    /// Returns the payload-free [`TokenKind`].
    pub const fn kind(&self) -> TokenKind {
        match self {
            Self::StartArray => TokenKind::StartArray,
            Self::EndArray => TokenKind::EndArray,
            Self::StartObject => TokenKind::StartObject,
            Self::EndObject => TokenKind::EndObject,
            Self::PropertyKey(_) => TokenKind::PropertyKey,
            Self::String(_) => TokenKind::String,
            Self::Number(_) => TokenKind::Number,
            Self::Bool(_) => TokenKind::Bool,
            Self::Null => TokenKind::Null,
        }
    }

    /// Returns the text of a `String` token.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the key of a `PropertyKey` token.
    #[inline]
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Self::PropertyKey(key) => Some(key),
            _ => None,
        }
    }

    /// Returns the value of a `Number` token.
    #[inline]
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Number(number) => Some(number),
            _ => None,
        }
    }

    /// Returns the value of a `Bool` token.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

// -----------------------------------------------------------------------------
// TokenKind

/// The kind of a [`Token`], without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    StartArray,
    EndArray,
    StartObject,
    EndObject,
    PropertyKey,
    String,
    Number,
    Bool,
    Null,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartArray => f.pad("StartArray"),
            Self::EndArray => f.pad("EndArray"),
            Self::StartObject => f.pad("StartObject"),
            Self::EndObject => f.pad("EndObject"),
            Self::PropertyKey => f.pad("PropertyKey"),
            Self::String => f.pad("String"),
            Self::Number => f.pad("Number"),
            Self::Bool => f.pad("Bool"),
            Self::Null => f.pad("Null"),
        }
    }
}
