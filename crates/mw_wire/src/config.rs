/// The default nesting limit of [`SerializerConfig`].
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Runtime options of a [`Serializer`](crate::Serializer).
///
/// # Examples
///
/// ```
/// use mw_wire::{Serializer, SerializerConfig};
///
/// let serializer = Serializer::new().with_config(
///     SerializerConfig::default()
///         .with_max_depth(16)
///         .with_reject_unknown_members(true),
/// );
/// assert_eq!(serializer.config().max_depth, 16);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializerConfig {
    /// Maximum nesting of converters while reading or writing one document.
    ///
    /// Exceeding it while reading is malformed input, while writing it is an
    /// invalid value.
    pub max_depth: usize,
    /// Reject object members that match no property, instead of skipping them.
    pub reject_unknown_members: bool,
}

impl SerializerConfig {
    #[inline]
    pub const fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            reject_unknown_members: false,
        }
    }

    #[inline]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[inline]
    pub const fn with_reject_unknown_members(mut self, reject: bool) -> Self {
        self.reject_unknown_members = reject;
        self
    }
}

impl Default for SerializerConfig {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
