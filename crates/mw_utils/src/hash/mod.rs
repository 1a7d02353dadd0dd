//! Hash builders and the `hashbrown` map used across the workspace.

// -----------------------------------------------------------------------------
// Modules

mod hasher;

// -----------------------------------------------------------------------------
// Exports

pub use hasher::{FixedHashState, FixedHasher};
pub use hasher::{NoOpHashState, NoOpHasher};

/// [`hashbrown::HashMap`] defaulting to [`FixedHashState`].
///
/// # Examples
///
/// ```
/// use mw_utils::hash::HashMap;
///
/// let mut keys: HashMap<&str, u32> = HashMap::default();
/// keys.insert("id", 1);
/// assert_eq!(keys.get("id"), Some(&1));
/// ```
pub type HashMap<K, V, S = FixedHashState> = hashbrown::HashMap<K, V, S>;

pub use foldhash;
pub use hashbrown;
