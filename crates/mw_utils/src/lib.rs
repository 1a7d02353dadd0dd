//! Shared containers for the `modelwire` crates.
//!
//! - [`TypeIdMap`]: a map keyed by [`TypeId`](core::any::TypeId) that skips hashing.
//! - [`hash`]: hash builders and a `hashbrown` map with a fixed `foldhash` seed.

// -----------------------------------------------------------------------------
// Modules

mod typeid_map;

pub mod hash;

// -----------------------------------------------------------------------------
// Top-level exports

pub use typeid_map::TypeIdMap;
