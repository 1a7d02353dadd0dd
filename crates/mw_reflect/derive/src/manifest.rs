use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use std::time::SystemTime;

use proc_macro2::Span;
use toml_edit::{Document, Item};

const FACADE_NAME: &str = "modelwire";
const CRATE_PREFIX: &str = "mw_";

/// The caller's parsed `Cargo.toml`, kept until the file changes.
pub(crate) struct Manifest {
    document: Document<String>,
    modified: SystemTime,
}

impl Manifest {
    /// Returns the path derived code should use to reach crate `name`.
    ///
    /// Direct dependencies are named as-is. A caller that only depends on
    /// the `modelwire` facade reaches `mw_xxx` as `::modelwire::xxx`. Regular
    /// dependencies are checked before dev-dependencies, and `::name` is the
    /// fallback (also used by `mw_reflect` itself through
    /// `extern crate self as mw_reflect`).
    pub(crate) fn crate_path(name: &str) -> syn::Path {
        static CACHE: Mutex<BTreeMap<PathBuf, Manifest>> = Mutex::new(BTreeMap::new());

        let Some(dir) = std::env::var_os("CARGO_MANIFEST_DIR") else {
            return absolute_path(&[name]);
        };
        let path = PathBuf::from(dir).join("Cargo.toml");
        let Ok(modified) = std::fs::metadata(&path).and_then(|meta| meta.modified()) else {
            return absolute_path(&[name]);
        };

        let mut cache = CACHE.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(manifest) = cache.get(&path)
            && manifest.modified == modified
        {
            return manifest.resolve(name);
        }

        let Some(document) = std::fs::read_to_string(&path)
            .ok()
            .and_then(|text| Document::parse(text).ok())
        else {
            return absolute_path(&[name]);
        };
        let manifest = Manifest { document, modified };
        let resolved = manifest.resolve(name);
        cache.insert(path, manifest);
        resolved
    }

    fn resolve(&self, name: &str) -> syn::Path {
        let short = name.strip_prefix(CRATE_PREFIX);
        for table in ["dependencies", "dev-dependencies"] {
            let Some(Item::Table(deps)) = self.document.get(table) else {
                continue;
            };
            if deps.contains_key(name) {
                return absolute_path(&[name]);
            }
            if let Some(short) = short
                && deps.contains_key(FACADE_NAME)
            {
                return absolute_path(&[FACADE_NAME, short]);
            }
        }
        absolute_path(&[name])
    }
}

/// Builds `::a::b` from identifier segments.
fn absolute_path(segments: &[&str]) -> syn::Path {
    syn::Path {
        leading_colon: Some(Default::default()),
        segments: segments
            .iter()
            .map(|segment| syn::PathSegment::from(syn::Ident::new(segment, Span::call_site())))
            .collect(),
    }
}
