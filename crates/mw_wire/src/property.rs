use alloc::sync::Arc;
use core::any::TypeId;
use core::fmt;
use std::sync::{PoisonError, RwLock};

use mw_reflect::info::{NamedField, TypeInfo};
use mw_utils::hash::HashMap;

use crate::convert::Converter;
use crate::{ConverterQuery, ConverterRegistry, SerialError};

// -----------------------------------------------------------------------------
// PropertyMap

/// The binding of one model property to its converter.
pub struct PropertyMap {
    model: &'static TypeInfo,
    field: &'static NamedField,
    converter: Arc<dyn Converter>,
}

impl PropertyMap {
    #[inline]
    pub fn new(
        model: &'static TypeInfo,
        field: &'static NamedField,
        converter: Arc<dyn Converter>,
    ) -> Self {
        Self {
            model,
            field,
            converter,
        }
    }

    /// Resolves the converter of `field` through `registry`.
    pub fn resolve(
        registry: &ConverterRegistry,
        model: &'static TypeInfo,
        field: &'static NamedField,
    ) -> Result<Self, SerialError> {
        let converter = registry.resolve(&ConverterQuery::property(model, field))?;
        Ok(Self::new(model, field, converter))
    }

    /// The member key on the wire.
    #[inline]
    pub fn key(&self) -> &'static str {
        self.field.key()
    }

    /// The field name in source.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.field.name()
    }

    /// The model type declaring the property.
    #[inline]
    pub fn model(&self) -> &'static TypeInfo {
        self.model
    }

    /// The type of the property value.
    #[inline]
    pub fn value_info(&self) -> &'static TypeInfo {
        self.field.type_info()
    }

    #[inline]
    pub fn field(&self) -> &'static NamedField {
        self.field
    }

    #[inline]
    pub fn converter(&self) -> &Arc<dyn Converter> {
        &self.converter
    }
}

impl fmt::Debug for PropertyMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyMap")
            .field("model", &self.model.type_path())
            .field("name", &self.name())
            .field("key", &self.key())
            .field("converter", &self.converter.name())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// PropertyMapCache

/// Property maps keyed by model type and field name, created on first use.
///
/// Safe to populate from several threads: when two callers create the same
/// entry, the first inserted one is kept and handed to both.
#[derive(Default)]
pub struct PropertyMapCache {
    maps: RwLock<HashMap<(TypeId, &'static str), Arc<PropertyMap>>>,
}

impl PropertyMapCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached map of `field` in `model`, if created already.
    pub fn get(&self, model: &'static TypeInfo, field: &'static str) -> Option<Arc<PropertyMap>> {
        let maps = self.maps.read().unwrap_or_else(PoisonError::into_inner);
        maps.get(&(model.ty_id(), field)).cloned()
    }

    /// Returns the map of `field` in `model`, resolving its converter through
    /// `registry` on first use.
    pub fn get_or_create(
        &self,
        registry: &ConverterRegistry,
        model: &'static TypeInfo,
        field: &'static NamedField,
    ) -> Result<Arc<PropertyMap>, SerialError> {
        let key = (model.ty_id(), field.name());

        let maps = self.maps.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(map) = maps.get(&key) {
            return Ok(Arc::clone(map));
        }
        drop(maps);

        // Resolve without holding the lock, factories may be slow.
        let created = Arc::new(PropertyMap::resolve(registry, model, field)?);

        let mut maps = self.maps.write().unwrap_or_else(PoisonError::into_inner);
        let map = maps.entry(key).or_insert_with(|| {
            log::trace!(
                "property map `{}::{}` -> `{}`",
                model.type_path(),
                field.name(),
                created.converter.name()
            );
            created
        });
        Ok(Arc::clone(map))
    }

    /// Returns the number of cached maps.
    pub fn len(&self) -> usize {
        self.maps.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for PropertyMapCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyMapCache")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use alloc::vec::Vec;

    use mw_reflect::derive::Model;
    use mw_reflect::info::Typed;

    use super::PropertyMapCache;
    use crate::ConverterRegistry;
    use crate::convert::ListConverter;

    #[derive(Model, Default)]
    struct Node {
        #[model(rename = "kids")]
        children: Vec<Node>,
        label: String,
    }

    #[test]
    fn maps_are_created_once() {
        let registry = ConverterRegistry::new();
        let cache = PropertyMapCache::new();
        let model = Node::type_info();
        let field = model.as_struct().unwrap().field("children").unwrap();

        assert!(cache.get(model, "children").is_none());
        let first = cache.get_or_create(&registry, model, field).unwrap();
        let second = cache.get_or_create(&registry, model, field).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);

        assert_eq!(first.key(), "kids");
        assert_eq!(first.name(), "children");
        assert!(first.value_info().type_is::<Vec<Node>>());
        assert!(first.converter().is::<ListConverter>());
    }

    #[test]
    fn concurrent_creation_is_idempotent() {
        let registry = ConverterRegistry::new();
        let cache = PropertyMapCache::new();
        let model = Node::type_info();
        let field = model.as_struct().unwrap().field("label").unwrap();

        let maps: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| cache.get_or_create(&registry, model, field).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(cache.len(), 1);
        let kept = cache.get(model, "label").unwrap();
        assert!(maps.iter().all(|map| Arc::ptr_eq(map, &kept)));
    }
}
