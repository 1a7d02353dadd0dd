use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;

use mw_reflect::info::{NamedField, ReflectKind, TypeInfo, Typed};
use mw_utils::TypeIdMap;

use crate::convert::{Converter, ListConverter, NullableConverter, ObjectConverter, ScalarConverter};
use crate::convert::{I64EnumConverter, StringEnumConverter, U64EnumConverter};
use crate::convert::{is_signed_enum, is_string_enum, is_unsigned_enum};
use crate::{SerialError, UnresolvedConverterError};

// -----------------------------------------------------------------------------
// ConverterQuery

/// What a converter is requested for: the value type, and the property it
/// belongs to when resolving a model member.
///
/// Predicates and factories receive the query. Composite factories forward
/// it to their parts with [`with_value`](Self::with_value), so a property's
/// attributes reach e.g. the item converter of a list property.
#[derive(Debug, Clone, Copy)]
pub struct ConverterQuery {
    /// The type to convert.
    pub value: &'static TypeInfo,
    /// The model type declaring the property, if any.
    pub declaring: Option<&'static TypeInfo>,
    /// The property, if any.
    pub field: Option<&'static NamedField>,
}

impl ConverterQuery {
    /// A query for a value outside of any property, e.g. a document root.
    #[inline]
    pub const fn root(value: &'static TypeInfo) -> Self {
        Self {
            value,
            declaring: None,
            field: None,
        }
    }

    /// Shorthand for `ConverterQuery::root(T::type_info())`.
    #[inline]
    pub fn of<T: Typed>() -> Self {
        Self::root(T::type_info())
    }

    /// A query for the property `field` of `model`.
    #[inline]
    pub fn property(model: &'static TypeInfo, field: &'static NamedField) -> Self {
        Self {
            value: field.type_info(),
            declaring: Some(model),
            field: Some(field),
        }
    }

    /// The same declaring type and property, another value type.
    #[inline]
    pub const fn with_value(self, value: &'static TypeInfo) -> Self {
        Self { value, ..self }
    }

    /// Returns `true` if the property carries an attribute of type `A`.
    #[inline]
    pub fn has_attribute<A: Any>(&self) -> bool {
        self.field.is_some_and(|field| field.has_attribute::<A>())
    }

    /// Returns the property's attribute of type `A`.
    #[inline]
    pub fn get_attribute<A: Any>(&self) -> Option<&'static A> {
        self.field.and_then(|field| field.get_attribute::<A>())
    }
}

// -----------------------------------------------------------------------------
// Registration

/// Creates a converter for a query.
///
/// The registry argument is the registry resolution started from, which is
/// where inner converters must be resolved.
pub type ConverterFactory = Arc<
    dyn Fn(&ConverterQuery, &ConverterRegistry) -> Result<Arc<dyn Converter>, SerialError>
        + Send
        + Sync,
>;

/// Gates a registration, see [`ConverterRegistry`].
pub type ConverterPredicate = Arc<dyn Fn(&ConverterQuery) -> bool + Send + Sync>;

#[derive(Clone)]
struct Registration {
    factory: ConverterFactory,
    predicate: Option<ConverterPredicate>,
}

impl Registration {
    #[inline]
    fn matches(&self, query: &ConverterQuery) -> bool {
        self.predicate.as_ref().is_some_and(|predicate| predicate(query))
    }
}

fn find_conditional<'a>(
    registrations: &'a [Registration],
    query: &ConverterQuery,
) -> Option<&'a Registration> {
    registrations.iter().rev().find(|r| r.matches(query))
}

fn find_unconditional(registrations: &[Registration]) -> Option<&Registration> {
    registrations.iter().rev().find(|r| r.predicate.is_none())
}

fn converter_factory(converter: impl Converter) -> ConverterFactory {
    let converter: Arc<dyn Converter> = Arc::new(converter);
    Arc::new(
        move |_: &ConverterQuery, _: &ConverterRegistry| -> Result<Arc<dyn Converter>, SerialError> {
            Ok(Arc::clone(&converter))
        },
    )
}

// -----------------------------------------------------------------------------
// ConverterRegistry

/// Selects the converter of a type.
///
/// Registrations are either *exact*, for one concrete type, or *generic*,
/// for every type of a [`ReflectKind`] (any list, any nullable, ...). Either
/// may be gated by a predicate over the [`ConverterQuery`]. Resolution picks
/// the first match in this order, the most recent registration winning
/// inside each tier:
///
/// 1. exact registrations whose predicate matches,
/// 2. unconditional exact registrations,
/// 3. generic registrations whose predicate matches,
/// 4. unconditional generic registrations.
///
/// A registry created by [`create_scope`](Self::create_scope) has a parent,
/// consulted only when the scope itself has no match. Scopes never modify
/// their parent.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use mw_wire::convert::ScalarConverter;
/// use mw_wire::{ConverterQuery, ConverterRegistry};
///
/// let parent = Arc::new(ConverterRegistry::new());
/// let mut scope = parent.create_scope();
/// scope.add_converter::<i64>(ScalarConverter::<i64>::new());
///
/// let from_scope = scope.resolve(&ConverterQuery::of::<i64>()).unwrap();
/// let from_parent = parent.resolve(&ConverterQuery::of::<i64>()).unwrap();
/// assert!(!Arc::ptr_eq(&from_scope, &from_parent));
///
/// // Everything else still comes from the parent.
/// assert!(scope.resolve(&ConverterQuery::of::<Vec<bool>>()).is_ok());
/// ```
pub struct ConverterRegistry {
    exact: TypeIdMap<Vec<Registration>>,
    generic: [Vec<Registration>; ReflectKind::COUNT],
    parent: Option<Arc<ConverterRegistry>>,
}

impl ConverterRegistry {
    /// Creates a registry without registrations and without parent.
    pub fn empty() -> Self {
        Self {
            exact: TypeIdMap::new(),
            generic: core::array::from_fn(|_| Vec::new()),
            parent: None,
        }
    }

    /// Creates the default registry.
    ///
    /// Registered in this order:
    ///
    /// - scalar converters for `i8`, `i16`, `i32`, `i64`, `u8`, `u16`, `u32`,
    ///   `u64`, `f32`, `f64`, `bool`, `char` and `String`;
    /// - [`ListConverter`] for `List`, [`NullableConverter`] for `Nullable`,
    ///   [`ObjectConverter`] for `Struct`;
    /// - for `Enum`: [`I64EnumConverter`] if signed, [`U64EnumConverter`] if
    ///   unsigned, then [`StringEnumConverter`] if marked with
    ///   [`StringEnum`](crate::convert::StringEnum). Being the most recent,
    ///   the string rule is tried first.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry
            .add_converter::<i8>(ScalarConverter::<i8>::new())
            .add_converter::<i16>(ScalarConverter::<i16>::new())
            .add_converter::<i32>(ScalarConverter::<i32>::new())
            .add_converter::<i64>(ScalarConverter::<i64>::new())
            .add_converter::<u8>(ScalarConverter::<u8>::new())
            .add_converter::<u16>(ScalarConverter::<u16>::new())
            .add_converter::<u32>(ScalarConverter::<u32>::new())
            .add_converter::<u64>(ScalarConverter::<u64>::new())
            .add_converter::<f32>(ScalarConverter::<f32>::new())
            .add_converter::<f64>(ScalarConverter::<f64>::new())
            .add_converter::<bool>(ScalarConverter::<bool>::new())
            .add_converter::<char>(ScalarConverter::<char>::new())
            .add_converter::<String>(ScalarConverter::<String>::new())
            .add_generic_converter(ReflectKind::List, ListConverter::factory)
            .add_generic_converter(ReflectKind::Nullable, NullableConverter::factory)
            .add_generic_converter(ReflectKind::Struct, ObjectConverter::factory)
            .add_generic_converter_if(ReflectKind::Enum, I64EnumConverter::factory, is_signed_enum)
            .add_generic_converter_if(ReflectKind::Enum, U64EnumConverter::factory, is_unsigned_enum)
            .add_generic_converter_if(ReflectKind::Enum, StringEnumConverter::factory, is_string_enum);
        registry
    }

    /// Creates a child registry whose parent is `self`.
    pub fn create_scope(self: &Arc<Self>) -> Self {
        Self {
            parent: Some(Arc::clone(self)),
            ..Self::empty()
        }
    }

    /// Returns the parent registry, if this is a scope.
    #[inline]
    pub fn parent(&self) -> Option<&Arc<ConverterRegistry>> {
        self.parent.as_ref()
    }

    fn push_exact(&mut self, type_info: &'static TypeInfo, registration: Registration) {
        let registrations = self.exact.get_or_insert(type_info.ty_id(), Vec::new);
        if registration.predicate.is_none() && find_unconditional(registrations).is_some() {
            log::warn!(
                "converter registration for `{}` shadows an earlier one",
                type_info.type_path()
            );
        }
        registrations.push(registration);
    }

    /// Registers `converter` for the type `T`.
    pub fn add_converter<T: Typed>(&mut self, converter: impl Converter) -> &mut Self {
        self.push_exact(
            T::type_info(),
            Registration {
                factory: converter_factory(converter),
                predicate: None,
            },
        );
        self
    }

    /// Registers `converter` for the type `T`, used only when `predicate`
    /// holds.
    pub fn add_converter_if<T: Typed>(
        &mut self,
        converter: impl Converter,
        predicate: impl Fn(&ConverterQuery) -> bool + Send + Sync + 'static,
    ) -> &mut Self {
        self.push_exact(
            T::type_info(),
            Registration {
                factory: converter_factory(converter),
                predicate: Some(Arc::new(predicate)),
            },
        );
        self
    }

    /// Registers a factory creating the converter of the type `T`.
    pub fn add_converter_factory<T: Typed>(
        &mut self,
        factory: impl Fn(&ConverterQuery, &ConverterRegistry) -> Result<Arc<dyn Converter>, SerialError>
        + Send
        + Sync
        + 'static,
    ) -> &mut Self {
        self.push_exact(
            T::type_info(),
            Registration {
                factory: Arc::new(factory),
                predicate: None,
            },
        );
        self
    }

    /// Registers a factory for the type `T`, used only when `predicate` holds.
    pub fn add_converter_factory_if<T: Typed>(
        &mut self,
        factory: impl Fn(&ConverterQuery, &ConverterRegistry) -> Result<Arc<dyn Converter>, SerialError>
        + Send
        + Sync
        + 'static,
        predicate: impl Fn(&ConverterQuery) -> bool + Send + Sync + 'static,
    ) -> &mut Self {
        self.push_exact(
            T::type_info(),
            Registration {
                factory: Arc::new(factory),
                predicate: Some(Arc::new(predicate)),
            },
        );
        self
    }

    /// Registers a factory for every type of the given kind.
    pub fn add_generic_converter(
        &mut self,
        kind: ReflectKind,
        factory: impl Fn(&ConverterQuery, &ConverterRegistry) -> Result<Arc<dyn Converter>, SerialError>
        + Send
        + Sync
        + 'static,
    ) -> &mut Self {
        self.generic[kind.index()].push(Registration {
            factory: Arc::new(factory),
            predicate: None,
        });
        self
    }

    /// Registers a factory for every type of the given kind, used only when
    /// `predicate` holds.
    pub fn add_generic_converter_if(
        &mut self,
        kind: ReflectKind,
        factory: impl Fn(&ConverterQuery, &ConverterRegistry) -> Result<Arc<dyn Converter>, SerialError>
        + Send
        + Sync
        + 'static,
        predicate: impl Fn(&ConverterQuery) -> bool + Send + Sync + 'static,
    ) -> &mut Self {
        self.generic[kind.index()].push(Registration {
            factory: Arc::new(factory),
            predicate: Some(Arc::new(predicate)),
        });
        self
    }

    /// Finds the registration for `query` in this registry only.
    fn find(&self, query: &ConverterQuery) -> Option<&Registration> {
        let exact = self
            .exact
            .get(&query.value.ty_id())
            .map(Vec::as_slice)
            .unwrap_or_default();
        let generic = &self.generic[query.value.kind().index()];

        find_conditional(exact, query)
            .or_else(|| find_unconditional(exact))
            .or_else(|| find_conditional(generic, query))
            .or_else(|| find_unconditional(generic))
    }

    /// Resolves the converter for `query`.
    ///
    /// Searches this registry, then its ancestors. The matching factory is
    /// handed `self`, so inner converters also resolve from this scope.
    pub fn resolve(&self, query: &ConverterQuery) -> Result<Arc<dyn Converter>, SerialError> {
        let mut registry = Some(self);
        while let Some(current) = registry {
            if let Some(registration) = current.find(query) {
                let converter = (registration.factory)(query, self)?;
                log::debug!(
                    "resolved `{}` to `{}`",
                    query.value.type_path(),
                    converter.name()
                );
                return Ok(converter);
            }
            registry = current.parent.as_deref();
        }
        Err(UnresolvedConverterError::of(query).into())
    }

    /// Returns `true` if `T` has an exact registration here or in an
    /// ancestor.
    pub fn contains<T: Typed>(&self) -> bool {
        let id = TypeId::of::<T>();
        let mut registry = Some(self);
        while let Some(current) = registry {
            if current.exact.contains(&id) {
                return true;
            }
            registry = current.parent.as_deref();
        }
        false
    }
}

impl Default for ConverterRegistry {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("exact", &self.exact.len())
            .field("generic", &self.generic.iter().map(Vec::len).sum::<usize>())
            .field("parent", &self.parent)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::format;
    use alloc::sync::Arc;
    use alloc::vec::Vec;

    use mw_reflect::Reflect;
    use mw_reflect::derive::Model;
    use mw_reflect::info::{ReflectKind, Typed};

    use super::{ConverterQuery, ConverterRegistry};
    use crate::convert::{
        Converter, ListConverter, NullableConverter, ObjectConverter, ReadContext, ScalarConverter,
        WriteContext,
    };
    use crate::{PropertyMap, SerialError};

    struct Marker;

    #[derive(Model, Default)]
    struct Sample {
        #[model(@Marker)]
        marked: i64,
        plain: i64,
        #[model(@Marker)]
        tags: Vec<u8>,
    }

    struct Fixed(i64);

    impl Converter for Fixed {
        fn read(&self, _: &mut ReadContext<'_>, _: bool) -> Result<Box<dyn Reflect>, SerialError> {
            Ok(Box::new(self.0))
        }

        fn write(
            &self,
            _: &mut WriteContext<'_>,
            _: &dyn Reflect,
            _: Option<&PropertyMap>,
            _: bool,
        ) -> Result<(), SerialError> {
            Ok(())
        }
    }

    fn sample_field(name: &str) -> ConverterQuery {
        let model = Sample::type_info();
        let field = model.as_struct().unwrap().field(name).unwrap();
        ConverterQuery::property(model, field)
    }

    #[test]
    fn predicate_gated_beats_unconditional() {
        let mut registry = ConverterRegistry::new();
        registry.add_converter_if::<i64>(Fixed(7), |q| q.has_attribute::<Marker>());
        // Added later, but unconditional registrations rank below matching
        // predicates.
        registry.add_converter::<i64>(Fixed(1));

        let marked = registry.resolve(&sample_field("marked")).unwrap();
        assert_eq!(marked.downcast_ref::<Fixed>().unwrap().0, 7);

        let plain = registry.resolve(&sample_field("plain")).unwrap();
        assert_eq!(plain.downcast_ref::<Fixed>().unwrap().0, 1);
    }

    #[test]
    fn most_recent_registration_wins() {
        let mut registry = ConverterRegistry::empty();
        registry.add_converter::<i64>(Fixed(1));
        registry.add_converter::<i64>(Fixed(2));

        let resolved = registry.resolve(&ConverterQuery::of::<i64>()).unwrap();
        assert_eq!(resolved.downcast_ref::<Fixed>().unwrap().0, 2);
    }

    #[test]
    fn exact_beats_generic() {
        let mut registry = ConverterRegistry::new();
        registry.add_converter::<Vec<i64>>(Fixed(3));

        let exact = registry.resolve(&ConverterQuery::of::<Vec<i64>>()).unwrap();
        assert!(exact.is::<Fixed>());

        let generic = registry.resolve(&ConverterQuery::of::<Vec<i32>>()).unwrap();
        assert!(generic.is::<ListConverter>());
    }

    #[test]
    fn composite_shapes() {
        let registry = ConverterRegistry::new();

        let list = registry
            .resolve(&ConverterQuery::of::<Vec<Option<bool>>>())
            .unwrap();
        let item = list.downcast_ref::<ListConverter>().unwrap().item_converter();
        let inner = item
            .downcast_ref::<NullableConverter>()
            .unwrap()
            .inner_converter();
        assert!(inner.is::<ScalarConverter<bool>>());

        let object = registry.resolve(&ConverterQuery::of::<Sample>()).unwrap();
        assert!(object.is::<ObjectConverter>());
    }

    #[test]
    fn inner_converters_resolve_from_the_scope() {
        let parent = Arc::new(ConverterRegistry::new());
        let mut scope = parent.create_scope();
        scope.add_converter::<i64>(Fixed(9));

        let list = scope.resolve(&ConverterQuery::of::<Vec<i64>>()).unwrap();
        let item = list.downcast_ref::<ListConverter>().unwrap().item_converter();
        assert!(item.is::<Fixed>());

        let list = parent.resolve(&ConverterQuery::of::<Vec<i64>>()).unwrap();
        let item = list.downcast_ref::<ListConverter>().unwrap().item_converter();
        assert!(item.is::<ScalarConverter<i64>>());
    }

    #[test]
    fn generic_registrations_can_be_gated() {
        let mut registry = ConverterRegistry::new();
        registry.add_generic_converter_if(
            ReflectKind::List,
            |_, _| Ok(Arc::new(Fixed(0))),
            |q| q.has_attribute::<Marker>(),
        );

        let plain = registry.resolve(&ConverterQuery::of::<Vec<u8>>()).unwrap();
        assert!(plain.is::<ListConverter>());

        let marked = registry.resolve(&sample_field("tags")).unwrap();
        assert!(marked.is::<Fixed>());
    }

    #[test]
    fn unresolved_types() {
        let registry = ConverterRegistry::empty();
        let err = registry.resolve(&ConverterQuery::of::<i64>()).unwrap_err();
        assert!(err.is_unresolved());

        // The item type has no converter, so neither has the list.
        let mut registry = ConverterRegistry::empty();
        registry.add_generic_converter(ReflectKind::List, ListConverter::factory);
        let err = registry
            .resolve(&ConverterQuery::of::<Vec<i64>>())
            .unwrap_err();
        assert!(err.is_unresolved());
        assert!(err.to_string().contains("`i64`"));

        assert!(!registry.contains::<i64>());
        assert!(ConverterRegistry::new().contains::<i64>());
    }

    #[test]
    fn resolved_converters_print_their_name() {
        let registry = ConverterRegistry::new();
        let resolved = registry.resolve(&ConverterQuery::of::<bool>());
        let text = format!("{resolved:?}");
        assert!(text.starts_with("Ok(Converter("));
        assert!(text.contains("ScalarConverter<bool>"));
    }
}
