use crate::Reflect;

/// A trait for named structs.
///
/// Fields are addressed by source name or by declaration index; skipped
/// fields are not reachable.
///
/// # Examples
///
/// ```
/// use mw_reflect::{Reflect, derive::Model};
///
/// #[derive(Model, Default)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let mut point = Point { x: 1, y: 2 };
/// let data = point.reflect_mut().as_struct().unwrap();
/// data.field_at_mut(1).unwrap().set(Box::new(5_i32)).unwrap();
///
/// assert_eq!(data.field_len(), 2);
/// assert_eq!(data.field("y").unwrap().downcast_ref::<i32>(), Some(&5));
/// assert!(data.field("z").is_none());
/// ```
pub trait Struct: Reflect {
    /// Returns the field with the given source `name`, if present.
    fn field(&self, name: &str) -> Option<&dyn Reflect>;

    /// Returns the field with the given source `name` mutably, if present.
    fn field_mut(&mut self, name: &str) -> Option<&mut dyn Reflect>;

    /// Returns the field at the given declaration index, if present.
    fn field_at(&self, index: usize) -> Option<&dyn Reflect>;

    /// Returns the field at the given declaration index mutably, if present.
    fn field_at_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;

    /// Returns the number of reflected fields.
    fn field_len(&self) -> usize;
}
