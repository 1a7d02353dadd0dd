use crate::Reflect;

/// A trait for values that may be absent, implemented for `Option<T>`.
pub trait Nullable: Reflect {
    /// Returns the present value, if any.
    fn value(&self) -> Option<&dyn Reflect>;

    /// Returns the present value mutably, if any.
    fn value_mut(&mut self) -> Option<&mut dyn Reflect>;

    /// Returns `true` if the value is absent.
    #[inline]
    fn is_null(&self) -> bool {
        self.value().is_none()
    }
}
