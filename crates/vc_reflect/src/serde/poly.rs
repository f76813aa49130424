use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;
use core::ops::{Deref, DerefMut};

use crate::variant::{AbstractType, Assignable};

// -----------------------------------------------------------------------------
// Poly

/// A boxed value of the abstract type `A`, serialized with a discriminator.
///
/// See the [module documentation](crate::serde) for the encoding.
pub struct Poly<A: ?Sized>(Box<A>);

impl<A: ?Sized> Poly<A> {
    #[inline]
    pub const fn new(value: Box<A>) -> Self {
        Self(value)
    }

    /// Boxes a variant and upcasts it to `A`.
    #[inline]
    pub fn from_variant<C: Assignable<A>>(value: C) -> Self {
        Self(C::upcast(Box::new(value)))
    }

    #[inline]
    pub fn into_inner(self) -> Box<A> {
        self.0
    }
}

impl<A: AbstractType + ?Sized> Poly<A> {
    /// The [`TypeId`] of the runtime type.
    #[inline]
    pub fn variant_type_id(&self) -> TypeId {
        self.0.as_variant().variant_type_id()
    }

    /// Returns the value if the runtime type is `C`.
    #[inline]
    pub fn downcast_ref<C: Any>(&self) -> Option<&C> {
        self.0.as_variant().as_any().downcast_ref::<C>()
    }
}

impl<A: ?Sized> Deref for Poly<A> {
    type Target = A;

    #[inline]
    fn deref(&self) -> &A {
        &self.0
    }
}

impl<A: ?Sized> DerefMut for Poly<A> {
    #[inline]
    fn deref_mut(&mut self) -> &mut A {
        &mut self.0
    }
}

impl<A: ?Sized> From<Box<A>> for Poly<A> {
    #[inline]
    fn from(value: Box<A>) -> Self {
        Self(value)
    }
}

impl<A: fmt::Debug + ?Sized> fmt::Debug for Poly<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Poly").field(&&*self.0).finish()
    }
}
