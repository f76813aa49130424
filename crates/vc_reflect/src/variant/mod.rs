//! Values of polymorphic hierarchies.
//!
//! - [`Variant`]: a concrete value whose runtime type can be serialized.
//! - [`AbstractType`]: the root of a hierarchy, usually a trait object.
//! - [`Assignable`]: a compile-time proof that a type upcasts to a root.
//! - [`AssignableEdge`]: the link-time catalogue of those proofs.

// -----------------------------------------------------------------------------
// Modules

mod catalogue;

// -----------------------------------------------------------------------------
// Exports

pub use catalogue::{AssignableEdge, assignable_edges};

// -----------------------------------------------------------------------------
// Variant

use alloc::boxed::Box;
use core::any::{Any, TypeId};

use serde_core::Serialize;

use crate::info::Typed;
use crate::registry::Polymorphism;

/// A value that may be stored behind an abstract type.
///
/// Implemented for every `'static` type that implements [`Serialize`].
/// Root traits list it as a supertrait, so that a `&dyn Shape`
/// can report and serialize its runtime type:
///
/// ```
/// use vc_reflect::Variant;
///
/// trait Shape: Variant {}
///
/// #[derive(serde::Serialize)]
/// struct Circle;
/// impl Shape for Circle {}
///
/// let shape: &dyn Shape = &Circle;
/// assert_eq!(shape.variant_type_id(), core::any::TypeId::of::<Circle>());
/// ```
pub trait Variant: Any {
    /// The [`TypeId`] of the runtime type.
    fn variant_type_id(&self) -> TypeId;

    /// The compiler's name of the runtime type, for messages only.
    fn variant_type_name(&self) -> &'static str;

    fn as_serialize(&self) -> &dyn erased_serde::Serialize;

    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + Serialize> Variant for T {
    #[inline]
    fn variant_type_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    #[inline]
    fn variant_type_name(&self) -> &'static str {
        core::any::type_name::<T>()
    }

    #[inline]
    fn as_serialize(&self) -> &dyn erased_serde::Serialize {
        self
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }
}

// -----------------------------------------------------------------------------
// AbstractType

/// The root of a polymorphic hierarchy.
///
/// Implemented by [`impl_abstract!`](crate::impl_abstract).
pub trait AbstractType: Typed {
    /// Access the runtime value.
    fn as_variant(&self) -> &dyn Variant;

    /// Polymorphism attached to the type by its own declaration.
    ///
    /// A resolver may replace it, see [`TypeMeta::set_polymorphism`].
    ///
    /// [`TypeMeta::set_polymorphism`]: crate::registry::TypeMeta::set_polymorphism
    fn declared_polymorphism() -> Option<Polymorphism> {
        None
    }
}

// -----------------------------------------------------------------------------
// Assignable

/// `Self` can be stored as an `A`.
///
/// Every type is assignable to itself, other impls are generated by
/// [`impl_variant!`](crate::impl_variant) and [`impl_abstract!`](crate::impl_abstract).
pub trait Assignable<A: ?Sized> {
    fn upcast(self: Box<Self>) -> Box<A>;
}

impl<T: ?Sized> Assignable<T> for T {
    #[inline(always)]
    fn upcast(self: Box<Self>) -> Box<T> {
        self
    }
}
