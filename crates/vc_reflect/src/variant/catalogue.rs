use alloc::borrow::Cow;
use core::any::TypeId;
use core::fmt;

use crate::info::TypeInfo;
use crate::registry::{DerivedType, UpcastFn};

// -----------------------------------------------------------------------------
// AssignableEdge

/// A link-time record stating that `derived` is assignable to `base`.
///
/// Emitted by [`impl_variant!`](crate::impl_variant) for concrete variants,
/// including the identity edge of every variant, and by
/// [`impl_abstract!`](crate::impl_abstract) for abstract sub-roots.
pub struct AssignableEdge {
    derived: fn() -> TypeInfo,
    base: fn() -> TypeId,
    derived_type: Option<fn(Cow<'static, str>) -> DerivedType>,
    upcast: Option<UpcastFn>,
}

impl AssignableEdge {
    /// An edge from a concrete variant, able to build its [`DerivedType`].
    pub const fn variant(
        derived: fn() -> TypeInfo,
        base: fn() -> TypeId,
        derived_type: fn(Cow<'static, str>) -> DerivedType,
    ) -> Self {
        Self {
            derived,
            base,
            derived_type: Some(derived_type),
            upcast: None,
        }
    }

    /// An edge between two roots. `upcast` turns an erased `Box<derived>`
    /// into an erased `Box<base>`.
    pub const fn abstract_base(
        derived: fn() -> TypeInfo,
        base: fn() -> TypeId,
        upcast: UpcastFn,
    ) -> Self {
        Self {
            derived,
            base,
            derived_type: None,
            upcast: Some(upcast),
        }
    }

    #[inline]
    pub fn derived(&self) -> TypeInfo {
        (self.derived)()
    }

    #[inline]
    pub fn base(&self) -> TypeId {
        (self.base)()
    }

    /// `false` for edges starting at an abstract type.
    #[inline]
    pub fn is_variant(&self) -> bool {
        self.derived_type.is_some()
    }

    /// Constructor of the [`DerivedType`] of `derived` stored as `base`,
    /// `None` for abstract edges.
    #[inline]
    pub fn derived_type_fn(&self) -> Option<fn(Cow<'static, str>) -> DerivedType> {
        self.derived_type
    }

    /// The upcast of an edge between two roots, `None` for variant edges.
    #[inline]
    pub fn upcast_fn(&self) -> Option<UpcastFn> {
        self.upcast
    }
}

impl fmt::Debug for AssignableEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssignableEdge")
            .field("derived", &self.derived())
            .field("base", &self.base())
            .finish()
    }
}

#[cfg(feature = "auto_register")]
inventory::collect!(AssignableEdge);

/// Iterates every [`AssignableEdge`] linked into the program.
///
/// Empty without the `auto_register` feature or on platforms
/// `inventory` does not support.
#[cfg(feature = "auto_register")]
pub fn assignable_edges() -> impl Iterator<Item = &'static AssignableEdge> {
    inventory::iter::<AssignableEdge>.into_iter()
}

/// Iterates every [`AssignableEdge`] linked into the program.
///
/// Empty without the `auto_register` feature or on platforms
/// `inventory` does not support.
#[cfg(not(feature = "auto_register"))]
pub fn assignable_edges() -> impl Iterator<Item = &'static AssignableEdge> {
    core::iter::empty()
}
