use core::any::TypeId;
use core::fmt;

use crate::info::{Type, TypePath};

// -----------------------------------------------------------------------------
// TypeKind

/// Whether values can have a type as their exact runtime type.
///
/// Trait objects are [`Abstract`](TypeKind::Abstract), every sized
/// type is [`Concrete`](TypeKind::Concrete).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Abstract,
    Concrete,
}

// -----------------------------------------------------------------------------
// TypeInfo

/// Compile-time information of a type.
///
/// Besides the [`Type`], it records the two facts variant discovery
/// filters on: the [`TypeKind`] and whether the type is an
/// instantiation of a generic type, such as `Wrapper<i32>`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    ty: Type,
    kind: TypeKind,
    generic: bool,
}

impl TypeInfo {
    #[inline]
    pub const fn new(ty: Type, kind: TypeKind, generic: bool) -> Self {
        Self { ty, kind, generic }
    }

    /// Information of a trait object or another type without values of its own.
    #[inline]
    pub const fn of_abstract<T: TypePath + ?Sized>() -> Self {
        Self::new(Type::of::<T>(), TypeKind::Abstract, false)
    }

    /// Information of a non-generic concrete type.
    #[inline]
    pub const fn of_concrete<T: TypePath>() -> Self {
        Self::new(Type::of::<T>(), TypeKind::Concrete, false)
    }

    /// Information of a generic type instantiated with concrete arguments.
    #[inline]
    pub const fn of_generic<T: TypePath>() -> Self {
        Self::new(Type::of::<T>(), TypeKind::Concrete, true)
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline(always)]
    pub const fn type_id(&self) -> TypeId {
        self.ty.id()
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.ty.path()
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.ty.name()
    }

    #[inline]
    pub fn type_ident(&self) -> &'static str {
        self.ty.ident()
    }

    #[inline]
    pub fn module_path(&self) -> Option<&'static str> {
        self.ty.module_path()
    }

    #[inline(always)]
    pub const fn kind(&self) -> TypeKind {
        self.kind
    }

    #[inline]
    pub const fn is_abstract(&self) -> bool {
        matches!(self.kind, TypeKind::Abstract)
    }

    #[inline(always)]
    pub const fn is_generic(&self) -> bool {
        self.generic
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("type_path", &self.type_path())
            .field("kind", &self.kind)
            .field("generic", &self.generic)
            .finish()
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_path())
    }
}
