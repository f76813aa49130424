use alloc::sync::Arc;
use core::any::TypeId;

use crate::info::{Type, TypeInfo, Typed};
use crate::registry::{Polymorphism, TypeTraitDeserialize};

// -----------------------------------------------------------------------------
// TypeMeta

/// Metadata of a type, as produced by a [`TypeResolver`].
///
/// Cloning is cheap, resolvers hand out owned copies that decorators
/// are free to modify.
///
/// [`TypeResolver`]: crate::registry::TypeResolver
#[derive(Clone, Debug)]
pub struct TypeMeta {
    type_info: TypeInfo,
    deserialize: Option<TypeTraitDeserialize>,
    polymorphism: Option<Arc<Polymorphism>>,
}

impl TypeMeta {
    #[inline]
    pub const fn new(type_info: TypeInfo) -> Self {
        Self {
            type_info,
            deserialize: None,
            polymorphism: None,
        }
    }

    #[inline]
    pub fn of<T: Typed + ?Sized>() -> Self {
        Self::new(T::type_info())
    }

    #[inline(always)]
    pub const fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        self.type_info.ty()
    }

    #[inline]
    pub const fn type_id(&self) -> TypeId {
        self.type_info.type_id()
    }

    /// Deserialization of the type itself, only available for concrete types.
    #[inline]
    pub fn deserialize(&self) -> Option<&TypeTraitDeserialize> {
        self.deserialize.as_ref()
    }

    #[inline]
    pub fn set_deserialize(&mut self, deserialize: TypeTraitDeserialize) {
        self.deserialize = Some(deserialize);
    }

    #[inline]
    pub fn polymorphism(&self) -> Option<&Polymorphism> {
        self.polymorphism.as_deref()
    }

    /// Replaces the polymorphism of the type, nothing is merged.
    #[inline]
    pub fn set_polymorphism(&mut self, polymorphism: impl Into<Arc<Polymorphism>>) {
        self.polymorphism = Some(polymorphism.into());
    }

    #[inline]
    pub fn take_polymorphism(&mut self) -> Option<Arc<Polymorphism>> {
        self.polymorphism.take()
    }
}
