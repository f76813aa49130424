use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::TypeId;

use crate::registry::TypeMeta;
use crate::serde::SerdeOptions;

/// Produces the [`TypeMeta`] of a type on request.
///
/// `None` means the resolver knows nothing about the type, the serde
/// engine then reports [`NotSupported`](crate::serde::NotSupported).
///
/// Resolvers are shared by concurrent (de)serialization calls and
/// must not keep per-call state.
pub trait TypeResolver: Send + Sync {
    fn resolve(&self, type_id: TypeId, options: &SerdeOptions) -> Option<TypeMeta>;
}

impl<R: TypeResolver + ?Sized> TypeResolver for &R {
    #[inline]
    fn resolve(&self, type_id: TypeId, options: &SerdeOptions) -> Option<TypeMeta> {
        (**self).resolve(type_id, options)
    }
}

impl<R: TypeResolver + ?Sized> TypeResolver for Box<R> {
    #[inline]
    fn resolve(&self, type_id: TypeId, options: &SerdeOptions) -> Option<TypeMeta> {
        (**self).resolve(type_id, options)
    }
}

impl<R: TypeResolver + ?Sized> TypeResolver for Arc<R> {
    #[inline]
    fn resolve(&self, type_id: TypeId, options: &SerdeOptions) -> Option<TypeMeta> {
        (**self).resolve(type_id, options)
    }
}
