use alloc::sync::Arc;
use core::any::TypeId;
use core::fmt;

use vc_reflect::registry::{Polymorphism, TypeMeta, TypeResolver};
use vc_reflect::serde::SerdeOptions;
use vc_utils::TypeIdMap;

// -----------------------------------------------------------------------------
// PolymorphicResolver

/// A [`TypeResolver`] that overrides the polymorphism of configured types.
///
/// Every request goes to the inner resolver first. If it resolves a
/// configured abstract type, the configured [`Polymorphism`] replaces
/// whatever the inner resolver declared. Everything else passes through
/// unchanged, including `None`.
///
/// Created by [`PolymorphicBuilder::build`](crate::PolymorphicBuilder::build).
/// The configuration is immutable afterwards, the resolver can be shared
/// by any number of threads.
pub struct PolymorphicResolver<R> {
    inner: R,
    types: Arc<TypeIdMap<Arc<Polymorphism>>>,
}

impl<R> PolymorphicResolver<R> {
    #[inline]
    pub(crate) fn new(inner: R) -> Self {
        Self {
            inner,
            types: Arc::new(TypeIdMap::new()),
        }
    }

    pub(crate) fn insert(&mut self, type_id: TypeId, polymorphism: Polymorphism) {
        Arc::make_mut(&mut self.types).insert(type_id, Arc::new(polymorphism));
    }

    #[inline]
    pub fn inner(&self) -> &R {
        &self.inner
    }

    #[inline]
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// The configured polymorphism of `type_id`.
    #[inline]
    pub fn polymorphism(&self, type_id: TypeId) -> Option<&Polymorphism> {
        self.types.get(&type_id).map(|p| &**p)
    }

    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.types.contains(&type_id)
    }

    /// Number of configured abstract types.
    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl<R: TypeResolver> TypeResolver for PolymorphicResolver<R> {
    fn resolve(&self, type_id: TypeId, options: &SerdeOptions) -> Option<TypeMeta> {
        let mut meta = self.inner.resolve(type_id, options)?;

        if let Some(polymorphism) = self.types.get(&meta.type_id()) {
            tracing::trace!(
                abstract_type = meta.type_info().type_path(),
                "override polymorphism"
            );
            meta.set_polymorphism(Arc::clone(polymorphism));
        }

        Some(meta)
    }
}

impl<R: Clone> Clone for PolymorphicResolver<R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            types: Arc::clone(&self.types),
        }
    }
}

impl<R: fmt::Debug> fmt::Debug for PolymorphicResolver<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolymorphicResolver")
            .field("inner", &self.inner)
            .field("types", &self.types)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
