use alloc::sync::Arc;
use core::any::TypeId;
use core::fmt;

use crate::registry::{TypeMeta, TypeResolver};
use crate::serde::SerdeError;
use crate::serde::session::SessionGuard;

// -----------------------------------------------------------------------------
// SerdeOptions

/// Configuration shared by the [`Poly`](crate::serde::Poly) values of
/// one encode or decode.
///
/// Cloning only clones an [`Arc`], the options can be shared by
/// concurrent operations on different threads.
#[derive(Clone)]
pub struct SerdeOptions {
    resolver: Arc<dyn TypeResolver>,
}

impl SerdeOptions {
    #[inline]
    pub fn new(resolver: impl TypeResolver + 'static) -> Self {
        Self {
            resolver: Arc::new(resolver),
        }
    }

    #[inline]
    pub fn from_arc(resolver: Arc<dyn TypeResolver>) -> Self {
        Self { resolver }
    }

    #[inline]
    pub fn resolver(&self) -> &dyn TypeResolver {
        &*self.resolver
    }

    /// Resolves the metadata of `type_id` through the configured resolver.
    #[inline]
    pub fn type_meta(&self, type_id: TypeId) -> Option<TypeMeta> {
        self.resolver.resolve(type_id, self)
    }

    /// Runs `f` with these options active on the current thread.
    ///
    /// If `f` fails after a [`NotSupported`] was reported, the first
    /// reported one is returned instead of the format error wrapping it.
    /// Sessions nest, the innermost one is used.
    ///
    /// [`NotSupported`]: crate::serde::NotSupported
    pub fn scope<T, E>(&self, f: impl FnOnce() -> Result<T, E>) -> Result<T, SerdeError<E>> {
        let guard = SessionGuard::enter(self.clone());
        let result = f();
        let failure = guard.take_failure();
        drop(guard);

        result.map_err(|err| match failure {
            Some(not_supported) => SerdeError::NotSupported(not_supported),
            None => SerdeError::Format(err),
        })
    }
}

impl fmt::Debug for SerdeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerdeOptions").finish_non_exhaustive()
    }
}
