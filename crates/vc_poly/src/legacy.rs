#![allow(deprecated)]

use core::any::TypeId;
use core::fmt;

use vc_reflect::AbstractType;
use vc_reflect::registry::{TypeMeta, TypeRegistry, TypeResolver};
use vc_reflect::serde::SerdeOptions;

use crate::builder::PolymorphicBuilder;
use crate::options::{PolymorphismDefaults, PolymorphismOptions};
use crate::resolver::PolymorphicResolver;

// -----------------------------------------------------------------------------
// PolymorphicTypeResolver

/// A mutable polymorphic resolver that never verifies its mappings.
///
/// Incomplete mappings are only noticed when an unmapped variant is
/// written, as [`NotSupported::UnsupportedDerivedType`].
///
/// [`NotSupported::UnsupportedDerivedType`]: vc_reflect::serde::NotSupported::UnsupportedDerivedType
#[deprecated(note = "use `PolymorphicBuilder`, which verifies the mappings when building")]
pub struct PolymorphicTypeResolver<R = TypeRegistry> {
    defaults: PolymorphismDefaults,
    resolver: PolymorphicResolver<R>,
}

impl PolymorphicTypeResolver {
    /// A resolver on top of a [`TypeRegistry`] filled by
    /// [`TypeRegistry::auto_register`].
    pub fn new() -> Self {
        let mut registry = TypeRegistry::new();
        registry.auto_register();
        Self::with_resolver(registry)
    }
}

impl Default for PolymorphicTypeResolver {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<R> PolymorphicTypeResolver<R> {
    pub fn with_resolver(inner: R) -> Self {
        Self {
            defaults: PolymorphismDefaults::default(),
            resolver: PolymorphicResolver::new(inner),
        }
    }

    /// Sets the defaults of the types configured afterwards.
    pub fn with_defaults(&mut self, defaults: PolymorphismDefaults) -> &mut Self {
        self.defaults = defaults;
        self
    }

    /// Configures `A`, replacing its previous configuration.
    pub fn with<A: AbstractType + ?Sized>(
        &mut self,
        configure: impl FnOnce(&mut PolymorphismOptions<A>),
    ) -> &mut Self {
        let mut options = PolymorphismOptions::from_defaults(&self.defaults);
        configure(&mut options);
        self.with_options(options)
    }

    pub fn with_options<A: AbstractType + ?Sized>(
        &mut self,
        options: PolymorphismOptions<A>,
    ) -> &mut Self {
        self.resolver
            .insert(A::type_info().type_id(), options.into_polymorphism());
        self
    }

    #[inline]
    pub fn resolver(&self) -> &PolymorphicResolver<R> {
        &self.resolver
    }

    #[inline]
    pub fn into_resolver(self) -> PolymorphicResolver<R> {
        self.resolver
    }
}

impl<R> From<PolymorphicBuilder> for PolymorphicTypeResolver<R>
where
    R: Default,
{
    /// Takes over a builder configuration without verifying it.
    fn from(builder: PolymorphicBuilder) -> Self {
        Self {
            defaults: builder.defaults().clone(),
            resolver: builder.into_resolver(R::default()),
        }
    }
}

impl<R: TypeResolver> TypeResolver for PolymorphicTypeResolver<R> {
    #[inline]
    fn resolve(&self, type_id: TypeId, options: &SerdeOptions) -> Option<TypeMeta> {
        self.resolver.resolve(type_id, options)
    }
}

impl<R: fmt::Debug> fmt::Debug for PolymorphicTypeResolver<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolymorphicTypeResolver")
            .field("defaults", &self.defaults)
            .field("resolver", &self.resolver)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
