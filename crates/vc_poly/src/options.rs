use alloc::borrow::Cow;
use core::fmt;

use vc_reflect::AbstractType;
use vc_reflect::registry::{DEFAULT_DISCRIMINATOR_NAME, Polymorphism};

use crate::derived::DerivedTypes;
use crate::error::MissingDerivedTypes;

// -----------------------------------------------------------------------------
// PolymorphismDefaults

/// Values every [`PolymorphismOptions`] of a builder starts from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolymorphismDefaults {
    pub discriminator_name: Cow<'static, str>,
}

impl Default for PolymorphismDefaults {
    #[inline]
    fn default() -> Self {
        Self::new(DEFAULT_DISCRIMINATOR_NAME)
    }
}

impl PolymorphismDefaults {
    #[inline]
    pub fn new(discriminator_name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            discriminator_name: discriminator_name.into(),
        }
    }
}

// -----------------------------------------------------------------------------
// PolymorphismOptions

/// The polymorphism configuration of one abstract type `A`.
pub struct PolymorphismOptions<A: ?Sized> {
    /// Name of the field holding the discriminator, `"$type"` by default.
    pub discriminator_name: Cow<'static, str>,
    pub derived_types: DerivedTypes<A>,
}

impl<A: ?Sized> Default for PolymorphismOptions<A> {
    #[inline]
    fn default() -> Self {
        Self {
            discriminator_name: Cow::Borrowed(DEFAULT_DISCRIMINATOR_NAME),
            derived_types: DerivedTypes::default(),
        }
    }
}

impl<A: ?Sized> Clone for PolymorphismOptions<A> {
    fn clone(&self) -> Self {
        Self {
            discriminator_name: self.discriminator_name.clone(),
            derived_types: self.derived_types.clone(),
        }
    }
}

impl<A: ?Sized> fmt::Debug for PolymorphismOptions<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolymorphismOptions")
            .field("discriminator_name", &self.discriminator_name)
            .field("derived_types", &self.derived_types)
            .finish()
    }
}

impl<A: AbstractType + ?Sized> PolymorphismOptions<A> {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty options using the values of `defaults`.
    pub fn from_defaults(defaults: &PolymorphismDefaults) -> Self {
        Self {
            discriminator_name: defaults.discriminator_name.clone(),
            derived_types: DerivedTypes::new(),
        }
    }

    pub fn discriminator(&mut self, name: impl Into<Cow<'static, str>>) -> &mut Self {
        self.discriminator_name = name.into();
        self
    }

    /// See [`DerivedTypes::verify`].
    pub fn verify(&self) -> Result<(), MissingDerivedTypes> {
        crate::verify::verify(A::type_info(), self.derived_types.as_slice(), None)
    }

    pub fn into_polymorphism(self) -> Polymorphism {
        Polymorphism::with_derived_types(self.discriminator_name, self.derived_types.into_vec())
    }
}

impl<A: AbstractType + ?Sized> From<PolymorphismOptions<A>> for Polymorphism {
    #[inline]
    fn from(options: PolymorphismOptions<A>) -> Self {
        options.into_polymorphism()
    }
}

// -----------------------------------------------------------------------------
// Tests
