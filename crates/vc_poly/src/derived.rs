use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;
use core::marker::PhantomData;

use serde_core::de::DeserializeOwned;
use vc_reflect::info::{TypeInfo, Typed};
use vc_reflect::registry::DerivedType;
use vc_reflect::{AbstractType, Assignable};

use crate::discovery::{Module, discover};
use crate::error::MissingDerivedTypes;
use crate::verify;

// -----------------------------------------------------------------------------
// DerivedTypes

/// The discriminator mapping of one abstract type `A`.
///
/// Entries keep their insertion order. Only types assignable to `A`
/// can be added, which the compiler checks for the typed methods.
///
/// # Examples
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use vc_poly::{DerivedTypes, Module};
/// use vc_reflect::{Variant, impl_abstract, impl_typed, impl_variant};
///
/// pub trait Shape: Variant {}
///
/// #[derive(Serialize, Deserialize)]
/// pub struct Circle;
/// #[derive(Serialize, Deserialize)]
/// pub struct Square;
///
/// impl Shape for Circle {}
/// impl Shape for Square {}
///
/// impl_typed!(dyn Shape);
/// impl_typed!(Circle);
/// impl_typed!(Square);
/// impl_abstract!(dyn Shape);
/// impl_variant!(Circle => dyn Shape);
/// impl_variant!(Square => dyn Shape);
///
/// let mut derived = DerivedTypes::<dyn Shape>::new();
/// derived.add::<Circle>("circle");
/// assert!(derived.verify().is_err());
///
/// derived.add_all_assignable(&[Module::of::<Circle>()]);
/// assert!(derived.verify().is_ok());
///
/// let discriminators: Vec<_> = derived.iter().map(|d| d.discriminator()).collect();
/// assert_eq!(discriminators, ["circle", "Square"]);
/// ```
pub struct DerivedTypes<A: ?Sized> {
    entries: Vec<DerivedType>,
    marker: PhantomData<fn() -> Box<A>>,
}

impl<A: ?Sized> Default for DerivedTypes<A> {
    #[inline]
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            marker: PhantomData,
        }
    }
}

impl<A: ?Sized> Clone for DerivedTypes<A> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            marker: PhantomData,
        }
    }
}

impl<A: AbstractType + ?Sized> DerivedTypes<A> {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps variant `C` to `discriminator`.
    pub fn add<C>(&mut self, discriminator: impl Into<Cow<'static, str>>) -> &mut Self
    where
        C: Typed + Assignable<A> + DeserializeOwned,
    {
        self.entries.push(DerivedType::new::<A, C>(discriminator));
        self
    }

    /// Maps variant `C` to its short type name.
    pub fn add_default<C>(&mut self) -> &mut Self
    where
        C: Typed + Assignable<A> + DeserializeOwned,
    {
        self.add::<C>(C::type_name())
    }

    /// Adds an entry built elsewhere.
    ///
    /// The entry is expected to deserialize to `A`, entries of another
    /// abstract type fail when a value is read.
    pub fn add_derived(&mut self, derived: DerivedType) -> &mut Self {
        self.entries.push(derived);
        self
    }

    /// Maps every variant discovered in `modules` to its short type name.
    ///
    /// Variants that already have an entry are skipped.
    pub fn add_all_assignable(&mut self, modules: &[Module]) -> &mut Self {
        self.add_all_assignable_with(modules, |info| info.type_name())
    }

    /// Maps every variant discovered in `modules` to the name `naming` returns.
    ///
    /// Variants that already have an entry are skipped.
    pub fn add_all_assignable_with<N>(
        &mut self,
        modules: &[Module],
        mut naming: impl FnMut(&TypeInfo) -> N,
    ) -> &mut Self
    where
        N: Into<Cow<'static, str>>,
    {
        for variant in discover::<A>(modules) {
            if self.contains_id(variant.type_id()) {
                continue;
            }
            let discriminator = naming(variant.type_info());
            self.entries.push(variant.derived_type(discriminator));
        }
        self
    }

    /// Checks that the variants of `A` in the crates of the mapped
    /// variants all have an entry.
    pub fn verify(&mut self) -> Result<&mut Self, MissingDerivedTypes> {
        verify::verify(A::type_info(), &self.entries, None)?;
        Ok(self)
    }

    /// Checks that the variants of `A` in `modules` all have an entry.
    pub fn verify_in(&mut self, modules: &[Module]) -> Result<&mut Self, MissingDerivedTypes> {
        verify::verify(A::type_info(), &self.entries, Some(modules))?;
        Ok(self)
    }

    /// The variants without entry, see [`verify::missing_derived_types`].
    pub fn missing(&self, modules: Option<&[Module]>) -> Vec<TypeInfo> {
        verify::missing_derived_types(&A::type_info(), &self.entries, modules)
    }
}

impl<A: ?Sized> DerivedTypes<A> {
    #[inline]
    pub fn contains<C: ?Sized + 'static>(&self) -> bool {
        self.contains_id(TypeId::of::<C>())
    }

    fn contains_id(&self, type_id: TypeId) -> bool {
        self.entries.iter().any(|derived| derived.type_id() == type_id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, DerivedType> {
        self.entries.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[DerivedType] {
        &self.entries
    }

    #[inline]
    pub fn into_vec(self) -> Vec<DerivedType> {
        self.entries
    }
}

impl<A: ?Sized> fmt::Debug for DerivedTypes<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.entries).finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
