use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;

use serde_core::Deserializer;
use serde_core::de::DeserializeOwned;

use crate::info::{TypeInfo, Typed};
use crate::variant::Assignable;

/// The discriminator field name used when none is configured.
pub const DEFAULT_DISCRIMINATOR_NAME: &str = "$type";

// -----------------------------------------------------------------------------
// DerivedType

type DeserializeFn =
    fn(&mut dyn erased_serde::Deserializer) -> Result<Box<dyn Any>, erased_serde::Error>;

/// Turns an erased `Box<S>` into an erased `Box<B>`, `None` if the
/// value is not a `Box<S>`.
pub type UpcastFn = fn(Box<dyn Any>) -> Option<Box<dyn Any>>;

/// A concrete variant of an abstract type `A` and its discriminator.
///
/// The entry remembers how to deserialize the variant and upcast it
/// to `A`, the erased result holds a `Box<A>`. [`DerivedType::upcast`]
/// moves the entry further up a hierarchy of roots.
#[derive(Clone)]
pub struct DerivedType {
    info: TypeInfo,
    discriminator: Cow<'static, str>,
    deserialize: DeserializeFn,
    upcasts: Vec<UpcastFn>,
}

impl DerivedType {
    /// Creates the entry of variant `C` stored as `A`.
    ///
    /// ```
    /// use serde::{Deserialize, Serialize};
    /// use vc_reflect::registry::DerivedType;
    /// use vc_reflect::{Variant, impl_typed, impl_variant};
    ///
    /// pub trait Shape: Variant {}
    ///
    /// #[derive(Serialize, Deserialize)]
    /// pub struct Circle;
    /// impl Shape for Circle {}
    ///
    /// impl_typed!(dyn Shape);
    /// impl_typed!(Circle);
    /// impl_variant!(Circle => dyn Shape);
    ///
    /// let derived = DerivedType::new::<dyn Shape, Circle>("circle");
    /// assert_eq!(derived.discriminator(), "circle");
    /// assert_eq!(derived.type_info().type_name(), "Circle");
    /// ```
    pub fn new<A, C>(discriminator: impl Into<Cow<'static, str>>) -> Self
    where
        A: ?Sized + 'static,
        C: Typed + Assignable<A> + DeserializeOwned,
    {
        Self {
            info: C::type_info(),
            discriminator: discriminator.into(),
            deserialize: |deserializer| {
                let value = Box::new(C::deserialize(deserializer)?);
                let upcast: Box<A> = <C as Assignable<A>>::upcast(value);
                Ok(Box::new(upcast))
            },
            upcasts: Vec::new(),
        }
    }

    /// Stores the deserialized values as `B` instead of `S`, the root
    /// this entry currently produces.
    ///
    /// ```
    /// use serde::{Deserialize, Serialize};
    /// use vc_reflect::registry::DerivedType;
    /// use vc_reflect::{Variant, impl_abstract, impl_typed, impl_variant};
    ///
    /// pub trait Shape: Variant {}
    /// pub trait RoundShape: Shape {}
    ///
    /// #[derive(Serialize, Deserialize)]
    /// pub struct Circle {
    ///     radius: f64,
    /// }
    /// impl Shape for Circle {}
    /// impl RoundShape for Circle {}
    ///
    /// impl_typed!(dyn Shape);
    /// impl_typed!(dyn RoundShape);
    /// impl_typed!(Circle);
    /// impl_abstract!(dyn Shape);
    /// impl_abstract!(dyn RoundShape => dyn Shape);
    /// impl_variant!(Circle => dyn RoundShape);
    ///
    /// let derived = DerivedType::new::<dyn RoundShape, Circle>("circle")
    ///     .upcast::<dyn RoundShape, dyn Shape>();
    ///
    /// let mut json = serde_json::Deserializer::from_str(r#"{"radius":1.0}"#);
    /// let value = derived.deserialize(&mut json).unwrap();
    /// assert!(value.downcast::<Box<dyn Shape>>().is_ok());
    /// ```
    pub fn upcast<S, B>(self) -> Self
    where
        S: ?Sized + Assignable<B> + 'static,
        B: ?Sized + 'static,
    {
        self.then_upcast(crate::__macro_exports::upcast_abstract::<S, B>)
    }

    /// Appends an erased upcast, applied after the previous ones.
    pub fn then_upcast(mut self, upcast: UpcastFn) -> Self {
        self.upcasts.push(upcast);
        self
    }

    #[inline(always)]
    pub const fn type_info(&self) -> &TypeInfo {
        &self.info
    }

    #[inline]
    pub const fn type_id(&self) -> TypeId {
        self.info.type_id()
    }

    #[inline]
    pub fn discriminator(&self) -> &str {
        &self.discriminator
    }

    /// Deserializes the variant, the result holds a `Box` of the root
    /// this entry produces.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        &self,
        deserializer: D,
    ) -> Result<Box<dyn Any>, D::Error> {
        let mut erased = <dyn erased_serde::Deserializer>::erase(deserializer);
        let mut value =
            (self.deserialize)(&mut erased).map_err(<D::Error as serde_core::de::Error>::custom)?;
        for upcast in &self.upcasts {
            value = upcast(value).ok_or_else(|| {
                <D::Error as serde_core::de::Error>::custom(format_args!(
                    "`{}` does not upcast along its hierarchy",
                    self.info.type_path()
                ))
            })?;
        }
        Ok(value)
    }
}

impl fmt::Debug for DerivedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedType")
            .field("type_path", &self.info.type_path())
            .field("discriminator", &self.discriminator)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Polymorphism

/// How values of an abstract type are tagged.
///
/// Entries keep their insertion order. Neither duplicate discriminators
/// nor duplicate variants are rejected here, the serde engine reports
/// them when the affected value is written or read.
#[derive(Clone)]
pub struct Polymorphism {
    discriminator_name: Cow<'static, str>,
    derived_types: Vec<DerivedType>,
}

impl Default for Polymorphism {
    #[inline]
    fn default() -> Self {
        Self::new(DEFAULT_DISCRIMINATOR_NAME)
    }
}

impl Polymorphism {
    #[inline]
    pub fn new(discriminator_name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            discriminator_name: discriminator_name.into(),
            derived_types: Vec::new(),
        }
    }

    #[inline]
    pub fn with_derived_types(
        discriminator_name: impl Into<Cow<'static, str>>,
        derived_types: Vec<DerivedType>,
    ) -> Self {
        Self {
            discriminator_name: discriminator_name.into(),
            derived_types,
        }
    }

    #[inline]
    pub fn discriminator_name(&self) -> &str {
        &self.discriminator_name
    }

    #[inline]
    pub fn derived_types(&self) -> &[DerivedType] {
        &self.derived_types
    }

    #[inline]
    pub fn push(&mut self, derived: DerivedType) {
        self.derived_types.push(derived);
    }

    /// The entries of the variant `type_id`, in insertion order.
    pub fn find_by_type(&self, type_id: TypeId) -> impl Iterator<Item = &DerivedType> {
        self.derived_types
            .iter()
            .filter(move |derived| DerivedType::type_id(derived) == type_id)
    }

    /// The entries using `discriminator`, in insertion order.
    pub fn find_by_discriminator<'a>(
        &'a self,
        discriminator: &'a str,
    ) -> impl Iterator<Item = &'a DerivedType> {
        self.derived_types
            .iter()
            .filter(move |derived| derived.discriminator() == discriminator)
    }
}

impl Extend<DerivedType> for Polymorphism {
    fn extend<I: IntoIterator<Item = DerivedType>>(&mut self, iter: I) {
        self.derived_types.extend(iter);
    }
}

impl fmt::Debug for Polymorphism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Polymorphism")
            .field("discriminator_name", &self.discriminator_name)
            .field("derived_types", &self.derived_types)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;
    use core::any::TypeId;

    use super::{DerivedType, Polymorphism};
    use crate::fixtures::{Cheap, Insulated, Remark};

    fn polymorphism() -> Polymorphism {
        Polymorphism::with_derived_types("$type", vec![
            DerivedType::new::<dyn Remark, Cheap>("cheap"),
            DerivedType::new::<dyn Remark, Insulated>("insulated"),
            DerivedType::new::<dyn Remark, Cheap>("budget"),
        ])
    }

    #[test]
    fn find_by_type_matches_variant_ids() {
        let polymorphism = polymorphism();

        let cheap: Vec<_> = polymorphism
            .find_by_type(TypeId::of::<Cheap>())
            .map(DerivedType::discriminator)
            .collect();
        assert_eq!(cheap, ["cheap", "budget"]);

        let insulated = polymorphism.find_by_type(TypeId::of::<Insulated>());
        assert_eq!(insulated.count(), 1);
        assert_eq!(polymorphism.find_by_type(TypeId::of::<u8>()).count(), 0);
    }

    #[test]
    fn find_by_discriminator_borrows_the_key() {
        let polymorphism = polymorphism();
        let key = alloc::string::String::from("insulated");

        let found: Vec<_> = polymorphism.find_by_discriminator(&key).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].type_id(), TypeId::of::<Insulated>());
    }
}
