//! Items used by the code `impl_abstract!` and `impl_variant!` expand to.

use alloc::borrow::Cow;
use core::any::Any;

use serde_core::de::DeserializeOwned;

use crate::info::Typed;
use crate::registry::{DerivedType, Polymorphism, TypeRegistry};
use crate::variant::{AbstractType, Assignable};

pub use alloc::boxed::Box;
pub use alloc::vec::Vec;

#[cfg(feature = "auto_register")]
pub use inventory;

// -----------------------------------------------------------------------------
// Auto register

/// A registration function collected by `inventory`.
pub struct AutoRegisterFunc(pub fn(&mut TypeRegistry));

#[cfg(feature = "auto_register")]
inventory::collect!(AutoRegisterFunc);

// Submitted by this crate, so a registry only sees it if
// `inventory` works on the current platform.
#[cfg(feature = "auto_register")]
inventory::submit! {
    AutoRegisterFunc(TypeRegistry::mark_auto_registered)
}

/// Runs every collected registration function.
#[cfg(feature = "auto_register")]
pub(crate) fn register_types(registry: &mut TypeRegistry) {
    for func in inventory::iter::<AutoRegisterFunc> {
        (func.0)(registry);
    }
}

pub fn register_variant<T: Typed + DeserializeOwned>(registry: &mut TypeRegistry) {
    registry.register_variant::<T>();
}

pub fn register_abstract<A: AbstractType + ?Sized>(registry: &mut TypeRegistry) {
    registry.register_abstract::<A>();
}

// -----------------------------------------------------------------------------
// Polymorphism

pub fn derived_type<A, C>(discriminator: Cow<'static, str>) -> DerivedType
where
    A: ?Sized + 'static,
    C: Typed + Assignable<A> + DeserializeOwned,
{
    DerivedType::new::<A, C>(discriminator)
}

pub fn declared_polymorphism(
    discriminator_name: Option<&'static str>,
    derived_types: Vec<DerivedType>,
) -> Option<Polymorphism> {
    if discriminator_name.is_none() && derived_types.is_empty() {
        return None;
    }
    let mut polymorphism = match discriminator_name {
        Some(name) => Polymorphism::new(name),
        None => Polymorphism::default(),
    };
    polymorphism.extend(derived_types);
    Some(polymorphism)
}

/// Turns an erased `Box<S>` into an erased `Box<B>`.
pub fn upcast_abstract<S, B>(value: Box<dyn Any>) -> Option<Box<dyn Any>>
where
    S: ?Sized + Assignable<B> + 'static,
    B: ?Sized + 'static,
{
    let value: Box<Box<S>> = value.downcast().ok()?;
    let upcast: Box<B> = <S as Assignable<B>>::upcast(*value);
    Some(Box::new(upcast))
}
