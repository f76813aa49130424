use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

use serde_core::Deserializer;
use serde_core::de::DeserializeOwned;

use crate::info::Typed;

/// Type-erased deserialization of a concrete type `T`.
///
/// The produced `Box<dyn Any>` holds a `Box<T>`, so that callers can
/// downcast it to `Box<A>` whether or not `A` is sized.
#[derive(Clone, Copy)]
pub struct TypeTraitDeserialize {
    func: fn(
        deserializer: &mut dyn erased_serde::Deserializer,
    ) -> Result<Box<dyn Any>, erased_serde::Error>,
}

impl TypeTraitDeserialize {
    pub fn of<T: Typed + DeserializeOwned>() -> Self {
        Self {
            func: |deserializer| {
                let value: Box<T> = Box::new(T::deserialize(deserializer)?);
                Ok(Box::new(value))
            },
        }
    }

    #[inline(always)]
    pub fn deserialize<'de, D: Deserializer<'de>>(
        &self,
        deserializer: D,
    ) -> Result<Box<dyn Any>, D::Error> {
        let mut erased = <dyn erased_serde::Deserializer>::erase(deserializer);
        (self.func)(&mut erased).map_err(<D::Error as serde_core::de::Error>::custom)
    }
}

impl fmt::Debug for TypeTraitDeserialize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TypeTraitDeserialize")
    }
}
