use core::any::TypeId;

use serde_core::ser::{self, Impossible, SerializeMap, SerializeStruct};
use serde_core::{Serialize, Serializer};

use crate::registry::Polymorphism;
use crate::serde::{NotSupported, Poly, session};
use crate::variant::{AbstractType, Variant};

#[inline]
fn fail<E: ser::Error>(err: NotSupported) -> E {
    E::custom(session::report(err))
}

// -----------------------------------------------------------------------------
// Poly

impl<A: AbstractType + ?Sized> Serialize for Poly<A> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        session::recover(|| serialize_poly(&**self, serializer))
    }
}

fn serialize_poly<A: AbstractType + ?Sized, S: Serializer>(
    value: &A,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let options = session::current().map_err(fail)?;
    let meta = options
        .type_meta(TypeId::of::<A>())
        .ok_or_else(|| {
            fail(NotSupported::MissingMetadata {
                type_path: A::type_path(),
            })
        })?;

    let variant = value.as_variant();

    match meta.polymorphism() {
        Some(polymorphism) => serialize_tagged::<A, S>(variant, polymorphism, serializer),
        None if meta.type_info().is_abstract() => Err(fail(NotSupported::NotPolymorphic {
            type_path: A::type_path(),
        })),
        None => erased_serde::serialize(variant.as_serialize(), serializer),
    }
}

fn serialize_tagged<A: AbstractType + ?Sized, S: Serializer>(
    variant: &dyn Variant,
    polymorphism: &Polymorphism,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let runtime_id = variant.variant_type_id();

    let mut found = polymorphism.find_by_type(runtime_id);
    let derived = match (found.next(), found.next()) {
        (Some(derived), None) => derived,
        (Some(_), Some(_)) => {
            return Err(fail(NotSupported::DuplicateDerivedType {
                abstract_type: A::type_path(),
                runtime_type: variant.variant_type_name(),
            }));
        }
        // A concrete root not listed among its own variants.
        (None, _) if runtime_id == TypeId::of::<A>() => {
            return erased_serde::serialize(variant.as_serialize(), serializer);
        }
        (None, _) => {
            return Err(fail(NotSupported::UnsupportedDerivedType {
                abstract_type: A::type_path(),
                runtime_type: variant.variant_type_name(),
            }));
        }
    };

    if polymorphism
        .find_by_discriminator(derived.discriminator())
        .nth(1)
        .is_some()
    {
        return Err(fail(NotSupported::DuplicateDiscriminator {
            abstract_type: A::type_path(),
            discriminator: derived.discriminator().into(),
        }));
    }

    tracing::trace!(
        abstract_type = A::type_path(),
        discriminator = derived.discriminator(),
        "serialize derived type"
    );

    erased_serde::serialize(
        variant.as_serialize(),
        TaggedSerializer {
            runtime_type: variant.variant_type_name(),
            tag: polymorphism.discriminator_name(),
            discriminator: derived.discriminator(),
            delegate: serializer,
        },
    )
}

// -----------------------------------------------------------------------------
// TaggedSerializer

/// Writes structs and maps with the discriminator entry in front.
struct TaggedSerializer<'a, S> {
    runtime_type: &'static str,
    tag: &'a str,
    discriminator: &'a str,
    delegate: S,
}

impl<S: Serializer> TaggedSerializer<'_, S> {
    fn untaggable(&self, shape: &'static str) -> S::Error {
        fail(NotSupported::Untaggable {
            runtime_type: self.runtime_type,
            shape,
        })
    }

    fn tagged_map(self, len: Option<usize>) -> Result<S::SerializeMap, S::Error> {
        let mut map = self.delegate.serialize_map(len.map(|len| len + 1))?;
        map.serialize_entry(self.tag, self.discriminator)?;
        Ok(map)
    }
}

macro_rules! untaggable {
    ($($method:ident($($ty:ty),*) => $shape:literal,)*) => {
        $(
            fn $method(self, $(_: $ty),*) -> Result<Self::Ok, Self::Error> {
                Err(self.untaggable($shape))
            }
        )*
    };
}

impl<S: Serializer> Serializer for TaggedSerializer<'_, S> {
    type Ok = S::Ok;
    type Error = S::Error;

    type SerializeSeq = Impossible<S::Ok, S::Error>;
    type SerializeTuple = Impossible<S::Ok, S::Error>;
    type SerializeTupleStruct = Impossible<S::Ok, S::Error>;
    type SerializeTupleVariant = Impossible<S::Ok, S::Error>;
    type SerializeMap = S::SerializeMap;
    type SerializeStruct = TaggedStruct<S::SerializeMap>;
    type SerializeStructVariant = Impossible<S::Ok, S::Error>;

    untaggable! {
        serialize_bool(bool) => "a boolean",
        serialize_i8(i8) => "an integer",
        serialize_i16(i16) => "an integer",
        serialize_i32(i32) => "an integer",
        serialize_i64(i64) => "an integer",
        serialize_u8(u8) => "an integer",
        serialize_u16(u16) => "an integer",
        serialize_u32(u32) => "an integer",
        serialize_u64(u64) => "an integer",
        serialize_f32(f32) => "a float",
        serialize_f64(f64) => "a float",
        serialize_char(char) => "a char",
        serialize_str(&str) => "a string",
        serialize_bytes(&[u8]) => "bytes",
        serialize_none() => "an option",
        serialize_unit() => "a unit",
        serialize_unit_struct(&'static str) => "a unit struct",
        serialize_unit_variant(&'static str, u32, &'static str) => "an enum",
    }

    fn serialize_some<T: Serialize + ?Sized>(self, _: &T) -> Result<S::Ok, S::Error> {
        Err(self.untaggable("an option"))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        value: &T,
    ) -> Result<S::Ok, S::Error> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: &T,
    ) -> Result<S::Ok, S::Error> {
        Err(self.untaggable("an enum"))
    }

    fn serialize_seq(self, _: Option<usize>) -> Result<Self::SerializeSeq, S::Error> {
        Err(self.untaggable("a sequence"))
    }

    fn serialize_tuple(self, _: usize) -> Result<Self::SerializeTuple, S::Error> {
        Err(self.untaggable("a tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeTupleStruct, S::Error> {
        Err(self.untaggable("a tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeTupleVariant, S::Error> {
        Err(self.untaggable("an enum"))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<S::SerializeMap, S::Error> {
        self.tagged_map(len)
    }

    fn serialize_struct(
        self,
        _: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStruct, S::Error> {
        self.tagged_map(Some(len)).map(TaggedStruct)
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeStructVariant, S::Error> {
        Err(self.untaggable("an enum"))
    }
}

/// Struct fields written as map entries.
struct TaggedStruct<M>(M);

impl<M: SerializeMap> SerializeStruct for TaggedStruct<M> {
    type Ok = M::Ok;
    type Error = M::Error;

    #[inline]
    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), M::Error> {
        self.0.serialize_entry(key, value)
    }

    #[inline]
    fn end(self) -> Result<M::Ok, M::Error> {
        self.0.end()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};
    use alloc::vec;
    use alloc::vec::Vec;

    use serde::Serialize;

    use crate::Poly;
    use crate::fixtures::{Cheap, Holder, Insulated, Note, Remark, Tally, options};
    use crate::registry::{Polymorphism, TypeRegistry};
    use crate::serde::{NotSupported, SerdeOptions};

    fn cheap() -> Poly<dyn Remark> {
        Poly::from_variant(Cheap {
            remarks: "cheap".to_string(),
        })
    }

    #[test]
    fn declared_discriminator() {
        let holder = Holder {
            specification: cheap(),
        };
        let json = options().scope(|| serde_json::to_string(&holder)).unwrap();
        assert_eq!(json, r#"{"specification":{"$type":"cheap","remarks":"cheap"}}"#);
    }

    #[test]
    fn unregistered_runtime_type() {
        let value: Poly<dyn Remark> = Poly::from_variant(Insulated {
            remarks: String::new(),
            insulation_area: 2,
        });
        let err = options()
            .scope(|| serde_json::to_string(&value))
            .unwrap_err();
        assert!(matches!(
            err.not_supported(),
            Some(NotSupported::UnsupportedDerivedType { .. })
        ));
    }

    #[test]
    fn missing_metadata() {
        let options = SerdeOptions::new(TypeRegistry::new());
        let err = options.scope(|| serde_json::to_string(&cheap())).unwrap_err();
        assert!(matches!(
            err.not_supported(),
            Some(NotSupported::MissingMetadata { .. })
        ));
    }

    #[test]
    fn abstract_without_polymorphism() {
        let mut registry = TypeRegistry::new();
        registry.register::<dyn Remark>();
        let options = SerdeOptions::new(registry);

        let err = options.scope(|| serde_json::to_string(&cheap())).unwrap_err();
        assert!(matches!(
            err.not_supported(),
            Some(NotSupported::NotPolymorphic { .. })
        ));
    }

    #[test]
    fn no_session() {
        let err = serde_json::to_string(&cheap()).unwrap_err();
        assert!(err.to_string().contains("no serde session"));
    }

    #[test]
    fn concrete_root_written_plain() {
        let note: Poly<Note> = Poly::from_variant(Note {
            text: "hi".to_string(),
        });
        let json = options().scope(|| serde_json::to_string(&note)).unwrap();
        assert_eq!(json, r#"{"text":"hi"}"#);
    }

    #[test]
    fn duplicate_discriminator() {
        let mut registry = TypeRegistry::new();
        registry.register_abstract::<dyn Remark>();
        let mut meta = registry
            .get(core::any::TypeId::of::<dyn Remark>())
            .cloned()
            .unwrap();
        let mut polymorphism = Polymorphism::default();
        polymorphism.push(crate::registry::DerivedType::new::<dyn Remark, Cheap>("same"));
        polymorphism.push(crate::registry::DerivedType::new::<dyn Remark, Insulated>("same"));
        meta.set_polymorphism(polymorphism);
        registry.insert(meta);
        let options = SerdeOptions::new(registry);

        let err = options.scope(|| serde_json::to_string(&cheap())).unwrap_err();
        assert!(matches!(
            err.not_supported(),
            Some(NotSupported::DuplicateDiscriminator { .. })
        ));
    }

    #[test]
    fn untaggable_variant() {
        let value: Poly<dyn Remark> = Poly::from_variant(Tally(3));
        let mut registry = TypeRegistry::new();
        registry.register::<dyn Remark>();
        let mut meta = registry
            .get(core::any::TypeId::of::<dyn Remark>())
            .cloned()
            .unwrap();
        let mut polymorphism = Polymorphism::default();
        polymorphism.push(crate::registry::DerivedType::new::<dyn Remark, Tally>("tally"));
        meta.set_polymorphism(polymorphism);
        registry.insert(meta);
        let options = SerdeOptions::new(registry);

        let err = options.scope(|| serde_json::to_string(&value)).unwrap_err();
        assert!(matches!(
            err.not_supported(),
            Some(NotSupported::Untaggable { .. })
        ));
    }

    #[test]
    fn format_agnostic() {
        #[derive(Serialize)]
        struct Remarks {
            items: Vec<Poly<dyn Remark>>,
        }

        let remarks = Remarks {
            items: vec![cheap(), cheap()],
        };
        let text = options().scope(|| ron::to_string(&remarks)).unwrap();
        assert!(text.contains(r#""$type":"cheap""#));
    }
}
