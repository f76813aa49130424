use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use core::any::{Any, TypeId};
use core::fmt;
use core::marker::PhantomData;

use serde_core::de::value::MapAccessDeserializer;
use serde_core::de::{self, DeserializeSeed, IntoDeserializer, MapAccess, Visitor};
use serde_core::{Deserialize, Deserializer};

use crate::registry::{DerivedType, Polymorphism, TypeTraitDeserialize};
use crate::serde::{NotSupported, Poly, session};
use crate::variant::AbstractType;

#[inline]
fn fail<E: de::Error>(err: NotSupported) -> E {
    E::custom(session::report(err))
}

fn downcast<A: ?Sized + 'static, E: de::Error>(value: Box<dyn Any>) -> Result<Poly<A>, E> {
    match value.downcast::<Box<A>>() {
        Ok(value) => Ok(Poly::new(*value)),
        Err(_) => Err(E::custom(format_args!(
            "deserialized value is not a `{}`",
            core::any::type_name::<A>()
        ))),
    }
}

// -----------------------------------------------------------------------------
// Poly

impl<'de, A: AbstractType + ?Sized> Deserialize<'de> for Poly<A> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        session::recover(|| deserialize_poly(deserializer))
    }
}

fn deserialize_poly<'de, A, D>(deserializer: D) -> Result<Poly<A>, D::Error>
where
    A: AbstractType + ?Sized,
    D: Deserializer<'de>,
{
    let options = session::current().map_err(fail)?;
    let mut meta = options
        .type_meta(TypeId::of::<A>())
        .ok_or_else(|| {
            fail(NotSupported::MissingMetadata {
                type_path: A::type_path(),
            })
        })?;

    let fallback = meta.deserialize().copied();

    match meta.take_polymorphism() {
        Some(polymorphism) => deserializer.deserialize_map(PolyVisitor::<A> {
            polymorphism,
            fallback,
            marker: PhantomData,
        }),
        None => match fallback {
            Some(plain) => downcast(plain.deserialize(deserializer)?),
            None => Err(fail(NotSupported::NotPolymorphic {
                type_path: A::type_path(),
            })),
        },
    }
}

fn select<'a, A: AbstractType + ?Sized>(
    polymorphism: &'a Polymorphism,
    discriminator: &'a str,
) -> Result<&'a DerivedType, NotSupported> {
    let mut found = polymorphism.find_by_discriminator(discriminator);
    match (found.next(), found.next()) {
        (Some(derived), None) => Ok(derived),
        (Some(_), Some(_)) => Err(NotSupported::DuplicateDiscriminator {
            abstract_type: A::type_path(),
            discriminator: discriminator.into(),
        }),
        (None, _) => Err(NotSupported::UnknownDiscriminator {
            abstract_type: A::type_path(),
            discriminator: discriminator.into(),
        }),
    }
}

// -----------------------------------------------------------------------------
// PolyVisitor

struct PolyVisitor<A: ?Sized> {
    polymorphism: Arc<Polymorphism>,
    fallback: Option<TypeTraitDeserialize>,
    marker: PhantomData<fn() -> Box<A>>,
}

impl<'de, A: AbstractType + ?Sized> Visitor<'de> for PolyVisitor<A> {
    type Value = Poly<A>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "a map starting with discriminator `{}`",
            self.polymorphism.discriminator_name()
        )
    }

    fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<Poly<A>, M::Error> {
        let first: Option<String> = map.next_key()?;

        if first.as_deref() == Some(self.polymorphism.discriminator_name()) {
            let discriminator: String = map.next_value()?;
            let derived = select::<A>(&self.polymorphism, &discriminator).map_err(fail)?;

            tracing::trace!(
                abstract_type = A::type_path(),
                discriminator = derived.discriminator(),
                "deserialize derived type"
            );

            let value = derived.deserialize(MapAccessDeserializer::new(map))?;
            return downcast(value);
        }

        match self.fallback {
            Some(plain) => {
                let replay = ReplayMapAccess { first, map };
                downcast(plain.deserialize(MapAccessDeserializer::new(replay))?)
            }
            None => Err(fail(NotSupported::MissingDiscriminator {
                abstract_type: A::type_path(),
                discriminator_name: self.polymorphism.discriminator_name().into(),
            })),
        }
    }
}

// -----------------------------------------------------------------------------
// ReplayMapAccess

/// Hands an already consumed key back before the rest of the map.
struct ReplayMapAccess<M> {
    first: Option<String>,
    map: M,
}

impl<'de, M: MapAccess<'de>> MapAccess<'de> for ReplayMapAccess<M> {
    type Error = M::Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, M::Error> {
        match self.first.take() {
            Some(key) => seed
                .deserialize(IntoDeserializer::<'de, M::Error>::into_deserializer(key))
                .map(Some),
            None => self.map.next_key_seed(seed),
        }
    }

    #[inline]
    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, M::Error> {
        self.map.next_value_seed(seed)
    }

    #[inline]
    fn size_hint(&self) -> Option<usize> {
        let replayed = usize::from(self.first.is_some());
        self.map.size_hint().map(|len| len + replayed)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec::Vec;

    use serde::{Deserialize, Serialize};

    use crate::fixtures::{Cheap, Holder, Note, Remark, options};
    use crate::serde::NotSupported;
    use crate::{Poly, impl_abstract, impl_typed, impl_variant};

    #[derive(Serialize, Deserialize, Debug)]
    #[serde(untagged)]
    enum Entry {
        Remark(Poly<dyn Remark>),
        Raw(serde_json::Value),
    }

    /// A concrete root decoded plainly.
    #[derive(Serialize, Deserialize, Debug)]
    struct Journal {
        entry: Entry,
    }

    impl_typed!(Journal);
    impl_abstract!(Journal);
    impl_variant!(Journal);

    #[derive(Debug, Deserialize)]
    struct Log {
        journal: Poly<Journal>,
        count: u32,
    }

    #[test]
    fn declared_discriminator() {
        let json = r#"{ "specification": { "$type": "cheap", "remarks": "cheap" } }"#;
        let holder: Holder = options().scope(|| serde_json::from_str(json)).unwrap();

        assert_eq!(
            holder.specification.downcast_ref::<Cheap>(),
            Some(&Cheap {
                remarks: "cheap".to_string()
            })
        );
    }

    #[test]
    fn round_trip_list() {
        let json = r#"[{ "$type": "cheap", "remarks": "a" }, { "$type": "cheap", "remarks": "b" }]"#;
        let remarks: Vec<Poly<dyn Remark>> =
            options().scope(|| serde_json::from_str(json)).unwrap();
        let back = options().scope(|| serde_json::to_string(&remarks)).unwrap();

        assert_eq!(
            back,
            r#"[{"$type":"cheap","remarks":"a"},{"$type":"cheap","remarks":"b"}]"#
        );
    }

    #[test]
    fn unknown_discriminator() {
        let json = r#"{ "$type": "expensive", "remarks": "cheap" }"#;
        let err = options()
            .scope(|| serde_json::from_str::<Poly<dyn Remark>>(json))
            .unwrap_err();

        assert_eq!(
            err.not_supported(),
            Some(&NotSupported::UnknownDiscriminator {
                abstract_type: <dyn Remark as crate::info::TypePath>::type_path(),
                discriminator: "expensive".to_string(),
            })
        );
    }

    #[test]
    fn discriminator_must_come_first() {
        let json = r#"{ "remarks": "cheap", "$type": "cheap" }"#;
        let err = options()
            .scope(|| serde_json::from_str::<Poly<dyn Remark>>(json))
            .unwrap_err();

        assert!(matches!(
            err.not_supported(),
            Some(NotSupported::MissingDiscriminator { .. })
        ));
    }

    #[test]
    fn concrete_root_without_discriminator() {
        let json = r#"{ "text": "hi" }"#;
        let note: Poly<Note> = options().scope(|| serde_json::from_str(json)).unwrap();
        assert_eq!(note.text, "hi");
    }

    #[test]
    fn format_error_is_not_masked() {
        let json = r#"{ "$type": "cheap", "remarks": 1 }"#;
        let err = options()
            .scope(|| serde_json::from_str::<Poly<dyn Remark>>(json))
            .unwrap_err();
        assert!(!err.is_not_supported());
    }

    #[test]
    fn recovered_failure_is_forgotten() {
        let json = r#"{ "journal": { "entry": { "$type": "expensive" } }, "count": 2 }"#;
        let log: Log = options().scope(|| serde_json::from_str(json)).unwrap();
        assert_eq!(log.count, 2);
        assert!(matches!(
            &log.journal.entry,
            Entry::Raw(raw) if raw["$type"] == "expensive"
        ));

        let json = r#"{ "journal": { "entry": { "$type": "expensive" } }, "count": "many" }"#;
        let err = options()
            .scope(|| serde_json::from_str::<Log>(json))
            .unwrap_err();
        assert!(!err.is_not_supported());
    }

    #[test]
    fn unrecovered_failure_is_reported() {
        let json = r#"{ "journal": { "entry": { "$type": "expensive" } }, "count": 2 }"#;
        let err = options()
            .scope(|| serde_json::from_str::<Poly<dyn Remark>>(json))
            .unwrap_err();
        assert!(matches!(
            err.not_supported(),
            Some(NotSupported::MissingDiscriminator { .. })
        ));
    }
}
