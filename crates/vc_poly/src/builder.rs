use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;

use vc_reflect::AbstractType;
use vc_reflect::info::TypeInfo;
use vc_reflect::registry::{Polymorphism, TypeRegistry, TypeResolver};
use vc_utils::TypeIdMap;

use crate::error::{ConfigurationError, MissingDerivedTypes};
use crate::options::{PolymorphismDefaults, PolymorphismOptions};
use crate::resolver::PolymorphicResolver;
use crate::verify;

// -----------------------------------------------------------------------------
// PolymorphicBuilder

/// Collects the polymorphism configuration of abstract types and builds
/// a verified [`PolymorphicResolver`].
///
/// Configuring a type again replaces its previous configuration.
///
/// # Examples
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use vc_poly::PolymorphicBuilder;
/// use vc_reflect::{Poly, Variant, impl_abstract, impl_typed, impl_variant};
///
/// pub trait Shape: Variant {}
///
/// #[derive(Serialize, Deserialize)]
/// pub struct Circle {
///     radius: f64,
/// }
///
/// impl Shape for Circle {}
///
/// impl_typed!(dyn Shape);
/// impl_typed!(Circle);
/// impl_abstract!(dyn Shape);
/// impl_variant!(Circle => dyn Shape);
///
/// let resolver = PolymorphicBuilder::new()
///     .with::<dyn Shape>(|options| {
///         options.derived_types.add::<Circle>("circle");
///     })
///     .build()
///     .unwrap();
///
/// let options = vc_reflect::serde::SerdeOptions::new(resolver);
/// let shape: Poly<dyn Shape> = Poly::from_variant(Circle { radius: 2.0 });
/// let json = options.scope(|| serde_json::to_string(&shape)).unwrap();
/// assert_eq!(json, r#"{"$type":"circle","radius":2.0}"#);
/// ```
pub struct PolymorphicBuilder {
    defaults: PolymorphismDefaults,
    registrations: Vec<(TypeInfo, Polymorphism)>,
    index: TypeIdMap<usize>,
}

impl Default for PolymorphicBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl PolymorphicBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::with_defaults(PolymorphismDefaults::default())
    }

    /// A builder whose configurations start from `defaults`.
    pub fn with_defaults(defaults: PolymorphismDefaults) -> Self {
        Self {
            defaults,
            registrations: Vec::new(),
            index: TypeIdMap::new(),
        }
    }

    #[inline]
    pub fn defaults(&self) -> &PolymorphismDefaults {
        &self.defaults
    }

    /// Configures `A`, starting from the defaults of this builder.
    pub fn with<A: AbstractType + ?Sized>(
        self,
        configure: impl FnOnce(&mut PolymorphismOptions<A>),
    ) -> Self {
        let mut options = PolymorphismOptions::from_defaults(&self.defaults);
        configure(&mut options);
        self.with_options(options)
    }

    /// Configures `A` with options prepared elsewhere.
    pub fn with_options<A: AbstractType + ?Sized>(
        mut self,
        options: PolymorphismOptions<A>,
    ) -> Self {
        self.insert(A::type_info(), options.into_polymorphism());
        self
    }

    fn insert(&mut self, info: TypeInfo, polymorphism: Polymorphism) {
        let len = self.registrations.len();
        let index = *self.index.get_or_insert(info.type_id(), || len);
        if index == len {
            self.registrations.push((info, polymorphism));
        } else {
            tracing::debug!(
                abstract_type = info.type_path(),
                "replace polymorphism configuration"
            );
            self.registrations[index] = (info, polymorphism);
        }
    }

    /// Number of configured abstract types.
    #[inline]
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    #[inline]
    pub fn contains<A: ?Sized + 'static>(&self) -> bool {
        self.index.contains(&TypeId::of::<A>())
    }

    /// Verifies every configured mapping.
    ///
    /// All failures are collected, in configuration order.
    pub fn verify(&self) -> Result<(), ConfigurationError> {
        let errors: Vec<MissingDerivedTypes> = self
            .registrations
            .iter()
            .filter_map(|(info, polymorphism)| {
                let result = verify::verify(*info, polymorphism.derived_types(), None);
                tracing::debug!(
                    abstract_type = info.type_path(),
                    derived_types = polymorphism.derived_types().len(),
                    complete = result.is_ok(),
                    "verify polymorphism"
                );
                result.err()
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigurationError::new(errors))
        }
    }

    /// Verifies the configuration and builds a resolver on top of a
    /// [`TypeRegistry`] filled by [`TypeRegistry::auto_register`].
    pub fn build(self) -> Result<PolymorphicResolver<TypeRegistry>, ConfigurationError> {
        let mut registry = TypeRegistry::new();
        if !registry.auto_register() {
            tracing::warn!("automatic type registration is unavailable");
        }
        self.build_with(registry)
    }

    /// Verifies the configuration and builds a resolver on top of `inner`.
    pub fn build_with<R: TypeResolver>(
        self,
        inner: R,
    ) -> Result<PolymorphicResolver<R>, ConfigurationError> {
        self.verify()?;
        tracing::debug!(types = self.len(), "build polymorphic resolver");
        Ok(self.into_resolver(inner))
    }

    /// Builds a resolver without verification.
    pub(crate) fn into_resolver<R>(self, inner: R) -> PolymorphicResolver<R> {
        let mut resolver = PolymorphicResolver::new(inner);
        for (info, polymorphism) in self.registrations {
            resolver.insert(info.type_id(), polymorphism);
        }
        resolver
    }
}

impl fmt::Debug for PolymorphicBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolymorphicBuilder")
            .field("defaults", &self.defaults)
            .field("registrations", &self.registrations)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::string::ToString;
    use alloc::vec::Vec;
    use core::any::TypeId;

    use alloc::boxed::Box;

    use vc_reflect::Poly;
    use vc_reflect::info::Typed;
    use vc_reflect::registry::{DerivedType, TypeRegistry, TypeResolver};
    use vc_reflect::serde::{NotSupported, SerdeOptions};

    use super::PolymorphicBuilder;
    use crate::discovery::Module;
    use crate::fixtures::NoTypeInfo;
    use crate::fixtures::animals::{Animal, Cat, Dog};
    use crate::fixtures::notes::Note;
    use crate::fixtures::remarks::{Cheap, Insulated, Remark, Specification};
    use crate::fixtures::shapes::{Circle, Drawing, RoundShape, Shape, Square, Wrapper};
    use crate::fixtures::vehicles::{Boat, Canoe, Garage, Truck, Vehicle};
    use crate::options::{PolymorphismDefaults, PolymorphismOptions};

    fn shapes(builder: PolymorphicBuilder) -> PolymorphicBuilder {
        builder.with::<dyn Shape>(|options| {
            options
                .derived_types
                .add::<Circle>("circle")
                .add::<Square>("square");
        })
    }

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.auto_register();
        registry
    }

    fn rex() -> Poly<dyn Animal> {
        Poly::from_variant(Dog {
            name: "rex".to_string(),
        })
    }

    fn drawing(radius: f64) -> Drawing {
        Drawing {
            specification: Poly::from_variant(Circle { radius }),
        }
    }

    #[test]
    fn complete_mapping_round_trips() {
        let options = SerdeOptions::new(shapes(PolymorphicBuilder::new()).build().unwrap());

        let json = options.scope(|| serde_json::to_string(&drawing(2.0))).unwrap();
        assert_eq!(json, r#"{"specification":{"$type":"circle","radius":2.0}}"#);

        let back: Drawing = options.scope(|| serde_json::from_str(&json)).unwrap();
        assert_eq!(
            back.specification.downcast_ref::<Circle>(),
            Some(&Circle { radius: 2.0 })
        );
    }

    #[test]
    fn bulk_registration_uses_type_names() {
        let resolver = PolymorphicBuilder::new()
            .with::<dyn Shape>(|options| {
                options
                    .derived_types
                    .add_all_assignable(&[Module::of::<dyn Shape>()]);
            })
            .build()
            .unwrap();
        let options = SerdeOptions::new(resolver);

        let json = options.scope(|| serde_json::to_string(&drawing(1.5))).unwrap();
        assert_eq!(json, r#"{"specification":{"$type":"Circle","radius":1.5}}"#);

        let json = r#"{"specification":{"$type":"Square","side":3.0}}"#;
        let back: Drawing = options.scope(|| serde_json::from_str(json)).unwrap();
        assert_eq!(
            back.specification.downcast_ref::<Square>(),
            Some(&Square { side: 3.0 })
        );
    }

    #[test]
    fn incomplete_mapping_fails() {
        let err = PolymorphicBuilder::new()
            .with::<dyn Shape>(|options| {
                options.derived_types.add::<Circle>("circle");
            })
            .build()
            .unwrap_err();

        assert_eq!(err.errors().len(), 1);
        assert_eq!(*err.errors()[0].abstract_type(), <dyn Shape>::type_info());
        assert_eq!(err.errors()[0].missing(), [Square::type_info()]);
        assert!(err.to_string().contains(" * vc_poly::fixtures::shapes::Square"));
    }

    #[test]
    fn failures_are_aggregated() {
        let err = PolymorphicBuilder::new()
            .with::<dyn Shape>(|options| {
                options.derived_types.add::<Circle>("circle");
            })
            .with::<dyn Remark>(|options| {
                options.derived_types.add::<Cheap>("cheap");
            })
            .build()
            .unwrap_err();

        let failed: Vec<_> = err.failed_types().map(|info| info.type_name()).collect();
        assert_eq!(failed, ["Shape", "Remark"]);
        assert_eq!(err.errors()[1].missing(), [Insulated::type_info()]);
    }

    #[test]
    fn custom_discriminator_name() {
        let resolver = PolymorphicBuilder::new()
            .with::<dyn Remark>(|options| {
                options
                    .discriminator("$TYPE$")
                    .derived_types
                    .add::<Cheap>("cheap")
                    .add::<Insulated>("insulated");
            })
            .build()
            .unwrap();
        let options = SerdeOptions::new(resolver);

        let value = Specification {
            specification: Poly::from_variant(Insulated {
                remarks: "warm".to_string(),
                insulation_area: 12,
            }),
        };
        let json = options.scope(|| serde_json::to_string(&value)).unwrap();
        assert_eq!(
            json,
            r#"{"specification":{"$TYPE$":"insulated","remarks":"warm","insulation_area":12}}"#
        );
    }

    #[test]
    fn defaults_apply_to_every_type() {
        let resolver = shapes(PolymorphicBuilder::with_defaults(PolymorphismDefaults::new("kind")))
            .build()
            .unwrap();
        let options = SerdeOptions::new(resolver);

        let json = options.scope(|| serde_json::to_string(&drawing(1.0))).unwrap();
        assert_eq!(json, r#"{"specification":{"kind":"circle","radius":1.0}}"#);
    }

    #[test]
    fn reconfiguring_replaces() {
        let builder = shapes(PolymorphicBuilder::new()).with::<dyn Shape>(|options| {
            options.derived_types.add::<Circle>("circle");
        });
        assert_eq!(builder.len(), 1);
        assert!(builder.contains::<dyn Shape>());
        assert!(builder.verify().is_err());
    }

    #[test]
    fn prepared_options() {
        let mut options = PolymorphismOptions::<dyn RoundShape>::new();
        options.derived_types.add::<Circle>("circle");

        let resolver = PolymorphicBuilder::new()
            .with_options(options)
            .build()
            .unwrap();
        assert!(resolver.contains(TypeId::of::<dyn RoundShape>()));
        assert!(!resolver.contains(TypeId::of::<dyn Shape>()));
    }

    #[test]
    fn concrete_root_lists_itself() {
        let resolver = PolymorphicBuilder::new()
            .with::<Note>(|options| {
                options.derived_types.add_default::<Note>();
            })
            .build()
            .unwrap();
        let options = SerdeOptions::new(resolver);

        let note: Poly<Note> = Poly::from_variant(Note {
            text: "hi".to_string(),
        });
        let json = options.scope(|| serde_json::to_string(&note)).unwrap();
        assert_eq!(json, r#"{"$type":"Note","text":"hi"}"#);

        let back: Poly<Note> = options.scope(|| serde_json::from_str(&json)).unwrap();
        assert_eq!(back.text, "hi");
    }

    #[test]
    fn unmapped_runtime_type_is_not_supported() {
        let options = SerdeOptions::new(shapes(PolymorphicBuilder::new()).build().unwrap());
        let shape: Poly<dyn Shape> = Poly::from_variant(Wrapper { inner: 1_i32 });

        let err = options.scope(|| serde_json::to_string(&shape)).unwrap_err();
        assert!(matches!(
            err.not_supported(),
            Some(NotSupported::UnsupportedDerivedType { .. })
        ));
    }

    #[test]
    fn missing_type_information() {
        let resolver = shapes(PolymorphicBuilder::new())
            .build_with(NoTypeInfo)
            .unwrap();
        let plain = SerdeOptions::new(NoTypeInfo);
        assert!(resolver.resolve(TypeId::of::<dyn Shape>(), &plain).is_none());

        let options = SerdeOptions::new(resolver);
        let err = options.scope(|| serde_json::to_string(&drawing(1.0))).unwrap_err();
        assert!(matches!(
            err.not_supported(),
            Some(NotSupported::MissingMetadata { .. })
        ));
    }

    #[test]
    fn empty_builder() {
        let builder = PolymorphicBuilder::new();
        assert!(builder.is_empty());
        assert!(builder.verify().is_ok());
        assert!(builder.build().unwrap().is_empty());
    }

    #[test]
    fn concurrent_reads() {
        let options = SerdeOptions::new(shapes(PolymorphicBuilder::new()).build().unwrap());

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|i| {
                    let options = options.clone();
                    scope.spawn(move || {
                        let json = format!(r#"{{"specification":{{"$type":"square","side":{i}}}}}"#);
                        let drawing: Drawing =
                            options.scope(|| serde_json::from_str(&json)).unwrap();
                        drawing.specification.downcast_ref::<Square>().map(|s| s.side)
                    })
                })
                .collect();

            for (i, handle) in handles.into_iter().enumerate() {
                assert_eq!(handle.join().unwrap(), Some(i as f64));
            }
        });
    }

    #[test]
    fn configuration_replaces_declared_polymorphism() {
        let resolver = PolymorphicBuilder::new()
            .with::<dyn Animal>(|options| {
                options
                    .discriminator("t")
                    .derived_types
                    .add::<Dog>("DOG")
                    .add::<Cat>("CAT");
            })
            .build()
            .unwrap();
        let options = SerdeOptions::new(resolver);

        let json = options.scope(|| serde_json::to_string(&rex())).unwrap();
        assert_eq!(json, r#"{"t":"DOG","name":"rex"}"#);

        // The declared name and discriminator are not understood anymore.
        let err = options
            .scope(|| serde_json::from_str::<Poly<dyn Animal>>(r#"{"kind":"dog","name":"rex"}"#))
            .unwrap_err();
        assert!(matches!(
            err.not_supported(),
            Some(NotSupported::MissingDiscriminator { .. })
        ));

        let back: Poly<dyn Animal> = options
            .scope(|| serde_json::from_str(r#"{"t":"CAT","lives":9}"#))
            .unwrap();
        assert_eq!(back.downcast_ref::<Cat>(), Some(&Cat { lives: 9 }));
    }

    #[test]
    fn unconfigured_types_pass_through() {
        let bare = SerdeOptions::new(registry());
        let built = SerdeOptions::new(PolymorphicBuilder::new().build().unwrap());

        let expected = bare.scope(|| serde_json::to_string(&rex())).unwrap();
        assert_eq!(expected, r#"{"kind":"dog","name":"rex"}"#);
        assert_eq!(built.scope(|| serde_json::to_string(&rex())).unwrap(), expected);

        // Configuring another type leaves the declaration of `Animal` alone.
        let shapes_only = SerdeOptions::new(shapes(PolymorphicBuilder::new()).build().unwrap());
        assert_eq!(
            shapes_only.scope(|| serde_json::to_string(&rex())).unwrap(),
            expected
        );
    }

    #[test]
    fn foreign_entry_is_not_supported() {
        // Mapped without verification: `Dog` is only named by the declaration,
        // the configured entry belongs to `dyn Shape`.
        let resolver = PolymorphicBuilder::new()
            .with::<dyn Animal>(|options| {
                options
                    .derived_types
                    .add::<Cat>("cat")
                    .add_derived(DerivedType::new::<dyn Shape, Circle>("circle"));
            })
            .into_resolver(registry());
        let options = SerdeOptions::new(resolver);

        let err = options.scope(|| serde_json::to_string(&rex())).unwrap_err();
        assert!(matches!(
            err.not_supported(),
            Some(NotSupported::UnsupportedDerivedType { .. })
        ));

        let err = options
            .scope(|| {
                serde_json::from_str::<Poly<dyn Animal>>(r#"{"$type":"circle","radius":1.0}"#)
            })
            .unwrap_err();
        assert!(err.to_string().contains("is not a `dyn "));
    }

    #[test]
    fn sub_root_variant_is_required() {
        let err = PolymorphicBuilder::new()
            .with::<dyn Vehicle>(|options| {
                options.derived_types.add::<Truck>("truck");
            })
            .build()
            .unwrap_err();

        assert_eq!(err.errors()[0].missing(), [Canoe::type_info()]);
        assert!(err.to_string().contains(" * vc_poly::fixtures::vehicles::Canoe"));
    }

    #[test]
    fn sub_root_variant_round_trips() {
        let resolver = PolymorphicBuilder::new()
            .with::<dyn Vehicle>(|options| {
                options
                    .derived_types
                    .add_all_assignable(&[Module::of::<Canoe>()]);
            })
            .build()
            .unwrap();
        let options = SerdeOptions::new(resolver);

        let boat: Box<dyn Boat> = Box::new(Canoe { seats: 2 });
        let garage = Garage {
            vehicle: Poly::new(boat),
        };
        let json = options.scope(|| serde_json::to_string(&garage)).unwrap();
        assert_eq!(json, r#"{"vehicle":{"$type":"Canoe","seats":2}}"#);

        let back: Garage = options.scope(|| serde_json::from_str(&json)).unwrap();
        assert_eq!(back.vehicle.downcast_ref::<Canoe>(), Some(&Canoe { seats: 2 }));
    }
}
