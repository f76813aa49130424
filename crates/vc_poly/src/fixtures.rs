//! Hierarchies shared by the tests of this crate.
//!
//! Each hierarchy lives in its own module, discovery is scoped by module.

use core::any::TypeId;

use vc_reflect::registry::{TypeMeta, TypeResolver};
use vc_reflect::serde::SerdeOptions;

/// A resolver without any type information.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTypeInfo;

impl TypeResolver for NoTypeInfo {
    fn resolve(&self, _: TypeId, _: &SerdeOptions) -> Option<TypeMeta> {
        None
    }
}

pub mod shapes {
    use core::fmt::Debug;

    use serde::{Deserialize, Serialize};
    use vc_reflect::{Poly, Variant, impl_abstract, impl_typed, impl_variant};

    pub trait Shape: Variant + Debug {}

    /// Shapes without corners.
    pub trait RoundShape: Shape {}

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    pub struct Circle {
        pub radius: f64,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    pub struct Square {
        pub side: f64,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    pub struct Wrapper<T> {
        pub inner: T,
    }

    #[derive(Serialize, Deserialize, Debug)]
    pub struct Drawing {
        pub specification: Poly<dyn Shape>,
    }

    impl Shape for Circle {}
    impl RoundShape for Circle {}
    impl Shape for Square {}
    impl Shape for Wrapper<i32> {}

    impl_typed!(dyn Shape);
    impl_typed!(dyn RoundShape);
    impl_typed!(Circle);
    impl_typed!(Square);
    impl_typed!(Wrapper<T>);

    impl_abstract!(dyn Shape);
    impl_abstract!(dyn RoundShape => dyn Shape);

    impl_variant!(Circle => dyn Shape, dyn RoundShape);
    impl_variant!(Square => dyn Shape);
    impl_variant!(Wrapper<i32> => dyn Shape);
}

pub mod remarks {
    use alloc::string::String;
    use core::fmt::Debug;

    use serde::{Deserialize, Serialize};
    use vc_reflect::{Poly, Variant, impl_abstract, impl_typed, impl_variant};

    pub trait Remark: Variant + Debug {}

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    pub struct Cheap {
        pub remarks: String,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    pub struct Insulated {
        pub remarks: String,
        pub insulation_area: i32,
    }

    #[derive(Serialize, Deserialize, Debug)]
    pub struct Specification {
        pub specification: Poly<dyn Remark>,
    }

    impl Remark for Cheap {}
    impl Remark for Insulated {}

    impl_typed!(dyn Remark);
    impl_typed!(Cheap);
    impl_typed!(Insulated);

    impl_abstract!(dyn Remark);

    impl_variant!(Cheap => dyn Remark);
    impl_variant!(Insulated => dyn Remark);
}

pub mod notes {
    use alloc::string::String;

    use serde::{Deserialize, Serialize};
    use vc_reflect::{impl_abstract, impl_typed, impl_variant};

    /// A concrete root.
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    pub struct Note {
        pub text: String,
    }

    impl_typed!(Note);
    impl_abstract!(Note);
    impl_variant!(Note);
}

pub mod animals {
    use core::fmt::Debug;

    use serde::{Deserialize, Serialize};
    use vc_reflect::{Variant, impl_abstract, impl_typed, impl_variant};

    /// Declares its own polymorphism.
    pub trait Animal: Variant + Debug {}

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    pub struct Dog {
        pub name: alloc::string::String,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    pub struct Cat {
        pub lives: u8,
    }

    impl Animal for Dog {}
    impl Animal for Cat {}

    impl_typed!(dyn Animal);
    impl_typed!(Dog);
    impl_typed!(Cat);

    impl_abstract!(dyn Animal; discriminator = "kind"; derived = [Dog => "dog"]);

    impl_variant!(Dog => dyn Animal);
    impl_variant!(Cat => dyn Animal);
}

pub mod vehicles {
    use core::fmt::Debug;

    use serde::{Deserialize, Serialize};
    use vc_reflect::{Poly, Variant, impl_abstract, impl_typed, impl_variant};

    pub trait Vehicle: Variant + Debug {}

    /// Variants of boats are only declared for `dyn Boat`.
    pub trait Boat: Vehicle {}

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    pub struct Canoe {
        pub seats: u8,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    pub struct Truck {
        pub axles: u8,
    }

    #[derive(Serialize, Deserialize, Debug)]
    pub struct Garage {
        pub vehicle: Poly<dyn Vehicle>,
    }

    impl Vehicle for Canoe {}
    impl Boat for Canoe {}
    impl Vehicle for Truck {}

    impl_typed!(dyn Vehicle);
    impl_typed!(dyn Boat);
    impl_typed!(Canoe);
    impl_typed!(Truck);

    impl_abstract!(dyn Vehicle);
    impl_abstract!(dyn Boat => dyn Vehicle);

    impl_variant!(Canoe => dyn Boat);
    impl_variant!(Truck => dyn Vehicle);
}
