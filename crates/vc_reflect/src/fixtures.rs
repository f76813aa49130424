//! Types shared by the tests of this crate.

use alloc::string::String;
use core::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::registry::TypeRegistry;
use crate::serde::SerdeOptions;
use crate::{Poly, Variant, impl_abstract, impl_typed, impl_variant};

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

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Tally(pub u32);

#[derive(Serialize, Deserialize, Debug)]
pub struct Holder {
    pub specification: Poly<dyn Remark>,
}

/// A concrete root without variants.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Note {
    pub text: String,
}

impl Remark for Cheap {}
impl Remark for Insulated {}
impl Remark for Tally {}

impl_typed!(dyn Remark);
impl_typed!(Cheap);
impl_typed!(Insulated);
impl_typed!(Tally);
impl_typed!(Note);

impl_abstract!(dyn Remark; derived = [Cheap => "cheap"]);
impl_abstract!(Note);

impl_variant!(Cheap => dyn Remark);
impl_variant!(Insulated => dyn Remark);
impl_variant!(Tally => dyn Remark);
impl_variant!(Note);

pub fn options() -> SerdeOptions {
    let mut registry = TypeRegistry::new();
    registry.auto_register();
    SerdeOptions::new(registry)
}
