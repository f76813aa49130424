#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;
extern crate std;

// -----------------------------------------------------------------------------
// Modules

mod builder;
mod derived;
mod error;
mod legacy;
mod options;
mod resolver;

pub mod discovery;
pub mod verify;

#[cfg(test)]
mod fixtures;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use builder::PolymorphicBuilder;
pub use derived::DerivedTypes;
pub use discovery::{DiscoveredVariant, Module};
pub use error::{ConfigurationError, MissingDerivedTypes};
pub use options::{PolymorphismDefaults, PolymorphismOptions};
pub use resolver::PolymorphicResolver;

#[allow(deprecated)]
pub use legacy::PolymorphicTypeResolver;
