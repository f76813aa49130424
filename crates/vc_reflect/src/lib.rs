#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Extern Self

// Macros expand to `$crate::...`, doc tests and the tests of this crate
// name it `vc_reflect`.
extern crate self as vc_reflect;

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;
extern crate std;

// -----------------------------------------------------------------------------
// Modules

mod macros;

#[cfg(test)]
mod fixtures;

pub mod info;
pub mod registry;
pub mod serde;
pub mod variant;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use serde::Poly;
pub use variant::{AbstractType, Assignable, Variant};
