//! Tagged-union serialization driven by [`TypeMeta`].
//!
//! # Overview
//!
//! - [`Poly<A>`]: a boxed value of the abstract type `A`. It implements
//!   `Serialize` and `Deserialize` by asking the active [`SerdeOptions`]
//!   for the [`TypeMeta`] of `A`.
//! - [`SerdeOptions`]: holds the [`TypeResolver`] and runs an encode or
//!   decode in a thread-local session through [`SerdeOptions::scope`].
//! - [`NotSupported`]: why a value could not be handled, reported as
//!   [`SerdeError::NotSupported`] by [`SerdeOptions::scope`].
//!
//! ## Serialization
//!
//! With polymorphism configured, the runtime type is looked up in the
//! derived types of `A` and written as a map, the discriminator entry
//! first and the fields of the variant after it. A concrete `A` that is
//! not listed among its own derived types is written as is. An abstract
//! `A` without polymorphism is not supported.
//!
//! ## Deserialization
//!
//! The discriminator must be the first entry of the map. If the first
//! entry is something else and `A` can be deserialized by itself, the
//! map is read as an `A`.
//!
//! # Examples
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use vc_reflect::registry::TypeRegistry;
//! use vc_reflect::serde::SerdeOptions;
//! use vc_reflect::{Poly, Variant, impl_abstract, impl_typed, impl_variant};
//!
//! pub trait Shape: Variant {}
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! pub struct Circle {
//!     radius: f64,
//! }
//!
//! impl Shape for Circle {}
//!
//! impl_typed!(dyn Shape);
//! impl_typed!(Circle);
//! impl_abstract!(dyn Shape; derived = [Circle => "circle"]);
//! impl_variant!(Circle => dyn Shape);
//!
//! let mut registry = TypeRegistry::new();
//! registry.register_abstract::<dyn Shape>();
//! let options = SerdeOptions::new(registry);
//!
//! let shape: Poly<dyn Shape> = Poly::from_variant(Circle { radius: 2.0 });
//! let json = options.scope(|| serde_json::to_string(&shape)).unwrap();
//! assert_eq!(json, r#"{"$type":"circle","radius":2.0}"#);
//!
//! let back: Poly<dyn Shape> = options.scope(|| serde_json::from_str(&json)).unwrap();
//! assert_eq!(back.downcast_ref::<Circle>(), Some(&Circle { radius: 2.0 }));
//! ```
//!
//! [`TypeMeta`]: crate::registry::TypeMeta
//! [`TypeResolver`]: crate::registry::TypeResolver

// -----------------------------------------------------------------------------
// Modules

mod de;
mod error;
mod options;
mod poly;
mod ser;
mod session;

// -----------------------------------------------------------------------------
// Exports

pub use error::{NotSupported, SerdeError};
pub use options::SerdeOptions;
pub use poly::Poly;
