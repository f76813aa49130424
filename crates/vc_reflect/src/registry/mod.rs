//! Type metadata and the resolvers producing it.
//!
//! ## Menu
//!
//! - [`TypeMeta`]: the metadata of one type, its [`TypeInfo`], how to
//!   deserialize it and its [`Polymorphism`].
//! - [`Polymorphism`]: the discriminator field name and the [`DerivedType`]s
//!   of an abstract type.
//! - [`TypeTraitDeserialize`]: type-erased deserialization of a concrete type.
//! - [`TypeResolver`]: produces [`TypeMeta`] for a [`TypeId`].
//! - [`TypeRegistry`]: the default [`TypeResolver`], a table of [`TypeMeta`].
//!
//! ## auto_register
//!
//! See [`TypeRegistry::auto_register`].
//!
//! We use [`inventory`] crate to implement static registration,
//! not all platforms support it (although major platforms do).
//! If it is not supported, the function returns `false` and registers nothing.
//!
//! [`TypeInfo`]: crate::info::TypeInfo
//! [`TypeId`]: core::any::TypeId
//! [`inventory`]: https://docs.rs/inventory

// -----------------------------------------------------------------------------
// Modules

mod deserialize;
mod polymorphism;
mod resolver;
mod type_meta;
mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use deserialize::TypeTraitDeserialize;
pub use polymorphism::{DEFAULT_DISCRIMINATOR_NAME, DerivedType, Polymorphism, UpcastFn};
pub use resolver::TypeResolver;
pub use type_meta::TypeMeta;
pub use type_registry::TypeRegistry;
