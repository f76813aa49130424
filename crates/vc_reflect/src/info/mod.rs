//! Static type information.
//!
//! - [`TypePath`]: stable names of a type.
//! - [`Type`]: a `TypeId` paired with its [`TypePathTable`].
//! - [`TypeInfo`]: a [`Type`] plus the facts variant discovery needs,
//!   whether the type is abstract and whether it is a generic instantiation.
//! - [`Typed`]: static access to [`TypeInfo`].
//!
//! All of them are implemented by [`impl_typed!`](crate::impl_typed).

// -----------------------------------------------------------------------------
// Modules

mod type_info;
mod type_path;
mod typed;

// -----------------------------------------------------------------------------
// Exports

pub use type_info::{TypeInfo, TypeKind};
pub use type_path::{Type, TypePath, TypePathTable, short_type_name};
pub use typed::Typed;
