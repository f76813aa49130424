use alloc::vec::Vec;
use core::fmt;

use thiserror::Error;
use vc_reflect::info::TypeInfo;

// -----------------------------------------------------------------------------
// MissingDerivedTypes

/// Variants of an abstract type that its mapping does not name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("missing derived types of `{}`:{}", .abstract_type.type_path(), TypeList(.missing))]
pub struct MissingDerivedTypes {
    abstract_type: TypeInfo,
    missing: Vec<TypeInfo>,
}

impl MissingDerivedTypes {
    #[inline]
    pub fn new(abstract_type: TypeInfo, missing: Vec<TypeInfo>) -> Self {
        Self {
            abstract_type,
            missing,
        }
    }

    #[inline]
    pub const fn abstract_type(&self) -> &TypeInfo {
        &self.abstract_type
    }

    /// The unnamed variants, ordered by type path.
    #[inline]
    pub fn missing(&self) -> &[TypeInfo] {
        &self.missing
    }
}

struct TypeList<'a>(&'a [TypeInfo]);

impl fmt::Display for TypeList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for info in self.0 {
            write!(f, "\n * {}", info.type_path())?;
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// ConfigurationError

/// Every incomplete mapping found while building a resolver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid polymorphism configuration:{}", ErrorList(.errors))]
pub struct ConfigurationError {
    errors: Vec<MissingDerivedTypes>,
}

impl ConfigurationError {
    #[inline]
    pub(crate) fn new(errors: Vec<MissingDerivedTypes>) -> Self {
        Self { errors }
    }

    /// One error per failed abstract type, in configuration order.
    #[inline]
    pub fn errors(&self) -> &[MissingDerivedTypes] {
        &self.errors
    }

    /// The abstract types with an incomplete mapping.
    pub fn failed_types(&self) -> impl Iterator<Item = &TypeInfo> {
        self.errors.iter().map(MissingDerivedTypes::abstract_type)
    }

    #[inline]
    pub fn into_errors(self) -> Vec<MissingDerivedTypes> {
        self.errors
    }
}

struct ErrorList<'a>(&'a [MissingDerivedTypes]);

impl fmt::Display for ErrorList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for err in self.0 {
            write!(f, "\n{err}")?;
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests
