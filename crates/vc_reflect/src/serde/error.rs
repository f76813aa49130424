use alloc::string::String;

// -----------------------------------------------------------------------------
// NotSupported

/// A value the serde engine cannot handle with the resolved metadata.
///
/// Raised while a value is written or read, never while configuring.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotSupported {
    #[error("no metadata resolved for `{type_path}`")]
    MissingMetadata { type_path: &'static str },
    #[error("`{type_path}` has no polymorphism configured")]
    NotPolymorphic { type_path: &'static str },
    #[error("runtime type `{runtime_type}` is not a derived type of `{abstract_type}`")]
    UnsupportedDerivedType {
        abstract_type: &'static str,
        runtime_type: &'static str,
    },
    #[error("`{runtime_type}` is serialized as {shape}, which cannot carry a discriminator")]
    Untaggable {
        runtime_type: &'static str,
        shape: &'static str,
    },
    #[error("unknown discriminator `{discriminator}` for `{abstract_type}`")]
    UnknownDiscriminator {
        abstract_type: &'static str,
        discriminator: String,
    },
    #[error("`{abstract_type}` expects discriminator `{discriminator_name}` as the first property")]
    MissingDiscriminator {
        abstract_type: &'static str,
        discriminator_name: String,
    },
    #[error("discriminator `{discriminator}` is used by several derived types of `{abstract_type}`")]
    DuplicateDiscriminator {
        abstract_type: &'static str,
        discriminator: String,
    },
    #[error("`{runtime_type}` is registered several times as a derived type of `{abstract_type}`")]
    DuplicateDerivedType {
        abstract_type: &'static str,
        runtime_type: &'static str,
    },
    #[error("no serde session is active, run the operation in `SerdeOptions::scope`")]
    NoSession,
}

// -----------------------------------------------------------------------------
// SerdeError

/// The error of [`SerdeOptions::scope`](crate::serde::SerdeOptions::scope).
#[derive(Debug, thiserror::Error)]
pub enum SerdeError<E> {
    #[error(transparent)]
    NotSupported(#[from] NotSupported),
    /// Any other failure of the data format.
    #[error("{0}")]
    Format(E),
}

impl<E> SerdeError<E> {
    #[inline]
    pub fn not_supported(&self) -> Option<&NotSupported> {
        match self {
            Self::NotSupported(err) => Some(err),
            Self::Format(_) => None,
        }
    }

    #[inline]
    pub fn is_not_supported(&self) -> bool {
        matches!(self, Self::NotSupported(_))
    }
}
