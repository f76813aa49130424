//! Completeness verification.
//!
//! A mapping of an abstract type is complete when every variant that
//! discovery finds in the verified modules has an entry. Without explicit
//! modules, the crates declaring the mapped variants are verified.

use alloc::vec::Vec;

use vc_reflect::info::TypeInfo;
use vc_reflect::registry::DerivedType;
use vc_utils::hash::{FixedHashState, HashSet};

use crate::discovery::{Module, discover_by_id};
use crate::error::MissingDerivedTypes;

/// The crates declaring the variants of `derived_types`, without repetition.
pub fn default_modules(derived_types: &[DerivedType]) -> Vec<Module> {
    let mut modules: Vec<Module> = Vec::new();
    for derived in derived_types {
        if let Some(module) = Module::crate_of_type(derived.type_info())
            && !modules.contains(&module)
        {
            modules.push(module);
        }
    }
    modules
}

/// Variants of `abstract_type` in `modules` that `derived_types` does not
/// name, ordered by type path.
///
/// `None` verifies [`default_modules`], so an empty mapping is always complete.
pub fn missing_derived_types(
    abstract_type: &TypeInfo,
    derived_types: &[DerivedType],
    modules: Option<&[Module]>,
) -> Vec<TypeInfo> {
    let defaults;
    let modules = match modules {
        Some(modules) => modules,
        None => {
            defaults = default_modules(derived_types);
            &defaults
        }
    };

    let mapped: HashSet<_> = {
        let mut set = HashSet::with_capacity_and_hasher(derived_types.len(), FixedHashState);
        set.extend(derived_types.iter().map(DerivedType::type_id));
        set
    };

    discover_by_id(abstract_type.type_id(), modules)
        .into_iter()
        .filter(|variant| !mapped.contains(&variant.type_id()))
        .map(|variant| *variant.type_info())
        .collect()
}

/// Fails with every unnamed variant of `abstract_type`.
pub fn verify(
    abstract_type: TypeInfo,
    derived_types: &[DerivedType],
    modules: Option<&[Module]>,
) -> Result<(), MissingDerivedTypes> {
    let missing = missing_derived_types(&abstract_type, derived_types, modules);
    if missing.is_empty() {
        return Ok(());
    }

    tracing::debug!(
        abstract_type = abstract_type.type_path(),
        missing = missing.len(),
        "incomplete derived types"
    );
    Err(MissingDerivedTypes::new(abstract_type, missing))
}

// -----------------------------------------------------------------------------
// Tests
