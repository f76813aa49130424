//! Variant discovery.
//!
//! Finds every concrete, non-generic type assignable to an abstract type
//! among the types declared in a set of [`Module`]s. Assignability comes
//! from the records of [`impl_variant!`](vc_reflect::impl_variant) and
//! [`impl_abstract!`](vc_reflect::impl_abstract), followed through sub-roots.
//! Only declared variants can be found, and only with the `auto_register`
//! feature.
//!
//! The modules are always explicit, an empty slice finds nothing.

use alloc::borrow::Cow;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;

use vc_reflect::AbstractType;
use vc_reflect::info::{TypeInfo, TypePath, TypePathTable};
use vc_reflect::registry::{DerivedType, UpcastFn};
use vc_reflect::variant::assignable_edges;
use vc_utils::TypeIdMap;
use vc_utils::hash::{FixedHashState, HashMap};

// -----------------------------------------------------------------------------
// Module

/// A Rust module to scan for variants.
///
/// - [`Module::new`]: types declared directly in the module.
/// - [`Module::tree`]: types declared in the module or any nested module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Module {
    path: &'static str,
    recursive: bool,
}

impl Module {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self {
            path,
            recursive: false,
        }
    }

    #[inline]
    pub const fn tree(path: &'static str) -> Self {
        Self {
            path,
            recursive: true,
        }
    }

    /// The module declaring `T`.
    pub fn of<T: TypePath + ?Sized>() -> Self {
        Self::new(T::module_path().unwrap_or_default())
    }

    /// All modules of the crate declaring `T`.
    pub fn crate_of<T: TypePath + ?Sized>() -> Self {
        Self::tree(TypePathTable::of::<T>().crate_name().unwrap_or_default())
    }

    /// The module declaring the type, if it has a module path.
    pub fn of_type(info: &TypeInfo) -> Option<Self> {
        info.module_path().map(Self::new)
    }

    /// All modules of the crate declaring the type, if it has a module path.
    pub fn crate_of_type(info: &TypeInfo) -> Option<Self> {
        info.ty().crate_name().map(Self::tree)
    }

    #[inline]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    #[inline]
    pub const fn is_recursive(&self) -> bool {
        self.recursive
    }

    /// Whether the type is declared in this module.
    pub fn contains(&self, info: &TypeInfo) -> bool {
        let Some(module) = info.module_path() else {
            return false;
        };
        if module == self.path {
            return true;
        }
        self.recursive
            && module
                .strip_prefix(self.path)
                .is_some_and(|rest| rest.starts_with("::"))
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.recursive {
            write!(f, "{}::*", self.path)
        } else {
            f.write_str(self.path)
        }
    }
}

// -----------------------------------------------------------------------------
// DiscoveredVariant

/// A variant found by [`discover`].
#[derive(Clone)]
pub struct DiscoveredVariant {
    info: TypeInfo,
    derived_type: fn(Cow<'static, str>) -> DerivedType,
    upcasts: Vec<UpcastFn>,
}

impl DiscoveredVariant {
    #[inline]
    pub const fn type_info(&self) -> &TypeInfo {
        &self.info
    }

    #[inline]
    pub const fn type_id(&self) -> TypeId {
        self.info.type_id()
    }

    /// Number of sub-roots between the variant and the discovered root,
    /// `0` if the variant is declared for the root itself.
    #[inline]
    pub fn depth(&self) -> usize {
        self.upcasts.len()
    }

    /// The entry of this variant using `discriminator`.
    pub fn derived_type(&self, discriminator: impl Into<Cow<'static, str>>) -> DerivedType {
        self.upcasts
            .iter()
            .fold((self.derived_type)(discriminator.into()), |derived, upcast| {
                derived.then_upcast(*upcast)
            })
    }
}

impl fmt::Debug for DiscoveredVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.info.type_path())
    }
}

// -----------------------------------------------------------------------------
// discover

/// Variants of `A` declared in `modules`, ordered by type path.
///
/// Variants of sub-roots declared with `impl_abstract!(dyn Sub => dyn A)`
/// are included, at any depth.
///
/// # Examples
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use vc_poly::Module;
/// use vc_poly::discovery::discover;
/// use vc_reflect::{Variant, impl_abstract, impl_typed, impl_variant};
///
/// pub trait Shape: Variant {}
///
/// #[derive(Serialize, Deserialize)]
/// pub struct Circle;
/// #[derive(Serialize, Deserialize)]
/// pub struct Square;
///
/// impl Shape for Circle {}
/// impl Shape for Square {}
///
/// impl_typed!(dyn Shape);
/// impl_typed!(Circle);
/// impl_typed!(Square);
/// impl_abstract!(dyn Shape);
/// impl_variant!(Circle => dyn Shape);
/// impl_variant!(Square => dyn Shape);
///
/// let found = discover::<dyn Shape>(&[Module::of::<dyn Shape>()]);
/// let names: Vec<_> = found.iter().map(|v| v.type_info().type_name()).collect();
/// assert_eq!(names, ["Circle", "Square"]);
///
/// assert!(discover::<dyn Shape>(&[]).is_empty());
/// ```
#[inline]
pub fn discover<A: AbstractType + ?Sized>(modules: &[Module]) -> Vec<DiscoveredVariant> {
    discover_by_id(TypeId::of::<A>(), modules)
}

/// Type-erased [`discover`].
pub fn discover_by_id(abstract_id: TypeId, modules: &[Module]) -> Vec<DiscoveredVariant> {
    let roots = reachable_roots(abstract_id);

    let mut index: HashMap<TypeId, usize> = HashMap::with_hasher(FixedHashState);
    let mut found: Vec<DiscoveredVariant> = Vec::new();

    for edge in assignable_edges().filter(|edge| edge.is_variant()) {
        let Some(upcasts) = roots.get(&edge.base()) else {
            continue;
        };
        let Some(derived_type) = edge.derived_type_fn() else {
            continue;
        };
        let info = edge.derived();
        if info.is_abstract() || info.is_generic() {
            continue;
        }
        if !modules.iter().any(|module| module.contains(&info)) {
            continue;
        }

        let variant = DiscoveredVariant {
            info,
            derived_type,
            upcasts: upcasts.clone(),
        };
        match index.get(&info.type_id()).copied() {
            // Several paths reach the root, keep the shortest.
            Some(at) if found[at].depth() > variant.depth() => found[at] = variant,
            Some(_) => {}
            None => {
                index.insert(info.type_id(), found.len());
                found.push(variant);
            }
        }
    }

    found.sort_unstable_by(|a, b| a.info.type_path().cmp(b.info.type_path()));

    tracing::trace!(
        modules = modules.len(),
        roots = roots.len(),
        variants = found.len(),
        "discovered variants"
    );

    found
}

/// Every root assignable to `abstract_id`, itself included, with the
/// upcasts leading from it to `abstract_id`.
fn reachable_roots(abstract_id: TypeId) -> TypeIdMap<Vec<UpcastFn>> {
    let mut roots = TypeIdMap::new();
    roots.insert(abstract_id, Vec::new());

    let edges: Vec<_> = assignable_edges()
        .filter_map(|edge| Some((edge.derived().type_id(), edge.base(), edge.upcast_fn()?)))
        .collect();

    loop {
        let mut grown = false;
        for &(derived, base, upcast) in &edges {
            if roots.contains(&derived) {
                continue;
            }
            let Some(path) = roots.get(&base) else {
                continue;
            };
            let mut upcasts = Vec::with_capacity(path.len() + 1);
            upcasts.push(upcast);
            upcasts.extend_from_slice(path);
            roots.insert(derived, upcasts);
            grown = true;
        }
        if !grown {
            return roots;
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
