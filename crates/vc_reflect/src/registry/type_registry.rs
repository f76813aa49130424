use core::any::TypeId;
use core::fmt;

use serde_core::de::DeserializeOwned;
use vc_utils::TypeIdMap;
use vc_utils::hash::{FixedHashState, HashMap};

use crate::info::{TypeInfo, Typed};
use crate::registry::{TypeMeta, TypeResolver, TypeTraitDeserialize};
use crate::serde::SerdeOptions;
use crate::variant::AbstractType;

// -----------------------------------------------------------------------------
// TypeRegistry

/// A table of [`TypeMeta`], the default [`TypeResolver`].
///
/// Registration merges: a concrete type can be registered both as a
/// variant and as the root of its own hierarchy.
///
/// # Examples
///
/// ```
/// use core::any::TypeId;
/// use serde::{Deserialize, Serialize};
/// use vc_reflect::registry::TypeRegistry;
/// use vc_reflect::impl_typed;
///
/// #[derive(Serialize, Deserialize)]
/// struct Circle {
///     radius: f64,
/// }
///
/// impl_typed!(Circle);
///
/// let mut registry = TypeRegistry::new();
/// registry.register_variant::<Circle>();
///
/// let meta = registry.get(TypeId::of::<Circle>()).unwrap();
/// assert!(meta.deserialize().is_some());
/// assert!(registry.get_with_type_path(meta.type_info().type_path()).is_some());
/// ```
pub struct TypeRegistry {
    type_meta_table: TypeIdMap<TypeMeta>,
    type_path_to_id: HashMap<&'static str, TypeId>,
    auto_registered: bool,
}

impl Default for TypeRegistry {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[inline]
    pub const fn new() -> Self {
        Self {
            type_meta_table: TypeIdMap::new(),
            type_path_to_id: HashMap::with_hasher(FixedHashState),
            auto_registered: false,
        }
    }

    fn entry(&mut self, type_info: TypeInfo) -> &mut TypeMeta {
        let type_path_to_id = &mut self.type_path_to_id;
        self.type_meta_table
            .get_or_insert(type_info.type_id(), || {
                type_path_to_id.insert(type_info.type_path(), type_info.type_id());
                TypeMeta::new(type_info)
            })
    }

    /// Registers a type without any capability.
    pub fn register<T: Typed + ?Sized>(&mut self) {
        self.entry(T::type_info());
    }

    /// Registers a concrete type and how to deserialize it.
    pub fn register_variant<T: Typed + DeserializeOwned>(&mut self) {
        self.entry(T::type_info())
            .set_deserialize(TypeTraitDeserialize::of::<T>());
    }

    /// Registers a root type and its statically declared polymorphism.
    pub fn register_abstract<A: AbstractType + ?Sized>(&mut self) {
        let declared = A::declared_polymorphism();
        let meta = self.entry(A::type_info());
        if let Some(polymorphism) = declared {
            meta.set_polymorphism(polymorphism);
        }
    }

    /// Inserts a [`TypeMeta`], replacing the existing one.
    pub fn insert(&mut self, type_meta: TypeMeta) -> Option<TypeMeta> {
        let info = *type_meta.type_info();
        self.type_path_to_id
            .insert(info.type_path(), info.type_id());
        self.type_meta_table.insert(info.type_id(), type_meta)
    }

    /// Registers every type declared with `impl_variant!` or `impl_abstract!`.
    ///
    /// Returns `true` if automatic registration works on the current platform.
    /// Successful registrations remain `true` on subsequent calls.
    ///
    /// ## Feature Dependency
    ///
    /// This method requires the `auto_register` feature. When disabled, it always do nothing and
    /// returns `false`.
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            // Reduce the cost of duplicate registrations.
            if self.auto_registered {
                return true;
            }
            crate::__macro_exports::register_types(self);
            if self.auto_registered {
                tracing::debug!(types = self.len(), "auto registered types");
            }
        }
        self.auto_registered
    }

    #[cfg_attr(not(feature = "auto_register"), expect(dead_code, reason = "no records"))]
    pub(crate) fn mark_auto_registered(&mut self) {
        self.auto_registered = true;
    }

    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.type_meta_table.contains(&type_id)
    }

    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&TypeMeta> {
        self.type_meta_table.get(&type_id)
    }

    #[inline]
    pub fn get_mut(&mut self, type_id: TypeId) -> Option<&mut TypeMeta> {
        self.type_meta_table.get_mut(&type_id)
    }

    pub fn get_with_type_path(&self, type_path: &str) -> Option<&TypeMeta> {
        match self.type_path_to_id.get(type_path) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.type_meta_table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.type_meta_table.is_empty()
    }

    /// Visits all registered types in arbitrary order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeMeta> {
        self.type_meta_table.values()
    }
}

impl TypeResolver for TypeRegistry {
    fn resolve(&self, type_id: TypeId, _: &SerdeOptions) -> Option<TypeMeta> {
        self.get(type_id).cloned()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.iter().map(|meta| meta.type_info().type_path()))
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
