use core::any::{Any, TypeId};
use core::fmt;

// -----------------------------------------------------------------------------
// TypePath

/// A static accessor to type paths and names.
///
/// - [`type_path`]: unique path of the type, such as `my_crate::shapes::Circle`.
/// - [`type_name`]: the path without modules, may be duplicated. `Wrapper<i32>`
/// - [`type_ident`]: the name without generics. `Wrapper`
/// - [`module_path`]: the module declaring the type.
///
/// These names never start with `::`.
///
/// [`impl_typed!`](crate::impl_typed) implements this trait together
/// with [`Typed`](crate::info::Typed), implementing it by hand is also fine:
///
/// ```
/// use vc_reflect::info::TypePath;
///
/// struct Foo;
///
/// impl TypePath for Foo {
///     fn type_path() -> &'static str { "my_crate::foo::Foo" }
///     fn type_name() -> &'static str { "Foo" }
///     fn type_ident() -> &'static str { "Foo" }
///     fn module_path() -> Option<&'static str> { Some("my_crate::foo") }
/// }
/// ```
///
/// [`type_path`]: TypePath::type_path
/// [`type_name`]: TypePath::type_name
/// [`type_ident`]: TypePath::type_ident
/// [`module_path`]: TypePath::module_path
pub trait TypePath: 'static {
    fn type_path() -> &'static str;

    fn type_name() -> &'static str;

    fn type_ident() -> &'static str;

    fn module_path() -> Option<&'static str> {
        None
    }
}

/// Strips the module path of a full type path, generic arguments are kept.
///
/// ```
/// use vc_reflect::info::short_type_name;
///
/// assert_eq!(short_type_name("a::b::Wrapper<c::D>"), "Wrapper<c::D>");
/// assert_eq!(short_type_name("a::b::Circle"), "Circle");
/// ```
pub fn short_type_name(type_path: &str) -> &str {
    let head = match type_path.find('<') {
        Some(index) => &type_path[..index],
        None => type_path,
    };
    match head.rfind("::") {
        Some(index) => &type_path[index + 2..],
        None => type_path,
    }
}

// -----------------------------------------------------------------------------
// TypePathTable

/// Function pointers to the [`TypePath`] methods of a type.
#[derive(Clone, Copy)]
pub struct TypePathTable {
    type_path: fn() -> &'static str,
    type_name: fn() -> &'static str,
    type_ident: fn() -> &'static str,
    module_path: fn() -> Option<&'static str>,
}

impl TypePathTable {
    #[inline]
    pub const fn of<T: TypePath + ?Sized>() -> Self {
        Self {
            type_path: T::type_path,
            type_name: T::type_name,
            type_ident: T::type_ident,
            module_path: T::module_path,
        }
    }

    #[inline(always)]
    pub fn path(&self) -> &'static str {
        (self.type_path)()
    }

    #[inline(always)]
    pub fn name(&self) -> &'static str {
        (self.type_name)()
    }

    #[inline(always)]
    pub fn ident(&self) -> &'static str {
        (self.type_ident)()
    }

    #[inline(always)]
    pub fn module_path(&self) -> Option<&'static str> {
        (self.module_path)()
    }

    /// The first segment of the module path.
    pub fn crate_name(&self) -> Option<&'static str> {
        let module = (self.module_path)()?;
        match module.find("::") {
            Some(index) => Some(&module[..index]),
            None => Some(module),
        }
    }
}

impl fmt::Debug for TypePathTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypePathTable")
            .field("type_path", &self.path())
            .field("type_name", &self.name())
            .field("type_ident", &self.ident())
            .field("module_path", &self.module_path())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Type

/// The [`TypeId`] and [`TypePathTable`] of a type.
///
/// Equality and hashing only use the [`TypeId`].
#[derive(Copy, Clone)]
pub struct Type {
    type_path_table: TypePathTable,
    type_id: TypeId,
}

impl Type {
    /// Creates a new [`Type`] from a type that implements [`TypePath`].
    #[inline]
    pub const fn of<T: TypePath + ?Sized>() -> Self {
        Self {
            type_path_table: TypePathTable::of::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }

    #[inline(always)]
    pub const fn id(&self) -> TypeId {
        self.type_id
    }

    /// Check if the given type matches this one.
    #[inline(always)]
    pub fn is<T: Any>(&self) -> bool {
        TypeId::of::<T>() == self.type_id
    }

    #[inline(always)]
    pub const fn path_table(&self) -> TypePathTable {
        self.type_path_table
    }

    /// See [`TypePath::type_path`].
    #[inline]
    pub fn path(&self) -> &'static str {
        self.type_path_table.path()
    }

    /// See [`TypePath::type_name`].
    #[inline]
    pub fn name(&self) -> &'static str {
        self.type_path_table.name()
    }

    /// See [`TypePath::type_ident`].
    #[inline]
    pub fn ident(&self) -> &'static str {
        self.type_path_table.ident()
    }

    /// See [`TypePath::module_path`].
    #[inline]
    pub fn module_path(&self) -> Option<&'static str> {
        self.type_path_table.module_path()
    }

    #[inline]
    pub fn crate_name(&self) -> Option<&'static str> {
        self.type_path_table.crate_name()
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for Type {}

impl core::hash::Hash for Type {
    #[inline]
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

// -----------------------------------------------------------------------------
// Tests
