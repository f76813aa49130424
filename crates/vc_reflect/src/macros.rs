// -----------------------------------------------------------------------------
// impl_typed

/// Implements [`TypePath`](crate::info::TypePath) and [`Typed`](crate::info::Typed)
/// for a type declared in the invoking module.
///
/// - `impl_typed!(dyn Shape)`: an abstract trait object type.
/// - `impl_typed!(Wrapper<T>)`: a generic type, every instantiation is
///   marked as generic and is never found by variant discovery.
/// - `impl_typed!(Circle)`: a concrete type.
///
/// ```
/// use vc_reflect::impl_typed;
/// use vc_reflect::info::{TypePath, Typed};
///
/// pub trait Shape {}
/// pub struct Circle;
///
/// impl_typed!(dyn Shape);
/// impl_typed!(Circle);
///
/// assert_eq!(Circle::type_ident(), "Circle");
/// assert_eq!(<dyn Shape>::type_name(), "Shape");
/// assert_eq!(Circle::module_path(), Some(module_path!()));
/// ```
#[macro_export]
macro_rules! impl_typed {
    (dyn $name:ident) => {
        impl $crate::info::TypePath for dyn $name {
            #[inline]
            fn type_path() -> &'static str {
                ::core::concat!(::core::module_path!(), "::", ::core::stringify!($name))
            }

            #[inline]
            fn type_name() -> &'static str {
                ::core::stringify!($name)
            }

            #[inline]
            fn type_ident() -> &'static str {
                ::core::stringify!($name)
            }

            #[inline]
            fn module_path() -> ::core::option::Option<&'static str> {
                ::core::option::Option::Some(::core::module_path!())
            }
        }

        impl $crate::info::Typed for dyn $name {
            #[inline]
            fn type_info() -> $crate::info::TypeInfo {
                $crate::info::TypeInfo::of_abstract::<Self>()
            }
        }
    };
    ($name:ident < $($param:ident),+ $(,)? >) => {
        impl<$($param: 'static),+> $crate::info::TypePath for $name<$($param),+> {
            #[inline]
            fn type_path() -> &'static str {
                ::core::any::type_name::<Self>()
            }

            #[inline]
            fn type_name() -> &'static str {
                $crate::info::short_type_name(::core::any::type_name::<Self>())
            }

            #[inline]
            fn type_ident() -> &'static str {
                ::core::stringify!($name)
            }

            #[inline]
            fn module_path() -> ::core::option::Option<&'static str> {
                ::core::option::Option::Some(::core::module_path!())
            }
        }

        impl<$($param: 'static),+> $crate::info::Typed for $name<$($param),+> {
            #[inline]
            fn type_info() -> $crate::info::TypeInfo {
                $crate::info::TypeInfo::of_generic::<Self>()
            }
        }
    };
    ($name:ident) => {
        impl $crate::info::TypePath for $name {
            #[inline]
            fn type_path() -> &'static str {
                ::core::concat!(::core::module_path!(), "::", ::core::stringify!($name))
            }

            #[inline]
            fn type_name() -> &'static str {
                ::core::stringify!($name)
            }

            #[inline]
            fn type_ident() -> &'static str {
                ::core::stringify!($name)
            }

            #[inline]
            fn module_path() -> ::core::option::Option<&'static str> {
                ::core::option::Option::Some(::core::module_path!())
            }
        }

        impl $crate::info::Typed for $name {
            #[inline]
            fn type_info() -> $crate::info::TypeInfo {
                $crate::info::TypeInfo::of_concrete::<Self>()
            }
        }
    };
}

// -----------------------------------------------------------------------------
// impl_abstract

/// Declares a root type of a polymorphic hierarchy.
///
/// Implements [`AbstractType`](crate::variant::AbstractType) and, with the
/// `auto_register` feature, registers the type in
/// [`TypeRegistry::auto_register`](crate::registry::TypeRegistry::auto_register).
///
/// - `=> Bases`: the root is itself assignable to other abstract types.
///   The trait object must have them as supertraits. Variants of this
///   root are then discovered for the bases too.
/// - `; discriminator = ".."`: statically declared discriminator field name.
/// - `; derived = [C => "..", ..]`: statically declared variants.
///
/// A concrete type can also be a root, its values are then written
/// without discriminator unless it lists itself as a variant.
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use vc_reflect::{Variant, impl_abstract, impl_typed, impl_variant};
///
/// pub trait Shape: Variant {}
///
/// #[derive(Serialize, Deserialize)]
/// pub struct Circle {
///     radius: f64,
/// }
///
/// impl Shape for Circle {}
///
/// impl_typed!(dyn Shape);
/// impl_typed!(Circle);
/// impl_abstract!(dyn Shape; discriminator = "kind"; derived = [Circle => "circle"]);
/// impl_variant!(Circle => dyn Shape);
/// ```
#[macro_export]
macro_rules! impl_abstract {
    (
        $ty:ty $(=> $($base:ty),+ $(,)?)?
        $(; discriminator = $name:literal)?
        $(; derived = [$($variant:ty => $disc:literal),* $(,)?])?
        $(;)?
    ) => {
        impl $crate::variant::AbstractType for $ty {
            #[inline]
            fn as_variant(&self) -> &dyn $crate::variant::Variant {
                self
            }

            fn declared_polymorphism() -> ::core::option::Option<$crate::registry::Polymorphism> {
                let name: ::core::option::Option<&'static str> = ::core::option::Option::None
                    $(.or(::core::option::Option::Some($name)))?;
                let derived: $crate::__macro_exports::Vec<$crate::registry::DerivedType> =
                    $crate::__macro_exports::Vec::from([
                        $($($crate::registry::DerivedType::new::<Self, $variant>($disc)),*)?
                    ]);
                $crate::__macro_exports::declared_polymorphism(name, derived)
            }
        }

        $($(
            impl $crate::variant::Assignable<$base> for $ty {
                #[inline]
                fn upcast(
                    self: $crate::__macro_exports::Box<Self>,
                ) -> $crate::__macro_exports::Box<$base> {
                    self
                }
            }

            $crate::__submit! {
                $crate::variant::AssignableEdge::abstract_base(
                    <$ty as $crate::info::Typed>::type_info,
                    ::core::any::TypeId::of::<$base>,
                    $crate::__macro_exports::upcast_abstract::<$ty, $base>,
                )
            }
        )+)?

        $crate::__submit! {
            $crate::__macro_exports::AutoRegisterFunc(
                $crate::__macro_exports::register_abstract::<$ty>
            )
        }
    };
}

// -----------------------------------------------------------------------------
// impl_variant

/// Declares a concrete variant and the abstract types it is assignable to.
///
/// Implements [`Assignable`](crate::variant::Assignable) for every base.
/// With the `auto_register` feature, it also records the assignability
/// edges read by variant discovery and registers the type in
/// [`TypeRegistry::auto_register`](crate::registry::TypeRegistry::auto_register).
///
/// Every type is assignable to itself, so `impl_variant!(C)` is enough
/// for a concrete root that is its own variant.
///
/// Variants of a sub-root declared with `impl_abstract!(dyn Sub => dyn Base)`
/// are discovered for `dyn Base` as well, listing `dyn Base` here is only
/// needed to build `Poly<dyn Base>` from the variant directly.
#[macro_export]
macro_rules! impl_variant {
    ($ty:ty $(=> $($base:ty),+ $(,)?)?) => {
        $($(
            impl $crate::variant::Assignable<$base> for $ty {
                #[inline]
                fn upcast(
                    self: $crate::__macro_exports::Box<Self>,
                ) -> $crate::__macro_exports::Box<$base> {
                    self
                }
            }

            $crate::__submit! {
                $crate::variant::AssignableEdge::variant(
                    <$ty as $crate::info::Typed>::type_info,
                    ::core::any::TypeId::of::<$base>,
                    $crate::__macro_exports::derived_type::<$base, $ty>,
                )
            }
        )+)?

        $crate::__submit! {
            $crate::variant::AssignableEdge::variant(
                <$ty as $crate::info::Typed>::type_info,
                ::core::any::TypeId::of::<$ty>,
                $crate::__macro_exports::derived_type::<$ty, $ty>,
            )
        }

        $crate::__submit! {
            $crate::__macro_exports::AutoRegisterFunc(
                $crate::__macro_exports::register_variant::<$ty>
            )
        }
    };
}

// -----------------------------------------------------------------------------
// Link-time records

#[cfg(feature = "auto_register")]
#[doc(hidden)]
#[macro_export]
macro_rules! __submit {
    ($($value:tt)*) => {
        const _: () = {
            $crate::__macro_exports::inventory::submit! {
                $($value)*
            }
        };
    };
}

#[cfg(not(feature = "auto_register"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __submit {
    ($($value:tt)*) => {};
}
