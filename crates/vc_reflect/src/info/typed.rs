use crate::info::{TypeInfo, TypePath};

/// Static access to the [`TypeInfo`] of a type.
///
/// Usually implemented by [`impl_typed!`](crate::impl_typed):
///
/// ```
/// use vc_reflect::impl_typed;
/// use vc_reflect::info::Typed;
///
/// trait Shape {}
/// struct Circle;
/// struct Wrapper<T>(T);
///
/// impl_typed!(dyn Shape);
/// impl_typed!(Circle);
/// impl_typed!(Wrapper<T>);
///
/// assert!(<dyn Shape>::type_info().is_abstract());
/// assert!(!Circle::type_info().is_abstract());
/// assert!(<Wrapper<i32>>::type_info().is_generic());
/// assert_eq!(<Wrapper<i32>>::type_info().type_name(), "Wrapper<i32>");
/// ```
pub trait Typed: TypePath {
    fn type_info() -> TypeInfo;
}
