/// Visits a value with a list of handlers.
///
/// `visit!(value, h1, h2, ...)` is shorthand for
/// [`visit(value, (h1, h2, ...))`](fn@crate::visit). The value is taken by
/// reference, so pass `&value` for sized values and the reference itself for
/// trait objects.
///
/// # Examples
///
/// ```
/// use core::cell::Cell;
///
/// use polyvisit::visit;
///
/// let kind = Cell::new("");
/// for value in [&1i32 as &(dyn core::any::Any + 'static), &"text", &2.5f64] {
///     visit!(
///         value,
///         |_: &i32| kind.set("int"),
///         |_: &&str| kind.set("str"),
///     );
/// }
/// assert_eq!(kind.get(), "str");
///
/// // No handlers at all is a no-op
/// visit!(&0u8);
/// ```
#[macro_export]
macro_rules! visit {
    ($value:expr $(,)?) => {
        $crate::visit($value, ())
    };
    ($value:expr, $($handler:expr),+ $(,)?) => {
        $crate::visit($value, ($($handler,)+))
    };
}

/// Makes trait objects of a user trait visitable.
///
/// The trait must have [`Any`](core::any::Any) as a supertrait. Every listed
/// trait-object type gets an implementation of
/// [`Visitable`](crate::Visitable) that resolves the object to its concrete
/// type. List each combination of auto traits you want to visit separately.
///
/// # Examples
///
/// ```
/// use core::any::Any;
///
/// use polyvisit::{Visitor, visitable_dyn};
///
/// trait Expr: Any {}
/// visitable_dyn!(dyn Expr, dyn Expr + Send + Sync);
///
/// struct Literal(i64);
/// struct Negate(Box<dyn Expr + Send + Sync>);
/// impl Expr for Literal {}
/// impl Expr for Negate {}
///
/// let expr = Negate(Box::new(Literal(4)));
/// let mut depth = 0;
/// let mut visitor = Visitor::new((|_: &Negate| depth += 1,));
/// visitor.visit(&expr as &(dyn Expr + 'static));
/// visitor.visit(&*expr.0);
/// drop(visitor);
/// assert_eq!(depth, 1);
/// ```
#[macro_export]
macro_rules! visitable_dyn {
    ($($ty:ty),+ $(,)?) => {
        $(
            // SAFETY: the trait object is upcast to `dyn Any`, which resolves
            // to the complete object and its exact type
            unsafe impl $crate::Visitable for $ty {
                #[inline]
                fn most_derived(&self) -> $crate::RawValueRef<'_> {
                    let value: &(dyn $crate::__private::Any + 'static) = self;
                    $crate::RawValueRef::from_any(value)
                }
            }
        )+
    };
}
