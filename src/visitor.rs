//! The entry point and reusable visitors.
//!
//! [`visit`](fn@visit) is the one-shot form: it composes the handlers, resolves the
//! value, dispatches, and drops the handlers again. When the same handlers
//! are applied to many values, build a [`Visitor`] once instead. When
//! visitors with different handler sets must be stored side by side, erase
//! them into [`ErasedVisitor`] trait objects.

use polyvisit_internals::{Candidate, RawValueRef};

use crate::{
    overload::{HandlerList, Overload},
    visitable::Visitable,
};

/// Invokes the first handler whose parameter type is exactly the runtime type
/// of `value`.
///
/// Each handler's parameter type is inferred from its signature. If `value`
/// is a trait object, its runtime type is the concrete type of the object
/// behind it, and the handler receives a reference to that object. If no
/// handler accepts the runtime type, nothing happens.
///
/// Matching is by exact type only. A handler for some type never fires for
/// values of other types, whatever relationship the two types have.
///
/// # Examples
///
/// ```
/// use core::{any::Any, cell::RefCell};
///
/// use polyvisit::visit;
///
/// let log = RefCell::new(Vec::new());
/// let values: [Box<dyn Any>; 3] = [Box::new(42i32), Box::new(String::from("x")), Box::new(1.5f32)];
///
/// for value in &values {
///     visit(
///         &**value,
///         (
///             |n: &i32| log.borrow_mut().push(format!("int {n}")),
///             |s: &String| log.borrow_mut().push(format!("string {s}")),
///         ),
///     );
/// }
///
/// assert_eq!(log.into_inner(), ["int 42", "string x"]);
/// ```
#[inline]
pub fn visit<V, Hs, Ts>(value: &V, handlers: Hs)
where
    V: Visitable + ?Sized,
    Hs: HandlerList<Ts>,
{
    Overload::new(handlers).dispatch_raw(value.most_derived());
}

/// A composed handler tuple that can visit any number of values.
///
/// # Examples
///
/// ```
/// use polyvisit::Visitor;
///
/// let mut total = 0u32;
/// let mut visitor = Visitor::new((|n: &u32| total += *n,));
///
/// for n in [1u32, 2, 3] {
///     visitor.visit(&n);
/// }
/// assert_eq!(visitor.try_visit(&4u32), Some(0));
/// assert_eq!(visitor.try_visit(&4u64), None);
/// drop(visitor);
///
/// assert_eq!(total, 10);
/// ```
pub struct Visitor<Hs, Ts> {
    /// The composed handlers
    overload: Overload<Hs, Ts>,
}

impl<Hs, Ts> Visitor<Hs, Ts>
where
    Hs: HandlerList<Ts>,
{
    /// Creates a visitor from a tuple of handlers.
    #[inline]
    pub fn new(handlers: Hs) -> Self {
        Self {
            overload: Overload::new(handlers),
        }
    }

    /// Invokes the first handler whose parameter type is exactly the runtime
    /// type of `value`. See [`visit`](fn@visit).
    #[inline]
    pub fn visit<V>(&mut self, value: &V)
    where
        V: Visitable + ?Sized,
    {
        self.overload.dispatch_raw(value.most_derived());
    }

    /// Like [`Visitor::visit`], but returns the position of the handler that
    /// was invoked, or `None` if no handler accepts the runtime type of
    /// `value`.
    #[inline]
    pub fn try_visit<V>(&mut self, value: &V) -> Option<usize>
    where
        V: Visitable + ?Sized,
    {
        self.overload.dispatch_raw(value.most_derived())
    }

    /// Returns the parameter types of the handlers, in handler order.
    #[inline]
    pub fn candidates(&self) -> &'static [Candidate] {
        self.overload.candidates()
    }

    /// Returns the composed handlers.
    #[inline]
    pub fn into_overload(self) -> Overload<Hs, Ts> {
        self.overload
    }

    /// Returns the handlers that can never run because an earlier handler
    /// accepts the same type.
    #[cfg(feature = "alloc")]
    #[cfg_attr(docsrs, doc(cfg(feature = "alloc")))]
    pub fn shadowed(&self) -> alloc::vec::Vec<crate::analysis::ShadowedHandler> {
        self.overload.shadowed()
    }

    /// Erases the handler types, so that visitors with different handlers can
    /// be stored together.
    #[cfg(feature = "alloc")]
    #[cfg_attr(docsrs, doc(cfg(feature = "alloc")))]
    pub fn into_boxed<'h>(self) -> BoxedVisitor<'h>
    where
        Self: 'h,
    {
        alloc::boxed::Box::new(self)
    }
}

impl<Hs, Ts> From<Overload<Hs, Ts>> for Visitor<Hs, Ts>
where
    Hs: HandlerList<Ts>,
{
    #[inline]
    fn from(overload: Overload<Hs, Ts>) -> Self {
        Self { overload }
    }
}

impl<Hs, Ts> Clone for Visitor<Hs, Ts>
where
    Hs: Clone,
{
    fn clone(&self) -> Self {
        Self {
            overload: self.overload.clone(),
        }
    }
}

impl<Hs, Ts> core::fmt::Debug for Visitor<Hs, Ts>
where
    Hs: HandlerList<Ts>,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Visitor")
            .field("candidates", &self.candidates())
            .finish()
    }
}

/// A visitor whose handler types have been erased.
///
/// This trait is dyn compatible. Use [`VisitExt::dispatch`] to visit typed
/// values through a `dyn ErasedVisitor`.
pub trait ErasedVisitor {
    /// Invokes the first handler whose parameter type is exactly the type of
    /// `value`, and returns its position.
    fn visit_erased(&mut self, value: RawValueRef<'_>) -> Option<usize>;

    /// Returns the parameter types of the handlers, in handler order.
    fn candidates(&self) -> &[Candidate];
}

impl<Hs, Ts> ErasedVisitor for Overload<Hs, Ts>
where
    Hs: HandlerList<Ts>,
{
    #[inline]
    fn visit_erased(&mut self, value: RawValueRef<'_>) -> Option<usize> {
        self.dispatch_raw(value)
    }

    #[inline]
    fn candidates(&self) -> &[Candidate] {
        Hs::CANDIDATES
    }
}

impl<Hs, Ts> ErasedVisitor for Visitor<Hs, Ts>
where
    Hs: HandlerList<Ts>,
{
    #[inline]
    fn visit_erased(&mut self, value: RawValueRef<'_>) -> Option<usize> {
        self.overload.dispatch_raw(value)
    }

    #[inline]
    fn candidates(&self) -> &[Candidate] {
        Hs::CANDIDATES
    }
}

/// Extension trait for visiting typed values through any [`ErasedVisitor`].
///
/// # Examples
///
/// ```
/// use core::cell::Cell;
///
/// use polyvisit::{BoxedVisitor, VisitExt, Visitor};
///
/// let numbers = Cell::new(0);
/// let texts = Cell::new(0);
/// let mut visitors: Vec<BoxedVisitor<'_>> = vec![
///     Visitor::new((|_: &u8| numbers.set(numbers.get() + 1),)).into_boxed(),
///     Visitor::new((|_: &String| texts.set(texts.get() + 1),)).into_boxed(),
/// ];
///
/// for visitor in &mut visitors {
///     visitor.dispatch(&7u8);
///     visitor.dispatch(&String::from("seven"));
/// }
///
/// assert_eq!((numbers.get(), texts.get()), (1, 1));
/// ```
pub trait VisitExt: ErasedVisitor {
    /// Resolves `value` and invokes the first handler whose parameter type is
    /// exactly its runtime type. Returns the position of that handler.
    #[inline]
    fn dispatch<V>(&mut self, value: &V) -> Option<usize>
    where
        V: Visitable + ?Sized,
    {
        self.visit_erased(value.most_derived())
    }
}

impl<T> VisitExt for T where T: ErasedVisitor + ?Sized {}

/// An owned, type-erased visitor.
#[cfg(feature = "alloc")]
#[cfg_attr(docsrs, doc(cfg(feature = "alloc")))]
pub type BoxedVisitor<'h> = alloc::boxed::Box<dyn ErasedVisitor + 'h>;

#[cfg(test)]
mod tests {
    use core::{
        any::Any,
        cell::{Cell, RefCell},
    };

    use super::*;

    #[test]
    fn test_visit_sized_values() {
        let log = RefCell::new(alloc::vec::Vec::new());
        let record = |value: &i32| log.borrow_mut().push(*value);

        visit(&4i32, (record,));
        visit(&5i32, (record,));
        visit(&6u32, (record,));

        assert_eq!(log.into_inner(), [4, 5]);
    }

    #[test]
    fn test_visit_dyn_any() {
        let hits = Cell::new(0);
        let value: &(dyn Any + 'static) = &'q';

        visit(value, (|_: &u8| {}, |c: &char| hits.set(u32::from(*c))));
        assert_eq!(hits.get(), u32::from('q'));
    }

    #[test]
    fn test_visitor_try_visit_positions() {
        let mut visitor = Visitor::new((|_: &u8| {}, |_: &u16| {}, |_: &u8| {}));

        assert_eq!(visitor.try_visit(&1u8), Some(0));
        assert_eq!(visitor.try_visit(&1u16), Some(1));
        assert_eq!(visitor.try_visit(&1u32), None);
        assert_eq!(visitor.try_visit(&1u32), None);
        assert_eq!(visitor.candidates().len(), 3);
    }

    #[test]
    fn test_visitor_from_overload() {
        let count = Cell::new(0);
        let overload = crate::overload::compose((|_: &bool| count.set(count.get() + 1),));
        let mut visitor = Visitor::from(overload);

        visitor.visit(&true);
        visitor.visit(&false);
        let mut overload = visitor.into_overload();
        assert!(overload.call(&true));

        assert_eq!(count.get(), 3);
    }

    #[test]
    fn test_erased_visitor_matches_typed_visitor() {
        let count = Cell::new(0);
        let mut visitor = Visitor::new((|n: &i64| count.set(count.get() + *n),));
        let erased: &mut dyn ErasedVisitor = &mut visitor;

        assert_eq!(erased.dispatch(&3i64), Some(0));
        assert_eq!(erased.visit_erased(RawValueRef::new(&4i64)), Some(0));
        assert_eq!(erased.dispatch(&5i32), None);
        assert_eq!(erased.candidates().len(), 1);

        assert_eq!(count.get(), 7);
    }

    #[test]
    fn test_overload_is_erased_visitor() {
        let mut overload = crate::overload::compose((|_: &()| {},));
        assert_eq!(overload.dispatch(&()), Some(0));
        assert_eq!(ErasedVisitor::candidates(&overload)[0].type_name(), "()");
    }

    #[test]
    #[cfg(feature = "alloc")]
    fn test_boxed_visitors() {
        let seen = RefCell::new(alloc::vec::Vec::new());
        let mut visitors: alloc::vec::Vec<BoxedVisitor<'_>> = alloc::vec![
            Visitor::new((|n: &u8| seen.borrow_mut().push(u32::from(*n)),)).into_boxed(),
            Visitor::new(()).into_boxed(),
            Visitor::new((|n: &u32| seen.borrow_mut().push(*n),)).into_boxed(),
        ];

        for visitor in &mut visitors {
            visitor.dispatch(&1u8);
            visitor.dispatch(&2u32);
        }
        drop(visitors);

        assert_eq!(seen.into_inner(), [1, 2]);
    }

    #[test]
    fn test_debug() {
        let visitor = Visitor::new((|_: &u8| {},));
        assert_eq!(
            alloc::format!("{visitor:?}"),
            r#"Visitor { candidates: [Candidate("u8")] }"#
        );
    }

    #[test]
    fn test_send_sync() {
        type Plain = Visitor<(fn(&u8),), (u8,)>;
        static_assertions::assert_impl_all!(Plain: Send, Sync, Clone);
        static_assertions::assert_obj_safe!(ErasedVisitor);
    }
}
