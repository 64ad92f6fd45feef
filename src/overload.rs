//! Composition of a handler tuple into a single dispatch target.
//!
//! A tuple of handlers `(h1, h2, ..., hn)` is composed into an [`Overload`],
//! a single value that owns the handlers and knows, for every position, which
//! type the handler at that position accepts. Those types are never written
//! down by the caller; they are inferred from the handlers' signatures (see
//! [`crate::handler`]) and collected into an ordered list of [`Candidate`]s:
//!
//! ```
//! use polyvisit::overload::compose;
//!
//! let overload = compose((|_: &i32| {}, |_: &String| {}, |_: &f64| {}));
//! let names: Vec<_> = overload.candidates().iter().map(|c| c.type_name()).collect();
//! assert_eq!(names, ["i32", "alloc::string::String", "f64"]);
//! ```
//!
//! Handler tuples of up to 16 handlers are supported. The empty tuple `()` is
//! a valid (if useless) handler list that matches nothing.
//!
//! When two handlers accept the same type, the one declared first receives
//! every value of that type and the later one never runs. This is not an
//! error; [`Overload::shadowed`] reports such handlers.

use core::marker::PhantomData;

use polyvisit_internals::{Candidate, RawTarget, RawValueRef};

use crate::handler::Handler;

mod sealed {
    pub trait Sealed<Ts> {}
}

/// An ordered list of handlers, implemented for tuples of [`Handler`]s.
///
/// `Ts` is the tuple of the inferred parameter types, in handler order. This
/// trait is sealed and cannot be implemented outside of this crate.
///
/// The parameter types must be inferable from the handlers alone, so an
/// unannotated closure parameter is rejected:
///
/// ```compile_fail
/// use polyvisit::visit;
///
/// visit(&1u8, (|_value| {},));
/// ```
///
/// A single handler must still be wrapped in a tuple:
///
/// ```compile_fail
/// use polyvisit::visit;
///
/// visit(&1u8, |_: &u8| {});
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a list of handlers",
    label = "expected a tuple of single-parameter handlers",
    note = "handler lists are tuples like `(|a: &A| ..., |b: &B| ...)` with at most 16 handlers",
    note = "a single handler must still be written as a one-element tuple: `(handler,)`"
)]
pub trait HandlerList<Ts>: sealed::Sealed<Ts> {
    /// The parameter types of the handlers, in handler order.
    const CANDIDATES: &'static [Candidate];

    /// Invokes the handler at position `index` with `value`.
    ///
    /// An `index` past the end of the list is ignored.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. If `index < Self::CANDIDATES.len()`, the exact type of `value` is
    ///    the type described by `Self::CANDIDATES[index]`.
    #[doc(hidden)]
    unsafe fn invoke(&mut self, index: usize, value: RawValueRef<'_>);
}

impl sealed::Sealed<()> for () {}

impl HandlerList<()> for () {
    const CANDIDATES: &'static [Candidate] = &[];

    #[inline]
    unsafe fn invoke(&mut self, _index: usize, _value: RawValueRef<'_>) {}
}

macro_rules! impl_handler_list {
    (
        $(($idx:tt, $handler:ident, $param:ident)),+
    ) => {
        impl<$($handler, $param,)+> sealed::Sealed<($($param,)+)> for ($($handler,)+)
        where
            $($handler: Handler<$param>, $param: 'static,)+
        {
        }

        impl<$($handler, $param,)+> HandlerList<($($param,)+)> for ($($handler,)+)
        where
            $($handler: Handler<$param>, $param: 'static,)+
        {
            const CANDIDATES: &'static [Candidate] = &[$(Candidate::new::<$param>(),)+];

            #[inline]
            unsafe fn invoke(&mut self, index: usize, value: RawValueRef<'_>) {
                match index {
                    $(
                        $idx => {
                            // SAFETY:
                            // 1. `CANDIDATES[$idx]` describes `$param`, so the caller
                            //    guarantees that the exact type of `value` is `$param`
                            let value = unsafe { value.downcast_unchecked::<$param>() };
                            self.$idx.call(value);
                        }
                    )+
                    _ => {}
                }
            }
        }
    };
}

impl_handler_list!((0, H0, T0));
impl_handler_list!((0, H0, T0), (1, H1, T1));
impl_handler_list!((0, H0, T0), (1, H1, T1), (2, H2, T2));
impl_handler_list!((0, H0, T0), (1, H1, T1), (2, H2, T2), (3, H3, T3));
impl_handler_list!(
    (0, H0, T0),
    (1, H1, T1),
    (2, H2, T2),
    (3, H3, T3),
    (4, H4, T4)
);
impl_handler_list!(
    (0, H0, T0),
    (1, H1, T1),
    (2, H2, T2),
    (3, H3, T3),
    (4, H4, T4),
    (5, H5, T5)
);
impl_handler_list!(
    (0, H0, T0),
    (1, H1, T1),
    (2, H2, T2),
    (3, H3, T3),
    (4, H4, T4),
    (5, H5, T5),
    (6, H6, T6)
);
impl_handler_list!(
    (0, H0, T0),
    (1, H1, T1),
    (2, H2, T2),
    (3, H3, T3),
    (4, H4, T4),
    (5, H5, T5),
    (6, H6, T6),
    (7, H7, T7)
);
impl_handler_list!(
    (0, H0, T0),
    (1, H1, T1),
    (2, H2, T2),
    (3, H3, T3),
    (4, H4, T4),
    (5, H5, T5),
    (6, H6, T6),
    (7, H7, T7),
    (8, H8, T8)
);
impl_handler_list!(
    (0, H0, T0),
    (1, H1, T1),
    (2, H2, T2),
    (3, H3, T3),
    (4, H4, T4),
    (5, H5, T5),
    (6, H6, T6),
    (7, H7, T7),
    (8, H8, T8),
    (9, H9, T9)
);
impl_handler_list!(
    (0, H0, T0),
    (1, H1, T1),
    (2, H2, T2),
    (3, H3, T3),
    (4, H4, T4),
    (5, H5, T5),
    (6, H6, T6),
    (7, H7, T7),
    (8, H8, T8),
    (9, H9, T9),
    (10, H10, T10)
);
impl_handler_list!(
    (0, H0, T0),
    (1, H1, T1),
    (2, H2, T2),
    (3, H3, T3),
    (4, H4, T4),
    (5, H5, T5),
    (6, H6, T6),
    (7, H7, T7),
    (8, H8, T8),
    (9, H9, T9),
    (10, H10, T10),
    (11, H11, T11)
);
impl_handler_list!(
    (0, H0, T0),
    (1, H1, T1),
    (2, H2, T2),
    (3, H3, T3),
    (4, H4, T4),
    (5, H5, T5),
    (6, H6, T6),
    (7, H7, T7),
    (8, H8, T8),
    (9, H9, T9),
    (10, H10, T10),
    (11, H11, T11),
    (12, H12, T12)
);
impl_handler_list!(
    (0, H0, T0),
    (1, H1, T1),
    (2, H2, T2),
    (3, H3, T3),
    (4, H4, T4),
    (5, H5, T5),
    (6, H6, T6),
    (7, H7, T7),
    (8, H8, T8),
    (9, H9, T9),
    (10, H10, T10),
    (11, H11, T11),
    (12, H12, T12),
    (13, H13, T13)
);
impl_handler_list!(
    (0, H0, T0),
    (1, H1, T1),
    (2, H2, T2),
    (3, H3, T3),
    (4, H4, T4),
    (5, H5, T5),
    (6, H6, T6),
    (7, H7, T7),
    (8, H8, T8),
    (9, H9, T9),
    (10, H10, T10),
    (11, H11, T11),
    (12, H12, T12),
    (13, H13, T13),
    (14, H14, T14)
);
impl_handler_list!(
    (0, H0, T0),
    (1, H1, T1),
    (2, H2, T2),
    (3, H3, T3),
    (4, H4, T4),
    (5, H5, T5),
    (6, H6, T6),
    (7, H7, T7),
    (8, H8, T8),
    (9, H9, T9),
    (10, H10, T10),
    (11, H11, T11),
    (12, H12, T12),
    (13, H13, T13),
    (14, H14, T14),
    (15, H15, T15)
);

/// A handler tuple composed into a single dispatch target.
///
/// Holds nothing but the handlers. `Ts` is the tuple of their parameter
/// types, recorded at the type level only.
pub struct Overload<Hs, Ts> {
    /// The composed handlers
    handlers: Hs,
    /// Marker for the inferred parameter types
    _params: PhantomData<fn(Ts) -> Ts>,
}

/// Composes a tuple of handlers into an [`Overload`].
///
/// # Examples
///
/// ```
/// use core::cell::Cell;
///
/// use polyvisit::overload::compose;
///
/// let last = Cell::new("");
/// let mut overload = compose((|_: &u8| last.set("u8"), |_: &char| last.set("char")));
///
/// assert!(overload.call(&'x'));
/// assert_eq!(last.get(), "char");
/// assert!(!overload.call(&1u16));
/// assert_eq!(last.get(), "char");
/// ```
#[inline]
pub fn compose<Hs, Ts>(handlers: Hs) -> Overload<Hs, Ts>
where
    Hs: HandlerList<Ts>,
{
    Overload::new(handlers)
}

impl<Hs, Ts> Overload<Hs, Ts>
where
    Hs: HandlerList<Ts>,
{
    /// Composes a tuple of handlers. Equivalent to [`compose`].
    #[inline]
    pub fn new(handlers: Hs) -> Self {
        Self {
            handlers,
            _params: PhantomData,
        }
    }

    /// Calls the first handler whose parameter type is exactly `T`.
    ///
    /// Returns `false`, without calling anything, if no handler accepts `T`.
    #[inline]
    pub fn call<T: 'static>(&mut self, value: &T) -> bool {
        self.dispatch_raw(RawValueRef::new(value)).is_some()
    }

    /// Returns the parameter types of the handlers, in handler order.
    #[inline]
    pub fn candidates(&self) -> &'static [Candidate] {
        Hs::CANDIDATES
    }

    /// Returns the number of composed handlers.
    #[inline]
    pub fn len(&self) -> usize {
        Hs::CANDIDATES.len()
    }

    /// Returns `true` if no handlers were composed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        Hs::CANDIDATES.is_empty()
    }

    /// Returns the handler tuple.
    #[inline]
    pub fn into_inner(self) -> Hs {
        self.handlers
    }

    /// Returns the handlers that can never run because an earlier handler
    /// accepts the same type.
    #[cfg(feature = "alloc")]
    #[cfg_attr(docsrs, doc(cfg(feature = "alloc")))]
    pub fn shadowed(&self) -> alloc::vec::Vec<crate::analysis::ShadowedHandler> {
        crate::analysis::shadowed_handlers(Hs::CANDIDATES)
    }

    /// Dispatches an already resolved value to the first matching handler.
    #[inline]
    pub(crate) fn dispatch_raw(&mut self, value: RawValueRef<'_>) -> Option<usize> {
        // SAFETY:
        // 1. `Hs::CANDIDATES[i]` is the parameter type of the handler at
        //    position `i` for every `i`, which is what `Overload` forwards to
        unsafe { polyvisit_internals::dispatch(value, Hs::CANDIDATES, self) }
    }
}

impl<Hs, Ts> RawTarget for Overload<Hs, Ts>
where
    Hs: HandlerList<Ts>,
{
    #[inline]
    unsafe fn invoke(&mut self, index: usize, value: RawValueRef<'_>) {
        // SAFETY:
        // 1. Guaranteed by the caller, since the candidates of an `Overload`
        //    are exactly `Hs::CANDIDATES`
        unsafe { self.handlers.invoke(index, value) }
    }
}

impl<Hs, Ts> Clone for Overload<Hs, Ts>
where
    Hs: Clone,
{
    fn clone(&self) -> Self {
        Self {
            handlers: self.handlers.clone(),
            _params: PhantomData,
        }
    }
}

impl<Hs, Ts> core::fmt::Debug for Overload<Hs, Ts>
where
    Hs: HandlerList<Ts>,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Overload").field(&Hs::CANDIDATES).finish()
    }
}
