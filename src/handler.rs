//! Handlers and the inference of their parameter types.
//!
//! A handler is one case of an exact-type match: a callable taking exactly one
//! parameter. The type of that parameter is what the handler matches on, and
//! it is never spelled out separately. It is recovered from the handler's own
//! signature through trait resolution:
//!
//! ```
//! use polyvisit::handler::{Handler, parameter_of};
//!
//! let on_text = |text: &String| assert!(!text.is_empty());
//! assert_eq!(parameter_of(&on_text).type_name(), core::any::type_name::<String>());
//!
//! fn on_number(value: &u64) {
//!     assert!(*value > 0);
//! }
//! assert_eq!(parameter_of(&on_number).type_name(), "u64");
//! ```
//!
//! # Accepted handler shapes
//!
//! - Closures and functions taking `&T`: `|value: &T| ...`, `fn f(value: &T)`.
//!   Both [`Fn`] and [`FnMut`] closures are accepted, so handlers may mutate
//!   their captured state.
//! - Closures and functions taking `T` by value, wrapped with [`by_value`].
//!   The matched value is cloned into the call, so `T` must be [`Clone`].
//!
//! Closure parameters must be annotated (`|value: &T|`, not `|value|`),
//! because nothing else determines what the closure matches on. Handlers with
//! no parameter, with more than one, or with an unannotated parameter are
//! rejected at compile time.

use polyvisit_internals::Candidate;

/// A single case of an exact-type match, accepting values of type `T`.
///
/// This trait is implemented for every [`FnMut(&T)`](FnMut) and for
/// [`ByValue`] wrappers. You rarely implement it by hand, but doing so is the
/// way to turn a named type with state into a handler.
///
/// # Examples
///
/// ```
/// use polyvisit::{handler::Handler, visit};
///
/// struct Sum<'a>(&'a mut u64);
///
/// impl Handler<u64> for Sum<'_> {
///     fn call(&mut self, value: &u64) {
///         *self.0 += value;
///     }
/// }
///
/// let mut total = 0;
/// visit(&5u64, (Sum(&mut total),));
/// visit(&7u64, (Sum(&mut total),));
/// assert_eq!(total, 12);
/// ```
///
/// Closures without a parameter are not handlers:
///
/// ```compile_fail
/// use polyvisit::visit;
///
/// visit(&1u8, (|| {},));
/// ```
///
/// Neither are closures with more than one parameter:
///
/// ```compile_fail
/// use polyvisit::visit;
///
/// visit(&1u8, (|_a: &u8, _b: &u8| {},));
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a handler for values of type `{T}`",
    label = "not a single-parameter handler",
    note = "handlers take exactly one parameter by reference, e.g. `|value: &MyType| ...`",
    note = "closure parameters must be annotated so that the matched type can be inferred",
    note = "to take the parameter by value, wrap the handler with `polyvisit::handler::by_value`"
)]
pub trait Handler<T> {
    /// Invokes the handler with a value whose exact type is `T`.
    fn call(&mut self, value: &T);
}

impl<F, T> Handler<T> for F
where
    F: FnMut(&T),
{
    #[inline]
    fn call(&mut self, value: &T) {
        (self)(value)
    }
}

/// A handler taking its parameter by value.
///
/// Created by [`by_value`]. On a match the value is cloned and the clone is
/// passed to the wrapped callable.
#[derive(Clone, Copy)]
pub struct ByValue<F> {
    /// The wrapped callable
    inner: F,
}

impl<F> ByValue<F> {
    /// Returns the wrapped callable.
    #[inline]
    pub fn into_inner(self) -> F {
        self.inner
    }
}

impl<F> core::fmt::Debug for ByValue<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("ByValue")
            .field(&core::any::type_name::<F>())
            .finish()
    }
}

/// Adapts a callable that takes its parameter by value into a [`Handler`].
///
/// # Examples
///
/// ```
/// use polyvisit::{handler::by_value, visit};
///
/// let mut seen = Vec::new();
/// visit(&String::from("owned"), (by_value(|text: String| seen.push(text)),));
/// assert_eq!(seen, ["owned"]);
/// ```
#[inline]
pub fn by_value<F>(handler: F) -> ByValue<F> {
    ByValue { inner: handler }
}

impl<F, T> Handler<T> for ByValue<F>
where
    F: FnMut(T),
    T: Clone,
{
    #[inline]
    fn call(&mut self, value: &T) {
        (self.inner)(value.clone())
    }
}

/// Returns the [`Candidate`] describing the parameter type inferred for
/// `handler`.
///
/// This is the same descriptor the handler contributes to the candidate list
/// of a composed handler tuple.
#[inline]
pub fn parameter_of<H, T>(handler: &H) -> &'static Candidate
where
    H: Handler<T>,
    T: 'static,
{
    let _ = handler;
    Candidate::of::<T>()
}
