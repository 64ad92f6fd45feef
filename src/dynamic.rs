//! Visitors whose handlers are registered at run time.
//!
//! A [`DynVisitor`] follows the same rules as [`visit`](fn@crate::visit): exact
//! type matching, first registered handler wins, silence on no match. The
//! difference is that the handler set does not have to be known at compile
//! time, so plugins or configuration code can add handlers one by one.
//!
//! ```
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! use polyvisit::dynamic::DynVisitor;
//!
//! static TEXTS: AtomicUsize = AtomicUsize::new(0);
//!
//! let mut visitor = DynVisitor::new();
//! for plugin_enabled in [true, false] {
//!     if plugin_enabled {
//!         visitor.push(|text: &String| {
//!             TEXTS.fetch_add(text.len(), Ordering::Relaxed);
//!         });
//!     }
//! }
//!
//! visitor.visit(&String::from("four"));
//! visitor.visit(&4u8);
//! assert_eq!(visitor.len(), 1);
//! assert_eq!(TEXTS.load(Ordering::Relaxed), 4);
//! ```
//!
//! Handlers are shared between clones of a visitor, which makes cloning
//! cheap. Every registration remembers where it happened, which is what the
//! [`Debug`](core::fmt::Debug) output and [`DynVisitor::registrations`] show.

use alloc::vec::Vec;
use core::{fmt, marker::PhantomData, panic::Location};

use polyvisit_internals::{Candidate, RawTarget, RawValueRef};
use triomphe::Arc;
use unsize::CoerceUnsize;

use crate::{analysis::ShadowedHandler, visitable::Visitable, visitor::ErasedVisitor};

/// A handler together with the type it accepts and where it was registered.
struct TypedHandler<T, H>
where
    T: 'static,
{
    handler: H,
    added_at: &'static Location<'static>,
    _param: PhantomData<fn(T) -> T>,
}

impl<T, H> fmt::Display for TypedHandler<T, H>
where
    T: 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "handler `{}` for `{}` registered at {}:{}",
            core::any::type_name::<H>(),
            core::any::type_name::<T>(),
            self.added_at.file(),
            self.added_at.line()
        )
    }
}

/// Trait for untyped handlers.
///
/// This trait is guaranteed to only be implemented for [`TypedHandler<T, H>`].
trait UntypedHandler: 'static + Send + Sync + fmt::Display {
    /// Calls the handler.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The exact type of `value` is the `T` from the type
    ///    `TypedHandler<T, H>` this is implemented for.
    unsafe fn call(&self, value: RawValueRef<'_>);
}

impl<T, H> UntypedHandler for TypedHandler<T, H>
where
    T: 'static,
    H: Fn(&T) + Send + Sync + 'static,
{
    unsafe fn call(&self, value: RawValueRef<'_>) {
        // SAFETY:
        // 1. Guaranteed by the caller
        let value = unsafe { value.downcast_unchecked::<T>() };
        (self.handler)(value)
    }
}

/// A visitor built from handlers registered at run time.
///
/// Handlers are `Fn(&T) + Send + Sync + 'static` closures or functions.
/// `DynVisitor` is [`Send`], [`Sync`] and [`Clone`]; clones share the
/// registered handlers.
#[derive(Clone, Default)]
pub struct DynVisitor {
    /// The parameter types of the handlers, in registration order
    candidates: Vec<Candidate>,
    /// The handlers, in registration order
    ///
    /// # Safety invariant
    ///
    /// `handlers[i]` is an instance of `TypedHandler<T, H>` where
    /// `candidates[i]` describes `T`. Both vectors always have the same
    /// length.
    handlers: Vec<Arc<dyn UntypedHandler>>,
}

impl DynVisitor {
    /// Creates a visitor without any handlers.
    #[inline]
    pub const fn new() -> Self {
        Self {
            candidates: Vec::new(),
            handlers: Vec::new(),
        }
    }

    /// Registers a handler for values of type `T` and returns the visitor.
    ///
    /// # Examples
    ///
    /// ```
    /// use polyvisit::dynamic::DynVisitor;
    ///
    /// let visitor = DynVisitor::new()
    ///     .on(|n: &u32| assert_eq!(*n, 3))
    ///     .on::<char, _>(|c| assert_eq!(*c, 'c'));
    ///
    /// assert_eq!(visitor.try_visit(&3u32), Some(0));
    /// assert_eq!(visitor.try_visit(&'c'), Some(1));
    /// assert_eq!(visitor.try_visit(&3u64), None);
    /// ```
    #[track_caller]
    #[must_use]
    pub fn on<T, H>(mut self, handler: H) -> Self
    where
        T: 'static,
        H: Fn(&T) + Send + Sync + 'static,
    {
        self.push(handler);
        self
    }

    /// Registers a handler for values of type `T`.
    ///
    /// If a handler for `T` is already registered, the new handler never
    /// runs. See [`DynVisitor::shadowed`].
    #[track_caller]
    pub fn push<T, H>(&mut self, handler: H)
    where
        T: 'static,
        H: Fn(&T) + Send + Sync + 'static,
    {
        let handler: Arc<TypedHandler<T, H>> = Arc::new(TypedHandler {
            handler,
            added_at: Location::caller(),
            _param: PhantomData,
        });
        let handler = handler.unsize(unsize::Coercion!(to dyn UntypedHandler));
        // We must uphold the safety invariant of DynVisitor.
        //
        // The handler is a `TypedHandler<T, H>` and is pushed at the same
        // position as the candidate describing `T`.
        self.candidates.push(Candidate::new::<T>());
        self.handlers.push(handler);
    }

    /// Invokes the first handler registered for exactly the runtime type of
    /// `value`. Does nothing if there is none.
    #[inline]
    pub fn visit<V>(&self, value: &V)
    where
        V: Visitable + ?Sized,
    {
        self.dispatch_raw(value.most_derived());
    }

    /// Like [`DynVisitor::visit`], but returns the position of the handler
    /// that was invoked.
    #[inline]
    pub fn try_visit<V>(&self, value: &V) -> Option<usize>
    where
        V: Visitable + ?Sized,
    {
        self.dispatch_raw(value.most_derived())
    }

    /// Returns the parameter types of the handlers, in registration order.
    #[inline]
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Returns the number of registered handlers.
    #[inline]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if no handlers are registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Returns a description of every registration, in registration order.
    ///
    /// # Examples
    ///
    /// ```
    /// use polyvisit::dynamic::DynVisitor;
    ///
    /// let visitor = DynVisitor::new().on(|_: &u8| {});
    /// let description = visitor.registrations().next().unwrap().to_string();
    /// assert!(description.contains("for `u8` registered at"));
    /// ```
    pub fn registrations(&self) -> impl ExactSizeIterator<Item = &dyn fmt::Display> {
        self.handlers
            .iter()
            .map(|handler| handler.as_ref() as &dyn fmt::Display)
    }

    /// Returns the handlers that can never run because an earlier handler
    /// accepts the same type.
    pub fn shadowed(&self) -> Vec<ShadowedHandler> {
        crate::analysis::shadowed_handlers(&self.candidates)
    }

    /// Dispatches an already resolved value.
    fn dispatch_raw(&self, value: RawValueRef<'_>) -> Option<usize> {
        let mut target = SharedHandlers(&self.handlers);
        // SAFETY:
        // 1. `self.candidates[i]` describes the parameter type of
        //    `self.handlers[i]` for every `i` (guaranteed by the safety
        //    invariant of DynVisitor), and `SharedHandlers` invokes exactly
        //    `self.handlers[i]` for position `i`
        unsafe { polyvisit_internals::dispatch(value, &self.candidates, &mut target) }
    }
}

/// Dispatch target over the handlers of a [`DynVisitor`].
struct SharedHandlers<'a>(&'a [Arc<dyn UntypedHandler>]);

impl RawTarget for SharedHandlers<'_> {
    unsafe fn invoke(&mut self, index: usize, value: RawValueRef<'_>) {
        if let Some(handler) = self.0.get(index) {
            // SAFETY:
            // 1. The caller guarantees that the exact type of `value` is the
            //    parameter type of the handler at `index`
            unsafe { handler.call(value) }
        }
    }
}

impl ErasedVisitor for DynVisitor {
    #[inline]
    fn visit_erased(&mut self, value: RawValueRef<'_>) -> Option<usize> {
        self.dispatch_raw(value)
    }

    #[inline]
    fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }
}

impl fmt::Debug for DynVisitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for handler in &self.handlers {
            list.entry(&format_args!("{}", &**handler));
        }
        list.finish()
    }
}
