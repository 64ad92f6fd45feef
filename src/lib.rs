#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::as_ptr_cast_mut,
    clippy::ptr_as_ptr,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Extra checks on nightly
#![cfg_attr(nightly_extra_checks, feature(rustdoc_missing_doc_code_examples))]
#![cfg_attr(nightly_extra_checks, forbid(rustdoc::missing_doc_code_examples))]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Exact-type pattern matching over open hierarchies of Rust values.
//!
//! ## Overview
//!
//! Matching over an `enum` is easy: the set of variants is closed and every
//! value carries its tag. Values of an *open* hierarchy have no such tag. A
//! `&dyn Any`, a `&dyn Shape` or a plain generic `&T` may be any of an
//! unbounded set of concrete types, none of which are known to the code doing
//! the matching.
//!
//! This crate lets you match such values against a list of strongly typed
//! handlers anyway. You pass a value and a tuple of single-parameter
//! closures; the closure whose parameter type is *exactly* the runtime type of
//! the value is called with a reference to it. If no closure matches, nothing
//! happens.
//!
//! ## Quick Example
//!
//! ```
//! use core::{any::Any, cell::RefCell};
//!
//! use polyvisit::visit;
//!
//! let log = RefCell::new(Vec::new());
//! let values: Vec<Box<dyn Any>> = vec![Box::new(42i32), Box::new(String::from("x")), Box::new(1.5f32)];
//!
//! for value in &values {
//!     visit!(
//!         &**value,
//!         |n: &i32| log.borrow_mut().push(format!("int {n}")),
//!         |s: &String| log.borrow_mut().push(format!("string {s}")),
//!     );
//! }
//!
//! // The `f32` had no handler and was skipped
//! assert_eq!(log.into_inner(), ["int 42", "string x"]);
//! ```
//!
//! ## Core Concepts
//!
//! - **Handlers** are callables taking exactly one parameter by reference,
//!   such as `|value: &T| ...` or `fn f(value: &T)`. The parameter type is
//!   what the handler matches, and it is inferred from the signature. See
//!   [`handler`].
//! - **Handler lists** are tuples of handlers, composed into a single
//!   [`Overload`]. Handlers are tried in order and the first handler
//!   accepting the type wins. See [`overload`].
//! - **Visitable values** are values whose runtime type can be determined:
//!   any sized `'static` type, `dyn Any`, and trait objects of your own
//!   traits made visitable with [`visitable_dyn!`]. See [`visitable`].
//! - **Visitors** keep a handler list around to visit many values
//!   ([`Visitor`]), possibly with the handler types erased
//!   ([`ErasedVisitor`], `BoxedVisitor`) or with handlers registered at run
//!   time (`DynVisitor`).
//!
//! ## Exact Matching
//!
//! Matching is by type identity only. A handler for `Base` never fires for a
//! `Derived` that embeds a `Base`, a handler for `Box<T>` never fires for a
//! `T`, and a handler for `String` never fires for a `&str`. Trait objects are
//! always resolved to the complete object behind them, and the handler
//! receives a reference to exactly that object.
//!
//! ## Features
//!
//! - `alloc` (default): enables [`dynamic`], [`analysis`] and
//!   `BoxedVisitor`. Everything else works without allocation.
//!
//! For implementation details, see the [`polyvisit-internals`] crate.
//!
//! [`polyvisit-internals`]: polyvisit_internals

#[cfg(any(feature = "alloc", test))]
extern crate alloc;

#[macro_use]
mod macros;

#[cfg(feature = "alloc")]
#[cfg_attr(docsrs, doc(cfg(feature = "alloc")))]
pub mod analysis;
#[cfg(feature = "alloc")]
#[cfg_attr(docsrs, doc(cfg(feature = "alloc")))]
pub mod dynamic;
pub mod handler;
pub mod overload;
pub mod prelude;
pub mod visitable;
pub mod visitor;

pub use polyvisit_internals::{Candidate, RawValueRef};

#[cfg(feature = "alloc")]
pub use self::visitor::BoxedVisitor;
pub use self::{
    overload::Overload,
    visitable::Visitable,
    visitor::{ErasedVisitor, VisitExt, Visitor, visit},
};

#[doc(hidden)]
pub mod __private {
    //! Items used by the macros of this crate. Not public API.

    pub use core::any::Any;
}
