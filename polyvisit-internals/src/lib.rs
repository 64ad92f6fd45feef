#![no_std]
#![forbid(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::missing_docs_in_private_items,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
#![allow(rustdoc::private_intra_doc_links)]
//! Internal implementation crate for [`polyvisit`].
//!
//! # Overview
//!
//! This crate contains the low-level, type-erased pieces that power the
//! [`polyvisit`] exact-type dispatch library: a borrowed reference whose
//! concrete type has been erased, compile-time descriptors of the types a
//! handler list accepts, and the linear-scan dispatch core that connects the
//! two.
//!
//! **This crate is an implementation detail.** No semantic versioning
//! guarantees are provided. Users should depend on the [`polyvisit`] crate,
//! not this one.
//!
//! # Architecture
//!
//! - **[`value`]**: Type-erased value references
//!   - [`RawValueRef`]: A thin pointer to the complete object backing a
//!     borrowed value, paired with the [`TypeId`] of that object
//!
//! - **[`candidate`]**: Handler parameter descriptors
//!   - [`Candidate`]: Function pointers describing one parameter type,
//!     constructible in `const` context
//!
//! - **[`dispatch`]**: The dispatch core
//!   - [`find_candidate`]: Linear scan for the first exact [`TypeId`] match
//!   - [`dispatch()`]: Scan, then invoke the matching handler of a
//!     [`RawTarget`]
//!
//! # Safety Strategy
//!
//! Erasing the type of a reference is only sound if the erased pointer is
//! never reinterpreted as anything other than its actual type. This crate
//! maintains that through:
//!
//! - **Module-based encapsulation**: The pointer and [`TypeId`] fields of
//!   [`RawValueRef`] are private to their module. Every constructor derives
//!   both from the same reference, so they cannot disagree.
//! - **Single reinterpretation point**: The only way back to a typed
//!   reference is [`RawValueRef::downcast`] (checked) or
//!   [`RawValueRef::downcast_unchecked`] (caller-checked, with a debug
//!   assertion).
//! - **Documented dispatch contracts**: [`dispatch()`] and
//!   [`RawTarget::invoke`] spell out exactly which pairing of candidate list
//!   and target makes the reinterpretation sound.
//!
//! [`polyvisit`]: https://docs.rs/polyvisit/latest/polyvisit/
//! [`TypeId`]: core::any::TypeId
//! [`find_candidate`]: dispatch::find_candidate
//! [`dispatch()`]: dispatch::dispatch
//! [`RawTarget`]: dispatch::RawTarget
//! [`RawTarget::invoke`]: dispatch::RawTarget::invoke

pub mod candidate;
pub mod dispatch;
mod util;
pub mod value;

pub use self::{
    candidate::Candidate,
    dispatch::{RawTarget, dispatch, find_candidate},
    value::RawValueRef,
};
