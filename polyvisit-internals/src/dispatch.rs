//! The dispatch core.
//!
//! Dispatching a value means walking an ordered list of [`Candidate`]s,
//! comparing each against the exact [`TypeId`] of the value, and invoking the
//! handler at the first matching position. This is a single linear scan that
//! terminates on the first match or on exhaustion:
//!
//! ```text
//! candidates:  [ i32 ]──[ String ]──[ Circle ]──[ String ]
//!                  ✗          ✓
//!                             └── target.invoke(1, value); stop
//! ```
//!
//! Exhaustion is not an error. No handler is invoked and nothing is reported
//! beyond the `None` return value.
//!
//! Comparison is by type identity only. A candidate for a type that merely
//! *contains* or *wraps* the value's type never matches, and when a type
//! appears more than once in the list the first occurrence wins.

use core::any::TypeId;

use crate::{candidate::Candidate, value::RawValueRef};

/// A composed dispatch target: a set of handlers addressed by position.
///
/// The handler at position `i` accepts exactly one type. Which type that is
/// is not known to this trait; it is recorded by the candidate list the
/// target is dispatched with (see [`dispatch`]).
pub trait RawTarget {
    /// Invokes the handler at position `index` with `value`.
    ///
    /// Implementations reinterpret `value` as the parameter type of the
    /// handler at `index`. An `index` with no handler is ignored.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. If there is a handler at position `index`, the exact type of
    ///    `value` is that handler's parameter type.
    unsafe fn invoke(&mut self, index: usize, value: RawValueRef<'_>);
}

impl<T> RawTarget for &mut T
where
    T: RawTarget + ?Sized,
{
    #[inline]
    unsafe fn invoke(&mut self, index: usize, value: RawValueRef<'_>) {
        // SAFETY:
        // 1. Guaranteed by the caller
        unsafe { (**self).invoke(index, value) }
    }
}

/// Returns the position of the first candidate describing exactly the type
/// identified by `type_id`.
///
/// This is a linear scan in list order; the first occurrence wins when a
/// type is listed more than once.
#[inline]
pub fn find_candidate(type_id: TypeId, candidates: &[Candidate]) -> Option<usize> {
    candidates
        .iter()
        .position(|candidate| candidate.matches(type_id))
}

/// Dispatches `value` to the first handler of `target` whose parameter type is
/// the exact type of `value`.
///
/// Returns the position of the handler that was invoked, or `None` if no
/// candidate matched, in which case nothing was invoked.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. For every position `i` in `candidates`, `candidates[i]` describes the
///    parameter type of the handler of `target` at position `i`.
#[inline]
pub unsafe fn dispatch<T>(
    value: RawValueRef<'_>,
    candidates: &[Candidate],
    target: &mut T,
) -> Option<usize>
where
    T: RawTarget + ?Sized,
{
    let index = find_candidate(value.type_id(), candidates)?;

    // SAFETY:
    // 1. `find_candidate` returned `index`, so `candidates[index]` describes
    //    the exact type of `value`. The caller guarantees that
    //    `candidates[index]` also describes the parameter type of the handler
    //    at `index`, so the two types are the same.
    unsafe { target.invoke(index, value) };

    Some(index)
}
