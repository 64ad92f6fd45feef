//! Static analysis of candidate lists.
//!
//! Because the first handler accepting a type wins, a later handler for the
//! same type is dead code. These functions find such handlers. They work on
//! any candidate list, so the same analysis applies to composed handler
//! tuples, [`Visitor`](crate::Visitor)s and
//! [`DynVisitor`](crate::dynamic::DynVisitor)s.
//!
//! ```
//! use polyvisit::overload::compose;
//!
//! let overload = compose((|_: &u8| {}, |_: &char| {}, |_: &u8| {}));
//! let shadowed = overload.shadowed();
//!
//! assert_eq!(shadowed.len(), 1);
//! assert_eq!(
//!     shadowed[0].to_string(),
//!     "handler 2 for `u8` is shadowed by handler 0"
//! );
//! ```

use alloc::vec::Vec;
use core::{any::TypeId, fmt};

use hashbrown::HashMap;
use polyvisit_internals::Candidate;

/// A handler that can never run, because an earlier handler accepts the same
/// type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShadowedHandler {
    /// Position of the handler that never runs
    pub index: usize,
    /// Position of the earlier handler that receives its values instead
    pub winner: usize,
    /// The parameter type both handlers accept
    pub parameter: Candidate,
}

impl fmt::Display for ShadowedHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "handler {} for `{}` is shadowed by handler {}",
            self.index, self.parameter, self.winner
        )
    }
}

/// Maps every parameter type to the position of its first handler.
fn first_positions(candidates: &[Candidate]) -> HashMap<TypeId, usize, rustc_hash::FxBuildHasher> {
    let mut first = HashMap::with_capacity_and_hasher(candidates.len(), rustc_hash::FxBuildHasher);
    for (index, candidate) in candidates.iter().enumerate() {
        first.entry(candidate.type_id()).or_insert(index);
    }
    first
}

/// Returns every handler whose parameter type already appears earlier in
/// `candidates`, in list order.
pub fn shadowed_handlers(candidates: &[Candidate]) -> Vec<ShadowedHandler> {
    let first = first_positions(candidates);
    candidates
        .iter()
        .enumerate()
        .filter_map(|(index, candidate)| {
            let winner = *first.get(&candidate.type_id())?;
            (winner != index).then_some(ShadowedHandler {
                index,
                winner,
                parameter: *candidate,
            })
        })
        .collect()
}

/// Returns one candidate per distinct parameter type, in order of first
/// appearance.
///
/// These are exactly the types a composed handler list responds to.
pub fn distinct_parameters(candidates: &[Candidate]) -> Vec<Candidate> {
    let first = first_positions(candidates);
    candidates
        .iter()
        .enumerate()
        .filter(|(index, candidate)| first.get(&candidate.type_id()) == Some(index))
        .map(|(_, candidate)| *candidate)
        .collect()
}
