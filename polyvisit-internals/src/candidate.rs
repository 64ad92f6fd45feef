//! Compile-time descriptors of handler parameter types.
//!
//! A [`Candidate`] describes one type that a handler list is prepared to
//! receive. Candidate lists are built in `const` context from the inferred
//! parameter types of the handlers, in handler order, and are what the
//! dispatch core scans.
//!
//! [`TypeId::of`] is not yet usable in `const` context, so a [`Candidate`]
//! stores function pointers instead of the values themselves.

use core::any::TypeId;

/// Descriptor of a single candidate type.
///
/// Two candidates describe the same type iff their [`type_id`] values are
/// equal. The [`type_name`] is for diagnostics only and must not be used to
/// compare types.
///
/// [`type_id`]: Candidate::type_id
/// [`type_name`]: Candidate::type_name
#[derive(Clone, Copy)]
pub struct Candidate {
    /// Gets the [`TypeId`] of the type this candidate was created for.
    type_id: fn() -> TypeId,
    /// Gets the [`core::any::type_name`] of the type this candidate was
    /// created for.
    type_name: fn() -> &'static str,
}

impl Candidate {
    /// Creates a [`Candidate`] describing the type `T`.
    #[inline]
    pub const fn new<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>,
            type_name: core::any::type_name::<T>,
        }
    }

    /// Returns a `'static` [`Candidate`] describing the type `T`.
    #[inline]
    pub const fn of<T: 'static>() -> &'static Self {
        const { &Self::new::<T>() }
    }

    /// Gets the [`TypeId`] of the type this candidate describes.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    /// Gets the [`core::any::type_name`] of the type this candidate
    /// describes.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Returns `true` if this candidate describes exactly the type identified
    /// by `type_id`.
    #[inline]
    pub fn matches(&self, type_id: TypeId) -> bool {
        self.type_id() == type_id
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.type_id() == other.type_id()
    }
}

impl Eq for Candidate {}

impl core::fmt::Display for Candidate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.type_name())
    }
}

impl core::fmt::Debug for Candidate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Candidate").field(&self.type_name()).finish()
    }
}
