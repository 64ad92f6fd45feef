//! Type-erased value references.
//!
//! This module encapsulates the `ptr` and `type_id` fields of
//! [`RawValueRef`], ensuring they are only visible within this module. This
//! visibility restriction guarantees the safety invariant: **`ptr` always
//! points to a live value whose exact type is the one identified by
//! `type_id`**.
//!
//! # Safety Invariant
//!
//! Both fields are set together by the constructors below, and each
//! constructor derives them from one and the same reference:
//!
//! - [`RawValueRef::new`] takes a `&'a T` of a sized type, so the pointer is
//!   the value's own address and the type is `T`.
//! - [`RawValueRef::from_any`] takes a `&'a dyn Any`. The data half of the fat
//!   pointer always addresses the complete object behind the trait object,
//!   and [`Any::type_id`] is answered by that object's vtable, so both refer
//!   to the concrete type rather than to the static type of the reference.
//!
//! There is no way to change either field after creation.

use core::{
    any::{Any, TypeId},
    marker::PhantomData,
    ptr::NonNull,
};

use crate::util::Erased;

/// A lifetime-bound pointer to the complete object behind a borrowed value,
/// paired with the [`TypeId`] of that object's exact type.
///
/// This is the type-erased form in which a value travels through the
/// dispatch core: the address says *where* the complete object is, the
/// [`TypeId`] says *what* it is.
///
/// We cannot use a `&'a dyn Any` directly, because the dispatch core must
/// also accept values whose static type is not `dyn Any` (sized values, or
/// trait objects of other traits), and because comparing against a list of
/// candidate types only needs the [`TypeId`] once.
#[derive(Clone, Copy)]
pub struct RawValueRef<'a> {
    /// Pointer to the complete object
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The pointer was created from a shared reference valid for `'a`.
    /// 2. The pointee is the complete object, i.e. a value whose exact type
    ///    is identified by `type_id`.
    ptr: NonNull<Erased>,

    /// The [`TypeId`] of the exact type of the pointee
    type_id: TypeId,

    /// Marker to tell the compiler that we should
    /// behave the same as a `&'a Erased`
    _marker: PhantomData<&'a Erased>,
}

impl<'a> RawValueRef<'a> {
    /// Creates a [`RawValueRef`] for a value whose static type is its exact
    /// type.
    ///
    /// Since `T` is sized, nothing can be hidden behind the reference: the
    /// address is the value's own address and the type is `T`.
    #[inline]
    pub fn new<T: 'static>(value: &'a T) -> Self {
        Self {
            ptr: NonNull::from(value).cast::<Erased>(),
            type_id: TypeId::of::<T>(),
            _marker: PhantomData,
        }
    }

    /// Creates a [`RawValueRef`] for the complete object behind a
    /// `dyn Any` trait object.
    ///
    /// The address is the data pointer of the trait object and the
    /// [`TypeId`] is looked up through its vtable, so both describe the
    /// concrete type of the object rather than `dyn Any`.
    #[inline]
    pub fn from_any(value: &'a (dyn Any + 'static)) -> Self {
        Self {
            ptr: NonNull::from(value).cast::<Erased>(),
            type_id: Any::type_id(value),
            _marker: PhantomData,
        }
    }

    /// Returns the [`TypeId`] of the exact type of the referenced value.
    #[inline]
    pub fn type_id(self) -> TypeId {
        self.type_id
    }

    /// Returns the address of the complete object.
    ///
    /// Two [`RawValueRef`]s referring to the same object always return the
    /// same address, no matter how the references were obtained.
    #[inline]
    pub fn addr(self) -> *const () {
        self.ptr.as_ptr().cast_const().cast::<()>()
    }

    /// Returns `true` if the exact type of the referenced value is `T`.
    #[inline]
    pub fn is<T: 'static>(self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Returns the referenced value as a `&T` if its exact type is `T`.
    #[inline]
    pub fn downcast<T: 'static>(self) -> Option<&'a T> {
        if self.is::<T>() {
            // SAFETY:
            // 1. We just checked that the exact type of the value is `T`
            let value = unsafe { self.downcast_unchecked::<T>() };
            Some(value)
        } else {
            None
        }
    }

    /// Returns the referenced value as a `&T` without checking its type.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The exact type of the referenced value is `T`, i.e.
    ///    `self.type_id() == TypeId::of::<T>()`.
    #[inline]
    pub unsafe fn downcast_unchecked<T: 'static>(self) -> &'a T {
        // Debug assertion to catch type mismatches in case of bugs
        debug_assert_eq!(self.type_id, TypeId::of::<T>());

        let ptr: NonNull<T> = self.ptr.cast::<T>();
        // SAFETY: Converting the NonNull pointer to a reference is sound because:
        // - The pointer is non-null, properly aligned for the exact type of the
        //   value, and dereferenceable, since it was created from a reference
        //   (guaranteed by RawValueRef's type invariants)
        // - The exact type of the value is `T` (guaranteed by the caller)
        // - Only shared access was ever granted, and we only hand out shared access
        // - The reference lifetime 'a is valid (tied to RawValueRef<'a>'s lifetime)
        unsafe { ptr.as_ref() }
    }
}

impl core::fmt::Debug for RawValueRef<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RawValueRef")
            .field("addr", &self.addr())
            .field("type_id", &self.type_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[repr(C)]
    struct Outer {
        tag: u64,
        inner: Point,
    }

    #[test]
    fn test_raw_value_ref_size() {
        assert!(
            core::mem::size_of::<RawValueRef<'_>>()
                >= core::mem::size_of::<usize>() + core::mem::size_of::<TypeId>()
        );
        assert_eq!(
            core::mem::size_of::<Option<RawValueRef<'_>>>(),
            core::mem::size_of::<RawValueRef<'_>>()
        );
    }

    #[test]
    fn test_sized_value_keeps_own_address() {
        let point = Point { x: 1, y: 2 };
        let raw = RawValueRef::new(&point);

        assert_eq!(raw.addr(), core::ptr::from_ref(&point).cast::<()>());
        assert_eq!(raw.type_id(), TypeId::of::<Point>());
        assert!(raw.is::<Point>());
        assert!(!raw.is::<i32>());
    }

    #[test]
    fn test_any_resolves_to_complete_object() {
        let outer = Outer {
            tag: 7,
            inner: Point { x: 3, y: 4 },
        };

        let raw = RawValueRef::from_any(&outer);
        assert_eq!(raw.type_id(), TypeId::of::<Outer>());
        assert_eq!(raw.addr(), core::ptr::from_ref(&outer).cast::<()>());

        let inner = RawValueRef::from_any(&outer.inner);
        assert_eq!(inner.type_id(), TypeId::of::<Point>());
        assert_ne!(inner.addr(), raw.addr());
        assert_eq!(inner.downcast::<Point>(), Some(&Point { x: 3, y: 4 }));
    }

    #[test]
    fn test_downcast() {
        let value = 42u16;
        let raw = RawValueRef::new(&value);

        assert_eq!(raw.downcast::<u16>(), Some(&42));
        assert_eq!(raw.downcast::<u32>(), None);
        assert_eq!(raw.downcast::<i16>(), None);

        let outer = Outer {
            tag: 11,
            inner: Point { x: 0, y: 0 },
        };
        let raw = RawValueRef::from_any(&outer);
        let back = raw.downcast::<Outer>().map(|outer| outer.tag);
        assert_eq!(back, Some(11));
    }

    #[test]
    fn test_zero_sized_values() {
        let unit = ();
        let raw = RawValueRef::new(&unit);
        assert!(raw.is::<()>());
        assert_eq!(raw.downcast::<()>(), Some(&()));
    }

    #[test]
    fn test_reference_types_are_distinct() {
        let text: &'static str = "x";
        let raw = RawValueRef::new(&text);
        assert!(raw.is::<&'static str>());
        assert_eq!(raw.downcast::<&'static str>(), Some(&"x"));
    }

    #[test]
    fn test_send_sync() {
        static_assertions::assert_not_impl_any!(RawValueRef<'_>: Send, Sync);
        static_assertions::assert_impl_all!(RawValueRef<'_>: Copy, Clone, Unpin);
    }
}
