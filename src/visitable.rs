//! Resolution of a borrowed value to its most-derived form.
//!
//! Every value handed to [`visit`](fn@crate::visit) is first resolved to a
//! [`RawValueRef`]: the address of the complete object together with the
//! [`TypeId`](core::any::TypeId) of its exact type. How that happens depends
//! on the static type of the reference:
//!
//! | Static type | Address | Type |
//! |---|---|---|
//! | sized `T` | the value's own address | `T`, known at compile time |
//! | `dyn Any` (+ `Send`, `Sync`) | data half of the fat pointer | looked up through the vtable |
//! | `dyn Trait` with `trait Trait: Any` | data half of the fat pointer | looked up through the vtable |
//!
//! Trait objects of your own traits become visitable with
//! [`visitable_dyn!`](crate::visitable_dyn). The trait must have [`Any`] as a
//! supertrait so the object can be upcast:
//!
//! ```
//! use core::{any::Any, cell::Cell};
//!
//! use polyvisit::{visit, visitable_dyn};
//!
//! trait Animal: Any {}
//! visitable_dyn!(dyn Animal);
//!
//! struct Cat;
//! struct Dog;
//! impl Animal for Cat {}
//! impl Animal for Dog {}
//!
//! let animal: Box<dyn Animal> = Box::new(Dog);
//! let heard = Cell::new("");
//! visit(
//!     &*animal,
//!     (|_: &Cat| heard.set("meow"), |_: &Dog| heard.set("woof")),
//! );
//! assert_eq!(heard.get(), "woof");
//! ```
//!
//! Unsized values that are not trait objects (`str`, `[T]`) cannot be
//! resolved, because their identity depends on a length that a thin address
//! does not carry. Visit a `&&str`, a `String` or a `Vec<T>` instead.

use core::any::Any;

use polyvisit_internals::RawValueRef;

/// A value that can be resolved to its most-derived form.
///
/// # Safety
///
/// Implementors must ensure that [`Visitable::most_derived`] returns a
/// [`RawValueRef`] whose type is the exact type of the object at its address.
/// This holds automatically when the result comes from
/// [`RawValueRef::new`] on a sized value or [`RawValueRef::from_any`] on the
/// same object, which is all the implementations in this crate and the ones
/// generated by [`visitable_dyn!`](crate::visitable_dyn) ever do.
///
/// # Unvisitable values
///
/// `str` and slices have no implementation:
///
/// ```compile_fail
/// use polyvisit::visit;
///
/// visit("text", (|_: &u8| {},));
/// ```
///
/// Visiting a reference to them works:
///
/// ```
/// use core::cell::Cell;
///
/// use polyvisit::visit;
///
/// let seen = Cell::new(false);
/// visit(&"text", (|_: &&str| seen.set(true),));
/// assert!(seen.get());
/// ```
#[diagnostic::on_unimplemented(
    message = "values of type `{Self}` cannot be visited",
    label = "cannot resolve the exact type of this value",
    note = "sized `'static` types and `dyn Any` are visitable; use `polyvisit::visitable_dyn!` for trait objects of your own traits",
    note = "`str` and slices cannot be visited directly; visit a `&&str`, `String` or `Vec<T>` instead"
)]
pub unsafe trait Visitable {
    /// Returns the complete object behind `self` together with its exact type.
    fn most_derived(&self) -> RawValueRef<'_>;
}

// SAFETY: `RawValueRef::new` pairs the value's own address with `TypeId::of::<T>()`
unsafe impl<T: 'static> Visitable for T {
    #[inline]
    fn most_derived(&self) -> RawValueRef<'_> {
        RawValueRef::new(self)
    }
}

// SAFETY: `RawValueRef::from_any` resolves the trait object to its complete object
unsafe impl Visitable for dyn Any {
    #[inline]
    fn most_derived(&self) -> RawValueRef<'_> {
        RawValueRef::from_any(self)
    }
}

// SAFETY: `RawValueRef::from_any` resolves the trait object to its complete object
unsafe impl Visitable for dyn Any + Send {
    #[inline]
    fn most_derived(&self) -> RawValueRef<'_> {
        let value: &(dyn Any + 'static) = self;
        RawValueRef::from_any(value)
    }
}

// SAFETY: `RawValueRef::from_any` resolves the trait object to its complete object
unsafe impl Visitable for dyn Any + Send + Sync {
    #[inline]
    fn most_derived(&self) -> RawValueRef<'_> {
        let value: &(dyn Any + 'static) = self;
        RawValueRef::from_any(value)
    }
}
