//! Internal utility types.

/// Marker type used as the pointee of type-erased pointers.
///
/// A `NonNull<Erased>` points at a value of some concrete type that is not
/// known at the current scope. The pointer must never be dereferenced as an
/// `Erased`; it is only ever cast back to the concrete type after its
/// [`TypeId`](core::any::TypeId) has been compared.
///
/// Using a distinct marker type (rather than `()`) makes the intent clearer
/// in type signatures and error messages.
pub(crate) struct Erased;
