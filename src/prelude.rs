//! Commonly used items for convenient importing.
//!
//! ```rust
//! use polyvisit::prelude::*;
//!
//! trait Event: Any {}
//! visitable_dyn!(dyn Event);
//!
//! struct Click;
//! impl Event for Click {}
//!
//! let mut clicks = 0;
//! visit!(&Click as &(dyn Event + 'static), |_: &Click| clicks += 1);
//! assert_eq!(clicks, 1);
//! ```
//!
//! This prelude includes [`visit`](fn@visit) and [`visit!`], the
//! [`visitable_dyn!`] macro, the [`Visitor`] type, the [`VisitExt`] extension
//! trait and [`Any`].

pub use core::any::Any;

pub use crate::{VisitExt, Visitable, Visitor, visit, visitable_dyn};
