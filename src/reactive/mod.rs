//! Reactive value primitive.
//!
//! [`Ref`] is the observable cell the request controller writes its state
//! into. Observers either register a callback ([`Ref::on_change`]) or await
//! changes on a watch receiver ([`Ref::subscribe`]).

mod cell;

#[cfg(test)]
mod cell_tests;

pub use cell::{Ref, Subscription};
