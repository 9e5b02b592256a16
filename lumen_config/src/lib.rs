//! The typed LED configuration model: transitions, color lists, mode sets and
//! alarm tables held in an arena and referenced by stable ids, rooted at a
//! single [Config].
//!
//! The model itself is plain data. Every class is registered with the codec
//! engine for JSON persistence (see [registry()]), and [validate()] checks
//! reference kinds and schedule ranges before an image is compiled.

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub use codec::*;
pub use color::*;
pub use error::*;
pub use object::*;
pub use validate::*;

mod codec;
mod color;
mod error;
mod object;
mod validate;
