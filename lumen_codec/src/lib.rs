//! Schema-driven structural encoding between configuration objects and a
//! generic JSON-compatible value tree.
//!
//! The codec operates on [CodecValue] trees. A [Schema] template describes the
//! expected shape at each node, and a [Registry] of [ClassDef]s provides
//! polymorphic dispatch for tagged object nodes: encoding projects an object
//! onto the merged field schema of its concrete class, and decoding resolves
//! the embedded type tag to the expected class or one of its registered
//! descendants.

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub use decode::*;
pub use encode::*;
pub use error::*;
pub use json::*;
pub use schema::*;
pub use value::*;

mod decode;
mod encode;
mod error;
mod json;
mod schema;
mod value;
