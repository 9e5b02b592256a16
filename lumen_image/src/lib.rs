//! Compilation of a configuration graph into the flat, pointer-resolved
//! binary image stored in the device EEPROM.
//!
//! The compiler assigns every distinct reachable object an [Address] by
//! repeatedly scanning the not-yet-addressed set until it reaches a fixed
//! point, deduplicating structurally identical objects along the way, and
//! patches the root header once all addresses are known. See [compile()].

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub use address::*;
pub use compile::*;
pub use error::*;
pub use layout::{ticks, CONFIG_HEADER_LEN, TICKS_PER_SECOND};

mod address;
mod compile;
mod error;
mod layout;
