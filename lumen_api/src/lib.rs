//! The main API for the LED controller configuration tooling.
//!
//! A [Settings] document holds the configuration object pool, the root
//! [Config], and the device link address. The typical flow mirrors the
//! desktop tooling and command-line loaders:
//!
//! ```no_run
//! use lumen_api::{send_config, Address, Settings, DEVICE_PAGE_SIZE, ERASED_BYTE};
//! # use lumen_api::{ConfigTransport, TransportError};
//! # #[derive(Debug)] struct NullTransport;
//! # impl ConfigTransport for NullTransport {
//! #     fn erase(&mut self) -> Result<(), TransportError> { Ok(()) }
//! #     fn write_page(&mut self, _: usize, _: &[u8]) -> Result<(), TransportError> { Ok(()) }
//! #     fn reload(&mut self) -> Result<(), TransportError> { Ok(()) }
//! # }
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::load("lights.json")?;
//! let image = settings.compile(Address(0), 2048)?;
//! let mut transport = NullTransport;
//! send_config(&mut transport, &image, DEVICE_PAGE_SIZE, ERASED_BYTE)?;
//! # Ok(())
//! # }
//! ```
//!
//! The pieces are usable on their own: `lumen_codec` for the schema-driven
//! value codec, `lumen_config` for the object model, and `lumen_image` for
//! the image compiler.

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub use error::*;
pub use link::*;
pub use settings::*;

pub use lumen_codec::{CodecError, CodecValue, JsonError, Registry, Schema};
pub use lumen_config::{
    validate, AlarmEntry, Color, Config, ConfigError, ConfigObject, DaySet, Effect, Mode,
    ObjectId, ObjectKind, Pool, Transition,
};
pub use lumen_image::{compile, ticks, Address, CompileError, CONFIG_HEADER_LEN, TICKS_PER_SECOND};

mod error;
mod link;
mod settings;
