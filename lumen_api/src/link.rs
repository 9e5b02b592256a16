//! The seam to the device transport.
//!
//! The compiler produces a flat byte buffer; getting it onto the device is
//! the transport's job. A transport exposes the bootloader's three
//! operations, and [send_config] drives them: pad the image to a page
//! boundary with the erased-byte value, erase, write every page in order,
//! reload. Page size and fill byte are parameters so tests and future
//! bootloaders are not tied to one device.

use crate::TransportError;

/// Page size of the device EEPROM bootloader.
pub const DEVICE_PAGE_SIZE: usize = 32;

/// The value an erased EEPROM byte reads back as.
pub const ERASED_BYTE: u8 = 0xFF;

/// A connection to the device's configuration bootloader.
pub trait ConfigTransport {
    /// Erase the configuration area.
    fn erase(&mut self) -> Result<(), TransportError>;

    /// Write one page of data at the given page index.
    fn write_page(&mut self, page: usize, data: &[u8]) -> Result<(), TransportError>;

    /// Activate the newly written configuration.
    fn reload(&mut self) -> Result<(), TransportError>;
}

/// Pad an image up to a multiple of `page_size` with `fill`.
///
/// # Panics
///
/// Panics if `page_size` is zero.
pub fn pad_to_page(image: &[u8], page_size: usize, fill: u8) -> Vec<u8> {
    assert!(page_size != 0, "page size must be nonzero");
    let mut padded = image.to_vec();
    let remainder = padded.len() % page_size;
    if remainder != 0 {
        padded.resize(padded.len() + page_size - remainder, fill);
    }
    padded
}

/// Send a compiled image to the device.
///
/// The image is padded to a `page_size` boundary with `fill`, then written
/// page by page after an erase, and activated with a reload.
pub fn send_config(
    transport: &mut impl ConfigTransport,
    image: &[u8],
    page_size: usize,
    fill: u8,
) -> Result<(), TransportError> {
    let padded = pad_to_page(image, page_size, fill);
    log::info!(
        "sending {} byte image as {} page(s)",
        padded.len(),
        padded.len() / page_size
    );
    transport.erase()?;
    for (page, data) in padded.chunks(page_size).enumerate() {
        transport.write_page(page, data)?;
    }
    transport.reload()
}
