//! LED colors in raw 4-channel and normalized RGB form.

use crate::ConfigError;

/// Full scale of one raw LED channel.
const CHANNEL_MAX: f64 = 65535.0;

/// An LED color setting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    /// Raw 16-bit channel values, driven to the LEDs as-is.
    Raw {
        /// Red channel.
        r: u16,
        /// Green channel.
        g: u16,
        /// Blue channel.
        b: u16,
        /// White channel.
        w: u16,
    },
    /// A normalized RGB color, each channel in `0.0..=1.0`, converted to
    /// RGBW when the image is compiled.
    Rgb {
        /// Red channel.
        r: f64,
        /// Green channel.
        g: f64,
        /// Blue channel.
        b: f64,
    },
}

impl Color {
    /// Construct a raw RGBW color.
    pub fn raw(r: u16, g: u16, b: u16, w: u16) -> Self {
        Color::Raw { r, g, b, w }
    }

    /// Construct a normalized RGB color, checking that every channel is in
    /// `0.0..=1.0`.
    pub fn rgb(r: f64, g: f64, b: f64) -> Result<Self, ConfigError> {
        for channel in [r, g, b] {
            if !(0.0..=1.0).contains(&channel) {
                return Err(ConfigError::ChannelOutOfRange(channel));
            }
        }
        Ok(Color::Rgb { r, g, b })
    }

    /// Construct a normalized RGB color from 8-bit channel values.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb {
            r: f64::from(r) / 255.0,
            g: f64::from(g) / 255.0,
            b: f64::from(b) / 255.0,
        }
    }

    /// The raw 4-channel values for this color, in `[r, g, b, w]` order.
    ///
    /// A normalized RGB color maps its common component onto the white
    /// channel: `white = min(r, g, b)`, each raw color channel is the
    /// remainder above white scaled to 16 bits, truncated toward zero.
    pub fn rgbw(&self) -> [u16; 4] {
        match *self {
            Color::Raw { r, g, b, w } => [r, g, b, w],
            Color::Rgb { r, g, b } => {
                let white = r.min(g).min(b);
                [
                    ((r - white) * CHANNEL_MAX) as u16,
                    ((g - white) * CHANNEL_MAX) as u16,
                    ((b - white) * CHANNEL_MAX) as u16,
                    (white * CHANNEL_MAX) as u16,
                ]
            }
        }
    }
}
