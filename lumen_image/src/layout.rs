//! Fixed binary layouts of the configuration objects.
//!
//! Every multi-byte field is little-endian and no layout carries padding.
//! References serialize as the 16-bit [Address](crate::Address) assigned to
//! the referenced object.

use lumen_config::{AlarmEntry, Color, Config, Effect, Mode, ObjectId, ObjectKind, Transition};

use crate::{compile::AddressTable, CompileError};

/// Ticks of the device scheduler per second.
pub const TICKS_PER_SECOND: u32 = 64;

/// Serialized length of the root configuration header.
pub const CONFIG_HEADER_LEN: usize = 10;

const IMMEDIATE_ID: u8 = 0;
const FADE_ID: u8 = 1;
const WAVEFORM_ID: u8 = 2;

/// Convert seconds to scheduler ticks, truncating toward zero and saturating
/// at `u16::MAX`.
pub fn ticks(seconds: f64) -> u16 {
    (seconds * f64::from(TICKS_PER_SECOND)) as u16
}

fn count_byte(len: usize, kind: &'static str) -> Result<u8, CompileError> {
    u8::try_from(len).map_err(|_| CompileError::TooManyEntries { kind, len })
}

fn push_rgbw(buf: &mut Vec<u8>, color: &Color) {
    for channel in color.rgbw() {
        buf.extend_from_slice(&channel.to_le_bytes());
    }
}

fn push_address(
    buf: &mut Vec<u8>,
    addresses: &AddressTable,
    id: ObjectId,
) -> Result<(), CompileError> {
    let address = addresses
        .get(id)
        .ok_or(CompileError::UnresolvedReference(id))?;
    buf.extend_from_slice(&address.0.to_le_bytes());
    Ok(())
}

/// Serialize one pool object to its binary layout.
pub(crate) fn object_bytes(
    kind: &ObjectKind,
    addresses: &AddressTable,
) -> Result<Vec<u8>, CompileError> {
    match kind {
        ObjectKind::Transition(transition) => transition_bytes(transition, addresses),
        ObjectKind::ColorList(colors) => color_list_bytes(colors),
        ObjectKind::ModeSet(modes) => mode_set_bytes(modes, addresses),
        ObjectKind::AlarmTable(alarms) => alarm_table_bytes(alarms, addresses),
    }
}

fn transition_bytes(
    transition: &Transition,
    addresses: &AddressTable,
) -> Result<Vec<u8>, CompileError> {
    let mut buf = Vec::new();
    match &transition.effect {
        Effect::Immediate { color } => {
            buf.push(IMMEDIATE_ID);
            buf.extend_from_slice(&ticks(transition.delay_s).to_le_bytes());
            push_rgbw(&mut buf, color);
        }
        Effect::Fade { color, duration_s } => {
            buf.push(FADE_ID);
            buf.extend_from_slice(&ticks(transition.delay_s).to_le_bytes());
            push_rgbw(&mut buf, color);
            buf.extend_from_slice(&ticks(*duration_s).to_le_bytes());
        }
        Effect::Waveform { colors, duration_s } => {
            buf.push(WAVEFORM_ID);
            buf.extend_from_slice(&ticks(transition.delay_s).to_le_bytes());
            push_address(&mut buf, addresses, *colors)?;
            buf.extend_from_slice(&ticks(*duration_s).to_le_bytes());
        }
    }
    Ok(buf)
}

fn color_list_bytes(colors: &[Color]) -> Result<Vec<u8>, CompileError> {
    let mut buf = vec![count_byte(colors.len(), "color list")?];
    for color in colors {
        push_rgbw(&mut buf, color);
    }
    Ok(buf)
}

fn mode_set_bytes(modes: &[Mode], addresses: &AddressTable) -> Result<Vec<u8>, CompileError> {
    let mut buf = vec![count_byte(modes.len(), "mode set")?];
    for mode in modes {
        push_address(&mut buf, addresses, mode.on)?;
        push_address(&mut buf, addresses, mode.off)?;
    }
    Ok(buf)
}

fn alarm_table_bytes(
    alarms: &[AlarmEntry],
    addresses: &AddressTable,
) -> Result<Vec<u8>, CompileError> {
    let mut buf = vec![count_byte(alarms.len(), "alarm table")?];
    for alarm in alarms {
        buf.push(alarm.days.bits());
        buf.push(alarm.hour);
        buf.push(alarm.minute);
        push_address(&mut buf, addresses, alarm.data)?;
    }
    Ok(buf)
}

/// Serialize the root configuration header: a 32-bit reserved field (always
/// zero) followed by the three table addresses.
pub(crate) fn config_header(
    config: &Config,
    addresses: &AddressTable,
) -> Result<Vec<u8>, CompileError> {
    let mut buf = Vec::with_capacity(CONFIG_HEADER_LEN);
    buf.extend_from_slice(&0u32.to_le_bytes());
    push_address(&mut buf, addresses, config.default_modeset)?;
    push_address(&mut buf, addresses, config.lighting_alarm_table)?;
    push_address(&mut buf, addresses, config.modeset_change_table)?;
    Ok(buf)
}
