//! End-to-end flow: build a document, persist it, reload it, compile it,
//! and page it onto a mock device.

use lumen_api::{
    send_config, Address, AlarmEntry, Color, ConfigObject, ConfigTransport, DaySet, Effect, Mode,
    ObjectKind, Settings, Transition, TransportError, DEVICE_PAGE_SIZE, ERASED_BYTE,
};

const BASE: Address = Address(0x40);
const BUDGET: usize = 2048;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn sample_settings() -> Settings {
    let mut settings = Settings::new();
    settings.device_address = Some("00:0A:95:9D:68:16".to_string());

    let ramp = settings.objects.insert(ConfigObject::new(
        "Sunrise ramp",
        ObjectKind::ColorList(vec![
            Color::raw(0, 0, 0, 0),
            Color::rgb(1.0, 0.25, 0.0).unwrap(),
            Color::rgb(1.0, 1.0, 0.8).unwrap(),
        ]),
    ));
    let sunrise = settings.objects.insert(ConfigObject::new(
        "Sunrise",
        ObjectKind::Transition(Transition {
            delay_s: 0.0,
            effect: Effect::Waveform {
                colors: ramp,
                duration_s: 300.0,
            },
        }),
    ));
    let dusk = settings.objects.insert(ConfigObject::new(
        "Dusk",
        ObjectKind::Transition(Transition {
            delay_s: 0.5,
            effect: Effect::Fade {
                color: Color::rgb8(255, 140, 0),
                duration_s: 30.0,
            },
        }),
    ));

    let weekdays =
        DaySet::MONDAY | DaySet::TUESDAY | DaySet::WEDNESDAY | DaySet::THURSDAY | DaySet::FRIDAY;
    match &mut settings
        .objects
        .get_mut(settings.config.lighting_alarm_table)
        .unwrap()
        .kind
    {
        ObjectKind::AlarmTable(alarms) => {
            alarms.push(AlarmEntry {
                days: weekdays,
                hour: 6,
                minute: 30,
                data: sunrise,
            });
            alarms.push(AlarmEntry {
                days: DaySet::all(),
                hour: 21,
                minute: 0,
                data: dusk,
            });
        }
        _ => unreachable!(),
    }

    // a second mode pair reusing the sunrise transition
    match &mut settings
        .objects
        .get_mut(settings.config.default_modeset)
        .unwrap()
        .kind
    {
        ObjectKind::ModeSet(modes) => {
            let off = modes[0].off;
            modes.push(Mode {
                on: sunrise,
                off,
            });
        }
        _ => unreachable!(),
    }

    settings
}

#[derive(Debug, Default)]
struct MockDevice {
    erased: bool,
    ops: Vec<String>,
    memory: Vec<u8>,
}

impl ConfigTransport for MockDevice {
    fn erase(&mut self) -> Result<(), TransportError> {
        self.erased = true;
        self.ops.push("erase".to_string());
        Ok(())
    }

    fn write_page(&mut self, page: usize, data: &[u8]) -> Result<(), TransportError> {
        if !self.erased {
            return Err(TransportError::DeviceError("not erased".to_string()));
        }
        self.ops.push(format!("write {}", page));
        let offset = page * DEVICE_PAGE_SIZE;
        if self.memory.len() < offset + data.len() {
            self.memory.resize(offset + data.len(), ERASED_BYTE);
        }
        self.memory[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }

    fn reload(&mut self) -> Result<(), TransportError> {
        self.ops.push("reload".to_string());
        Ok(())
    }
}

#[test]
fn documents_round_trip_through_json() {
    init_logging();
    let settings = sample_settings();
    let json = settings.to_json_string().unwrap();
    let back = Settings::from_json_str(&json).unwrap();
    assert_eq!(back, settings);
}

#[test]
fn reencoding_a_document_is_byte_identical() {
    let settings = sample_settings();
    let first = settings.to_json_string().unwrap();
    let second = Settings::from_json_str(&first)
        .unwrap()
        .to_json_string()
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn saved_documents_load_and_compile_deterministically() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lights.json");

    let settings = sample_settings();
    settings.save(&path).unwrap();

    let loaded = Settings::load(&path).unwrap();
    assert_eq!(loaded, settings);

    let first = loaded.compile(BASE, BUDGET).unwrap();
    let second = settings.compile(BASE, BUDGET).unwrap();
    assert_eq!(first, second);
}

#[test]
fn compiled_images_page_onto_the_device() {
    init_logging();
    let settings = sample_settings();
    let image = settings.compile(BASE, BUDGET).unwrap();

    let mut device = MockDevice::default();
    send_config(&mut device, &image, DEVICE_PAGE_SIZE, ERASED_BYTE).unwrap();

    assert_eq!(device.ops.first().map(String::as_str), Some("erase"));
    assert_eq!(device.ops.last().map(String::as_str), Some("reload"));
    assert_eq!(device.memory.len() % DEVICE_PAGE_SIZE, 0);
    assert_eq!(&device.memory[..image.len()], &image[..]);
    assert!(device.memory[image.len()..]
        .iter()
        .all(|byte| *byte == ERASED_BYTE));
}

#[test]
fn oversized_documents_never_reach_the_device() {
    let settings = sample_settings();
    assert!(settings.compile(BASE, 8).is_err());
}
