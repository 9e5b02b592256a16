//! Class registrations and value conversions for the configuration model.
//!
//! Class ids are the dotted, fully-qualified identifiers written to the type
//! tag of encoded objects. The tag-to-constructor mapping is the closed match
//! in each `from_value`; the [Registry] drives the schema checks and
//! polymorphic tag resolution on top of it.

use lumen_codec::{ClassDef, ClassValue, CodecValue, Registry, Schema};

use crate::{
    AlarmEntry, Color, Config, ConfigError, ConfigObject, DaySet, Effect, Mode, ObjectId,
    ObjectKind, Pool, Transition,
};

/// Base class of every addressable object; contributes the `name` field.
pub const OBJECT_CLASS: &str = "lumen_config.Object";
/// Abstract transition class; contributes the `delay` field.
pub const TRANSITION_CLASS: &str = "lumen_config.Transition";
/// Immediate transition class.
pub const IMMEDIATE_CLASS: &str = "lumen_config.Immediate";
/// Fade transition class.
pub const FADE_CLASS: &str = "lumen_config.Fade";
/// Waveform transition class.
pub const WAVEFORM_CLASS: &str = "lumen_config.Waveform";
/// Color list class.
pub const COLOR_LIST_CLASS: &str = "lumen_config.ColorList";
/// Mode set class.
pub const MODE_SET_CLASS: &str = "lumen_config.ModeSet";
/// Alarm table class.
pub const ALARM_TABLE_CLASS: &str = "lumen_config.AlarmTable";
/// Abstract color class.
pub const COLOR_CLASS: &str = "lumen_config.Color";
/// Raw RGBW color class.
pub const RAW_COLOR_CLASS: &str = "lumen_config.RawColor";
/// Normalized RGB color class.
pub const RGB_COLOR_CLASS: &str = "lumen_config.RgbColor";
/// Alarm entry class.
pub const ALARM_ENTRY_CLASS: &str = "lumen_config.AlarmEntry";
/// Root configuration class.
pub const CONFIG_CLASS: &str = "lumen_config.Config";

/// Build the class registry for the configuration model.
pub fn registry() -> Registry {
    let mut reg = Registry::new();
    reg.register(ClassDef {
        id: OBJECT_CLASS,
        base: None,
        fields: vec![("name", Schema::Str)],
    });
    reg.register(ClassDef {
        id: COLOR_CLASS,
        base: None,
        fields: vec![],
    });
    reg.register(ClassDef {
        id: RAW_COLOR_CLASS,
        base: Some(COLOR_CLASS),
        fields: vec![
            ("r", Schema::Int),
            ("g", Schema::Int),
            ("b", Schema::Int),
            ("w", Schema::Int),
        ],
    });
    reg.register(ClassDef {
        id: RGB_COLOR_CLASS,
        base: Some(COLOR_CLASS),
        fields: vec![
            ("r", Schema::Float),
            ("g", Schema::Float),
            ("b", Schema::Float),
        ],
    });
    reg.register(ClassDef {
        id: TRANSITION_CLASS,
        base: Some(OBJECT_CLASS),
        fields: vec![("delay", Schema::Float)],
    });
    reg.register(ClassDef {
        id: IMMEDIATE_CLASS,
        base: Some(TRANSITION_CLASS),
        fields: vec![("color", Schema::Class(COLOR_CLASS))],
    });
    reg.register(ClassDef {
        id: FADE_CLASS,
        base: Some(TRANSITION_CLASS),
        fields: vec![
            ("color", Schema::Class(COLOR_CLASS)),
            ("duration", Schema::Float),
        ],
    });
    reg.register(ClassDef {
        id: WAVEFORM_CLASS,
        base: Some(TRANSITION_CLASS),
        fields: vec![("colors", Schema::Int), ("duration", Schema::Float)],
    });
    reg.register(ClassDef {
        id: COLOR_LIST_CLASS,
        base: Some(OBJECT_CLASS),
        fields: vec![("colors", Schema::seq(Schema::Class(COLOR_CLASS)))],
    });
    reg.register(ClassDef {
        id: MODE_SET_CLASS,
        base: Some(OBJECT_CLASS),
        fields: vec![(
            "modes",
            Schema::seq(Schema::Tuple(vec![Schema::Int, Schema::Int])),
        )],
    });
    reg.register(ClassDef {
        id: ALARM_ENTRY_CLASS,
        base: None,
        fields: vec![
            ("days", Schema::seq(Schema::Int)),
            ("hour", Schema::Int),
            ("minute", Schema::Int),
            ("data", Schema::Int),
        ],
    });
    reg.register(ClassDef {
        id: ALARM_TABLE_CLASS,
        base: Some(OBJECT_CLASS),
        fields: vec![("alarms", Schema::seq(Schema::Class(ALARM_ENTRY_CLASS)))],
    });
    reg.register(ClassDef {
        id: CONFIG_CLASS,
        base: None,
        fields: vec![
            ("default_modeset", Schema::Int),
            ("lighting_alarm_table", Schema::Int),
            ("modeset_change_table", Schema::Int),
        ],
    });
    reg
}

fn field<'a>(object: &'a ClassValue, name: &'static str) -> Result<&'a CodecValue, ConfigError> {
    object
        .field(name)
        .ok_or_else(|| ConfigError::MissingField(name.to_string()))
}

fn f64_field(object: &ClassValue, name: &'static str) -> Result<f64, ConfigError> {
    Ok(field(object, name)?.try_as_float()?)
}

fn str_field(object: &ClassValue, name: &'static str) -> Result<String, ConfigError> {
    Ok(field(object, name)?.try_as_str()?.to_string())
}

fn int_in_range(value: i64, range: std::ops::RangeInclusive<i64>, name: &'static str) -> Result<i64, ConfigError> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::FieldOutOfRange { field: name, value })
    }
}

fn u16_field(object: &ClassValue, name: &'static str) -> Result<u16, ConfigError> {
    let value = field(object, name)?.try_as_int()?;
    Ok(int_in_range(value, 0..=i64::from(u16::MAX), name)? as u16)
}

fn u8_field(object: &ClassValue, name: &'static str) -> Result<u8, ConfigError> {
    let value = field(object, name)?.try_as_int()?;
    Ok(int_in_range(value, 0..=i64::from(u8::MAX), name)? as u8)
}

fn id_field(object: &ClassValue, name: &'static str) -> Result<ObjectId, ConfigError> {
    let value = field(object, name)?.try_as_int()?;
    Ok(ObjectId(
        int_in_range(value, 0..=i64::MAX, name)? as usize
    ))
}

fn id_value(id: ObjectId) -> CodecValue {
    CodecValue::Int(id.0 as i64)
}

impl Color {
    /// Encode the color as a tagged object value.
    pub fn to_value(&self) -> CodecValue {
        match *self {
            Color::Raw { r, g, b, w } => CodecValue::object(
                RAW_COLOR_CLASS,
                [("r", r), ("g", g), ("b", b), ("w", w)],
            ),
            Color::Rgb { r, g, b } => {
                CodecValue::object(RGB_COLOR_CLASS, [("r", r), ("g", g), ("b", b)])
            }
        }
    }

    /// Reconstruct a color from a tagged object value.
    pub fn from_value(value: &CodecValue) -> Result<Self, ConfigError> {
        let object = value.try_as_object()?;
        match object.class_id.as_str() {
            RAW_COLOR_CLASS => Ok(Color::Raw {
                r: u16_field(object, "r")?,
                g: u16_field(object, "g")?,
                b: u16_field(object, "b")?,
                w: u16_field(object, "w")?,
            }),
            RGB_COLOR_CLASS => Color::rgb(
                f64_field(object, "r")?,
                f64_field(object, "g")?,
                f64_field(object, "b")?,
            ),
            _ => Err(ConfigError::UnexpectedClass {
                expected: COLOR_CLASS,
                actual: object.class_id.clone(),
            }),
        }
    }
}

impl AlarmEntry {
    /// Encode the alarm entry as a tagged object value.
    pub fn to_value(&self) -> CodecValue {
        CodecValue::object(
            ALARM_ENTRY_CLASS,
            [
                ("days", CodecValue::from(self.days.day_indices())),
                ("hour", self.hour.into()),
                ("minute", self.minute.into()),
                ("data", id_value(self.data)),
            ],
        )
    }

    /// Reconstruct an alarm entry from a tagged object value.
    pub fn from_value(value: &CodecValue) -> Result<Self, ConfigError> {
        let object = value.try_as_object()?;
        if object.class_id != ALARM_ENTRY_CLASS {
            return Err(ConfigError::UnexpectedClass {
                expected: ALARM_ENTRY_CLASS,
                actual: object.class_id.clone(),
            });
        }
        let mut days = DaySet::empty();
        for day in field(object, "days")?.try_as_seq()? {
            let index = int_in_range(day.try_as_int()?, 0..=6, "days")?;
            days |= DaySet::from_day_index(index as u8).expect("index checked above");
        }
        Ok(AlarmEntry {
            days,
            hour: u8_field(object, "hour")?,
            minute: u8_field(object, "minute")?,
            data: id_field(object, "data")?,
        })
    }
}

impl ConfigObject {
    /// Encode the object as a tagged object value, including its label.
    pub fn to_value(&self) -> CodecValue {
        let name = CodecValue::from(self.name.as_str());
        match &self.kind {
            ObjectKind::Transition(transition) => {
                let delay = CodecValue::Float(transition.delay_s);
                match &transition.effect {
                    Effect::Immediate { color } => CodecValue::object(
                        IMMEDIATE_CLASS,
                        [("name", name), ("delay", delay), ("color", color.to_value())],
                    ),
                    Effect::Fade { color, duration_s } => CodecValue::object(
                        FADE_CLASS,
                        [
                            ("name", name),
                            ("delay", delay),
                            ("color", color.to_value()),
                            ("duration", CodecValue::Float(*duration_s)),
                        ],
                    ),
                    Effect::Waveform { colors, duration_s } => CodecValue::object(
                        WAVEFORM_CLASS,
                        [
                            ("name", name),
                            ("delay", delay),
                            ("colors", id_value(*colors)),
                            ("duration", CodecValue::Float(*duration_s)),
                        ],
                    ),
                }
            }
            ObjectKind::ColorList(colors) => CodecValue::object(
                COLOR_LIST_CLASS,
                [
                    ("name", name),
                    (
                        "colors",
                        CodecValue::Seq(colors.iter().map(Color::to_value).collect()),
                    ),
                ],
            ),
            ObjectKind::ModeSet(modes) => CodecValue::object(
                MODE_SET_CLASS,
                [
                    ("name", name),
                    (
                        "modes",
                        CodecValue::Seq(
                            modes
                                .iter()
                                .map(|mode| {
                                    CodecValue::tuple([id_value(mode.on), id_value(mode.off)])
                                })
                                .collect(),
                        ),
                    ),
                ],
            ),
            ObjectKind::AlarmTable(alarms) => CodecValue::object(
                ALARM_TABLE_CLASS,
                [
                    ("name", name),
                    (
                        "alarms",
                        CodecValue::Seq(alarms.iter().map(AlarmEntry::to_value).collect()),
                    ),
                ],
            ),
        }
    }

    /// Reconstruct an object from a tagged object value.
    ///
    /// The match on the class id is the closed constructor mapping for the
    /// object family; the codec's registry resolves tags before this runs.
    pub fn from_value(value: &CodecValue) -> Result<Self, ConfigError> {
        let object = value.try_as_object()?;
        let name = str_field(object, "name")?;
        let kind = match object.class_id.as_str() {
            IMMEDIATE_CLASS => ObjectKind::Transition(Transition {
                delay_s: f64_field(object, "delay")?,
                effect: Effect::Immediate {
                    color: Color::from_value(field(object, "color")?)?,
                },
            }),
            FADE_CLASS => ObjectKind::Transition(Transition {
                delay_s: f64_field(object, "delay")?,
                effect: Effect::Fade {
                    color: Color::from_value(field(object, "color")?)?,
                    duration_s: f64_field(object, "duration")?,
                },
            }),
            WAVEFORM_CLASS => ObjectKind::Transition(Transition {
                delay_s: f64_field(object, "delay")?,
                effect: Effect::Waveform {
                    colors: id_field(object, "colors")?,
                    duration_s: f64_field(object, "duration")?,
                },
            }),
            COLOR_LIST_CLASS => ObjectKind::ColorList(
                field(object, "colors")?
                    .try_as_seq()?
                    .iter()
                    .map(Color::from_value)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            MODE_SET_CLASS => {
                let mut modes = Vec::new();
                for pair in field(object, "modes")?.try_as_seq()? {
                    let pair = pair.try_as_tuple()?;
                    if pair.len() != 2 {
                        return Err(ConfigError::FieldOutOfRange {
                            field: "modes",
                            value: pair.len() as i64,
                        });
                    }
                    modes.push(Mode {
                        on: ObjectId(int_in_range(pair[0].try_as_int()?, 0..=i64::MAX, "modes")?
                            as usize),
                        off: ObjectId(int_in_range(pair[1].try_as_int()?, 0..=i64::MAX, "modes")?
                            as usize),
                    });
                }
                ObjectKind::ModeSet(modes)
            }
            ALARM_TABLE_CLASS => ObjectKind::AlarmTable(
                field(object, "alarms")?
                    .try_as_seq()?
                    .iter()
                    .map(AlarmEntry::from_value)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            _ => {
                return Err(ConfigError::UnexpectedClass {
                    expected: OBJECT_CLASS,
                    actual: object.class_id.clone(),
                })
            }
        };
        Ok(ConfigObject { name, kind })
    }
}

impl Pool {
    /// Encode the pool as a sequence of object values in id order.
    pub fn to_value(&self) -> CodecValue {
        CodecValue::Seq(self.iter().map(|(_, object)| object.to_value()).collect())
    }

    /// Reconstruct a pool from a sequence of object values.
    ///
    /// Ids are positions in the sequence, so a round trip preserves every
    /// reference edge.
    pub fn from_value(value: &CodecValue) -> Result<Self, ConfigError> {
        let mut pool = Pool::new();
        for element in value.try_as_seq()? {
            pool.insert(ConfigObject::from_value(element)?);
        }
        Ok(pool)
    }
}

impl Config {
    /// Encode the root configuration as a tagged object value.
    pub fn to_value(&self) -> CodecValue {
        CodecValue::object(
            CONFIG_CLASS,
            [
                ("default_modeset", id_value(self.default_modeset)),
                ("lighting_alarm_table", id_value(self.lighting_alarm_table)),
                ("modeset_change_table", id_value(self.modeset_change_table)),
            ],
        )
    }

    /// Reconstruct the root configuration from a tagged object value.
    pub fn from_value(value: &CodecValue) -> Result<Self, ConfigError> {
        let object = value.try_as_object()?;
        if object.class_id != CONFIG_CLASS {
            return Err(ConfigError::UnexpectedClass {
                expected: CONFIG_CLASS,
                actual: object.class_id.clone(),
            });
        }
        Ok(Config {
            default_modeset: id_field(object, "default_modeset")?,
            lighting_alarm_table: id_field(object, "lighting_alarm_table")?,
            modeset_change_table: id_field(object, "modeset_change_table")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_codec::{decode, encode};

    fn sample_pool() -> (Pool, Config) {
        let mut pool = Pool::new();
        let config = Config::with_defaults(&mut pool);
        let colors = pool.insert(ConfigObject::new(
            "Sunrise",
            ObjectKind::ColorList(vec![
                Color::raw(0, 0, 0, 0),
                Color::rgb(1.0, 0.5, 0.0).unwrap(),
            ]),
        ));
        let wave = pool.insert(ConfigObject::new(
            "Sunrise wave",
            ObjectKind::Transition(Transition {
                delay_s: 1.5,
                effect: Effect::Waveform {
                    colors,
                    duration_s: 300.0,
                },
            }),
        ));
        match &mut pool.get_mut(config.lighting_alarm_table).unwrap().kind {
            ObjectKind::AlarmTable(alarms) => alarms.push(AlarmEntry {
                days: DaySet::MONDAY | DaySet::FRIDAY,
                hour: 6,
                minute: 30,
                data: wave,
            }),
            _ => unreachable!(),
        }
        (pool, config)
    }

    #[test]
    fn merged_transition_fields_include_the_ancestors() {
        let reg = registry();
        let fields = reg.merged_fields(IMMEDIATE_CLASS).unwrap();
        let names: Vec<&str> = fields.keys().copied().collect();
        assert_eq!(names, vec!["name", "delay", "color"]);
    }

    #[test]
    fn every_object_kind_round_trips_through_the_engine() {
        let reg = registry();
        let (pool, _) = sample_pool();
        for (_, object) in pool.iter() {
            let value = object.to_value();
            let encoded = encode(&value, &Schema::Class(OBJECT_CLASS), &reg).unwrap();
            let decoded = decode(&encoded, &Schema::Class(OBJECT_CLASS), &reg).unwrap();
            let back = ConfigObject::from_value(&decoded).unwrap();
            assert_eq!(&back, object);
        }
    }

    #[test]
    fn pools_round_trip_preserving_reference_edges() {
        let (pool, config) = sample_pool();
        let back = Pool::from_value(&pool.to_value()).unwrap();
        assert_eq!(back, pool);
        let config_back = Config::from_value(&config.to_value()).unwrap();
        assert_eq!(config_back, config);
    }

    #[test]
    fn unknown_object_classes_are_rejected() {
        let value = CodecValue::object("lumen_config.Sparkle", [("name", "x")]);
        assert!(matches!(
            ConfigObject::from_value(&value),
            Err(ConfigError::UnexpectedClass { .. })
        ));
    }

    #[test]
    fn alarm_day_indices_are_range_checked() {
        let value = CodecValue::object(
            ALARM_ENTRY_CLASS,
            [
                ("days", CodecValue::Seq(vec![CodecValue::Int(7)])),
                ("hour", CodecValue::Int(0)),
                ("minute", CodecValue::Int(0)),
                ("data", CodecValue::Int(0)),
            ],
        );
        assert!(matches!(
            AlarmEntry::from_value(&value),
            Err(ConfigError::FieldOutOfRange { field: "days", .. })
        ));
    }
}
