//! The configuration object graph: an arena of addressable objects plus the
//! root configuration that references into it.

use std::fmt;

use bitflags::bitflags;

use crate::Color;

/// Stable index of an object in a [Pool].
///
/// Parents store ids rather than direct references, so the same object can be
/// shared by any number of parents and graph queries become table lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub usize);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

bitflags! {
    /// The days of the week an alarm fires on.
    ///
    /// Bit *i* is day *i*, with day 0 the first day of the week (Sunday).
    pub struct DaySet: u8 {
        const SUNDAY = 1 << 0;
        const MONDAY = 1 << 1;
        const TUESDAY = 1 << 2;
        const WEDNESDAY = 1 << 3;
        const THURSDAY = 1 << 4;
        const FRIDAY = 1 << 5;
        const SATURDAY = 1 << 6;
    }
}

impl DaySet {
    /// The set containing only day `index` (0-6), or `None` if out of range.
    pub fn from_day_index(index: u8) -> Option<Self> {
        if index < 7 {
            DaySet::from_bits(1 << index)
        } else {
            None
        }
    }

    /// The indices of the days in this set, ascending.
    pub fn day_indices(&self) -> Vec<u8> {
        (0..7).filter(|i| self.bits() & (1 << i) != 0).collect()
    }
}

/// A lighting transition: a delay followed by an effect.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Seconds to wait before the effect starts.
    pub delay_s: f64,
    /// The effect to run.
    pub effect: Effect,
}

/// The concrete effect of a [Transition].
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Jump to a color.
    Immediate {
        /// Color setting after the transition completes.
        color: Color,
    },
    /// Interpolate to a color over a duration.
    Fade {
        /// Color setting after the transition completes.
        color: Color,
        /// Seconds the interpolation takes.
        duration_s: f64,
    },
    /// Play a color sequence over a duration.
    Waveform {
        /// The [ObjectKind::ColorList] holding the sequence.
        colors: ObjectId,
        /// Seconds the full sequence takes.
        duration_s: f64,
    },
}

/// One on/off pair of a mode set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mode {
    /// Transition run when the light is switched on.
    pub on: ObjectId,
    /// Transition run when the light is switched off.
    pub off: ObjectId,
}

/// A scheduled alarm firing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlarmEntry {
    /// Days of the week the alarm fires.
    pub days: DaySet,
    /// Hour of the day, 0-23 inclusive.
    pub hour: u8,
    /// Minute of the hour, 0-59 inclusive.
    pub minute: u8,
    /// The object the alarm acts on: a transition to start, or a mode set to
    /// switch to.
    pub data: ObjectId,
}

/// The variants of an addressable configuration object.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    /// A lighting transition.
    Transition(Transition),
    /// An ordered sequence of colors, played by waveform transitions.
    ColorList(Vec<Color>),
    /// The on/off transition pairs the light cycles through.
    ModeSet(Vec<Mode>),
    /// An ordered sequence of alarms.
    AlarmTable(Vec<AlarmEntry>),
}

impl ObjectKind {
    /// A short name for the object kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ObjectKind::Transition(_) => "transition",
            ObjectKind::ColorList(_) => "color list",
            ObjectKind::ModeSet(_) => "mode set",
            ObjectKind::AlarmTable(_) => "alarm table",
        }
    }

    /// The ids of the objects this object directly references.
    pub fn refs(&self) -> Vec<ObjectId> {
        match self {
            ObjectKind::Transition(transition) => match transition.effect {
                Effect::Waveform { colors, .. } => vec![colors],
                _ => vec![],
            },
            ObjectKind::ColorList(_) => vec![],
            ObjectKind::ModeSet(modes) => {
                modes.iter().flat_map(|mode| [mode.on, mode.off]).collect()
            }
            ObjectKind::AlarmTable(alarms) => alarms.iter().map(|alarm| alarm.data).collect(),
        }
    }
}

/// An addressable configuration object: a display label plus its kind.
///
/// Names are labels for the editing surface; they are not unique and play no
/// part in structural equality.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigObject {
    /// Display label.
    pub name: String,
    /// The object's kind and payload.
    pub kind: ObjectKind,
}

impl ConfigObject {
    /// Construct an object with the given label.
    pub fn new(name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// The arena holding every configuration object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pool {
    objects: Vec<ConfigObject>,
}

impl Pool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an object and return its id.
    pub fn insert(&mut self, object: ConfigObject) -> ObjectId {
        let id = ObjectId(self.objects.len());
        self.objects.push(object);
        id
    }

    /// Look up an object by id.
    pub fn get(&self, id: ObjectId) -> Option<&ConfigObject> {
        self.objects.get(id.0)
    }

    /// Look up an object by id for mutation.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut ConfigObject> {
        self.objects.get_mut(id.0)
    }

    /// The number of objects in the pool.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// True if the pool holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterate over the pool in id order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &ConfigObject)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(i, object)| (ObjectId(i), object))
    }
}

/// The root configuration, one per compiled image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// The mode set active when no schedule has selected another.
    pub default_modeset: ObjectId,
    /// Alarms that start lighting transitions.
    pub lighting_alarm_table: ObjectId,
    /// Alarms that switch the active mode set.
    pub modeset_change_table: ObjectId,
}

impl Config {
    /// The ids the root directly references.
    pub fn refs(&self) -> [ObjectId; 3] {
        [
            self.default_modeset,
            self.lighting_alarm_table,
            self.modeset_change_table,
        ]
    }

    /// Build a minimal working configuration into `pool`: a default mode set
    /// with a plain white-on/black-off pair, and two empty alarm tables.
    pub fn with_defaults(pool: &mut Pool) -> Self {
        let on = pool.insert(ConfigObject::new(
            "On",
            ObjectKind::Transition(Transition {
                delay_s: 0.0,
                effect: Effect::Immediate {
                    color: Color::raw(0, 0, 0, 0xFFFF),
                },
            }),
        ));
        let off = pool.insert(ConfigObject::new(
            "Off",
            ObjectKind::Transition(Transition {
                delay_s: 0.0,
                effect: Effect::Immediate {
                    color: Color::raw(0, 0, 0, 0),
                },
            }),
        ));
        let default_modeset = pool.insert(ConfigObject::new(
            "Default",
            ObjectKind::ModeSet(vec![Mode { on, off }]),
        ));
        let lighting_alarm_table =
            pool.insert(ConfigObject::new("Lighting", ObjectKind::AlarmTable(vec![])));
        let modeset_change_table = pool.insert(ConfigObject::new(
            "Mode changes",
            ObjectKind::AlarmTable(vec![]),
        ));
        Config {
            default_modeset,
            lighting_alarm_table,
            modeset_change_table,
        }
    }
}
