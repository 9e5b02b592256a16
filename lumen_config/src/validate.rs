//! Semantic checks on a configuration graph.

use crate::{Config, ConfigError, Effect, ObjectId, ObjectKind, Pool};

/// Check that every reference in the graph points at an object of the right
/// kind and that every alarm's schedule fields are in range.
///
/// Hour 0-23 and minute 0-59 are both inclusive.
pub fn validate(pool: &Pool, config: &Config) -> Result<(), ConfigError> {
    expect_kind(pool, config.default_modeset, "mode set", |kind| {
        matches!(kind, ObjectKind::ModeSet(_))
    })?;
    for id in [config.lighting_alarm_table, config.modeset_change_table] {
        expect_kind(pool, id, "alarm table", |kind| {
            matches!(kind, ObjectKind::AlarmTable(_))
        })?;
    }

    for (_, object) in pool.iter() {
        match &object.kind {
            ObjectKind::Transition(transition) => {
                if let Effect::Waveform { colors, .. } = transition.effect {
                    expect_kind(pool, colors, "color list", |kind| {
                        matches!(kind, ObjectKind::ColorList(_))
                    })?;
                }
            }
            ObjectKind::ColorList(_) => {}
            ObjectKind::ModeSet(modes) => {
                for mode in modes {
                    for id in [mode.on, mode.off] {
                        expect_kind(pool, id, "transition", |kind| {
                            matches!(kind, ObjectKind::Transition(_))
                        })?;
                    }
                }
            }
            ObjectKind::AlarmTable(alarms) => {
                for alarm in alarms {
                    if alarm.hour > 23 {
                        return Err(ConfigError::FieldOutOfRange {
                            field: "hour",
                            value: alarm.hour.into(),
                        });
                    }
                    if alarm.minute > 59 {
                        return Err(ConfigError::FieldOutOfRange {
                            field: "minute",
                            value: alarm.minute.into(),
                        });
                    }
                    expect_kind(pool, alarm.data, "transition or mode set", |kind| {
                        matches!(kind, ObjectKind::Transition(_) | ObjectKind::ModeSet(_))
                    })?;
                }
            }
        }
    }
    Ok(())
}

fn expect_kind(
    pool: &Pool,
    id: ObjectId,
    expected: &'static str,
    matches: impl Fn(&ObjectKind) -> bool,
) -> Result<(), ConfigError> {
    let object = pool.get(id).ok_or(ConfigError::UnknownObject(id))?;
    if matches(&object.kind) {
        Ok(())
    } else {
        Err(ConfigError::WrongKind {
            id,
            expected,
            actual: object.kind.kind_name(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AlarmEntry, ConfigObject, DaySet};

    fn base() -> (Pool, Config) {
        let mut pool = Pool::new();
        let config = Config::with_defaults(&mut pool);
        (pool, config)
    }

    #[test]
    fn the_default_configuration_is_valid() {
        let (pool, config) = base();
        assert!(validate(&pool, &config).is_ok());
    }

    #[test]
    fn boundary_alarm_times_are_inclusive() {
        let (mut pool, config) = base();
        let data = config.default_modeset;
        let alarm = AlarmEntry {
            days: DaySet::all(),
            hour: 23,
            minute: 59,
            data,
        };
        match &mut pool.get_mut(config.lighting_alarm_table).unwrap().kind {
            ObjectKind::AlarmTable(alarms) => alarms.push(alarm),
            _ => unreachable!(),
        }
        assert!(validate(&pool, &config).is_ok());
    }

    #[test]
    fn out_of_range_alarm_times_are_rejected() {
        let (mut pool, config) = base();
        let data = config.default_modeset;
        let alarm = AlarmEntry {
            days: DaySet::all(),
            hour: 24,
            minute: 0,
            data,
        };
        match &mut pool.get_mut(config.lighting_alarm_table).unwrap().kind {
            ObjectKind::AlarmTable(alarms) => alarms.push(alarm),
            _ => unreachable!(),
        }
        let error = validate(&pool, &config).unwrap_err();
        assert!(matches!(
            error,
            ConfigError::FieldOutOfRange {
                field: "hour",
                value: 24
            }
        ));
    }

    #[test]
    fn dangling_references_are_rejected() {
        let (pool, mut config) = base();
        config.default_modeset = ObjectId(pool.len() + 10);
        assert!(matches!(
            validate(&pool, &config),
            Err(ConfigError::UnknownObject(_))
        ));
    }

    #[test]
    fn wrong_kind_references_are_rejected() {
        let (pool, mut config) = base();
        config.default_modeset = config.lighting_alarm_table;
        assert!(matches!(
            validate(&pool, &config),
            Err(ConfigError::WrongKind { .. })
        ));
    }
}
