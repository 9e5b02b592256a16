//! The persisted configuration document.

use std::{fs, path::Path};

use lumen_codec::{decode, encode, ClassDef, CodecValue, Registry, Schema};
use lumen_config::{validate, Config, ConfigError, Pool, CONFIG_CLASS, OBJECT_CLASS};
use lumen_image::Address;

use crate::LumenError;

/// Class id of the settings document.
pub const SETTINGS_CLASS: &str = "lumen_api.Settings";

/// Everything the desktop tooling persists between sessions: the object
/// pool, the root configuration, and the address of the device link.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// The configuration object arena.
    pub objects: Pool,
    /// The root configuration referencing into the pool.
    pub config: Config,
    /// Address of the device's serial link, if one has been chosen.
    pub device_address: Option<String>,
}

impl Settings {
    /// A minimal working document: a default mode set and empty alarm
    /// tables.
    pub fn new() -> Self {
        let mut objects = Pool::new();
        let config = Config::with_defaults(&mut objects);
        Settings {
            objects,
            config,
            device_address: None,
        }
    }

    /// The class registry covering the whole document.
    pub fn registry() -> Registry {
        let mut reg = lumen_config::registry();
        reg.register(ClassDef {
            id: SETTINGS_CLASS,
            base: None,
            fields: vec![
                ("objects", Schema::seq(Schema::Class(OBJECT_CLASS))),
                ("config", Schema::Class(CONFIG_CLASS)),
                ("device_address", Schema::Str),
            ],
        });
        reg
    }

    /// Encode the document as a tagged object value.
    pub fn to_value(&self) -> CodecValue {
        CodecValue::object(
            SETTINGS_CLASS,
            [
                ("objects", self.objects.to_value()),
                ("config", self.config.to_value()),
                (
                    "device_address",
                    CodecValue::from(self.device_address.clone()),
                ),
            ],
        )
    }

    /// Reconstruct the document from a tagged object value.
    pub fn from_value(value: &CodecValue) -> Result<Self, LumenError> {
        let object = value.try_as_object().map_err(ConfigError::from)?;
        if object.class_id != SETTINGS_CLASS {
            return Err(ConfigError::UnexpectedClass {
                expected: SETTINGS_CLASS,
                actual: object.class_id.clone(),
            }
            .into());
        }
        let field = |name: &'static str| {
            object
                .field(name)
                .ok_or_else(|| ConfigError::MissingField(name.to_string()))
        };
        let objects = Pool::from_value(field("objects")?)?;
        let config = Config::from_value(field("config")?)?;
        let device_address = match field("device_address")? {
            CodecValue::None => None,
            value => Some(value.try_as_str().map_err(ConfigError::from)?.to_string()),
        };
        Ok(Settings {
            objects,
            config,
            device_address,
        })
    }

    /// Render the document as a pretty-printed JSON string.
    pub fn to_json_string(&self) -> Result<String, LumenError> {
        let reg = Self::registry();
        let encoded = encode(&self.to_value(), &Schema::Class(SETTINGS_CLASS), &reg)?;
        Ok(lumen_codec::to_json_string(&encoded)?)
    }

    /// Parse a document from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, LumenError> {
        let reg = Self::registry();
        let value = lumen_codec::from_json_str(s)?;
        let decoded = decode(&value, &Schema::Class(SETTINGS_CLASS), &reg)?;
        Self::from_value(&decoded)
    }

    /// Save the document to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LumenError> {
        let json = self.to_json_string()?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a document from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LumenError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Validate the graph and compile it into an EEPROM image.
    pub fn compile(&self, base_address: Address, size_budget: usize) -> Result<Vec<u8>, LumenError> {
        validate(&self.objects, &self.config)?;
        Ok(lumen_image::compile(
            &self.objects,
            &self.config,
            base_address,
            size_budget,
        )?)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_documents_validate_and_compile() {
        let settings = Settings::new();
        assert!(settings.compile(Address(0), 1024).is_ok());
    }

    #[test]
    fn the_device_address_survives_a_round_trip_as_null_or_string() {
        let mut settings = Settings::new();
        let json = settings.to_json_string().unwrap();
        assert!(json.contains("\"device_address\": null"));
        assert_eq!(Settings::from_json_str(&json).unwrap(), settings);

        settings.device_address = Some("00:0A:95:9D:68:16".to_string());
        let json = settings.to_json_string().unwrap();
        let back = Settings::from_json_str(&json).unwrap();
        assert_eq!(back.device_address.as_deref(), Some("00:0A:95:9D:68:16"));
    }

    #[test]
    fn documents_with_a_foreign_class_tag_are_rejected() {
        let value = CodecValue::object("lumen_api.Themes", [("objects", CodecValue::Seq(vec![]))]);
        assert!(matches!(
            Settings::from_value(&value),
            Err(LumenError::ConfigError(ConfigError::UnexpectedClass { .. }))
        ));
    }
}
