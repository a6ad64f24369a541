//! Per-session chat settings (model and temperature) and the allowed ranges.
use serde::{Deserialize, Serialize};

use docchat_core::config::Config;
use docchat_core::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSettings {
    pub model: String,
    pub temperature: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureRange {
    pub initial: f32,
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl Default for TemperatureRange {
    fn default() -> Self { Self { initial: 0.0, min: 0.0, max: 1.0, step: 0.1 } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettingsSchema {
    pub models: Vec<String>,
    pub initial_model_index: usize,
    pub temperature: TemperatureRange,
}

impl Default for ChatSettingsSchema {
    fn default() -> Self {
        Self {
            models: ["gpt-4o", "gpt-4o-mini", "gpt-4-turbo", "o1-mini"].iter().map(|m| m.to_string()).collect(),
            initial_model_index: 0,
            temperature: TemperatureRange::default(),
        }
    }
}

impl ChatSettingsSchema {
    /// Schema from the `chat_settings` config key, or the defaults.
    pub fn from_config(config: &Config) -> Result<Self> {
        let schema = config.get_opt::<Self>("chat_settings")?.unwrap_or_default();
        schema.check()?;
        Ok(schema)
    }

    fn check(&self) -> Result<()> {
        if self.models.is_empty() {
            return Err(Error::InvalidConfig("chat_settings.models must not be empty".into()));
        }
        if self.initial_model_index >= self.models.len() {
            return Err(Error::InvalidConfig(format!(
                "chat_settings.initial_model_index {} out of range for {} models",
                self.initial_model_index,
                self.models.len()
            )));
        }
        let t = &self.temperature;
        if !(t.min <= t.initial && t.initial <= t.max) || t.step <= 0.0 {
            return Err(Error::InvalidConfig("chat_settings.temperature range is inconsistent".into()));
        }
        Ok(())
    }

    pub fn initial(&self) -> ChatSettings {
        ChatSettings {
            model: self.models.get(self.initial_model_index).cloned().unwrap_or_default(),
            temperature: self.temperature.initial,
        }
    }

    pub fn validate(&self, settings: &ChatSettings) -> Result<()> {
        if !self.models.iter().any(|m| m == &settings.model) {
            return Err(Error::InvalidSettings(format!("unsupported model '{}'", settings.model)));
        }
        let t = settings.temperature;
        if !t.is_finite() || t < self.temperature.min || t > self.temperature.max {
            return Err(Error::InvalidSettings(format!(
                "temperature {t} outside [{}, {}]",
                self.temperature.min, self.temperature.max
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pick_first_model_and_zero_temperature() {
        let schema = ChatSettingsSchema::default();
        assert!(schema.check().is_ok());
        assert_eq!(schema.initial(), ChatSettings { model: "gpt-4o".into(), temperature: 0.0 });
    }

    #[test]
    fn inconsistent_schema_is_rejected() {
        let schema = ChatSettingsSchema { initial_model_index: 9, ..ChatSettingsSchema::default() };
        assert!(schema.check().is_err());
        let schema = ChatSettingsSchema { models: vec![], ..ChatSettingsSchema::default() };
        assert!(schema.check().is_err());
    }

    #[test]
    fn validate_checks_model_and_range() {
        let schema = ChatSettingsSchema::default();
        assert!(schema.validate(&ChatSettings { model: "o1-mini".into(), temperature: 1.0 }).is_ok());
        assert!(schema.validate(&ChatSettings { model: "gpt-2".into(), temperature: 0.5 }).is_err());
        assert!(schema.validate(&ChatSettings { model: "gpt-4o".into(), temperature: 1.5 }).is_err());
        assert!(schema.validate(&ChatSettings { model: "gpt-4o".into(), temperature: f32::NAN }).is_err());
    }
}
