use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up by [`ValidationConfig::load`].
pub const CONFIG_FILE: &str = "ledger.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config encode: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Limits applied by the constraint machine to every run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Upper bound on consumed particles and, separately, produced particles.
    pub max_particles_per_side: usize,
    /// Reject particles carrying a zero amount.
    pub reject_zero_amounts: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_particles_per_side: 1024,
            reject_zero_amounts: true,
        }
    }
}

impl ValidationConfig {
    /// Read `<dir>/ledger.toml`, falling back to defaults when it is absent.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = dir.as_ref().join(CONFIG_FILE);
        match fs::read_to_string(&path) {
            Ok(text) => Self::from_toml_str(&text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn save(&self, dir: impl AsRef<Path>) -> Result<(), ConfigError> {
        fs::create_dir_all(dir.as_ref())?;
        let data = toml::to_string(self)?;
        fs::write(dir.as_ref().join(CONFIG_FILE), data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let cfg = ValidationConfig::from_toml_str("max_particles_per_side = 8\n").unwrap();
        assert_eq!(cfg.max_particles_per_side, 8);
        assert!(cfg.reject_zero_amounts);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let err = ValidationConfig::from_toml_str("max_particles_per_side = \"lots\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
