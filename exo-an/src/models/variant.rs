//! Model variants
//!
//! A variant names a model family ("tess" or "kepler"). It selects the
//! ordered feature schema, the human-readable feature names, and the trained
//! artifact on disk.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Model family selected per request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelVariant {
    /// TESS Objects of Interest model (default)
    #[default]
    Tess,
    /// Kepler Objects of Interest model
    Kepler,
}

impl ModelVariant {
    /// Lowercase identifier used on the wire and in artifact file names
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelVariant::Tess => "tess",
            ModelVariant::Kepler => "kepler",
        }
    }

    /// Artifact file name: `modelo_<variant>_exoplanetas.json`
    pub fn artifact_file_name(&self) -> String {
        format!("modelo_{}_exoplanetas.json", self.as_str())
    }

    /// All variants, in registry order
    pub fn all() -> &'static [ModelVariant] {
        &[ModelVariant::Tess, ModelVariant::Kepler]
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelVariant {
    type Err = exo_common::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tess" => Ok(ModelVariant::Tess),
            "kepler" => Ok(ModelVariant::Kepler),
            other => Err(exo_common::Error::InvalidInput(format!(
                "Unknown model variant '{}' (expected \"tess\" or \"kepler\")",
                other
            ))),
        }
    }
}
