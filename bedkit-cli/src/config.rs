use std::fs::read_to_string;
use std::path::Path;

use bedkit_ranges::{BackendKind, IntersectOptions};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

///
/// `[intersect]` table. Unset keys leave the built-in defaults in place.
///
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct IntersectConfig {
    pub wa: Option<bool>,
    pub wb: Option<bool>,
    pub wo: Option<bool>,
    pub v: Option<bool>,
    pub f: Option<f64>,
    pub backend: Option<BackendKind>,
}

impl IntersectConfig {
    /// Layer the file's values over `base`.
    pub fn apply(&self, base: IntersectOptions) -> IntersectOptions {
        IntersectOptions {
            wa: self.wa.unwrap_or(base.wa),
            wb: self.wb.unwrap_or(base.wb),
            wo: self.wo.unwrap_or(base.wo),
            v: self.v.unwrap_or(base.v),
            f: self.f.unwrap_or(base.f),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SummaryConfig {
    pub genome_size: Option<u64>,
}

///
/// Defaults read from a TOML file; command line flags win over them.
///
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BedkitConfig {
    pub intersect: IntersectConfig,
    pub summary: SummaryConfig,
}

impl TryFrom<&Path> for BedkitConfig {
    type Error = ConfigError;

    fn try_from(path: &Path) -> ConfigResult<Self> {
        let toml_str = read_to_string(path)?;
        let config = toml::from_str(&toml_str)?;
        Ok(config)
    }
}
