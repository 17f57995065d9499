use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

/// Page size ceiling used when none is configured.
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 1000;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("invalid contract config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("max_page_size must be positive")]
    ZeroMaxPageSize,
}

///
/// ContractConfig
///
/// Host-supplied contract settings, loaded from TOML:
///
/// ```toml
/// debug = true
/// max_page_size = 200
/// ```
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContractConfig {
    /// Print `[debug]` lines for every invocation.
    pub debug: bool,

    /// Largest page size accepted by the paginated queries.
    pub max_page_size: u32,
}

impl ContractConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_page_size == 0 {
            return Err(ConfigError::ZeroMaxPageSize);
        }

        Ok(())
    }
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            debug: false,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }
}
