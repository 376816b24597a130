use crate::{
    conf::{DataConfig, ServerConfig},
    core::StatsError::{self, ConfigParsingError},
};
use config::{Config as CConfig, ConfigBuilder, Environment, FileFormat, builder::DefaultState};
use serde::{Deserialize, Serialize};

const ENV_PREFIX: &str = "CARSTATS";
const PORT_VAR: &str = "PORT";

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub data: DataConfig,
}

impl Config {
    pub fn from_str(toml_str: &str) -> Result<Config, StatsError> {
        let builder = CConfig::builder()
            .add_source(config::File::from_str(toml_str, FileFormat::Toml));
        Self::build(builder)
    }

    /// Defaults, then the optional TOML file, then `CARSTATS_*` variables
    /// (`CARSTATS_SERVER__PORT=8000`), then the bare `PORT` variable.
    pub fn load(path: Option<&str>) -> Result<Config, StatsError> {
        let mut builder = CConfig::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::new(path, FileFormat::Toml));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );
        let mut config = Self::build(builder)?;
        config.apply_port_override(std::env::var(PORT_VAR).ok().as_deref())?;
        Ok(config)
    }

    pub fn apply_port_override(&mut self, port: Option<&str>) -> Result<(), StatsError> {
        if let Some(raw) = port {
            self.server.port = raw
                .trim()
                .parse()
                .map_err(|e| ConfigParsingError(format!("{PORT_VAR}={raw}: {e}")))?;
        }
        Ok(())
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Config, StatsError> {
        let config = builder
            .build()
            .map_err(|e| ConfigParsingError(e.to_string()))?
            .try_deserialize::<Config>()
            .map_err(|e| ConfigParsingError(e.to_string()))?;
        Ok(config)
    }
}
