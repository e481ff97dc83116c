use crate::metric::TagSet;
use anyhow::{anyhow, Context, Error};
use log::trace;
use serde::Deserialize;
use std::path::Path;
use std::time::Instant;

pub const DEFAULT_HOST: &str = "localhost";

/// Port of Telegraf's UDP line-protocol listener.
pub const DEFAULT_PORT: u16 = 8092;

pub const HOST_ENV_VAR: &str = "telegraf_host";
pub const PORT_ENV_VAR: &str = "telegraf_port";
pub const TAGS_ENV_VAR: &str = "telegraf_tags";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub tags: TagSet,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            tags: TagSet::new(),
        }
    }
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        ClientConfig {
            host: host.into(),
            port,
            tags: TagSet::new(),
        }
    }

    pub fn with_tags<I, K, V>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        self.tags
            .extend(tags.into_iter().map(|(key, value)| (key.into(), value.to_string())));
        self
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).context("Failed to parse client configuration")
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json_str(&contents)
            .with_context(|| format!("Invalid config in {}", path.display()))
    }

    /// Defaults overlaid with whatever `telegraf_host`, `telegraf_port` and
    /// `telegraf_tags` define.
    pub fn from_env() -> Result<Self, Error> {
        Self::default().merge_env()
    }

    /// Overlays the environment variables that are set onto `self`. Tags
    /// from the environment are merged over the existing ones.
    pub fn merge_env(mut self) -> Result<Self, Error> {
        let function_start = Instant::now();

        if let Ok(host) = std::env::var(HOST_ENV_VAR) {
            self.host = host;
        }

        if let Ok(port) = std::env::var(PORT_ENV_VAR) {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("{} is not a valid port: {}", PORT_ENV_VAR, port))?;
        }

        if let Ok(tags) = std::env::var(TAGS_ENV_VAR) {
            self.tags.extend(parse_tag_list(&tags)?);
        }

        trace!("merge_env duration: {:?}", function_start.elapsed());
        Ok(self)
    }
}

/// Parses a single `key=value` pair. The value may itself contain `=`.
pub fn parse_tag(pair: &str) -> Result<(String, String), Error> {
    match pair.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(anyhow!("Tag must be of the form key=value: {}", pair)),
    }
}

/// Parses `key=value,key2=value2`. Blank entries are skipped.
pub fn parse_tag_list(tags: &str) -> Result<TagSet, Error> {
    tags.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(parse_tag)
        .collect()
}

#[cfg(test)]
pub mod tests;
