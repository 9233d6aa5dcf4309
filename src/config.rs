//! Configuration for xfixes
//!
//! Centralized configuration with sensible defaults.

use crate::protocol::{CLIENT_MAJOR_VERSION, CLIENT_MINOR_VERSION, EXTENSION_NAME, NUMBER_EVENTS};
use crate::registry::ProtocolVersion;

/// Configuration for an [`XFixes`](crate::XFixes) instance
#[derive(Debug, Clone)]
pub struct Config {
    /// Name the extension is looked up under on each connection
    pub extension_name: String,

    /// Version sent in the QueryVersion request
    ///
    /// The server answers with the highest version it supports that is not
    /// newer than this one.
    pub client_version: ProtocolVersion,

    /// Number of consecutive event codes claimed from `first_event`
    pub event_count: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extension_name: EXTENSION_NAME.to_string(),
            client_version: ProtocolVersion::new(CLIENT_MAJOR_VERSION, CLIENT_MINOR_VERSION),
            event_count: NUMBER_EVENTS,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the extension name to query on each connection
    pub fn extension_name(mut self, name: impl Into<String>) -> Self {
        self.config.extension_name = name.into();
        self
    }

    /// Set the version requested during negotiation
    pub fn client_version(mut self, major: u32, minor: u32) -> Self {
        self.config.client_version = ProtocolVersion::new(major, minor);
        self
    }

    /// Set how many event codes get codec hooks installed
    pub fn event_count(mut self, count: u8) -> Self {
        self.config.event_count = count;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
