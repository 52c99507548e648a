//! Session configuration.
//!
//! A session is named, declares its node kinds up front, and may replace the
//! default association table wholesale. The endpoint block is carried for
//! remote record stores and is never interpreted by the engine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::{is_sanitized, Association, LinkClass};
use crate::{Error, Result};

/// Graph name used when a config does not set one.
pub const DEFAULT_SESSION_NAME: &str = "semantic_spacetime";

fn default_name() -> String {
    DEFAULT_SESSION_NAME.to_string()
}

/// Address and credentials of a backing store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Everything needed to open a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<Endpoint>,
    /// Node partitions to provision. Nodes of any other kind are rejected.
    pub node_kinds: Vec<String>,
    /// Full replacement for the default association table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub associations: Option<Vec<Association>>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            endpoint: None,
            node_kinds: Vec::new(),
            associations: None,
        }
    }
}

impl SessionConfig {
    /// A config declaring `node_kinds`, with defaults for everything else.
    pub fn new<I, K>(node_kinds: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            node_kinds: node_kinds.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_endpoint(
        mut self,
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.endpoint = Some(Endpoint {
            url: url.into(),
            username: username.into(),
            password: password.into(),
        });
        self
    }

    pub fn with_associations(mut self, table: impl IntoIterator<Item = Association>) -> Self {
        self.associations = Some(table.into_iter().collect());
        self
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check the config can be provisioned.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::Config("session name is empty".into()));
        }
        if self.node_kinds.is_empty() {
            return Err(Error::Config("no node kinds declared".into()));
        }
        let mut seen = Vec::with_capacity(self.node_kinds.len());
        for kind in &self.node_kinds {
            if kind.is_empty() || !is_sanitized(kind) {
                return Err(Error::Config(format!("node kind {kind:?} is not a legal partition name")));
            }
            if LinkClass::ALL.iter().any(|c| c.name() == kind.as_str()) {
                return Err(Error::Config(format!("node kind {kind:?} clashes with a link partition")));
            }
            if seen.contains(&kind) {
                return Err(Error::Config(format!("node kind {kind:?} declared twice")));
            }
            seen.push(kind);
        }
        Ok(())
    }

    pub fn has_kind(&self, kind: &str) -> bool {
        self.node_kinds.iter().any(|k| k == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SemanticType;

    #[test]
    fn test_from_json_defaults() {
        let config = SessionConfig::from_json_str(r#"{"node_kinds": ["Node", "Hub"]}"#).unwrap();
        assert_eq!(config.name, DEFAULT_SESSION_NAME);
        assert!(config.endpoint.is_none());
        assert!(config.associations.is_none());
        assert!(config.has_kind("Hub"));
    }

    #[test]
    fn test_from_json_full() {
        let config = SessionConfig::from_json_str(
            r#"{
                "name": "nation_spacetime",
                "endpoint": {"url": "http://localhost:8529", "username": "root"},
                "node_kinds": ["Node", "Fragment", "Hub"],
                "associations": [
                    {"_key": "near", "stype": 0, "fwd": "is near", "bwd": "is near",
                     "nfwd": "is not near", "nbwd": "is not near"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(config.name, "nation_spacetime");
        assert_eq!(config.endpoint.as_ref().unwrap().password, "");
        let table = config.associations.unwrap();
        assert_eq!(table[0].semantic_type, SemanticType::NEAR);
    }

    #[test]
    fn test_validate_rejects_bad_kinds() {
        for kinds in [vec![], vec!["Near"], vec!["My Kind"], vec!["Node", "Node"], vec![""]] {
            let config = SessionConfig::new(kinds.clone());
            assert!(matches!(config.validate(), Err(Error::Config(_))), "{kinds:?}");
        }
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let config = SessionConfig::new(["Node"]).with_name("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_codec_error() {
        assert!(matches!(SessionConfig::from_json_str("{"), Err(Error::Codec(_))));
    }
}
