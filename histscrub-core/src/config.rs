//! Configuration management for `histscrub-core`.
//!
//! This module defines the configuration consumed by the sanitizer: the watch
//! terms, the replacement marker and strategy, and the shape keys of the wire
//! format. It handles YAML (de)serialization and provides utilities for
//! loading, merging, and validating configs.
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::errors::ScrubError;
use crate::matcher::WatchList;
use crate::node::ShapeKeys;
use crate::sanitizer::HistorySanitizer;
use crate::substitute::{Marker, Strategy, DEFAULT_MARKER};

/// File name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".histscrub.yaml";

/// Top-level configuration.
///
/// Unset optional fields fall back to the built-in defaults, both when read
/// through the accessors and when merged over another config.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScrubConfig {
    /// Watch terms, compiled case-insensitively.
    pub watch: Vec<String>,
    /// Text written over matched data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace_with: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<ShapeKeys>,
}

impl ScrubConfig {
    /// Loads a configuration from a YAML file and validates it.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: ScrubConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        info!("Loaded {} watch terms from {}.", config.watch.len(), path.display());
        Ok(config)
    }

    /// Loads the built-in configuration embedded in the library.
    pub fn load_default() -> Result<Self> {
        debug!("Loading default watch terms from embedded string...");
        let default_yaml = include_str!("../config/default_watch.yaml");
        let config: ScrubConfig =
            serde_yml::from_str(default_yaml).context("Failed to parse default watch terms")?;

        debug!("Loaded {} default watch terms.", config.watch.len());
        Ok(config)
    }

    /// Builds the effective configuration: the defaults merged with
    /// `explicit`, or with the first existing candidate file when no explicit
    /// path is given.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let defaults = Self::load_default()?;
        let user = match explicit {
            Some(path) => Some(Self::load_from_file(path)?),
            None => match config_candidate_paths().into_iter().find(|p| p.is_file()) {
                Some(found) => Some(Self::load_from_file(found)?),
                None => {
                    debug!("No user configuration found; using defaults only.");
                    None
                }
            },
        };
        Ok(merge_config(defaults, user))
    }

    pub fn marker_text(&self) -> &str {
        self.replace_with.as_deref().unwrap_or(DEFAULT_MARKER)
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy.unwrap_or_default()
    }

    pub fn shape(&self) -> ShapeKeys {
        self.shape.clone().unwrap_or_default()
    }

    /// Checks shape keys, marker and watch terms.
    pub fn validate(&self) -> Result<(), ScrubError> {
        let mut errors = Vec::new();

        if let Some(shape) = &self.shape {
            if shape.tag_keys.is_empty() {
                errors.push("`shape.tag_keys` must name at least one key.".to_string());
            }
            if shape.tag_keys.iter().any(String::is_empty) {
                errors.push("`shape.tag_keys` contains an empty key.".to_string());
            }
            if shape.payload_key.is_empty() {
                errors.push("`shape.payload_key` cannot be empty.".to_string());
            } else if shape.is_tag_key(&shape.payload_key) {
                errors.push(format!(
                    "`shape.payload_key` '{}' is also a tag key.",
                    shape.payload_key
                ));
            }
        }

        if matches!(self.replace_with.as_deref(), Some("")) {
            errors.push("`replace_with` cannot be empty.".to_string());
        }

        if let Err(e) = WatchList::compile(&self.watch) {
            errors.push(e.to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ScrubError::Config(errors.join("\n")))
        }
    }

    /// Compiles the watch terms into a ready sanitizer.
    pub fn sanitizer(&self) -> Result<HistorySanitizer, ScrubError> {
        let watch = WatchList::compile(&self.watch)?;
        Ok(HistorySanitizer::with_keys(watch, self.shape()))
    }

    /// The configured built-in substitution strategy.
    pub fn substitute(&self) -> Marker {
        Marker::new(self.marker_text(), self.strategy())
    }
}

/// Merges a user configuration over the defaults.
///
/// Watch terms are unioned (default order first, duplicates dropped); the
/// marker, strategy and shape of the user config win when set.
pub fn merge_config(default_config: ScrubConfig, user_config: Option<ScrubConfig>) -> ScrubConfig {
    let Some(user) = user_config else {
        return default_config;
    };
    debug!(
        "Merging {} user watch terms over {} defaults.",
        user.watch.len(),
        default_config.watch.len()
    );

    let mut seen = HashSet::new();
    let watch: Vec<String> = default_config
        .watch
        .into_iter()
        .chain(user.watch)
        .filter(|term| seen.insert(term.clone()))
        .collect();

    ScrubConfig {
        watch,
        replace_with: user.replace_with.or(default_config.replace_with),
        strategy: user.strategy.or(default_config.strategy),
        shape: user.shape.or(default_config.shape),
    }
}

/// Locations searched for a user configuration, in priority order.
pub fn config_candidate_paths() -> Vec<PathBuf> {
    vec![
        Some(PathBuf::from(LOCAL_CONFIG_FILE)),
        dirs::config_dir().map(|p| p.join("histscrub").join("config.yaml")),
        dirs::home_dir().map(|p| p.join(".histscrub").join("config.yaml")),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ScrubConfig::load_default().unwrap();
        assert!(config.watch.iter().any(|t| t == "password"));
        assert_eq!(config.marker_text(), "[FILTERED]");
        assert_eq!(config.strategy(), Strategy::Mask);
        config.validate().unwrap();
    }

    #[test]
    fn test_merge_without_user_config() {
        let defaults = ScrubConfig {
            watch: vec!["a".to_string()],
            ..Default::default()
        };
        assert_eq!(merge_config(defaults.clone(), None), defaults);
    }

    #[test]
    fn test_payload_key_colliding_with_tag_key() {
        let config = ScrubConfig {
            shape: Some(ShapeKeys::new(["$", "a"], "a")),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("also a tag key"));
    }

    #[test]
    fn test_candidate_paths_start_with_local_file() {
        let paths = config_candidate_paths();
        assert_eq!(paths[0], PathBuf::from(LOCAL_CONFIG_FILE));
    }
}
