//! Join configuration from doctoc.toml

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::toc_model::normalize;

/// Configuration grafting reference TOCs into slots of top-level TOCs.
///
/// ```toml
/// [[join]]
/// reference_toc = "api/TOC.yml"
/// top_level_toc = "nav/TOC.yml"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JoinConfig {
    /// Join entries in authored order
    #[serde(default, rename = "join")]
    pub joins: Vec<JoinEntry>,
}

/// One join declaration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JoinEntry {
    /// Path of the reference TOC whose top-level items are grafted.
    /// Entries without one are ignored.
    pub reference_toc: Option<String>,

    /// Path of the top-level TOC receiving the grafted items
    pub top_level_toc: Option<String>,
}

impl JoinConfig {
    /// Load configuration from a TOML file
    ///
    /// # Parameters
    /// * `path` - Path to the join configuration file
    ///
    /// # Returns
    /// * `Ok(JoinConfig)` - Successfully loaded configuration
    /// * `Err(JoinConfigError)` - Error reading or parsing the file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, JoinConfigError> {
        let content = fs::read_to_string(&path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Index entries by their normalized reference path.
    ///
    /// The first entry for a path wins; entries without a reference path are
    /// dropped.
    pub(crate) fn index(&self) -> HashMap<String, Option<String>> {
        let mut index = HashMap::new();
        for entry in &self.joins {
            let Some(reference_toc) = &entry.reference_toc else {
                continue;
            };
            index
                .entry(normalize(reference_toc))
                .or_insert_with(|| entry.top_level_toc.clone());
        }
        index
    }
}

/// Errors that can occur when loading join configuration
#[derive(Error, Debug)]
pub enum JoinConfigError {
    #[error("IO error reading join configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error in join configuration: {0}")]
    Parse(#[from] toml::de::Error),
}
