//! YAML configuration for metadata generation.
//!
//! # Example YAML
//!
//! ```yaml
//! defaults:
//!   maintainer: Bobo T. Clown
//!   maintainer_email: bobo@clown.co
//!   license: Clown License v1
//! recipes_dir: recipes
//! recipe_extension: rb
//! ```
//!
//! Every key is optional; missing keys take the built-in values.

use std::io::{BufReader, BufWriter};
use std::path::Path;

use cookbook_metadata_core::MetadataDefaults;
use serde::{Deserialize, Serialize};

use crate::error::{CliError, Result};

/// Directory, relative to the cookbook root, that holds recipe files.
pub const DEFAULT_RECIPES_DIR: &str = "recipes";
/// Extension of recipe files.
pub const DEFAULT_RECIPE_EXTENSION: &str = "rb";

/// Settings for `cookbook-meta generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Authorship applied to newly generated metadata.
    pub defaults: MetadataDefaults,
    pub recipes_dir: String,
    /// Matched without the leading dot.
    pub recipe_extension: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            defaults: MetadataDefaults::default(),
            recipes_dir: DEFAULT_RECIPES_DIR.to_string(),
            recipe_extension: DEFAULT_RECIPE_EXTENSION.to_string(),
        }
    }
}

impl CliConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Io`] if the file cannot be read, or
    /// [`CliError::Yaml`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|err| CliError::io(path, err))?;
        let config = serde_yaml::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|err| CliError::io(path, err))?;
        serde_yaml::to_writer(BufWriter::new(file), self)?;
        Ok(())
    }
}
