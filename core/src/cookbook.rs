//! The owning cookbook as seen by its metadata, plus authorship defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Built-in maintainer used when none is supplied.
pub const DEFAULT_MAINTAINER: &str = "Your Name";
/// Built-in maintainer email used when none is supplied.
pub const DEFAULT_MAINTAINER_EMAIL: &str = "youremail@example.com";
/// Built-in license used when none is supplied.
pub const DEFAULT_LICENSE: &str = "Apache v2.0";

/// Recipe file stem that names the cookbook's default recipe.
pub const DEFAULT_RECIPE: &str = "default";

/// A cookbook's identity and the recipe files discovered for it.
///
/// Discovery itself happens elsewhere; this only carries its result.
///
/// # Examples
///
/// ```
/// use cookbook_metadata_core::Cookbook;
///
/// let cookbook = Cookbook::new("test_cookbook")
///     .with_recipe_files(["default.rb", "enlighten.rb"]);
/// assert_eq!(
///     cookbook.recipe_names(),
///     vec!["test_cookbook", "test_cookbook::enlighten"]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cookbook {
    pub name: String,
    /// Recipe source filenames, in discovery order.
    pub recipe_files: Vec<String>,
}

impl Cookbook {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            recipe_files: Vec::new(),
        }
    }

    pub fn with_recipe_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recipe_files = files.into_iter().map(Into::into).collect();
        self
    }

    /// Qualified recipe names for every recipe file, in discovery order.
    pub fn recipe_names(&self) -> Vec<String> {
        self.recipe_files
            .iter()
            .map(|file| recipe_name(&self.name, file))
            .collect()
    }
}

/// Derives the qualified recipe name for a recipe file.
///
/// The file stem `default` names the cookbook itself; any other stem `x`
/// becomes `cookbook::x`.
///
/// # Examples
///
/// ```
/// use cookbook_metadata_core::recipe_name;
///
/// assert_eq!(recipe_name("apache2", "default.rb"), "apache2");
/// assert_eq!(recipe_name("apache2", "recipes/mod_ssl.rb"), "apache2::mod_ssl");
/// ```
pub fn recipe_name(cookbook: &str, file: &str) -> String {
    let stem = Path::new(file)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(file);

    if stem == DEFAULT_RECIPE {
        cookbook.to_string()
    } else {
        format!("{cookbook}::{stem}")
    }
}

/// Authorship fields applied when metadata is first created.
///
/// Every field is optional in serialized form and falls back to the
/// built-in placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataDefaults {
    pub maintainer: String,
    pub maintainer_email: String,
    pub license: String,
}

impl Default for MetadataDefaults {
    fn default() -> Self {
        Self {
            maintainer: DEFAULT_MAINTAINER.to_string(),
            maintainer_email: DEFAULT_MAINTAINER_EMAIL.to_string(),
            license: DEFAULT_LICENSE.to_string(),
        }
    }
}

impl MetadataDefaults {
    pub fn with_maintainer(mut self, maintainer: impl Into<String>) -> Self {
        self.maintainer = maintainer.into();
        self
    }

    pub fn with_maintainer_email(mut self, maintainer_email: impl Into<String>) -> Self {
        self.maintainer_email = maintainer_email.into();
        self
    }

    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = license.into();
        self
    }
}
