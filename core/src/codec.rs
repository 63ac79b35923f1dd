//! Conversion between [`PackageMetadata`] and its structured document form.
//!
//! A document is a mapping with the keys `name`, `description`,
//! `long_description`, `maintainer`, `maintainer_email`, `license`,
//! `version`, `platforms`, the six relation tables (`dependencies`,
//! `recommendations`, `suggestions`, `conflicting`, `providing`,
//! `replacing`), `attributes` and `recipes`.
//!
//! Decoding does not trust the document: it starts from a fresh
//! [`PackageMetadata`] and replays every field through the same declaration
//! calls a cookbook author would use, so all constraint and attribute checks
//! apply. Only `name` is required.
//!
//! # Example
//!
//! ```
//! use cookbook_metadata_core::{codec, Cookbook, PackageMetadata};
//!
//! let mut meta = PackageMetadata::new(&Cookbook::new("apache2").with_recipe_files(["default.rb"]));
//! meta.depends("logrotate", [">= 1.0"]).unwrap();
//!
//! let json = codec::to_json(&meta).unwrap();
//! let decoded = codec::from_json(&json).unwrap();
//! assert_eq!(decoded, meta);
//! assert_eq!(decoded.dependencies()["logrotate"], vec![">= 1.0"]);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

use crate::attribute::AttributeSchema;
use crate::error::{MetadataError, Result};
use crate::metadata::PackageMetadata;
use crate::relation::RelationKind;

type Table = BTreeMap<String, Vec<String>>;

#[derive(Serialize)]
struct DocumentRef<'a> {
    name: &'a str,
    description: &'a str,
    long_description: &'a str,
    maintainer: &'a str,
    maintainer_email: &'a str,
    license: &'a str,
    version: &'a str,
    platforms: &'a Table,
    dependencies: &'a Table,
    recommendations: &'a Table,
    suggestions: &'a Table,
    conflicting: &'a Table,
    providing: &'a Table,
    replacing: &'a Table,
    attributes: &'a BTreeMap<String, AttributeSchema>,
    recipes: &'a BTreeMap<String, String>,
}

impl<'a> From<&'a PackageMetadata> for DocumentRef<'a> {
    fn from(metadata: &'a PackageMetadata) -> Self {
        Self {
            name: metadata.name(),
            description: metadata.description(),
            long_description: metadata.long_description(),
            maintainer: metadata.maintainer(),
            maintainer_email: metadata.maintainer_email(),
            license: metadata.license(),
            version: metadata.version(),
            platforms: metadata.platforms(),
            dependencies: metadata.dependencies(),
            recommendations: metadata.recommendations(),
            suggestions: metadata.suggestions(),
            conflicting: metadata.conflicting(),
            providing: metadata.providing(),
            replacing: metadata.replacing(),
            attributes: metadata.attributes(),
            recipes: metadata.recipes(),
        }
    }
}

#[derive(Deserialize)]
struct Document {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    long_description: Option<String>,
    #[serde(default)]
    maintainer: Option<String>,
    #[serde(default)]
    maintainer_email: Option<String>,
    #[serde(default)]
    license: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    platforms: Table,
    #[serde(default)]
    dependencies: Table,
    #[serde(default)]
    recommendations: Table,
    #[serde(default)]
    suggestions: Table,
    #[serde(default)]
    conflicting: Table,
    #[serde(default)]
    providing: Table,
    #[serde(default)]
    replacing: Table,
    #[serde(default)]
    attributes: BTreeMap<String, Value>,
    #[serde(default)]
    recipes: BTreeMap<String, String>,
}

impl Document {
    fn relation(&mut self, kind: RelationKind) -> Table {
        let table = match kind {
            RelationKind::Depends => &mut self.dependencies,
            RelationKind::Recommends => &mut self.recommendations,
            RelationKind::Suggests => &mut self.suggestions,
            RelationKind::Conflicts => &mut self.conflicting,
            RelationKind::Provides => &mut self.providing,
            RelationKind::Replaces => &mut self.replacing,
        };
        std::mem::take(table)
    }

    fn into_metadata(mut self) -> Result<PackageMetadata> {
        let mut metadata = PackageMetadata::named(&self.name);

        if let Some(description) = self.description.take() {
            metadata.set_description(description);
        }
        if let Some(long_description) = self.long_description.take() {
            metadata.set_long_description(long_description);
        }
        if let Some(maintainer) = self.maintainer.take() {
            metadata.set_maintainer(maintainer);
        }
        if let Some(maintainer_email) = self.maintainer_email.take() {
            metadata.set_maintainer_email(maintainer_email);
        }
        if let Some(license) = self.license.take() {
            metadata.set_license(license);
        }
        if let Some(version) = self.version.take() {
            metadata.set_version(version);
        }

        for (platform, expressions) in std::mem::take(&mut self.platforms) {
            metadata.supports(&platform, expressions)?;
        }

        // Provisions replay before recipes so recipe registration finds
        // them and does not add a second unconditional entry.
        for kind in RelationKind::ALL {
            for (name, expressions) in self.relation(kind) {
                metadata.declare(kind, &name, expressions)?;
            }
        }

        for (path, options) in &self.attributes {
            metadata.attribute_from_value(path, options)?;
        }

        for (recipe, description) in std::mem::take(&mut self.recipes) {
            metadata.declare_recipe(&recipe, description);
        }

        debug!(
            cookbook = %metadata.name(),
            recipes = metadata.recipes().len(),
            attributes = metadata.attributes().len(),
            "decoded metadata document"
        );
        Ok(metadata)
    }
}

impl Serialize for PackageMetadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        DocumentRef::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PackageMetadata {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Document::deserialize(deserializer)?
            .into_metadata()
            .map_err(serde::de::Error::custom)
    }
}

/// Encodes metadata as a structured JSON value.
///
/// # Errors
///
/// Returns [`MetadataError::Json`] if serialization fails.
pub fn to_value(metadata: &PackageMetadata) -> Result<Value> {
    Ok(serde_json::to_value(DocumentRef::from(metadata))?)
}

/// Rebuilds metadata from a structured JSON value.
///
/// Absent optional fields keep their defaults.
///
/// # Errors
///
/// Returns [`MetadataError::InvalidDocument`] if the value does not have
/// the document shape (for example a missing `name` or a table that is not
/// a mapping of string lists), and the usual declaration errors if a
/// recorded constraint or attribute option is invalid.
pub fn from_value(value: &Value) -> Result<PackageMetadata> {
    let document = Document::deserialize(value)
        .map_err(|err| MetadataError::InvalidDocument(err.to_string()))?;
    document.into_metadata()
}

/// Encodes metadata as compact JSON text.
pub fn to_json(metadata: &PackageMetadata) -> Result<String> {
    Ok(serde_json::to_string(&DocumentRef::from(metadata))?)
}

/// Encodes metadata as indented JSON text.
pub fn to_json_pretty(metadata: &PackageMetadata) -> Result<String> {
    Ok(serde_json::to_string_pretty(&DocumentRef::from(metadata))?)
}

/// Parses JSON text and rebuilds metadata from it. See [`from_value`].
pub fn from_json(json: &str) -> Result<PackageMetadata> {
    let value: Value = serde_json::from_str(json)?;
    from_value(&value)
}
