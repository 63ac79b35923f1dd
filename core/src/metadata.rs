//! Cookbook metadata: identity, platform support, relations, attributes and
//! recipes.
//!
//! [`PackageMetadata`] is created once per cookbook and then filled in by a
//! sequence of declaration calls. Every setter validates before it stores
//! and returns the value now recorded, so calls can be checked inline.
//!
//! # Example
//!
//! ```
//! use cookbook_metadata_core::{AttributeOptions, Cookbook, PackageMetadata};
//!
//! let cookbook = Cookbook::new("test_cookbook")
//!     .with_recipe_files(["default.rb", "enlighten.rb"]);
//! let mut meta = PackageMetadata::new(&cookbook);
//!
//! meta.set_version("1.0");
//! meta.supports("ubuntu", [">= 8.04"]).unwrap();
//! meta.depends("bobo", ["= 1.0"]).unwrap();
//! meta.attribute("bizspark/has_login", AttributeOptions::new().display_name("You have nothing"));
//!
//! assert_eq!(meta.name(), "test_cookbook");
//! assert_eq!(meta.recipe("test_cookbook::enlighten"), Some(""));
//! assert!(meta.providing().contains_key("test_cookbook"));
//! assert_eq!(meta.platforms()["ubuntu"], vec![">= 8.04"]);
//! ```

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, warn};

use crate::attribute::{AttributeOptions, AttributeSchema};
use crate::cookbook::{Cookbook, MetadataDefaults};
use crate::error::{MetadataError, Result};
use crate::relation::{ConstraintTable, DependencyRegistry, RelationKind};
use crate::version::Version;

/// Version recorded until one is set.
pub const DEFAULT_VERSION: &str = "0.0.0";

/// Metadata for one cookbook.
///
/// Equality compares the serializable field set only; the owning
/// [`Cookbook`] reference is not part of it.
#[derive(Debug, Clone)]
pub struct PackageMetadata {
    cookbook: Option<Cookbook>,
    name: String,
    description: String,
    long_description: String,
    maintainer: String,
    maintainer_email: String,
    license: String,
    version: String,
    platforms: ConstraintTable,
    relations: DependencyRegistry,
    attributes: BTreeMap<String, AttributeSchema>,
    recipes: BTreeMap<String, String>,
}

impl PackageMetadata {
    /// Creates metadata for `cookbook` with the built-in authorship defaults.
    pub fn new(cookbook: &Cookbook) -> Self {
        Self::with_defaults(cookbook, MetadataDefaults::default())
    }

    /// Creates metadata for `cookbook`, registering every discovered recipe.
    ///
    /// Each recipe gets an empty description and an unconditional
    /// `providing` entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use cookbook_metadata_core::{Cookbook, MetadataDefaults, PackageMetadata};
    ///
    /// let defaults = MetadataDefaults::default()
    ///     .with_maintainer("Bobo T. Clown")
    ///     .with_maintainer_email("bobo@clown.co")
    ///     .with_license("Clown License v1");
    /// let meta = PackageMetadata::with_defaults(&Cookbook::new("circus"), defaults);
    /// assert_eq!(meta.maintainer(), "Bobo T. Clown");
    /// assert_eq!(meta.license(), "Clown License v1");
    /// ```
    pub fn with_defaults(cookbook: &Cookbook, defaults: MetadataDefaults) -> Self {
        let mut metadata = Self::blank(&cookbook.name, defaults);
        metadata.cookbook = Some(cookbook.clone());

        for recipe in cookbook.recipe_names() {
            metadata.register_recipe(&recipe);
        }

        debug!(
            cookbook = %cookbook.name,
            recipes = metadata.recipes.len(),
            "initialized cookbook metadata"
        );
        metadata
    }

    /// Creates metadata with no owning cookbook, as when decoding a
    /// document.
    pub fn named(name: impl Into<String>) -> Self {
        Self::blank(&name.into(), MetadataDefaults::default())
    }

    fn blank(name: &str, defaults: MetadataDefaults) -> Self {
        Self {
            cookbook: None,
            name: name.to_string(),
            description: String::new(),
            long_description: String::new(),
            maintainer: defaults.maintainer,
            maintainer_email: defaults.maintainer_email,
            license: defaults.license,
            version: DEFAULT_VERSION.to_string(),
            platforms: ConstraintTable::new(),
            relations: DependencyRegistry::new(),
            attributes: BTreeMap::new(),
            recipes: BTreeMap::new(),
        }
    }

    /// The cookbook this metadata was created for, if any.
    pub fn cookbook(&self) -> Option<&Cookbook> {
        self.cookbook.as_ref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &str {
        self.name = name.into();
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &str {
        self.description = description.into();
        &self.description
    }

    pub fn long_description(&self) -> &str {
        &self.long_description
    }

    pub fn set_long_description(&mut self, long_description: impl Into<String>) -> &str {
        self.long_description = long_description.into();
        &self.long_description
    }

    pub fn maintainer(&self) -> &str {
        &self.maintainer
    }

    pub fn set_maintainer(&mut self, maintainer: impl Into<String>) -> &str {
        self.maintainer = maintainer.into();
        &self.maintainer
    }

    pub fn maintainer_email(&self) -> &str {
        &self.maintainer_email
    }

    pub fn set_maintainer_email(&mut self, maintainer_email: impl Into<String>) -> &str {
        self.maintainer_email = maintainer_email.into();
        &self.maintainer_email
    }

    pub fn license(&self) -> &str {
        &self.license
    }

    pub fn set_license(&mut self, license: impl Into<String>) -> &str {
        self.license = license.into();
        &self.license
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Sets the cookbook version.
    ///
    /// Any string is accepted; a version that is not dotted-numeric is
    /// logged, and will fail only when compared.
    pub fn set_version(&mut self, version: impl Into<String>) -> &str {
        self.version = version.into();
        if let Err(err) = Version::parse(&self.version) {
            warn!(cookbook = %self.name, %err, "cookbook version is not dotted-numeric");
        }
        &self.version
    }

    /// Declares support for `platform` under the given constraints.
    ///
    /// Repeated calls for one platform append. No constraints means any
    /// version of the platform.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::InvalidConstraintExpression`] if any
    /// expression is malformed; nothing is recorded in that case.
    pub fn supports<I, S>(&mut self, platform: &str, expressions: I) -> Result<&[String]>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.platforms.declare(platform, expressions)
    }

    /// Platform support table.
    pub fn platforms(&self) -> &BTreeMap<String, Vec<String>> {
        self.platforms.entries()
    }

    /// Checks whether `version` of `platform` is supported.
    ///
    /// A cookbook that declares no platforms supports every platform.
    /// Otherwise the platform must be declared and every one of its
    /// constraints must accept `version`.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::InvalidVersionFormat`] if `version` is not
    /// dotted-numeric and the platform is declared.
    pub fn supports_platform(&self, platform: &str, version: &str) -> Result<bool> {
        if self.platforms.is_empty() {
            return Ok(true);
        }
        Ok(self.platforms.check(platform, version)?.unwrap_or(false))
    }

    /// Declares a relation of `kind` on the cookbook `name`.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::InvalidConstraintExpression`] if any
    /// expression is malformed; the table is unchanged in that case.
    pub fn declare<I, S>(
        &mut self,
        kind: RelationKind,
        name: &str,
        expressions: I,
    ) -> Result<&[String]>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.relations.declare(kind, name, expressions)
    }

    /// Table for one relation kind.
    pub fn relation(&self, kind: RelationKind) -> &ConstraintTable {
        self.relations.table(kind)
    }

    pub fn relations(&self) -> &DependencyRegistry {
        &self.relations
    }

    pub fn depends<I, S>(&mut self, name: &str, expressions: I) -> Result<&[String]>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.declare(RelationKind::Depends, name, expressions)
    }

    pub fn recommends<I, S>(&mut self, name: &str, expressions: I) -> Result<&[String]>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.declare(RelationKind::Recommends, name, expressions)
    }

    pub fn suggests<I, S>(&mut self, name: &str, expressions: I) -> Result<&[String]>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.declare(RelationKind::Suggests, name, expressions)
    }

    pub fn conflicts<I, S>(&mut self, name: &str, expressions: I) -> Result<&[String]>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.declare(RelationKind::Conflicts, name, expressions)
    }

    pub fn provides<I, S>(&mut self, name: &str, expressions: I) -> Result<&[String]>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.declare(RelationKind::Provides, name, expressions)
    }

    pub fn replaces<I, S>(&mut self, name: &str, expressions: I) -> Result<&[String]>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.declare(RelationKind::Replaces, name, expressions)
    }

    pub fn dependencies(&self) -> &BTreeMap<String, Vec<String>> {
        self.relation(RelationKind::Depends).entries()
    }

    pub fn recommendations(&self) -> &BTreeMap<String, Vec<String>> {
        self.relation(RelationKind::Recommends).entries()
    }

    pub fn suggestions(&self) -> &BTreeMap<String, Vec<String>> {
        self.relation(RelationKind::Suggests).entries()
    }

    pub fn conflicting(&self) -> &BTreeMap<String, Vec<String>> {
        self.relation(RelationKind::Conflicts).entries()
    }

    pub fn providing(&self) -> &BTreeMap<String, Vec<String>> {
        self.relation(RelationKind::Provides).entries()
    }

    pub fn replacing(&self) -> &BTreeMap<String, Vec<String>> {
        self.relation(RelationKind::Replaces).entries()
    }

    /// Records the schema for attribute `path`, replacing any earlier one,
    /// and returns it with defaults filled in.
    pub fn attribute(&mut self, path: &str, options: AttributeOptions) -> &AttributeSchema {
        let schema = options.resolve();
        debug!(path, ?schema, "declared attribute");
        self.attributes.insert(path.to_string(), schema);
        &self.attributes[path]
    }

    /// Validates untyped options and records the resulting schema.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::InvalidAttributeOption`] if an option has
    /// the wrong type; no schema is recorded in that case.
    pub fn attribute_from_value(
        &mut self,
        path: &str,
        options: &Value,
    ) -> Result<&AttributeSchema> {
        let options = AttributeOptions::from_value(path, options)
            .inspect_err(|err| warn!(path, %err, "rejected attribute options"))?;
        Ok(self.attribute(path, options))
    }

    pub fn attributes(&self) -> &BTreeMap<String, AttributeSchema> {
        &self.attributes
    }

    /// Recipe name to description.
    pub fn recipes(&self) -> &BTreeMap<String, String> {
        &self.recipes
    }

    /// Description of a registered recipe.
    pub fn recipe(&self, name: &str) -> Option<&str> {
        self.recipes.get(name).map(String::as_str)
    }

    /// Sets the description of an already registered recipe.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::UnknownRecipe`] if `name` was neither
    /// discovered nor declared with [`declare_recipe`](Self::declare_recipe).
    pub fn set_recipe(&mut self, name: &str, description: impl Into<String>) -> Result<&str> {
        let Some(slot) = self.recipes.get_mut(name) else {
            warn!(cookbook = %self.name, recipe = name, "description for unknown recipe");
            return Err(MetadataError::UnknownRecipe(name.to_string()));
        };
        *slot = description.into();
        debug!(recipe = name, "set recipe description");
        Ok(slot.as_str())
    }

    /// Registers `name` as a recipe of this cookbook with a description.
    ///
    /// A recipe with no `providing` entry yet is provided unconditionally.
    pub fn declare_recipe(&mut self, name: &str, description: impl Into<String>) -> &str {
        let slot = self.register_recipe(name);
        *slot = description.into();
        slot.as_str()
    }

    fn register_recipe(&mut self, name: &str) -> &mut String {
        let providing = self.relations.table_mut(RelationKind::Provides);
        if !providing.contains(name) {
            providing.declare_unconditional(name);
        }
        debug!(recipe = name, "registered recipe");
        self.recipes.entry(name.to_string()).or_default()
    }
}

impl PartialEq for PackageMetadata {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.description == other.description
            && self.long_description == other.long_description
            && self.maintainer == other.maintainer
            && self.maintainer_email == other.maintainer_email
            && self.license == other.license
            && self.version == other.version
            && self.platforms == other.platforms
            && self.relations == other.relations
            && self.attributes == other.attributes
            && self.recipes == other.recipes
    }
}

impl Eq for PackageMetadata {}
