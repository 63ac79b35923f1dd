//! Cookbook metadata model and its version-constraint language.
//!
//! This crate describes one cookbook (a unit of infrastructure
//! configuration) without doing any I/O:
//!
//! - [`PackageMetadata`]: identity and authorship fields, supported
//!   platforms, relations to other cookbooks, attribute schemas and recipe
//!   descriptions.
//! - [`VersionConstraint`]: one `"<op> <version>"` expression using the
//!   operators `>>`, `>=`, `=`, `<=`, `<<`, evaluated with [`evaluate`].
//! - [`ConstraintTable`] and [`DependencyRegistry`]: name to constraint
//!   list tables, one per [`RelationKind`] (`depends`, `recommends`,
//!   `suggests`, `conflicts`, `provides`, `replaces`).
//! - [`AttributeOptions`] / [`AttributeSchema`]: validated descriptors for
//!   configurable attributes.
//! - [`codec`]: lossless conversion to and from a JSON document.
//!
//! # Example
//!
//! ```
//! use cookbook_metadata_core::*;
//!
//! let cookbook = Cookbook::new("mysql").with_recipe_files(["default.rb", "server.rb"]);
//! let mut meta = PackageMetadata::new(&cookbook);
//!
//! meta.set_maintainer("Bobo T. Clown");
//! meta.supports("ubuntu", [">= 8.04", "<< 10.04"]).unwrap();
//! meta.depends("openssl", Vec::<&str>::new()).unwrap();
//! assert!(meta.depends("apt", ["about 1.0"]).is_err());
//!
//! assert_eq!(meta.dependencies()["openssl"], vec![">= 0.0.0"]);
//! assert!(meta.supports_platform("ubuntu", "9.04").unwrap());
//! assert!(meta.recipes().contains_key("mysql::server"));
//!
//! let decoded = codec::from_json(&codec::to_json(&meta).unwrap()).unwrap();
//! assert_eq!(decoded, meta);
//! ```

mod attribute;
pub mod codec;
mod cookbook;
mod error;
mod metadata;
mod relation;
mod version;

pub use attribute::{AttributeDefault, AttributeOptions, AttributeSchema, AttributeType};
pub use cookbook::{
    Cookbook, DEFAULT_LICENSE, DEFAULT_MAINTAINER, DEFAULT_MAINTAINER_EMAIL, DEFAULT_RECIPE,
    MetadataDefaults, recipe_name,
};
pub use error::{MetadataError, Result};
pub use metadata::{DEFAULT_VERSION, PackageMetadata};
pub use relation::{ConstraintTable, DependencyRegistry, RelationKind};
pub use version::{
    DEFAULT_CONSTRAINT, Operator, Version, VersionConstraint, compare_versions, evaluate,
};
