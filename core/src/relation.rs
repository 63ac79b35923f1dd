//! Dependency declarations keyed by relation kind.
//!
//! A [`ConstraintTable`] maps a name to the ordered list of constraint
//! expressions declared for it. [`DependencyRegistry`] holds one independent
//! table per [`RelationKind`]. The platform-support table is a
//! [`ConstraintTable`] as well.
//!
//! # Example
//!
//! ```
//! use cookbook_metadata_core::{DependencyRegistry, RelationKind};
//!
//! let mut registry = DependencyRegistry::default();
//! registry.declare(RelationKind::Depends, "apache2", [">= 1.0"]).unwrap();
//! registry.declare(RelationKind::Depends, "apache2", ["<< 2.0"]).unwrap();
//!
//! let deps = registry.table(RelationKind::Depends);
//! assert_eq!(deps.get("apache2").unwrap(), &[">= 1.0", "<< 2.0"]);
//! assert!(registry.table(RelationKind::Conflicts).is_empty());
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::version::{DEFAULT_CONSTRAINT, Version, VersionConstraint};

/// The six kinds of inter-cookbook relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RelationKind {
    Depends,
    Recommends,
    Suggests,
    Conflicts,
    Provides,
    Replaces,
}

impl RelationKind {
    /// Every relation kind, in document order.
    pub const ALL: [RelationKind; 6] = [
        RelationKind::Depends,
        RelationKind::Recommends,
        RelationKind::Suggests,
        RelationKind::Conflicts,
        RelationKind::Provides,
        RelationKind::Replaces,
    ];

    /// Returns the declaration verb (`depends`, `provides`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            RelationKind::Depends => "depends",
            RelationKind::Recommends => "recommends",
            RelationKind::Suggests => "suggests",
            RelationKind::Conflicts => "conflicts",
            RelationKind::Provides => "provides",
            RelationKind::Replaces => "replaces",
        }
    }

    /// Returns the key the table is stored under in a metadata document.
    pub fn field_name(self) -> &'static str {
        match self {
            RelationKind::Depends => "dependencies",
            RelationKind::Recommends => "recommendations",
            RelationKind::Suggests => "suggestions",
            RelationKind::Conflicts => "conflicting",
            RelationKind::Provides => "providing",
            RelationKind::Replaces => "replacing",
        }
    }
}

impl FromStr for RelationKind {
    type Err = String;

    /// Accepts either the verb or the document field name.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        RelationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s || kind.field_name() == s)
            .ok_or_else(|| format!("unknown relation kind: {s}"))
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name to ordered constraint-expression list.
///
/// Every stored list is non-empty and holds only expressions that parsed
/// when they were declared. Repeated declarations for a name append.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstraintTable {
    entries: BTreeMap<String, Vec<String>>,
}

impl ConstraintTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends constraints for `name` and returns the full list now stored.
    ///
    /// With no expressions the unconditional [`DEFAULT_CONSTRAINT`] is
    /// recorded. Expressions are stored in normalized form (surrounding
    /// whitespace removed).
    ///
    /// # Errors
    ///
    /// Returns
    /// [`MetadataError::InvalidConstraintExpression`](crate::MetadataError::InvalidConstraintExpression)
    /// on the first malformed expression. The table is unchanged in that case.
    pub fn declare<I, S>(&mut self, name: &str, expressions: I) -> Result<&[String]>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed = expressions
            .into_iter()
            .map(|expression| {
                VersionConstraint::parse(expression.as_ref())
                    .map(|constraint| constraint.to_string())
                    .inspect_err(|err| warn!(name, %err, "rejected constraint"))
            })
            .collect::<Result<Vec<_>>>()?;

        if parsed.is_empty() {
            parsed.push(DEFAULT_CONSTRAINT.to_string());
        }

        debug!(name, constraints = ?parsed, "declared constraints");
        let list = self.entries.entry(name.to_string()).or_default();
        list.append(&mut parsed);
        Ok(list.as_slice())
    }

    /// Appends the unconditional [`DEFAULT_CONSTRAINT`] for `name`.
    pub fn declare_unconditional(&mut self, name: &str) -> &[String] {
        debug!(name, "declared unconditional constraint");
        let list = self.entries.entry(name.to_string()).or_default();
        list.push(DEFAULT_CONSTRAINT.to_string());
        list.as_slice()
    }

    /// Returns the constraints declared for `name`.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Returns the whole table.
    pub fn entries(&self) -> &BTreeMap<String, Vec<String>> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks `candidate` against every constraint recorded for `name`.
    ///
    /// Returns `None` when `name` has no entry.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::InvalidVersionFormat`](crate::MetadataError::InvalidVersionFormat)
    /// if `candidate` is not a valid version.
    pub fn check(&self, name: &str, candidate: &str) -> Result<Option<bool>> {
        let Some(expressions) = self.entries.get(name) else {
            return Ok(None);
        };

        let candidate = Version::parse(candidate)?;
        let mut satisfied = true;
        for expression in expressions {
            let constraint = VersionConstraint::parse(expression)?;
            satisfied &= constraint.matches(&candidate);
        }
        Ok(Some(satisfied))
    }
}

/// One independent [`ConstraintTable`] per [`RelationKind`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyRegistry {
    depends: ConstraintTable,
    recommends: ConstraintTable,
    suggests: ConstraintTable,
    conflicts: ConstraintTable,
    provides: ConstraintTable,
    replaces: ConstraintTable,
}

impl DependencyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a relation of `kind` on `name`. See
    /// [`ConstraintTable::declare`].
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
        debug!(kind = kind.as_str(), name, "declaring relation");
        self.table_mut(kind).declare(name, expressions)
    }

    /// Returns the table for `kind`.
    pub fn table(&self, kind: RelationKind) -> &ConstraintTable {
        match kind {
            RelationKind::Depends => &self.depends,
            RelationKind::Recommends => &self.recommends,
            RelationKind::Suggests => &self.suggests,
            RelationKind::Conflicts => &self.conflicts,
            RelationKind::Provides => &self.provides,
            RelationKind::Replaces => &self.replaces,
        }
    }

    pub(crate) fn table_mut(&mut self, kind: RelationKind) -> &mut ConstraintTable {
        match kind {
            RelationKind::Depends => &mut self.depends,
            RelationKind::Recommends => &mut self.recommends,
            RelationKind::Suggests => &mut self.suggests,
            RelationKind::Conflicts => &mut self.conflicts,
            RelationKind::Provides => &mut self.provides,
            RelationKind::Replaces => &mut self.replaces,
        }
    }
}
