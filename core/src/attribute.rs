//! Typed descriptors for configurable cookbook attributes.
//!
//! An [`AttributeSchema`] is the resolved, stored form. [`AttributeOptions`]
//! is the partially-specified input: built with its typed setters, or decoded
//! from an untyped JSON object with [`AttributeOptions::from_value`], which is
//! where type and enum checks happen.
//!
//! # Examples
//!
//! ```
//! use cookbook_metadata_core::{AttributeOptions, AttributeType};
//! use serde_json::json;
//!
//! let schema = AttributeOptions::new()
//!     .display_name("MySQL Databases")
//!     .multiple_values(true)
//!     .recipes(["mysql::server", "mysql::master"])
//!     .resolve();
//! assert_eq!(schema.attribute_type, AttributeType::String);
//! assert!(!schema.required);
//!
//! let err = AttributeOptions::from_value("db/mysql/databases", &json!({ "display_name": {} }));
//! assert!(err.is_err());
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{MetadataError, Result};

/// Shape of the value an attribute holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    #[default]
    String,
    Array,
    Hash,
}

impl AttributeType {
    pub fn as_str(self) -> &'static str {
        match self {
            AttributeType::String => "string",
            AttributeType::Array => "array",
            AttributeType::Hash => "hash",
        }
    }
}

impl FromStr for AttributeType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "string" => Ok(AttributeType::String),
            "array" => Ok(AttributeType::Array),
            "hash" => Ok(AttributeType::Hash),
            other => Err(format!("expected one of string, array, hash; got {other:?}")),
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default value of an attribute: a string, a list, or a string map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeDefault {
    Text(String),
    List(Vec<String>),
    Map(BTreeMap<String, String>),
}

impl Default for AttributeDefault {
    fn default() -> Self {
        AttributeDefault::List(Vec::new())
    }
}

impl From<&str> for AttributeDefault {
    fn from(value: &str) -> Self {
        AttributeDefault::Text(value.to_string())
    }
}

impl From<String> for AttributeDefault {
    fn from(value: String) -> Self {
        AttributeDefault::Text(value)
    }
}

impl From<Vec<String>> for AttributeDefault {
    fn from(value: Vec<String>) -> Self {
        AttributeDefault::List(value)
    }
}

impl From<BTreeMap<String, String>> for AttributeDefault {
    fn from(value: BTreeMap<String, String>) -> Self {
        AttributeDefault::Map(value)
    }
}

/// Stored descriptor for one attribute path.
///
/// Serializes to the seven document keys, except that `display_name` and
/// `description` are omitted while unset rather than written as `null`.
/// A document without them decodes back to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSchema {
    /// Human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the attribute accepts more than one value.
    pub multiple_values: bool,
    #[serde(rename = "type")]
    pub attribute_type: AttributeType,
    /// Whether a value must be supplied.
    pub required: bool,
    /// Recipes that read this attribute.
    pub recipes: Vec<String>,
    pub default: AttributeDefault,
}

/// Options for [`PackageMetadata::attribute`](crate::PackageMetadata::attribute).
///
/// Unset fields resolve to the [`AttributeSchema`] defaults: no display
/// name or description, `multiple_values = false`, type `string`,
/// `required = false`, no recipes, and an empty list as default value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeOptions {
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub multiple_values: Option<bool>,
    pub attribute_type: Option<AttributeType>,
    pub required: Option<bool>,
    pub recipes: Option<Vec<String>>,
    pub default: Option<AttributeDefault>,
}

impl AttributeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn multiple_values(mut self, multiple_values: bool) -> Self {
        self.multiple_values = Some(multiple_values);
        self
    }

    pub fn attribute_type(mut self, attribute_type: AttributeType) -> Self {
        self.attribute_type = Some(attribute_type);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn recipes<I, S>(mut self, recipes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recipes = Some(recipes.into_iter().map(Into::into).collect());
        self
    }

    pub fn default_value(mut self, default: impl Into<AttributeDefault>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Decodes and validates options from a JSON object.
    ///
    /// Recognized keys are `display_name`, `description`,
    /// `multiple_values`, `type`, `required`, `recipes` and `default`. Every
    /// supplied value must have the declared type; nothing is coerced.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::InvalidAttributeOption`] when `value` is not
    /// an object, a key is unknown, or a value has the wrong type.
    pub fn from_value(path: &str, value: &Value) -> Result<Self> {
        let invalid = |option: &str, reason: String| MetadataError::InvalidAttributeOption {
            path: path.to_string(),
            option: option.to_string(),
            reason,
        };

        let Value::Object(map) = value else {
            return Err(invalid(
                "options",
                format!("expected an object, got {}", kind_of(value)),
            ));
        };

        let mut options = Self::default();
        for (key, value) in map {
            let mismatch = |expected: &str| {
                invalid(key.as_str(), format!("expected {expected}, got {}", kind_of(value)))
            };

            match key.as_str() {
                "display_name" => {
                    let text = value.as_str().ok_or_else(|| mismatch("a string"))?;
                    options.display_name = Some(text.to_string());
                }
                "description" => {
                    let text = value.as_str().ok_or_else(|| mismatch("a string"))?;
                    options.description = Some(text.to_string());
                }
                "multiple_values" => {
                    let flag = value.as_bool().ok_or_else(|| mismatch("a boolean"))?;
                    options.multiple_values = Some(flag);
                }
                "type" => {
                    let text = value.as_str().ok_or_else(|| mismatch("a string"))?;
                    let attribute_type: AttributeType =
                        text.parse().map_err(|reason| invalid(key.as_str(), reason))?;
                    options.attribute_type = Some(attribute_type);
                }
                "required" => {
                    let flag = value.as_bool().ok_or_else(|| mismatch("a boolean"))?;
                    options.required = Some(flag);
                }
                "recipes" => {
                    let recipes =
                        string_list(value).ok_or_else(|| mismatch("an array of strings"))?;
                    options.recipes = Some(recipes);
                }
                "default" => {
                    let default = match value {
                        Value::String(text) => Some(AttributeDefault::Text(text.clone())),
                        Value::Array(_) => string_list(value).map(AttributeDefault::List),
                        Value::Object(_) => string_map(value).map(AttributeDefault::Map),
                        _ => None,
                    };
                    options.default = Some(default.ok_or_else(|| {
                        mismatch("a string, an array of strings, or an object of strings")
                    })?);
                }
                other => return Err(invalid(other, "unknown option".to_string())),
            }
        }

        Ok(options)
    }

    /// Fills in defaults for every unset option.
    pub fn resolve(self) -> AttributeSchema {
        AttributeSchema {
            display_name: self.display_name,
            description: self.description,
            multiple_values: self.multiple_values.unwrap_or(false),
            attribute_type: self.attribute_type.unwrap_or_default(),
            required: self.required.unwrap_or(false),
            recipes: self.recipes.unwrap_or_default(),
            default: self.default.unwrap_or_default(),
        }
    }
}

impl From<AttributeSchema> for AttributeOptions {
    fn from(schema: AttributeSchema) -> Self {
        Self {
            display_name: schema.display_name,
            description: schema.description,
            multiple_values: Some(schema.multiple_values),
            attribute_type: Some(schema.attribute_type),
            required: Some(schema.required),
            recipes: Some(schema.recipes),
            default: Some(schema.default),
        }
    }
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|item| item.as_str().map(String::from))
        .collect()
}

fn string_map(value: &Value) -> Option<BTreeMap<String, String>> {
    value
        .as_object()?
        .iter()
        .map(|(key, item)| item.as_str().map(|text| (key.clone(), text.to_string())))
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
