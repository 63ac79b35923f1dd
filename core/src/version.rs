//! Dotted-numeric versions and the `"<op> <version>"` constraint language.
//!
//! A constraint is one of five operators followed by exactly one space and a
//! version:
//!
//! | operator | meaning |
//! |---|---|
//! | `>>` | strictly greater |
//! | `>=` | greater or equal |
//! | `=`  | equal |
//! | `<=` | less or equal |
//! | `<<` | strictly less |
//!
//! Versions compare component-wise and numerically, so `"8.10"` is newer than
//! `"8.9"` and `"8"` equals `"8.0.0"`.
//!
//! # Examples
//!
//! ```
//! use cookbook_metadata_core::{evaluate, Operator, VersionConstraint};
//!
//! let constraint = VersionConstraint::parse(">= 8.04").unwrap();
//! assert_eq!(constraint.operator(), Operator::GreaterOrEqual);
//! assert_eq!(constraint.version().as_str(), "8.04");
//!
//! assert!(evaluate("9.04", ">= 8.04").unwrap());
//! assert!(!evaluate("8.00", ">= 8.04").unwrap());
//! assert!(VersionConstraint::parse("tried to << love you").is_err());
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{MetadataError, Result};

/// Expression recorded when a declaration carries no constraints.
pub const DEFAULT_CONSTRAINT: &str = ">= 0.0.0";

// Two-character operators come first so `=` never matches inside `>=`/`<=`.
static CONSTRAINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(>>|>=|<=|<<|=) (\S+)\s*$").expect("static regex must compile")
});

/// A dot-separated sequence of non-negative integers such as `"8.04"`.
///
/// The original text is kept for display, so `"8.04"` prints as `"8.04"`
/// even though it compares equal to `"8.4"`. Missing trailing components
/// count as zero.
///
/// # Examples
///
/// ```
/// use cookbook_metadata_core::Version;
///
/// let a: Version = "8.04".parse().unwrap();
/// let b: Version = "8.4.0".parse().unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "8.04");
/// assert!("8.10".parse::<Version>().unwrap() > "8.9".parse().unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    /// Digit strings with leading zeros stripped; `"0"` for zero.
    components: Vec<String>,
}

impl Version {
    /// Parses a dotted-numeric version.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::InvalidVersionFormat`] when the string is
    /// empty, has an empty component, or a component is not made of ASCII
    /// digits. Components have no size limit.
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = || MetadataError::InvalidVersionFormat(raw.to_string());

        if raw.is_empty() {
            return Err(invalid());
        }

        let components = raw
            .split('.')
            .map(|part| {
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid());
                }
                let digits = part.trim_start_matches('0');
                Ok(if digits.is_empty() { "0" } else { digits }.to_string())
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            raw: raw.to_string(),
            components,
        })
    }

    /// Returns the version exactly as it was written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the numeric components, left to right, as canonical digit
    /// strings (`"04"` becomes `"4"`).
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(String::as_str)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        (0..len)
            .map(|i| {
                let a = self.components.get(i).map_or("0", String::as_str);
                let b = other.components.get(i).map_or("0", String::as_str);
                compare_digits(a, b)
            })
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

// Both sides are canonical, so the longer string is the larger number.
fn compare_digits(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl FromStr for Version {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Compares two dotted-numeric version strings.
///
/// # Errors
///
/// Returns [`MetadataError::InvalidVersionFormat`] if either side is not a
/// valid version.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use cookbook_metadata_core::compare_versions;
///
/// assert_eq!(compare_versions("8.00", "8.04").unwrap(), Ordering::Less);
/// assert_eq!(compare_versions("1.0", "1").unwrap(), Ordering::Equal);
/// assert!(compare_versions("1.x", "1").is_err());
/// ```
pub fn compare_versions(a: &str, b: &str) -> Result<Ordering> {
    Ok(Version::parse(a)?.cmp(&Version::parse(b)?))
}

/// Comparison operator of a version constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `>>`
    StrictlyGreater,
    /// `>=`
    GreaterOrEqual,
    /// `=`
    Equal,
    /// `<=`
    LessOrEqual,
    /// `<<`
    StrictlyLess,
}

impl Operator {
    /// Every operator, in the order they are matched.
    pub const ALL: [Operator; 5] = [
        Operator::StrictlyGreater,
        Operator::GreaterOrEqual,
        Operator::LessOrEqual,
        Operator::StrictlyLess,
        Operator::Equal,
    ];

    /// Returns the operator token.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::StrictlyGreater => ">>",
            Operator::GreaterOrEqual => ">=",
            Operator::Equal => "=",
            Operator::LessOrEqual => "<=",
            Operator::StrictlyLess => "<<",
        }
    }

    /// Maps the ordering of `candidate` relative to the constraint version
    /// to whether the candidate is accepted.
    pub fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Operator::StrictlyGreater => ordering == Ordering::Greater,
            Operator::GreaterOrEqual => ordering != Ordering::Less,
            Operator::Equal => ordering == Ordering::Equal,
            Operator::LessOrEqual => ordering != Ordering::Greater,
            Operator::StrictlyLess => ordering == Ordering::Less,
        }
    }
}

impl FromStr for Operator {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Self> {
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| MetadataError::InvalidConstraintExpression(s.to_string()))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed `"<op> <version>"` expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConstraint {
    operator: Operator,
    version: Version,
}

impl VersionConstraint {
    /// Parses an expression such as `">= 8.04"`.
    ///
    /// Leading and trailing whitespace is ignored; exactly one space must
    /// separate the operator from the version.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::InvalidConstraintExpression`] for an unknown
    /// operator, a missing or malformed version, or any trailing text.
    pub fn parse(expression: &str) -> Result<Self> {
        let invalid = || MetadataError::InvalidConstraintExpression(expression.to_string());

        let captures = CONSTRAINT_RE.captures(expression).ok_or_else(invalid)?;
        let operator = captures[1].parse::<Operator>().map_err(|_| invalid())?;
        let version = Version::parse(&captures[2]).map_err(|_| invalid())?;

        Ok(Self { operator, version })
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Returns `true` if `candidate` satisfies this constraint.
    pub fn matches(&self, candidate: &Version) -> bool {
        self.operator.accepts(candidate.cmp(&self.version))
    }
}

impl FromStr for VersionConstraint {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.operator, self.version)
    }
}

/// Checks a candidate version against a constraint expression.
///
/// The expression is parsed before the candidate, so a malformed expression
/// is always reported as such.
///
/// # Errors
///
/// Returns [`MetadataError::InvalidConstraintExpression`] for a bad
/// expression and [`MetadataError::InvalidVersionFormat`] for a bad
/// candidate.
pub fn evaluate(candidate: &str, expression: &str) -> Result<bool> {
    let constraint = VersionConstraint::parse(expression)?;
    let candidate = Version::parse(candidate)?;
    Ok(constraint.matches(&candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_rejects_malformed_components() {
        for raw in ["", "1.", ".1", "1..2", "1.x", "-1", "1.0-beta", " 1.0"] {
            assert!(
                matches!(Version::parse(raw), Err(MetadataError::InvalidVersionFormat(_))),
                "expected {raw:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_version_compares_numerically() {
        assert_eq!(compare_versions("8.10", "8.9").unwrap(), Ordering::Greater);
        assert_eq!(compare_versions("8.04", "8.4").unwrap(), Ordering::Equal);
        assert_eq!(compare_versions("1", "1.0.0").unwrap(), Ordering::Equal);
        assert_eq!(compare_versions("1.0.1", "1").unwrap(), Ordering::Greater);
        assert_eq!(compare_versions("0.9", "1").unwrap(), Ordering::Less);
    }

    #[test]
    fn test_version_components_are_unbounded() {
        let huge = "1234567890123456789012345";
        assert_eq!(compare_versions(huge, "1").unwrap(), Ordering::Greater);
        assert_eq!(compare_versions("1", huge).unwrap(), Ordering::Less);
        assert_eq!(
            compare_versions("20240101123045678901", "20240101123045678900").unwrap(),
            Ordering::Greater
        );
        assert_eq!(
            compare_versions("1.00018446744073709551616", "1.18446744073709551616.0").unwrap(),
            Ordering::Equal
        );
        assert_eq!(compare_versions("0.000", "0").unwrap(), Ordering::Equal);

        assert!(evaluate("1.0", "<< 18446744073709551616").unwrap());
        assert!(!evaluate("1.0", ">= 18446744073709551616").unwrap());
        assert!(evaluate(huge, ">> 18446744073709551616").unwrap());
    }

    #[test]
    fn test_version_keeps_original_text() {
        let version = Version::parse("8.04").unwrap();
        assert_eq!(version.as_str(), "8.04");
        assert_eq!(version.components().collect::<Vec<_>>(), ["8", "4"]);
    }

    #[test]
    fn test_parse_accepts_each_operator() {
        for (expression, operator) in [
            (">> 8.04", Operator::StrictlyGreater),
            (">= 8.04", Operator::GreaterOrEqual),
            ("= 8.04", Operator::Equal),
            ("<= 8.04", Operator::LessOrEqual),
            ("<< 8.04", Operator::StrictlyLess),
        ] {
            let constraint = VersionConstraint::parse(expression).unwrap();
            assert_eq!(constraint.operator(), operator);
            assert_eq!(constraint.version().as_str(), "8.04");
            assert_eq!(constraint.to_string(), expression);
        }
    }

    #[test]
    fn test_parse_trims_surrounding_whitespace() {
        let constraint = VersionConstraint::parse("  >= 1.2  ").unwrap();
        assert_eq!(constraint.to_string(), ">= 1.2");
    }

    #[test]
    fn test_parse_rejects_bad_expressions() {
        for expression in [
            "tried to << love you",
            ">=8.04",
            ">=  8.04",
            "> 8.04",
            "== 8.04",
            ">= ",
            ">=",
            "8.04",
            ">= 8.04 extra",
            ">= eight",
            "",
        ] {
            assert!(
                matches!(
                    VersionConstraint::parse(expression),
                    Err(MetadataError::InvalidConstraintExpression(_))
                ),
                "expected {expression:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_operator_accepts_orderings() {
        use Ordering::*;

        assert!(Operator::StrictlyGreater.accepts(Greater));
        assert!(!Operator::StrictlyGreater.accepts(Equal));
        assert!(Operator::GreaterOrEqual.accepts(Equal));
        assert!(!Operator::GreaterOrEqual.accepts(Less));
        assert!(Operator::Equal.accepts(Equal));
        assert!(!Operator::Equal.accepts(Greater));
        assert!(Operator::LessOrEqual.accepts(Less));
        assert!(!Operator::LessOrEqual.accepts(Greater));
        assert!(Operator::StrictlyLess.accepts(Less));
        assert!(!Operator::StrictlyLess.accepts(Equal));
    }

    #[test]
    fn test_operator_round_trips_through_str() {
        for op in Operator::ALL {
            assert_eq!(op.as_str().parse::<Operator>().unwrap(), op);
        }
        assert!("<>".parse::<Operator>().is_err());
    }

    #[test]
    fn test_evaluate_reports_bad_candidate() {
        assert!(matches!(
            evaluate("nine", ">= 8.04"),
            Err(MetadataError::InvalidVersionFormat(_))
        ));
        assert!(matches!(
            evaluate("nine", "~> 8.04"),
            Err(MetadataError::InvalidConstraintExpression(_))
        ));
    }
}
