//! Override key encoding
//!
//! Preferences can be overridden per identifier (typically a language id).
//! Two key shapes carry that information through the flat key space:
//!
//! - Override group key: `[identifier]`, whose value is an object of
//!   preference name to value.
//! - Combined key: `[identifier].preferenceName`, addressing one preference
//!   inside a group as if it were an ordinary name.
//!
//! Identifiers may not contain brackets, which keeps both encodings injective
//! and keeps them apart from each other.

use crate::error::{Error, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static GROUP_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([^\[\]]+)\]$").expect("valid group key pattern"));

static COMBINED_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([^\[\]]+)\]\.(.+)$").expect("valid combined key pattern"));

/// Name of an override group, e.g. `rust` or `swift`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OverrideIdentifier(String);

impl OverrideIdentifier {
    /// Create an identifier
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidOverrideIdentifier` if the identifier is empty
    /// or contains `[` or `]`.
    pub fn new(identifier: impl Into<String>) -> Result<Self> {
        let identifier = identifier.into();
        if identifier.is_empty() || identifier.contains(['[', ']']) {
            return Err(Error::InvalidOverrideIdentifier(identifier));
        }
        Ok(Self(identifier))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The group key for this identifier (`[identifier]`)
    pub fn group_key(&self) -> String {
        format!("[{}]", self.0)
    }
}

impl fmt::Display for OverrideIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for OverrideIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A preference name qualified by an override identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OverriddenName {
    pub identifier: OverrideIdentifier,
    pub name: String,
}

impl OverriddenName {
    pub fn new(identifier: OverrideIdentifier, name: impl Into<String>) -> Self {
        Self {
            identifier,
            name: name.into(),
        }
    }

    /// Encode back to the combined key form
    pub fn combined_key(&self) -> String {
        format!("[{}].{}", self.identifier, self.name)
    }
}

/// Encode an override group key.
///
/// # Example
///
/// ```
/// use prefscope::key::{mark_override, OverrideIdentifier};
///
/// let swift = OverrideIdentifier::new("swift").unwrap();
/// assert_eq!(mark_override(&swift), "[swift]");
/// ```
pub fn mark_override(identifier: &OverrideIdentifier) -> String {
    identifier.group_key()
}

/// Encode a combined key addressing `name` inside the `identifier` group.
///
/// # Example
///
/// ```
/// use prefscope::key::{combine, OverrideIdentifier};
///
/// let swift = OverrideIdentifier::new("swift").unwrap();
/// assert_eq!(combine(&swift, "editor.tabSize"), "[swift].editor.tabSize");
/// ```
pub fn combine(identifier: &OverrideIdentifier, name: &str) -> String {
    format!("[{identifier}].{name}")
}

/// Decode a combined key, returning `None` for anything else.
pub fn decode(key: &str) -> Option<OverriddenName> {
    let caps = COMBINED_KEY.captures(key)?;
    Some(OverriddenName {
        identifier: OverrideIdentifier(caps[1].to_string()),
        name: caps[2].to_string(),
    })
}

/// Decode a bare override group key, returning `None` for anything else.
pub fn decode_group(key: &str) -> Option<OverrideIdentifier> {
    GROUP_KEY
        .captures(key)
        .map(|caps| OverrideIdentifier(caps[1].to_string()))
}

/// Any key accepted by get/set, classified by shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    /// Ordinary preference name
    Plain(String),
    /// Whole override group
    Group(OverrideIdentifier),
    /// One preference inside an override group
    Overridden(OverriddenName),
}

impl PreferenceKey {
    /// Classify a key string. Never fails: malformed override syntax is
    /// treated as a plain name.
    pub fn parse(key: &str) -> Self {
        if let Some(overridden) = decode(key) {
            PreferenceKey::Overridden(overridden)
        } else if let Some(identifier) = decode_group(key) {
            PreferenceKey::Group(identifier)
        } else {
            PreferenceKey::Plain(key.to_string())
        }
    }
}

impl fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreferenceKey::Plain(name) => f.write_str(name),
            PreferenceKey::Group(id) => write!(f, "[{id}]"),
            PreferenceKey::Overridden(o) => write!(f, "[{}].{}", o.identifier, o.name),
        }
    }
}

impl From<&str> for PreferenceKey {
    fn from(key: &str) -> Self {
        Self::parse(key)
    }
}

impl From<String> for PreferenceKey {
    fn from(key: String) -> Self {
        Self::parse(&key)
    }
}

impl From<OverriddenName> for PreferenceKey {
    fn from(name: OverriddenName) -> Self {
        PreferenceKey::Overridden(name)
    }
}
