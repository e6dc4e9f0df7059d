use crate::error::StorageError;
use regex_automata::meta::Regex;
use regex_syntax::hir::{Hir, Look};
use std::fmt;

/// Longest accepted item name, in characters.
pub const MAX_NAME_LEN: usize = 64;

/// A validated logical item name: 1 to 64 characters from `[A-Za-z0-9_-]`.
///
/// Holding an `ItemName` proves validation already happened, so nothing past the
/// constructor touches the filesystem with an unchecked name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemName(String);

impl ItemName {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Checks a logical item name without allocating.
///
/// # Errors
/// Returns [`StorageError::InvalidName`] for blank names, names longer than
/// [`MAX_NAME_LEN`] characters, or names with any character outside `[A-Za-z0-9_-]`.
pub fn validate_name(name: &str) -> Result<(), StorageError> {
    let reason = if name.trim().is_empty() {
        "name cannot be blank"
    } else if name.chars().count() > MAX_NAME_LEN {
        "name is longer than 64 characters"
    } else if !name.chars().all(is_name_char) {
        "name contains characters outside [A-Za-z0-9_-]"
    } else {
        return Ok(());
    };

    Err(StorageError::InvalidName { message: name.to_owned().into(), context: Some(reason.into()) })
}

const fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

impl TryFrom<&str> for ItemName {
    type Error = StorageError;

    fn try_from(value: &str) -> Result<Self, StorageError> {
        validate_name(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for ItemName {
    type Error = StorageError;

    fn try_from(value: String) -> Result<Self, StorageError> {
        validate_name(&value)?;
        Ok(Self(value))
    }
}

impl TryFrom<&String> for ItemName {
    type Error = StorageError;

    fn try_from(value: &String) -> Result<Self, StorageError> {
        Self::try_from(value.as_str())
    }
}

impl TryFrom<&ItemName> for ItemName {
    type Error = StorageError;

    fn try_from(value: &ItemName) -> Result<Self, StorageError> {
        Ok(value.clone())
    }
}

impl AsRef<str> for ItemName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A compiled name query. Matching is whole-string: `.*oo` matches `foo` but not `foobar`.
#[derive(Debug, Clone)]
pub struct NamePattern {
    source: String,
    anchored: Regex,
}

impl NamePattern {
    /// Compiles `pattern`.
    ///
    /// Anchors are added to the parsed expression, not to the text, so input like
    /// `a)|(b` stays invalid and a trailing `(?x)` comment cannot swallow them.
    ///
    /// # Errors
    /// Returns [`StorageError::InvalidPattern`] for blank or unparseable patterns.
    pub fn new(pattern: &str) -> Result<Self, StorageError> {
        if pattern.trim().is_empty() {
            return Err(StorageError::InvalidPattern {
                message: pattern.to_owned().into(),
                context: Some("pattern cannot be blank".into()),
            });
        }

        let invalid = |reason: String| StorageError::InvalidPattern {
            message: pattern.to_owned().into(),
            context: Some(reason.into()),
        };

        let hir = regex_syntax::ParserBuilder::new()
            .build()
            .parse(pattern)
            .map_err(|err| invalid(err.to_string()))?;
        let whole = Hir::concat(vec![Hir::look(Look::Start), hir, Hir::look(Look::End)]);
        let anchored =
            Regex::builder().build_from_hir(&whole).map_err(|err| invalid(err.to_string()))?;

        Ok(Self { source: pattern.to_owned(), anchored })
    }

    #[must_use]
    pub fn is_match(&self, name: &str) -> bool {
        self.anchored.is_match(name)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// Checks that `pattern` is non-blank and compiles.
///
/// # Errors
/// Returns [`StorageError::InvalidPattern`] when it does not.
pub fn validate_pattern(pattern: &str) -> Result<(), StorageError> {
    NamePattern::new(pattern).map(drop)
}
