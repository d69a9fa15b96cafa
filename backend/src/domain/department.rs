//! Departments compete as teams on the leaderboard.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors for department values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DepartmentValidationError {
    /// Identifier was blank.
    #[error("department id must not be empty")]
    EmptyId,
    /// Name was blank.
    #[error("Department name is required.")]
    EmptyName,
}

/// Department identifier.
///
/// Identifiers for new departments are derived from the name with
/// [`DepartmentId::derive`]; seeded departments may use shorter ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DepartmentId(String);

impl DepartmentId {
    /// Accept an existing identifier verbatim, rejecting blank input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, DepartmentValidationError> {
        let id = id.as_ref().trim();
        if id.is_empty() {
            return Err(DepartmentValidationError::EmptyId);
        }
        Ok(Self(id.to_owned()))
    }

    /// Lowercase the name and replace each whitespace run with one hyphen.
    ///
    /// Leading and trailing whitespace also become hyphens.
    ///
    /// # Examples
    /// ```
    /// use step_challenge::domain::{DepartmentId, DepartmentName};
    ///
    /// let name = DepartmentName::new("Human  Resources").expect("valid name");
    /// assert_eq!(DepartmentId::derive(&name).as_ref(), "human-resources");
    /// ```
    pub fn derive(name: &DepartmentName) -> Self {
        let mut id = String::with_capacity(name.0.len());
        let mut in_whitespace = false;
        for ch in name.0.chars() {
            if ch.is_whitespace() {
                if !in_whitespace {
                    id.push('-');
                }
                in_whitespace = true;
            } else {
                id.extend(ch.to_lowercase());
                in_whitespace = false;
            }
        }
        Self(id)
    }
}

impl AsRef<str> for DepartmentId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DepartmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DepartmentId> for String {
    fn from(value: DepartmentId) -> Self {
        value.0
    }
}

impl TryFrom<String> for DepartmentId {
    type Error = DepartmentValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Department display name, kept exactly as entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DepartmentName(String);

impl DepartmentName {
    /// Reject names that are blank once trimmed.
    pub fn new(name: impl Into<String>) -> Result<Self, DepartmentValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DepartmentValidationError::EmptyName);
        }
        Ok(Self(name))
    }

    /// Case-insensitive comparison used for uniqueness checks.
    pub fn matches(&self, other: &DepartmentName) -> bool {
        self.0.to_lowercase() == other.0.to_lowercase()
    }
}

impl AsRef<str> for DepartmentName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DepartmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DepartmentName> for String {
    fn from(value: DepartmentName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DepartmentName {
    type Error = DepartmentValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A department record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    id: DepartmentId,
    name: DepartmentName,
}

impl Department {
    /// Pair an identifier with a name.
    pub fn new(id: DepartmentId, name: DepartmentName) -> Self {
        Self { id, name }
    }

    /// Create a department whose id is derived from its name.
    pub fn named(name: DepartmentName) -> Self {
        Self {
            id: DepartmentId::derive(&name),
            name,
        }
    }

    pub fn id(&self) -> &DepartmentId {
        &self.id
    }

    pub fn name(&self) -> &DepartmentName {
        &self.name
    }
}
