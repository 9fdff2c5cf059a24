//! Identifiers used to name staging steps.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Borrow;
use std::fmt::{Debug, Display, Formatter};
use std::ops::Deref;
use std::str::FromStr;

/// The name of a producer, consumer or lifecycle step.
///
/// Step names must start with an ascii letter and may then contain word characters and `-`.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StepId(String);

impl StepId {
    /// Create a new step id
    ///
    /// # Error
    /// Errors if it isn't a valid identifier.
    ///
    /// # Example
    /// ```
    /// # use stagehand_core::identifier::StepId;
    /// let id = StepId::new("copyRestApiSpecs").unwrap();
    /// assert!(StepId::new("&task").is_err());
    /// assert!(StepId::new("2132").is_err());
    /// assert!(StepId::new("gef::as").is_err());
    /// ```
    pub fn new<S: AsRef<str>>(val: S) -> Result<Self, InvalidStepName> {
        let as_str = val.as_ref();
        is_valid_identifier(as_str).map(|_| StepId(as_str.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for StepId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Debug for StepId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl Deref for StepId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Borrow<str> for StepId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for StepId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for StepId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for StepId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl FromStr for StepId {
    type Err = InvalidStepName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for StepId {
    type Error = InvalidStepName;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for StepId {
    type Error = InvalidStepName;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StepId> for String {
    fn from(id: StepId) -> Self {
        id.0
    }
}

impl From<&StepId> for StepId {
    fn from(id: &StepId) -> Self {
        id.clone()
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("Invalid step name {0:?}")]
pub struct InvalidStepName(pub String);

impl InvalidStepName {
    pub fn new(string: impl AsRef<str>) -> Self {
        Self(string.as_ref().to_string())
    }
}

pub fn is_valid_identifier(id: &str) -> Result<(), InvalidStepName> {
    static VALID_ID_PATTERN: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"[a-zA-Z][\w-]*").expect("Invalid Pattern"));

    VALID_ID_PATTERN
        .find(id)
        .ok_or_else(|| InvalidStepName::new(id))
        .and_then(|mat| {
            if mat.as_str() == id {
                Ok(())
            } else {
                Err(InvalidStepName::new(id))
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names() {
        for name in ["P1", "C", "yamlRestTest", "copy-rest-api", "check_all"] {
            assert!(StepId::new(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn invalid_names() {
        for name in ["", "1p", "with space", "root:task", "-dash"] {
            assert!(StepId::new(name).is_err(), "{name:?} should be invalid");
        }
    }

    #[test]
    fn compares_with_str() {
        let id = StepId::new("yamlRestTest").unwrap();
        assert_eq!(id, "yamlRestTest");
        assert_eq!(id.to_string(), "yamlRestTest");
    }
}
