use std::collections::BTreeMap;

use crate::error::{ConfigError, ParseError};
use crate::suggest::{Suggester, Suggestions};

/// The permitted record names, each with a description for the help text.
/// An empty set permits any name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedNames {
    entries: BTreeMap<String, String>,
}

impl AllowedNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, description: impl Into<String>) {
        self.entries.insert(name.into(), description.into());
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn allows(&self, name: &str) -> bool {
        self.entries.is_empty() || self.entries.contains_key(name)
    }

    pub fn description(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, description)| (name.as_str(), description.as_str()))
    }

    pub fn check_name(&self, name: &str, suggester: &dyn Suggester) -> Result<(), ParseError> {
        if name.is_empty() {
            return Err(ParseError::EmptyName);
        }
        if self.allows(name) {
            return Ok(());
        }
        let population: Vec<&str> = self.names().collect();
        Err(ParseError::UnknownName {
            name: name.to_string(),
            suggestions: Suggestions::find(suggester, name, &population),
        })
    }

    /// A name is everything before the first `=` so an allowed name holding
    /// one could never be matched.
    pub fn check(&self) -> Result<(), ConfigError> {
        for name in self.entries.keys() {
            if name.is_empty() {
                return Err(ConfigError::InvalidAllowedName {
                    name: name.clone(),
                    reason: "the name may not be empty",
                });
            }
            if name.contains('=') {
                return Err(ConfigError::InvalidAllowedName {
                    name: name.clone(),
                    reason: "the name may not contain '='",
                });
            }
        }
        Ok(())
    }
}

impl<N, D> FromIterator<(N, D)> for AllowedNames
where
    N: Into<String>,
    D: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, D)>>(iter: I) -> Self {
        let mut allowed = Self::new();
        for (name, description) in iter {
            allowed.insert(name, description);
        }
        allowed
    }
}

impl<N, D, const COUNT: usize> From<[(N, D); COUNT]> for AllowedNames
where
    N: Into<String>,
    D: Into<String>,
{
    fn from(entries: [(N, D); COUNT]) -> Self {
        entries.into_iter().collect()
    }
}
