use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::allowed::AllowedNames;
use crate::error::{ConfigError, ParseError, SetterCheckError};
use crate::record::RecordParser;

/// String-like record names.
pub trait ParamName: AsRef<str> + for<'a> From<&'a str> {}

impl<N> ParamName for N where N: AsRef<str> + for<'a> From<&'a str> {}

/// A record together with the name it was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedValue<N, T> {
    pub name: N,
    pub value: T,
}

/// The capabilities a flag-registration layer needs from a parameter setter.
pub trait ParamSetter {
    /// Parses `text` and stores the result. On error nothing is stored.
    fn set_value(&mut self, text: &str) -> Result<(), ParseError>;

    fn current_value(&self) -> String;

    fn value_description(&self) -> &'static str;

    fn allowed_values(&self) -> String;

    /// Checks the setter's assembly; to be called once at start-up.
    fn check(&self, param: &str) -> Result<(), SetterCheckError>;
}

/// Stores each parsed record in a map under its name; a later value for the
/// same name replaces the earlier one.
pub struct MapSetter<N, T> {
    parser: RecordParser<N, T>,
    values: BTreeMap<N, T>,
    allow_hidden_entries: bool,
}

impl<N, T> MapSetter<N, T>
where
    N: ParamName + Ord,
    T: Clone,
{
    pub fn new(parser: RecordParser<N, T>) -> Self {
        Self {
            parser,
            values: BTreeMap::new(),
            allow_hidden_entries: false,
        }
    }

    /// Seeds the map with entries present before any parameter is parsed.
    pub fn with_values(mut self, values: BTreeMap<N, T>) -> Self {
        self.values = values;
        self
    }

    /// Permits seeded entries whose names are not in the allowed names.
    /// Such entries cannot be changed through this setter.
    pub fn allow_hidden_entries(mut self) -> Self {
        self.allow_hidden_entries = true;
        self
    }

    pub fn values(&self) -> &BTreeMap<N, T> {
        &self.values
    }

    pub fn into_values(self) -> BTreeMap<N, T> {
        self.values
    }

    pub fn parser(&self) -> &RecordParser<N, T> {
        &self.parser
    }

    fn check_values(&self) -> Result<(), ConfigError> {
        if self.allow_hidden_entries {
            return Ok(());
        }
        check_names(
            self.parser.allowed(),
            self.values.keys().map(AsRef::as_ref),
        )
    }
}

impl<N, T> ParamSetter for MapSetter<N, T>
where
    N: ParamName + Ord + Debug,
    T: Clone + Debug,
{
    fn set_value(&mut self, text: &str) -> Result<(), ParseError> {
        let named = self.parser.parse(text)?;
        self.values.insert(named.name, named.value);
        Ok(())
    }

    fn current_value(&self) -> String {
        render(self.values.iter())
    }

    fn value_description(&self) -> &'static str {
        self.parser.short_description()
    }

    fn allowed_values(&self) -> String {
        self.parser.allowed_values()
    }

    fn check(&self, param: &str) -> Result<(), SetterCheckError> {
        self.check_values()
            .and_then(|_| self.parser.check())
            .map_err(|source| SetterCheckError {
                param: param.to_string(),
                source,
            })
    }
}

/// Appends each parsed record to a list, keeping the order of the
/// parameters. The same name may appear any number of times.
pub struct ListSetter<N, T> {
    parser: RecordParser<N, T>,
    values: Vec<NamedValue<N, T>>,
    allow_invalid_entries: bool,
}

impl<N, T> ListSetter<N, T>
where
    N: ParamName,
    T: Clone,
{
    pub fn new(parser: RecordParser<N, T>) -> Self {
        Self {
            parser,
            values: Vec::new(),
            allow_invalid_entries: false,
        }
    }

    pub fn with_values(mut self, values: Vec<NamedValue<N, T>>) -> Self {
        self.values = values;
        self
    }

    /// Permits seeded entries whose names are not in the allowed names.
    pub fn allow_invalid_entries(mut self) -> Self {
        self.allow_invalid_entries = true;
        self
    }

    pub fn values(&self) -> &[NamedValue<N, T>] {
        &self.values
    }

    pub fn into_values(self) -> Vec<NamedValue<N, T>> {
        self.values
    }

    pub fn parser(&self) -> &RecordParser<N, T> {
        &self.parser
    }

    fn check_values(&self) -> Result<(), ConfigError> {
        if self.allow_invalid_entries {
            return Ok(());
        }
        check_names(
            self.parser.allowed(),
            self.values.iter().map(|named| named.name.as_ref()),
        )
    }
}

impl<N, T> ParamSetter for ListSetter<N, T>
where
    N: ParamName + Debug,
    T: Clone + Debug,
{
    fn set_value(&mut self, text: &str) -> Result<(), ParseError> {
        let named = self.parser.parse(text)?;
        self.values.push(named);
        Ok(())
    }

    fn current_value(&self) -> String {
        render(self.values.iter().map(|named| (&named.name, &named.value)))
    }

    fn value_description(&self) -> &'static str {
        self.parser.short_description()
    }

    fn allowed_values(&self) -> String {
        self.parser.allowed_values()
    }

    fn check(&self, param: &str) -> Result<(), SetterCheckError> {
        self.check_values()
            .and_then(|_| self.parser.check())
            .map_err(|source| SetterCheckError {
                param: param.to_string(),
                source,
            })
    }
}

fn check_names<'a>(
    allowed: &AllowedNames,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), ConfigError> {
    if allowed.is_empty() {
        return Ok(());
    }
    for name in names {
        if !allowed.allows(name) {
            return Err(ConfigError::DisallowedEntry {
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

fn render<'a, N, T>(entries: impl Iterator<Item = (&'a N, &'a T)>) -> String
where
    N: AsRef<str> + 'a,
    T: Debug + 'a,
{
    entries
        .map(|(name, value)| format!("{:?}: {value:?}", name.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}
