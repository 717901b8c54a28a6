use std::collections::BTreeMap;
use std::marker::PhantomData;

use crate::allowed::AllowedNames;
use crate::error::{ConfigError, ParseError, ParseResult};
use crate::field::{ApplyError, FieldSpec};
use crate::lexer::{Assignment, Lexer, is_valid_key};
use crate::suggest::{JaroWinklerSuggester, Suggester, Suggestions};
use crate::target::{NamedValue, ParamName};

/// The literal form of a value, shown as the short description.
pub const VALUE_FORM: &str = r#"name=field="..." field="..." ..."#;

/// Builds named records from text of the form `name=key="value" ...`.
///
/// The fields, aliases, allowed names and default record are fixed when the
/// parser is assembled. Each call to [`RecordParser::parse`] starts from a
/// fresh copy of the default record, so a failed parse leaves nothing behind.
pub struct RecordParser<N, T> {
    default: T,
    fields: BTreeMap<String, FieldSpec<T>>,
    aliases: BTreeMap<String, String>,
    allowed: AllowedNames,
    suggester: Box<dyn Suggester>,
    _name: PhantomData<fn() -> N>,
}

impl<N, T> RecordParser<N, T>
where
    N: ParamName,
    T: Clone,
{
    pub fn new(default: T) -> Self {
        Self {
            default,
            fields: BTreeMap::new(),
            aliases: BTreeMap::new(),
            allowed: AllowedNames::new(),
            suggester: Box::new(JaroWinklerSuggester::default()),
            _name: PhantomData,
        }
    }

    pub fn field(mut self, key: impl Into<String>, spec: FieldSpec<T>) -> Self {
        self.fields.insert(key.into(), spec);
        self
    }

    pub fn alias(mut self, alias: impl Into<String>, target: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), target.into());
        self
    }

    pub fn allowed_names(mut self, allowed: AllowedNames) -> Self {
        self.allowed = allowed;
        self
    }

    pub fn suggester(mut self, suggester: impl Suggester + 'static) -> Self {
        self.suggester = Box::new(suggester);
        self
    }

    pub fn allowed(&self) -> &AllowedNames {
        &self.allowed
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    pub fn parse(&self, text: &str) -> ParseResult<NamedValue<N, T>> {
        let result = self.build(text);
        match &result {
            Ok(named) => tracing::debug!(name = named.name.as_ref(), "parsed named record"),
            Err(err) => tracing::debug!(value = text, error = %err, "rejected named record"),
        }
        result
    }

    fn build(&self, text: &str) -> ParseResult<NamedValue<N, T>> {
        let (name, fields) = match text.split_once('=') {
            Some((name, fields)) => (name, fields),
            None => (text, ""),
        };
        self.allowed.check_name(name, self.suggester.as_ref())?;

        let mut record = self.default.clone();
        let mut seen: BTreeMap<&str, String> = BTreeMap::new();
        if !fields.is_empty() {
            for assignment in Lexer::new(fields).lex_all()? {
                self.apply(&mut record, &assignment, &mut seen)?;
            }
        }
        self.check_mandatory(&seen)?;

        Ok(NamedValue {
            name: N::from(name),
            value: record,
        })
    }

    fn apply<'s>(
        &'s self,
        record: &mut T,
        assignment: &Assignment,
        seen: &mut BTreeMap<&'s str, String>,
    ) -> ParseResult<()> {
        let (key, spec) = self.resolve(&assignment.key, assignment.position)?;
        if let Some(first) = seen.get(key) {
            return Err(ParseError::DuplicateField {
                key: key.to_string(),
                first: first.clone(),
                second: assignment.text.clone(),
                position: assignment.position,
            });
        }
        spec.apply(record, key, &assignment.value)
            .map_err(|err| match err {
                ApplyError::Setter(source) => ParseError::InvalidValue {
                    key: key.to_string(),
                    source,
                },
                ApplyError::PostAction(source) => ParseError::PostAction {
                    key: key.to_string(),
                    source,
                },
            })?;
        seen.insert(key, assignment.text.clone());
        Ok(())
    }

    /// Maps a field key, or one of its aliases, to the canonical key and its
    /// descriptor.
    pub fn resolve(&self, key: &str, position: usize) -> ParseResult<(&str, &FieldSpec<T>)> {
        if let Some((canonical, spec)) = self.fields.get_key_value(key) {
            return Ok((canonical.as_str(), spec));
        }
        if let Some(target) = self.aliases.get(key) {
            if let Some((canonical, spec)) = self.fields.get_key_value(target) {
                return Ok((canonical.as_str(), spec));
            }
        }
        let population: Vec<&str> = self
            .fields
            .keys()
            .chain(self.aliases.keys())
            .map(String::as_str)
            .collect();
        Err(ParseError::UnknownField {
            key: key.to_string(),
            position,
            suggestions: Suggestions::find(self.suggester.as_ref(), key, &population),
        })
    }

    fn check_mandatory(&self, seen: &BTreeMap<&str, String>) -> ParseResult<()> {
        for (key, spec) in &self.fields {
            if spec.mandatory && !seen.contains_key(key.as_str()) {
                return Err(ParseError::MissingField { key: key.clone() });
            }
        }
        Ok(())
    }

    /// Checks that the parser has been assembled consistently. Run once at
    /// setup; a failure is a programming error.
    pub fn check(&self) -> Result<(), ConfigError> {
        self.allowed.check()?;
        self.check_fields()?;
        self.check_aliases()
    }

    fn check_fields(&self) -> Result<(), ConfigError> {
        if self.fields.is_empty() {
            return Err(ConfigError::NoFields);
        }
        for (key, spec) in &self.fields {
            if !is_valid_key(key) {
                return Err(ConfigError::InvalidFieldKey { key: key.clone() });
            }
            if !spec.setter.takes_value() {
                return Err(ConfigError::ValueNotTaken { key: key.clone() });
            }
            spec.setter
                .check()
                .map_err(|reason| ConfigError::FieldCheck {
                    key: key.clone(),
                    reason,
                })?;
        }
        Ok(())
    }

    fn check_aliases(&self) -> Result<(), ConfigError> {
        for (alias, target) in &self.aliases {
            if self.fields.contains_key(alias) {
                return Err(ConfigError::AliasShadowsField {
                    alias: alias.clone(),
                });
            }
            if !self.fields.contains_key(target) {
                return Err(ConfigError::AliasTargetMissing {
                    alias: alias.clone(),
                    target: target.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn short_description(&self) -> &'static str {
        VALUE_FORM
    }

    /// The full help text: the value form, then the allowed names, fields
    /// and aliases.
    pub fn allowed_values(&self) -> String {
        let mut text = format!("a value of the form {VALUE_FORM}");
        text.push_str(&self.describe_names());
        text.push_str(&self.describe_fields());
        text.push_str(&self.describe_aliases());
        text
    }

    fn describe_names(&self) -> String {
        if self.allowed.is_empty() {
            return String::new();
        }
        let width = self.allowed.names().map(display_width).max().unwrap_or(0);
        let mut text = String::from("\n\nthe allowed names are:");
        for (name, description) in self.allowed.iter() {
            text.push_str(&format!("\n- {name:<width$}: {description}"));
        }
        text
    }

    fn describe_fields(&self) -> String {
        let mut text = if self.fields.len() == 1 {
            String::from("\n\nthe allowed field name and value is:")
        } else {
            String::from("\n\nthe allowed field names and values are:")
        };
        let width = self.fields.keys().map(|key| display_width(key)).max().unwrap_or(0);
        let mut described: BTreeMap<String, &str> = BTreeMap::new();
        for (key, spec) in &self.fields {
            let values = spec.setter.allowed_values();
            let shown = match described.get(&values) {
                Some(first) => format!("as for {first:?}"),
                None => {
                    described.insert(values.clone(), key.as_str());
                    values
                }
            };
            text.push_str(&format!("\n- {key:<width$}: {shown}"));
        }
        text
    }

    fn describe_aliases(&self) -> String {
        if self.aliases.is_empty() {
            return String::new();
        }
        let mut text = if self.aliases.len() == 1 {
            String::from("\n\nthe following alias for the field name is allowed:")
        } else {
            String::from("\n\nthe following aliases for the field names are allowed:")
        };
        let width = self.aliases.keys().map(|alias| display_width(alias)).max().unwrap_or(0);
        for (alias, target) in &self.aliases {
            text.push_str(&format!("\n- {alias:<width$}: {target}"));
        }
        text
    }
}

// `{:<width$}` pads by chars, not bytes.
fn display_width(text: &str) -> usize {
    text.chars().count()
}
