use std::fmt::Display;
use std::str::FromStr;

use crate::error::FieldError;

/// Converts a raw field value and stores it in one slot of the record.
pub trait FieldSetter<T> {
    fn set(&self, record: &mut T, value: &str) -> Result<(), FieldError>;

    /// Describes the values this setter accepts, for help text.
    fn allowed_values(&self) -> String;

    /// Setters that take no value cannot be used in a `key="value"` list.
    fn takes_value(&self) -> bool {
        true
    }

    /// Self-check run at setup; the error text explains what is wrong.
    fn check(&self) -> Result<(), String> {
        Ok(())
    }
}

pub type ValueCheck<V> = Box<dyn Fn(&V) -> Result<(), String>>;

/// Runs after a field has been set, with the record, the canonical key and
/// the raw value.
pub type PostAction<T> = Box<dyn Fn(&mut T, &str, &str) -> Result<(), FieldError>>;

/// Parses a value and, if every check passes, writes it through `access`.
pub struct ValueSetter<T, V> {
    access: fn(&mut T) -> &mut V,
    parse: fn(&str) -> Result<V, String>,
    description: String,
    checks: Vec<ValueCheck<V>>,
}

impl<T, V> ValueSetter<T, V> {
    pub fn new(
        access: fn(&mut T) -> &mut V,
        parse: fn(&str) -> Result<V, String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            access,
            parse,
            description: description.into(),
            checks: Vec::new(),
        }
    }

    pub fn with_check(mut self, check: impl Fn(&V) -> Result<(), String> + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }
}

impl<T, V> ValueSetter<T, V>
where
    V: FromStr,
    V::Err: Display,
{
    pub fn parsed(access: fn(&mut T) -> &mut V, description: impl Into<String>) -> Self {
        Self::new(access, parse_from_str::<V>, description)
    }
}

impl<T> ValueSetter<T, bool> {
    pub fn boolean(access: fn(&mut T) -> &mut bool) -> Self {
        Self::new(access, parse_bool, "a boolean (true or false)")
    }
}

impl<T> ValueSetter<T, String> {
    pub fn string(access: fn(&mut T) -> &mut String) -> Self {
        Self::new(access, |value| Ok(value.to_string()), "any string")
    }
}

impl<T, V> FieldSetter<T> for ValueSetter<T, V> {
    fn set(&self, record: &mut T, value: &str) -> Result<(), FieldError> {
        let parsed = (self.parse)(value).map_err(FieldError::new)?;
        for check in &self.checks {
            check(&parsed).map_err(FieldError::new)?;
        }
        *(self.access)(record) = parsed;
        Ok(())
    }

    fn allowed_values(&self) -> String {
        if self.checks.is_empty() {
            self.description.clone()
        } else {
            format!("{} subject to checks", self.description)
        }
    }

    fn check(&self) -> Result<(), String> {
        if self.description.is_empty() {
            return Err("the value description is empty".to_string());
        }
        Ok(())
    }
}

fn parse_from_str<V>(value: &str) -> Result<V, String>
where
    V: FromStr,
    V::Err: Display,
{
    value
        .parse::<V>()
        .map_err(|err| format!("could not interpret {value:?}: {err}"))
}

pub fn parse_bool(value: &str) -> Result<bool, String> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(format!("could not interpret {value:?} as a boolean")),
    }
}

pub fn greater_than<V>(limit: V) -> impl Fn(&V) -> Result<(), String>
where
    V: PartialOrd + Display,
{
    move |value| {
        if *value > limit {
            Ok(())
        } else {
            Err(format!("the value ({value}) must be greater than {limit}"))
        }
    }
}

pub fn at_least<V>(limit: V) -> impl Fn(&V) -> Result<(), String>
where
    V: PartialOrd + Display,
{
    move |value| {
        if *value >= limit {
            Ok(())
        } else {
            Err(format!("the value ({value}) must be at least {limit}"))
        }
    }
}

pub fn not_empty<V: AsRef<str>>(value: &V) -> Result<(), String> {
    if value.as_ref().is_empty() {
        Err("the value must not be empty".to_string())
    } else {
        Ok(())
    }
}

/// A field descriptor: the setter, its post-assignment actions and whether
/// the field must appear in every value.
pub struct FieldSpec<T> {
    pub(crate) setter: Box<dyn FieldSetter<T>>,
    pub(crate) post_actions: Vec<PostAction<T>>,
    pub(crate) mandatory: bool,
}

impl<T> FieldSpec<T> {
    pub fn new(setter: impl FieldSetter<T> + 'static) -> Self {
        Self {
            setter: Box::new(setter),
            post_actions: Vec::new(),
            mandatory: false,
        }
    }

    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    pub fn with_post_action(
        mut self,
        action: impl Fn(&mut T, &str, &str) -> Result<(), FieldError> + 'static,
    ) -> Self {
        self.post_actions.push(Box::new(action));
        self
    }

    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    pub fn setter(&self) -> &dyn FieldSetter<T> {
        self.setter.as_ref()
    }

    pub(crate) fn apply(&self, record: &mut T, key: &str, value: &str) -> Result<(), ApplyError> {
        self.setter
            .set(record, value)
            .map_err(ApplyError::Setter)?;
        for action in &self.post_actions {
            action(record, key, value).map_err(ApplyError::PostAction)?;
        }
        Ok(())
    }
}

pub(crate) enum ApplyError {
    Setter(FieldError),
    PostAction(FieldError),
}

#[cfg(test)]
mod tests {
    use super::{FieldSetter, FieldSpec, ValueSetter, at_least, greater_than, not_empty, parse_bool};
    use crate::error::FieldError;

    #[derive(Debug, Default)]
    struct Record {
        count: i64,
        ratio: f64,
        enabled: bool,
        label: String,
        touched: bool,
    }

    #[test]
    fn parses_integers_with_checks() {
        let setter = ValueSetter::parsed(|r: &mut Record| &mut r.count, "an integer")
            .with_check(greater_than(0));
        let mut record = Record::default();
        setter.set(&mut record, "4").expect("set");
        assert_eq!(record.count, 4);

        let err = setter.set(&mut record, "0").expect_err("check");
        assert!(err.message.contains("greater than 0"));
        assert_eq!(record.count, 4);

        let err = setter.set(&mut record, "four").expect_err("parse");
        assert!(err.message.contains("could not interpret \"four\""));
    }

    #[test]
    fn parses_floats_and_strings() {
        let ratio = ValueSetter::parsed(|r: &mut Record| &mut r.ratio, "a number")
            .with_check(at_least(0.0));
        let label = ValueSetter::string(|r: &mut Record| &mut r.label).with_check(not_empty);
        let mut record = Record::default();
        ratio.set(&mut record, "0.25").expect("ratio");
        label.set(&mut record, "hello world").expect("label");
        assert_eq!(record.ratio, 0.25);
        assert_eq!(record.label, "hello world");
        assert!(label.set(&mut record, "").is_err());
        assert!(ratio.set(&mut record, "-1").is_err());
    }

    #[test]
    fn booleans_accept_common_spellings() {
        assert_eq!(parse_bool("T"), Ok(true));
        assert_eq!(parse_bool("False"), Ok(false));
        assert!(parse_bool("yes").is_err());

        let setter = ValueSetter::boolean(|r: &mut Record| &mut r.enabled);
        let mut record = Record::default();
        setter.set(&mut record, "true").expect("set");
        assert!(record.enabled);
    }

    #[test]
    fn post_actions_run_after_the_setter() {
        let spec = FieldSpec::new(ValueSetter::parsed(|r: &mut Record| &mut r.count, "an integer"))
            .with_post_action(|record: &mut Record, key, value| {
                assert_eq!(key, "count");
                assert_eq!(value, "7");
                record.touched = record.count == 7;
                Ok(())
            });
        let mut record = Record::default();
        assert!(spec.apply(&mut record, "count", "7").is_ok());
        assert!(record.touched);
    }

    #[test]
    fn failing_post_action_is_reported() {
        let spec = FieldSpec::new(ValueSetter::parsed(|r: &mut Record| &mut r.count, "an integer"))
            .with_post_action(|_: &mut Record, _, _| Err(FieldError::new("nope")));
        let mut record = Record::default();
        assert!(matches!(
            spec.apply(&mut record, "count", "1"),
            Err(super::ApplyError::PostAction(_))
        ));
    }
}
