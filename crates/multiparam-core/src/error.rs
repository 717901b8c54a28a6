use thiserror::Error;

use crate::english::ordinal;
use crate::suggest::Suggestions;

/// A value handed to a field setter or post-assignment action was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FieldError {
    pub message: String,
}

impl FieldError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors in the text of a single parameter value. The target container is
/// left untouched when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("the name may not be empty")]
    EmptyName,
    #[error("bad name: {name:?}, the name is not recognised{suggestions}")]
    UnknownName {
        name: String,
        suggestions: Suggestions,
    },
    #[error("cannot get any values from the parameter: {text:?}")]
    NoAssignments { text: String },
    #[error(
        "unexpected text: {text:?}, before the {} entry: {entry:?}, expecting key=\"value\"",
        ordinal(*.position)
    )]
    UnexpectedText {
        text: String,
        position: usize,
        entry: String,
    },
    #[error("unexpected text: {text:?}, at the end of the parameter value")]
    TrailingText { text: String },
    #[error("bad field name ({key:?}), at the {} entry{suggestions}", ordinal(*.position))]
    UnknownField {
        key: String,
        position: usize,
        suggestions: Suggestions,
    },
    #[error(
        "the value for {key:?} has been set twice, with {first:?} and then with {second:?} (the {} entry)",
        ordinal(*.position)
    )]
    DuplicateField {
        key: String,
        first: String,
        second: String,
        position: usize,
    },
    #[error("bad value for {key:?}: {source}")]
    InvalidValue {
        key: String,
        #[source]
        source: FieldError,
    },
    #[error("post-assignment action for {key:?} failed: {source}")]
    PostAction {
        key: String,
        #[source]
        source: FieldError,
    },
    #[error("the value for {key:?} must be set but hasn't been")]
    MissingField { key: String },
}

/// Setup mistakes found by the configuration checks. These are programming
/// errors in the assembly of a setter, never the fault of the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("bad allowed name {name:?}: {reason}")]
    InvalidAllowedName { name: String, reason: &'static str },
    #[error("there must be at least one field setter")]
    NoFields,
    #[error(
        "bad field key {key:?}: it should be a letter or underscore followed by zero or more letters, digits or underscores"
    )]
    InvalidFieldKey { key: String },
    #[error("bad field setter {key:?}: it must take a value")]
    ValueNotTaken { key: String },
    #[error("bad field setter {key:?}: {reason}")]
    FieldCheck { key: String, reason: String },
    #[error("the alias {alias:?} is the same as a field name")]
    AliasShadowsField { alias: String },
    #[error("the alias {alias:?} (= {target:?}) does not refer to a field name")]
    AliasTargetMissing { alias: String, target: String },
    #[error("the entry with name {name:?} is invalid - it is not in the allowed names")]
    DisallowedEntry { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{param}: setter check failed: {source}")]
pub struct SetterCheckError {
    pub param: String,
    #[source]
    pub source: ConfigError,
}

pub type ParseResult<T> = Result<T, ParseError>;
