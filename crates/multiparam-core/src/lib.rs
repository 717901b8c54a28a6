#![forbid(unsafe_code)]

mod allowed;
mod english;
mod error;
mod field;
mod lexer;
mod record;
mod suggest;
mod target;

pub use allowed::AllowedNames;
pub use english::{join_quoted, ordinal, ordinal_suffix};
pub use error::{ConfigError, FieldError, ParseError, ParseResult, SetterCheckError};
pub use field::{
    FieldSetter, FieldSpec, PostAction, ValueCheck, ValueSetter, at_least, greater_than,
    not_empty, parse_bool,
};
pub use lexer::{Assignment, Lexer, Span, is_valid_key};
pub use record::{RecordParser, VALUE_FORM};
pub use suggest::{JaroWinklerSuggester, MAX_SUGGESTIONS, Suggester, Suggestions};
pub use target::{ListSetter, MapSetter, NamedValue, ParamName, ParamSetter};
