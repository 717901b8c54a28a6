use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// One `key="value"` assignment from the field list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub key: String,
    pub value: String,
    /// The assignment as written, without surrounding whitespace.
    pub text: String,
    /// 1-based position within the field list.
    pub position: usize,
    pub span: Span,
}

struct Matched {
    span: Span,
    key: Span,
    value: Span,
}

enum Scan {
    Found(Matched),
    Resume(usize),
    Exhausted,
}

pub struct Lexer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            offset: 0,
        }
    }

    pub fn lex_all(mut self) -> Result<Vec<Assignment>, ParseError> {
        let mut assignments = Vec::new();
        while self.offset < self.bytes.len() {
            let position = assignments.len() + 1;
            match self.find_from(self.offset) {
                Some(matched) if matched.span.start == self.offset => {
                    assignments.push(self.assignment(matched, position));
                }
                Some(matched) => {
                    return Err(ParseError::UnexpectedText {
                        text: self.input[self.offset..matched.span.start].to_string(),
                        position,
                        entry: self.slice(&matched.span).trim().to_string(),
                    });
                }
                None if assignments.is_empty() => {
                    return Err(ParseError::NoAssignments {
                        text: self.input.to_string(),
                    });
                }
                None => {
                    return Err(ParseError::TrailingText {
                        text: self.input[self.offset..].to_string(),
                    });
                }
            }
        }
        Ok(assignments)
    }

    fn assignment(&mut self, matched: Matched, position: usize) -> Assignment {
        self.offset = matched.span.end;
        Assignment {
            key: self.slice(&matched.key).to_string(),
            value: self.slice(&matched.value).to_string(),
            text: self.slice(&matched.span).trim().to_string(),
            position,
            span: matched.span,
        }
    }

    /// Finds the leftmost assignment starting at or after `start`. Each
    /// failed attempt reports where the next one may begin, so every byte is
    /// looked at a bounded number of times.
    fn find_from(&self, start: usize) -> Option<Matched> {
        let mut offset = start;
        while offset < self.bytes.len() {
            match self.match_at(offset) {
                Scan::Found(matched) => return Some(matched),
                Scan::Resume(next) => offset = next.max(offset + 1),
                Scan::Exhausted => return None,
            }
        }
        None
    }

    fn match_at(&self, start: usize) -> Scan {
        let key_start = self.skip_whitespace(start);
        match self.bytes.get(key_start) {
            Some(byte) if is_key_start(*byte) => {}
            Some(_) => return Scan::Resume(key_start + 1),
            None => return Scan::Exhausted,
        }
        let mut offset = key_start + 1;
        while offset < self.bytes.len() && is_key_continue(self.bytes[offset]) {
            offset += 1;
        }
        let key = Span {
            start: key_start,
            end: offset,
        };
        // An attempt starting inside this key would reach the same byte
        // after it, so a failure from here on resumes at the key's end.
        let resume = Scan::Resume(key.end);
        offset = self.skip_whitespace(offset);
        if self.bytes.get(offset) != Some(&b'=') {
            return resume;
        }
        offset = self.skip_whitespace(offset + 1);
        if self.bytes.get(offset) != Some(&b'"') {
            return resume;
        }
        let value_start = offset + 1;
        let Some(value_len) = self.bytes[value_start..]
            .iter()
            .position(|byte| *byte == b'"')
        else {
            // no closing quote: no later opening quote can be closed either
            return Scan::Exhausted;
        };
        let value = Span {
            start: value_start,
            end: value_start + value_len,
        };
        let end = self.skip_whitespace(value.end + 1);
        Scan::Found(Matched {
            span: Span { start, end },
            key,
            value,
        })
    }

    fn skip_whitespace(&self, mut offset: usize) -> usize {
        while offset < self.bytes.len() && self.bytes[offset].is_ascii_whitespace() {
            offset += 1;
        }
        offset
    }

    fn slice(&self, span: &Span) -> &'a str {
        &self.input[span.start..span.end]
    }
}

pub fn is_key_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_'
}

pub fn is_key_continue(byte: u8) -> bool {
    is_key_start(byte) || byte.is_ascii_digit()
}

/// Whether `key` is a letter or underscore followed by letters, digits or
/// underscores.
pub fn is_valid_key(key: &str) -> bool {
    let mut bytes = key.bytes();
    match bytes.next() {
        Some(first) if is_key_start(first) => bytes.all(is_key_continue),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{Lexer, is_valid_key};
    use crate::error::ParseError;

    #[test]
    fn lexes_assignments_in_order() {
        let assignments = Lexer::new(r#"a="1" b_2 = "two words"  "#)
            .lex_all()
            .expect("lex");
        assert_eq!(assignments.len(), 2);
        assert_eq!(assignments[0].key, "a");
        assert_eq!(assignments[0].value, "1");
        assert_eq!(assignments[0].position, 1);
        assert_eq!(assignments[1].key, "b_2");
        assert_eq!(assignments[1].value, "two words");
        assert_eq!(assignments[1].text, r#"b_2 = "two words""#);
        assert_eq!(assignments[1].position, 2);
    }

    #[test]
    fn empty_values_and_non_ascii_content_are_allowed() {
        let assignments = Lexer::new(r#"a="" b="é=ü""#).lex_all().expect("lex");
        assert_eq!(assignments[0].value, "");
        assert_eq!(assignments[1].value, "é=ü");
    }

    #[test]
    fn reports_text_before_an_entry() {
        let err = Lexer::new(r#"k="1" xx j="2""#).lex_all().expect_err("lex");
        assert_eq!(
            err,
            ParseError::UnexpectedText {
                text: "xx".to_string(),
                position: 2,
                entry: r#"j="2""#.to_string(),
            }
        );
    }

    #[test]
    fn reports_text_before_the_first_entry() {
        let err = Lexer::new(r#"1k="1""#).lex_all().expect_err("lex");
        assert!(matches!(err, ParseError::UnexpectedText { position: 1, .. }));
    }

    #[test]
    fn reports_when_nothing_matches() {
        let err = Lexer::new("garbage").lex_all().expect_err("lex");
        assert_eq!(
            err,
            ParseError::NoAssignments {
                text: "garbage".to_string()
            }
        );
    }

    #[test]
    fn reports_trailing_text() {
        let err = Lexer::new(r#"k="1" xyz"#).lex_all().expect_err("lex");
        assert_eq!(
            err,
            ParseError::TrailingText {
                text: "xyz".to_string()
            }
        );
    }

    #[test]
    fn unterminated_quote_is_trailing_text() {
        let err = Lexer::new(r#"k="1" j="2"#).lex_all().expect_err("lex");
        assert!(matches!(err, ParseError::TrailingText { .. }));
    }

    #[test]
    fn long_unmatched_input_is_rejected() {
        let input = "a".repeat(200_000);
        let err = Lexer::new(&input).lex_all().expect_err("lex");
        assert!(matches!(err, ParseError::NoAssignments { ref text } if text.len() == 200_000));

        let input = "k=".repeat(100_000);
        let err = Lexer::new(&input).lex_all().expect_err("lex");
        assert!(matches!(err, ParseError::NoAssignments { .. }));
    }

    #[test]
    fn long_prefix_before_an_entry_is_reported() {
        let input = format!("{} k=\"1\"", "ab ".repeat(50_000).trim_end());
        let err = Lexer::new(&input).lex_all().expect_err("lex");
        match err {
            ParseError::UnexpectedText {
                text,
                position,
                entry,
            } => {
                assert_eq!(position, 1);
                assert_eq!(text.len(), 50_000 * 3 - 1);
                assert_eq!(entry, r#"k="1""#);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn a_key_inside_a_failed_key_run_is_not_matched() {
        let assignments = Lexer::new(r#"ab="1" cd e="2""#).lex_all();
        assert!(matches!(
            assignments,
            Err(ParseError::UnexpectedText { ref text, position: 2, .. }) if text == "cd"
        ));
    }

    #[test]
    fn validates_key_grammar() {
        assert!(is_valid_key("nGramLen"));
        assert!(is_valid_key("_x9"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("9x"));
        assert!(!is_valid_key("a-b"));
    }
}
