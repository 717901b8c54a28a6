use std::cmp::Ordering;
use std::fmt;

use crate::english::join_quoted;

/// The most alternatives offered for a misspelt name or field key.
pub const MAX_SUGGESTIONS: usize = 3;

const JARO_WINKLER_THRESHOLD: f64 = 0.7;

/// Proposes likely-intended alternatives for a string that was not recognised.
pub trait Suggester {
    fn suggest(&self, query: &str, population: &[&str], max: usize) -> Vec<String>;
}

/// Case-blind Jaro-Winkler scoring over the whole population.
#[derive(Debug, Clone, Copy)]
pub struct JaroWinklerSuggester {
    threshold: f64,
}

impl JaroWinklerSuggester {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl Default for JaroWinklerSuggester {
    fn default() -> Self {
        Self::new(JARO_WINKLER_THRESHOLD)
    }
}

impl Suggester for JaroWinklerSuggester {
    fn suggest(&self, query: &str, population: &[&str], max: usize) -> Vec<String> {
        let query_lower = query.to_lowercase();
        let mut scored: Vec<(&str, f64)> = population
            .iter()
            .map(|candidate| {
                let score = strsim::jaro_winkler(&query_lower, &candidate.to_lowercase());
                (*candidate, score)
            })
            .filter(|(_, score)| *score >= self.threshold)
            .collect();
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });
        scored.dedup_by(|a, b| a.0 == b.0);
        scored
            .into_iter()
            .take(max)
            .map(|(candidate, _)| candidate.to_string())
            .collect()
    }
}

/// Alternatives attached to an "unrecognised" error. Displays as an empty
/// string when there are none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Suggestions(Vec<String>);

impl Suggestions {
    pub fn new(alternatives: Vec<String>) -> Self {
        Self(alternatives)
    }

    pub fn find(suggester: &dyn Suggester, query: &str, population: &[&str]) -> Self {
        if population.is_empty() {
            return Self::default();
        }
        Self(suggester.suggest(query, population, MAX_SUGGESTIONS))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Suggestions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        write!(f, ", did you mean {}", join_quoted(&self.0, ", ", " or "))
    }
}
