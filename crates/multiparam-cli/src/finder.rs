use std::cmp::Ordering;

use multiparam_core::NamedValue;

use crate::algo::{AlgoParams, Algorithm, NGramConfig};

#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub distance: f64,
    pub value: String,
}

/// Finds the members of a population within a distance threshold of a
/// target word.
#[derive(Debug, Clone, PartialEq)]
pub struct Finder {
    pub algorithm: Algorithm,
    pub threshold: f64,
    pub min_str_len: usize,
    pub map_to_lower_case: bool,
    pub strip_runes: String,
    pub ngrams: NGramConfig,
}

impl Finder {
    pub fn new(algorithm: Algorithm, params: &AlgoParams) -> Self {
        let threshold = if params.use_given_threshold {
            params.threshold
        } else {
            algorithm.default_threshold()
        };
        Self {
            algorithm,
            threshold,
            min_str_len: params.min_str_len,
            map_to_lower_case: params.map_to_lower_case,
            strip_runes: params.strip_runes.clone(),
            ngrams: params.ngrams.clone(),
        }
    }

    pub fn from_named(named: &NamedValue<String, AlgoParams>) -> Option<Self> {
        Algorithm::from_name(&named.name).map(|algorithm| Self::new(algorithm, &named.value))
    }

    pub fn find_like(&self, target: &str, population: &[String]) -> Vec<Match> {
        let target = self.prepare(target);
        let mut matches: Vec<Match> = population
            .iter()
            .filter_map(|candidate| {
                let prepared = self.prepare(candidate);
                if prepared.chars().count() < self.min_str_len {
                    return None;
                }
                let distance = self
                    .algorithm
                    .distance(&target, &prepared, &self.ngrams)?;
                (distance <= self.threshold).then(|| Match {
                    distance,
                    value: candidate.clone(),
                })
            })
            .collect();
        matches.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.value.cmp(&b.value))
        });
        matches
    }

    fn prepare(&self, s: &str) -> String {
        let stripped: String = s
            .chars()
            .filter(|ch| !self.strip_runes.contains(*ch))
            .collect();
        if self.map_to_lower_case {
            stripped.to_lowercase()
        } else {
            stripped
        }
    }
}
