use std::collections::BTreeMap;

use multiparam_core::{
    AllowedNames, FieldSpec, ListSetter, RecordParser, ValueSetter, at_least, greater_than,
};

const DEFAULT_NGRAM_LEN: usize = 3;

const OVERFLOW_CHAR: char = '\u{0}';

/// How strings are cut into n-grams for the n-gram based algorithms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NGramConfig {
    pub len: usize,
    /// A string shorter than `len` forms a single n-gram only if it has at
    /// least this many characters. Zero means any non-empty string does.
    pub min_len: usize,
    /// Pads both ends of the string so that every character appears in
    /// `len` n-grams.
    pub overflow: bool,
}

impl Default for NGramConfig {
    fn default() -> Self {
        Self {
            len: DEFAULT_NGRAM_LEN,
            min_len: 0,
            overflow: false,
        }
    }
}

impl NGramConfig {
    /// Counts each distinct n-gram of `s`.
    pub fn ngrams(&self, s: &str) -> BTreeMap<String, usize> {
        let len = self.len.max(1);
        let mut chars: Vec<char> = s.chars().collect();
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        if chars.is_empty() {
            return counts;
        }
        if self.overflow && len > 1 {
            let pad = std::iter::repeat_n(OVERFLOW_CHAR, len - 1);
            chars = pad.clone().chain(chars).chain(pad).collect();
        }
        if chars.len() < len {
            if chars.len() >= self.min_len {
                counts.insert(chars.iter().collect(), 1);
            }
            return counts;
        }
        for window in chars.windows(len) {
            *counts.entry(window.iter().collect()).or_insert(0) += 1;
        }
        counts
    }
}

/// Tuning parameters given with each `--algo` value.
#[derive(Debug, Clone, PartialEq)]
pub struct AlgoParams {
    pub ngrams: NGramConfig,
    pub threshold: f64,
    pub use_given_threshold: bool,
    pub min_str_len: usize,
    pub map_to_lower_case: bool,
    pub strip_runes: String,
}

impl Default for AlgoParams {
    fn default() -> Self {
        Self {
            ngrams: NGramConfig::default(),
            threshold: 0.0,
            use_given_threshold: false,
            min_str_len: 0,
            map_to_lower_case: false,
            strip_runes: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Levenshtein,
    ScaledLevenshtein,
    DamerauLevenshtein,
    Hamming,
    JaroWinkler,
    SorensenDice,
    Jaccard,
    WeightedJaccard,
    Cosine,
}

impl Algorithm {
    pub const ALL: [Algorithm; 9] = [
        Algorithm::Levenshtein,
        Algorithm::ScaledLevenshtein,
        Algorithm::DamerauLevenshtein,
        Algorithm::Hamming,
        Algorithm::JaroWinkler,
        Algorithm::SorensenDice,
        Algorithm::Jaccard,
        Algorithm::WeightedJaccard,
        Algorithm::Cosine,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Levenshtein => "levenshtein",
            Algorithm::ScaledLevenshtein => "scaled-levenshtein",
            Algorithm::DamerauLevenshtein => "damerau-levenshtein",
            Algorithm::Hamming => "hamming",
            Algorithm::JaroWinkler => "jaro-winkler",
            Algorithm::SorensenDice => "sorensen-dice",
            Algorithm::Jaccard => "jaccard",
            Algorithm::WeightedJaccard => "weighted-jaccard",
            Algorithm::Cosine => "cosine",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Algorithm::Levenshtein => "a Levenshtein algorithm",
            Algorithm::ScaledLevenshtein => "a Levenshtein algorithm scaled to [0, 1]",
            Algorithm::DamerauLevenshtein => "a Damerau-Levenshtein algorithm",
            Algorithm::Hamming => "a Hamming algorithm, equal length strings only",
            Algorithm::JaroWinkler => "a Jaro-Winkler algorithm",
            Algorithm::SorensenDice => "a Sorensen-Dice bigram algorithm",
            Algorithm::Jaccard => "a Jaccard n-gram algorithm",
            Algorithm::WeightedJaccard => "a weighted Jaccard n-gram algorithm",
            Algorithm::Cosine => "a cosine n-gram algorithm",
        }
    }

    pub fn default_threshold(self) -> f64 {
        match self {
            Algorithm::Levenshtein | Algorithm::DamerauLevenshtein => 5.0,
            Algorithm::Hamming => 3.0,
            Algorithm::ScaledLevenshtein => 0.33,
            Algorithm::JaroWinkler => 0.3,
            Algorithm::SorensenDice => 0.5,
            Algorithm::Jaccard | Algorithm::WeightedJaccard => 0.7,
            Algorithm::Cosine => 0.3,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|algo| algo.name() == name)
    }

    /// The distance between two strings; zero for identical strings. `None`
    /// when the algorithm cannot compare them.
    pub fn distance(self, a: &str, b: &str, ngrams: &NGramConfig) -> Option<f64> {
        match self {
            Algorithm::Levenshtein => Some(strsim::levenshtein(a, b) as f64),
            Algorithm::ScaledLevenshtein => Some(1.0 - strsim::normalized_levenshtein(a, b)),
            Algorithm::DamerauLevenshtein => Some(strsim::damerau_levenshtein(a, b) as f64),
            Algorithm::Hamming => strsim::hamming(a, b).ok().map(|d| d as f64),
            Algorithm::JaroWinkler => Some(1.0 - strsim::jaro_winkler(a, b)),
            Algorithm::SorensenDice => Some(1.0 - strsim::sorensen_dice(a, b)),
            Algorithm::Jaccard => Some(jaccard_distance(&ngrams.ngrams(a), &ngrams.ngrams(b))),
            Algorithm::WeightedJaccard => Some(weighted_jaccard_distance(
                &ngrams.ngrams(a),
                &ngrams.ngrams(b),
            )),
            Algorithm::Cosine => Some(cosine_distance(&ngrams.ngrams(a), &ngrams.ngrams(b))),
        }
    }
}

type NGramCounts = BTreeMap<String, usize>;

fn jaccard_distance(a: &NGramCounts, b: &NGramCounts) -> f64 {
    let common = a.keys().filter(|gram| b.contains_key(*gram)).count();
    let union = a.len() + b.len() - common;
    if union == 0 {
        return 0.0;
    }
    1.0 - common as f64 / union as f64
}

fn weighted_jaccard_distance(a: &NGramCounts, b: &NGramCounts) -> f64 {
    let mut min_total = 0;
    let mut max_total = 0;
    for gram in a.keys().chain(b.keys().filter(|gram| !a.contains_key(*gram))) {
        let in_a = a.get(gram).copied().unwrap_or(0);
        let in_b = b.get(gram).copied().unwrap_or(0);
        min_total += in_a.min(in_b);
        max_total += in_a.max(in_b);
    }
    if max_total == 0 {
        return 0.0;
    }
    1.0 - min_total as f64 / max_total as f64
}

fn cosine_distance(a: &NGramCounts, b: &NGramCounts) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let dot: usize = a
        .iter()
        .filter_map(|(gram, count)| b.get(gram).map(|other| count * other))
        .sum();
    let squares = |counts: &NGramCounts| counts.values().map(|count| count * count).sum::<usize>();
    let norms = (squares(a) * squares(b)) as f64;
    if norms == 0.0 {
        return 1.0;
    }
    (1.0 - dot as f64 / norms.sqrt()).max(0.0)
}

fn check_distinct_chars(value: &String) -> Result<(), String> {
    let chars: Vec<char> = value.chars().collect();
    for (index, ch) in chars.iter().enumerate() {
        if let Some(first) = chars[..index].iter().position(|other| other == ch) {
            return Err(format!(
                "{value:?} contains duplicate characters: {ch:?} appears at both the {} and {} positions",
                multiparam_core::ordinal(first + 1),
                multiparam_core::ordinal(index + 1),
            ));
        }
    }
    Ok(())
}

/// The setter behind the `--algo` parameter.
pub fn algo_param_setter() -> ListSetter<String, AlgoParams> {
    let allowed: AllowedNames = Algorithm::ALL
        .into_iter()
        .map(|algo| (algo.name(), algo.description()))
        .collect();

    let parser = RecordParser::new(AlgoParams::default())
        .field(
            "nGramLen",
            FieldSpec::new(
                ValueSetter::parsed(|p: &mut AlgoParams| &mut p.ngrams.len, "a whole number")
                    .with_check(greater_than(0)),
            ),
        )
        .field(
            "minNGramLen",
            FieldSpec::new(
                ValueSetter::parsed(
                    |p: &mut AlgoParams| &mut p.ngrams.min_len,
                    "a whole number",
                )
                .with_check(greater_than(0)),
            ),
        )
        .field(
            "overflowNGrams",
            FieldSpec::new(ValueSetter::boolean(|p: &mut AlgoParams| {
                &mut p.ngrams.overflow
            })),
        )
        .field(
            "threshold",
            FieldSpec::new(
                ValueSetter::parsed(|p: &mut AlgoParams| &mut p.threshold, "a number")
                    .with_check(at_least(0.0)),
            )
            .with_post_action(|p: &mut AlgoParams, _, _| {
                p.use_given_threshold = true;
                Ok(())
            }),
        )
        .field(
            "minStrLen",
            FieldSpec::new(ValueSetter::parsed(
                |p: &mut AlgoParams| &mut p.min_str_len,
                "a whole number",
            )),
        )
        .field(
            "mapToLowerCase",
            FieldSpec::new(ValueSetter::boolean(|p: &mut AlgoParams| {
                &mut p.map_to_lower_case
            })),
        )
        .field(
            "stripRunes",
            FieldSpec::new(
                ValueSetter::string(|p: &mut AlgoParams| &mut p.strip_runes)
                    .with_check(check_distinct_chars),
            ),
        )
        .alias("nGramLength", "nGramLen")
        .alias("ngLength", "nGramLen")
        .alias("ngLen", "nGramLen")
        .alias("minNGramLength", "minNGramLen")
        .alias("ngMinLen", "minNGramLen")
        .alias("ngMinLength", "minNGramLen")
        .alias("overflow", "overflowNGrams")
        .alias("Overflow", "overflowNGrams")
        .alias("Threshold", "threshold")
        .alias("toLower", "mapToLowerCase")
        .alias("mapToLowercase", "mapToLowerCase")
        .alias("stripChars", "stripRunes")
        .allowed_names(allowed);

    ListSetter::new(parser)
}
