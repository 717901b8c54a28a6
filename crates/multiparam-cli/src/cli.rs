use std::io::{self, Write};
use std::path::PathBuf;

use multiparam_core::{ParamSetter, ParseError, SetterCheckError};
use thiserror::Error;

use crate::algo::algo_param_setter;
use crate::config::{DEFAULT_CONFIG_PATH, load_config_or_default, resolve_path};
use crate::error::CliError;
use crate::finder::Finder;
use crate::population::{PopulationError, load_population};
use crate::report::write_report;

const ALGO_PARAM: &str = "--algo";

#[derive(Debug, Error)]
pub enum CliAppError {
    #[error("{0}")]
    Usage(String),
    #[error("config error: {0}")]
    Config(#[from] CliError),
    #[error(transparent)]
    Setup(#[from] SetterCheckError),
    #[error("bad value for {flag}: {source}")]
    Param {
        flag: &'static str,
        #[source]
        source: ParseError,
    },
    #[error("unknown algorithm: {0:?}")]
    UnknownAlgorithm(String),
    #[error(transparent)]
    Population(#[from] PopulationError),
    #[error("cannot print the report: {0}")]
    Report(#[from] io::Error),
}

impl CliAppError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliAppError::Setup(_) => 2,
            _ => 1,
        }
    }
}

/// What the command line asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    Run(RunOptions),
    Help(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub config_path: PathBuf,
    pub word_file: Option<PathBuf>,
    pub algos: Vec<String>,
    pub max_results: Option<usize>,
    pub words: Vec<String>,
}

pub fn run() -> Result<(), CliAppError> {
    let stdout = io::stdout();
    match parse_options(std::env::args().skip(1).collect())? {
        Invocation::Run(options) => run_with(&options, &mut stdout.lock()),
        Invocation::Help(text) => {
            writeln!(stdout.lock(), "{text}")?;
            Ok(())
        }
    }
}

pub fn run_with(options: &RunOptions, out: &mut impl Write) -> Result<(), CliAppError> {
    let config = load_config_or_default(&options.config_path)?;
    let mut setter = algo_param_setter();
    setter.check(ALGO_PARAM)?;

    let algos = if options.algos.is_empty() {
        &config.algorithms
    } else {
        &options.algos
    };
    if algos.is_empty() {
        return Err(CliAppError::Usage(format!(
            "{ALGO_PARAM} must be given at least once\n\n{}",
            usage()
        )));
    }
    for algo in algos {
        setter
            .set_value(algo)
            .map_err(|source| CliAppError::Param {
                flag: ALGO_PARAM,
                source,
            })?;
    }
    tracing::debug!(algorithms = %setter.current_value(), "algorithms selected");

    let max_results = options.max_results.unwrap_or(config.max_results);
    if max_results == 0 {
        return Err(CliAppError::Usage(
            "--max-results must be greater than 0".to_string(),
        ));
    }

    let word_file = match (&options.word_file, &config.word_file) {
        (Some(path), _) => path.clone(),
        (None, Some(value)) => resolve_path(&options.config_path, value),
        (None, None) => {
            return Err(CliAppError::Usage(format!(
                "--word-file must be given\n\n{}",
                usage()
            )));
        }
    };

    if options.words.is_empty() {
        writeln!(out, "There are no words to search for")?;
        return Ok(());
    }

    let population = load_population(&word_file)?;
    let finders = setter
        .values()
        .iter()
        .map(|named| {
            Finder::from_named(named).ok_or_else(|| CliAppError::UnknownAlgorithm(named.name.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(finders = finders.len(), "finders built");

    write_report(out, &options.words, &finders, &population, max_results)?;
    Ok(())
}

pub fn parse_options(args: Vec<String>) -> Result<Invocation, CliAppError> {
    let mut config_path = PathBuf::from(DEFAULT_CONFIG_PATH);
    let mut word_file = None;
    let mut algos = Vec::new();
    let mut max_results = None;
    let mut words = Vec::new();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => config_path = PathBuf::from(next_value("--config", &mut iter)?),
            "--word-file" => word_file = Some(PathBuf::from(next_value("--word-file", &mut iter)?)),
            "--algo" => algos.push(next_value("--algo", &mut iter)?),
            "--max-results" => {
                let value = next_value("--max-results", &mut iter)?;
                let parsed = value.parse::<usize>().map_err(|_| {
                    CliAppError::Usage(format!(
                        "--max-results expects a whole number, got {value:?}\n\n{}",
                        usage()
                    ))
                })?;
                max_results = Some(parsed);
            }
            "--help" | "-h" => return Ok(Invocation::Help(help())),
            "--" => {
                words.extend(iter.by_ref());
            }
            flag if flag.starts_with("--") => {
                return Err(CliAppError::Usage(format!(
                    "unknown flag: {flag}\n\n{}",
                    usage()
                )));
            }
            _ => words.push(arg),
        }
    }

    Ok(Invocation::Run(RunOptions {
        config_path,
        word_file,
        algos,
        max_results,
        words,
    }))
}

fn next_value(flag: &str, iter: &mut impl Iterator<Item = String>) -> Result<String, CliAppError> {
    iter.next()
        .ok_or_else(|| CliAppError::Usage(format!("{flag} requires a value\n\n{}", usage())))
}

fn usage() -> String {
    let setter = algo_param_setter();
    format!(
        "usage: strdistmatch [--config <path>] [--word-file <path>] --algo <{}> [--algo <...>...] [--max-results <n>] [--] <word>...",
        setter.value_description()
    )
}

fn help() -> String {
    let setter = algo_param_setter();
    format!(
        "{}\n\nfinds matches to the given words from the population in the word file. Each\n--algo names a string distance algorithm and its parameters; the results are\ntabulated so the algorithms and parameter sets can be compared.\n\n--algo: {}",
        usage(),
        setter.allowed_values()
    )
}

#[cfg(test)]
mod tests {
    use super::{CliAppError, Invocation, RunOptions, parse_options, run_with};
    use multiparam_core::ParseError;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    fn temp_dir() -> PathBuf {
        let mut path = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        path.push(format!("strdistmatch_cli_{nanos}"));
        fs::create_dir_all(&path).expect("dir");
        path
    }

    fn run_options(args: Vec<String>) -> RunOptions {
        match parse_options(args).expect("options") {
            Invocation::Run(options) => options,
            other => panic!("unexpected invocation: {other:?}"),
        }
    }

    fn options(dir: &PathBuf, algos: &[&str], words: &[&str]) -> RunOptions {
        RunOptions {
            config_path: dir.join("strdistmatch.toml"),
            word_file: Some(dir.join("words.txt")),
            algos: args(algos),
            max_results: None,
            words: args(words),
        }
    }

    #[test]
    fn parses_flags_and_words() {
        let options = run_options(args(&[
            "--algo",
            "levenshtein",
            "--word-file",
            "w.txt",
            "--algo",
            r#"jaccard=nGramLen="2""#,
            "--max-results",
            "3",
            "kitten",
            "--",
            "--dashed",
        ]));
        assert_eq!(options.algos.len(), 2);
        assert_eq!(options.word_file, Some(PathBuf::from("w.txt")));
        assert_eq!(options.max_results, Some(3));
        assert_eq!(options.words, args(&["kitten", "--dashed"]));
    }

    #[test]
    fn rejects_missing_values_and_unknown_flags() {
        assert!(matches!(
            parse_options(args(&["--algo"])),
            Err(CliAppError::Usage(_))
        ));
        assert!(matches!(
            parse_options(args(&["--bogus"])),
            Err(CliAppError::Usage(_))
        ));
        assert!(matches!(
            parse_options(args(&["--max-results", "many"])),
            Err(CliAppError::Usage(_))
        ));
    }

    #[test]
    fn help_describes_the_algo_values() {
        match parse_options(args(&["--help"])) {
            Ok(Invocation::Help(text)) => {
                assert!(text.starts_with("usage: strdistmatch"));
                assert!(text.contains("the allowed names are:"));
                assert!(text.contains("jaro-winkler"));
                assert!(text.contains("stripChars"));
                assert!(text.contains("weighted-jaccard"));
                assert!(text.contains("overflowNGrams"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn runs_and_prints_the_report() {
        let dir = temp_dir();
        fs::write(dir.join("words.txt"), "kitten\nmitten\nsitting\n").expect("words");
        let mut out = Vec::new();
        run_with(
            &options(&dir, &["levenshtein", r#"jaro-winkler=threshold="0.1""#], &["kitten"]),
            &mut out,
        )
        .expect("run");
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text.lines().count(), 4);
        assert!(text.contains("levenshtein"));
        assert!(text.contains("jaro-winkler"));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn bad_algo_value_is_a_param_error() {
        let dir = temp_dir();
        let err = run_with(&options(&dir, &[r#"levenshtein=k="1" xyz"#], &["kitten"]), &mut Vec::new())
            .expect_err("bad value");
        match err {
            CliAppError::Param { flag, source } => {
                assert_eq!(flag, "--algo");
                assert!(matches!(source, ParseError::TrailingText { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn algorithms_can_come_from_the_config_file() {
        let dir = temp_dir();
        fs::write(dir.join("words.txt"), "kitten\n").expect("words");
        fs::write(
            dir.join("strdistmatch.toml"),
            "max_results = 1\nword_file = \"words.txt\"\nalgorithms = [\"hamming\"]\n",
        )
        .expect("config");
        let mut run_options = options(&dir, &[], &["kitten"]);
        run_options.word_file = None;
        let mut out = Vec::new();
        run_with(&run_options, &mut out).expect("run");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("hamming"));
        assert!(!text.contains("distance 2"));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_algorithms_are_a_usage_error() {
        let dir = temp_dir();
        let err = run_with(&options(&dir, &[], &["kitten"]), &mut Vec::new()).expect_err("no algo");
        assert!(matches!(err, CliAppError::Usage(_)));
        assert_eq!(err.exit_code(), 1);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn no_words_prints_a_notice() {
        let dir = temp_dir();
        let mut out = Vec::new();
        run_with(&options(&dir, &["hamming"], &[]), &mut out).expect("run");
        assert_eq!(String::from_utf8(out).expect("utf8"), "There are no words to search for\n");
        fs::remove_dir_all(&dir).ok();
    }
}
