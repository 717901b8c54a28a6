use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PopulationError {
    #[error("cannot read the file of words to search ({path}): {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("the file of words to search ({path}) is empty")]
    Empty { path: PathBuf },
}

/// Reads the population to search, one word per line. Every line is kept,
/// blank ones included.
pub fn load_population(path: &Path) -> Result<Vec<String>, PopulationError> {
    let contents = fs::read_to_string(path).map_err(|source| PopulationError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let words: Vec<String> = contents.lines().map(str::to_string).collect();
    if words.is_empty() {
        return Err(PopulationError::Empty {
            path: path.to_path_buf(),
        });
    }
    tracing::debug!(path = %path.display(), entries = words.len(), "loaded population");
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::{PopulationError, load_population};
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        path.push(format!("strdistmatch_{name}_{nanos}.txt"));
        path
    }

    #[test]
    fn loads_one_word_per_line() {
        let path = temp_path("words");
        fs::write(&path, "alpha\nbeta\n\ngamma delta\n").expect("write");
        let words = load_population(&path).expect("load");
        assert_eq!(words, vec!["alpha", "beta", "", "gamma delta"]);
        fs::remove_file(&path).ok();
    }

    #[test]
    fn empty_file_is_an_error() {
        let path = temp_path("empty");
        fs::write(&path, "").expect("write");
        let err = load_population(&path).expect_err("empty");
        assert!(matches!(err, PopulationError::Empty { .. }));
        fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_population(&temp_path("missing")).expect_err("missing");
        assert!(matches!(err, PopulationError::Io { .. }));
    }
}
