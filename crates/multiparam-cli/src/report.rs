use std::io::{self, Write};

use tabled::builder::Builder;
use tabled::settings::Style;

use crate::finder::Finder;

const FIXED_HEADERS: [&str; 7] = [
    "target",
    "algorithm",
    "threshold",
    "min len",
    "lower",
    "strip",
    "# results",
];

/// Writes one row per word and finder. The word is shown only on the first
/// of its rows.
pub fn write_report(
    out: &mut impl Write,
    words: &[String],
    finders: &[Finder],
    population: &[String],
    max_results: usize,
) -> io::Result<()> {
    let mut builder = Builder::new();
    builder.push_record(header(max_results));
    for word in words {
        for (index, finder) in finders.iter().enumerate() {
            let found = finder.find_like(word, population);
            let mut row = vec![
                if index == 0 { word.clone() } else { String::new() },
                finder.algorithm.name().to_string(),
                format!("{:.5}", finder.threshold),
                finder.min_str_len.to_string(),
                finder.map_to_lower_case.to_string(),
                finder.strip_runes.clone(),
                found.len().to_string(),
            ];
            for slot in 0..max_results {
                match found.get(slot) {
                    Some(hit) => {
                        row.push(format!("{:.4}", hit.distance));
                        row.push(hit.value.clone());
                    }
                    None => {
                        row.push(String::new());
                        row.push(String::new());
                    }
                }
            }
            builder.push_record(row);
        }
    }

    let mut table = builder.build();
    table.with(Style::psql());
    writeln!(out, "{table}")
}

fn header(max_results: usize) -> Vec<String> {
    let mut header: Vec<String> = FIXED_HEADERS.iter().map(|h| h.to_string()).collect();
    for slot in 1..=max_results {
        header.push(format!("distance {slot}"));
        header.push(format!("value {slot}"));
    }
    header
}

#[cfg(test)]
mod tests {
    use super::write_report;
    use crate::algo::{AlgoParams, Algorithm};
    use crate::finder::Finder;

    #[test]
    fn writes_header_and_rows() {
        let finders = vec![
            Finder::new(Algorithm::Levenshtein, &AlgoParams::default()),
            Finder::new(Algorithm::JaroWinkler, &AlgoParams::default()),
        ];
        let population = vec!["kitten".to_string(), "mitten".to_string()];
        let mut out = Vec::new();
        write_report(&mut out, &["kitten".to_string()], &finders, &population, 2)
            .expect("report");
        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].trim_start().starts_with("target"));
        assert!(lines[0].contains("distance 2"));
        assert!(lines[1].starts_with("---"));
        assert!(lines[2].trim_start().starts_with("kitten | levenshtein"));
        assert!(lines[2].contains("0.0000"));
        assert!(lines[2].contains("mitten"));
        assert!(lines[3].trim_start().starts_with("| jaro-winkler"));
    }

    #[test]
    fn empty_result_slots_keep_the_columns() {
        let finders = vec![Finder::new(Algorithm::Hamming, &AlgoParams::default())];
        let population = vec!["dog".to_string()];
        let mut out = Vec::new();
        write_report(&mut out, &["kitten".to_string()], &finders, &population, 3)
            .expect("report");
        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("value 3"));
        assert_eq!(lines[2].matches('|').count(), lines[0].matches('|').count());
    }
}
