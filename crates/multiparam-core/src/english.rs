pub fn ordinal_suffix(n: usize) -> &'static str {
    if (11..=13).contains(&(n % 100)) {
        return "th";
    }
    match n % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

pub fn ordinal(n: usize) -> String {
    format!("{n}{}", ordinal_suffix(n))
}

/// Joins the items, each wrapped in double quotes, using `last_sep` between
/// the final pair and `sep` everywhere else.
pub fn join_quoted<S: AsRef<str>>(items: &[S], sep: &str, last_sep: &str) -> String {
    let mut joined = String::new();
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            if index + 1 == items.len() {
                joined.push_str(last_sep);
            } else {
                joined.push_str(sep);
            }
        }
        joined.push('"');
        joined.push_str(item.as_ref());
        joined.push('"');
    }
    joined
}
