//! Header clean-up for CSV files loaded into staging tables.

use std::collections::HashSet;

/// Makes a header usable as a column name: spaces and dots become `_`,
/// `#` becomes `Num`. `"# of Reviews"` turns into `"Num_of_Reviews"` and
/// `"Avg. Price per Mo"` into `"Avg__Price_per_Mo"`.
pub fn sanitize_header(header: &str) -> String {
    header
        .trim_start_matches('\u{feff}')
        .replace(' ', "_")
        .replace('#', "Num")
        .replace('.', "_")
}

/// Sanitizes every header and resolves collisions (case-insensitively) by
/// appending `_2`, `_3`, ... Blank headers get a positional name.
pub fn sanitize_headers<S: AsRef<str>>(headers: &[S]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut result = Vec::with_capacity(headers.len());

    for (idx, raw) in headers.iter().enumerate() {
        let mut base = sanitize_header(raw.as_ref());
        if base.trim().is_empty() {
            base = format!("Column_{}", idx + 1);
        }

        let mut candidate = base.clone();
        let mut suffix = 2;
        while !seen.insert(candidate.to_lowercase()) {
            candidate = format!("{base}_{suffix}");
            suffix += 1;
        }
        result.push(candidate);
    }

    result
}
