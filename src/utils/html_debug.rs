// src/utils/html_debug.rs
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::utils::error::StorageError;

// Text markers the field heuristics react to, with the highlight class for each
static MARKER_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"\d+\s*бюджетн", "budget"),
        (r"\d+\s*платн", "paid"),
        (r"\d+\s*(?:года?|лет)", "duration"),
        (r"(?i)очно-заочная|заочная|очная", "form"),
        (r"RUS\+ENG|ENG|(?i:на русском|на английском)", "language"),
        (r"(?i)минимальный балл[:\s]*\d+", "exam"),
    ]
    .iter()
    .filter_map(|(pat, class)| Regex::new(pat).ok().map(|re| (re, *class)))
    .collect()
});

const DEBUG_STYLE: &str = "<style>\n\
    .highlight-budget, .highlight-paid { background-color: #90EE90; }\n\
    .highlight-duration { background-color: #ADD8E6; }\n\
    .highlight-form { background-color: #FFFF00; }\n\
    .highlight-language { background-color: #FFA500; }\n\
    .highlight-exam { background-color: #FFC0CB; }\n\
    </style>\n";

/// Wraps every marker match in a highlighted `<span>`. Overlapping matches keep the earliest.
pub fn annotate_markers(html: &str) -> String {
    let mut highlights: Vec<(usize, usize, &str)> = MARKER_PATTERNS
        .iter()
        .flat_map(|(re, class)| re.find_iter(html).map(move |m| (m.start(), m.end(), *class)))
        .collect();
    highlights.sort_by_key(|h| (h.0, std::cmp::Reverse(h.1)));

    let mut annotated = String::with_capacity(html.len() + DEBUG_STYLE.len());
    annotated.push_str(DEBUG_STYLE);

    let mut last_pos = 0;
    for (start, end, class) in highlights {
        if start < last_pos {
            continue;
        }
        annotated.push_str(&html[last_pos..start]);
        annotated.push_str(&format!(
            "<span class=\"highlight-{}\" title=\"{} @ {}-{}\">",
            class, class, start, end
        ));
        annotated.push_str(&html[start..end]);
        annotated.push_str("</span>");
        last_pos = end;
    }
    annotated.push_str(&html[last_pos..]);

    annotated
}

/// Saves an annotated copy of a page for inspecting why a field was or wasn't found
pub fn save_annotated(html: &str, path: &Path) -> Result<(), StorageError> {
    fs::write(path, annotate_markers(html))?;
    tracing::debug!("Saved annotated page to {}", path.display());
    Ok(())
}
