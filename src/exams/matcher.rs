// src/exams/matcher.rs

use super::directory::ExamDirectory;
use crate::models::{ExamRequirement, Program};

// --- Constants ---
// Fallback stage: tokens must be longer than this, and at least
// MIN_SHARED_TOKENS of them must occur in the directory name
const MIN_TOKEN_CHARS: usize = 3;
const MIN_SHARED_TOKENS: usize = 2;

/// Lower-cases and drops everything that is not a letter or a digit.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Finds the exam list for a program name. Stages run in a fixed order and the
/// first hit wins; ties inside a stage go to the earliest directory entry.
///
/// 1. exact match of normalized names;
/// 2. containment either way between normalized names;
/// 3. at least two query words longer than three characters occur in the entry name.
pub fn match_exams<'d>(directory: &'d ExamDirectory, query: &str) -> Option<&'d [ExamRequirement]> {
    let normalized = normalize_name(query);
    if normalized.is_empty() || directory.is_empty() {
        return None;
    }

    let candidates = || directory.iter().filter(|entry| !entry.normalized.is_empty());

    if let Some(entry) = candidates().find(|entry| entry.normalized == normalized) {
        tracing::debug!("Exam directory exact match for '{}': '{}'", query, entry.name);
        return Some(entry.exams.as_slice());
    }

    if let Some(entry) = candidates()
        .find(|entry| normalized.contains(&entry.normalized) || entry.normalized.contains(&normalized))
    {
        tracing::debug!("Exam directory containment match for '{}': '{}'", query, entry.name);
        return Some(entry.exams.as_slice());
    }

    let tokens: Vec<String> = query
        .split_whitespace()
        .filter(|word| word.chars().count() > MIN_TOKEN_CHARS)
        .map(normalize_name)
        .filter(|token| !token.is_empty())
        .collect();

    if let Some(entry) = candidates().find(|entry| {
        tokens.iter().filter(|token| entry.normalized.contains(token.as_str())).count() >= MIN_SHARED_TOKENS
    }) {
        tracing::debug!("Exam directory token match for '{}': '{}'", query, entry.name);
        return Some(entry.exams.as_slice());
    }

    tracing::debug!("No exam directory match for '{}'", query);
    None
}

/// Copies the directory's exams into `program` when the page itself listed none.
/// Returns true if the directory supplied them.
pub fn fill_missing_exams(program: &mut Program, directory: &ExamDirectory) -> bool {
    if !program.exams.is_empty() {
        return false;
    }
    match match_exams(directory, &program.name) {
        Some(exams) if !exams.is_empty() => {
            // The reference table may repeat a subject; the first score wins
            for exam in exams {
                if !program.exams.iter().any(|known| known.subject == exam.subject) {
                    program.exams.push(exam.clone());
                }
            }
            true
        }
        _ => false,
    }
}
