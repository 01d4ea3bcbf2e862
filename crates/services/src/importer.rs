//! Question-bank import from tabular rows.
//!
//! Columns map positionally: prompt, answer, options A through H, explanation,
//! difficulty, category. Spreadsheet decoding itself is out of scope; callers
//! hand over rows of cells, and a thin CSV front-end covers the common case.

use std::collections::BTreeSet;
use std::io::Read;

use quiz_core::model::{AnswerValue, Library, MAX_OPTIONS, Question};

use crate::error::ImportError;

const COL_PROMPT: usize = 0;
const COL_ANSWER: usize = 1;
const COL_OPTIONS: usize = 2;
const COL_EXPLANATION: usize = COL_OPTIONS + MAX_OPTIONS;
const COL_DIFFICULTY: usize = COL_EXPLANATION + 1;
const COL_CATEGORY: usize = COL_DIFFICULTY + 1;

// Tokens a judgment answer cell may carry, checked against the whole
// trimmed/upper-cased cell before letter extraction.
const TRUE_TOKENS: [&str; 3] = ["TRUE", "对", "正确"];
const FALSE_TOKENS: [&str; 3] = ["FALSE", "错", "错误"];

/// Normalize an answer cell: trim, upper-case, and keep only the characters
/// that can mean something: option letters and the two judge tokens.
#[must_use]
pub fn normalize_answer(raw: &str) -> String {
    raw.trim()
        .to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_uppercase() || *c == '对' || *c == '错')
        .collect()
}

/// Derive the answer key from a raw answer cell.
///
/// Judge tokens win first; otherwise the normalized letters decide between
/// multi (several letters) and single (exactly one). `None` means the cell
/// carries no usable answer and the row should be discarded.
#[must_use]
pub fn parse_answer_key(raw: &str) -> Option<AnswerValue> {
    let token = raw.trim().to_uppercase();
    if TRUE_TOKENS.contains(&token.as_str()) {
        return Some(AnswerValue::Judgment(true));
    }
    if FALSE_TOKENS.contains(&token.as_str()) {
        return Some(AnswerValue::Judgment(false));
    }

    let letters: BTreeSet<char> = normalize_answer(raw)
        .chars()
        .filter(char::is_ascii_uppercase)
        .collect();
    match letters.len() {
        0 => None,
        1 => letters.first().copied().map(AnswerValue::Single),
        _ => Some(AnswerValue::Multiple(letters)),
    }
}

fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map_or("", String::as_str).trim()
}

/// Build a question from one positional row, or `None` when the row lacks a
/// prompt or a usable answer.
#[must_use]
pub fn question_from_row(row: &[String]) -> Option<Question> {
    let prompt = cell(row, COL_PROMPT);
    if prompt.is_empty() {
        return None;
    }
    let answer = parse_answer_key(cell(row, COL_ANSWER))?;

    let options: Vec<String> = (0..MAX_OPTIONS)
        .map(|slot| cell(row, COL_OPTIONS + slot).to_owned())
        .collect();

    let mut question = Question::new(prompt, answer)
        .ok()?
        .with_options(options)
        .ok()?;
    question.explanation = cell(row, COL_EXPLANATION).to_owned();
    let difficulty = cell(row, COL_DIFFICULTY);
    if !difficulty.is_empty() {
        question.difficulty = difficulty.to_owned();
    }
    let category = cell(row, COL_CATEGORY);
    if !category.is_empty() {
        question.category = category.to_owned();
    }
    question.points = Some(question.kind().default_points());
    Some(question)
}

/// Import rows into a named library.
///
/// Rows without a prompt or a usable answer are discarded and logged.
///
/// # Errors
///
/// Returns `ImportError::NoQuestions` when nothing usable remains.
pub fn import_rows(name: &str, rows: &[Vec<String>]) -> Result<Library, ImportError> {
    let mut questions = Vec::new();
    let mut skipped = 0_usize;

    for (line, row) in rows.iter().enumerate() {
        match question_from_row(row) {
            Some(question) => questions.push(question),
            None => {
                skipped += 1;
                tracing::debug!(line = line + 1, "skipping row without prompt or answer key");
            }
        }
    }

    if questions.is_empty() {
        return Err(ImportError::NoQuestions);
    }
    if skipped > 0 {
        tracing::warn!(skipped, library = name, "discarded unusable rows during import");
    }

    Ok(Library::new(name, questions))
}

/// Read positional rows from CSV input (no header row expected).
///
/// # Errors
///
/// Returns `ImportError::Malformed` with the underlying cause on parse failure.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<Vec<String>>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(|e| ImportError::Malformed(e.to_string()))?;
        rows.push(record.iter().map(str::to_owned).collect());
    }
    Ok(rows)
}

/// Convenience: read CSV input and import it as a named library.
///
/// # Errors
///
/// Returns `ImportError` for malformed input or an empty result.
pub fn import_csv<R: Read>(name: &str, reader: R) -> Result<Library, ImportError> {
    import_rows(name, &read_rows(reader)?)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
