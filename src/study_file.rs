use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

pub const DEFAULT_OUTPUT_DIR: &str = "simplifications";

/// Literal marker the question-generation prompt asks the model to emit
/// between the questions and the answers.
pub const ANSWERS_MARKER: &str = "### ANSWERS ###";

const FILENAME_PREFIX: &str = "simplified_";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const SEPARATOR_WIDTH: usize = 40;
const ANSWER_SPACER_LINES: usize = 50;
const PREVIEW_PARAGRAPHS: usize = 2;

/// At most the first two paragraphs of the simplified article, for a quick
/// console preview before question generation starts.
pub fn preview(simplified: &str) -> String {
    simplified
        .split("\n\n")
        .take(PREVIEW_PARAGRAPHS)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Assemble the study file: simplified article, separator, then the Q&A
/// payload. The payload is split into question and answer sections only when
/// the marker occurs exactly once; otherwise it is written through unchanged.
/// The blank-line run between the sections keeps the answers off-screen
/// while the learner works through the questions.
pub fn format_study_file(simplified: &str, qa_payload: &str) -> String {
    let mut content = format!("{}\n\n{}\n\n", simplified, "-".repeat(SEPARATOR_WIDTH));

    let parts: Vec<&str> = qa_payload.split(ANSWERS_MARKER).collect();
    if let [questions, answers] = parts[..] {
        content.push_str("COMPREHENSION QUESTIONS\n\n");
        content.push_str(questions.trim());
        content.push_str(&format!("\n\n{}\n\n", "\n".repeat(ANSWER_SPACER_LINES)));
        content.push_str("ANSWERS\n\n");
        content.push_str(answers.trim());
    } else {
        content.push_str(qa_payload);
    }

    content
}

pub fn study_filename(timestamp: DateTime<Local>) -> String {
    format!(
        "{}{}.txt",
        FILENAME_PREFIX,
        timestamp.format(TIMESTAMP_FORMAT)
    )
}

/// Create the output directory if needed and write the whole study file in
/// one shot.
pub fn write_study_file(output_dir: &Path, contents: &str) -> Result<PathBuf> {
    fs::create_dir_all(output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            output_dir.display()
        )
    })?;

    let path = output_dir.join(study_filename(Local::now()));
    fs::write(&path, contents)
        .with_context(|| format!("Error saving file: {}", path.display()))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use regex::Regex;
    use tempfile::tempdir;

    #[test]
    fn test_format_splits_questions_and_answers() {
        let formatted = format_study_file("Simple text.", "Q1?\n### ANSWERS ###\nA1.");

        let expected = format!(
            "Simple text.\n\n{}\n\nCOMPREHENSION QUESTIONS\n\nQ1?\n\n{}\n\nANSWERS\n\nA1.",
            "-".repeat(40),
            "\n".repeat(50)
        );
        assert_eq!(formatted, expected);
    }

    #[test]
    fn test_format_spacer_sits_between_questions_and_answers() {
        let formatted = format_study_file("Simple text.", "Q1?\n### ANSWERS ###\nA1.");

        let questions_at = formatted.find("Q1?").unwrap();
        let spacer_at = formatted.find(&"\n".repeat(50)).unwrap();
        let answers_at = formatted.find("A1.").unwrap();
        assert!(questions_at < spacer_at);
        assert!(spacer_at < answers_at);
    }

    #[test]
    fn test_format_without_marker_is_verbatim() {
        let payload = "1. Why?\n2. How?";
        let formatted = format_study_file("Simple text.", payload);

        assert!(formatted.ends_with(payload));
        assert!(!formatted.contains("COMPREHENSION QUESTIONS"));
        assert!(!formatted.contains("ANSWERS\n"));
    }

    #[test]
    fn test_format_with_repeated_marker_is_verbatim() {
        let payload = "Q1?\n### ANSWERS ###\nA1.\n### ANSWERS ###\nA1 again.";
        let formatted = format_study_file("Simple text.", payload);

        assert!(formatted.ends_with(payload));
        assert!(!formatted.contains("COMPREHENSION QUESTIONS"));
    }

    #[test]
    fn test_format_separator_line() {
        let formatted = format_study_file("Simple text.", "payload");
        assert!(formatted.starts_with(&format!("Simple text.\n\n{}\n\n", "-".repeat(40))));
    }

    #[test]
    fn test_preview_takes_first_two_paragraphs() {
        let simplified = "First.\n\nSecond.\n\nThird.";
        assert_eq!(preview(simplified), "First.\n\nSecond.");
    }

    #[test]
    fn test_preview_with_single_paragraph() {
        let simplified = "Only one paragraph here.";
        assert_eq!(preview(simplified), simplified);
    }

    #[test]
    fn test_preview_empty_input() {
        assert_eq!(preview(""), "");
    }

    #[test]
    fn test_study_filename_format() {
        let timestamp = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 9).unwrap();
        assert_eq!(study_filename(timestamp), "simplified_20240309_140509.txt");
    }

    #[test]
    fn test_study_filename_pattern() {
        let pattern = Regex::new(r"^simplified_\d{8}_\d{6}\.txt$").unwrap();
        assert!(pattern.is_match(&study_filename(Local::now())));
    }

    #[test]
    fn test_write_creates_directory_and_is_idempotent() {
        let dir = tempdir().unwrap();
        let output_dir = dir.path().join("simplifications");

        let first = write_study_file(&output_dir, "first run").unwrap();
        assert!(output_dir.is_dir());
        assert_eq!(fs::read_to_string(&first).unwrap(), "first run");

        // Directory already present on the second run
        let second = write_study_file(&output_dir, "second run").unwrap();
        assert_eq!(fs::read_to_string(&second).unwrap(), "second run");
    }

    proptest! {
        #[test]
        fn format_passes_unsplittable_payload_through(
            payload in "[a-zA-Z0-9 ?.\\n]{0,120}",
        ) {
            let formatted = format_study_file("Simple text.", &payload);
            prop_assert!(formatted.ends_with(&payload));
            prop_assert!(!formatted.contains("COMPREHENSION QUESTIONS"));
        }
    }
}
