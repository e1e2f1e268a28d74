use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Result, anyhow, bail};
use dialoguer::{Input, theme::ColorfulTheme};

use crate::llm::{self, LlmConfig};
use crate::palette::Palette;
use crate::prompts::PromptSet;
use crate::study_file;
use crate::utils::trim_line;

/// The whole session, start to finish: templates, article, operator input,
/// two model calls, one study file. Any failure propagates straight up to
/// the top-level handler.
pub async fn run(article_path: &Path, prompts_path: &Path, output_dir: &Path) -> Result<()> {
    let prompts = PromptSet::load(prompts_path)?;
    let article = read_article(article_path)?;

    println!(
        "--- {} ---",
        Palette::paint(Palette::INFO, "Article Simplifier")
    );
    let language = ask_line("Target Language")?;
    let level = ask_line("Target Level (e.g., A2, Intermediate)")?;
    let (language, level) = require_session_params(&language, &level)?;

    let config = LlmConfig::from_sources()?;
    let client = llm::initialize_client(&config);

    println!("\nSimplifying article...");
    let simplified = llm::request_article_simplification(
        &client,
        &config.model,
        &prompts,
        &article,
        language,
        level,
    )
    .await?;

    println!("\n--- {} ---\n", Palette::paint(Palette::INFO, "PREVIEW"));
    println!("{}", study_file::preview(&simplified));
    println!("\n...\n");

    println!("Generating questions...");
    let qa_payload = llm::request_comprehension_questions(
        &client,
        &config.model,
        &prompts,
        &simplified,
        language,
        level,
    )
    .await?;

    let contents = study_file::format_study_file(&simplified, &qa_payload);
    let path = study_file::write_study_file(output_dir, &contents)?;

    println!(
        "{} Check {} for the full article, questions, and answers.",
        Palette::paint(Palette::SUCCESS, "Success!"),
        Palette::paint(Palette::ACCENT, path.display())
    );

    Ok(())
}

fn read_article(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|err| {
        if err.kind() == io::ErrorKind::NotFound {
            anyhow!(
                "{} not found. Create it with the text you want to simplify.",
                path.display()
            )
        } else {
            anyhow::Error::new(err)
                .context(format!("Failed to read article {}", path.display()))
        }
    })
}

fn ask_line(prompt: &str) -> Result<String> {
    let value: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    Ok(value)
}

fn require_session_params<'a>(language: &'a str, level: &'a str) -> Result<(&'a str, &'a str)> {
    match (trim_line(language), trim_line(level)) {
        (Some(language), Some(level)) => Ok((language, level)),
        _ => bail!("Language and Level are required."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_require_session_params_trims() {
        let (language, level) = require_session_params("  French ", " A2  ").unwrap();
        assert_eq!(language, "French");
        assert_eq!(level, "A2");
    }

    #[test]
    fn test_require_session_params_rejects_empty_language() {
        assert!(require_session_params("", "A2").is_err());
    }

    #[test]
    fn test_require_session_params_rejects_whitespace_level() {
        assert!(require_session_params("French", "   ").is_err());
    }

    #[test]
    fn test_read_article_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("article.txt");

        let err = read_article(&path).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_read_article_reads_whole_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("article.txt");
        fs::write(&path, "First.\n\nSecond.").unwrap();

        assert_eq!(read_article(&path).unwrap(), "First.\n\nSecond.");
    }
}
