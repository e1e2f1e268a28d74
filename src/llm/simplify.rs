use anyhow::Result;
use async_openai::{Client, config::OpenAIConfig};
use serde::Serialize;

use super::response::request_single_text_response;
use crate::prompts::{PromptSet, SIMPLIFY_TEMPLATE};

#[derive(Serialize)]
struct SimplifyContext<'a> {
    language: &'a str,
    level: &'a str,
    article: &'a str,
}

pub fn build_simplify_prompt(
    prompts: &PromptSet,
    article: &str,
    language: &str,
    level: &str,
) -> Result<String> {
    let prompt = prompts.render(
        SIMPLIFY_TEMPLATE,
        &SimplifyContext {
            language,
            level,
            article,
        },
    )?;
    Ok(prompt)
}

pub async fn request_article_simplification(
    client: &Client<OpenAIConfig>,
    model: &str,
    prompts: &PromptSet,
    article: &str,
    language: &str,
    level: &str,
) -> Result<String> {
    let prompt = build_simplify_prompt(prompts, article, language, level)?;
    let simplified = request_single_text_response(client, model, &prompt).await?;
    Ok(simplified)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_simplify_prompt_substitutes_placeholders() {
        let prompts = PromptSet::from_templates([(
            SIMPLIFY_TEMPLATE,
            "Rewrite in {{language}} at {{level}} level:\n{{article}}",
        )]);

        let prompt =
            build_simplify_prompt(&prompts, "The cat sat on the mat.", "German", "B1").unwrap();
        assert_eq!(
            prompt,
            "Rewrite in German at B1 level:\nThe cat sat on the mat."
        );
    }

    #[test]
    fn test_build_simplify_prompt_missing_template() {
        let prompts = PromptSet::from_templates([("unrelated", "text")]);
        assert!(build_simplify_prompt(&prompts, "article", "German", "B1").is_err());
    }
}
