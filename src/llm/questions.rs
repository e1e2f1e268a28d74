use anyhow::Result;
use async_openai::{Client, config::OpenAIConfig};
use serde::Serialize;

use super::response::request_single_text_response;
use crate::prompts::{PromptSet, QUESTIONS_TEMPLATE};

#[derive(Serialize)]
struct QuestionsContext<'a> {
    language: &'a str,
    level: &'a str,
    simplified_article: &'a str,
}

pub fn build_questions_prompt(
    prompts: &PromptSet,
    simplified_article: &str,
    language: &str,
    level: &str,
) -> Result<String> {
    let prompt = prompts.render(
        QUESTIONS_TEMPLATE,
        &QuestionsContext {
            language,
            level,
            simplified_article,
        },
    )?;
    Ok(prompt)
}

pub async fn request_comprehension_questions(
    client: &Client<OpenAIConfig>,
    model: &str,
    prompts: &PromptSet,
    simplified_article: &str,
    language: &str,
    level: &str,
) -> Result<String> {
    let prompt = build_questions_prompt(prompts, simplified_article, language, level)?;
    let qa_payload = request_single_text_response(client, model, &prompt).await?;
    Ok(qa_payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_questions_prompt_substitutes_placeholders() {
        let prompts = PromptSet::from_templates([(
            QUESTIONS_TEMPLATE,
            "Write questions in {{language}} for a {{level}} learner:\n{{simplified_article}}",
        )]);

        let prompt =
            build_questions_prompt(&prompts, "Der Hund schläft.", "German", "A2").unwrap();
        assert_eq!(
            prompt,
            "Write questions in German for a A2 learner:\nDer Hund schläft."
        );
    }

    #[test]
    fn test_build_questions_prompt_missing_placeholder() {
        // Template references a placeholder the step never provides
        let prompts =
            PromptSet::from_templates([(QUESTIONS_TEMPLATE, "{{language}} {{question_count}}")]);
        assert!(build_questions_prompt(&prompts, "text", "German", "A2").is_err());
    }
}
