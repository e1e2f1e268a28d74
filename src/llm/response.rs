use async_openai::{
    Client,
    config::OpenAIConfig,
    error::{ApiError, OpenAIError},
    types::chat::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Network or API error: {0}")]
    Network(OpenAIError),

    #[error("API Error: {0}")]
    Api(ApiError),

    #[error("Unexpected API response format: {0}")]
    MalformedResponse(String),
}

impl From<OpenAIError> for LlmError {
    fn from(err: OpenAIError) -> Self {
        match err {
            OpenAIError::ApiError(api) => LlmError::Api(api),
            OpenAIError::JSONDeserialize(err, _) => LlmError::MalformedResponse(err.to_string()),
            other => LlmError::Network(other),
        }
    }
}

/// One chat-completion round trip: a single user-role message in, the text
/// of the first choice out, verbatim.
pub async fn request_single_text_response(
    client: &Client<OpenAIConfig>,
    model: &str,
    user_prompt: &str,
) -> Result<String, LlmError> {
    let request = CreateChatCompletionRequestArgs::default()
        .model(model)
        .messages([ChatCompletionRequestUserMessageArgs::default()
            .content(user_prompt)
            .build()?
            .into()])
        .build()?;

    let response = client.chat().create(request).await?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::MalformedResponse("response contained no choices".to_string()))?;

    choice.message.content.ok_or_else(|| {
        LlmError::MalformedResponse("first choice contained no message content".to_string())
    })
}
