//! Chat completion over an OpenAI-compatible `/chat/completions` endpoint.

use super::{ChatMessage, ChatModel, Role};
use crate::config::{Credentials, Settings};
use crate::error::{DocmindError, Result};
use crate::openai::{classify_error, create_client, Service};
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Remote chat model.
pub struct OpenAIChatModel {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl OpenAIChatModel {
    /// Create a chat model from settings.
    pub fn new(settings: &Settings, credentials: &Credentials) -> Result<Self> {
        Ok(Self {
            client: create_client(&settings.api, credentials)?,
            model: settings.rag.model.clone(),
        })
    }

    /// The configured model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn to_request_message(message: &ChatMessage) -> Result<ChatCompletionRequestMessage> {
        let built: ChatCompletionRequestMessage = match message.role {
            Role::System => ChatCompletionRequestSystemMessageArgs::default()
                .content(message.content.clone())
                .build()
                .map_err(|e| classify_error(e, Service::Chat))?
                .into(),
            Role::User => ChatCompletionRequestUserMessageArgs::default()
                .content(message.content.clone())
                .build()
                .map_err(|e| classify_error(e, Service::Chat))?
                .into(),
            Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                .content(message.content.clone())
                .build()
                .map_err(|e| classify_error(e, Service::Chat))?
                .into(),
        };
        Ok(built)
    }
}

/// First candidate's text, trimmed. Missing or blank text is a generation error.
pub(crate) fn extract_answer(response: &CreateChatCompletionResponse) -> Result<String> {
    let content = response
        .choices
        .first()
        .ok_or_else(|| DocmindError::Generation("Response contained no choices".to_string()))?
        .message
        .content
        .as_deref()
        .ok_or_else(|| DocmindError::Generation("Response contained no text".to_string()))?;

    let answer = content.trim();
    if answer.is_empty() {
        return Err(DocmindError::Generation("Empty response from LLM".to_string()));
    }
    Ok(answer.to_string())
}

#[async_trait]
impl ChatModel for OpenAIChatModel {
    #[instrument(skip(self, messages), fields(model = %self.model, messages = messages.len()))]
    #[allow(deprecated)]
    async fn complete(&self, messages: &[ChatMessage], max_tokens: u32, temperature: f32) -> Result<String> {
        let request_messages = messages
            .iter()
            .map(Self::to_request_message)
            .collect::<Result<Vec<_>>>()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(request_messages)
            .max_tokens(max_tokens)
            .temperature(temperature)
            .build()
            .map_err(|e| classify_error(e, Service::Chat))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| classify_error(e, Service::Chat))?;

        let answer = extract_answer(&response)?;
        debug!("Generated answer of {} characters", answer.len());
        Ok(answer)
    }
}
