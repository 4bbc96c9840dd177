//! Completion model access.
//!
//! Wraps the chat-completion endpoint behind a small trait so the
//! summarizer and generator can be exercised against a canned model in
//! tests.

use crate::error::{MinneError, Result};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;

/// Trait for single-shot text completion.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Send a rendered prompt and return the model's text response.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// OpenAI-backed completion model.
pub struct OpenAiModel {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl OpenAiModel {
    pub fn new(model: &str, temperature: f32) -> Self {
        Self {
            client: create_client(),
            model: model.to_string(),
            temperature,
        }
    }
}

#[async_trait]
impl CompletionModel for OpenAiModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt.to_string())
                .build()
                .map_err(|e| MinneError::OpenAI(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(|e| MinneError::OpenAI(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| MinneError::OpenAI(format!("Failed to get completion: {}", e)))?;

        response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| MinneError::OpenAI("Empty response from model".to_string()))
    }
}
