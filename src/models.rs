//! Chat model catalogue and the eligibility check run before a chat request
//! is dispatched to a model.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::config::{self, EnvSource};
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChatModel {
    Gpt4oMini,
    Gpt4o,
    Llama70b,
    LocalLlama3,
    LocalGemma,
    LocalMistral,
    LocalPhi3,
    Custom,
}

impl ChatModel {
    pub const ALL: [ChatModel; 8] = [
        ChatModel::Gpt4oMini,
        ChatModel::Gpt4o,
        ChatModel::Llama70b,
        ChatModel::LocalLlama3,
        ChatModel::LocalGemma,
        ChatModel::LocalMistral,
        ChatModel::LocalPhi3,
        ChatModel::Custom,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ChatModel::Gpt4oMini => "gpt-4o-mini",
            ChatModel::Gpt4o => "gpt-4o",
            ChatModel::Llama70b => "llama-3-70b",
            ChatModel::LocalLlama3 => "llama3",
            ChatModel::LocalGemma => "gemma",
            ChatModel::LocalMistral => "mistral",
            ChatModel::LocalPhi3 => "phi3:14b",
            ChatModel::Custom => "custom",
        }
    }

    /// Served by a locally hosted runtime rather than a vendor API.
    pub fn is_local(self) -> bool {
        matches!(
            self,
            ChatModel::LocalLlama3
                | ChatModel::LocalGemma
                | ChatModel::LocalMistral
                | ChatModel::LocalPhi3
                | ChatModel::Custom
        )
    }
}

impl fmt::Display for ChatModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ChatModel {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.id() == s)
            .ok_or(ModelError::InvalidModel)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("OPENAI_API_KEY environment variable not found. Please add your OpenAI API key to the .env file.")]
    MissingOpenAiKey,

    #[error("GPT-4o has been disabled. Please try a different model or enable GPT-4 in your environment settings.")]
    Gpt4Disabled,

    #[error("GROQ_API_KEY environment variable not found. Please add your Groq API key to the .env file.")]
    MissingGroqKey,

    #[error("Local models are not enabled. Please enable local models in your environment settings.")]
    LocalModelsDisabled,

    #[error("Invalid model selected.")]
    InvalidModel,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Check that `model` can be used with the current environment.
pub fn check_model(env: &dyn EnvSource, model: ChatModel) -> Result<(), ModelError> {
    match model {
        ChatModel::Gpt4oMini | ChatModel::Gpt4o => {
            if config::lookup(env, "OPENAI_API_KEY").is_none() {
                return Err(ModelError::MissingOpenAiKey);
            }
            if model == ChatModel::Gpt4o && !config::flag(env, "GPT4_ENABLED", true)? {
                return Err(ModelError::Gpt4Disabled);
            }
        }
        ChatModel::Llama70b => {
            if config::lookup(env, "GROQ_API_KEY").is_none() {
                return Err(ModelError::MissingGroqKey);
            }
        }
        ChatModel::LocalLlama3
        | ChatModel::LocalGemma
        | ChatModel::LocalMistral
        | ChatModel::LocalPhi3
        | ChatModel::Custom => {
            if !config::flag(env, "ENABLE_LOCAL_MODELS", true)? {
                return Err(ModelError::LocalModelsDisabled);
            }
        }
    }
    Ok(())
}

/// Parse and check a model identifier as received from a client.
pub fn validate_model(env: &dyn EnvSource, model_id: &str) -> Result<ChatModel, ModelError> {
    let model: ChatModel = model_id.parse()?;
    check_model(env, model)?;
    Ok(model)
}
