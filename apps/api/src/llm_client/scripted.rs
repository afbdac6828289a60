//! Scripted `InferenceClient` for pipeline and handler tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{InferenceClient, LlmError};

pub enum Script {
    Reply(String),
    ApiError { status: u16, message: String },
}

/// Answers every prompt with the same scripted outcome and keeps the prompts.
pub struct ScriptedInference {
    script: Script,
    /// Shared so a test can keep a handle after the client moves into `AppState`.
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedInference {
    pub fn reply(content: &str) -> Self {
        Self {
            script: Script::Reply(content.to_string()),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn api_error(status: u16, message: &str) -> Self {
        Self {
            script: Script::ApiError {
                status,
                message: message.to_string(),
            },
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl InferenceClient for ScriptedInference {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.script {
            Script::Reply(content) => Ok(content.clone()),
            Script::ApiError { status, message } => Err(LlmError::Api {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}
