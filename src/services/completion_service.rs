use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::error::Error;
use std::fmt;
use std::time::Duration;

const COMPLETION_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
// Itinerary drafts take the model a while; geocoding-style 10s is too tight.
const COMPLETION_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<PromptMessage>,
}

#[derive(Debug, Serialize)]
struct PromptMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: String,
}

#[derive(Debug)]
pub enum CompletionError {
    EnvironmentError(String),
    HttpError(reqwest::Error),
    ResponseError(String),
}

impl fmt::Display for CompletionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionError::EnvironmentError(msg) => write!(f, "Environment error: {}", msg),
            CompletionError::HttpError(err) => write!(f, "HTTP error: {}", err),
            CompletionError::ResponseError(msg) => write!(f, "Response error: {}", msg),
        }
    }
}

impl Error for CompletionError {}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        CompletionError::HttpError(err)
    }
}

/// Client for the language-model completion collaborator (Groq's
/// OpenAI-compatible chat endpoint). One free-text prompt in, the raw
/// assistant text out; callers are responsible for digging JSON out of it.
#[derive(Clone)]
pub struct CompletionService {
    client: Client,
    api_key: String,
    model: String,
}

impl CompletionService {
    pub fn new() -> Result<Self, CompletionError> {
        let api_key = env::var("GROQ_API_KEY")
            .map_err(|_| CompletionError::EnvironmentError("GROQ_API_KEY not set".to_string()))?;

        let model = env::var("GROQ_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let client = Client::builder()
            .timeout(Duration::from_secs(COMPLETION_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_key,
            model,
        })
    }

    /// Send a single-prompt completion and return the assistant text.
    pub async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![PromptMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let response = self
            .client
            .post(COMPLETION_ENDPOINT)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CompletionError::ResponseError(format!(
                "Completion request failed with status {}: {}",
                status, error_text
            )));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::ResponseError(format!("Failed to parse response: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                CompletionError::ResponseError("Completion response contained no choices".to_string())
            })
    }
}
