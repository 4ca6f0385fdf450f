use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::types::LlmClient;
use super::StructuringError;

/// General-purpose local models tried in order when none is configured.
pub const PREFERRED_MODELS: &[&str] = &["llama3.1", "llama3", "mistral", "gemma2", "qwen2.5"];

/// Ollama HTTP client for local model inference.
pub struct OllamaClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaClient {
    /// Client for the Ollama instance at `base_url`. Every request is
    /// bounded by `timeout_secs`.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, StructuringError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| StructuringError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_send_error(&self, e: reqwest::Error) -> StructuringError {
        if e.is_timeout() {
            StructuringError::Timeout(self.timeout_secs)
        } else if e.is_connect() {
            StructuringError::OllamaConnection(self.base_url.clone())
        } else {
            StructuringError::HttpClient(e.to_string())
        }
    }

    fn check_status(
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, StructuringError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(StructuringError::OllamaError {
            status: status.as_u16(),
            body,
        })
    }
}

/// Model to use: the configured one, else the installed tag of the first
/// preferred model the server has.
pub fn select_model(
    client: &dyn LlmClient,
    configured: Option<&str>,
) -> Result<String, StructuringError> {
    if let Some(model) = configured {
        return Ok(model.to_string());
    }
    let available = client.list_models()?;
    PREFERRED_MODELS
        .iter()
        .find_map(|preferred| available.iter().find(|m| m.starts_with(preferred)))
        .cloned()
        .ok_or(StructuringError::NoModelAvailable)
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    format: &'a str,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

/// Response body from Ollama /api/tags
#[derive(Deserialize)]
struct OllamaTagsResponse {
    models: Vec<OllamaModel>,
}

#[derive(Deserialize)]
struct OllamaModel {
    name: String,
}

impl LlmClient for OllamaClient {
    fn generate(&self, model: &str, prompt: &str, system: &str) -> Result<String, StructuringError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = OllamaGenerateRequest {
            model,
            prompt,
            system,
            stream: false,
            format: "json",
            options: OllamaOptions { temperature: 0.1 },
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| self.map_send_error(e))?;
        let response = Self::check_status(response)?;

        let parsed: OllamaGenerateResponse = response
            .json()
            .map_err(|e| StructuringError::ResponseParsing(e.to_string()))?;

        Ok(parsed.response)
    }

    fn list_models(&self) -> Result<Vec<String>, StructuringError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| self.map_send_error(e))?;
        let response = Self::check_status(response)?;

        let parsed: OllamaTagsResponse = response
            .json()
            .map_err(|e| StructuringError::ResponseParsing(e.to_string()))?;

        Ok(parsed.models.into_iter().map(|m| m.name).collect())
    }
}

/// Mock LLM client for testing: returns a configurable response and
/// remembers the prompts it was given.
pub struct MockLlmClient {
    response: String,
    available_models: Vec<String>,
    prompts: Mutex<Vec<String>>,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            available_models: vec!["llama3.1:8b".to_string()],
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.available_models = models;
        self
    }

    /// Number of `generate` calls made so far.
    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().ok().and_then(|p| p.last().cloned())
    }
}

impl LlmClient for MockLlmClient {
    fn generate(&self, _model: &str, prompt: &str, _system: &str) -> Result<String, StructuringError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        Ok(self.response.clone())
    }

    fn list_models(&self) -> Result<Vec<String>, StructuringError> {
        Ok(self.available_models.clone())
    }
}

/// LLM client whose every call fails with the given error.
pub struct FailingLlmClient {
    error: StructuringError,
}

impl FailingLlmClient {
    pub fn new(error: StructuringError) -> Self {
        Self { error }
    }

    /// Fails the way an Ollama instance that is not running does.
    pub fn unreachable() -> Self {
        Self::new(StructuringError::OllamaConnection(
            "http://localhost:11434".to_string(),
        ))
    }
}

impl LlmClient for FailingLlmClient {
    fn generate(&self, _model: &str, _prompt: &str, _system: &str) -> Result<String, StructuringError> {
        Err(self.error.clone())
    }

    fn list_models(&self) -> Result<Vec<String>, StructuringError> {
        Err(self.error.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_client_returns_configured_response() {
        let client = MockLlmClient::new("test response");
        let result = client.generate("model", "prompt", "system").unwrap();
        assert_eq!(result, "test response");
        assert_eq!(client.call_count(), 1);
        assert_eq!(client.last_prompt().as_deref(), Some("prompt"));
    }

    #[test]
    fn mock_client_lists_models() {
        let client = MockLlmClient::new("").with_models(vec![
            "mistral:7b".into(),
            "llama3:8b".into(),
        ]);
        assert_eq!(
            client.list_models().unwrap(),
            vec!["mistral:7b".to_string(), "llama3:8b".to_string()]
        );
    }

    #[test]
    fn configured_model_is_used_as_is() {
        let client = FailingLlmClient::unreachable();
        assert_eq!(select_model(&client, Some("phi3")).unwrap(), "phi3");
    }

    #[test]
    fn first_preferred_installed_model_is_selected() {
        let client = MockLlmClient::new("").with_models(vec![
            "mistral:7b".into(),
            "llama3:8b".into(),
        ]);
        assert_eq!(select_model(&client, None).unwrap(), "llama3:8b");
    }

    #[test]
    fn no_preferred_model_installed() {
        let client = MockLlmClient::new("").with_models(vec!["phi3:mini".into()]);
        assert_eq!(select_model(&client, None), Err(StructuringError::NoModelAvailable));
    }

    #[test]
    fn failing_client_propagates_its_error() {
        let client = FailingLlmClient::new(StructuringError::Timeout(30));
        assert_eq!(
            client.generate("m", "p", "s"),
            Err(StructuringError::Timeout(30))
        );
        assert!(matches!(
            select_model(&client, None),
            Err(StructuringError::Timeout(30))
        ));
    }

    #[test]
    fn ollama_client_trims_trailing_slash() {
        let client = OllamaClient::new("http://localhost:11434/", 60).unwrap();
        assert_eq!(client.base_url(), "http://localhost:11434");
        assert_eq!(client.timeout_secs, 60);
    }
}
