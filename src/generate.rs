//! Test case generation through a chat-completion API.
//!
//! The prompt asks for a markdown table with the seven [`Field`] columns. The
//! reply is returned untouched; turning it into records is the job of
//! [`crate::parse`].

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::domain::{ApiKey, Config, Field, Requirement};

/// Errors that can occur while requesting test cases.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The request could not be sent, or the response could not be read.
    #[error("request to the completion API failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status (authentication, rate limit,
    /// server error).
    #[error("completion API returned {status}: {body}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The response body, as returned.
        body: String,
    },

    /// The response body was not the expected JSON.
    #[error("unexpected completion API response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response contained no completion.
    #[error("completion API returned no choices")]
    EmptyReply,
}

/// A single-turn text completion service.
pub trait Completion {
    /// Sends `prompt` as a single user message and returns the reply text.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails. Implementations do not retry.
    fn complete(&self, prompt: &str) -> Result<String, GenerateError>;
}

impl<T: Completion + ?Sized> Completion for &T {
    fn complete(&self, prompt: &str) -> Result<String, GenerateError> {
        (**self).complete(prompt)
    }
}

/// Builds the prompt asking for `cases` manual test cases for a requirement.
#[must_use]
pub fn build_prompt(requirement: &Requirement, cases: usize) -> String {
    let columns = Field::ALL.map(Field::header).join(" | ");

    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "You are a QA engineer. Generate exactly {cases} manual test cases for this requirement."
    );
    let _ = writeln!(
        prompt,
        "Return them as a markdown table with exactly {cases} rows and these columns, in order:"
    );
    let _ = writeln!(prompt, "| {columns} |");
    let _ = writeln!(
        prompt,
        "Use the requirement ID below in the Requirement ID column. \
         Priority is one of High, Medium or Low. Do not use '|' inside cells."
    );
    let _ = writeln!(prompt);
    let _ = write!(
        prompt,
        "Requirement ({}): {}",
        requirement.id(),
        requirement.text()
    );
    prompt
}

/// Requests test cases for one requirement and returns the raw reply.
///
/// # Errors
///
/// Propagates any error from the completion service.
pub fn generate_test_cases<C: Completion>(
    client: &C,
    requirement: &Requirement,
    cases: usize,
) -> Result<String, GenerateError> {
    let prompt = build_prompt(requirement, cases);
    tracing::debug!(requirement = %requirement.id(), "requesting test cases");
    let reply = client.complete(&prompt)?;
    tracing::trace!(requirement = %requirement.id(), reply = %reply, "received reply");
    Ok(reply)
}

/// A client for OpenAI-compatible `chat/completions` endpoints.
#[derive(Debug)]
pub struct OpenAiClient {
    api_key: ApiKey,
    endpoint: String,
    model: String,
    temperature: f64,
    client: reqwest::blocking::Client,
}

impl OpenAiClient {
    /// Creates a client for the model and endpoint named in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed (for example,
    /// if TLS initialisation fails).
    pub fn new(api_key: ApiKey, config: &Config) -> Result<Self, GenerateError> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            api_key,
            endpoint: format!("{}/chat/completions", config.api_base),
            model: config.model.clone(),
            temperature: config.temperature,
            client: builder.build()?,
        })
    }

    /// The URL requests are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 1],
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl Completion for OpenAiClient {
    fn complete(&self, prompt: &str) -> Result<String, GenerateError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose())
            .json(&request)
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(GenerateError::Status {
                status: status.as_u16(),
                body,
            });
        }

        reply_text(&body)
    }
}

/// Extracts the first completion's text from a response body.
fn reply_text(body: &str) -> Result<String, GenerateError> {
    let response: ChatResponse = serde_json::from_str(body)?;
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.unwrap_or_default())
        .ok_or(GenerateError::EmptyReply)
}
