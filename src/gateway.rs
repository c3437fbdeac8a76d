//! Suggestion gateway: optimization advice from a remote generative model
//!
//! Narrow contract around the text-generation service: send the analyzed
//! source plus its measured joules in a single prompt, get back free-form
//! advice that usually contains one fenced code block with a rewritten
//! program. Extraction takes the first fenced block only; a reply with no
//! block is still a valid reply (advice without a rewrite). All transport,
//! auth and quota problems surface as `GatewayError` so the caller can
//! degrade to "no suggestion available" without losing the rest of the
//! analysis.

use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Default gateway model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Request timeout; independent of the profiler's timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Failure modes of a suggestion request
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No credential configured; only surfaces when the gateway is used
    #[error("no API key configured (set GEMINI_API_KEY)")]
    MissingApiKey,
    /// Transport-level failure (connect, TLS, timeout, body decode)
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Service answered with a non-success status (auth, quota, ...)
    #[error("service returned HTTP {0}")]
    Status(u16),
    /// Reply parsed but carried no usable text
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Result of a suggestion request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Suggestion {
    /// Rewritten program extracted from the first fenced block, if any
    pub optimized_source: Option<String>,
    /// The raw reply text
    pub advice: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// Client for the remote text-generation service
#[derive(Debug)]
pub struct SuggestionGateway {
    client: reqwest::blocking::Client,
    model: String,
    api_key: Option<String>,
}

impl SuggestionGateway {
    /// Create a gateway for `model`, reading the credential from the
    /// environment. A missing key is not an error yet; it becomes one
    /// when `suggest` is called.
    pub fn new(model: &str) -> Result<Self, GatewayError> {
        let api_key = std::env::var(API_KEY_ENV).ok();
        Self::with_api_key(model, api_key)
    }

    /// Create a gateway with an explicit credential (or none)
    pub fn with_api_key(model: &str, api_key: Option<String>) -> Result<Self, GatewayError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            model: model.to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }

    /// Prompt sent to the service for one analysis
    pub fn build_prompt(source: &str, total_joules: f64) -> String {
        format!(
            "You are a Green Computing expert. The following Python code used {total_joules:.6} Joules.\n\
             1. Identify the 'Energy Hotspot' (the most inefficient part).\n\
             2. Provide an optimized version of the entire script.\n\
             3. Explain why the fix reduces CPU cycles.\n\
             \n\
             Return the optimized code inside a standard ```python ``` block.\n\
             \n\
             Original Code:\n\
             {source}\n"
        )
    }

    /// Ask the service for an optimized rewrite of `source`.
    pub fn suggest(&self, source: &str, total_joules: f64) -> Result<Suggestion, GatewayError> {
        let api_key = self.api_key.as_deref().ok_or(GatewayError::MissingApiKey)?;
        let url = format!("{API_BASE}/{}:generateContent?key={api_key}", self.model);
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: Self::build_prompt(source, total_joules),
                }],
            }],
        };

        debug!(model = %self.model, "requesting optimization suggestion");
        let response = self.client.post(&url).json(&request).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }

        let body: GenerateResponse = response.json()?;
        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|t| !t.is_empty())
            .ok_or_else(|| GatewayError::Malformed("no candidate text in reply".to_string()))?;

        Ok(parse_reply(&text))
    }
}

/// Split a reply into an optional rewrite and the full advice text.
///
/// The rewrite is the body of the first language-tagged fenced block; the
/// raw reply is kept as advice either way, so a block-less reply is a
/// soft outcome, not a failure.
pub fn parse_reply(text: &str) -> Suggestion {
    // Static pattern; cannot fail to compile.
    let fence = Regex::new(r"(?s)```[A-Za-z0-9_+-]*\n(.*?)```").expect("static regex");
    let optimized_source = fence.captures(text).map(|c| c[1].trim().to_string());
    Suggestion {
        optimized_source,
        advice: Some(text.to_string()),
    }
}
