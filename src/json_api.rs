//! Versioned JSON request / response wrapper around [`process`](crate::process).
//!
//! A request looks like
//!
//! ```json
//! {
//!   "version": 1,
//!   "input": "M0 0L10 10",
//!   "config": { "operation": "transform", "transform": { "rotate": 90 } }
//! }
//! ```
//!
//! where `input` may also be a path array such as `[["M", 0, 0], ["L", 10, 10]]`.

use serde_derive::{Deserialize, Serialize};

use crate::errors::Result;
use crate::path::{PathArray, PathSource};
use crate::transform::TransformSpec;
use crate::{process, process_text, Operation, Output, PathOptions, ProcessConfig, ReverseMode};

pub const JSON_API_VERSION: u32 = 1;

/// Path data given either as a `d` string or as a path array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PathInput {
    Text(String),
    Array(PathArray),
}

impl PathSource for PathInput {
    fn to_path_array(&self) -> Result<PathArray> {
        match self {
            Self::Text(s) => s.to_path_array(),
            Self::Array(p) => p.to_path_array(),
        }
    }
}

fn default_decimals() -> Option<u32> {
    PathOptions::default().decimals
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    pub operation: Operation,
    /// `null` disables rounding
    #[serde(default = "default_decimals")]
    pub decimals: Option<u32>,
    pub origin: Option<Vec<f64>>,
    pub transform: TransformSpec,
    pub length: f64,
    pub reverse: ReverseMode,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            operation: Operation::default(),
            decimals: default_decimals(),
            origin: None,
            transform: TransformSpec::default(),
            length: 0.,
            reverse: ReverseMode::default(),
        }
    }
}

impl From<RequestConfig> for ProcessConfig {
    fn from(config: RequestConfig) -> Self {
        let mut transform = config.transform;
        if transform.origin.is_none() {
            transform.origin = config.origin;
        }
        ProcessConfig {
            operation: config.operation,
            options: PathOptions {
                decimals: config.decimals,
                origin: None,
            },
            transform,
            length: config.length,
            reverse: config.reverse,
            json: true,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PathRequest {
    pub version: u32,
    pub input: PathInput,
    #[serde(default)]
    pub config: RequestConfig,
}

#[derive(Debug, Serialize)]
pub struct PathResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Output>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PathResponse {
    pub fn success(result: Output) -> Self {
        Self {
            result: Some(result),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            result: None,
            error: Some(message),
        }
    }
}

/// Handle a parsed request, returning the response to send back.
pub fn handle_request(request: PathRequest) -> PathResponse {
    if request.version != JSON_API_VERSION {
        return PathResponse::error(format!(
            "Unsupported API version: {} (expected {})",
            request.version, JSON_API_VERSION
        ));
    }
    let config: ProcessConfig = request.config.into();
    let result = match &request.input {
        PathInput::Text(s) => process_text(s, &config),
        PathInput::Array(p) => process(p, &config),
    };
    match result {
        Ok(output) => PathResponse::success(output),
        Err(e) => PathResponse::error(e.to_string()),
    }
}

/// Handle a request given as a JSON string, returning the JSON response.
pub fn handle_json(input: &str) -> String {
    let response = match serde_json::from_str::<PathRequest>(input) {
        Ok(request) => handle_request(request),
        Err(e) => PathResponse::error(format!("Invalid JSON request: {e}")),
    };
    serde_json::to_string(&response)
        .unwrap_or_else(|e| format!(r#"{{"error":"Failed to serialize response: {e}"}}"#))
}
