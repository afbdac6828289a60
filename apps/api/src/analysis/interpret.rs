//! Completion interpretation. Turns the model's JSON-ish reply into an
//! `AnalysisResult`.
//!
//! Models routinely wrap JSON in Markdown fences and put raw newlines inside
//! string values. Parsing is therefore a fixed, ordered list of attempts
//! (`PARSE_ORDER`); the first attempt that yields JSON wins.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::warn;

use crate::analysis::models::{AnalysisResult, Suggestions};
use crate::errors::AppError;

static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```json|```").expect("fence pattern is valid"));
static CONTROL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\n\r\t]").expect("control-char pattern is valid"));

/// One way of reading the fence-stripped completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseAttempt {
    /// The text as-is.
    Direct,
    /// Every `\n`, `\r` and `\t` replaced by a single space.
    Sanitized,
}

/// Attempts in the order they are tried.
pub const PARSE_ORDER: [ParseAttempt; 2] = [ParseAttempt::Direct, ParseAttempt::Sanitized];

impl ParseAttempt {
    fn prepare(self, text: &str) -> Cow<'_, str> {
        match self {
            ParseAttempt::Direct => Cow::Borrowed(text),
            ParseAttempt::Sanitized => CONTROL_CHARS.replace_all(text, " "),
        }
    }
}

/// Removes every ```` ```json ```` and ```` ``` ```` marker, then trims.
pub fn strip_fences(raw: &str) -> String {
    FENCE.replace_all(raw, "").trim().to_string()
}

/// Fence-strips `raw` and parses it with the attempts of `PARSE_ORDER`.
/// Fails with `MalformedResponse` carrying the last attempt's error.
pub fn lenient_parse(raw: &str) -> Result<Value, AppError> {
    let clean = strip_fences(raw);
    let mut last_error = None;

    for attempt in PARSE_ORDER {
        if last_error.is_some() {
            warn!("Completion parse failed, retrying with {attempt:?} attempt");
        }
        match serde_json::from_str::<Value>(&attempt.prepare(&clean)) {
            Ok(value) => return Ok(value),
            Err(e) => last_error = Some(e),
        }
    }

    Err(AppError::MalformedResponse(
        last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "empty completion".to_string()),
    ))
}

/// Parses a raw completion into an `AnalysisResult`.
pub fn interpret(raw: &str) -> Result<AnalysisResult, AppError> {
    match lenient_parse(raw)? {
        Value::Object(fields) => Ok(project(&fields)),
        other => Err(AppError::MalformedResponse(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn project(fields: &Map<String, Value>) -> AnalysisResult {
    let score = fields.get("score").cloned().unwrap_or(Value::Null);

    let missing_keywords = fields
        .get("missingKeywords")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(display_text).collect());

    let suggestions = match fields.get("suggestions") {
        Some(Value::Array(items)) => Suggestions::List(items.iter().map(display_text).collect()),
        Some(Value::String(s)) => Suggestions::Single(s.clone()),
        _ => Suggestions::Absent,
    };

    AnalysisResult {
        score,
        missing_keywords,
        suggestions,
    }
}

/// Strings as-is; anything else as its compact JSON text, except that
/// integral floats drop their fraction (`85.0` shows as `85`).
pub fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
