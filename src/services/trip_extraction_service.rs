use serde_json::Value;
use std::error::Error;
use std::fmt;

use crate::models::trip::TripRequest;
use crate::services::completion_service::{CompletionError, CompletionService};
use crate::services::json_extract::{self, JsonExtractError};

#[derive(Debug)]
pub enum ExtractionError {
    Completion(CompletionError),
    Json(JsonExtractError),
    NegativeBudget(f64),
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionError::Completion(err) => write!(f, "Completion request failed: {}", err),
            ExtractionError::Json(err) => write!(f, "Extraction response invalid: {}", err),
            ExtractionError::NegativeBudget(budget) => {
                write!(f, "Extracted budget is negative: {}", budget)
            }
        }
    }
}

impl Error for ExtractionError {}

impl From<CompletionError> for ExtractionError {
    fn from(err: CompletionError) -> Self {
        ExtractionError::Completion(err)
    }
}

impl From<JsonExtractError> for ExtractionError {
    fn from(err: JsonExtractError) -> Self {
        ExtractionError::Json(err)
    }
}

/// Pulls structured trip parameters out of free-form user text with one
/// language-model call. Fields the message never mentions stay absent.
pub struct TripExtractionService {
    completion: CompletionService,
}

impl TripExtractionService {
    pub fn new(completion: CompletionService) -> Self {
        Self { completion }
    }

    pub async fn extract(&self, message: &str) -> Result<TripRequest, ExtractionError> {
        let prompt = extraction_prompt(message);
        let raw = self.completion.complete(&prompt).await?;
        parse_extraction(&raw)
    }
}

pub fn extraction_prompt(message: &str) -> String {
    format!(
        r#"You are a professional travel assistant AI.

Extract structured trip details from this user message:
"{}"

Return valid JSON with the following fields:
{{
  "source": "",
  "destination": "",
  "durationDays": "",
  "budget": "",
  "interests": [],
  "startDate": "",
  "endDate": ""
}}

Rules:
- Detect start and end dates if mentioned (e.g., "from March 10 to March 15").
- If only one date is given and duration is mentioned, calculate endDate accordingly.
- If dates are given, calculate "durationDays" automatically.
- If "3-day" or "5 days" is said, extract durationDays.
- Include interests like "beach", "adventure", "culture", etc.
- Convert shorthand budgets like "10k" to full number 10000.
- Return ONLY JSON, no text or markdown."#,
        message
    )
}

/// Coerce the extraction JSON into a partial TripRequest. The model is told
/// to emit strings for everything it cannot fill, so numbers may arrive as
/// numeric strings and blanks mean absent.
pub fn parse_extraction(raw: &str) -> Result<TripRequest, ExtractionError> {
    let value = json_extract::parse(raw)?;

    let budget = field_f64(&value, "budget").unwrap_or(0.0);
    if budget < 0.0 {
        return Err(ExtractionError::NegativeBudget(budget));
    }

    Ok(TripRequest {
        source: field_string(&value, "source"),
        destination: field_string(&value, "destination"),
        duration_days: field_u32(&value, "durationDays"),
        budget,
        interests: field_string_list(&value, "interests"),
        start_date: field_string(&value, "startDate"),
        end_date: field_string(&value, "endDate"),
        message: None,
    })
}

fn field_string(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(String::from)
}

fn field_u32(value: &Value, key: &str) -> Option<u32> {
    let field = value.get(key)?;
    let parsed = match field {
        Value::Number(n) => n.as_u64().map(|n| n as u32),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.filter(|days| *days > 0)
}

fn field_f64(value: &Value, key: &str) -> Option<f64> {
    match value.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn field_string_list(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}
