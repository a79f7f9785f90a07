use serde::{Deserialize, Serialize};

/// Placeholder the client sends when the traveler never named a starting
/// point. A source equal to this is treated as absent.
pub const SOURCE_PLACEHOLDER: &str = "your location";

/// Normalized trip parameters driving itinerary generation. Arrives either
/// directly in the request body or out of the language-model extraction pass
/// over `message`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<u32>,
    #[serde(default)]
    pub budget: f64,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TripRequest {
    /// Collapse empty or whitespace-only strings to absent and drop a zero
    /// duration so downstream defaults apply.
    pub fn normalize(&mut self) {
        normalize_field(&mut self.source);
        normalize_field(&mut self.destination);
        normalize_field(&mut self.start_date);
        normalize_field(&mut self.end_date);
        normalize_field(&mut self.message);
        if self.duration_days == Some(0) {
            self.duration_days = None;
        }
    }

    /// The extraction pass runs only when the caller left out the
    /// destination or the start date and sent free-form text instead.
    pub fn needs_extraction(&self) -> bool {
        (self.destination.is_none() || self.start_date.is_none()) && self.message.is_some()
    }

    /// Merge fields parsed out of the raw message. Extracted values win;
    /// anything the extraction left empty keeps the caller-supplied value.
    pub fn merge_extracted(&mut self, parsed: TripRequest) {
        if parsed.source.is_some() {
            self.source = parsed.source;
        }
        if parsed.destination.is_some() {
            self.destination = parsed.destination;
        }
        if parsed.duration_days.is_some() {
            self.duration_days = parsed.duration_days;
        }
        if parsed.budget > 0.0 {
            self.budget = parsed.budget;
        }
        if !parsed.interests.is_empty() {
            self.interests = parsed.interests;
        }
        if parsed.start_date.is_some() {
            self.start_date = parsed.start_date;
        }
        if parsed.end_date.is_some() {
            self.end_date = parsed.end_date;
        }
    }
}

fn normalize_field(field: &mut Option<String>) {
    if let Some(value) = field {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            *field = None;
        } else if trimmed.len() != value.len() {
            *field = Some(trimmed.to_string());
        }
    }
}
