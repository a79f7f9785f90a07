use chrono::NaiveDate;
use serde::Deserialize;
use std::error::Error;
use std::fmt;

use crate::models::attraction::Attraction;
use crate::models::itinerary::{DayPlan, HotelOffer, ItineraryDocument};
use crate::models::trip::{TripRequest, SOURCE_PLACEHOLDER};
use crate::services::completion_service::{CompletionError, CompletionService};
use crate::services::json_extract::{self, JsonExtractError};

const DEFAULT_DURATION_DAYS: u32 = 3;
// Trips longer than this spend two days in transit instead of one.
const LONG_TRIP_THRESHOLD_DAYS: u32 = 3;
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug)]
pub enum SynthesisError {
    MissingDestination,
    Completion(CompletionError),
    ModelOutput(String),
}

impl fmt::Display for SynthesisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthesisError::MissingDestination => write!(f, "Destination is required."),
            SynthesisError::Completion(err) => write!(f, "Completion request failed: {}", err),
            SynthesisError::ModelOutput(msg) => write!(f, "Model output invalid: {}", msg),
        }
    }
}

impl Error for SynthesisError {}

impl From<CompletionError> for SynthesisError {
    fn from(err: CompletionError) -> Self {
        SynthesisError::Completion(err)
    }
}

impl From<JsonExtractError> for SynthesisError {
    fn from(err: JsonExtractError) -> Self {
        SynthesisError::ModelOutput(err.to_string())
    }
}

/// Day-count split used to pace the plan plus the route framing flag.
#[derive(Debug, Clone, PartialEq)]
pub struct TripShape {
    pub duration_days: u32,
    pub travel_days: u32,
    pub sightseeing_days: u32,
    pub source_provided: bool,
}

/// Derived fields of the synthesis prompt. Duration comes from the request
/// when given, else from the date range, else the default.
pub fn derive_trip_shape(request: &TripRequest) -> TripShape {
    let duration_days = request
        .duration_days
        .filter(|days| *days >= 1)
        .or_else(|| duration_from_dates(request.start_date.as_deref(), request.end_date.as_deref()))
        .unwrap_or(DEFAULT_DURATION_DAYS);

    let travel_days = if duration_days > LONG_TRIP_THRESHOLD_DAYS {
        2
    } else {
        1
    };
    let sightseeing_days = duration_days.saturating_sub(travel_days).max(1);

    TripShape {
        duration_days,
        travel_days,
        sightseeing_days,
        source_provided: source_provided(request),
    }
}

fn duration_from_dates(start: Option<&str>, end: Option<&str>) -> Option<u32> {
    let start = NaiveDate::parse_from_str(start?, DATE_FORMAT).ok()?;
    let end = NaiveDate::parse_from_str(end?, DATE_FORMAT).ok()?;
    let days = end.signed_duration_since(start).num_days() + 1;
    Some(days.max(1) as u32)
}

/// A source counts only when the traveler actually named one: present, not
/// the client's placeholder, and not the destination spelled differently.
fn source_provided(request: &TripRequest) -> bool {
    let source = match request.source.as_deref().map(str::trim) {
        Some(source) if !source.is_empty() => source,
        _ => return false,
    };
    if source == SOURCE_PLACEHOLDER {
        return false;
    }
    match request.destination.as_deref().map(str::trim) {
        Some(destination) => source.to_lowercase() != destination.to_lowercase(),
        None => true,
    }
}

/// Grounding prompt: trip constraints, the day split, and the verified
/// attraction list, followed by the exact output schema the parser expects.
pub fn synthesis_prompt(
    request: &TripRequest,
    shape: &TripShape,
    attractions: &[Attraction],
) -> String {
    let destination = request.destination.as_deref().unwrap_or_default();
    let source = request.source.as_deref().unwrap_or(SOURCE_PLACEHOLDER);
    let route = if shape.source_provided {
        format!("from {} to {}", source, destination)
    } else {
        format!("in {}", destination)
    };

    let budget_line = if request.budget > 0.0 {
        format!("- Stay within ₹{} total budget.\n", request.budget)
    } else {
        String::new()
    };

    let interests = if request.interests.is_empty() {
        "general travel".to_string()
    } else {
        request.interests.join(", ")
    };

    format!(
        r#"You are an expert AI travel planner.

Plan a {duration}-day trip {route}.

Trip details:
- Start date: {start}
- End date: {end}
- Total days: {duration}
- Travel days: {travel}
- Sightseeing days: {sightseeing}
{budget_line}- User interests: {interests}

Consider:
- First day: traveling to the destination
- Last day: return journey
- Remaining days: sightseeing, exploring attractions, and relaxing.
- Suggest 2-3 alternate hotels.
- Include image URLs, ratings, and estimated daily costs.

Here are verified attractions near {destination}:
{attraction_list}

Return valid JSON only:
{{
  "summary": "",
  "source": "{source}",
  "destination": "{destination}",
  "startDate": "{start_raw}",
  "endDate": "{end_raw}",
  "durationDays": {duration},
  "budget": {budget},
  "estimatedTransport": "₹...",
  "days": [
    {{
      "day": 1,
      "date": "",
      "activities": ["Activity 1", "Activity 2"],
      "hotel": {{
        "name": "",
        "priceLabel": "₹...",
        "rating": 4.5,
        "imageUrl": "https://...",
        "location": ""
      }}
    }}
  ],
  "alternativeHotels": [
    {{
      "name": "",
      "priceLabel": "₹...",
      "rating": 4.3,
      "imageUrl": "https://...",
      "location": ""
    }}
  ],
  "totalEstimatedCost": "₹..."
}}"#,
        duration = shape.duration_days,
        route = route,
        start = request.start_date.as_deref().unwrap_or("not specified"),
        end = request.end_date.as_deref().unwrap_or("not specified"),
        travel = shape.travel_days,
        sightseeing = shape.sightseeing_days,
        budget_line = budget_line,
        interests = interests,
        destination = destination,
        attraction_list = attraction_lines(attractions),
        source = source,
        start_raw = request.start_date.as_deref().unwrap_or(""),
        end_raw = request.end_date.as_deref().unwrap_or(""),
        budget = request.budget,
    )
}

fn attraction_lines(attractions: &[Attraction]) -> String {
    if attractions.is_empty() {
        return "No attractions found.".to_string();
    }
    attractions
        .iter()
        .enumerate()
        .map(|(i, attraction)| {
            format!(
                "{}. {} ({}, {}, {}, rating: {})",
                i + 1,
                attraction.name,
                attraction.category,
                attraction.distance_label,
                attraction.cost_label,
                attraction.rating
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// Only the fields the model is trusted for; everything request-side is
// rebuilt from the request when the document is assembled.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ItineraryDraft {
    summary: String,
    estimated_transport: String,
    days: Vec<DayPlan>,
    alternative_hotels: Vec<HotelOffer>,
    total_estimated_cost: String,
}

/// Parse the raw model text and assemble the final document around it.
pub fn parse_draft(
    raw: &str,
    request: &TripRequest,
    shape: &TripShape,
    attractions: &[Attraction],
) -> Result<ItineraryDocument, SynthesisError> {
    let destination = request
        .destination
        .clone()
        .ok_or(SynthesisError::MissingDestination)?;

    let value = json_extract::parse(raw)?;
    let draft: ItineraryDraft = serde_json::from_value(value)
        .map_err(|err| SynthesisError::ModelOutput(format!("draft did not match schema: {}", err)))?;

    Ok(ItineraryDocument {
        summary: draft.summary,
        source: request.source.clone(),
        destination,
        start_date: request.start_date.clone(),
        end_date: request.end_date.clone(),
        duration_days: shape.duration_days,
        budget: request.budget,
        estimated_transport: draft.estimated_transport,
        days: normalize_days(draft.days, shape.duration_days),
        alternative_hotels: draft.alternative_hotels,
        total_estimated_cost: draft.total_estimated_cost,
        real_attractions: attractions.to_vec(),
        travel_days: shape.travel_days,
        sightseeing_days: shape.sightseeing_days,
    })
}

/// The model does not always produce the requested number of days; truncate
/// or pad, then renumber so `day` runs 1..=duration.
fn normalize_days(mut days: Vec<DayPlan>, duration_days: u32) -> Vec<DayPlan> {
    days.truncate(duration_days as usize);
    while (days.len() as u32) < duration_days {
        days.push(DayPlan::default());
    }
    for (i, day) in days.iter_mut().enumerate() {
        day.day = i as u32 + 1;
    }
    days
}

/// Builds the grounding prompt, invokes the model once, and parses the
/// draft into a validated document.
pub struct ItinerarySynthesisService {
    completion: CompletionService,
}

impl ItinerarySynthesisService {
    pub fn new(completion: CompletionService) -> Self {
        Self { completion }
    }

    pub async fn synthesize(
        &self,
        request: &TripRequest,
        attractions: &[Attraction],
    ) -> Result<ItineraryDocument, SynthesisError> {
        let destination = match request.destination.as_deref().map(str::trim) {
            Some(destination) if !destination.is_empty() => destination.to_string(),
            _ => return Err(SynthesisError::MissingDestination),
        };

        let shape = derive_trip_shape(request);
        if shape.source_provided {
            println!(
                "Planning {}-day trip from {} to {}",
                shape.duration_days,
                request.source.as_deref().unwrap_or_default(),
                destination
            );
        } else {
            println!("Planning {}-day trip in {}", shape.duration_days, destination);
        }

        let prompt = synthesis_prompt(request, &shape, attractions);
        let raw = self.completion.complete(&prompt).await?;
        parse_draft(&raw, request, &shape, attractions)
    }
}
