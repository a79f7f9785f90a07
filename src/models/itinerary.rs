use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::models::attraction::Attraction;

/// A hotel suggested by the language model, either attached to a day or
/// listed as an alternate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelOffer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price_label: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rating: f64,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub location: String,
}

/// One day of the plan. `day` is 1-based and contiguous across the document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    #[serde(default, deserialize_with = "lenient_u32")]
    pub day: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotel: Option<HotelOffer>,
}

/// The pipeline's output: summary, per-day plan, hotel suggestions and cost
/// estimates, plus the verified attractions the plan was grounded on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryDocument {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub destination: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub duration_days: u32,
    pub budget: f64,
    pub estimated_transport: String,
    pub days: Vec<DayPlan>,
    pub alternative_hotels: Vec<HotelOffer>,
    pub total_estimated_cost: String,
    pub real_attractions: Vec<Attraction>,
    pub travel_days: u32,
    pub sightseeing_days: u32,
}

// The model emits numbers and numeric strings interchangeably; accept both
// and fall back to zero rather than rejecting the whole draft.

pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

pub(crate) fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().unwrap_or(0) as u32,
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_plan_accepts_string_typed_day() {
        let plan: DayPlan =
            serde_json::from_str(r#"{"day": "2", "activities": ["Beach walk"]}"#).unwrap();
        assert_eq!(plan.day, 2);
        assert_eq!(plan.activities, vec!["Beach walk".to_string()]);
        assert!(plan.hotel.is_none());
    }

    #[test]
    fn hotel_offer_accepts_string_typed_rating_and_missing_fields() {
        let hotel: HotelOffer =
            serde_json::from_str(r#"{"name": "Sea View", "rating": "4.5"}"#).unwrap();
        assert_eq!(hotel.rating, 4.5);
        assert_eq!(hotel.price_label, "");
    }

    #[test]
    fn document_serializes_with_camel_case_keys() {
        let document = ItineraryDocument {
            summary: "A short break".to_string(),
            source: None,
            destination: "Goa".to_string(),
            start_date: None,
            end_date: None,
            duration_days: 3,
            budget: 0.0,
            estimated_transport: "₹2000".to_string(),
            days: vec![DayPlan::default()],
            alternative_hotels: vec![],
            total_estimated_cost: "₹15000".to_string(),
            real_attractions: vec![],
            travel_days: 1,
            sightseeing_days: 2,
        };
        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(value["durationDays"], 3);
        assert_eq!(value["estimatedTransport"], "₹2000");
        assert_eq!(value["totalEstimatedCost"], "₹15000");
        assert_eq!(value["travelDays"], 1);
        assert_eq!(value["sightseeingDays"], 2);
        assert!(value.get("startDate").is_none());
    }
}
