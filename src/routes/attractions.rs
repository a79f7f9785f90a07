use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;

use crate::services::attraction_service::AttractionService;
use crate::services::geocoding_service::{GeocodingError, GeocodingService};

// Narrower sweep than the chat pipeline; this endpoint serves map pins, not
// a grounding prompt.
const ROUTE_RADIUS_METERS: u32 = 10_000;
const ROUTE_ATTRACTION_LIMIT: u32 = 10;

#[derive(Debug, Deserialize)]
pub struct AttractionsQuery {
    pub city: Option<String>,
}

/*
    GET /api/attractions?city=<name>
*/
pub async fn get_attractions(
    geocoding: web::Data<GeocodingService>,
    attractions: web::Data<AttractionService>,
    params: web::Query<AttractionsQuery>,
) -> impl Responder {
    let city = match params.city.as_deref().map(str::trim) {
        Some(city) if !city.is_empty() => city.to_string(),
        _ => return HttpResponse::BadRequest().json(json!({ "error": "City name required" })),
    };

    let point = match geocoding.resolve(&city).await {
        Ok(point) => point,
        Err(err @ (GeocodingError::InvalidInput(_) | GeocodingError::NotFound(_))) => {
            return HttpResponse::BadRequest().json(json!({ "error": err.to_string() }));
        }
        Err(err) => {
            eprintln!("Attractions error: {}", err);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Could not fetch attractions" }));
        }
    };

    let found = attractions
        .enrich(&point, ROUTE_RADIUS_METERS, ROUTE_ATTRACTION_LIMIT)
        .await;

    HttpResponse::Ok().json(json!({
        "city": point.name.clone().unwrap_or(city),
        "coordinates": { "lat": point.lat, "lon": point.lon },
        "attractions": found,
    }))
}
