use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::error::Error;
use std::fmt;
use std::time::Duration;

const OPENTRIPMAP_BASE_URL: &str = "https://api.opentripmap.com/0.1/en";
const NOMINATIM_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";
const GEOCODE_TIMEOUT_SECS: u64 = 10;
const MIN_CITY_NAME_CHARS: usize = 2;

/// Resolved coordinates for a place name. Produced once per request and
/// handed to the attraction search unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub lat: f64,
    pub lon: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeonameResponse {
    name: Option<String>,
    country: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

// Nominatim sends lat/lon as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    display_name: String,
    lat: String,
    lon: String,
}

#[derive(Debug)]
pub enum GeocodingError {
    InvalidInput(String),
    NotFound(String),
    EnvironmentError(String),
    HttpError(reqwest::Error),
}

impl fmt::Display for GeocodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeocodingError::InvalidInput(msg) => write!(f, "{}", msg),
            GeocodingError::NotFound(msg) => write!(f, "{}", msg),
            GeocodingError::EnvironmentError(msg) => write!(f, "Environment error: {}", msg),
            GeocodingError::HttpError(err) => write!(f, "HTTP error: {}", err),
        }
    }
}

impl Error for GeocodingError {}

impl From<reqwest::Error> for GeocodingError {
    fn from(err: reqwest::Error) -> Self {
        GeocodingError::HttpError(err)
    }
}

/// Free-text place name to coordinates, OpenTripMap geoname first, Nominatim
/// free-text search second. Total failure is a `NotFound` error; there is no
/// silent fallback coordinate.
#[derive(Clone)]
pub struct GeocodingService {
    client: Client,
    api_key: String,
}

impl GeocodingService {
    pub fn new() -> Result<Self, GeocodingError> {
        let api_key = env::var("OPENTRIPMAP_KEY").map_err(|_| {
            GeocodingError::EnvironmentError("OPENTRIPMAP_KEY not set".to_string())
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(GEOCODE_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client, api_key })
    }

    pub async fn resolve(&self, city: &str) -> Result<GeoPoint, GeocodingError> {
        let city = city.trim();
        if city.chars().count() < MIN_CITY_NAME_CHARS {
            return Err(GeocodingError::InvalidInput(format!(
                "Invalid city name: \"{}\"",
                city
            )));
        }

        println!("Fetching coordinates for: {}", city);

        match self.lookup_geoname(city).await {
            Ok(Some(point)) => {
                println!("Found via OpenTripMap: {}", city);
                return Ok(point);
            }
            Ok(None) => {}
            Err(err) => eprintln!("OpenTripMap lookup failed for \"{}\": {}", city, err),
        }

        match self.lookup_nominatim(city).await {
            Ok(Some(point)) => {
                println!("Found via OpenStreetMap: {}", city);
                return Ok(point);
            }
            Ok(None) => {}
            Err(err) => eprintln!("OpenStreetMap lookup failed for \"{}\": {}", city, err),
        }

        Err(GeocodingError::NotFound(format!(
            "Could not find coordinates for \"{}\".",
            city
        )))
    }

    async fn lookup_geoname(&self, city: &str) -> Result<Option<GeoPoint>, reqwest::Error> {
        let response = self
            .client
            .get(format!("{}/places/geoname", OPENTRIPMAP_BASE_URL))
            .query(&[("name", city), ("apikey", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?;

        let geoname: GeonameResponse = response.json().await?;
        Ok(match (geoname.lat, geoname.lon) {
            (Some(lat), Some(lon)) => Some(GeoPoint {
                name: geoname.name,
                lat,
                lon,
                country: geoname.country,
            }),
            _ => None,
        })
    }

    async fn lookup_nominatim(&self, city: &str) -> Result<Option<GeoPoint>, reqwest::Error> {
        let response = self
            .client
            .get(NOMINATIM_SEARCH_URL)
            .query(&[("q", city), ("format", "json"), ("limit", "1")])
            .header("User-Agent", "TravelAI/1.0")
            .send()
            .await?
            .error_for_status()?;

        let places: Vec<NominatimPlace> = response.json().await?;
        Ok(places.into_iter().next().and_then(point_from_candidate))
    }
}

/// First search candidate to a GeoPoint; name and country come off the ends
/// of the comma-joined display name.
fn point_from_candidate(place: NominatimPlace) -> Option<GeoPoint> {
    let lat = place.lat.parse::<f64>().ok()?;
    let lon = place.lon.parse::<f64>().ok()?;
    let name = place
        .display_name
        .split(',')
        .next()
        .map(|part| part.trim().to_string());
    let country = place
        .display_name
        .split(',')
        .last()
        .map(|part| part.trim().to_string());
    Some(GeoPoint {
        name,
        lat,
        lon,
        country,
    })
}
