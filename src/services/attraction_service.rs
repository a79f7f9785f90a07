use futures::future::join_all;
use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashSet;
use std::env;
use std::sync::Arc;
use std::time::Duration;

use crate::models::attraction::{Attraction, Rating};
use crate::services::geocoding_service::GeoPoint;
use crate::services::image_cache::ImageCache;

const OPENTRIPMAP_BASE_URL: &str = "https://api.opentripmap.com/0.1/en";
const PEXELS_SEARCH_URL: &str = "https://api.pexels.com/v1/search";
const PLACEHOLDER_IMAGE_URL: &str =
    "https://upload.wikimedia.org/wikipedia/commons/a/ac/No_image_available.svg";
const ATTRACTION_KINDS: &str =
    "interesting_places,tourist_facilities,cultural,beaches,natural,architecture";
const SEARCH_TIMEOUT_SECS: u64 = 10;
// Display heuristic only, not a real price: attraction entry fees are not
// available from the provider, so a uniform draw stands in.
const COST_ESTIMATE_MIN: u32 = 200;
const COST_ESTIMATE_MAX: u32 = 1000;

#[derive(Debug, Clone, Deserialize)]
struct RadiusPlace {
    #[serde(default)]
    name: String,
    xid: Option<String>,
    dist: Option<f64>,
    rate: Option<f64>,
    kinds: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaceDetails {
    preview: Option<PlacePreview>,
    wikipedia_extracts: Option<WikipediaExtracts>,
    info: Option<PlaceInfo>,
}

#[derive(Debug, Deserialize)]
struct PlacePreview {
    source: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WikipediaExtracts {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaceInfo {
    descr: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PexelsResponse {
    #[serde(default)]
    photos: Vec<PexelsPhoto>,
}

#[derive(Debug, Deserialize)]
struct PexelsPhoto {
    src: PexelsSource,
}

#[derive(Debug, Deserialize)]
struct PexelsSource {
    medium: Option<String>,
}

/// Nearby points of interest for a resolved coordinate, deduplicated by name
/// and enriched with an image, description, distance and a synthetic cost.
/// Enrichment never fails the request: a broken provider degrades to an
/// empty list, a broken place to a placeholder image.
#[derive(Clone)]
pub struct AttractionService {
    client: Client,
    api_key: String,
    pexels_key: Option<String>,
    image_cache: Arc<ImageCache>,
}

impl AttractionService {
    pub fn new(image_cache: Arc<ImageCache>) -> Result<Self, Box<dyn std::error::Error>> {
        let api_key =
            env::var("OPENTRIPMAP_KEY").map_err(|_| "OPENTRIPMAP_KEY environment variable not set")?;

        // Without a Pexels key the stock-photo fallback is skipped entirely.
        let pexels_key = env::var("PEXELS_API_KEY").ok();
        if pexels_key.is_none() {
            println!("PEXELS_API_KEY not set; attraction images limited to provider previews");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(SEARCH_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_key,
            pexels_key,
            image_cache,
        })
    }

    pub async fn enrich(&self, point: &GeoPoint, radius_meters: u32, limit: u32) -> Vec<Attraction> {
        let places = match self.radius_search(point, radius_meters, limit).await {
            Ok(places) => places,
            Err(err) => {
                eprintln!("Error fetching attractions: {}", err);
                return Vec::new();
            }
        };

        if places.is_empty() {
            println!(
                "No attractions found near lat={}, lon={}",
                point.lat, point.lon
            );
            return Vec::new();
        }

        let unique = dedupe_by_name(places);
        join_all(unique.iter().map(|place| self.enrich_place(place))).await
    }

    async fn radius_search(
        &self,
        point: &GeoPoint,
        radius_meters: u32,
        limit: u32,
    ) -> Result<Vec<RadiusPlace>, reqwest::Error> {
        let response = self
            .client
            .get(format!("{}/places/radius", OPENTRIPMAP_BASE_URL))
            .query(&[
                ("radius", radius_meters.to_string()),
                ("lon", point.lon.to_string()),
                ("lat", point.lat.to_string()),
                ("limit", limit.to_string()),
                ("apikey", self.api_key.clone()),
                ("format", "json".to_string()),
                ("kinds", ATTRACTION_KINDS.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        response.json().await
    }

    /// One place to one attraction; every failure path inside degrades to a
    /// placeholder image and an empty description rather than erroring.
    async fn enrich_place(&self, place: &RadiusPlace) -> Attraction {
        let mut photo_url = None;
        let mut description = String::new();

        if let Some(xid) = &place.xid {
            match self.place_details(xid).await {
                Ok(details) => {
                    photo_url = details.preview.and_then(|preview| preview.source);
                    description = details
                        .wikipedia_extracts
                        .and_then(|extracts| extracts.text)
                        .or_else(|| details.info.and_then(|info| info.descr))
                        .unwrap_or_else(|| "No description available.".to_string());
                }
                Err(err) => {
                    eprintln!("Detail lookup failed for \"{}\": {}", place.name, err);
                }
            }
        }

        if photo_url.is_none() {
            let query = format!(
                "{} {}",
                place.name,
                primary_kind(place.kinds.as_deref()).unwrap_or("tourist spot")
            );
            photo_url = self.stock_photo(&query).await;
        }

        let estimate = cost_estimate(&mut rand::thread_rng());

        Attraction {
            name: place.name.clone(),
            description,
            distance_label: distance_label(place.dist),
            category: primary_kind(place.kinds.as_deref())
                .unwrap_or("attraction")
                .to_string(),
            rating: place
                .rate
                .map(Rating::Score)
                .unwrap_or_else(Rating::not_available),
            cost_label: format!("₹{}", estimate),
            image_url: photo_url,
        }
    }

    async fn place_details(&self, xid: &str) -> Result<PlaceDetails, reqwest::Error> {
        let response = self
            .client
            .get(format!("{}/places/xid/{}", OPENTRIPMAP_BASE_URL, xid))
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?;

        response.json().await
    }

    /// Stock-photo fallback with the shared cache consulted first. An empty
    /// result resolves to the placeholder and is cached like any other hit.
    async fn stock_photo(&self, query: &str) -> Option<String> {
        let key = self.pexels_key.as_deref()?;

        if let Some(url) = self.image_cache.get(query) {
            return Some(url);
        }

        let url = match self.pexels_search(key, query).await {
            Ok(Some(url)) => url,
            Ok(None) => PLACEHOLDER_IMAGE_URL.to_string(),
            Err(err) => {
                eprintln!("Pexels fetch failed for \"{}\": {}", query, err);
                return Some(PLACEHOLDER_IMAGE_URL.to_string());
            }
        };

        self.image_cache.put(query, &url);
        Some(url)
    }

    async fn pexels_search(&self, key: &str, query: &str) -> Result<Option<String>, reqwest::Error> {
        let response = self
            .client
            .get(PEXELS_SEARCH_URL)
            .header("Authorization", key)
            .query(&[
                ("query", query),
                ("per_page", "1"),
                ("orientation", "landscape"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let results: PexelsResponse = response.json().await?;
        Ok(results
            .photos
            .into_iter()
            .next()
            .and_then(|photo| photo.src.medium))
    }
}

/// First occurrence wins; unnamed places are dropped outright.
fn dedupe_by_name(places: Vec<RadiusPlace>) -> Vec<RadiusPlace> {
    let mut seen = HashSet::new();
    places
        .into_iter()
        .filter(|place| !place.name.is_empty() && seen.insert(place.name.clone()))
        .collect()
}

fn primary_kind(kinds: Option<&str>) -> Option<&str> {
    kinds
        .and_then(|kinds| kinds.split(',').next())
        .map(str::trim)
        .filter(|kind| !kind.is_empty())
}

fn distance_label(dist_meters: Option<f64>) -> String {
    match dist_meters {
        Some(dist) => format!("{:.1} km", dist / 1000.0),
        None => "N/A".to_string(),
    }
}

fn cost_estimate(rng: &mut impl Rng) -> u32 {
    rng.gen_range(COST_ESTIMATE_MIN..=COST_ESTIMATE_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn place(name: &str) -> RadiusPlace {
        RadiusPlace {
            name: name.to_string(),
            xid: None,
            dist: None,
            rate: None,
            kinds: None,
        }
    }

    #[test]
    fn duplicate_names_keep_the_first_occurrence_in_order() {
        let deduped = dedupe_by_name(vec![
            place("Fort Aguada"),
            place("Baga Beach"),
            place("Fort Aguada"),
            place(""),
            place("Dudhsagar Falls"),
        ]);
        let names: Vec<&str> = deduped.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Fort Aguada", "Baga Beach", "Dudhsagar Falls"]);
    }

    #[test]
    fn distance_formats_to_one_decimal_km_or_na() {
        assert_eq!(distance_label(Some(2370.0)), "2.4 km");
        assert_eq!(distance_label(Some(500.0)), "0.5 km");
        assert_eq!(distance_label(None), "N/A");
    }

    #[test]
    fn primary_kind_takes_the_first_comma_segment() {
        assert_eq!(primary_kind(Some("beaches,natural")), Some("beaches"));
        assert_eq!(primary_kind(Some("")), None);
        assert_eq!(primary_kind(None), None);
    }

    #[test]
    fn cost_estimate_stays_in_the_documented_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let estimate = cost_estimate(&mut rng);
            assert!((COST_ESTIMATE_MIN..=COST_ESTIMATE_MAX).contains(&estimate));
        }
    }
}
