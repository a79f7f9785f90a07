use std::error::Error;
use std::fmt;

use crate::models::itinerary::ItineraryDocument;
use crate::models::trip::TripRequest;
use crate::services::attraction_service::AttractionService;
use crate::services::geocoding_service::{GeocodingError, GeocodingService};
use crate::services::itinerary_synthesis_service::{ItinerarySynthesisService, SynthesisError};
use crate::services::trip_extraction_service::{ExtractionError, TripExtractionService};

// Original pipeline constants: a wide sweep around the destination, capped
// so the prompt stays small.
const PIPELINE_RADIUS_METERS: u32 = 15_000;
const PIPELINE_ATTRACTION_LIMIT: u32 = 12;

#[derive(Debug)]
pub enum PlannerError {
    MissingDestination,
    Geocoding(GeocodingError),
    Extraction(ExtractionError),
    Synthesis(SynthesisError),
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannerError::MissingDestination => write!(f, "Destination is required."),
            PlannerError::Geocoding(err) => write!(f, "{}", err),
            PlannerError::Extraction(err) => write!(f, "{}", err),
            PlannerError::Synthesis(err) => write!(f, "{}", err),
        }
    }
}

impl Error for PlannerError {}

impl PlannerError {
    /// Bad or unresolvable user input maps to 400; everything else is a
    /// server-side failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PlannerError::MissingDestination
                | PlannerError::Geocoding(GeocodingError::InvalidInput(_))
                | PlannerError::Geocoding(GeocodingError::NotFound(_))
        )
    }

    /// Short client-safe message; model output and upstream details stay in
    /// the server log.
    pub fn public_message(&self) -> String {
        match self {
            PlannerError::MissingDestination => "Destination is required.".to_string(),
            PlannerError::Geocoding(err) => err.to_string(),
            PlannerError::Extraction(_) | PlannerError::Synthesis(_) => {
                "Could not generate itinerary".to_string()
            }
        }
    }
}

/// The itinerary pipeline: optional parameter extraction, geocoding,
/// attraction enrichment, then grounded synthesis. Linear; the first
/// unrecovered failure terminates the request.
pub struct PlannerService {
    extraction: TripExtractionService,
    geocoding: GeocodingService,
    attractions: AttractionService,
    synthesis: ItinerarySynthesisService,
}

impl PlannerService {
    pub fn new(
        extraction: TripExtractionService,
        geocoding: GeocodingService,
        attractions: AttractionService,
        synthesis: ItinerarySynthesisService,
    ) -> Self {
        Self {
            extraction,
            geocoding,
            attractions,
            synthesis,
        }
    }

    pub async fn plan(&self, mut request: TripRequest) -> Result<ItineraryDocument, PlannerError> {
        request.normalize();

        // Skipped when destination and start date are both present already;
        // the extra model call would add nothing.
        if request.needs_extraction() {
            println!("Parsing travel query with the language model...");
            let message = request.message.clone().unwrap_or_default();
            let parsed = self
                .extraction
                .extract(&message)
                .await
                .map_err(PlannerError::Extraction)?;
            request.merge_extracted(parsed);
            request.normalize();
        }

        let destination = match request.destination.as_deref() {
            Some(destination) => destination.to_string(),
            None => return Err(PlannerError::MissingDestination),
        };

        let point = self
            .geocoding
            .resolve(&destination)
            .await
            .map_err(PlannerError::Geocoding)?;

        let attractions = self
            .attractions
            .enrich(&point, PIPELINE_RADIUS_METERS, PIPELINE_ATTRACTION_LIMIT)
            .await;
        println!(
            "Enriched {} attractions near {}",
            attractions.len(),
            destination
        );

        self.synthesis
            .synthesize(&request, &attractions)
            .await
            .map_err(PlannerError::Synthesis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_destination_is_a_client_error_with_the_fixed_message() {
        let err = PlannerError::MissingDestination;
        assert!(err.is_client_error());
        assert_eq!(err.public_message(), "Destination is required.");
    }

    #[test]
    fn unresolvable_destinations_are_client_errors_with_their_message() {
        let err = PlannerError::Geocoding(GeocodingError::NotFound(
            "Could not find coordinates for \"Xyzzy\".".to_string(),
        ));
        assert!(err.is_client_error());
        assert_eq!(
            err.public_message(),
            "Could not find coordinates for \"Xyzzy\"."
        );
    }

    #[test]
    fn synthesis_failures_surface_only_a_generic_message() {
        let err = PlannerError::Synthesis(SynthesisError::ModelOutput(
            "draft did not match schema: missing field".to_string(),
        ));
        assert!(!err.is_client_error());
        assert_eq!(err.public_message(), "Could not generate itinerary");
    }
}
