pub mod attraction_service;
pub mod completion_service;
pub mod geocoding_service;
pub mod image_cache;
pub mod itinerary_synthesis_service;
pub mod json_extract;
pub mod planner_service;
pub mod trip_extraction_service;
