pub mod attraction;
pub mod itinerary;
pub mod trip;
