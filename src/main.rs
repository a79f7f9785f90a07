use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

mod models;
mod routes;
mod services;

use services::attraction_service::AttractionService;
use services::completion_service::CompletionService;
use services::geocoding_service::GeocodingService;
use services::image_cache::ImageCache;
use services::itinerary_synthesis_service::ItinerarySynthesisService;
use services::planner_service::PlannerService;
use services::trip_extraction_service::TripExtractionService;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 5000;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    println!("Application starting...");

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    let host = std::env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);

    let completion = CompletionService::new().expect("GROQ_API_KEY must be set");
    let geocoding = GeocodingService::new().expect("OPENTRIPMAP_KEY must be set");
    let image_cache = Arc::new(ImageCache::default());
    let attractions =
        AttractionService::new(image_cache).expect("Failed to create attraction service");

    let geocoding_data = web::Data::new(geocoding.clone());
    let attractions_data = web::Data::new(attractions.clone());
    let planner_data = web::Data::new(PlannerService::new(
        TripExtractionService::new(completion.clone()),
        geocoding,
        attractions,
        ItinerarySynthesisService::new(completion),
    ));

    println!("Attempting to bind to {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .route("/health", web::get().to(|| async { "OK" }))
            .app_data(planner_data.clone())
            .app_data(geocoding_data.clone())
            .app_data(attractions_data.clone())
            .service(
                web::scope("/api")
                    .service(
                        web::scope("/chat")
                            .route("", web::post().to(routes::chat::chat))
                            .route("/itinerary", web::post().to(routes::chat::chat_itinerary)),
                    )
                    .route(
                        "/attractions",
                        web::get().to(routes::attractions::get_attractions),
                    ),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
