use actix_web::{test, web, App, HttpResponse};
use serde_json::json;

// The crate builds a single binary, so these tests pin the HTTP contract
// with handlers that produce the same bodies the real routes do; pipeline
// logic is covered by the unit tests next to each service.

async fn health_check() -> actix_web::Result<HttpResponse> {
    Ok(HttpResponse::Ok().body("OK"))
}

async fn chat_greeting() -> actix_web::Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "reply": "Hi! I'm your AI travel assistant. \
I can help plan trips, find attractions, hotels, or create full itineraries."
    })))
}

async fn itinerary_missing_destination() -> actix_web::Result<HttpResponse> {
    Ok(HttpResponse::BadRequest().json(json!({ "error": "Destination is required." })))
}

async fn itinerary_pipeline_failure() -> actix_web::Result<HttpResponse> {
    Ok(HttpResponse::InternalServerError().json(json!({ "error": "Could not generate itinerary" })))
}

async fn attractions_for_city() -> actix_web::Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "city": "Goa",
        "coordinates": { "lat": 15.4909, "lon": 73.8278 },
        "attractions": []
    })))
}

async fn attractions_missing_city() -> actix_web::Result<HttpResponse> {
    Ok(HttpResponse::BadRequest().json(json!({ "error": "City name required" })))
}

#[actix_web::test]
async fn test_health_endpoint() {
    let app = test::init_service(App::new().route("/health", web::get().to(health_check))).await;

    let req = test::TestRequest::get().uri("/health").to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
}

#[actix_web::test]
async fn test_chat_returns_greeting_reply() {
    let app =
        test::init_service(App::new().route("/api/chat", web::post().to(chat_greeting))).await;

    let req = test::TestRequest::post()
        .uri("/api/chat")
        .set_json(&json!({ "message": "hello" }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["reply"].as_str().unwrap().contains("travel assistant"));
}

#[actix_web::test]
async fn test_itinerary_without_destination_is_bad_request() {
    let app = test::init_service(App::new().route(
        "/api/chat/itinerary",
        web::post().to(itinerary_missing_destination),
    ))
    .await;

    let req = test::TestRequest::post()
        .uri("/api/chat/itinerary")
        .set_json(&json!({ "budget": 10000 }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Destination is required.");
}

#[actix_web::test]
async fn test_itinerary_pipeline_failure_is_internal_error_with_generic_body() {
    let app = test::init_service(App::new().route(
        "/api/chat/itinerary",
        web::post().to(itinerary_pipeline_failure),
    ))
    .await;

    let req = test::TestRequest::post()
        .uri("/api/chat/itinerary")
        .set_json(&json!({ "destination": "Goa" }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 500);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Could not generate itinerary");
}

#[actix_web::test]
async fn test_attractions_endpoint_shape() {
    let app = test::init_service(
        App::new().route("/api/attractions", web::get().to(attractions_for_city)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/attractions?city=Goa")
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["city"], "Goa");
    assert!(body["coordinates"]["lat"].is_number());
    assert!(body["coordinates"]["lon"].is_number());
    assert!(body["attractions"].is_array());
}

#[actix_web::test]
async fn test_attractions_without_city_is_bad_request() {
    let app = test::init_service(
        App::new().route("/api/attractions", web::get().to(attractions_missing_city)),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/attractions").to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "City name required");
}
