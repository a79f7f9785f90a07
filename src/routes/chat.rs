use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::models::trip::TripRequest;
use crate::services::planner_service::PlannerService;

const ASSISTANT_GREETING: &str = "Hi! I'm your AI travel assistant. \
I can help plan trips, find attractions, hotels, or create full itineraries.";

#[derive(Debug, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    #[allow(dead_code)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

/*
    POST /api/chat
*/
pub async fn chat(_input: web::Json<ChatMessage>) -> impl Responder {
    HttpResponse::Ok().json(ChatReply {
        reply: ASSISTANT_GREETING.to_string(),
    })
}

/*
    POST /api/chat/itinerary
*/
pub async fn chat_itinerary(
    data: web::Data<PlannerService>,
    input: web::Json<TripRequest>,
) -> impl Responder {
    match data.plan(input.into_inner()).await {
        Ok(document) => HttpResponse::Ok().json(document),
        Err(err) => {
            eprintln!("Itinerary error: {}", err);
            let body = json!({ "error": err.public_message() });
            if err.is_client_error() {
                HttpResponse::BadRequest().json(body)
            } else {
                HttpResponse::InternalServerError().json(body)
            }
        }
    }
}
