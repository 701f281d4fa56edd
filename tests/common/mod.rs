use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, Responder};
use std::collections::HashMap;
use std::sync::Arc;

use cabana_api::db::mongo::create_mongo_client;

pub struct TestApp {
    pub client: Arc<mongodb::Client>,
}

impl TestApp {
    pub async fn new() -> Self {
        let mongo_uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let client = create_mongo_client(&mongo_uri).await;

        Self { client }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(self.client.clone()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .route("/health", web::get().to(health_check))
            .route("/api/resorts", web::get().to(list_resorts))
            .route("/api/resorts/{id}", web::get().to(resort_not_found))
            .route(
                "/api/resorts/{id}/availability",
                web::get().to(engine_read_endpoint),
            )
            .route(
                "/api/resorts/{id}/calculate-price",
                web::get().to(engine_read_endpoint),
            )
            .route(
                "/api/resorts/{id}/pricing-config",
                web::put().to(unauthorized_handler),
            )
            .route(
                "/api/resorts/{id}/bookings",
                web::post().to(unauthorized_handler),
            )
            .route(
                "/api/account/{user_id}/bookings",
                web::get().to(unauthorized_handler),
            )
    }
}

// Mock handlers mirroring the status contract of the real route handlers,
// so route-shape tests run without a seeded database.
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({"status": "ok"}))
}

async fn list_resorts() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!([]))
}

async fn resort_not_found() -> impl Responder {
    HttpResponse::NotFound()
        .json(serde_json::json!({"error": "Resort not found", "kind": "not_found"}))
}

async fn engine_read_endpoint(query: web::Query<HashMap<String, String>>) -> impl Responder {
    if !query.contains_key("date") {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "date query parameter is required",
            "kind": "validation",
        }));
    }
    HttpResponse::NotFound()
        .json(serde_json::json!({"error": "Resort not found", "kind": "not_found"}))
}

async fn unauthorized_handler() -> impl Responder {
    HttpResponse::Unauthorized().json(serde_json::json!({"error": "Unauthorized"}))
}

#[allow(dead_code)]
pub fn get_test_owner_id() -> String {
    "65f2a4b1c9d8e7f6a5b4c3d2".to_string()
}

#[allow(dead_code)]
pub async fn cleanup_test_data(client: &mongodb::Client) {
    let collections = [
        ("Resorts", "Resorts"),
        ("Resorts", "TimeSlots"),
        ("Resorts", "GuestTiers"),
        ("Resorts", "PricingMatrix"),
        ("Bookings", "Bookings"),
    ];
    for (db_name, collection_name) in collections {
        let collection = client
            .database(db_name)
            .collection::<mongodb::bson::Document>(collection_name);
        let _ = collection
            .delete_many(mongodb::bson::doc! {"name": {"$regex": "^test_"}})
            .await;
    }
}
