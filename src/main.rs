use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use cabana_api::{db, middleware, routes};

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    println!("Application starting...");

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    } else {
        println!("Release mode");
    }

    let host = std::env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);

    let mongo_uri = std::env::var("MONGODB_URI").expect("MONGODB_URI must be set");
    let client = db::mongo::create_mongo_client(&mongo_uri).await;

    println!("Attempting to bind to {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .app_data(web::Data::new(client.clone()))
            .route("/health", web::get().to(routes::health::health_check))
            .service(
                web::scope("/api")
                    .service(
                        web::scope("/resorts")
                            // Public routes
                            .route("", web::get().to(routes::resort::get_all))
                            .route("/{id}", web::get().to(routes::resort::get_by_id))
                            .route(
                                "/{id}/availability",
                                web::get().to(routes::availability::get_availability),
                            )
                            .route(
                                "/{id}/calculate-price",
                                web::get().to(routes::pricing::calculate_price),
                            )
                            // Owner and guest routes
                            .service(
                                web::scope("/{id}")
                                    .wrap(middleware::auth::AuthMiddleware)
                                    .route(
                                        "/pricing-config",
                                        web::put()
                                            .to(routes::pricing_config::replace_pricing_config),
                                    )
                                    .route(
                                        "/bookings",
                                        web::post().to(routes::booking::create_booking),
                                    ),
                            ),
                    )
                    .service(
                        web::scope("/account")
                            .wrap(middleware::auth::AuthMiddleware)
                            .route(
                                "/{user_id}/bookings",
                                web::get().to(routes::booking::get_user_bookings),
                            ),
                    ),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
