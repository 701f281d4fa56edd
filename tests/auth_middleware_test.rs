use actix_web::{test, web, App, HttpResponse, Responder};
use jsonwebtoken::{encode, EncodingKey, Header};
use serial_test::serial;

use cabana_api::middleware::auth::{AuthMiddleware, Claims};
use cabana_api::middleware::auth_context::AuthenticatedUser;

const TEST_SECRET: &str = "test_secret_for_middleware";
const TEST_USER_ID: &str = "65f2a4b1c9d8e7f6a5b4c3d2";

async fn whoami(user: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({"user_id": user.user_id, "email": user.email}))
}

fn protected_app() -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().service(
        web::scope("")
            .wrap(AuthMiddleware)
            .route("/whoami", web::get().to(whoami)),
    )
}

fn mint_token(secret: &str) -> String {
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: "guest@example.com".to_string(),
        exp: now + 3600,
        iat: now,
        user_id: TEST_USER_ID.to_string(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("failed to encode test token")
}

#[actix_rt::test]
#[serial]
async fn test_missing_authorization_header_is_rejected() {
    std::env::set_var("JWT_SECRET", TEST_SECRET);
    let app = test::init_service(protected_app()).await;

    let req = test::TestRequest::get().uri("/whoami").to_request();
    let resp = test::try_call_service(&app, req).await;
    let err = resp.expect_err("request without a token must be rejected");
    assert_eq!(err.as_response_error().status_code(), 401);
}

#[actix_rt::test]
#[serial]
async fn test_garbage_token_is_rejected() {
    std::env::set_var("JWT_SECRET", TEST_SECRET);
    let app = test::init_service(protected_app()).await;

    let req = test::TestRequest::get()
        .uri("/whoami")
        .insert_header(("Authorization", "Bearer not.a.jwt"))
        .to_request();
    let resp = test::try_call_service(&app, req).await;
    let err = resp.expect_err("garbage token must be rejected");
    assert_eq!(err.as_response_error().status_code(), 401);
}

#[actix_rt::test]
#[serial]
async fn test_token_signed_with_wrong_secret_is_rejected() {
    std::env::set_var("JWT_SECRET", TEST_SECRET);
    let app = test::init_service(protected_app()).await;

    let token = mint_token("a_different_secret");
    let req = test::TestRequest::get()
        .uri("/whoami")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::try_call_service(&app, req).await;
    let err = resp.expect_err("wrong-secret token must be rejected");
    assert_eq!(err.as_response_error().status_code(), 401);
}

#[actix_rt::test]
#[serial]
async fn test_valid_token_reaches_the_handler_with_its_claims() {
    std::env::set_var("JWT_SECRET", TEST_SECRET);
    let app = test::init_service(protected_app()).await;

    let token = mint_token(TEST_SECRET);
    let req = test::TestRequest::get()
        .uri("/whoami")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["user_id"], TEST_USER_ID);
    assert_eq!(body["email"], "guest@example.com");
}
