// src/routes.rs

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::Method,
    middleware,
    routing::{get, patch, post},
};
use tower_http::{
    cors::{AllowHeaders, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    error::{attach_error_path, method_not_allowed, route_not_found},
    handlers::{ads, auth, comments, users},
    openapi::ApiDoc,
    state::AppState,
};

/// Assembles the main application router.
///
/// * Registers every endpoint with its full path.
/// * Serves uploaded images from the configured directory under `/images`.
/// * Publishes the OpenAPI document and Swagger UI.
/// * Answers unknown routes and methods with the JSON error body.
/// * Applies global middleware (body limit, error path, Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(state.config.cors_origin.clone())
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
            Method::PATCH,
        ])
        .allow_headers(AllowHeaders::mirror_request());

    let images = ServeDir::new(&state.config.image_dir);
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/ads", get(ads::list_ads).post(ads::create_ad))
        .route("/ads/me", get(ads::my_ads))
        .route(
            "/ads/{id}",
            get(ads::get_ad).patch(ads::update_ad).delete(ads::delete_ad),
        )
        .route("/ads/{id}/image", patch(ads::update_ad_image))
        .route(
            "/ads/{id}/comments",
            get(comments::list_comments).post(comments::add_comment),
        )
        .route(
            "/ads/{id}/comments/{comment_id}",
            patch(comments::update_comment).delete(comments::delete_comment),
        )
        .route("/users/me", get(users::get_me).patch(users::update_me))
        .route("/users/me/image", patch(users::update_avatar))
        .route("/users/set_password", post(users::set_password))
        .nest_service("/images", images)
        .merge(SwaggerUi::new("/swagger-ui").url("/v3/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        // Global Middleware (the last layer is the outermost)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(attach_error_path))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
