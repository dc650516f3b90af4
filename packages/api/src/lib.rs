//! HTTP surface of the Legendex predictor
//!
//! `GET /` serves the input form, `POST /predict` encodes the submission and
//! renders the model's answer, `GET /dashboard` charts the model's most
//! important features.

use axum::http::Uri;
use axum::{
    Router,
    routing::{get, post},
};
use error::ApiError;
use state::AppState;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};

mod routes;

pub mod error;
pub mod flash;
pub mod state;
pub mod templates;


pub use axum;

pub fn construct_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.static_dir);

    Router::new()
        .route("/", get(routes::index::index))
        .route("/predict", post(routes::predict::predict))
        .route("/dashboard", get(routes::dashboard::dashboard))
        .nest("/health", routes::health::routes())
        .nest_service("/static", static_files)
        .fallback(not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new()),
        )
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("No route for {uri}"))
}
