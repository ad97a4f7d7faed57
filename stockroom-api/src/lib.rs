use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod actions;
pub mod batch;
pub mod envelope;
pub mod error;
pub mod request;
pub mod state;

pub use envelope::Envelope;
pub use error::AppError;
pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(actions::handle_get).post(actions::handle_post))
        .route("/health", get(actions::probe))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
