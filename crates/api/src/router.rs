//! Router assembly

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::handlers::health;

/// Build the application router.
pub fn create_router() -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/health/", get(health))
		.layer(TraceLayer::new_for_http())
}
