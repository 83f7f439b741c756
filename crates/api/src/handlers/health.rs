//! Health check handler

/// Liveness probe. Always healthy while the process runs.
pub async fn health() -> &'static str {
	"OK"
}
