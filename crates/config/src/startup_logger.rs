//! Service startup logging for the boardpulse exporter
//!
//! Logs service, environment and system information when the process
//! starts and stops.

use std::env;
use tracing::info;

/// Logs comprehensive service information at startup
pub fn log_service_info() {
	let service_name = "boardpulse";
	let service_version = env!("CARGO_PKG_VERSION");

	info!("=== Boardpulse Exporter Starting ===");
	info!("🚀 Service: {} v{}", service_name, service_version);

	info!("💻 Platform: {}", env::consts::OS);
	info!("🏗️ Architecture: {}", env::consts::ARCH);

	if let Ok(cwd) = env::current_dir() {
		info!("📁 Working Directory: {}", cwd.display());
	}

	if let Ok(rust_log) = env::var("RUST_LOG") {
		info!("🔧 Log Level: {}", rust_log);
	}

	if let Ok(config_path) = env::var("CONFIG_PATH") {
		info!("📋 Config Path: {}", config_path);
	}

	info!(
		"🕒 Started at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}

/// Logs service shutdown information
pub fn log_service_shutdown() {
	info!("🛑 Boardpulse Exporter Shutting Down");
	info!(
		"🕒 Shutdown at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}

/// Logs startup completion once the health endpoint is bound
pub fn log_startup_complete(bind_address: &str) {
	info!("✅ Boardpulse Exporter Started Successfully");
	info!("🌐 Health endpoint listening on: {}", bind_address);
	info!("📡 Collection cycles scheduled");
}
