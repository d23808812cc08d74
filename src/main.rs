use dotenv::dotenv;
use tracing::{error, info, warn};

use users_backend::app::app::App;
use users_backend::config::LoggerConfig;
use users_backend::util::logger::Logger;

#[tokio::main]
async fn main() {
    // Load environment variables before anything reads them
    let dotenv_result = dotenv();

    let logger_config = match LoggerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid logger configuration: {e}");
            std::process::exit(1);
        }
    };
    let _logger = match Logger::new(&logger_config) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            std::process::exit(1);
        }
    };

    info!("🚀 Starting Users Backend");
    info!(
        log_dir = %logger_config.log_dir,
        file_prefix = %logger_config.file_prefix,
        file_log_level = %logger_config.file_log_level,
        error_file_log_level = %logger_config.error_file_log_level,
        "Logging configured"
    );
    match dotenv_result {
        Ok(_) => info!("✅ Successfully loaded .env file"),
        Err(e) => warn!("⚠️ Failed to load .env file: {} (using system env vars)", e),
    }

    let app = match App::new().await {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to start application: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = app.start().await {
        error!("Server stopped with an error: {e}");
        std::process::exit(1);
    }
}
