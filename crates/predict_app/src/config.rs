use std::env;
use std::path::PathBuf;

use crate::logging::LogDestination;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_OUTPUT_DIR: &str = "output";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the prediction service.
    pub base_url: String,
    /// Directory the three result images are written into.
    pub output_dir: PathBuf,
    pub log_destination: LogDestination,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::resolve(
            env::var("PREDICT_BASE_URL").ok(),
            env::var("PREDICT_OUTPUT_DIR").ok(),
            env::var("PREDICT_LOG").ok(),
        )
    }

    fn resolve(
        base_url: Option<String>,
        output_dir: Option<String>,
        log: Option<String>,
    ) -> Self {
        let base_url = base_url
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let output_dir = output_dir.map(PathBuf::from).unwrap_or_else(|| {
            env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(DEFAULT_OUTPUT_DIR)
        });

        let log_destination = match log.as_deref() {
            Some("file") => LogDestination::File,
            Some("both") => LogDestination::Both,
            _ => LogDestination::Terminal,
        };

        Self {
            base_url,
            output_dir,
            log_destination,
        }
    }
}
