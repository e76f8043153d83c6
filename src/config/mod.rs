use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Billing engine configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "billr")]
#[command(about = "Billing-compliance engine for legal time capture")]
pub struct Config {
    /// HTTP server listen address
    #[arg(long, default_value = "127.0.0.1:8484", env = "BILLR_LISTEN_ADDR")]
    pub listen_addr: String,

    /// SQLite database URL
    #[arg(long, default_value = "sqlite:billr.db?mode=rwc", env = "BILLR_DB_URL")]
    pub db_url: String,

    /// Path to the rules configuration file (YAML or JSON)
    #[arg(long, default_value = "config/rules.yml", env = "BILLR_RULES_CONFIG")]
    pub rules_config_path: PathBuf,

    /// Directory of client policy overlays (_base.yml plus overlays)
    #[arg(long, default_value = "policy", env = "BILLR_POLICY_DIR")]
    pub policy_dir: PathBuf,

    /// Path to the UTBMS seed tables (JSON)
    #[arg(long, default_value = "config/utbms_seeds.json", env = "BILLR_UTBMS_SEEDS")]
    pub seeds_path: PathBuf,

    /// Path to the ingestion filter configuration (YAML)
    #[arg(long, default_value = "config/filter.yml", env = "BILLR_FILTER_CONFIG")]
    pub filter_path: PathBuf,

    /// Directory LEDES invoices are written to
    #[arg(long, default_value = "exports", env = "BILLR_EXPORT_DIR")]
    pub export_dir: PathBuf,

    /// Base URL of the local ActivityWatch instance
    #[arg(long, default_value = "http://127.0.0.1:5600", env = "BILLR_AW_BASE_URL")]
    pub aw_base_url: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,

    /// Enable graceful shutdown
    #[arg(long, default_value = "true", env = "BILLR_GRACEFUL_SHUTDOWN")]
    pub graceful_shutdown: bool,

    /// Graceful shutdown timeout in seconds
    #[arg(long, default_value = "30", env = "BILLR_SHUTDOWN_TIMEOUT_SECS")]
    pub shutdown_timeout_secs: u64,
}

impl Config {
    /// Get shutdown timeout as Duration.
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            listen_addr: "127.0.0.1:8484".to_string(),
            db_url: "sqlite:billr.db?mode=rwc".to_string(),
            rules_config_path: PathBuf::from("config/rules.yml"),
            policy_dir: PathBuf::from("policy"),
            seeds_path: PathBuf::from("config/utbms_seeds.json"),
            filter_path: PathBuf::from("config/filter.yml"),
            export_dir: PathBuf::from("exports"),
            aw_base_url: "http://127.0.0.1:5600".to_string(),
            log_level: "info".to_string(),
            graceful_shutdown: true,
            shutdown_timeout_secs: 30,
        }
    }
}
