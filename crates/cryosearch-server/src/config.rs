//! Server configuration.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CRYOSEARCH_DATA` | ./cryosearch_data/compounds.json | Datastore dump to serve |
//! | `CRYOSEARCH_HOST` | 127.0.0.1 | Host to bind |
//! | `CRYOSEARCH_PORT` | 8080 | Server port |
//! | `CRYOSEARCH_LOG_LEVEL` | info | Log level |
//! | `CRYOSEARCH_TERM_TTL_SECS` | 3600 | Term index cache lifetime (seconds) |
//! | `CRYOSEARCH_SEARCH_CACHE_SECS` | 3600 | Shared-cache lifetime advertised on `/search` |
//! | `CRYOSEARCH_ENABLE_CORS` | true | Enable CORS |

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use cryosearch::{SearcherConfig, terms::DEFAULT_TERM_TTL};
use cryosearch_data::DATA_PATH_DEFAULT;
use tracing::level_filters::LevelFilter;

#[derive(Debug, Clone, Parser)]
#[command(name = "cryosearch-server")]
#[command(about = "Search API for the cryoprotectant compound catalog")]
pub struct ServerConfig {
    /// Datastore dump (JSON array or NDJSON of compound records).
    #[arg(long, env = "CRYOSEARCH_DATA", default_value = DATA_PATH_DEFAULT)]
    pub data: PathBuf,

    /// Port to listen on.
    #[arg(short, long, env = "CRYOSEARCH_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "CRYOSEARCH_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (off, error, warn, info, debug, trace). Unknown levels are
    /// rejected at parse time.
    #[arg(long, env = "CRYOSEARCH_LOG_LEVEL", default_value = "info")]
    pub log_level: LevelFilter,

    /// How long the did-you-mean term index is reused before a rebuild.
    #[arg(long, env = "CRYOSEARCH_TERM_TTL_SECS", default_value = "3600")]
    pub term_ttl_secs: u64,

    /// `s-maxage` sent with `/search` responses.
    #[arg(long, env = "CRYOSEARCH_SEARCH_CACHE_SECS", default_value = "3600")]
    pub search_cache_secs: u64,

    /// Enable CORS for all origins.
    #[arg(long, env = "CRYOSEARCH_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data: PathBuf::from(DATA_PATH_DEFAULT),
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: LevelFilter::INFO,
            term_ttl_secs: DEFAULT_TERM_TTL.as_secs(),
            search_cache_secs: 3600,
            enable_cors: true,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn term_ttl(&self) -> Duration {
        Duration::from_secs(self.term_ttl_secs)
    }

    pub fn searcher_config(&self) -> SearcherConfig {
        SearcherConfig {
            term_ttl: self.term_ttl(),
            ..SearcherConfig::default()
        }
    }

    /// Value of the `Cache-Control` header on successful searches.
    pub fn search_cache_control(&self) -> String {
        format!("s-maxage={}, stale-while-revalidate", self.search_cache_secs)
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.term_ttl_secs == 0 {
            errors.push("Term cache TTL cannot be 0".to_string());
        }
        if self.host.trim().is_empty() {
            errors.push("Host cannot be empty".to_string());
        }
        if self.data.as_os_str().is_empty() {
            errors.push("Datastore dump path cannot be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Ephemeral port, no CORS, debug logging.
    pub fn for_testing() -> Self {
        Self {
            port: 0,
            log_level: LevelFilter::DEBUG,
            enable_cors: false,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.socket_addr(), "127.0.0.1:8080");
        assert_eq!(config.term_ttl(), Duration::from_secs(3600));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_arguments() {
        let config = ServerConfig::try_parse_from([
            "cryosearch-server",
            "--port",
            "9000",
            "--data",
            "/srv/compounds.ndjson",
            "--term-ttl-secs",
            "60",
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.data, PathBuf::from("/srv/compounds.ndjson"));
        assert_eq!(config.searcher_config().term_ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_log_level_is_parsed_strictly() {
        let config =
            ServerConfig::try_parse_from(["cryosearch-server", "--log-level", "debug"]).unwrap();
        assert_eq!(config.log_level, LevelFilter::DEBUG);

        let result = ServerConfig::try_parse_from(["cryosearch-server", "--log-level", "verbose"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cache_control_header() {
        let config = ServerConfig::default();
        assert_eq!(
            config.search_cache_control(),
            "s-maxage=3600, stale-while-revalidate"
        );
    }

    #[test]
    fn test_validation() {
        let config = ServerConfig {
            term_ttl_secs: 0,
            host: " ".to_string(),
            ..ServerConfig::default()
        };
        assert_eq!(config.validate().unwrap_err().len(), 2);
    }
}
