//! Application configuration loaded from environment variables.

use std::path::PathBuf;

use store::StorePaths;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"127.0.0.1"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `POS_DATA_DIR`: directory holding the store files (default: `"."`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub data_dir: PathBuf,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            data_dir: lookup("POS_DATA_DIR")
                .filter(|d| !d.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Catalog, inventory and ledger files inside the data directory.
    pub fn store_paths(&self) -> StorePaths {
        StorePaths::in_dir(&self.data_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            data_dir: PathBuf::from("."),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_map(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.data_dir, PathBuf::from("."));
    }

    #[test]
    fn test_overrides() {
        let config = from_map(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "8080"),
            ("RUST_LOG", "debug"),
            ("POS_DATA_DIR", "/var/lib/pos"),
        ]);
        assert_eq!(config.addr(), "0.0.0.0:8080");
        assert_eq!(config.log_level, "debug");
        assert_eq!(
            config.store_paths().ledger,
            PathBuf::from("/var/lib/pos/cafe_orders.txt")
        );
    }

    #[test]
    fn test_bad_port_and_blank_dir_fall_back() {
        let config = from_map(&[("PORT", "eighty"), ("POS_DATA_DIR", "  ")]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.data_dir, PathBuf::from("."));
    }

    #[test]
    fn test_addr_default() {
        assert_eq!(Config::default().addr(), "127.0.0.1:3000");
    }
}
