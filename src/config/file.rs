use crate::config::CliConfig;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Optional TOML overlay. Anything present here wins over CLI defaults and
/// environment values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerSection>,
    pub upstream: Option<UpstreamSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpstreamSection {
    pub base_url: Option<String>,
    pub concurrency: Option<usize>,
}

impl FileConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn apply(&self, config: &mut CliConfig) {
        if let Some(server) = &self.server {
            if let Some(port) = server.port {
                config.port = port;
            }
        }
        if let Some(upstream) = &self.upstream {
            if let Some(base_url) = &upstream.base_url {
                config.api_base = base_url.clone();
            }
            if let Some(concurrency) = upstream.concurrency {
                config.concurrency = concurrency;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_overlay_wins_over_defaults() {
        let file = FileConfig::from_toml_str(
            r#"
[server]
port = 8080

[upstream]
base_url = "https://example.com/fipe"
concurrency = 2
"#,
        )
        .unwrap();

        let mut config = CliConfig::parse_from(["fipei"]);
        file.apply(&mut config);

        assert_eq!(config.port, 8080);
        assert_eq!(config.api_base, "https://example.com/fipe");
        assert_eq!(config.concurrency, 2);
    }

    #[test]
    fn test_partial_overlay_keeps_remaining_values() {
        let file = FileConfig::from_toml_str("[server]\nport = 4000\n").unwrap();

        let mut config = CliConfig::parse_from(["fipei"]);
        file.apply(&mut config);

        assert_eq!(config.port, 4000);
        assert_eq!(config.concurrency, 5);
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        assert!(FileConfig::from_toml_str("[server\nport = ").is_err());
    }
}
