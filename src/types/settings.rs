use serde::{Deserialize, Serialize};

/// Top-level client settings container.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClientSettings {
    pub api: ApiSettings,
    pub logging: LoggingSettings,
    pub display: DisplaySettings,
}

/// Where and how the remote service is reached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Log filter directive, `tracing_subscriber::EnvFilter` syntax.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplaySettings {
    pub untitled_placeholder: String,
    #[serde(default = "default_tag_preview")]
    pub tag_preview_limit: usize,
}

fn default_tag_preview() -> usize {
    3
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            untitled_placeholder: "Untitled".to_string(),
            tag_preview_limit: default_tag_preview(),
        }
    }
}
