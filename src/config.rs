use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
    #[serde(default)]
    pub api_origin: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,
    #[serde(default = "default_refresh_hour")]
    pub refresh_hour: u32,
    #[serde(default = "default_tenants")]
    pub tenants: Vec<TenantDef>,
    #[serde(default)]
    pub assistant: AssistantConfig,
}

/// Maps an M365 tenant domain to the label shown on the dashboard.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TenantDef {
    pub domain: String,
    pub label: String,
    #[serde(default = "default_accent")]
    pub accent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    /// Program and arguments that read the context text on stdin, e.g. `["wl-copy"]`.
    #[serde(default)]
    pub clipboard_command: Vec<String>,
    /// Program and arguments that open a URI, e.g. `["xdg-open"]`.
    #[serde(default)]
    pub launcher_command: Vec<String>,
    #[serde(default = "default_launch_uris")]
    pub launch_uris: Vec<String>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            clipboard_command: Vec::new(),
            launcher_command: Vec::new(),
            launch_uris: default_launch_uris(),
        }
    }
}

fn default_listen_port() -> u16 {
    9090
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("/var/lib/capacity-console/dashboard.json")
}

fn default_refresh_hour() -> u32 {
    2
}

fn default_accent() -> String {
    "#ffffff".to_string()
}

pub fn default_tenants() -> Vec<TenantDef> {
    vec![
        TenantDef {
            domain: "centcap.net".to_string(),
            label: "Centaurus".to_string(),
            accent: "#00e5ff".to_string(),
        },
        TenantDef {
            domain: "ceflp.com".to_string(),
            label: "Copperwood".to_string(),
            accent: "#ffaa00".to_string(),
        },
    ]
}

fn default_launch_uris() -> Vec<String> {
    vec![
        "claude://new".to_string(),
        "claude://".to_string(),
        "https://claude.ai/new".to_string(),
    ]
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| format!("reading config {}: {}", path.display(), e))?;
        Self::parse(&data)
    }

    pub fn parse(data: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let mut cfg: Config =
            serde_yaml::from_str(data).map_err(|e| format!("parsing config: {}", e))?;

        let trimmed = cfg.api_origin.trim().trim_end_matches('/').to_string();
        if trimmed.is_empty() {
            return Err("api_origin must be configured".into());
        }
        cfg.api_origin = trimmed;

        if cfg.refresh_hour > 23 {
            return Err(format!("refresh_hour {} is not an hour of the day", cfg.refresh_hour).into());
        }

        Ok(cfg)
    }

    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.listen_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_fills_defaults() {
        let cfg = Config::parse("api_origin: http://analytics:3100/\n").unwrap();
        assert_eq!(cfg.api_origin, "http://analytics:3100");
        assert_eq!(cfg.listen_port, 9090);
        assert_eq!(cfg.refresh_hour, 2);
        assert_eq!(cfg.tenants.len(), 2);
        assert_eq!(cfg.assistant.launch_uris[0], "claude://new");
        assert!(cfg.assistant.clipboard_command.is_empty());
    }

    #[test]
    fn missing_origin_is_rejected() {
        assert!(Config::parse("listen_port: 8080\n").is_err());
    }

    #[test]
    fn refresh_hour_out_of_range_is_rejected() {
        assert!(Config::parse("api_origin: http://a\nrefresh_hour: 24\n").is_err());
    }

    #[test]
    fn tenants_can_be_overridden() {
        let cfg = Config::parse(
            "api_origin: http://a\ntenants:\n  - domain: example.org\n    label: Example\n",
        )
        .unwrap();
        assert_eq!(cfg.tenants.len(), 1);
        assert_eq!(cfg.tenants[0].domain, "example.org");
        assert_eq!(cfg.tenants[0].label, "Example");
        assert_eq!(cfg.tenants[0].accent, "#ffffff");
    }
}
