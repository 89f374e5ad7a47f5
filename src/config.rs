//! Configuration for the showroom service.
//!
//! Settings are loaded from a TOML file (`showroom.toml` by default) and then
//! overlaid with environment variables for secrets and deploy-time values:
//!
//! - [`Config`] - Root configuration struct
//! - [`ServerConfig`] - HTTP server settings
//! - [`AuthConfig`] - Bearer token settings
//! - [`RecordsConfig`] - Record store backend
//! - [`AssetsConfig`] - Asset store backend and upload limits
//! - [`LoggingConfig`] - Tracing output
//!
//! Every section is optional and falls back to development defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use crate::constants;

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Non-fatal warnings that should be logged but don't prevent operation.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Returns true if there are any warnings.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// showroom.toml configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub records: RecordsConfig,
    pub assets: AssetsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins. Empty allows any origin.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: constants::DEFAULT_HOST.to_string(),
            port: constants::DEFAULT_PORT,
            cors_origins: Vec::new(),
            request_timeout_secs: constants::DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared HS256 secret. Admin routes reject every request while empty.
    pub jwt_secret: String,
    pub token_ttl_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_secs: constants::DEFAULT_TOKEN_TTL_SECS,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordsBackendKind {
    Memory,
    #[default]
    Redb,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RecordsConfig {
    pub backend: RecordsBackendKind,
    /// Database file for the redb backend (defaults to `~/.showroom/records.redb`).
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetsBackendKind {
    Memory,
    #[default]
    Filesystem,
    Cloudinary,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    pub backend: AssetsBackendKind,
    pub folder: String,
    pub max_upload_bytes: usize,
    pub filesystem: FilesystemAssetsConfig,
    pub cloudinary: CloudinaryConfig,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            backend: AssetsBackendKind::default(),
            folder: constants::DEFAULT_ASSET_FOLDER.to_string(),
            max_upload_bytes: constants::MAX_UPLOAD_BYTES,
            filesystem: FilesystemAssetsConfig::default(),
            cloudinary: CloudinaryConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilesystemAssetsConfig {
    /// Directory uploads are written to (defaults to `~/.showroom/uploads`).
    pub root: Option<PathBuf>,
    /// Public URL prefix the HTTP server exposes `root` under.
    pub public_base_url: String,
}

impl Default for FilesystemAssetsConfig {
    fn default() -> Self {
        Self {
            root: None,
            public_base_url: format!("http://localhost:{}/uploads", constants::DEFAULT_PORT),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub format: String,
    pub api_base_url: String,
    pub timeout_secs: u64,
}

impl Default for CloudinaryConfig {
    fn default() -> Self {
        Self {
            cloud_name: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            format: constants::DEFAULT_ASSET_FORMAT.to_string(),
            api_base_url: "https://api.cloudinary.com".to_string(),
            timeout_secs: constants::DEFAULT_ASSET_TIMEOUT_SECS,
        }
    }
}

impl CloudinaryConfig {
    fn has_credentials(&self) -> bool {
        !self.cloud_name.is_empty() && !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// `EnvFilter` directive, overridden by `RUST_LOG`.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the specified path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration from `path` if it exists, defaults otherwise, then
    /// apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            Self::load_from(path)?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Overlay values from an environment-like lookup. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(port) = get("SHOWROOM_PORT").and_then(|p| p.trim().parse().ok()) {
            self.server.port = port;
        }
        if let Some(secret) = get("SHOWROOM_JWT_SECRET").or_else(|| get("JWT_SECRET")) {
            self.auth.jwt_secret = secret;
        }
        if let Some(dir) = get("SHOWROOM_DATA_DIR") {
            let dir = PathBuf::from(dir);
            self.records.path = Some(dir.join("records.redb"));
            self.assets.filesystem.root = Some(dir.join("uploads"));
        }
        if let Some(cloud_name) = get("CLOUDINARY_CLOUD_NAME") {
            self.assets.cloudinary.cloud_name = cloud_name;
        }
        if let Some(api_key) = get("CLOUDINARY_API_KEY") {
            self.assets.cloudinary.api_key = api_key;
        }
        if let Some(api_secret) = get("CLOUDINARY_API_SECRET") {
            self.assets.cloudinary.api_secret = api_secret;
        }
    }

    /// Validate configuration.
    ///
    /// Returns a `ValidationResult` containing any non-fatal warnings.
    ///
    /// # Errors
    ///
    /// Returns an error listing every fatal problem found.
    pub fn validate(&self) -> Result<ValidationResult> {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        // 1. Server
        if self.server.port == 0 {
            errors.push("server.port cannot be 0. Use a valid port number (1-65535)".to_string());
        } else if self.server.port < 1024 {
            warnings.push(format!(
                "server.port {} is a system/privileged port (< 1024)",
                self.server.port
            ));
        }
        if self.server.request_timeout_secs == 0 {
            errors.push("server.request_timeout_secs must be positive".to_string());
        }

        // 2. Auth
        if self.auth.jwt_secret.is_empty() {
            warnings.push(
                "auth.jwt_secret is empty: admin routes will reject every request\n  \
                 Set it in showroom.toml or via SHOWROOM_JWT_SECRET"
                    .to_string(),
            );
        }
        if self.auth.token_ttl_secs == 0 {
            errors.push("auth.token_ttl_secs must be positive".to_string());
        }

        // 3. Assets
        if self.assets.max_upload_bytes == 0 {
            errors.push("assets.max_upload_bytes cannot be 0".to_string());
        } else if self.assets.max_upload_bytes > constants::MAX_UPLOAD_BYTES {
            errors.push(format!(
                "assets.max_upload_bytes {} exceeds the {} byte ceiling",
                self.assets.max_upload_bytes,
                constants::MAX_UPLOAD_BYTES
            ));
        }
        if self.assets.folder.trim().is_empty() || self.assets.folder.contains('/') {
            errors.push(format!(
                "assets.folder must be a single non-empty path segment (got: '{}')",
                self.assets.folder
            ));
        }
        match self.assets.backend {
            AssetsBackendKind::Cloudinary => {
                if !self.assets.cloudinary.has_credentials() {
                    errors.push(
                        "assets.backend = \"cloudinary\" requires cloud_name, api_key and api_secret\n  \
                         Set them in [assets.cloudinary] or via CLOUDINARY_* variables"
                            .to_string(),
                    );
                }
                if Url::parse(&self.assets.cloudinary.api_base_url).is_err() {
                    errors.push(format!(
                        "assets.cloudinary.api_base_url is not a valid URL: {}",
                        self.assets.cloudinary.api_base_url
                    ));
                }
            },
            AssetsBackendKind::Filesystem => {
                if Url::parse(&self.assets.filesystem.public_base_url).is_err() {
                    errors.push(format!(
                        "assets.filesystem.public_base_url is not a valid URL: {}",
                        self.assets.filesystem.public_base_url
                    ));
                }
            },
            AssetsBackendKind::Memory => {
                warnings.push("assets.backend = \"memory\": uploads are lost on restart".to_string());
            },
        }

        if self.records.backend == RecordsBackendKind::Memory {
            warnings.push("records.backend = \"memory\": records are lost on restart".to_string());
        }

        if !errors.is_empty() {
            anyhow::bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            );
        }

        Ok(ValidationResult { warnings })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.auth.jwt_secret = "secret".to_string();
        config
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, constants::DEFAULT_PORT);
        assert_eq!(config.records.backend, RecordsBackendKind::Redb);
        assert_eq!(config.assets.backend, AssetsBackendKind::Filesystem);
        assert_eq!(config.assets.max_upload_bytes, constants::MAX_UPLOAD_BYTES);
        assert_eq!(config.assets.cloudinary.format, "webp");
    }

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
[server]
port = 8080
cors_origins = ["https://shop.example.com"]

[auth]
jwt_secret = "s3cret"

[records]
backend = "memory"

[assets]
backend = "cloudinary"
folder = "showcase"

[assets.cloudinary]
cloud_name = "demo"
api_key = "key"
api_secret = "secret"

[logging]
format = "json"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.cors_origins, vec!["https://shop.example.com"]);
        assert_eq!(config.records.backend, RecordsBackendKind::Memory);
        assert_eq!(config.assets.backend, AssetsBackendKind::Cloudinary);
        assert_eq!(config.assets.folder, "showcase");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("SHOWROOM_PORT", "9000"),
            ("SHOWROOM_JWT_SECRET", "from-env"),
            ("CLOUDINARY_API_KEY", "k"),
            ("CLOUDINARY_CLOUD_NAME", ""),
        ]);
        let mut config = Config::default();
        config.assets.cloudinary.cloud_name = "kept".to_string();
        config.apply_overrides(|key| env.get(key).map(|v| (*v).to_string()));

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.auth.jwt_secret, "from-env");
        assert_eq!(config.assets.cloudinary.api_key, "k");
        // Empty values never clobber configured ones
        assert_eq!(config.assets.cloudinary.cloud_name, "kept");
    }

    #[test]
    fn test_legacy_jwt_secret_variable() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == "JWT_SECRET").then(|| "legacy".to_string()));
        assert_eq!(config.auth.jwt_secret, "legacy");
    }

    #[test]
    fn test_data_dir_override() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == "SHOWROOM_DATA_DIR").then(|| "/srv/showroom".to_string()));
        assert_eq!(
            config.records.path,
            Some(PathBuf::from("/srv/showroom/records.redb"))
        );
        assert_eq!(
            config.assets.filesystem.root,
            Some(PathBuf::from("/srv/showroom/uploads"))
        );
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let mut config = valid_config();
        config.server.port = 0;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("server.port cannot be 0"));
    }

    #[test]
    fn test_validate_rejects_upload_limit_above_ceiling() {
        let mut config = valid_config();
        config.assets.max_upload_bytes = constants::MAX_UPLOAD_BYTES + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_requires_cloudinary_credentials() {
        let mut config = valid_config();
        config.assets.backend = AssetsBackendKind::Cloudinary;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("cloudinary"));
    }

    #[test]
    fn test_validate_warns_on_missing_secret() {
        let config = Config::default();
        let result = config.validate().unwrap();
        assert!(result.has_warnings());
        assert!(result.warnings.iter().any(|w| w.contains("jwt_secret")));
    }

    #[test]
    fn test_validate_warns_on_privileged_port() {
        let mut config = valid_config();
        config.server.port = 80;
        let result = config.validate().unwrap();
        assert!(result.warnings.iter().any(|w| w.contains("privileged")));
    }

    #[test]
    fn test_load_missing_file_falls_back_to_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = Config::load(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config.server.host, constants::DEFAULT_HOST);
    }

    #[test]
    fn test_load_from_reports_parse_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("showroom.toml");
        fs::write(&path, "[server\nport = ").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config file"));
    }
}
