use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

const CONFIG_ENV: &str = "COULAGE_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "config/default";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub renderer: RendererConfig,
    pub limits: LimitsConfig,
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Chrome,
    Draft,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RendererConfig {
    pub backend: BackendKind,
    /// Bundled browser binary. When unset the system binary is looked up on `PATH`.
    pub chrome_executable: Option<PathBuf>,
    #[serde(default)]
    pub chrome_args: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    pub max_concurrent_renders: usize,
    pub content_ready_timeout_ms: u64,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DefaultsConfig {
    pub city: String,
}

impl LimitsConfig {
    pub fn content_ready_timeout(&self) -> Duration {
        Duration::from_millis(self.content_ready_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Config {
    /// Loads defaults, then the optional config file, then `COULAGE_*`
    /// environment overrides (e.g. `COULAGE_RENDERER__BACKEND=draft`).
    pub fn load() -> Result<Self, config::ConfigError> {
        let file = std::env::var(CONFIG_ENV)
            .ok()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(&file)
    }

    /// Same as [`Config::load`] with an explicit config file.
    pub fn load_from(file: &str) -> Result<Self, config::ConfigError> {
        let builder = Self::with_defaults(config::Config::builder())?
            .add_source(config::File::with_name(file).required(false))
            .add_source(
                config::Environment::with_prefix("COULAGE")
                    .prefix_separator("_")
                    .separator("__"),
            );

        builder.build()?.try_deserialize()
    }

    /// Built-in defaults only, ignoring files and environment.
    pub fn defaults() -> Result<Self, config::ConfigError> {
        Self::with_defaults(config::Config::builder())?
            .build()?
            .try_deserialize()
    }

    fn with_defaults(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        builder
            .set_default("renderer.backend", "chrome")?
            .set_default("limits.max_concurrent_renders", num_cpus::get() as u64)?
            .set_default("limits.content_ready_timeout_ms", 30_000)?
            .set_default("limits.request_timeout_secs", 120)?
            .set_default("defaults.city", coulage_types::DEFAULT_CITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_complete() {
        let config = Config::defaults().unwrap();
        assert_eq!(config.renderer.backend, BackendKind::Chrome);
        assert!(config.renderer.chrome_executable.is_none());
        assert!(config.limits.max_concurrent_renders >= 1);
        assert_eq!(config.limits.content_ready_timeout(), Duration::from_secs(30));
        assert_eq!(config.defaults.city, "Casa");
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coulage.toml");
        std::fs::write(
            &path,
            "[renderer]\nbackend = \"draft\"\n\n[limits]\nmax_concurrent_renders = 2\n",
        )
        .unwrap();

        let config = Config::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(config.renderer.backend, BackendKind::Draft);
        assert_eq!(config.limits.max_concurrent_renders, 2);
        assert_eq!(config.limits.request_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = Config::load_from("does/not/exist").unwrap();
        assert_eq!(config.defaults.city, "Casa");
    }
}
