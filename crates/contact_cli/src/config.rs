use color_eyre::Result;
use contact_form::ContactSettings;
use directories::ProjectDirs;
use lazy_static::lazy_static;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::{env, path::PathBuf};
use tracing::warn;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub config_dir: PathBuf,
}

/// Credentials and endpoint of the EmailJS REST API.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct EmailJsConfig {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "https://api.emailjs.com/api/v1.0/email/send".into()
}

fn default_timeout_secs() -> u64 {
    15
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub contact: ContactSettings,
    #[serde(default)]
    pub emailjs: Option<EmailJsConfig>,
}

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref DATA_FOLDER: Option<PathBuf> =
        env::var(format!("{}_DATA", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref LOG_ENV: String = format!("{}_LOGLEVEL", PROJECT_NAME.clone());
    pub static ref LOG_FILE: String = format!("{}.log", env!("CARGO_PKG_NAME"));
}

impl Config {
    pub fn new(dirs: &Dirs) -> Result<Self, config::ConfigError> {
        Self::load(&dirs.data, &dirs.config)
    }

    /// Layer defaults, the optional config files in `config_dir` and the
    /// `CONTACT_CLI_*` environment (nested keys separated by `__`).
    pub fn load(data_dir: &Path, config_dir: &Path) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("data_dir", data_dir.to_string_lossy().to_string())?
            .set_default("config_dir", config_dir.to_string_lossy().to_string())?;

        let config_files = [
            ("config.json5", config::FileFormat::Json5),
            ("config.toml", config::FileFormat::Toml),
        ];
        let mut found_config = false;
        for (file, format) in &config_files {
            let source = config::File::from(config_dir.join(file))
                .format(*format)
                .required(false);
            builder = builder.add_source(source);
            if config_dir.join(file).exists() {
                found_config = true
            }
        }
        if !found_config {
            warn!("No configuration file found; using built-in defaults");
        }

        builder = builder.add_source(
            config::Environment::with_prefix(&PROJECT_NAME)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let cfg: Self = builder.build()?.try_deserialize()?;

        Ok(cfg)
    }

    /// Location of the durable client storage (rate limit record).
    pub fn storage_path(&self) -> PathBuf {
        self.config.data_dir.join("storage.json")
    }
}

/// Where the CLI keeps its files.
///
/// `CONTACT_CLI_DATA` / `CONTACT_CLI_CONFIG` take precedence over the
/// platform directories; `.data` / `.config` are the last resort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dirs {
    pub data: PathBuf,
    pub config: PathBuf,
}

impl Dirs {
    pub fn resolve() -> Self {
        let project = ProjectDirs::from("dev", "contact-form", "contact");
        let data = DATA_FOLDER
            .clone()
            .or_else(|| project.as_ref().map(|p| p.data_local_dir().to_path_buf()))
            .unwrap_or_else(|| PathBuf::from(".data"));
        let config = CONFIG_FOLDER
            .clone()
            .or_else(|| project.as_ref().map(|p| p.config_local_dir().to_path_buf()))
            .unwrap_or_else(|| PathBuf::from(".config"));
        Self { data, config }
    }

    pub fn create(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.data)?;
        fs::create_dir_all(&self.config)
    }

    pub fn log_file(&self) -> PathBuf {
        self.data.join(LOG_FILE.as_str())
    }
}
