use std::{env, path::PathBuf, str::FromStr};

use config::{Config, ConfigError, Environment};
use once_cell::sync::Lazy;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;

pub static CONFIG: Lazy<AppConfig> =
    Lazy::new(|| AppConfig::load().unwrap_or_else(|e| panic!("Failed to load config: {}", e)));

const MEGABYTE: u64 = 1024 * 1024;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub groq: GroqConfig,
    pub cors: CorsConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GroqConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    pub max_file_bytes: u64,
    pub max_json_bytes: u64,
    pub temp_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Layers defaults, `QUIZGEN__*` variables and the legacy flat variables
    /// (`GROQ_API_KEY`, `ALLOWED_ORIGINS`, `PORT`). A missing API key is an error.
    pub fn load() -> Result<Self, ConfigError> {
        let legacy_origins = env::var("ALLOWED_ORIGINS").ok().map(|origins| {
            origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect::<Vec<String>>()
        });

        let config = Config::builder()
            .set_default("server.address", "0.0.0.0")?
            .set_default("server.port", 3001)?
            .set_default("server.log_level", "debug")?
            .set_default("groq.base_url", "https://api.groq.com/openai/v1")?
            .set_default("groq.model", "llama-3.3-70b-versatile")?
            .set_default("groq.max_tokens", 4000)?
            .set_default("groq.timeout_secs", 60)?
            .set_default("cors.allowed_origins", vec!["http://localhost:3000"])?
            .set_default("upload.max_file_bytes", 50 * MEGABYTE)?
            .set_default("upload.max_json_bytes", 10 * MEGABYTE)?
            .add_source(
                Environment::with_prefix("QUIZGEN")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            .set_override_option("groq.api_key", env::var("GROQ_API_KEY").ok())?
            .set_override_option("server.port", env::var("PORT").ok())?
            .set_override_option("cors.allowed_origins", legacy_origins)?
            .build()?;

        let app_config: AppConfig = config.try_deserialize()?;
        app_config.validate()?;

        Ok(app_config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.groq.api_key.trim().is_empty() {
            return Err(ConfigError::Message(
                "GROQ_API_KEY is missing, the generation gateway cannot start".into(),
            ));
        }

        if self.cors.allowed_origins.is_empty() {
            return Err(ConfigError::Message(
                "At least one allowed origin is required".into(),
            ));
        }

        Ok(())
    }

    pub fn log_level(&self) -> LevelFilter {
        LevelFilter::from_str(&self.server.log_level).unwrap_or(LevelFilter::DEBUG)
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.upload.temp_dir.clone().unwrap_or_else(env::temp_dir)
    }
}

#[cfg(test)]
impl AppConfig {
    pub fn for_tests(groq_base_url: &str, upload_dir: PathBuf) -> Self {
        Self {
            server: ServerConfig {
                address: "127.0.0.1".into(),
                port: 0,
                log_level: "debug".into(),
            },
            groq: GroqConfig {
                api_key: "test-key".into(),
                base_url: groq_base_url.into(),
                model: "llama-3.3-70b-versatile".into(),
                max_tokens: 4000,
                timeout_secs: 5,
            },
            cors: CorsConfig {
                allowed_origins: vec!["http://localhost:3000".into()],
            },
            upload: UploadConfig {
                max_file_bytes: 50 * MEGABYTE,
                max_json_bytes: 10 * MEGABYTE,
                temp_dir: Some(upload_dir),
            },
        }
    }
}
