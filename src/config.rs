use std::path::PathBuf;

use anyhow::Context;
use serde::{Deserialize, de::DeserializeOwned};

/// The env vars read by the exporter binary.
#[derive(Debug, Deserialize)]
pub struct ExportEnv {
    schedule_har_path: PathBuf,
    schedule_api_base: Option<String>,
    #[serde(default = "default_output_dir")]
    schedule_output_dir: PathBuf,
    #[serde(default = "default_client_id")]
    schedule_client_id: String,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_client_id() -> String {
    "tmu".to_string()
}

#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub har_path: PathBuf,
    pub api_base: Option<String>,
    pub output_dir: PathBuf,
    pub client_id: String,
}

impl ExportConfig {
    pub fn new() -> anyhow::Result<Self> {
        let export_env = ExportEnv::load_from_env()?;
        Ok(Self::from(export_env))
    }

    /// The configured base wins over the one seen in captured traffic.
    pub fn resolve_api_base(&self, observed: Option<String>) -> Option<String> {
        self.api_base
            .clone()
            .filter(|base| !base.trim().is_empty())
            .or(observed)
    }
}

impl From<ExportEnv> for ExportConfig {
    fn from(env: ExportEnv) -> Self {
        Self {
            har_path: env.schedule_har_path,
            api_base: env.schedule_api_base,
            output_dir: env.schedule_output_dir,
            client_id: env.schedule_client_id,
        }
    }
}

// Extension trait.
pub trait LoadFromEnv: DeserializeOwned {
    fn load_from_env() -> anyhow::Result<Self> {
        // Don't throw an error if .env file doesn't exist.
        let _ = dotenv::dotenv();
        let config =
            envy::from_env::<Self>().context("failed to load env variables into config struct")?;
        Ok(config)
    }
}

impl<T: DeserializeOwned> LoadFromEnv for T {}
