use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;
use tracing::{error, info};

use crate::config::{Feature, GenerateConfig, ModelConfig, PacingConfig, WorkspaceConfig};

const DEFAULT_MODEL: &str = "claude-3-5-sonnet-latest";
const DEFAULT_MAX_TOKENS: u32 = 4_096;
const DEFAULT_DELAY_SECONDS: u64 = 5;
const DEFAULT_COST_PER_FILE: f64 = 0.015;

#[derive(Deserialize)]
struct StaticConfig {
    features: Vec<FeatureYaml>,
    #[serde(default)]
    model: ModelSection,
    #[serde(default)]
    pacing: PacingSection,
}

#[derive(Deserialize)]
struct FeatureYaml {
    name: String,
    root: std::path::PathBuf,
    #[serde(default = "default_max_files")]
    max_files: usize,
}

fn default_max_files() -> usize {
    50
}

#[derive(Deserialize, Default)]
struct ModelSection {
    name: Option<String>,
    max_tokens: Option<u32>,
}

#[derive(Deserialize, Default)]
struct PacingSection {
    delay_seconds: Option<u64>,
    cost_per_file: Option<f64>,
}

/// Loads the static YAML config (feature list and tuning, no secrets) and
/// injects the three required secrets from environment variables:
/// `ANTHROPIC_API_KEY`, `NOTION_API_KEY` and `NOTION_DATABASE_ID`.
/// Returns a fully merged [`GenerateConfig`] or an error.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<GenerateConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let static_conf: StaticConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    if static_conf.features.is_empty() {
        error!(config_path = ?path_ref, "Config declares no features");
        anyhow::bail!("Config must declare at least one feature");
    }

    let model_api_key = require_env("ANTHROPIC_API_KEY")?;
    let workspace_api_key = require_env("NOTION_API_KEY")?;
    let database_id = require_env("NOTION_DATABASE_ID")?;

    let features = static_conf
        .features
        .into_iter()
        .map(|f| {
            info!(feature = %f.name, root = %f.root.display(), "Parsed feature from config");
            Feature {
                name: f.name,
                root: f.root,
                max_files: f.max_files,
            }
        })
        .collect::<Vec<_>>();

    let model = ModelConfig {
        api_key: model_api_key,
        name: static_conf
            .model
            .name
            .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        max_tokens: static_conf.model.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
    };

    let pacing = PacingConfig {
        inter_feature_delay: Duration::from_secs(
            static_conf
                .pacing
                .delay_seconds
                .unwrap_or(DEFAULT_DELAY_SECONDS),
        ),
        cost_per_file: static_conf
            .pacing
            .cost_per_file
            .unwrap_or(DEFAULT_COST_PER_FILE),
    };

    info!(
        features = features.len(),
        model = %model.name,
        "Config loaded and merged successfully"
    );

    Ok(GenerateConfig {
        features,
        model,
        workspace: WorkspaceConfig {
            api_key: workspace_api_key,
            database_id,
        },
        pacing,
    })
}

fn require_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) => Ok(value),
        Err(e) => {
            error!(error = ?e, var = name, "Required environment variable not set");
            Err(anyhow::anyhow!(
                "{name} environment variable not set: {e}"
            ))
        }
    }
}
