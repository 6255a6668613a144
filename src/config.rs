use std::path::PathBuf;
use std::time::Duration;

/// Fully merged run configuration: the static YAML config plus secrets
/// injected from the environment.
#[derive(Debug)]
pub struct GenerateConfig {
    pub features: Vec<Feature>,
    pub model: ModelConfig,
    pub workspace: WorkspaceConfig,
    pub pacing: PacingConfig,
}

/// One named subset of the source tree, documented as a single page.
#[derive(Debug, Clone)]
pub struct Feature {
    pub name: String,
    pub root: PathBuf,
    pub max_files: usize,
}

/// Model-service settings.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub api_key: String,
    pub name: String,
    pub max_tokens: u32,
}

/// Document-service settings.
#[derive(Debug, Clone)]
pub struct WorkspaceConfig {
    pub api_key: String,
    pub database_id: String,
}

/// Pacing and cost-estimation settings.
#[derive(Debug, Clone)]
pub struct PacingConfig {
    /// Fixed delay between features, skipped after the last one.
    pub inter_feature_delay: Duration,
    /// Flat per-file rate used for the rough cost estimate.
    pub cost_per_file: f64,
}
