//! Top-level pipeline: collect → prompt → model → parse → publish, once per
//! configured feature.
//!
//! Features are processed strictly sequentially with a fixed delay between
//! them. Each feature runs the linear stage sequence with no branching; a
//! failure at any remote stage (model call, response parsing, publishing) is
//! logged and recorded, and the run continues with the next feature.
//! Filesystem errors during traversal or file reads are fatal to the whole
//! run and propagate immediately.
//!
//! The returned [`GenerateReport`] carries one entry per feature plus a rough
//! cost estimate folded over the successful features (files processed times a
//! flat per-file rate).

use tracing::{error, info, warn};

use crate::collect::{collect_files, SourceFile};
use crate::config::GenerateConfig;
use crate::model::ModelClient;
use crate::parse::parse_analysis;
use crate::prompt::{build_prompt, PromptFile};
use crate::publish::{publish_feature, DocumentStore};

/// Outcome of a full run.
#[derive(Debug)]
pub struct GenerateReport {
    pub features: Vec<FeatureReport>,
    /// Rough estimate: successful features' file counts times the flat rate.
    pub estimated_cost: f64,
}

/// Outcome of one feature's pipeline pass.
#[derive(Debug)]
pub struct FeatureReport {
    pub feature_name: String,
    pub files_processed: usize,
    /// Id of the created or updated page, when publishing succeeded.
    pub page_id: Option<String>,
    /// Description of the stage failure, when the feature was skipped.
    pub error: Option<String>,
}

impl FeatureReport {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-feature stage failures. These are caught by the orchestrator; only
/// filesystem errors escape [`generate`] itself.
#[derive(Debug)]
enum FeatureError {
    Model(crate::model::ModelError),
    Parse(crate::parse::ParseError),
    Publish(crate::publish::StoreError),
}

impl std::fmt::Display for FeatureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureError::Model(e) => write!(f, "model call failed: {e}"),
            FeatureError::Parse(e) => write!(f, "response parsing failed: {e}"),
            FeatureError::Publish(e) => write!(f, "publishing failed: {e}"),
        }
    }
}

/// Runs the full documentation pipeline for every configured feature.
pub async fn generate<M, S>(
    config: &GenerateConfig,
    model: &M,
    store: &S,
) -> Result<GenerateReport, std::io::Error>
where
    M: ModelClient + ?Sized,
    S: DocumentStore + ?Sized,
{
    info!(features = config.features.len(), "Starting documentation run");

    let mut reports: Vec<FeatureReport> = Vec::new();

    for (index, feature) in config.features.iter().enumerate() {
        info!(
            feature = %feature.name,
            root = %feature.root.display(),
            "Processing feature"
        );

        let mut files = collect_files(&feature.root)?;
        if files.len() > feature.max_files {
            warn!(
                feature = %feature.name,
                found = files.len(),
                cap = feature.max_files,
                "File list exceeds cap, truncating"
            );
            files.truncate(feature.max_files);
        }
        info!(feature = %feature.name, files = files.len(), "Collected source files");

        let mut prompt_files = Vec::with_capacity(files.len());
        for file in &files {
            let content = std::fs::read_to_string(&file.path)?;
            prompt_files.push(PromptFile {
                rel_path: file.rel_path.clone(),
                content,
            });
        }
        let prompt = build_prompt(&feature.name, &prompt_files);

        let report = match run_feature(model, store, &feature.name, &prompt, &files).await {
            Ok(page_id) => {
                info!(feature = %feature.name, page_id = %page_id, "Feature documented");
                FeatureReport {
                    feature_name: feature.name.clone(),
                    files_processed: files.len(),
                    page_id: Some(page_id),
                    error: None,
                }
            }
            Err(e) => {
                error!(feature = %feature.name, error = %e, "Feature failed, continuing with next");
                FeatureReport {
                    feature_name: feature.name.clone(),
                    files_processed: files.len(),
                    page_id: None,
                    error: Some(e.to_string()),
                }
            }
        };
        reports.push(report);

        if index + 1 < config.features.len() {
            info!(
                delay = ?config.pacing.inter_feature_delay,
                "Pausing before next feature"
            );
            tokio::time::sleep(config.pacing.inter_feature_delay).await;
        }
    }

    let estimated_cost = reports
        .iter()
        .filter(|r| r.succeeded())
        .map(|r| r.files_processed as f64 * config.pacing.cost_per_file)
        .sum();

    info!(
        succeeded = reports.iter().filter(|r| r.succeeded()).count(),
        failed = reports.iter().filter(|r| !r.succeeded()).count(),
        estimated_cost = estimated_cost,
        "Documentation run complete"
    );

    Ok(GenerateReport {
        features: reports,
        estimated_cost,
    })
}

/// The remote half of one feature's pipeline: model call, parse, publish.
async fn run_feature<M, S>(
    model: &M,
    store: &S,
    feature_name: &str,
    prompt: &str,
    files: &[SourceFile],
) -> Result<String, FeatureError>
where
    M: ModelClient + ?Sized,
    S: DocumentStore + ?Sized,
{
    let reply = model.generate(prompt).await.map_err(FeatureError::Model)?;

    let analysis = match parse_analysis(&reply) {
        Ok(analysis) => analysis,
        Err(e) => {
            error!(feature = feature_name, raw = %e.raw, "Model reply was not valid JSON");
            return Err(FeatureError::Parse(e));
        }
    };

    let page = publish_feature(store, feature_name, &analysis, files)
        .await
        .map_err(FeatureError::Publish)?;
    Ok(page.id)
}
