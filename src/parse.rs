use serde::{Deserialize, Serialize};

/// The structured documentation the model is asked to produce for one
/// feature. All fields must be present; a missing field is a parse error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureAnalysis {
    pub feature_name: String,
    pub plain_english: String,
    pub description: String,
    pub how_it_works: String,
    pub technical_details: String,
    pub error_handling: Vec<ErrorEntry>,
    pub flowchart: String,
}

/// One documented error: the exact message from the code plus an explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEntry {
    pub error_message: String,
    pub explanation: String,
}

/// Parse failure, carrying the raw model text for logging.
#[derive(Debug)]
pub struct ParseError {
    pub source: serde_json::Error,
    pub raw: String,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to parse model reply as JSON: {}", self.source)
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Strips a leading/trailing markdown code fence (with optional language
/// tag) from the model's reply, if present.
pub fn strip_code_fences(text: &str) -> &str {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```") {
        // Drop the fence line, including any language tag such as "json".
        body = match rest.split_once('\n') {
            Some((_, remainder)) => remainder,
            None => rest,
        };
    }
    if let Some(rest) = body.trim_end().strip_suffix("```") {
        body = rest;
    }
    body.trim()
}

/// Strips code-fence artifacts and parses the remaining text as a
/// [`FeatureAnalysis`]. The raw text travels with the error so callers can
/// log exactly what the model said.
pub fn parse_analysis(raw: &str) -> Result<FeatureAnalysis, ParseError> {
    let body = strip_code_fences(raw);
    serde_json::from_str(body).map_err(|source| ParseError {
        source,
        raw: raw.to_string(),
    })
}
