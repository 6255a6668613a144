use std::borrow::Cow;

/// Per-file content cap, in characters. Files longer than this are cut at
/// the threshold and marked. There is no aggregate prompt budget: a feature
/// with many large files may still exceed the model's input limit, in which
/// case the model call fails and feature isolation takes over.
pub const TRUNCATION_THRESHOLD: usize = 8_000;

/// Marker appended to truncated file contents.
pub const TRUNCATION_MARKER: &str = "\n... [truncated]";

/// A file's display name and full text, as fed to the prompt template.
#[derive(Debug, Clone)]
pub struct PromptFile {
    pub rel_path: String,
    pub content: String,
}

/// Caps `content` at [`TRUNCATION_THRESHOLD`] characters, appending
/// [`TRUNCATION_MARKER`] when anything was cut. Content at or under the
/// threshold is returned unchanged.
pub fn truncate_content(content: &str) -> Cow<'_, str> {
    if content.chars().count() <= TRUNCATION_THRESHOLD {
        return Cow::Borrowed(content);
    }
    let mut truncated: String = content.chars().take(TRUNCATION_THRESHOLD).collect();
    truncated.push_str(TRUNCATION_MARKER);
    Cow::Owned(truncated)
}

/// Builds the single instruction prompt for one feature: a header naming the
/// feature and its files, the concatenated (truncated) file contents, and the
/// exact JSON object shape expected back from the model.
pub fn build_prompt(feature_name: &str, files: &[PromptFile]) -> String {
    let file_list = files
        .iter()
        .map(|f| f.rel_path.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let mut code_blob = String::new();
    for file in files {
        code_blob.push_str(&format!("\n\n=== FILE: {} ===\n", file.rel_path));
        code_blob.push_str(&truncate_content(&file.content));
    }

    format!(
        r#"You are documenting the "{feature_name}" feature of a web application.

Files included: {file_list}

Source code:
{code_blob}

Analyze this code and respond with ONLY a JSON object (no markdown, no commentary) with exactly these fields:
{{
  "featureName": "{feature_name}",
  "plainEnglish": "One short paragraph explaining what this feature does, for a non-technical reader.",
  "description": "Two or more paragraphs describing the feature, separated by blank lines.",
  "howItWorks": "Paragraphs walking through the main flow, separated by blank lines.",
  "technicalDetails": "A newline-separated list of technical points. Start each line with '- '.",
  "errorHandling": [
    {{ "errorMessage": "the exact error text from the code", "explanation": "when it occurs and what it means" }}
  ],
  "flowchart": "A mermaid flowchart (graph TD) of the main flow, as a single string."
}}"#
    )
}
