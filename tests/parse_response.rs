use docscribe::parse::{parse_analysis, strip_code_fences, FeatureAnalysis};

const WELL_FORMED: &str = r#"{
  "featureName": "Checkout",
  "plainEnglish": "Lets users pay.",
  "description": "First paragraph.\n\nSecond paragraph.",
  "howItWorks": "Step one.\n\nStep two.",
  "technicalDetails": "- Uses sessions\n- Validates input",
  "errorHandling": [
    { "errorMessage": "Card declined", "explanation": "The payment processor rejected the card." }
  ],
  "flowchart": "graph TD;A-->B;"
}"#;

#[test]
fn parses_bare_json() {
    let analysis = parse_analysis(WELL_FORMED).expect("bare JSON should parse");
    assert_eq!(analysis.feature_name, "Checkout");
    assert_eq!(analysis.error_handling.len(), 1);
    assert_eq!(analysis.error_handling[0].error_message, "Card declined");
}

#[test]
fn parses_json_wrapped_in_plain_fences() {
    let wrapped = format!("```\n{WELL_FORMED}\n```");
    let analysis = parse_analysis(&wrapped).expect("fenced JSON should parse");
    assert_eq!(analysis.flowchart, "graph TD;A-->B;");
}

#[test]
fn parses_json_wrapped_in_tagged_fences() {
    let wrapped = format!("```json\n{WELL_FORMED}\n```");
    let analysis = parse_analysis(&wrapped).expect("tagged fenced JSON should parse");
    assert_eq!(analysis.plain_english, "Lets users pay.");
}

#[test]
fn fence_stripping_round_trip_preserves_semantics() {
    let direct: FeatureAnalysis = serde_json::from_str(WELL_FORMED).unwrap();
    let wrapped = format!("```json\n{WELL_FORMED}\n```");
    let via_parser = parse_analysis(&wrapped).unwrap();
    assert_eq!(direct, via_parser);
}

#[test]
fn strip_code_fences_leaves_unfenced_text_alone() {
    assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
}

#[test]
fn missing_field_is_an_error_carrying_the_raw_text() {
    let raw = r#"{"featureName": "X"}"#;
    let err = parse_analysis(raw).expect_err("missing fields should fail");
    assert_eq!(err.raw, raw);
}

#[test]
fn non_json_reply_is_an_error_carrying_the_raw_text() {
    let raw = "Sorry, I cannot help with that.";
    let err = parse_analysis(raw).expect_err("prose should fail to parse");
    assert!(err.raw.contains("Sorry"));
}
