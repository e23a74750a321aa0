//! Normalisation of free-form provider text into [`DiagnosisResult`]s.
//!
//! Models are asked for a bare JSON array but often wrap it in markdown code fences. All
//! knowledge of that text contract lives in this module.

use super::ProviderError;
use crate::disease::DiagnosisResult;

const FENCE: &str = "```";

/// Removes a surrounding markdown code fence and whitespace.
///
/// The opening fence may carry a language tag in any case (`json`, `JSON`, `json5`).
pub fn strip_code_fences(text: &str) -> String {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix(FENCE) {
        body = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    }
    if let Some(rest) = body.trim_end().strip_suffix(FENCE) {
        body = rest;
    }
    body.trim().to_owned()
}

/// Parses provider text into the canonical result list.
///
/// # Errors
///
/// - `ProviderError::EmptyResponse` if nothing remains after stripping fences
/// - `ProviderError::Json` if the text is not JSON
/// - `ProviderError::MalformedResponse` if the JSON is not an array of results, or a result
///   fails [`DiagnosisResult::validate`]
pub fn parse_diagnosis(text: &str) -> Result<Vec<DiagnosisResult>, ProviderError> {
    let cleaned = strip_code_fences(text);
    if cleaned.is_empty() {
        return Err(ProviderError::EmptyResponse);
    }

    let value: serde_json::Value = serde_json::from_str(&cleaned).map_err(ProviderError::Json)?;
    if !value.is_array() {
        return Err(ProviderError::MalformedResponse(
            "expected a JSON array of diagnosis results".into(),
        ));
    }

    let results: Vec<DiagnosisResult> = serde_json::from_value(value)
        .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

    for (index, result) in results.iter().enumerate() {
        result
            .validate()
            .map_err(|e| ProviderError::MalformedResponse(format!("result {index}: {e}")))?;
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {
            "disease": {
                "name": "Flu",
                "description": "Infeksi virus.",
                "allSymptoms": ["demam", "batuk", "pilek"],
                "matchedSymptoms": ["demam"],
                "advice": "Istirahat cukup"
            },
            "matchCount": 1,
            "totalSymptoms": 3
        }
    ]"#;

    #[test]
    fn parses_bare_array() {
        let results = parse_diagnosis(SAMPLE).unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].disease_name(), Some("Flu"));
        assert_eq!(
            results[0].disease.as_ref().unwrap().matched_symptoms,
            Some(vec!["demam".to_string()])
        );
    }

    #[test]
    fn strips_json_code_fence() {
        let fenced = format!("```json\n{SAMPLE}\n```\n");
        assert_eq!(parse_diagnosis(&fenced).unwrap(), parse_diagnosis(SAMPLE).unwrap());

        let plain_fence = format!("```\n{SAMPLE}\n```");
        assert_eq!(parse_diagnosis(&plain_fence).unwrap().len(), 1);
    }

    #[test]
    fn fence_language_tag_is_case_insensitive() {
        assert!(parse_diagnosis("```JSON\n[]\n```").unwrap().is_empty());
        assert!(parse_diagnosis("```Json\n[]```").unwrap().is_empty());

        let upper = format!("  ```JSON\n{SAMPLE}\n```  ");
        assert_eq!(parse_diagnosis(&upper).unwrap(), parse_diagnosis(SAMPLE).unwrap());
    }

    #[test]
    fn unfenced_text_is_left_alone() {
        assert_eq!(strip_code_fences("  [1, 2]\n"), "[1, 2]");
        assert_eq!(strip_code_fences("```\n```"), "");
    }

    #[test]
    fn accepts_simplified_schema_and_null_disease() {
        let text = r#"[
            {"disease": {"name": "Tipes", "symptoms": ["mual"], "advice": "Makan lunak"}, "matchCount": 1, "totalSymptoms": 1},
            {"disease": null, "matchCount": 0, "totalSymptoms": 1}
        ]"#;
        let results = parse_diagnosis(text).unwrap();

        assert_eq!(results[0].disease.as_ref().unwrap().all_symptoms, vec!["mual"]);
        assert!(results[1].disease.is_none());
    }

    #[test]
    fn empty_text_is_an_error() {
        assert!(matches!(parse_diagnosis(""), Err(ProviderError::EmptyResponse)));
        assert!(matches!(parse_diagnosis("```json\n```"), Err(ProviderError::EmptyResponse)));
    }

    #[test]
    fn prose_is_an_error() {
        let err = parse_diagnosis("Maaf, saya tidak dapat membantu.").unwrap_err();
        assert!(matches!(err, ProviderError::Json(_)));
    }

    #[test]
    fn object_instead_of_array_is_malformed() {
        let err = parse_diagnosis(r#"{"disease": null}"#).unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }

    #[test]
    fn missing_fields_are_malformed() {
        let err = parse_diagnosis(r#"[{"disease": null}]"#).unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }

    #[test]
    fn inconsistent_counts_are_malformed() {
        let err =
            parse_diagnosis(r#"[{"disease": null, "matchCount": 4, "totalSymptoms": 3}]"#).unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(msg) if msg.contains("exceeds")));

        let err =
            parse_diagnosis(r#"[{"disease": null, "matchCount": 0, "totalSymptoms": 0}]"#).unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }

    #[test]
    fn total_must_match_listed_vocabulary() {
        let text = r#"[{"disease": {"name": "Flu", "allSymptoms": ["demam", "batuk"], "advice": ""}, "matchCount": 1, "totalSymptoms": 7}]"#;
        let err = parse_diagnosis(text).unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(msg) if msg.contains("does not match")));
    }

    #[test]
    fn empty_array_is_valid() {
        assert!(parse_diagnosis("[]").unwrap().is_empty());
    }
}
