//! Prompt template shared by both diagnosis backends.

use sidia_types::SymptomList;

const PROMPT_HEAD: &str = "Act as a medical diagnosis assistant. The user is experiencing these symptoms: ";

const PROMPT_BODY: &str = r#".

Analyze these symptoms and provide the most likely diseases, sorted by probability (highest first).
IMPORTANT: Provide the response STRICTLY in INDONESIAN language.

For each disease, provide:
1. Name of the disease
2. Description: A clear, concise explanation of what the disease is (2-3 sentences).
3. All Symptoms: A comprehensive list of typical symptoms for this disease (at least 5-7 symptoms per disease).
4. Matched Symptoms: The list of symptoms from the user's input that match this disease.
5. Medical advice.

Return the response strictly in this JSON format (no markdown code blocks):
[
    {
        "disease": {
            "name": "Nama Penyakit",
            "description": "Penjelasan penyakit...",
            "allSymptoms": ["gejala1", "gejala2", "gejala3", "gejala4", "gejala5"],
            "matchedSymptoms": ["gejala_dari_input"],
            "advice": "Saran medis di sini"
        },
        "matchCount": number of matching symptoms,
        "totalSymptoms": number of items in allSymptoms
    }
]

Limit to top 3 possibilities. Ensure valid JSON.
"#;

/// Builds the diagnosis prompt for `symptoms`.
pub fn diagnosis_prompt(symptoms: &SymptomList) -> String {
    let joined = symptoms.joined();
    let mut prompt = String::with_capacity(PROMPT_HEAD.len() + joined.len() + PROMPT_BODY.len());
    prompt.push_str(PROMPT_HEAD);
    prompt.push_str(&joined);
    prompt.push_str(PROMPT_BODY);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_symptoms_and_schema() {
        let symptoms = SymptomList::new(["demam", "batuk"]).unwrap();
        let prompt = diagnosis_prompt(&symptoms);

        assert!(prompt.contains("these symptoms: demam, batuk."));
        assert!(prompt.contains("\"allSymptoms\""));
        assert!(prompt.contains("\"totalSymptoms\""));
        assert!(prompt.contains("INDONESIAN"));
    }
}
