//! Disease and diagnosis result types.
//!
//! These are the canonical shapes returned by both the local ranker and the AI providers.
//! JSON field names are camelCase. On input a disease's vocabulary is also accepted under the
//! `symptoms` key so that the simplified schema normalises to the same type.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A known disease and its canonical symptom vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Disease {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(alias = "symptoms")]
    pub all_symptoms: Vec<String>,
    /// Symptoms from the user's input that appear in `all_symptoms`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_symptoms: Option<Vec<String>>,
    pub advice: String,
}

impl Disease {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        all_symptoms: &[&str],
        advice: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            all_symptoms: all_symptoms.iter().map(|s| (*s).to_owned()).collect(),
            matched_symptoms: None,
            advice: advice.into(),
        }
    }
}

/// Why a [`DiagnosisResult`] is internally inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResultError {
    #[error("totalSymptoms must be at least 1")]
    NoSymptoms,
    #[error("matchCount {match_count} exceeds totalSymptoms {total_symptoms}")]
    MatchExceedsTotal { match_count: u32, total_symptoms: u32 },
    #[error("totalSymptoms {total_symptoms} does not match the {listed} symptoms listed for {disease}")]
    VocabularyMismatch {
        disease: String,
        total_symptoms: u32,
        listed: usize,
    },
}

/// One ranked candidate.
///
/// `disease` is `None` when the provider reports no match. A valid result (see
/// [`DiagnosisResult::validate`]) has `1 <= total_symptoms`, `match_count <= total_symptoms`,
/// and `total_symptoms` equal to the length of the disease vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisResult {
    pub disease: Option<Disease>,
    pub match_count: u32,
    pub total_symptoms: u32,
}

impl DiagnosisResult {
    /// Fraction of the disease vocabulary matched, in `0.0..=1.0`.
    pub fn score(&self) -> f64 {
        if self.total_symptoms == 0 {
            return 0.0;
        }
        f64::from(self.match_count) / f64::from(self.total_symptoms)
    }

    /// Compares two results by score without floating point rounding.
    pub fn cmp_score(&self, other: &Self) -> std::cmp::Ordering {
        let lhs = u64::from(self.match_count) * u64::from(other.total_symptoms);
        let rhs = u64::from(other.match_count) * u64::from(self.total_symptoms);
        lhs.cmp(&rhs)
    }

    pub fn disease_name(&self) -> Option<&str> {
        self.disease.as_ref().map(|d| d.name.as_str())
    }

    /// Checks the count invariants. Results from untrusted sources (AI providers, history
    /// writes from clients) must pass this before they are used.
    pub fn validate(&self) -> Result<(), ResultError> {
        if self.total_symptoms == 0 {
            return Err(ResultError::NoSymptoms);
        }
        if self.match_count > self.total_symptoms {
            return Err(ResultError::MatchExceedsTotal {
                match_count: self.match_count,
                total_symptoms: self.total_symptoms,
            });
        }
        if let Some(disease) = &self.disease {
            let listed = disease.all_symptoms.len();
            if usize::try_from(self.total_symptoms).map_or(true, |total| total != listed) {
                return Err(ResultError::VocabularyMismatch {
                    disease: disease.name.clone(),
                    total_symptoms: self.total_symptoms,
                    listed,
                });
            }
        }
        Ok(())
    }
}
