//! Local symptom matching against a [`Catalog`].
//!
//! Both operations are pure and synchronous. Symptoms are compared by exact string equality;
//! callers normalise input (see `sidia_types::SymptomList`) before matching.

use crate::catalog::Catalog;
use crate::disease::{DiagnosisResult, Disease};

/// Returns the first disease whose whole vocabulary appears in `symptoms`.
///
/// Returns `None` for empty input or when no disease qualifies. Diseases with an empty
/// vocabulary never match.
pub fn diagnose_strict<'c, S: AsRef<str>>(
    catalog: &'c Catalog,
    symptoms: &[S],
) -> Option<&'c Disease> {
    if symptoms.is_empty() {
        return None;
    }
    catalog.diseases().iter().find(|disease| {
        !disease.all_symptoms.is_empty()
            && disease
                .all_symptoms
                .iter()
                .all(|s| symptoms.iter().any(|input| input.as_ref() == s.as_str()))
    })
}

/// Ranks every disease sharing at least one symptom with `symptoms`.
///
/// Results are ordered by the matched fraction of each disease's vocabulary, highest first.
/// The sort is stable, so diseases with equal scores keep catalog order.
pub fn analyze_symptoms<S: AsRef<str>>(catalog: &Catalog, symptoms: &[S]) -> Vec<DiagnosisResult> {
    if symptoms.is_empty() {
        return Vec::new();
    }

    let mut results: Vec<DiagnosisResult> = catalog
        .diseases()
        .iter()
        .filter_map(|disease| {
            let matched: Vec<String> = disease
                .all_symptoms
                .iter()
                .filter(|s| symptoms.iter().any(|input| input.as_ref() == s.as_str()))
                .cloned()
                .collect();
            if matched.is_empty() {
                return None;
            }

            let match_count = u32::try_from(matched.len()).unwrap_or(u32::MAX);
            let total_symptoms = u32::try_from(disease.all_symptoms.len()).unwrap_or(u32::MAX);
            Some(DiagnosisResult {
                disease: Some(Disease {
                    matched_symptoms: Some(matched),
                    ..disease.clone()
                }),
                match_count,
                total_symptoms,
            })
        })
        .collect();

    results.sort_by(|a, b| b.cmp_score(a));
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_catalog() -> Catalog {
        Catalog::new(vec![
            Disease::new("Flu", "", &["demam", "batuk", "pilek"], ""),
            Disease::new("Tipes", "", &["demam tinggi", "mual", "lemas"], ""),
        ])
        .unwrap()
    }

    #[test]
    fn strict_returns_flu_for_exact_match() {
        let catalog = small_catalog();
        let found = diagnose_strict(&catalog, &["demam", "batuk", "pilek"]);
        assert_eq!(found.map(|d| d.name.as_str()), Some("Flu"));
    }

    #[test]
    fn strict_accepts_superset_input() {
        let catalog = small_catalog();
        let found = diagnose_strict(&catalog, &["mual", "pusing", "lemas", "demam tinggi"]);
        assert_eq!(found.map(|d| d.name.as_str()), Some("Tipes"));
    }

    #[test]
    fn strict_returns_none_for_partial_or_empty_input() {
        let catalog = small_catalog();
        let empty: [&str; 0] = [];
        assert!(diagnose_strict(&catalog, &empty).is_none());
        assert!(diagnose_strict(&catalog, &["demam", "batuk"]).is_none());
    }

    #[test]
    fn strict_prefers_catalog_order() {
        let catalog = Catalog::new(vec![
            Disease::new("A", "", &["demam"], ""),
            Disease::new("B", "", &["demam"], ""),
        ])
        .unwrap();
        let found = diagnose_strict(&catalog, &["demam"]);
        assert_eq!(found.map(|d| d.name.as_str()), Some("A"));
    }

    #[test]
    fn analyze_exact_match() {
        let catalog = small_catalog();
        let results = analyze_symptoms(&catalog, &["demam", "batuk", "pilek"]);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].disease_name(), Some("Flu"));
        assert_eq!(results[0].match_count, 3);
        assert_eq!(results[0].total_symptoms, 3);
        assert_eq!(
            results[0].disease.as_ref().unwrap().matched_symptoms,
            Some(vec!["demam".into(), "batuk".into(), "pilek".into()])
        );
    }

    #[test]
    fn analyze_partial_match_keeps_catalog_order_on_ties() {
        let catalog = small_catalog();
        let results = analyze_symptoms(&catalog, &["demam", "mual"]);

        let names: Vec<_> = results.iter().filter_map(|r| r.disease_name()).collect();
        assert_eq!(names, vec!["Flu", "Tipes"]);
        assert!(results.iter().all(|r| r.match_count == 1 && r.total_symptoms == 3));
    }

    #[test]
    fn analyze_excludes_zero_matches() {
        let catalog = small_catalog();
        let results = analyze_symptoms(&catalog, &["mual"]);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].disease_name(), Some("Tipes"));

        assert!(analyze_symptoms(&catalog, &["gatal"]).is_empty());
    }

    #[test]
    fn analyze_empty_input_returns_empty() {
        let empty: [&str; 0] = [];
        assert!(analyze_symptoms(Catalog::builtin(), &empty).is_empty());
    }

    #[test]
    fn analyze_results_are_bounded_and_sorted() {
        let catalog = Catalog::builtin();
        let inputs: [&[&str]; 4] = [
            &["demam", "mual", "lemas"],
            &["demam tinggi", "bintik merah", "nyeri sendi"],
            &["batuk", "sesak nafas", "sakit kepala", "diare"],
            &["lemas"],
        ];

        for input in inputs {
            let results = analyze_symptoms(catalog, input);
            assert!(!results.is_empty());
            for r in &results {
                assert!(r.match_count >= 1);
                assert!(r.match_count <= r.total_symptoms);
            }
            for pair in results.windows(2) {
                assert!(pair[0].score() >= pair[1].score());
            }
        }
    }

    #[test]
    fn analyze_ranks_higher_fraction_first() {
        let catalog = Catalog::builtin();
        let results = analyze_symptoms(catalog, &["demam", "batuk", "sesak nafas"]);

        assert_eq!(results[0].disease_name(), Some("Covid-19"));
        assert_eq!(results[0].match_count, 3);
        assert_eq!(results[1].disease_name(), Some("Flu"));
        assert_eq!(results[1].match_count, 2);
    }

    #[test]
    fn strict_result_vocabulary_is_contained_in_input() {
        let catalog = Catalog::builtin();
        let input = ["demam", "batuk", "pilek", "sakit kepala", "lemas", "mual"];
        let disease = diagnose_strict(catalog, &input).unwrap();
        assert!(disease.all_symptoms.iter().all(|s| input.contains(&s.as_str())));
    }
}
