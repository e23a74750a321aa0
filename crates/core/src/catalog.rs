//! Static disease catalog.
//!
//! The built-in catalog is read-only and initialised once per process, so it can be shared by
//! any number of concurrent callers. Custom catalogs go through [`Catalog::new`], which enforces
//! unique names and non-empty vocabularies.

use crate::disease::Disease;
use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("duplicate disease name in catalog: {0}")]
    DuplicateDisease(String),
    #[error("disease has no symptoms: {0}")]
    EmptyVocabulary(String),
}

static BUILTIN: LazyLock<Catalog> = LazyLock::new(|| Catalog {
    diseases: vec![
        Disease::new(
            "Flu",
            "Infeksi virus yang menyerang sistem pernapasan (hidung, tenggorokan, dan paru-paru).",
            &["demam", "batuk", "pilek", "sakit kepala", "lemas"],
            "Istirahat cukup dan minum vitamin C",
        ),
        Disease::new(
            "Tipes",
            "Penyakit akut yang disebabkan oleh bakteri Salmonella typhi.",
            &["demam tinggi", "mual", "lemas", "sakit perut", "diare"],
            "Makan makanan lunak dan hindari makanan pedas",
        ),
        Disease::new(
            "Covid-19",
            "Penyakit menular yang disebabkan oleh virus SARS-CoV-2.",
            &["demam", "batuk", "sesak nafas", "hilang penciuman", "lemas"],
            "Isolasi mandiri dan hubungi layanan kesehatan",
        ),
        Disease::new(
            "Demam Berdarah",
            "Penyakit virus yang dibawa oleh nyamuk, terjadi di daerah tropis dan subtropis.",
            &["demam tinggi", "bintik merah", "nyeri sendi", "mual", "sakit kepala"],
            "Banyak minum air putih dan periksa trombosit",
        ),
    ],
});

/// Ordered list of known diseases. Order matters: it is the tie-break for both matchers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    diseases: Vec<Disease>,
}

impl Catalog {
    /// Builds a catalog from caller-supplied diseases.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if two diseases share a name or a disease has no symptoms.
    pub fn new(diseases: Vec<Disease>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for disease in &diseases {
            if disease.all_symptoms.is_empty() {
                return Err(CatalogError::EmptyVocabulary(disease.name.clone()));
            }
            if !seen.insert(disease.name.as_str()) {
                return Err(CatalogError::DuplicateDisease(disease.name.clone()));
            }
        }
        Ok(Self { diseases })
    }

    /// The process-wide built-in catalog.
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    pub fn diseases(&self) -> &[Disease] {
        &self.diseases
    }

    pub fn len(&self) -> usize {
        self.diseases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diseases.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&Disease> {
        self.diseases.iter().find(|d| d.name == name)
    }

    /// Sorted, de-duplicated union of every disease's symptoms.
    pub fn all_symptoms(&self) -> Vec<String> {
        self.diseases
            .iter()
            .flat_map(|d| d.all_symptoms.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid() {
        let builtin = Catalog::builtin();
        let rebuilt = Catalog::new(builtin.diseases().to_vec()).unwrap();

        assert_eq!(&rebuilt, builtin);
        assert_eq!(builtin.len(), 4);
        assert_eq!(builtin.diseases()[0].name, "Flu");
    }

    #[test]
    fn all_symptoms_is_sorted_and_unique() {
        let symptoms = Catalog::builtin().all_symptoms();

        let mut sorted = symptoms.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(symptoms, sorted);
        assert!(symptoms.contains(&"demam tinggi".to_string()));
        assert_eq!(symptoms.iter().filter(|s| *s == "lemas").count(), 1);
    }

    #[test]
    fn new_rejects_duplicate_names() {
        let result = Catalog::new(vec![
            Disease::new("Flu", "", &["demam"], ""),
            Disease::new("Flu", "", &["batuk"], ""),
        ]);
        assert_eq!(result, Err(CatalogError::DuplicateDisease("Flu".into())));
    }

    #[test]
    fn new_rejects_empty_vocabulary() {
        let result = Catalog::new(vec![Disease::new("Kosong", "", &[], "")]);
        assert_eq!(result, Err(CatalogError::EmptyVocabulary("Kosong".into())));
    }

    #[test]
    fn find_by_name() {
        let catalog = Catalog::builtin();
        assert!(catalog.find("Tipes").is_some());
        assert!(catalog.find("tipes").is_none());
    }
}
