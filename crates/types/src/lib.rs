//! # SIDIA Types
//!
//! Validated primitives shared by the core, the REST API and the CLI.
//!
//! Both types normalise their input on construction (trimming whitespace) so that
//! downstream code can rely on the invariants without re-checking them.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,

    /// No usable symptom remained after trimming the input
    #[error("Symptoms are required")]
    NoSymptoms,
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Returns
    ///
    /// Returns `Ok(NonEmptyText)` if the trimmed input is non-empty,
    /// or `Err(TextError::Empty)` if it's empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A non-empty, de-duplicated list of symptoms as selected by a user.
///
/// Each entry is trimmed; blank entries are dropped and repeated entries keep only their
/// first occurrence, so the selection order is preserved. Matching against the catalog is
/// exact, so no case folding happens here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymptomList(Vec<NonEmptyText>);

impl SymptomList {
    /// Builds a symptom list, failing with [`TextError::NoSymptoms`] when nothing usable
    /// remains after normalisation.
    pub fn new<I, S>(symptoms: I) -> Result<Self, TextError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<NonEmptyText> = Vec::new();
        for raw in symptoms {
            let Ok(symptom) = NonEmptyText::new(raw) else {
                continue;
            };
            if !out.contains(&symptom) {
                out.push(symptom);
            }
        }

        if out.is_empty() {
            return Err(TextError::NoSymptoms);
        }
        Ok(Self(out))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(NonEmptyText::as_str)
    }

    pub fn contains(&self, symptom: &str) -> bool {
        self.iter().any(|s| s == symptom)
    }

    /// Comma-separated rendering used when embedding the list in prompts.
    pub fn joined(&self) -> String {
        self.iter().collect::<Vec<_>>().join(", ")
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.iter().map(str::to_owned).collect()
    }
}

impl serde::Serialize for SymptomList {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> serde::Deserialize<'de> for SymptomList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = Vec::<String>::deserialize(deserializer)?;
        SymptomList::new(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_input() {
        let text = NonEmptyText::new("  Budi  ").unwrap();
        assert_eq!(text.as_str(), "Budi");
    }

    #[test]
    fn non_empty_text_rejects_whitespace() {
        assert_eq!(NonEmptyText::new("   \t"), Err(TextError::Empty));
        assert_eq!(NonEmptyText::new(""), Err(TextError::Empty));
    }

    #[test]
    fn non_empty_text_deserialize_validates() {
        let ok: NonEmptyText = serde_json::from_str("\" Siti \"").unwrap();
        assert_eq!(ok.as_str(), "Siti");

        let err = serde_json::from_str::<NonEmptyText>("\"  \"");
        assert!(err.is_err());
    }

    #[test]
    fn symptom_list_drops_blanks_and_duplicates() {
        let list = SymptomList::new(["demam", " batuk ", "", "demam", "   "]).unwrap();
        assert_eq!(list.to_vec(), vec!["demam".to_string(), "batuk".to_string()]);
        assert_eq!(list.len(), 2);
        assert!(list.contains("batuk"));
        assert!(!list.contains("pilek"));
    }

    #[test]
    fn symptom_list_rejects_empty_input() {
        let empty: [&str; 0] = [];
        assert_eq!(SymptomList::new(empty), Err(TextError::NoSymptoms));
        assert_eq!(SymptomList::new(["", "  "]), Err(TextError::NoSymptoms));
    }

    #[test]
    fn symptom_list_joined_keeps_selection_order() {
        let list = SymptomList::new(["pilek", "demam", "batuk"]).unwrap();
        assert_eq!(list.joined(), "pilek, demam, batuk");
    }

    #[test]
    fn symptom_list_serde_is_a_plain_array() {
        let list: SymptomList = serde_json::from_str(r#"["mual", "lemas"]"#).unwrap();
        assert_eq!(serde_json::to_string(&list).unwrap(), r#"["mual","lemas"]"#);

        assert!(serde_json::from_str::<SymptomList>("[]").is_err());
        assert!(serde_json::from_str::<SymptomList>("[1, 2]").is_err());
    }
}
