//! Subject records and the read-only store they live in.
//!
//! Records are plain data parsed once from the JSON source. Every optional
//! field defaults on a schema miss, so rendering code only ever sees empty
//! strings, never a missing key.

use std::collections::HashMap;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use serde::Deserialize;
use tracing::{debug, warn};

/// Separator between the "primary fact" and "habitat" halves of `facts`.
pub const SECTION_MARKER: &str = "\n\n";

/// Per-language text, keyed by language code.
pub type Localized = HashMap<String, String>;

// ─── Subject record ─────────────────────────────────────────────────────────

/// One entry of the record source (e.g. a species).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SubjectRecord {
    pub id: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub names: Localized,
    #[serde(default)]
    pub short_facts: Localized,
    #[serde(default)]
    pub facts: Localized,
    /// Short status code, resolved through the status registry.
    #[serde(default)]
    pub conservation: Option<String>,
}

impl SubjectRecord {
    pub fn name(&self, lang: &str) -> &str {
        localized(&self.names, lang)
    }

    pub fn short_fact(&self, lang: &str) -> &str {
        localized(&self.short_facts, lang)
    }

    pub fn long_text(&self, lang: &str) -> &str {
        localized(&self.facts, lang)
    }
}

/// Look up `lang` in a localized map, degrading to `""`.
pub fn localized<'a>(map: &'a Localized, lang: &str) -> &'a str {
    map.get(lang).map(String::as_str).unwrap_or("")
}

/// The two logical halves of a record's long-form text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactSections {
    pub primary_fact: String,
    /// Empty when the text has no second section.
    pub habitat_fact: String,
}

/// Split long-form text on [`SECTION_MARKER`]: the first segment is the
/// primary fact, the remaining segments are rejoined with the marker.
pub fn split_facts(text: &str) -> FactSections {
    match text.split_once(SECTION_MARKER) {
        Some((primary, rest)) => FactSections {
            primary_fact: primary.to_string(),
            habitat_fact: rest.to_string(),
        },
        None => FactSections {
            primary_fact: text.to_string(),
            habitat_fact: String::new(),
        },
    }
}

// ─── Wire document ──────────────────────────────────────────────────────────

/// Accepted top-level shapes of the record source.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordDocument {
    Wrapped {
        #[serde(alias = "records")]
        fish: Vec<SubjectRecord>,
    },
    Bare(Vec<SubjectRecord>),
}

// ─── Record store ───────────────────────────────────────────────────────────

/// Read-only, id-indexed record sequence.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<SubjectRecord>,
    index: HashMap<String, usize>,
}

impl RecordStore {
    /// Build a store, dropping any record whose id was already seen.
    pub fn new(records: impl IntoIterator<Item = SubjectRecord>) -> Self {
        let mut store = Self::default();
        for record in records {
            if store.index.contains_key(&record.id) {
                warn!("Duplicate record id \"{}\" ignored", record.id);
                continue;
            }
            store.index.insert(record.id.clone(), store.records.len());
            store.records.push(record);
        }
        store
    }

    /// Parse the JSON record source.
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: RecordDocument =
            serde_json::from_str(json).wrap_err("Record source is not valid record JSON")?;
        let records = match doc {
            RecordDocument::Wrapped { fish } => fish,
            RecordDocument::Bare(records) => records,
        };
        let store = Self::new(records);
        debug!("Parsed {} records", store.len());
        Ok(store)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&SubjectRecord> {
        self.index_of(id).and_then(|i| self.records.get(i))
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SubjectRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// The two-record fixture used across controller tests.
    pub(crate) fn sample_store() -> RecordStore {
        RecordStore::from_json(
            r#"{"fish": [
                {"id": "a1", "image": "img/clownfish.jpg",
                 "names": {"en": "Clownfish", "es": "Pez payaso"},
                 "short_facts": {"en": "Small and orange."},
                 "facts": {"en": "Lives in anemones.\n\nFound in the Pacific."}},
                {"id": "a2", "image": "img/shark.jpg",
                 "names": {"en": "Shark"}, "conservation": "VU"}
            ]}"#,
        )
        .expect("fixture parses")
    }

    #[test]
    fn parses_wrapped_document_and_finds_by_id() {
        let store = sample_store();
        assert_eq!(store.len(), 2);
        assert_eq!(store.find_by_id("a2").map(|r| r.name("en")), Some("Shark"));
        assert!(store.find_by_id("nope").is_none());
    }

    #[test]
    fn parses_bare_array() {
        let store = RecordStore::from_json(r#"[{"id": "x"}]"#).unwrap();
        assert_eq!(store.index_of("x"), Some(0));
    }

    #[test]
    fn missing_fields_degrade_to_empty() {
        let store = sample_store();
        let shark = store.find_by_id("a2").unwrap();
        assert_eq!(shark.short_fact("en"), "");
        assert_eq!(shark.long_text("en"), "");
        assert_eq!(shark.image, "img/shark.jpg");
        let clown = store.find_by_id("a1").unwrap();
        assert_eq!(clown.name("xx"), "");
        assert_eq!(clown.conservation, None);
    }

    #[test]
    fn duplicate_ids_keep_first() {
        let store = RecordStore::from_json(
            r#"[{"id": "d", "names": {"en": "First"}}, {"id": "d", "names": {"en": "Second"}}]"#,
        )
        .unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.find_by_id("d").unwrap().name("en"), "First");
    }

    #[test]
    fn malformed_source_is_an_error() {
        assert!(RecordStore::from_json("{\"fish\": 3}").is_err());
        assert!(RecordStore::from_json("not json").is_err());
    }

    #[test]
    fn split_without_marker_has_no_habitat() {
        let s = split_facts("Only one section.");
        assert_eq!(s.primary_fact, "Only one section.");
        assert!(s.habitat_fact.is_empty());
    }

    #[test]
    fn split_rejoins_trailing_sections() {
        let s = split_facts("A\n\nB\n\nC");
        assert_eq!(s.primary_fact, "A");
        assert_eq!(s.habitat_fact, "B\n\nC");
    }
}
