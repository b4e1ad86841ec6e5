use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::{AlignmentLink, Document, ParallelSentence};

pub const SCHEMA_VERSION: u32 = 1;

/// On-disk shape of a parallel document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DocumentData {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub document_number: i64,
    pub source_lang: String,
    pub target_lang: String,
    pub sentences: Vec<SentenceData>,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SentenceData {
    pub source: Vec<String>,
    pub target: Vec<String>,
    /// Index pairs (source word, target word). Not validated here: an
    /// out-of-range pair is the producing side's contract violation.
    #[serde(default)]
    pub alignment: Vec<(usize, usize)>,
    #[serde(default)]
    pub edited: String,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl DocumentData {
    pub fn into_document(self) -> Document {
        let sentences = self
            .sentences
            .into_iter()
            .enumerate()
            .map(|(i, s)| {
                let alignment = s
                    .alignment
                    .into_iter()
                    .map(|(src, tgt)| AlignmentLink::new(src, tgt))
                    .collect();
                ParallelSentence::new(i, s.source, s.target, alignment, s.edited)
            })
            .collect();
        Document {
            document_number: self.document_number,
            name: self.name,
            source_lang: self.source_lang,
            target_lang: self.target_lang,
            sentences,
        }
    }

    pub fn from_document(document: &Document) -> Self {
        let sentences = document
            .sentences
            .iter()
            .map(|s| SentenceData {
                source: s.source_words.clone(),
                target: s.target_words.clone(),
                alignment: s.alignment.iter().map(|a| (a.source, a.target)).collect(),
                edited: s.edited().to_string(),
            })
            .collect();
        Self {
            schema_version: SCHEMA_VERSION,
            name: document.name.clone(),
            document_number: document.document_number,
            source_lang: document.source_lang.clone(),
            target_lang: document.target_lang.clone(),
            sentences,
            saved_at: Some(Utc::now()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_optional_fields_take_defaults() {
        let json = r#"{
            "source_lang": "en",
            "target_lang": "fr",
            "sentences": [{"source": ["hi"], "target": ["salut"]}]
        }"#;
        let data: DocumentData = serde_json::from_str(json).unwrap();
        assert_eq!(data.schema_version, SCHEMA_VERSION);
        assert_eq!(data.document_number, 0);
        assert!(data.sentences[0].alignment.is_empty());
        assert_eq!(data.sentences[0].edited, "");
    }

    #[test]
    fn test_document_round_trip_preserves_edits_and_links() {
        let json = r#"{
            "name": "demo",
            "source_lang": "en",
            "target_lang": "fr",
            "sentences": [{
                "source": ["the", "cat"],
                "target": ["le", "chat"],
                "alignment": [[0, 0], [1, 1]],
                "edited": "le chat"
            }]
        }"#;
        let data: DocumentData = serde_json::from_str(json).unwrap();
        let mut document = data.into_document();
        assert_eq!(document.sentences[0].sentence_number, 0);
        assert_eq!(document.sentences[0].alignment.len(), 2);

        document.sentences[0].set_edited("le chat noir");
        let back = DocumentData::from_document(&document);
        assert_eq!(back.sentences[0].edited, "le chat noir");
        assert_eq!(back.sentences[0].alignment, vec![(0, 0), (1, 1)]);
        assert!(back.saved_at.is_some());
    }
}
