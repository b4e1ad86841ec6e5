use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::document::Document;
use crate::store::schema::{DocumentData, SCHEMA_VERSION};

/// Loads a parallel document from a JSON file and saves edits back to the
/// same path atomically (write `.tmp`, sync, rename).
pub struct DocumentStore {
    path: PathBuf,
}

impl DocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Document> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let data: DocumentData = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", self.path.display()))?;
        if data.schema_version != SCHEMA_VERSION {
            bail!(
                "Unsupported document schema version: {} (expected {})",
                data.schema_version,
                SCHEMA_VERSION
            );
        }
        let mut document = data.into_document();
        if document.name.is_empty() {
            document.name = self
                .path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
        }
        Ok(document)
    }

    pub fn save(&self, document: &Document) -> Result<()> {
        let data = DocumentData::from_document(document);
        let json = serde_json::to_string_pretty(&data)?;

        let tmp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&tmp_path)
            .with_context(|| format!("failed to create {}", tmp_path.display()))?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        Ok(())
    }

    /// Parse a document from in-memory JSON (bundled sample documents).
    pub fn parse(content: &str) -> Result<Document> {
        let data: DocumentData =
            serde_json::from_str(content).context("failed to parse document")?;
        if data.schema_version != SCHEMA_VERSION {
            bail!(
                "Unsupported document schema version: {} (expected {})",
                data.schema_version,
                SCHEMA_VERSION
            );
        }
        Ok(data.into_document())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DOC_JSON: &str = r#"{
        "name": "demo",
        "source_lang": "en",
        "target_lang": "fr",
        "sentences": [{
            "source": ["the", "cat"],
            "target": ["le", "chat"],
            "alignment": [[0, 0], [1, 1]],
            "edited": ""
        }]
    }"#;

    #[test]
    fn test_load_edit_save_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("demo.json");
        fs::write(&path, DOC_JSON).unwrap();

        let store = DocumentStore::new(&path);
        let mut document = store.load().unwrap();
        document.sentences[0].set_edited("le chat");
        store.save(&document).unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.sentences[0].edited(), "le chat");
        assert_eq!(reloaded.sentences[0].alignment.len(), 2);

        // No residual tmp file after a successful save.
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_version_rejection() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("future.json");
        let json = DOC_JSON.replace("\"name\"", "\"schema_version\": 99, \"name\"");
        fs::write(&path, json).unwrap();

        let err = DocumentStore::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("Unsupported document schema"));
        assert!(err.to_string().contains("99"));
    }

    #[test]
    fn test_name_falls_back_to_file_stem() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("news-2026.json");
        fs::write(&path, DOC_JSON.replace("\"demo\"", "\"\"")).unwrap();

        let document = DocumentStore::new(&path).load().unwrap();
        assert_eq!(document.name, "news-2026");
    }

    #[test]
    fn test_missing_file_is_an_error_with_path_context() {
        let store = DocumentStore::new("/nonexistent/never.json");
        let err = store.load().unwrap_err();
        assert!(err.to_string().contains("never.json"));
    }
}
