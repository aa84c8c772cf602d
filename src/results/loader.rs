//! @ai:module:intent JSON loader for fio result files
//! @ai:module:layer infrastructure
//! @ai:module:public_api ResultLoader, ResultLoaderTrait
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::results::record::ResultDocument;
use std::path::Path;

/// @ai:intent Trait for loading one result document
pub trait ResultLoaderTrait: Send + Sync {
    /// @ai:intent Load and decode a single result file
    fn load(&self, path: &Path) -> Result<ResultDocument>;
}

/// @ai:intent Loads fio JSON output files from disk
/// @ai:effects pure (stateless)
pub struct ResultLoader;

impl ResultLoader {
    /// @ai:intent Create a new result loader
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Decode result content already read into memory
    /// @ai:effects pure
    pub fn parse(path: &Path, content: &str) -> Result<ResultDocument> {
        serde_json::from_str(content).map_err(|e| Error::MalformedInput {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

impl Default for ResultLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultLoaderTrait for ResultLoader {
    /// @ai:intent Read and parse a result file
    /// @ai:effects fs:read
    fn load(&self, path: &Path) -> Result<ResultDocument> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::NotFound {
            path: path.to_path_buf(),
            source,
        })?;

        let document = Self::parse(path, &content)?;
        tracing::debug!(
            "Loaded {} ({} jobs)",
            path.display(),
            document.jobs.len()
        );
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    #[test]
    fn test_load_valid_document() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("run.json");
        std::fs::write(
            &path,
            r#"{"fio version": "fio-3.36", "jobs": [{"jobname": "a"}, {"jobname": "b"}]}"#,
        )
        .unwrap();

        let doc = ResultLoader::new().load(&path).unwrap();
        assert_eq!(doc.fio_version.as_deref(), Some("fio-3.36"));
        assert_eq!(doc.jobs.len(), 2);
    }

    #[test]
    fn test_missing_jobs_is_empty_document() {
        let doc = ResultLoader::parse(Path::new("x.json"), r#"{"timestamp": 1}"#).unwrap();
        assert!(doc.jobs.is_empty());
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let err = ResultLoader::new()
            .load(&temp.path().join("absent.json"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_invalid_content_is_malformed() {
        for content in ["{not json", "[1, 2]", r#"{"jobs": 5}"#] {
            let err = ResultLoader::parse(Path::new("bad.json"), content).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedInput, "content: {}", content);
        }
    }
}
