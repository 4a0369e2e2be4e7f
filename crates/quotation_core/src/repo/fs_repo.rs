//! One-JSON-file-per-quotation repository.
//!
//! # Invariants
//! - Document `<id>` lives at `<dir>/<id>.json`.
//! - Files are pretty-printed UTF-8 with non-ASCII text left unescaped.
//! - No locking: concurrent writers to one id race, last write wins.

use crate::model::quotation::QuotationId;
use crate::repo::quotation_repo::{decode_document, QuotationRepository, RepoError, RepoResult};
use log::debug;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const DOCUMENT_SUFFIX: &str = ".json";

/// Filesystem-backed quotation repository.
#[derive(Debug, Clone)]
pub struct FsQuotationRepository {
    dir: PathBuf,
}

impl FsQuotationRepository {
    /// Opens a repository rooted at `dir`, creating the directory if absent.
    pub fn open(dir: impl Into<PathBuf>) -> RepoResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `id`.
    pub fn document_path(&self, id: &QuotationId) -> PathBuf {
        self.dir.join(format!("{id}{DOCUMENT_SUFFIX}"))
    }
}

impl QuotationRepository for FsQuotationRepository {
    fn put(&self, id: &QuotationId, document: &Value) -> RepoResult<()> {
        let encoded = serde_json::to_vec_pretty(document).map_err(RepoError::Encode)?;
        fs::write(self.document_path(id), encoded)?;
        Ok(())
    }

    fn get(&self, id: &QuotationId) -> RepoResult<Option<Value>> {
        match fs::read(self.document_path(id)) {
            Ok(raw) => decode_document(id, &raw).map(Some),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn delete(&self, id: &QuotationId) -> RepoResult<bool> {
        match fs::remove_file(self.document_path(id)) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn list_ids(&self) -> RepoResult<Vec<QuotationId>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(stem) = file_name
                .to_str()
                .and_then(|name| name.strip_suffix(DOCUMENT_SUFFIX))
            else {
                continue;
            };
            match QuotationId::parse(stem) {
                Ok(id) => ids.push(id),
                Err(err) => debug!(
                    "event=quotation_list module=repo status=skip reason=invalid_id error={err}"
                ),
            }
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::FsQuotationRepository;
    use crate::model::quotation::QuotationId;
    use crate::repo::quotation_repo::QuotationRepository;
    use serde_json::json;

    #[test]
    fn open_creates_missing_directory() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("nested").join("quotations");
        let repo = FsQuotationRepository::open(&dir).unwrap();
        assert!(repo.dir().is_dir());
    }

    #[test]
    fn put_writes_pretty_utf8_without_escaping() {
        let root = tempfile::tempdir().unwrap();
        let repo = FsQuotationRepository::open(root.path()).unwrap();
        let id = QuotationId::parse("QTN-1").unwrap();

        repo.put(&id, &json!({"quotation_number": "QTN-1", "customer": "台北公司"}))
            .unwrap();

        let written = std::fs::read_to_string(repo.document_path(&id)).unwrap();
        assert!(written.contains("台北公司"));
        assert!(written.contains("\n  \"customer\""));
    }

    #[test]
    fn list_ignores_non_json_files() {
        let root = tempfile::tempdir().unwrap();
        let repo = FsQuotationRepository::open(root.path()).unwrap();
        std::fs::write(root.path().join("readme.txt"), "x").unwrap();
        std::fs::write(root.path().join("QTN-2.json"), "{}").unwrap();

        let ids = repo.list_ids().unwrap();
        assert_eq!(ids, vec![QuotationId::parse("QTN-2").unwrap()]);
    }
}
