use crate::error::BronzeError;
use std::path::{Path, PathBuf};
use tracing::info;

/// Copies the bundled retail dataset into the bronze layer untouched.
///
/// Bronze snapshots are raw byte-for-byte copies kept for provenance: no
/// parsing, no cleaning. Re-running the extract replaces the snapshot.
pub struct DatasetExtractor {
    source: PathBuf,
    bronze_dir: PathBuf,
}

/// Where a dataset snapshot lands inside the bronze directory. The silver
/// transformer reads from the same location.
pub fn dataset_snapshot_path(bronze_dir: &Path, source: &Path) -> PathBuf {
    let file_name = source.file_name().unwrap_or(source.as_os_str());
    bronze_dir.join("raw").join(file_name)
}

impl DatasetExtractor {
    pub fn new(source: impl Into<PathBuf>, bronze_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            bronze_dir: bronze_dir.into(),
        }
    }

    /// Writes the snapshot and returns its path.
    pub async fn snapshot(&self) -> Result<PathBuf, BronzeError> {
        if !self.source.is_file() {
            return Err(BronzeError::MissingSource(
                self.source.display().to_string(),
            ));
        }

        let destination = dataset_snapshot_path(&self.bronze_dir, &self.source);
        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = tokio::fs::copy(&self.source, &destination).await?;

        info!(
            source = %self.source.display(),
            snapshot = %destination.display(),
            bytes,
            "dataset snapshot written"
        );
        Ok(destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn snapshot_copies_source_into_raw_dir() {
        let workdir = TempDir::new().unwrap();
        let source = workdir.path().join("orders.csv");
        tokio::fs::write(&source, b"Order Id,Category Name\n1,Fitness\n")
            .await
            .unwrap();
        let bronze = workdir.path().join("bronze");

        let extractor = DatasetExtractor::new(&source, &bronze);
        let snapshot = extractor.snapshot().await.unwrap();

        assert_eq!(snapshot, bronze.join("raw").join("orders.csv"));
        let copied = tokio::fs::read(&snapshot).await.unwrap();
        assert_eq!(copied, b"Order Id,Category Name\n1,Fitness\n");
    }

    #[tokio::test]
    async fn missing_source_is_reported_with_its_path() {
        let workdir = TempDir::new().unwrap();
        let extractor = DatasetExtractor::new(
            workdir.path().join("nope.csv"),
            workdir.path().join("bronze"),
        );

        let err = extractor.snapshot().await.unwrap_err();
        match err {
            BronzeError::MissingSource(path) => assert!(path.ends_with("nope.csv")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
