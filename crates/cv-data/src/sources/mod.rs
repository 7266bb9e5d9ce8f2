//! Reading the bounded prefix of an uploaded file

use std::path::Path;
use tokio::io::AsyncReadExt;
use cv_core::DatasetSummary;

use crate::config::ProfilerConfig;
use crate::profiler::profile;
use crate::DataError;

/// Read at most `chunk_size` bytes of the file and profile them
pub async fn profile_file(path: &Path, config: &ProfilerConfig) -> Result<DatasetSummary, DataError> {
    let file = tokio::fs::File::open(path).await?;
    let file_size = file.metadata().await?.len();

    let mut prefix = Vec::with_capacity(config.chunk_size.min(file_size as usize));
    file.take(config.chunk_size as u64).read_to_end(&mut prefix).await?;

    tracing::info!(
        "Sampling {:?}: read {} of {} bytes",
        path.file_name().unwrap_or_default(),
        prefix.len(),
        file_size
    );

    profile(&prefix, file_size, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_profile_small_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "a,b\n1,x\n2,y\n3,z\n").unwrap();

        let summary = profile_file(file.path(), &ProfilerConfig::default()).await.unwrap();
        assert_eq!(summary.estimated_row_count, 3);
        assert_eq!(summary.column_count, 2);
    }

    #[tokio::test]
    async fn test_large_file_reads_only_prefix() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "n,square").unwrap();
        for i in 0..5000 {
            writeln!(file, "{},{}", i, i * i).unwrap();
        }
        file.flush().unwrap();

        let config = ProfilerConfig { chunk_size: 1024, ..Default::default() };
        let summary = profile_file(file.path(), &config).await.unwrap();

        assert_eq!(summary.rows.len(), 100);
        assert!(summary.estimated_row_count > 1000);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = profile_file(&dir.path().join("nope.csv"), &ProfilerConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::Io(_)));
    }
}
