use crate::domain::model::ListingRecord;
use crate::domain::ports::ListingSource;
use crate::utils::error::{PricingError, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Csv,
    Json,
}

impl SnapshotFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("csv") => Ok(SnapshotFormat::Csv),
            Some("json") => Ok(SnapshotFormat::Json),
            _ => Err(PricingError::UnsupportedSnapshotFormat {
                path: path.display().to_string(),
            }),
        }
    }
}

/// 從本機 CSV / JSON 檔讀取刊登快照
#[derive(Debug, Clone)]
pub struct LocalSnapshot {
    path: PathBuf,
}

impl LocalSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ListingSource for LocalSnapshot {
    async fn load_listings(&self) -> Result<Vec<ListingRecord>> {
        let format = SnapshotFormat::from_path(&self.path)?;
        let data = tokio::fs::read(&self.path).await?;

        tracing::debug!(
            "Read {} bytes of {:?} snapshot from {}",
            data.len(),
            format,
            self.path.display()
        );

        parse_snapshot(&data, format)
    }
}

pub fn parse_snapshot(data: &[u8], format: SnapshotFormat) -> Result<Vec<ListingRecord>> {
    match format {
        SnapshotFormat::Json => Ok(serde_json::from_slice(data)?),
        SnapshotFormat::Csv => {
            let mut reader = csv::ReaderBuilder::new()
                .trim(csv::Trim::All)
                .from_reader(data);
            let mut listings = Vec::new();
            for row in reader.deserialize() {
                listings.push(row?);
            }
            Ok(listings)
        }
    }
}
