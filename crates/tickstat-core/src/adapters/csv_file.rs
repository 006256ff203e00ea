use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use tracing::debug;

use crate::data_source::{DailyRowsRequest, DataSource, RowBatch, SourceError};

/// Reads `<dir>/<TICKER>.csv` files laid out like the Quandl export.
///
/// Files are served whole; the requested date range is not applied.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    dir: PathBuf,
}

impl CsvFileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, req: &DailyRowsRequest) -> PathBuf {
        self.dir.join(format!("{}.csv", req.ticker.as_str()))
    }

    async fn read_rows(&self, req: DailyRowsRequest) -> Result<RowBatch, SourceError> {
        let path = self.path_for(&req);
        debug!(source = self.id(), path = %path.display(), "reading daily rows");

        let body = tokio::fs::read_to_string(&path).await.map_err(|error| {
            SourceError::io(format!("failed to read {}: {error}", path.display()))
        })?;

        Ok(RowBatch::from_csv_body(&body))
    }
}

impl DataSource for CsvFileSource {
    fn id(&self) -> &'static str {
        "csv_file"
    }

    fn daily_rows<'a>(
        &'a self,
        req: DailyRowsRequest,
    ) -> Pin<Box<dyn Future<Output = Result<RowBatch, SourceError>> + Send + 'a>> {
        Box::pin(self.read_rows(req))
    }
}
