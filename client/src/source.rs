//! Where raw payloads come from on each poll tick.

use std::io;
use std::path::PathBuf;

/// Produces one raw payload per call. The poller never calls `fetch` again
/// before the previous call has returned.
#[allow(async_fn_in_trait)]
pub trait PayloadSource {
    async fn fetch(&mut self) -> io::Result<Vec<u8>>;
}

/// Re-reads a payload file on every tick; used for local runs and captured replays.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl PayloadSource for FileSource {
    async fn fetch(&mut self) -> io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}
