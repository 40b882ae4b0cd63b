//! JSON file backend
//!
//! The collection lives in one file as a JSON array, replaced atomically on every write

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use crate::links::ShortLink;

use super::backend::Backend;
use super::backend::Result;

/// File backed collection
#[derive(Clone, Debug)]
pub struct JsonFile {
    /// Location of the JSON file
    path: PathBuf,
}

impl JsonFile {
    /// Use the file at `path`, it does not have to exist yet
    pub fn new<P>(path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self { path: path.into() }
    }

    /// Sibling path the new contents are written to before the rename
    fn temporary_path(&self) -> PathBuf {
        let mut file_name = self
            .path
            .file_name()
            .map_or_else(|| OsString::from("short-links"), ToOwned::to_owned);
        file_name.push(".tmp");

        self.path.with_file_name(file_name)
    }
}

#[async_trait]
impl Backend for JsonFile {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn read_all(&self) -> Result<Vec<ShortLink>> {
        match fs::read(&self.path).await {
            Ok(contents) if contents.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
            Ok(contents) => Ok(serde_json::from_slice(&contents)?),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!("Creating empty data file: {}", self.path.display());

                self.write_all(&[]).await?;

                Ok(Vec::new())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn write_all(&self, links: &[ShortLink]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let contents = serde_json::to_vec_pretty(links)?;
        let temporary_path = self.temporary_path();

        fs::write(&temporary_path, contents).await?;
        replace(&temporary_path, &self.path).await
    }
}

/// Move `from` over `to`, cleaning up `from` when that fails
async fn replace(from: &Path, to: &Path) -> Result<()> {
    if let Err(err) = fs::rename(from, to).await {
        let _ = fs::remove_file(from).await;

        return Err(err.into());
    }

    Ok(())
}
