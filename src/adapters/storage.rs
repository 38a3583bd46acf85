use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.resolve(path);
        let data = fs::read(full_path).await?;
        Ok(data)
    }

    async fn write_record(&self, path: &str, data: &[u8]) -> Result<PathBuf> {
        let full_path = self.resolve(path);

        // 不存在或是空檔案就直接寫入，已有內容則附加在後面
        let append = match fs::metadata(&full_path).await {
            Ok(meta) => meta.len() > 0,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };

        let mut file = if append {
            tracing::debug!("Appending to existing file {}", full_path.display());
            OpenOptions::new().append(true).open(&full_path).await?
        } else {
            fs::File::create(&full_path).await?
        };

        file.write_all(data).await?;
        file.flush().await?;

        Ok(full_path)
    }

    fn resolve(&self, path: &str) -> PathBuf {
        Path::new(&self.base_path).join(path)
    }
}
