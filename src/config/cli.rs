use crate::core::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::PathBuf;

/// 本機檔案系統；相對路徑以 `base_path` 為基準，絕對路徑直接使用
#[derive(Debug, Clone, Default)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.base_path.join(path);

        if let Some(parent) = full_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // fs::write 會建立或截斷檔案，並在返回前關閉
        fs::write(full_path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        storage.write_file("data/price_list.csv", b"address,price\n").await.unwrap();

        let written = std::fs::read_to_string(temp_dir.path().join("data/price_list.csv")).unwrap();
        assert_eq!(written, "address,price\n");
    }

    #[tokio::test]
    async fn test_write_truncates_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("prices.csv");
        std::fs::write(&target, "old content that is longer").unwrap();

        let storage = LocalStorage::default();
        storage
            .write_file(target.to_str().unwrap(), b"new")
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "new");
    }
}
