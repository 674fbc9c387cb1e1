//! 会话令牌存储
//!
//! 令牌保存在一个键值槽位中。`FileTokenStore` 把槽位落盘，进程重启后仍然有效；
//! `MemoryTokenStore` 只在进程生命周期内有效。

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::error::{CoreError, Result};

/// 令牌槽位
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, token: &str) -> Result<()>;
    fn remove(&self) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.slot.lock().clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.slot.lock() = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        self.slot.lock().take();
        Ok(())
    }
}

/// 磁盘上的槽位内容
#[derive(Debug, Serialize, Deserialize)]
struct TokenFile {
    token: String,
}

/// 以 JSON 文件保存令牌
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content =
            fs::read_to_string(&self.path).map_err(|e| CoreError::Storage(e.to_string()))?;
        let file: TokenFile =
            serde_json::from_str(&content).map_err(|e| CoreError::Storage(e.to_string()))?;

        Ok(Some(file.token).filter(|t| !t.is_empty()))
    }

    fn save(&self, token: &str) -> Result<()> {
        // 确保目录存在
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| CoreError::Storage(e.to_string()))?;
        }

        let content = serde_json::to_string(&TokenFile {
            token: token.to_string(),
        })?;
        fs::write(&self.path, content).map_err(|e| CoreError::Storage(e.to_string()))
    }

    fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::Storage(e.to_string())),
        }
    }
}
