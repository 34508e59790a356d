//! 宿主文件系统上的文档目录。

use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::string::String;

use thiserror::Error;

use crate::export::DocumentStorage;

#[derive(Debug, Error)]
pub enum DocumentsError {
    /// 当前用户没有可用的文档目录。
    #[error("documents directory is not available")]
    NoDocumentsDir,

    /// 文件名不是单个普通路径组成部分（包含分隔符、`..` 等）。
    #[error("invalid file name: {0:?}")]
    InvalidFileName(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Persist(#[from] tempfile::PersistError),
}

/// 以一个目录作为“文档”区域的 [`DocumentStorage`] 实现。
///
/// 写入先落到同目录下的临时文件，再原子地替换目标文件，失败时不会留下半截文件。
///
/// `write_text` 在开始前让出一次执行器，之后的文件操作是阻塞的，在调用者的
/// 执行器上完成。写入的是小文本文件；需要完全不阻塞执行器时，可以在
/// `spawn_blocking` 之类的线程池中调用 [`FsDocuments::write_text_blocking`]。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsDocuments {
    root: PathBuf,
}

impl FsDocuments {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// 当前用户的文档目录，例如 `~/Documents`。
    pub fn user_documents() -> Result<Self, DocumentsError> {
        directories::UserDirs::new()
            .and_then(|dirs| dirs.document_dir().map(Path::to_path_buf))
            .map(Self::new)
            .ok_or(DocumentsError::NoDocumentsDir)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 文件名对应的完整路径，文件名不合法时返回错误。
    pub fn path_for(&self, file_name: &str) -> Result<PathBuf, DocumentsError> {
        let mut components = Path::new(file_name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => Ok(self.root.join(name)),
            _ => Err(DocumentsError::InvalidFileName(String::from(file_name))),
        }
    }

    /// 同步写入文本，已存在的文件会被覆盖。
    pub fn write_text_blocking(
        &self,
        file_name: &str,
        contents: &str,
    ) -> Result<(), DocumentsError> {
        let path = self.path_for(file_name)?;
        std::fs::create_dir_all(&self.root)?;

        let mut file = tempfile::NamedTempFile::new_in(&self.root)?;
        file.write_all(contents.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&path)?;

        trace!("wrote {} bytes to documents", contents.len());
        Ok(())
    }
}

impl DocumentStorage for FsDocuments {
    type Error = DocumentsError;

    async fn write_text(&mut self, file_name: &str, contents: &str) -> Result<(), Self::Error> {
        embassy_futures::yield_now().await;
        self.write_text_blocking(file_name, contents)
    }
}
