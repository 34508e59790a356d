use alloc::string::String;

use crate::config::ExportConfig;

/// 目标路径中没有目录部分时使用的目录前缀。
pub const DEFAULT_DIRECTORY: &str = "Documents/";

/// 文件选择器的类型过滤。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FileFilter {
    pub description: &'static str,
    pub extensions: &'static [&'static str],
}

impl FileFilter {
    /// 纯文本文件（`.txt`）。
    pub const TEXT: FileFilter = FileFilter {
        description: "Text files",
        extensions: &["txt"],
    };
}

/// 用户在宿主文件选择器中选中的文件。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedFile {
    pub name: String,
}

/// 宿主原生的单文件选择界面。
///
/// 用户取消时返回 `None`。
pub trait FilePicker {
    async fn pick_file(&mut self, filter: FileFilter) -> Option<PickedFile>;
}

/// 路径中最后一个 `/` 之前（含）的部分；没有分隔符时为 [`DEFAULT_DIRECTORY`]。
pub fn directory_prefix(target_path: &str) -> &str {
    match target_path.rfind('/') {
        Some(idx) => &target_path[..=idx],
        None => DEFAULT_DIRECTORY,
    }
}

fn base_name(name: &str) -> &str {
    name.rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(name)
}

/// 通过宿主文件选择器替换目标路径中的文件名，保留原有的目录前缀。
///
/// 只读取选中文件的名称，不读取文件内容。
pub struct PathPicker<F: FilePicker> {
    picker: F,
}

impl<F: FilePicker> PathPicker<F> {
    pub fn new(picker: F) -> Self {
        Self { picker }
    }

    /// 打开选择器，选中文件后更新 `config.target_path`。
    ///
    /// 返回路径是否被修改；用户取消时配置保持不变。
    pub async fn browse(&mut self, config: &mut ExportConfig) -> bool {
        let Some(file) = self.picker.pick_file(FileFilter::TEXT).await else {
            debug!("file browser: no file selected");
            return false;
        };

        let mut path = String::from(directory_prefix(&config.target_path));
        path.push_str(base_name(&file.name));
        debug!("file browser: target path updated to {}", path.as_str());
        config.target_path = path;
        true
    }

    pub fn picker(&self) -> &F {
        &self.picker
    }

    pub fn picker_mut(&mut self) -> &mut F {
        &mut self.picker
    }
}
