//! 导出流程：antidelay 解析 → 时间戳转换 → 拼接 → 写入文档目录 → 通知。
//!
//! 时间戳转换、存储写入和通知都是外部协作者，分别由 [`TimestampTransform`]、
//! [`DocumentStorage`] 和 [`Notifier`] 抽象。

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Display;

use embassy_time::{Duration, Timer};
use thiserror::Error;

/// 目标路径中没有可用文件名时使用的文件名。
pub const FALLBACK_FILE_NAME: &str = "timestamps.txt";

/// 文档目录在通知中显示的名称。
pub const DOCUMENTS_AREA: &str = "Documents";

/// 把原始信号文本转换为时间戳列表的外部函数。
///
/// 视为纯函数；返回的错误会使本次导出失败。
pub trait TimestampTransform {
    type Error: Display;

    fn transform(&self, raw_text: &str, antidelay_seconds: i64) -> Result<Vec<String>, Self::Error>;
}

impl<F, E> TimestampTransform for F
where
    F: Fn(&str, i64) -> Result<Vec<String>, E>,
    E: Display,
{
    type Error = E;

    fn transform(&self, raw_text: &str, antidelay_seconds: i64) -> Result<Vec<String>, E> {
        self(raw_text, antidelay_seconds)
    }
}

/// 写入固定“文档”区域的存储原语，文本按 UTF-8 编码。
///
/// 实现应当保证写入要么完整成功要么失败，不留下半截文件。
pub trait DocumentStorage {
    type Error: Display;

    async fn write_text(&mut self, file_name: &str, contents: &str) -> Result<(), Self::Error>;
}

/// 通知的样式。
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    #[default]
    Default,
    Destructive,
}

/// 交给宿主显示的一条通知。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: &'static str,
    pub description: String,
    pub severity: Severity,
}

/// 显示通知的外部原语，发出即忘。
pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}

/// 导出失败的原因。`Display` 就是底层错误的消息。
#[derive(Debug, Error)]
pub enum ExportError<T, W> {
    /// 时间戳转换失败。
    #[error("{0}")]
    Transform(T),
    /// 写文件失败（权限、磁盘空间、I/O）。
    #[error("{0}")]
    Write(W),
}

/// 一次成功导出的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub file_name: String,
    pub timestamps: usize,
    pub bytes: usize,
}

/// 写入前已经准备好的内容，对应流程中无副作用的前几步。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    pub antidelay_seconds: i64,
    pub file_name: String,
    pub timestamps: usize,
    pub contents: String,
}

pub type ExportResult<T, S> = Result<
    SavedFile,
    ExportError<<T as TimestampTransform>::Error, <S as DocumentStorage>::Error>,
>;

/// 解析 antidelay 文本。
///
/// 跳过前导空白，接受可选的符号和前导数字（`"15s"` 解析为 15）。
/// 没有数字或超出范围时返回 0，从不报错。
pub fn parse_antidelay(raw: &str) -> i64 {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits = rest
        .find(|c: char| !c.is_ascii_digit())
        .map_or(rest, |end| &rest[..end]);
    if digits.is_empty() {
        return 0;
    }

    // 负数向负方向累加，`i64::MIN` 才能表示。
    let value = digits.bytes().try_fold(0i64, |acc, b| {
        let digit = i64::from(b - b'0');
        let acc = acc.checked_mul(10)?;
        if negative {
            acc.checked_sub(digit)
        } else {
            acc.checked_add(digit)
        }
    });
    value.unwrap_or(0)
}

/// 从目标路径取出写入用的文件名：最后一个 `/` 之后的部分。
///
/// 路径为空、没有分隔符或以分隔符结尾时使用 [`FALLBACK_FILE_NAME`]。
pub fn file_name_for(target_path: &str) -> &str {
    match target_path.rsplit_once('/') {
        Some((_, name)) if !name.is_empty() => name,
        _ => FALLBACK_FILE_NAME,
    }
}

/// 导出流程。
///
/// 短按时调用 [`ExportController::export`]。每次调用相互独立，不缓存任何结果；
/// 无论成功还是失败都会以一条通知结束。
pub struct ExportController<T, S, N> {
    transform: T,
    storage: S,
    notifier: N,
    settle_delay: Duration,
}

impl<T, S, N> ExportController<T, S, N>
where
    T: TimestampTransform,
    S: DocumentStorage,
    N: Notifier,
{
    pub fn new(transform: T, storage: S, notifier: N, settle_delay: Duration) -> Self {
        Self {
            transform,
            storage,
            notifier,
            settle_delay,
        }
    }

    /// 解析、转换、拼接并确定文件名，不产生任何副作用。
    pub fn prepare(
        &self,
        signals_text: &str,
        antidelay_raw: &str,
        target_path: &str,
    ) -> Result<ExportPayload, T::Error> {
        let antidelay_seconds = parse_antidelay(antidelay_raw);
        debug!("parsed antidelay seconds: {}", antidelay_seconds);

        let timestamps = self.transform.transform(signals_text, antidelay_seconds)?;
        let contents = timestamps.join("\n");
        let file_name = file_name_for(target_path);
        debug!(
            "prepared {} timestamps ({} bytes) for {}",
            timestamps.len(),
            contents.len(),
            file_name
        );

        Ok(ExportPayload {
            antidelay_seconds,
            file_name: String::from(file_name),
            timestamps: timestamps.len(),
            contents,
        })
    }

    /// 执行一次导出并通知结果。
    ///
    /// 写入位置总是固定的文档区域，`target_path` 只提供文件名。
    /// 失败不会重试，错误在通知之后原样返回给调用者。
    pub async fn export(
        &mut self,
        signals_text: &str,
        antidelay_raw: &str,
        target_path: &str,
    ) -> ExportResult<T, S> {
        match self.try_export(signals_text, antidelay_raw, target_path).await {
            Ok(saved) => {
                info!("saved {} to documents", saved.file_name.as_str());
                self.notifier.notify(Notification {
                    title: "File saved successfully",
                    description: format!("Saved to {}/{}", DOCUMENTS_AREA, saved.file_name),
                    severity: Severity::Default,
                });
                Ok(saved)
            }
            Err(err) => {
                let message = format!("{}", err);
                warn!("export failed: {}", message.as_str());
                self.notifier.notify(Notification {
                    title: "Error saving file",
                    description: format!("Failed to save file: {}", message),
                    severity: Severity::Destructive,
                });
                Err(err)
            }
        }
    }

    async fn try_export(
        &mut self,
        signals_text: &str,
        antidelay_raw: &str,
        target_path: &str,
    ) -> ExportResult<T, S> {
        let payload = self
            .prepare(signals_text, antidelay_raw, target_path)
            .map_err(ExportError::Transform)?;

        Timer::after(self.settle_delay).await;

        self.storage
            .write_text(&payload.file_name, &payload.contents)
            .await
            .map_err(ExportError::Write)?;

        Ok(SavedFile {
            file_name: payload.file_name,
            timestamps: payload.timestamps,
            bytes: payload.contents.len(),
        })
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn set_settle_delay(&mut self, settle_delay: Duration) {
        self.settle_delay = settle_delay;
    }
}
