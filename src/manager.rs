use core::convert::Infallible;

use crate::config::ExportConfig;
use crate::dialog::ConfigDialog;
use crate::export::{
    DocumentStorage, ExportController, ExportError, Notifier, SavedFile, TimestampTransform,
};
use crate::picker::{FilePicker, PathPicker};
use crate::{AsyncPressDriver, PressDisambiguator, PressEvent};

/// 一次分发的结果。
#[derive(Debug)]
pub enum Dispatched<TE, WE> {
    /// 长按打开了配置界面。
    DialogOpened,
    /// 短按执行了一次导出。
    Exported(Result<SavedFile, ExportError<TE, WE>>),
}

/// 保存按钮的共享状态：导出配置、配置界面以及导出流程。
///
/// 长按打开配置界面，短按用当前配置导出释放时携带的信号文本。
pub struct SaveTsManager<T, S, N> {
    config: ExportConfig,
    dialog: ConfigDialog,
    exporter: ExportController<T, S, N>,
}

impl<T, S, N> SaveTsManager<T, S, N>
where
    T: TimestampTransform,
    S: DocumentStorage,
    N: Notifier,
{
    pub fn new(config: ExportConfig, exporter: ExportController<T, S, N>) -> Self {
        Self {
            config,
            dialog: ConfigDialog::new(),
            exporter,
        }
    }

    /// 处理一个判定结果。导出在返回之前执行完毕。
    pub async fn dispatch<P: AsRef<str>>(
        &mut self,
        event: PressEvent<P>,
    ) -> Dispatched<T::Error, S::Error> {
        match event {
            PressEvent::LongActivate => {
                self.dialog.open();
                Dispatched::DialogOpened
            }
            PressEvent::ShortActivate(signals) => {
                let result = self
                    .exporter
                    .export(
                        signals.as_ref(),
                        &self.config.antidelay_seconds,
                        &self.config.target_path,
                    )
                    .await;
                Dispatched::Exported(result)
            }
        }
    }

    /// 等待下一个判定结果并处理它。
    pub async fn step<D>(
        &mut self,
        button: &mut PressDisambiguator<D>,
    ) -> Dispatched<T::Error, S::Error>
    where
        D: AsyncPressDriver,
        D::Payload: AsRef<str>,
    {
        let event = button.next_event().await;
        self.dispatch(event).await
    }

    /// 持续处理按钮事件。导出进行期间不会读取新的按压事件。
    pub async fn run<D>(&mut self, button: &mut PressDisambiguator<D>) -> Infallible
    where
        D: AsyncPressDriver,
        D::Payload: AsRef<str>,
    {
        loop {
            match self.step(button).await {
                Dispatched::DialogOpened => trace!("run: config dialog opened"),
                Dispatched::Exported(Ok(saved)) => {
                    trace!("run: exported {}", saved.file_name.as_str())
                }
                Dispatched::Exported(Err(_)) => trace!("run: export failed, already notified"),
            }
        }
    }

    /// 通过文件选择器替换目标路径中的文件名。
    pub async fn browse<F: FilePicker>(&mut self, picker: &mut PathPicker<F>) -> bool {
        picker.browse(&mut self.config).await
    }

    pub fn confirm_dialog(&mut self) {
        self.dialog.confirm();
    }

    pub fn cancel_dialog(&mut self) {
        self.dialog.cancel();
    }

    pub fn is_dialog_open(&self) -> bool {
        self.dialog.is_open()
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// 配置字段是实时绑定的，通过这里的修改立即生效，取消配置界面也不会撤销。
    pub fn config_mut(&mut self) -> &mut ExportConfig {
        &mut self.config
    }

    pub fn exporter(&self) -> &ExportController<T, S, N> {
        &self.exporter
    }

    pub fn exporter_mut(&mut self) -> &mut ExportController<T, S, N> {
        &mut self.exporter
    }
}
