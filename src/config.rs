use alloc::string::String;
use embassy_time::Duration;

/// 默认的目标路径。
pub const DEFAULT_TARGET_PATH: &str = "Documents/timestamps.txt";

/// 默认的 antidelay 输入（秒）。
pub const DEFAULT_ANTIDELAY: &str = "15";

/// 按键判定与导出流程中与时间相关的配置参数。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PressConfig {
    /// 触发长按事件所需的持续时间。
    ///
    /// 按键按下后若定时器在释放之前到期，则产生 `LongActivate`，
    /// 之后的释放不会再产生 `ShortActivate`。
    pub long_press_time: Duration,

    /// 写文件之前的固定等待时间。
    ///
    /// 某些宿主平台上存储权限的授予相对于触发它的 UI 事件是异步完成的，
    /// 写入前等待这段时间以避开该竞争。
    pub write_settle_delay: Duration,
}

impl Default for PressConfig {
    /// - 长按阈值: 3000ms
    /// - 写入前等待: 100ms
    fn default() -> Self {
        Self {
            long_press_time: Duration::from_millis(3000),
            write_settle_delay: Duration::from_millis(100),
        }
    }
}

/// 导出目标的配置，在配置界面中双向绑定。
///
/// 修改时不做任何校验，校验推迟到导出时进行。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    /// 目录 + 文件名，例如 `Documents/timestamps.txt`。
    pub target_path: String,
    /// 用户输入的原始 antidelay 文本（秒）。
    pub antidelay_seconds: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            target_path: String::from(DEFAULT_TARGET_PATH),
            antidelay_seconds: String::from(DEFAULT_ANTIDELAY),
        }
    }
}
