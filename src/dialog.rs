/// 配置界面的可见状态。
///
/// 只有两种转换：长按打开，确认或取消关闭。两者除了关闭之外什么都不做，
/// 打开期间对配置字段的修改在取消后依然保留。
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigDialog {
    open: bool,
}

impl ConfigDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.open = true;
        debug!("config dialog opened");
    }

    pub fn confirm(&mut self) {
        self.open = false;
        debug!("config dialog confirmed");
    }

    pub fn cancel(&mut self) {
        self.open = false;
        debug!("config dialog cancelled");
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}
