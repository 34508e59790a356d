use crate::{AsyncPressDriver, PressInput};
use embedded_hal::digital::InputPin;
use embedded_hal_async::digital::Wait;

/// 定义GPIO按钮的有效电平。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveLevel {
    /// 低电平有效（例如，使用上拉电阻，按下时引脚接地）。
    Low,
    /// 高电平有效（例如，使用下拉电阻，按下时引脚接VCC）。
    High,
}

/// 由GPIO输入引脚驱动的按压来源。
///
/// 物理按键没有“拖出”这一动作，因此只会产生 `Down` 和 `Up`。
/// 释放时调用 `payload` 闭包获取要导出的数据。
pub struct GpioPressDriver<P: InputPin, F> {
    pin: P,
    active_level: ActiveLevel,
    payload: F,
    held: bool,
}

impl<P: InputPin, F> GpioPressDriver<P, F> {
    /// 创建一个新的GPIO按压来源。
    ///
    /// # 参数
    /// * `pin`: 一个实现了 `InputPin` 和 `Wait` 的GPIO引脚。
    /// * `active_level`: 按钮按下时的有效电平。
    /// * `payload`: 每次释放时调用，返回随 `Up` 一起交付的数据。
    pub fn new(pin: P, active_level: ActiveLevel, payload: F) -> Self {
        Self {
            pin,
            active_level,
            payload,
            held: false,
        }
    }
}

impl<P, F, D> AsyncPressDriver for GpioPressDriver<P, F>
where
    P: InputPin + Wait,
    F: FnMut() -> D,
{
    type Payload = D;

    async fn next_input(&mut self) -> PressInput<D> {
        // 只有在等待完成后才翻转 held，被取消的等待不会丢失状态。
        if self.held {
            match self.active_level {
                ActiveLevel::Low => self.pin.wait_for_high().await.unwrap_or_default(),
                ActiveLevel::High => self.pin.wait_for_low().await.unwrap_or_default(),
            }
            self.held = false;
            PressInput::Up((self.payload)())
        } else {
            match self.active_level {
                ActiveLevel::Low => self.pin.wait_for_low().await.unwrap_or_default(),
                ActiveLevel::High => self.pin.wait_for_high().await.unwrap_or_default(),
            }
            self.held = true;
            PressInput::Down
        }
    }
}
