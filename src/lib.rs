#![no_std]
#![allow(async_fn_in_trait)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod fmt;

pub mod channel;
pub mod config;
pub mod dialog;
pub mod export;
#[cfg(feature = "std")]
pub mod fs;
pub mod gpio;
pub mod manager;
pub mod picker;

pub use config::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Instant, Timer};

/// 一个trait，抽象了所有可以提供异步按压输入的来源。
///
/// 实现必须是取消安全的：当长按定时器先到期时，`next_input` 返回的 future 会被丢弃。
pub trait AsyncPressDriver {
    /// 释放时携带的数据，例如当时的信号文本。
    type Payload;

    async fn next_input(&mut self) -> PressInput<Self::Payload>;
}

/// 来自控件的原始输入。
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PressInput<P> {
    /// 按下。
    Down,
    /// 释放（mouse up / touch end），携带释放时的数据。
    Up(P),
    /// 按住时拖出控件区域。
    Leave,
}

/// 判定结果，每次按压最多产生其中一个。
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PressEvent<P> {
    /// 在长按阈值之前释放。
    ShortActivate(P),
    /// 按住达到长按阈值，由定时器本身产生，不依赖释放。
    LongActivate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PressSession {
    Released {
        long_press_fired: bool,
    },
    Armed {
        deadline: Instant,
    },
    LongPressed,
}

impl PressSession {
    fn long_press_fired(&self) -> bool {
        match *self {
            PressSession::Released { long_press_fired } => long_press_fired,
            PressSession::Armed { .. } => false,
            PressSession::LongPressed => true,
        }
    }
}

/// 区分短按和长按的状态机。
///
/// 同一时间最多只有一个按压会话；会话期间再次按下会重置会话并重新计时。
/// 拖出控件区域（`Leave`）只清除按下外观，不会取消长按定时器。
pub struct PressDisambiguator<T: AsyncPressDriver> {
    driver: T,
    config: PressConfig,
    session: PressSession,
    pressed: bool,
}

impl<T: AsyncPressDriver> PressDisambiguator<T> {
    pub fn new(driver: T, config: PressConfig) -> Self {
        Self {
            driver,
            config,
            session: PressSession::Released {
                long_press_fired: false,
            },
            pressed: false,
        }
    }

    /// 等待下一个判定结果。
    ///
    /// 输入和长按定时器在同一个循环中竞争，定时器到期产生的 `LongActivate`
    /// 与用户输入按到达顺序交付。
    pub async fn next_event(&mut self) -> PressEvent<T::Payload> {
        loop {
            let input = match self.session {
                PressSession::Armed { deadline } => {
                    match select(self.driver.next_input(), Timer::at(deadline)).await {
                        Either::First(input) => input,
                        Either::Second(_) => {
                            if let Some(event) = self.on_timer(Instant::now()) {
                                return event;
                            }
                            continue;
                        }
                    }
                }
                _ => self.driver.next_input().await,
            };

            let event = match input {
                PressInput::Down => {
                    self.on_press_down(Instant::now());
                    None
                }
                PressInput::Up(payload) => self.on_press_up(payload),
                PressInput::Leave => {
                    self.on_press_leave();
                    None
                }
            };
            if let Some(event) = event {
                return event;
            }
        }
    }

    /// 开始一个新的按压会话，并在 `now + long_press_time` 处设置长按定时器。
    pub fn on_press_down(&mut self, now: Instant) {
        if matches!(self.session, PressSession::Armed { .. }) {
            debug!("press down during a live session, restarting timer");
        }
        self.pressed = true;
        self.session = PressSession::Armed {
            deadline: now + self.config.long_press_time,
        };
        trace!("press down");
    }

    /// 结束按压。可以无条件调用：没有待触发的定时器时视为无需取消。
    ///
    /// 长按尚未触发时返回 `ShortActivate(payload)`。
    pub fn on_press_up(&mut self, payload: T::Payload) -> Option<PressEvent<T::Payload>> {
        self.pressed = false;
        let long_press_fired = self.session.long_press_fired();
        self.session = PressSession::Released { long_press_fired };

        if long_press_fired {
            trace!("press up after long press, ignored");
            None
        } else {
            debug!("short press detected");
            Some(PressEvent::ShortActivate(payload))
        }
    }

    /// 只清除按下外观，待触发的长按定时器保持不变。
    pub fn on_press_leave(&mut self) {
        self.pressed = false;
        trace!("press leave");
    }

    /// 若长按定时器已到期则触发长按。
    pub fn on_timer(&mut self, now: Instant) -> Option<PressEvent<T::Payload>> {
        match self.session {
            PressSession::Armed { deadline } if now >= deadline => {
                self.session = PressSession::LongPressed;
                debug!("long press detected");
                Some(PressEvent::LongActivate)
            }
            _ => None,
        }
    }

    /// 长按定时器的到期时间，没有待触发的定时器时为 `None`。
    pub fn deadline(&self) -> Option<Instant> {
        match self.session {
            PressSession::Armed { deadline } => Some(deadline),
            _ => None,
        }
    }

    /// 当前会话是否已经触发过长按。
    pub fn long_press_fired(&self) -> bool {
        self.session.long_press_fired()
    }

    /// 按下外观，只用于界面反馈。
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn config(&self) -> &PressConfig {
        &self.config
    }

    pub fn set_config(&mut self, new_config: PressConfig) {
        self.config = new_config;
    }

    /// 获取底层驱动的不可变引用
    pub fn driver(&self) -> &T {
        &self.driver
    }

    /// 获取底层驱动的可变引用
    pub fn driver_mut(&mut self) -> &mut T {
        &mut self.driver
    }

    /// 丢弃当前会话（包括待触发的定时器），回到初始状态。
    pub fn reset(&mut self) {
        self.session = PressSession::Released {
            long_press_fired: false,
        };
        self.pressed = false;
    }
}
