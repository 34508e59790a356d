use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Receiver;

use crate::{AsyncPressDriver, PressInput};

/// 从 `embassy_sync` 通道读取按压输入的来源。
///
/// 宿主界面把 mouse down / up / leave（或 touch start / end）事件发送到通道，
/// `PressDisambiguator` 在同一个循环里按顺序消费它们。
pub struct ChannelPressDriver<'a, M: RawMutex, P, const N: usize> {
    receiver: Receiver<'a, M, PressInput<P>, N>,
}

impl<'a, M: RawMutex, P, const N: usize> ChannelPressDriver<'a, M, P, N> {
    pub fn new(receiver: Receiver<'a, M, PressInput<P>, N>) -> Self {
        Self { receiver }
    }
}

impl<'a, M: RawMutex, P, const N: usize> AsyncPressDriver for ChannelPressDriver<'a, M, P, N> {
    type Payload = P;

    async fn next_input(&mut self) -> PressInput<P> {
        self.receiver.receive().await
    }
}
