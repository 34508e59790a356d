use embassy_save_ts::{
    channel::ChannelPressDriver, PressConfig, PressDisambiguator, PressEvent, PressInput,
};
use embassy_sync::{
    blocking_mutex::raw::NoopRawMutex,
    channel::{Channel, Sender},
};
use embassy_time::{with_timeout, Duration, Instant, Timer};

type Inputs = Channel<NoopRawMutex, PressInput<String>, 8>;
type Button<'a> = PressDisambiguator<ChannelPressDriver<'a, NoopRawMutex, String, 8>>;

// 测试中使用较短的长按阈值
fn test_config() -> PressConfig {
    PressConfig {
        long_press_time: Duration::from_millis(300),
        ..PressConfig::default()
    }
}

fn button(inputs: &Inputs) -> Button<'_> {
    PressDisambiguator::new(ChannelPressDriver::new(inputs.receiver()), test_config())
}

async fn expect_event(button: &mut Button<'_>) -> PressEvent<String> {
    with_timeout(Duration::from_secs(2), button.next_event())
        .await
        .expect("Test timed out waiting for an event")
}

async fn expect_silence(button: &mut Button<'_>, window: Duration) {
    assert!(
        with_timeout(window, button.next_event()).await.is_err(),
        "no event expected"
    );
}

async fn tap(sender: &Sender<'_, NoopRawMutex, PressInput<String>, 8>, held: u64, text: &str) {
    sender.send(PressInput::Down).await;
    Timer::after(Duration::from_millis(held)).await;
    sender.send(PressInput::Up(text.to_string())).await;
}

#[test]
fn default_thresholds() {
    let config = PressConfig::default();
    assert_eq!(config.long_press_time, Duration::from_millis(3000));
    assert_eq!(config.write_settle_delay, Duration::from_millis(100));
}

#[tokio::test]
async fn short_press_emits_short_activate_with_payload() {
    let inputs = Inputs::new();
    let mut button = button(&inputs);
    let sender = inputs.sender();

    let validator = async {
        assert_eq!(
            expect_event(&mut button).await,
            PressEvent::ShortActivate("T1".to_string())
        );
        // 之后不应再有长按
        expect_silence(&mut button, Duration::from_millis(500)).await;
    };

    tokio::join!(tap(&sender, 50, "T1"), validator);
}

#[tokio::test]
async fn long_press_fires_without_release() {
    let inputs = Inputs::new();
    let mut button = button(&inputs);
    inputs.sender().send(PressInput::Down).await;

    let start = Instant::now();
    assert_eq!(expect_event(&mut button).await, PressEvent::LongActivate);
    assert!(start.elapsed() >= Duration::from_millis(300));
    assert!(button.long_press_fired());
    assert!(button.is_pressed());
}

#[tokio::test]
async fn release_after_long_press_is_silent() {
    let inputs = Inputs::new();
    let mut button = button(&inputs);
    let sender = inputs.sender();

    let validator = async {
        assert_eq!(expect_event(&mut button).await, PressEvent::LongActivate);
        expect_silence(&mut button, Duration::from_millis(400)).await;
        assert!(!button.is_pressed());
    };

    tokio::join!(tap(&sender, 400, "T1"), validator);
}

#[tokio::test]
async fn leave_does_not_cancel_long_press() {
    let inputs = Inputs::new();
    let mut button = button(&inputs);
    let sender = inputs.sender();

    let generator = async {
        sender.send(PressInput::Down).await;
        Timer::after(Duration::from_millis(50)).await;
        sender.send(PressInput::Leave).await;
    };
    let validator = async {
        assert_eq!(expect_event(&mut button).await, PressEvent::LongActivate);
        assert!(!button.is_pressed());
    };

    tokio::join!(generator, validator);
}

#[tokio::test]
async fn leave_then_release_is_still_short() {
    let inputs = Inputs::new();
    let mut button = button(&inputs);
    let sender = inputs.sender();

    let generator = async {
        sender.send(PressInput::Down).await;
        Timer::after(Duration::from_millis(50)).await;
        sender.send(PressInput::Leave).await;
        Timer::after(Duration::from_millis(50)).await;
        sender.send(PressInput::Up("late".to_string())).await;
    };
    let validator = async {
        assert_eq!(
            expect_event(&mut button).await,
            PressEvent::ShortActivate("late".to_string())
        );
        expect_silence(&mut button, Duration::from_millis(400)).await;
    };

    tokio::join!(generator, validator);
}

#[tokio::test]
async fn repeated_press_down_restarts_the_timer() {
    let inputs = Inputs::new();
    let mut button = button(&inputs);
    let sender = inputs.sender();

    let generator = async {
        sender.send(PressInput::Down).await;
        Timer::after(Duration::from_millis(200)).await;
        sender.send(PressInput::Down).await;
        Timer::after(Duration::from_millis(200)).await;
        sender.send(PressInput::Up("second".to_string())).await;
    };
    let validator = async {
        // 第一个会话的定时器被替换，400ms 处释放仍是短按
        assert_eq!(
            expect_event(&mut button).await,
            PressEvent::ShortActivate("second".to_string())
        );
        expect_silence(&mut button, Duration::from_millis(400)).await;
    };

    tokio::join!(generator, validator);
}

// --- 同步接口，使用显式时间点 ---

#[test]
fn timer_fires_exactly_at_deadline() {
    let inputs = Inputs::new();
    let mut button = button(&inputs);

    button.on_press_down(Instant::from_millis(1_000));
    assert_eq!(button.deadline(), Some(Instant::from_millis(1_300)));
    assert_eq!(button.on_timer(Instant::from_millis(1_299)), None);
    assert_eq!(button.on_timer(Instant::from_millis(1_300)), Some(PressEvent::LongActivate));
    assert_eq!(button.deadline(), None);
    // 只触发一次
    assert_eq!(button.on_timer(Instant::from_millis(5_000)), None);
    assert_eq!(button.on_press_up("x".to_string()), None);
}

#[test]
fn release_cancels_pending_timer() {
    let inputs = Inputs::new();
    let mut button = button(&inputs);

    button.on_press_down(Instant::from_millis(0));
    assert_eq!(
        button.on_press_up("T1".to_string()),
        Some(PressEvent::ShortActivate("T1".to_string()))
    );
    assert_eq!(button.deadline(), None);
    assert_eq!(button.on_timer(Instant::from_millis(10_000)), None);
}

#[test]
fn leave_keeps_deadline() {
    let inputs = Inputs::new();
    let mut button = button(&inputs);

    button.on_press_down(Instant::from_millis(0));
    button.on_press_leave();
    assert!(!button.is_pressed());
    assert_eq!(button.deadline(), Some(Instant::from_millis(300)));
}

#[test]
fn release_without_press_is_safe() {
    let inputs = Inputs::new();
    let mut button = button(&inputs);

    assert_eq!(
        button.on_press_up("T1".to_string()),
        Some(PressEvent::ShortActivate("T1".to_string()))
    );

    // 长按之后的多余释放不会导出
    button.on_press_down(Instant::from_millis(0));
    button.on_timer(Instant::from_millis(300));
    assert_eq!(button.on_press_up("a".to_string()), None);
    assert_eq!(button.on_press_up("b".to_string()), None);

    // 新的按下清除长按标记
    button.on_press_down(Instant::from_millis(1_000));
    assert!(!button.long_press_fired());
}

#[test]
fn reset_drops_session() {
    let inputs = Inputs::new();
    let mut button = button(&inputs);

    button.on_press_down(Instant::from_millis(0));
    button.reset();
    assert_eq!(button.deadline(), None);
    assert!(!button.is_pressed());
    assert_eq!(button.on_timer(Instant::from_millis(1_000)), None);
}
