//! Async tests with tokio paused time: periodic idle scan and key polling

use std::cell::RefCell;
use std::time::Duration;

use morse_core::hal::mock::MockKey;
use morse_core::test_utils::key_simulator::{KeyPattern, KeyPatternBuilder, Timings};
use morse_core::test_utils::output_capture::Recorder;
use morse_core::{Clock, KeyMonitor, MorseDecoder, TimingConfig, IDLE_SCAN_INTERVAL_MS};

/// Clock driven by tokio's (paused) timer
struct TokioClock {
    start: tokio::time::Instant,
}

impl TokioClock {
    fn new() -> Self {
        Self {
            start: tokio::time::Instant::now(),
        }
    }
}

impl Clock for TokioClock {
    fn now(&self) -> morse_core::Instant {
        morse_core::Instant::from_millis(self.start.elapsed().as_millis() as u64)
    }
}

async fn idle_scanner<C: Clock>(decoder: &RefCell<MorseDecoder<'_, C>>) {
    let mut interval = tokio::time::interval(Duration::from_millis(IDLE_SCAN_INTERVAL_MS));
    loop {
        interval.tick().await;
        decoder.borrow_mut().idle_scan();
    }
}

/// Press and release through `press` at the pattern's times
async fn operate(pattern: &KeyPattern, mut press: impl FnMut(bool), settle: Duration) {
    let start = tokio::time::Instant::now();
    for event in &pattern.events {
        tokio::time::sleep_until(start + Duration::from_millis(event.at_ms)).await;
        press(event.pressed);
    }
    tokio::time::sleep(settle).await;
}

#[tokio::test(start_paused = true)]
async fn test_interval_scan_decodes_sos() {
    println!("🕒 Testing periodic idle scan...");

    let clock = TokioClock::new();
    let recorder = Recorder::new();
    let mut on_code = recorder.code_handler();
    let decoder = RefCell::new(MorseDecoder::new(&clock));
    decoder.borrow_mut().on_code_selected(&mut on_code);

    let timings = Timings::for_config(&TimingConfig::default());
    let pattern = KeyPatternBuilder::new(timings).text("SOS").build();

    let operator = operate(
        &pattern,
        |pressed| {
            let mut decoder = decoder.borrow_mut();
            if pressed {
                decoder.key_down();
            } else {
                decoder.key_up();
            }
        },
        Duration::from_millis(timings.word_gap_ms),
    );

    tokio::select! {
        _ = idle_scanner(&decoder) => {}
        _ = operator => {}
    }

    assert_eq!(recorder.text(), "SOS ");
    println!("  ✅ SOS decoded by the scan loop");
}

#[tokio::test(start_paused = true)]
async fn test_key_monitor_polling() {
    println!("🕒 Testing key monitor polling...");

    let clock = TokioClock::new();
    let key = MockKey::new();
    let recorder = Recorder::new();
    let mut on_code = recorder.code_handler();
    let decoder = RefCell::new(MorseDecoder::with_config(&clock, TimingConfig::from_wpm(15).unwrap()));
    decoder.borrow_mut().on_code_selected(&mut on_code);

    let poller = async {
        let mut monitor = KeyMonitor::new(&key);
        let mut interval = tokio::time::interval(Duration::from_millis(5));
        loop {
            interval.tick().await;
            monitor.poll(&mut *decoder.borrow_mut()).unwrap();
        }
    };

    let timings = Timings::for_config(decoder.borrow().config());
    let pattern = KeyPatternBuilder::new(timings).text("CQ").build();
    let operator = operate(&pattern, |pressed| key.set_pressed(pressed), Duration::from_millis(timings.word_gap_ms));

    tokio::select! {
        _ = idle_scanner(&decoder) => {}
        _ = poller => {}
        _ = operator => {}
    }

    assert_eq!(recorder.text(), "CQ ");
    println!("  ✅ Polled key decoded as CQ");
}
