//! Decoder session: classifier, state machine, observers and clock in one place

use crate::decoder::DecodeStateMachine;
use crate::events::{CodeHandler, Dispatcher, ErrorHandler, SymbolHandler};
use crate::hal::{Clock, Duration, Instant, KeyInput};
use crate::timing::{KeyUp, TimingClassifier};
use crate::types::{ConfigOutcome, EmptyWordPolicy, Silence, TimingConfig};

/// Period of the idle scan that detects silences
pub const IDLE_SCAN_INTERVAL_MS: u64 = 100;

/// One independent decoding session.
///
/// Nothing here is global: each instance owns its own decode state, key
/// timestamps, thresholds and observers.
pub struct MorseDecoder<'h, C: Clock> {
    clock: C,
    machine: DecodeStateMachine,
    classifier: TimingClassifier,
    dispatcher: Dispatcher<'h>,
}

impl<'h, C: Clock> MorseDecoder<'h, C> {
    pub fn new(clock: C) -> Self {
        Self::with_config(clock, TimingConfig::default())
    }

    pub fn with_config(clock: C, config: TimingConfig) -> Self {
        Self {
            clock,
            machine: DecodeStateMachine::new(),
            classifier: TimingClassifier::new(config),
            dispatcher: Dispatcher::new(),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Key pressed now
    pub fn key_down(&mut self) {
        let now = self.clock.now();
        self.key_down_at(now);
    }

    /// Key released now
    pub fn key_up(&mut self) -> KeyUp {
        let now = self.clock.now();
        self.key_up_at(now)
    }

    /// Run one idle scan at the current time
    pub fn idle_scan(&mut self) {
        let now = self.clock.now();
        self.idle_scan_at(now);
    }

    pub fn key_down_at(&mut self, now: Instant) {
        self.classifier
            .on_key_down(now, &mut self.machine, &mut self.dispatcher);
    }

    pub fn key_up_at(&mut self, now: Instant) -> KeyUp {
        self.classifier
            .on_key_up(now, &mut self.machine, &mut self.dispatcher)
    }

    pub fn idle_scan_at(&mut self, now: Instant) {
        self.classifier
            .idle_scan(now, &mut self.machine, &mut self.dispatcher);
    }

    /// Feed a dot directly, bypassing the timing classifier
    pub fn record_dot(&mut self) {
        self.machine.record_dot(&mut self.dispatcher);
    }

    /// Feed a dash directly, bypassing the timing classifier
    pub fn record_dash(&mut self) {
        self.machine.record_dash(&mut self.dispatcher);
    }

    /// Feed a silence directly, bypassing the timing classifier
    pub fn record_silence(&mut self, kind: Silence) -> Option<char> {
        self.machine.record_silence(kind, &mut self.dispatcher)
    }

    /// Drop the pending letter and the key timestamps
    pub fn reset_decoding(&mut self) {
        self.machine.reset();
        self.classifier.reset();
    }

    /// Forget key timestamps, keeping the pending letter
    pub fn reset_timing(&mut self) {
        self.classifier.reset();
    }

    pub fn peek_code(&self) -> char {
        self.machine.peek_code()
    }

    pub fn peek_sequence(&self) -> &str {
        self.machine.peek_sequence()
    }

    pub fn is_idle(&self) -> bool {
        self.machine.is_idle()
    }

    pub fn set_dot_dash_thresholds(&mut self, dot_ms: u64, dash_ms: u64) -> ConfigOutcome {
        self.classifier.set_dot_dash_thresholds(dot_ms, dash_ms)
    }

    pub fn set_silence_thresholds(&mut self, symbol_ms: u64, letter_ms: u64) -> ConfigOutcome {
        self.classifier.set_silence_thresholds(symbol_ms, letter_ms)
    }

    pub fn config(&self) -> &TimingConfig {
        self.classifier.config()
    }

    pub fn set_config(&mut self, config: TimingConfig) {
        self.classifier.set_config(config);
    }

    pub fn max_dot(&self) -> Duration {
        self.config().max_dot
    }

    pub fn max_dash(&self) -> Duration {
        self.config().max_dash
    }

    pub fn max_symbol_silence(&self) -> Duration {
        self.config().max_symbol_silence
    }

    pub fn max_letter_silence(&self) -> Duration {
        self.config().max_letter_silence
    }

    pub fn set_adaptive(&mut self, adaptive: bool) {
        self.classifier.set_adaptive(adaptive);
    }

    pub fn estimated_wpm(&self) -> Option<u32> {
        self.classifier.speed().estimated_wpm()
    }

    pub fn set_empty_word_policy(&mut self, policy: EmptyWordPolicy) {
        self.machine.set_empty_word_policy(policy);
    }

    pub fn on_symbol(&mut self, handler: &'h mut dyn SymbolHandler) {
        self.dispatcher.on_symbol(handler);
    }

    pub fn on_code_selected(&mut self, handler: &'h mut dyn CodeHandler) {
        self.dispatcher.on_code_selected(handler);
    }

    pub fn on_error(&mut self, handler: &'h mut dyn ErrorHandler) {
        self.dispatcher.on_error(handler);
    }

    pub fn state_machine(&self) -> &DecodeStateMachine {
        &self.machine
    }

    pub fn classifier(&self) -> &TimingClassifier {
        &self.classifier
    }
}

/// Key level change seen by a [`KeyMonitor`]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyEdge {
    Down,
    Up(KeyUp),
}

/// Turns a sampled key level into key down / key up calls
pub struct KeyMonitor<K> {
    key: K,
    pressed: bool,
}

impl<K: KeyInput> KeyMonitor<K> {
    pub fn new(key: K) -> Self {
        Self {
            key,
            pressed: false,
        }
    }

    /// Sample the key once and forward any edge to `decoder`
    pub fn poll<C: Clock>(
        &mut self,
        decoder: &mut MorseDecoder<'_, C>,
    ) -> Result<Option<KeyEdge>, K::Error> {
        let pressed = self.key.is_pressed()?;
        if pressed == self.pressed {
            return Ok(None);
        }
        self.pressed = pressed;

        if pressed {
            decoder.key_down();
            Ok(Some(KeyEdge::Down))
        } else {
            Ok(Some(KeyEdge::Up(decoder.key_up())))
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn into_inner(self) -> K {
        self.key
    }
}

/// Async task running the idle scan every [`IDLE_SCAN_INTERVAL_MS`]
#[cfg(feature = "embassy-time")]
pub async fn idle_scan_task<C: Clock>(decoder: &core::cell::RefCell<MorseDecoder<'_, C>>) {
    use embassy_time::Timer;

    loop {
        // Key monitoring shares the executor; a borrow is never held across an await
        if let Ok(mut decoder) = decoder.try_borrow_mut() {
            decoder.idle_scan();
        }
        Timer::after(Duration::from_millis(IDLE_SCAN_INTERVAL_MS)).await;
    }
}

/// Async task sampling a key every `poll_interval`
#[cfg(feature = "embassy-time")]
pub async fn key_monitor_task<K: KeyInput, C: Clock>(
    mut monitor: KeyMonitor<K>,
    decoder: &core::cell::RefCell<MorseDecoder<'_, C>>,
    poll_interval: Duration,
) {
    use embassy_time::Timer;

    loop {
        if let Ok(mut decoder) = decoder.try_borrow_mut() {
            match monitor.poll(&mut *decoder) {
                Ok(Some(_edge)) => {
                    #[cfg(feature = "defmt")]
                    defmt::trace!("Key edge: {}", _edge);
                }
                Ok(None) => {}
                Err(_) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Key read failed");
                }
            }
        }
        Timer::after(poll_interval).await;
    }
}
