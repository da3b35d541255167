//! Timing classifier turning key press and silence durations into symbols

use crate::decoder::DecodeStateMachine;
use crate::events::EventSink;
use crate::hal::{millis_between, Duration, Instant};
use crate::types::{ConfigOutcome, DecodeError, Silence, Symbol, TimingConfig};

/// How a key release was classified
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyUp {
    Dot,
    Dash,
    /// Held past the dash ceiling, pending letter dropped
    Aborted { held_ms: u64 },
    /// Release without a recorded press
    Ignored,
}

/// Timestamps of the last key transitions
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyTiming {
    pub last_down: Option<Instant>,
    /// Cleared once a letter silence has been reported
    pub last_up: Option<Instant>,
    /// Cleared once a word silence has been reported
    pub last_observed_up: Option<Instant>,
}

impl KeyTiming {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Running estimate of the dot unit from accepted presses.
///
/// Dashes count as three units. Each sample moves the estimate a quarter of
/// the way towards it.
#[derive(Copy, Clone, Debug, Default)]
pub struct SpeedTracker {
    unit_ms: Option<u64>,
}

impl SpeedTracker {
    pub fn observe(&mut self, symbol: Symbol, held_ms: u64) {
        let sample = held_ms / symbol.duration_units() as u64;
        self.unit_ms = Some(match self.unit_ms {
            None => sample,
            Some(unit) => {
                let delta = (sample as i64 - unit as i64) / 4;
                (unit as i64 + delta).max(1) as u64
            }
        });
    }

    pub fn unit_ms(&self) -> Option<u64> {
        self.unit_ms
    }

    pub fn estimated_wpm(&self) -> Option<u32> {
        self.unit_ms.map(|unit| (1200 / unit.max(1)).max(1) as u32)
    }

    pub fn reset(&mut self) {
        self.unit_ms = None;
    }
}

/// Classifies key timing and drives a [`DecodeStateMachine`]
#[derive(Clone, Debug, Default)]
pub struct TimingClassifier {
    config: TimingConfig,
    keys: KeyTiming,
    speed: SpeedTracker,
    adaptive: bool,
}

impl TimingClassifier {
    pub fn new(config: TimingConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Key pressed at `now`.
    ///
    /// A silence longer than the symbol threshold is reported as a letter
    /// silence before the new press starts, even if no idle scan ran in
    /// between. It resolves the pending letter, if any.
    pub fn on_key_down<E: EventSink + ?Sized>(
        &mut self,
        now: Instant,
        machine: &mut DecodeStateMachine,
        events: &mut E,
    ) {
        if let Some(up) = self.keys.last_up {
            if self.silence_since(up, now) > self.config.max_symbol_silence {
                machine.record_silence(Silence::InterLetter, events);
            }
        }
        self.keys.last_up = None;
        self.keys.last_observed_up = None;
        self.keys.last_down = Some(now);
    }

    /// Key released at `now`; classifies the press
    pub fn on_key_up<E: EventSink + ?Sized>(
        &mut self,
        now: Instant,
        machine: &mut DecodeStateMachine,
        events: &mut E,
    ) -> KeyUp {
        let Some(down) = self.keys.last_down.take() else {
            return KeyUp::Ignored;
        };
        let held_ms = millis_between(down, now);
        let held = Duration::from_millis(held_ms);

        let outcome = if held <= self.config.max_dot {
            machine.record_dot(events);
            self.observe(Symbol::Dot, held_ms);
            KeyUp::Dot
        } else if held < self.config.max_dash {
            machine.record_dash(events);
            self.observe(Symbol::Dash, held_ms);
            KeyUp::Dash
        } else {
            #[cfg(feature = "defmt")]
            defmt::warn!("Key held {} ms, aborting letter", held_ms);

            machine.reset();
            self.keys.clear();
            events.error(DecodeError::MalformedHold { held_ms });
            KeyUp::Aborted { held_ms }
        };

        self.keys.last_up = Some(now);
        self.keys.last_observed_up = Some(now);
        outcome
    }

    /// Periodic check for silences that arrive without a key event.
    ///
    /// Each silence is reported once: the timestamp it was measured from is
    /// cleared when it fires.
    pub fn idle_scan<E: EventSink + ?Sized>(
        &mut self,
        now: Instant,
        machine: &mut DecodeStateMachine,
        events: &mut E,
    ) {
        if let Some(up) = self.keys.last_up {
            if self.silence_since(up, now) > self.config.max_symbol_silence && !machine.is_idle() {
                machine.record_silence(Silence::InterLetter, events);
                self.keys.last_up = None;
            }
        }

        if let Some(up) = self.keys.last_observed_up {
            if self.silence_since(up, now) > self.config.max_letter_silence {
                machine.record_silence(Silence::InterWord, events);
                self.keys.last_observed_up = None;
            }
        }
    }

    fn silence_since(&self, up: Instant, now: Instant) -> Duration {
        Duration::from_millis(millis_between(up, now))
    }

    fn observe(&mut self, symbol: Symbol, held_ms: u64) {
        self.speed.observe(symbol, held_ms);
        if !self.adaptive {
            return;
        }
        if let Some(unit) = self.speed.unit_ms() {
            let _outcome = self.config.apply_unit(unit);

            #[cfg(feature = "defmt")]
            if _outcome.is_clamped() {
                defmt::debug!("Adaptive unit {} ms clamped", unit);
            }
        }
    }

    /// Forget all key timestamps
    pub fn reset(&mut self) {
        self.keys.clear();
    }

    pub fn key_timing(&self) -> &KeyTiming {
        &self.keys
    }

    pub fn config(&self) -> &TimingConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: TimingConfig) {
        self.config = config;
    }

    pub fn set_dot_dash_thresholds(&mut self, dot_ms: u64, dash_ms: u64) -> ConfigOutcome {
        let outcome = self.config.set_dot_dash(dot_ms, dash_ms);

        #[cfg(feature = "defmt")]
        if outcome.is_clamped() {
            defmt::debug!(
                "Dot/dash thresholds clamped to {}/{} ms",
                self.config.max_dot.as_millis(),
                self.config.max_dash.as_millis()
            );
        }

        outcome
    }

    pub fn set_silence_thresholds(&mut self, symbol_ms: u64, letter_ms: u64) -> ConfigOutcome {
        let outcome = self.config.set_silences(symbol_ms, letter_ms);

        #[cfg(feature = "defmt")]
        if outcome.is_clamped() {
            defmt::debug!(
                "Silence thresholds clamped to {}/{} ms",
                self.config.max_symbol_silence.as_millis(),
                self.config.max_letter_silence.as_millis()
            );
        }

        outcome
    }

    /// Retune thresholds from the observed speed after every symbol
    pub fn set_adaptive(&mut self, adaptive: bool) {
        self.adaptive = adaptive;
    }

    pub fn is_adaptive(&self) -> bool {
        self.adaptive
    }

    pub fn speed(&self) -> &SpeedTracker {
        &self.speed
    }
}
