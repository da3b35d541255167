//! Test utilities for decoder functionality

pub mod key_simulator {
    //! Key press simulation against a manual clock

    use crate::encoder::encode_char;
    use crate::hal::mock::ManualClock;
    use crate::hal::Clock;
    use crate::session::{MorseDecoder, IDLE_SCAN_INTERVAL_MS};
    use crate::types::{Symbol, TimingConfig};

    /// Key level change at a time offset from the start of a pattern
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct KeyEvent {
        pub at_ms: u64,
        pub pressed: bool,
    }

    /// Durations that sit comfortably inside a configuration's thresholds
    #[derive(Debug, Clone, Copy)]
    pub struct Timings {
        pub dot_ms: u64,
        pub dash_ms: u64,
        pub symbol_gap_ms: u64,
        pub letter_gap_ms: u64,
        pub word_gap_ms: u64,
    }

    impl Timings {
        pub fn for_config(config: &TimingConfig) -> Self {
            let dot = config.max_dot.as_millis();
            let dash = config.max_dash.as_millis();
            let symbol = config.max_symbol_silence.as_millis();
            let letter = config.max_letter_silence.as_millis();
            Self {
                dot_ms: dot / 2,
                dash_ms: (dot + dash) / 2,
                symbol_gap_ms: symbol / 2,
                letter_gap_ms: (symbol + letter) / 2,
                // Leaves more than one idle scan period past the word threshold
                word_gap_ms: letter + 2 * IDLE_SCAN_INTERVAL_MS + IDLE_SCAN_INTERVAL_MS / 2,
            }
        }

        pub fn symbol_ms(&self, symbol: Symbol) -> u64 {
            match symbol {
                Symbol::Dot => self.dot_ms,
                Symbol::Dash => self.dash_ms,
            }
        }
    }

    /// A timed sequence of key presses
    #[derive(Debug, Clone, Default)]
    pub struct KeyPattern {
        pub events: Vec<KeyEvent>,
        pub end_ms: u64,
    }

    /// Builds a [`KeyPattern`] symbol by symbol
    #[derive(Debug, Clone)]
    pub struct KeyPatternBuilder {
        timings: Timings,
        pattern: KeyPattern,
        gap_ms: Option<u64>,
    }

    impl KeyPatternBuilder {
        pub fn new(timings: Timings) -> Self {
            Self {
                timings,
                pattern: KeyPattern::default(),
                gap_ms: None,
            }
        }

        /// Hold the key for `ms`, after whatever gap is pending
        pub fn hold(mut self, ms: u64) -> Self {
            let start = self.pattern.end_ms + self.gap_ms.take().unwrap_or(0);
            self.pattern.events.push(KeyEvent { at_ms: start, pressed: true });
            self.pattern.events.push(KeyEvent { at_ms: start + ms, pressed: false });
            self.pattern.end_ms = start + ms;
            self.gap_ms = Some(self.timings.symbol_gap_ms);
            self
        }

        pub fn symbol(self, symbol: Symbol) -> Self {
            let ms = self.timings.symbol_ms(symbol);
            self.hold(ms)
        }

        pub fn dot(self) -> Self {
            self.symbol(Symbol::Dot)
        }

        pub fn dash(self) -> Self {
            self.symbol(Symbol::Dash)
        }

        /// Silence before the next press, replacing the pending gap
        pub fn pause(mut self, ms: u64) -> Self {
            self.gap_ms = Some(ms);
            self
        }

        pub fn end_letter(mut self) -> Self {
            if self.gap_ms.is_some() {
                self.gap_ms = Some(self.timings.letter_gap_ms);
            }
            self
        }

        pub fn end_word(mut self) -> Self {
            if self.gap_ms.is_some() {
                self.gap_ms = Some(self.timings.word_gap_ms);
            }
            self
        }

        /// Dots and dashes; `' '` ends a letter and `'/'` ends a word
        pub fn code(mut self, code: &str) -> Self {
            for c in code.chars() {
                self = match c {
                    ' ' => self.end_letter(),
                    '/' => self.end_word(),
                    other => match Symbol::from_char(other) {
                        Some(symbol) => self.symbol(symbol),
                        None => self,
                    },
                };
            }
            self
        }

        /// Key a whole text; characters without a code are skipped
        pub fn text(mut self, text: &str) -> Self {
            for ch in text.chars() {
                if ch == ' ' {
                    self = self.end_word();
                    continue;
                }
                let code = encode_char(ch);
                if code.as_str() == "?" {
                    continue;
                }
                self = self.code(&code).end_letter();
            }
            self
        }

        pub fn build(self) -> KeyPattern {
            self.pattern
        }
    }

    /// Replay `pattern` from the clock's current time.
    ///
    /// The idle scan runs every [`IDLE_SCAN_INTERVAL_MS`] like it would on the
    /// device, and keeps running for `settle_ms` after the last release.
    pub fn play<C: Clock>(
        pattern: &KeyPattern,
        clock: &ManualClock,
        decoder: &mut MorseDecoder<'_, C>,
        settle_ms: u64,
    ) {
        let start = clock.millis();
        let mut next_scan = start + IDLE_SCAN_INTERVAL_MS;

        for event in &pattern.events {
            let at = start + event.at_ms;
            while next_scan <= at {
                clock.set(next_scan);
                decoder.idle_scan();
                next_scan += IDLE_SCAN_INTERVAL_MS;
            }
            clock.set(at);
            if event.pressed {
                decoder.key_down();
            } else {
                decoder.key_up();
            }
        }

        let end = start + pattern.end_ms + settle_ms;
        while next_scan <= end {
            clock.set(next_scan);
            decoder.idle_scan();
            next_scan += IDLE_SCAN_INTERVAL_MS;
        }
        clock.set(end);
    }
}

pub mod output_capture {
    //! Capture of decoder events for assertions

    use core::cell::RefCell;

    use crate::events::EventSink;
    use crate::hal::mock::ManualClock;
    use crate::session::MorseDecoder;
    use crate::types::{DecodeError, TimingConfig};

    use super::key_simulator::{play, KeyPatternBuilder, Timings};

    /// Records every event it sees.
    ///
    /// Hand out handlers with [`Recorder::symbol_handler`] and friends, or use
    /// it directly as an [`EventSink`].
    #[derive(Debug, Default)]
    pub struct Recorder {
        symbols: RefCell<String>,
        codes: RefCell<Vec<(char, String)>>,
        errors: RefCell<Vec<DecodeError>>,
    }

    impl Recorder {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn symbol_handler(&self) -> impl FnMut(char) + '_ {
            move |tag: char| self.symbols.borrow_mut().push(tag)
        }

        pub fn code_handler(&self) -> impl FnMut(char, &str) + '_ {
            move |code: char, sequence: &str| {
                self.codes.borrow_mut().push((code, sequence.to_owned()))
            }
        }

        pub fn error_handler(&self) -> impl FnMut(DecodeError) + '_ {
            move |error: DecodeError| self.errors.borrow_mut().push(error)
        }

        /// Symbol tags in order
        pub fn symbols(&self) -> String {
            self.symbols.borrow().clone()
        }

        /// Resolved codes with their sequences
        pub fn codes(&self) -> Vec<(char, String)> {
            self.codes.borrow().clone()
        }

        /// Resolved characters joined into a string
        pub fn text(&self) -> String {
            self.codes.borrow().iter().map(|(code, _)| *code).collect()
        }

        pub fn errors(&self) -> Vec<DecodeError> {
            self.errors.borrow().clone()
        }

        pub fn clear(&self) {
            self.symbols.borrow_mut().clear();
            self.codes.borrow_mut().clear();
            self.errors.borrow_mut().clear();
        }
    }

    impl EventSink for Recorder {
        fn symbol(&mut self, tag: char) {
            self.symbols.get_mut().push(tag);
        }

        fn code_selected(&mut self, code: char, sequence: &str) {
            self.codes.get_mut().push((code, sequence.to_owned()));
        }

        fn error(&mut self, error: DecodeError) {
            self.errors.get_mut().push(error);
        }
    }

    /// Key `text` through a fresh decoder and return what it resolved.
    ///
    /// Word boundaries come back as spaces, including one after the last word.
    pub fn decode_keyed_text(text: &str, config: TimingConfig) -> String {
        let clock = ManualClock::new();
        let recorder = Recorder::new();
        let mut on_code = recorder.code_handler();

        let timings = Timings::for_config(&config);
        let pattern = KeyPatternBuilder::new(timings).text(text).build();
        {
            let mut decoder = MorseDecoder::with_config(&clock, config);
            decoder.on_code_selected(&mut on_code);
            play(&pattern, &clock, &mut decoder, timings.word_gap_ms);
        }
        recorder.text()
    }
}
