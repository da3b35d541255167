//! Decode state machine walking the symbol tree

use crate::events::EventSink;
use crate::tree::{self, ERROR_MARKER, START, WORD_SEPARATOR};
use crate::types::{DecodeError, EmptyWordPolicy, Silence, Symbol};

/// Symbols kept for the letter being decoded; extra symbols are dropped
pub const MAX_SEQUENCE_LENGTH: usize = 7;

/// Dots and dashes keyed so far
pub type Sequence = heapless::String<MAX_SEQUENCE_LENGTH>;

/// Forward walk of the symbol tree, one symbol at a time.
///
/// The position encodes both how many symbols were keyed and which path they
/// took. Letter and word silences resolve the position to a character and
/// return to the root.
#[derive(Clone, Debug, Default)]
pub struct DecodeStateMachine {
    position: usize,
    sequence: Sequence,
    empty_word: EmptyWordPolicy,
}

impl DecodeStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(empty_word: EmptyWordPolicy) -> Self {
        Self {
            empty_word,
            ..Self::default()
        }
    }

    pub fn record_dot<E: EventSink + ?Sized>(&mut self, events: &mut E) {
        self.record_symbol(Symbol::Dot, events);
    }

    pub fn record_dash<E: EventSink + ?Sized>(&mut self, events: &mut E) {
        self.record_symbol(Symbol::Dash, events);
    }

    /// Step down the tree and report the symbol.
    ///
    /// Stepping onto an error slot reports [`DecodeError::InvalidPath`] while
    /// the letter is still being keyed; staying on error slots reports once.
    pub fn record_symbol<E: EventSink + ?Sized>(&mut self, symbol: Symbol, events: &mut E) {
        let was_error = self.position != START && tree::is_error(self.position);
        self.position = tree::child(self.position, symbol);
        if self.sequence.len() < MAX_SEQUENCE_LENGTH {
            self.sequence.push(symbol.as_char()).ok();
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("Symbol {} -> position {}", symbol, self.position);

        events.symbol(symbol.as_char());
        if !was_error && tree::is_error(self.position) {
            events.error(DecodeError::InvalidPath);
        }
    }

    /// Apply a silence.
    ///
    /// Returns the resolved character when the silence ended a letter or word.
    pub fn record_silence<E: EventSink + ?Sized>(
        &mut self,
        kind: Silence,
        events: &mut E,
    ) -> Option<char> {
        if let Some(tag) = kind.tag() {
            events.symbol(tag);
        }

        if !kind.resolves() {
            return None;
        }

        match kind {
            Silence::None | Silence::Small => None,
            Silence::InterLetter => {
                if self.is_idle() {
                    None
                } else {
                    Some(self.resolve(events))
                }
            }
            Silence::InterWord => {
                if !self.is_idle() {
                    return Some(self.resolve(events));
                }
                match self.empty_word {
                    EmptyWordPolicy::Separator => {
                        events.code_selected(WORD_SEPARATOR, "");
                        Some(WORD_SEPARATOR)
                    }
                    EmptyWordPolicy::ErrorMarker => Some(self.resolve(events)),
                }
            }
        }
    }

    fn resolve<E: EventSink + ?Sized>(&mut self, events: &mut E) -> char {
        let code = self.peek_code();
        events.code_selected(code, &self.sequence);
        if code == ERROR_MARKER {
            events.error(DecodeError::InvalidCode);
        }
        self.reset();
        code
    }

    /// Drop the pending letter and return to the root
    pub fn reset(&mut self) {
        self.position = START;
        self.sequence.clear();
    }

    /// Character the current position would resolve to
    pub fn peek_code(&self) -> char {
        tree::symbol_at(self.position)
    }

    pub fn peek_sequence(&self) -> &str {
        &self.sequence
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns true if no symbol is pending
    pub fn is_idle(&self) -> bool {
        self.position == START
    }

    pub fn empty_word_policy(&self) -> EmptyWordPolicy {
        self.empty_word
    }

    pub fn set_empty_word_policy(&mut self, policy: EmptyWordPolicy) {
        self.empty_word = policy;
    }
}
