//! Core data types for the Morse decoder

use crate::hal::Duration;

/// Shortest accepted dot ceiling
pub const MIN_DOT_MS: u64 = 10;
/// Longest accepted dot ceiling
pub const MAX_DOT_MS: u64 = 2_000;
/// The dash ceiling never drops below this multiple of the dot ceiling
pub const DASH_TO_DOT_RATIO: u64 = 2;
/// Longest accepted dash ceiling
pub const MAX_DASH_MS: u64 = 10_000;
/// Shortest accepted gap between symbols
pub const MIN_SYMBOL_SILENCE_MS: u64 = 10;
/// Longest accepted gap between symbols
pub const MAX_SYMBOL_SILENCE_MS: u64 = 5_000;
/// Longest accepted gap between letters
pub const MAX_LETTER_SILENCE_MS: u64 = 10_000;

/// The two keyed Morse symbols
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Symbol {
    /// Dit (short press)
    Dot,
    /// Dah (long press)
    Dash,
}

impl Symbol {
    /// Character used for this symbol in sequences and encoded text
    pub const fn as_char(&self) -> char {
        match self {
            Symbol::Dot => '.',
            Symbol::Dash => '-',
        }
    }

    /// Nominal duration in dot units
    pub const fn duration_units(&self) -> u32 {
        match self {
            Symbol::Dot => 1,
            Symbol::Dash => 3,
        }
    }

    pub const fn from_char(c: char) -> Option<Symbol> {
        match c {
            '.' => Some(Symbol::Dot),
            '-' => Some(Symbol::Dash),
            _ => None,
        }
    }
}

/// Classified silences between key presses
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Silence {
    /// No silence at all
    #[default]
    None,
    /// Gap inside a letter, ignored by the decoder
    Small,
    /// Gap that ends a letter
    InterLetter,
    /// Gap that ends a word
    InterWord,
}

impl Silence {
    /// Tag reported to symbol observers, `None` produces no event
    pub const fn tag(&self) -> Option<char> {
        match self {
            Silence::None => None,
            Silence::Small => Some('_'),
            Silence::InterLetter => Some(' '),
            Silence::InterWord => Some('/'),
        }
    }

    /// Returns true if this silence ends the pending letter
    pub const fn resolves(&self) -> bool {
        match self {
            Silence::None | Silence::Small => false,
            Silence::InterLetter | Silence::InterWord => true,
        }
    }
}

/// What an inter-word silence reports when no symbols were keyed
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EmptyWordPolicy {
    /// Report the word separator `' '` with an empty sequence
    #[default]
    Separator,
    /// Report the tree lookup at the root, which is the error marker
    ErrorMarker,
}

/// Result of a threshold update
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigOutcome {
    /// Requested values were used as given
    Applied,
    /// At least one value was moved into its valid range
    Clamped,
}

impl ConfigOutcome {
    pub const fn is_clamped(&self) -> bool {
        matches!(self, ConfigOutcome::Clamped)
    }

    /// Combine two outcomes, clamped wins
    pub const fn merge(self, other: ConfigOutcome) -> ConfigOutcome {
        match (self, other) {
            (ConfigOutcome::Applied, ConfigOutcome::Applied) => ConfigOutcome::Applied,
            _ => ConfigOutcome::Clamped,
        }
    }
}

/// Conditions reported to the error observer
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// The keyed sequence does not map to any character
    InvalidCode,
    /// A symbol moved the walk onto a slot with no character
    InvalidPath,
    /// The key was held past the dash ceiling and the letter was dropped
    MalformedHold { held_ms: u64 },
}

#[cfg(feature = "std")]
impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DecodeError::InvalidCode => write!(f, "Sequence does not match any character"),
            DecodeError::InvalidPath => write!(f, "Symbols so far lead to no character"),
            DecodeError::MalformedHold { held_ms } => {
                write!(f, "Key held for {} ms, letter aborted", held_ms)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

/// Millisecond thresholds used by the timing classifier
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimingConfig {
    /// Presses up to this long are dots
    pub max_dot: Duration,
    /// Presses shorter than this (and longer than a dot) are dashes
    pub max_dash: Duration,
    /// Silences longer than this end the current letter
    pub max_symbol_silence: Duration,
    /// Silences longer than this end the current word
    pub max_letter_silence: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            max_dot: Duration::from_millis(200),
            max_dash: Duration::from_millis(1_000),
            max_symbol_silence: Duration::from_millis(500),
            max_letter_silence: Duration::from_millis(1_500),
        }
    }
}

impl TimingConfig {
    /// Create a new configuration with validation
    pub fn new(
        dot_ms: u64,
        dash_ms: u64,
        symbol_silence_ms: u64,
        letter_silence_ms: u64,
    ) -> Result<Self, &'static str> {
        if !(MIN_DOT_MS..=MAX_DOT_MS).contains(&dot_ms) {
            return Err("Dot threshold must be between 10 and 2000 ms");
        }
        if dash_ms < dot_ms * DASH_TO_DOT_RATIO || dash_ms > MAX_DASH_MS {
            return Err("Dash threshold must be at least twice the dot threshold and <= 10000 ms");
        }
        if !(MIN_SYMBOL_SILENCE_MS..=MAX_SYMBOL_SILENCE_MS).contains(&symbol_silence_ms) {
            return Err("Symbol silence must be between 10 and 5000 ms");
        }
        if letter_silence_ms < symbol_silence_ms || letter_silence_ms > MAX_LETTER_SILENCE_MS {
            return Err("Letter silence must be >= symbol silence and <= 10000 ms");
        }

        Ok(Self {
            max_dot: Duration::from_millis(dot_ms),
            max_dash: Duration::from_millis(dash_ms),
            max_symbol_silence: Duration::from_millis(symbol_silence_ms),
            max_letter_silence: Duration::from_millis(letter_silence_ms),
        })
    }

    /// Thresholds for a sending speed (PARIS standard: 50 units per word)
    pub fn from_wpm(wpm: u32) -> Result<Self, &'static str> {
        if wpm == 0 || wpm > 60 {
            return Err("WPM must be between 1 and 60");
        }
        let mut config = Self::default();
        config.apply_unit(1200 / wpm as u64);
        Ok(config)
    }

    /// Derive all four thresholds from a dot unit.
    ///
    /// Dots are up to 2 units, dashes up to 6, a letter ends after 2 units of
    /// silence and a word after 5.
    pub fn apply_unit(&mut self, unit_ms: u64) -> ConfigOutcome {
        let keyed = self.set_dot_dash(unit_ms.saturating_mul(2), unit_ms.saturating_mul(6));
        let silences = self.set_silences(unit_ms.saturating_mul(2), unit_ms.saturating_mul(5));
        keyed.merge(silences)
    }

    /// Set dot and dash ceilings, clamping into range
    pub fn set_dot_dash(&mut self, dot_ms: u64, dash_ms: u64) -> ConfigOutcome {
        let dot = dot_ms.clamp(MIN_DOT_MS, MAX_DOT_MS);
        let dash = dash_ms.clamp(dot * DASH_TO_DOT_RATIO, MAX_DASH_MS);
        self.max_dot = Duration::from_millis(dot);
        self.max_dash = Duration::from_millis(dash);
        outcome(dot == dot_ms && dash == dash_ms)
    }

    /// Set symbol and letter silence thresholds, clamping into range
    pub fn set_silences(&mut self, symbol_ms: u64, letter_ms: u64) -> ConfigOutcome {
        let symbol = symbol_ms.clamp(MIN_SYMBOL_SILENCE_MS, MAX_SYMBOL_SILENCE_MS);
        let letter = letter_ms.clamp(symbol, MAX_LETTER_SILENCE_MS);
        self.max_symbol_silence = Duration::from_millis(symbol);
        self.max_letter_silence = Duration::from_millis(letter);
        outcome(symbol == symbol_ms && letter == letter_ms)
    }
}

const fn outcome(unchanged: bool) -> ConfigOutcome {
    if unchanged {
        ConfigOutcome::Applied
    } else {
        ConfigOutcome::Clamped
    }
}
