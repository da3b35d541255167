//! Text to Morse encoding by walking the symbol tree upwards

use core::fmt;
use core::str::Chars;

use crate::tree::{self, ERROR_MARKER, START};

/// Longest code reachable in the tree
pub const MAX_CODE_LENGTH: usize = 6;

/// Dot/dash string for one character
pub type Code = heapless::String<MAX_CODE_LENGTH>;

/// Rendering of a word gap in encoded text
pub const WORD_GAP: &str = "\t";

/// Rendering of the gap between two letters
pub const SYMBOL_GAP: &str = " ";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Input must be exactly one character
    NotSingleChar,
}

#[cfg(feature = "std")]
impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::NotSingleChar => write!(f, "Expected exactly one character"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EncodeError {}

/// Encode one character, upper-casing it first.
///
/// Characters missing from the tree encode as the error marker.
pub fn encode_char(ch: char) -> Code {
    let mut code = Code::new();
    let Some(mut index) = tree::position_of(ch.to_ascii_uppercase()) else {
        code.push(ERROR_MARKER).ok();
        return code;
    };

    // Collected leaf-to-root, emitted reversed
    let mut path = [' '; MAX_CODE_LENGTH];
    let mut len = 0;
    while index != START && len < MAX_CODE_LENGTH {
        if let Some(symbol) = tree::edge(index) {
            path[len] = symbol.as_char();
            len += 1;
        }
        index = tree::parent(index);
    }
    for &c in path[..len].iter().rev() {
        code.push(c).ok();
    }
    code
}

/// Encode a string holding exactly one character
pub fn encode_symbol(text: &str) -> Result<Code, EncodeError> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(encode_char(ch)),
        _ => Err(EncodeError::NotSingleChar),
    }
}

/// One piece of encoded output
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Unit {
    /// Space between two letters
    SymbolGap,
    /// Space between two words
    WordGap,
    /// Line break copied from the input
    Newline,
    /// Code of one character
    Code(Code),
}

impl Unit {
    pub fn as_str(&self) -> &str {
        match self {
            Unit::SymbolGap => SYMBOL_GAP,
            Unit::WordGap => WORD_GAP,
            Unit::Newline => "\n",
            Unit::Code(code) => code.as_str(),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lazy encoder returned by [`encode_units`]
#[derive(Clone, Debug)]
pub struct Units<'a> {
    chars: Chars<'a>,
    pending: Option<Unit>,
    // Start of text, or right after a word gap or newline
    at_boundary: bool,
}

impl Iterator for Units<'_> {
    type Item = Unit;

    fn next(&mut self) -> Option<Unit> {
        if let Some(unit) = self.pending.take() {
            return Some(unit);
        }

        let ch = self.chars.next()?;
        let unit = match ch {
            '\n' => {
                self.at_boundary = true;
                return Some(Unit::Newline);
            }
            ' ' => Unit::WordGap,
            other => Unit::Code(encode_char(other)),
        };

        let separate = !self.at_boundary;
        self.at_boundary = unit == Unit::WordGap;
        if separate {
            self.pending = Some(unit);
            Some(Unit::SymbolGap)
        } else {
            Some(unit)
        }
    }
}

/// Encode `text` lazily, unit by unit
pub fn encode_units(text: &str) -> Units<'_> {
    Units {
        chars: text.chars(),
        pending: None,
        at_boundary: true,
    }
}

/// Encode `text` into any `fmt::Write` sink
pub fn encode_into<W: fmt::Write + ?Sized>(text: &str, out: &mut W) -> fmt::Result {
    for unit in encode_units(text) {
        out.write_str(unit.as_str())?;
    }
    Ok(())
}

/// Length in bytes of the encoded form of `text`
pub fn encoded_len(text: &str) -> usize {
    encode_units(text).map(|unit| unit.as_str().len()).sum()
}

/// Encode `text` into a new string
#[cfg(feature = "std")]
pub fn encode(text: &str) -> String {
    let mut out = String::with_capacity(encoded_len(text));
    for unit in encode_units(text) {
        out.push_str(unit.as_str());
    }
    out
}
