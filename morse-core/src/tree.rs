//! Morse code symbol tree.
//!
//! A complete binary tree flattened into a table: the dot child of node `i`
//! lives at `2i + 1`, the dash child at `2i + 2`. Walking from the root and
//! following the keyed symbols lands on the decoded character. Slots that no
//! code reaches hold [`ERROR_MARKER`], and so does the root.

use crate::types::Symbol;

/// Character reported for sequences that match nothing
pub const ERROR_MARKER: char = '?';

/// Character reported for a word boundary with nothing keyed
pub const WORD_SEPARATOR: char = ' ';

/// Root of the tree, the decoder's idle position
pub const START: usize = 0;

/// Last slot, where overlong sequences collapse
pub const MAX_POSITION: usize = 64;

const TREE: &[u8; MAX_POSITION + 1] =
    b"?ETIANMSURWDKGOHVF?L?PJBXCYZQ??54?3???2??+????16=/?????7???8?90??";

/// Character stored at `position`, the error marker when out of range
pub const fn symbol_at(position: usize) -> char {
    if position > MAX_POSITION {
        return ERROR_MARKER;
    }
    TREE[position] as char
}

/// Position reached by keying `symbol` at `position`
pub const fn child(position: usize, symbol: Symbol) -> usize {
    let next = match symbol {
        Symbol::Dot => 2 * position + 1,
        Symbol::Dash => 2 * position + 2,
    };
    if next > MAX_POSITION {
        MAX_POSITION
    } else {
        next
    }
}

pub const fn parent(position: usize) -> usize {
    if position == START {
        START
    } else {
        (position - 1) / 2
    }
}

/// Symbol that leads from the parent to `position`, `None` at the root
pub const fn edge(position: usize) -> Option<Symbol> {
    if position == START {
        None
    } else if position % 2 == 1 {
        Some(Symbol::Dot)
    } else {
        Some(Symbol::Dash)
    }
}

/// Slot holding `ch`; the error marker itself is never found
pub fn position_of(ch: char) -> Option<usize> {
    if ch == ERROR_MARKER || !ch.is_ascii() {
        return None;
    }
    TREE.iter().position(|&entry| entry == ch as u8)
}

pub const fn is_error(position: usize) -> bool {
    symbol_at(position) == ERROR_MARKER
}
