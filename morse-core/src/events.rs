//! Event dispatch to decoder observers

use crate::types::DecodeError;

/// Receiver of decoder events.
///
/// The state machine and timing classifier report through this trait; every
/// method defaults to doing nothing.
pub trait EventSink {
    /// A dot, dash or silence was recorded, identified by its tag
    fn symbol(&mut self, _tag: char) {}

    /// A letter or word boundary was resolved
    fn code_selected(&mut self, _code: char, _sequence: &str) {}

    /// Invalid sequence or malformed key hold
    fn error(&mut self, _error: DecodeError) {}
}

/// Discards every event
impl EventSink for () {}

impl<E: EventSink + ?Sized> EventSink for &mut E {
    fn symbol(&mut self, tag: char) {
        (**self).symbol(tag)
    }

    fn code_selected(&mut self, code: char, sequence: &str) {
        (**self).code_selected(code, sequence)
    }

    fn error(&mut self, error: DecodeError) {
        (**self).error(error)
    }
}

pub trait SymbolHandler {
    fn on_symbol(&mut self, tag: char);
}

impl<F: FnMut(char)> SymbolHandler for F {
    fn on_symbol(&mut self, tag: char) {
        self(tag)
    }
}

pub trait CodeHandler {
    fn on_code_selected(&mut self, code: char, sequence: &str);
}

impl<F: FnMut(char, &str)> CodeHandler for F {
    fn on_code_selected(&mut self, code: char, sequence: &str) {
        self(code, sequence)
    }
}

pub trait ErrorHandler {
    fn on_error(&mut self, error: DecodeError);
}

impl<F: FnMut(DecodeError)> ErrorHandler for F {
    fn on_error(&mut self, error: DecodeError) {
        self(error)
    }
}

/// Single-slot observer registry.
///
/// Each kind of event has at most one handler; registering a handler
/// replaces the previous one.
#[derive(Default)]
pub struct Dispatcher<'h> {
    symbol: Option<&'h mut dyn SymbolHandler>,
    code: Option<&'h mut dyn CodeHandler>,
    error: Option<&'h mut dyn ErrorHandler>,
}

impl<'h> Dispatcher<'h> {
    pub fn new() -> Self {
        Self {
            symbol: None,
            code: None,
            error: None,
        }
    }

    pub fn on_symbol(&mut self, handler: &'h mut dyn SymbolHandler) {
        self.symbol = Some(handler);
    }

    pub fn on_code_selected(&mut self, handler: &'h mut dyn CodeHandler) {
        self.code = Some(handler);
    }

    pub fn on_error(&mut self, handler: &'h mut dyn ErrorHandler) {
        self.error = Some(handler);
    }

    pub fn has_code_handler(&self) -> bool {
        self.code.is_some()
    }
}

impl EventSink for Dispatcher<'_> {
    fn symbol(&mut self, tag: char) {
        if let Some(handler) = self.symbol.as_mut() {
            handler.on_symbol(tag);
        }
    }

    fn code_selected(&mut self, code: char, sequence: &str) {
        #[cfg(feature = "defmt")]
        defmt::debug!("Code selected: {} ({=str})", code, sequence);

        if let Some(handler) = self.code.as_mut() {
            handler.on_code_selected(code, sequence);
        }
    }

    fn error(&mut self, error: DecodeError) {
        #[cfg(feature = "defmt")]
        defmt::warn!("Decode error: {}", error);

        if let Some(handler) = self.error.as_mut() {
            handler.on_error(error);
        }
    }
}
