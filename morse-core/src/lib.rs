#![cfg_attr(not(any(feature = "std", test)), no_std)]

//! # Morse Core
//!
//! Real-time Morse decoder and text encoder for embedded systems.
//! Key presses and silences are classified by duration, walked through a
//! binary symbol tree and reported to observers as characters.

pub mod types;
pub mod tree;
pub mod encoder;
pub mod decoder;
pub mod events;
pub mod timing;
pub mod session;
pub mod hal;

#[cfg(feature = "test-utils")]
pub mod test_utils;


pub use types::*;
pub use decoder::{DecodeStateMachine, Sequence, MAX_SEQUENCE_LENGTH};
pub use encoder::{encode_char, encode_into, encode_symbol, encode_units, Code, EncodeError, Unit};
#[cfg(feature = "std")]
pub use encoder::encode;
pub use events::{CodeHandler, Dispatcher, ErrorHandler, EventSink, SymbolHandler};
pub use timing::{KeyTiming, KeyUp, SpeedTracker, TimingClassifier};
pub use session::{KeyEdge, KeyMonitor, MorseDecoder, IDLE_SCAN_INTERVAL_MS};
pub use hal::{Clock, Duration, HalError, Instant, KeyInput, KeyLine};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default thresholds: 200 ms dot, 1000 ms dash, 500 ms letter gap, 1500 ms word gap
pub fn default_config() -> TimingConfig {
    TimingConfig::default()
}
