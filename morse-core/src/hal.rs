//! Hardware Abstraction Layer: time source and key input

// Re-export time types based on feature
#[cfg(feature = "embassy-time")]
pub use embassy_time::{Duration, Instant};

#[cfg(not(feature = "embassy-time"))]
pub use self::mock_time::{Duration, Instant};

#[cfg(not(feature = "embassy-time"))]
mod mock_time {
    /// Millisecond instant used when building without embassy-time
    #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Instant(u64);

    impl Instant {
        pub const fn from_millis(ms: u64) -> Self {
            Self(ms)
        }

        pub const fn as_millis(&self) -> u64 {
            self.0
        }
    }

    /// Millisecond duration used when building without embassy-time
    #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Duration(u64);

    impl Duration {
        pub const fn from_millis(ms: u64) -> Self {
            Self(ms)
        }

        pub const fn as_millis(&self) -> u64 {
            self.0
        }
    }
}

use embedded_hal::digital::InputPin;
use portable_atomic::{AtomicBool, AtomicU32, Ordering};

/// Milliseconds elapsed from `earlier` to `later`, zero if the clock went backwards.
pub fn millis_between(earlier: Instant, later: Instant) -> u64 {
    later.as_millis().saturating_sub(earlier.as_millis())
}

/// Monotonic millisecond clock consumed by the decoder
pub trait Clock {
    fn now(&self) -> Instant;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// Clock backed by the embassy time driver
#[cfg(feature = "embassy-time")]
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemClock;

#[cfg(feature = "embassy-time")]
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Error types for HAL operations
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalError {
    /// GPIO read failed
    GpioError,
    /// Invalid configuration
    InvalidConfig,
}

#[cfg(feature = "std")]
impl core::fmt::Display for HalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HalError::GpioError => write!(f, "GPIO operation failed"),
            HalError::InvalidConfig => write!(f, "Invalid configuration"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HalError {}

/// A Morse key, button or sensor that can be sampled
pub trait KeyInput {
    type Error: From<HalError>;

    /// Check if the key is currently held down
    fn is_pressed(&mut self) -> Result<bool, Self::Error>;
}

impl<K: KeyInput + ?Sized> KeyInput for &mut K {
    type Error = K::Error;

    fn is_pressed(&mut self) -> Result<bool, Self::Error> {
        (**self).is_pressed()
    }
}

/// Key wired to an embedded-hal input pin
pub struct EmbeddedHalKey<P> {
    pin: P,
    active_low: bool,
}

impl<P> EmbeddedHalKey<P>
where
    P: InputPin,
{
    /// Key pulled up and grounded when pressed
    pub fn active_low(pin: P) -> Self {
        Self { pin, active_low: true }
    }

    /// Key pulled down and driven high when pressed
    pub fn active_high(pin: P) -> Self {
        Self { pin, active_low: false }
    }

    /// Give the pin back
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P> KeyInput for EmbeddedHalKey<P>
where
    P: InputPin,
{
    type Error = HalError;

    fn is_pressed(&mut self) -> Result<bool, Self::Error> {
        if self.active_low {
            self.pin.is_low().map_err(|_| HalError::GpioError)
        } else {
            self.pin.is_high().map_err(|_| HalError::GpioError)
        }
    }
}

/// Atomic key level with debounce.
///
/// Written from an edge interrupt with [`KeyLine::update`] and sampled by the
/// decoder side through [`KeyInput`].
pub struct KeyLine {
    pressed: AtomicBool,
    // No edge accepted yet, so there is nothing to debounce against
    idle: AtomicBool,
    last_edge_ms: AtomicU32,
    debounce_ms: AtomicU32,
}

impl KeyLine {
    pub const fn new(debounce_ms: u32) -> Self {
        Self {
            pressed: AtomicBool::new(false),
            idle: AtomicBool::new(true),
            last_edge_ms: AtomicU32::new(0),
            debounce_ms: AtomicU32::new(debounce_ms),
        }
    }

    /// Record a level change seen at `now`.
    ///
    /// Returns false when the change is a repeat of the current level or
    /// arrives inside the debounce window.
    pub fn update(&self, pressed: bool, now: Instant) -> bool {
        let now_ms = now.as_millis() as u32;
        if self.pressed.load(Ordering::Relaxed) == pressed {
            return false;
        }
        let last = self.last_edge_ms.load(Ordering::Relaxed);
        if !self.idle.load(Ordering::Relaxed)
            && now_ms.wrapping_sub(last) < self.debounce_ms.load(Ordering::Relaxed)
        {
            return false;
        }
        self.idle.store(false, Ordering::Relaxed);
        self.pressed.store(pressed, Ordering::Relaxed);
        self.last_edge_ms.store(now_ms, Ordering::Relaxed);
        true
    }

    pub fn pressed(&self) -> bool {
        self.pressed.load(Ordering::Relaxed)
    }

    /// Timestamp (low 32 bits of the millisecond clock) of the last accepted edge
    pub fn last_edge_ms(&self) -> u32 {
        self.last_edge_ms.load(Ordering::Relaxed)
    }

    pub fn set_debounce_ms(&self, debounce_ms: u32) -> Result<(), HalError> {
        if debounce_ms > 100 {
            return Err(HalError::InvalidConfig);
        }
        self.debounce_ms.store(debounce_ms, Ordering::Relaxed);
        Ok(())
    }
}

impl Default for KeyLine {
    fn default() -> Self {
        Self::new(10)
    }
}

impl KeyInput for &KeyLine {
    type Error = HalError;

    fn is_pressed(&mut self) -> Result<bool, Self::Error> {
        Ok(self.pressed())
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    //! Mock implementations for testing

    use super::*;
    use core::cell::Cell;

    /// Clock that only moves when told to
    #[derive(Debug, Default)]
    pub struct ManualClock {
        now_ms: Cell<u64>,
    }

    impl ManualClock {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn starting_at(ms: u64) -> Self {
            Self { now_ms: Cell::new(ms) }
        }

        pub fn advance(&self, ms: u64) {
            self.now_ms.set(self.now_ms.get() + ms);
        }

        pub fn set(&self, ms: u64) {
            self.now_ms.set(ms);
        }

        pub fn millis(&self) -> u64 {
            self.now_ms.get()
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            Instant::from_millis(self.now_ms.get())
        }
    }

    /// Key whose level is set by the test
    #[derive(Debug, Default)]
    pub struct MockKey {
        pressed: Cell<bool>,
        failing: Cell<bool>,
    }

    impl MockKey {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_pressed(&self, pressed: bool) {
            self.pressed.set(pressed);
        }

        /// Make subsequent reads fail with a GPIO error
        pub fn set_failing(&self, failing: bool) {
            self.failing.set(failing);
        }
    }

    impl KeyInput for &MockKey {
        type Error = HalError;

        fn is_pressed(&mut self) -> Result<bool, Self::Error> {
            if self.failing.get() {
                return Err(HalError::GpioError);
            }
            Ok(self.pressed.get())
        }
    }
}
