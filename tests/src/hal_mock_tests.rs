//! Key input through embedded-hal pins

use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};
use morse_core::hal::mock::ManualClock;
use morse_core::hal::EmbeddedHalKey;
use morse_core::{KeyEdge, KeyInput, KeyMonitor, KeyUp, MorseDecoder};

#[test]
fn test_active_low_key_reads_pin() {
    let expectations = [
        PinTransaction::get(State::High),
        PinTransaction::get(State::Low),
    ];
    let mut key = EmbeddedHalKey::active_low(PinMock::new(&expectations));

    assert_eq!(key.is_pressed(), Ok(false));
    assert_eq!(key.is_pressed(), Ok(true));

    let mut pin = key.release();
    pin.done();
}

#[test]
fn test_active_high_key_reads_pin() {
    let expectations = [PinTransaction::get(State::High)];
    let mut key = EmbeddedHalKey::active_high(PinMock::new(&expectations));

    assert_eq!(key.is_pressed(), Ok(true));

    let mut pin = key.release();
    pin.done();
}

#[test]
fn test_monitor_decodes_pin_edges() {
    let expectations = [
        PinTransaction::get(State::High),
        PinTransaction::get(State::Low),
        PinTransaction::get(State::Low),
        PinTransaction::get(State::High),
    ];
    let clock = ManualClock::new();
    let mut decoder = MorseDecoder::new(&clock);
    let mut monitor = KeyMonitor::new(EmbeddedHalKey::active_low(PinMock::new(&expectations)));

    assert_eq!(monitor.poll(&mut decoder), Ok(None));
    clock.advance(5);
    assert_eq!(monitor.poll(&mut decoder), Ok(Some(KeyEdge::Down)));
    clock.advance(40);
    assert_eq!(monitor.poll(&mut decoder), Ok(None));
    clock.advance(40);
    assert_eq!(monitor.poll(&mut decoder), Ok(Some(KeyEdge::Up(KeyUp::Dot))));
    assert_eq!(decoder.peek_code(), 'E');

    let mut pin = monitor.into_inner().release();
    pin.done();
}
