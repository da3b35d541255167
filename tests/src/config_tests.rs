//! Threshold configuration and clamping

use morse_core::hal::mock::ManualClock;
use morse_core::*;
use proptest::prelude::*;
use rstest::rstest;

#[test]
fn test_default_thresholds() {
    let config = default_config();
    assert_eq!(config.max_dot.as_millis(), 200);
    assert_eq!(config.max_dash.as_millis(), 1_000);
    assert_eq!(config.max_symbol_silence.as_millis(), 500);
    assert_eq!(config.max_letter_silence.as_millis(), 1_500);
}

#[rstest]
#[case(100, 400, ConfigOutcome::Applied, 100, 400)]
#[case(300, 100, ConfigOutcome::Clamped, 300, 600)]
#[case(1, 1, ConfigOutcome::Clamped, MIN_DOT_MS, MIN_DOT_MS * 2)]
#[case(5_000, 20_000, ConfigOutcome::Clamped, MAX_DOT_MS, MAX_DASH_MS)]
fn test_dot_dash_clamping(
    #[case] dot: u64,
    #[case] dash: u64,
    #[case] outcome: ConfigOutcome,
    #[case] expected_dot: u64,
    #[case] expected_dash: u64,
) {
    let clock = ManualClock::new();
    let mut decoder = MorseDecoder::new(&clock);
    assert_eq!(decoder.set_dot_dash_thresholds(dot, dash), outcome);
    assert_eq!(decoder.max_dot().as_millis(), expected_dot);
    assert_eq!(decoder.max_dash().as_millis(), expected_dash);
}

#[rstest]
#[case(300, 900, ConfigOutcome::Applied, 300, 900)]
#[case(800, 400, ConfigOutcome::Clamped, 800, 800)]
#[case(0, 0, ConfigOutcome::Clamped, MIN_SYMBOL_SILENCE_MS, MIN_SYMBOL_SILENCE_MS)]
#[case(9_000, 50_000, ConfigOutcome::Clamped, MAX_SYMBOL_SILENCE_MS, MAX_LETTER_SILENCE_MS)]
fn test_silence_clamping(
    #[case] symbol: u64,
    #[case] letter: u64,
    #[case] outcome: ConfigOutcome,
    #[case] expected_symbol: u64,
    #[case] expected_letter: u64,
) {
    let clock = ManualClock::new();
    let mut decoder = MorseDecoder::new(&clock);
    assert_eq!(decoder.set_silence_thresholds(symbol, letter), outcome);
    assert_eq!(decoder.max_symbol_silence().as_millis(), expected_symbol);
    assert_eq!(decoder.max_letter_silence().as_millis(), expected_letter);
}

#[test]
fn test_new_thresholds_change_classification() {
    let clock = ManualClock::new();
    let mut decoder = MorseDecoder::new(&clock);

    decoder.key_down();
    clock.advance(150);
    assert_eq!(decoder.key_up(), KeyUp::Dot);

    decoder.set_dot_dash_thresholds(100, 400);
    clock.advance(50);
    decoder.key_down();
    clock.advance(150);
    assert_eq!(decoder.key_up(), KeyUp::Dash);
    assert_eq!(decoder.peek_sequence(), ".-");
}

#[test]
fn test_config_validation_messages() {
    assert!(TimingConfig::new(200, 1_000, 500, 1_500).is_ok());
    assert!(TimingConfig::new(2_001, 5_000, 500, 1_500).is_err());
    assert!(TimingConfig::new(200, 1_000, 500, 10_001).is_err());
}

proptest! {
    #[test]
    fn prop_thresholds_stay_ordered(dot in any::<u64>(), dash in any::<u64>(), symbol in any::<u64>(), letter in any::<u64>()) {
        let mut config = TimingConfig::default();
        config.set_dot_dash(dot, dash);
        config.set_silences(symbol, letter);

        let dot = config.max_dot.as_millis();
        let dash = config.max_dash.as_millis();
        let symbol = config.max_symbol_silence.as_millis();
        let letter = config.max_letter_silence.as_millis();

        prop_assert!((MIN_DOT_MS..=MAX_DOT_MS).contains(&dot));
        prop_assert!(dash >= dot * DASH_TO_DOT_RATIO && dash <= MAX_DASH_MS);
        prop_assert!((MIN_SYMBOL_SILENCE_MS..=MAX_SYMBOL_SILENCE_MS).contains(&symbol));
        prop_assert!(letter >= symbol && letter <= MAX_LETTER_SILENCE_MS);
    }

    #[test]
    fn prop_from_wpm_is_valid(wpm in 1u32..=60) {
        let config = TimingConfig::from_wpm(wpm).unwrap();
        let rebuilt = TimingConfig::new(
            config.max_dot.as_millis(),
            config.max_dash.as_millis(),
            config.max_symbol_silence.as_millis(),
            config.max_letter_silence.as_millis(),
        );
        prop_assert_eq!(rebuilt, Ok(config));
    }
}
