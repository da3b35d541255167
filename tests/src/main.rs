// Host demo: encode a message, key it back through the decoder

use morse_core::hal::mock::ManualClock;
use morse_core::test_utils::key_simulator::{play, KeyPatternBuilder, Timings};
use morse_core::test_utils::output_capture::Recorder;
use morse_core::{encode, MorseDecoder, TimingConfig};

fn main() {
    let message = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    let message = if message.is_empty() { "CQ CQ DE MORSE".to_string() } else { message };

    println!("📡 Morse Core Demo (v{})", morse_core::VERSION);
    println!();

    println!("🔤 Text:    {}", message);
    println!("📝 Encoded: {}", encode(&message).replace('\t', " / "));

    let config = match TimingConfig::from_wpm(18) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            return;
        }
    };
    println!(
        "⚙️  Thresholds: dot {}ms, dash {}ms, letter gap {}ms, word gap {}ms",
        config.max_dot.as_millis(),
        config.max_dash.as_millis(),
        config.max_symbol_silence.as_millis(),
        config.max_letter_silence.as_millis()
    );

    let clock = ManualClock::new();
    let recorder = Recorder::new();
    let mut on_code = recorder.code_handler();
    let mut on_error = recorder.error_handler();
    let mut decoder = MorseDecoder::with_config(&clock, config);
    decoder.on_code_selected(&mut on_code);
    decoder.on_error(&mut on_error);
    decoder.set_adaptive(true);

    let timings = Timings::for_config(&config);
    let pattern = KeyPatternBuilder::new(timings).text(&message).build();
    play(&pattern, &clock, &mut decoder, timings.word_gap_ms);

    println!("🔑 Keyed {} edges over {}ms", pattern.events.len(), clock.millis());
    println!("✅ Decoded: {}", recorder.text().trim_end());
    if let Some(wpm) = decoder.estimated_wpm() {
        println!("📈 Estimated speed: {} WPM", wpm);
    }
    for error in recorder.errors() {
        println!("⚠️  {}", error);
    }
}
