use criterion::{black_box, criterion_group, criterion_main, Criterion};
use morse_core::hal::mock::ManualClock;
use morse_core::test_utils::key_simulator::{play, KeyPatternBuilder, Timings};
use morse_core::{encode, DecodeStateMachine, Silence, Symbol, MorseDecoder, TimingConfig};

const TEXT: &str = "THE QUICK BROWN FOX JUMPS OVER THE LAZY DOG 0123456789";

fn bench_encode(c: &mut Criterion) {
    c.bench_function("encode_pangram", |b| b.iter(|| encode(black_box(TEXT))));
}

fn bench_state_machine(c: &mut Criterion) {
    let codes: Vec<_> = TEXT
        .chars()
        .filter(|ch| *ch != ' ')
        .map(morse_core::encode_char)
        .collect();

    c.bench_function("state_machine_pangram", |b| {
        b.iter(|| {
            let mut machine = DecodeStateMachine::new();
            for code in &codes {
                for c in code.chars() {
                    if let Some(symbol) = Symbol::from_char(c) {
                        machine.record_symbol(symbol, &mut ());
                    }
                }
                black_box(machine.record_silence(Silence::InterLetter, &mut ()));
            }
        })
    });
}

fn bench_keyed_session(c: &mut Criterion) {
    let config = TimingConfig::from_wpm(25).unwrap_or_default();
    let timings = Timings::for_config(&config);
    let pattern = KeyPatternBuilder::new(timings).text(TEXT).build();

    c.bench_function("keyed_session_pangram", |b| {
        b.iter(|| {
            let clock = ManualClock::new();
            let mut decoder = MorseDecoder::with_config(&clock, config);
            play(black_box(&pattern), &clock, &mut decoder, timings.word_gap_ms);
            black_box(decoder.is_idle())
        })
    });
}

criterion_group!(benches, bench_encode, bench_state_machine, bench_keyed_session);
criterion_main!(benches);
