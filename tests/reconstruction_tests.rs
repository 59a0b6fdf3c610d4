//! Reconstruction and latency tests
//!
//! With the effect mixed fully dry, the analysis -> synthesis chain must give
//! back the input delayed by exactly one analysis block.

#[path = "helpers/mod.rs"]
mod helpers;

use dephase::prelude::*;
use helpers::tolerances::*;
use helpers::{
    assert_has_audio, assert_signals_equal, assert_silence, generate_noise, generate_sine,
    padded, run_mono, TEST_BUFFER_SIZE, TEST_SAMPLE_RATE,
};

const BLOCK_SIZES: [usize; 6] = [256, 512, 1024, 2048, 4096, 8192];

fn dry_effect(block_size: usize, wola: WolaKind) -> Dephase {
    let params = std::sync::Arc::new(PhaseParams::new());
    params.set_block_size(block_size);
    params.set_dry_wet(0.0);
    Dephase::builder()
        .sample_rate(TEST_SAMPLE_RATE)
        .channels(2)
        .wola(wola)
        .params(params)
        .seed(1)
        .build()
        .expect("Failed to create effect")
}

// =============================================================================
// Identity
// =============================================================================

#[test]
fn test_sqrt_hann_identity_delayed_by_block() {
    let block = 1024;
    let effect = dry_effect(block, WolaKind::default());
    let input = generate_sine(440.0, TEST_SAMPLE_RATE, 8 * block);
    let output = run_mono(&effect, &padded(&input, block), TEST_BUFFER_SIZE);

    assert_silence(&output[..block], FLOAT_EPSILON);
    assert_signals_equal(
        &output[block..],
        &input,
        hann_ripple(block),
        "sqrt-Hann 50% identity",
    );
    assert_has_audio(&output[block..], 0.5);
}

#[test]
fn test_rectangular_identity_is_exact() {
    for overlap in [Overlap::Half, Overlap::ThreeQuarter] {
        let block = 512;
        let effect = dry_effect(block, WolaKind::new(WolaWindows::Rectangular, overlap));
        let input = generate_noise(6 * block, 3);
        let output = run_mono(&effect, &padded(&input, block), 300);

        assert_signals_equal(
            &output[block..],
            &input,
            FLOAT_EPSILON,
            &format!("rectangular {:?}", overlap),
        );
    }
}

#[test]
fn test_every_variant_reconstructs() {
    let block = 1024;
    for kind in WolaKind::all() {
        let effect = dry_effect(block, kind);
        let input = generate_noise(6 * block, 9);
        let output = run_mono(&effect, &padded(&input, block), 441);
        assert_signals_equal(
            &output[block..],
            &input,
            hann_ripple(block),
            &format!("{:?}", kind),
        );
    }
}

// =============================================================================
// Latency
// =============================================================================

#[test]
fn test_reported_latency_matches_block_size() {
    for overlap in [Overlap::Half, Overlap::ThreeQuarter] {
        for block in BLOCK_SIZES {
            let effect = dry_effect(block, WolaKind::new(WolaWindows::SqrtHann, overlap));
            assert_eq!(effect.block_size(), block, "{:?}", overlap);
            assert_eq!(effect.latency_samples(), block, "{:?}", overlap);
        }
    }
}

#[test]
fn test_measured_latency_matches_reported() {
    for overlap in [Overlap::Half, Overlap::ThreeQuarter] {
        for block in BLOCK_SIZES {
            let effect = dry_effect(block, WolaKind::new(WolaWindows::Rectangular, overlap));
            let mut impulse = vec![0.0; 3 * block];
            impulse[0] = 1.0;
            let output = run_mono(&effect, &impulse, 1000);

            let arrival = output
                .iter()
                .position(|s| s.abs() > 0.5)
                .expect("impulse never arrived");
            assert_eq!(arrival, effect.latency_samples(), "{:?} {}", overlap, block);
        }
    }
}

// =============================================================================
// Dry/wet
// =============================================================================

#[test]
fn test_dry_wet_is_linear() {
    let block = 1024;
    let input = generate_noise(5 * block, 21);

    let render = |mix: f32| {
        let effect = dry_effect(block, WolaKind::default());
        effect.params().set_mode(PhaseMode::Zero);
        effect.params().set_dry_wet(mix);
        run_mono(&effect, &input, TEST_BUFFER_SIZE)
    };

    let dry = render(0.0);
    let wet = render(1.0);
    let mixed = render(0.3);

    let expected: Vec<f32> = dry
        .iter()
        .zip(&wet)
        .map(|(d, w)| 0.7 * d + 0.3 * w)
        .collect();
    assert_signals_equal(&mixed, &expected, DSP_EPSILON, "dryWet 0.3");
}

#[test]
fn test_host_buffer_size_does_not_change_output() {
    let input = generate_noise(8192, 5);
    let render = |buffer: usize| {
        let effect = dry_effect(1024, WolaKind::default());
        effect.params().set_dry_wet(1.0);
        effect.params().set_mode(PhaseMode::Flip);
        run_mono(&effect, &input, buffer)
    };

    let reference = render(64);
    for buffer in [1, 100, 512, 1777] {
        assert_signals_equal(
            &render(buffer),
            &reference,
            FLOAT_EPSILON,
            &format!("buffer {}", buffer),
        );
    }
}
