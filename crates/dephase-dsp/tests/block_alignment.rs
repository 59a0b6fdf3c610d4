//! Host buffer sizes must never change what the fixed-block stages produce.

use dephase_core::AudioBuffer;
use dephase_dsp::{FixedBlockRebuffer, OverlapAddEngine, Overlap, WolaKind, WolaWindows};
use dephase_midi::MidiEvent;
use proptest::prelude::*;

fn signal(len: usize) -> Vec<f32> {
    (0..len).map(|i| ((i * 37) % 101) as f32 / 50.0 - 1.0).collect()
}

/// Split `total` frames into host buffers cycling through `sizes`.
fn chunk_lengths(total: usize, sizes: &[usize]) -> Vec<usize> {
    let mut out = Vec::new();
    let mut left = total;
    for &size in sizes.iter().cycle() {
        if left == 0 {
            break;
        }
        let len = size.min(left);
        out.push(len);
        left -= len;
    }
    out
}

proptest! {
    #[test]
    fn rebuffer_delays_by_exactly_one_block(
        block_size in 1usize..300,
        sizes in prop::collection::vec(1usize..700, 1..8),
    ) {
        let total = block_size * 4 + 123;
        let input = signal(total);
        let mut rebuffer = FixedBlockRebuffer::new(1, block_size);
        let mut identity = |_: &mut AudioBuffer, _: &[MidiEvent], _: usize| {};

        let mut output = Vec::with_capacity(total);
        let mut pos = 0;
        for len in chunk_lengths(total, &sizes) {
            let mut io = AudioBuffer::from_mono(&input[pos..pos + len], 1);
            rebuffer.process(&mut io, &[], &mut identity);
            output.extend_from_slice(io.channel(0));
            pos += len;
        }

        for i in 0..total {
            let expected = if i < block_size { 0.0 } else { input[i - block_size] };
            prop_assert_eq!(output[i], expected);
        }
    }

    #[test]
    fn midi_lands_at_its_absolute_position(
        block_size in 1usize..128,
        sizes in prop::collection::vec(1usize..300, 1..6),
        positions in prop::collection::btree_set(0usize..1000, 0..20),
    ) {
        let total = 1000;
        let mut rebuffer = FixedBlockRebuffer::new(1, block_size);
        let mut blocks_seen = 0usize;
        let mut delivered = Vec::new();

        let mut pos = 0;
        for len in chunk_lengths(total, &sizes) {
            let events: Vec<MidiEvent> = positions
                .iter()
                .filter(|&&p| p >= pos && p < pos + len)
                .map(|&p| MidiEvent::note_on(p - pos, 0, (p % 128) as u8, 100))
                .collect();
            let mut io = AudioBuffer::new(1, len);
            rebuffer.process(
                &mut io,
                &events,
                &mut |_: &mut AudioBuffer, midi: &[MidiEvent], _: usize| {
                    for e in midi {
                        assert!(e.frame_offset < block_size);
                        delivered.push(blocks_seen * block_size + e.frame_offset);
                    }
                    blocks_seen += 1;
                },
            );
            pos += len;
        }

        let complete = blocks_seen * block_size;
        let expected: Vec<usize> = positions.iter().copied().filter(|&p| p < complete).collect();
        prop_assert_eq!(delivered, expected);
    }

    #[test]
    fn rectangular_wola_is_exact_for_any_host_size(
        hop in 1usize..64,
        quarter in any::<bool>(),
        sizes in prop::collection::vec(1usize..500, 1..6),
    ) {
        let overlap = if quarter { Overlap::ThreeQuarter } else { Overlap::Half };
        let frame = hop * overlap.factor();
        prop_assume!(frame >= 4);
        let mut engine =
            OverlapAddEngine::new(1, frame, WolaKind::new(WolaWindows::Rectangular, overlap));
        prop_assert_eq!(engine.latency(), frame);

        let total = frame * 6;
        let input = signal(total);
        let mut output = Vec::with_capacity(total);
        let mut identity = |_: &mut AudioBuffer, _: &[MidiEvent]| {};
        let mut pos = 0;
        for len in chunk_lengths(total, &sizes) {
            let mut io = AudioBuffer::from_mono(&input[pos..pos + len], 1);
            engine.process(&mut io, &[], &mut identity);
            output.extend_from_slice(io.channel(0));
            pos += len;
        }

        for i in frame..total {
            prop_assert!((output[i] - input[i - frame]).abs() < 1e-5);
        }
    }
}
