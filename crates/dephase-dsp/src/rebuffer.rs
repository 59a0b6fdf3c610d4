//! Fixed-block rebuffering of host callbacks.
//!
//! Hosts hand over audio in whatever buffer size they like. [`FixedBlockRebuffer`]
//! collects it into blocks of exactly `block_size` frames, hands every completed
//! block to a [`BlockProcessor`], and plays the processed blocks back out with a
//! constant delay of `block_size` frames.
//!
//! MIDI events travel with the audio: each event is re-timed so its
//! `frame_offset` is relative to the block it lands in, even when that block was
//! started in an earlier host callback.

use dephase_core::AudioBuffer;
use dephase_midi::MidiEvent;

/// Receives completed fixed-size blocks.
pub trait BlockProcessor {
    /// Process `block` in place.
    ///
    /// `block_index` counts the blocks completed so far within the current host
    /// callback, starting at 0.
    fn process_block(&mut self, block: &mut AudioBuffer, midi: &[MidiEvent], block_index: usize);
}

impl<F> BlockProcessor for F
where
    F: FnMut(&mut AudioBuffer, &[MidiEvent], usize),
{
    #[inline]
    fn process_block(&mut self, block: &mut AudioBuffer, midi: &[MidiEvent], block_index: usize) {
        self(block, midi, block_index)
    }
}

/// Upper bound on MIDI events kept per block before the audio thread would
/// have to grow its queues.
const MIDI_QUEUE_CAPACITY: usize = 256;

/// Turns arbitrary host buffer sizes into fixed-size blocks.
///
/// Latency is exactly `block_size` frames. A block size of 0 switches to
/// direct passthrough: the processor sees each host buffer as-is and no delay
/// is added.
#[derive(Debug, Clone)]
pub struct FixedBlockRebuffer {
    block_size: usize,
    num_channels: usize,
    /// Block being filled from the input.
    block: AudioBuffer,
    /// Two blocks of processed output; the read cursor always trails the most
    /// recently written half by exactly one block.
    memory: AudioBuffer,
    in_counter: usize,
    out_counter: usize,
    /// Events of the partially filled block, already block-relative.
    pending_midi: Vec<MidiEvent>,
    block_midi: Vec<MidiEvent>,
}

impl FixedBlockRebuffer {
    pub fn new(num_channels: usize, block_size: usize) -> Self {
        let mut rebuffer = Self {
            block_size: 0,
            num_channels: 0,
            block: AudioBuffer::default(),
            memory: AudioBuffer::default(),
            in_counter: 0,
            out_counter: 0,
            pending_midi: Vec::with_capacity(MIDI_QUEUE_CAPACITY),
            block_midi: Vec::with_capacity(MIDI_QUEUE_CAPACITY),
        };
        rebuffer.configure(num_channels, block_size);
        rebuffer
    }

    /// Reset all state and reallocate for a new layout. Output restarts from
    /// silence.
    pub fn configure(&mut self, num_channels: usize, block_size: usize) {
        self.block_size = block_size;
        self.num_channels = num_channels;
        self.block.resize(num_channels, block_size);
        self.memory.resize(num_channels, 2 * block_size);
        self.in_counter = 0;
        self.out_counter = 0;
        self.pending_midi.clear();
        self.block_midi.clear();
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    #[inline]
    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    #[inline]
    pub fn is_passthrough(&self) -> bool {
        self.block_size == 0
    }

    /// Added delay in frames.
    #[inline]
    pub fn latency(&self) -> usize {
        self.block_size
    }

    /// Run one host callback through the rebuffer, replacing `io` with the
    /// delayed processed output.
    ///
    /// Channels of `io` beyond the configured count are left untouched. Event
    /// offsets past the end of `io` are treated as its last frame.
    pub fn process<P>(&mut self, io: &mut AudioBuffer, midi: &[MidiEvent], processor: &mut P)
    where
        P: BlockProcessor + ?Sized,
    {
        if self.block_size == 0 {
            processor.process_block(io, midi, 0);
            return;
        }

        let num_frames = io.num_frames();
        if num_frames == 0 {
            return;
        }
        let channels = io.num_channels().min(self.num_channels);
        let block_size = self.block_size;
        let last_frame = num_frames - 1;
        let mut blocks_done = 0;

        for frame in 0..num_frames {
            for ch in 0..channels {
                let input = io.channel(ch)[frame];
                self.block.channel_mut(ch)[self.in_counter] = input;
                io.channel_mut(ch)[frame] = self.memory.channel(ch)[self.out_counter];
            }

            self.in_counter += 1;
            if self.in_counter == block_size {
                self.in_counter = 0;

                // Host position of the completed block's first frame; negative
                // when the block began in an earlier callback.
                let block_start = frame as isize + 1 - block_size as isize;
                self.block_midi.clear();
                self.block_midi.append(&mut self.pending_midi);
                for event in midi {
                    let t = event.frame_offset.min(last_frame) as isize;
                    if t >= block_start.max(0) && t <= frame as isize {
                        self.block_midi.push(event.at((t - block_start) as usize));
                    }
                }

                processor.process_block(&mut self.block, &self.block_midi, blocks_done);
                blocks_done += 1;

                let dest = if self.out_counter < block_size {
                    block_size
                } else {
                    0
                };
                for ch in 0..self.num_channels {
                    self.memory.copy_from(ch, dest, &self.block, ch, 0, block_size);
                }
            }

            self.out_counter += 1;
            if self.out_counter == 2 * block_size {
                self.out_counter = 0;
            }
        }

        // Events belonging to the block still being filled. That block may
        // have started in an earlier callback, so its start can be negative.
        let partial_start = num_frames as isize - self.in_counter as isize;
        for event in midi {
            let t = event.frame_offset.min(last_frame) as isize;
            if t >= partial_start {
                self.pending_midi
                    .push(event.at((t - partial_start) as usize));
            }
        }
    }
}
