//! Lock-free parameter cells shared between the control and audio threads.
//!
//! Every cell is cache-line aligned so neighbouring parameters written by the
//! control thread never false-share with the audio thread's reads.

use crate::{AtomicBool, Ordering};
use atomic_float::AtomicF32;

macro_rules! atomic_cell {
    ($(#[$meta:meta])* $name:ident, $inner:ty, $prim:ty, $zero:expr) => {
        $(#[$meta])*
        #[derive(Debug)]
        #[repr(align(64))]
        pub struct $name {
            value: $inner,
        }

        impl $name {
            pub fn new(value: $prim) -> Self {
                Self {
                    value: <$inner>::new(value),
                }
            }

            #[inline]
            pub fn get(&self) -> $prim {
                self.value.load(Ordering::Acquire)
            }

            #[inline]
            pub fn set(&self, value: $prim) {
                self.value.store(value, Ordering::Release);
            }

            #[inline]
            pub fn swap(&self, value: $prim) -> $prim {
                self.value.swap(value, Ordering::AcqRel)
            }
        }

        impl Clone for $name {
            fn clone(&self) -> Self {
                Self::new(self.get())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new($zero)
            }
        }
    };
}

atomic_cell!(
    /// Atomic f32 for continuous parameters (dry/wet, band edges).
    AtomicFloat,
    AtomicF32,
    f32,
    0.0
);

atomic_cell!(
    /// Atomic bool for toggles (band mode).
    AtomicFlag,
    AtomicBool,
    bool,
    false
);
