//! Core trait definitions for oscillators.

use crate::{AudioSignal, ParameterSurface};

/// Common interface for the render-side oscillators.
///
/// An oscillator owns its phase and reads everything else from a shared
/// `ParameterSurface`. `next_sample()` (from `Signal`) is the per-sample
/// render step: it returns 0 and holds the phase while the surface says the
/// oscillator is stopped.
pub trait Oscillator: AudioSignal {
    /// The parameters this oscillator reads.
    fn params(&self) -> &ParameterSurface;

    /// Phase of the next sample, in `[0, 1)`.
    fn phase(&self) -> f64;

    /// Hook run once at the start of every render block, before any sample.
    ///
    /// Implementations pick up state published by the control context here.
    fn begin_block(&mut self) {}

    /// Resets the phase to zero.
    fn reset(&mut self);
}
