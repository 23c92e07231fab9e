//! Wavetable oscillator for playback of arbitrary single-cycle waveforms.
//!
//! # Design Overview
//!
//! `WavetableOscillator` combines three pieces:
//!
//! 1. **Phase accumulator**: normalized `f64` phase advanced by
//!    `(frequency + detuning) / sample_rate` every sample.
//! 2. **Wavetable snapshot**: an immutable table received through a
//!    `TableReader`. The snapshot is refreshed once per render block, so a
//!    table swap never lands in the middle of a block.
//! 3. **Amplitude scaling**: the looked-up sample times the current gain.
//!
//! Frequency, amplitude and detuning are read from the shared
//! `ParameterSurface` on every sample, so control changes take effect on the
//! next rendered sample.
//!
//! Stopping does not reset the phase. A stopped oscillator returns 0 without
//! advancing, and resumes exactly where it left off when started again.
//!
//! ## Example Usage
//!
//! ```
//! use drone::{ParameterSurface, Signal, TablePublisher, Wavetable, WavetableOscillator};
//! use std::sync::Arc;
//!
//! let params = Arc::new(ParameterSurface::default());
//! let publisher = TablePublisher::new(Wavetable::sine(512).unwrap());
//! let mut osc = WavetableOscillator::new(Arc::clone(&params), 48_000.0, publisher.subscribe());
//!
//! assert_eq!(osc.next_sample(), 0.0); // stopped
//! params.start();
//! let mut buffer = [0.0_f32; 64];
//! osc.process(&mut buffer);
//! assert!(buffer.iter().any(|s| *s > 0.0));
//! ```

use super::Oscillator;
use crate::{
    AudioSignal, InterpolationMode, ParameterSurface, PhaseAccumulator, Signal, TableReader,
    Wavetable,
};
use std::sync::Arc;

/// A wavetable oscillator reading its table from a published snapshot.
pub struct WavetableOscillator {
    params: Arc<ParameterSurface>,
    phase: PhaseAccumulator,
    sample_rate: f64,
    table: TableReader,
    interpolation: InterpolationMode,
}

impl WavetableOscillator {
    /// Creates a wavetable oscillator at phase 0 with linear interpolation.
    ///
    /// # Arguments
    ///
    /// * `params` - Shared control surface
    /// * `sample_rate` - Sample rate in Hz, fixed for the oscillator's lifetime
    /// * `table` - Reader for the published wavetable
    pub fn new(params: Arc<ParameterSurface>, sample_rate: f64, table: TableReader) -> Self {
        Self {
            params,
            phase: PhaseAccumulator::new(),
            sample_rate,
            table,
            interpolation: InterpolationMode::Linear,
        }
    }

    /// Builder-style method to set interpolation mode.
    pub fn with_interpolation(mut self, mode: InterpolationMode) -> Self {
        self.interpolation = mode;
        self
    }

    /// Sets the interpolation mode.
    pub fn set_interpolation(&mut self, mode: InterpolationMode) {
        self.interpolation = mode;
    }

    /// Gets the current interpolation mode.
    pub fn interpolation(&self) -> InterpolationMode {
        self.interpolation
    }

    /// The table snapshot taken at the last block start.
    pub fn table(&self) -> &Wavetable {
        self.table.table()
    }
}

impl Signal for WavetableOscillator {
    #[inline]
    fn next_sample(&mut self) -> f32 {
        if !self.params.is_playing() {
            return 0.0;
        }

        let frequency = self.params.effective_frequency();
        let phase = self.phase.advance(frequency, self.sample_rate);
        let sample = self.table.table().lookup_with(phase, self.interpolation);

        sample * self.params.effective_amplitude()
    }
}

impl AudioSignal for WavetableOscillator {
    fn sample_rate(&self) -> f64 {
        self.sample_rate
    }
}

impl Oscillator for WavetableOscillator {
    fn params(&self) -> &ParameterSurface {
        &self.params
    }

    fn phase(&self) -> f64 {
        self.phase.phase()
    }

    #[inline]
    fn begin_block(&mut self) {
        self.table.refresh();
    }

    fn reset(&mut self) {
        self.phase.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TablePublisher;

    fn oscillator(
        table: Wavetable,
    ) -> (Arc<ParameterSurface>, TablePublisher, WavetableOscillator) {
        let params = Arc::new(ParameterSurface::default());
        let publisher = TablePublisher::new(table);
        let osc = WavetableOscillator::new(Arc::clone(&params), 48000.0, publisher.subscribe());
        (params, publisher, osc)
    }

    #[test]
    fn test_stopped_oscillator_is_silent_and_holds_phase() {
        let (params, _publisher, mut osc) = oscillator(Wavetable::square(64).unwrap());
        params.set_amplitude(5.0);
        for _ in 0..256 {
            assert_eq!(osc.next_sample(), 0.0);
        }
        assert_eq!(osc.phase(), 0.0);
    }

    #[test]
    fn test_amplitude_scales_lookup() {
        let (params, _publisher, mut osc) = oscillator(Wavetable::from_samples(vec![0.8]).unwrap());
        params.set_amplitude(0.5);
        params.start();
        assert!((osc.next_sample() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_detuning_adds_hz() {
        let (params, _publisher, mut osc) = oscillator(Wavetable::sine(256).unwrap());
        params.set_frequency(4000.0);
        params.set_detuning(800.0);
        params.start();
        osc.next_sample();
        assert!((osc.phase() - 4800.0 / 48000.0).abs() < 1e-12);
    }

    #[test]
    fn test_frequency_change_takes_effect_next_sample() {
        let (params, _publisher, mut osc) = oscillator(Wavetable::sine(256).unwrap());
        params.start();
        params.set_frequency(4800.0);
        osc.next_sample();
        params.set_frequency(9600.0);
        osc.next_sample();
        assert!((osc.phase() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_table_swap_is_seen_at_block_start() {
        let (params, mut publisher, mut osc) =
            oscillator(Wavetable::from_samples(vec![0.25]).unwrap());
        params.start();
        assert_eq!(osc.next_sample(), 0.25);

        publisher.publish(Wavetable::from_samples(vec![-0.5]).unwrap());
        assert_eq!(osc.next_sample(), 0.25);

        osc.begin_block();
        assert_eq!(osc.next_sample(), -0.5);
        assert_eq!(osc.table().len(), 1);
    }

    #[test]
    fn test_empty_table_renders_silence() {
        let (params, _publisher, mut osc) = oscillator(Wavetable::default());
        params.start();
        let mut buffer = [1.0_f32; 32];
        osc.process(&mut buffer);
        assert!(buffer.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_interpolation_mode() {
        let (params, _publisher, osc) =
            oscillator(Wavetable::from_samples(vec![0.0, 1.0]).unwrap());
        let mut osc = osc.with_interpolation(InterpolationMode::None);
        assert_eq!(osc.interpolation(), InterpolationMode::None);
        params.set_frequency(12000.0);
        params.start();
        // phases 0.0, 0.25: nearest entry is 0 then 1
        assert_eq!(osc.next_sample(), 0.0);
        assert_eq!(osc.next_sample(), 1.0);
        osc.set_interpolation(InterpolationMode::Linear);
        // phase 0.5 sits exactly on entry 1
        assert_eq!(osc.next_sample(), 1.0);
    }

    #[test]
    fn test_reset() {
        let (params, _publisher, mut osc) = oscillator(Wavetable::sine(64).unwrap());
        params.start();
        for _ in 0..100 {
            osc.next_sample();
        }
        osc.reset();
        assert_eq!(osc.phase(), 0.0);
    }
}
