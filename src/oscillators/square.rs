//! Band-limited square/pulse oscillator.
//!
//! A naive square (`phase < width ? 1 : -1`) has infinitely steep edges and
//! folds harmonics above Nyquist back into the audible band. This oscillator
//! renders the naive wave and then adds a PolyBLEP (polynomial band-limited
//! step) residual at each of its two discontinuities:
//!
//! - the rising edge at phase 0, a step of +2
//! - the falling edge at phase = pulse width, a step of -2
//!
//! Each residual is a two-sample quadratic that smooths the step over one
//! phase increment on either side of the edge.

use super::Oscillator;
use crate::{AudioSignal, ParameterSurface, PhaseAccumulator, Signal};
use std::sync::Arc;

/// A square oscillator with adjustable pulse width and PolyBLEP anti-aliasing.
///
/// Pulse width is read from the parameter surface every sample and clamped to
/// `[0.01, 0.99]`, so degenerate zero-width pulses never occur.
///
/// # Examples
///
/// ```
/// use drone::{BandlimitedSquareOscillator, ParameterSurface, Signal};
/// use std::sync::Arc;
///
/// let params = Arc::new(ParameterSurface::default());
/// params.set_pulse_width(0.25);
/// params.start();
///
/// let mut osc = BandlimitedSquareOscillator::new(Arc::clone(&params), 44_100.0);
/// let sample = osc.next_sample();
/// assert!(sample.abs() <= 1.0);
/// ```
pub struct BandlimitedSquareOscillator {
    params: Arc<ParameterSurface>,
    phase: PhaseAccumulator,
    sample_rate: f64,
}

impl BandlimitedSquareOscillator {
    /// Creates a square oscillator at phase 0.
    ///
    /// # Arguments
    ///
    /// * `params` - Shared control surface
    /// * `sample_rate` - Sample rate in Hz, fixed for the oscillator's lifetime
    pub fn new(params: Arc<ParameterSurface>, sample_rate: f64) -> Self {
        Self {
            params,
            phase: PhaseAccumulator::new(),
            sample_rate,
        }
    }
}

impl Signal for BandlimitedSquareOscillator {
    #[inline]
    fn next_sample(&mut self) -> f32 {
        if !self.params.is_playing() {
            return 0.0;
        }

        let frequency = self.params.effective_frequency();
        let dt = PhaseAccumulator::increment(frequency, self.sample_rate).abs();
        let phase = self.phase.advance(frequency, self.sample_rate);
        let width = self.params.effective_pulse_width();

        let sample = bandlimited_pulse(phase, width, dt);
        sample as f32 * self.params.effective_amplitude()
    }
}

impl AudioSignal for BandlimitedSquareOscillator {
    fn sample_rate(&self) -> f64 {
        self.sample_rate
    }
}

impl Oscillator for BandlimitedSquareOscillator {
    fn params(&self) -> &ParameterSurface {
        &self.params
    }

    fn phase(&self) -> f64 {
        self.phase.phase()
    }

    fn reset(&mut self) {
        self.phase.reset();
    }
}

/// Naive pulse plus PolyBLEP residuals at both edges.
///
/// `phase` and `width` are in `[0, 1)`, `dt` is the absolute phase increment.
#[inline]
pub(crate) fn bandlimited_pulse(phase: f64, width: f64, dt: f64) -> f64 {
    let naive = if phase < width { 1.0 } else { -1.0 };

    let mut falling = phase - width;
    if falling < 0.0 {
        falling += 1.0;
    }

    naive + poly_blep(phase, dt) - poly_blep(falling, dt)
}

/// PolyBLEP residual for a unit upward step at `t = 0`.
///
/// Non-zero only within `dt` of the discontinuity on either side.
#[inline]
fn poly_blep(t: f64, dt: f64) -> f64 {
    if dt <= 0.0 {
        return 0.0;
    }

    if t < dt {
        // Just after the discontinuity
        let t = t / dt;
        2.0 * t - t * t - 1.0
    } else if t > 1.0 - dt {
        // Just before the discontinuity
        let t = (t - 1.0) / dt;
        t * t + 2.0 * t + 1.0
    } else {
        0.0
    }
}
