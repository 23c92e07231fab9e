//! Normalized phase accumulator shared by every oscillator.

/// Tracks the position within one waveform cycle as a value in `[0.0, 1.0)`.
///
/// The phase is kept in `f64` even though samples are `f32`: a sustained tone
/// accumulates one rounding error per sample, and double precision keeps that
/// drift far below audibility for hours of playback.
///
/// `advance()` returns the phase *before* the increment is applied, so the
/// very first sample of a fresh accumulator is rendered at phase 0.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhaseAccumulator {
    phase: f64,
}

impl PhaseAccumulator {
    /// Creates an accumulator at phase 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an accumulator starting at `phase` (wrapped into `[0, 1)`).
    pub fn with_phase(phase: f64) -> Self {
        Self {
            phase: wrap(phase),
        }
    }

    /// Per-sample phase increment for `frequency` at `sample_rate`.
    ///
    /// Non-finite inputs and non-positive sample rates yield 0.
    #[inline]
    pub fn increment(frequency: f64, sample_rate: f64) -> f64 {
        let increment = frequency / sample_rate;
        if increment.is_finite() { increment } else { 0.0 }
    }

    /// Returns the current phase and moves one sample forward.
    ///
    /// The frequency may change on every call; each call yields exactly one
    /// phase value. Negative frequencies run the cycle backwards.
    ///
    /// # Examples
    ///
    /// ```
    /// use drone::PhaseAccumulator;
    ///
    /// let mut phase = PhaseAccumulator::new();
    /// assert_eq!(phase.advance(12_000.0, 48_000.0), 0.0);
    /// assert_eq!(phase.advance(12_000.0, 48_000.0), 0.25);
    /// assert_eq!(phase.phase(), 0.5);
    /// ```
    #[inline]
    pub fn advance(&mut self, frequency: f64, sample_rate: f64) -> f64 {
        let current = self.phase;
        self.phase = wrap(current + Self::increment(frequency, sample_rate));
        current
    }

    /// Phase of the next sample to be rendered.
    #[inline]
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Jumps to `phase` (wrapped into `[0, 1)`).
    pub fn set_phase(&mut self, phase: f64) {
        self.phase = wrap(phase);
    }

    /// Returns to phase 0.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

/// Positive-only modulo 1.
#[inline]
fn wrap(phase: f64) -> f64 {
    if !phase.is_finite() {
        return 0.0;
    }
    let wrapped = phase - phase.floor();
    // -epsilon - floor(-epsilon) rounds up to exactly 1.0
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circular_distance(a: f64, b: f64) -> f64 {
        let d = (a - b).abs();
        d.min(1.0 - d)
    }

    #[test]
    fn test_returns_phase_before_advancing() {
        let mut acc = PhaseAccumulator::new();
        assert_eq!(acc.advance(4800.0, 48000.0), 0.0);
        assert!((acc.advance(4800.0, 48000.0) - 0.1).abs() < 1e-12);
        assert!((acc.phase() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_wraps_into_unit_interval() {
        let mut acc = PhaseAccumulator::new();
        for _ in 0..100_000 {
            acc.advance(1234.5, 44100.0);
            assert!(acc.phase() >= 0.0 && acc.phase() < 1.0);
        }
    }

    #[test]
    fn test_zero_frequency_holds_phase() {
        let mut acc = PhaseAccumulator::with_phase(0.3);
        let first = acc.advance(0.0, 48000.0);
        let second = acc.advance(0.0, 48000.0);
        assert_eq!(first, second);
        assert_eq!(acc.phase(), 0.3);
    }

    #[test]
    fn test_negative_frequency_runs_backwards() {
        let mut acc = PhaseAccumulator::new();
        acc.advance(-4800.0, 48000.0);
        assert!((acc.phase() - 0.9).abs() < 1e-12);

        for _ in 0..1000 {
            acc.advance(-3000.0, 48000.0);
            assert!(acc.phase() >= 0.0 && acc.phase() < 1.0);
        }
    }

    #[test]
    fn test_tiny_negative_step_never_yields_one() {
        let mut acc = PhaseAccumulator::new();
        acc.advance(-1e-20, 1.0);
        assert!(acc.phase() < 1.0);
    }

    #[test]
    fn test_non_finite_input_is_ignored() {
        let mut acc = PhaseAccumulator::with_phase(0.5);
        acc.advance(f64::NAN, 48000.0);
        assert_eq!(acc.phase(), 0.5);
        acc.advance(440.0, 0.0);
        assert_eq!(acc.phase(), 0.5);
        acc.set_phase(f64::INFINITY);
        assert_eq!(acc.phase(), 0.0);
    }

    #[test]
    fn test_changing_frequency_every_sample() {
        let mut acc = PhaseAccumulator::new();
        let mut expected = 0.0_f64;
        for i in 0..10_000 {
            let freq = 100.0 + (i % 50) as f64 * 37.0;
            let got = acc.advance(freq, 48000.0);
            assert!(circular_distance(got, expected) < 1e-9);
            expected = (expected + freq / 48000.0).fract();
        }
    }

    #[test]
    fn test_long_run_drift_is_bounded() {
        let frequency = 440.0;
        let sample_rate = 48000.0;
        let steps: u64 = 10_000_000;

        let mut acc = PhaseAccumulator::new();
        for _ in 0..steps {
            acc.advance(frequency, sample_rate);
        }

        // steps * 440 / 48000 computed exactly in integers
        let cycles_numerator = steps * 440;
        let expected = (cycles_numerator % 48000) as f64 / 48000.0;
        assert!(
            circular_distance(acc.phase(), expected) < 1e-6,
            "phase {} drifted from {}",
            acc.phase(),
            expected
        );
    }

    #[test]
    fn test_reset() {
        let mut acc = PhaseAccumulator::new();
        for _ in 0..100 {
            acc.advance(440.0, 44100.0);
        }
        acc.reset();
        assert_eq!(acc.phase(), 0.0);
    }
}
