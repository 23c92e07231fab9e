//! Construction-time configuration.

use crate::InterpolationMode;
use crate::params::{DEFAULT_AMPLITUDE, DEFAULT_DETUNING, DEFAULT_FREQUENCY, DEFAULT_PULSE_WIDTH};

/// Sample rate used when none is given.
pub const DEFAULT_SAMPLE_RATE: f64 = 48_000.0;

/// What happens to the phase when a stopped oscillator is started again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestartMode {
    /// Resume from the phase where playback stopped. No discontinuity in the
    /// waveform, so no click on resume.
    #[default]
    Continue,
    /// Restart every note from phase 0, so the waveform always begins at
    /// the same point of its cycle.
    Reset,
}

/// Settings fixed when an oscillator is built.
///
/// Initial parameter values seed the shared `ParameterSurface`; they can all
/// be changed later from the control context. Sample rate, restart mode and
/// interpolation cannot.
///
/// # Examples
///
/// ```
/// use drone::{OscillatorConfig, RestartMode};
///
/// let config = OscillatorConfig::default()
///     .with_sample_rate(44_100.0)
///     .with_frequency(220.0)
///     .with_restart_mode(RestartMode::Reset);
/// assert_eq!(config.sample_rate, 44_100.0);
/// assert_eq!(config.amplitude, 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorConfig {
    /// Sample rate in Hz.
    pub sample_rate: f64,
    /// Initial frequency in Hz.
    pub frequency: f32,
    /// Initial linear gain.
    pub amplitude: f32,
    /// Initial detuning offset in Hz.
    pub detuning: f32,
    /// Initial duty cycle (square oscillator only).
    pub pulse_width: f32,
    /// Phase behaviour on restart.
    pub restart: RestartMode,
    /// Table interpolation (wavetable oscillator only).
    pub interpolation: InterpolationMode,
}

impl Default for OscillatorConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            frequency: DEFAULT_FREQUENCY,
            amplitude: DEFAULT_AMPLITUDE,
            detuning: DEFAULT_DETUNING,
            pulse_width: DEFAULT_PULSE_WIDTH,
            restart: RestartMode::Continue,
            interpolation: InterpolationMode::Linear,
        }
    }
}

impl OscillatorConfig {
    /// Builder-style method to set the sample rate in Hz.
    pub fn with_sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Builder-style method to set the initial frequency in Hz.
    pub fn with_frequency(mut self, frequency: f32) -> Self {
        self.frequency = frequency;
        self
    }

    /// Builder-style method to set the initial linear gain.
    pub fn with_amplitude(mut self, amplitude: f32) -> Self {
        self.amplitude = amplitude;
        self
    }

    /// Builder-style method to set the initial detuning offset in Hz.
    pub fn with_detuning(mut self, detuning: f32) -> Self {
        self.detuning = detuning;
        self
    }

    /// Builder-style method to set the initial square-wave duty cycle.
    pub fn with_pulse_width(mut self, pulse_width: f32) -> Self {
        self.pulse_width = pulse_width;
        self
    }

    /// Builder-style method to set what `start()` does to the phase.
    pub fn with_restart_mode(mut self, restart: RestartMode) -> Self {
        self.restart = restart;
        self
    }

    /// Builder-style method to set the wavetable interpolation mode.
    pub fn with_interpolation(mut self, interpolation: InterpolationMode) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// True if the sample rate can drive a phase accumulator.
    pub fn has_valid_sample_rate(&self) -> bool {
        self.sample_rate.is_finite() && self.sample_rate > 0.0
    }
}
