//! Lock-free parameter surface shared between the control and render contexts.
//!
//! Every field is an independent word-sized atomic. The control context
//! writes, the render context reads once per sample. No ordering is promised
//! between fields: a render may observe a new frequency together with an old
//! amplitude, which is inaudible for continuous audio parameters.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Default oscillator frequency in Hz.
pub const DEFAULT_FREQUENCY: f32 = 440.0;
/// Default linear output gain.
pub const DEFAULT_AMPLITUDE: f32 = 1.0;
/// Default detuning offset in Hz.
pub const DEFAULT_DETUNING: f32 = 0.0;
/// Default square-wave duty cycle.
pub const DEFAULT_PULSE_WIDTH: f32 = 0.5;

/// Narrowest duty cycle the square oscillator will render.
pub const MIN_PULSE_WIDTH: f32 = 0.01;
/// Widest duty cycle the square oscillator will render.
pub const MAX_PULSE_WIDTH: f32 = 0.99;

/// Playback state of an oscillator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OscillatorState {
    /// Renders silence; phase is held.
    #[default]
    Stopped,
    /// Renders the waveform.
    Playing,
}

/// Control-rate values read by the render loop.
///
/// Setters only store; they never validate or touch audio state. Values the
/// render path cannot use (pulse widths outside `(0, 1)`, NaN gains) are
/// sanitized when read through the `effective_*` helpers.
///
/// # Examples
///
/// ```
/// use drone::ParameterSurface;
///
/// let params = ParameterSurface::default();
/// params.set_frequency(220.0);
/// params.set_detuning(1.5);
/// assert_eq!(params.frequency(), 220.0);
/// assert_eq!(params.effective_frequency(), 221.5);
/// ```
#[derive(Debug)]
pub struct ParameterSurface {
    frequency: AtomicF32,
    amplitude: AtomicF32,
    detuning: AtomicF32,
    pulse_width: AtomicF32,
    playing: AtomicBool,
}

impl Default for ParameterSurface {
    fn default() -> Self {
        Self::new(
            DEFAULT_FREQUENCY,
            DEFAULT_AMPLITUDE,
            DEFAULT_DETUNING,
            DEFAULT_PULSE_WIDTH,
        )
    }
}

impl ParameterSurface {
    /// Creates a stopped surface with the given initial values.
    pub fn new(frequency: f32, amplitude: f32, detuning: f32, pulse_width: f32) -> Self {
        Self {
            frequency: AtomicF32::new(frequency),
            amplitude: AtomicF32::new(amplitude),
            detuning: AtomicF32::new(detuning),
            pulse_width: AtomicF32::new(pulse_width),
            playing: AtomicBool::new(false),
        }
    }

    /// Base frequency in Hz.
    #[inline]
    pub fn frequency(&self) -> f32 {
        self.frequency.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set_frequency(&self, frequency: f32) {
        self.frequency.store(frequency, Ordering::Relaxed)
    }

    /// Linear output gain.
    #[inline]
    pub fn amplitude(&self) -> f32 {
        self.amplitude.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set_amplitude(&self, amplitude: f32) {
        self.amplitude.store(amplitude, Ordering::Relaxed)
    }

    /// Frequency offset in Hz, added to the base frequency.
    #[inline]
    pub fn detuning(&self) -> f32 {
        self.detuning.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set_detuning(&self, detuning: f32) {
        self.detuning.store(detuning, Ordering::Relaxed)
    }

    /// Duty cycle as stored, possibly outside the renderable range.
    #[inline]
    pub fn pulse_width(&self) -> f32 {
        self.pulse_width.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set_pulse_width(&self, pulse_width: f32) {
        self.pulse_width.store(pulse_width, Ordering::Relaxed)
    }

    /// Stopped → Playing.
    ///
    /// Only flips the flag. Oscillators built through a controller should be
    /// started with `Playback::start` so pending waveform edits get published.
    #[inline]
    pub fn start(&self) {
        self.playing.store(true, Ordering::Release)
    }

    /// Playing → Stopped.
    #[inline]
    pub fn stop(&self) {
        self.playing.store(false, Ordering::Release)
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Acquire)
    }

    pub fn state(&self) -> OscillatorState {
        if self.is_playing() {
            OscillatorState::Playing
        } else {
            OscillatorState::Stopped
        }
    }

    /// Base frequency plus detuning, in Hz. Non-finite components count as 0.
    #[inline]
    pub fn effective_frequency(&self) -> f64 {
        finite_or_zero(self.frequency()) + finite_or_zero(self.detuning())
    }

    /// Amplitude with NaN and infinities replaced by silence.
    #[inline]
    pub fn effective_amplitude(&self) -> f32 {
        let amplitude = self.amplitude();
        if amplitude.is_finite() { amplitude } else { 0.0 }
    }

    /// Pulse width clamped to `[MIN_PULSE_WIDTH, MAX_PULSE_WIDTH]`; NaN falls back to 0.5.
    #[inline]
    pub fn effective_pulse_width(&self) -> f64 {
        let pulse_width = self.pulse_width();
        if pulse_width.is_nan() {
            return DEFAULT_PULSE_WIDTH as f64;
        }
        pulse_width.clamp(MIN_PULSE_WIDTH, MAX_PULSE_WIDTH) as f64
    }

    /// Fresh stopped surface carrying the same parameter values.
    pub fn duplicate(&self) -> Self {
        Self::new(
            self.frequency(),
            self.amplitude(),
            self.detuning(),
            self.pulse_width(),
        )
    }
}

#[inline]
fn finite_or_zero(value: f32) -> f64 {
    if value.is_finite() { value as f64 } else { 0.0 }
}

/// `f32` stored in an `AtomicU32` by bit pattern.
#[derive(Debug)]
struct AtomicF32(AtomicU32);

impl AtomicF32 {
    #[inline]
    fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    #[inline]
    fn store(&self, new_value: f32, order: Ordering) {
        self.0.store(new_value.to_bits(), order)
    }

    #[inline]
    fn load(&self, order: Ordering) -> f32 {
        f32::from_bits(self.0.load(order))
    }
}
