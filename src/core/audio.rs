//! Audio signal trait for sample-rate-aware signals.

use super::Signal;

/// Common interface for anything that renders audio at a fixed sample rate.
///
/// The sample rate is supplied by the host when the oscillator is built and
/// never changes afterwards. Everything that turns a frequency in Hz into a
/// per-sample phase increment needs it.
///
/// # Examples
///
/// ```
/// use drone::{AudioSignal, OscillatorConfig};
///
/// let config = OscillatorConfig::default().with_sample_rate(44_100.0);
/// let (_control, renderer) = drone::square(config);
/// assert_eq!(renderer.sample_rate(), 44_100.0);
/// ```
pub trait AudioSignal: Signal {
    /// Gets the sample rate at which this audio is being generated.
    ///
    /// # Returns
    ///
    /// Sample rate in Hz (e.g., 44100.0 for CD quality)
    fn sample_rate(&self) -> f64;

    /// Nyquist frequency for this sample rate.
    fn nyquist(&self) -> f64 {
        self.sample_rate() * 0.5
    }
}
