//! Core signal trait.
//!
//! This module provides the fundamental `Signal` trait that represents
//! anything that can generate audio samples one at a time or in blocks.

/// Common interface for all sample sources.
///
/// This trait defines the core functionality for anything that can generate
/// audio samples: the two oscillator variants and the render loop that
/// drives them.
///
/// The trait provides two fundamental operations:
/// - Single sample generation via `next_sample()`
/// - Batch processing via `process()`
pub trait Signal {
    /// Generates the next sample from the signal.
    ///
    /// # Returns
    ///
    /// A sample value, typically between -1.0 and 1.0 for audio signals
    fn next_sample(&mut self) -> f32;

    /// Generates multiple samples into a buffer.
    ///
    /// Default implementation calls `next_sample()` for each element.
    /// Implementors may override this for more efficient batch processing.
    ///
    /// # Arguments
    ///
    /// * `buffer` - Mutable slice to fill with samples
    fn process(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }
}

/// Implementation of `Signal` for `f32` representing a constant signal value.
///
/// Handy as a DC source in tests.
///
/// # Examples
///
/// ```
/// use drone::Signal;
///
/// let mut constant = 0.5_f32;
/// assert_eq!(constant.next_sample(), 0.5);
///
/// let mut buffer = vec![0.0; 4];
/// constant.process(&mut buffer);
/// assert_eq!(buffer, vec![0.5, 0.5, 0.5, 0.5]);
/// ```
impl Signal for f32 {
    fn next_sample(&mut self) -> f32 {
        *self
    }

    fn process(&mut self, buffer: &mut [f32]) {
        buffer.fill(*self);
    }
}
