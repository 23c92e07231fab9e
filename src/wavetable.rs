//! Single-cycle waveform tables with interpolated lookup.
//!
//! # Design Overview
//!
//! A `Wavetable` stores one cycle of a waveform as `f32` samples. Tables are
//! built and filled on the control side, then handed to the render side as an
//! immutable snapshot (see `WavetableController`). Nothing here allocates once
//! a table exists, so `lookup()` is safe to call from the audio callback.
//!
//! ## Lookup
//!
//! `lookup(phase)` maps a normalized phase in `[0, 1)` to the fractional index
//! `phase * len` and interpolates linearly between the two neighbouring
//! entries. The upper neighbour of the last entry is entry 0, so the cycle
//! loops seamlessly. At exact grid points the interpolation weight is zero and
//! the stored value comes back unchanged.
//!
//! Other modes are available through `lookup_with()`:
//!
//! - `None`: rounds to the nearest entry. Steps audibly; mostly for testing.
//! - `Linear`: the default. One multiply and add per sample.
//! - `Cubic`: 4-point Hermite. Smoother for small tables played slowly.
//!
//! ## Empty tables
//!
//! `Wavetable::default()` is empty and stands for "no waveform loaded yet".
//! Looking it up yields silence rather than panicking, which keeps the render
//! path infallible.

use crate::WaveformError;
use std::f64::consts::PI;

#[cfg(feature = "wavetable-loader")]
use std::path::Path;

/// Interpolation mode for wavetable playback.
///
/// Determines how fractional positions between wavetable samples are handled.
/// Higher quality modes provide smoother output but require more computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMode {
    /// No interpolation - round to nearest sample (lowest quality, fastest)
    None,
    /// Linear interpolation between adjacent samples (good quality/performance balance)
    #[default]
    Linear,
    /// Cubic (Hermite) interpolation using 4 points (highest quality, slowest)
    Cubic,
}

/// One cycle of a waveform.
///
/// # Examples
///
/// ```
/// use drone::Wavetable;
///
/// let mut table = Wavetable::new(4)?;
/// table.set_value(1.0, 1)?;
///
/// assert_eq!(table.lookup(0.25), 1.0);
/// assert_eq!(table.lookup(0.125), 0.5);
/// assert!(table.set_value(1.0, 4).is_err());
/// # Ok::<(), drone::WaveformError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wavetable {
    samples: Vec<f32>,
}

impl Wavetable {
    /// Allocates a zero-filled table of `size` samples.
    ///
    /// # Errors
    ///
    /// Returns `WaveformError::InvalidSize` if `size` is 0.
    pub fn new(size: usize) -> Result<Self, WaveformError> {
        if size < 1 {
            return Err(WaveformError::InvalidSize { size });
        }
        Ok(Self {
            samples: vec![0.0; size],
        })
    }

    /// Wraps an existing cycle of samples.
    ///
    /// # Errors
    ///
    /// Returns `WaveformError::InvalidSize` if `samples` is empty.
    pub fn from_samples(samples: Vec<f32>) -> Result<Self, WaveformError> {
        if samples.is_empty() {
            return Err(WaveformError::InvalidSize { size: 0 });
        }
        Ok(Self { samples })
    }

    /// Builds a table by sampling `f` at `size` evenly spaced phases in `[0, 1)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use drone::Wavetable;
    ///
    /// let ramp = Wavetable::from_function(4, |phase| phase)?;
    /// assert_eq!(ramp.samples(), &[0.0, 0.25, 0.5, 0.75]);
    /// # Ok::<(), drone::WaveformError>(())
    /// ```
    pub fn from_function<F>(size: usize, f: F) -> Result<Self, WaveformError>
    where
        F: Fn(f64) -> f64,
    {
        if size < 1 {
            return Err(WaveformError::InvalidSize { size });
        }

        let samples = (0..size)
            .map(|i| {
                let phase = i as f64 / size as f64;
                f(phase) as f32
            })
            .collect();

        Ok(Self { samples })
    }

    /// One cycle of a sine wave.
    pub fn sine(size: usize) -> Result<Self, WaveformError> {
        Self::from_function(size, |phase| (phase * 2.0 * PI).sin())
    }

    /// One cycle of a rising sawtooth from -1 to 1.
    pub fn saw(size: usize) -> Result<Self, WaveformError> {
        Self::from_function(size, |phase| 2.0 * phase - 1.0)
    }

    /// One cycle of a naive 50% square wave.
    pub fn square(size: usize) -> Result<Self, WaveformError> {
        Self::from_function(size, |phase| if phase < 0.5 { 1.0 } else { -1.0 })
    }

    /// One cycle of a triangle wave starting at -1.
    pub fn triangle(size: usize) -> Result<Self, WaveformError> {
        Self::from_function(size, |phase| {
            if phase < 0.5 {
                4.0 * phase - 1.0
            } else {
                -4.0 * phase + 3.0
            }
        })
    }

    /// Loads a wavetable from a WAV file (requires `wavetable-loader` feature).
    ///
    /// Reads the first channel of a mono or multi-channel WAV file and uses its
    /// samples as one cycle. Integer PCM is normalized to [-1.0, 1.0]. No sample
    /// rate conversion is performed.
    ///
    /// # Errors
    ///
    /// Returns `WaveformError::Wav` if the file cannot be decoded and
    /// `WaveformError::EmptyFile` if it has no samples.
    #[cfg(feature = "wavetable-loader")]
    pub fn from_wav_file<P: AsRef<Path>>(path: P) -> Result<Self, WaveformError> {
        let mut reader = hound::WavReader::open(path)?;
        let spec = reader.spec();

        let samples: Result<Vec<f32>, _> = match spec.sample_format {
            hound::SampleFormat::Float => reader.samples::<f32>().collect(),
            hound::SampleFormat::Int => {
                let max_value = (1_i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / max_value))
                    .collect()
            }
        };
        let samples = samples?;

        // Interleaved frames: keep every Nth sample (first channel)
        let channel_samples: Vec<f32> = if spec.channels > 1 {
            samples
                .iter()
                .step_by(spec.channels as usize)
                .copied()
                .collect()
        } else {
            samples
        };

        if channel_samples.is_empty() {
            return Err(WaveformError::EmptyFile);
        }

        log::debug!(
            "loaded {}-sample wavetable from WAV ({} channel(s), {} Hz)",
            channel_samples.len(),
            spec.channels,
            spec.sample_rate
        );
        Ok(Self {
            samples: channel_samples,
        })
    }

    /// Number of samples in the cycle.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True for the "nothing loaded" table.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The raw cycle.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Reads one entry, or `None` past the end.
    pub fn value(&self, index: usize) -> Option<f32> {
        self.samples.get(index).copied()
    }

    /// Stores one entry.
    ///
    /// # Errors
    ///
    /// Returns `WaveformError::IndexOutOfRange` if `index >= len()`.
    pub fn set_value(&mut self, value: f32, index: usize) -> Result<(), WaveformError> {
        let size = self.samples.len();
        match self.samples.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(WaveformError::IndexOutOfRange { index, size }),
        }
    }

    /// Linearly interpolated sample at `phase`.
    ///
    /// `phase` is expected in `[0, 1)`; other finite values are wrapped.
    /// Empty tables and non-finite phases return 0.
    #[inline]
    pub fn lookup(&self, phase: f64) -> f32 {
        self.lookup_with(phase, InterpolationMode::Linear)
    }

    /// Sample at `phase` using the given interpolation mode.
    #[inline]
    pub fn lookup_with(&self, phase: f64, mode: InterpolationMode) -> f32 {
        let table_size = self.samples.len();
        if table_size == 0 || !phase.is_finite() {
            return 0.0;
        }

        let position = (phase - phase.floor()) * table_size as f64;
        let base = position.floor();
        let frac = (position - base) as f32;
        // position can land on table_size when phase rounds up to 1.0
        let index = base as usize % table_size;

        match mode {
            InterpolationMode::None => {
                let index = (position.round() as usize) % table_size;
                self.samples[index]
            }
            InterpolationMode::Linear => {
                let sample0 = self.samples[index];
                let sample1 = self.samples[(index + 1) % table_size];

                sample0 + frac * (sample1 - sample0)
            }
            InterpolationMode::Cubic => {
                let index1 = index;
                let index0 = if index1 == 0 {
                    table_size - 1
                } else {
                    index1 - 1
                };
                let index2 = (index1 + 1) % table_size;
                let index3 = (index1 + 2) % table_size;

                let y0 = self.samples[index0];
                let y1 = self.samples[index1];
                let y2 = self.samples[index2];
                let y3 = self.samples[index3];

                // Hermite interpolation
                let c0 = y1;
                let c1 = 0.5 * (y2 - y0);
                let c2 = y0 - 2.5 * y1 + 2.0 * y2 - 0.5 * y3;
                let c3 = 0.5 * (y3 - y0) + 1.5 * (y1 - y2);

                c0 + frac * (c1 + frac * (c2 + frac * c3))
            }
        }
    }
}
