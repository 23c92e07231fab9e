//! Error types for waveform setup.
//!
//! Only the control context can fail. The render path has no error type and
//! degrades to silence instead.

use thiserror::Error;

/// Errors returned when allocating, filling or loading a wavetable.
#[derive(Debug, Error)]
pub enum WaveformError {
    /// A table must hold at least one sample.
    #[error("invalid wavetable size {size}: a wavetable needs at least one sample")]
    InvalidSize {
        /// The rejected size.
        size: usize,
    },

    /// The index does not address an entry of the current table.
    #[error("wavetable index {index} out of range for a table of {size} samples")]
    IndexOutOfRange {
        /// The rejected index.
        index: usize,
        /// Size of the table the write was aimed at.
        size: usize,
    },

    /// The WAV file could not be read.
    #[cfg(feature = "wavetable-loader")]
    #[error("failed to read WAV file: {0}")]
    Wav(#[from] hound::Error),

    /// The WAV file decoded fine but contained no samples.
    #[cfg(feature = "wavetable-loader")]
    #[error("WAV file contains no samples")]
    EmptyFile,
}
