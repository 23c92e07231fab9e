//! Drone - real-time oscillators for audio graphs
//!
//! This library renders two kinds of periodic waveforms for a host-driven
//! audio callback:
//! - a wavetable oscillator playing a user-supplied single cycle
//! - a band-limited square oscillator with adjustable pulse width
//!
//! Each oscillator is split into a controller, used from the control context
//! to set parameters, load waveforms and start/stop playback, and a
//! `RenderLoop` that the audio callback owns. The two halves share only
//! lock-free state, so the render path never blocks or allocates.
//!
//! ```
//! use drone::{OscillatorConfig, Playback, Wavetable};
//!
//! let (mut control, mut renderer) = drone::wavetable(OscillatorConfig::default());
//! control.load_waveform(Wavetable::sine(1024)?);
//! control.start();
//!
//! // In the audio callback:
//! let mut buffer = [0.0_f32; 512];
//! renderer.render(512, &mut buffer);
//! # Ok::<(), drone::WaveformError>(())
//! ```

mod config;
mod control;
pub mod core;
mod error;
pub mod oscillators;
mod params;
mod render;
mod swap;
mod wavetable;

// Re-export commonly used types at the crate root
pub use config::{DEFAULT_SAMPLE_RATE, OscillatorConfig, RestartMode};
pub use control::{Playback, SquareController, WavetableController, square, wavetable};
pub use crate::core::{AudioSignal, PhaseAccumulator, Signal};
pub use error::WaveformError;
pub use oscillators::{BandlimitedSquareOscillator, Oscillator, WavetableOscillator};
pub use params::{
    DEFAULT_AMPLITUDE, DEFAULT_DETUNING, DEFAULT_FREQUENCY, DEFAULT_PULSE_WIDTH, MAX_PULSE_WIDTH,
    MIN_PULSE_WIDTH, OscillatorState, ParameterSurface,
};
pub use render::{Generator, RenderLoop};
pub use swap::{TablePublisher, TableReader};
pub use wavetable::{InterpolationMode, Wavetable};
