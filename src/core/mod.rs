//! Core signal processing types and traits.
//!
//! This module provides the fundamental abstractions used throughout
//! the library:
//! - `Signal` trait for all sample sources
//! - `AudioSignal` trait for sample-rate-aware signals
//! - `PhaseAccumulator` for normalized oscillator phase

mod audio;
mod phase;
mod signal;

pub use audio::AudioSignal;
pub use phase::PhaseAccumulator;
pub use signal::Signal;
