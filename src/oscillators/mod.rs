//! Render-side oscillator implementations.
//!
//! This module contains the `Oscillator` trait and the two oscillator
//! variants: table lookup and band-limited square.

mod square;
mod traits;
mod wavetable;

pub use square::BandlimitedSquareOscillator;
pub use traits::Oscillator;
pub use wavetable::WavetableOscillator;
