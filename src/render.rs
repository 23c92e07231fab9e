//! Per-callback render driver.
//!
//! `RenderLoop` is what the host's audio callback owns. It is `Send`, never
//! allocates, never locks, and never fails: anything it cannot render becomes
//! silence.

use crate::oscillators::{BandlimitedSquareOscillator, Oscillator, WavetableOscillator};
use crate::{AudioSignal, ParameterSurface, RestartMode, Signal};

/// Samples per implicit block when the loop is driven through `next_sample()`.
const SAMPLE_BLOCK: usize = 64;

/// The oscillator variant chosen at construction.
pub enum Generator {
    Wavetable(WavetableOscillator),
    Square(BandlimitedSquareOscillator),
}

impl Signal for Generator {
    #[inline]
    fn next_sample(&mut self) -> f32 {
        match self {
            Generator::Wavetable(osc) => osc.next_sample(),
            Generator::Square(osc) => osc.next_sample(),
        }
    }
}

impl AudioSignal for Generator {
    fn sample_rate(&self) -> f64 {
        match self {
            Generator::Wavetable(osc) => osc.sample_rate(),
            Generator::Square(osc) => osc.sample_rate(),
        }
    }
}

impl Oscillator for Generator {
    fn params(&self) -> &ParameterSurface {
        match self {
            Generator::Wavetable(osc) => osc.params(),
            Generator::Square(osc) => osc.params(),
        }
    }

    fn phase(&self) -> f64 {
        match self {
            Generator::Wavetable(osc) => osc.phase(),
            Generator::Square(osc) => osc.phase(),
        }
    }

    #[inline]
    fn begin_block(&mut self) {
        match self {
            Generator::Wavetable(osc) => osc.begin_block(),
            Generator::Square(osc) => osc.begin_block(),
        }
    }

    fn reset(&mut self) {
        match self {
            Generator::Wavetable(osc) => osc.reset(),
            Generator::Square(osc) => osc.reset(),
        }
    }
}

/// Fills output buffers from one oscillator.
///
/// Restart detection for `RestartMode::Reset` happens at block granularity: a
/// stop and start that both land between two callbacks are not seen.
///
/// Hosts that pull one sample at a time through `Signal::next_sample()` get
/// implicit blocks of 64 samples; published tables and restarts are picked up
/// at the start of each.
pub struct RenderLoop {
    generator: Generator,
    restart: RestartMode,
    was_playing: bool,
    block_remaining: usize,
}

impl RenderLoop {
    pub fn new(generator: Generator, restart: RestartMode) -> Self {
        Self {
            generator,
            restart,
            was_playing: false,
            block_remaining: 0,
        }
    }

    /// Renders `frame_count` mono samples into the front of `output`.
    ///
    /// At most `output.len()` frames are written. A stopped oscillator writes
    /// zeros.
    ///
    /// # Examples
    ///
    /// ```
    /// use drone::{OscillatorConfig, Playback};
    ///
    /// let (mut control, mut renderer) = drone::square(OscillatorConfig::default());
    /// let mut buffer = [1.0_f32; 256];
    ///
    /// renderer.render(256, &mut buffer);
    /// assert!(buffer.iter().all(|&s| s == 0.0));
    ///
    /// control.start();
    /// renderer.render(256, &mut buffer);
    /// assert!(buffer.iter().any(|&s| s != 0.0));
    /// ```
    pub fn render(&mut self, frame_count: usize, output: &mut [f32]) {
        let frames = frame_count.min(output.len());
        let output = &mut output[..frames];

        if !self.begin_block() {
            output.fill(0.0);
            return;
        }

        for sample in output.iter_mut() {
            *sample = self.generator.next_sample();
        }
    }

    /// Renders interleaved frames, copying each mono sample to every channel.
    ///
    /// A trailing partial frame is zeroed.
    pub fn render_interleaved(&mut self, output: &mut [f32], channels: usize) {
        if channels == 0 {
            return;
        }

        if !self.begin_block() {
            output.fill(0.0);
            return;
        }

        let mut frames = output.chunks_exact_mut(channels);
        for frame in &mut frames {
            frame.fill(self.generator.next_sample());
        }
        frames.into_remainder().fill(0.0);
    }

    /// The oscillator being driven.
    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    pub fn restart_mode(&self) -> RestartMode {
        self.restart
    }

    /// Block prologue: picks up published state and handles restarts.
    /// Returns whether the oscillator is playing.
    #[inline]
    fn begin_block(&mut self) -> bool {
        // Sample-by-sample callers open a fresh block after any explicit one
        self.block_remaining = 0;
        self.generator.begin_block();

        let playing = self.generator.params().is_playing();
        if playing && !self.was_playing && self.restart == RestartMode::Reset {
            self.generator.reset();
        }
        self.was_playing = playing;
        playing
    }
}

impl Signal for RenderLoop {
    #[inline]
    fn next_sample(&mut self) -> f32 {
        if self.block_remaining == 0 {
            self.begin_block();
            self.block_remaining = SAMPLE_BLOCK;
        }
        self.block_remaining -= 1;
        self.generator.next_sample()
    }

    fn process(&mut self, buffer: &mut [f32]) {
        self.render(buffer.len(), buffer);
    }
}

impl AudioSignal for RenderLoop {
    fn sample_rate(&self) -> f64 {
        self.generator.sample_rate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TablePublisher, Wavetable};
    use std::sync::Arc;

    fn square_loop(restart: RestartMode) -> (Arc<ParameterSurface>, RenderLoop) {
        let params = Arc::new(ParameterSurface::default());
        let osc = BandlimitedSquareOscillator::new(Arc::clone(&params), 48000.0);
        (params, RenderLoop::new(Generator::Square(osc), restart))
    }

    #[test]
    fn test_stopped_fills_silence() {
        let (params, mut renderer) = square_loop(RestartMode::Continue);
        params.set_amplitude(1.0);
        let mut buffer = vec![0.7_f32; 128];
        renderer.render(128, &mut buffer);
        assert!(buffer.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_frame_count_limits_written_samples() {
        let (params, mut renderer) = square_loop(RestartMode::Continue);
        params.start();
        let mut buffer = vec![9.0_f32; 64];
        renderer.render(16, &mut buffer);
        assert!(buffer[..16].iter().all(|&s| s.abs() <= 1.0));
        assert!(buffer[16..].iter().all(|&s| s == 9.0));
    }

    #[test]
    fn test_frame_count_larger_than_buffer_is_clamped() {
        let (params, mut renderer) = square_loop(RestartMode::Continue);
        params.start();
        let mut buffer = vec![0.0_f32; 8];
        renderer.render(1024, &mut buffer);
        assert!((renderer.generator().phase() - 8.0 * 440.0 / 48000.0).abs() < 1e-12);
    }

    #[test]
    fn test_stop_mid_block_silences_the_rest() {
        let (params, mut renderer) = square_loop(RestartMode::Continue);
        params.start();
        let mut buffer = [0.0_f32; 4];
        renderer.render(4, &mut buffer);
        params.stop();
        assert_eq!(renderer.next_sample(), 0.0);
    }

    #[test]
    fn test_continue_mode_keeps_phase_across_restart() {
        let (params, mut renderer) = square_loop(RestartMode::Continue);
        let mut buffer = [0.0_f32; 100];
        params.start();
        renderer.render(100, &mut buffer);
        let phase = renderer.generator().phase();

        params.stop();
        renderer.render(100, &mut buffer);
        params.start();
        renderer.render(0, &mut buffer);
        assert_eq!(renderer.generator().phase(), phase);
    }

    #[test]
    fn test_reset_mode_restarts_from_zero() {
        let (params, mut renderer) = square_loop(RestartMode::Reset);
        let mut buffer = [0.0_f32; 100];
        params.start();
        renderer.render(100, &mut buffer);
        assert!(renderer.generator().phase() > 0.0);

        params.stop();
        renderer.render(100, &mut buffer);
        params.start();
        renderer.render(0, &mut buffer);
        assert_eq!(renderer.generator().phase(), 0.0);
        assert_eq!(renderer.restart_mode(), RestartMode::Reset);
    }

    #[test]
    fn test_interleaved_duplicates_frames() {
        let (params, mut renderer) = square_loop(RestartMode::Continue);
        params.start();
        let mut buffer = [5.0_f32; 9];
        renderer.render_interleaved(&mut buffer, 2);
        for frame in buffer[..8].chunks(2) {
            assert_eq!(frame[0], frame[1]);
        }
        assert_eq!(buffer[8], 0.0);
        assert!((renderer.generator().phase() - 4.0 * 440.0 / 48000.0).abs() < 1e-12);
    }

    #[test]
    fn test_interleaved_zero_channels_is_a_no_op() {
        let (params, mut renderer) = square_loop(RestartMode::Continue);
        params.start();
        let mut buffer = [5.0_f32; 4];
        renderer.render_interleaved(&mut buffer, 0);
        assert_eq!(buffer, [5.0; 4]);
    }

    fn wavetable_loop(restart: RestartMode) -> (Arc<ParameterSurface>, TablePublisher, RenderLoop) {
        let params = Arc::new(ParameterSurface::default());
        let publisher = TablePublisher::new(Wavetable::default());
        let osc = WavetableOscillator::new(Arc::clone(&params), 48000.0, publisher.subscribe());
        let renderer = RenderLoop::new(Generator::Wavetable(osc), restart);
        (params, publisher, renderer)
    }

    #[test]
    fn test_next_sample_picks_up_published_table() {
        let (params, mut publisher, mut renderer) = wavetable_loop(RestartMode::Continue);
        publisher.publish(Wavetable::from_samples(vec![0.5]).unwrap());
        params.start();

        for _ in 0..8 {
            assert_eq!(renderer.next_sample(), 0.5);
        }
    }

    #[test]
    fn test_next_sample_refreshes_every_implicit_block() {
        let (params, mut publisher, mut renderer) = wavetable_loop(RestartMode::Continue);
        publisher.publish(Wavetable::from_samples(vec![0.5]).unwrap());
        params.start();
        assert_eq!(renderer.next_sample(), 0.5);

        publisher.publish(Wavetable::from_samples(vec![-0.25]).unwrap());
        let samples: Vec<f32> = (0..SAMPLE_BLOCK).map(|_| renderer.next_sample()).collect();
        assert!(samples[..SAMPLE_BLOCK - 1].iter().all(|&s| s == 0.5));
        assert_eq!(samples[SAMPLE_BLOCK - 1], -0.25);
    }

    #[test]
    fn test_next_sample_after_render_opens_new_block() {
        let (params, mut publisher, mut renderer) = wavetable_loop(RestartMode::Continue);
        params.start();
        let mut buffer = [0.0_f32; 16];
        renderer.render(16, &mut buffer);
        assert!(buffer.iter().all(|&s| s == 0.0));

        publisher.publish(Wavetable::from_samples(vec![0.75]).unwrap());
        assert_eq!(renderer.next_sample(), 0.75);
    }

    #[test]
    fn test_next_sample_detects_reset_restart() {
        let (params, mut renderer) = square_loop(RestartMode::Reset);
        params.start();
        for _ in 0..SAMPLE_BLOCK {
            renderer.next_sample();
        }
        assert!(renderer.generator().phase() > 0.0);

        params.stop();
        for _ in 0..SAMPLE_BLOCK {
            assert_eq!(renderer.next_sample(), 0.0);
        }
        params.start();
        let first = renderer.next_sample();
        assert_eq!(first, 0.0);
        assert!((renderer.generator().phase() - 440.0 / 48000.0).abs() < 1e-12);
    }

    #[test]
    fn test_render_loop_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<RenderLoop>();
    }
}
