//! Control-context handles.
//!
//! Building an oscillator yields a controller and a `RenderLoop`. The
//! controller stays with the control context (UI, host main thread); the
//! render loop moves into the audio callback. They share only a
//! `ParameterSurface` and, for wavetables, a published table snapshot.
//!
//! ## Wavetable publishing
//!
//! `setup_waveform` and `set_waveform_value` edit a staging table owned by the
//! controller. The render side only ever sees whole published snapshots:
//!
//! - while stopped, edits accumulate and are published by `start()` (or by an
//!   explicit `commit_waveform()`)
//! - while playing, every edit is published immediately, costing one table copy

use crate::oscillators::{BandlimitedSquareOscillator, WavetableOscillator};
use crate::{
    Generator, OscillatorConfig, ParameterSurface, RenderLoop, TablePublisher, WaveformError,
    Wavetable,
};
use std::sync::Arc;

/// Start/stop lifecycle shared by both controllers.
pub trait Playback {
    /// The parameters shared with the render loop.
    ///
    /// Start and stop through `Playback`, not through the surface: a
    /// wavetable controller publishes staged waveform edits in `start()`.
    fn params(&self) -> &ParameterSurface;

    /// Stopped → Playing. Does not touch the phase.
    fn start(&mut self) {
        log::debug!("starting oscillator");
        self.params().start();
    }

    /// Playing → Stopped. Does not touch the phase.
    fn stop(&mut self) {
        log::debug!("stopping oscillator");
        self.params().stop();
    }

    fn is_playing(&self) -> bool {
        self.params().is_playing()
    }
}

/// Builds a wavetable oscillator with an empty table.
///
/// The oscillator renders silence until a waveform is set up and published.
///
/// # Examples
///
/// ```
/// use drone::{OscillatorConfig, Playback};
///
/// let (mut control, mut renderer) = drone::wavetable(OscillatorConfig::default());
/// control.setup_waveform(4)?;
/// control.set_waveform_value(1.0, 1)?;
/// control.set_waveform_value(-1.0, 3)?;
/// control.params().set_frequency(12_000.0);
/// control.start();
///
/// let mut buffer = [0.0_f32; 4];
/// renderer.render(4, &mut buffer);
/// assert_eq!(buffer, [0.0, 1.0, 0.0, -1.0]);
/// # Ok::<(), drone::WaveformError>(())
/// ```
pub fn wavetable(config: OscillatorConfig) -> (WavetableController, RenderLoop) {
    WavetableController::build(config, Wavetable::default())
}

/// Builds a band-limited square oscillator.
pub fn square(config: OscillatorConfig) -> (SquareController, RenderLoop) {
    warn_on_invalid_sample_rate(&config);
    let params = Arc::new(surface_from(&config));
    let osc = BandlimitedSquareOscillator::new(Arc::clone(&params), config.sample_rate);
    let renderer = RenderLoop::new(Generator::Square(osc), config.restart);

    log::debug!("built square oscillator at {} Hz sample rate", config.sample_rate);
    (SquareController { params, config }, renderer)
}

/// Control-context handle of a wavetable oscillator.
pub struct WavetableController {
    params: Arc<ParameterSurface>,
    config: OscillatorConfig,
    staging: Wavetable,
    dirty: bool,
    publisher: TablePublisher,
}

impl WavetableController {
    fn build(config: OscillatorConfig, table: Wavetable) -> (Self, RenderLoop) {
        warn_on_invalid_sample_rate(&config);
        let params = Arc::new(surface_from(&config));
        let publisher = TablePublisher::new(table.clone());
        let osc = WavetableOscillator::new(
            Arc::clone(&params),
            config.sample_rate,
            publisher.subscribe(),
        )
        .with_interpolation(config.interpolation);
        let renderer = RenderLoop::new(Generator::Wavetable(osc), config.restart);

        log::debug!(
            "built wavetable oscillator at {} Hz sample rate ({} samples loaded)",
            config.sample_rate,
            table.len()
        );
        let controller = Self {
            params,
            config,
            staging: table,
            dirty: false,
            publisher,
        };
        (controller, renderer)
    }

    /// Replaces the waveform with `size` zeros.
    ///
    /// # Errors
    ///
    /// Returns `WaveformError::InvalidSize` if `size` is 0; the current
    /// waveform is left untouched.
    pub fn setup_waveform(&mut self, size: usize) -> Result<(), WaveformError> {
        self.staging = Wavetable::new(size)?;
        log::debug!("set up {}-sample waveform", size);
        self.mark_dirty();
        Ok(())
    }

    /// Stores one waveform sample.
    ///
    /// # Errors
    ///
    /// Returns `WaveformError::IndexOutOfRange` if `index` is not below the
    /// size given to the last `setup_waveform`.
    pub fn set_waveform_value(&mut self, value: f32, index: usize) -> Result<(), WaveformError> {
        self.staging.set_value(value, index)?;
        self.mark_dirty();
        Ok(())
    }

    /// Replaces the waveform with a prebuilt table.
    pub fn load_waveform(&mut self, table: Wavetable) {
        log::debug!("loaded {}-sample waveform", table.len());
        self.staging = table;
        self.mark_dirty();
    }

    /// The waveform as edited so far, published or not.
    pub fn waveform(&self) -> &Wavetable {
        &self.staging
    }

    /// True if edits are waiting to be published.
    pub fn has_pending_changes(&self) -> bool {
        self.dirty
    }

    /// Publishes pending edits to the render loop.
    pub fn commit_waveform(&mut self) {
        if self.dirty {
            self.publisher.publish(self.staging.clone());
            self.dirty = false;
        } else {
            self.publisher.collect_garbage();
        }
    }

    /// Frees table snapshots the render loop has let go of.
    pub fn collect_garbage(&mut self) {
        self.publisher.collect_garbage();
    }

    /// Builds an independent, stopped oscillator with the same parameters and waveform.
    pub fn duplicate(&self) -> (WavetableController, RenderLoop) {
        log::debug!("duplicating wavetable oscillator");
        let config = config_from(&self.params, self.config);
        Self::build(config, self.staging.clone())
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
        if self.params.is_playing() {
            self.commit_waveform();
        }
    }
}

impl Playback for WavetableController {
    fn params(&self) -> &ParameterSurface {
        &self.params
    }

    fn start(&mut self) {
        self.commit_waveform();
        log::debug!("starting wavetable oscillator");
        self.params.start();
    }
}

/// Control-context handle of a band-limited square oscillator.
pub struct SquareController {
    params: Arc<ParameterSurface>,
    config: OscillatorConfig,
}

impl SquareController {
    /// Builds an independent, stopped oscillator with the same parameters.
    pub fn duplicate(&self) -> (SquareController, RenderLoop) {
        log::debug!("duplicating square oscillator");
        square(config_from(&self.params, self.config))
    }
}

impl Playback for SquareController {
    fn params(&self) -> &ParameterSurface {
        &self.params
    }
}

fn surface_from(config: &OscillatorConfig) -> ParameterSurface {
    ParameterSurface::new(
        config.frequency,
        config.amplitude,
        config.detuning,
        config.pulse_width,
    )
}

/// `base` with its initial values replaced by the live ones.
fn config_from(params: &ParameterSurface, base: OscillatorConfig) -> OscillatorConfig {
    let copy = params.duplicate();
    base.with_frequency(copy.frequency())
        .with_amplitude(copy.amplitude())
        .with_detuning(copy.detuning())
        .with_pulse_width(copy.pulse_width())
}

fn warn_on_invalid_sample_rate(config: &OscillatorConfig) {
    if !config.has_valid_sample_rate() {
        log::warn!(
            "sample rate {} cannot advance an oscillator; output will not move",
            config.sample_rate
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Oscillator;

    #[test]
    fn test_setup_waveform_rejects_zero_and_keeps_old_table() {
        let (mut control, _renderer) = wavetable(OscillatorConfig::default());
        control.setup_waveform(8).unwrap();
        control.set_waveform_value(0.5, 3).unwrap();

        assert!(matches!(
            control.setup_waveform(0),
            Err(WaveformError::InvalidSize { size: 0 })
        ));
        assert_eq!(control.waveform().len(), 8);
        assert_eq!(control.waveform().value(3), Some(0.5));
    }

    #[test]
    fn test_set_waveform_value_out_of_range() {
        let (mut control, _renderer) = wavetable(OscillatorConfig::default());
        control.setup_waveform(4).unwrap();
        assert!(matches!(
            control.set_waveform_value(1.0, 4),
            Err(WaveformError::IndexOutOfRange { index: 4, size: 4 })
        ));
    }

    #[test]
    fn test_value_without_setup_is_out_of_range() {
        let (mut control, _renderer) = wavetable(OscillatorConfig::default());
        assert!(matches!(
            control.set_waveform_value(1.0, 0),
            Err(WaveformError::IndexOutOfRange { index: 0, size: 0 })
        ));
    }

    #[test]
    fn test_edits_while_stopped_wait_for_start() {
        let (mut control, mut renderer) = wavetable(OscillatorConfig::default());
        control.setup_waveform(2).unwrap();
        assert!(control.has_pending_changes());

        let mut buffer = [0.0_f32; 4];
        renderer.render(4, &mut buffer);
        assert!(match renderer.generator() {
            Generator::Wavetable(osc) => osc.table().is_empty(),
            Generator::Square(_) => false,
        });

        control.start();
        assert!(!control.has_pending_changes());
        renderer.render(4, &mut buffer);
        assert!(match renderer.generator() {
            Generator::Wavetable(osc) => osc.table().len() == 2,
            Generator::Square(_) => false,
        });
    }

    #[test]
    fn test_surface_start_leaves_staged_edits_for_playback_start() {
        let (mut control, _renderer) = wavetable(OscillatorConfig::default());
        control.setup_waveform(4).unwrap();

        control.params().start();
        assert!(control.has_pending_changes());

        control.start();
        assert!(!control.has_pending_changes());
        assert!(control.is_playing());
    }

    #[test]
    fn test_edits_while_playing_publish_immediately() {
        let (mut control, mut renderer) = wavetable(OscillatorConfig::default());
        control.load_waveform(Wavetable::from_samples(vec![0.1]).unwrap());
        control.start();

        let mut buffer = [0.0_f32; 2];
        renderer.render(2, &mut buffer);
        assert!((buffer[0] - 0.1).abs() < 1e-6);

        control.set_waveform_value(0.9, 0).unwrap();
        assert!(!control.has_pending_changes());
        renderer.render(2, &mut buffer);
        assert!((buffer[0] - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_commit_waveform_publishes_while_stopped() {
        let (mut control, mut renderer) = wavetable(OscillatorConfig::default());
        control.setup_waveform(16).unwrap();
        control.commit_waveform();
        let mut buffer = [0.0_f32; 1];
        renderer.render(1, &mut buffer);
        assert!(match renderer.generator() {
            Generator::Wavetable(osc) => osc.table().len() == 16,
            Generator::Square(_) => false,
        });
        control.collect_garbage();
    }

    #[test]
    fn test_start_stop_is_playing() {
        let (mut control, _renderer) = square(OscillatorConfig::default());
        assert!(!control.is_playing());
        control.start();
        assert!(control.is_playing());
        control.stop();
        assert!(!control.is_playing());
    }

    #[test]
    fn test_config_seeds_parameters() {
        let config = OscillatorConfig::default()
            .with_frequency(110.0)
            .with_amplitude(0.25)
            .with_detuning(3.0)
            .with_pulse_width(0.3);
        let (control, renderer) = square(config);
        assert_eq!(control.params().frequency(), 110.0);
        assert_eq!(control.params().amplitude(), 0.25);
        assert_eq!(control.params().detuning(), 3.0);
        assert_eq!(control.params().pulse_width(), 0.3);
        assert_eq!(renderer.generator().params().frequency(), 110.0);
    }

    #[test]
    fn test_duplicate_is_independent() {
        let (mut control, _renderer) = square(OscillatorConfig::default());
        control.params().set_frequency(880.0);
        control.start();

        let (copy, _copy_renderer) = control.duplicate();
        assert_eq!(copy.params().frequency(), 880.0);
        assert!(!copy.is_playing());

        copy.params().set_frequency(100.0);
        assert_eq!(control.params().frequency(), 880.0);
    }

    #[test]
    fn test_duplicate_wavetable_carries_waveform() {
        let (mut control, _renderer) = wavetable(OscillatorConfig::default());
        control.setup_waveform(3).unwrap();
        control.set_waveform_value(0.7, 2).unwrap();

        let (mut copy, mut copy_renderer) = control.duplicate();
        assert_eq!(copy.waveform().value(2), Some(0.7));
        copy.params().set_frequency(0.0);
        copy.start();

        let mut buffer = [0.0_f32; 1];
        copy_renderer.render(1, &mut buffer);
        assert_eq!(buffer[0], 0.0);
        assert_eq!(copy_renderer.generator().phase(), 0.0);
    }
}
