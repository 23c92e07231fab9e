//! Common utilities for the audio demos.
//!
//! The demos follow the split the library is built around: the terminal
//! thread keeps the controller and acts as the control context, while the
//! `RenderLoop` is moved into the cpal callback.

use anyhow::Result;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, StreamConfig, SupportedStreamConfig};
use crossterm::{
    ExecutableCommand,
    event::{
        self, Event, KeyCode, KeyEvent, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use drone::RenderLoop;
use std::io::stdout;
use std::panic;
use std::time::Duration;

/// Frames rendered per pass inside the audio callback.
const SCRATCH_FRAMES: usize = 4096;

/// The default output device and its preferred configuration.
pub struct Output {
    device: cpal::Device,
    config: SupportedStreamConfig,
}

impl Output {
    /// Opens the default output device.
    pub fn open() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow::anyhow!("No output device available"))?;
        let config = device.default_output_config()?;
        log::info!(
            "output: {} Hz, {} channel(s), {}",
            config.sample_rate().0,
            config.channels(),
            config.sample_format()
        );
        Ok(Self { device, config })
    }

    /// Sample rate the oscillator must be built with.
    pub fn sample_rate(&self) -> f64 {
        self.config.sample_rate().0 as f64
    }

    /// Moves `renderer` into a running output stream.
    pub fn play(&self, renderer: RenderLoop) -> Result<cpal::Stream> {
        let config: StreamConfig = self.config.clone().into();
        match self.config.sample_format() {
            SampleFormat::F32 => create_audio_stream::<f32>(&self.device, &config, renderer),
            SampleFormat::I16 => create_audio_stream::<i16>(&self.device, &config, renderer),
            SampleFormat::U16 => create_audio_stream::<u16>(&self.device, &config, renderer),
            sample_format => Err(anyhow::anyhow!(
                "Unsupported sample format: {}",
                sample_format
            )),
        }
    }
}

/// Configuration for keyboard enhancements (needed for detecting key press/release).
#[allow(dead_code)]
#[derive(Default)]
pub struct KeyboardConfig {
    /// Enable keyboard enhancements (for press/release detection)
    pub enable_enhancements: bool,
}

/// Key handling result that controls the event loop
#[allow(dead_code)]
pub enum KeyAction {
    /// Continue the event loop
    Continue,
    /// Exit the event loop
    Exit,
}

/// Runs a terminal event loop on the control context.
///
/// Handles raw mode, the alternate screen and a panic hook that restores the
/// terminal. `key_handler` receives the control-side state mutably; audio keeps
/// running on the stream the caller holds.
#[allow(dead_code)]
pub fn run_interactive<S, F, K>(
    mut state: S,
    keyboard_config: KeyboardConfig,
    initial_ui: F,
    mut key_handler: K,
) -> Result<S>
where
    F: FnOnce(&S) -> Result<()>,
    K: FnMut(&mut S, &KeyEvent) -> Result<KeyAction>,
{
    // Keyboard enhancements MUST come before alternate screen
    if keyboard_config.enable_enhancements {
        stdout().execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))?;
    }

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(crossterm::cursor::Hide)?;

    let has_enhancements = keyboard_config.enable_enhancements;
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        cleanup_terminal(has_enhancements);
        original_hook(panic_info);
    }));

    initial_ui(&state)?;

    loop {
        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key_event) = event::read()?
        {
            match key_handler(&mut state, &key_event)? {
                KeyAction::Continue => {}
                KeyAction::Exit => break,
            }
        }
    }

    cleanup_terminal(keyboard_config.enable_enhancements);

    Ok(state)
}

/// Creates an output stream whose callback drives the render loop.
fn create_audio_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    mut renderer: RenderLoop,
) -> Result<cpal::Stream>
where
    T: Sample + FromSample<f32> + cpal::SizedSample,
{
    let channels = config.channels as usize;
    // Allocated once here, never inside the callback
    let mut scratch = vec![0.0_f32; SCRATCH_FRAMES * channels];

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            for chunk in data.chunks_mut(scratch.len()) {
                let scratch = &mut scratch[..chunk.len()];
                renderer.render_interleaved(scratch, channels);
                for (out, &sample) in chunk.iter_mut().zip(scratch.iter()) {
                    *out = T::from_sample(sample);
                }
            }
        },
        |err| log::error!("Audio stream error: {}", err),
        None,
    )?;

    stream.play()?;
    Ok(stream)
}

/// Cleans up terminal state (cursor, alternate screen, raw mode).
#[allow(dead_code)]
fn cleanup_terminal(has_keyboard_enhancements: bool) {
    if has_keyboard_enhancements {
        let _ = stdout().execute(PopKeyboardEnhancementFlags);
    }
    let _ = stdout().execute(crossterm::cursor::Show);
    let _ = stdout().execute(LeaveAlternateScreen);
    let _ = disable_raw_mode();
}

/// Helper to check if a key code is a quit key (Q, ESC).
#[allow(dead_code)]
pub fn is_quit_key(code: KeyCode) -> bool {
    matches!(code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
}
