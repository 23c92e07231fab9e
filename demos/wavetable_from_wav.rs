//! Loads a single-cycle WAV file as a wavetable and plays it.
//!
//! Usage: `cargo run --example wavetable_from_wav --features wavetable-loader -- <file.wav>`
//!
//! Controls:
//! - SPACE: Start/stop
//! - UP/DOWN arrows: Adjust pitch (±100 cents)
//! - LEFT/RIGHT arrows: Adjust pitch (±10 cents)
//! - R: Reset pitch to 0
//! - Q or ESC: Quit

mod common;

use anyhow::Result;
use common::{KeyAction, KeyboardConfig, is_quit_key, run_interactive};
use crossterm::{
    ExecutableCommand,
    event::{KeyCode, KeyEvent, KeyEventKind},
};
use drone::{InterpolationMode, OscillatorConfig, Playback, Wavetable, WavetableController};
use std::io::{Write, stdout};

const BASE_FREQUENCY: f64 = 110.0;

struct ControlState {
    control: WavetableController,
    path: String,
    pitch_offset_cents: i32,
}

impl ControlState {
    fn adjust_pitch(&mut self, cents: i32) {
        self.pitch_offset_cents = (self.pitch_offset_cents + cents).clamp(-2400, 2400);
        self.update_frequency();
    }

    fn reset_pitch(&mut self) {
        self.pitch_offset_cents = 0;
        self.update_frequency();
    }

    fn update_frequency(&mut self) {
        // freq = base_freq * 2^(cents/1200)
        let multiplier = 2.0_f64.powf(self.pitch_offset_cents as f64 / 1200.0);
        self.control
            .params()
            .set_frequency((BASE_FREQUENCY * multiplier) as f32);
    }
}

fn draw_ui(state: &ControlState) -> Result<()> {
    let mut stdout = stdout();
    stdout.execute(crossterm::terminal::Clear(
        crossterm::terminal::ClearType::All,
    ))?;
    stdout.execute(crossterm::cursor::MoveTo(0, 0))?;

    write!(stdout, "=== Wavetable from WAV File ===\r\n")?;
    write!(stdout, "\r\n")?;
    write!(
        stdout,
        "File: {} ({} samples)\r\n",
        state.path,
        state.control.waveform().len()
    )?;
    write!(stdout, "\r\n")?;
    write!(
        stdout,
        "Status: {}\r\n",
        if state.control.is_playing() {
            "▶ PLAYING"
        } else {
            "⏸ STOPPED"
        }
    )?;
    write!(
        stdout,
        "Pitch: {:+} cents ({:.2} Hz)\r\n",
        state.pitch_offset_cents,
        state.control.params().frequency()
    )?;
    write!(stdout, "\r\n")?;
    write!(stdout, "Controls:\r\n")?;
    write!(stdout, "  SPACE       - Start/stop\r\n")?;
    write!(stdout, "  UP/DOWN     - Adjust pitch (±100 cents)\r\n")?;
    write!(stdout, "  LEFT/RIGHT  - Adjust pitch (±10 cents)\r\n")?;
    write!(stdout, "  R           - Reset pitch to 0\r\n")?;
    write!(stdout, "  Q/ESC       - Quit\r\n")?;

    stdout.flush()?;
    Ok(())
}

fn handle_key(state: &mut ControlState, key_event: &KeyEvent) -> Result<KeyAction> {
    if key_event.kind != KeyEventKind::Press {
        return Ok(KeyAction::Continue);
    }

    match key_event.code {
        KeyCode::Char(' ') => {
            if state.control.is_playing() {
                state.control.stop();
            } else {
                state.control.start();
            }
        }
        KeyCode::Up => state.adjust_pitch(100),
        KeyCode::Down => state.adjust_pitch(-100),
        KeyCode::Right => state.adjust_pitch(10),
        KeyCode::Left => state.adjust_pitch(-10),
        KeyCode::Char('r') | KeyCode::Char('R') => state.reset_pitch(),
        code if is_quit_key(code) => return Ok(KeyAction::Exit),
        _ => return Ok(KeyAction::Continue),
    }

    state.control.collect_garbage();
    draw_ui(state)?;
    Ok(KeyAction::Continue)
}

fn main() -> Result<()> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: wavetable_from_wav <file.wav>"))?;
    let table = Wavetable::from_wav_file(&path)
        .map_err(|e| anyhow::anyhow!("Failed to load WAV file: {}", e))?;

    let output = common::Output::open()?;
    let config = OscillatorConfig::default()
        .with_sample_rate(output.sample_rate())
        .with_frequency(BASE_FREQUENCY as f32)
        .with_amplitude(0.5)
        .with_interpolation(InterpolationMode::Cubic);

    let (mut control, renderer) = drone::wavetable(config);
    control.load_waveform(table);
    let _stream = output.play(renderer)?;

    let state = ControlState {
        control,
        path,
        pitch_offset_cents: 0,
    };
    let mut state = run_interactive(state, KeyboardConfig::default(), draw_ui, handle_key)?;
    state.control.stop();
    Ok(())
}
