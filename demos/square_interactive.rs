//! Interactive band-limited square oscillator.
//!
//! Controls:
//! - SPACE: Start/stop
//! - UP/DOWN arrows: Frequency up/down one semitone
//! - LEFT/RIGHT arrows: Pulse width -/+ 0.05
//! - D: Cycle detuning (0, +3, -3 Hz)
//! - Q or ESC: Quit

mod common;

use anyhow::Result;
use common::{KeyAction, KeyboardConfig, is_quit_key, run_interactive};
use crossterm::{
    ExecutableCommand,
    event::{KeyCode, KeyEvent, KeyEventKind},
};
use drone::{OscillatorConfig, Playback, SquareController};
use std::io::{Write, stdout};

const SEMITONE: f32 = 1.059_463_1;

fn draw_ui(control: &SquareController) -> Result<()> {
    let params = control.params();
    let mut stdout = stdout();
    stdout.execute(crossterm::terminal::Clear(
        crossterm::terminal::ClearType::All,
    ))?;
    stdout.execute(crossterm::cursor::MoveTo(0, 0))?;

    write!(stdout, "=== Band-limited Square ===\r\n")?;
    write!(stdout, "\r\n")?;
    write!(
        stdout,
        "Status: {}\r\n",
        if control.is_playing() {
            "▶ PLAYING"
        } else {
            "⏸ STOPPED"
        }
    )?;
    write!(stdout, "Frequency: {:.2} Hz\r\n", params.frequency())?;
    write!(stdout, "Detuning: {:+.1} Hz\r\n", params.detuning())?;
    write!(stdout, "Pulse width: {:.2}\r\n", params.pulse_width())?;
    write!(stdout, "\r\n")?;
    write!(stdout, "Controls:\r\n")?;
    write!(stdout, "  SPACE       - Start/stop\r\n")?;
    write!(stdout, "  UP/DOWN     - Frequency (±1 semitone)\r\n")?;
    write!(stdout, "  LEFT/RIGHT  - Pulse width (±0.05)\r\n")?;
    write!(stdout, "  D           - Cycle detuning\r\n")?;
    write!(stdout, "  Q/ESC       - Quit\r\n")?;

    stdout.flush()?;
    Ok(())
}

fn handle_key(control: &mut SquareController, key_event: &KeyEvent) -> Result<KeyAction> {
    if key_event.kind != KeyEventKind::Press {
        return Ok(KeyAction::Continue);
    }

    let params = control.params();
    match key_event.code {
        KeyCode::Char(' ') => {
            if control.is_playing() {
                control.stop();
            } else {
                control.start();
            }
        }
        KeyCode::Up => params.set_frequency((params.frequency() * SEMITONE).min(8_000.0)),
        KeyCode::Down => params.set_frequency((params.frequency() / SEMITONE).max(20.0)),
        KeyCode::Right => params.set_pulse_width((params.pulse_width() + 0.05).min(0.95)),
        KeyCode::Left => params.set_pulse_width((params.pulse_width() - 0.05).max(0.05)),
        KeyCode::Char('d') | KeyCode::Char('D') => {
            let next = match params.detuning() {
                d if d == 0.0 => 3.0,
                d if d > 0.0 => -3.0,
                _ => 0.0,
            };
            params.set_detuning(next);
        }
        code if is_quit_key(code) => return Ok(KeyAction::Exit),
        _ => return Ok(KeyAction::Continue),
    }

    draw_ui(control)?;
    Ok(KeyAction::Continue)
}

fn main() -> Result<()> {
    env_logger::init();

    let output = common::Output::open()?;
    let config = OscillatorConfig::default()
        .with_sample_rate(output.sample_rate())
        .with_frequency(110.0)
        .with_amplitude(0.25);

    let (control, renderer) = drone::square(config);
    let _stream = output.play(renderer)?;

    let mut control = run_interactive(control, KeyboardConfig::default(), draw_ui, handle_key)?;
    control.stop();
    Ok(())
}
