//! Plays a sine table, then swaps in a saw table while playing.

mod common;

use drone::{InterpolationMode, OscillatorConfig, Playback, Wavetable};
use std::thread;
use std::time::Duration;

fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let output = common::Output::open()?;
    let config = OscillatorConfig::default()
        .with_sample_rate(output.sample_rate())
        .with_frequency(220.0)
        .with_amplitude(0.3)
        .with_interpolation(InterpolationMode::Cubic);

    let (mut control, renderer) = drone::wavetable(config);
    control.load_waveform(Wavetable::sine(2048)?);
    let _stream = output.play(renderer)?;

    println!("Playing sine at 220 Hz...");
    control.start();
    thread::sleep(Duration::from_secs(2));

    println!("Swapping to saw...");
    control.load_waveform(Wavetable::saw(2048)?);
    thread::sleep(Duration::from_secs(2));

    println!("Detuning by +5 Hz...");
    control.params().set_detuning(5.0);
    thread::sleep(Duration::from_secs(2));

    control.stop();
    control.collect_garbage();
    // Let the callback pick up the stop before the stream is dropped
    thread::sleep(Duration::from_millis(100));
    println!("Done!");
    Ok(())
}
