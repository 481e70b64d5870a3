use std::thread;
use std::time::Duration;

use anyhow::{anyhow, bail, Context};

use pixelpet_audio::audio_system::{AudioEngine, PetAge, SoundEffect};
use pixelpet_audio::config::EngineConfig;
use pixelpet_audio::error::AppResult;

const LOG_TARGET_STARTUP: &str = "pixelpet_audio::startup";

/// Initialize tracing with file rotation
///
/// Logs are written to `<config dir>/PixelPet/logs/pixelpet-audio.YYYY-MM-DD.log`.
/// Debug builds also log to the console.
fn initialize_tracing() -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_appender::rolling;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let log_dir = dirs::config_dir()
        .map(|dir| dir.join("PixelPet").join("logs"))
        .unwrap_or_else(|| std::path::PathBuf::from("logs"));

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create log directory: {}", e);
    }

    let file_appender = rolling::daily(&log_dir, "pixelpet-audio.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    // Configure filter (info level by default)
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    #[cfg(debug_assertions)]
    {
        let console_layer = fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(true)
            .with_target(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(console_layer)
            .init();
    }

    #[cfg(not(debug_assertions))]
    {
        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();
    }

    tracing::info!("Log directory: {}", log_dir.display());
    guard
}

fn usage() -> &'static str {
    "usage: pixelpet-audio [meow | beep | boop | death | music <baby|young|adult|elderly> [secs] | tour]"
}

fn play_and_wait(engine: &AudioEngine, effect: SoundEffect) {
    engine.play_effect(effect);
    thread::sleep(Duration::from_secs_f64(effect.total_duration() + 0.2));
}

fn run(args: &[String]) -> AppResult<()> {
    let config_path = EngineConfig::default_path();
    let config = EngineConfig::load_or_default(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let engine = AudioEngine::with_config(config);
    if !engine.is_available() {
        tracing::warn!(target: LOG_TARGET_STARTUP, "No audio output, commands will be silent");
    }

    let command = args.first().map(String::as_str).unwrap_or("tour");
    match command {
        "meow" => play_and_wait(&engine, SoundEffect::Meow),
        "beep" | "boop" => play_and_wait(&engine, SoundEffect::Beep),
        "death" => play_and_wait(&engine, SoundEffect::Death),
        "music" => {
            let age = args
                .get(1)
                .context(usage())?
                .parse::<PetAge>()
                .map_err(|e| anyhow!("{}", e))?;
            let secs: u64 = match args.get(2) {
                Some(s) => s.parse().context("Invalid duration")?,
                None => 10,
            };
            engine.play_age_music(age);
            thread::sleep(Duration::from_secs(secs));
            engine.stop_music();
        }
        "tour" => {
            for age in PetAge::ALL {
                engine.play_age_music(age);
                play_and_wait(&engine, SoundEffect::Meow);
                thread::sleep(Duration::from_secs(4));
            }
            engine.stop_music();
            play_and_wait(&engine, SoundEffect::Death);
        }
        other => bail!("Unknown command '{}'\n{}", other, usage()),
    }

    Ok(())
}

fn main() {
    let _guard = initialize_tracing();
    tracing::info!(
        target: LOG_TARGET_STARTUP,
        "Starting PixelPet audio v{} ({})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::ARCH
    );

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(&args) {
        tracing::error!("{:#}", e);
        eprintln!("✗ {:#}", e);
        std::process::exit(1);
    }
}
