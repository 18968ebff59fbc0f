//! Star Invaders entry point
//!
//! Headless runner: loads settings and assets, then drives the simulation
//! with the demo autopilot until the round ends.

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Context;

use star_invaders::Settings;
use star_invaders::assets::{AssetProvider, DirAssets, MemoryAssets, SoundBank, SpriteSheet};
use star_invaders::audio::{LogAudio, SoundRouter};
use star_invaders::consts::*;
use star_invaders::platform::{Clock, FixedStep, HeldKeys, SystemClock};
use star_invaders::renderer::{HeadlessRenderer, render_frame};
use star_invaders::sim::{GameState, RoundState, TickInput, tick};

fn load_assets(assets: &mut impl AssetProvider) -> anyhow::Result<(SpriteSheet, SoundBank)> {
    let sheet = SpriteSheet::load(assets).context("loading sprites")?;
    let bank = SoundBank::load(assets).context("loading sounds")?;
    Ok((sheet, bank))
}

/// One-line JSON summary printed when the round ends
fn round_summary(round: &RoundState) -> anyhow::Result<String> {
    serde_json::to_string(round).context("serializing round summary")
}

fn run() -> anyhow::Result<()> {
    let settings_path = std::env::args_os().nth(1).map(PathBuf::from);
    let settings = Settings::load_or_default(settings_path.as_deref());

    let (sheet, bank) = match &settings.asset_dir {
        Some(dir) => load_assets(&mut DirAssets::new(dir))?,
        None => load_assets(&mut MemoryAssets::builtin())?,
    };

    let seed = settings.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });
    log::info!("Star Invaders starting with seed: {seed}");

    let mut state = GameState::new(seed);
    let mut audio = SoundRouter::new(LogAudio::default(), bank, &settings);
    let mut renderer = HeadlessRenderer::new(settings.hud_log_interval);
    let keys = HeldKeys::default();
    let clock = SystemClock::new();
    let mut pacing = FixedStep::new(SIM_DT_MS, MAX_SUBSTEPS);

    loop {
        let input = TickInput::sample(&keys).with_idle(settings.autopilot);

        let steps = if settings.realtime {
            pacing.advance(clock.now_ms())
        } else {
            1
        };
        for _ in 0..steps {
            tick(&mut state, &input, SIM_DT_MS);
        }

        let events = state.drain_events();
        audio.handle_all(&events);
        render_frame(&mut renderer, &sheet, &state.snapshot());

        if state.is_finished() {
            break;
        }
        if settings.max_ticks > 0 && state.time_ticks >= settings.max_ticks {
            log::info!("Tick limit {} reached", settings.max_ticks);
            let quit = TickInput {
                quit: true,
                ..TickInput::default()
            };
            tick(&mut state, &quit, SIM_DT_MS);
            audio.handle_all(&state.drain_events());
            break;
        }
        if settings.realtime {
            std::thread::sleep(Duration::from_millis(pacing.until_next_ms()));
        }
    }

    if state.round.won && settings.realtime {
        std::thread::sleep(Duration::from_millis(WIN_SCREEN_HOLD_MS));
    }
    if audio.active_loops() > 0 {
        log::warn!("{} audio loops still playing at exit", audio.active_loops());
    }

    let summary = round_summary(&state.round)?;
    log::info!("Round finished after {} ticks: {summary}", state.time_ticks);
    println!("{summary}");
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}
