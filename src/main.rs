//! Fox Escape entry point
//!
//! Runs a headless chase: the fox steers for the foxhole on its own while
//! audio events go to a logging backend and frames go to a counting renderer.
//!
//! Usage: `fox-escape [settings.json] [max-ticks]`

use std::path::PathBuf;
use std::time::Instant;

use fox_escape::audio::{AudioManager, LogAudio};
use fox_escape::consts::FRAME_MS;
use fox_escape::input::{Control, TickInput};
use fox_escape::renderer::{
    DrawCommand, FpsCounter, RenderContext, SpriteRenderer, TextureId, render_frame,
};
use fox_escape::sim::{GamePhase, GameState, SoundCue, tick};
use fox_escape::{GameResult, Settings};

const DEFAULT_MAX_TICKS: u64 = 60 * 60 * 5;
const VIEWPORT: (u32, u32) = (800, 600);

/// Renderer that only counts what it is asked to draw
#[derive(Debug, Default)]
struct CountingRenderer {
    sprites: u64,
    texts: u64,
}

impl SpriteRenderer for CountingRenderer {
    fn draw(&mut self, command: &DrawCommand, _ctx: &RenderContext) {
        match command {
            DrawCommand::Sprite { .. } => self.sprites += 1,
            DrawCommand::Text { .. } => self.texts += 1,
            DrawCommand::Fps(fps) => log::trace!("fps {}", fps),
        }
    }
}

/// Held controls for one tick of the demo run
fn autopilot(state: &GameState) -> TickInput {
    let mut input = TickInput::default();
    if state.phase != GamePhase::Play {
        return input;
    }
    let fox = state.player.position();
    if let Some(goal) = state.streamer.goal() {
        if goal.position.x < fox.x - 0.5 {
            input.set(Control::Left, true);
        } else if goal.position.x > fox.x + 0.5 {
            input.set(Control::Right, true);
        }
    }
    input
}

fn main() -> GameResult<()> {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let settings = match args.next().map(PathBuf::from) {
        Some(path) if path.exists() => Settings::load(&path),
        Some(path) => {
            // First run: write the defaults so they can be edited
            let settings = Settings::default();
            settings.save(&path)?;
            settings
        }
        None => Settings::default(),
    };
    let max_ticks = args
        .next()
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(DEFAULT_MAX_TICKS);

    let seed = settings.seed.unwrap_or_else(rand::random);
    log::info!("Fox Escape starting with seed {}", seed);

    let asset_count = (TextureId::ALL.len() + SoundCue::ALL.len()) as u32;
    let mut state = GameState::new(seed, asset_count);
    let files = TextureId::ALL
        .iter()
        .map(|t| t.file_name())
        .chain(SoundCue::ALL.iter().map(|c| c.file_name()));
    for file in files {
        state.report_asset(Ok(()))?;
        log::debug!("Loaded {} ({} left)", file, state.assets.remaining());
    }

    let mut audio = AudioManager::with_settings(LogAudio::default(), &settings);
    if settings.start_muted {
        state.toggle_mute();
    }
    let mut renderer = CountingRenderer::default();
    let mut fps = FpsCounter::new();
    let started = Instant::now();
    let elapsed = f64::from(FRAME_MS);

    // Leave loading, then tap confirm on the title screen
    let mut script = vec![
        TickInput::default(),
        TickInput::with(&[Control::Confirm]),
        TickInput::default(),
    ]
    .into_iter();

    let mut ticks = 0;
    while ticks < max_ticks && !state.phase.is_terminal() {
        let input = script.next().unwrap_or_else(|| autopilot(&state));
        tick(&mut state, &input, elapsed);
        audio.dispatch(&state.drain_events());
        let mut ctx = RenderContext::for_state(&state, VIEWPORT);
        let rate = fps.record(started.elapsed().as_secs_f64() * 1000.0);
        if settings.show_fps {
            ctx = ctx.with_fps(rate);
        }
        render_frame(&state, &ctx, &mut renderer);
        ticks += 1;
    }

    let summary = serde_json::json!({
        "seed": seed,
        "ticks": ticks,
        "phase": format!("{:?}", state.phase),
        "fox_z": state.player.position().z,
        "enemy_z": state.enemy.position().z,
        "level": state.streamer.level,
        "sprites_drawn": renderer.sprites,
        "text_lines_drawn": renderer.texts,
        "cues_played": audio.backend().played,
        "fps": fps.fps(),
        "muted": audio.is_muted(),
    });
    log::info!("Run finished: {}", summary);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
