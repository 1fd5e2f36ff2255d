//! Frame description for a sprite renderer
//!
//! `render_frame` turns the game state into an ordered list of draw commands
//! and hands each one to a `SpriteRenderer`. The GPU side only has to upload
//! the `SpriteInstance`s and draw textured quads.

pub mod camera;
pub mod fps;
pub mod sprite;

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Mat4, Vec3};

pub use camera::Camera;
pub use fps::FpsCounter;
pub use sprite::{SpriteFrame, SpriteInstance, TextureId, frames};

use crate::consts::*;
use crate::sim::{GamePhase, GameState, Obstacle, ObstacleKind, TitleScreen};

/// Draw order buckets, drawn in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Ground,
    Backdrop,
    Entities,
    Obstacles,
    Hud,
}

/// One thing to draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    /// World-space quad (HUD sprites use an identity view and projection)
    Sprite {
        layer: Layer,
        texture: TextureId,
        instance: SpriteInstance,
    },
    /// A line of menu/result text, `row` 0 at the top
    Text {
        text: &'static str,
        row: usize,
        scale: f32,
    },
    /// Frames-per-second readout in the HUD corner
    Fps(u32),
}

impl DrawCommand {
    pub fn layer(&self) -> Layer {
        match self {
            DrawCommand::Sprite { layer, .. } => *layer,
            DrawCommand::Text { .. } | DrawCommand::Fps(_) => Layer::Hud,
        }
    }
}

/// Everything a renderer needs besides the commands themselves
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderContext {
    /// Viewport size in pixels
    pub viewport: (u32, u32),
    pub camera: Camera,
    /// Crossfade darkness (0 clear, 0.35 black)
    pub fade_tint: f32,
    /// Mushroom high intensity, for screen effects
    pub high: f32,
    pub time_ticks: u64,
    /// Shown when the player enabled the counter
    pub fps: Option<u32>,
}

impl RenderContext {
    pub fn for_state(state: &GameState, viewport: (u32, u32)) -> Self {
        let aspect = viewport.0 as f32 / viewport.1.max(1) as f32;
        let camera = if shows_chase(state) {
            Camera::follow(aspect, state.player.position())
        } else {
            Camera::stage(aspect)
        };
        let fade_tint = if state.phase.is_terminal() {
            state.crossfade.tint()
        } else {
            0.0
        };
        Self {
            viewport,
            camera,
            fade_tint,
            high: state.player.high,
            time_ticks: state.time_ticks,
            fps: None,
        }
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = Some(fps);
        self
    }
}

/// Platform renderer
pub trait SpriteRenderer {
    fn draw(&mut self, command: &DrawCommand, ctx: &RenderContext);
}

/// True while the forest itself is on screen (a finished run keeps showing
/// it until the crossfade goes black)
fn shows_chase(state: &GameState) -> bool {
    match state.phase {
        GamePhase::Play | GamePhase::Paused => true,
        GamePhase::Win | GamePhase::Lose => !state.crossfade.past_black(),
        GamePhase::Loading | GamePhase::Title => false,
    }
}

/// Band-aligned offset the ground and side tiles scroll with
#[inline]
pub fn band_offset(z: f32) -> f32 {
    (z / BAND_DEPTH).ceil() * BAND_DEPTH
}

/// Fraction of the way to the foxhole, for the HUD track
#[inline]
pub fn track_progress(z: f32) -> f32 {
    (z / GOAL_DEPTH).clamp(0.0, 1.0)
}

const WELCOME_LINES: &[&str] = &[
    "Fox, escape from Evil Mr. Grabberson!",
    "",
    "Navigate menu with <left> and <right>",
    "Press <Enter> or <Space> to start game",
];

const STORY_LINES: &[&str] = &[
    "The best animal in the world, the Fox,",
    "is chased by the villainous and wicked",
    "Evil Mr. Grabberson.",
    "",
    "Fox must therefore escape the wrath of",
    "Evil Mr. Grabberson, and return safely",
    "to its foxhole in the midst of the",
    "unilluminated forest.",
    "",
    "For all you do, do not let the immoral",
    "Evil Mr. Grabberson get hold of Fox!",
];

const CONTROLS_LINES: &[&str] = &[
    "CONTROLS:",
    "  Move and jump Fox with <ARROW> keys",
    "  <M> to mute, <P> to pause",
    "",
    "Be careful in the forest:",
    "  Fox may tumble on stone",
    "  Fox will get high by eating mushroom",
    "  Fox will get well by eating berry",
    "",
    "Do not miss the foxhole!",
];

const CREDITS_LINES: &[&str] = &[
    "The game, graphics and sound effects",
    "are created and/or generated by:",
    "  Casper Kehlet Jensen",
    "",
    "Music can be credited Soundcloud-user:",
    "  Abstraction",
    "",
    "Special mentions:",
    "  Joakim & Soeren (game characters)",
    "  Notch (inspiration and awesome)",
];

const WIN_LINES: &[&str] = &[
    "Evil Mr. Grabberson: ",
    " \"Aaah! Damn you, Fox!",
    "  You win this time!\"",
];

const LOSE_LINES: &[&str] = &[
    "Evil Mr. Grabberson: ",
    " \"Muahaha! You lose, Foxboy!",
    "  Fox is mine!\"",
];

const RESULT_HINT: &str = "<R> to try again; <Space> to return";
/// Row the result hint sits on, below the speech
const RESULT_HINT_ROW: usize = 11;

/// Menu text for a title page
pub fn title_lines(screen: TitleScreen) -> &'static [&'static str] {
    match screen {
        TitleScreen::Welcome => WELCOME_LINES,
        TitleScreen::Story => STORY_LINES,
        TitleScreen::Controls => CONTROLS_LINES,
        TitleScreen::Credits => CREDITS_LINES,
    }
}

/// Collects commands in draw order
struct Frame {
    commands: Vec<DrawCommand>,
}

impl Frame {
    fn sprite(&mut self, layer: Layer, model: Mat4, frame: &SpriteFrame) {
        self.commands.push(DrawCommand::Sprite {
            layer,
            texture: frame.texture,
            instance: SpriteInstance::new(model, frame),
        });
    }

    fn tinted(&mut self, layer: Layer, model: Mat4, frame: &SpriteFrame, tint: [f32; 4]) {
        self.commands.push(DrawCommand::Sprite {
            layer,
            texture: frame.texture,
            instance: SpriteInstance::new(model, frame).with_tint(tint),
        });
    }

    fn lines(&mut self, lines: &[&'static str], first_row: usize, scale: f32) {
        for (i, &text) in lines.iter().enumerate() {
            if !text.is_empty() {
                self.commands.push(DrawCommand::Text {
                    text,
                    row: first_row + i,
                    scale,
                });
            }
        }
    }
}

fn translate(x: f32, y: f32, z: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(x, y, z))
}

fn scale(x: f32, y: f32, z: f32) -> Mat4 {
    Mat4::from_scale(Vec3::new(x, y, z))
}

/// Ground quad lying flat at depth `z`, anchored at its center
fn ground_tile(z: f32, width: f32) -> Mat4 {
    translate(0.0, -2.0, z)
        * Mat4::from_rotation_x(FRAC_PI_2)
        * scale(width, BAND_DEPTH, 1.0)
        * translate(-0.5, -0.5, 0.0)
}

/// Tree wall running along one side of the path
fn side_tile(x: f32, z: f32) -> Mat4 {
    translate(-0.5 + x, -0.5 - 7.75, z)
        * scale(10.0, 10.0, BAND_DEPTH)
        * Mat4::from_rotation_y(FRAC_PI_2)
}

const SHADOW_TINT: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

fn draw_forest(frame: &mut Frame, state: &GameState, camera: &Camera) {
    let player = state.player.position();
    let offset = band_offset(player.z);

    frame.sprite(Layer::Ground, ground_tile(-63.0 + offset, 24.0), &frames::GROUND);
    let next = ground_tile(-63.0 - BAND_DEPTH + offset, 24.0);
    frame.sprite(Layer::Ground, next, &frames::GROUND);

    for x in [-11.0, 11.0] {
        frame.sprite(Layer::Backdrop, side_tile(x, offset), &frames::BACKDROP);
        frame.sprite(Layer::Backdrop, side_tile(x, offset - BAND_DEPTH), &frames::BACKDROP);
    }
    let back = translate(-11.5, -8.25, -75.0 + player.z) * scale(22.0, 10.0, 10.0);
    frame.sprite(Layer::Backdrop, back, &frames::BACKDROP);

    // Entities
    let fox = if state.player.is_tumbling() {
        frames::FOX_TUMBLE
    } else {
        frames::FOX_RUN.step(0.0, state.player.frame as f32)
    };
    let fox_height = if state.player.is_tumbling() { 0.75 } else { 1.5 };
    let model = Mat4::from_translation(player)
        * translate(-0.5, -0.5, 0.0)
        * scale(1.5, fox_height, 1.0);
    frame.sprite(Layer::Entities, model, &fox);

    // Shadow stays on the ground while the fox jumps
    let bottom = state.player.body.bounds.bottom;
    let shadow = translate(player.x - 0.5, bottom - 0.5, player.z - 0.01) * scale(1.5, 0.8, 1.0);
    frame.tinted(Layer::Entities, shadow, &frames::FOX_SHADOW, SHADOW_TINT);

    let enemy = state.enemy.position();
    let model = Mat4::from_translation(enemy)
        * translate(-0.5, -0.5, 0.0)
        * scale(1.5, 3.0, 1.0)
        * Mat4::from_rotation_x(PI / 3.0);
    frame.sprite(
        Layer::Entities,
        model,
        &frames::ENEMY.step(state.enemy.frame as f32, 0.0),
    );

    for obstacle in state.streamer.obstacles() {
        if !camera.in_depth_range(obstacle.position) {
            continue;
        }
        let (model, sprite) = obstacle_sprite(obstacle, state.player.high);
        frame.sprite(Layer::Obstacles, model, &sprite);
        if obstacle.kind == ObstacleKind::Berry {
            let pos = obstacle.position;
            let shadow = translate(pos.x - 0.25, -2.0, pos.z - 0.01);
            let sprite = frames::BERRY.step(obstacle.variant as f32, 1.0);
            frame.sprite(Layer::Obstacles, shadow, &sprite);
        }
    }

    // HUD track with fox and enemy markers
    frame.sprite(
        Layer::Hud,
        translate(-1.0, -0.75, -1.0) * scale(0.25, 1.0, 1.0),
        &frames::HUD_TRACK,
    );
    for (z, marker) in [(player.z, frames::HUD_FOX), (enemy.z, frames::HUD_ENEMY)] {
        let model = translate(-1.0 + 0.0625, -0.8 + 0.9 * track_progress(z), -1.0)
            * scale(0.15, 0.15, 1.0);
        frame.sprite(Layer::Hud, model, &marker);
    }
}

/// Model matrix and frame for one obstacle. Trees circle their base while
/// the fox is high.
pub fn obstacle_sprite(obstacle: &Obstacle, high: f32) -> (Mat4, SpriteFrame) {
    let pos = obstacle.position;
    match obstacle.kind {
        ObstacleKind::Tree => {
            let mut base = pos;
            if high > 0.1 {
                let radius = obstacle.sway * high / 10.0;
                let angle = obstacle.ticks * (PI / 100.0);
                base.x += radius * angle.cos();
                base.z += radius * angle.sin();
            }
            let model = Mat4::from_translation(base)
                * translate(-0.5, -1.5, 0.25)
                * scale(3.0, 6.0, 1.0)
                * translate(-0.25, -0.165, 0.0);
            (model, frames::TREE)
        }
        ObstacleKind::Goal => {
            let model =
                translate(-0.5, -0.5, 0.0) * Mat4::from_translation(pos) * scale(2.0, 1.0, 1.0);
            (model, frames::FOXHOLE)
        }
        kind => {
            let sprite = match kind {
                ObstacleKind::Rock => frames::ROCK.step(obstacle.variant as f32, 0.0),
                ObstacleKind::Berry => frames::BERRY.step(obstacle.variant as f32, 0.0),
                _ => frames::MUSHROOM,
            };
            (Mat4::from_translation(pos) * translate(-0.5, -0.5, 0.0), sprite)
        }
    }
}

fn draw_title(frame: &mut Frame, screen: TitleScreen) {
    frame.sprite(Layer::Ground, ground_tile(-32.0, 48.0), &frames::GROUND);
    if screen == TitleScreen::Welcome {
        frame.sprite(
            Layer::Entities,
            translate(-1.5, -2.05, 2.9) * scale(1.5, 1.0, 1.0),
            &frames::TITLE_ENEMY,
        );
        frame.sprite(
            Layer::Entities,
            translate(0.2, -2.05, 2.9) * scale(1.5, 1.0, 1.0),
            &frames::TITLE_FOX,
        );
    }
    frame.lines(title_lines(screen), 0, 1.0);
}

fn draw_result(frame: &mut Frame, won: bool) {
    frame.sprite(Layer::Ground, ground_tile(-32.0, 48.0), &frames::GROUND);
    if won {
        frame.sprite(Layer::Entities, translate(-1.0, -2.0, 3.5), &frames::ENEMY_TIRED);
        frame.sprite(
            Layer::Entities,
            translate(0.5, -2.0, 1.5) * scale(1.0, 0.5, 1.0),
            &frames::FOX_IN_FOXHOLE,
        );
        frame.lines(WIN_LINES, 0, 1.0);
    } else {
        frame.sprite(Layer::Entities, translate(-0.5, -2.0, 3.5), &frames::ENEMY_WITH_FOX);
        frame.lines(LOSE_LINES, 0, 1.0);
    }
    frame.lines(&[RESULT_HINT], RESULT_HINT_ROW, 1.0);
}

/// Describe the current frame in draw order
pub fn build_frame(state: &GameState, ctx: &RenderContext) -> Vec<DrawCommand> {
    let mut frame = Frame {
        commands: Vec::with_capacity(16 + state.streamer.obstacles().len()),
    };
    match state.phase {
        GamePhase::Loading => {
            let status = if state.assets.failure().is_some() {
                "Failed to load game assets"
            } else {
                "Loading..."
            };
            frame.lines(&[status], 0, 1.0);
        }
        GamePhase::Title => draw_title(&mut frame, state.title_screen),
        GamePhase::Play => draw_forest(&mut frame, state, &ctx.camera),
        GamePhase::Paused => {
            draw_forest(&mut frame, state, &ctx.camera);
            frame.lines(&["Paused"], 0, 1.0);
        }
        GamePhase::Win | GamePhase::Lose => {
            if shows_chase(state) {
                draw_forest(&mut frame, state, &ctx.camera);
            } else {
                draw_result(&mut frame, state.phase == GamePhase::Win);
            }
        }
    }
    if let Some(fps) = ctx.fps {
        frame.commands.push(DrawCommand::Fps(fps));
    }
    frame.commands
}

/// Hand every command for this frame to the renderer. Returns the count.
pub fn render_frame<R: SpriteRenderer>(
    state: &GameState,
    ctx: &RenderContext,
    renderer: &mut R,
) -> usize {
    let commands = build_frame(state, ctx);
    for command in &commands {
        renderer.draw(command, ctx);
    }
    commands.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::phase::FADE_TICKS;

    /// Further than anything the chase camera can show
    const FAR_DRAW: f32 = camera::FAR + camera::BACK_OFF;

    #[derive(Default)]
    struct Recorder {
        layers: Vec<Layer>,
        texts: Vec<&'static str>,
        sprite_tints: Vec<[f32; 4]>,
        fps: Option<u32>,
    }

    impl SpriteRenderer for Recorder {
        fn draw(&mut self, command: &DrawCommand, ctx: &RenderContext) {
            self.layers.push(command.layer());
            match command {
                DrawCommand::Text { text, .. } => self.texts.push(*text),
                DrawCommand::Sprite { instance, .. } => self.sprite_tints.push(instance.tint),
                DrawCommand::Fps(value) => self.fps = Some(*value),
            }
            assert!(ctx.fade_tint >= 0.0);
        }
    }

    fn draws_foxhole(commands: &[DrawCommand]) -> bool {
        commands.iter().any(|c| match c {
            DrawCommand::Sprite { instance, .. } => instance.uv_rect == frames::FOXHOLE.uv_rect(),
            _ => false,
        })
    }

    fn running_state() -> GameState {
        let mut state = GameState::new(8, 0);
        state.start_run();
        state
    }

    #[test]
    fn test_play_frame_draw_order() {
        let state = running_state();
        let ctx = RenderContext::for_state(&state, (800, 600));
        let mut recorder = Recorder::default();
        let count = render_frame(&state, &ctx, &mut recorder);

        assert_eq!(count, recorder.layers.len());
        assert!(recorder.layers.windows(2).all(|w| w[0] <= w[1]));
        let expected: usize = state
            .streamer
            .obstacles()
            .iter()
            .filter(|o| ctx.camera.in_depth_range(o.position))
            .map(|o| if o.kind == ObstacleKind::Berry { 2 } else { 1 })
            .sum();
        let obstacles = recorder.layers.iter().filter(|&&l| l == Layer::Obstacles).count();
        assert_eq!(obstacles, expected);
        assert!(obstacles > 0);
        // Fox, its shadow and the enemy
        assert_eq!(recorder.layers.iter().filter(|&&l| l == Layer::Entities).count(), 3);
        assert!(recorder.sprite_tints.contains(&SHADOW_TINT));
        assert_eq!(recorder.layers.last(), Some(&Layer::Hud));
        assert_eq!(recorder.fps, None);
    }

    #[test]
    fn test_far_obstacles_are_skipped() {
        let mut state = running_state();
        let goal_z = state.streamer.goal().map(|g| g.position.z);
        assert!(goal_z.is_some_and(|z| z < -FAR_DRAW));
        let ctx = RenderContext::for_state(&state, (800, 600));
        assert!(!draws_foxhole(&build_frame(&state, &ctx)));

        state.player.body.position.z = goal_z.unwrap_or_default() + 10.0;
        let near_goal = RenderContext::for_state(&state, (800, 600));
        assert!(draws_foxhole(&build_frame(&state, &near_goal)));
    }

    #[test]
    fn test_berry_casts_shadow() {
        let mut state = running_state();
        state.streamer.obstacles_mut().clear();
        let berry = Obstacle::new(77, ObstacleKind::Berry, Vec3::new(1.0, GROUND_Y, -10.0));
        state.streamer.obstacles_mut().push(berry);
        let ctx = RenderContext::for_state(&state, (800, 600));
        let obstacles: Vec<_> = build_frame(&state, &ctx)
            .into_iter()
            .filter(|c| c.layer() == Layer::Obstacles)
            .collect();
        assert_eq!(obstacles.len(), 2);
    }

    #[test]
    fn test_fps_drawn_last_when_enabled() {
        let state = running_state();
        let ctx = RenderContext::for_state(&state, (800, 600)).with_fps(58);
        let mut recorder = Recorder::default();
        render_frame(&state, &ctx, &mut recorder);
        assert_eq!(recorder.fps, Some(58));
        let frame = build_frame(&state, &ctx);
        assert_eq!(frame.last(), Some(&DrawCommand::Fps(58)));
    }

    #[test]
    fn test_title_pages_have_text() {
        let mut state = GameState::new(8, 0);
        state.enter_title();
        for screen in [
            TitleScreen::Welcome,
            TitleScreen::Story,
            TitleScreen::Controls,
            TitleScreen::Credits,
        ] {
            state.title_screen = screen;
            let ctx = RenderContext::for_state(&state, (640, 480));
            let mut recorder = Recorder::default();
            render_frame(&state, &ctx, &mut recorder);
            assert!(!recorder.texts.is_empty());
            assert_eq!(recorder.layers[0], Layer::Ground);
        }
    }

    #[test]
    fn test_result_screen_switches_at_black() {
        let mut state = running_state();
        state.set_phase(GamePhase::Lose);
        for _ in 0..FADE_TICKS / 2 {
            state.crossfade.step();
        }
        let ctx = RenderContext::for_state(&state, (640, 480));
        assert!(ctx.fade_tint > 0.0);
        let chase = build_frame(&state, &ctx);
        assert!(chase.iter().any(|c| c.layer() == Layer::Obstacles));

        while !state.crossfade.past_black() {
            state.crossfade.step();
        }
        let mut recorder = Recorder::default();
        let ctx = RenderContext::for_state(&state, (640, 480));
        render_frame(&state, &ctx, &mut recorder);
        assert!(recorder.texts.contains(&RESULT_HINT));
        assert!(recorder.texts.iter().any(|t| t.contains("Fox is mine")));
        assert!(!recorder.layers.contains(&Layer::Obstacles));
    }

    #[test]
    fn test_trees_sway_only_when_high() {
        let mut tree = Obstacle::new(1, ObstacleKind::Tree, Vec3::new(1.0, GROUND_Y, -10.0));
        tree.ticks = 40.0;
        let (sober, _) = obstacle_sprite(&tree, 0.05);
        let (high, _) = obstacle_sprite(&tree, 1.0);
        assert_ne!(sober, high);
        let (base, _) = obstacle_sprite(&tree, 0.0);
        assert_eq!(sober, base);
    }

    #[test]
    fn test_loading_screen_reports_failure() {
        let mut state = GameState::new(8, 1);
        let ctx = RenderContext::for_state(&state, (640, 480));
        let mut recorder = Recorder::default();
        render_frame(&state, &ctx, &mut recorder);
        assert_eq!(recorder.texts, vec!["Loading..."]);

        let err = crate::GameError::AssetLoad {
            name: "ground.png".into(),
            reason: "missing".into(),
        };
        assert!(state.report_asset(Err(err)).is_err());
        let mut recorder = Recorder::default();
        render_frame(&state, &ctx, &mut recorder);
        assert_eq!(recorder.texts, vec!["Failed to load game assets"]);
    }

    #[test]
    fn test_band_offset_and_progress() {
        assert_eq!(band_offset(0.0), 0.0);
        assert_eq!(band_offset(-1.0), 0.0);
        assert_eq!(band_offset(-129.0), -128.0);
        assert_eq!(track_progress(0.0), 0.0);
        assert_eq!(track_progress(GOAL_DEPTH), 1.0);
        assert_eq!(track_progress(ENEMY_START_Z), 0.0);
    }
}
