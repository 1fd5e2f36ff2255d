//! Frame-driven simulation tick
//!
//! One call per display refresh. Input edges are computed first, then the
//! current phase decides what advances.

use super::collision::resolve_obstacles;
use super::phase::{Crossfade, FadeEvent, FadeStage, GamePhase};
use super::state::{AMBIENT_FADE_STEP, GameEvent, GameState, MUSIC_VOLUME, SoundCue};
use crate::consts::*;
use crate::input::{Control, Released, TickInput};

/// Advance the game by one frame. `elapsed_ms` is the wall time since the
/// previous frame and only feeds the simulation clock while playing.
pub fn tick(state: &mut GameState, input: &TickInput, elapsed_ms: f64) {
    let released = state.controls.advance(input);
    state.time_ticks += 1;

    if released.contains(Control::Mute) {
        state.toggle_mute();
    }

    match state.phase {
        GamePhase::Loading => {
            if state.assets.is_complete() {
                log::info!("Assets loaded");
                state.enter_title();
            }
        }
        GamePhase::Title => update_title(state, released),
        GamePhase::Play => {
            if released.contains(Control::Pause) {
                state.set_phase(GamePhase::Paused);
                state.push_event(GameEvent::SetMuted(true));
                return;
            }
            update_play(state, input, elapsed_ms);
        }
        GamePhase::Paused => {
            if released.contains(Control::Pause) {
                state.set_phase(GamePhase::Play);
                let muted = state.effective_muted();
                state.push_event(GameEvent::SetMuted(muted));
            }
        }
        GamePhase::Win | GamePhase::Lose => update_result(state, released),
    }
}

fn update_title(state: &mut GameState, released: Released) {
    if released.is_empty() {
        return;
    }
    if released.contains(Control::Left) {
        state.title_screen = state.title_screen.previous();
    }
    if released.contains(Control::Right) {
        state.title_screen = state.title_screen.next();
    }
    if released.contains(Control::Confirm) {
        state.start_run();
    }
}

fn update_play(state: &mut GameState, input: &TickInput, elapsed_ms: f64) {
    state.sim_clock_ms += elapsed_ms.max(0.0);
    let now = state.sim_clock_ms;
    // Caught counts on the positions before and after this tick's motion
    let caught_at_start = is_caught(state.player.position().z, state.enemy.position().z);

    // Player kinematics
    state.player.update_locomotion(now);
    if let Some(cue) = state.player.handle_input(input) {
        state.play_cue(cue, cue.base_volume());
    }
    if let Some(cue) = state.player.step_motion() {
        state.play_cue(cue, cue.base_volume());
    }

    // Obstacle contacts
    let report = resolve_obstacles(&mut state.player, state.streamer.obstacles_mut(), now);
    for cue in report.cues {
        state.play_cue(cue, cue.base_volume());
    }
    state.player.regenerate();

    // Streaming may cull the foxhole, so remember where it was
    let goal_z = state.streamer.goal().map(|goal| goal.position.z);
    let player_z = state.player.position().z;
    state.streamer.update(player_z);
    state.streamer.animate();

    let step = state.enemy.pursue(state.player.position(), now);
    if step.grabbed {
        state.play_cue(SoundCue::Grab, SoundCue::Grab.base_volume() * step.grab_volume);
    }

    // Reaching the foxhole wins even if caught on the same tick
    if report.reached_goal {
        finish_run(state, GamePhase::Win);
        return;
    }

    let caught = caught_at_start || is_caught(player_z, state.enemy.position().z);
    let overshot = goal_z.is_some_and(|gz| player_z < gz - GOAL_OVERSHOOT);
    if caught || overshot {
        log::info!(
            "Run lost ({})",
            if caught { "caught" } else { "missed the foxhole" }
        );
        finish_run(state, GamePhase::Lose);
    }
}

#[inline]
fn is_caught(player_z: f32, enemy_z: f32) -> bool {
    player_z >= enemy_z - CATCH_MARGIN
}

fn finish_run(state: &mut GameState, outcome: GamePhase) {
    state.crossfade = Crossfade::new();
    state.ambient_volume = MUSIC_VOLUME;
    state.result_volume = 0.0;
    state.set_phase(outcome);
}

fn update_result(state: &mut GameState, released: Released) {
    let Some(cue) = state.result_cue() else {
        return;
    };

    match state.crossfade.step() {
        Some(FadeEvent::ReachedBlack) => {
            state.player.normal_mode();
            state.push_event(GameEvent::StopAll);
            state.result_volume = 0.0;
            state.play_cue(cue, 0.0);
        }
        Some(FadeEvent::Finished) => {
            state.result_volume = MUSIC_VOLUME;
            state.push_event(GameEvent::SetCueVolume { cue, volume: MUSIC_VOLUME });
        }
        None => match state.crossfade.stage {
            FadeStage::ToBlack => {
                state.ambient_volume = (state.ambient_volume - AMBIENT_FADE_STEP).max(0.0);
                state.push_event(GameEvent::SetCueVolume {
                    cue: SoundCue::Background,
                    volume: state.ambient_volume,
                });
            }
            FadeStage::FromBlack => {
                state.result_volume = MUSIC_VOLUME * state.crossfade.progress();
                state.push_event(GameEvent::SetCueVolume {
                    cue,
                    volume: state.result_volume,
                });
            }
            FadeStage::Done => {}
        },
    }

    if released.contains(Control::Restart) {
        state.enter_title();
        state.start_run();
    } else if released.contains(Control::Confirm) {
        state.enter_title();
    }
}
