//! Per-frame simulation tick
//!
//! One call per displayed frame. Fixed-tick timers (dwell, celebration, reset
//! delay) count calls; only the intro message reads the wall clock.

use super::autopilot;
use super::camera::CameraPose;
use super::round::{RoundState, RoundStep};
use super::state::{GameEvent, GameState};
use super::targets::TargetTransition;

/// Inputs for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Host clock in milliseconds (drives the intro fade only)
    pub now_ms: f64,
    /// Idle/demo mode - autopilot steers the stick
    pub autopilot: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;

    match state.round.state() {
        RoundState::Playing => tick_playing(state, input),
        RoundState::Ending | RoundState::Resetting => match state.round.advance(&state.tuning) {
            RoundStep::Playing | RoundStep::Waiting => {}
            RoundStep::Celebrating(pose) => state.camera = pose,
            RoundStep::CelebrationFinished(pose) => {
                state.camera = pose;
                state.events.push(GameEvent::CelebrationFinished);
            }
            RoundStep::ResetDue => state.reset_round(),
        },
    }
}

fn tick_playing(state: &mut GameState, input: &TickInput) {
    let tuning = &state.tuning;

    if input.autopilot {
        if let Some(stick) = autopilot::steer(&state.ball, &state.tracker.targets) {
            state.input.steer(stick, tuning);
        }
    }

    // Input -> motion
    let desired = state.input.sample_desired_velocity(tuning);
    let step = state.ball.step(desired, &state.tracker.targets, tuning);
    state.camera = CameraPose::follow(step.position);

    // Motion -> targets
    let mut transitions = Vec::new();
    let captured_now = state.tracker.update(step.position, tuning, &mut transitions);
    let total = state.tracker.total();
    for transition in transitions {
        let event = match transition {
            TargetTransition::Revealed(id) => GameEvent::TargetRevealed { id },
            TargetTransition::Lost(id) => GameEvent::TargetLost { id },
            TargetTransition::Captured(id) => {
                let captured = state.tracker.captured_count();
                log::info!("Star {} lit ({}/{})", id, captured, total);
                GameEvent::TargetCaptured { id, captured, total }
            }
        };
        state.events.push(event);
    }
    if captured_now > 0 {
        log::debug!("{} capture(s) on tick {}", captured_now, state.time_ticks);
    }

    // Distance -> feedback, only while the nearest target is still dark
    if let Some(nearest) = step.nearest {
        let still_dark = state
            .tracker
            .targets
            .get(nearest.id)
            .is_some_and(|t| !t.is_captured());
        if still_dark {
            state
                .feedback
                .update(step.position, nearest.position, nearest.distance, tuning);
        }
    }

    // Cosmetic intro text
    if state.intro.update(input.now_ms, state.ball.speed() > 0.0, tuning) {
        state.events.push(GameEvent::IntroDismissed);
    }

    // Captured count -> round
    let stars = state.star_positions();
    if state.round.check_complete(
        state.tracker.captured_count(),
        total,
        state.camera,
        &stars,
        &state.tuning,
    ) {
        state.events.push(GameEvent::RoundEnding);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::LevelSelection;
    use crate::sim::targets::TargetState;
    use crate::tuning::Tuning;
    use glam::Vec3;

    fn new_state() -> GameState {
        let mut state = GameState::new(12345, Tuning::default(), LevelSelection::Fixed(0));
        state.drain_events();
        state
    }

    /// Park the ball on a target and tick until it is captured
    fn capture(state: &mut GameState, id: usize) {
        let p = state.tracker.targets[id].position;
        for _ in 0..200 {
            state.ball.pos = Vec3::new(p.x, SPAWN_POINT.y, p.z);
            state.ball.vel = glam::Vec2::ZERO;
            tick(state, &TickInput::default());
            if state.tracker.targets[id].is_captured() {
                return;
            }
        }
        panic!("target {} never captured", id);
    }

    #[test]
    fn test_idle_tick_keeps_ball_at_spawn() {
        let mut state = new_state();
        tick(&mut state, &TickInput::default());
        assert_eq!(state.ball.pos, SPAWN_POINT);
        assert_eq!(state.round_state(), RoundState::Playing);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_key_input_moves_ball_and_camera_follows() {
        let mut state = new_state();
        state.input.key_changed("ArrowRight", true);
        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.ball.pos.x > 0.0);
        assert_eq!(state.camera, CameraPose::follow(state.ball.pos));
    }

    #[test]
    fn test_round_ends_on_exact_capture_tick() {
        let mut state = new_state();
        let total = state.tracker.total();
        assert_eq!(total, 8);

        for id in 0..total - 1 {
            capture(&mut state, id);
            assert_eq!(state.round_state(), RoundState::Playing);
        }
        capture(&mut state, total - 1);
        assert_eq!(state.tracker.captured_count(), total);
        assert_eq!(state.round_state(), RoundState::Ending);

        let events = state.drain_events();
        let captures = events
            .iter()
            .filter(|e| matches!(e, GameEvent::TargetCaptured { .. }))
            .count();
        assert_eq!(captures, total);
        assert_eq!(events.last(), Some(&GameEvent::RoundEnding));
    }

    #[test]
    fn test_ball_frozen_while_ending() {
        let mut state = new_state();
        for id in 0..state.tracker.total() {
            capture(&mut state, id);
        }
        let frozen = state.ball.pos;
        state.input.key_changed("ArrowLeft", true);
        for _ in 0..30 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.ball.pos, frozen);
        assert_eq!(state.round_state(), RoundState::Ending);
    }

    #[test]
    fn test_full_round_resets_to_spawn() {
        let mut state = new_state();
        for id in 0..state.tracker.total() {
            capture(&mut state, id);
        }

        let mut ticks = 0;
        while state.round_state() != RoundState::Playing {
            tick(&mut state, &TickInput::default());
            ticks += 1;
            assert!(ticks < 10_000, "round never reset");
        }

        assert_eq!(state.ball.pos, SPAWN_POINT);
        assert_eq!(state.tracker.captured_count(), 0);
        assert!(state.tracker.targets.iter().all(|t| t.state == TargetState::Idle));
        assert_eq!(state.camera, CameraPose::start());
        assert!(state.round.links().is_empty());
        assert!(state.intro.is_active());

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::CelebrationFinished));
        assert!(events.contains(&GameEvent::RoundReset { level: 0 }));
    }

    #[test]
    fn test_feedback_tracks_nearest_dark_target() {
        let mut state = new_state();
        let start_volume = state.feedback.volume;
        tick(&mut state, &TickInput::default());
        // Spawn is far from every Lynx star: dim glow, volume easing down
        assert!(state.feedback.brightness < 1.0);
        assert!(state.feedback.volume < start_volume);
        assert!(state.feedback.pan >= -1.0 && state.feedback.pan <= 1.0);
    }

    #[test]
    fn test_autopilot_completes_a_round() {
        let mut state = new_state();
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        let mut ticks = 0;
        while state.round_state() == RoundState::Playing {
            tick(&mut state, &input);
            ticks += 1;
            assert!(ticks < 20_000, "autopilot stalled");
        }
        assert_eq!(state.tracker.captured_count(), state.tracker.total());
    }

    #[test]
    fn test_intro_fades_once_ball_moves() {
        let mut state = new_state();
        state.input.key_changed("ArrowDown", true);
        let mut now = 0.0;
        for _ in 0..120 {
            now += 1000.0 / 60.0;
            tick(&mut state, &TickInput { now_ms: now, autopilot: false });
        }
        assert!(!state.intro.is_active());
        assert!(state.drain_events().contains(&GameEvent::IntroDismissed));
    }
}
