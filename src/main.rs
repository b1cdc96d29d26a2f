//! Tank Brawl entry point
//!
//! Headless driver: loads a level, starts a game through the menu
//! overlay, and steps the simulation with a scripted autopilot until the
//! roster is cleared or the player is destroyed. A renderer front end
//! would replace the autopilot with real pointer and keyboard input but
//! drive the same loop.

use std::path::Path;
use std::process::ExitCode;

use glam::Vec2;

use tank_brawl::audio::{AudioMixer, Cue};
use tank_brawl::consts::SIM_DT;
use tank_brawl::settings::Settings;
use tank_brawl::sim::{GameEvent, GamePhase, GameState, Level, TickInput, tick};
use tank_brawl::ui::{MenuAction, Overlay, OverlayEffect};

const DEFAULT_LEVEL: &str = "assets/arena.json";
const SETTINGS_FILE: &str = "settings.json";

/// Hard cap so a stalemate run still terminates (two minutes of sim time)
const MAX_TICKS: u64 = 7200;

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let level_path = args.next().unwrap_or_else(|| DEFAULT_LEVEL.to_string());
    let seed = match args.next() {
        Some(s) => match s.parse() {
            Ok(seed) => seed,
            Err(_) => {
                log::error!("seed must be an integer, got '{s}'");
                return ExitCode::FAILURE;
            }
        },
        None => std::time::UNIX_EPOCH
            .elapsed()
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0),
    };

    let level = match Level::load(&level_path) {
        Ok(level) => level,
        Err(e) => {
            log::error!("failed to load level '{level_path}': {e}");
            return ExitCode::FAILURE;
        }
    };
    log::info!(
        "loaded level {}x{} with {} spawn points",
        level.width,
        level.height,
        level.spawns.len()
    );

    let mut settings = Settings::load(Path::new(SETTINGS_FILE));

    let mut mixer = AudioMixer::new();
    mixer.add_track(Cue::MenuMusic, true);
    mixer.add_track(Cue::GameMusic, true);
    mixer.add_track(Cue::Shoot, false);
    mixer.add_track(Cue::Explosion, false);
    mixer.set_volume(settings.master_volume);
    mixer.play(Cue::MenuMusic);

    let screen = Vec2::new(800.0, 600.0);
    let mut overlay = Overlay::new(screen);

    // No pointer here, so start the game directly through the mode machine
    let started = overlay
        .apply_action(MenuAction::StartGame)
        .map(|effect| handle_effect(effect, &mut settings, &mut mixer))
        .unwrap_or(false);
    if !started {
        log::error!("menu refused to start a game");
        return ExitCode::FAILURE;
    }
    mixer.stop_all();
    mixer.play(Cue::GameMusic);

    let mut state = GameState::from_level(&level, seed);
    log::info!(
        "game started: seed {seed}, {} enemies",
        state.enemies.len()
    );

    run_autopilot(&mut state, &mut overlay, &mut mixer);

    log::info!(
        "run finished at tick {}: {} ({} enemies left)",
        state.time_ticks,
        overlay.hud.score_text,
        state.enemies.len()
    );
    settings.save(Path::new(SETTINGS_FILE));

    if state.phase == GamePhase::PlayerDestroyed {
        log::info!("player destroyed");
    }
    ExitCode::SUCCESS
}

/// Apply a menu effect; returns true when a fresh game should begin
fn handle_effect(effect: OverlayEffect, settings: &mut Settings, mixer: &mut AudioMixer) -> bool {
    match effect {
        OverlayEffect::NewGame => true,
        OverlayEffect::VolumeChanged(percent) => {
            settings.set_volume_percent(percent);
            mixer.set_volume(settings.master_volume);
            false
        }
    }
}

/// Step the sim with scripted input until it reaches a terminal state
fn run_autopilot(state: &mut GameState, overlay: &mut Overlay, mixer: &mut AudioMixer) {
    while overlay.mode.sim_active()
        && state.phase == GamePhase::Running
        && !state.enemies.is_empty()
        && state.time_ticks < MAX_TICKS
    {
        let input = autopilot_input(state);
        tick(state, &input, SIM_DT);

        for event in state.drain_events() {
            overlay.hud.apply(&event, state);
            mixer.react(&event);
            match event {
                GameEvent::EnemyDestroyed { id } => log::info!("enemy {id} destroyed"),
                GameEvent::TileDamaged { x, y } => log::debug!("tile ({x},{y}) damaged"),
                GameEvent::PlayerHit => log::info!("player hit"),
                _ => {}
            }
        }

        // The frontend would drain these into its audio device
        let _ = mixer.drain_commands();
    }
}

/// Aim at the closest enemy, close the distance, fire on a short cadence
fn autopilot_input(state: &GameState) -> TickInput {
    let player_pos = state.player.pos;
    let target = state
        .enemies
        .iter()
        .min_by(|a, b| {
            let da = a.pos.distance_squared(player_pos);
            let db = b.pos.distance_squared(player_pos);
            da.total_cmp(&db)
        })
        .map(|t| t.pos)
        .unwrap_or(player_pos);

    TickInput {
        forward: player_pos.distance(target) > 150.0,
        reverse: false,
        steer_left: false,
        steer_right: false,
        pointer_world: target,
        fire: state.time_ticks % 40 == 0,
    }
}
