//! Audio model
//!
//! The simulation never touches an audio device. This module keeps the
//! bookkeeping - registered tracks, per-track and master volume, mute -
//! and queues playback commands for a frontend to drain alongside the
//! frame's render pass.

use std::collections::BTreeMap;

use crate::sim::GameEvent;

/// Every sound the game knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Cue {
    /// Main-menu music loop
    MenuMusic,
    /// Gameplay music loop
    GameMusic,
    /// A projectile left a barrel
    Shoot,
    /// Explosion effect spawned
    Explosion,
}

/// A playback command for the frontend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCommand {
    Play(Cue),
    StopAll,
}

#[derive(Debug, Clone, Copy)]
struct Track {
    volume: f32,
    looping: bool,
}

/// Track registry and volume state
#[derive(Debug, Clone)]
pub struct AudioMixer {
    tracks: BTreeMap<Cue, Track>,
    master_volume: f32,
    previous_volume: f32,
    muted: bool,
    queued: Vec<AudioCommand>,
}

impl Default for AudioMixer {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioMixer {
    pub fn new() -> Self {
        Self {
            tracks: BTreeMap::new(),
            master_volume: 1.0,
            previous_volume: 1.0,
            muted: false,
            queued: Vec::new(),
        }
    }

    /// Register a track at the current master volume
    pub fn add_track(&mut self, cue: Cue, looping: bool) {
        self.tracks.insert(
            cue,
            Track {
                volume: self.master_volume,
                looping,
            },
        );
    }

    pub fn is_looping(&self, cue: Cue) -> bool {
        self.tracks.get(&cue).is_some_and(|t| t.looping)
    }

    /// Queue playback of a registered track
    pub fn play(&mut self, cue: Cue) {
        if !self.tracks.contains_key(&cue) {
            log::warn!("play requested for unregistered track {cue:?}");
            return;
        }
        self.queued.push(AudioCommand::Play(cue));
    }

    pub fn stop_all(&mut self) {
        self.queued.push(AudioCommand::StopAll);
    }

    /// Set the master volume and propagate it to every track
    pub fn set_volume(&mut self, volume: f32) {
        self.master_volume = volume.clamp(0.0, 1.0);
        for track in self.tracks.values_mut() {
            track.volume = self.master_volume;
        }
    }

    pub fn volume(&self) -> f32 {
        self.master_volume
    }

    /// Silence everything, remembering the level to restore
    pub fn mute(&mut self) {
        if !self.muted {
            self.previous_volume = self.master_volume;
            self.muted = true;
        }
    }

    pub fn unmute(&mut self) {
        if self.muted {
            self.muted = false;
            self.set_volume(self.previous_volume);
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Volume the frontend should play a track at
    pub fn effective_volume(&self, cue: Cue) -> f32 {
        if self.muted {
            return 0.0;
        }
        self.tracks.get(&cue).map(|t| t.volume).unwrap_or(0.0)
    }

    /// Queue sounds for one scene event
    pub fn react(&mut self, event: &GameEvent) {
        match event {
            GameEvent::ShotFired { .. } => self.play(Cue::Shoot),
            GameEvent::EnemyHit { .. } | GameEvent::PlayerDestroyed => self.play(Cue::Explosion),
            _ => {}
        }
    }

    /// Hand queued commands to the frontend
    pub fn drain_commands(&mut self) -> Vec<AudioCommand> {
        std::mem::take(&mut self.queued)
    }
}
