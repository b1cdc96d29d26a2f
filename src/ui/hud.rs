//! In-game HUD model
//!
//! The health bar is a full-width sprite uncovered by a mask: the mask
//! slides left as damage accumulates, so the visible width scales with
//! the health remaining. The score line re-renders on every confirmed
//! enemy hit.

use crate::sim::{GameEvent, GameState};

/// Masked health bar state
#[derive(Debug, Clone)]
pub struct HealthBar {
    pub bar_width: f32,
    /// How far the mask has slid off the bar (0 = full health)
    pub mask_offset: f32,
}

impl HealthBar {
    pub fn new(bar_width: f32) -> Self {
        Self {
            bar_width,
            mask_offset: 0.0,
        }
    }

    /// Recompute the mask from the player's damage ratio
    pub fn update(&mut self, damage_count: u32, damage_max: u32) {
        let ratio = if damage_max == 0 {
            0.0
        } else {
            damage_count as f32 / damage_max as f32
        };
        self.mask_offset = self.bar_width - self.bar_width * (1.0 - ratio);
    }

    /// Fraction of the bar still showing
    pub fn visible_ratio(&self) -> f32 {
        if self.bar_width == 0.0 {
            0.0
        } else {
            1.0 - self.mask_offset / self.bar_width
        }
    }
}

/// Score text plus health bar, refreshed from scene events
#[derive(Debug, Clone)]
pub struct Hud {
    pub score_text: String,
    pub health: HealthBar,
}

impl Hud {
    pub fn new(bar_width: f32) -> Self {
        Self {
            score_text: "Score: 0".to_string(),
            health: HealthBar::new(bar_width),
        }
    }

    pub fn set_score(&mut self, score: u32) {
        self.score_text = format!("Score: {score}");
    }

    /// React to one scene event
    pub fn apply(&mut self, event: &GameEvent, state: &GameState) {
        match event {
            GameEvent::EnemyHit { .. } => self.set_score(state.score),
            GameEvent::PlayerHit | GameEvent::PlayerDestroyed => {
                self.health
                    .update(state.player.damage_count, state.player.damage_max);
            }
            _ => {}
        }
    }
}
