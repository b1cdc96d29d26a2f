//! UI and menu overlay
//!
//! Three presentation modes - main menu, gameplay, pause overlay - that
//! transition only on explicit user action. Pausing freezes the sim by
//! gating `tick` behind [`AppMode::sim_active`]; starting a game always
//! rebuilds a fresh scene (nothing persists across runs).

pub mod hud;
pub mod widgets;

pub use hud::{HealthBar, Hud};
pub use widgets::{Button, Menu, MenuAction, Slider};

use glam::Vec2;

use crate::sim::Aabb;

/// Top-level presentation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    MainMenu,
    Playing,
    Paused,
}

impl AppMode {
    /// Whether the simulation should advance this frame
    pub fn sim_active(self) -> bool {
        self == AppMode::Playing
    }
}

/// Something the overlay needs the application to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayEffect {
    /// Build a fresh game state and enter gameplay
    NewGame,
    /// Volume slider moved (percent)
    VolumeChanged(u8),
}

/// The full overlay: mode machine, HUD, and both menus
#[derive(Debug, Clone)]
pub struct Overlay {
    pub mode: AppMode,
    pub hud: Hud,
    pub main_menu: Menu,
    pub pause_menu: Menu,
    pub pause_button: Button,
}

impl Overlay {
    pub fn new(screen: Vec2) -> Self {
        let main_menu = Menu::new(Vec2::new(200.0, 100.0), Vec2::new(400.0, 300.0))
            .with_button(Button::new(
                Aabb::from_min_max(Vec2::new(20.0, 20.0), Vec2::new(84.0, 84.0)),
                MenuAction::StartGame,
            ))
            .with_slider(Slider::new(20.0, 250.0, 16.0));

        let mut pause_menu = Menu::new(Vec2::new(200.0, 100.0), Vec2::new(300.0, 300.0))
            .with_button(Button::new(
                Aabb::from_min_max(Vec2::new(20.0, 20.0), Vec2::new(84.0, 84.0)),
                MenuAction::Resume,
            ));
        pause_menu.set_visible(false);

        let pause_button = Button::new(
            Aabb::from_min_max(Vec2::new(screen.x - 80.0, 10.0), Vec2::new(screen.x - 16.0, 50.0)),
            MenuAction::Pause,
        );

        Self {
            mode: AppMode::MainMenu,
            hud: Hud::new(screen.x / 2.0),
            main_menu,
            pause_menu,
            pause_button,
        }
    }

    /// Route a pointer press into whatever is on screen
    pub fn pointer_down(&mut self, pos: Vec2) {
        match self.mode {
            AppMode::MainMenu => self.main_menu.pointer_down(pos),
            AppMode::Playing => self.pause_button.pointer_down(pos),
            AppMode::Paused => self.pause_menu.pointer_down(pos),
        }
    }

    /// Route a pointer drag (slider tracking)
    pub fn pointer_drag(&mut self, pos: Vec2) -> Option<OverlayEffect> {
        match self.mode {
            AppMode::MainMenu => self
                .main_menu
                .pointer_drag(pos)
                .map(OverlayEffect::VolumeChanged),
            _ => None,
        }
    }

    /// Route a pointer release; applies any resulting mode transition
    pub fn pointer_up(&mut self, pos: Vec2) -> Option<OverlayEffect> {
        let action = match self.mode {
            AppMode::MainMenu => self.main_menu.pointer_up(pos),
            AppMode::Playing => self.pause_button.pointer_up(pos),
            AppMode::Paused => self.pause_menu.pointer_up(pos),
        }?;
        self.apply_action(action)
    }

    /// Apply a menu action to the mode machine
    pub fn apply_action(&mut self, action: MenuAction) -> Option<OverlayEffect> {
        match (self.mode, action) {
            (AppMode::MainMenu, MenuAction::StartGame) => {
                log::info!("starting game");
                self.mode = AppMode::Playing;
                self.main_menu.set_visible(false);
                Some(OverlayEffect::NewGame)
            }
            (AppMode::Playing, MenuAction::Pause) => {
                log::info!("paused");
                self.mode = AppMode::Paused;
                self.pause_menu.set_visible(true);
                None
            }
            (AppMode::Paused, MenuAction::Resume) => {
                log::info!("resumed");
                self.mode = AppMode::Playing;
                self.pause_menu.set_visible(false);
                None
            }
            (_, MenuAction::SetVolume(percent)) => Some(OverlayEffect::VolumeChanged(percent)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay() -> Overlay {
        Overlay::new(Vec2::new(800.0, 600.0))
    }

    #[test]
    fn test_start_game_transition() {
        let mut ui = overlay();
        assert_eq!(ui.mode, AppMode::MainMenu);
        assert!(!ui.mode.sim_active());

        let effect = ui.apply_action(MenuAction::StartGame);
        assert_eq!(effect, Some(OverlayEffect::NewGame));
        assert_eq!(ui.mode, AppMode::Playing);
        assert!(ui.mode.sim_active());
        assert!(!ui.main_menu.visible);
    }

    #[test]
    fn test_pause_resume_cycle() {
        let mut ui = overlay();
        ui.apply_action(MenuAction::StartGame);

        assert_eq!(ui.apply_action(MenuAction::Pause), None);
        assert_eq!(ui.mode, AppMode::Paused);
        assert!(ui.pause_menu.visible);
        assert!(!ui.mode.sim_active());

        assert_eq!(ui.apply_action(MenuAction::Resume), None);
        assert_eq!(ui.mode, AppMode::Playing);
        assert!(!ui.pause_menu.visible);
    }

    #[test]
    fn test_invalid_transitions_are_ignored() {
        let mut ui = overlay();
        // Cannot pause or resume from the main menu
        assert_eq!(ui.apply_action(MenuAction::Pause), None);
        assert_eq!(ui.mode, AppMode::MainMenu);
        assert_eq!(ui.apply_action(MenuAction::Resume), None);
        assert_eq!(ui.mode, AppMode::MainMenu);
    }

    #[test]
    fn test_pointer_flow_starts_game() {
        let mut ui = overlay();
        // Main menu at (200,100), play button local (20,20)-(84,84)
        let on_button = Vec2::new(230.0, 130.0);
        ui.pointer_down(on_button);
        let effect = ui.pointer_up(on_button);
        assert_eq!(effect, Some(OverlayEffect::NewGame));
        assert_eq!(ui.mode, AppMode::Playing);
    }

    #[test]
    fn test_volume_drag_reports_percent() {
        let mut ui = overlay();
        // Slider handle starts at its maximum (local x 270, world x 470)
        ui.pointer_down(Vec2::new(470.0, 300.0));
        let effect = ui.pointer_drag(Vec2::new(345.0, 300.0));
        // local x 145 on a slider spanning 20..270 = 50%
        assert_eq!(effect, Some(OverlayEffect::VolumeChanged(50)));
    }
}
