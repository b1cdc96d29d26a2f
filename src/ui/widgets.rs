//! Menu widget models
//!
//! Logic-level buttons, sliders and menu containers: hit testing, drag
//! math and enabled/toggle state, with rendering left to the frontend.
//! Children of a menu are positioned relative to the menu's origin.

use glam::Vec2;

use crate::sim::Aabb;

/// What a widget asks the application to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    StartGame,
    Pause,
    Resume,
    /// Volume slider moved (percent, 0-100)
    SetVolume(u8),
}

/// A tap target with an action
#[derive(Debug, Clone)]
pub struct Button {
    pub rect: Aabb,
    pub action: MenuAction,
    /// Disabled buttons are greyed out and ignore the pointer
    pub enabled: bool,
    pub toggleable: bool,
    pub toggle_on: bool,
    /// Tinted while the pointer is held down on it
    pub pressed: bool,
}

impl Button {
    pub fn new(rect: Aabb, action: MenuAction) -> Self {
        Self {
            rect,
            action,
            enabled: true,
            toggleable: false,
            toggle_on: true,
            pressed: false,
        }
    }

    pub fn toggleable(mut self) -> Self {
        self.toggleable = true;
        self
    }

    /// Pointer pressed at `pos`; tints the button when it lands on it
    pub fn pointer_down(&mut self, pos: Vec2) {
        if self.enabled && self.rect.contains(pos) {
            self.pressed = true;
        }
    }

    /// Pointer released at `pos`. Fires only on release over an enabled
    /// button, flipping toggle state first.
    pub fn pointer_up(&mut self, pos: Vec2) -> Option<MenuAction> {
        let was_pressed = std::mem::replace(&mut self.pressed, false);
        if !self.enabled || !was_pressed || !self.rect.contains(pos) {
            return None;
        }
        if self.toggleable {
            self.toggle_on = !self.toggle_on;
        }
        Some(self.action)
    }
}

/// A draggable handle locked between two points, reporting its position
/// as an integer percent
#[derive(Debug, Clone)]
pub struct Slider {
    pub min_x: f32,
    pub max_x: f32,
    pub handle_x: f32,
    pub handle_half_width: f32,
    pub percent: u8,
    dragging: bool,
}

impl Slider {
    /// Slider spanning `x` to `x + width`, handle starting at the maximum
    pub fn new(x: f32, width: f32, handle_half_width: f32) -> Self {
        Self {
            min_x: x,
            max_x: x + width,
            handle_x: x + width,
            handle_half_width,
            percent: 100,
            dragging: false,
        }
    }

    /// Begin dragging if the pointer lands on the handle
    pub fn pointer_down(&mut self, x: f32) {
        if (x - self.handle_x).abs() <= self.handle_half_width {
            self.dragging = true;
        }
    }

    /// Track the pointer while dragging. The handle clamps to [min, max];
    /// percent is the truncated linear interpolation, clamped to [0, 100].
    pub fn drag_to(&mut self, x: f32) -> Option<u8> {
        if !self.dragging {
            return None;
        }
        self.handle_x = x.clamp(self.min_x, self.max_x);
        let span = self.max_x - self.min_x;
        let raw = if span > 0.0 {
            (100.0 * (self.handle_x - self.min_x) / span).trunc()
        } else {
            0.0
        };
        self.percent = (raw as i32).clamp(0, 100) as u8;
        Some(self.percent)
    }

    pub fn pointer_up(&mut self) {
        self.dragging = false;
    }
}

/// A container positioning child widgets relative to its origin
#[derive(Debug, Clone)]
pub struct Menu {
    pub origin: Vec2,
    pub size: Vec2,
    pub visible: bool,
    pub buttons: Vec<Button>,
    pub sliders: Vec<Slider>,
}

impl Menu {
    pub fn new(origin: Vec2, size: Vec2) -> Self {
        Self {
            origin,
            size,
            visible: true,
            buttons: Vec::new(),
            sliders: Vec::new(),
        }
    }

    pub fn with_button(mut self, button: Button) -> Self {
        self.buttons.push(button);
        self
    }

    pub fn with_slider(mut self, slider: Slider) -> Self {
        self.sliders.push(slider);
        self
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Dispatch a pointer press in world space to the children
    pub fn pointer_down(&mut self, pos: Vec2) {
        if !self.visible {
            return;
        }
        let local = pos - self.origin;
        for button in &mut self.buttons {
            button.pointer_down(local);
        }
        for slider in &mut self.sliders {
            slider.pointer_down(local.x);
        }
    }

    /// Dispatch a drag; returns the first slider percent that changed
    pub fn pointer_drag(&mut self, pos: Vec2) -> Option<u8> {
        if !self.visible {
            return None;
        }
        let local = pos - self.origin;
        self.sliders.iter_mut().find_map(|s| s.drag_to(local.x))
    }

    /// Dispatch a pointer release; returns the first action fired
    pub fn pointer_up(&mut self, pos: Vec2) -> Option<MenuAction> {
        let local = pos - self.origin;
        for slider in &mut self.sliders {
            slider.pointer_up();
        }
        if !self.visible {
            // Buttons still clear their pressed tint
            for button in &mut self.buttons {
                button.pressed = false;
            }
            return None;
        }
        self.buttons.iter_mut().find_map(|b| b.pointer_up(local))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn button_at_origin() -> Button {
        Button::new(
            Aabb::from_min_max(Vec2::ZERO, Vec2::new(40.0, 20.0)),
            MenuAction::StartGame,
        )
    }

    #[test]
    fn test_button_fires_on_release_over() {
        let mut button = button_at_origin();
        button.pointer_down(Vec2::new(10.0, 10.0));
        assert!(button.pressed);
        assert_eq!(
            button.pointer_up(Vec2::new(10.0, 10.0)),
            Some(MenuAction::StartGame)
        );
        assert!(!button.pressed);
    }

    #[test]
    fn test_button_release_outside_does_not_fire() {
        let mut button = button_at_origin();
        button.pointer_down(Vec2::new(10.0, 10.0));
        assert_eq!(button.pointer_up(Vec2::new(100.0, 100.0)), None);
        assert!(!button.pressed);
    }

    #[test]
    fn test_disabled_button_ignores_pointer() {
        let mut button = button_at_origin();
        button.enabled = false;
        button.pointer_down(Vec2::new(10.0, 10.0));
        assert!(!button.pressed);
        assert_eq!(button.pointer_up(Vec2::new(10.0, 10.0)), None);
    }

    #[test]
    fn test_toggle_button_flips_state() {
        let mut button = button_at_origin().toggleable();
        assert!(button.toggle_on);
        button.pointer_down(Vec2::new(5.0, 5.0));
        button.pointer_up(Vec2::new(5.0, 5.0));
        assert!(!button.toggle_on);
        button.pointer_down(Vec2::new(5.0, 5.0));
        button.pointer_up(Vec2::new(5.0, 5.0));
        assert!(button.toggle_on);
    }

    #[test]
    fn test_slider_endpoints() {
        let mut slider = Slider::new(0.0, 200.0, 10.0);
        assert_eq!(slider.percent, 100);

        slider.pointer_down(200.0);
        slider.drag_to(-50.0);
        assert_eq!(slider.percent, 0);
        assert_eq!(slider.handle_x, 0.0);

        slider.drag_to(500.0);
        assert_eq!(slider.percent, 100);
        assert_eq!(slider.handle_x, 200.0);
    }

    #[test]
    fn test_slider_interior_truncates() {
        let mut slider = Slider::new(0.0, 200.0, 10.0);
        slider.pointer_down(200.0);
        slider.drag_to(101.0);
        // 101/200 = 50.5% -> truncated
        assert_eq!(slider.percent, 50);
    }

    #[test]
    fn test_slider_requires_grab() {
        let mut slider = Slider::new(0.0, 200.0, 10.0);
        // Pointer nowhere near the handle at max_x
        slider.pointer_down(20.0);
        assert_eq!(slider.drag_to(100.0), None);
        assert_eq!(slider.percent, 100);
    }

    #[test]
    fn test_menu_routes_relative_coordinates() {
        let mut menu = Menu::new(Vec2::new(200.0, 100.0), Vec2::new(300.0, 300.0))
            .with_button(button_at_origin());
        // World (210, 110) = local (10, 10), inside the button
        menu.pointer_down(Vec2::new(210.0, 110.0));
        assert_eq!(
            menu.pointer_up(Vec2::new(210.0, 110.0)),
            Some(MenuAction::StartGame)
        );
    }

    #[test]
    fn test_hidden_menu_ignores_input() {
        let mut menu = Menu::new(Vec2::ZERO, Vec2::new(300.0, 300.0))
            .with_button(button_at_origin());
        menu.set_visible(false);
        menu.pointer_down(Vec2::new(10.0, 10.0));
        assert_eq!(menu.pointer_up(Vec2::new(10.0, 10.0)), None);
    }

    proptest! {
        #[test]
        fn prop_slider_percent_always_in_range(
            start in -1000.0f32..1000.0,
            width in 1.0f32..500.0,
            drags in proptest::collection::vec(-2000.0f32..2000.0, 1..20)
        ) {
            let mut slider = Slider::new(start, width, 8.0);
            slider.pointer_down(start + width);
            for x in drags {
                if let Some(percent) = slider.drag_to(x) {
                    prop_assert!(percent <= 100);
                }
                prop_assert!(slider.handle_x >= slider.min_x);
                prop_assert!(slider.handle_x <= slider.max_x);
            }
        }
    }
}
