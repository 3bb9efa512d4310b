use std::collections::{HashMap, HashSet};

use glam::Vec2;
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Discrete inputs the controller polls each tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Sprint,
    Crouch,
    Jump,
    Attack,
    ToggleView,
    TriggerChase,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Strafe, right positive.
    Horizontal,
    /// Forward/back, forward positive.
    Vertical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Binding {
    Key(KeyCode),
    Mouse(MouseButton),
}

/// Polled input surface consumed by the controller.
pub trait InputSource {
    /// Continuous axis value in [-1, 1].
    fn axis(&self, axis: Axis) -> f32;
    /// Pointer delta for this tick, x right-positive and y up-positive.
    fn look_delta(&self) -> Vec2;
    fn is_held(&self, action: Action) -> bool;
    /// True only on the tick the binding went down.
    fn was_pressed(&self, action: Action) -> bool;
}

pub struct KeyBindings {
    actions: HashMap<Action, Binding>,
    pub forward: KeyCode,
    pub back: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
}

impl KeyBindings {
    pub fn new() -> Self {
        let actions = HashMap::from([
            (Action::Sprint, Binding::Key(KeyCode::ShiftLeft)),
            (Action::Crouch, Binding::Key(KeyCode::ControlLeft)),
            (Action::Jump, Binding::Key(KeyCode::Space)),
            (Action::Attack, Binding::Mouse(MouseButton::Left)),
            (Action::ToggleView, Binding::Key(KeyCode::KeyC)),
            (Action::TriggerChase, Binding::Key(KeyCode::KeyR)),
        ]);
        Self {
            actions,
            forward: KeyCode::KeyW,
            back: KeyCode::KeyS,
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,
        }
    }

    pub fn bind(&mut self, action: Action, binding: Binding) {
        self.actions.insert(action, binding);
    }

    pub fn binding(&self, action: Action) -> Option<Binding> {
        self.actions.get(&action).copied()
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

/// Input accumulated from window events between two ticks.
pub struct InputState {
    bindings: KeyBindings,
    held: HashSet<Binding>,
    pressed_this_frame: HashSet<Binding>,
    mouse_delta: (f32, f32),
}

impl InputState {
    pub fn new() -> Self {
        Self::with_bindings(KeyBindings::new())
    }

    pub fn with_bindings(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            held: HashSet::new(),
            pressed_this_frame: HashSet::new(),
            mouse_delta: (0.0, 0.0),
        }
    }

    pub fn bindings_mut(&mut self) -> &mut KeyBindings {
        &mut self.bindings
    }

    pub fn handle_key_press(&mut self, key: KeyCode) {
        self.press(Binding::Key(key));
    }

    pub fn handle_key_release(&mut self, key: KeyCode) {
        self.held.remove(&Binding::Key(key));
    }

    pub fn handle_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.press(Binding::Mouse(button));
        } else {
            self.held.remove(&Binding::Mouse(button));
        }
    }

    /// Raw device motion; y grows downward like window coordinates.
    pub fn handle_mouse_move(&mut self, dx: f32, dy: f32) {
        self.mouse_delta.0 += dx;
        self.mouse_delta.1 += dy;
    }

    /// Clears per-frame edges and the accumulated pointer delta.
    pub fn end_frame(&mut self) {
        self.pressed_this_frame.clear();
        self.mouse_delta = (0.0, 0.0);
    }

    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.held.contains(&Binding::Key(key))
    }

    fn press(&mut self, binding: Binding) {
        // Key repeat must not produce a second edge.
        if self.held.insert(binding) {
            self.pressed_this_frame.insert(binding);
        }
    }

    fn key_axis(&self, positive: KeyCode, negative: KeyCode) -> f32 {
        let mut value = 0.0;
        if self.is_key_held(positive) {
            value += 1.0;
        }
        if self.is_key_held(negative) {
            value -= 1.0;
        }
        value
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for InputState {
    fn axis(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.key_axis(self.bindings.right, self.bindings.left),
            Axis::Vertical => self.key_axis(self.bindings.forward, self.bindings.back),
        }
    }

    fn look_delta(&self) -> Vec2 {
        Vec2::new(self.mouse_delta.0, -self.mouse_delta.1)
    }

    fn is_held(&self, action: Action) -> bool {
        self.bindings
            .binding(action)
            .is_some_and(|binding| self.held.contains(&binding))
    }

    fn was_pressed(&self, action: Action) -> bool {
        self.bindings
            .binding(action)
            .is_some_and(|binding| self.pressed_this_frame.contains(&binding))
    }
}

/// Pointer capture state exposed to the windowing layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CursorState {
    pub locked: bool,
    pub visible: bool,
}

impl CursorState {
    pub const fn captured() -> Self {
        Self {
            locked: true,
            visible: false,
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.locked = !visible;
        self.visible = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn press_edge_lasts_one_frame() {
        let mut input = InputState::new();
        input.handle_key_press(KeyCode::Space);
        assert!(input.was_pressed(Action::Jump));
        assert!(input.is_held(Action::Jump));

        input.end_frame();
        assert!(!input.was_pressed(Action::Jump));
        assert!(input.is_held(Action::Jump));
    }

    #[rstest]
    fn key_repeat_does_not_retrigger() {
        let mut input = InputState::new();
        input.handle_key_press(KeyCode::KeyR);
        input.end_frame();
        input.handle_key_press(KeyCode::KeyR);
        assert!(!input.was_pressed(Action::TriggerChase));
    }

    #[rstest]
    #[case::none(&[], 0.0, 0.0)]
    #[case::forward(&[KeyCode::KeyW], 0.0, 1.0)]
    #[case::diagonal(&[KeyCode::KeyW, KeyCode::KeyD], 1.0, 1.0)]
    #[case::opposed(&[KeyCode::KeyA, KeyCode::KeyD], 0.0, 0.0)]
    #[case::back_left(&[KeyCode::KeyS, KeyCode::KeyA], -1.0, -1.0)]
    fn keys_map_to_axes(#[case] keys: &[KeyCode], #[case] x: f32, #[case] y: f32) {
        let mut input = InputState::new();
        for &key in keys {
            input.handle_key_press(key);
        }
        assert_eq!(input.axis(Axis::Horizontal), x);
        assert_eq!(input.axis(Axis::Vertical), y);
    }

    #[rstest]
    fn mouse_attack_binding() {
        let mut input = InputState::new();
        input.handle_mouse_button(MouseButton::Left, true);
        assert!(input.was_pressed(Action::Attack));
        input.handle_mouse_button(MouseButton::Left, false);
        assert!(!input.is_held(Action::Attack));
    }

    #[rstest]
    fn rebinding_changes_lookup() {
        let mut input = InputState::new();
        input
            .bindings_mut()
            .bind(Action::Attack, Binding::Key(KeyCode::KeyF));
        input.handle_key_press(KeyCode::KeyF);
        assert!(input.was_pressed(Action::Attack));
    }

    #[rstest]
    fn look_delta_is_up_positive_and_cleared() {
        let mut input = InputState::new();
        input.handle_mouse_move(3.0, 2.0);
        input.handle_mouse_move(1.0, 2.0);
        assert_eq!(input.look_delta(), Vec2::new(4.0, -4.0));
        input.end_frame();
        assert_eq!(input.look_delta(), Vec2::ZERO);
    }

    #[rstest]
    fn cursor_visibility_toggles_lock() {
        let mut cursor = CursorState::captured();
        cursor.set_visible(true);
        assert_eq!(
            cursor,
            CursorState {
                locked: false,
                visible: true
            }
        );
    }
}
